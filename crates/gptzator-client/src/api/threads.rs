//! Threads API.

use serde_json::json;

use crate::call::api_call;
use crate::client::GptzatorClient;
use crate::error::Result;
use crate::query::Query;
use crate::types::{Collection, CreateThreadRequest, GenerationType, Message, Thread};

/// Parameters for listing threads.
#[derive(Debug, Clone, Default)]
pub struct ListThreadsQuery {
    /// Substring match on the thread title.
    pub search: Option<String>,
    pub page: Option<u32>,
}

/// Chat threads and their messages.
pub struct ThreadsApi {
    client: GptzatorClient,
}

impl ThreadsApi {
    pub(crate) fn new(client: GptzatorClient) -> Self {
        Self { client }
    }

    /// List threads.
    pub async fn list(&self, query: ListThreadsQuery) -> Result<Collection<Thread>> {
        let q = Query::new()
            .param_opt("search", query.search)
            .param_opt("page", query.page);
        api_call("ThreadsApi.list", self.client.get_with_query("threads", q)).await
    }

    /// Get a thread by ID.
    pub async fn get(&self, id: &str) -> Result<Thread> {
        api_call("ThreadsApi.get", self.client.get(&format!("threads/{}", id))).await
    }

    pub async fn create(&self, request: &CreateThreadRequest) -> Result<Thread> {
        api_call("ThreadsApi.create", self.client.post("threads/create", request)).await
    }

    pub async fn delete(&self, id: &str) -> Result<Thread> {
        api_call("ThreadsApi.delete", self.client.delete(&format!("threads/{}", id))).await
    }

    /// Replace the vaults attached to a thread.
    pub async fn set_vaults(&self, thread_id: &str, vault_ids: &[String]) -> Result<Thread> {
        api_call(
            "ThreadsApi.set_vaults",
            self.client.post(
                &format!("threads/{}/set-context", thread_id),
                &json!({ "vaultIds": vault_ids }),
            ),
        )
        .await
    }

    /// Messages of a thread, one page at a time.
    pub async fn messages(&self, thread_id: &str, page: Option<u32>) -> Result<Collection<Message>> {
        let q = Query::new()
            .param("threadId", thread_id)
            .param_opt("page", page);
        api_call(
            "ThreadsApi.messages",
            self.client.get_with_query("threads_messages", q),
        )
        .await
    }

    pub async fn generation_types(&self) -> Result<Collection<GenerationType>> {
        api_call(
            "ThreadsApi.generation_types",
            self.client.get("threads_generation_types"),
        )
        .await
    }

    pub async fn set_generation_type(&self, thread_id: &str, type_id: &str) -> Result<Thread> {
        api_call(
            "ThreadsApi.set_generation_type",
            self.client.patch(
                &format!("threads/{}", thread_id),
                &json!({ "generationType": type_id }),
            ),
        )
        .await
    }

    pub async fn set_model(&self, thread_id: &str, model_id: &str) -> Result<Thread> {
        api_call(
            "ThreadsApi.set_model",
            self.client
                .patch(&format!("threads/{}", thread_id), &json!({ "model": model_id })),
        )
        .await
    }

    /// Post a user message.
    pub async fn create_message(&self, thread_id: &str, text: &str) -> Result<Message> {
        api_call(
            "ThreadsApi.create_message",
            self.client
                .post(&format!("threads/{}/messages", thread_id), &json!({ "text": text })),
        )
        .await
    }

    pub async fn edit_message(
        &self,
        thread_id: &str,
        message_id: &str,
        content: &str,
    ) -> Result<Message> {
        api_call(
            "ThreadsApi.edit_message",
            self.client.patch(
                &format!("threads/{}/messages/{}", thread_id, message_id),
                &json!({ "content": content }),
            ),
        )
        .await
    }

    pub async fn delete_message(&self, thread_id: &str, message_id: &str) -> Result<Message> {
        api_call(
            "ThreadsApi.delete_message",
            self.client
                .delete(&format!("threads/{}/messages/{}", thread_id, message_id)),
        )
        .await
    }

    /// Ask the model to answer a message again.
    pub async fn regenerate_message(&self, thread_id: &str, message_id: &str) -> Result<Message> {
        api_call(
            "ThreadsApi.regenerate_message",
            self.client.post_empty(&format!(
                "threads/{}/messages/{}/regenerate",
                thread_id, message_id
            )),
        )
        .await
    }

    /// Attach previously uploaded files to a thread.
    pub async fn attach_files(&self, thread_id: &str, file_ids: &[String]) -> Result<Message> {
        api_call(
            "ThreadsApi.attach_files",
            self.client.post(
                &format!("threads/{}/files/attach", thread_id),
                &json!({ "fileIds": file_ids }),
            ),
        )
        .await
    }
}
