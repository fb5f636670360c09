//! Assistant threads API.

use serde_json::json;

use crate::call::api_call;
use crate::client::GptzatorClient;
use crate::error::{ApiError, Failure, Result};
use crate::query::Query;
use crate::types::{AssistantThread, AssistantThreadsQuery, Collection, Message};

/// Threads bound to assistants and workspaces.
pub struct ThreadAssistantApi {
    client: GptzatorClient,
}

impl ThreadAssistantApi {
    pub(crate) fn new(client: GptzatorClient) -> Self {
        Self { client }
    }

    /// Threads of a workspace.
    pub async fn list_for_workspace(
        &self,
        query: AssistantThreadsQuery,
    ) -> Result<Collection<AssistantThread>> {
        api_call(
            "ThreadAssistantApi.list_for_workspace",
            self.client
                .get_with_query("assistant__threads", owner_query(query)),
        )
        .await
    }

    /// Threads of an assistant.
    pub async fn list_for_assistant(
        &self,
        query: AssistantThreadsQuery,
    ) -> Result<Collection<AssistantThread>> {
        api_call(
            "ThreadAssistantApi.list_for_assistant",
            self.client
                .get_with_query("assistant__threads", owner_query(query)),
        )
        .await
    }

    pub async fn create_for_workspace(
        &self,
        workspace_id: &str,
        title: &str,
    ) -> Result<AssistantThread> {
        api_call(
            "ThreadAssistantApi.create_for_workspace",
            self.client.post(
                &format!("assistant/workspaces/{}/threads?depth=0", workspace_id),
                &json!({ "title": title }),
            ),
        )
        .await
    }

    /// Start a thread with an assistant, optionally in a specific mode.
    pub async fn create_for_assistant(
        &self,
        assistant_id: &str,
        title: &str,
        mode_id: Option<&str>,
    ) -> Result<AssistantThread> {
        let mut body = json!({ "title": title });
        if let Some(mode_id) = mode_id {
            body["modeId"] = json!(mode_id);
        }

        api_call(
            "ThreadAssistantApi.create_for_assistant",
            self.client.post(
                &format!("assistant/assistants/{}/threads", assistant_id),
                &body,
            ),
        )
        .await
    }

    /// Save a modified thread. Every field except `id` is sent.
    pub async fn update(&self, thread: &AssistantThread) -> Result<AssistantThread> {
        api_call("ThreadAssistantApi.update", async {
            let mut body = serde_json::to_value(thread)?;
            if let Some(fields) = body.as_object_mut() {
                fields.remove("id");
            }
            self.client
                .patch(&format!("assistant__threads/{}?depth=0", thread.id), &body)
                .await
                .map_err(Failure::from)
        })
        .await
    }

    pub async fn get(&self, id: &str) -> Result<AssistantThread> {
        api_call(
            "ThreadAssistantApi.get",
            self.client.get(&format!("assistant__threads/{}", id)),
        )
        .await
    }

    /// Messages of a thread; pages start at 1.
    pub async fn messages(&self, thread_id: &str, page: Option<u32>) -> Result<Collection<Message>> {
        let q = Query::new()
            .field_equals("thread", thread_id)
            .param("page", page.unwrap_or(1));
        api_call(
            "ThreadAssistantApi.messages",
            self.client
                .get_with_query("assistant__thread_messages", q),
        )
        .await
    }

    pub async fn create_message(&self, thread_id: &str, text: &str) -> Result<Message> {
        api_call(
            "ThreadAssistantApi.create_message",
            self.client.post(
                &format!("assistant/threads/{}/messages", thread_id),
                &json!({ "text": text }),
            ),
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
            "ThreadAssistantApi.edit_message",
            self.client.patch(
                &format!("assistant/threads/{}/messages/{}", thread_id, message_id),
                &json!({ "content": content }),
            ),
        )
        .await
    }

    pub async fn delete_message(&self, thread_id: &str, message_id: &str) -> Result<Message> {
        api_call(
            "ThreadAssistantApi.delete_message",
            self.client.delete(&format!(
                "assistant/threads/{}/messages/{}",
                thread_id, message_id
            )),
        )
        .await
    }

    pub async fn regenerate_message(&self, thread_id: &str, message_id: &str) -> Result<Message> {
        api_call(
            "ThreadAssistantApi.regenerate_message",
            self.client.post_empty(&format!(
                "assistant/threads/{}/messages/{}/regenerate",
                thread_id, message_id
            )),
        )
        .await
    }

    pub async fn delete(&self, thread_id: &str) -> Result<()> {
        api_call("ThreadAssistantApi.delete", async {
            self.client
                .delete::<serde_json::Value>(&format!("assistant/threads/{}", thread_id))
                .await?;
            Ok::<_, ApiError>(())
        })
        .await
    }
}

fn owner_query(query: AssistantThreadsQuery) -> Query {
    Query::new()
        .param("id", query.id)
        .param("page", query.page)
        .param_opt("search", query.search)
}
