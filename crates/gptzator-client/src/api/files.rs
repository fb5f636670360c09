//! Files API.

use serde_json::Value;

use crate::api::by_id;
use crate::call::api_call;
use crate::client::GptzatorClient;
use crate::error::Result;
use crate::query::Query;
use crate::transport::FormPart;
use crate::types::{Collection, StoredFile};

/// Uploaded files and thread attachments.
pub struct FilesApi {
    client: GptzatorClient,
}

impl FilesApi {
    pub(crate) fn new(client: GptzatorClient) -> Self {
        Self { client }
    }

    /// Upload a file. `mime` defaults to the server's detection.
    pub async fn upload(&self, file_name: &str, data: Vec<u8>, mime: Option<&str>) -> Result<Value> {
        api_call(
            "FilesApi.upload",
            self.client
                .post_multipart("files", vec![file_part(file_name, data, mime)]),
        )
        .await
    }

    pub async fn get(&self, id: &str) -> Result<StoredFile> {
        api_call("FilesApi.get", self.client.get(&format!("files/{}", id))).await
    }

    pub async fn get_many(&self, ids: &[String]) -> Result<Collection<StoredFile>> {
        api_call(
            "FilesApi.get_many",
            self.client
                .get_with_query("files", Query::new().where_in("id", ids)),
        )
        .await
    }

    pub async fn delete(&self, file_id: &str) -> Result<Value> {
        api_call(
            "FilesApi.delete",
            self.client.delete_with_query("files", by_id(file_id)),
        )
        .await
    }

    /// Upload a file to be attached to threads.
    pub async fn upload_thread_file(
        &self,
        file_name: &str,
        data: Vec<u8>,
        mime: Option<&str>,
    ) -> Result<Value> {
        api_call(
            "FilesApi.upload_thread_file",
            self.client
                .post_multipart("threads_files", vec![file_part(file_name, data, mime)]),
        )
        .await
    }

    pub async fn delete_thread_file(&self, file_id: &str) -> Result<Value> {
        api_call(
            "FilesApi.delete_thread_file",
            self.client
                .delete_with_query("threads_files", by_id(file_id)),
        )
        .await
    }
}

fn file_part(file_name: &str, data: Vec<u8>, mime: Option<&str>) -> FormPart {
    let part = FormPart::file("file", file_name, data);
    match mime {
        Some(mime) => part.mime(mime),
        None => part,
    }
}
