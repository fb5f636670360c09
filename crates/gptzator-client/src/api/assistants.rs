//! Assistants API.

use serde_json::Value;

use crate::call::api_call;
use crate::client::GptzatorClient;
use crate::error::{ApiError, Result};
use crate::query::Query;
use crate::transport::FormPart;
use crate::types::{Assistant, AssistantRequest, AssistantsResponse, UpdateAssistantContextRequest};

/// Assistant definitions.
pub struct AssistantsApi {
    client: GptzatorClient,
}

impl AssistantsApi {
    pub(crate) fn new(client: GptzatorClient) -> Self {
        Self { client }
    }

    /// List assistants, optionally filtered by name.
    pub async fn list(&self, search: Option<&str>) -> Result<Vec<Assistant>> {
        api_call("AssistantsApi.list", async {
            let response: AssistantsResponse = self
                .client
                .get_with_query(
                    "assistant/assistants",
                    Query::new().param_opt("search", search),
                )
                .await?;
            Ok::<_, ApiError>(response.assistants)
        })
        .await
    }

    pub async fn get(&self, id: &str) -> Result<Assistant> {
        api_call(
            "AssistantsApi.get",
            self.client.get(&format!("assistant/assistants/{}", id)),
        )
        .await
    }

    pub async fn create(&self, request: &AssistantRequest) -> Result<Assistant> {
        api_call(
            "AssistantsApi.create",
            self.client.post("assistant/assistants", request),
        )
        .await
    }

    pub async fn update(&self, id: &str, request: &AssistantRequest) -> Result<Assistant> {
        api_call(
            "AssistantsApi.update",
            self.client
                .patch(&format!("assistant/assistants/{}", id), request),
        )
        .await
    }

    /// Switch the selected mode or workspaces.
    pub async fn update_context(
        &self,
        id: &str,
        request: &UpdateAssistantContextRequest,
    ) -> Result<Assistant> {
        api_call(
            "AssistantsApi.update_context",
            self.client
                .patch(&format!("assistant/assistants/{}/context", id), request),
        )
        .await
    }

    /// Upload an assistant image; the returned document's ID goes into `image_id`.
    pub async fn upload_image(&self, file_name: &str, data: Vec<u8>) -> Result<Value> {
        api_call(
            "AssistantsApi.upload_image",
            self.client
                .post_multipart("assistant__images", vec![FormPart::file("file", file_name, data)]),
        )
        .await
    }

    pub async fn delete(&self, id: &str) -> Result<Assistant> {
        api_call(
            "AssistantsApi.delete",
            self.client.delete(&format!("assistant/assistants/{}", id)),
        )
        .await
    }
}
