//! Workspace sources API.

use serde_json::Value;

use crate::call::api_call;
use crate::client::GptzatorClient;
use crate::error::{ApiError, Result};
use crate::query::Query;
use crate::transport::FormPart;
use crate::types::{
    Collection, CreateSourceBody, CreateSourceRequest, DocResponse, Source, StoredFile,
    UpdateSourceRequest,
};

/// Page size for source listings.
const SOURCES_PAGE_SIZE: u32 = 50;

/// Data sources attached to workspaces.
pub struct SourcesApi {
    client: GptzatorClient,
}

impl SourcesApi {
    pub(crate) fn new(client: GptzatorClient) -> Self {
        Self { client }
    }

    /// List sources, optionally restricted to `ids` and a name substring.
    pub async fn list(&self, ids: &[String], search: Option<&str>) -> Result<Collection<Source>> {
        let mut q = Query::new().field_in("id", ids);
        if let Some(search) = search.filter(|s| !s.is_empty()) {
            q = q.field_contains("name", search);
        }
        let q = q.param("limit", SOURCES_PAGE_SIZE).param("page", 1);

        api_call(
            "SourcesApi.list",
            self.client.get_with_query("assistant__sources", q),
        )
        .await
    }

    /// Upload a file to be used as a source.
    pub async fn upload_file(&self, file_name: &str, data: Vec<u8>) -> Result<StoredFile> {
        api_call("SourcesApi.upload_file", async {
            let response: DocResponse<StoredFile> = self
                .client
                .post_multipart(
                    "assistant__source_files",
                    vec![FormPart::file("file", file_name, data)],
                )
                .await?;
            Ok::<_, ApiError>(response.doc)
        })
        .await
    }

    /// Attach an uploaded file to a workspace.
    pub async fn create(&self, request: &CreateSourceRequest) -> Result<Value> {
        let body = CreateSourceBody {
            file_id: &request.file_id,
            parent_space_id: request.parent_space_id.as_deref(),
        };
        api_call(
            "SourcesApi.create",
            self.client.post(
                &format!("assistant/workspaces/{}/sources", request.workspace_id),
                &body,
            ),
        )
        .await
    }

    pub async fn update(&self, request: &UpdateSourceRequest) -> Result<Source> {
        api_call("SourcesApi.update", async {
            let response: DocResponse<Source> = self
                .client
                .patch(&format!("assistant/sources/{}", request.id), request)
                .await?;
            Ok::<_, ApiError>(response.doc)
        })
        .await
    }

    /// Detach a source from a workspace.
    pub async fn delete(&self, workspace_id: &str, source_id: &str) -> Result<Value> {
        api_call(
            "SourcesApi.delete",
            self.client.delete(&format!(
                "assistant/workspaces/{}/sources/{}",
                workspace_id, source_id
            )),
        )
        .await
    }
}
