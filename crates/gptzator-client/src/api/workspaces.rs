//! Workspaces API.

use crate::call::api_call;
use crate::client::GptzatorClient;
use crate::error::{ApiError, Result};
use crate::query::Query;
use crate::types::{Workspace, WorkspaceRequest, WorkspaceTree, WorkspacesResponse};

/// Assistant workspaces.
pub struct WorkspacesApi {
    client: GptzatorClient,
}

impl WorkspacesApi {
    pub(crate) fn new(client: GptzatorClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, search: Option<&str>) -> Result<Vec<Workspace>> {
        api_call("WorkspacesApi.list", async {
            let response: WorkspacesResponse = self
                .client
                .get_with_query(
                    "assistant/workspaces",
                    Query::new().param_opt("search", search),
                )
                .await?;
            Ok::<_, ApiError>(response.workspaces)
        })
        .await
    }

    pub async fn create(&self, request: &WorkspaceRequest) -> Result<Workspace> {
        api_call(
            "WorkspacesApi.create",
            self.client.post("assistant__workspaces?depth=0", request),
        )
        .await
    }

    pub async fn update(&self, id: &str, request: &WorkspaceRequest) -> Result<Workspace> {
        api_call(
            "WorkspacesApi.update",
            self.client
                .patch(&format!("assistant__workspaces/{}?depth=0", id), request),
        )
        .await
    }

    pub async fn delete(&self, id: &str) -> Result<Workspace> {
        api_call(
            "WorkspacesApi.delete",
            self.client.delete(&format!("assistant/workspaces/{}", id)),
        )
        .await
    }

    pub async fn get(&self, id: &str) -> Result<Workspace> {
        api_call(
            "WorkspacesApi.get",
            self.client
                .get(&format!("assistant__workspaces/{}?depth=0", id)),
        )
        .await
    }

    /// Sources and nested spaces of a workspace.
    pub async fn tree(&self, id: &str) -> Result<WorkspaceTree> {
        api_call(
            "WorkspacesApi.tree",
            self.client.get(&format!("assistant/workspaces/{}/tree", id)),
        )
        .await
    }
}
