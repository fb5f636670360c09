//! Projects API.

use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;
use serde_json::{Value, json};

use crate::call::api_call;
use crate::client::GptzatorClient;
use crate::error::{ApiError, Result};
use crate::query::Query;
use crate::transport::RequestSpec;
use crate::types::{Artefact, Collection, CreateProjectBody, CreateProjectRequest, DocResponse, Project};
use crate::workflow::{self, CallAppOptions, GenerationBackend};

/// Page size used when listing projects.
const PROJECTS_PAGE_SIZE: u32 = 20;

/// Filters for listing projects.
#[derive(Debug, Clone, Default)]
pub struct ListProjectsQuery {
    /// Substring match on the project name.
    pub search: Option<String>,
    pub page: Option<u32>,
}

/// Projects and generation endpoints.
pub struct ProjectsApi {
    client: GptzatorClient,
}

impl ProjectsApi {
    pub(crate) fn new(client: GptzatorClient) -> Self {
        Self { client }
    }

    /// List the user's projects, twenty per page.
    pub async fn list(&self, query: ListProjectsQuery) -> Result<Collection<Project>> {
        let mut q = Query::new();
        if let Some(search) = &query.search {
            q = q.where_contains("name", search);
        }
        let q = q
            .param("limit", PROJECTS_PAGE_SIZE)
            .param_opt("page", query.page);

        api_call("ProjectsApi.list", self.client.get_with_query("projects", q)).await
    }

    /// List projects created from one application.
    pub async fn list_for_app(&self, app_id: &str) -> Result<Collection<Project>> {
        let q = Query::new()
            .where_equals("application", app_id)
            .param("depth", 0);
        api_call(
            "ProjectsApi.list_for_app",
            self.client.get_with_query("projects", q),
        )
        .await
    }

    /// Get a project by ID.
    pub async fn get(&self, id: &str) -> Result<Project> {
        api_call("ProjectsApi.get", self.client.get(&format!("projects/{}", id))).await
    }

    pub async fn create(&self, request: &CreateProjectRequest) -> Result<Project> {
        api_call("ProjectsApi.create", async {
            let response: DocResponse<Project> = self
                .client
                .post("projects/", &CreateProjectBody::from(request))
                .await?;
            Ok::<_, ApiError>(response.doc)
        })
        .await
    }

    /// Patch the project's step configuration.
    pub async fn update_actions<B: Serialize + ?Sized>(
        &self,
        project_id: &str,
        fields: &B,
    ) -> Result<Project> {
        api_call("ProjectsApi.update_actions", async {
            let response: DocResponse<Project> = self
                .client
                .patch(&format!("projects/{}", project_id), fields)
                .await?;
            Ok::<_, ApiError>(response.doc)
        })
        .await
    }

    /// Start generation via `/generateBlocks` (`has_blocks`) or `/generate`.
    pub async fn generate(&self, project_id: &str, has_blocks: bool) -> Result<Vec<Artefact>> {
        api_call("ProjectsApi.generate", async {
            let body: Value = self
                .client
                .post_empty(&generate_path(project_id, has_blocks))
                .await?;
            decode_artefacts(body)
        })
        .await
    }

    /// Regenerate one artefact, optionally steering it with a comment.
    pub async fn regenerate_artefact(
        &self,
        project_id: &str,
        artefact_id: &str,
        comment: Option<&str>,
    ) -> Result<Vec<Artefact>> {
        api_call("ProjectsApi.regenerate_artefact", async {
            let body: Value = self
                .client
                .post(
                    &format!("projects/{}/regenerate/{}", project_id, artefact_id),
                    &json!({ "comment": comment }),
                )
                .await?;
            decode_artefacts(body)
        })
        .await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let q = Query::new().where_equals("id", id).param("depth", 0);
        api_call("ProjectsApi.delete", async {
            self.client
                .delete_with_query::<Value>("projects", q)
                .await
                .map(|_| ())
        })
        .await
    }

    /// Run an application to completion and return the finished project.
    ///
    /// See [`workflow::call_app`] for the polling semantics.
    pub async fn call_app(
        &self,
        application_id: &str,
        idea: &str,
        options: CallAppOptions,
    ) -> Result<Project> {
        api_call(
            "ProjectsApi.call_app",
            workflow::call_app(self, application_id, idea, options),
        )
        .await
    }
}

fn generate_path(project_id: &str, has_blocks: bool) -> String {
    let suffix = if has_blocks { "Blocks" } else { "" };
    format!("projects/{}/generate{}", project_id, suffix)
}

/// Trigger endpoints may answer with an empty body.
fn decode_artefacts(body: Value) -> std::result::Result<Vec<Artefact>, ApiError> {
    if body.is_null() {
        return Ok(Vec::new());
    }
    serde_json::from_value(body).map_err(|e| ApiError::local(e.to_string()))
}

#[async_trait]
impl GenerationBackend for ProjectsApi {
    async fn create(&self, request: &CreateProjectRequest) -> Result<Project> {
        ProjectsApi::create(self, request).await
    }

    /// Whatever the trigger answers on success is ignored.
    async fn trigger(&self, project_id: &str, has_blocks: bool) -> Result<()> {
        let spec = RequestSpec::new(Method::POST, generate_path(project_id, has_blocks));
        api_call("ProjectsApi.generate", self.client.request_unit(spec)).await
    }

    async fn fetch(&self, project_id: &str) -> Result<Project> {
        self.get(project_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_path() {
        assert_eq!(generate_path("p1", true), "projects/p1/generateBlocks");
        assert_eq!(generate_path("p1", false), "projects/p1/generate");
    }

    #[test]
    fn test_empty_trigger_body() {
        assert!(decode_artefacts(Value::Null).unwrap().is_empty());
    }

    #[test]
    fn test_trigger_body_with_artefacts() {
        let artefacts = decode_artefacts(json!([{"id": "a1", "name": "Outline"}])).unwrap();
        assert_eq!(artefacts[0].id, "a1");
    }

    #[test]
    fn test_malformed_trigger_body_is_local() {
        let err = decode_artefacts(json!({"unexpected": true})).unwrap_err();
        assert_eq!(err.kind, crate::ErrorKind::Local);
    }
}
