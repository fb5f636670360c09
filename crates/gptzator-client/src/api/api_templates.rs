//! API templates for HTTP steps.

use crate::call::api_call;
use crate::client::GptzatorClient;
use crate::error::Result;
use crate::query::Query;
use crate::types::{ApiTemplate, Collection};

pub struct ApiTemplatesApi {
    client: GptzatorClient,
}

impl ApiTemplatesApi {
    pub(crate) fn new(client: GptzatorClient) -> Self {
        Self { client }
    }

    /// List templates, optionally filtered by name.
    pub async fn list(
        &self,
        search: Option<&str>,
        page: Option<u32>,
        per_page: Option<u32>,
    ) -> Result<Collection<ApiTemplate>> {
        let mut q = Query::new();
        if let Some(search) = search {
            q = q.field_contains("name", search);
        }
        let q = q.param_opt("page", page).param_opt("limit", per_page);

        api_call(
            "ApiTemplatesApi.list",
            self.client
                .get_with_query("apps_steps_api_templates", q),
        )
        .await
    }

    pub async fn get(&self, id: &str) -> Result<ApiTemplate> {
        api_call(
            "ApiTemplatesApi.get",
            self.client
                .get(&format!("apps_steps_api_templates/{}", id)),
        )
        .await
    }
}
