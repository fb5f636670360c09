//! Vaults API.

use reqwest::Method;

use crate::api::by_id;
use crate::call::api_call;
use crate::client::GptzatorClient;
use crate::error::{ApiError, Result};
use crate::query::Query;
use crate::transport::RequestSpec;
use crate::types::{Collection, DocResponse, MeResponse, Vault, VaultForm, VaultTag};

/// Filters for listing vaults.
#[derive(Debug, Clone, Default)]
pub struct ListVaultsQuery {
    pub tag: Option<String>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Knowledge vaults.
pub struct VaultsApi {
    client: GptzatorClient,
}

impl VaultsApi {
    pub(crate) fn new(client: GptzatorClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, query: ListVaultsQuery) -> Result<Collection<Vault>> {
        let q = Query::new()
            .param_opt("tag", query.tag)
            .param_opt("search", query.search)
            .param_opt("page", query.page)
            .param_opt("vaultsPerPage", query.per_page);
        api_call("VaultsApi.list", self.client.get_with_query("vaults", q)).await
    }

    pub async fn get(&self, id: &str) -> Result<Vault> {
        api_call("VaultsApi.get", self.client.get(&format!("vaults/{}", id))).await
    }

    /// Fetch several vaults in one request.
    pub async fn get_many(&self, ids: &[String]) -> Result<Collection<Vault>> {
        api_call(
            "VaultsApi.get_many",
            self.client
                .get_with_query("vaults", Query::new().where_in("id", ids)),
        )
        .await
    }

    /// The current user's favourite vaults.
    pub async fn favourites(&self) -> Result<Vec<Vault>> {
        api_call("VaultsApi.favourites", async {
            let response: MeResponse = self.client.get("users/me").await?;
            Ok::<_, ApiError>(
                response
                    .user
                    .map(|user| user.favorite_vaults)
                    .unwrap_or_default(),
            )
        })
        .await
    }

    pub async fn set_favourite(&self, id: &str, is_favourite: bool) -> Result<()> {
        let method = if is_favourite {
            Method::POST
        } else {
            Method::DELETE
        };
        let spec = RequestSpec::new(method, format!("users/me/favorites/vaults/{}", id));
        api_call("VaultsApi.set_favourite", self.client.request_unit(spec)).await
    }

    pub async fn tags(&self) -> Result<Collection<VaultTag>> {
        api_call(
            "VaultsApi.tags",
            self.client
                .get_with_query("vaults_tags", Query::new().param("page", 1)),
        )
        .await
    }

    pub async fn create(&self, form: &VaultForm) -> Result<Vault> {
        api_call("VaultsApi.create", async {
            let response: DocResponse<Vault> = self.client.post("vaults?depth=0", form).await?;
            Ok::<_, ApiError>(response.doc)
        })
        .await
    }

    /// Save an edited vault; `form.id` selects the vault.
    pub async fn update(&self, form: &VaultForm) -> Result<Vault> {
        api_call("VaultsApi.update", async {
            let mut body = serde_json::to_value(form).map_err(|e| ApiError::local(e.to_string()))?;
            if let Some(fields) = body.as_object_mut() {
                fields.remove("id");
            }
            let response: DocResponse<Vault> = self
                .client
                .patch(&format!("vaults/{}", form.id), &body)
                .await?;
            Ok::<_, ApiError>(response.doc)
        })
        .await
    }

    pub async fn delete(&self, id: &str) -> Result<Collection<Vault>> {
        api_call(
            "VaultsApi.delete",
            self.client.delete_with_query("vaults", by_id(id)),
        )
        .await
    }
}
