//! Apps API.

use serde::Serialize;
use serde_json::{Value, json};

use crate::api::by_id;
use crate::call::api_call;
use crate::client::GptzatorClient;
use crate::error::{ApiError, Result};
use crate::query::Query;
use crate::types::{
    App, AppTag, AppsMenuItem, AppsMenuResponse, Collection, DocResponse, OauthClient,
    OauthClientsResponse, SettingsTemplate,
};

/// Name given to apps created without one.
const DEFAULT_APP_NAME: &str = "New skill";

/// Filters for listing apps.
#[derive(Debug, Clone, Default)]
pub struct ListAppsQuery {
    /// Only apps with this tag ID.
    pub tag: Option<String>,
    /// Substring match on the app name.
    pub search: Option<String>,
    pub page: Option<u32>,
    /// Only apps by this author.
    pub author: Option<String>,
    pub per_page: Option<u32>,
}

impl ListAppsQuery {
    fn to_query(&self) -> Query {
        let mut query = Query::new();
        if let Some(search) = &self.search {
            query = query.field_contains("name", search);
        }
        if let Some(tag) = &self.tag {
            query = query.field_equals("tags", tag);
        }
        if let Some(author) = &self.author {
            query = query.field_equals("author", author);
        }
        query
            .param_opt("limit", self.per_page)
            .param_opt("page", self.page)
    }
}

/// Filters for listing an app's settings templates.
#[derive(Debug, Clone, Default)]
pub struct SettingsTemplatesQuery {
    pub app_id: String,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Apps, menu, tags and settings templates.
pub struct AppsApi {
    client: GptzatorClient,
}

impl AppsApi {
    pub(crate) fn new(client: GptzatorClient) -> Self {
        Self { client }
    }

    /// List apps.
    pub async fn list(&self, query: ListAppsQuery) -> Result<Collection<App>> {
        api_call(
            "AppsApi.list",
            self.client.get_with_query("apps", query.to_query()),
        )
        .await
    }

    /// Create an app owned by `author`.
    pub async fn create(&self, author: &str, name: Option<&str>) -> Result<App> {
        api_call("AppsApi.create", async {
            let response: DocResponse<App> = self
                .client
                .post(
                    "apps?depth=0",
                    &json!({ "author": author, "name": name.unwrap_or(DEFAULT_APP_NAME) }),
                )
                .await?;
            Ok::<_, ApiError>(response.doc)
        })
        .await
    }

    /// Patch an app with arbitrary fields.
    pub async fn update<B: Serialize + ?Sized>(&self, id: &str, fields: &B) -> Result<App> {
        api_call(
            "AppsApi.update",
            self.client.patch(&format!("apps/{}?depth=0", id), fields),
        )
        .await
    }

    pub async fn delete(&self, id: &str) -> Result<Collection<App>> {
        api_call("AppsApi.delete", self.client.delete_with_query("apps", by_id(id))).await
    }

    /// Get an app by ID.
    pub async fn get(&self, id: &str) -> Result<App> {
        api_call("AppsApi.get", self.client.get(&format!("apps/{}?depth=0", id))).await
    }

    /// OAuth clients available for `redirect_uri`.
    pub async fn oauth_clients(&self, redirect_uri: &str) -> Result<Vec<OauthClient>> {
        api_call("AppsApi.oauth_clients", async {
            let response: OauthClientsResponse = self
                .client
                .get_with_query(
                    "oauth_clients/oauth/clients",
                    Query::new().param("redirectUri", redirect_uri),
                )
                .await?;
            Ok::<_, ApiError>(response.clients)
        })
        .await
    }

    pub async fn logout_oauth_client(&self, client_id: &str) -> Result<()> {
        api_call("AppsApi.logout_oauth_client", async {
            self.client
                .post_empty::<Value>(&format!("oauth_clients/oauth/clients/{}/logout", client_id))
                .await
                .map(|_| ())
        })
        .await
    }

    /// The apps menu tree.
    pub async fn menu(&self) -> Result<Vec<AppsMenuItem>> {
        api_call("AppsApi.menu", async {
            let response: AppsMenuResponse = self.client.get("apps_menu/tree").await?;
            Ok::<_, ApiError>(response.menu)
        })
        .await
    }

    pub async fn favourites(&self) -> Result<Vec<App>> {
        api_call("AppsApi.favourites", self.client.get("apps/favourites?depth=0")).await
    }

    /// Add or remove an app from the user's favourites.
    pub async fn set_favourite(&self, id: &str, is_favourite: bool) -> Result<()> {
        api_call("AppsApi.set_favourite", async {
            if is_favourite {
                self.client
                    .post::<Value, _>("users/favourites", &json!({ "id": id }))
                    .await?;
            } else {
                self.client
                    .delete::<Value>(&format!("users/favourites/{}", id))
                    .await?;
            }
            Ok::<_, ApiError>(())
        })
        .await
    }

    /// First page of app tags.
    pub async fn tags(&self) -> Result<Collection<AppTag>> {
        api_call(
            "AppsApi.tags",
            self.client
                .get_with_query("tags", Query::new().param("limit", 50).param("page", 1)),
        )
        .await
    }

    pub async fn settings_templates(
        &self,
        query: SettingsTemplatesQuery,
    ) -> Result<Collection<SettingsTemplate>> {
        let mut q = Query::new().field_equals("app", &query.app_id);
        if let Some(search) = &query.search {
            q = q.field_contains("name", search);
        }
        let q = q
            .param_opt("limit", query.per_page)
            .param_opt("page", query.page);

        api_call(
            "AppsApi.settings_templates",
            self.client.get_with_query("apps_settings", q),
        )
        .await
    }

    /// Make a settings template the active one for its app.
    pub async fn activate_template(&self, id: &str) -> Result<SettingsTemplate> {
        api_call(
            "AppsApi.activate_template",
            self.client
                .post_empty(&format!("apps_settings/{}/activate", id)),
        )
        .await
    }

    pub async fn create_settings_template<B: Serialize + ?Sized>(
        &self,
        template: &B,
    ) -> Result<SettingsTemplate> {
        api_call(
            "AppsApi.create_settings_template",
            self.client.post("apps_settings", template),
        )
        .await
    }

    pub async fn update_settings_template<B: Serialize + ?Sized>(
        &self,
        id: &str,
        fields: &B,
    ) -> Result<SettingsTemplate> {
        api_call(
            "AppsApi.update_settings_template",
            self.client
                .patch(&format!("apps_settings/{}?depth=0", id), fields),
        )
        .await
    }

    pub async fn delete_settings_template(&self, id: &str) -> Result<()> {
        api_call("AppsApi.delete_settings_template", async {
            self.client
                .delete_with_query::<Value>("apps_settings", by_id(id))
                .await
                .map(|_| ())
        })
        .await
    }
}
