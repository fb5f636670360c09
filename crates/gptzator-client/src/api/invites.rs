//! Organization invites API.

use serde_json::json;

use crate::call::api_call;
use crate::client::GptzatorClient;
use crate::error::Result;
use crate::query::Query;
use crate::types::{Collection, Invite, InviteSummary};

/// Filters for listing invites.
#[derive(Debug, Clone, Default)]
pub struct ListInvitesQuery {
    /// Substring match on the invited email.
    pub search: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Invitations into the user's organization.
pub struct InvitesApi {
    client: GptzatorClient,
}

impl InvitesApi {
    pub(crate) fn new(client: GptzatorClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, query: ListInvitesQuery) -> Result<Collection<Invite>> {
        let mut q = Query::new();
        if let Some(search) = &query.search {
            q = q.field_contains("email", search);
        }
        let q = q
            .param_opt("page", query.page)
            .param_opt("limit", query.per_page)
            .param("depth", 0);

        api_call("InvitesApi.list", self.client.get_with_query("orgs_invites", q)).await
    }

    /// Look up an invite by the token from the invitation link.
    pub async fn get(&self, invite_token: &str) -> Result<InviteSummary> {
        api_call(
            "InvitesApi.get",
            self.client.get(&format!("orgs/invites/{}", invite_token)),
        )
        .await
    }

    /// Invite `email` into the organization.
    pub async fn create(&self, email: &str) -> Result<Invite> {
        api_call(
            "InvitesApi.create",
            self.client.post("orgs_invites", &json!({ "email": email })),
        )
        .await
    }

    pub async fn delete(&self, invite_id: &str) -> Result<Invite> {
        api_call(
            "InvitesApi.delete",
            self.client.delete(&format!("orgs_invites/{}", invite_id)),
        )
        .await
    }
}
