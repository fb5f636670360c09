//! API endpoint implementations.

mod api_templates;
mod apps;
mod assistants;
mod files;
mod invites;
mod models;
mod projects;
mod sources;
mod subscribes;
mod thread_assistant;
mod threads;
mod user;
mod vaults;
mod workspaces;

pub use api_templates::ApiTemplatesApi;
pub use apps::{AppsApi, ListAppsQuery, SettingsTemplatesQuery};
pub use assistants::AssistantsApi;
pub use files::FilesApi;
pub use invites::{InvitesApi, ListInvitesQuery};
pub use models::ModelsApi;
pub use projects::{ListProjectsQuery, ProjectsApi};
pub use sources::SourcesApi;
pub use subscribes::SubscribesApi;
pub use thread_assistant::ThreadAssistantApi;
pub use threads::{ListThreadsQuery, ThreadsApi};
pub use user::UserApi;
pub use vaults::{ListVaultsQuery, VaultsApi};
pub use workspaces::WorkspacesApi;

use crate::query::Query;

/// `where[id][equals]=<id>` filter used by collection deletes.
pub(crate) fn by_id(id: &str) -> Query {
    Query::new().where_equals("id", id)
}
