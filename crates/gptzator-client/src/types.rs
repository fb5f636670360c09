//! Request and response types for the GPTZator API.
//!
//! These types mirror the platform's JSON (camelCase keys). Response types
//! default every field so that partially populated documents (shallow
//! `depth`, optional relations) still decode.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Decode an explicit `null` as the type's default.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ─────────────────────────────────────────────────────────────────────────────
// Shared
// ─────────────────────────────────────────────────────────────────────────────

/// Paginated collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct Collection<T> {
    /// Documents on this page.
    #[serde(default = "Vec::new", deserialize_with = "null_default")]
    pub docs: Vec<T>,
    /// Total number of documents across pages.
    #[serde(default, deserialize_with = "null_default")]
    pub total_docs: u64,
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub total_pages: Option<u64>,
    #[serde(default)]
    pub page: Option<u64>,
    #[serde(default)]
    pub paging_counter: Option<u64>,
    #[serde(default)]
    pub has_prev_page: Option<bool>,
    #[serde(default)]
    pub has_next_page: Option<bool>,
    #[serde(default)]
    pub prev_page: Option<u64>,
    #[serde(default)]
    pub next_page: Option<u64>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            docs: Vec::new(),
            total_docs: 0,
            limit: None,
            total_pages: None,
            page: None,
            paging_counter: None,
            has_prev_page: None,
            has_next_page: None,
            prev_page: None,
            next_page: None,
        }
    }
}

/// Single document wrapper returned by create/update endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocResponse<T> {
    /// The document.
    pub doc: T,
    /// Optional server message.
    #[serde(default)]
    pub message: Option<String>,
}

/// A relationship that is either an ID (shallow depth) or a populated document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Relation<T> {
    Id(String),
    Doc(T),
}

impl<T> Relation<T> {
    /// The populated document, if any.
    pub fn doc(&self) -> Option<&T> {
        match self {
            Relation::Id(_) => None,
            Relation::Doc(doc) => Some(doc),
        }
    }
}

/// Visibility scope for assistants and their threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Hidden,
    Org,
    Public,
    Personal,
}

/// Minimal `{ id }` reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdRef {
    pub id: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Users
// ─────────────────────────────────────────────────────────────────────────────

/// Platform user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct User {
    #[serde(deserialize_with = "null_default")]
    pub id: String,
    pub role: Option<String>,
    pub r#type: Option<String>,
    /// Account balance as reported by the server.
    pub balance: Option<Value>,
    pub is_internal: Option<bool>,
    #[serde(deserialize_with = "null_default")]
    pub email: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    #[serde(deserialize_with = "null_default")]
    pub policy: bool,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub purchased_tokens: Option<f64>,
    pub free_tokens: Option<f64>,
    pub telegram_token: Option<String>,
    /// Onboarding pages the user has completed.
    #[serde(deserialize_with = "null_default")]
    pub onboarded: HashMap<String, bool>,
    pub default_model: Option<DefaultModel>,
    pub default_thread_model: Option<DefaultModel>,
    /// OAuth profile data keyed by provider.
    pub meta: Option<Value>,
    pub avatar: Option<UserAvatar>,
    pub organization: Option<Organization>,
    pub is_org_manager: Option<bool>,
    #[serde(deserialize_with = "null_default")]
    pub favorite_vaults: Vec<Vault>,
}

/// User's organization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Organization {
    pub id: String,
    pub name: String,
}

/// Uploaded avatar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserAvatar {
    pub id: String,
    pub url: String,
}

/// Model selected as a user default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DefaultModel {
    pub id: String,
    pub name: String,
    pub code_id: String,
    pub vendor: String,
    pub description: Option<String>,
}

/// Response of `users/me`.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct MeResponse {
    #[serde(default)]
    pub user: Option<User>,
}

/// Raw login/registration response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct AuthResponse {
    pub user: Option<User>,
    pub token: Option<String>,
    pub refresh_token: Option<String>,
}

/// Successful login or registration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginResponse {
    /// The authenticated user.
    pub user: Option<User>,
    /// The issued access token.
    pub token: String,
}

/// Request to register a new user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    /// Acceptance of the platform policy.
    pub policy: bool,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promo_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_invite_token: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Apps
// ─────────────────────────────────────────────────────────────────────────────

/// An application (skill) that can be run to generate projects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct App {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub description_small: Option<String>,
    pub placeholder: Option<String>,
    pub imageurl: Option<String>,
    pub video_id: Option<String>,
    #[serde(deserialize_with = "null_default")]
    pub is_favourite: bool,
    #[serde(deserialize_with = "null_default")]
    pub is_private: bool,
    pub is_recommend: Option<bool>,
    pub is_start_button: Option<bool>,
    #[serde(deserialize_with = "null_default")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "null_default")]
    pub actions: Vec<AppAction>,
    pub author: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub demo_project: Option<String>,
    #[serde(deserialize_with = "null_default")]
    pub oauth_clients: Vec<String>,
    #[serde(deserialize_with = "null_default")]
    pub approximate_cost: f64,
    pub emoji: Option<String>,
    #[serde(deserialize_with = "null_default")]
    pub settings: Vec<Value>,
    pub rag_settings: Option<RagSettings>,
}

/// A step inside an application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppAction {
    #[serde(deserialize_with = "null_default")]
    pub id: String,
    #[serde(deserialize_with = "null_default")]
    pub block_name: String,
    #[serde(deserialize_with = "null_default")]
    pub block_type: String,
    pub model: Option<String>,
    pub prompt: Option<String>,
    pub slug: Option<String>,
    pub r#type: Option<String>,
    pub next_slug: Option<String>,
    pub item_slug: Option<String>,
    #[serde(deserialize_with = "null_default")]
    pub is_hidden: bool,
    pub node_props: Option<Value>,
}

/// Retrieval settings of an application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RagSettings {
    pub is_enable: bool,
    pub embedding_query_string: String,
    pub context_size_in_chars: Option<u64>,
}

/// OAuth client connected to applications.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OauthClient {
    pub id: String,
    pub name: String,
    pub r#type: String,
    pub code: String,
    pub has_logged: bool,
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct OauthClientsResponse {
    #[serde(default)]
    pub clients: Vec<OauthClient>,
}

/// Application tag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppTag {
    pub id: String,
    pub name: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Saved settings preset for an application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SettingsTemplate {
    pub id: String,
    pub author: String,
    pub app: String,
    pub name: String,
    pub values: Option<Value>,
    pub is_default: bool,
    pub is_private: bool,
    pub is_active: bool,
}

/// Node of the applications menu tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum AppsMenuItem {
    Group {
        id: String,
        name: String,
        #[serde(default)]
        icon_url: Option<String>,
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        children: Vec<AppsMenuItem>,
        #[serde(default)]
        is_selected: Option<bool>,
    },
    Action {
        id: String,
        name: String,
        #[serde(default)]
        icon_url: Option<String>,
        #[serde(default)]
        description: Option<String>,
        action: AppAction,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct AppsMenuResponse {
    #[serde(default)]
    pub menu: Vec<AppsMenuItem>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Projects
// ─────────────────────────────────────────────────────────────────────────────

/// A generation project created from an application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Project {
    #[serde(deserialize_with = "null_default")]
    pub id: String,
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    #[serde(deserialize_with = "null_default")]
    pub idea: String,
    pub updated_at: Option<String>,
    pub created_at: Option<String>,
    /// Whether generation is still running.
    #[serde(deserialize_with = "null_default")]
    pub generating: bool,
    pub application: Option<Relation<ProjectApplication>>,
    #[serde(deserialize_with = "null_default")]
    pub actions: Vec<ProjectAction>,
    #[serde(deserialize_with = "null_default")]
    pub is_error: bool,
    /// Message of the last failed generation.
    pub last_generation_error: Option<String>,
    /// Structured project error (`slug`, `code`, `description`, `meta`).
    pub error: Option<Value>,
    #[serde(deserialize_with = "null_default")]
    pub artefacts: Vec<Artefact>,
    pub is_demo: Option<bool>,
}

/// Application as embedded in a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectApplication {
    #[serde(deserialize_with = "null_default")]
    pub id: String,
    pub name: Option<String>,
    #[serde(deserialize_with = "null_default")]
    pub actions: Vec<ProjectAction>,
    pub emoji: Option<String>,
}

/// Step reference inside a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectAction {
    #[serde(deserialize_with = "null_default")]
    pub id: String,
    #[serde(deserialize_with = "null_default")]
    pub block_name: String,
    #[serde(deserialize_with = "null_default")]
    pub block_type: String,
    pub slug: Option<String>,
    pub description: Option<String>,
}

/// Output of one generation step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Artefact {
    #[serde(deserialize_with = "null_default")]
    pub id: String,
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    /// Step output; shape depends on the step type.
    pub data: Value,
    pub slug: Option<String>,
    pub next_slug: Option<String>,
    pub item_slug: Option<String>,
    #[serde(rename = "completion_tokens")]
    pub completion_tokens: Option<u64>,
    #[serde(rename = "prompt_tokens")]
    pub prompt_tokens: Option<u64>,
    pub metadata: Option<ArtefactMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ArtefactMetadata {
    #[serde(deserialize_with = "null_default")]
    pub annotations: HashMap<String, String>,
    #[serde(deserialize_with = "null_default")]
    pub regenerating: bool,
    #[serde(deserialize_with = "null_default")]
    pub artefact_type: String,
    #[serde(deserialize_with = "null_default")]
    pub artefact_name: String,
    pub action_description: Option<String>,
    pub action_demo_description: Option<String>,
    #[serde(deserialize_with = "null_default")]
    pub action_id: String,
    pub is_hidden: Option<bool>,
    pub artefact_block: Option<String>,
    pub duration: Option<ArtefactDuration>,
    #[serde(deserialize_with = "null_default")]
    pub price: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ArtefactDuration {
    #[serde(deserialize_with = "null_default")]
    pub difference_in_seconds: f64,
    pub ended_at: Option<String>,
    pub started_at: Option<String>,
}

/// Request to create a project.
#[derive(Debug, Clone, Default)]
pub struct CreateProjectRequest {
    /// Seed input; also used as the project name.
    pub idea: String,
    /// Application to run.
    pub application_id: String,
    pub is_demo: Option<bool>,
    pub is_test: Option<bool>,
}

/// Wire body for project creation. Flags are only sent when set.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateProjectBody<'a> {
    pub name: &'a str,
    pub idea: &'a str,
    pub application: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_demo: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_test: Option<bool>,
}

impl<'a> From<&'a CreateProjectRequest> for CreateProjectBody<'a> {
    fn from(request: &'a CreateProjectRequest) -> Self {
        Self {
            name: &request.idea,
            idea: &request.idea,
            application: &request.application_id,
            is_demo: request.is_demo.filter(|flag| *flag),
            is_test: request.is_test.filter(|flag| *flag),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Threads
// ─────────────────────────────────────────────────────────────────────────────

/// Chat thread.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Thread {
    #[serde(deserialize_with = "null_default")]
    pub id: String,
    /// `generating` or `wait`.
    pub status: Option<String>,
    #[serde(deserialize_with = "null_default")]
    pub title: String,
    pub updated_at: Option<String>,
    pub created_at: Option<String>,
    pub latest_error: Option<String>,
    pub generation_type: Option<GenerationType>,
    pub model: Option<Model>,
    #[serde(deserialize_with = "null_default")]
    pub vault: Vec<Vault>,
}

/// Message in a thread.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub choices: Vec<MessageChoice>,
    /// `gpt`, `user`, `userChangeContext` or `userTextFile`.
    pub r#type: String,
    pub user_avatar: Option<String>,
    /// Attached file for `userTextFile` messages.
    pub file: Option<MessageFile>,
    pub meta: Option<MessageMeta>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageChoice {
    pub id: String,
    pub r#type: String,
    pub content: String,
    pub annotations: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MessageFile {
    pub original_filename: String,
    pub filesize: u64,
    pub mime_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageMeta {
    pub price: f64,
}

/// Generation mode available to threads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationType {
    pub id: String,
    pub r#type: String,
    pub name: String,
}

/// Request to create a thread.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateThreadRequest {
    /// Model to chat with.
    #[serde(rename = "id")]
    pub model_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vault_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub file_ids: Vec<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Assistants
// ─────────────────────────────────────────────────────────────────────────────

/// Assistant definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Assistant {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: Option<UserAvatar>,
    pub scope: Option<Scope>,
    pub is_default: bool,
    pub organization: Option<String>,
    pub organization_id: Option<String>,
    pub author: Option<String>,
    pub can_edit: Option<bool>,
    pub welcome_message: Option<String>,
    pub modes: Vec<AssistantMode>,
    pub workspace_ids: Vec<String>,
    pub ctx: Option<AssistantContext>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Mode of an assistant as returned by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AssistantMode {
    pub id: String,
    pub name: Option<String>,
    pub instructions: Value,
    pub is_default: Option<bool>,
    pub is_selected: Option<bool>,
    pub llm: Option<ModeLlm>,
    pub rag: Option<ModeRag>,
    pub apps: Option<ModeApps>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModeLlm {
    pub model_id: Option<String>,
    pub temperature: Option<f64>,
    pub recent_message_count: Option<u32>,
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModeRag {
    pub embedding_model_id: String,
    pub r#type: String,
    pub context_size_in_chars: u64,
    pub min_match_percent: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModeApps {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tool_ids: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub system_message_ids: Vec<String>,
}

/// Currently selected mode and workspaces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AssistantContext {
    pub mode_id: Option<String>,
    pub workspaces: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct AssistantsResponse {
    #[serde(default)]
    pub assistants: Vec<Assistant>,
}

/// Mode definition sent when creating or updating an assistant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantModeInput {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm: Option<ModeLlm>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apps: Option<ModeApps>,
}

/// Request to create or update an assistant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub welcome_message: Option<String>,
    pub scope: Scope,
    pub modes: Vec<AssistantModeInput>,
}

/// Request to switch an assistant's mode or workspaces.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssistantContextRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_ids: Option<Vec<String>>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Assistant threads
// ─────────────────────────────────────────────────────────────────────────────

/// Thread bound to an assistant or workspace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AssistantThread {
    pub id: String,
    pub name: Option<String>,
    pub author: Option<String>,
    pub assistant: Option<AssistantSummary>,
    pub status: Option<String>,
    pub title: String,
    /// `workspace` or `assistant`.
    pub r#type: Option<String>,
    pub updated_at: Option<String>,
    pub created_at: Option<String>,
    pub latest_error: Option<String>,
    pub workspaces: Vec<Value>,
    pub scope: Option<Scope>,
    pub mode: Option<IdRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantSummary {
    pub name: String,
    pub scope: Option<Scope>,
}

/// Filter for listing assistant threads by owner.
#[derive(Debug, Clone, Default)]
pub struct AssistantThreadsQuery {
    /// Workspace or assistant ID.
    pub id: String,
    pub page: u32,
    pub search: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Vaults
// ─────────────────────────────────────────────────────────────────────────────

/// Knowledge vault.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Vault {
    pub id: String,
    pub name: String,
    /// `json`, `app` or `mongodb`.
    pub r#type: Option<String>,
    pub applications_to_launch: Vec<String>,
    pub description: Option<String>,
    #[serde(rename = "llm_instructions")]
    pub llm_instructions: Option<String>,
    pub token: Option<String>,
    #[serde(rename = "data_title")]
    pub data_title: Option<String>,
    pub value_title: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub organization: Option<Value>,
    pub instructions: Option<String>,
    pub is_favorite: Option<bool>,
    pub logo: Option<String>,
    pub author: Option<String>,
    pub tags: Vec<String>,
    pub value: Option<String>,
    pub embedding_settings: Option<EmbeddingSettings>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EmbeddingSettings {
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_size_in_chars: Option<u64>,
}

/// Vault tag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VaultTag {
    pub id: String,
    pub name: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Vault create/edit form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultForm {
    /// Ignored on create; selects the vault on edit.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    pub tags: Vec<String>,
    pub r#type: String,
    pub applications_to_launch: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    pub is_public: bool,
    pub value: String,
    pub options: String,
    pub author: String,
    pub embedding_settings: EmbeddingSettings,
}

// ─────────────────────────────────────────────────────────────────────────────
// Workspaces & sources
// ─────────────────────────────────────────────────────────────────────────────

/// Assistant workspace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Workspace {
    pub id: String,
    pub author: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub sources: Value,
    pub spaces: Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct WorkspacesResponse {
    #[serde(default)]
    pub workspaces: Vec<Workspace>,
}

/// Request to create or update a workspace.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkspaceRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

/// Processing state of a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceExecutionState {
    InProgress,
    Success,
    Fail,
}

/// Sources and nested spaces of a workspace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceTree {
    pub sources: Vec<TreeSource>,
    pub spaces: Vec<Value>,
    pub workspace: Option<WorkspaceSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TreeSource {
    pub id: String,
    pub name: String,
    pub r#type: String,
    pub execution_status: Option<ExecutionStatus>,
    pub file: Option<TreeFile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionStatus {
    pub state: SourceExecutionState,
    #[serde(default)]
    pub last_run_at: Option<String>,
    #[serde(default)]
    pub last_success_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TreeFile {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    pub filesize: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceSummary {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}

/// Data source attached to a workspace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Source {
    pub id: String,
    pub author: Option<String>,
    pub name: String,
    pub config: Value,
    pub execution_status: Option<SourceExecutionState>,
    pub is_enable: bool,
    pub updated_at: Option<String>,
}

/// Request to attach an uploaded file to a workspace as a source.
#[derive(Debug, Clone, Default)]
pub struct CreateSourceRequest {
    pub workspace_id: String,
    pub file_id: String,
    pub parent_space_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateSourceBody<'a> {
    pub file_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_space_id: Option<&'a str>,
}

/// Request to rename or describe a source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSourceRequest {
    #[serde(skip)]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Files
// ─────────────────────────────────────────────────────────────────────────────

/// Uploaded file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoredFile {
    pub id: String,
    pub author: Option<String>,
    pub filename: String,
    pub mime_type: String,
    pub filesize: u64,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    /// Storage prefix (source files only).
    pub prefix: Option<String>,
    /// Public URL (source files only).
    pub url: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Models
// ─────────────────────────────────────────────────────────────────────────────

/// Chat model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Model {
    #[serde(deserialize_with = "null_default")]
    pub id: String,
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    #[serde(deserialize_with = "null_default")]
    pub code_id: String,
    #[serde(deserialize_with = "null_default")]
    pub vendor: String,
    pub description: Option<String>,
    pub active: Option<bool>,
}

/// LLM used by application steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmModel {
    pub id: String,
    pub name: String,
    pub code: String,
}

/// Embedding model for vaults and retrieval.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EmbeddingModel {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub code: String,
    pub is_active: Option<bool>,
    pub model: String,
    pub price: f64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Invites
// ─────────────────────────────────────────────────────────────────────────────

/// Invitation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InviteStatus {
    Registered,
    Sent,
}

/// Organization invitation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Invite {
    pub id: String,
    pub organization: String,
    pub email: String,
    pub token: Option<String>,
    pub status: Option<InviteStatus>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub employee: Option<Employee>,
}

/// Public view of an invite, looked up by its token.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InviteSummary {
    pub organization: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Employee {
    pub id: String,
    pub email: String,
    pub avatar: Option<String>,
    pub stats: Option<EmployeeStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmployeeStats {
    pub day: f64,
    pub week: f64,
    pub month: f64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Billing
// ─────────────────────────────────────────────────────────────────────────────

/// Product kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    Subscription,
    Once,
}

/// Purchasable product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Option<String>,
    pub price: f64,
    pub tokens: f64,
    pub r#type: Option<ProductType>,
    pub updated_at: Option<String>,
    pub tags: Vec<String>,
}

/// A user's subscription.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Subscribe {
    pub id: String,
    pub created_at: Option<String>,
    pub end_date: Option<String>,
    pub updated_at: Option<String>,
    pub sum: f64,
    #[serde(rename = "paied")]
    pub paid: Option<bool>,
    pub product: Option<Product>,
}

/// Payment link.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentUri {
    pub uri: String,
}

/// Result of applying a coupon.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CouponResponse {
    pub message: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// API templates
// ─────────────────────────────────────────────────────────────────────────────

/// Template for an HTTP step inside an application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiTemplate {
    pub id: String,
    pub author: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub name: String,
    pub method: String,
    pub url: String,
    pub headers: Vec<TemplateHeader>,
    pub params: Vec<TemplateParam>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateHeader {
    pub id: String,
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TemplateParam {
    pub id: String,
    pub name: String,
    pub block_name: String,
    /// `text`, `textarea` or `select`.
    pub block_type: String,
    pub options: Vec<SelectOption>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_project_tolerates_null_collections() {
        let project: Project = serde_json::from_value(json!({
            "id": "p1",
            "generating": false,
            "actions": null,
            "artefacts": null,
            "isError": null
        }))
        .unwrap();
        assert_eq!(project.id, "p1");
        assert!(!project.generating);
        assert!(project.actions.is_empty());
        assert!(project.artefacts.is_empty());
        assert!(!project.is_error);
    }

    #[test]
    fn test_listed_app_tolerates_nulls() {
        let page: Collection<App> = serde_json::from_value(json!({
            "docs": [{"id": "a1", "name": null, "tags": null, "isFavourite": null, "approximateCost": null}],
            "totalDocs": null
        }))
        .unwrap();
        assert_eq!(page.total_docs, 0);
        assert_eq!(page.docs.len(), 1);
        assert!(page.docs[0].tags.is_empty());
        assert!(!page.docs[0].is_favourite);
    }

    #[test]
    fn test_collection_decodes_partial_pagination() {
        let page: Collection<Model> = serde_json::from_value(json!({
            "docs": [{"id": "m1", "name": "GPT", "codeId": "gpt-4o", "vendor": "openai"}],
            "totalDocs": 1,
            "prevPage": null,
            "nextPage": null
        }))
        .unwrap();
        assert_eq!(page.total_docs, 1);
        assert_eq!(page.docs[0].code_id, "gpt-4o");
        assert_eq!(page.next_page, None);
    }

    #[test]
    fn test_project_relation_accepts_id_or_doc() {
        let shallow: Project =
            serde_json::from_value(json!({"id": "p1", "application": "app-1"})).unwrap();
        assert_eq!(
            shallow.application,
            Some(Relation::Id("app-1".to_string()))
        );

        let deep: Project = serde_json::from_value(json!({
            "id": "p1",
            "application": {"id": "app-1", "name": "Writer"}
        }))
        .unwrap();
        assert_eq!(
            deep.application.unwrap().doc().unwrap().name.as_deref(),
            Some("Writer")
        );
    }

    #[test]
    fn test_project_null_error_fields() {
        let project: Project = serde_json::from_value(json!({
            "id": "p1",
            "generating": false,
            "lastGenerationError": null,
            "error": null
        }))
        .unwrap();
        assert!(project.last_generation_error.is_none());
        assert!(project.error.is_none());
    }

    #[test]
    fn test_create_project_body_omits_unset_flags() {
        let request = CreateProjectRequest {
            idea: "A landing page".to_string(),
            application_id: "app-1".to_string(),
            is_demo: Some(false),
            is_test: Some(true),
        };
        let body = serde_json::to_value(CreateProjectBody::from(&request)).unwrap();
        assert_eq!(
            body,
            json!({
                "name": "A landing page",
                "idea": "A landing page",
                "application": "app-1",
                "isTest": true
            })
        );
    }

    #[test]
    fn test_apps_menu_tree() {
        let menu: Vec<AppsMenuItem> = serde_json::from_value(json!([
            {
                "id": "g1",
                "type": "group",
                "name": "Marketing",
                "children": [
                    {
                        "id": "a1",
                        "type": "action",
                        "name": "Post",
                        "iconUrl": "https://cdn/icon.png",
                        "action": {"id": "s1", "blockName": "Post", "blockType": "text"}
                    }
                ]
            }
        ]))
        .unwrap();

        let AppsMenuItem::Group { children, .. } = &menu[0] else {
            panic!("expected group");
        };
        assert!(matches!(
            &children[0],
            AppsMenuItem::Action { icon_url: Some(_), .. }
        ));
    }

    #[test]
    fn test_create_thread_request_wire_names() {
        let request = CreateThreadRequest {
            model_id: "m1".to_string(),
            title: "Chat".to_string(),
            vault_ids: vec!["v1".to_string()],
            file_ids: Vec::new(),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"id": "m1", "title": "Chat", "vaultIds": ["v1"]})
        );
    }

    #[test]
    fn test_vault_snake_case_fields() {
        let vault: Vault = serde_json::from_value(json!({
            "id": "v1",
            "name": "Docs",
            "llm_instructions": "be brief",
            "data_title": "Rows"
        }))
        .unwrap();
        assert_eq!(vault.llm_instructions.as_deref(), Some("be brief"));
        assert_eq!(vault.data_title.as_deref(), Some("Rows"));
    }
}
