//! Models API.

use crate::call::api_call;
use crate::client::GptzatorClient;
use crate::error::Result;
use crate::query::Query;
use crate::types::{Collection, EmbeddingModel, LlmModel, Model};

/// Page size for model listings.
const MODELS_PER_PAGE: u32 = 20;

/// Chat, step and embedding models.
pub struct ModelsApi {
    client: GptzatorClient,
}

impl ModelsApi {
    pub(crate) fn new(client: GptzatorClient) -> Self {
        Self { client }
    }

    /// All chat models.
    pub async fn list(&self) -> Result<Vec<Model>> {
        let q = Query::new().param("limit", MODELS_PER_PAGE);
        api_call("ModelsApi.list", self.docs("models", q)).await
    }

    /// Chat models currently enabled.
    pub async fn list_active(&self) -> Result<Vec<Model>> {
        let q = Query::new()
            .param("limit", MODELS_PER_PAGE)
            .where_equals("active", true);
        api_call("ModelsApi.list_active", self.docs("models", q)).await
    }

    pub async fn llm_models(&self) -> Result<Vec<LlmModel>> {
        let q = Query::new().param("limit", MODELS_PER_PAGE);
        api_call("ModelsApi.llm_models", self.docs("llm_models", q)).await
    }

    pub async fn embedding_models(&self) -> Result<Vec<EmbeddingModel>> {
        api_call(
            "ModelsApi.embedding_models",
            self.docs("embedding_models", Query::new()),
        )
        .await
    }

    async fn docs<T: serde::de::DeserializeOwned>(&self, path: &str, query: Query) -> Result<Vec<T>> {
        let page: Collection<T> = self.client.get_with_query(path, query).await?;
        Ok(page.docs)
    }
}
