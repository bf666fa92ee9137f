//! Model catalog as reported by a vLLM `/v1/models` endpoint.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One served model. Everything besides `id` is kept opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelCatalogEntry {
    pub id: String,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

/// Body of a model-listing response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelList {
    #[serde(default)]
    pub data: Vec<ModelCatalogEntry>,
}

impl ModelList {
    /// Model identifiers in backend order.
    pub fn ids(&self) -> Vec<String> {
        self.data.iter().map(|m| m.id.clone()).collect()
    }

    /// The default model: the first entry, if any.
    pub fn first_id(&self) -> Option<&str> {
        self.data.first().map(|m| m.id.as_str())
    }
}
