//! Serialized registry shapes.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{DEFAULT_HOST, DEFAULT_PORT};

/// Whole registry document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryConfig {
    pub models_dir: String,
    #[serde(default)]
    pub models: BTreeMap<String, ModelEntry>,
    #[serde(default)]
    pub defaults: RegistryDefaults,
}

impl RegistryConfig {
    /// Empty registry rooted at `models_dir`.
    pub fn empty(models_dir: impl Into<String>) -> Self {
        Self {
            models_dir: models_dir.into(),
            models: BTreeMap::new(),
            defaults: RegistryDefaults::default(),
        }
    }
}

/// Launch defaults consumed by the external launcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryDefaults {
    pub host: String,
    pub port: u16,
    pub threads: u32,
    pub context_size: u32,
    pub gpu_layers: u32,
    pub flash_attn: bool,
}

impl Default for RegistryDefaults {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            threads: 8,
            context_size: 8192,
            gpu_layers: 99,
            flash_attn: true,
        }
    }
}

/// One registered model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelEntry {
    /// GGUF path, absolute or relative to `models_dir`.
    pub path: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu_layers: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    /// Fields written by other tools are preserved on rewrite.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Arguments for [`super::ModelRegistry::add`].
#[derive(Debug, Clone, Default)]
pub struct NewModelEntry {
    pub name: String,
    pub path: String,
    pub description: Option<String>,
    pub context_size: Option<u32>,
    pub gpu_layers: Option<u32>,
    pub aliases: Vec<String>,
}

/// A registry row as shown by `list`.
#[derive(Debug, Clone, PartialEq)]
pub struct ListedModel {
    pub name: String,
    pub entry: ModelEntry,
    /// `path` resolved against `models_dir`.
    pub resolved_path: PathBuf,
    /// Whether `resolved_path` exists on disk.
    pub exists: bool,
}

/// Result of a name-or-alias lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedModel {
    #[serde(rename = "_name")]
    pub name: String,
    #[serde(flatten)]
    pub entry: ModelEntry,
}
