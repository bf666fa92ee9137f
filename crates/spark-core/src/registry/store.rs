//! File-backed registry operations.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use super::error::RegistryError;
use super::types::{ListedModel, ModelEntry, NewModelEntry, RegistryConfig, ResolvedModel};
use crate::paths::default_models_dir;

/// Handle on a registry file. Every operation re-reads the file.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    path: PathBuf,
}

impl ModelRegistry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the registry, or the default empty registry if the file is absent.
    pub fn load(&self) -> Result<RegistryConfig, RegistryError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let models_dir = default_models_dir()?;
                return Ok(RegistryConfig::empty(models_dir.to_string_lossy()));
            }
            Err(source) => {
                return Err(RegistryError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        serde_json::from_str(&content).map_err(|source| RegistryError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Save atomically: write a temp file next to the target, then rename.
    pub fn save(&self, config: &RegistryConfig) -> Result<(), RegistryError> {
        let io_err = |source| RegistryError::Io {
            path: self.path.clone(),
            source,
        };

        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir).map_err(io_err)?;

        let mut json = serde_json::to_string_pretty(config).map_err(|source| {
            RegistryError::Parse {
                path: self.path.clone(),
                source,
            }
        })?;
        json.push('\n');

        // Dropping an unpersisted temp file removes it.
        let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
        tmp.write_all(json.as_bytes()).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&self.path).map_err(|e| io_err(e.error))?;

        debug!(path = %self.path.display(), "Saved model registry");
        Ok(())
    }

    /// Add or replace a model.
    ///
    /// When replacing an existing entry without supplying aliases, the
    /// existing aliases are kept.
    pub fn add(&self, new: NewModelEntry) -> Result<ModelEntry, RegistryError> {
        let mut config = self.load()?;

        let mut aliases = new.aliases;
        if aliases.is_empty()
            && let Some(existing) = config.models.get(&new.name)
        {
            aliases.clone_from(&existing.aliases);
        }

        let entry = ModelEntry {
            path: new.path,
            description: new
                .description
                .unwrap_or_else(|| format!("Model: {}", new.name)),
            context_size: new.context_size,
            gpu_layers: new.gpu_layers,
            aliases,
            extra: serde_json::Map::new(),
        };

        config.models.insert(new.name, entry.clone());
        self.save(&config)?;
        Ok(entry)
    }

    /// Remove a model by exact name.
    pub fn remove(&self, name: &str) -> Result<ModelEntry, RegistryError> {
        let mut config = self.load()?;
        let removed = config
            .models
            .remove(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        self.save(&config)?;
        Ok(removed)
    }

    /// All models sorted by name, with paths resolved against `models_dir`.
    pub fn list(&self) -> Result<Vec<ListedModel>, RegistryError> {
        let config = self.load()?;
        let models_dir = PathBuf::from(&config.models_dir);

        Ok(config
            .models
            .into_iter()
            .map(|(name, entry)| {
                let resolved_path = resolve_model_path(&models_dir, &entry.path);
                let exists = resolved_path.exists();
                ListedModel {
                    name,
                    entry,
                    resolved_path,
                    exists,
                }
            })
            .collect())
    }

    /// Look up by exact name first, then by alias.
    pub fn get(&self, name_or_alias: &str) -> Result<ResolvedModel, RegistryError> {
        let config = self.load()?;

        if let Some(entry) = config.models.get(name_or_alias) {
            return Ok(ResolvedModel {
                name: name_or_alias.to_string(),
                entry: entry.clone(),
            });
        }

        config
            .models
            .into_iter()
            .find(|(_, entry)| entry.aliases.iter().any(|a| a == name_or_alias))
            .map(|(name, entry)| ResolvedModel { name, entry })
            .ok_or_else(|| RegistryError::NotFound(name_or_alias.to_string()))
    }
}

fn resolve_model_path(models_dir: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        models_dir.join(path)
    }
}
