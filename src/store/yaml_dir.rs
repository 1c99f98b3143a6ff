//! Directory-of-YAML plan store.
//!
//! One document per plan at `<root>/<id>.yaml`. Writes go to a sibling
//! temporary file and are renamed into place, so readers never observe a
//! partially written plan.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::config::PlanLoader;
use crate::error::StoreError;
use crate::plan::{Plan, PlanId};

use super::{CommitRequest, PlanStore, apply_commit, apply_save, check_id, prepare_new};

/// A [`PlanStore`] keeping each plan as a YAML file in one directory.
///
/// Read-modify-write cycles are serialized within this process. Separate
/// processes sharing a directory are not coordinated.
#[derive(Debug)]
pub struct YamlDirStore {
    root: PathBuf,
    loader: PlanLoader,
    write_lock: Mutex<()>,
}

impl YamlDirStore {
    /// Opens a store rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory cannot be created.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        debug!(root = %root.display(), "opened plan directory");
        Ok(Self {
            root,
            loader: PlanLoader::with_defaults(),
            write_lock: Mutex::new(()),
        })
    }

    /// Directory holding the plan documents.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the document for `id`.
    #[must_use]
    pub fn path_for(&self, id: &PlanId) -> PathBuf {
        self.root.join(format!("{id}.yaml"))
    }

    /// Lists the ids of all stored plans, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory cannot be read.
    pub async fn list(&self) -> Result<Vec<PlanId>, StoreError> {
        let mut ids = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml")
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
            {
                ids.push(PlanId::new(stem));
            }
        }
        ids.sort();
        Ok(ids)
    }

    async fn read(&self, id: &PlanId) -> Result<Plan, StoreError> {
        check_id(id)?;
        let path = self.path_for(id);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(id.clone()));
            }
            Err(e) => return Err(e.into()),
        };

        let loaded = self
            .loader
            .parse(&content, &path)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        for warning in &loaded.warnings {
            warn!(plan_id = %id, "{warning}");
        }

        if loaded.plan.id != *id {
            return Err(StoreError::Backend(format!(
                "{} holds plan '{}'",
                path.display(),
                loaded.plan.id
            )));
        }
        Ok(loaded.plan)
    }

    async fn write(&self, plan: &Plan) -> Result<(), StoreError> {
        let path = self.path_for(&plan.id);
        let tmp = path.with_extension("yaml.tmp");
        let content = serde_yaml::to_string(plan)?;
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

#[async_trait]
impl PlanStore for YamlDirStore {
    async fn load_plan(&self, id: &PlanId) -> Result<Plan, StoreError> {
        self.read(id).await
    }

    async fn create_plan(&self, plan: Plan) -> Result<Plan, StoreError> {
        check_id(&plan.id)?;
        let _guard = self.write_lock.lock().await;
        if tokio::fs::try_exists(self.path_for(&plan.id)).await? {
            return Err(StoreError::AlreadyExists(plan.id));
        }
        let fresh = prepare_new(plan);
        self.write(&fresh).await?;
        Ok(fresh)
    }

    async fn commit_transition(&self, request: CommitRequest) -> Result<Plan, StoreError> {
        let _guard = self.write_lock.lock().await;
        let current = self.read(&request.plan_id).await?;
        let next = apply_commit(&current, &request)?;
        if next != current {
            self.write(&next).await?;
            debug!(plan_id = %request.plan_id, version = next.version, "transition stored");
        }
        Ok(next)
    }

    async fn save_plan(&self, plan: &Plan) -> Result<Plan, StoreError> {
        let _guard = self.write_lock.lock().await;
        let current = self.read(&plan.id).await?;
        let next = apply_save(&current, plan)?;
        self.write(&next).await?;
        Ok(next)
    }
}
