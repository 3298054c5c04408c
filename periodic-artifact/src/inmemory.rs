use crate::service::{
    ArtifactScope, ArtifactService, DeleteRequest, LoadRequest, SaveRequest, USER_SCOPE_PREFIX,
    validate_file_name,
};
use async_trait::async_trait;
use periodic_core::{Part, PeriodicError, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{PoisonError, RwLock};

const USER_SCOPED_SESSION: &str = "user";

type Versions = BTreeMap<i64, Part>;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct ArtifactKey {
    scope: ArtifactScope,
    file_name: String,
}

impl ArtifactKey {
    /// User-scoped names are stored under a shared pseudo-session.
    fn new(scope: &ArtifactScope, file_name: &str) -> Self {
        let mut scope = scope.clone();
        if file_name.starts_with(USER_SCOPE_PREFIX) {
            scope.session_id = USER_SCOPED_SESSION.to_string();
        }
        Self { scope, file_name: file_name.to_string() }
    }
}

#[derive(Default)]
pub struct InMemoryArtifactService {
    artifacts: RwLock<BTreeMap<ArtifactKey, Versions>>,
}

impl InMemoryArtifactService {
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_found(file_name: &str) -> PeriodicError {
    PeriodicError::Artifact(format!("artifact not found: {file_name}"))
}

#[async_trait]
impl ArtifactService for InMemoryArtifactService {
    async fn save(&self, req: SaveRequest) -> Result<i64> {
        validate_file_name(&req.file_name)?;
        let key = ArtifactKey::new(&req.scope, &req.file_name);

        let mut artifacts = self.artifacts.write().unwrap_or_else(PoisonError::into_inner);
        let versions = artifacts.entry(key).or_default();
        let version = versions.keys().next_back().map_or(1, |v| v + 1);
        versions.insert(version, req.part);

        tracing::debug!(file_name = %req.file_name, version, "artifact saved");
        Ok(version)
    }

    async fn load(&self, req: LoadRequest) -> Result<Part> {
        validate_file_name(&req.file_name)?;
        let key = ArtifactKey::new(&req.scope, &req.file_name);

        let artifacts = self.artifacts.read().unwrap_or_else(PoisonError::into_inner);
        let versions = artifacts.get(&key).ok_or_else(|| not_found(&req.file_name))?;
        let part = match req.version {
            Some(version) => versions.get(&version),
            None => versions.values().next_back(),
        };
        part.cloned().ok_or_else(|| not_found(&req.file_name))
    }

    async fn delete(&self, req: DeleteRequest) -> Result<()> {
        validate_file_name(&req.file_name)?;
        let key = ArtifactKey::new(&req.scope, &req.file_name);

        let mut artifacts = self.artifacts.write().unwrap_or_else(PoisonError::into_inner);
        match req.version {
            Some(version) => {
                if let Some(versions) = artifacts.get_mut(&key) {
                    versions.remove(&version);
                    if versions.is_empty() {
                        artifacts.remove(&key);
                    }
                }
            }
            None => {
                artifacts.remove(&key);
            }
        }
        Ok(())
    }

    async fn list(&self, scope: &ArtifactScope) -> Result<Vec<String>> {
        let artifacts = self.artifacts.read().unwrap_or_else(PoisonError::into_inner);
        let names: BTreeSet<String> = artifacts
            .keys()
            .filter(|k| {
                k.scope.app_name == scope.app_name
                    && k.scope.user_id == scope.user_id
                    && (k.scope.session_id == scope.session_id
                        || k.scope.session_id == USER_SCOPED_SESSION)
            })
            .map(|k| k.file_name.clone())
            .collect();
        Ok(names.into_iter().collect())
    }

    async fn versions(&self, scope: &ArtifactScope, file_name: &str) -> Result<Vec<i64>> {
        validate_file_name(file_name)?;
        let key = ArtifactKey::new(scope, file_name);

        let artifacts = self.artifacts.read().unwrap_or_else(PoisonError::into_inner);
        let versions = artifacts.get(&key).ok_or_else(|| not_found(file_name))?;
        Ok(versions.keys().copied().collect())
    }
}
