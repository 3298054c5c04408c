use crate::service::{ArtifactScope, ArtifactService, LoadRequest, SaveRequest};
use async_trait::async_trait;
use periodic_core::{Artifacts, Part, Result};
use std::sync::Arc;

/// [`Artifacts`] bound to one session of an [`ArtifactService`].
pub struct ScopedArtifacts {
    service: Arc<dyn ArtifactService>,
    scope: ArtifactScope,
}

impl ScopedArtifacts {
    pub fn new(service: Arc<dyn ArtifactService>, scope: ArtifactScope) -> Self {
        Self { service, scope }
    }

    pub fn scope(&self) -> &ArtifactScope {
        &self.scope
    }
}

#[async_trait]
impl Artifacts for ScopedArtifacts {
    async fn save(&self, name: &str, data: &Part) -> Result<i64> {
        self.service
            .save(SaveRequest { scope: self.scope.clone(), file_name: name.to_string(), part: data.clone() })
            .await
    }

    async fn load(&self, name: &str) -> Result<Part> {
        self.service
            .load(LoadRequest { scope: self.scope.clone(), file_name: name.to_string(), version: None })
            .await
    }

    async fn list(&self) -> Result<Vec<String>> {
        self.service.list(&self.scope).await
    }
}
