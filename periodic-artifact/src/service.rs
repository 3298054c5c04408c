use async_trait::async_trait;
use periodic_core::{Part, PeriodicError, Result};

/// Prefix for artifacts shared across a user's sessions.
pub const USER_SCOPE_PREFIX: &str = "user:";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtifactScope {
    pub app_name: String,
    pub user_id: String,
    pub session_id: String,
}

impl ArtifactScope {
    pub fn new(
        app_name: impl Into<String>,
        user_id: impl Into<String>,
        session_id: impl Into<String>,
    ) -> Self {
        Self { app_name: app_name.into(), user_id: user_id.into(), session_id: session_id.into() }
    }
}

#[derive(Debug, Clone)]
pub struct SaveRequest {
    pub scope: ArtifactScope,
    pub file_name: String,
    pub part: Part,
}

#[derive(Debug, Clone)]
pub struct LoadRequest {
    pub scope: ArtifactScope,
    pub file_name: String,
    /// Latest when absent.
    pub version: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct DeleteRequest {
    pub scope: ArtifactScope,
    pub file_name: String,
    /// All versions when absent.
    pub version: Option<i64>,
}

#[async_trait]
pub trait ArtifactService: Send + Sync {
    /// Stores a new version and returns its number. Versions start at 1.
    async fn save(&self, req: SaveRequest) -> Result<i64>;
    async fn load(&self, req: LoadRequest) -> Result<Part>;
    async fn delete(&self, req: DeleteRequest) -> Result<()>;
    /// Sorted file names visible from `scope`, including user-scoped ones.
    async fn list(&self, scope: &ArtifactScope) -> Result<Vec<String>>;
    /// Ascending version numbers of one artifact.
    async fn versions(&self, scope: &ArtifactScope, file_name: &str) -> Result<Vec<i64>>;
}

/// Artifact names are logical keys; anything path-like is rejected.
pub fn validate_file_name(file_name: &str) -> Result<()> {
    if file_name.is_empty() {
        return Err(PeriodicError::Artifact("invalid artifact file name: empty name".to_string()));
    }
    if file_name.contains(['/', '\\']) || file_name.contains("..") {
        return Err(PeriodicError::Artifact(format!(
            "invalid artifact file name '{file_name}': path separators and traversal patterns are not allowed"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_file_name() {
        assert!(validate_file_name("element_info_H.json").is_ok());
        assert!(validate_file_name("element_info_氢.json").is_ok());
        assert!(validate_file_name("user:notes.txt").is_ok());
        assert!(validate_file_name("").is_err());
        assert!(validate_file_name("a/b.json").is_err());
        assert!(validate_file_name("a\\b.json").is_err());
        assert!(validate_file_name("..").is_err());
        assert!(validate_file_name("x..json").is_err());
    }
}
