// file: src/source/file.rs
// description: user source backed by a local json dump

use super::{UserSource, parse_users};
use crate::error::{Result, SearchError};
use crate::models::UserRecord;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone)]
pub struct FileUserSource {
    path: PathBuf,
}

impl FileUserSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl UserSource for FileUserSource {
    async fn get_all_users(&self) -> Result<Vec<UserRecord>> {
        let body = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            SearchError::UserSource(format!("Cannot read {}: {}", self.path.display(), e))
        })?;

        let users = parse_users(&body)?;
        info!("Loaded {} users from {}", users.len(), self.path.display());
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_reads_users_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("users.json");
        fs::write(
            &path,
            r#"[{"name":"John","surname":"Doe"},{"name":"Jane","surname":"Roe"}]"#,
        )
        .unwrap();

        let users = FileUserSource::new(&path).get_all_users().await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(
            users[1].get("surname").and_then(|v| v.as_str()),
            Some("Roe")
        );
    }

    #[tokio::test]
    async fn test_missing_file_is_source_error() {
        let temp = TempDir::new().unwrap();
        let source = FileUserSource::new(temp.path().join("absent.json"));
        assert!(matches!(
            source.get_all_users().await,
            Err(SearchError::UserSource(_))
        ));
    }
}
