// file: src/source/mod.rs
// description: user source abstraction and configured implementations
// reference: internal module structure

pub mod file;
pub mod user_client;

pub use file::FileUserSource;
pub use user_client::UserClient;

use crate::config::{SourceKind, UserSourceConfig};
use crate::error::{Result, SearchError};
use crate::models::UserRecord;
use serde::Deserialize;
use std::future::Future;

/// Supplies the complete, unfiltered user list for one run.
pub trait UserSource: Send + Sync {
    fn get_all_users(&self) -> impl Future<Output = Result<Vec<UserRecord>>> + Send;
}

#[derive(Deserialize)]
#[serde(untagged)]
enum UsersPayload {
    List(Vec<UserRecord>),
    Envelope { users: Vec<UserRecord> },
}

/// Accepts either a bare JSON array or a `{"users": [...]}` envelope.
pub(crate) fn parse_users(body: &str) -> Result<Vec<UserRecord>> {
    let payload: UsersPayload = serde_json::from_str(body).map_err(|e| {
        SearchError::UserSource(format!("Unexpected user payload: {}", e))
    })?;

    Ok(match payload {
        UsersPayload::List(users) => users,
        UsersPayload::Envelope { users } => users,
    })
}

/// The source selected by `users.kind`.
pub enum ConfiguredSource {
    Http(UserClient),
    File(FileUserSource),
}

impl ConfiguredSource {
    pub fn from_config(config: &UserSourceConfig) -> Result<Self> {
        match config.kind {
            SourceKind::Http => Ok(ConfiguredSource::Http(UserClient::new(config)?)),
            SourceKind::File => {
                let path = config.file_path.clone().ok_or_else(|| {
                    SearchError::Config("users.file_path is required for the file source".into())
                })?;
                Ok(ConfiguredSource::File(FileUserSource::new(path)))
            }
        }
    }

    pub fn describe(&self) -> String {
        match self {
            ConfiguredSource::Http(client) => client.users_url(),
            ConfiguredSource::File(source) => source.path().display().to_string(),
        }
    }
}

impl UserSource for ConfiguredSource {
    async fn get_all_users(&self) -> Result<Vec<UserRecord>> {
        match self {
            ConfiguredSource::Http(client) => client.get_all_users().await,
            ConfiguredSource::File(source) => source.get_all_users().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_parse_bare_array() {
        let users = parse_users(r#"[{"name":"John"},{"name":"Jane"}]"#).unwrap();
        assert_eq!(users.len(), 2);
    }

    #[test]
    fn test_parse_envelope() {
        let users = parse_users(r#"{"users":[{"name":"John"}]}"#).unwrap();
        assert_eq!(users.len(), 1);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_users(r#"{"items": 3}"#),
            Err(SearchError::UserSource(_))
        ));
    }

    #[test]
    fn test_from_config_selects_kind() {
        let mut config = Config::default_config().users;
        let source = ConfiguredSource::from_config(&config).unwrap();
        assert!(matches!(source, ConfiguredSource::Http(_)));
        assert_eq!(source.describe(), "http://localhost:8041/v1/users");

        config.kind = SourceKind::File;
        assert!(ConfiguredSource::from_config(&config).is_err());

        config.file_path = Some("users.json".into());
        let source = ConfiguredSource::from_config(&config).unwrap();
        assert!(matches!(source, ConfiguredSource::File(_)));
    }
}
