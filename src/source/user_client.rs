// file: src/source/user_client.rs
// description: http client for the user service listing endpoint

use super::{UserSource, parse_users};
use crate::config::UserSourceConfig;
use crate::error::{Result, SearchError};
use crate::models::UserRecord;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Clone)]
pub struct UserClient {
    base_url: String,
    client: Client,
}

impl UserClient {
    pub fn new(config: &UserSourceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            base_url: config.base_url.clone(),
            client,
        })
    }

    pub fn users_url(&self) -> String {
        format!("{}/v1/users", self.base_url.trim_end_matches('/'))
    }
}

impl UserSource for UserClient {
    async fn get_all_users(&self) -> Result<Vec<UserRecord>> {
        let url = self.users_url();
        debug!("Fetching users from: {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            SearchError::UserSource(format!("Failed to reach user service: {}", e))
        })?;

        if !response.status().is_success() {
            return Err(SearchError::UserSource(format!(
                "User service returned status {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        let users = parse_users(&body)?;

        info!("Fetched {} users", users.len());
        Ok(users)
    }
}
