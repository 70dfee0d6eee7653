use crate::{
    domain::{Snapshot, User, UserId},
    error::{KanbanError, Result},
    storage::DEFAULT_STORAGE_KEY,
};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, path::Path};
use tokio::fs;

/// Store configuration: where the snapshot lives and who the users are
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub storage_key: String,
    pub current_user: UserId,
    pub users: Vec<User>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            current_user: UserId::from("user-1"),
            users: User::default_users(),
        }
    }
}

impl StoreConfig {
    /// Reads and validates a JSON config file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref()).await?;
        let config: StoreConfig = serde_json::from_str(&contents)
            .map_err(|e| KanbanError::ConfigError(format!("invalid config file: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.storage_key.trim().is_empty() {
            return Err(KanbanError::ConfigError(
                "storage key must not be empty".to_string(),
            ));
        }

        if self.users.is_empty() {
            return Err(KanbanError::ConfigError(
                "at least one user is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for user in &self.users {
            if !seen.insert(&user.id) {
                return Err(KanbanError::ConfigError(format!(
                    "duplicate user id: {}",
                    user.id
                )));
            }
        }

        if !seen.contains(&self.current_user) {
            return Err(KanbanError::ConfigError(format!(
                "current user {} is not a registered user",
                self.current_user
            )));
        }

        Ok(())
    }

    /// Builds the state a store starts from when nothing is persisted
    pub fn seed_snapshot(&self) -> Result<Snapshot> {
        self.validate()?;
        let current = self
            .users
            .iter()
            .find(|user| user.id == self.current_user)
            .cloned()
            .ok_or_else(|| {
                KanbanError::ConfigError(format!("unknown current user {}", self.current_user))
            })?;
        Ok(Snapshot::new(current, self.users.clone()))
    }
}
