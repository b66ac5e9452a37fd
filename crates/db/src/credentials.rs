//! Persisted API credentials.
//!
//! One `CredentialStore` is created at startup and cloned into every consumer.
//! Writes go to the settings table first, then to the shared in-memory copy,
//! so a successful `set` is visible to the next `get` from any clone.

use std::sync::Arc;

use moviematch_core::types::{CredentialKind, Credentials};
use sqlx::SqlitePool;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::DbError;
use crate::repo::settings;

#[derive(Clone)]
pub struct CredentialStore {
    pool: SqlitePool,
    current: Arc<RwLock<Credentials>>,
}

impl CredentialStore {
    /// Load persisted keys, falling back to `defaults` for any key that is
    /// missing or stored as an empty string.
    pub async fn load(pool: SqlitePool, defaults: Credentials) -> Result<Self, DbError> {
        let kinds = [CredentialKind::Analysis, CredentialKind::Metadata];
        let saved = settings::get_many(&pool, &kinds.map(CredentialKind::setting_key)).await?;

        let mut creds = defaults;
        for kind in kinds {
            let value = saved
                .iter()
                .find(|(key, _)| key == kind.setting_key())
                .map(|(_, value)| value.clone());
            match value {
                Some(saved) if !saved.is_empty() => {
                    debug!(kind = %kind, "loaded persisted credential");
                    creds.set(kind, saved);
                }
                _ => debug!(kind = %kind, "no persisted credential, using default"),
            }
        }

        info!(
            analysis_key_set = creds.is_set(CredentialKind::Analysis),
            metadata_key_set = creds.is_set(CredentialKind::Metadata),
            "credentials loaded"
        );

        Ok(Self {
            pool,
            current: Arc::new(RwLock::new(creds)),
        })
    }

    /// Snapshot of the current keys.
    pub async fn get(&self) -> Credentials {
        self.current.read().await.clone()
    }

    /// Persist a new value for one key. No format validation is done.
    pub async fn set(&self, kind: CredentialKind, value: &str) -> Result<(), DbError> {
        let mut guard = self.current.write().await;
        settings::set(&self.pool, kind.setting_key(), value).await?;
        guard.set(kind, value.to_string());
        info!(kind = %kind, "credential updated");
        Ok(())
    }

    /// Persist both keys atomically.
    pub async fn set_both(&self, analysis_key: &str, metadata_key: &str) -> Result<(), DbError> {
        let mut guard = self.current.write().await;
        settings::set_many(
            &self.pool,
            &[
                (CredentialKind::Analysis.setting_key(), analysis_key),
                (CredentialKind::Metadata.setting_key(), metadata_key),
            ],
        )
        .await?;
        *guard = Credentials::new(analysis_key, metadata_key);
        info!("credentials updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn pool() -> SqlitePool {
        let pool = crate::connect(":memory:").await.unwrap();
        crate::migrate::run(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn falls_back_to_defaults_when_nothing_persisted() {
        let store = CredentialStore::load(pool().await, Credentials::new("g-default", "o-default"))
            .await
            .unwrap();
        assert_eq!(store.get().await, Credentials::new("g-default", "o-default"));
    }

    #[tokio::test]
    async fn set_is_visible_to_clones_and_persisted() {
        let pool = pool().await;
        let store = CredentialStore::load(pool.clone(), Credentials::default())
            .await
            .unwrap();
        let other = store.clone();

        store.set(CredentialKind::Metadata, "o-new").await.unwrap();

        assert_eq!(other.get().await.metadata_key, "o-new");
        assert_eq!(
            settings::get(&pool, "metadata_api_key").await.unwrap().as_deref(),
            Some("o-new")
        );
    }

    #[tokio::test]
    async fn reload_prefers_persisted_values() {
        let pool = pool().await;
        let store = CredentialStore::load(pool.clone(), Credentials::new("g-default", "o-default"))
            .await
            .unwrap();
        store.set(CredentialKind::Analysis, "g-saved").await.unwrap();

        let reloaded = CredentialStore::load(pool, Credentials::new("g-default", "o-default"))
            .await
            .unwrap();
        let creds = reloaded.get().await;
        assert_eq!(creds.analysis_key, "g-saved");
        assert_eq!(creds.metadata_key, "o-default");
    }

    #[tokio::test]
    async fn empty_persisted_value_uses_default_on_reload() {
        let pool = pool().await;
        let store = CredentialStore::load(pool.clone(), Credentials::new("g-default", ""))
            .await
            .unwrap();
        store.set(CredentialKind::Analysis, "").await.unwrap();
        assert_eq!(store.get().await.analysis_key, "");

        let reloaded = CredentialStore::load(pool, Credentials::new("g-default", ""))
            .await
            .unwrap();
        assert_eq!(reloaded.get().await.analysis_key, "g-default");
    }

    #[tokio::test]
    async fn load_reads_both_persisted_keys() {
        let pool = pool().await;
        settings::set_many(
            &pool,
            &[("analysis_api_key", "g-saved"), ("metadata_api_key", "o-saved")],
        )
        .await
        .unwrap();

        let store = CredentialStore::load(pool, Credentials::new("g-default", "o-default"))
            .await
            .unwrap();
        assert_eq!(store.get().await, Credentials::new("g-saved", "o-saved"));
    }

    #[tokio::test]
    async fn set_both_replaces_both_keys() {
        let store = CredentialStore::load(pool().await, Credentials::default())
            .await
            .unwrap();
        store.set_both("g", "o").await.unwrap();
        let creds = store.get().await;
        assert!(creds.is_complete());
        assert_eq!(creds, Credentials::new("g", "o"));
    }
}
