use std::sync::Arc;

use crate::config::Config;
use crate::db::{RecordStore, Store};
use crate::services::{SessionService, StoreSessionService};

/// Everything a shell needs to drive the core: the config it was built from and
/// the session service wired to a record store.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub records: Arc<dyn RecordStore>,

    pub session: Arc<dyn SessionService>,
}

impl SharedState {
    /// Opens the SQLite store named in the config.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Ok(Self::with_record_store(config, Arc::new(store)))
    }

    /// Wires the services to an already constructed store.
    #[must_use]
    pub fn with_record_store(config: Config, records: Arc<dyn RecordStore>) -> Self {
        let session: Arc<dyn SessionService> = Arc::new(StoreSessionService::new(
            records.clone(),
            &config.registration,
        ));

        Self {
            config: Arc::new(config),
            records,
            session,
        }
    }

    #[must_use]
    pub fn session(&self) -> &dyn SessionService {
        self.session.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryRecordStore;

    #[tokio::test]
    async fn registration_config_flows_into_session() {
        let mut config = Config::default();
        config.registration.username_prefix = "HOSTEL".to_string();
        config.registration.username_digits = 5;

        let state = SharedState::with_record_store(config, Arc::new(MemoryRecordStore::new()));

        assert_eq!(
            state.session().preview_username().await.unwrap(),
            "HOSTEL-00001"
        );
    }
}
