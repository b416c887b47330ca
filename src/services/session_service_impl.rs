//! [`RecordStore`]-backed implementation of the `SessionService` trait.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::RegistrationConfig;
use crate::db::RecordStore;
use crate::models::{AccountPatch, AccountRecord, OccupancyUpdate, PgDetails, PgLayout};
use crate::services::ledger::{RegistrationLedger, UsernameFormat};
use crate::services::property::PropertyService;
use crate::services::session_service::{
    DashboardView, FlowState, LoginOutcome, RegistrationReceipt, SessionError, SessionService,
};

pub struct StoreSessionService {
    ledger: RegistrationLedger,
    property: PropertyService,
    min_password_length: usize,
}

impl StoreSessionService {
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>, config: &RegistrationConfig) -> Self {
        Self {
            ledger: RegistrationLedger::new(store.clone(), UsernameFormat::from(config)),
            property: PropertyService::new(store),
            min_password_length: config.min_password_length,
        }
    }

    #[must_use]
    pub const fn ledger(&self) -> &RegistrationLedger {
        &self.ledger
    }

    #[must_use]
    pub const fn property(&self) -> &PropertyService {
        &self.property
    }

    fn validate_new_password(&self, password: &str, confirm: &str) -> Result<(), SessionError> {
        if password != confirm {
            return Err(SessionError::PasswordMismatch);
        }

        // Counted in UTF-16 code units, the way the mobile forms measure it.
        if password.encode_utf16().count() < self.min_password_length {
            return Err(SessionError::PasswordTooShort {
                min: self.min_password_length,
            });
        }

        Ok(())
    }

    /// Property documents are keyed by the bare username, so every layout and
    /// occupancy call is gated on a ledger entry existing.
    async fn require_account(&self, username: &str) -> Result<AccountRecord, SessionError> {
        self.ledger
            .find_by_username(username)
            .await?
            .ok_or_else(|| SessionError::AccountNotFound(username.to_string()))
    }
}

#[async_trait]
impl SessionService for StoreSessionService {
    async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, SessionError> {
        let Some(record) = self.ledger.find_by_credentials(username, password).await? else {
            warn!(%username, "Login failed");
            return Err(SessionError::InvalidCredentials);
        };

        let next = FlowState::after_login(&record);
        info!(%username, ?next, "Login succeeded");

        Ok(LoginOutcome {
            username: record.username,
            next,
        })
    }

    async fn preview_username(&self) -> Result<String, SessionError> {
        Ok(self.ledger.next_generated_username().await?)
    }

    async fn register(
        &self,
        password: &str,
        confirm_password: &str,
    ) -> Result<RegistrationReceipt, SessionError> {
        self.validate_new_password(password, confirm_password)?;

        let username = self.ledger.next_generated_username().await?;
        self.ledger
            .append(AccountRecord::new(username.clone(), password))
            .await?;

        let next_username = self.ledger.next_generated_username().await?;
        info!(%username, "Registration successful");

        Ok(RegistrationReceipt {
            username,
            next_username,
        })
    }

    async fn save_details(
        &self,
        username: &str,
        details: PgDetails,
    ) -> Result<FlowState, SessionError> {
        let patch = AccountPatch::completing_details(details);

        if self
            .ledger
            .update_by_username(username, &patch)
            .await?
            .is_none()
        {
            return Err(SessionError::AccountNotFound(username.to_string()));
        }

        Ok(FlowState::Dashboard)
    }

    async fn save_layout(&self, username: &str, layout: &PgLayout) -> Result<(), SessionError> {
        self.require_account(username).await?;
        Ok(self.property.save_layout(username, layout).await?)
    }

    async fn load_dashboard(&self, username: &str) -> Result<DashboardView, SessionError> {
        let details = self.require_account(username).await?.details();
        let property = self.property.snapshot(username).await?;

        Ok(DashboardView {
            username: username.to_string(),
            details,
            property,
        })
    }

    async fn onboard(&self, username: &str) -> Result<OccupancyUpdate, SessionError> {
        self.require_account(username).await?;
        Ok(self.property.onboard(username).await?)
    }

    async fn offboard(&self, username: &str) -> Result<OccupancyUpdate, SessionError> {
        self.require_account(username).await?;
        Ok(self.property.offboard(username).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryRecordStore;
    use crate::services::session_service::FailureKind;

    fn service() -> (StoreSessionService, Arc<MemoryRecordStore>) {
        let store = Arc::new(MemoryRecordStore::new());
        let service = StoreSessionService::new(store.clone(), &RegistrationConfig::default());
        (service, store)
    }

    fn details() -> PgDetails {
        PgDetails {
            pg_name: "X".to_string(),
            pg_address: "Y".to_string(),
            pg_owner_name: "Z".to_string(),
            pg_phone_number: "1".to_string(),
        }
    }

    #[tokio::test]
    async fn register_assigns_sequential_usernames() {
        let (service, _) = service();

        assert_eq!(service.preview_username().await.unwrap(), "PG-001");

        let first = service.register("longenough1", "longenough1").await.unwrap();
        assert_eq!(first.username, "PG-001");
        assert_eq!(first.next_username, "PG-002");

        let second = service.register("longenough2", "longenough2").await.unwrap();
        assert_eq!(second.username, "PG-002");

        let record = service
            .ledger()
            .find_by_username("PG-002")
            .await
            .unwrap()
            .unwrap();
        assert!(record.first_login);
        assert_eq!(record.password, "longenough2");
    }

    #[tokio::test]
    async fn short_password_is_rejected_without_writing() {
        let (service, store) = service();

        let err = service.register("short12", "short12").await.unwrap_err();
        assert!(matches!(err, SessionError::PasswordTooShort { min: 8 }));
        assert_eq!(err.kind(), FailureKind::Validation);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn mismatch_is_rejected_before_touching_storage() {
        let (service, store) = service();
        store.set_unavailable(true);

        let err = service
            .register("longenough1", "longenough2")
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::PasswordMismatch));

        store.set_unavailable(false);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn login_routes_by_first_login_flag() {
        let (service, _) = service();
        service.register("longenough1", "longenough1").await.unwrap();

        let outcome = service.login("PG-001", "longenough1").await.unwrap();
        assert_eq!(outcome.next, FlowState::AwaitingDetails);

        let next = service.save_details("PG-001", details()).await.unwrap();
        assert_eq!(next, FlowState::Dashboard);

        let outcome = service.login("PG-001", "longenough1").await.unwrap();
        assert_eq!(outcome.next, FlowState::Dashboard);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_look_the_same() {
        let (service, store) = service();
        service.register("longenough1", "longenough1").await.unwrap();
        let before = store.raw("registrations").await;

        let wrong_password = service.login("PG-001", "nope-nope").await.unwrap_err();
        let unknown_user = service.login("PG-999", "longenough1").await.unwrap_err();

        assert!(matches!(wrong_password, SessionError::InvalidCredentials));
        assert!(matches!(unknown_user, SessionError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
        assert_eq!(store.raw("registrations").await, before);
    }

    #[tokio::test]
    async fn save_details_round_trip() {
        let (service, _) = service();
        service.register("longenough1", "longenough1").await.unwrap();
        service.register("longenough2", "longenough2").await.unwrap();

        service.save_details("PG-001", details()).await.unwrap();

        let record = service
            .ledger()
            .find_by_username("PG-001")
            .await
            .unwrap()
            .unwrap();
        assert!(!record.first_login);
        assert_eq!(record.username, "PG-001");
        assert_eq!(record.password, "longenough1");
        assert_eq!(record.details(), details());

        let untouched = service
            .ledger()
            .find_by_username("PG-002")
            .await
            .unwrap()
            .unwrap();
        assert!(untouched.first_login);
        assert!(untouched.pg_name.is_none());
    }

    #[tokio::test]
    async fn save_details_for_unknown_account() {
        let (service, _) = service();

        let err = service.save_details("PG-404", details()).await.unwrap_err();
        assert!(matches!(err, SessionError::AccountNotFound(ref u) if u == "PG-404"));
        assert_eq!(err.kind(), FailureKind::NotFound);
    }

    #[tokio::test]
    async fn dashboard_combines_details_layout_and_occupancy() {
        let (service, _) = service();
        service.register("longenough1", "longenough1").await.unwrap();
        service.save_details("PG-001", details()).await.unwrap();
        service
            .save_layout(
                "PG-001",
                &PgLayout {
                    num_floors: 1,
                    num_rooms_per_floor: 1,
                    num_beds_per_room: 2,
                    cost_per_bed: 100,
                },
            )
            .await
            .unwrap();

        service.onboard("PG-001").await.unwrap();
        service.onboard("PG-001").await.unwrap();
        let capped = service.onboard("PG-001").await.unwrap();
        assert_eq!(capped, OccupancyUpdate::unchanged(2));

        let view = service.load_dashboard("PG-001").await.unwrap();
        assert_eq!(view.details, details());
        assert_eq!(view.property.metrics.number_of_rooms, 1);
        assert_eq!(view.property.metrics.max_occupancy, 2);
        assert_eq!(view.property.metrics.max_revenue, 200);
        assert_eq!(view.property.current_occupancy, 2);
        assert_eq!(view.property.current_monthly_revenue, 200);
    }

    #[tokio::test]
    async fn password_length_counts_utf16_units() {
        let (service, _) = service();

        // Four characters outside the BMP are eight UTF-16 units.
        let emoji = "\u{1F600}\u{1F601}\u{1F602}\u{1F603}";
        let receipt = service.register(emoji, emoji).await.unwrap();
        assert_eq!(receipt.username, "PG-001");

        let err = service.register("abcdefg", "abcdefg").await.unwrap_err();
        assert!(matches!(err, SessionError::PasswordTooShort { min: 8 }));
    }

    #[tokio::test]
    async fn property_calls_require_a_registered_account() {
        let (service, store) = service();
        service.register("longenough1", "longenough1").await.unwrap();
        let layout = PgLayout {
            num_floors: 1,
            num_rooms_per_floor: 1,
            num_beds_per_room: 1,
            cost_per_bed: 1,
        };

        let err = service.save_layout("PG-404", &layout).await.unwrap_err();
        assert!(matches!(err, SessionError::AccountNotFound(ref u) if u == "PG-404"));
        assert!(matches!(
            service.onboard("PG-404").await,
            Err(SessionError::AccountNotFound(_))
        ));
        assert!(matches!(
            service.offboard("PG-404").await,
            Err(SessionError::AccountNotFound(_))
        ));
        assert!(matches!(
            service.load_dashboard("PG-404").await,
            Err(SessionError::AccountNotFound(_))
        ));

        assert!(store.raw("PG-404").await.is_none());
        assert!(store.raw("PG-404data").await.is_none());
    }

    #[tokio::test]
    async fn layout_cannot_replace_the_ledger() {
        let (service, store) = service();
        service.register("longenough1", "longenough1").await.unwrap();
        let before = store.raw("registrations").await;

        let err = service
            .save_layout(
                "registrations",
                &PgLayout {
                    num_floors: 1,
                    num_rooms_per_floor: 1,
                    num_beds_per_room: 1,
                    cost_per_bed: 1,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::NotFound);

        assert_eq!(store.raw("registrations").await, before);
        assert!(service.login("PG-001", "longenough1").await.is_ok());
    }

    #[tokio::test]
    async fn storage_failure_maps_to_storage_kind() {
        let (service, store) = service();
        store.set_unavailable(true);

        let err = service.login("PG-001", "longenough1").await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Storage);
    }
}
