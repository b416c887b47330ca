//! End-to-end tests for the register -> login -> details -> dashboard flow on
//! a SQLite store.

use digipg::SharedState;
use digipg::config::Config;
use digipg::db::RecordStore;
use digipg::models::{OccupancyUpdate, PgDetails, PgLayout};
use digipg::services::{FailureKind, FlowState, SessionError};

async fn spawn_state() -> SharedState {
    let db_path =
        std::env::temp_dir().join(format!("digipg-flow-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());

    SharedState::new(config)
        .await
        .expect("failed to create shared state")
}

fn sample_details() -> PgDetails {
    PgDetails {
        pg_name: "Green Nest".to_string(),
        pg_address: "12 Lake Road".to_string(),
        pg_owner_name: "R. Iyer".to_string(),
        pg_phone_number: "9876543210".to_string(),
    }
}

#[tokio::test]
async fn test_full_owner_flow() {
    let state = spawn_state().await;
    let session = state.session();

    assert_eq!(session.preview_username().await.unwrap(), "PG-001");

    let receipt = session.register("longenough1", "longenough1").await.unwrap();
    assert_eq!(receipt.username, "PG-001");
    assert_eq!(receipt.next_username, "PG-002");

    let outcome = session.login("PG-001", "longenough1").await.unwrap();
    assert_eq!(outcome.next, FlowState::AwaitingDetails);

    let next = session
        .save_details("PG-001", sample_details())
        .await
        .unwrap();
    assert_eq!(next, FlowState::Dashboard);

    let outcome = session.login("PG-001", "longenough1").await.unwrap();
    assert_eq!(outcome.next, FlowState::Dashboard);

    // First visit creates the counter at zero.
    let view = session.load_dashboard("PG-001").await.unwrap();
    assert_eq!(view.details, sample_details());
    assert_eq!(view.property.current_occupancy, 0);
    assert_eq!(view.property.metrics.max_occupancy, 0);

    session
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

    assert_eq!(
        session.onboard("PG-001").await.unwrap(),
        OccupancyUpdate::applied(1)
    );
    assert_eq!(
        session.onboard("PG-001").await.unwrap(),
        OccupancyUpdate::applied(2)
    );
    assert_eq!(
        session.onboard("PG-001").await.unwrap(),
        OccupancyUpdate::unchanged(2)
    );

    let view = session.load_dashboard("PG-001").await.unwrap();
    assert_eq!(view.property.metrics.max_revenue, 200);
    assert_eq!(view.property.current_monthly_revenue, 200);

    for expected in [1, 0] {
        assert_eq!(
            session.offboard("PG-001").await.unwrap(),
            OccupancyUpdate::applied(expected)
        );
    }
    assert_eq!(
        session.offboard("PG-001").await.unwrap(),
        OccupancyUpdate::unchanged(0)
    );
}

#[tokio::test]
async fn test_rejected_registrations_leave_ledger_empty() {
    let state = spawn_state().await;
    let session = state.session();

    let err = session.register("short12", "short12").await.unwrap_err();
    assert!(matches!(err, SessionError::PasswordTooShort { min: 8 }));

    let err = session
        .register("longenough1", "longenough2")
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::PasswordMismatch));
    assert_eq!(err.kind(), FailureKind::Validation);

    assert!(state.records.get("registrations").await.unwrap().is_none());
    assert_eq!(session.preview_username().await.unwrap(), "PG-001");
}

#[tokio::test]
async fn test_wrong_password_is_invalid_credentials() {
    let state = spawn_state().await;
    let session = state.session();
    session.register("longenough1", "longenough1").await.unwrap();

    let before = state.records.get("registrations").await.unwrap();

    let err = session.login("PG-001", "longenough2").await.unwrap_err();
    assert!(matches!(err, SessionError::InvalidCredentials));
    assert_eq!(err.kind(), FailureKind::NotFound);

    assert_eq!(state.records.get("registrations").await.unwrap(), before);
}

#[tokio::test]
async fn test_ledger_keeps_camel_case_layout_on_disk() {
    let state = spawn_state().await;
    let session = state.session();
    session.register("longenough1", "longenough1").await.unwrap();
    session
        .save_details("PG-001", sample_details())
        .await
        .unwrap();

    let ledger = state
        .records
        .get("registrations")
        .await
        .unwrap()
        .expect("ledger written");

    assert_eq!(ledger[0]["username"], "PG-001");
    assert_eq!(ledger[0]["firstLogin"], false);
    assert_eq!(ledger[0]["pgName"], "Green Nest");
    assert_eq!(ledger[0]["pgPhoneNumber"], "9876543210");
}
