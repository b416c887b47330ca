pub mod ledger;
pub use ledger::{LedgerError, RegistrationLedger, UsernameFormat};

pub mod property;
pub use property::{PropertyService, PropertySnapshot};

pub mod session_service;
pub use session_service::{
    DashboardView, FailureKind, FlowState, LoginOutcome, RegistrationReceipt, SessionError,
    SessionService,
};

pub mod session_service_impl;
pub use session_service_impl::StoreSessionService;
