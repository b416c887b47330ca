pub mod account;
pub mod layout;
pub mod occupancy;

pub use account::{AccountPatch, AccountRecord, PgDetails};
pub use layout::{LayoutMetrics, PgLayout};
pub use occupancy::{OccupancyCounter, OccupancyUpdate};
