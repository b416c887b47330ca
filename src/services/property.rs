//! Layout and occupancy documents for one property.
//!
//! The layout lives under the owner's username and the occupancy counter under
//! `<username>data`. Onboard and offboard rewrite the counter only.
//!
//! Each onboard/offboard is a read followed by a write with nothing held in
//! between. Two callers working on the same username can interleave, and the
//! later write wins.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::constants::keys;
use crate::db::{RecordStore, StoreError, load_document, save_document};
use crate::models::{LayoutMetrics, OccupancyCounter, OccupancyUpdate, PgLayout};

/// What the dashboard shows for a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySnapshot {
    pub layout: Option<PgLayout>,
    pub metrics: LayoutMetrics,
    pub current_occupancy: u32,
    pub current_monthly_revenue: u64,
}

pub struct PropertyService {
    store: Arc<dyn RecordStore>,
}

impl PropertyService {
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn load_layout(&self, username: &str) -> Result<Option<PgLayout>, StoreError> {
        load_document(self.store.as_ref(), &keys::layout(username)).await
    }

    /// Replaces the layout. The occupancy counter is left alone even if it now
    /// exceeds the new capacity; only onboarding checks the cap.
    pub async fn save_layout(&self, username: &str, layout: &PgLayout) -> Result<(), StoreError> {
        save_document(self.store.as_ref(), &keys::layout(username), layout).await?;
        info!(
            %username,
            floors = layout.num_floors,
            rooms_per_floor = layout.num_rooms_per_floor,
            beds_per_room = layout.num_beds_per_room,
            "Layout saved"
        );
        Ok(())
    }

    /// Reads the occupancy counter, creating it at zero on first access.
    pub async fn load_occupancy(&self, username: &str) -> Result<OccupancyCounter, StoreError> {
        let key = keys::occupancy(username);

        if let Some(counter) = load_document(self.store.as_ref(), &key).await? {
            return Ok(counter);
        }

        let counter = OccupancyCounter::default();
        save_document(self.store.as_ref(), &key, &counter).await?;
        debug!(%username, "Initialized occupancy counter");
        Ok(counter)
    }

    async fn write_occupancy(&self, username: &str, occupancy: u32) -> Result<(), StoreError> {
        let counter = OccupancyCounter {
            current_occupancy: occupancy,
        };
        save_document(self.store.as_ref(), &keys::occupancy(username), &counter).await
    }

    /// Takes one more bed if the layout has room for it.
    pub async fn onboard(&self, username: &str) -> Result<OccupancyUpdate, StoreError> {
        let layout = self.load_layout(username).await?;
        let max_occupancy = LayoutMetrics::from_layout(layout.as_ref()).max_occupancy;
        let current = self.load_occupancy(username).await?.current_occupancy;

        if u64::from(current) + 1 > max_occupancy {
            debug!(%username, current, max_occupancy, "Onboard rejected, property full");
            return Ok(OccupancyUpdate::unchanged(current));
        }

        let Some(next) = current.checked_add(1) else {
            return Ok(OccupancyUpdate::unchanged(current));
        };

        self.write_occupancy(username, next).await?;
        info!(%username, occupancy = next, "Guest onboarded");
        Ok(OccupancyUpdate::applied(next))
    }

    /// Frees one bed; does nothing at zero.
    pub async fn offboard(&self, username: &str) -> Result<OccupancyUpdate, StoreError> {
        let current = self.load_occupancy(username).await?.current_occupancy;

        if current == 0 {
            debug!(%username, "Offboard rejected, property empty");
            return Ok(OccupancyUpdate::unchanged(current));
        }

        let next = current - 1;
        self.write_occupancy(username, next).await?;
        info!(%username, occupancy = next, "Guest offboarded");
        Ok(OccupancyUpdate::applied(next))
    }

    pub async fn snapshot(&self, username: &str) -> Result<PropertySnapshot, StoreError> {
        let layout = self.load_layout(username).await?;
        let metrics = LayoutMetrics::from_layout(layout.as_ref());
        let current_occupancy = self.load_occupancy(username).await?.current_occupancy;

        Ok(PropertySnapshot {
            layout,
            metrics,
            current_occupancy,
            current_monthly_revenue: metrics.revenue_for(current_occupancy),
        })
    }
}
