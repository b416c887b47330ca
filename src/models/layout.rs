use serde::{Deserialize, Serialize};

/// Physical configuration of a property, stored under the owner's username.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PgLayout {
    pub num_floors: u32,
    pub num_rooms_per_floor: u32,
    pub num_beds_per_room: u32,
    pub cost_per_bed: u64,
}

/// Figures derived from a layout on every read; never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutMetrics {
    pub number_of_rooms: u64,
    pub max_occupancy: u64,
    pub max_revenue: u64,
    pub cost_per_bed: u64,
}

impl LayoutMetrics {
    /// All zero when there is no layout yet.
    #[must_use]
    pub fn from_layout(layout: Option<&PgLayout>) -> Self {
        let Some(layout) = layout else {
            return Self::default();
        };

        let number_of_rooms =
            u64::from(layout.num_floors).saturating_mul(u64::from(layout.num_rooms_per_floor));
        let max_occupancy = number_of_rooms.saturating_mul(u64::from(layout.num_beds_per_room));

        Self {
            number_of_rooms,
            max_occupancy,
            max_revenue: max_occupancy.saturating_mul(layout.cost_per_bed),
            cost_per_bed: layout.cost_per_bed,
        }
    }

    #[must_use]
    pub fn revenue_for(&self, occupancy: u32) -> u64 {
        self.cost_per_bed.saturating_mul(u64::from(occupancy))
    }
}
