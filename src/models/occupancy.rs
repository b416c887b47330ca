use serde::{Deserialize, Serialize};

/// Beds currently taken, stored apart from the layout under `<username>data`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupancyCounter {
    pub current_occupancy: u32,
}

/// Result of an onboard or offboard request.
///
/// A request that would leave the counter out of range is not an error; it is
/// reported with `applied == false` and the unchanged value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupancyUpdate {
    pub occupancy: u32,
    pub applied: bool,
}

impl OccupancyUpdate {
    #[must_use]
    pub const fn applied(occupancy: u32) -> Self {
        Self {
            occupancy,
            applied: true,
        }
    }

    #[must_use]
    pub const fn unchanged(occupancy: u32) -> Self {
        Self {
            occupancy,
            applied: false,
        }
    }
}
