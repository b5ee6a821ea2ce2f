use crate::enums::{Side, Zone};
use serde::{Deserialize, Serialize};

/// A concrete tile reference resolved by the targeting layer — a side, a
/// zone (Main/Reserve), and an index within that zone's array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileRef {
    pub side: Side,
    pub zone: Zone,
    pub index: usize,
}

impl TileRef {
    pub fn main(side: Side, index: usize) -> Self {
        Self { side, zone: Zone::Main, index }
    }

    pub fn reserve(side: Side, index: usize) -> Self {
        Self { side, zone: Zone::Reserve, index }
    }
}
