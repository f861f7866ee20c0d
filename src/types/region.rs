//! US regions used for filtering
//!
//! Regions are a fixed grouping of states. The grouping itself lives in
//! [crate::geography]; this module only defines the region names.

use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// A named group of US states.
///
/// Variants are declared in alphabetical order of their display names so that the derived
/// ordering matches the order in which regions are listed to users.
#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub enum Region {
    #[serde(rename = "Mid-Atlantic")]
    #[strum(serialize = "Mid-Atlantic")]
    MidAtlantic,
    Midwest,
    Northeast,
    Southeast,
    Southwest,
    West,
}

impl Region {
    /// Every region, in display order.
    pub const ALL: [Region; 6] = [
        Region::MidAtlantic,
        Region::Midwest,
        Region::Northeast,
        Region::Southeast,
        Region::Southwest,
        Region::West,
    ];

    /// Look up a region by its display name.
    pub fn from_name(name: &str) -> Option<Region> {
        Region::ALL
            .into_iter()
            .find(|region| region.to_string() == name)
    }
}
