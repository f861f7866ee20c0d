//! Constant geography tables
//!
//! Every state (plus the District of Columbia) belongs to exactly one [Region] and has a fixed
//! position on the tile-grid map rendered by [crate::render].

use crate::types::Region;

/// A US state as drawn on the map.
#[derive(Debug, PartialEq, Eq)]
pub struct State {
    /// Two letter postal code
    pub code: &'static str,
    /// Display name
    pub name: &'static str,
    /// Region the state belongs to
    pub region: Region,
    /// Tile grid row, counted from the top
    pub row: u32,
    /// Tile grid column, counted from the left
    pub col: u32,
}

const fn state(code: &'static str, name: &'static str, region: Region, row: u32, col: u32) -> State {
    State {
        code,
        name,
        region,
        row,
        col,
    }
}

/// Number of rows in the tile grid.
pub const GRID_ROWS: u32 = 8;
/// Number of columns in the tile grid.
pub const GRID_COLS: u32 = 12;

/// All states, ordered by postal code.
pub static STATES: [State; 51] = [
    state("AK", "Alaska", Region::West, 0, 0),
    state("AL", "Alabama", Region::Southeast, 6, 7),
    state("AR", "Arkansas", Region::Southeast, 5, 5),
    state("AZ", "Arizona", Region::Southwest, 5, 2),
    state("CA", "California", Region::West, 4, 1),
    state("CO", "Colorado", Region::West, 4, 3),
    state("CT", "Connecticut", Region::Northeast, 3, 10),
    state("DC", "District of Columbia", Region::MidAtlantic, 5, 9),
    state("DE", "Delaware", Region::MidAtlantic, 4, 10),
    state("FL", "Florida", Region::Southeast, 7, 9),
    state("GA", "Georgia", Region::Southeast, 6, 8),
    state("HI", "Hawaii", Region::West, 7, 0),
    state("IA", "Iowa", Region::Midwest, 3, 5),
    state("ID", "Idaho", Region::West, 2, 2),
    state("IL", "Illinois", Region::Midwest, 2, 6),
    state("IN", "Indiana", Region::Midwest, 3, 6),
    state("KS", "Kansas", Region::Midwest, 5, 4),
    state("KY", "Kentucky", Region::Southeast, 4, 6),
    state("LA", "Louisiana", Region::Southeast, 6, 5),
    state("MA", "Massachusetts", Region::Northeast, 2, 10),
    state("MD", "Maryland", Region::MidAtlantic, 4, 9),
    state("ME", "Maine", Region::Northeast, 0, 11),
    state("MI", "Michigan", Region::Midwest, 2, 7),
    state("MN", "Minnesota", Region::Midwest, 2, 5),
    state("MO", "Missouri", Region::Midwest, 4, 5),
    state("MS", "Mississippi", Region::Southeast, 6, 6),
    state("MT", "Montana", Region::West, 2, 3),
    state("NC", "North Carolina", Region::Southeast, 5, 7),
    state("ND", "North Dakota", Region::Midwest, 2, 4),
    state("NE", "Nebraska", Region::Midwest, 4, 4),
    state("NH", "New Hampshire", Region::Northeast, 1, 11),
    state("NJ", "New Jersey", Region::MidAtlantic, 3, 9),
    state("NM", "New Mexico", Region::Southwest, 5, 3),
    state("NV", "Nevada", Region::West, 3, 2),
    state("NY", "New York", Region::MidAtlantic, 2, 9),
    state("OH", "Ohio", Region::Midwest, 3, 7),
    state("OK", "Oklahoma", Region::Southwest, 6, 4),
    state("OR", "Oregon", Region::West, 3, 1),
    state("PA", "Pennsylvania", Region::MidAtlantic, 3, 8),
    state("RI", "Rhode Island", Region::Northeast, 3, 11),
    state("SC", "South Carolina", Region::Southeast, 5, 8),
    state("SD", "South Dakota", Region::Midwest, 3, 4),
    state("TN", "Tennessee", Region::Southeast, 5, 6),
    state("TX", "Texas", Region::Southwest, 7, 4),
    state("UT", "Utah", Region::West, 4, 2),
    state("VA", "Virginia", Region::Southeast, 4, 8),
    state("VT", "Vermont", Region::Northeast, 1, 10),
    state("WA", "Washington", Region::West, 2, 1),
    state("WI", "Wisconsin", Region::Midwest, 1, 6),
    state("WV", "West Virginia", Region::MidAtlantic, 4, 7),
    state("WY", "Wyoming", Region::West, 3, 3),
];

/// Look up a state by postal code.
///
/// The code is matched case-insensitively after trimming whitespace.
pub fn lookup(code: &str) -> Option<&'static State> {
    let code = code.trim();
    if code.len() != 2 {
        return None;
    }
    let code = code.to_ascii_uppercase();
    STATES
        .binary_search_by(|state| state.code.cmp(code.as_str()))
        .ok()
        .map(|index| &STATES[index])
}

/// Iterate over the states of a region.
pub fn states_in(region: Region) -> impl Iterator<Item = &'static State> {
    STATES.iter().filter(move |state| state.region == region)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;

    #[test]
    fn states_sorted_by_code() {
        assert!(STATES.windows(2).all(|pair| pair[0].code < pair[1].code));
    }

    #[test]
    fn fifty_states_and_dc() {
        assert_eq!(51, STATES.len());
        assert!(lookup("DC").is_some());
    }

    #[test]
    fn regions_partition_states() {
        // Each state appears in exactly one region, and every region has at least one state.
        let mut seen = HashSet::new();
        for region in Region::ALL {
            let members: Vec<_> = states_in(region).collect();
            assert!(!members.is_empty(), "{region} has no states");
            for state in members {
                assert!(seen.insert(state.code), "{} in two regions", state.code);
            }
        }
        assert_eq!(STATES.len(), seen.len());
    }

    #[test]
    fn region_sizes() {
        let count = |region| states_in(region).count();
        assert_eq!(7, count(Region::MidAtlantic));
        assert_eq!(12, count(Region::Midwest));
        assert_eq!(6, count(Region::Northeast));
        assert_eq!(11, count(Region::Southeast));
        assert_eq!(4, count(Region::Southwest));
        assert_eq!(11, count(Region::West));
    }

    #[test]
    fn tiles_do_not_overlap() {
        let mut tiles = HashSet::new();
        for state in STATES.iter() {
            assert!(state.row < GRID_ROWS && state.col < GRID_COLS, "{}", state.code);
            assert!(tiles.insert((state.row, state.col)), "{} overlaps", state.code);
        }
    }

    #[test]
    fn lookup_normalises_code() {
        assert_eq!(Some("CA"), lookup("ca").map(|s| s.code));
        assert_eq!(Some("TX"), lookup(" TX ").map(|s| s.code));
        assert_eq!(None, lookup("ON"));
        assert_eq!(None, lookup("PR"));
        assert_eq!(None, lookup("CAL"));
        assert_eq!(None, lookup(""));
    }
}
