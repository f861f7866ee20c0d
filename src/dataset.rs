//! Program data set
//!
//! A [Dataset] is the immutable snapshot of remote rows that aggregation runs over. It is built
//! once per load by joining programs to their device category names and state codes to regions.

use crate::geography::{self, State};
use crate::models::{DeviceCategory, Program};
use crate::types::{CategoryId, Region};

use hashbrown::HashMap;

/// A program joined against the lookup tables.
#[derive(Clone, Debug, PartialEq)]
pub struct ProgramRecord {
    /// State code as stored remotely, upper-cased
    pub code: String,
    /// Known state, or `None` if the code is not a US state
    pub state: Option<&'static State>,
    /// Device category name, or `None` if the category id is missing or unknown
    pub device: Option<String>,
}

impl ProgramRecord {
    /// Region of the program's state.
    pub fn region(&self) -> Option<Region> {
        self.state.map(|state| state.region)
    }

    /// Whether the record can take part in aggregation.
    pub fn is_mapped(&self) -> bool {
        self.state.is_some() && self.device.is_some()
    }
}

/// Snapshot of US programs with resolved device names and regions.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    records: Vec<ProgramRecord>,
    device_names: Vec<String>,
    load_error: Option<String>,
}

impl Dataset {
    /// Build a data set from raw remote rows.
    ///
    /// Programs whose `state_province` is null or not exactly two characters are not US programs
    /// and are discarded. Programs with an unknown state or device category are kept as unmapped
    /// records; they never match a filter.
    ///
    /// # Arguments
    ///
    /// * `categories`: Rows of the device categories table
    /// * `programs`: Rows of the programs table
    pub fn from_rows(categories: Vec<DeviceCategory>, programs: Vec<Program>) -> Self {
        let names: HashMap<CategoryId, String> = categories
            .into_iter()
            .filter_map(|category| Some((category.id, category.name?)))
            .collect();

        let records: Vec<ProgramRecord> = programs
            .into_iter()
            .filter_map(|program| {
                let code = program.state_province?;
                if code.chars().count() != 2 {
                    return None;
                }
                let code = code.to_ascii_uppercase();
                Some(ProgramRecord {
                    state: geography::lookup(&code),
                    device: program
                        .device_category_id
                        .as_ref()
                        .and_then(|id| names.get(id))
                        .cloned(),
                    code,
                })
            })
            .collect();

        let mut device_names: Vec<String> = records
            .iter()
            .filter_map(|record| record.device.clone())
            .collect();
        device_names.sort();
        device_names.dedup();

        Dataset {
            records,
            device_names,
            load_error: None,
        }
    }

    /// An empty data set recording why loading failed.
    pub fn failed(error: String) -> Self {
        Dataset {
            load_error: Some(error),
            ..Default::default()
        }
    }

    /// US program records.
    pub fn records(&self) -> &[ProgramRecord] {
        &self.records
    }

    /// Sorted, distinct device category names used by US programs.
    pub fn device_names(&self) -> &[String] {
        &self.device_names
    }

    /// Error encountered while loading, if any.
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// Whether there are no US programs.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records that can never match a filter.
    pub fn unmapped(&self) -> usize {
        self.records
            .iter()
            .filter(|record| !record.is_mapped())
            .count()
    }
}
