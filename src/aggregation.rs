//! Program count aggregation
//!
//! [aggregate] is a pure function of a [Dataset] and a set of [Filters]. It is cheap enough to
//! run on every request, so nothing here is cached.

use crate::dataset::{Dataset, ProgramRecord};
use crate::geography::STATES;
use crate::models::FilterRequest;
use crate::types::Region;

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Resolved filter selection.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Filters {
    /// Device category names to include
    pub devices: BTreeSet<String>,
    /// Regions to include
    pub regions: BTreeSet<Region>,
}

impl Filters {
    /// Select every device category in the data set and every region.
    pub fn all(dataset: &Dataset) -> Self {
        Filters {
            devices: dataset.device_names().iter().cloned().collect(),
            regions: Region::ALL.into_iter().collect(),
        }
    }

    /// Resolve a client request against a data set.
    ///
    /// Absent filters select everything.
    pub fn resolve(request: &FilterRequest, dataset: &Dataset) -> Self {
        let devices = match &request.devices {
            Some(devices) => devices.iter().cloned().collect(),
            None => dataset.device_names().iter().cloned().collect(),
        };
        let regions = match &request.regions {
            Some(regions) => regions.iter().copied().collect(),
            None => Region::ALL.into_iter().collect(),
        };
        Filters { devices, regions }
    }

    /// Whether a record passes both filters.
    ///
    /// Records with an unknown device category or state never match.
    pub fn matches(&self, record: &ProgramRecord) -> bool {
        let device_selected = record
            .device
            .as_ref()
            .is_some_and(|device| self.devices.contains(device));
        let region_selected = record
            .region()
            .is_some_and(|region| self.regions.contains(&region));
        device_selected && region_selected
    }

    /// Express the selection as an explicit request.
    pub fn to_request(&self) -> FilterRequest {
        FilterRequest {
            devices: Some(self.devices.iter().cloned().collect()),
            regions: Some(self.regions.iter().copied().collect()),
        }
    }
}

/// A count of programs in a state, optionally for a single device category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AggregatedCount {
    /// State code
    pub state: &'static str,
    /// Device category name, or `None` for the state total
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_category: Option<String>,
    /// Number of programs
    pub count: u64,
}

/// Programs for a single device category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DeviceCount {
    /// Device category name
    pub device: String,
    /// Number of programs
    pub count: u64,
}

/// Result of aggregating a data set under a set of filters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Aggregation {
    /// Number of programs matching the filters
    pub total: u64,
    /// Programs per state. Every known state is present, with 0 where nothing matches.
    pub state_counts: BTreeMap<&'static str, u64>,
    /// Programs per state and device category. Only states with programs are present.
    pub state_devices: BTreeMap<&'static str, BTreeMap<String, u64>>,
    /// Programs per region. Only regions with programs are present.
    pub region_totals: BTreeMap<Region, u64>,
    /// Programs per region and device category
    pub region_devices: BTreeMap<Region, BTreeMap<String, u64>>,
    /// Programs per device category, most common first
    pub device_breakdown: Vec<DeviceCount>,
    /// Number of states with at least one program
    pub states_with_programs: usize,
    /// Number of regions with at least one program
    pub regions_with_programs: usize,
}

impl Aggregation {
    /// Programs in a state. Unknown states report 0.
    pub fn count_for(&self, state: &str) -> u64 {
        self.state_counts.get(state).copied().unwrap_or(0)
    }

    /// Largest per-state count.
    pub fn max_count(&self) -> u64 {
        self.state_counts.values().copied().max().unwrap_or(0)
    }

    /// Flatten into per-state totals followed by their per-device counts.
    ///
    /// States without programs are omitted.
    pub fn counts(&self) -> Vec<AggregatedCount> {
        let mut counts = Vec::new();
        for (state, devices) in &self.state_devices {
            counts.push(AggregatedCount {
                state: *state,
                device_category: None,
                count: self.count_for(state),
            });
            counts.extend(devices.iter().map(|(device, count)| AggregatedCount {
                state: *state,
                device_category: Some(device.clone()),
                count: *count,
            }));
        }
        counts
    }
}

/// Aggregate program counts.
///
/// Keeps records whose device category and region are both selected, then counts them by state,
/// region and device category.
///
/// # Arguments
///
/// * `dataset`: Data set to aggregate
/// * `filters`: Selected device categories and regions
pub fn aggregate(dataset: &Dataset, filters: &Filters) -> Aggregation {
    let mut aggregation = Aggregation {
        state_counts: STATES.iter().map(|state| (state.code, 0)).collect(),
        ..Default::default()
    };
    let mut device_totals: BTreeMap<String, u64> = BTreeMap::new();

    for record in dataset.records().iter().filter(|r| filters.matches(r)) {
        // Matching records always have a known state and device.
        let (Some(state), Some(device)) = (record.state, record.device.as_ref()) else {
            continue;
        };
        aggregation.total += 1;
        *aggregation.state_counts.entry(state.code).or_default() += 1;
        *aggregation
            .state_devices
            .entry(state.code)
            .or_default()
            .entry(device.clone())
            .or_default() += 1;
        *aggregation.region_totals.entry(state.region).or_default() += 1;
        *aggregation
            .region_devices
            .entry(state.region)
            .or_default()
            .entry(device.clone())
            .or_default() += 1;
        *device_totals.entry(device.clone()).or_default() += 1;
    }

    let mut device_breakdown: Vec<DeviceCount> = device_totals
        .into_iter()
        .map(|(device, count)| DeviceCount { device, count })
        .collect();
    // Stable sort keeps names in alphabetical order within equal counts.
    device_breakdown.sort_by(|a, b| b.count.cmp(&a.count));
    aggregation.device_breakdown = device_breakdown;
    aggregation.states_with_programs = aggregation.state_devices.len();
    aggregation.regions_with_programs = aggregation.region_totals.len();
    aggregation
}
