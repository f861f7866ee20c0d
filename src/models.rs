//! Data types and associated functions and methods

use crate::aggregation::{AggregatedCount, Aggregation};
use crate::error::IncentiveMapError;
use crate::types::{CategoryId, Region};

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Name of the remote table holding incentive programs.
pub const PROGRAMS_TABLE: &str = "programs";
/// Name of the remote table holding device categories.
pub const DEVICE_CATEGORIES_TABLE: &str = "device_categories";

/// A row of the `programs` table.
///
/// Only the columns used for aggregation are kept; any others are ignored.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Program {
    /// State or province code. US states use two letter postal codes.
    #[serde(default)]
    pub state_province: Option<String>,
    /// Foreign key into the `device_categories` table
    pub device_category_id: Option<CategoryId>,
}

impl Program {
    /// Return a new Program object.
    pub fn new(state_province: &str, device_category_id: impl Into<CategoryId>) -> Self {
        Program {
            state_province: Some(state_province.to_string()),
            device_category_id: Some(device_category_id.into()),
        }
    }
}

/// A row of the `device_categories` table.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct DeviceCategory {
    /// Primary key
    pub id: CategoryId,
    /// Display name, e.g. "EV Charger"
    #[serde(default)]
    pub name: Option<String>,
}

impl DeviceCategory {
    /// Return a new DeviceCategory object.
    pub fn new(id: impl Into<CategoryId>, name: &str) -> Self {
        DeviceCategory {
            id: id.into(),
            name: Some(name.to_string()),
        }
    }
}

/// Filter selection requested by a client.
///
/// An absent filter selects everything; a present but empty filter selects nothing.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Validate)]
#[serde(deny_unknown_fields)]
pub struct FilterRequest {
    /// Device category names to include
    #[validate(custom = "validate_device_names")]
    pub devices: Option<Vec<String>>,
    /// Regions to include
    pub regions: Option<Vec<Region>>,
}

/// Maximum length of a device category name in a filter.
const MAX_DEVICE_NAME_LEN: usize = 64;

/// Validate device names in a filter
fn validate_device_names(names: &[String]) -> Result<(), ValidationError> {
    for name in names {
        if name.trim().is_empty() {
            return Err(ValidationError::new("device names must not be empty"));
        }
        if name.chars().count() > MAX_DEVICE_NAME_LEN {
            let mut error = ValidationError::new("device name is too long");
            error.add_param("max".into(), &MAX_DEVICE_NAME_LEN);
            return Err(error);
        }
    }
    Ok(())
}

impl FilterRequest {
    /// Parse a filter from a URL query string.
    ///
    /// `devices` and `regions` may be repeated. Empty values mark the parameter as present without
    /// selecting anything, which lets an HTML form with every box unchecked select nothing rather
    /// than everything.
    ///
    /// # Arguments
    ///
    /// * `query`: Raw query string, without the leading `?`
    pub fn from_query(query: Option<&str>) -> Result<Self, IncentiveMapError> {
        let mut request = FilterRequest::default();
        let Some(query) = query else {
            return Ok(request);
        };
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "devices" => {
                    let devices = request.devices.get_or_insert_with(Vec::new);
                    if !value.is_empty() {
                        devices.push(value.into_owned());
                    }
                }
                "regions" => {
                    let regions = request.regions.get_or_insert_with(Vec::new);
                    if !value.is_empty() {
                        let region = Region::from_name(&value).ok_or_else(|| {
                            IncentiveMapError::UnknownRegion {
                                name: value.to_string(),
                            }
                        })?;
                        regions.push(region);
                    }
                }
                // Other parameters are ignored, so links may carry extra state.
                _ => (),
            }
        }
        Ok(request)
    }

    /// Serialise the filter back into a URL query string.
    ///
    /// This is the inverse of [FilterRequest::from_query].
    pub fn to_query(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        if let Some(devices) = &self.devices {
            if devices.is_empty() {
                serializer.append_pair("devices", "");
            }
            for device in devices {
                serializer.append_pair("devices", device);
            }
        }
        if let Some(regions) = &self.regions {
            if regions.is_empty() {
                serializer.append_pair("regions", "");
            }
            for region in regions {
                serializer.append_pair("regions", &region.to_string());
            }
        }
        serializer.finish()
    }
}

/// Filter options available to clients.
#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    /// Device category names present in the data set
    pub devices: Vec<String>,
    /// All regions
    pub regions: Vec<Region>,
}

/// Response to an aggregation request.
#[derive(Debug, Serialize)]
pub struct AggregateResponse {
    /// Error encountered while loading data, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_error: Option<String>,
    /// Aggregated statistics
    #[serde(flatten)]
    pub aggregation: Aggregation,
    /// Per state and device counts
    pub counts: Vec<AggregatedCount>,
}
