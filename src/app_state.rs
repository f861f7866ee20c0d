use crate::dataset::Dataset;
use crate::error;
use crate::metrics::{DATASET_ROWS, UNMAPPED_PROGRAMS};
use crate::supabase::{self, ProgramSource};

use std::sync::Arc;

/// Shared application state passed to each request handler.
#[derive(Debug)]
pub struct AppState {
    /// Snapshot of the remote tables.
    pub dataset: Dataset,
}

impl AppState {
    /// Create and return an [AppState] from a data set.
    pub fn new(dataset: Dataset) -> Self {
        Self { dataset }
    }

    /// Load the data set from a program source.
    ///
    /// A failed load is not fatal: the state holds an empty data set recording the error, so the
    /// map can still be served with an error notice.
    pub async fn load(source: &dyn ProgramSource) -> Self {
        let dataset = match supabase::load_dataset(source).await {
            Ok(dataset) => dataset,
            Err(err) => {
                error::log_error(&err);
                Dataset::failed(error::describe(&err))
            }
        };
        let unmapped = dataset.unmapped();
        if unmapped > 0 {
            tracing::warn!(
                "{} of {} US programs have an unknown state or device category and will not be shown",
                unmapped,
                dataset.records().len()
            );
        }
        DATASET_ROWS
            .with_label_values(&["us_programs"])
            .set(dataset.records().len() as i64);
        DATASET_ROWS
            .with_label_values(&["device_names"])
            .set(dataset.device_names().len() as i64);
        UNMAPPED_PROGRAMS.inc_by(unmapped as u64);
        Self::new(dataset)
    }
}

/// AppState wrapped in an Atomic Reference Count (Arc) to allow multiple references.
pub type SharedAppState = Arc<AppState>;
