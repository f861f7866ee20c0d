use crate::dataset::Dataset;
use crate::models::*;

/// Device categories used across tests.
pub(crate) fn get_test_categories() -> Vec<DeviceCategory> {
    vec![
        DeviceCategory::new(1, "EV Charger"),
        DeviceCategory::new(2, "HVAC"),
        DeviceCategory::new(3, "Heat Pump"),
    ]
}

/// Programs used across tests, including one outside the US and one with an unknown category.
pub(crate) fn get_test_programs() -> Vec<Program> {
    vec![
        Program::new("CA", 1),
        Program::new("CA", 2),
        Program::new("TX", 1),
        Program::new("NY", 3),
        Program::new("WA", 1),
        Program::new("MA", 2),
        Program::new("ON", 1),
        Program::new("OR", 99),
    ]
}

/// Create a Dataset from the test categories and programs.
pub(crate) fn get_test_dataset() -> Dataset {
    Dataset::from_rows(get_test_categories(), get_test_programs())
}
