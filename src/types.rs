pub mod category_id;
pub mod region;

// Re-export types for convenience.
pub use crate::types::category_id::CategoryId;
pub use crate::types::region::Region;
