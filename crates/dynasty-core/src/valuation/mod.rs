// Valuation engine: dynasty value and retention status.

pub mod status;
pub mod value;

pub use status::{best_at_position, classify_status};
pub use value::{compute_value, round2};
