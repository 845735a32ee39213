//! Feature derivation.
//!
//! Pure functions from existing columns to new columns:
//! - Calendar parts of the request timestamp
//! - Cost per page
//! - Size bucket from the page count

mod cost;
mod size;
mod temporal;

pub use cost::cost_per_page;
pub use size::{SizeCategory, size_category};
pub use temporal::{TemporalParts, derive_temporal, to_naive_datetimes, weekday_name};
