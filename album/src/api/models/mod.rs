//! Response bodies returned by the API handlers.

pub mod diagnostics;
pub mod pictures;
pub mod status;
pub mod uploads;
