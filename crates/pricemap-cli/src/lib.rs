//! Library side of the `pricemap` binary: logging setup, terminal review
//! and summary tables.

pub mod interactive;
pub mod logging;
pub mod summary;
pub mod types;
