//! Output files: per-indicator CSV series and the JSON run report.

pub mod export;

pub use export::*;
