//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - indicator metadata (`Indicator`, `Frequency`)
//! - normalized series (`IndicatorPoint`, `IndicatorSeries`)
//! - scoring output (`RiskReport`, `RiskReason`)
//! - period date-code parsing (`date_code`)

pub mod date_code;
pub mod types;

pub use date_code::*;
pub use types::*;
