//! `dashonomics` library crate.
//!
//! Normalizes three macroeconomic series (GDP per capita, consumer prices,
//! unemployment) onto a common timeline and derives a composite risk score.
//!
//! The binary (`dashonomics`) is a thin wrapper around this library so that:
//!
//! - loading, scoring, and filtering are testable without spawning processes
//! - retrieval sources can be swapped without touching the scoring rules

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod report;
pub mod risk;
pub mod series;
