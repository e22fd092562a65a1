//! # terravision
//!
//! Command-line host for the TerraVision journey: configuration, the clap
//! CLI, and the real-time driver that feeds wall-clock ticks into
//! `terravision-core`.

pub mod cli;
pub mod config;
pub mod runtime;
