//! Command-line front end for the eduroam log analyzer.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
