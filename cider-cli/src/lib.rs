//! Command-line front end for the cider projection engine.

pub mod cli;
pub mod commands;
pub mod inputs;
pub mod logging;
pub mod report;
