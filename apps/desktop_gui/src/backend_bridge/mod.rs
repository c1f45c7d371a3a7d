//! Worker thread that runs upload/analyze pipelines off the UI thread.

pub mod commands;
pub mod runtime;
