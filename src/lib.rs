pub mod cf;
pub mod config;
pub mod config_processors;
pub mod evaluation;
pub mod io;
pub mod metrics;
pub mod stopwatch;
