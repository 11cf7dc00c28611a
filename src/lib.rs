pub mod cmdline;
pub mod config;
pub mod logging;
pub mod report;
pub mod signal;
