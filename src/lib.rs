// Library surface for the binary, headless integration tests and reuse.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod logging;
pub mod runtime;
pub mod scoring;
pub mod session;
pub mod timer;
pub mod ui;
pub mod words;

pub use error::{Result, TypemasterError};
