pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::config::aws::{S3ObjectStore, SnsChannel};
pub use crate::config::cli::LocalStorage;
pub use crate::config::toml_config::NotifierConfig;
#[cfg(feature = "cli")]
pub use crate::config::CliArgs;

pub use crate::core::etl::{PipelineController, RunSettings};
pub use crate::core::pipeline::SlotPipeline;
pub use crate::utils::error::{NotifierError, Result};
