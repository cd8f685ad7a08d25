pub mod etl;
pub mod fetcher;
pub mod filter;
pub mod notifier;
pub mod pipeline;
pub mod publisher;
pub mod render;

pub use crate::domain::model::{DistrictOutcome, DistrictReport, RunSummary, Stage};
pub use crate::domain::ports::{NotificationChannel, ObjectStore, Storage};
pub use crate::utils::error::Result;
