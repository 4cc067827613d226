pub mod background;
pub mod details;
pub mod error;
pub mod service;
pub mod syncer;
pub mod task;

#[cfg(test)]
pub(crate) mod testing;

pub use background::BackgroundSyncs;
pub use details::{PositionDetailsAssembler, format_amount};
pub use error::{DetailsError, SyncError};
pub use lp_metrics::SyncTrigger;
pub use service::{SyncRound, SyncService};
pub use syncer::PositionSyncer;
pub use task::SyncTask;
