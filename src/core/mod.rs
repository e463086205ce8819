//! Core orchestration logic.
//!
//! This module contains:
//! - Resolver: artifact discovery in agent payloads
//! - Storage / Store: campaign history and its persistence
//! - Overlay: demonstration data for empty views
//! - Orchestrator: the content and graphic generation flows

pub mod orchestrator;
pub mod overlay;
pub mod resolver;
pub mod samples;
pub mod storage;
pub mod store;

// Re-export commonly used types
pub use orchestrator::{GenerationError, GraphicGeneration, GraphicTarget, Orchestrator};
pub use overlay::SampleOverlay;
pub use resolver::resolve_artifacts;
pub use storage::{FileStorage, MemoryStorage, SnapshotStorage, StorageError};
pub use store::{CampaignQuery, CampaignStore, ContentTypeFilter, ALL_CONTENT_TYPES, CAMPAIGNS_KEY};
