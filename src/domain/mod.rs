//! Domain types for campaign-studio.
//!
//! This module contains the core data structures:
//! - Briefs: user input and prompt construction
//! - Content / Graphic: agent results and resolved artifacts
//! - Campaign: persisted pairing of content and graphic
//! - Generation: per-flow lifecycle state

pub mod brief;
pub mod campaign;
pub mod content;
pub mod generation;
pub mod graphic;
pub mod lenient;

// Re-export commonly used types
pub use brief::{ContentBrief, GraphicBrief};
pub use campaign::{Campaign, CampaignId};
pub use content::{ContentResult, SeoBand, SeoMetadata, SeoRating};
pub use generation::{ActivityIndicator, ActivityTicket, AgentRole, GenerationStatus};
pub use graphic::{Artifact, GraphicResult};
