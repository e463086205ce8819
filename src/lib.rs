//! campaign-studio - Marketing campaign generator
//!
//! Turns short briefs into marketing content and matching graphics by
//! driving two remote generative agents, and keeps the results as a
//! searchable campaign history.
//!
//! # Architecture
//!
//! - A content brief goes to the content agent; its result becomes a new
//!   campaign at the head of the history and seeds the graphic headline
//! - A graphic brief goes to the graphic agent; image artifacts are located
//!   in the loosely-shaped reply and the graphic is attached to a campaign
//! - The history is persisted as a JSON snapshot after every change
//!
//! # Modules
//!
//! - `adapters`: Agent and knowledge-base service integrations
//! - `core`: Orchestrator, artifact resolver, campaign store, sample overlay
//! - `domain`: Data structures (briefs, results, campaigns, flow status)
//! - `knowledge`: Knowledge-base document management
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Generate content and a graphic for it
//! campaign-studio content "AI tools for open houses" --graphic
//!
//! # Browse the history
//! campaign-studio campaigns --search guide --type "Blog Post"
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod knowledge;

// Re-export main types at crate root for convenience
pub use core::{CampaignQuery, CampaignStore, GenerationError, GraphicTarget, Orchestrator};
pub use domain::{
    AgentRole, Campaign, CampaignId, ContentBrief, ContentResult, GenerationStatus, GraphicBrief,
    GraphicResult,
};
pub use knowledge::{KnowledgeBaseManager, UploadError};
