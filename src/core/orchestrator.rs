//! Generation orchestrator.
//!
//! Drives the content and graphic flows against the agent service, turns
//! replies into canonical results and records them in the campaign store.
//! Both flows take `&self` and may be in flight at the same time; shared
//! state is locked only between agent calls, never across one.

use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError};

use serde_json::Value;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use crate::adapters::{AgentInvoker, AgentResponse};
use crate::config::AgentSettings;
use crate::domain::lenient::from_object;
use crate::domain::{
    ActivityIndicator, ActivityTicket, AgentRole, Campaign, CampaignId, ContentBrief,
    ContentResult, GenerationStatus, GraphicBrief, GraphicResult,
};

use super::overlay::SampleOverlay;
use super::resolver::resolve_artifacts;
use super::store::{CampaignQuery, CampaignStore};

pub const CONTENT_FAILED: &str = "Failed to generate content. Please try again.";
pub const GRAPHIC_FAILED: &str = "Failed to generate graphic. Please try again.";
pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred. Please try again.";

const UNTITLED_CAMPAIGN: &str = "Untitled Campaign";
const UNTITLED_GRAPHIC: &str = "Untitled Graphic";

/// Why a generation did not produce a result
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("A topic is required to generate content")]
    MissingTopic,

    #[error("A headline is required to generate a graphic")]
    MissingHeadline,

    /// Agent call failed; the message is meant for the user
    #[error("{0}")]
    Failed(String),
}

/// Which campaign a finished graphic is attached to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GraphicTarget {
    /// Whatever campaign is newest when the graphic arrives
    #[default]
    MostRecent,

    /// A specific campaign, fixed when the generation starts
    Campaign(CampaignId),
}

/// Result of a successful graphic generation
#[derive(Debug, Clone, PartialEq)]
pub struct GraphicGeneration {
    pub graphic: GraphicResult,

    /// Campaign that received the graphic, if any
    pub attached_to: Option<CampaignId>,
}

/// Mutable session state shared by both flows
struct Session {
    store: CampaignStore,
    overlay: SampleOverlay,
    content_result: Option<ContentResult>,
    graphic_results: Vec<GraphicResult>,
    graphic_brief: GraphicBrief,
}

/// Flow statuses and the activity indicator.
///
/// Behind a plain mutex so an abandoned generation can settle from `Drop`.
#[derive(Default)]
struct Progress {
    activity: ActivityIndicator,
    content: GenerationStatus,
    graphic: GenerationStatus,
}

impl Progress {
    fn status_mut(&mut self, role: AgentRole) -> &mut GenerationStatus {
        match role {
            AgentRole::Content => &mut self.content,
            AgentRole::Graphic => &mut self.graphic,
        }
    }
}

fn lock_progress(progress: &StdMutex<Progress>) -> MutexGuard<'_, Progress> {
    progress.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One running generation.
///
/// Dropped without [`InFlight::settle`] (the caller dropped the future), it
/// clears its activity ticket and returns a still-running flow to `Idle`.
struct InFlight<'a> {
    progress: &'a StdMutex<Progress>,
    role: AgentRole,
    ticket: ActivityTicket,
    settled: bool,
}

impl<'a> InFlight<'a> {
    fn start(progress: &'a StdMutex<Progress>, role: AgentRole) -> Self {
        let mut guard = lock_progress(progress);
        *guard.status_mut(role) = GenerationStatus::Running;
        let ticket = guard.activity.start(role);
        Self {
            progress,
            role,
            ticket,
            settled: false,
        }
    }

    fn settle(mut self, status: GenerationStatus) {
        let mut guard = lock_progress(self.progress);
        guard.activity.finish(self.ticket);
        *guard.status_mut(self.role) = status;
        self.settled = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut guard = lock_progress(self.progress);
        guard.activity.finish(self.ticket);
        let status = guard.status_mut(self.role);
        if status.is_running() {
            *status = GenerationStatus::Idle;
        }
        warn!(agent = %self.role, "Generation abandoned before the agent replied");
    }
}

/// Main generation orchestrator
pub struct Orchestrator {
    agent: Arc<dyn AgentInvoker>,
    agents: AgentSettings,
    session: Mutex<Session>,
    progress: StdMutex<Progress>,
}

impl Orchestrator {
    /// Create an orchestrator over an already loaded store
    pub fn new(agent: Arc<dyn AgentInvoker>, agents: AgentSettings, store: CampaignStore) -> Self {
        Self {
            agent,
            agents,
            session: Mutex::new(Session {
                store,
                overlay: SampleOverlay::default(),
                content_result: None,
                graphic_results: Vec::new(),
                graphic_brief: GraphicBrief::default(),
            }),
            progress: StdMutex::new(Progress::default()),
        }
    }

    /// Start with the sample overlay switched on or off
    pub fn with_sample_data(mut self, enabled: bool) -> Self {
        self.session.get_mut().overlay.set_enabled(enabled);
        self
    }

    /// Generate content for a brief and record it as a new campaign
    #[instrument(skip(self, brief), fields(topic = %brief.topic()))]
    pub async fn generate_content(&self, brief: &ContentBrief) -> Result<Campaign, GenerationError> {
        if !brief.is_ready() {
            return Err(GenerationError::MissingTopic);
        }

        self.session.lock().await.content_result = None;
        let flight = InFlight::start(&self.progress, AgentRole::Content);

        info!("Starting content generation");
        let reply = self
            .agent
            .invoke(&brief.prompt(), self.agents.agent_id(AgentRole::Content))
            .await;

        let mut session = self.session.lock().await;

        let content = match interpret_content(reply) {
            Ok(content) => content,
            Err(message) => {
                warn!(error = %message, "Content generation failed");
                flight.settle(GenerationStatus::Failed {
                    error: message.clone(),
                });
                return Err(GenerationError::Failed(message));
            }
        };

        let title = content
            .title()
            .or_else(|| Some(brief.topic()).filter(|t| !t.is_empty()))
            .unwrap_or(UNTITLED_CAMPAIGN)
            .to_string();
        let content_type = content
            .content_type
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(brief.effective_content_type())
            .to_string();

        // Seeding overwrites whatever headline was there
        if let Some(headline) = content.title() {
            session.graphic_brief.headline = headline.to_string();
        }

        let campaign = Campaign::new(title, content_type, content.clone());
        session.store.append(campaign.clone());
        session.content_result = Some(content);
        flight.settle(GenerationStatus::Succeeded);

        info!(campaign_id = %campaign.id, "Content generation completed");
        Ok(campaign)
    }

    /// Generate a graphic and attach it to the most recent campaign
    pub async fn generate_graphic(&self, brief: &GraphicBrief) -> Result<GraphicGeneration, GenerationError> {
        self.generate_graphic_for(brief, GraphicTarget::MostRecent).await
    }

    /// Generate a graphic and attach it to the given target
    #[instrument(skip(self, brief), fields(headline = %brief.headline()))]
    pub async fn generate_graphic_for(
        &self,
        brief: &GraphicBrief,
        target: GraphicTarget,
    ) -> Result<GraphicGeneration, GenerationError> {
        if !brief.is_ready() {
            return Err(GenerationError::MissingHeadline);
        }

        let flight = InFlight::start(&self.progress, AgentRole::Graphic);

        info!("Starting graphic generation");
        let reply = self
            .agent
            .invoke(&brief.prompt(), self.agents.agent_id(AgentRole::Graphic))
            .await;

        let mut session = self.session.lock().await;

        let graphic = match interpret_graphic(reply, brief) {
            Ok(graphic) => graphic,
            Err(message) => {
                warn!(error = %message, "Graphic generation failed");
                flight.settle(GenerationStatus::Failed {
                    error: message.clone(),
                });
                return Err(GenerationError::Failed(message));
            }
        };

        session.graphic_results.insert(0, graphic.clone());
        let attached_to = match target {
            GraphicTarget::MostRecent => session.store.attach_graphic(graphic.clone()),
            GraphicTarget::Campaign(id) => session
                .store
                .attach_graphic_to(&id, graphic.clone())
                .then_some(id),
        };
        flight.settle(GenerationStatus::Succeeded);

        info!(
            images = graphic.images.len(),
            attached_to = attached_to.as_ref().map(CampaignId::as_str).unwrap_or("none"),
            "Graphic generation completed"
        );
        Ok(GraphicGeneration {
            graphic,
            attached_to,
        })
    }

    pub async fn content_status(&self) -> GenerationStatus {
        lock_progress(&self.progress).content.clone()
    }

    pub async fn graphic_status(&self) -> GenerationStatus {
        lock_progress(&self.progress).graphic.clone()
    }

    /// Agent of the most recently started call still in flight
    pub async fn active_agent(&self) -> Option<AgentRole> {
        lock_progress(&self.progress).activity.current()
    }

    /// Content to display (demo content when the overlay applies)
    pub async fn content_result(&self) -> Option<ContentResult> {
        let session = self.session.lock().await;
        session
            .overlay
            .content(session.content_result.as_ref())
            .cloned()
    }

    /// Graphics produced this session, newest first (demo list when the overlay applies)
    pub async fn graphic_results(&self) -> Vec<GraphicResult> {
        let session = self.session.lock().await;
        session.overlay.graphics(&session.graphic_results).to_vec()
    }

    /// Current graphic brief, including any headline seeded from content
    pub async fn graphic_brief(&self) -> GraphicBrief {
        self.session.lock().await.graphic_brief.clone()
    }

    pub async fn set_graphic_brief(&self, brief: GraphicBrief) {
        self.session.lock().await.graphic_brief = brief;
    }

    pub async fn set_sample_data(&self, enabled: bool) {
        self.session.lock().await.overlay.set_enabled(enabled);
    }

    /// Campaign listing with the overlay applied
    pub async fn campaigns(&self, query: &CampaignQuery) -> Vec<Campaign> {
        let session = self.session.lock().await;
        session
            .overlay
            .query(&session.store, query)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Find a campaign in the listing (overlay applied)
    pub async fn campaign(&self, id: &CampaignId) -> Option<Campaign> {
        let session = self.session.lock().await;
        session
            .overlay
            .listing(&session.store)
            .iter()
            .find(|c| &c.id == id)
            .cloned()
    }

    /// Number of real, persisted campaigns
    pub async fn stored_campaigns(&self) -> usize {
        self.session.lock().await.store.len()
    }
}

/// Content reply → result, or the message to show the user
fn interpret_content(reply: anyhow::Result<AgentResponse>) -> Result<ContentResult, String> {
    let response = match reply {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, "Content agent call failed");
            return Err(UNEXPECTED_ERROR.to_string());
        }
    };

    match response.result() {
        Some(result) if response.success => Ok(ContentResult::from_agent_result(result)),
        _ => Err(response.error.unwrap_or_else(|| CONTENT_FAILED.to_string())),
    }
}

/// Graphic reply → result, or the message to show the user
fn interpret_graphic(
    reply: anyhow::Result<AgentResponse>,
    brief: &GraphicBrief,
) -> Result<GraphicResult, String> {
    let response = reply.map_err(|e| e.to_string())?;

    if !response.success {
        let message = response
            .error
            .clone()
            .or_else(|| response.message().map(str::to_string))
            .unwrap_or_else(|| GRAPHIC_FAILED.to_string());
        return Err(message);
    }

    Ok(build_graphic(&response, brief))
}

fn build_graphic(response: &AgentResponse, brief: &GraphicBrief) -> GraphicResult {
    // Images always come from the resolver, never from the result body
    let mut data = response
        .result()
        .filter(|v| v.is_object())
        .cloned()
        .unwrap_or(Value::Null);
    if let Some(fields) = data.as_object_mut() {
        fields.remove("images");
    }
    let parsed: GraphicResult = from_object(&data);

    let non_empty = |s: Option<String>| s.filter(|s| !s.is_empty());

    GraphicResult {
        graphic_title: Some(
            non_empty(parsed.graphic_title)
                .or_else(|| Some(brief.headline().to_string()).filter(|h| !h.is_empty()))
                .unwrap_or_else(|| UNTITLED_GRAPHIC.to_string()),
        ),
        graphic_type: Some(
            non_empty(parsed.graphic_type).unwrap_or_else(|| brief.effective_graphic_type().to_string()),
        ),
        images: resolve_artifacts(response.payload())
            .into_iter()
            .map(|artifact| artifact.with_display_defaults())
            .collect(),
        ..parsed
    }
}
