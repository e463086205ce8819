//! Command-line interface for campaign-studio.
//!
//! Provides commands for generating content and graphics, browsing the
//! campaign history, and managing the brand knowledge base.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::adapters::{HttpAgentClient, HttpKnowledgeBase, UploadFile};
use crate::config::{self, ResolvedConfig};
use crate::core::{CampaignQuery, CampaignStore, FileStorage, GraphicTarget, Orchestrator, SampleOverlay};
use crate::domain::{Campaign, ContentBrief, ContentResult, GraphicBrief, GraphicResult};
use crate::knowledge::KnowledgeBaseManager;

/// campaign-studio - Marketing campaign generator
#[derive(Parser, Debug)]
#[command(name = "campaign-studio")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate marketing content and record it as a campaign
    Content {
        /// What the content is about
        topic: String,

        /// Content type (default: Blog Post)
        #[arg(short = 't', long = "type")]
        content_type: Option<String>,

        /// Target audience (default: Realtors)
        #[arg(short, long)]
        audience: Option<String>,

        /// Key message (default: the topic)
        #[arg(short, long)]
        key_message: Option<String>,

        /// Tone (default: Professional)
        #[arg(long)]
        tone: Option<String>,

        /// Also generate a graphic headlined with the new content title
        #[arg(short, long)]
        graphic: bool,
    },

    /// Generate a graphic and attach it to a campaign
    Graphic {
        /// Headline (default: title of the most recent campaign)
        headline: Option<String>,

        /// Graphic type (default: Social Banner)
        #[arg(short = 't', long = "type")]
        graphic_type: Option<String>,

        /// Aspect ratio (default: 16:9 Landscape)
        #[arg(short, long)]
        aspect_ratio: Option<String>,

        /// Free-form style notes
        #[arg(short, long)]
        style_notes: Option<String>,

        /// Campaign to attach to (default: the most recent one)
        #[arg(short, long)]
        campaign: Option<String>,
    },

    /// List campaigns
    Campaigns {
        /// Case-insensitive title search
        #[arg(short, long, default_value = "")]
        search: String,

        /// Exact content type, or "All"
        #[arg(short = 't', long = "type", default_value = "All")]
        content_type: String,

        /// Show demonstration data while the history is empty
        #[arg(long)]
        samples: bool,
    },

    /// Show details of a campaign
    Show {
        /// Campaign ID (prefix match)
        campaign_id: String,

        /// Include the full content body
        #[arg(short, long)]
        full: bool,
    },

    /// Manage the brand knowledge base
    Kb {
        #[command(subcommand)]
        command: KbCommands,
    },

    /// Show resolved configuration (debug)
    Config,
}

/// Knowledge-base subcommands
#[derive(Subcommand, Debug)]
pub enum KbCommands {
    /// List documents
    List,

    /// Upload a document and start training
    Upload {
        /// PDF, DOCX or TXT file
        path: PathBuf,

        /// Declared MIME type (detected from the extension otherwise)
        #[arg(long)]
        mime: Option<String>,
    },

    /// Delete a document
    Delete {
        /// Document file name as listed
        file_name: String,
    },
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Content {
                topic,
                content_type,
                audience,
                key_message,
                tone,
                graphic,
            } => {
                let brief = ContentBrief {
                    topic,
                    content_type: content_type.unwrap_or_default(),
                    audience: audience.unwrap_or_default(),
                    key_message: key_message.unwrap_or_default(),
                    tone: tone.unwrap_or_default(),
                };
                generate_content(brief, graphic).await
            }
            Commands::Graphic {
                headline,
                graphic_type,
                aspect_ratio,
                style_notes,
                campaign,
            } => {
                let brief = GraphicBrief {
                    headline: headline.unwrap_or_default(),
                    graphic_type: graphic_type.unwrap_or_default(),
                    aspect_ratio: aspect_ratio.unwrap_or_default(),
                    style_notes: style_notes.unwrap_or_default(),
                };
                generate_graphic(brief, campaign).await
            }
            Commands::Campaigns {
                search,
                content_type,
                samples,
            } => list_campaigns(&search, &content_type, samples).await,
            Commands::Show { campaign_id, full } => show_campaign(&campaign_id, full).await,
            Commands::Kb { command } => execute_kb(command).await,
            Commands::Config => show_config().await,
        }
    }
}

/// Open the persisted campaign history
fn open_store(cfg: &ResolvedConfig) -> CampaignStore {
    CampaignStore::open(Arc::new(FileStorage::from_config(cfg)))
}

/// Build an orchestrator over the persisted history
fn open_orchestrator(cfg: &ResolvedConfig, store: CampaignStore) -> Result<Orchestrator> {
    let agent = HttpAgentClient::from_config(cfg)?;
    Ok(Orchestrator::new(Arc::new(agent), cfg.agent.clone(), store).with_sample_data(cfg.sample_data))
}

/// Generate content, optionally chaining a graphic
async fn generate_content(brief: ContentBrief, with_graphic: bool) -> Result<()> {
    let cfg = config::config()?;
    let orchestrator = open_orchestrator(cfg, open_store(cfg))?;

    eprintln!("Generating {} about: {}", brief.effective_content_type(), brief.topic());

    let campaign = match orchestrator.generate_content(&brief).await {
        Ok(campaign) => campaign,
        Err(e) => {
            eprintln!("\nContent generation failed: {}", e);
            std::process::exit(1);
        }
    };

    eprintln!("\nCampaign saved");
    eprintln!("   ID: {}", campaign.id);
    eprintln!("   Title: {}", campaign.title);
    if let Some(content) = &campaign.content_data {
        print_content(content, true);
    }

    if !with_graphic {
        return Ok(());
    }

    // The headline was seeded from the new content title
    let mut graphic_brief = orchestrator.graphic_brief().await;
    if !graphic_brief.is_ready() {
        graphic_brief.headline = campaign.title.clone();
    }
    eprintln!("\nGenerating graphic: {}", graphic_brief.headline());
    match orchestrator
        .generate_graphic_for(&graphic_brief, GraphicTarget::Campaign(campaign.id.clone()))
        .await
    {
        Ok(generation) => print_graphic(&generation.graphic),
        Err(e) => {
            eprintln!("\nGraphic generation failed: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Generate a graphic for a campaign
async fn generate_graphic(mut brief: GraphicBrief, campaign: Option<String>) -> Result<()> {
    let cfg = config::config()?;
    let store = open_store(cfg);

    let target = match campaign {
        Some(prefix) => {
            let found = find_campaign(store.campaigns(), &prefix)?;
            GraphicTarget::Campaign(found.id.clone())
        }
        None => GraphicTarget::MostRecent,
    };

    if !brief.is_ready() {
        let seeded = match &target {
            GraphicTarget::Campaign(id) => store.get(id),
            GraphicTarget::MostRecent => store.latest(),
        };
        brief.headline = seeded
            .map(|c| c.title.clone())
            .context("No headline given and no campaign to take one from")?;
    }

    let orchestrator = open_orchestrator(cfg, store)?;
    eprintln!("Generating {}: {}", brief.effective_graphic_type(), brief.headline());

    match orchestrator.generate_graphic_for(&brief, target).await {
        Ok(generation) => {
            print_graphic(&generation.graphic);
            match generation.attached_to {
                Some(id) => eprintln!("\nAttached to campaign {}", id),
                None => eprintln!("\nNo campaign to attach to; graphic not saved"),
            }
        }
        Err(e) => {
            eprintln!("\nGraphic generation failed: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Find a campaign by ID prefix
fn find_campaign<'a>(campaigns: &'a [Campaign], prefix: &str) -> Result<&'a Campaign> {
    campaigns
        .iter()
        .find(|c| c.id.as_str().starts_with(prefix))
        .ok_or_else(|| anyhow::anyhow!("Campaign not found: {}", prefix))
}

/// List campaigns matching a query
async fn list_campaigns(search: &str, content_type: &str, samples: bool) -> Result<()> {
    let cfg = config::config()?;
    let store = open_store(cfg);
    let overlay = SampleOverlay::new(samples || cfg.sample_data);

    let query = CampaignQuery::new(search, content_type);
    let campaigns = overlay.query(&store, &query);

    if campaigns.is_empty() {
        if store.is_empty() {
            println!("No campaigns yet. Use 'campaign-studio content <topic>' to create one.");
        } else {
            println!("No campaigns match.");
        }
        return Ok(());
    }

    println!("{:<42} {:<12} {:<12} {:<7} {}", "ID", "DATE", "TYPE", "GRAPHIC", "TITLE");
    println!("{}", "-".repeat(110));

    for campaign in &campaigns {
        println!(
            "{:<42} {:<12} {:<12} {:<7} {}",
            campaign.id.as_str(),
            campaign.date.format("%Y-%m-%d").to_string(),
            campaign.content_type,
            if campaign.has_graphic() { "yes" } else { "-" },
            truncate(&campaign.title, 50)
        );
    }

    println!("\nShowing {} of {} campaigns", campaigns.len(), overlay.listing(&store).len());

    Ok(())
}

/// Show details of a campaign
async fn show_campaign(prefix: &str, full: bool) -> Result<()> {
    let cfg = config::config()?;
    let store = open_store(cfg);
    let overlay = SampleOverlay::new(cfg.sample_data);
    let campaign = find_campaign(overlay.listing(&store), prefix)?;

    println!("================================================================");
    println!("  ID: {}", campaign.id);
    println!("  Title: {}", campaign.title);
    println!("  Type: {}", campaign.content_type);
    println!("  Date: {}", campaign.date);
    println!("================================================================");

    match &campaign.content_data {
        Some(content) => print_content(content, full),
        None => println!("\n(no content)"),
    }
    match &campaign.graphic_data {
        Some(graphic) => print_graphic(graphic),
        None => println!("\n(no graphic)"),
    }

    if !full {
        println!("\nUse --full to show the content body");
    }

    Ok(())
}

fn print_content(content: &ContentResult, full: bool) {
    println!();
    if let Some(title) = content.title() {
        println!("# {}", title);
    }
    if let Some(audience) = &content.target_audience {
        println!("Audience: {}", audience);
    }
    if content.seo_score.is_some() {
        let rating = content.seo_rating();
        println!("SEO: {}/100 ({})", rating.score, rating.band);
    }
    if full {
        if let Some(body) = &content.content_body {
            println!("\n{}", body);
        }
    }
    if let Some(takeaways) = content.key_takeaways.as_deref().filter(|t| !t.is_empty()) {
        println!("\nKey takeaways:");
        for takeaway in takeaways {
            println!("  - {}", takeaway);
        }
    }
    if let Some(cta) = &content.call_to_action {
        println!("\nCall to action: {}", cta);
    }
    if let Some(hashtags) = content.hashtags.as_deref().filter(|h| !h.is_empty()) {
        println!("Hashtags: {}", hashtags.join(" "));
    }
    if let Some(keywords) = content.seo.primary_keywords.as_deref().filter(|k| !k.is_empty()) {
        println!("Keywords: {}", keywords.join(", "));
    }
}

fn print_graphic(graphic: &GraphicResult) {
    println!();
    println!(
        "Graphic: {} ({})",
        graphic.graphic_title.as_deref().unwrap_or("-"),
        graphic.graphic_type.as_deref().unwrap_or("-")
    );
    if let Some(dimensions) = &graphic.dimensions {
        println!("  Dimensions: {}", dimensions);
    }
    if let Some(palette) = graphic.color_palette_used.as_deref().filter(|p| !p.is_empty()) {
        println!("  Palette: {}", palette.join(" "));
    }
    if graphic.images.is_empty() {
        println!("  (no images returned)");
    }
    for image in &graphic.images {
        println!(
            "  {} [{}] {}",
            image.name.as_deref().unwrap_or("graphic"),
            image.format_type.as_deref().unwrap_or("png"),
            image.file_url
        );
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}

/// Execute knowledge-base subcommands
async fn execute_kb(command: KbCommands) -> Result<()> {
    let cfg = config::config()?;
    let service = HttpKnowledgeBase::from_config(cfg)?;
    let mut manager = KnowledgeBaseManager::new(Arc::new(service), cfg.knowledge_base.id.clone());

    run_kb_command(&mut manager, command).await?;
    print_documents(&manager);
    Ok(())
}

/// Apply one knowledge-base command, leaving a fresh listing in the manager.
///
/// Successful uploads and deletes refresh on their own; a listing is only
/// requested here when nothing else did.
async fn run_kb_command(manager: &mut KnowledgeBaseManager, command: KbCommands) -> Result<()> {
    match command {
        KbCommands::List => manager.refresh().await,
        KbCommands::Upload { path, mime } => {
            let file = read_upload(&path, mime).await?;
            let message = manager.upload(&file).await?;
            eprintln!("{}", message);
        }
        KbCommands::Delete { file_name } => {
            if !manager.delete(&file_name).await {
                eprintln!("Could not delete {}", file_name);
                manager.refresh().await;
            }
        }
    }
    Ok(())
}

async fn read_upload(path: &Path, mime: Option<String>) -> Result<UploadFile> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let file = UploadFile::new(file_name, bytes);
    Ok(match mime {
        Some(mime) => file.with_content_type(mime),
        None => file,
    })
}

fn print_documents(manager: &KnowledgeBaseManager) {
    let documents = manager.documents();
    if documents.is_empty() {
        println!("Knowledge base '{}' has no documents.", manager.kb_id());
        return;
    }

    println!("{:<50} {:<12}", "DOCUMENT", "STATUS");
    println!("{}", "-".repeat(64));
    for doc in documents {
        println!(
            "{:<50} {:<12}",
            truncate(&doc.file_name, 50),
            doc.status.as_deref().unwrap_or("-")
        );
    }
}

/// Show the resolved configuration (for debugging)
async fn show_config() -> Result<()> {
    let cfg = config::config()?;

    println!("================================================================");
    println!("  Campaign Studio Configuration");
    println!("================================================================");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Paths:");
    println!("  Home:      {}", cfg.home.display());
    println!("  Campaigns: {}", cfg.home.join("campaigns.json").display());
    println!();
    println!("Agents:");
    println!("  Endpoint:  {}", cfg.agent.endpoint);
    println!("  Content:   {}", cfg.agent.content_agent_id);
    println!("  Graphic:   {}", cfg.agent.graphic_agent_id);
    println!();
    println!("Knowledge base:");
    println!("  Endpoint:  {}", cfg.knowledge_base.endpoint);
    println!("  ID:        {}", cfg.knowledge_base.id);
    println!();
    println!("API key:     {}", if cfg.api_key.is_some() { "(set)" } else { "(not set)" });
    println!("Timeout:     {}s", cfg.request_timeout_seconds);
    println!("Sample data: {}", cfg.sample_data);

    Ok(())
}
