//! Built-in demonstration data shown by the sample overlay.

use std::sync::OnceLock;

use chrono::NaiveDate;

use crate::domain::{Artifact, Campaign, CampaignId, ContentResult, GraphicResult, SeoMetadata};

static CONTENT: OnceLock<ContentResult> = OnceLock::new();
static GRAPHICS: OnceLock<Vec<GraphicResult>> = OnceLock::new();
static CAMPAIGNS: OnceLock<Vec<Campaign>> = OnceLock::new();

fn strings(items: &[&str]) -> Option<Vec<String>> {
    Some(items.iter().map(|s| s.to_string()).collect())
}

fn text(s: &str) -> Option<String> {
    Some(s.to_string())
}

fn day(year: i32, month: u32, date: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, date).unwrap_or(NaiveDate::MIN)
}

/// Demo content result
pub fn sample_content() -> &'static ContentResult {
    CONTENT.get_or_init(|| ContentResult {
        content_title: text("The Ultimate Guide to AI-Powered Real Estate Marketing"),
        content_body: text(
            "## Why it matters\n\n\
             Buyers research online long before they call an agent. Consistent, \
             well-targeted content keeps you in front of them.\n\n\
             ### What to automate first\n\n\
             - **Listing descriptions** drafted from property data\n\
             - **Follow-up emails** tuned to each lead's stage\n\
             - **Social posts** scheduled around open houses\n\n\
             ### Measuring results\n\n\
             Track engagement, lead conversion and days on market before and after.",
        ),
        content_type: text("Blog Post"),
        target_audience: text("Realtors"),
        key_takeaways: strings(&[
            "Automating routine copy frees hours every week",
            "Personalized follow-ups convert better than generic blasts",
            "Measure before and after to prove the return",
        ]),
        call_to_action: text("Join the community to get the full playbook and templates."),
        hashtags: strings(&["#RealEstateMarketing", "#PropTech", "#RealtorLife"]),
        seo_score: Some(82.0),
        seo: SeoMetadata {
            title_tag: text("AI Real Estate Marketing Guide | AI Growth Community"),
            meta_description: text(
                "How agents use AI for listing copy, follow-ups and social posts to win more clients.",
            ),
            primary_keywords: strings(&["AI real estate marketing", "real estate automation"]),
            secondary_keywords: strings(&["listing descriptions", "lead follow-up", "proptech"]),
            keyword_density_analysis: text(
                "Primary keyword appears in the title, first paragraph and one subheading.",
            ),
            content_improvements: strings(&[
                "Add a short case study with concrete numbers",
                "Include a comparison table of tools",
            ]),
            internal_linking_suggestions: strings(&["Link to the getting-started tutorial"]),
            heading_suggestions: strings(&["H2: Tools every agent should try this quarter"]),
            overall_assessment: text(
                "Clear, practical article with a solid keyword base; add proof points.",
            ),
        },
    })
}

/// Demo graphic list (a single banner)
pub fn sample_graphics() -> &'static [GraphicResult] {
    GRAPHICS.get_or_init(|| {
        vec![GraphicResult {
            graphic_title: text("AI Marketing Guide - Social Banner"),
            graphic_description: text("Warm-toned banner announcing the marketing guide."),
            design_notes: text("Serif headline over a soft gradient; amber accents."),
            graphic_type: text("Social Banner"),
            dimensions: text("1200x630"),
            color_palette_used: strings(&["#6B3A1F", "#C49A2C", "#F5F0E8", "#2D1A0E"]),
            brand_alignment_notes: text("Matches the heritage palette and typography."),
            images: vec![Artifact::new(
                "https://placehold.co/1200x630/6B3A1F/F5F0E8?text=AI+Growth",
                "ai-marketing-banner.png",
                "png",
            )],
        }]
    })
}

/// Demo campaign history, newest first
pub fn sample_campaigns() -> &'static [Campaign] {
    CAMPAIGNS.get_or_init(|| {
        let guide = sample_content();

        let tips = ContentResult {
            content_title: text("5 Quick Tips for Growing Your Pipeline"),
            content_body: text(
                "1. **Score leads** so you call the warm ones first\n\
                 2. **Post local market notes** every week\n\
                 3. **Automate follow-ups** after every showing\n\
                 4. **Offer video tours** for remote buyers\n\
                 5. **Ask for referrals** at closing",
            ),
            content_type: text("Social Post"),
            target_audience: text("Realtors"),
            hashtags: strings(&["#RealEstateTips", "#LeadGen"]),
            seo_score: Some(74.0),
            ..Default::default()
        };

        let newsletter = ContentResult {
            content_title: text("Monthly Newsletter: Market Insights"),
            content_body: text(
                "Here is this month's roundup.\n\n\
                 ## Highlights\n\n\
                 - Inventory is rising in most metros\n\
                 - More agents are adopting automation tools",
            ),
            content_type: text("Email Copy"),
            target_audience: text("Both"),
            seo_score: Some(68.0),
            ..Default::default()
        };

        vec![
            Campaign {
                id: CampaignId::from("sample-1"),
                title: guide.content_title.clone().unwrap_or_default(),
                content_type: "Blog Post".to_string(),
                date: day(2025, 2, 18),
                content_data: Some(guide.clone()),
                graphic_data: sample_graphics().first().cloned(),
            },
            Campaign {
                id: CampaignId::from("sample-2"),
                title: tips.content_title.clone().unwrap_or_default(),
                content_type: "Social Post".to_string(),
                date: day(2025, 2, 17),
                content_data: Some(tips),
                graphic_data: None,
            },
            Campaign {
                id: CampaignId::from("sample-3"),
                title: newsletter.content_title.clone().unwrap_or_default(),
                content_type: "Email Copy".to_string(),
                date: day(2025, 2, 15),
                content_data: Some(newsletter),
                graphic_data: None,
            },
        ]
    })
}
