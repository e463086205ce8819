//! Campaign store: newest-first campaign history with snapshot persistence.
//!
//! Persistence is best-effort. Load and save failures are logged and
//! swallowed; the in-memory list stays authoritative for the session.
//! Records that cannot be decoded are carried along untouched and written
//! back on every save, so a load never loses a stored campaign.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::{Campaign, CampaignId, GraphicResult};

use super::storage::SnapshotStorage;

/// Storage key holding the campaign snapshot
pub const CAMPAIGNS_KEY: &str = "campaigns";

/// Wildcard accepted by the content-type filter
pub const ALL_CONTENT_TYPES: &str = "All";

/// Content-type half of a campaign query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ContentTypeFilter {
    #[default]
    All,
    /// Exact, case-sensitive match on `content_type`
    Exactly(String),
}

impl ContentTypeFilter {
    pub fn matches(&self, content_type: &str) -> bool {
        match self {
            ContentTypeFilter::All => true,
            ContentTypeFilter::Exactly(wanted) => wanted == content_type,
        }
    }
}

impl From<&str> for ContentTypeFilter {
    fn from(s: &str) -> Self {
        if s == ALL_CONTENT_TYPES {
            ContentTypeFilter::All
        } else {
            ContentTypeFilter::Exactly(s.to_string())
        }
    }
}

/// Search text plus content-type filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CampaignQuery {
    pub search: String,
    pub content_type: ContentTypeFilter,
}

impl CampaignQuery {
    pub fn new(search: impl Into<String>, content_type: impl Into<ContentTypeFilter>) -> Self {
        Self {
            search: search.into(),
            content_type: content_type.into(),
        }
    }

    /// Everything, in store order
    pub fn all() -> Self {
        Self::default()
    }

    pub fn matches(&self, campaign: &Campaign) -> bool {
        let matches_search = self.search.is_empty()
            || campaign
                .title
                .to_lowercase()
                .contains(&self.search.to_lowercase());
        matches_search && self.content_type.matches(&campaign.content_type)
    }

    /// Matching campaigns, preserving the order of `campaigns`
    pub fn apply<'a>(&self, campaigns: &'a [Campaign]) -> Vec<&'a Campaign> {
        campaigns.iter().filter(|c| self.matches(c)).collect()
    }
}

/// Ordered campaign history (index 0 is the most recent)
pub struct CampaignStore {
    campaigns: Vec<Campaign>,
    /// Snapshot records that did not decode, kept verbatim
    unreadable: Vec<Value>,
    storage: Arc<dyn SnapshotStorage>,
}

impl CampaignStore {
    /// Create an empty store; call [`CampaignStore::load`] to restore a snapshot
    pub fn new(storage: Arc<dyn SnapshotStorage>) -> Self {
        Self {
            campaigns: Vec::new(),
            unreadable: Vec::new(),
            storage,
        }
    }

    /// Create a store and restore the persisted snapshot
    pub fn open(storage: Arc<dyn SnapshotStorage>) -> Self {
        let mut store = Self::new(storage);
        store.load();
        store
    }

    /// Restore from storage. Failures leave the current list untouched.
    pub fn load(&mut self) {
        let raw = match self.storage.read(CAMPAIGNS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No campaign snapshot found");
                self.campaigns.clear();
                self.unreadable.clear();
                return;
            }
            Err(e) => {
                warn!(error = %e, "Failed to read campaign snapshot");
                return;
            }
        };

        match parse_snapshot(&raw) {
            Some(snapshot) => {
                debug!(
                    count = snapshot.campaigns.len(),
                    unreadable = snapshot.unreadable.len(),
                    "Loaded campaign snapshot"
                );
                self.campaigns = snapshot.campaigns;
                self.unreadable = snapshot.unreadable;
            }
            None => warn!("Campaign snapshot is not a list, ignoring it"),
        }
    }

    /// Persist the current list. Failures are logged and ignored.
    pub fn save(&self) {
        let mut records = Vec::with_capacity(self.campaigns.len() + self.unreadable.len());
        for campaign in &self.campaigns {
            match serde_json::to_value(campaign) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(error = %e, campaign_id = %campaign.id, "Failed to serialize campaign");
                    return;
                }
            }
        }
        records.extend(self.unreadable.iter().cloned());

        let json = match serde_json::to_string(&records) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "Failed to serialize campaigns");
                return;
            }
        };

        if let Err(e) = self.storage.write(CAMPAIGNS_KEY, &json) {
            warn!(error = %e, "Failed to write campaign snapshot");
        }
    }

    /// Insert at position 0 and persist
    pub fn append(&mut self, campaign: Campaign) {
        self.campaigns.insert(0, campaign);
        self.save();
    }

    /// Overwrite the graphic of the most recent campaign.
    ///
    /// Returns the id of the updated campaign; `None` if the store is empty.
    pub fn attach_graphic(&mut self, graphic: GraphicResult) -> Option<CampaignId> {
        let latest = self.campaigns.first_mut()?;
        latest.graphic_data = Some(graphic);
        let id = latest.id.clone();
        self.save();
        Some(id)
    }

    /// Overwrite the graphic of a specific campaign. Returns false if unknown.
    pub fn attach_graphic_to(&mut self, id: &CampaignId, graphic: GraphicResult) -> bool {
        let Some(campaign) = self.campaigns.iter_mut().find(|c| &c.id == id) else {
            return false;
        };
        campaign.graphic_data = Some(graphic);
        self.save();
        true
    }

    pub fn get(&self, id: &CampaignId) -> Option<&Campaign> {
        self.campaigns.iter().find(|c| &c.id == id)
    }

    /// Most recent campaign
    pub fn latest(&self) -> Option<&Campaign> {
        self.campaigns.first()
    }

    pub fn query(&self, query: &CampaignQuery) -> Vec<&Campaign> {
        query.apply(&self.campaigns)
    }

    pub fn campaigns(&self) -> &[Campaign] {
        &self.campaigns
    }

    pub fn len(&self) -> usize {
        self.campaigns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.campaigns.is_empty()
    }

    /// Stored records that could not be decoded (written back after the campaigns)
    pub fn unreadable(&self) -> &[Value] {
        &self.unreadable
    }
}

/// Decoded snapshot
struct Snapshot {
    campaigns: Vec<Campaign>,
    unreadable: Vec<Value>,
}

/// Permissive snapshot parse.
///
/// `None` if the snapshot is not a JSON list. Records that fail to decode are
/// set aside verbatim.
fn parse_snapshot(raw: &str) -> Option<Snapshot> {
    let Ok(Value::Array(records)) = serde_json::from_str::<Value>(raw) else {
        return None;
    };

    let mut snapshot = Snapshot {
        campaigns: Vec::with_capacity(records.len()),
        unreadable: Vec::new(),
    };
    for record in records {
        match Campaign::deserialize(&record) {
            Ok(campaign) => snapshot.campaigns.push(campaign),
            Err(e) => {
                warn!(error = %e, "Keeping unreadable campaign record as-is");
                snapshot.unreadable.push(record);
            }
        }
    }

    Some(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::storage::MemoryStorage;
    use crate::domain::ContentResult;

    fn campaign(title: &str, content_type: &str) -> Campaign {
        Campaign::new(title, content_type, ContentResult::default())
    }

    fn store() -> (CampaignStore, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        (CampaignStore::new(storage.clone()), storage)
    }

    #[test]
    fn test_append_is_newest_first() {
        let (mut store, _) = store();
        store.append(campaign("first", "Blog Post"));
        store.append(campaign("second", "Blog Post"));
        store.append(campaign("third", "Blog Post"));

        let titles: Vec<_> = store.campaigns().iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["third", "second", "first"]);
    }

    #[test]
    fn test_unreadable_records_are_written_back() {
        let (_, storage) = store();
        storage
            .write(CAMPAIGNS_KEY, r#"[{"id": "x", "date": "someday", "note": "keep me"}]"#)
            .unwrap();

        let mut store = CampaignStore::open(storage.clone());
        assert!(store.is_empty());
        assert_eq!(store.unreadable().len(), 1);

        store.append(campaign("new", "Blog Post"));
        let saved: Vec<Value> = serde_json::from_str(&storage.get(CAMPAIGNS_KEY).unwrap()).unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0]["title"], "new");
        assert_eq!(saved[1]["note"], "keep me");
    }

    #[test]
    fn test_append_persists() {
        let (mut store, storage) = store();
        store.append(campaign("saved", "Blog Post"));

        let raw = storage.get(CAMPAIGNS_KEY).unwrap();
        assert!(raw.contains("\"saved\""));
    }

    #[test]
    fn test_attach_graphic_targets_slot_zero() {
        let (mut store, _) = store();
        store.append(campaign("older", "Blog Post"));
        store.append(campaign("newer", "Blog Post"));

        let graphic = GraphicResult {
            graphic_title: Some("Banner".to_string()),
            ..Default::default()
        };
        let id = store.attach_graphic(graphic.clone()).unwrap();

        assert_eq!(&id, &store.campaigns()[0].id);
        assert_eq!(store.campaigns()[0].graphic_data.as_ref(), Some(&graphic));
        assert!(store.campaigns()[1].graphic_data.is_none());
    }

    #[test]
    fn test_attach_graphic_on_empty_store() {
        let (mut store, storage) = store();
        assert!(store.attach_graphic(GraphicResult::default()).is_none());
        assert!(storage.get(CAMPAIGNS_KEY).is_none());
    }

    #[test]
    fn test_attach_graphic_to_specific_campaign() {
        let (mut store, _) = store();
        store.append(campaign("older", "Blog Post"));
        let older = store.campaigns()[0].id.clone();
        store.append(campaign("newer", "Blog Post"));

        assert!(store.attach_graphic_to(&older, GraphicResult::default()));
        assert!(store.get(&older).unwrap().has_graphic());
        assert!(!store.latest().unwrap().has_graphic());

        assert!(!store.attach_graphic_to(&CampaignId::from("missing"), GraphicResult::default()));
    }

    #[test]
    fn test_query_semantics() {
        let (mut store, _) = store();
        store.append(campaign("The Ultimate Guide to Staging", "Blog Post"));
        store.append(campaign("Weekend open house", "Social Post"));

        let guide = store.query(&CampaignQuery::new("GUIDE", ALL_CONTENT_TYPES));
        assert_eq!(guide.len(), 1);
        assert_eq!(guide[0].title, "The Ultimate Guide to Staging");

        let social = store.query(&CampaignQuery::new("", "Social Post"));
        assert_eq!(social.len(), 1);
        assert_eq!(social[0].content_type, "Social Post");

        // Type filter is exact
        assert!(store.query(&CampaignQuery::new("", "social post")).is_empty());
        assert_eq!(store.query(&CampaignQuery::all()).len(), 2);
    }

    #[test]
    fn test_parse_snapshot_sets_bad_records_aside() {
        let raw = r#"[
            {"id": "a", "title": "ok", "content_type": "Blog Post", "date": "2025-01-02", "contentData": null, "graphicData": null},
            {"id": "b", "title": "no date"},
            "garbage"
        ]"#;
        let snapshot = parse_snapshot(raw).unwrap();
        assert_eq!(snapshot.campaigns.len(), 1);
        assert_eq!(snapshot.campaigns[0].id.as_str(), "a");
        assert_eq!(snapshot.unreadable.len(), 2);
        assert_eq!(snapshot.unreadable[1], Value::String("garbage".to_string()));

        assert!(parse_snapshot(r#"{"not": "a list"}"#).is_none());
        assert!(parse_snapshot("not json").is_none());
    }
}
