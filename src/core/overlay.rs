//! Sample-data overlay: demonstration data shown in place of empty views.
//!
//! The overlay only substitutes what is displayed. It never writes to the
//! campaign store.

use crate::domain::{Campaign, ContentResult, GraphicResult};

use super::samples::{sample_campaigns, sample_content, sample_graphics};
use super::store::{CampaignQuery, CampaignStore};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SampleOverlay {
    enabled: bool,
}

impl SampleOverlay {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Campaign list a query runs over: the demo set only while the store is empty
    pub fn listing<'a>(&self, store: &'a CampaignStore) -> &'a [Campaign] {
        if self.enabled && store.is_empty() {
            sample_campaigns()
        } else {
            store.campaigns()
        }
    }

    pub fn query<'a>(&self, store: &'a CampaignStore, query: &CampaignQuery) -> Vec<&'a Campaign> {
        query.apply(self.listing(store))
    }

    /// Content to display: the session result, else demo content when enabled
    pub fn content<'a>(&self, real: Option<&'a ContentResult>) -> Option<&'a ContentResult> {
        match real {
            Some(content) => Some(content),
            None if self.enabled => Some(sample_content()),
            None => None,
        }
    }

    /// Graphics to display: the session list, else the demo list when enabled
    pub fn graphics<'a>(&self, real: &'a [GraphicResult]) -> &'a [GraphicResult] {
        if self.enabled && real.is_empty() {
            sample_graphics()
        } else {
            real
        }
    }
}
