//! Read-mostly template price cache
//!
//! Valuation itself happens outside the engine; whatever computes rouble
//! prices parks them here so later lookups stay in memory. The cache is
//! plain state with no persistence and no invalidation policy.

use indexmap::IndexMap;
use restash_core::TemplateId;

/// In-memory map of template id to rouble price
#[derive(Debug, Clone, Default)]
pub struct PriceCache {
    prices: IndexMap<TemplateId, u64>,
}

impl PriceCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the cached price for a template
    pub fn get(&self, tpl: &TemplateId) -> Option<u64> {
        self.prices.get(tpl).copied()
    }

    /// Record a price, replacing any previous value for the template
    pub fn insert(&mut self, tpl: TemplateId, price: u64) {
        self.prices.insert(tpl, price);
    }

    /// Record a batch of prices
    pub fn extend(&mut self, entries: impl IntoIterator<Item = (TemplateId, u64)>) {
        self.prices.extend(entries);
    }

    /// Number of cached templates
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// Whether the cache holds no prices
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Drop every cached price
    pub fn clear(&mut self) {
        self.prices.clear();
    }
}
