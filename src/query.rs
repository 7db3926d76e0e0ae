// Query Engine - search text + risk tier filter

use crate::record::{Record, RiskTier};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TierFilter {
    #[default]
    All,
    Low,
    Medium,
    High,
}

impl TierFilter {
    pub fn matches(&self, tier: RiskTier) -> bool {
        match self {
            TierFilter::All => true,
            TierFilter::Low => tier == RiskTier::Low,
            TierFilter::Medium => tier == RiskTier::Medium,
            TierFilter::High => tier == RiskTier::High,
        }
    }

    /// all → low → medium → high → all
    pub fn next(&self) -> Self {
        match self {
            TierFilter::All => TierFilter::Low,
            TierFilter::Low => TierFilter::Medium,
            TierFilter::Medium => TierFilter::High,
            TierFilter::High => TierFilter::All,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TierFilter::All => "all",
            TierFilter::Low => "low",
            TierFilter::Medium => "medium",
            TierFilter::High => "high",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            TierFilter::All => "All Risks",
            TierFilter::Low => "Low Risk",
            TierFilter::Medium => "Medium Risk",
            TierFilter::High => "High Risk",
        }
    }
}

impl From<RiskTier> for TierFilter {
    fn from(tier: RiskTier) -> Self {
        match tier {
            RiskTier::Low => TierFilter::Low,
            RiskTier::Medium => TierFilter::Medium,
            RiskTier::High => TierFilter::High,
        }
    }
}

impl fmt::Display for TierFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TierFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(TierFilter::All);
        }
        s.parse::<RiskTier>()
            .map(TierFilter::from)
            .map_err(|_| format!("unknown tier filter '{}' (expected all, low, medium or high)", s))
    }
}

/// Case-insensitive substring match on name or email.
/// An empty search matches every record, including ones with no name/email.
pub fn matches_search(record: &Record, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }

    let needle = search.to_lowercase();
    record.name.to_lowercase().contains(&needle) || record.email.to_lowercase().contains(&needle)
}

/// Records passing both the search and the tier filter, in input order
pub fn filter_records<'a, I>(records: I, search: &str, tier_filter: TierFilter) -> Vec<&'a Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    records
        .into_iter()
        .filter(|record| matches_search(record, search) && tier_filter.matches(record.tier()))
        .collect()
}
