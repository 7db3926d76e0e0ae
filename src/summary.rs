// Aggregator - dashboard overview numbers
//
// The global summary always covers the whole store. It must not move while
// the operator types a search, so it never takes the filtered sequence.

use crate::record::{Record, RiskTier};
use crate::store::RecordStore;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierDistribution {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

impl TierDistribution {
    pub fn add(&mut self, tier: RiskTier) {
        match tier {
            RiskTier::Low => self.low += 1,
            RiskTier::Medium => self.medium += 1,
            RiskTier::High => self.high += 1,
        }
    }

    pub fn count(&self, tier: RiskTier) -> usize {
        match tier {
            RiskTier::Low => self.low,
            RiskTier::Medium => self.medium,
            RiskTier::High => self.high,
        }
    }

    pub fn total(&self) -> usize {
        self.low + self.medium + self.high
    }

    /// Percent of records in `tier`; 0 when empty
    pub fn share(&self, tier: RiskTier) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.count(tier) as f64 / total as f64 * 100.0
    }

    /// Share of each tier in percent as (low, medium, high)
    pub fn percentages(&self) -> (f64, f64, f64) {
        (
            self.share(RiskTier::Low),
            self.share(RiskTier::Medium),
            self.share(RiskTier::High),
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalSummary {
    pub total: usize,
    pub mean_income: f64,
    pub mean_loan: f64,
    pub tier_distribution: TierDistribution,
}

impl GlobalSummary {
    pub fn of_store(store: &RecordStore) -> Self {
        summarize(store.records())
    }

}

pub fn summarize(records: &[Record]) -> GlobalSummary {
    let mut distribution = TierDistribution::default();
    let mut income_sum = 0.0;
    let mut loan_sum = 0.0;

    for record in records {
        income_sum += record.annual_income;
        loan_sum += record.loan_amount;
        distribution.add(record.tier());
    }

    GlobalSummary {
        total: records.len(),
        mean_income: mean(income_sum, records.len()),
        mean_loan: mean(loan_sum, records.len()),
        tier_distribution: distribution,
    }
}

/// Empty input averages to 0, never NaN
fn mean(sum: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RawRecord;

    fn create_test_record(score: Option<f64>, income: f64, loan: f64) -> Record {
        Record::from_raw(RawRecord {
            annual_income: Some(income),
            loan_amount: Some(loan),
            risk_score: score,
            ..Default::default()
        })
    }

    #[test]
    fn test_empty_store_summary_is_all_zero() {
        let summary = summarize(&[]);

        assert_eq!(summary.total, 0);
        assert_eq!(summary.mean_income, 0.0);
        assert_eq!(summary.mean_loan, 0.0);
        assert_eq!(summary.tier_distribution, TierDistribution::default());
        assert_eq!(summary.tier_distribution.percentages(), (0.0, 0.0, 0.0));
    }

    #[test]
    fn test_means_and_distribution() {
        let records = vec![
            create_test_record(Some(30.0), 50000.0, 10000.0),
            create_test_record(Some(55.0), 80000.0, 20000.0),
            create_test_record(Some(85.0), 30000.0, 5000.0),
        ];

        let summary = summarize(&records);

        assert_eq!(summary.total, 3);
        assert!((summary.mean_income - 53333.33).abs() < 0.01);
        assert!((summary.mean_loan - 11666.67).abs() < 0.01);
        assert_eq!(
            summary.tier_distribution,
            TierDistribution { low: 1, medium: 1, high: 1 }
        );
    }

    #[test]
    fn test_missing_score_counts_as_medium() {
        let records = vec![create_test_record(None, 0.0, 0.0)];
        let summary = summarize(&records);
        assert_eq!(summary.tier_distribution.medium, 1);
        assert_eq!(summary.tier_distribution.count(RiskTier::Medium), 1);
    }

    #[test]
    fn test_percentages() {
        let distribution = TierDistribution { low: 1, medium: 1, high: 2 };
        assert_eq!(distribution.percentages(), (25.0, 25.0, 50.0));
    }

    #[test]
    fn test_tier_counts_and_shares_cover_every_tier() {
        let distribution = TierDistribution { low: 3, medium: 0, high: 1 };

        let counts: Vec<usize> = RiskTier::ALL
            .iter()
            .map(|tier| distribution.count(*tier))
            .collect();
        assert_eq!(counts, vec![3, 0, 1]);
        assert_eq!(counts.iter().sum::<usize>(), distribution.total());

        let shares: f64 = RiskTier::ALL.iter().map(|tier| distribution.share(*tier)).sum();
        assert!((shares - 100.0).abs() < 1e-9);
        assert_eq!(distribution.share(RiskTier::High), 25.0);
        assert_eq!(TierDistribution::default().share(RiskTier::Low), 0.0);
    }
}
