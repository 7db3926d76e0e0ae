// Record Model - applicant records as the console sees them
// Raw rows come in with every field optional; Record::from_raw resolves
// defaults once so the rest of the pipeline can assume populated fields.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Risk score assumed when the upstream model produced none
pub const DEFAULT_RISK_SCORE: f64 = 50.0;

/// Lower bound (inclusive) of the medium tier
pub const MEDIUM_TIER_FLOOR: f64 = 40.0;

/// Lower bound (inclusive) of the high tier
pub const HIGH_TIER_FLOOR: f64 = 70.0;

// ============================================================================
// RISK TIER
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub const ALL: [RiskTier; 3] = [RiskTier::Low, RiskTier::Medium, RiskTier::High];

    /// The one threshold table: [0,40) low, [40,70) medium, [70,100] high
    pub fn from_score(score: f64) -> Self {
        if score < MEDIUM_TIER_FLOOR {
            RiskTier::Low
        } else if score < HIGH_TIER_FLOOR {
            RiskTier::Medium
        } else {
            RiskTier::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Medium => "medium",
            RiskTier::High => "high",
        }
    }

    /// Badge label shown in tables and the detail panel
    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::Low => "Low",
            RiskTier::Medium => "Medium",
            RiskTier::High => "High",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(RiskTier::Low),
            "medium" => Ok(RiskTier::Medium),
            "high" => Ok(RiskTier::High),
            other => Err(format!(
                "unknown risk tier '{}' (expected low, medium or high)",
                other
            )),
        }
    }
}

// ============================================================================
// EMPLOYMENT STATUS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmploymentStatus {
    Employed,
    SelfEmployed,
    Unemployed,
    Unknown,
}

impl EmploymentStatus {
    /// Lenient parse: anything unrecognized maps to Unknown
    pub fn parse(text: &str) -> Self {
        let normalized: String = text
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .collect();

        match normalized.as_str() {
            "employed" => EmploymentStatus::Employed,
            "selfemployed" => EmploymentStatus::SelfEmployed,
            "unemployed" => EmploymentStatus::Unemployed,
            _ => EmploymentStatus::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EmploymentStatus::Employed => "Employed",
            EmploymentStatus::SelfEmployed => "Self-Employed",
            EmploymentStatus::Unemployed => "Unemployed",
            EmploymentStatus::Unknown => "Unknown",
        }
    }
}

// ============================================================================
// RAW RECORD (as delivered by the data feed)
// ============================================================================

/// One row of the record feed before normalization.
/// Field names follow the feed, which mixes lowercase and PascalCase keys.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawRecord {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(rename = "AnnualIncome", default)]
    pub annual_income: Option<f64>,

    #[serde(rename = "LoanAmount", default)]
    pub loan_amount: Option<f64>,

    #[serde(rename = "LengthOfCreditHistory", default)]
    pub length_of_credit_history: Option<f64>,

    #[serde(rename = "DebtToIncomeRatio", default)]
    pub debt_to_income_ratio: Option<f64>,

    #[serde(rename = "EmploymentStatus", default)]
    pub employment_status: Option<String>,

    #[serde(rename = "RiskScore", default)]
    pub risk_score: Option<f64>,
}

// ============================================================================
// RECORD (normalized, immutable)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub name: String,
    pub email: String,
    pub annual_income: f64,
    pub loan_amount: f64,
    /// Years of credit history
    pub credit_history_years: f64,
    pub debt_to_income: Option<f64>,
    pub employment_status: Option<EmploymentStatus>,
    pub risk_score: f64,
}

impl Record {
    /// Resolve every default in one place
    pub fn from_raw(raw: RawRecord) -> Self {
        Record {
            name: raw.name.unwrap_or_default(),
            email: raw.email.unwrap_or_default(),
            annual_income: non_negative(raw.annual_income),
            loan_amount: non_negative(raw.loan_amount),
            credit_history_years: non_negative(raw.length_of_credit_history),
            debt_to_income: raw
                .debt_to_income_ratio
                .filter(|r| r.is_finite())
                .map(|r| r.clamp(0.0, 1.0)),
            employment_status: raw
                .employment_status
                .as_deref()
                .map(EmploymentStatus::parse),
            risk_score: raw
                .risk_score
                .filter(|s| s.is_finite())
                .map(|s| s.clamp(0.0, 100.0))
                .unwrap_or(DEFAULT_RISK_SCORE),
        }
    }

    pub fn tier(&self) -> RiskTier {
        RiskTier::from_score(self.risk_score)
    }
}

impl From<RawRecord> for Record {
    fn from(raw: RawRecord) -> Self {
        Record::from_raw(raw)
    }
}

fn non_negative(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}
