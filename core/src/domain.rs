//! Domain vocabulary and persisted records.
//!
//! The enums mirror the dataset's fixed vocabularies exactly; `as_str`
//! values are the canonical TEXT stored in SQLite, so they must never
//! change once data has been generated.

use crate::types::CustomerId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ── Vocabulary ───────────────────────────────────────────────────────

/// The bank's three operating divisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BusinessLine {
    /// French Retail Banking.
    Frb,
    /// International Retail and Financial Services.
    Irfs,
    /// Global Banking and Investor Solutions.
    Gbis,
}

impl BusinessLine {
    pub const ALL: [BusinessLine; 3] = [BusinessLine::Frb, BusinessLine::Irfs, BusinessLine::Gbis];

    pub fn as_str(&self) -> &'static str {
        match self {
            BusinessLine::Frb => "FRB",
            BusinessLine::Irfs => "IRFS",
            BusinessLine::Gbis => "GBIS",
        }
    }

    /// The transaction-type vocabulary this division actually uses.
    pub fn transaction_types(&self) -> &'static [TransactionType] {
        use TransactionType::*;
        match self {
            BusinessLine::Frb => &[Deposit, Withdrawal, CardPayment, LoanRepayment],
            BusinessLine::Irfs => &[InternationalTransfer, CurrencyExchange, CardPayment],
            BusinessLine::Gbis => {
                &[SecuritiesTrade, BondPurchase, DerivativesTrade, AssetManagementFee]
            }
        }
    }
}

/// Ordered compliance risk classification. The derived `Ord` follows
/// declaration order: Low < Medium < High.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub const ALL: [RiskTier; 3] = [RiskTier::Low, RiskTier::Medium, RiskTier::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "Low",
            RiskTier::Medium => "Medium",
            RiskTier::High => "High",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScreeningCategory {
    Sanctions,
    Pep,
    NegativeNews,
}

impl ScreeningCategory {
    pub const ALL: [ScreeningCategory; 3] = [
        ScreeningCategory::Sanctions,
        ScreeningCategory::Pep,
        ScreeningCategory::NegativeNews,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScreeningCategory::Sanctions => "Sanctions",
            ScreeningCategory::Pep => "PEP",
            ScreeningCategory::NegativeNews => "NegativeNews",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScreeningOutcome {
    Clear,
    Hit,
    PotentialMatch,
}

impl ScreeningOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScreeningOutcome::Clear => "Clear",
            ScreeningOutcome::Hit => "Hit",
            ScreeningOutcome::PotentialMatch => "Potential Match",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Clear" => Some(ScreeningOutcome::Clear),
            "Hit" => Some(ScreeningOutcome::Hit),
            "Potential Match" => Some(ScreeningOutcome::PotentialMatch),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlagReason {
    SanctionHit,
    SuspiciousTransactionPattern,
}

impl FlagReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlagReason::SanctionHit => "Sanction Hit",
            FlagReason::SuspiciousTransactionPattern => "Suspicious Transaction Pattern",
        }
    }
}

/// Every transaction-type label the dataset can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    CardPayment,
    LoanRepayment,
    InternationalTransfer,
    CurrencyExchange,
    SecuritiesTrade,
    BondPurchase,
    DerivativesTrade,
    AssetManagementFee,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "Deposit",
            TransactionType::Withdrawal => "Withdrawal",
            TransactionType::CardPayment => "Card Payment",
            TransactionType::LoanRepayment => "Loan Repayment",
            TransactionType::InternationalTransfer => "International Transfer",
            TransactionType::CurrencyExchange => "Currency Exchange",
            TransactionType::SecuritiesTrade => "Securities Trade",
            TransactionType::BondPurchase => "Bond Purchase",
            TransactionType::DerivativesTrade => "Derivatives Trade",
            TransactionType::AssetManagementFee => "Asset Management Fee",
        }
    }
}

// ── Suspicion rule ───────────────────────────────────────────────────

/// A transaction is suspicious iff the amount exceeds the threshold
/// while the customer sits below the maximum risk tier. High-risk
/// customers are never auto-flagged on amount alone in this model.
pub fn is_suspicious(amount: f64, tier: RiskTier, threshold: f64) -> bool {
    amount > threshold && tier < RiskTier::High
}

// ── Persisted records ────────────────────────────────────────────────

/// Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub nationality: String,
    pub country_of_residence: String,
    pub business_line: BusinessLine,
    pub created_at: DateTime<Utc>,
}

/// One-to-one with Customer; mutated in place as screenings run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KycRecord {
    pub customer_id: CustomerId,
    pub risk_tier: RiskTier,
    pub identity_verified: bool,
    pub address_verified: bool,
    pub last_screening_date: NaiveDate,
    pub flagged: bool,
}

/// Append-only; never mutated once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningLogEntry {
    pub customer_id: CustomerId,
    pub category: ScreeningCategory,
    pub screening_date: NaiveDate,
    pub outcome: ScreeningOutcome,
    pub detail: String,
}

/// Append-only; dates are monotonically non-decreasing within one
/// customer's timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id: String,
    pub customer_id: CustomerId,
    pub transaction_date: NaiveDate,
    pub amount: f64,
    pub currency: String,
    pub txn_type: TransactionType,
    pub business_line: BusinessLine,
    pub description: String,
    pub is_suspicious: bool,
}

/// At most one per customer; filing one terminates the customer's run.
/// The dataset never simulates actual external reporting, so
/// `reported_to_authorities` stays false.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlaggedReport {
    pub customer_id: CustomerId,
    pub flag_date: NaiveDate,
    pub reason: FlagReason,
    pub reported_to_authorities: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_tiers_are_ordered() {
        assert!(RiskTier::Low < RiskTier::Medium);
        assert!(RiskTier::Medium < RiskTier::High);
    }

    #[test]
    fn high_tier_is_exempt_from_amount_suspicion() {
        // 72,340.50 over a 50,000 threshold: suspicious at Medium,
        // exempt at High.
        assert!(is_suspicious(72_340.50, RiskTier::Medium, 50_000.0));
        assert!(is_suspicious(72_340.50, RiskTier::Low, 50_000.0));
        assert!(!is_suspicious(72_340.50, RiskTier::High, 50_000.0));
    }

    #[test]
    fn threshold_is_exclusive() {
        assert!(!is_suspicious(50_000.0, RiskTier::Low, 50_000.0));
        assert!(is_suspicious(50_000.01, RiskTier::Low, 50_000.0));
    }

    #[test]
    fn screening_outcome_round_trips_through_text() {
        for outcome in [
            ScreeningOutcome::Clear,
            ScreeningOutcome::Hit,
            ScreeningOutcome::PotentialMatch,
        ] {
            assert_eq!(ScreeningOutcome::parse(outcome.as_str()), Some(outcome));
        }
        assert_eq!(ScreeningOutcome::parse("garbage"), None);
    }
}
