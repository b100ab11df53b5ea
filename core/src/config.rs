//! Run configuration.
//!
//! Defaults carry the reference tuning; a JSON file can override any
//! field. Validation runs once before the first customer — a bad config
//! is a fatal error, never a per-customer one.

use crate::domain::{BusinessLine, RiskTier};
use crate::error::{SimError, SimResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Number of customers to simulate.
    pub customers: usize,

    /// Categorical weights for risk tier assignment at KYC,
    /// indexed Low / Medium / High.
    pub risk_tier_weights: [f64; 3],

    /// Poisson means for transaction batch sizes, indexed
    /// Low / Medium / High. Higher-risk customers transact more,
    /// which is the statistical signature downstream analytics
    /// exercises are meant to find.
    pub batch_size_means: [f64; 3],

    /// Log-normal amount parameters (mu, sigma of the underlying
    /// normal) for the investment-banking line.
    pub amount_mu_investment: f64,
    pub amount_sigma_investment: f64,

    /// Log-normal amount parameters for the retail and international
    /// lines.
    pub amount_mu_retail: f64,
    pub amount_sigma_retail: f64,

    /// Amounts above this mark a transaction suspicious — unless the
    /// customer already sits at the highest risk tier.
    pub suspicious_threshold: f64,

    /// A customer completes once their cumulative transaction count
    /// exceeds this ceiling (~5 years at ~4 per month).
    pub txn_ceiling: u32,

    /// Per-cycle probability of a screening hit.
    pub hit_probability_high: f64,
    pub hit_probability_default: f64,

    /// ISO currency code stamped on every transaction.
    pub currency: String,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            customers: 10,
            risk_tier_weights: [0.6, 0.3, 0.1],
            batch_size_means: [5.0, 10.0, 20.0],
            amount_mu_investment: 10.0,
            amount_sigma_investment: 1.5,
            amount_mu_retail: 5.0,
            amount_sigma_retail: 1.0,
            suspicious_threshold: 50_000.0,
            txn_ceiling: 240,
            hit_probability_high: 0.01,
            hit_probability_default: 0.001,
            currency: "EUR".to_string(),
        }
    }
}

impl SimConfig {
    pub fn from_json_file(path: &str) -> SimResult<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| SimError::Config(format!("cannot read {path}: {e}")))?;
        let config: SimConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Log-normal (mu, sigma) for a business line.
    pub fn amount_params(&self, line: BusinessLine) -> (f64, f64) {
        match line {
            BusinessLine::Gbis => (self.amount_mu_investment, self.amount_sigma_investment),
            BusinessLine::Frb | BusinessLine::Irfs => {
                (self.amount_mu_retail, self.amount_sigma_retail)
            }
        }
    }

    pub fn batch_size_mean(&self, tier: RiskTier) -> f64 {
        self.batch_size_means[tier as usize]
    }

    pub fn hit_probability(&self, tier: RiskTier) -> f64 {
        match tier {
            RiskTier::High => self.hit_probability_high,
            _ => self.hit_probability_default,
        }
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.customers == 0 {
            return Err(SimError::Config("customers must be > 0".into()));
        }
        let weight_sum: f64 = self.risk_tier_weights.iter().sum();
        if (weight_sum - 1.0).abs() > 1e-9 {
            return Err(SimError::Config(format!(
                "risk_tier_weights must sum to 1, got {weight_sum}"
            )));
        }
        if self.risk_tier_weights.iter().any(|w| *w < 0.0) {
            return Err(SimError::Config("risk_tier_weights must be non-negative".into()));
        }
        if self.batch_size_means.iter().any(|m| *m <= 0.0) {
            return Err(SimError::Config("batch_size_means must be positive".into()));
        }
        if !(self.batch_size_means[0] < self.batch_size_means[1]
            && self.batch_size_means[1] < self.batch_size_means[2])
        {
            return Err(SimError::Config(
                "batch_size_means must increase with risk tier".into(),
            ));
        }
        if self.amount_sigma_investment <= 0.0 || self.amount_sigma_retail <= 0.0 {
            return Err(SimError::Config("amount sigma must be positive".into()));
        }
        if self.suspicious_threshold <= 0.0 {
            return Err(SimError::Config("suspicious_threshold must be positive".into()));
        }
        if self.txn_ceiling == 0 {
            return Err(SimError::Config("txn_ceiling must be > 0".into()));
        }
        for p in [self.hit_probability_high, self.hit_probability_default] {
            if !(0.0..=1.0).contains(&p) {
                return Err(SimError::Config(format!("hit probability {p} out of [0, 1]")));
            }
        }
        if self.currency.len() != 3 {
            return Err(SimError::Config(format!(
                "currency must be a 3-letter ISO code, got '{}'",
                self.currency
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        SimConfig::default().validate().unwrap();
    }

    #[test]
    fn rejects_unordered_batch_means() {
        let config = SimConfig {
            batch_size_means: [10.0, 5.0, 20.0],
            ..SimConfig::default()
        };
        assert!(matches!(config.validate(), Err(SimError::Config(_))));
    }

    #[test]
    fn rejects_weights_not_summing_to_one() {
        let config = SimConfig {
            risk_tier_weights: [0.5, 0.3, 0.1],
            ..SimConfig::default()
        };
        assert!(matches!(config.validate(), Err(SimError::Config(_))));
    }

    #[test]
    fn investment_line_amounts_scale_larger() {
        let config = SimConfig::default();
        let (mu_gbis, _) = config.amount_params(BusinessLine::Gbis);
        let (mu_frb, _) = config.amount_params(BusinessLine::Frb);
        assert!(mu_gbis > mu_frb);
    }
}
