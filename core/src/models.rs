//! The three probabilistic models behind the event stream.
//!
//! - A first-order Markov chain over transaction types.
//! - A Poisson batch-size sampler keyed by risk tier.
//! - A log-normal amount sampler keyed by business line.
//!
//! RULE: the transition table is a total function over `ChainState` —
//! there is no string-keyed lookup that can miss at runtime. `verify()`
//! additionally checks every row's probabilities at startup so a bad
//! edit to the table fails the whole run before any customer is touched.

use crate::config::SimConfig;
use crate::domain::{BusinessLine, RiskTier, TransactionType};
use crate::error::{SimError, SimResult};
use crate::rng::CustomerRng;
use rand_distr::{LogNormal, Poisson};

/// Current position in the transaction-type chain. `Start` is used
/// exactly once per customer, immediately after KYC initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainState {
    Start,
    Typed(TransactionType),
}

impl ChainState {
    pub const ALL: [ChainState; 11] = [
        ChainState::Start,
        ChainState::Typed(TransactionType::Deposit),
        ChainState::Typed(TransactionType::Withdrawal),
        ChainState::Typed(TransactionType::CardPayment),
        ChainState::Typed(TransactionType::LoanRepayment),
        ChainState::Typed(TransactionType::InternationalTransfer),
        ChainState::Typed(TransactionType::CurrencyExchange),
        ChainState::Typed(TransactionType::SecuritiesTrade),
        ChainState::Typed(TransactionType::BondPurchase),
        ChainState::Typed(TransactionType::DerivativesTrade),
        ChainState::Typed(TransactionType::AssetManagementFee),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChainState::Start => "start",
            ChainState::Typed(t) => t.as_str(),
        }
    }
}

/// First-order Markov chain over transaction types.
///
/// The table partitions into a domestic/retail cluster and an
/// investment/markets cluster, bridged by the cross-border pair
/// (international transfers and currency exchange).
pub struct TransactionChain;

impl TransactionChain {
    /// The transition row for a state. Total by construction: every
    /// `ChainState` has an arm.
    pub fn row(state: ChainState) -> &'static [(TransactionType, f64)] {
        use TransactionType::*;
        match state {
            ChainState::Start => {
                &[(Deposit, 0.4), (InternationalTransfer, 0.3), (SecuritiesTrade, 0.3)]
            }

            // Domestic / retail cluster.
            ChainState::Typed(Deposit) => &[(Withdrawal, 0.5), (CardPayment, 0.5)],
            ChainState::Typed(Withdrawal) => &[(Deposit, 0.3), (CardPayment, 0.7)],
            ChainState::Typed(CardPayment) => {
                &[(CardPayment, 0.6), (Deposit, 0.2), (Withdrawal, 0.2)]
            }
            ChainState::Typed(LoanRepayment) => &[(CardPayment, 1.0)],

            // Cross-border bridge.
            ChainState::Typed(InternationalTransfer) => {
                &[(CurrencyExchange, 0.8), (CardPayment, 0.2)]
            }
            ChainState::Typed(CurrencyExchange) => {
                &[(InternationalTransfer, 0.5), (SecuritiesTrade, 0.5)]
            }

            // Investment / markets cluster.
            ChainState::Typed(SecuritiesTrade) => {
                &[(BondPurchase, 0.6), (DerivativesTrade, 0.3), (AssetManagementFee, 0.1)]
            }
            ChainState::Typed(BondPurchase) => {
                &[(SecuritiesTrade, 0.7), (AssetManagementFee, 0.3)]
            }
            ChainState::Typed(DerivativesTrade) => {
                &[(SecuritiesTrade, 0.9), (AssetManagementFee, 0.1)]
            }
            ChainState::Typed(AssetManagementFee) => &[(SecuritiesTrade, 1.0)],
        }
    }

    /// Startup check: every row non-empty, weights positive, sum 1.
    pub fn verify() -> SimResult<()> {
        for state in ChainState::ALL {
            let row = Self::row(state);
            if row.is_empty() {
                return Err(SimError::Model {
                    state: state.as_str().to_string(),
                    detail: "empty transition row".to_string(),
                });
            }
            if row.iter().any(|(_, w)| *w <= 0.0) {
                return Err(SimError::Model {
                    state: state.as_str().to_string(),
                    detail: "non-positive transition weight".to_string(),
                });
            }
            let sum: f64 = row.iter().map(|(_, w)| w).sum();
            if (sum - 1.0).abs() > 1e-9 {
                return Err(SimError::Model {
                    state: state.as_str().to_string(),
                    detail: format!("row sums to {sum}, expected 1"),
                });
            }
        }
        Ok(())
    }

    /// Single weighted draw; no memory beyond the current state.
    pub fn next(state: ChainState, rng: &mut CustomerRng) -> TransactionType {
        rng.weighted(Self::row(state))
    }
}

/// Poisson-distributed batch sizes, mean keyed by risk tier.
/// A draw of 0 is valid and simply produces no transactions that cycle.
pub struct BatchSizeSampler {
    by_tier: [Poisson<f64>; 3],
}

impl BatchSizeSampler {
    pub fn new(config: &SimConfig) -> SimResult<Self> {
        let build = |tier: RiskTier| {
            Poisson::new(config.batch_size_mean(tier)).map_err(|e| {
                SimError::Config(format!("batch mean for {}: {e}", tier.as_str()))
            })
        };
        Ok(Self {
            by_tier: [
                build(RiskTier::Low)?,
                build(RiskTier::Medium)?,
                build(RiskTier::High)?,
            ],
        })
    }

    pub fn draw(&self, tier: RiskTier, rng: &mut CustomerRng) -> u32 {
        rng.sample(&self.by_tier[tier as usize]) as u32
    }
}

/// Log-normal amounts, parameters keyed by business line, rounded to
/// currency-minor-unit precision.
pub struct AmountSampler {
    investment: LogNormal<f64>,
    retail: LogNormal<f64>,
}

impl AmountSampler {
    pub fn new(config: &SimConfig) -> SimResult<Self> {
        let build = |(mu, sigma): (f64, f64)| {
            LogNormal::new(mu, sigma)
                .map_err(|e| SimError::Config(format!("log-normal({mu}, {sigma}): {e}")))
        };
        Ok(Self {
            investment: build(config.amount_params(BusinessLine::Gbis))?,
            retail: build(config.amount_params(BusinessLine::Frb))?,
        })
    }

    pub fn draw(&self, line: BusinessLine, rng: &mut CustomerRng) -> f64 {
        let dist = match line {
            BusinessLine::Gbis => &self.investment,
            BusinessLine::Frb | BusinessLine::Irfs => &self.retail,
        };
        let raw: f64 = rng.sample(dist);
        // Round to cents; floor at one cent so rounding can never
        // produce a non-positive amount.
        ((raw * 100.0).round() / 100.0).max(0.01)
    }
}
