//! The simulation driver — loops the engine over independent customers.
//!
//! Failure semantics:
//!   - A model error means the transition table itself is corrupted;
//!     the whole run aborts (and verify() makes this fail before the
//!     first customer).
//!   - A storage error aborts only the in-progress customer: the error
//!     is logged, partial rows are left in place, and the driver moves
//!     on. The dataset is synthetic and approximate by nature, so no
//!     rollback is attempted.

use crate::config::SimConfig;
use crate::engine::{CustomerSimulation, Terminal};
use crate::error::{SimError, SimResult};
use crate::models::{AmountSampler, BatchSizeSampler, TransactionChain};
use crate::rng::RngBank;
use crate::store::Repository;
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub requested: usize,
    pub completed: usize,
    pub flagged: usize,
    pub aborted: usize,
    pub transactions: u64,
}

impl RunSummary {
    /// True when every requested customer reached a terminal state.
    pub fn fully_simulated(&self) -> bool {
        self.aborted == 0
    }
}

pub struct SimulationDriver {
    config: SimConfig,
    seed: u64,
}

impl SimulationDriver {
    pub fn new(config: SimConfig, seed: u64) -> Self {
        Self { config, seed }
    }

    /// Run the configured number of customers sequentially. Customers
    /// share nothing: each gets a private RNG stream derived from the
    /// master seed, so a later parallel driver needs no changes here.
    pub fn run<R: Repository>(&self, store: &R) -> SimResult<RunSummary> {
        self.config.validate()?;
        TransactionChain::verify()?;

        let batch_sizes = BatchSizeSampler::new(&self.config)?;
        let amounts = AmountSampler::new(&self.config)?;
        let rng_bank = RngBank::new(self.seed);

        let mut summary = RunSummary {
            requested: self.config.customers,
            ..RunSummary::default()
        };

        for index in 0..self.config.customers {
            let rng = rng_bank.for_customer(index as u64);
            let simulation =
                CustomerSimulation::new(&self.config, store, &batch_sizes, &amounts, rng);

            match simulation.run() {
                Ok(outcome) => {
                    summary.transactions += outcome.transactions as u64;
                    match outcome.terminal {
                        Terminal::Completed => summary.completed += 1,
                        Terminal::Flagged(_) => summary.flagged += 1,
                    }
                }
                Err(err @ SimError::Model { .. }) => return Err(err),
                Err(err) => {
                    log::error!(
                        "customer {}/{} aborted: {err}",
                        index + 1,
                        self.config.customers
                    );
                    summary.aborted += 1;
                }
            }
        }

        log::info!(
            "run finished: {} completed, {} flagged, {} aborted, {} transactions",
            summary.completed,
            summary.flagged,
            summary.aborted,
            summary.transactions
        );
        Ok(summary)
    }
}
