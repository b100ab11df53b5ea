//! The per-customer simulation engine — the heart of the generator.
//!
//! LIFECYCLE (fixed, documented, never reordered):
//!   Created → KycInitialized → Cycling (loops) → Flagged | Completed
//!
//! RULES:
//!   - One engine instance owns exactly one customer's context and RNG
//!     stream for the duration of that customer's run. No state is
//!     shared across customers.
//!   - All persistence goes through the Repository trait.
//!   - The engine has no retry logic: the first storage error aborts
//!     this customer's run and surfaces to the driver.

use crate::clock::SimClock;
use crate::config::SimConfig;
use crate::domain::{
    is_suspicious, BusinessLine, FlagReason, FlaggedReport, KycRecord, RiskTier,
    ScreeningCategory, ScreeningLogEntry, ScreeningOutcome, Transaction,
};
use crate::error::SimResult;
use crate::models::{AmountSampler, BatchSizeSampler, ChainState, TransactionChain};
use crate::profile::ProfileFabricator;
use crate::rng::CustomerRng;
use crate::store::Repository;
use crate::types::CustomerId;
use serde::Serialize;
use uuid::Uuid;

const ONBOARDING_DETAIL: &str = "Initial onboarding screening.";
const ROUTINE_DETAIL: &str = "Routine periodic screening.";
const HIT_DETAIL: &str = "Match found against sanctions list during routine check.";

/// How many recent screening outcomes the flagging step inspects to
/// decide between a sanction-driven and an amount-driven reason.
const FLAG_LOOKBACK: u32 = 2;

/// Everything the state machine threads through one customer's run.
/// Owned exclusively by one engine instance; dropped when the run ends.
#[derive(Debug)]
pub struct CustomerContext {
    pub customer_id: CustomerId,
    pub business_line: BusinessLine,
    pub risk_tier: RiskTier,
    pub clock: SimClock,
    pub last_txn_type: ChainState,
    pub txn_count: u32,
    pub flagged: bool,
}

/// Where a cycle left the customer.
enum CycleExit {
    Continue,
    Flagged,
    BudgetExhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Terminal {
    Completed,
    Flagged(FlagReason),
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomerOutcome {
    pub customer_id: CustomerId,
    pub terminal: Terminal,
    pub transactions: u32,
}

pub struct CustomerSimulation<'a, R: Repository> {
    config: &'a SimConfig,
    store: &'a R,
    batch_sizes: &'a BatchSizeSampler,
    amounts: &'a AmountSampler,
    rng: CustomerRng,
}

impl<'a, R: Repository> CustomerSimulation<'a, R> {
    pub fn new(
        config: &'a SimConfig,
        store: &'a R,
        batch_sizes: &'a BatchSizeSampler,
        amounts: &'a AmountSampler,
        rng: CustomerRng,
    ) -> Self {
        Self {
            config,
            store,
            batch_sizes,
            amounts,
            rng,
        }
    }

    /// Drive one customer from onboarding to a terminal state.
    pub fn run(mut self) -> SimResult<CustomerOutcome> {
        let (customer_id, business_line, clock) = self.onboard()?;
        let mut ctx = self.initialize_kyc(customer_id, business_line, clock)?;

        loop {
            match self.cycle(&mut ctx)? {
                CycleExit::Continue => {}
                CycleExit::Flagged => return self.file_report(&ctx),
                CycleExit::BudgetExhausted => {
                    log::info!(
                        "customer {} completed with {} transactions",
                        ctx.customer_id,
                        ctx.txn_count
                    );
                    return Ok(CustomerOutcome {
                        customer_id: ctx.customer_id,
                        terminal: Terminal::Completed,
                        transactions: ctx.txn_count,
                    });
                }
            }
        }
    }

    /// Created: fabricate an identity, persist the customer row, and
    /// seed the simulated clock in the past.
    fn onboard(&mut self) -> SimResult<(CustomerId, BusinessLine, SimClock)> {
        let line = *self.rng.pick(&BusinessLine::ALL);
        let customer = ProfileFabricator::fabricate(line, &mut self.rng);
        self.store.insert_customer(&customer)?;
        let clock = ProfileFabricator::backdated_clock(&mut self.rng);
        log::debug!(
            "customer {} onboarded: {} {} ({})",
            customer.customer_id,
            customer.first_name,
            customer.last_name,
            line.as_str()
        );
        Ok((customer.customer_id, line, clock))
    }

    /// KycInitialized: assign a risk tier, persist the KYC row, and
    /// write the baseline Clear screening per category — the customer's
    /// compliance history starts before any transaction activity.
    fn initialize_kyc(
        &mut self,
        customer_id: CustomerId,
        business_line: BusinessLine,
        clock: SimClock,
    ) -> SimResult<CustomerContext> {
        let tier_table: Vec<(RiskTier, f64)> = RiskTier::ALL
            .iter()
            .copied()
            .zip(self.config.risk_tier_weights.iter().copied())
            .collect();
        let risk_tier = self.rng.weighted(&tier_table);

        self.store.insert_kyc(&KycRecord {
            customer_id: customer_id.clone(),
            risk_tier,
            // Failed verification is not simulated.
            identity_verified: true,
            address_verified: true,
            last_screening_date: clock.today(),
            flagged: false,
        })?;

        for category in ScreeningCategory::ALL {
            self.store.insert_screening_log(&ScreeningLogEntry {
                customer_id: customer_id.clone(),
                category,
                screening_date: clock.today(),
                outcome: ScreeningOutcome::Clear,
                detail: ONBOARDING_DETAIL.to_string(),
            })?;
        }

        log::debug!("customer {customer_id} KYC initialized at tier {}", risk_tier.as_str());

        Ok(CustomerContext {
            customer_id,
            business_line,
            risk_tier,
            clock,
            last_txn_type: ChainState::Start,
            txn_count: 0,
            flagged: false,
        })
    }

    /// Cycling: one transaction batch, then periodic screening, then
    /// the budget check.
    fn cycle(&mut self, ctx: &mut CustomerContext) -> SimResult<CycleExit> {
        let batch = self.batch_sizes.draw(ctx.risk_tier, &mut self.rng);
        log::debug!("customer {}: batch of {batch}", ctx.customer_id);

        // Reference policy: a suspicious transaction mid-batch does not
        // stop the batch — the remaining units are still generated, and
        // the flagged state takes precedence at cycle end.
        for _ in 0..batch {
            self.generate_transaction(ctx)?;
        }
        if ctx.flagged {
            return Ok(CycleExit::Flagged);
        }

        self.periodic_screening(ctx)?;
        if ctx.flagged {
            return Ok(CycleExit::Flagged);
        }

        if ctx.txn_count > self.config.txn_ceiling {
            return Ok(CycleExit::BudgetExhausted);
        }
        Ok(CycleExit::Continue)
    }

    fn generate_transaction(&mut self, ctx: &mut CustomerContext) -> SimResult<()> {
        let date = ctx.clock.advance(&mut self.rng);
        let txn_type = TransactionChain::next(ctx.last_txn_type, &mut self.rng);
        ctx.last_txn_type = ChainState::Typed(txn_type);

        let amount = self.amounts.draw(ctx.business_line, &mut self.rng);
        let suspicious = is_suspicious(amount, ctx.risk_tier, self.config.suspicious_threshold);

        self.store.insert_transaction(&Transaction {
            transaction_id: Uuid::new_v4().to_string(),
            customer_id: ctx.customer_id.clone(),
            transaction_date: date,
            amount,
            currency: self.config.currency.clone(),
            txn_type,
            business_line: ctx.business_line,
            description: format!(
                "{} via OmniBanque {}",
                txn_type.as_str(),
                ctx.business_line.as_str()
            ),
            is_suspicious: suspicious,
        })?;
        ctx.txn_count += 1;

        // The KYC flag is set-only: once raised it is never cleared
        // within a run.
        if suspicious && !ctx.flagged {
            self.store.update_kyc_flag(&ctx.customer_id, true)?;
            ctx.flagged = true;
            log::debug!(
                "customer {}: suspicious {} of {amount:.2} at tier {}",
                ctx.customer_id,
                txn_type.as_str(),
                ctx.risk_tier.as_str()
            );
        }
        Ok(())
    }

    fn periodic_screening(&mut self, ctx: &mut CustomerContext) -> SimResult<()> {
        let category = *self.rng.pick(&ScreeningCategory::ALL);
        let date = ctx.clock.today();

        if self.rng.chance(self.config.hit_probability(ctx.risk_tier)) {
            self.store.insert_screening_log(&ScreeningLogEntry {
                customer_id: ctx.customer_id.clone(),
                category,
                screening_date: date,
                outcome: ScreeningOutcome::Hit,
                detail: HIT_DETAIL.to_string(),
            })?;
            self.store.update_kyc_flag(&ctx.customer_id, true)?;
            ctx.flagged = true;
            log::debug!(
                "customer {}: screening hit on {}",
                ctx.customer_id,
                category.as_str()
            );
        } else {
            self.store.insert_screening_log(&ScreeningLogEntry {
                customer_id: ctx.customer_id.clone(),
                category,
                screening_date: date,
                outcome: ScreeningOutcome::Clear,
                detail: ROUTINE_DETAIL.to_string(),
            })?;
            self.store.update_kyc_last_screening(&ctx.customer_id, date)?;
        }
        Ok(())
    }

    /// Flagged: file exactly one report and stop. The reason depends on
    /// whether the most recent screenings show a Hit — if not, the flag
    /// was amount-driven.
    fn file_report(&mut self, ctx: &CustomerContext) -> SimResult<CustomerOutcome> {
        let recent = self
            .store
            .recent_screening_results(&ctx.customer_id, FLAG_LOOKBACK)?;
        let reason = if recent.iter().any(|o| *o == ScreeningOutcome::Hit) {
            FlagReason::SanctionHit
        } else {
            FlagReason::SuspiciousTransactionPattern
        };

        self.store.insert_flagged_report(&FlaggedReport {
            customer_id: ctx.customer_id.clone(),
            flag_date: ctx.clock.today(),
            reason,
            reported_to_authorities: false,
        })?;
        log::info!(
            "customer {} flagged after {} transactions: {}",
            ctx.customer_id,
            ctx.txn_count,
            reason.as_str()
        );

        Ok(CustomerOutcome {
            customer_id: ctx.customer_id.clone(),
            terminal: Terminal::Flagged(reason),
            transactions: ctx.txn_count,
        })
    }
}
