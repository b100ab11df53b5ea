//! OmniBanque synthetic dataset generator — core library.
//!
//! Synthesizes a fictional bank's relational dataset (customers, KYC
//! records, screening logs, transactions, flagged reports) by driving a
//! per-customer workflow: onboarding → KYC initialization → repeated
//! (transaction batch, periodic screening) cycles → flagging or
//! completion.
//!
//! RULES:
//!   - All randomness flows through per-customer streams (rng module);
//!     nothing touches a platform RNG.
//!   - Only the store module talks to SQLite; the engine writes through
//!     the Repository trait.
//!   - Customers are fully independent — no shared state between runs.

pub mod clock;
pub mod config;
pub mod domain;
pub mod driver;
pub mod engine;
pub mod error;
pub mod models;
pub mod profile;
pub mod rng;
pub mod store;
pub mod types;
