//! Persistence layer.
//!
//! RULE: Only this module talks to the database. The engine consumes
//! the `Repository` trait and never executes SQL directly.
//!
//! Every operation is atomic with respect to its own row; the engine
//! never needs a multi-row transaction. The one read the engine does —
//! the most recent screening outcomes — observes this connection's own
//! writes immediately, which the flagging step relies on.

use crate::domain::{
    Customer, FlaggedReport, KycRecord, ScreeningLogEntry, ScreeningOutcome, Transaction,
};
use crate::error::{SimError, SimResult};
use crate::types::CustomerId;
use anyhow::anyhow;
use chrono::NaiveDate;
use rusqlite::{params, Connection};

/// The abstract repository the simulation engine writes through.
pub trait Repository {
    fn insert_customer(&self, customer: &Customer) -> SimResult<()>;
    fn insert_kyc(&self, kyc: &KycRecord) -> SimResult<()>;
    fn update_kyc_flag(&self, customer_id: &str, flagged: bool) -> SimResult<()>;
    fn update_kyc_last_screening(&self, customer_id: &str, date: NaiveDate) -> SimResult<()>;
    fn insert_screening_log(&self, entry: &ScreeningLogEntry) -> SimResult<()>;
    fn insert_transaction(&self, txn: &Transaction) -> SimResult<()>;
    fn insert_flagged_report(&self, report: &FlaggedReport) -> SimResult<()>;

    /// The n most recent screening outcomes for a customer, newest first.
    fn recent_screening_results(
        &self,
        customer_id: &str,
        n: u32,
    ) -> SimResult<Vec<ScreeningOutcome>>;
}

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the dataset database at `path`.
    pub fn open(path: &str) -> SimResult<Self> {
        let conn = Connection::open(path)?;
        // WAL only applies to real files; ignore failure for :memory:.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> SimResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> SimResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_foundation.sql"))?;
        Ok(())
    }
}

impl Repository for SqliteStore {
    fn insert_customer(&self, c: &Customer) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO customer (
                customer_id, first_name, last_name, date_of_birth,
                nationality, country_of_residence, business_line, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                &c.customer_id,
                &c.first_name,
                &c.last_name,
                c.date_of_birth.to_string(),
                &c.nationality,
                &c.country_of_residence,
                c.business_line.as_str(),
                c.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn insert_kyc(&self, k: &KycRecord) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO kyc (
                customer_id, risk_tier, identity_verified, address_verified,
                last_screening_date, is_flagged
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                &k.customer_id,
                k.risk_tier.as_str(),
                k.identity_verified as i64,
                k.address_verified as i64,
                k.last_screening_date.to_string(),
                k.flagged as i64,
            ],
        )?;
        Ok(())
    }

    fn update_kyc_flag(&self, customer_id: &str, flagged: bool) -> SimResult<()> {
        self.conn.execute(
            "UPDATE kyc SET is_flagged = ?1 WHERE customer_id = ?2",
            params![flagged as i64, customer_id],
        )?;
        Ok(())
    }

    fn update_kyc_last_screening(&self, customer_id: &str, date: NaiveDate) -> SimResult<()> {
        self.conn.execute(
            "UPDATE kyc SET last_screening_date = ?1 WHERE customer_id = ?2",
            params![date.to_string(), customer_id],
        )?;
        Ok(())
    }

    fn insert_screening_log(&self, entry: &ScreeningLogEntry) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO screening_log (
                customer_id, category, screening_date, outcome, detail
             ) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                &entry.customer_id,
                entry.category.as_str(),
                entry.screening_date.to_string(),
                entry.outcome.as_str(),
                &entry.detail,
            ],
        )?;
        Ok(())
    }

    fn insert_transaction(&self, t: &Transaction) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO txn (
                transaction_id, customer_id, transaction_date, amount,
                currency, txn_type, business_line, description, is_suspicious
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                &t.transaction_id,
                &t.customer_id,
                t.transaction_date.to_string(),
                t.amount,
                &t.currency,
                t.txn_type.as_str(),
                t.business_line.as_str(),
                &t.description,
                t.is_suspicious as i64,
            ],
        )?;
        Ok(())
    }

    fn insert_flagged_report(&self, r: &FlaggedReport) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO flagged_report (
                customer_id, flag_date, reason, reported_to_authorities
             ) VALUES (?1, ?2, ?3, ?4)",
            params![
                &r.customer_id,
                r.flag_date.to_string(),
                r.reason.as_str(),
                r.reported_to_authorities as i64,
            ],
        )?;
        Ok(())
    }

    fn recent_screening_results(
        &self,
        customer_id: &str,
        n: u32,
    ) -> SimResult<Vec<ScreeningOutcome>> {
        let mut stmt = self.conn.prepare(
            "SELECT outcome FROM screening_log
             WHERE customer_id = ?1
             ORDER BY log_id DESC LIMIT ?2",
        )?;
        let raw = stmt
            .query_map(params![customer_id, n as i64], |row| {
                row.get::<_, String>(0)
            })?
            .collect::<Result<Vec<_>, _>>()?;
        raw.into_iter()
            .map(|s| {
                ScreeningOutcome::parse(&s)
                    .ok_or_else(|| SimError::Other(anyhow!("unknown screening outcome '{s}'")))
            })
            .collect()
    }
}

// ── Read-back rows for summaries and tests ───────────────────────────

#[derive(Debug, Clone)]
pub struct KycRow {
    pub customer_id: CustomerId,
    pub risk_tier: String,
    pub identity_verified: bool,
    pub address_verified: bool,
    pub last_screening_date: String,
    pub is_flagged: bool,
}

#[derive(Debug, Clone)]
pub struct ScreeningRow {
    pub category: String,
    pub screening_date: String,
    pub outcome: String,
    pub detail: String,
}

#[derive(Debug, Clone)]
pub struct TxnRow {
    pub transaction_date: String,
    pub amount: f64,
    pub currency: String,
    pub txn_type: String,
    pub is_suspicious: bool,
}

#[derive(Debug, Clone)]
pub struct ReportRow {
    pub reason: String,
    pub reported_to_authorities: bool,
}

impl SqliteStore {
    pub fn customer_ids(&self) -> SimResult<Vec<CustomerId>> {
        let mut stmt = self
            .conn
            .prepare("SELECT customer_id FROM customer ORDER BY rowid")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn customer_count(&self) -> SimResult<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM customer", [], |row| row.get(0))?;
        Ok(count)
    }

    pub fn txn_count_total(&self) -> SimResult<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM txn", [], |row| row.get(0))?;
        Ok(count)
    }

    pub fn txn_count_for(&self, customer_id: &str) -> SimResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM txn WHERE customer_id = ?1",
            params![customer_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn suspicious_txn_count_for(&self, customer_id: &str) -> SimResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM txn WHERE customer_id = ?1 AND is_suspicious = 1",
            params![customer_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn hit_count_for(&self, customer_id: &str) -> SimResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM screening_log
             WHERE customer_id = ?1 AND outcome = 'Hit'",
            params![customer_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn flagged_report_count(&self) -> SimResult<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM flagged_report", [], |row| row.get(0))?;
        Ok(count)
    }

    pub fn kyc_for(&self, customer_id: &str) -> SimResult<Option<KycRow>> {
        use rusqlite::OptionalExtension;
        let row = self
            .conn
            .query_row(
                "SELECT customer_id, risk_tier, identity_verified, address_verified,
                        last_screening_date, is_flagged
                 FROM kyc WHERE customer_id = ?1",
                params![customer_id],
                |row| {
                    Ok(KycRow {
                        customer_id: row.get(0)?,
                        risk_tier: row.get(1)?,
                        identity_verified: row.get::<_, i64>(2)? != 0,
                        address_verified: row.get::<_, i64>(3)? != 0,
                        last_screening_date: row.get(4)?,
                        is_flagged: row.get::<_, i64>(5)? != 0,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    /// All screening rows for a customer in write order.
    pub fn screening_rows_for(&self, customer_id: &str) -> SimResult<Vec<ScreeningRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT category, screening_date, outcome, detail
             FROM screening_log WHERE customer_id = ?1
             ORDER BY log_id ASC",
        )?;
        let rows = stmt.query_map(params![customer_id], |row| {
            Ok(ScreeningRow {
                category: row.get(0)?,
                screening_date: row.get(1)?,
                outcome: row.get(2)?,
                detail: row.get(3)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// All transactions for a customer in generation order.
    pub fn txn_rows_for(&self, customer_id: &str) -> SimResult<Vec<TxnRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT transaction_date, amount, currency, txn_type, is_suspicious
             FROM txn WHERE customer_id = ?1
             ORDER BY rowid ASC",
        )?;
        let rows = stmt.query_map(params![customer_id], |row| {
            Ok(TxnRow {
                transaction_date: row.get(0)?,
                amount: row.get(1)?,
                currency: row.get(2)?,
                txn_type: row.get(3)?,
                is_suspicious: row.get::<_, i64>(4)? != 0,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn flagged_reports_for(&self, customer_id: &str) -> SimResult<Vec<ReportRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT reason, reported_to_authorities
             FROM flagged_report WHERE customer_id = ?1",
        )?;
        let rows = stmt.query_map(params![customer_id], |row| {
            Ok(ReportRow {
                reason: row.get(0)?,
                reported_to_authorities: row.get::<_, i64>(1)? != 0,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
