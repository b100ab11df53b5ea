//! End-to-end lifecycle properties over generated datasets.

use omnibanque_core::{
    config::SimConfig,
    driver::{RunSummary, SimulationDriver},
    error::SimError,
    store::SqliteStore,
};

const ONBOARDING_DETAIL: &str = "Initial onboarding screening.";

fn generate(customers: usize, seed: u64) -> (SqliteStore, RunSummary) {
    let store = SqliteStore::in_memory().unwrap();
    store.migrate().unwrap();
    let config = SimConfig {
        customers,
        ..SimConfig::default()
    };
    let summary = SimulationDriver::new(config, seed).run(&store).unwrap();
    assert_eq!(summary.aborted, 0, "no customer should abort in-memory");
    (store, summary)
}

#[test]
fn every_customer_has_exactly_one_matching_kyc_row() {
    let (store, _) = generate(8, 0xBEEF);

    let ids = store.customer_ids().unwrap();
    assert_eq!(ids.len(), 8);
    assert_eq!(store.customer_count().unwrap(), 8);

    for id in &ids {
        let kyc = store
            .kyc_for(id)
            .unwrap()
            .unwrap_or_else(|| panic!("customer {id} has no KYC row"));
        assert_eq!(&kyc.customer_id, id);
        assert!(kyc.identity_verified);
        assert!(kyc.address_verified);
        assert!(["Low", "Medium", "High"].contains(&kyc.risk_tier.as_str()));
    }
}

#[test]
fn onboarding_writes_one_clear_screening_per_category() {
    let (store, _) = generate(6, 0xCAFE);

    for id in store.customer_ids().unwrap() {
        let rows = store.screening_rows_for(&id).unwrap();
        let onboarding: Vec<_> = rows
            .iter()
            .filter(|r| r.detail == ONBOARDING_DETAIL)
            .collect();

        assert_eq!(
            onboarding.len(),
            3,
            "customer {id}: expected one onboarding entry per category"
        );
        assert!(onboarding.iter().all(|r| r.outcome == "Clear"));

        let mut categories: Vec<&str> =
            onboarding.iter().map(|r| r.category.as_str()).collect();
        categories.sort_unstable();
        assert_eq!(categories, ["NegativeNews", "PEP", "Sanctions"]);

        // The baseline precedes everything else in write order.
        assert!(rows
            .iter()
            .take(3)
            .all(|r| r.detail == ONBOARDING_DETAIL));
    }
}

#[test]
fn transaction_dates_never_go_backwards() {
    let (store, _) = generate(6, 0xD00D);

    for id in store.customer_ids().unwrap() {
        let txns = store.txn_rows_for(&id).unwrap();
        let screenings = store.screening_rows_for(&id).unwrap();
        let onboarding_date = &screenings[0].screening_date;

        // ISO-8601 dates compare lexicographically.
        let mut prev = onboarding_date.clone();
        for (i, t) in txns.iter().enumerate() {
            if i == 0 {
                assert!(
                    t.transaction_date > *onboarding_date,
                    "customer {id}: first transaction not after KYC initialization"
                );
            }
            assert!(
                t.transaction_date >= prev,
                "customer {id}: transaction date regressed {prev} -> {}",
                t.transaction_date
            );
            prev = t.transaction_date.clone();
        }
    }
}

#[test]
fn flagging_is_exactly_when_evidence_exists() {
    let (store, summary) = generate(10, 0xF1A6);

    let mut reports_seen = 0usize;
    for id in store.customer_ids().unwrap() {
        let suspicious = store.suspicious_txn_count_for(&id).unwrap() > 0;
        let hit = store.hit_count_for(&id).unwrap() > 0;
        let reports = store.flagged_reports_for(&id).unwrap();
        let kyc = store.kyc_for(&id).unwrap().unwrap();

        assert!(reports.len() <= 1, "customer {id}: more than one report");
        assert_eq!(
            suspicious || hit,
            reports.len() == 1,
            "customer {id}: flag evidence and report disagree"
        );
        assert_eq!(kyc.is_flagged, suspicious || hit);

        if let Some(report) = reports.first() {
            reports_seen += 1;
            assert!(
                ["Sanction Hit", "Suspicious Transaction Pattern"]
                    .contains(&report.reason.as_str()),
                "unexpected reason '{}'",
                report.reason
            );
            // External reporting is never simulated.
            assert!(!report.reported_to_authorities);
        }
    }
    assert_eq!(reports_seen, summary.flagged);
}

#[test]
fn unflagged_customers_exhaust_the_transaction_budget() {
    let config = SimConfig::default();
    let (store, _) = generate(10, 0x5EED);

    for id in store.customer_ids().unwrap() {
        if store.flagged_reports_for(&id).unwrap().is_empty() {
            let count = store.txn_count_for(&id).unwrap();
            assert!(
                count > config.txn_ceiling as i64,
                "customer {id} completed with only {count} transactions"
            );
        }
    }
}

#[test]
fn summary_accounts_for_every_customer_and_transaction() {
    let (store, summary) = generate(9, 0xACC7);

    assert_eq!(summary.requested, 9);
    assert_eq!(summary.completed + summary.flagged, 9);
    assert!(summary.fully_simulated());
    assert_eq!(summary.transactions as i64, store.txn_count_total().unwrap());
}

#[test]
fn transactions_carry_the_configured_currency() {
    let (store, _) = generate(4, 0xE0E0);

    for id in store.customer_ids().unwrap() {
        for t in store.txn_rows_for(&id).unwrap() {
            assert_eq!(t.currency, "EUR");
            assert!(t.amount > 0.0);
        }
    }
}

#[test]
fn invalid_config_fails_before_touching_the_store() {
    let store = SqliteStore::in_memory().unwrap();
    store.migrate().unwrap();

    let config = SimConfig {
        customers: 5,
        risk_tier_weights: [0.9, 0.3, 0.1],
        ..SimConfig::default()
    };
    let result = SimulationDriver::new(config, 1).run(&store);
    assert!(matches!(result, Err(SimError::Config(_))));
    assert_eq!(store.customer_count().unwrap(), 0);
}
