//! Statistical behavior of the probabilistic models over large samples.

use omnibanque_core::{
    config::SimConfig,
    domain::{BusinessLine, TransactionType},
    models::{AmountSampler, ChainState, TransactionChain},
    rng::CustomerRng,
};

#[test]
fn start_state_follows_the_configured_first_transaction_weights() {
    const DRAWS: usize = 100_000;
    let mut rng = CustomerRng::new(0xC41, 0);

    let mut deposits = 0usize;
    let mut transfers = 0usize;
    let mut trades = 0usize;
    for _ in 0..DRAWS {
        match TransactionChain::next(ChainState::Start, &mut rng) {
            TransactionType::Deposit => deposits += 1,
            TransactionType::InternationalTransfer => transfers += 1,
            TransactionType::SecuritiesTrade => trades += 1,
            other => panic!("{other:?} drawn from the start state"),
        }
    }

    // Chi-squared goodness of fit against 0.4 / 0.3 / 0.3,
    // df = 2, p = 0.001 critical value 13.82.
    let expected = [0.4, 0.3, 0.3].map(|p| p * DRAWS as f64);
    let observed = [deposits as f64, transfers as f64, trades as f64];
    let chi2: f64 = observed
        .iter()
        .zip(expected.iter())
        .map(|(o, e)| (o - e).powi(2) / e)
        .sum();
    assert!(chi2 < 13.82, "chi-squared {chi2:.2} rejects the configured weights");

    // And each share lands within a few percent of its target.
    for (share, target) in observed.iter().zip([0.4, 0.3, 0.3]) {
        let p = share / DRAWS as f64;
        assert!(
            (p - target).abs() < 0.02,
            "share {p:.3} too far from target {target}"
        );
    }
}

#[test]
fn amount_scales_differ_by_business_line() {
    const DRAWS: usize = 20_000;
    let sampler = AmountSampler::new(&SimConfig::default()).unwrap();
    let mut rng = CustomerRng::new(0xA11, 0);

    let median = |line: BusinessLine, rng: &mut CustomerRng| -> f64 {
        let mut sample: Vec<f64> = (0..DRAWS).map(|_| sampler.draw(line, rng)).collect();
        sample.sort_by(|a, b| a.partial_cmp(b).unwrap());
        sample[DRAWS / 2]
    };

    // Log-normal medians are e^mu: ~148 for the retail parameters,
    // ~22,000 for the investment line.
    let retail = median(BusinessLine::Frb, &mut rng);
    let investment = median(BusinessLine::Gbis, &mut rng);

    assert!(
        (100.0..220.0).contains(&retail),
        "retail median {retail:.2} outside the expected band"
    );
    assert!(
        (15_000.0..32_000.0).contains(&investment),
        "investment median {investment:.2} outside the expected band"
    );
    assert!(investment > retail * 50.0);
}

#[test]
fn loan_repayment_state_is_reachable_only_from_the_retail_cluster() {
    // The table never routes into LoanRepayment; it exists as a row so
    // the chain is total over the vocabulary. Verify it still leads
    // somewhere valid if entered directly.
    let mut rng = CustomerRng::new(3, 0);
    for _ in 0..100 {
        let next = TransactionChain::next(
            ChainState::Typed(TransactionType::LoanRepayment),
            &mut rng,
        );
        assert_eq!(next, TransactionType::CardPayment);
    }
}
