//! Property-based tests for schedule invariants.
//!
//! These tests verify properties that should hold for any valid deal:
//! - Schedules end on the end date and are strictly increasing
//! - Balances start at the principal and end at exactly zero
//! - The solved schedule closes to zero amortized cost
//! - Fixed rate deals get identical schedules from both methods
//! - Earlier periods are never revised by later resets

use eir_engine::balances::principal_balances;
use eir_engine::prelude::*;

// =============================================================================
// TEST DATA GENERATORS
// =============================================================================

fn simple_hash(seed: u64, i: u64) -> u64 {
    let mut x = seed.wrapping_add(i).wrapping_mul(0x517cc1b727220a95);
    x ^= x >> 32;
    x = x.wrapping_mul(0x517cc1b727220a95);
    x ^= x >> 32;
    x
}

/// Generates valid deal terms with varying characteristics.
fn generate_terms(seed: u64, interest_type: InterestType) -> DealTerms {
    let hash = simple_hash(seed, 0);

    let frequencies = [
        Frequency::Monthly,
        Frequency::Quarterly,
        Frequency::SemiAnnual,
        Frequency::Annual,
    ];
    let conventions = DayCountConvention::all();
    let structures = [Structure::Bullet, Structure::Amortizing];

    let frequency = frequencies[(hash % 4) as usize];
    let day_count = conventions[(hash / 4 % conventions.len() as u64) as usize];
    let structure = structures[(hash / 16 % 2) as usize];

    // Day 1 to 28 keeps every generated date on the same day of month
    let start = Date::from_ymd(
        2018 + (hash % 7) as i32,
        1 + (hash / 7 % 12) as u32,
        1 + (hash / 11 % 28) as u32,
    )
    .unwrap();
    let months = frequency.months_per_period() as i32;
    let stub = 1 + (hash / 13 % months as u64) as i32;
    let first = start.add_months(stub).unwrap();
    let payments = 2 + (hash / 17 % 10) as i32;
    let end = first.add_months(months * (payments - 1)).unwrap();

    let principal = 1_000_000.0 * (1 + hash / 19 % 500) as f64;
    let rate = 0.01 + (hash / 23 % 800) as f64 / 10_000.0; // 1-9%
    let setup_costs = principal * (hash / 29 % 300) as f64 / 10_000.0; // 0-3%

    let resets = match interest_type {
        InterestType::Fixed => Vec::new(),
        InterestType::Floating => (1..payments)
            .map(|k| {
                let date = first.add_months(months * k).unwrap();
                let shift = (simple_hash(seed, k as u64) % 200) as f64 / 10_000.0 - 0.01;
                RateReset::new(date, (rate + shift).max(0.005))
            })
            .collect(),
    };

    DealTerms {
        deal_id: format!("P{seed:05}"),
        functional_currency: Currency::EUR,
        deal_currency: None,
        fx_rate: None,
        principal,
        discount_pct: None,
        premium_pct: None,
        setup_costs: Some(setup_costs),
        start_date: start,
        end_date: end,
        first_interest_date: first,
        interest_rate: rate,
        structure,
        frequency,
        day_count,
        interest_type,
        resets,
    }
}

fn generate_deal(seed: u64, interest_type: InterestType) -> Deal {
    Deal::from_terms(generate_terms(seed, interest_type)).unwrap()
}

// =============================================================================
// PROPERTY: SCHEDULE SHAPE
// =============================================================================

#[test]
fn property_schedule_ends_on_end_date() {
    for seed in 0..50 {
        let deal = generate_deal(seed, InterestType::Floating);
        let dates = deal.schedule().dates();

        assert_eq!(dates.len(), deal.number_of_payments() + 1, "seed {seed}");
        assert_eq!(dates[dates.len() - 1], deal.end_date(), "seed {seed}");
        assert_eq!(dates[1], deal.first_interest_date(), "seed {seed}");
        assert!(dates.windows(2).all(|w| w[0] < w[1]), "seed {seed}");
    }
}

#[test]
fn property_balances_start_at_principal_and_end_at_zero() {
    for seed in 0..50 {
        for structure in [Structure::Bullet, Structure::Amortizing] {
            let n = 1 + (simple_hash(seed, 1) % 40) as usize;
            let principal = 1_000.0 + (simple_hash(seed, 2) % 1_000_000) as f64;
            let balances = principal_balances(structure, principal, n);

            assert_eq!(balances.len(), n + 1);
            assert_eq!(balances[0], principal);
            assert_eq!(balances[n], 0.0);
            if structure == Structure::Bullet {
                assert!(balances[..n].iter().all(|&b| b == principal));
            } else {
                assert!(balances.windows(2).all(|w| w[1] < w[0]));
            }
        }
    }
}

// =============================================================================
// PROPERTY: SOLVED SCHEDULES CLOSE
// =============================================================================

#[test]
fn property_schedule_closes_to_zero() {
    let config = EngineConfig::default();

    for seed in 0..30 {
        for interest_type in [InterestType::Fixed, InterestType::Floating] {
            let deal = generate_deal(seed, interest_type);
            let schedule = reestimate(&deal, Method::Complex, &config).unwrap();
            let n = schedule.number_of_payments();

            assert_eq!(
                schedule.amortized_cost[0],
                deal.principal() - deal.capitalized_finance_cost(),
                "seed {seed}"
            );
            assert_eq!(schedule.amortized_cost[0], -schedule.cash_flows[0], "seed {seed}");
            assert!(
                schedule.amortized_cost[n].abs() <= 1.0,
                "seed {seed}: closing amortized cost {}",
                schedule.amortized_cost[n]
            );
        }
    }
}

#[test]
fn property_solved_rate_reproduces_zero_residual() {
    let config = EngineConfig::default();

    for seed in 0..30 {
        let deal = generate_deal(seed, InterestType::Fixed);
        let schedule = reestimate(&deal, Method::Simple, &config).unwrap();
        let rate = schedule.solutions[0].rate;

        let residual = eir_engine::solver::terminal_amortized_cost(
            rate,
            &schedule.dates,
            &schedule.cash_flows,
        );
        assert!(residual.abs() <= 1.0, "seed {seed}: residual {residual}");
    }
}

// =============================================================================
// PROPERTY: METHOD EQUIVALENCE AND FIX-THE-PAST
// =============================================================================

#[test]
fn property_fixed_rate_methods_identical() {
    let config = EngineConfig::default();

    for seed in 0..30 {
        let deal = generate_deal(seed, InterestType::Fixed);
        let complex = reestimate(&deal, Method::Complex, &config).unwrap();
        let simple = reestimate(&deal, Method::Simple, &config).unwrap();

        assert_eq!(complex.effective_interest, simple.effective_interest, "seed {seed}");
        assert_eq!(complex.eir, simple.eir, "seed {seed}");
        assert_eq!(complex.amortized_cost, simple.amortized_cost, "seed {seed}");
        assert_eq!(complex.capitalized_costs, simple.capitalized_costs, "seed {seed}");
    }
}

#[test]
fn property_later_resets_never_revise_earlier_periods() {
    let config = EngineConfig::default();

    for seed in 0..20 {
        let terms = generate_terms(seed, InterestType::Floating);
        let Some(last) = terms.resets.last().copied() else {
            continue;
        };
        let base_deal = Deal::from_terms(terms.clone()).unwrap();
        let base = reestimate(&base_deal, Method::Complex, &config).unwrap();

        let mut changed_terms = terms;
        if let Some(reset) = changed_terms.resets.last_mut() {
            reset.rate = last.rate + 0.01;
        }
        let changed = reestimate(
            &Deal::from_terms(changed_terms).unwrap(),
            Method::Complex,
            &config,
        )
        .unwrap();

        // The last reset takes effect from the final coupon
        let n = base.number_of_payments();
        assert_eq!(base.effective_interest[..n - 1], changed.effective_interest[..n - 1]);
        assert_eq!(base.eir[..n - 1], changed.eir[..n - 1]);
        assert_eq!(base.capitalized_costs[..n], changed.capitalized_costs[..n]);
    }
}

// =============================================================================
// PROPERTY: COMPARISON SHAPE
// =============================================================================

#[test]
fn property_comparison_has_one_row_per_payment() {
    let config = EngineConfig::default();

    for seed in 0..20 {
        let deal = generate_deal(seed, InterestType::Floating);
        let report = compare(&deal, &config).unwrap();

        assert_eq!(report.rows.len(), deal.number_of_payments(), "seed {seed}");
        for row in &report.rows {
            assert_eq!(row.eir_difference, row.complex_eir - row.simple_eir);
        }
    }
}
