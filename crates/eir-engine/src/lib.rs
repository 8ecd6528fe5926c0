//! # EIR Engine
//!
//! Effective interest rate amortization for debt instruments.
//!
//! The effective interest rate is the constant rate at which a deal's cash
//! flows, accrued on amortized cost, bring the carrying amount from the net
//! proceeds at inception to zero at maturity. This crate builds the whole
//! schedule around it:
//!
//! - **Deals**: validating factory for deal terms ([`deal`])
//! - **Schedules**: payment dates with an initial stub ([`schedule`])
//! - **Balances and accrual**: principal profiles and day-count interest
//!   ([`balances`], [`accrual`])
//! - **Cash flows**: net inception outflow and periodic receipts ([`cashflows`])
//! - **Solver**: effective rate and the disclosed amortized cost series ([`solver`])
//! - **Rate resets**: complex and simple re-estimation ([`floating`])
//! - **Reports**: period records and the method comparison ([`report`], [`compare`])
//! - **Batches**: many deals at once, optionally in parallel ([`batch`])
//!
//! ## Example
//!
//! ```rust
//! use eir_engine::prelude::*;
//!
//! let terms = DealTerms {
//!     deal_id: "DN0001".to_string(),
//!     functional_currency: Currency::USD,
//!     deal_currency: None,
//!     fx_rate: None,
//!     principal: 1_000_000.0,
//!     discount_pct: Some(2.0),
//!     premium_pct: None,
//!     setup_costs: None,
//!     start_date: Date::from_ymd(2024, 1, 15).unwrap(),
//!     end_date: Date::from_ymd(2027, 1, 15).unwrap(),
//!     first_interest_date: Date::from_ymd(2024, 7, 15).unwrap(),
//!     interest_rate: 0.05,
//!     structure: Structure::Bullet,
//!     frequency: Frequency::SemiAnnual,
//!     day_count: DayCountConvention::Actual365,
//!     interest_type: InterestType::Fixed,
//!     resets: Vec::new(),
//! };
//!
//! let deal = Deal::from_terms(terms).unwrap();
//! let report = run(&deal, Method::Complex, &EngineConfig::default()).unwrap();
//!
//! assert_eq!(report.records.len(), 7);
//! assert_eq!(report.records[0].amortized_cost, 980_000.0);
//! assert!(report.records[6].amortized_cost.abs() <= 1.0);
//! ```
//!
//! ## Features
//!
//! - `parallel`: evaluate batches with rayon

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::float_cmp)]
#![allow(clippy::similar_names)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::needless_range_loop)]

pub mod accrual;
pub mod balances;
pub mod batch;
pub mod cashflows;
pub mod compare;
pub mod config;
pub mod deal;
pub mod error;
pub mod floating;
pub mod report;
pub mod schedule;
pub mod solver;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::batch::{compare_batch, run_batch};
    pub use crate::compare::{compare, ComparisonReport, ComparisonRow, YearSummaryRow};
    pub use crate::config::EngineConfig;
    pub use crate::deal::{Deal, DealTerms, InterestType, RateReset, Structure};
    pub use crate::error::{EngineError, EngineResult};
    pub use crate::floating::{reestimate, EirSchedule, Method, MethodTimings};
    pub use crate::report::{run, PeriodRecord, ScheduleReport};
    pub use crate::schedule::{generate_schedule, PaymentSchedule};
    pub use crate::solver::{calculate_effective_interest, solve_rate, RateSolution};

    pub use eir_core::daycounts::DayCountConvention;
    pub use eir_core::{Currency, Date, Frequency};
}

pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
