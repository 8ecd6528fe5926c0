//! Deal terms and the validating deal factory.
//!
//! [`DealTerms`] is the raw submission as it arrives from a file or a form.
//! [`Deal::from_terms`] checks every term once, converts the principal into
//! the functional currency, nets setup costs with discount or premium, and
//! builds the payment schedule and rate reset sequence. A [`Deal`] cannot be
//! modified afterwards.

use std::fmt;
use std::str::FromStr;

use eir_core::daycounts::DayCountConvention;
use eir_core::{Currency, Date, Frequency};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::schedule::{generate_schedule, PaymentSchedule};

// =============================================================================
// Enumerations
// =============================================================================

/// Principal repayment profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Structure {
    /// Principal repaid in full at maturity.
    Bullet,
    /// Principal repaid in equal installments each period.
    Amortizing,
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Structure::Bullet => write!(f, "bullet"),
            Structure::Amortizing => write!(f, "amortizing"),
        }
    }
}

impl FromStr for Structure {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bullet" => Ok(Structure::Bullet),
            "amortizing" | "amortising" => Ok(Structure::Amortizing),
            _ => Err(EngineError::input_validation(
                "structure",
                format!("'{s}' is not bullet or amortizing"),
            )),
        }
    }
}

/// Whether the contractual rate is fixed or reset periodically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterestType {
    /// One rate for the life of the deal.
    Fixed,
    /// Rate reset on payment dates.
    Floating,
}

impl fmt::Display for InterestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterestType::Fixed => write!(f, "fixed"),
            InterestType::Floating => write!(f, "floating"),
        }
    }
}

impl FromStr for InterestType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fixed" => Ok(InterestType::Fixed),
            "floating" => Ok(InterestType::Floating),
            _ => Err(EngineError::input_validation(
                "interest_type",
                format!("'{s}' is not fixed or floating"),
            )),
        }
    }
}

/// A contractual rate taking effect on a payment date.
///
/// The rate applies to the accrual period ending on `date` and to every
/// later period until the next reset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateReset {
    /// Payment date the rate takes effect on.
    pub date: Date,
    /// Annual rate as a decimal (0.05 = 5%).
    pub rate: f64,
}

impl RateReset {
    /// Creates a new rate reset.
    #[must_use]
    pub fn new(date: Date, rate: f64) -> Self {
        Self { date, rate }
    }
}

// =============================================================================
// Raw terms
// =============================================================================

/// Deal terms as submitted, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealTerms {
    /// Deal identifier.
    pub deal_id: String,
    /// Currency the books are kept in.
    pub functional_currency: Currency,
    /// Currency the deal is denominated in; defaults to the functional currency.
    #[serde(default)]
    pub deal_currency: Option<Currency>,
    /// Units of deal currency per unit of functional currency.
    #[serde(default)]
    pub fx_rate: Option<f64>,
    /// Principal in deal currency.
    pub principal: f64,
    /// Discount in percent of principal.
    #[serde(default)]
    pub discount_pct: Option<f64>,
    /// Premium in percent of principal.
    #[serde(default)]
    pub premium_pct: Option<f64>,
    /// Setup costs in functional currency.
    #[serde(default)]
    pub setup_costs: Option<f64>,
    /// Start date.
    pub start_date: Date,
    /// Maturity date.
    pub end_date: Date,
    /// First interest payment date.
    pub first_interest_date: Date,
    /// Annual nominal rate as a decimal, effective from the first interest date.
    pub interest_rate: f64,
    /// Repayment structure.
    pub structure: Structure,
    /// Payment frequency.
    pub frequency: Frequency,
    /// Day count convention for nominal interest.
    pub day_count: DayCountConvention,
    /// Fixed or floating.
    pub interest_type: InterestType,
    /// Rate resets after the first interest date (floating deals only).
    #[serde(default)]
    pub resets: Vec<RateReset>,
}

// =============================================================================
// Validated deal
// =============================================================================

/// A validated, immutable deal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Deal {
    deal_id: String,
    currency: Currency,
    principal: f64,
    discount: f64,
    premium: f64,
    setup_costs: f64,
    capitalized_finance_cost: f64,
    start_date: Date,
    end_date: Date,
    first_interest_date: Date,
    interest_rate: f64,
    structure: Structure,
    frequency: Frequency,
    day_count: DayCountConvention,
    interest_type: InterestType,
    resets: Vec<RateReset>,
    schedule: PaymentSchedule,
}

impl Deal {
    /// Validates `terms` and builds a deal.
    ///
    /// # Errors
    ///
    /// - `InputValidation` for out-of-range amounts, percentages, rates or dates
    /// - `DualExclusivity` if both discount and premium are non-zero
    /// - `InvalidSchedule` if the schedule does not end on the end date
    /// - `ScheduleConsistency` if a reset date is not a payment date or
    ///   reset dates repeat
    pub fn from_terms(terms: DealTerms) -> EngineResult<Self> {
        let deal_id = terms.deal_id.trim().to_string();
        if deal_id.is_empty() {
            return Err(EngineError::input_validation("deal_id", "must not be empty"));
        }

        let principal = positive("principal", terms.principal)?;
        let fx_rate = match terms.fx_rate {
            Some(rate) => positive("fx_rate", rate)?,
            None => 1.0,
        };
        let deal_currency = terms.deal_currency.unwrap_or(terms.functional_currency);
        let principal = if deal_currency == terms.functional_currency {
            principal
        } else {
            principal / fx_rate
        };

        let discount_pct = percentage("discount", terms.discount_pct)?;
        let premium_pct = percentage("premium", terms.premium_pct)?;
        if discount_pct != 0.0 && premium_pct != 0.0 {
            return Err(EngineError::DualExclusivity {
                discount: discount_pct,
                premium: premium_pct,
            });
        }
        let discount = discount_pct * principal / 100.0;
        let premium = premium_pct * principal / 100.0;

        let setup_costs = terms.setup_costs.unwrap_or(0.0);
        if !setup_costs.is_finite() || setup_costs < 0.0 {
            return Err(EngineError::input_validation(
                "setup_costs",
                format!("must be a non-negative amount, got {setup_costs}"),
            ));
        }
        let capitalized_finance_cost = setup_costs + discount - premium;
        if capitalized_finance_cost >= principal {
            return Err(EngineError::input_validation(
                "capitalized_finance_cost",
                format!(
                    "{capitalized_finance_cost} leaves no carrying amount on a principal of \
                     {principal}"
                ),
            ));
        }

        validate_rate("interest_rate", terms.interest_rate)?;

        if terms.first_interest_date <= terms.start_date {
            return Err(EngineError::input_validation(
                "first_interest_date",
                format!(
                    "{} must be after the start date {}",
                    terms.first_interest_date, terms.start_date
                ),
            ));
        }
        if terms.first_interest_date > terms.end_date {
            return Err(EngineError::input_validation(
                "first_interest_date",
                format!(
                    "{} must not be after the end date {}",
                    terms.first_interest_date, terms.end_date
                ),
            ));
        }

        let schedule = generate_schedule(
            terms.start_date,
            terms.end_date,
            terms.first_interest_date,
            terms.frequency.months_per_period(),
        )?;
        if schedule.last() != terms.end_date {
            return Err(EngineError::invalid_schedule(format!(
                "{} payments from {} end on {}, not on the end date {}",
                terms.frequency,
                terms.first_interest_date,
                schedule.last(),
                terms.end_date
            )));
        }

        if terms.interest_type == InterestType::Fixed && !terms.resets.is_empty() {
            return Err(EngineError::input_validation(
                "resets",
                "fixed rate deals take no rate resets",
            ));
        }

        let mut additional = terms.resets;
        additional.sort_by_key(|reset| reset.date);
        let mut resets = Vec::with_capacity(additional.len() + 1);
        resets.push(RateReset::new(terms.first_interest_date, terms.interest_rate));
        resets.extend(additional);
        validate_resets(&resets, &schedule)?;

        tracing::debug!(
            deal_id = %deal_id,
            payments = schedule.number_of_payments(),
            resets = resets.len(),
            "deal validated"
        );

        Ok(Self {
            deal_id,
            currency: terms.functional_currency,
            principal,
            discount,
            premium,
            setup_costs,
            capitalized_finance_cost,
            start_date: terms.start_date,
            end_date: terms.end_date,
            first_interest_date: terms.first_interest_date,
            interest_rate: terms.interest_rate,
            structure: terms.structure,
            frequency: terms.frequency,
            day_count: terms.day_count,
            interest_type: terms.interest_type,
            resets,
            schedule,
        })
    }

    /// Returns the deal identifier.
    #[must_use]
    pub fn deal_id(&self) -> &str {
        &self.deal_id
    }

    /// Returns the functional currency.
    #[must_use]
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns the principal in functional currency.
    #[must_use]
    pub fn principal(&self) -> f64 {
        self.principal
    }

    /// Returns the discount amount.
    #[must_use]
    pub fn discount(&self) -> f64 {
        self.discount
    }

    /// Returns the premium amount.
    #[must_use]
    pub fn premium(&self) -> f64 {
        self.premium
    }

    /// Returns the setup costs.
    #[must_use]
    pub fn setup_costs(&self) -> f64 {
        self.setup_costs
    }

    /// Returns setup costs plus discount minus premium.
    #[must_use]
    pub fn capitalized_finance_cost(&self) -> f64 {
        self.capitalized_finance_cost
    }

    /// Returns the start date.
    #[must_use]
    pub fn start_date(&self) -> Date {
        self.start_date
    }

    /// Returns the end date.
    #[must_use]
    pub fn end_date(&self) -> Date {
        self.end_date
    }

    /// Returns the first interest date.
    #[must_use]
    pub fn first_interest_date(&self) -> Date {
        self.first_interest_date
    }

    /// Returns the nominal rate at inception.
    #[must_use]
    pub fn interest_rate(&self) -> f64 {
        self.interest_rate
    }

    /// Returns the repayment structure.
    #[must_use]
    pub fn structure(&self) -> Structure {
        self.structure
    }

    /// Returns the payment frequency.
    #[must_use]
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Returns the day count convention.
    #[must_use]
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    /// Returns the interest type.
    #[must_use]
    pub fn interest_type(&self) -> InterestType {
        self.interest_type
    }

    /// Returns the rate resets, the first one being on the first interest date.
    #[must_use]
    pub fn resets(&self) -> &[RateReset] {
        &self.resets
    }

    /// Returns the payment schedule.
    #[must_use]
    pub fn schedule(&self) -> &PaymentSchedule {
        &self.schedule
    }

    /// Returns the number of payments.
    #[must_use]
    pub fn number_of_payments(&self) -> usize {
        self.schedule.number_of_payments()
    }
}

impl TryFrom<DealTerms> for Deal {
    type Error = EngineError;

    fn try_from(terms: DealTerms) -> Result<Self, Self::Error> {
        Self::from_terms(terms)
    }
}

// =============================================================================
// Validation helpers
// =============================================================================

fn positive(field: &str, value: f64) -> EngineResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(EngineError::input_validation(
            field,
            format!("must be a positive number, got {value}"),
        ))
    }
}

fn percentage(field: &str, value: Option<f64>) -> EngineResult<f64> {
    let value = value.unwrap_or(0.0);
    if value.is_finite() && (0.0..100.0).contains(&value) {
        Ok(value)
    } else {
        Err(EngineError::input_validation(
            field,
            format!("must be provided in % (0 to below 100), got {value}"),
        ))
    }
}

fn validate_rate(field: &str, rate: f64) -> EngineResult<()> {
    if rate.is_finite() && rate != 0.0 && rate > -1.0 && rate <= 1.0 {
        Ok(())
    } else {
        Err(EngineError::input_validation(
            field,
            format!("must be a non-zero decimal rate in (-1, 1], got {rate}"),
        ))
    }
}

fn validate_resets(resets: &[RateReset], schedule: &PaymentSchedule) -> EngineResult<()> {
    for (i, reset) in resets.iter().enumerate() {
        validate_rate("reset rate", reset.rate)?;

        match schedule.position(reset.date) {
            Some(index) if index > 0 => {}
            _ => {
                return Err(EngineError::schedule_consistency(
                    reset.date,
                    "not a payment date of the deal",
                ))
            }
        }

        if i > 0 && reset.date <= resets[i - 1].date {
            return Err(EngineError::schedule_consistency(
                reset.date,
                "reset dates must be strictly increasing",
            ));
        }
    }
    Ok(())
}
