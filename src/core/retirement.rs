use tracing::{debug, warn};

use super::types::{AgeBalancePoint, Phase, RetirementInputs, RetirementResult};
use crate::error::{CalcError, ensure_at_most, ensure_growth_rate, ensure_non_negative};

/// Relative gap tolerated between the closed-form savings and the simulated
/// balance at retirement before a warning is logged.
pub const RECONCILE_TOLERANCE: f64 = 1e-6;

const MONTHS_PER_YEAR: u32 = 12;

/// Oldest current or retirement age accepted.
pub const MAX_AGE: u32 = 120;

/// Longest retirement accepted, in years.
pub const MAX_RETIREMENT_LENGTH: u32 = 100;

pub fn compute_retirement(inputs: &RetirementInputs) -> Result<RetirementResult, CalcError> {
    validate(inputs)?;

    let years_to_retirement = inputs.retirement_age - inputs.current_age;
    let retirement_savings = closed_form_savings(inputs, years_to_retirement);
    let annual_withdrawal = retirement_savings * (inputs.withdrawal_rate / 100.0);

    let mut series =
        Vec::with_capacity((years_to_retirement + 1 + inputs.retirement_length) as usize);
    let simulated_retirement_balance = accumulate(inputs, years_to_retirement, &mut series);
    check_reconciliation(retirement_savings, simulated_retirement_balance);
    distribute(
        inputs,
        simulated_retirement_balance,
        annual_withdrawal,
        &mut series,
    );

    debug!(
        current_age = inputs.current_age,
        retirement_age = inputs.retirement_age,
        retirement_savings,
        points = series.len(),
        "recomputed retirement projection"
    );

    Ok(RetirementResult {
        retirement_savings,
        monthly_retirement_income: annual_withdrawal / MONTHS_PER_YEAR as f64,
        years_to_retirement,
        simulated_retirement_balance,
        series,
    })
}

/// Future value of the current savings compounded annually plus the monthly
/// contributions compounded monthly.
pub fn closed_form_savings(inputs: &RetirementInputs, years_to_retirement: u32) -> f64 {
    let annual_return = inputs.expected_return / 100.0;
    let lump_sum =
        inputs.current_savings * (1.0 + annual_return).powi(exponent(years_to_retirement));

    let monthly_return = annual_return / MONTHS_PER_YEAR as f64;
    let months = years_to_retirement.saturating_mul(MONTHS_PER_YEAR);
    let annuity = if monthly_return.abs() < f64::EPSILON {
        inputs.monthly_contribution * months as f64
    } else {
        inputs.monthly_contribution * ((1.0 + monthly_return).powi(exponent(months)) - 1.0)
            / monthly_return
    };

    lump_sum + annuity
}

fn exponent(periods: u32) -> i32 {
    i32::try_from(periods).unwrap_or(i32::MAX)
}

fn validate(inputs: &RetirementInputs) -> Result<(), CalcError> {
    ensure_at_most("currentAge", inputs.current_age, MAX_AGE)?;
    ensure_at_most("retirementAge", inputs.retirement_age, MAX_AGE)?;
    ensure_at_most("retirementLength", inputs.retirement_length, MAX_RETIREMENT_LENGTH)?;
    if inputs.retirement_age <= inputs.current_age {
        return Err(CalcError::RetirementNotAfterCurrentAge {
            current_age: inputs.current_age,
            retirement_age: inputs.retirement_age,
        });
    }
    ensure_non_negative("currentSavings", inputs.current_savings)?;
    ensure_non_negative("monthlyContribution", inputs.monthly_contribution)?;
    ensure_growth_rate("expectedReturn", inputs.expected_return)?;
    ensure_growth_rate("inflationRate", inputs.inflation_rate)?;
    ensure_non_negative("withdrawalRate", inputs.withdrawal_rate)?;
    Ok(())
}

/// Records one point per age from the current age through the retirement age
/// inclusive and returns the balance reached at retirement.
fn accumulate(
    inputs: &RetirementInputs,
    years_to_retirement: u32,
    series: &mut Vec<AgeBalancePoint>,
) -> f64 {
    let growth = 1.0 + inputs.expected_return / 100.0;
    let annual_contribution = inputs.monthly_contribution * MONTHS_PER_YEAR as f64;
    let mut balance = inputs.current_savings;

    for year in 0..=years_to_retirement {
        series.push(AgeBalancePoint {
            age: inputs.current_age + year,
            balance,
            phase: Phase::Accumulation,
        });
        if year < years_to_retirement {
            balance = balance * growth + annual_contribution;
        }
    }

    balance
}

/// Withdraws an inflation-escalated amount each year and grows the remainder.
/// Stops after the first year that exhausts the balance.
fn distribute(
    inputs: &RetirementInputs,
    starting_balance: f64,
    annual_withdrawal: f64,
    series: &mut Vec<AgeBalancePoint>,
) {
    let growth = 1.0 + inputs.expected_return / 100.0;
    let inflation = 1.0 + inputs.inflation_rate / 100.0;
    let mut balance = starting_balance;

    for year in 1..=inputs.retirement_length {
        let adjusted_withdrawal = annual_withdrawal * inflation.powi(year as i32);
        balance = (balance - adjusted_withdrawal) * growth;

        let exhausted = balance <= 0.0;
        if exhausted {
            balance = 0.0;
        }
        series.push(AgeBalancePoint {
            age: inputs.retirement_age + year,
            balance,
            phase: Phase::Distribution,
        });
        if exhausted {
            debug!(age = inputs.retirement_age + year, "retirement savings exhausted");
            break;
        }
    }
}

fn check_reconciliation(closed_form: f64, simulated: f64) {
    let scale = closed_form.abs().max(simulated.abs()).max(1.0);
    let relative_gap = (closed_form - simulated).abs() / scale;
    if relative_gap > RECONCILE_TOLERANCE {
        warn!(
            closed_form,
            simulated,
            relative_gap,
            "closed-form retirement savings disagree with the simulated balance"
        );
    }
}
