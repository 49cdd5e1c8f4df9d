use tracing::debug;

use super::types::{InvestmentInputs, InvestmentResult, YearPoint};
use crate::error::{CalcError, ensure_at_most, ensure_growth_rate, ensure_non_negative};

/// Longest investment horizon accepted, in years. Daily compounding over this
/// span still stays under 40,000 periods.
pub const MAX_INVESTMENT_YEARS: u32 = 100;

/// Simulates contributions and compounding one period at a time so that each
/// year boundary is available for charting.
pub fn compute_investment(inputs: &InvestmentInputs) -> Result<InvestmentResult, CalcError> {
    let initial = ensure_non_negative("initialAmount", inputs.initial_amount)?;
    let monthly = ensure_non_negative("monthlyContribution", inputs.monthly_contribution)?;
    let annual_rate = ensure_growth_rate("annualRate", inputs.annual_rate)?;
    if inputs.years == 0 {
        return Err(CalcError::ZeroTerm { field: "years" });
    }
    ensure_at_most("years", inputs.years, MAX_INVESTMENT_YEARS)?;

    let periods_per_year = inputs.frequency.periods_per_year();
    let rate_per_period = annual_rate / 100.0 / periods_per_year as f64;
    let contribution_per_period = monthly * inputs.frequency.contribution_months_per_period();
    let total_periods = inputs.years * periods_per_year;

    let mut balance = initial;
    let mut contributed = initial;
    let mut series = Vec::with_capacity(inputs.years as usize);

    for period in 1..=total_periods {
        balance += contribution_per_period;
        contributed += contribution_per_period;
        balance *= 1.0 + rate_per_period;

        if period % periods_per_year == 0 || period == total_periods {
            series.push(YearPoint {
                year: period.div_ceil(periods_per_year),
                value: balance,
                contributions: contributed,
                interest: balance - contributed,
            });
        }
    }

    debug!(
        frequency = %inputs.frequency,
        total_periods,
        final_amount = balance,
        "recomputed investment"
    );

    Ok(InvestmentResult {
        final_amount: balance,
        total_contributions: contributed,
        total_interest: balance - contributed,
        series,
    })
}
