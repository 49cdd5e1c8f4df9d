use tracing::debug;

use super::types::{Scenario, ScenarioInputs, ScenarioRanking, ScenarioResult, TimelinePoint};
use crate::error::{CalcError, ensure_at_most, ensure_growth_rate, ensure_non_negative};

const MONTHS_PER_YEAR: u32 = 12;

/// Longest what-if horizon accepted, in years.
pub const MAX_SCENARIO_YEARS: u32 = 100;

/// What-if projection with monthly compounding: each month grows the balance
/// and then adds the contribution.
pub fn compute_scenario(inputs: &ScenarioInputs) -> Result<ScenarioResult, CalcError> {
    let initial = ensure_non_negative("initialInvestment", inputs.initial_investment)?;
    let monthly = ensure_non_negative("monthlyContribution", inputs.monthly_contribution)?;
    let annual_rate = ensure_growth_rate("annualRate", inputs.annual_rate)?;
    ensure_at_most("years", inputs.years, MAX_SCENARIO_YEARS)?;

    let monthly_rate = annual_rate / 100.0 / MONTHS_PER_YEAR as f64;
    let total_months = inputs.years * MONTHS_PER_YEAR;
    let mut balance = initial;
    let mut timeline = Vec::with_capacity(inputs.years as usize + 1);

    for month in 0..total_months {
        if month % MONTHS_PER_YEAR == 0 {
            timeline.push(TimelinePoint {
                year: month / MONTHS_PER_YEAR,
                value: balance,
            });
        }
        balance = balance * (1.0 + monthly_rate) + monthly;
    }
    timeline.push(TimelinePoint {
        year: inputs.years,
        value: balance,
    });

    let total_contributions = initial + monthly * total_months as f64;
    debug!(name = %inputs.name, final_amount = balance, "recomputed scenario");

    Ok(ScenarioResult {
        final_amount: balance,
        total_contributions,
        total_interest: balance - total_contributions,
        timeline,
    })
}

pub fn build_scenario(inputs: ScenarioInputs) -> Result<Scenario, CalcError> {
    let results = compute_scenario(&inputs)?;
    Ok(Scenario { inputs, results })
}

/// Ranks scenarios by final amount, best first, with the shortfall to the best.
pub fn compare_scenarios(scenarios: &[Scenario]) -> Vec<ScenarioRanking> {
    let mut order: Vec<&Scenario> = scenarios.iter().collect();
    order.sort_by(|a, b| {
        b.results
            .final_amount
            .total_cmp(&a.results.final_amount)
    });

    let best = order
        .first()
        .map(|s| s.results.final_amount)
        .unwrap_or(0.0);

    order
        .into_iter()
        .enumerate()
        .map(|(idx, scenario)| ScenarioRanking {
            name: scenario.inputs.name.clone(),
            rank: idx + 1,
            final_amount: scenario.results.final_amount,
            gap_to_best: best - scenario.results.final_amount,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn scenario(name: &str, rate: f64) -> ScenarioInputs {
        ScenarioInputs {
            name: name.to_string(),
            initial_investment: 10_000.0,
            monthly_contribution: 500.0,
            annual_rate: rate,
            years: 20,
        }
    }

    #[test]
    fn oracle_two_year_timeline_matches_hand_calculation() {
        let inputs = ScenarioInputs {
            name: "flat".to_string(),
            initial_investment: 1_000.0,
            monthly_contribution: 100.0,
            annual_rate: 0.0,
            years: 2,
        };
        let result = compute_scenario(&inputs).expect("valid scenario");

        let values: Vec<(u32, f64)> = result.timeline.iter().map(|p| (p.year, p.value)).collect();
        assert_eq!(values, vec![(0, 1_000.0), (1, 2_200.0), (2, 3_400.0)]);
        assert_approx(result.total_contributions, 3_400.0);
        assert_approx(result.total_interest, 0.0);
    }

    #[test]
    fn monthly_compounding_matches_ordinary_annuity() {
        let result = compute_scenario(&scenario("base", 6.0)).expect("valid scenario");
        let r: f64 = 0.005;
        let growth = (1.0 + r).powi(240);
        let expected = 10_000.0 * growth + 500.0 * (growth - 1.0) / r;
        assert!((result.final_amount - expected).abs() < 1e-6 * expected);
        assert_eq!(result.timeline.len(), 21);
    }

    #[test]
    fn zero_years_reports_only_the_starting_point() {
        let mut inputs = scenario("idle", 5.0);
        inputs.years = 0;
        let result = compute_scenario(&inputs).expect("valid scenario");
        assert_eq!(result.timeline.len(), 1);
        assert_approx(result.final_amount, 10_000.0);
    }

    #[test]
    fn horizons_beyond_the_limit_are_rejected() {
        let mut inputs = scenario("long", 5.0);
        inputs.years = MAX_SCENARIO_YEARS;
        let result = compute_scenario(&inputs).expect("longest horizon is accepted");
        assert_eq!(result.timeline.len(), MAX_SCENARIO_YEARS as usize + 1);

        inputs.years = u32::MAX;
        assert_eq!(
            compute_scenario(&inputs),
            Err(CalcError::AboveLimit {
                field: "years",
                max: MAX_SCENARIO_YEARS,
                value: u32::MAX,
            })
        );
    }

    #[test]
    fn comparison_ranks_best_first() {
        let scenarios: Vec<Scenario> = [("low", 3.0), ("high", 9.0), ("mid", 6.0)]
            .into_iter()
            .map(|(name, rate)| build_scenario(scenario(name, rate)).expect("valid scenario"))
            .collect();
        let ranking = compare_scenarios(&scenarios);

        let names: Vec<&str> = ranking.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["high", "mid", "low"]);
        assert_eq!(ranking[0].gap_to_best, 0.0);
        assert!(ranking[2].gap_to_best > ranking[1].gap_to_best);
        assert_eq!(ranking[2].rank, 3);
    }

    #[test]
    fn comparison_of_nothing_is_empty() {
        assert!(compare_scenarios(&[]).is_empty());
    }
}
