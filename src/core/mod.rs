mod amortization;
mod growth;
mod retirement;
mod scenario;
mod types;

pub use amortization::{
    MAX_TERM_YEARS, amortization_schedule, compute_loan, compute_mortgage, resolve_down_payment,
};
pub use growth::{MAX_INVESTMENT_YEARS, compute_investment};
pub use retirement::{
    MAX_AGE, MAX_RETIREMENT_LENGTH, RECONCILE_TOLERANCE, closed_form_savings, compute_retirement,
};
pub use scenario::{MAX_SCENARIO_YEARS, build_scenario, compare_scenarios, compute_scenario};
pub use types::{
    AgeBalancePoint, AmortizationYear, CompoundingFrequency, DownPayment, InvestmentInputs,
    InvestmentResult, LoanInputs, LoanResult, MortgageInputs, MortgageResult, Phase,
    RetirementInputs, RetirementResult, Scenario, ScenarioInputs, ScenarioRanking,
    ScenarioResult, TimelinePoint, YearPoint,
};
