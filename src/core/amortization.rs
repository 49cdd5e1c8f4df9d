use tracing::debug;

use super::types::{
    AmortizationYear, DownPayment, LoanInputs, LoanResult, MortgageInputs, MortgageResult,
};
use crate::error::{CalcError, ensure_at_most, ensure_non_negative};

const MONTHS_PER_YEAR: u32 = 12;

/// Longest loan or mortgage term accepted, in years.
pub const MAX_TERM_YEARS: u32 = 50;

pub fn compute_loan(inputs: &LoanInputs) -> Result<LoanResult, CalcError> {
    let principal = ensure_non_negative("principal", inputs.principal)?;
    let annual_rate = ensure_non_negative("annualRate", inputs.annual_rate)?;
    if inputs.term_years == 0 {
        return Err(CalcError::ZeroTerm { field: "termYears" });
    }
    ensure_at_most("termYears", inputs.term_years, MAX_TERM_YEARS)?;

    let payments = inputs.term_years * MONTHS_PER_YEAR;
    let monthly_payment = monthly_payment(principal, annual_rate, payments);
    let total_payment = monthly_payment * payments as f64;

    debug!(
        principal,
        annual_rate,
        term_years = inputs.term_years,
        monthly_payment,
        "recomputed loan"
    );

    Ok(LoanResult {
        monthly_payment,
        total_payment,
        total_interest: total_payment - principal,
    })
}

pub fn compute_mortgage(inputs: &MortgageInputs) -> Result<MortgageResult, CalcError> {
    let home_price = ensure_non_negative("homePrice", inputs.home_price)?;
    let (down_payment, down_payment_percent) =
        resolve_down_payment(home_price, inputs.down_payment)?;

    let loan = compute_loan(&LoanInputs {
        principal: home_price - down_payment,
        annual_rate: inputs.annual_rate,
        term_years: inputs.term_years,
    })?;

    Ok(MortgageResult {
        principal: home_price - down_payment,
        down_payment,
        down_payment_percent,
        monthly_payment: loan.monthly_payment,
        total_payment: loan.total_payment,
        total_interest: loan.total_interest,
    })
}

/// Returns `(amount, percent of home price)` for either form of down payment.
pub fn resolve_down_payment(
    home_price: f64,
    down_payment: DownPayment,
) -> Result<(f64, f64), CalcError> {
    let (amount, percent) = match down_payment {
        DownPayment::Amount(amount) => {
            let amount = ensure_non_negative("downPayment", amount)?;
            let percent = if home_price > 0.0 {
                amount / home_price * 100.0
            } else {
                0.0
            };
            (amount, percent)
        }
        DownPayment::Percent(percent) => {
            let percent = ensure_non_negative("downPaymentPercent", percent)?;
            (home_price * percent / 100.0, percent)
        }
    };

    if amount > home_price {
        return Err(CalcError::OutOfRange {
            field: "downPayment",
            requirement: "<= homePrice",
            value: amount,
        });
    }
    Ok((amount, percent))
}

/// Year-by-year split of the fixed payment into principal and interest.
pub fn amortization_schedule(inputs: &LoanInputs, result: &LoanResult) -> Vec<AmortizationYear> {
    let monthly_rate = inputs.annual_rate / 100.0 / MONTHS_PER_YEAR as f64;
    let mut balance = inputs.principal;
    let mut schedule = Vec::with_capacity(inputs.term_years as usize);

    for year in 1..=inputs.term_years {
        let mut principal_paid = 0.0;
        let mut interest_paid = 0.0;
        for _ in 0..MONTHS_PER_YEAR {
            let interest = balance * monthly_rate;
            let principal = (result.monthly_payment - interest).min(balance);
            interest_paid += interest;
            principal_paid += principal;
            balance -= principal;
        }
        // Float drift leaves a residue of a few ulps after the final payment.
        balance = if year == inputs.term_years {
            0.0
        } else {
            balance.max(0.0)
        };
        schedule.push(AmortizationYear {
            year,
            principal_paid,
            interest_paid,
            remaining_balance: balance,
        });
    }

    schedule
}

fn monthly_payment(principal: f64, annual_rate: f64, payments: u32) -> f64 {
    let monthly_rate = annual_rate / 100.0 / MONTHS_PER_YEAR as f64;
    if monthly_rate == 0.0 {
        return principal / payments as f64;
    }
    let growth = (1.0 + monthly_rate).powi(payments as i32);
    principal * monthly_rate * growth / (growth - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn assert_approx_tol(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    fn sample_loan() -> LoanInputs {
        LoanInputs {
            principal: 20_000.0,
            annual_rate: 5.0,
            term_years: 5,
        }
    }

    #[test]
    fn oracle_five_year_car_loan_matches_published_payment() {
        let result = compute_loan(&sample_loan()).expect("valid loan");
        assert_approx_tol(result.monthly_payment, 377.42, 0.01);
        assert_approx_tol(result.total_interest, 2_645.48, 0.05);
        assert_approx(result.total_payment, result.monthly_payment * 60.0);
    }

    #[test]
    fn zero_rate_is_straight_line() {
        let mut inputs = sample_loan();
        inputs.annual_rate = 0.0;
        let result = compute_loan(&inputs).expect("valid loan");
        assert_approx(result.monthly_payment, 20_000.0 / 60.0);
        assert_approx(result.total_interest, 0.0);
        assert!(result.monthly_payment.is_finite());
    }

    #[test]
    fn zero_term_is_rejected() {
        let mut inputs = sample_loan();
        inputs.term_years = 0;
        assert_eq!(
            compute_loan(&inputs),
            Err(CalcError::ZeroTerm { field: "termYears" })
        );
    }

    #[test]
    fn terms_beyond_the_limit_are_rejected() {
        let mut inputs = sample_loan();
        inputs.term_years = MAX_TERM_YEARS;
        assert!(compute_loan(&inputs).is_ok());

        inputs.term_years = 400_000_000;
        assert_eq!(
            compute_loan(&inputs),
            Err(CalcError::AboveLimit {
                field: "termYears",
                max: MAX_TERM_YEARS,
                value: 400_000_000,
            })
        );

        let mortgage = compute_mortgage(&MortgageInputs {
            home_price: 300_000.0,
            down_payment: DownPayment::Percent(20.0),
            annual_rate: 4.5,
            term_years: u32::MAX,
        });
        assert!(matches!(mortgage, Err(CalcError::AboveLimit { .. })));
    }

    #[test]
    fn negative_rate_and_nan_principal_are_rejected() {
        let mut inputs = sample_loan();
        inputs.annual_rate = -1.0;
        assert!(compute_loan(&inputs).is_err());

        let mut inputs = sample_loan();
        inputs.principal = f64::NAN;
        assert_eq!(
            compute_loan(&inputs),
            Err(CalcError::NotFinite { field: "principal" })
        );
    }

    #[test]
    fn mortgage_percent_and_amount_down_payments_agree() {
        let by_percent = compute_mortgage(&MortgageInputs {
            home_price: 300_000.0,
            down_payment: DownPayment::Percent(20.0),
            annual_rate: 4.5,
            term_years: 30,
        })
        .expect("valid mortgage");
        let by_amount = compute_mortgage(&MortgageInputs {
            home_price: 300_000.0,
            down_payment: DownPayment::Amount(60_000.0),
            annual_rate: 4.5,
            term_years: 30,
        })
        .expect("valid mortgage");

        assert_approx(by_percent.principal, 240_000.0);
        assert_approx(by_amount.down_payment_percent, 20.0);
        assert_approx(by_percent.monthly_payment, by_amount.monthly_payment);
        assert_approx_tol(by_percent.monthly_payment, 1_216.04, 0.01);
    }

    #[test]
    fn mortgage_down_payment_above_price_is_rejected() {
        let err = compute_mortgage(&MortgageInputs {
            home_price: 100_000.0,
            down_payment: DownPayment::Amount(150_000.0),
            annual_rate: 4.0,
            term_years: 30,
        })
        .expect_err("down payment too large");
        assert!(err.to_string().contains("downPayment"));
    }

    #[test]
    fn schedule_repays_principal_and_interest_in_full() {
        let inputs = sample_loan();
        let result = compute_loan(&inputs).expect("valid loan");
        let schedule = amortization_schedule(&inputs, &result);

        assert_eq!(schedule.len(), 5);
        let principal: f64 = schedule.iter().map(|y| y.principal_paid).sum();
        let interest: f64 = schedule.iter().map(|y| y.interest_paid).sum();
        assert_approx_tol(principal, 20_000.0, 1e-6);
        assert_approx_tol(interest, result.total_interest, 1e-6);
        assert_eq!(schedule.last().map(|y| y.remaining_balance), Some(0.0));
        assert!(
            schedule
                .windows(2)
                .all(|w| w[1].remaining_balance <= w[0].remaining_balance)
        );
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_loan_totals_are_consistent(
            principal in 1_000u32..1_000_000,
            rate_bp in 0u32..2_000,
            term in 1u32..40,
        ) {
            let inputs = LoanInputs {
                principal: principal as f64,
                annual_rate: rate_bp as f64 / 100.0,
                term_years: term,
            };
            let result = compute_loan(&inputs).expect("valid loan");
            let n = (term * 12) as f64;

            prop_assert!(result.monthly_payment > 0.0);
            prop_assert!((result.total_payment - result.monthly_payment * n).abs() <= 1e-6 * result.total_payment);
            prop_assert!((result.total_interest - (result.total_payment - inputs.principal)).abs() <= 1e-6);
            prop_assert!(result.total_interest >= -1e-6);
            prop_assert!(result.monthly_payment >= inputs.principal / n - 1e-9);
        }

        #[test]
        fn prop_tiny_rates_approach_straight_line(
            principal in 1_000u32..500_000,
            term in 1u32..30,
        ) {
            let inputs = LoanInputs {
                principal: principal as f64,
                annual_rate: 1e-4,
                term_years: term,
            };
            let result = compute_loan(&inputs).expect("valid loan");
            let straight = inputs.principal / (term * 12) as f64;
            prop_assert!((result.monthly_payment - straight).abs() / straight < 1e-4);
        }
    }
}
