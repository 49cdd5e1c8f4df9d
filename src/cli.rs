use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::core::{
    CompoundingFrequency, DownPayment, InvestmentInputs, LoanInputs, MortgageInputs,
    RetirementInputs,
};
use crate::session::Currency;

#[derive(Parser, Debug)]
#[command(
    name = "fincalc",
    about = "Loan, mortgage, investment and retirement calculators"
)]
pub struct Cli {
    #[arg(
        long,
        value_enum,
        global = true,
        default_value_t = CliCurrency::Usd,
        help = "Currency used for chart labels"
    )]
    pub currency: CliCurrency,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the JSON API over HTTP.
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
    /// Fixed-rate loan payment and amortization schedule.
    Loan(LoanArgs),
    /// Mortgage payment with a down payment.
    Mortgage(MortgageArgs),
    /// Compound growth of an initial amount plus monthly contributions.
    Investment(InvestmentArgs),
    /// Two-phase retirement projection.
    Retirement(RetirementArgs),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliCurrency {
    Usd,
    Eur,
    Gbp,
    Jpy,
    Cad,
}

impl From<CliCurrency> for Currency {
    fn from(value: CliCurrency) -> Self {
        match value {
            CliCurrency::Usd => Currency::Usd,
            CliCurrency::Eur => Currency::Eur,
            CliCurrency::Gbp => Currency::Gbp,
            CliCurrency::Jpy => Currency::Jpy,
            CliCurrency::Cad => Currency::Cad,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliFrequency {
    Annually,
    SemiAnnually,
    Quarterly,
    Monthly,
    Daily,
}

impl From<CliFrequency> for CompoundingFrequency {
    fn from(value: CliFrequency) -> Self {
        match value {
            CliFrequency::Annually => CompoundingFrequency::Annually,
            CliFrequency::SemiAnnually => CompoundingFrequency::SemiAnnually,
            CliFrequency::Quarterly => CompoundingFrequency::Quarterly,
            CliFrequency::Monthly => CompoundingFrequency::Monthly,
            CliFrequency::Daily => CompoundingFrequency::Daily,
        }
    }
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct LoanArgs {
    #[arg(long, default_value_t = 20_000.0)]
    pub loan_amount: f64,
    #[arg(long, default_value_t = 5.0, help = "Annual interest rate in percent")]
    pub interest_rate: f64,
    #[arg(long, default_value_t = 5, help = "Loan term in years")]
    pub loan_term: u32,
}

impl Default for LoanArgs {
    fn default() -> Self {
        Self {
            loan_amount: 20_000.0,
            interest_rate: 5.0,
            loan_term: 5,
        }
    }
}

impl From<&LoanArgs> for LoanInputs {
    fn from(args: &LoanArgs) -> Self {
        LoanInputs {
            principal: args.loan_amount,
            annual_rate: args.interest_rate,
            term_years: args.loan_term,
        }
    }
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct MortgageArgs {
    #[arg(long, default_value_t = 300_000.0)]
    pub home_price: f64,
    #[arg(long, help = "Down payment amount; takes precedence over --down-payment-percent")]
    pub down_payment: Option<f64>,
    #[arg(long, default_value_t = 20.0)]
    pub down_payment_percent: f64,
    #[arg(long, default_value_t = 4.5, help = "Annual interest rate in percent")]
    pub interest_rate: f64,
    #[arg(long, default_value_t = 30, help = "Loan term in years")]
    pub loan_term: u32,
}

impl Default for MortgageArgs {
    fn default() -> Self {
        Self {
            home_price: 300_000.0,
            down_payment: None,
            down_payment_percent: 20.0,
            interest_rate: 4.5,
            loan_term: 30,
        }
    }
}

impl From<&MortgageArgs> for MortgageInputs {
    fn from(args: &MortgageArgs) -> Self {
        let down_payment = match args.down_payment {
            Some(amount) => DownPayment::Amount(amount),
            None => DownPayment::Percent(args.down_payment_percent),
        };
        MortgageInputs {
            home_price: args.home_price,
            down_payment,
            annual_rate: args.interest_rate,
            term_years: args.loan_term,
        }
    }
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct InvestmentArgs {
    #[arg(long, default_value_t = 10_000.0)]
    pub initial_investment: f64,
    #[arg(long, default_value_t = 500.0)]
    pub monthly_contribution: f64,
    #[arg(long, default_value_t = 7.0, help = "Annual return in percent")]
    pub interest_rate: f64,
    #[arg(long, default_value_t = 20)]
    pub years_to_grow: u32,
    #[arg(long, value_enum, default_value_t = CliFrequency::Annually)]
    pub compounding_frequency: CliFrequency,
}

impl Default for InvestmentArgs {
    fn default() -> Self {
        Self {
            initial_investment: 10_000.0,
            monthly_contribution: 500.0,
            interest_rate: 7.0,
            years_to_grow: 20,
            compounding_frequency: CliFrequency::Annually,
        }
    }
}

impl From<&InvestmentArgs> for InvestmentInputs {
    fn from(args: &InvestmentArgs) -> Self {
        InvestmentInputs {
            initial_amount: args.initial_investment,
            monthly_contribution: args.monthly_contribution,
            annual_rate: args.interest_rate,
            years: args.years_to_grow,
            frequency: args.compounding_frequency.into(),
        }
    }
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct RetirementArgs {
    #[arg(long, default_value_t = 30)]
    pub current_age: u32,
    #[arg(long, default_value_t = 65)]
    pub retirement_age: u32,
    #[arg(long, default_value_t = 50_000.0)]
    pub current_savings: f64,
    #[arg(long, default_value_t = 500.0)]
    pub monthly_contribution: f64,
    #[arg(long, default_value_t = 7.0, help = "Expected annual return in percent")]
    pub expected_return: f64,
    #[arg(long, default_value_t = 25, help = "Years spent in retirement")]
    pub retirement_length: u32,
    #[arg(long, default_value_t = 2.5, help = "Annual inflation in percent")]
    pub inflation_rate: f64,
    #[arg(long, default_value_t = 4.0, help = "Initial annual withdrawal in percent")]
    pub withdrawal_rate: f64,
}

impl Default for RetirementArgs {
    fn default() -> Self {
        Self {
            current_age: 30,
            retirement_age: 65,
            current_savings: 50_000.0,
            monthly_contribution: 500.0,
            expected_return: 7.0,
            retirement_length: 25,
            inflation_rate: 2.5,
            withdrawal_rate: 4.0,
        }
    }
}

impl From<&RetirementArgs> for RetirementInputs {
    fn from(args: &RetirementArgs) -> Self {
        RetirementInputs {
            current_age: args.current_age,
            retirement_age: args.retirement_age,
            current_savings: args.current_savings,
            monthly_contribution: args.monthly_contribution,
            expected_return: args.expected_return,
            retirement_length: args.retirement_length,
            inflation_rate: args.inflation_rate,
            withdrawal_rate: args.withdrawal_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("fincalc").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn bare_subcommands_match_default_args() {
        match parse(&["loan"]).command {
            Command::Loan(args) => assert_eq!(args, LoanArgs::default()),
            other => panic!("unexpected command {other:?}"),
        }
        match parse(&["mortgage"]).command {
            Command::Mortgage(args) => assert_eq!(args, MortgageArgs::default()),
            other => panic!("unexpected command {other:?}"),
        }
        match parse(&["investment"]).command {
            Command::Investment(args) => assert_eq!(args, InvestmentArgs::default()),
            other => panic!("unexpected command {other:?}"),
        }
        match parse(&["retirement"]).command {
            Command::Retirement(args) => assert_eq!(args, RetirementArgs::default()),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn serve_defaults_to_port_8080() {
        assert!(matches!(
            parse(&["serve"]).command,
            Command::Serve { port: 8080 }
        ));
        assert!(matches!(
            parse(&["serve", "--port", "3000"]).command,
            Command::Serve { port: 3000 }
        ));
    }

    #[test]
    fn down_payment_amount_overrides_percent() {
        let Command::Mortgage(args) =
            parse(&["mortgage", "--down-payment", "45000", "--down-payment-percent", "10"]).command
        else {
            panic!("expected mortgage");
        };
        let inputs = MortgageInputs::from(&args);
        assert_eq!(inputs.down_payment, DownPayment::Amount(45_000.0));
    }

    #[test]
    fn frequency_and_currency_flags_parse() {
        let cli = parse(&[
            "investment",
            "--compounding-frequency",
            "semi-annually",
            "--currency",
            "gbp",
        ]);
        assert_eq!(Currency::from(cli.currency), Currency::Gbp);
        let Command::Investment(args) = cli.command else {
            panic!("expected investment");
        };
        assert_eq!(
            InvestmentInputs::from(&args).frequency,
            CompoundingFrequency::SemiAnnually
        );
    }
}
