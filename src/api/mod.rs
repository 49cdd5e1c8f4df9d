use axum::{
    Router,
    extract::{Json, Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::net::TcpListener;
use tracing::info;

use crate::chart::{
    ChartSeries, Frame, LineChart, PhasedAreaChart, PieDatum, PieSegment, pie_segments,
};
use crate::cli::{CliFrequency, InvestmentArgs, LoanArgs, MortgageArgs, RetirementArgs};
use crate::core::{
    AmortizationYear, CompoundingFrequency, InvestmentInputs, InvestmentResult, LoanInputs,
    LoanResult, MortgageInputs, MortgageResult, RetirementInputs, RetirementResult, Scenario,
    ScenarioInputs, ScenarioRanking, amortization_schedule, build_scenario, compare_scenarios,
    compute_investment, compute_loan, compute_mortgage, compute_retirement,
};
use crate::error::{CalcError, SnapshotError};
use crate::session::{Calculation, Currency, Session};

const PIE_SIZE: f64 = 200.0;
const PRINCIPAL_COLOR: &str = "#4f46e5";
const INTEREST_COLOR: &str = "#f59e0b";
const DOWN_PAYMENT_COLOR: &str = "#10b981";

const SCENARIO_INITIAL_INVESTMENT: f64 = 10_000.0;
const SCENARIO_MONTHLY_CONTRIBUTION: f64 = 500.0;
const SCENARIO_INTEREST_RATE: f64 = 7.0;
const SCENARIO_YEARS: u32 = 20;

type SharedSession = Arc<Mutex<Session>>;

impl From<CompoundingFrequency> for CliFrequency {
    fn from(value: CompoundingFrequency) -> Self {
        match value {
            CompoundingFrequency::Annually => CliFrequency::Annually,
            CompoundingFrequency::SemiAnnually => CliFrequency::SemiAnnually,
            CompoundingFrequency::Quarterly => CliFrequency::Quarterly,
            CompoundingFrequency::Monthly => CliFrequency::Monthly,
            CompoundingFrequency::Daily => CliFrequency::Daily,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct LoanPayload {
    #[serde(alias = "principal")]
    loan_amount: Option<f64>,
    #[serde(alias = "annualRate")]
    interest_rate: Option<f64>,
    #[serde(alias = "termYears")]
    loan_term: Option<u32>,
    currency: Option<Currency>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct MortgagePayload {
    home_price: Option<f64>,
    down_payment: Option<f64>,
    down_payment_percent: Option<f64>,
    #[serde(alias = "annualRate")]
    interest_rate: Option<f64>,
    #[serde(alias = "termYears")]
    loan_term: Option<u32>,
    currency: Option<Currency>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct InvestmentPayload {
    #[serde(alias = "initialAmount")]
    initial_investment: Option<f64>,
    monthly_contribution: Option<f64>,
    #[serde(alias = "annualRate")]
    interest_rate: Option<f64>,
    #[serde(alias = "years")]
    years_to_grow: Option<u32>,
    #[serde(alias = "frequency")]
    compounding_frequency: Option<String>,
    currency: Option<Currency>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RetirementPayload {
    current_age: Option<u32>,
    retirement_age: Option<u32>,
    current_savings: Option<f64>,
    monthly_contribution: Option<f64>,
    expected_return: Option<f64>,
    retirement_length: Option<u32>,
    inflation_rate: Option<f64>,
    withdrawal_rate: Option<f64>,
    currency: Option<Currency>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ScenarioPayload {
    name: Option<String>,
    initial_investment: Option<f64>,
    monthly_contribution: Option<f64>,
    #[serde(alias = "annualRate")]
    interest_rate: Option<f64>,
    years: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ScenariosPayload {
    scenarios: Vec<ScenarioPayload>,
}

/// Body of `POST /api/history`: a calculator payload tagged with its kind.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum RecordPayload {
    Loan(LoanPayload),
    Mortgage(MortgagePayload),
    Investment(InvestmentPayload),
    Retirement(RetirementPayload),
}

#[derive(Debug, Deserialize)]
struct CurrencyPayload {
    currency: Currency,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanResponse {
    pub currency: Currency,
    pub inputs: LoanInputs,
    pub results: LoanResult,
    pub schedule: Vec<AmortizationYear>,
    pub breakdown: Vec<PieSegment>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MortgageResponse {
    pub currency: Currency,
    pub inputs: MortgageInputs,
    pub results: MortgageResult,
    pub schedule: Vec<AmortizationYear>,
    pub breakdown: Vec<PieSegment>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentResponse {
    pub currency: Currency,
    pub inputs: InvestmentInputs,
    pub results: InvestmentResult,
    pub chart: Option<LineChart>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementResponse {
    pub currency: Currency,
    pub inputs: RetirementInputs,
    pub results: RetirementResult,
    pub depleted: bool,
    pub chart: Option<PhasedAreaChart>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioResponse {
    pub scenarios: Vec<Scenario>,
    pub rankings: Vec<ScenarioRanking>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CurrencyResponse {
    currency: Currency,
    symbol: &'static str,
    available: &'static [Currency],
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn loan_response(inputs: LoanInputs, currency: Currency) -> Result<LoanResponse, CalcError> {
    let results = compute_loan(&inputs)?;
    let breakdown = pie_segments(
        &[
            PieDatum::new("Principal", inputs.principal, PRINCIPAL_COLOR),
            PieDatum::new("Interest", results.total_interest, INTEREST_COLOR),
        ],
        PIE_SIZE,
    );
    Ok(LoanResponse {
        currency,
        inputs,
        results,
        schedule: amortization_schedule(&inputs, &results),
        breakdown,
    })
}

pub fn mortgage_response(
    inputs: MortgageInputs,
    currency: Currency,
) -> Result<MortgageResponse, CalcError> {
    let results = compute_mortgage(&inputs)?;
    let loan = LoanInputs {
        principal: results.principal,
        annual_rate: inputs.annual_rate,
        term_years: inputs.term_years,
    };
    let loan_result = LoanResult {
        monthly_payment: results.monthly_payment,
        total_payment: results.total_payment,
        total_interest: results.total_interest,
    };
    let breakdown = pie_segments(
        &[
            PieDatum::new("Principal", results.principal, PRINCIPAL_COLOR),
            PieDatum::new("Interest", results.total_interest, INTEREST_COLOR),
            PieDatum::new("Down Payment", results.down_payment, DOWN_PAYMENT_COLOR),
        ],
        PIE_SIZE,
    );
    Ok(MortgageResponse {
        currency,
        inputs,
        results,
        schedule: amortization_schedule(&loan, &loan_result),
        breakdown,
    })
}

pub fn investment_response(
    inputs: InvestmentInputs,
    currency: Currency,
) -> Result<InvestmentResponse, CalcError> {
    let results = compute_investment(&inputs)?;
    let series: ChartSeries = results
        .series
        .iter()
        .map(|p| (f64::from(p.year), p.value))
        .collect();
    let chart = LineChart::build(&series, &Frame::default(), currency);
    Ok(InvestmentResponse {
        currency,
        inputs,
        results,
        chart,
    })
}

pub fn retirement_response(
    inputs: RetirementInputs,
    currency: Currency,
) -> Result<RetirementResponse, CalcError> {
    let results = compute_retirement(&inputs)?;
    let series: ChartSeries = results
        .series
        .iter()
        .map(|p| (f64::from(p.age), p.balance))
        .collect();
    let chart = PhasedAreaChart::build(
        &series,
        results.distribution_start(),
        &Frame::default(),
        currency,
    );
    Ok(RetirementResponse {
        currency,
        inputs,
        depleted: results.depleted(),
        results,
        chart,
    })
}

pub fn scenario_response(inputs: Vec<ScenarioInputs>) -> Result<ScenarioResponse, CalcError> {
    let scenarios = inputs
        .into_iter()
        .map(build_scenario)
        .collect::<Result<Vec<_>, _>>()?;
    let rankings = compare_scenarios(&scenarios);
    Ok(ScenarioResponse {
        scenarios,
        rankings,
    })
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let session: SharedSession = Arc::new(Mutex::new(Session::default()));
    let app = Router::new()
        .route("/api/loan", get(loan_get_handler).post(loan_post_handler))
        .route(
            "/api/mortgage",
            get(mortgage_get_handler).post(mortgage_post_handler),
        )
        .route(
            "/api/investment",
            get(investment_get_handler).post(investment_post_handler),
        )
        .route(
            "/api/retirement",
            get(retirement_get_handler).post(retirement_post_handler),
        )
        .route("/api/scenarios", post(scenarios_handler))
        .route(
            "/api/history",
            get(history_list_handler)
                .post(history_record_handler)
                .delete(history_clear_handler),
        )
        .route("/api/history/:id", get(history_entry_handler))
        .route("/api/history/:id/export", get(history_export_handler))
        .route("/api/import", post(history_import_handler))
        .route(
            "/api/currency",
            get(currency_get_handler).put(currency_put_handler),
        )
        .fallback(not_found_handler)
        .with_state(session);

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "fincalc HTTP API listening");
    info!("local access: http://127.0.0.1:{port}/api/loan");

    axum::serve(listener, app).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn loan_get_handler(
    State(session): State<SharedSession>,
    Query(payload): Query<LoanPayload>,
) -> Response {
    loan_handler_impl(&session, payload)
}

async fn loan_post_handler(
    State(session): State<SharedSession>,
    Json(payload): Json<LoanPayload>,
) -> Response {
    loan_handler_impl(&session, payload)
}

fn loan_handler_impl(session: &SharedSession, payload: LoanPayload) -> Response {
    let currency = resolve_currency(session, payload.currency);
    calculation_response(loan_response(loan_inputs_from_payload(&payload), currency))
}

async fn mortgage_get_handler(
    State(session): State<SharedSession>,
    Query(payload): Query<MortgagePayload>,
) -> Response {
    mortgage_handler_impl(&session, payload)
}

async fn mortgage_post_handler(
    State(session): State<SharedSession>,
    Json(payload): Json<MortgagePayload>,
) -> Response {
    mortgage_handler_impl(&session, payload)
}

fn mortgage_handler_impl(session: &SharedSession, payload: MortgagePayload) -> Response {
    let currency = resolve_currency(session, payload.currency);
    calculation_response(mortgage_response(
        mortgage_inputs_from_payload(&payload),
        currency,
    ))
}

async fn investment_get_handler(
    State(session): State<SharedSession>,
    Query(payload): Query<InvestmentPayload>,
) -> Response {
    investment_handler_impl(&session, payload)
}

async fn investment_post_handler(
    State(session): State<SharedSession>,
    Json(payload): Json<InvestmentPayload>,
) -> Response {
    investment_handler_impl(&session, payload)
}

fn investment_handler_impl(session: &SharedSession, payload: InvestmentPayload) -> Response {
    let currency = resolve_currency(session, payload.currency);
    calculation_response(
        investment_inputs_from_payload(&payload)
            .and_then(|inputs| investment_response(inputs, currency)),
    )
}

async fn retirement_get_handler(
    State(session): State<SharedSession>,
    Query(payload): Query<RetirementPayload>,
) -> Response {
    retirement_handler_impl(&session, payload)
}

async fn retirement_post_handler(
    State(session): State<SharedSession>,
    Json(payload): Json<RetirementPayload>,
) -> Response {
    retirement_handler_impl(&session, payload)
}

fn retirement_handler_impl(session: &SharedSession, payload: RetirementPayload) -> Response {
    let currency = resolve_currency(session, payload.currency);
    calculation_response(retirement_response(
        retirement_inputs_from_payload(&payload),
        currency,
    ))
}

async fn scenarios_handler(Json(payload): Json<ScenariosPayload>) -> Response {
    let inputs = match scenario_inputs_from_payload(payload) {
        Ok(inputs) => inputs,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };
    calculation_response(scenario_response(inputs))
}

async fn history_list_handler(State(session): State<SharedSession>) -> Response {
    let entries = lock(&session).history.entries().to_vec();
    json_response(StatusCode::OK, entries)
}

async fn history_record_handler(
    State(session): State<SharedSession>,
    Json(payload): Json<RecordPayload>,
) -> Response {
    let calculation = match calculation_from_payload(payload) {
        Ok(calculation) => calculation,
        Err(err) => return error_response(StatusCode::BAD_REQUEST, &err.to_string()),
    };
    let snapshot = lock(&session).record(calculation).clone();
    json_response(StatusCode::CREATED, snapshot)
}

async fn history_clear_handler(State(session): State<SharedSession>) -> Response {
    lock(&session).history.clear();
    with_cache_control(StatusCode::NO_CONTENT)
}

async fn history_entry_handler(
    State(session): State<SharedSession>,
    Path(id): Path<String>,
) -> Response {
    let entry = lock(&session).history.find(&id).cloned();
    match entry {
        Some(entry) => json_response(StatusCode::OK, entry),
        None => snapshot_error_response(SnapshotError::NotFound(id)),
    }
}

async fn history_export_handler(
    State(session): State<SharedSession>,
    Path(id): Path<String>,
) -> Response {
    let exported = {
        let guard = lock(&session);
        guard.history.export_json(&id).map(|document| {
            let kind = guard
                .history
                .find(&id)
                .map_or("calculation", |entry| entry.calculation.kind());
            (kind, document)
        })
    };
    match exported {
        Ok((kind, document)) => {
            let disposition = format!("attachment; filename=\"{kind}-calculation-{id}.json\"");
            with_cache_control((
                [
                    (header::CONTENT_TYPE, "application/json".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                document,
            ))
        }
        Err(err) => snapshot_error_response(err),
    }
}

async fn history_import_handler(State(session): State<SharedSession>, body: String) -> Response {
    let imported = lock(&session).history.import_json(&body).cloned();
    match imported {
        Ok(snapshot) => json_response(StatusCode::CREATED, snapshot),
        Err(err) => snapshot_error_response(err),
    }
}

async fn currency_get_handler(State(session): State<SharedSession>) -> Response {
    let currency = lock(&session).currency;
    json_response(StatusCode::OK, currency_body(currency))
}

async fn currency_put_handler(
    State(session): State<SharedSession>,
    Json(payload): Json<CurrencyPayload>,
) -> Response {
    lock(&session).currency = payload.currency;
    info!(currency = %payload.currency, "switched display currency");
    json_response(StatusCode::OK, currency_body(payload.currency))
}

fn currency_body(currency: Currency) -> CurrencyResponse {
    CurrencyResponse {
        currency,
        symbol: currency.symbol(),
        available: &Currency::ALL,
    }
}

fn lock(session: &SharedSession) -> MutexGuard<'_, Session> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

fn resolve_currency(session: &SharedSession, requested: Option<Currency>) -> Currency {
    requested.unwrap_or_else(|| lock(session).currency)
}

fn calculation_response<T: Serialize>(result: Result<T, CalcError>) -> Response {
    match result {
        Ok(body) => json_response(StatusCode::OK, body),
        Err(err) => error_response(StatusCode::BAD_REQUEST, &err.to_string()),
    }
}

fn snapshot_error_response(err: SnapshotError) -> Response {
    let status = match err {
        SnapshotError::NotFound(_) => StatusCode::NOT_FOUND,
        SnapshotError::Serde(_) => StatusCode::BAD_REQUEST,
    };
    error_response(status, &err.to_string())
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

fn loan_inputs_from_payload(payload: &LoanPayload) -> LoanInputs {
    let mut args = LoanArgs::default();
    if let Some(v) = payload.loan_amount {
        args.loan_amount = v;
    }
    if let Some(v) = payload.interest_rate {
        args.interest_rate = v;
    }
    if let Some(v) = payload.loan_term {
        args.loan_term = v;
    }
    LoanInputs::from(&args)
}

fn mortgage_inputs_from_payload(payload: &MortgagePayload) -> MortgageInputs {
    let mut args = MortgageArgs::default();
    if let Some(v) = payload.home_price {
        args.home_price = v;
    }
    if let Some(v) = payload.down_payment {
        args.down_payment = Some(v);
    }
    if let Some(v) = payload.down_payment_percent {
        args.down_payment_percent = v;
    }
    if let Some(v) = payload.interest_rate {
        args.interest_rate = v;
    }
    if let Some(v) = payload.loan_term {
        args.loan_term = v;
    }
    MortgageInputs::from(&args)
}

fn investment_inputs_from_payload(
    payload: &InvestmentPayload,
) -> Result<InvestmentInputs, CalcError> {
    let mut args = InvestmentArgs::default();
    if let Some(v) = payload.initial_investment {
        args.initial_investment = v;
    }
    if let Some(v) = payload.monthly_contribution {
        args.monthly_contribution = v;
    }
    if let Some(v) = payload.interest_rate {
        args.interest_rate = v;
    }
    if let Some(v) = payload.years_to_grow {
        args.years_to_grow = v;
    }
    if let Some(v) = payload.compounding_frequency.as_deref() {
        args.compounding_frequency = v.parse::<CompoundingFrequency>()?.into();
    }
    Ok(InvestmentInputs::from(&args))
}

fn retirement_inputs_from_payload(payload: &RetirementPayload) -> RetirementInputs {
    let mut args = RetirementArgs::default();
    if let Some(v) = payload.current_age {
        args.current_age = v;
    }
    if let Some(v) = payload.retirement_age {
        args.retirement_age = v;
    }
    if let Some(v) = payload.current_savings {
        args.current_savings = v;
    }
    if let Some(v) = payload.monthly_contribution {
        args.monthly_contribution = v;
    }
    if let Some(v) = payload.expected_return {
        args.expected_return = v;
    }
    if let Some(v) = payload.retirement_length {
        args.retirement_length = v;
    }
    if let Some(v) = payload.inflation_rate {
        args.inflation_rate = v;
    }
    if let Some(v) = payload.withdrawal_rate {
        args.withdrawal_rate = v;
    }
    RetirementInputs::from(&args)
}

fn scenario_inputs_from_payload(payload: ScenariosPayload) -> Result<Vec<ScenarioInputs>, String> {
    if payload.scenarios.is_empty() {
        return Err("at least one scenario is required".to_string());
    }

    payload
        .scenarios
        .into_iter()
        .enumerate()
        .map(|(idx, scenario)| -> Result<ScenarioInputs, String> {
            let name = scenario
                .name
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .ok_or_else(|| format!("scenario {} needs a name", idx + 1))?;
            Ok(ScenarioInputs {
                name,
                initial_investment: scenario
                    .initial_investment
                    .unwrap_or(SCENARIO_INITIAL_INVESTMENT),
                monthly_contribution: scenario
                    .monthly_contribution
                    .unwrap_or(SCENARIO_MONTHLY_CONTRIBUTION),
                annual_rate: scenario.interest_rate.unwrap_or(SCENARIO_INTEREST_RATE),
                years: scenario.years.unwrap_or(SCENARIO_YEARS),
            })
        })
        .collect()
}

fn calculation_from_payload(payload: RecordPayload) -> Result<Calculation, CalcError> {
    let calculation = match payload {
        RecordPayload::Loan(payload) => {
            let inputs = loan_inputs_from_payload(&payload);
            Calculation::Loan {
                results: compute_loan(&inputs)?,
                inputs,
            }
        }
        RecordPayload::Mortgage(payload) => {
            let inputs = mortgage_inputs_from_payload(&payload);
            Calculation::Mortgage {
                results: compute_mortgage(&inputs)?,
                inputs,
            }
        }
        RecordPayload::Investment(payload) => {
            let inputs = investment_inputs_from_payload(&payload)?;
            Calculation::Investment {
                results: compute_investment(&inputs)?,
                inputs,
            }
        }
        RecordPayload::Retirement(payload) => {
            let inputs = retirement_inputs_from_payload(&payload);
            Calculation::Retirement {
                results: compute_retirement(&inputs)?,
                inputs,
            }
        }
    };
    Ok(calculation)
}

#[cfg(test)]
fn record_payload_from_json(json: &str) -> Result<Calculation, String> {
    let payload = serde_json::from_str::<RecordPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    calculation_from_payload(payload).map_err(|e| e.to_string())
}
