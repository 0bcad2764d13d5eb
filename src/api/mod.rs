mod error;

pub use error::{ApiError, ApiResult};

use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    Assumptions, DEFAULT_AGE, DEFAULT_DESIRED_CASHFLOW, DEFAULT_HOLDINGS, DEFAULT_INTEREST_RATE,
    DEFAULT_REFERENCE_PRICE, DEFAULT_STARTING_YEAR, GrowthRates, Projection, RankMetric,
    SCHEDULE_END_YEAR, ScenarioConfig, ScenarioType, ScheduleParams, ScheduleSummary, Selection,
    StrategyConfig, StrategyType, YearData, YearResult, compare_strategies, compute_schedule,
    current_year, project, rank_projections, scenario_configs, selectable_starting_years,
    strategy_configs, summarize_schedule, update_year_growth_rate,
};

const MAX_SCHEDULE_YEARS: i32 = 100;
const CALENDAR_YEARS: std::ops::RangeInclusive<i32> = 1900..=3000;
const AGES: std::ops::RangeInclusive<i32> = 0..=150;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliStrategy {
    Normie,
    Btc10,
    #[value(alias = "btc_maxi")]
    BtcMaxi,
    #[value(alias = "double_maxi")]
    DoubleMaxi,
    #[value(alias = "triple_maxi")]
    TripleMaxi,
}

impl From<CliStrategy> for StrategyType {
    fn from(value: CliStrategy) -> Self {
        match value {
            CliStrategy::Normie => StrategyType::Normie,
            CliStrategy::Btc10 => StrategyType::Btc10,
            CliStrategy::BtcMaxi => StrategyType::BtcMaxi,
            CliStrategy::DoubleMaxi => StrategyType::DoubleMaxi,
            CliStrategy::TripleMaxi => StrategyType::TripleMaxi,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliScenario {
    Individual,
    Corporate,
    Institution,
    #[value(alias = "nation_state")]
    NationState,
}

impl From<CliScenario> for ScenarioType {
    fn from(value: CliScenario) -> Self {
        match value {
            CliScenario::Individual => ScenarioType::Individual,
            CliScenario::Corporate => ScenarioType::Corporate,
            CliScenario::Institution => ScenarioType::Institution,
            CliScenario::NationState => ScenarioType::NationState,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliRankMetric {
    FinalValue,
    TotalReturn,
    AnnualizedReturn,
}

impl From<CliRankMetric> for RankMetric {
    fn from(value: CliRankMetric) -> Self {
        match value {
            CliRankMetric::FinalValue => RankMetric::FinalValue,
            CliRankMetric::TotalReturn => RankMetric::TotalReturn,
            CliRankMetric::AnnualizedReturn => RankMetric::AnnualizedReturn,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ApiStrategy {
    Normie,
    Btc10,
    #[serde(alias = "btcMaxi", alias = "btc-maxi")]
    BtcMaxi,
    #[serde(alias = "doubleMaxi", alias = "double-maxi")]
    DoubleMaxi,
    #[serde(alias = "tripleMaxi", alias = "triple-maxi")]
    TripleMaxi,
}

impl From<ApiStrategy> for CliStrategy {
    fn from(value: ApiStrategy) -> Self {
        match value {
            ApiStrategy::Normie => CliStrategy::Normie,
            ApiStrategy::Btc10 => CliStrategy::Btc10,
            ApiStrategy::BtcMaxi => CliStrategy::BtcMaxi,
            ApiStrategy::DoubleMaxi => CliStrategy::DoubleMaxi,
            ApiStrategy::TripleMaxi => CliStrategy::TripleMaxi,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ApiScenario {
    Individual,
    Corporate,
    Institution,
    #[serde(alias = "nationState", alias = "nation-state")]
    NationState,
}

impl From<ApiScenario> for CliScenario {
    fn from(value: ApiScenario) -> Self {
        match value {
            ApiScenario::Individual => CliScenario::Individual,
            ApiScenario::Corporate => CliScenario::Corporate,
            ApiScenario::Institution => CliScenario::Institution,
            ApiScenario::NationState => CliScenario::NationState,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
enum ApiRankMetric {
    #[serde(alias = "final_value", alias = "final-value")]
    FinalValue,
    #[serde(alias = "total_return", alias = "total-return")]
    TotalReturn,
    #[serde(alias = "annualized_return", alias = "annualized-return")]
    AnnualizedReturn,
}

impl From<ApiRankMetric> for CliRankMetric {
    fn from(value: ApiRankMetric) -> Self {
        match value {
            ApiRankMetric::FinalValue => CliRankMetric::FinalValue,
            ApiRankMetric::TotalReturn => CliRankMetric::TotalReturn,
            ApiRankMetric::AnnualizedReturn => CliRankMetric::AnnualizedReturn,
        }
    }
}

impl From<RankMetric> for ApiRankMetric {
    fn from(value: RankMetric) -> Self {
        match value {
            RankMetric::FinalValue => ApiRankMetric::FinalValue,
            RankMetric::TotalReturn => ApiRankMetric::TotalReturn,
            RankMetric::AnnualizedReturn => ApiRankMetric::AnnualizedReturn,
        }
    }
}

/// Strategy projection inputs. Unset assumption fields fall back to the
/// scenario defaults with the strategy's allocation applied.
#[derive(Args, Debug, Clone)]
pub struct ProjectionCli {
    #[arg(long, value_enum, default_value_t = CliStrategy::Btc10)]
    pub strategy: CliStrategy,
    #[arg(long, value_enum, default_value_t = CliScenario::Individual)]
    pub scenario: CliScenario,
    #[arg(
        long,
        default_value_t = DEFAULT_REFERENCE_PRICE,
        help = "Current bitcoin price in USD"
    )]
    pub reference_price: f64,
    #[arg(long, help = "Initial investment in USD, defaults to the scenario amount")]
    pub initial_investment: Option<f64>,
    #[arg(long, help = "Expected annual inflation in percent")]
    pub inflation_rate: Option<f64>,
    #[arg(long, help = "Annual traditional asset return in percent")]
    pub traditional_return: Option<f64>,
    #[arg(long, help = "Bitcoin allocation in percent, defaults to the strategy allocation")]
    pub bitcoin_allocation: Option<f64>,
    #[arg(long, help = "Annual bitcoin growth rate in percent")]
    pub bitcoin_growth_rate: Option<f64>,
    #[arg(long, help = "Years until adoption saturates (1-21)")]
    pub adoption_timeline: Option<f64>,
    #[arg(long, help = "Flat price multiplier (0.1-3.0)")]
    pub volatility_factor: Option<f64>,
    #[arg(long, help = "Regulatory risk in percent (0-50)")]
    pub regulatory_risk: Option<f64>,
    #[arg(long, help = "Technology risk in percent (0-50)")]
    pub technology_risk: Option<f64>,
    #[arg(long, help = "Tax rate in percent")]
    pub tax_rate: Option<f64>,
    #[arg(long)]
    pub inflation_hedge: Option<bool>,
    #[arg(long)]
    pub dollar_cost_averaging: Option<bool>,
}

#[derive(Args, Debug, Clone)]
pub struct CompareCli {
    #[arg(
        long,
        value_enum,
        value_delimiter = ',',
        default_values_t = [CliStrategy::Normie, CliStrategy::Btc10, CliStrategy::BtcMaxi]
    )]
    pub strategies: Vec<CliStrategy>,
    #[arg(long, value_enum, default_value_t = CliRankMetric::FinalValue)]
    pub rank_by: CliRankMetric,
    #[command(flatten)]
    pub projection: ProjectionCli,
}

#[derive(Args, Debug, Clone)]
pub struct ScheduleCli {
    #[arg(long, default_value_t = DEFAULT_HOLDINGS, help = "Bitcoin held")]
    pub holdings: f64,
    #[arg(
        long,
        default_value_t = DEFAULT_REFERENCE_PRICE,
        help = "Bitcoin price in USD at the first simulated year"
    )]
    pub starting_price: f64,
    #[arg(long, default_value_t = DEFAULT_STARTING_YEAR, help = "Year of the first loan")]
    pub starting_year: i32,
    #[arg(long, default_value_t = DEFAULT_INTEREST_RATE, help = "Loan interest rate in percent")]
    pub interest_rate: f64,
    #[arg(long, default_value_t = DEFAULT_DESIRED_CASHFLOW, help = "Target annual cash flow in USD")]
    pub desired_cashflow: f64,
    #[arg(long, default_value_t = DEFAULT_AGE, help = "Age in the first simulated year")]
    pub age: i32,
    #[arg(long, help = "First simulated year, defaults to the current calendar year")]
    pub current_year: Option<i32>,
    #[arg(long, default_value_t = SCHEDULE_END_YEAR)]
    pub end_year: i32,
    #[arg(
        long = "growth-rate",
        value_name = "YEAR=RATE",
        value_parser = parse_growth_override,
        help = "Override the built-in growth rate of one year, repeatable"
    )]
    pub growth_rates: Vec<(i32, f64)>,
    #[arg(
        long,
        value_name = "YEAR=RATE",
        value_parser = parse_growth_override,
        help = "Edit one year's growth rate after the schedule is built"
    )]
    pub edit: Option<(i32, f64)>,
}

fn parse_growth_override(raw: &str) -> ApiResult<(i32, f64)> {
    let invalid = || ApiError::InvalidGrowthOverride(raw.to_string());
    let (year, rate) = raw.split_once('=').ok_or_else(invalid)?;
    let year = year.trim().parse::<i32>().map_err(|_| invalid())?;
    let rate = rate.trim().parse::<f64>().map_err(|_| invalid())?;
    if !rate.is_finite() {
        return Err(invalid());
    }
    Ok((year, rate))
}

#[derive(Debug, Clone)]
pub struct ProjectionRequest {
    pub strategy: StrategyType,
    pub scenario: ScenarioType,
    pub assumptions: Assumptions,
    pub reference_price: f64,
}

#[derive(Debug, Clone)]
pub struct ScheduleRequest {
    pub params: ScheduleParams,
    pub rates: GrowthRates,
    pub edit: Option<(i32, f64)>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResponse {
    strategy: StrategyConfig,
    scenario: ScenarioConfig,
    reference_price: f64,
    projection: Projection,
    milestones: Vec<YearResult>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareResponse {
    scenario: ScenarioConfig,
    reference_price: f64,
    rank_by: ApiRankMetric,
    ranking: Vec<StrategyType>,
    projections: Vec<Projection>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
    params: ScheduleParams,
    starting_year_options: Vec<i32>,
    edited_year: Option<i32>,
    years: Vec<YearData>,
    summary: ScheduleSummary,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AssumptionsResponse {
    scenario: ScenarioType,
    strategy: StrategyType,
    assumptions: Assumptions,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn require_finite(value: f64, flag: &str) -> ApiResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ApiError::invalid(format!("{flag} must be a finite number")))
    }
}

fn require_range(value: f64, min: f64, max: f64, flag: &str) -> ApiResult<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ApiError::invalid(format!(
            "{flag} must be between {min} and {max}"
        )))
    }
}

fn require_year(year: i32, flag: &str) -> ApiResult<()> {
    if CALENDAR_YEARS.contains(&year) {
        Ok(())
    } else {
        Err(ApiError::invalid(format!(
            "{flag} must be between {} and {}",
            CALENDAR_YEARS.start(),
            CALENDAR_YEARS.end()
        )))
    }
}

fn validate_reference_price(price: f64, flag: &str) -> ApiResult<()> {
    require_finite(price, flag)?;
    if price <= 0.0 {
        return Err(ApiError::invalid(format!("{flag} must be > 0")));
    }
    Ok(())
}

fn validate_assumptions(assumptions: &Assumptions) -> ApiResult<()> {
    require_finite(assumptions.initial_investment, "--initial-investment")?;
    if assumptions.initial_investment <= 0.0 {
        return Err(ApiError::invalid("--initial-investment must be > 0"));
    }
    require_finite(assumptions.annual_inflation_rate, "--inflation-rate")?;
    require_finite(assumptions.traditional_asset_return, "--traditional-return")?;
    require_finite(assumptions.bitcoin_annual_growth_rate, "--bitcoin-growth-rate")?;
    require_finite(assumptions.tax_rate, "--tax-rate")?;
    require_range(assumptions.bitcoin_allocation, 0.0, 100.0, "--bitcoin-allocation")?;
    require_range(assumptions.adoption_timeline, 1.0, 21.0, "--adoption-timeline")?;
    require_range(assumptions.volatility_factor, 0.1, 3.0, "--volatility-factor")?;
    require_range(assumptions.regulatory_risk, 0.0, 50.0, "--regulatory-risk")?;
    require_range(assumptions.technology_risk, 0.0, 50.0, "--technology-risk")?;
    Ok(())
}

pub fn build_projection_request(cli: &ProjectionCli) -> ApiResult<ProjectionRequest> {
    validate_reference_price(cli.reference_price, "--reference-price")?;

    let mut selection = Selection::new(cli.scenario.into(), cli.strategy.into());
    let assumptions = selection.assumptions_mut();
    if let Some(v) = cli.initial_investment {
        assumptions.initial_investment = v;
    }
    if let Some(v) = cli.inflation_rate {
        assumptions.annual_inflation_rate = v;
    }
    if let Some(v) = cli.traditional_return {
        assumptions.traditional_asset_return = v;
    }
    if let Some(v) = cli.bitcoin_allocation {
        assumptions.bitcoin_allocation = v;
    }
    if let Some(v) = cli.bitcoin_growth_rate {
        assumptions.bitcoin_annual_growth_rate = v;
    }
    if let Some(v) = cli.adoption_timeline {
        assumptions.adoption_timeline = v;
    }
    if let Some(v) = cli.volatility_factor {
        assumptions.volatility_factor = v;
    }
    if let Some(v) = cli.regulatory_risk {
        assumptions.regulatory_risk = v;
    }
    if let Some(v) = cli.technology_risk {
        assumptions.technology_risk = v;
    }
    if let Some(v) = cli.tax_rate {
        assumptions.tax_rate = v;
    }
    if let Some(v) = cli.inflation_hedge {
        assumptions.inflation_hedge = v;
    }
    if let Some(v) = cli.dollar_cost_averaging {
        assumptions.dollar_cost_averaging = v;
    }
    validate_assumptions(selection.assumptions())?;

    Ok(ProjectionRequest {
        strategy: selection.strategy(),
        scenario: selection.scenario(),
        assumptions: selection.assumptions().clone(),
        reference_price: cli.reference_price,
    })
}

pub fn build_schedule_request(cli: &ScheduleCli, clock_year: i32) -> ApiResult<ScheduleRequest> {
    let current_year = cli.current_year.unwrap_or(clock_year);

    require_finite(cli.holdings, "--holdings")?;
    if cli.holdings < 0.0 {
        return Err(ApiError::invalid("--holdings must be >= 0"));
    }
    validate_reference_price(cli.starting_price, "--starting-price")?;
    require_finite(cli.interest_rate, "--interest-rate")?;
    if !(0.0..100.0).contains(&cli.interest_rate) {
        return Err(ApiError::invalid(
            "--interest-rate must be >= 0 and < 100",
        ));
    }
    require_finite(cli.desired_cashflow, "--desired-cashflow")?;
    require_year(current_year, "--current-year")?;
    require_year(cli.end_year, "--end-year")?;
    require_year(cli.starting_year, "--starting-year")?;
    if !AGES.contains(&cli.age) {
        return Err(ApiError::invalid(format!(
            "--age must be between {} and {}",
            AGES.start(),
            AGES.end()
        )));
    }
    if cli.end_year < current_year {
        return Err(ApiError::invalid("--end-year must be >= --current-year"));
    }
    if cli.end_year - current_year >= MAX_SCHEDULE_YEARS {
        return Err(ApiError::invalid(format!(
            "--end-year must be within {MAX_SCHEDULE_YEARS} years of --current-year"
        )));
    }
    if cli.starting_year > cli.end_year {
        return Err(ApiError::invalid("--starting-year must be <= --end-year"));
    }
    for &(_, rate) in &cli.growth_rates {
        require_finite(rate, "--growth-rate")?;
    }

    let params = ScheduleParams {
        holdings: cli.holdings,
        starting_price: cli.starting_price,
        starting_year: cli.starting_year,
        interest_rate: cli.interest_rate,
        desired_cashflow: cli.desired_cashflow,
        age: cli.age,
        current_year,
        end_year: cli.end_year,
    };

    if let Some((year, rate)) = cli.edit {
        require_finite(rate, "--edit")?;
        if !(params.current_year..=params.end_year).contains(&year) {
            return Err(ApiError::UnknownYear {
                year,
                first: params.current_year,
                last: params.end_year,
            });
        }
    }

    Ok(ScheduleRequest {
        params,
        rates: cli.growth_rates.iter().copied().collect(),
        edit: cli.edit,
    })
}

pub fn build_projection_response(request: &ProjectionRequest) -> ProjectionResponse {
    let projection = project(
        request.strategy,
        request.scenario,
        &request.assumptions,
        request.reference_price,
    );
    ProjectionResponse {
        strategy: request.strategy.config(),
        scenario: request.scenario.config(),
        reference_price: request.reference_price,
        milestones: projection.milestones(),
        projection,
    }
}

pub fn build_compare_response(
    request: &ProjectionRequest,
    strategies: &[StrategyType],
    rank_by: RankMetric,
) -> CompareResponse {
    let projections = compare_strategies(
        strategies,
        request.scenario,
        &request.assumptions,
        request.reference_price,
    );
    let ranking = rank_projections(&projections, rank_by)
        .into_iter()
        .map(|idx| projections[idx].strategy)
        .collect();

    CompareResponse {
        scenario: request.scenario.config(),
        reference_price: request.reference_price,
        rank_by: rank_by.into(),
        ranking,
        projections,
    }
}

pub fn build_schedule_response(request: &ScheduleRequest) -> ScheduleResponse {
    let params = &request.params;
    let mut years = compute_schedule(params, &request.rates);
    if let Some((year, rate)) = request.edit {
        years = update_year_growth_rate(params, &years, year, rate);
    }
    let summary = summarize_schedule(params, &years);

    ScheduleResponse {
        params: *params,
        starting_year_options: selectable_starting_years(params.current_year),
        edited_year: request.edit.map(|(year, _)| year),
        years,
        summary,
    }
}

pub fn run_projection_command(cli: &ProjectionCli) -> ApiResult<String> {
    let request = build_projection_request(cli)?;
    let response = build_projection_response(&request);
    Ok(serde_json::to_string_pretty(&response)?)
}

pub fn run_compare_command(cli: &CompareCli) -> ApiResult<String> {
    let request = build_projection_request(&cli.projection)?;
    let strategies: Vec<StrategyType> = cli.strategies.iter().map(|&s| s.into()).collect();
    let response = build_compare_response(&request, &strategies, cli.rank_by.into());
    Ok(serde_json::to_string_pretty(&response)?)
}

pub fn run_schedule_command(cli: &ScheduleCli) -> ApiResult<String> {
    let request = build_schedule_request(cli, current_year())?;
    let response = build_schedule_response(&request);
    Ok(serde_json::to_string_pretty(&response)?)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectionPayload {
    strategy: Option<ApiStrategy>,
    scenario: Option<ApiScenario>,
    reference_price: Option<f64>,
    initial_investment: Option<f64>,
    #[serde(alias = "annualInflationRate")]
    inflation_rate: Option<f64>,
    #[serde(alias = "traditionalAssetReturn")]
    traditional_return: Option<f64>,
    bitcoin_allocation: Option<f64>,
    #[serde(alias = "bitcoinAnnualGrowthRate")]
    bitcoin_growth_rate: Option<f64>,
    adoption_timeline: Option<f64>,
    volatility_factor: Option<f64>,
    regulatory_risk: Option<f64>,
    technology_risk: Option<f64>,
    tax_rate: Option<f64>,
    inflation_hedge: Option<bool>,
    dollar_cost_averaging: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ComparePayload {
    strategies: Option<Vec<ApiStrategy>>,
    rank_by: Option<ApiRankMetric>,
    #[serde(flatten)]
    projection: ProjectionPayload,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SchedulePayload {
    holdings: Option<f64>,
    starting_price: Option<f64>,
    starting_year: Option<i32>,
    interest_rate: Option<f64>,
    desired_cashflow: Option<f64>,
    age: Option<i32>,
    current_year: Option<i32>,
    end_year: Option<i32>,
    growth_rates: Option<BTreeMap<i32, f64>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GrowthRateEditPayload {
    #[serde(default)]
    schedule: SchedulePayload,
    year: i32,
    rate: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AssumptionsQuery {
    scenario: Option<ApiScenario>,
    strategy: Option<ApiStrategy>,
}

fn default_projection_cli() -> ProjectionCli {
    ProjectionCli {
        strategy: CliStrategy::Btc10,
        scenario: CliScenario::Individual,
        reference_price: DEFAULT_REFERENCE_PRICE,
        initial_investment: None,
        inflation_rate: None,
        traditional_return: None,
        bitcoin_allocation: None,
        bitcoin_growth_rate: None,
        adoption_timeline: None,
        volatility_factor: None,
        regulatory_risk: None,
        technology_risk: None,
        tax_rate: None,
        inflation_hedge: None,
        dollar_cost_averaging: None,
    }
}

fn default_schedule_cli() -> ScheduleCli {
    ScheduleCli {
        holdings: DEFAULT_HOLDINGS,
        starting_price: DEFAULT_REFERENCE_PRICE,
        starting_year: DEFAULT_STARTING_YEAR,
        interest_rate: DEFAULT_INTEREST_RATE,
        desired_cashflow: DEFAULT_DESIRED_CASHFLOW,
        age: DEFAULT_AGE,
        current_year: None,
        end_year: SCHEDULE_END_YEAR,
        growth_rates: Vec::new(),
        edit: None,
    }
}

fn projection_cli_from_payload(payload: ProjectionPayload) -> ProjectionCli {
    let mut cli = default_projection_cli();

    if let Some(v) = payload.strategy {
        cli.strategy = v.into();
    }
    if let Some(v) = payload.scenario {
        cli.scenario = v.into();
    }
    if let Some(v) = payload.reference_price {
        cli.reference_price = v;
    }
    cli.initial_investment = payload.initial_investment;
    cli.inflation_rate = payload.inflation_rate;
    cli.traditional_return = payload.traditional_return;
    cli.bitcoin_allocation = payload.bitcoin_allocation;
    cli.bitcoin_growth_rate = payload.bitcoin_growth_rate;
    cli.adoption_timeline = payload.adoption_timeline;
    cli.volatility_factor = payload.volatility_factor;
    cli.regulatory_risk = payload.regulatory_risk;
    cli.technology_risk = payload.technology_risk;
    cli.tax_rate = payload.tax_rate;
    cli.inflation_hedge = payload.inflation_hedge;
    cli.dollar_cost_averaging = payload.dollar_cost_averaging;
    cli
}

fn schedule_cli_from_payload(payload: SchedulePayload) -> ScheduleCli {
    let mut cli = default_schedule_cli();

    if let Some(v) = payload.holdings {
        cli.holdings = v;
    }
    if let Some(v) = payload.starting_price {
        cli.starting_price = v;
    }
    if let Some(v) = payload.starting_year {
        cli.starting_year = v;
    }
    if let Some(v) = payload.interest_rate {
        cli.interest_rate = v;
    }
    if let Some(v) = payload.desired_cashflow {
        cli.desired_cashflow = v;
    }
    if let Some(v) = payload.age {
        cli.age = v;
    }
    if let Some(v) = payload.current_year {
        cli.current_year = Some(v);
    }
    if let Some(v) = payload.end_year {
        cli.end_year = v;
    }
    if let Some(rates) = payload.growth_rates {
        cli.growth_rates = rates.into_iter().collect();
    }
    cli
}

fn compare_from_payload(payload: ComparePayload) -> ApiResult<CompareResponse> {
    let cli = projection_cli_from_payload(payload.projection);
    let request = build_projection_request(&cli)?;
    let strategies: Vec<StrategyType> = match payload.strategies {
        Some(list) => list
            .into_iter()
            .map(|s| CliStrategy::from(s).into())
            .collect(),
        None => vec![StrategyType::Normie, StrategyType::Btc10, StrategyType::BtcMaxi],
    };
    if strategies.is_empty() {
        return Err(ApiError::invalid("strategies must not be empty"));
    }
    let rank_by: RankMetric = payload
        .rank_by
        .map(CliRankMetric::from)
        .unwrap_or(CliRankMetric::FinalValue)
        .into();
    Ok(build_compare_response(&request, &strategies, rank_by))
}

fn growth_rate_edit_from_payload(payload: GrowthRateEditPayload) -> ApiResult<ScheduleResponse> {
    let mut cli = schedule_cli_from_payload(payload.schedule);
    cli.edit = Some((payload.year, payload.rate));
    let request = build_schedule_request(&cli, current_year())?;
    Ok(build_schedule_response(&request))
}

pub fn router() -> Router {
    Router::new()
        .route("/api/strategies", get(strategies_handler))
        .route("/api/scenarios", get(scenarios_handler))
        .route("/api/assumptions", get(assumptions_handler))
        .route(
            "/api/projection",
            get(projection_get_handler).post(projection_post_handler),
        )
        .route("/api/compare", post(compare_handler))
        .route(
            "/api/schedule",
            get(schedule_get_handler).post(schedule_post_handler),
        )
        .route("/api/schedule/growth-rate", post(growth_rate_handler))
        .fallback(not_found_handler)
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "projection API listening");
    tracing::info!("local access: http://127.0.0.1:{port}/api/strategies");

    axum::serve(listener, router()).await
}

async fn strategies_handler() -> Response {
    json_response(StatusCode::OK, strategy_configs())
}

async fn scenarios_handler() -> Response {
    json_response(StatusCode::OK, scenario_configs())
}

async fn assumptions_handler(Query(query): Query<AssumptionsQuery>) -> Response {
    let scenario = query.scenario.map(CliScenario::from).unwrap_or(CliScenario::Individual);
    let strategy = query.strategy.map(CliStrategy::from).unwrap_or(CliStrategy::Btc10);
    let selection = Selection::new(scenario.into(), strategy.into());
    json_response(
        StatusCode::OK,
        AssumptionsResponse {
            scenario: selection.scenario(),
            strategy: selection.strategy(),
            assumptions: selection.assumptions().clone(),
        },
    )
}

async fn projection_get_handler(Query(payload): Query<ProjectionPayload>) -> Response {
    projection_handler_impl(payload)
}

async fn projection_post_handler(Json(payload): Json<ProjectionPayload>) -> Response {
    projection_handler_impl(payload)
}

fn projection_handler_impl(payload: ProjectionPayload) -> Response {
    let cli = projection_cli_from_payload(payload);
    respond(build_projection_request(&cli).map(|request| build_projection_response(&request)))
}

async fn compare_handler(Json(payload): Json<ComparePayload>) -> Response {
    respond(compare_from_payload(payload))
}

async fn schedule_get_handler(Query(payload): Query<SchedulePayload>) -> Response {
    schedule_handler_impl(payload)
}

async fn schedule_post_handler(Json(payload): Json<SchedulePayload>) -> Response {
    schedule_handler_impl(payload)
}

fn schedule_handler_impl(payload: SchedulePayload) -> Response {
    let cli = schedule_cli_from_payload(payload);
    respond(
        build_schedule_request(&cli, current_year())
            .map(|request| build_schedule_response(&request)),
    )
}

async fn growth_rate_handler(Json(payload): Json<GrowthRateEditPayload>) -> Response {
    respond(growth_rate_edit_from_payload(payload))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

fn respond<T: Serialize>(result: ApiResult<T>) -> Response {
    match result {
        Ok(body) => json_response(StatusCode::OK, body),
        Err(err) => {
            tracing::warn!(error = %err, "rejected request");
            error_response(err.status(), &err.to_string())
        }
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}
