use serde::Serialize;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyType {
    Normie,
    Btc10,
    BtcMaxi,
    DoubleMaxi,
    TripleMaxi,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioType {
    Individual,
    Corporate,
    Institution,
    NationState,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskProfile {
    Low,
    Medium,
    High,
    Extreme,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTolerance {
    Conservative,
    Moderate,
    Aggressive,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyConfig {
    #[serde(rename = "type")]
    pub strategy: StrategyType,
    pub name: &'static str,
    pub description: &'static str,
    pub bitcoin_allocation: f64,
    pub traditional_allocation: f64,
    pub risk_profile: RiskProfile,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioConfig {
    #[serde(rename = "type")]
    pub scenario: ScenarioType,
    pub name: &'static str,
    pub description: &'static str,
    pub default_investment: f64,
    pub time_horizon: u32,
    pub risk_tolerance: RiskTolerance,
}

/// User-editable inputs of a projection run. Percentages are stored as
/// percent values (e.g. `7.0` for 7 %), not fractions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assumptions {
    pub initial_investment: f64,
    pub annual_inflation_rate: f64,
    pub traditional_asset_return: f64,
    pub bitcoin_allocation: f64,
    pub bitcoin_annual_growth_rate: f64,
    pub adoption_timeline: f64,
    pub volatility_factor: f64,
    /// Carried for display; not part of any formula.
    pub regulatory_risk: f64,
    /// Carried for display; not part of any formula.
    pub technology_risk: f64,
    pub tax_rate: f64,
    /// Inert flag.
    pub inflation_hedge: bool,
    /// Inert flag.
    pub dollar_cost_averaging: bool,
}

impl Assumptions {
    pub fn traditional_allocation(&self) -> f64 {
        100.0 - self.bitcoin_allocation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearResult {
    pub year: u32,
    pub traditional_asset_value: f64,
    pub bitcoin_value: f64,
    pub total_value: f64,
    pub real_value: f64,
    pub bitcoin_price: f64,
    pub cumulative_gain: f64,
    pub annual_return: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionSummary {
    pub final_value: f64,
    pub total_return: f64,
    pub annualized_return: f64,
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
    pub bitcoin_final_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub strategy: StrategyType,
    pub scenario: ScenarioType,
    pub assumptions: Assumptions,
    pub results: Vec<YearResult>,
    pub summary: ProjectionSummary,
}

/// Inputs of the collateralized-loan schedule. Years are calendar years.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleParams {
    pub holdings: f64,
    pub starting_price: f64,
    pub starting_year: i32,
    pub interest_rate: f64,
    pub desired_cashflow: f64,
    pub age: i32,
    pub current_year: i32,
    pub end_year: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearData {
    pub year: i32,
    pub age: i32,
    pub value: f64,
    pub growth_rate: f64,
    pub gain: f64,
    pub ltv: f64,
    pub debt: f64,
    pub interest: f64,
    pub free_cash_flow: f64,
    pub price_per_unit: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSummary {
    pub first_loan_year: Option<i32>,
    pub peak_ltv: f64,
    pub peak_ltv_year: Option<i32>,
    pub first_over_leveraged_year: Option<i32>,
    pub total_free_cash_flow: f64,
    pub final_debt: f64,
    pub final_value: f64,
}
