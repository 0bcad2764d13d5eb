use super::assumptions::apply_strategy_allocation;
use super::growth::bitcoin_price_at_year;
use super::types::{
    Assumptions, Projection, ProjectionSummary, ScenarioType, StrategyType, YearResult,
};

/// Reference price used when the caller has no live quote.
pub const DEFAULT_REFERENCE_PRICE: f64 = 70_000.0;

const RISK_FREE_RATE: f64 = 0.03;
const DRAWDOWN_PER_ALLOCATION_POINT: f64 = 0.8;
const VOLATILITY_PER_ALLOCATION_POINT: f64 = 0.01;
const BASE_VOLATILITY: f64 = 0.05;
const MILESTONE_STEP: usize = 3;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RankMetric {
    FinalValue,
    TotalReturn,
    AnnualizedReturn,
}

impl RankMetric {
    fn score(self, projection: &Projection) -> f64 {
        match self {
            RankMetric::FinalValue => projection.summary.final_value,
            RankMetric::TotalReturn => projection.summary.total_return,
            RankMetric::AnnualizedReturn => projection.summary.annualized_return,
        }
    }
}

impl Projection {
    /// Every third year plus the final year, in year order.
    pub fn milestones(&self) -> Vec<YearResult> {
        let last = self.results.len().saturating_sub(1);
        self.results
            .iter()
            .enumerate()
            .filter(|(idx, _)| idx % MILESTONE_STEP == 0 || *idx == last)
            .map(|(_, result)| *result)
            .collect()
    }
}

/// Runs the strategy projection over the scenario's horizon. The split between
/// bitcoin and traditional assets comes from `assumptions.bitcoin_allocation`,
/// which the caller normally seeds from the strategy.
pub fn project(
    strategy: StrategyType,
    scenario: ScenarioType,
    assumptions: &Assumptions,
    base_price: f64,
) -> Projection {
    let horizon = scenario.config().time_horizon;
    let initial_investment = assumptions.initial_investment;
    let initial_bitcoin = initial_investment * assumptions.bitcoin_allocation / 100.0;
    let initial_traditional = initial_investment * assumptions.traditional_allocation() / 100.0;

    tracing::debug!(
        strategy = strategy.id(),
        scenario = scenario.id(),
        horizon,
        bitcoin_allocation = assumptions.bitcoin_allocation,
        base_price,
        "running projection"
    );

    let mut results = Vec::with_capacity(horizon as usize + 1);
    for year in 0..=horizon {
        let traditional_value = traditional_asset_value(year, initial_traditional, assumptions);
        let bitcoin_value = bitcoin_value(year, initial_bitcoin, assumptions, base_price);
        let total_value = traditional_value + bitcoin_value;
        let real_value = real_value(total_value, year, assumptions.annual_inflation_rate);
        let bitcoin_price = if year == 0 {
            base_price
        } else {
            bitcoin_price_at_year(year, assumptions, base_price)
        };

        let (cumulative_gain, annual_return) = if year == 0 {
            (0.0, 0.0)
        } else {
            let growth = total_value / initial_investment;
            (
                (total_value - initial_investment) / initial_investment * 100.0,
                (growth.powf(1.0 / f64::from(year)) - 1.0) * 100.0,
            )
        };

        results.push(YearResult {
            year,
            traditional_asset_value: traditional_value,
            bitcoin_value,
            total_value,
            real_value,
            bitcoin_price,
            cumulative_gain,
            annual_return,
        });
    }

    let summary = summarize(assumptions, &results[horizon as usize], horizon);

    Projection {
        strategy,
        scenario,
        assumptions: assumptions.clone(),
        results,
        summary,
    }
}

/// One projection per strategy, in input order. Each run sees the shared
/// assumptions with that strategy's allocation applied.
pub fn compare_strategies(
    strategies: &[StrategyType],
    scenario: ScenarioType,
    assumptions: &Assumptions,
    base_price: f64,
) -> Vec<Projection> {
    strategies
        .iter()
        .map(|&strategy| {
            let mut strategy_assumptions = assumptions.clone();
            apply_strategy_allocation(&mut strategy_assumptions, strategy);
            project(strategy, scenario, &strategy_assumptions, base_price)
        })
        .collect()
}

/// Indices into `projections`, best first. Ties keep input order.
pub fn rank_projections(projections: &[Projection], metric: RankMetric) -> Vec<usize> {
    let mut order: Vec<usize> = (0..projections.len()).collect();
    order.sort_by(|&a, &b| {
        metric
            .score(&projections[b])
            .total_cmp(&metric.score(&projections[a]))
    });
    order
}

fn traditional_asset_value(year: u32, initial_value: f64, assumptions: &Assumptions) -> f64 {
    initial_value * (1.0 + assumptions.traditional_asset_return / 100.0).powf(f64::from(year))
}

fn bitcoin_value(
    year: u32,
    initial_bitcoin_investment: f64,
    assumptions: &Assumptions,
    base_price: f64,
) -> f64 {
    if initial_bitcoin_investment == 0.0 {
        return 0.0;
    }
    // Price ratio first, so a flat price keeps the investment exact.
    initial_bitcoin_investment * (bitcoin_price_at_year(year, assumptions, base_price) / base_price)
}

fn real_value(nominal_value: f64, year: u32, inflation_rate: f64) -> f64 {
    nominal_value / (1.0 + inflation_rate / 100.0).powf(f64::from(year))
}

// Drawdown and Sharpe are allocation-based estimates, not path statistics.
fn summarize(assumptions: &Assumptions, final_result: &YearResult, horizon: u32) -> ProjectionSummary {
    let initial_investment = assumptions.initial_investment;
    let allocation = assumptions.bitcoin_allocation;
    let final_value = final_result.total_value;

    let total_return = (final_value - initial_investment) / initial_investment * 100.0;
    let annualized_return = (final_value / initial_investment).powf(1.0 / f64::from(horizon)) - 1.0;

    let max_drawdown = allocation * DRAWDOWN_PER_ALLOCATION_POINT;
    let volatility = allocation * VOLATILITY_PER_ALLOCATION_POINT + BASE_VOLATILITY;
    let sharpe_ratio = (annualized_return - RISK_FREE_RATE) / volatility;

    ProjectionSummary {
        final_value,
        total_return,
        annualized_return: annualized_return * 100.0,
        max_drawdown,
        sharpe_ratio,
        bitcoin_final_price: final_result.bitcoin_price,
    }
}
