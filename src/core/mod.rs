mod assumptions;
mod catalog;
mod engine;
mod growth;
mod solver;
mod types;

pub use assumptions::{Selection, apply_strategy_allocation, resolve_assumptions, resolve_selection};
pub use catalog::{SCENARIO_TIME_HORIZON, scenario_configs, strategy_configs};
pub use engine::{DEFAULT_REFERENCE_PRICE, RankMetric, compare_strategies, project, rank_projections};
pub use growth::bitcoin_price_at_year;
pub use solver::{
    DEFAULT_AGE, DEFAULT_DESIRED_CASHFLOW, DEFAULT_HOLDINGS, DEFAULT_INTEREST_RATE,
    DEFAULT_STARTING_YEAR, GrowthRates, SCHEDULE_END_YEAR, compute_schedule, current_year,
    default_growth_rate, selectable_starting_years, summarize_schedule, update_year_growth_rate,
};
pub use types::{
    Assumptions, Projection, ProjectionSummary, RiskProfile, RiskTolerance, ScenarioConfig,
    ScenarioType, ScheduleParams, ScheduleSummary, StrategyConfig, StrategyType, YearData,
    YearResult,
};
