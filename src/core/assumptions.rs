use super::engine::project;
use super::types::{Assumptions, Projection, ScenarioType, StrategyType};

/// Scenario defaults, including the fixed per-scenario deltas. The bitcoin
/// allocation is the generic default until a strategy is applied on top.
pub fn resolve_assumptions(scenario: ScenarioType) -> Assumptions {
    let base = Assumptions {
        initial_investment: scenario.config().default_investment,
        annual_inflation_rate: 3.0,
        traditional_asset_return: 7.0,
        bitcoin_allocation: 10.0,
        bitcoin_annual_growth_rate: 20.0,
        adoption_timeline: 10.0,
        volatility_factor: 1.0,
        regulatory_risk: 0.0,
        technology_risk: 0.0,
        tax_rate: 25.0,
        inflation_hedge: true,
        dollar_cost_averaging: false,
    };

    match scenario {
        ScenarioType::Individual => base,
        ScenarioType::Corporate => Assumptions {
            bitcoin_annual_growth_rate: 18.0,
            tax_rate: 21.0,
            dollar_cost_averaging: true,
            ..base
        },
        ScenarioType::Institution => Assumptions {
            bitcoin_annual_growth_rate: 15.0,
            tax_rate: 21.0,
            regulatory_risk: 5.0,
            dollar_cost_averaging: true,
            ..base
        },
        ScenarioType::NationState => Assumptions {
            bitcoin_annual_growth_rate: 12.0,
            tax_rate: 0.0,
            regulatory_risk: 10.0,
            technology_risk: 5.0,
            ..base
        },
    }
}

pub fn apply_strategy_allocation(assumptions: &mut Assumptions, strategy: StrategyType) {
    assumptions.bitcoin_allocation = strategy.config().bitcoin_allocation;
}

/// Scenario defaults first, strategy allocation second.
pub fn resolve_selection(scenario: ScenarioType, strategy: StrategyType) -> Assumptions {
    let mut assumptions = resolve_assumptions(scenario);
    apply_strategy_allocation(&mut assumptions, strategy);
    assumptions
}

/// The caller's current scenario/strategy pick together with the assumptions
/// they are editing.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    scenario: ScenarioType,
    strategy: StrategyType,
    assumptions: Assumptions,
}

impl Selection {
    pub fn new(scenario: ScenarioType, strategy: StrategyType) -> Self {
        Self {
            scenario,
            strategy,
            assumptions: resolve_selection(scenario, strategy),
        }
    }

    pub fn scenario(&self) -> ScenarioType {
        self.scenario
    }

    pub fn strategy(&self) -> StrategyType {
        self.strategy
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }

    /// Direct edits survive until the next scenario or strategy change.
    pub fn assumptions_mut(&mut self) -> &mut Assumptions {
        &mut self.assumptions
    }

    pub fn set_scenario(&mut self, scenario: ScenarioType) {
        self.scenario = scenario;
        self.assumptions = resolve_selection(scenario, self.strategy);
    }

    pub fn set_strategy(&mut self, strategy: StrategyType) {
        self.strategy = strategy;
        apply_strategy_allocation(&mut self.assumptions, strategy);
    }

    pub fn project(&self, base_price: f64) -> Projection {
        project(self.strategy, self.scenario, &self.assumptions, base_price)
    }
}
