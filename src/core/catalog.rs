use super::types::{
    RiskProfile, RiskTolerance, ScenarioConfig, ScenarioType, StrategyConfig, StrategyType,
};

pub const SCENARIO_TIME_HORIZON: u32 = 21;

impl StrategyType {
    pub const ALL: [StrategyType; 5] = [
        StrategyType::Normie,
        StrategyType::Btc10,
        StrategyType::BtcMaxi,
        StrategyType::DoubleMaxi,
        StrategyType::TripleMaxi,
    ];

    pub fn id(self) -> &'static str {
        match self {
            StrategyType::Normie => "normie",
            StrategyType::Btc10 => "btc10",
            StrategyType::BtcMaxi => "btc_maxi",
            StrategyType::DoubleMaxi => "double_maxi",
            StrategyType::TripleMaxi => "triple_maxi",
        }
    }

    pub fn config(self) -> StrategyConfig {
        match self {
            StrategyType::Normie => StrategyConfig {
                strategy: self,
                name: "Normie",
                description: "Traditional portfolio with no Bitcoin exposure",
                bitcoin_allocation: 0.0,
                traditional_allocation: 100.0,
                risk_profile: RiskProfile::Low,
            },
            StrategyType::Btc10 => StrategyConfig {
                strategy: self,
                name: "BTC 10%",
                description: "Conservative Bitcoin allocation at 10%",
                bitcoin_allocation: 10.0,
                traditional_allocation: 90.0,
                risk_profile: RiskProfile::Medium,
            },
            StrategyType::BtcMaxi => StrategyConfig {
                strategy: self,
                name: "BTC Maxi",
                description: "Bitcoin maximalist approach with 80% allocation",
                bitcoin_allocation: 80.0,
                traditional_allocation: 20.0,
                risk_profile: RiskProfile::High,
            },
            StrategyType::DoubleMaxi => StrategyConfig {
                strategy: self,
                name: "Double Maxi",
                description: "Aggressive Bitcoin strategy with 90% allocation",
                bitcoin_allocation: 90.0,
                traditional_allocation: 10.0,
                risk_profile: RiskProfile::Extreme,
            },
            StrategyType::TripleMaxi => StrategyConfig {
                strategy: self,
                name: "Triple Maxi",
                description: "All-in Bitcoin strategy with 95% allocation",
                bitcoin_allocation: 95.0,
                traditional_allocation: 5.0,
                risk_profile: RiskProfile::Extreme,
            },
        }
    }
}

impl ScenarioType {
    pub const ALL: [ScenarioType; 4] = [
        ScenarioType::Individual,
        ScenarioType::Corporate,
        ScenarioType::Institution,
        ScenarioType::NationState,
    ];

    pub fn id(self) -> &'static str {
        match self {
            ScenarioType::Individual => "individual",
            ScenarioType::Corporate => "corporate",
            ScenarioType::Institution => "institution",
            ScenarioType::NationState => "nation_state",
        }
    }

    pub fn config(self) -> ScenarioConfig {
        match self {
            ScenarioType::Individual => ScenarioConfig {
                scenario: self,
                name: "Individual",
                description: "Personal investment strategy",
                default_investment: 100_000.0,
                time_horizon: SCENARIO_TIME_HORIZON,
                risk_tolerance: RiskTolerance::Moderate,
            },
            ScenarioType::Corporate => ScenarioConfig {
                scenario: self,
                name: "Corporate",
                description: "Corporate treasury management",
                default_investment: 10_000_000.0,
                time_horizon: SCENARIO_TIME_HORIZON,
                risk_tolerance: RiskTolerance::Conservative,
            },
            ScenarioType::Institution => ScenarioConfig {
                scenario: self,
                name: "Institution",
                description: "Institutional investment approach",
                default_investment: 100_000_000.0,
                time_horizon: SCENARIO_TIME_HORIZON,
                risk_tolerance: RiskTolerance::Moderate,
            },
            ScenarioType::NationState => ScenarioConfig {
                scenario: self,
                name: "Nation State",
                description: "National reserve strategy",
                default_investment: 1_000_000_000.0,
                time_horizon: SCENARIO_TIME_HORIZON,
                risk_tolerance: RiskTolerance::Conservative,
            },
        }
    }
}

pub fn strategy_configs() -> Vec<StrategyConfig> {
    StrategyType::ALL.iter().map(|s| s.config()).collect()
}

pub fn scenario_configs() -> Vec<ScenarioConfig> {
    ScenarioType::ALL.iter().map(|s| s.config()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_allocations_sum_to_one_hundred() {
        for config in strategy_configs() {
            assert_eq!(
                config.bitcoin_allocation + config.traditional_allocation,
                100.0,
                "{} allocations must sum to 100",
                config.strategy.id()
            );
        }
    }

    #[test]
    fn catalogs_enumerate_in_declaration_order() {
        let ids: Vec<&str> = strategy_configs().iter().map(|c| c.strategy.id()).collect();
        assert_eq!(
            ids,
            ["normie", "btc10", "btc_maxi", "double_maxi", "triple_maxi"]
        );

        let ids: Vec<&str> = scenario_configs().iter().map(|c| c.scenario.id()).collect();
        assert_eq!(ids, ["individual", "corporate", "institution", "nation_state"]);
    }

    #[test]
    fn every_scenario_uses_the_fixed_horizon() {
        for config in scenario_configs() {
            assert_eq!(config.time_horizon, 21);
            assert!(config.default_investment > 0.0);
        }
    }

    #[test]
    fn serialized_ids_match_lookup_ids() {
        for strategy in StrategyType::ALL {
            let json = serde_json::to_string(&strategy).expect("strategy should serialize");
            assert_eq!(json, format!("\"{}\"", strategy.id()));
        }
        for scenario in ScenarioType::ALL {
            let json = serde_json::to_string(&scenario).expect("scenario should serialize");
            assert_eq!(json, format!("\"{}\"", scenario.id()));
        }
    }
}
