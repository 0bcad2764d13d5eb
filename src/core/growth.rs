use super::types::Assumptions;

const ADOPTION_CURVE_STEEPNESS: f64 = 10.0;
const DIMINISHING_RETURNS_START_YEAR: f64 = 10.0;
const DIMINISHING_RETURNS_FACTOR: f64 = 0.95;

/// Modeled bitcoin price `year` years after `base_price` was observed.
///
/// The growth rate is damped by a logistic adoption curve centred on the
/// midpoint of the adoption timeline and by a 5 % per-year decay once past
/// year ten. The volatility factor is a flat multiplier.
pub fn bitcoin_price_at_year(year: u32, assumptions: &Assumptions, base_price: f64) -> f64 {
    let year = f64::from(year);

    let adoption_progress = (year / assumptions.adoption_timeline).min(1.0);
    let adoption_curve =
        1.0 / (1.0 + (-ADOPTION_CURVE_STEEPNESS * (adoption_progress - 0.5)).exp());

    let diminishing_factor =
        DIMINISHING_RETURNS_FACTOR.powf((year - DIMINISHING_RETURNS_START_YEAR).max(0.0));
    let adjusted_growth_rate =
        assumptions.bitcoin_annual_growth_rate * adoption_curve * diminishing_factor;

    let price = base_price * (1.0 + adjusted_growth_rate / 100.0).powf(year);
    price * assumptions.volatility_factor
}
