use std::collections::BTreeMap;

use chrono::Datelike;

use super::types::{ScheduleParams, ScheduleSummary, YearData};

pub const SCHEDULE_END_YEAR: i32 = 2050;
pub const DEFAULT_HOLDINGS: f64 = 2.0;
pub const DEFAULT_STARTING_YEAR: i32 = 2026;
pub const DEFAULT_INTEREST_RATE: f64 = 12.5;
pub const DEFAULT_DESIRED_CASHFLOW: f64 = 50_000.0;
pub const DEFAULT_AGE: i32 = 30;

const STARTING_YEAR_OPTIONS: i32 = 25;
const FULLY_LEVERAGED_LTV: f64 = 100.0;

/// Built-in annual growth rate (%) for a calendar year; 0 outside the table.
pub fn default_growth_rate(year: i32) -> f64 {
    match year {
        2025 => 100.0,
        2026 => -50.0,
        2027 => 125.0,
        2028 => 115.0,
        2029 => 85.0,
        2030 => -30.0,
        2031 => 115.0,
        2032 => 100.0,
        2033 => 75.0,
        2034 => -25.0,
        2035 => 75.0,
        2036 => 50.0,
        2037 => 40.0,
        2038 => -15.0,
        2039 => 50.0,
        2040 => 40.0,
        2041 => 30.0,
        2042 => -10.0,
        2043 => 40.0,
        2044 => 30.0,
        2045 => 15.0,
        2046 => -10.0,
        2047 => 30.0,
        2048 => 20.0,
        2049 => 10.0,
        2050 => -10.0,
        _ => 0.0,
    }
}

/// Default table plus per-year overrides.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GrowthRates {
    overrides: BTreeMap<i32, f64>,
}

impl GrowthRates {
    pub fn defaults() -> Self {
        Self::default()
    }

    pub fn with_override(mut self, year: i32, rate: f64) -> Self {
        self.set(year, rate);
        self
    }

    pub fn set(&mut self, year: i32, rate: f64) {
        self.overrides.insert(year, rate);
    }

    pub fn rate_for(&self, year: i32) -> f64 {
        self.overrides
            .get(&year)
            .copied()
            .unwrap_or_else(|| default_growth_rate(year))
    }
}

impl FromIterator<(i32, f64)> for GrowthRates {
    fn from_iter<I: IntoIterator<Item = (i32, f64)>>(iter: I) -> Self {
        Self {
            overrides: iter.into_iter().collect(),
        }
    }
}

impl ScheduleParams {
    pub fn with_defaults(starting_price: f64, current_year: i32) -> Self {
        Self {
            holdings: DEFAULT_HOLDINGS,
            starting_price,
            starting_year: DEFAULT_STARTING_YEAR,
            interest_rate: DEFAULT_INTEREST_RATE,
            desired_cashflow: DEFAULT_DESIRED_CASHFLOW,
            age: DEFAULT_AGE,
            current_year,
            end_year: SCHEDULE_END_YEAR,
        }
    }
}

pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Starting years offered to the user: 25 consecutive years from `current_year`.
pub fn selectable_starting_years(current_year: i32) -> Vec<i32> {
    (current_year..current_year.saturating_add(STARTING_YEAR_OPTIONS)).collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct LoanYear {
    ltv: f64,
    debt: f64,
    interest: f64,
    free_cash_flow: f64,
}

// Solves FCF = value * ltv/100 * (1 - r) - previous_debt for ltv.
fn solve_loan_year(params: &ScheduleParams, year: i32, value: f64, previous_debt: f64) -> LoanYear {
    if year < params.starting_year {
        return LoanYear::default();
    }

    let interest_rate = params.interest_rate / 100.0;
    let denominator = value * (1.0 - interest_rate);
    let ltv = if denominator > 0.0 {
        (params.desired_cashflow + previous_debt) / denominator * 100.0
    } else {
        tracing::warn!(year, value, "non-positive LTV denominator, LTV forced to zero");
        0.0
    };

    let debt = value * ltv / 100.0;
    let interest = debt * interest_rate;
    LoanYear {
        ltv,
        debt,
        interest,
        free_cash_flow: debt - interest - previous_debt,
    }
}

fn year_row(
    params: &ScheduleParams,
    year: i32,
    value: f64,
    price_per_unit: f64,
    growth_rate: f64,
    previous_debt: f64,
) -> YearData {
    let loan = solve_loan_year(params, year, value, previous_debt);
    YearData {
        year,
        age: params.age.saturating_add(year.saturating_sub(params.current_year)),
        value,
        growth_rate,
        gain: value * growth_rate / 100.0,
        ltv: loan.ltv,
        debt: loan.debt,
        interest: loan.interest,
        free_cash_flow: loan.free_cash_flow,
        price_per_unit,
    }
}

/// Builds the schedule from `params.current_year` through `params.end_year`.
pub fn compute_schedule(params: &ScheduleParams, rates: &GrowthRates) -> Vec<YearData> {
    tracing::debug!(
        holdings = params.holdings,
        starting_year = params.starting_year,
        interest_rate = params.interest_rate,
        desired_cashflow = params.desired_cashflow,
        "computing loan schedule"
    );

    let mut schedule: Vec<YearData> = Vec::new();
    let mut value = params.holdings * params.starting_price;
    let mut price = params.starting_price;

    for year in params.current_year..=params.end_year {
        let previous_debt = schedule.last().map_or(0.0, |row| row.debt);
        let row = year_row(params, year, value, price, rates.rate_for(year), previous_debt);
        schedule.push(row);

        value = row.value + row.gain;
        price = value / params.holdings;
    }

    schedule
}

/// Sets `year`'s growth rate and replays every later year. Rows before `year`
/// are copied unchanged; an unknown year yields an unchanged copy.
pub fn update_year_growth_rate(
    params: &ScheduleParams,
    schedule: &[YearData],
    year: i32,
    new_rate: f64,
) -> Vec<YearData> {
    let mut updated = schedule.to_vec();
    let Some(index) = updated.iter().position(|row| row.year == year) else {
        tracing::debug!(year, "growth rate edit for a year outside the schedule");
        return updated;
    };

    tracing::debug!(year, new_rate, replayed = updated.len() - index - 1, "re-solving schedule");

    let edited = &mut updated[index];
    edited.growth_rate = new_rate;
    edited.gain = edited.value * new_rate / 100.0;

    for i in index + 1..updated.len() {
        let previous = updated[i - 1];
        let value = previous.value + previous.gain;
        let current = updated[i];
        updated[i] = year_row(
            params,
            current.year,
            value,
            value / params.holdings,
            current.growth_rate,
            previous.debt,
        );
    }

    updated
}

fn loan_years<'a>(
    params: &ScheduleParams,
    schedule: &'a [YearData],
) -> impl Iterator<Item = &'a YearData> + 'a {
    let starting_year = params.starting_year;
    schedule.iter().filter(move |row| row.year >= starting_year)
}

pub fn summarize_schedule(params: &ScheduleParams, schedule: &[YearData]) -> ScheduleSummary {
    let peak = loan_years(params, schedule).fold(None::<&YearData>, |best, row| match best {
        Some(best) if best.ltv >= row.ltv => Some(best),
        _ => Some(row),
    });

    ScheduleSummary {
        first_loan_year: loan_years(params, schedule).next().map(|row| row.year),
        peak_ltv: peak.map_or(0.0, |row| row.ltv),
        peak_ltv_year: peak.map(|row| row.year),
        first_over_leveraged_year: loan_years(params, schedule)
            .find(|row| row.ltv > FULLY_LEVERAGED_LTV)
            .map(|row| row.year),
        total_free_cash_flow: loan_years(params, schedule).map(|row| row.free_cash_flow).sum(),
        final_debt: schedule.last().map_or(0.0, |row| row.debt),
        final_value: schedule.last().map_or(0.0, |row| row.value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn sample_params() -> ScheduleParams {
        ScheduleParams {
            holdings: 2.0,
            starting_price: 100_000.0,
            starting_year: 2026,
            interest_rate: 12.5,
            desired_cashflow: 50_000.0,
            age: 30,
            current_year: 2025,
            end_year: SCHEDULE_END_YEAR,
        }
    }

    #[test]
    fn covers_every_year_through_the_end_year() {
        let schedule = compute_schedule(&sample_params(), &GrowthRates::defaults());
        assert_eq!(schedule.len(), 26);
        assert_eq!(schedule[0].year, 2025);
        assert_eq!(schedule[25].year, 2050);
        assert_eq!(schedule[0].age, 30);
        assert_eq!(schedule[25].age, 55);
        assert_eq!(schedule[0].growth_rate, 100.0);
        assert_eq!(schedule[25].growth_rate, -10.0);
    }

    #[test]
    fn years_before_start_carry_no_loan() {
        let schedule = compute_schedule(&sample_params(), &GrowthRates::defaults());
        let first = schedule[0];
        assert_eq!(first.value, 200_000.0);
        assert_eq!(first.price_per_unit, 100_000.0);
        assert_eq!(first.gain, 200_000.0);
        assert_eq!(first.ltv, 0.0);
        assert_eq!(first.debt, 0.0);
        assert_eq!(first.interest, 0.0);
        assert_eq!(first.free_cash_flow, 0.0);
    }

    #[test]
    fn first_loan_year_hits_the_desired_cashflow() {
        let params = ScheduleParams {
            current_year: 2030,
            starting_year: 2031,
            ..sample_params()
        };
        let schedule = compute_schedule(&params, &GrowthRates::defaults());

        // 2030 grows -30 %, so 2031 starts from 140,000
        let value = 200_000.0 + 200_000.0 * -30.0 / 100.0;
        let ltv = (50_000.0 + 0.0) / (value * (1.0 - 0.125)) * 100.0;
        let debt = value * ltv / 100.0;

        let loan_year = schedule[1];
        assert_eq!(loan_year.year, 2031);
        assert_approx(loan_year.value, value);
        assert_approx(loan_year.price_per_unit, value / 2.0);
        assert_approx(loan_year.ltv, ltv);
        assert_approx(loan_year.debt, debt);
        assert_approx(loan_year.debt, 50_000.0 / 0.875);
        assert_approx(loan_year.interest, debt * 0.125);
        assert_approx(loan_year.free_cash_flow, 50_000.0);
    }

    #[test]
    fn debt_rolls_forward_and_cashflow_stays_on_target() {
        let schedule = compute_schedule(&sample_params(), &GrowthRates::defaults());
        for pair in schedule.windows(2).skip(1) {
            let (previous, current) = (pair[0], pair[1]);
            assert_approx(current.value, previous.value + previous.gain);
            assert_approx(current.free_cash_flow, 50_000.0);
            assert_approx(
                current.debt,
                (50_000.0 + previous.debt) / (1.0 - 0.125),
            );
        }
    }

    #[test]
    fn non_positive_denominator_forces_zero_ltv() {
        let params = ScheduleParams {
            interest_rate: 100.0,
            starting_year: 2025,
            ..sample_params()
        };
        let schedule = compute_schedule(&params, &GrowthRates::defaults());
        for row in &schedule {
            assert_eq!(row.ltv, 0.0);
            assert_eq!(row.debt, 0.0);
            assert_eq!(row.free_cash_flow, 0.0);
        }
    }

    #[test]
    fn zero_holdings_does_not_panic() {
        let params = ScheduleParams {
            holdings: 0.0,
            ..sample_params()
        };
        let schedule = compute_schedule(&params, &GrowthRates::defaults());
        assert_eq!(schedule.len(), 26);
        assert_eq!(schedule[0].value, 0.0);
        assert!(schedule[1].price_per_unit.is_nan());
    }

    #[test]
    fn overrides_replace_default_rates() {
        let rates = GrowthRates::defaults().with_override(2027, 5.0);
        assert_eq!(rates.rate_for(2027), 5.0);
        assert_eq!(rates.rate_for(2028), 115.0);
        assert_eq!(rates.rate_for(2100), 0.0);

        let rates: GrowthRates = [(2030, 1.5), (2031, 2.5)].into_iter().collect();
        assert_eq!(rates.rate_for(2030), 1.5);
        assert_eq!(rates.rate_for(2031), 2.5);
    }

    #[test]
    fn edit_cascades_forward_only() {
        let params = sample_params();
        let schedule = compute_schedule(&params, &GrowthRates::defaults());
        let updated = update_year_growth_rate(&params, &schedule, 2030, 10.0);

        assert_eq!(updated.len(), schedule.len());
        assert_eq!(updated[..5], schedule[..5]);

        let edited = updated[5];
        assert_eq!(edited.growth_rate, 10.0);
        assert_eq!(edited.value, schedule[5].value);
        assert_eq!(edited.debt, schedule[5].debt);
        assert_approx(edited.gain, edited.value * 0.1);

        assert_approx(updated[6].value, edited.value * 1.1);
        assert_approx(updated[6].price_per_unit, edited.value * 1.1 / 2.0);
        assert!(updated[6].value > schedule[6].value);
        assert!(updated[6].ltv < schedule[6].ltv);
    }

    #[test]
    fn edit_matches_a_full_rebuild() {
        let params = sample_params();
        let schedule = compute_schedule(&params, &GrowthRates::defaults());
        let updated = update_year_growth_rate(&params, &schedule, 2034, 60.0);
        let rebuilt = compute_schedule(&params, &GrowthRates::defaults().with_override(2034, 60.0));
        assert_eq!(updated, rebuilt);
    }

    #[test]
    fn edit_of_unknown_year_returns_a_copy() {
        let params = sample_params();
        let schedule = compute_schedule(&params, &GrowthRates::defaults());
        assert_eq!(update_year_growth_rate(&params, &schedule, 1999, 50.0), schedule);
    }

    #[test]
    fn edit_before_starting_year_keeps_pre_start_rows_loan_free() {
        let params = ScheduleParams {
            starting_year: 2030,
            ..sample_params()
        };
        let schedule = compute_schedule(&params, &GrowthRates::defaults());
        let updated = update_year_growth_rate(&params, &schedule, 2026, 0.0);
        for row in updated.iter().filter(|row| row.year < 2030) {
            assert_eq!(row.debt, 0.0);
            assert_eq!(row.ltv, 0.0);
        }
        assert_approx(updated[5].free_cash_flow, 50_000.0);
    }

    #[test]
    fn summary_flags_over_leveraged_years() {
        let params = sample_params();
        let schedule = compute_schedule(&params, &GrowthRates::defaults());
        let summary = summarize_schedule(&params, &schedule);

        assert_eq!(summary.first_loan_year, Some(2026));
        assert_eq!(summary.final_debt, schedule[25].debt);
        assert_eq!(summary.final_value, schedule[25].value);
        assert_approx(summary.total_free_cash_flow, 25.0 * 50_000.0);

        let peak = schedule
            .iter()
            .map(|row| row.ltv)
            .fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(summary.peak_ltv, peak);
        if let Some(year) = summary.first_over_leveraged_year {
            assert!(schedule.iter().any(|row| row.year == year && row.ltv > 100.0));
        }
    }

    #[test]
    fn summary_of_loan_free_schedule_is_empty() {
        let params = ScheduleParams {
            starting_year: 2060,
            ..sample_params()
        };
        let schedule = compute_schedule(&params, &GrowthRates::defaults());
        let summary = summarize_schedule(&params, &schedule);
        assert_eq!(summary.first_loan_year, None);
        assert_eq!(summary.peak_ltv_year, None);
        assert_eq!(summary.first_over_leveraged_year, None);
        assert_eq!(summary.total_free_cash_flow, 0.0);
    }

    #[test]
    fn defaults_and_starting_year_options() {
        let params = ScheduleParams::with_defaults(90_000.0, 2025);
        assert_eq!(params.holdings, 2.0);
        assert_eq!(params.starting_year, 2026);
        assert_eq!(params.interest_rate, 12.5);
        assert_eq!(params.desired_cashflow, 50_000.0);
        assert_eq!(params.end_year, 2050);

        let years = selectable_starting_years(2025);
        assert_eq!(years.len(), 25);
        assert_eq!(years[0], 2025);
        assert_eq!(years[24], 2049);
    }

    #[test]
    fn extreme_years_and_ages_saturate_instead_of_overflowing() {
        let years = selectable_starting_years(i32::MAX - 7);
        assert_eq!(years.len(), 7);
        assert_eq!(years.last(), Some(&(i32::MAX - 1)));

        let params = ScheduleParams {
            age: i32::MAX,
            current_year: i32::MAX - 3,
            starting_year: i32::MAX - 2,
            end_year: i32::MAX,
            ..sample_params()
        };
        let schedule = compute_schedule(&params, &GrowthRates::defaults());
        assert_eq!(schedule.len(), 4);
        assert!(schedule.iter().all(|row| row.age == i32::MAX));
    }

    #[test]
    fn first_loan_year_relative_to_the_clock() {
        let now = current_year();
        let params = ScheduleParams {
            holdings: 2.0,
            starting_price: 100_000.0,
            starting_year: now + 1,
            interest_rate: 12.5,
            desired_cashflow: 50_000.0,
            age: 30,
            current_year: now,
            end_year: now + 10,
        };
        let schedule = compute_schedule(&params, &GrowthRates::defaults());
        let opening = schedule[0];
        assert_eq!(opening.debt, 0.0);

        let value = opening.value + opening.gain;
        let expected_debt = value * ((50_000.0 + 0.0) / (value * (1.0 - 0.125)) * 100.0) / 100.0;
        assert_approx(schedule[1].debt, expected_debt);
        assert_approx(schedule[1].free_cash_flow, 50_000.0);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(40))]

        #[test]
        fn prop_reapplying_the_current_rate_is_a_no_op(
            holdings_milli in 1u32..50_000,
            price in 1_000u32..500_000,
            start_offset in 0i32..26,
            interest_bp in 0u32..5_000,
            cashflow in 0u32..500_000,
            edit_offset in 0usize..26
        ) {
            let params = ScheduleParams {
                holdings: holdings_milli as f64 / 1_000.0,
                starting_price: price as f64,
                starting_year: 2025 + start_offset,
                interest_rate: interest_bp as f64 / 100.0,
                desired_cashflow: cashflow as f64,
                ..sample_params()
            };
            let schedule = compute_schedule(&params, &GrowthRates::defaults());
            let row = schedule[edit_offset];
            let updated = update_year_growth_rate(&params, &schedule, row.year, row.growth_rate);
            prop_assert_eq!(updated, schedule);
        }

        #[test]
        fn prop_edit_leaves_earlier_years_untouched(
            holdings_milli in 1u32..50_000,
            price in 1_000u32..500_000,
            start_offset in 0i32..26,
            interest_bp in 0u32..5_000,
            cashflow in 0u32..500_000,
            edit_offset in 0usize..26,
            new_rate_bp in -9_000i32..20_000
        ) {
            let params = ScheduleParams {
                holdings: holdings_milli as f64 / 1_000.0,
                starting_price: price as f64,
                starting_year: 2025 + start_offset,
                interest_rate: interest_bp as f64 / 100.0,
                desired_cashflow: cashflow as f64,
                ..sample_params()
            };
            let schedule = compute_schedule(&params, &GrowthRates::defaults());
            let year = schedule[edit_offset].year;
            let new_rate = new_rate_bp as f64 / 100.0;
            let updated = update_year_growth_rate(&params, &schedule, year, new_rate);

            prop_assert_eq!(updated.len(), schedule.len());
            prop_assert_eq!(&updated[..edit_offset], &schedule[..edit_offset]);
            prop_assert_eq!(updated[edit_offset].growth_rate, new_rate);
            for (new_row, old_row) in updated.iter().zip(&schedule) {
                prop_assert_eq!(new_row.year, old_row.year);
                prop_assert_eq!(new_row.age, old_row.age);
            }
            let rebuilt = compute_schedule(&params, &GrowthRates::defaults().with_override(year, new_rate));
            prop_assert!(updated == rebuilt);
        }
    }
}
