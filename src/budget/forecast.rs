use rust_decimal::Decimal;

use crate::ledger::ExpenseLedger;

use super::{BudgetEvaluator, BudgetStanding, TripBudget};

/// Remaining-budget and projection figures for a trip with a budget set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Forecast {
    pub remaining: Decimal,
    pub standing: BudgetStanding,
    /// `None` until at least one day has been logged.
    pub projected_total: Option<Decimal>,
    pub likely_to_exceed: bool,
    /// Only offered while the projection stays within budget and days remain.
    pub suggested_daily: Option<Decimal>,
}

/// Linear trend of daily spend against days since the first logged date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendEstimate {
    pub slope_per_day: Decimal,
    pub intercept: Decimal,
    /// Days from the first to the last logged date, inclusive.
    pub elapsed_days: u32,
    pub projected_total: Decimal,
}

impl BudgetEvaluator {
    /// Average spend per logged day extrapolated over the whole trip.
    pub fn projected_total(ledger: &ExpenseLedger, trip_days: u32) -> Option<Decimal> {
        let logged_days = ledger.distinct_date_count();
        if logged_days == 0 {
            return None;
        }
        let daily = ledger.total_spent().checked_div(Decimal::from(logged_days))?;
        daily.checked_mul(Decimal::from(trip_days))
    }

    /// Remaining budget spread over the days not yet logged.
    ///
    /// Returns `None` once the logged days reach the trip length.
    pub fn suggested_daily_budget(
        remaining: Decimal,
        trip_days: u32,
        distinct_date_count: usize,
    ) -> Option<Decimal> {
        let days_left = i64::from(trip_days) - i64::try_from(distinct_date_count).ok()?;
        if days_left <= 0 {
            return None;
        }
        remaining.checked_div(Decimal::from(days_left))
    }

    /// Full sidebar forecast; `None` while no trip budget is set.
    pub fn forecast(ledger: &ExpenseLedger, trip: &TripBudget) -> Option<Forecast> {
        if !trip.is_set() {
            return None;
        }
        let remaining = Self::remaining_budget(trip, ledger.total_spent());
        let projected_total = Self::projected_total(ledger, trip.total_days);
        let likely_to_exceed = projected_total.is_some_and(|total| total > trip.total_budget);
        let suggested_daily = if likely_to_exceed {
            None
        } else {
            Self::suggested_daily_budget(remaining, trip.total_days, ledger.distinct_date_count())
        };
        Some(Forecast {
            remaining,
            standing: BudgetStanding::from_remaining(remaining),
            projected_total,
            likely_to_exceed,
            suggested_daily,
        })
    }

    /// Least-squares fit of daily totals, projected over the unlogged trip days.
    ///
    /// Needs at least two distinct dates. Projected days never go below zero.
    /// `None` when the fit does not fit in a `Decimal`.
    pub fn trend_projection(ledger: &ExpenseLedger, trip_days: u32) -> Option<TrendEstimate> {
        let daily = ledger.spent_by_date();
        if daily.len() < 2 {
            return None;
        }
        let first = daily.first()?.0;
        let last = daily.last()?.0;
        let points: Vec<(Decimal, Decimal)> = daily
            .iter()
            .map(|(date, amount)| (Decimal::from((*date - first).num_days()), *amount))
            .collect();

        let n = Decimal::from(points.len());
        let mean_x = checked_total(points.iter().map(|(x, _)| *x))?.checked_div(n)?;
        let mean_y = checked_total(points.iter().map(|(_, y)| *y))?.checked_div(n)?;
        let (sxx, sxy) = points
            .iter()
            .try_fold((Decimal::ZERO, Decimal::ZERO), |(sxx, sxy), (x, y)| {
                let dx = x.checked_sub(mean_x)?;
                let dy = y.checked_sub(mean_y)?;
                Some((
                    sxx.checked_add(dx.checked_mul(dx)?)?,
                    sxy.checked_add(dx.checked_mul(dy)?)?,
                ))
            })?;
        if sxx.is_zero() {
            return None;
        }
        let slope = sxy.checked_div(sxx)?;
        let intercept = mean_y.checked_sub(slope.checked_mul(mean_x)?)?;

        let elapsed_days = u32::try_from((last - first).num_days() + 1).ok()?;
        let upcoming = clamped_line_sum(
            intercept,
            slope,
            Decimal::from(elapsed_days),
            Decimal::from(trip_days),
        )?;

        Some(TrendEstimate {
            slope_per_day: slope,
            intercept,
            elapsed_days,
            projected_total: ledger.total_spent().checked_add(upcoming)?,
        })
    }
}

fn checked_total(mut values: impl Iterator<Item = Decimal>) -> Option<Decimal> {
    values.try_fold(Decimal::ZERO, |acc, value| acc.checked_add(value))
}

/// Sum of `max(intercept + slope * k, 0)` over the integers `start <= k < end`.
fn clamped_line_sum(
    intercept: Decimal,
    slope: Decimal,
    start: Decimal,
    end: Decimal,
) -> Option<Decimal> {
    // The line is positive on one contiguous run of days.
    let (lo, hi) = if slope.is_zero() {
        if intercept > Decimal::ZERO {
            (start, end)
        } else {
            (start, start)
        }
    } else {
        let root = (-intercept).checked_div(slope)?;
        if slope > Decimal::ZERO {
            (root.floor().checked_add(Decimal::ONE)?.max(start), end)
        } else {
            (start, root.ceil().min(end))
        }
    };
    if hi <= lo {
        return Some(Decimal::ZERO);
    }
    let count = hi.checked_sub(lo)?;
    let first_plus_last = lo.checked_add(hi)?.checked_sub(Decimal::ONE)?;
    let slope_part = slope
        .checked_mul(first_plus_last)?
        .checked_mul(count)?
        .checked_div(Decimal::TWO)?;
    intercept.checked_mul(count)?.checked_add(slope_part)
}
