use rust_decimal::Decimal;

use crate::budget::{BudgetStanding, TripBudget};
use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::input::{parse_amount, parse_category, parse_days};
use crate::cli::io::{self as cli_io, Table};
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "limit",
            "Set a category budget (0 clears it)",
            "limit <category> <amount>",
            cmd_limit,
        ),
        CommandEntry::new("limits", "Show category budgets", "limits", cmd_limits),
        CommandEntry::new(
            "check",
            "Warn about categories over their budget",
            "check",
            cmd_check,
        ),
        CommandEntry::new(
            "budget",
            "Set the total trip budget and length",
            "budget <total> [days]",
            cmd_budget,
        ),
        CommandEntry::new(
            "forecast",
            "Show remaining budget and projected spend",
            "forecast",
            cmd_forecast,
        ),
        CommandEntry::new(
            "trend",
            "Project spend from the day-by-day trend",
            "trend",
            cmd_trend,
        ),
    ]
}

fn cmd_limit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    context.require(context.features().category_limits, "limit")?;
    let [category, amount] = args else {
        return Err(context.usage_error("limit"));
    };
    let category = parse_category(category)?;
    let amount = parse_amount(amount)?;
    if amount.clamped {
        cli_io::print_warning("Budgets cannot be negative; the limit was cleared.");
    }
    context.session.set_limit(category, amount.value);
    if amount.value.is_zero() {
        cli_io::print_success(format!("{category} has no budget limit."));
    } else {
        cli_io::print_success(format!(
            "{category} budget set to {}",
            context.money(amount.value)
        ));
    }
    Ok(())
}

fn cmd_limits(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.require(context.features().category_limits, "limits")?;
    let ledger = context.session.ledger();
    let mut table = Table::new(["Category", "Budget", "Spent"]);
    for (category, limit) in context.session.evaluator().limits() {
        let budget = if limit.is_zero() {
            "-".to_string()
        } else {
            context.money(limit)
        };
        table.add_row([
            category.to_string(),
            budget,
            context.money(ledger.spent_by_category(category)),
        ]);
    }
    table.print();
    Ok(())
}

fn cmd_check(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.require(context.features().category_limits, "check")?;
    if !print_over_budget(context) {
        cli_io::print_success("All categories are within their budgets.");
    }
    Ok(())
}

fn cmd_budget(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (total, days) = match args {
        [total] => (parse_amount(total)?, context.session.trip().total_days),
        [total, days] => (parse_amount(total)?, parse_days(days)?),
        _ => return Err(context.usage_error("budget")),
    };
    if total.clamped {
        cli_io::print_warning("Budgets cannot be negative; the trip budget was cleared.");
    }
    let trip = TripBudget::new(total.value, days);
    context.session.set_trip_budget(trip);
    cli_io::print_success(format!(
        "Trip budget set to {} over {} day(s).",
        context.money(trip.total_budget),
        trip.total_days
    ));
    Ok(())
}

fn cmd_forecast(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.require(context.features().forecasting, "forecast")?;
    if !print_forecast(context) {
        cli_io::print_info("Set a trip budget with `budget <total> [days]` first.");
    }
    Ok(())
}

fn cmd_trend(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.require(context.features().trend, "trend")?;
    let Some(trend) = context.session.trend() else {
        cli_io::print_info("Log expenses on at least two different days to see a trend.");
        return Ok(());
    };
    let trip = context.session.trip();
    cli_io::print_section("Spending Trend");
    cli_io::print_info(format!(
        "Daily spend changes by {} per day ({} days logged of {}).",
        context.money(trend.slope_per_day),
        trend.elapsed_days,
        trip.total_days
    ));
    cli_io::print_info(format!(
        "Trend-projected Total Expense: {}",
        context.money(trend.projected_total)
    ));
    if trip.is_set() && trend.projected_total > trip.total_budget {
        cli_io::print_warning("At this trend you are likely to exceed your budget!");
    }
    Ok(())
}

/// Prints a warning per category over its limit. Returns whether any were found.
pub(crate) fn print_over_budget(context: &ShellContext) -> bool {
    let flagged = context.session.over_budget();
    for over in &flagged {
        cli_io::print_warning(format!(
            "Over Budget for {}! Spent {} out of {}",
            over.category,
            context.money(over.spent),
            context.money(over.limit)
        ));
    }
    !flagged.is_empty()
}

/// Prints the budget outlook. Returns `false` when no trip budget is set.
pub(crate) fn print_forecast(context: &ShellContext) -> bool {
    let Some(forecast) = context.session.forecast() else {
        return false;
    };
    cli_io::print_section("Budget Tracker");
    cli_io::print_info(format!(
        "Remaining Budget: {}",
        context.money(forecast.remaining)
    ));
    match forecast.standing {
        BudgetStanding::Exceeded => cli_io::print_error("You have exceeded your budget!"),
        BudgetStanding::Within => cli_io::print_success("You are within your budget."),
    }
    if let Some(projected) = forecast.projected_total {
        cli_io::print_info(format!("Projected Total Expense: {}", context.money(projected)));
    }
    if forecast.likely_to_exceed {
        cli_io::print_warning("You are likely to exceed your budget!");
    } else if let Some(daily) = forecast.suggested_daily {
        cli_io::print_info(format!("Suggested Daily Budget: {}", context.money(daily)));
    } else if forecast.remaining >= Decimal::ZERO {
        cli_io::print_hint("No trip days left to spread the remaining budget over.");
    }
    true
}
