use std::path::PathBuf;

use chrono::Local;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::input::{parse_amount, parse_category, split_expense_args};
use crate::cli::io::{self as cli_io, Table};
use crate::cli::registry::CommandEntry;
use crate::ledger::{export, share_of_total};

use super::budget::{print_forecast, print_over_budget};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "add",
            "Record an expense",
            "add <amount> <category> [description] [--date YYYY-MM-DD] [--note text]",
            cmd_add,
        ),
        CommandEntry::new("list", "Show every recorded expense", "list", cmd_list),
        CommandEntry::new(
            "summary",
            "Show totals, limit warnings and the budget outlook",
            "summary",
            cmd_summary,
        ),
        CommandEntry::new(
            "breakdown",
            "Show spend per category",
            "breakdown",
            cmd_breakdown,
        ),
        CommandEntry::new("daily", "Show spend per day", "daily", cmd_daily),
        CommandEntry::new(
            "export",
            "Write all expenses to a CSV file",
            "export [path]",
            cmd_export,
        ),
        CommandEntry::new(
            "import",
            "Append expenses from an exported CSV file",
            "import <path>",
            cmd_import,
        ),
    ]
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [amount, category, rest @ ..] = args else {
        return Err(context.usage_error("add"));
    };
    let amount = parse_amount(amount)?;
    let category = parse_category(category)?;
    let (date, description) = split_expense_args(rest)?;
    let date = date.unwrap_or_else(|| Local::now().date_naive());

    if amount.clamped {
        cli_io::print_warning("Amounts cannot be negative; recorded as 0.00.");
    }
    let position = context
        .session
        .add_expense(date, category, amount.value, description)?;
    let entry = &context.session.ledger().entries()[position - 1];
    cli_io::print_success(format!(
        "Added expense #{}: {} {} ({}) on {}",
        position,
        entry.category(),
        context.money(entry.amount_primary()),
        context.money_secondary(entry.amount_secondary()),
        entry.date()
    ));
    Ok(())
}

fn cmd_list(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let ledger = context.session.ledger();
    if ledger.is_empty() {
        cli_io::print_info("No expenses added yet.");
        return Ok(());
    }
    let mut table = Table::new([
        "#".to_string(),
        "Date".to_string(),
        "Category".to_string(),
        format!("Amount ({})", context.session.primary_currency()),
        format!("Amount ({})", context.session.secondary_currency()),
        "Description".to_string(),
    ]);
    for (idx, entry) in ledger.entries().iter().enumerate() {
        table.add_row([
            (idx + 1).to_string(),
            entry.date().to_string(),
            entry.category().to_string(),
            context.money(entry.amount_primary()),
            context.money_secondary(entry.amount_secondary()),
            entry.description().to_string(),
        ]);
    }
    table.print();
    Ok(())
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    cli_io::print_section("Expense Summary");
    let ledger = context.session.ledger();
    if ledger.is_empty() {
        cli_io::print_info("No expenses added yet.");
    } else {
        cli_io::print_info(format!(
            "Total Expense: {} ({})",
            context.money(ledger.total_spent()),
            context.money_secondary(ledger.total_secondary())
        ));
        cli_io::print_info(format!(
            "{} expenses over {} day(s).",
            ledger.len(),
            ledger.distinct_date_count()
        ));
    }
    if context.features().category_limits {
        print_over_budget(context);
    }
    if context.features().forecasting {
        print_forecast(context);
    }
    cli_io::print_info(context.session.quote().describe(
        context.session.primary_currency(),
        context.session.secondary_currency(),
    ));
    Ok(())
}

fn cmd_breakdown(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let ledger = context.session.ledger();
    let total = ledger.total_spent();
    let mut table = Table::new(["Category", "Spent", "Share"]);
    for (category, spent) in ledger.category_breakdown() {
        let share = share_of_total(spent, total)
            .map(|pct| format!("{pct}%"))
            .unwrap_or_else(|| "-".into());
        table.add_row([category.to_string(), context.money(spent), share]);
    }
    table.print();
    Ok(())
}

fn cmd_daily(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let daily = context.session.ledger().spent_by_date();
    if daily.is_empty() {
        cli_io::print_info("No expenses added yet.");
        return Ok(());
    }
    let mut table = Table::new(["Date", "Spent"]);
    for (date, spent) in daily {
        table.add_row([date.to_string(), context.money(spent)]);
    }
    table.print();
    Ok(())
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    context.require(context.features().export, "export")?;
    let path = args
        .first()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&context.config.export_file));
    let ledger = context.session.ledger();
    export::export_to_path(
        ledger,
        context.session.primary_currency(),
        context.session.secondary_currency(),
        &path,
    )?;
    cli_io::print_success(format!(
        "Exported {} expenses to {}",
        ledger.len(),
        path.display()
    ));
    Ok(())
}

fn cmd_import(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [path] = args else {
        return Err(context.usage_error("import"));
    };
    let entries = export::import_from_path(&PathBuf::from(path))?;
    if entries.is_empty() {
        return Err(CommandError::Message(format!("`{path}` holds no expenses.")));
    }
    let count = context.session.import_entries(entries)?;
    cli_io::print_success(format!("Imported {count} expenses from {path}"));
    Ok(())
}
