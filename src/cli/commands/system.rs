use rust_decimal::Decimal;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::help;
use crate::cli::io as cli_io;
use crate::cli::registry::CommandEntry;
use crate::currency::format_number;
use crate::report::{DeliveryOutcome, SmtpCredentials, SmtpNotifier};
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "rate",
            "Show the conversion rate used this session",
            "rate",
            cmd_rate,
        ),
        CommandEntry::new(
            "report",
            "Print the expense report text",
            "report",
            cmd_report,
        ),
        CommandEntry::new(
            "email",
            "Email the expense report",
            "email",
            cmd_email,
        ),
        CommandEntry::new(
            "calc",
            "Quick arithmetic on two numbers",
            "calc <a> <+|-|*|/> <b>",
            cmd_calc,
        ),
        CommandEntry::new("help", "Show available commands", "help [command]", cmd_help),
        CommandEntry::new("version", "Show build information", "version", cmd_version),
        CommandEntry::new("exit", "Leave the shell", "exit", cmd_exit),
    ]
}

fn cmd_rate(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let quote = context.session.quote();
    let from = context.session.primary_currency();
    let to = context.session.secondary_currency();
    cli_io::print_info(quote.describe(from, to));
    if let Some(warning) = quote.warning(from, to) {
        cli_io::print_warning(warning);
    }
    Ok(())
}

fn cmd_report(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    cli_io::print_section("Daily Expense Report");
    println!("{}", context.session.summary_text());
    Ok(())
}

fn cmd_email(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.require(context.features().email, "email")?;
    let credentials = SmtpCredentials::from_env()
        .map_err(|err| CommandError::Message(format!("Cannot send the report: {err}.")))?;
    if !context.confirm(&format!("Send the report to {}?", credentials.address))? {
        cli_io::print_info("Report not sent.");
        return Ok(());
    }
    let notifier = SmtpNotifier::new(context.config.smtp.clone(), credentials);
    match context.session.send_report(&notifier) {
        DeliveryOutcome::Delivered => cli_io::print_success("Email sent successfully!"),
        DeliveryOutcome::Failed(reason) => {
            cli_io::print_warning(format!("Failed to send email: {reason}"))
        }
    }
    Ok(())
}

fn cmd_calc(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [left, operator, right] = args else {
        return Err(context.usage_error("calc"));
    };
    let result = calculate(parse_operand(left)?, operator, parse_operand(right)?)?;
    cli_io::print_success(format!("Result: {}", format_number(result)));
    Ok(())
}

fn parse_operand(raw: &str) -> Result<Decimal, CommandError> {
    let cleaned: String = raw.chars().filter(|ch| *ch != ',').collect();
    cleaned
        .parse::<Decimal>()
        .map_err(|_| CommandError::InvalidArguments(format!("`{raw}` is not a number.")))
}

pub(crate) fn calculate(
    left: Decimal,
    operator: &str,
    right: Decimal,
) -> Result<Decimal, CommandError> {
    let overflow = || CommandError::Message("Result is out of range.".into());
    match operator.to_lowercase().as_str() {
        "+" | "add" => left.checked_add(right).ok_or_else(overflow),
        "-" | "sub" | "subtract" => left.checked_sub(right).ok_or_else(overflow),
        "*" | "x" | "mul" | "multiply" => left.checked_mul(right).ok_or_else(overflow),
        "/" | "div" | "divide" => {
            if right.is_zero() {
                Err(CommandError::Message("Cannot divide by zero.".into()))
            } else {
                left.checked_div(right).ok_or_else(overflow)
            }
        }
        other => Err(CommandError::InvalidArguments(format!(
            "Unknown operator `{other}`. Use one of + - * /."
        ))),
    }
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first() {
        None => help::print_overview(&context.registry),
        Some(name) => match context.command(&name.to_lowercase()) {
            Some(entry) => help::print_command(&context.registry, entry),
            None => context.suggest_command(name),
        },
    }
    Ok(())
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    cli_io::print_info(build_info::describe(&build_info::current()));
    Ok(())
}

fn cmd_exit(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.confirm_exit().map_err(|err| CommandError::Message(err.to_string()))? {
        Err(CommandError::ExitRequested)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn calculator_handles_word_and_symbol_operators() {
        assert_eq!(calculate(dec!(2), "+", dec!(3)).expect("add"), dec!(5));
        assert_eq!(calculate(dec!(2), "x", dec!(3.5)).expect("mul"), dec!(7.0));
        assert_eq!(calculate(dec!(9), "divide", dec!(4)).expect("div"), dec!(2.25));
        assert!(calculate(dec!(1), "^", dec!(2)).is_err());
    }

    #[test]
    fn dividing_by_zero_is_an_error() {
        let err = calculate(dec!(5), "/", Decimal::ZERO).expect_err("zero");
        assert_eq!(err.to_string(), "Cannot divide by zero.");
    }
}
