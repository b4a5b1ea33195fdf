//! Shell context, dispatch, and CLI error types.

use std::{io, time::Duration};

use dialoguer::theme::ColorfulTheme;
use rust_decimal::Decimal;
use strsim::levenshtein;
use thiserror::Error;

use crate::{
    config::{Config, ConfigManager, Features},
    currency::{format_amount, FixedRateProvider, HttpRateProvider, RateProvider},
    errors::{ConfigError, LedgerError},
    session::Session,
};

use super::commands;
use super::io as cli_io;
use super::registry::{CommandEntry, CommandRegistry};

/// Set to run the shell over stdin without prompts or colour.
pub const SCRIPT_ENV: &str = "TRIP_LEDGER_CLI_SCRIPT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

/// Failures that end the shell.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error(transparent)]
    Prompt(#[from] dialoguer::Error),
}

/// Failures of a single command; reported and the shell carries on.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error("`{0}` is disabled in the configuration.")]
    Disabled(&'static str),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub config: Config,
    pub session: Session,
    pub theme: ColorfulTheme,
    pub running: bool,
}

impl ShellContext {
    /// Loads the configuration and starts a fresh session.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config = ConfigManager::new()?.load()?;
        let provider = rate_provider(&config);
        let session = Session::start(&config, provider.as_ref());
        let context = Self::with_session(mode, config, session);
        context.report_rate_warning();
        Ok(context)
    }

    pub fn with_session(mode: CliMode, config: Config, session: Session) -> Self {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);
        Self {
            mode,
            registry,
            config,
            session,
            theme: ColorfulTheme::default(),
            running: true,
        }
    }

    pub fn prompt(&self) -> String {
        format!("trip ({} entries)> ", self.session.ledger().len())
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn features(&self) -> Features {
        self.config.features
    }

    /// Fails with [`CommandError::Disabled`] when a feature module is switched off.
    pub(crate) fn require(&self, enabled: bool, name: &'static str) -> CommandResult {
        if enabled {
            Ok(())
        } else {
            Err(CommandError::Disabled(name))
        }
    }

    pub(crate) fn usage_error(&self, name: &str) -> CommandError {
        match self.command(name) {
            Some(entry) => CommandError::InvalidArguments(format!("Usage: {}", entry.usage)),
            None => CommandError::InvalidArguments(format!("Invalid arguments for `{name}`.")),
        }
    }

    pub(crate) fn money(&self, amount: Decimal) -> String {
        format_amount(amount, self.session.primary_currency())
    }

    pub(crate) fn money_secondary(&self, amount: Decimal) -> String {
        format_amount(amount, self.session.secondary_currency())
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    /// Tokenizes and dispatches one input line.
    pub fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match super::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                cli_io::print_warning(err);
                return Ok(LoopControl::Continue);
            }
        };
        let Some(raw) = tokens.first() else {
            return Ok(LoopControl::Continue);
        };
        let command = raw.to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();

        match self.dispatch(&command, raw, &args) {
            Ok(LoopControl::Exit) => {
                self.running = false;
                Ok(LoopControl::Exit)
            }
            other => other,
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let best = self
            .registry
            .names()
            .map(|key| (levenshtein(key, &input.to_lowercase()), key))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = best {
            if distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(cli_io::confirm_action(&self.theme, prompt, true)?)
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(cli_io::confirm_action(&self.theme, "Exit and discard this session?", false)?)
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(message);
                cli_io::print_hint("Use `help <command>` for usage details.");
            }
            other => cli_io::print_error(other),
        }
    }

    fn report_rate_warning(&self) {
        let quote = self.session.quote();
        if let Some(warning) = quote.warning(
            self.session.primary_currency(),
            self.session.secondary_currency(),
        ) {
            cli_io::print_warning(warning);
        }
    }
}

fn rate_provider(config: &Config) -> Box<dyn RateProvider> {
    if config.features.live_rate {
        Box::new(
            HttpRateProvider::new(config.rate_endpoint.clone(), config.secondary_currency.clone())
                .with_fallback(config.fallback_rate)
                .with_timeout(Duration::from_secs(config.request_timeout_secs)),
        )
    } else {
        Box::new(FixedRateProvider::new(config.fallback_rate))
    }
}
