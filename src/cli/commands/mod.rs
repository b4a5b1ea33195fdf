pub mod budget;
pub mod expense;
pub mod system;

use crate::cli::registry::{CommandEntry, CommandRegistry};

const ROOT_COMMAND_ORDER: &[&str] = &[
    "add", "list", "summary", "breakdown", "daily", "limit", "limits", "check", "budget",
    "forecast", "trend", "rate", "export", "import", "report", "email", "calc", "help",
    "version", "exit",
];

const ALIASES: &[(&str, &str)] = &[("ls", "list"), ("quit", "exit")];

pub(crate) fn all_entries() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(expense::definitions());
    commands.extend(budget::definitions());
    commands.extend(system::definitions());
    commands
}

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    let mut entries = all_entries();
    entries.sort_by_key(|entry| {
        ROOT_COMMAND_ORDER
            .iter()
            .position(|name| entry.name.eq_ignore_ascii_case(name))
            .unwrap_or(ROOT_COMMAND_ORDER.len())
    });
    for entry in entries {
        registry.register(entry);
    }
    for &(alias, target) in ALIASES {
        registry.register_alias(alias, target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_command_is_ordered_and_registered() {
        let mut registry = CommandRegistry::new();
        register_all(&mut registry);
        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, ROOT_COMMAND_ORDER);
        assert_eq!(registry.get("quit").map(|entry| entry.name), Some("exit"));
    }
}
