use crate::cli::io::{self as cli_io, Table};
use crate::cli::registry::{CommandEntry, CommandRegistry};

pub fn print_overview(registry: &CommandRegistry) {
    cli_io::print_section("Available commands");
    let mut table = Table::new(["Command", "Description"]);
    for entry in registry.list() {
        table.add_row([entry.name, entry.description]);
    }
    table.print();
    cli_io::print_hint("Use `help <command>` for details.");
}

pub fn print_command(registry: &CommandRegistry, entry: &CommandEntry) {
    cli_io::print_section(format!("Help: {}", entry.name));
    cli_io::print_info(entry.description);
    cli_io::print_info(format!("Usage: {}", entry.usage));
    let aliases = registry.aliases_for(entry.name);
    if !aliases.is_empty() {
        cli_io::print_info(format!("Aliases: {}", aliases.join(", ")));
    }
}
