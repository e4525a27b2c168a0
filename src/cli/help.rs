use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::{CommandEntry, CommandRegistry};
use crate::cli::table::{Table, TableColumn};

pub fn print_overview(registry: &CommandRegistry) {
    let mut table = Table::new(
        Some("Available commands"),
        vec![TableColumn::new("Command", 10), TableColumn::new("What it does", 56)],
    );
    for entry in registry.list() {
        table.add_row(vec![entry.name, entry.description]);
    }
    table.print();
    io::print_hint("`help <command>` shows the usage line. Press `?` or Tab to complete.");
}

pub fn print_command(entry: &CommandEntry) {
    output_section(entry.name);
    io::print_info(format!("  {}", entry.description));
    io::print_info(format!("  usage: {}", entry.usage));
}
