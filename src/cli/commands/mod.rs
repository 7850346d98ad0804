use std::collections::HashMap;

pub mod config;
pub mod report;
pub mod session;
pub mod system;
pub mod transaction;

use crate::cli::core::{CommandResult, ShellContext};

pub(crate) fn all_definitions() -> Vec<CommandDefinition> {
    let mut commands = Vec::new();
    commands.extend(system::definitions());
    commands.extend(session::definitions());
    commands.extend(transaction::definitions());
    commands.extend(report::definitions());
    commands.extend(config::definitions());
    commands
}

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;
pub type CommandNotes = fn() -> Vec<String>;

#[derive(Clone)]
pub struct CommandDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
    /// Extra lines shown by `help <command>`.
    pub notes: Option<CommandNotes>,
}

impl CommandDefinition {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: CommandNotes) -> Self {
        self.notes = Some(notes);
        self
    }
}

/// Command lookup by name, remembering registration order for help output.
pub struct CommandRegistry {
    commands: HashMap<&'static str, CommandDefinition>,
    order: Vec<&'static str>,
}

impl CommandRegistry {
    pub fn new(definitions: Vec<CommandDefinition>) -> Self {
        let mut commands = HashMap::new();
        let mut order = Vec::new();
        for definition in definitions {
            order.push(definition.name);
            commands.insert(definition.name, definition);
        }
        Self { commands, order }
    }

    pub fn get(&self, name: &str) -> Option<&CommandDefinition> {
        self.commands.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandDefinition> {
        self.order
            .iter()
            .filter_map(move |name| self.commands.get(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_keeps_registration_order() {
        let registry = CommandRegistry::new(all_definitions());
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names.first(), Some(&"help"));
        for expected in [
            "login", "logout", "whoami", "add", "list", "recent", "totals", "categories",
            "monthly", "config", "exit",
        ] {
            assert!(registry.get(expected).is_some(), "missing `{expected}`");
        }
        assert_eq!(registry.iter().count(), names.len());
    }

    #[test]
    fn add_help_names_every_category_once() {
        let registry = CommandRegistry::new(all_definitions());
        let notes = registry.get("add").and_then(|add| add.notes).expect("add notes");
        let lines = notes();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("income: Salary"));
        assert!(lines[0].ends_with("Other Income"));
        assert!(lines[1].starts_with("expense: Food"));
        assert!(!lines[1].contains("Salary"));
        assert!(registry.get("list").and_then(|list| list.notes).is_none());
    }
}
