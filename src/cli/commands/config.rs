use spendy_config::model::SETTING_KEYS;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;

use super::CommandDefinition;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "config",
        "View and change preferences",
        "config [show|<key>|set <key> <value>]",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["show"] => {
            output::section("Configuration");
            for (key, value) in context.config.entries() {
                output::info(format!("  {:<22} {}", key, value));
            }
            Ok(())
        }
        ["set", key, rest @ ..] if !rest.is_empty() => {
            let value = rest.join(" ");
            context.set_config_value(key, &value)?;
            output::success(format!("Set `{}` to `{}`.", key, value.trim()));
            Ok(())
        }
        [key] => match context.config.get(key) {
            Some(value) => {
                output::info(format!("{} = {}", key, value));
                Ok(())
            }
            None => Err(CommandError::InvalidArguments(format!(
                "unknown setting `{}` (known: {})",
                key,
                SETTING_KEYS.join(", ")
            ))),
        },
        _ => Err(CommandError::InvalidArguments(
            "usage: config [show|<key>|set <key> <value>]".into(),
        )),
    }
}
