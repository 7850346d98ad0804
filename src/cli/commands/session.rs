use spendy_core::SessionEvent;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;

use super::CommandDefinition;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("login", "Sign in as a user", "login <user>", cmd_login),
        CommandDefinition::new("logout", "Sign out", "logout", cmd_logout),
        CommandDefinition::new("whoami", "Show the signed-in user", "whoami", cmd_whoami),
    ]
}

fn cmd_login(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let user = match args {
        [user] if !user.trim().is_empty() => user.trim(),
        _ => {
            return Err(CommandError::InvalidArguments(
                "usage: login <user>".into(),
            ))
        }
    };
    let events = context.login(user)?;
    if events.is_empty() {
        output::info(format!("Already signed in as `{}`.", user));
    }
    for event in events {
        match event {
            SessionEvent::LoggedOut(previous) => {
                output::info(format!("Signed out `{}`.", previous))
            }
            SessionEvent::LoggedIn(owner) => output::success(format!("Signed in as `{}`.", owner)),
        }
    }
    Ok(())
}

fn cmd_logout(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    match context.logout()? {
        Some(SessionEvent::LoggedOut(previous)) => {
            output::success(format!("Signed out `{}`.", previous))
        }
        _ => output::info("Nobody is signed in."),
    }
    Ok(())
}

fn cmd_whoami(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    match context.current_user() {
        Some(user) => output::info(format!("Signed in as `{}`.", user)),
        None => output::info("Not signed in."),
    }
    Ok(())
}
