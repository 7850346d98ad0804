//! Reads command lines from a line editor or from stdin and feeds the dispatcher.

use std::io::{self, Lines, StdinLock};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    history::DefaultHistory,
    Context, Editor, Helper, Highlighter, Hinter, Validator,
};
use spendy_config::model::SETTING_KEYS;
use spendy_core::{DateRange, SortBy, SortOrder};
use spendy_domain::{Category, TransactionKind};

use crate::cli::core::{CliMode, LoopControl, ShellContext};
use crate::cli::output;
use crate::errors::SpendyError;

/// When set, commands are read from stdin without a line editor.
pub const SCRIPT_ENV: &str = "SPENDY_CLI_SCRIPT";

const LIST_FLAGS: [&str; 5] = ["--search", "--range", "--sort", "--order", "--page"];

pub fn run_cli() -> Result<(), SpendyError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;
    let mut source = match mode {
        CliMode::Interactive => LineSource::editor(&context)?,
        CliMode::Script => LineSource::Script(io::stdin().lines()),
    };

    while context.running {
        let Some(line) = source.next_line(&context.prompt())? else {
            break;
        };
        match context.process_line(&line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err),
        }
    }
    Ok(())
}

enum LineSource {
    Editor(Box<Editor<ShellCompleter, DefaultHistory>>),
    Script(Lines<StdinLock<'static>>),
}

impl LineSource {
    fn editor(context: &ShellContext) -> Result<Self, SpendyError> {
        let mut editor = Editor::new()?;
        editor.set_helper(Some(ShellCompleter::new(context.command_names())));
        Ok(LineSource::Editor(Box::new(editor)))
    }

    /// `None` once input is exhausted.
    fn next_line(&mut self, prompt: &str) -> Result<Option<String>, SpendyError> {
        match self {
            LineSource::Script(lines) => Ok(lines.next().transpose()?),
            LineSource::Editor(editor) => match editor.readline(prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        editor.add_history_entry(line.trim()).ok();
                    }
                    Ok(Some(line))
                }
                Err(ReadlineError::Interrupted) => {
                    output::info("Interrupted. Type `exit` to leave.");
                    Ok(Some(String::new()))
                }
                Err(ReadlineError::Eof) => {
                    output::info("Exiting shell.");
                    Ok(None)
                }
                Err(err) => Err(err.into()),
            },
        }
    }
}

/// Tab completion for command names and the arguments each command takes.
#[derive(Helper, Highlighter, Hinter, Validator)]
struct ShellCompleter {
    commands: Vec<&'static str>,
}

impl ShellCompleter {
    fn new(mut commands: Vec<&'static str>) -> Self {
        commands.sort_unstable();
        commands.dedup();
        Self { commands }
    }

    /// Values that may follow `words`, narrowed to those starting with `partial`.
    fn candidates(&self, words: &[&str], partial: &str) -> Vec<String> {
        let options: Vec<String> = match words {
            [] | ["help"] => self.commands.iter().map(|name| name.to_string()).collect(),
            ["add"] => [TransactionKind::Income, TransactionKind::Expense]
                .iter()
                .map(|kind| kind.as_str().to_string())
                .collect(),
            ["add", kind] => match TransactionKind::from_label(kind) {
                Some(kind) => kind.categories().iter().map(|c| category_word(*c)).collect(),
                None => Vec::new(),
            },
            ["list", .., flag] if matches!(*flag, "--range" | "-r") => {
                DateRange::ALL.iter().map(|r| r.as_str().to_string()).collect()
            }
            ["list", .., "--sort"] => {
                SortBy::ALL.iter().map(|s| s.as_str().to_string()).collect()
            }
            ["list", .., "--order"] => {
                SortOrder::ALL.iter().map(|o| o.as_str().to_string()).collect()
            }
            ["list", .., flag] if matches!(*flag, "--search" | "-s" | "--page" | "-p") => {
                Vec::new()
            }
            ["list", ..] => LIST_FLAGS.iter().map(|flag| flag.to_string()).collect(),
            ["config"] => ["show", "set"]
                .into_iter()
                .chain(SETTING_KEYS)
                .map(str::to_string)
                .collect(),
            ["config", "set"] => SETTING_KEYS.iter().map(|key| key.to_string()).collect(),
            _ => Vec::new(),
        };

        let needle = partial.to_lowercase();
        options
            .into_iter()
            .filter(|option| option.to_lowercase().starts_with(&needle))
            .collect()
    }
}

/// Category label as a single shell word, e.g. `other-income`.
fn category_word(category: Category) -> String {
    category.label().to_lowercase().replace(' ', "-")
}

impl Completer for ShellCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        let start = prefix
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let lowered = prefix[..start].to_lowercase();
        let words: Vec<&str> = lowered.split_whitespace().collect();

        let pairs = self
            .candidates(&words, &prefix[start..])
            .into_iter()
            .map(|value| Pair {
                display: value.clone(),
                replacement: value,
            })
            .collect();
        Ok((start, pairs))
    }
}
