use spendy_core::{DateRange, SortBy, SortOrder, SummaryService, TransactionService};
use spendy_domain::{TransactionDraft, TransactionKind};

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::render::{render_listing, render_recent};

use super::CommandDefinition;

const DEFAULT_RECENT: usize = 5;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "add",
            "Record an income or expense",
            "add <income|expense> <category> <amount> <date> <description...>",
            cmd_add,
        )
        .with_notes(category_notes),
        CommandDefinition::new(
            "list",
            "List transactions grouped by day",
            "list [--search <text>] [--range all|today|week|month|3months|6months|year] \
             [--sort date|amount] [--order asc|desc] [--page <n>]",
            cmd_list,
        ),
        CommandDefinition::new(
            "recent",
            "Show the newest transactions",
            "recent [count]",
            cmd_recent,
        ),
    ]
}

/// One line per kind naming the categories it accepts.
fn category_notes() -> Vec<String> {
    [TransactionKind::Income, TransactionKind::Expense]
        .into_iter()
        .map(|kind| {
            let labels: Vec<&str> = kind.categories().iter().map(|c| c.label()).collect();
            format!("{}: {}", kind.as_str(), labels.join(", "))
        })
        .collect()
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() < 5 {
        return Err(CommandError::InvalidArguments(
            "usage: add <income|expense> <category> <amount> <date> <description...>".into(),
        ));
    }
    let draft = TransactionDraft {
        kind: args[0].to_string(),
        category: args[1].to_string(),
        amount: args[2].to_string(),
        date: args[3].to_string(),
        description: args[4..].join(" "),
    };
    let session = context.session()?;
    let txn = TransactionService::add(context.store(), &session, &draft)?;
    output::success(format!(
        "Recorded {} {} `{}` ({}).",
        txn.kind.as_str(),
        context.money().amount(txn.amount),
        txn.description,
        txn.category
    ));
    Ok(())
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let mut request = context.default_request();
    let mut iter = args.iter();
    while let Some(flag) = iter.next() {
        let mut value = || {
            iter.next().copied().ok_or_else(|| {
                CommandError::InvalidArguments(format!("`{}` expects a value", flag))
            })
        };
        match *flag {
            "--search" | "-s" => request.filter.search_query = value()?.to_string(),
            "--range" | "-r" => request.filter.date_range = DateRange::from_value(value()?),
            "--sort" => request.filter.sort_by = SortBy::from_value(value()?),
            "--order" => request.filter.sort_order = SortOrder::from_value(value()?),
            "--page" | "-p" => {
                let raw = value()?;
                request.page = raw.parse().map_err(|_| {
                    CommandError::InvalidArguments(format!("invalid page `{}`", raw))
                })?;
            }
            other => {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown option `{}`",
                    other
                )))
            }
        }
    }

    let transactions = context.load_transactions()?;
    let listing = SummaryService::listing(&transactions, &request, context.now());
    output::section(format!(
        "Transactions ({}, {} {})",
        request.filter.date_range,
        request.filter.sort_by.as_str(),
        request.filter.sort_order.as_str()
    ));
    if listing.is_empty() {
        output::info("No transactions match.");
    }
    output::block(&render_listing(&listing, &context.money()));
    Ok(())
}

fn cmd_recent(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let count = match args.first() {
        Some(raw) => raw.parse().map_err(|_| {
            CommandError::InvalidArguments(format!("invalid count `{}`", raw))
        })?,
        None => DEFAULT_RECENT,
    };
    let transactions = context.load_transactions()?;
    let recent = SummaryService::recent(&transactions, count);
    output::section("Recent transactions");
    if recent.is_empty() {
        output::info("No transactions yet.");
        return Ok(());
    }
    output::block(&render_recent(&recent, &context.money()));
    Ok(())
}
