use spendy_core::SummaryService;

use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::render::{render_categories, render_monthly, render_totals};

use super::CommandDefinition;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "totals",
            "Show income, expenses and balance",
            "totals",
            cmd_totals,
        ),
        CommandDefinition::new(
            "categories",
            "Show spending per category",
            "categories",
            cmd_categories,
        ),
        CommandDefinition::new(
            "monthly",
            "Show income, expenses and savings per month",
            "monthly",
            cmd_monthly,
        ),
    ]
}

fn cmd_totals(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let transactions = context.load_transactions()?;
    let totals = SummaryService::totals(&transactions);
    output::section("Totals");
    output::block(&render_totals(&totals, &context.money()));
    Ok(())
}

fn cmd_categories(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let transactions = context.load_transactions()?;
    let categories = SummaryService::categories(&transactions);
    output::section("Spending by category");
    if categories.is_empty() {
        output::info("No expenses recorded.");
        return Ok(());
    }
    output::block(&render_categories(&categories, &context.money()));
    Ok(())
}

fn cmd_monthly(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let transactions = context.load_transactions()?;
    let bucketing = context.default_request().bucketing;
    let series = SummaryService::monthly(&transactions, bucketing);
    output::section(format!("Monthly trend ({})", bucketing.as_str()));
    if series.is_empty() {
        output::info("No transactions recorded.");
        return Ok(());
    }
    output::block(&render_monthly(&series, &context.money()));
    Ok(())
}
