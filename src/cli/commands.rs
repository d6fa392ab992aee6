//! Command handlers for the ledger shell.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::common::{Displayable, NamedEntity};
use crate::domain::{
    parse_amount, today, CategoryKind, DateWindow, EntryKind, MonthKey, Transaction,
    TransactionDraft, TransactionFilter,
};

use super::context::{CommandError, CommandResult, ShellContext};
use super::help;
use super::output;
use super::registry::{CommandEntry, CommandRegistry};

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    registry.register(CommandEntry::new(
        "add-expense",
        "Record an expense",
        "add-expense <amount> [category] [yyyy-mm-dd] [description...]",
        cmd_add_expense,
    ));
    registry.register(CommandEntry::new(
        "add-income",
        "Record an income",
        "add-income <amount> [source] [yyyy-mm-dd] [description...]",
        cmd_add_income,
    ));
    registry.register(CommandEntry::new(
        "list",
        "List transactions, newest first",
        "list [income|expense] [category=<name>] [month=YYYY-MM] [from=YYYY-MM-DD] [to=YYYY-MM-DD]",
        cmd_list,
    ));
    registry.register(CommandEntry::new(
        "balance",
        "Show income, expense, and balance totals",
        "balance [income|expense] [category=<name>] [month=YYYY-MM] [from=...] [to=...]",
        cmd_balance,
    ));
    registry.register(CommandEntry::new(
        "summary",
        "Monthly totals with the expense breakdown",
        "summary [YYYY-MM]",
        cmd_summary,
    ));
    registry.register(CommandEntry::new(
        "categories",
        "List the category sets",
        "categories",
        cmd_categories,
    ));
    registry.register(CommandEntry::new(
        "add-category",
        "Add a category",
        "add-category <name> [expense|income]",
        cmd_add_category,
    ));
    registry.register(CommandEntry::new(
        "remove",
        "Delete a transaction by id (unique prefix allowed)",
        "remove <id>",
        cmd_remove,
    ));
    registry.register(CommandEntry::new(
        "currency",
        "Show or set the display currency",
        "currency [code]",
        cmd_currency,
    ));
    registry.register(CommandEntry::new(
        "status",
        "Show ledger status",
        "status",
        cmd_status,
    ));
    registry.register(CommandEntry::new(
        "help",
        "Show available commands",
        "help [command]",
        cmd_help,
    ));
    registry.register(CommandEntry::new(
        "version",
        "Show version information",
        "version",
        cmd_version,
    ));
    registry.register(CommandEntry::new("exit", "Leave the shell", "exit", cmd_exit));
    registry.register(CommandEntry::new("quit", "Leave the shell", "quit", cmd_exit));
}

fn cmd_add_expense(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    add_entry(context, EntryKind::Expense, args)
}

fn cmd_add_income(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    add_entry(context, EntryKind::Income, args)
}

fn add_entry(context: &mut ShellContext, kind: EntryKind, args: &[&str]) -> CommandResult {
    let raw_amount = args.first().ok_or_else(|| {
        CommandError::InvalidArguments(format!(
            "usage: add-{kind} <amount> [label] [yyyy-mm-dd] [description...]"
        ))
    })?;
    let amount = parse_amount(raw_amount).map_err(CommandError::from)?;

    let mut draft = TransactionDraft::new(kind, amount);
    if let Some(label) = args.get(1) {
        draft = draft.with_label(*label);
    }
    if let Some(raw_date) = args.get(2) {
        draft = draft.with_date(parse_date(raw_date)?);
    }
    if args.len() > 3 {
        draft = draft.with_description(args[3..].join(" "));
    }

    let transaction = context.book.add_transaction(draft).map_err(CommandError::from)?;
    output::success(format!(
        "Recorded {}: {}",
        transaction.kind,
        describe(&transaction, context.book.currency())
    ));
    Ok(())
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let filter = parse_filter_args(args)?;
    let mut entries: Vec<&Transaction> = context.book.transactions(&filter).collect();
    if entries.is_empty() {
        output::info("No matching transactions.");
        return Ok(());
    }
    // Newest first is a display choice; the ledger keeps insertion order.
    entries.sort_by(|a, b| b.date.cmp(&a.date));

    let currency = context.book.currency();
    output::section(format!("Transactions ({})", entries.len()));
    for txn in entries {
        let sign = match txn.kind {
            EntryKind::Income => "+",
            EntryKind::Expense => "-",
        };
        let mut line = format!(
            "  {} {}{} {} ({}) [{}]",
            txn.date,
            sign,
            txn.amount,
            currency,
            txn.label,
            short_id(txn.id)
        );
        if !txn.description.is_empty() {
            line.push(' ');
            line.push_str(&txn.description);
        }
        output::info(line);
    }
    Ok(())
}

fn cmd_balance(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let filter = parse_filter_args(args)?;
    let report = context.book.balance(&filter);
    output::section("Balance");
    output::info(format!("  Income:  {} {}", report.income_total, report.currency));
    output::info(format!("  Expense: {} {}", report.expense_total, report.currency));
    output::info(format!("  Balance: {} {}", report.balance, report.currency));
    Ok(())
}

fn cmd_summary(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let month = match args.first() {
        Some(raw) => raw
            .parse::<MonthKey>()
            .map_err(|err| CommandError::InvalidArguments(err.to_string()))?,
        None => MonthKey::of(today()),
    };
    let summary = context.book.month_summary(month);
    output::section(format!("Summary {}", summary.month));
    output::info(format!(
        "  Income:  {} {}",
        summary.report.income_total, summary.report.currency
    ));
    output::info(format!(
        "  Expense: {} {}",
        summary.report.expense_total, summary.report.currency
    ));
    output::info(format!(
        "  Balance: {} {}",
        summary.report.balance, summary.report.currency
    ));
    if summary.categories.is_empty() {
        output::info("  No expenses recorded.");
        return Ok(());
    }
    output::info("By category:");
    for entry in &summary.categories {
        output::info(format!(
            "  {:<16} {} {}",
            entry.label, entry.amount, summary.report.currency
        ));
    }
    Ok(())
}

fn cmd_categories(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    for (title, kind) in [
        ("Expense categories", CategoryKind::Expense),
        ("Income categories", CategoryKind::Income),
    ] {
        output::section(title);
        for category in context
            .book
            .categories()
            .iter()
            .filter(|category| category.kind == kind)
        {
            output::info(format!("  {}", category.name()));
        }
    }
    Ok(())
}

fn cmd_add_category(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = args.first().ok_or_else(|| {
        CommandError::InvalidArguments("usage: add-category <name> [expense|income]".into())
    })?;
    let kind = match args.get(1) {
        None => CategoryKind::Expense,
        Some(raw) => parse_category_kind(raw)?,
    };
    let category = context
        .book
        .add_category(name, kind)
        .map_err(CommandError::from)?;
    output::success(format!(
        "Category `{}` added ({}).",
        category.name, category.kind
    ));
    Ok(())
}

fn cmd_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let needle = args
        .first()
        .ok_or_else(|| CommandError::InvalidArguments("usage: remove <id>".into()))?;
    let target = resolve_transaction_id(context, needle)?;

    let summary = context
        .book
        .transactions(&TransactionFilter::default())
        .find(|txn| txn.id == target)
        .map(|txn| txn.display_label());
    let prompt = match &summary {
        Some(label) => format!("Delete {}?", label),
        None => format!("Delete transaction {}?", target),
    };
    if !context.confirm(&prompt)? {
        output::info("Removal cancelled.");
        return Ok(());
    }

    let removed = context
        .book
        .remove_transaction(target)
        .map_err(CommandError::from)?;
    output::success(format!(
        "Removed {}",
        describe(&removed, context.book.currency())
    ));
    Ok(())
}

fn cmd_currency(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first() {
        None => {
            output::info(format!("Display currency: {}", context.book.currency()));
            Ok(())
        }
        Some(code) => {
            context.book.set_currency(code).map_err(CommandError::from)?;
            context.config.currency = context.book.currency().to_string();
            context.persist_config()?;
            output::success(format!(
                "Display currency set to {}.",
                context.book.currency()
            ));
            Ok(())
        }
    }
}

fn cmd_status(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section("Ledger status");
    output::info(format!(
        "  Transactions: {}",
        context.book.transaction_count()
    ));
    output::info(format!("  Categories:   {}", context.book.categories().len()));
    output::info(format!("  Currency:     {}", context.book.currency()));
    output::info(format!(
        "  Last updated: {}",
        context.book.last_updated().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first() {
        None => help::print_overview(&context.registry),
        Some(name) => match context.registry.get(&name.to_lowercase()) {
            Some(entry) => help::print_command(entry),
            None => context.suggest_command(name),
        },
    }
    Ok(())
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::info(format!("Kakeibo Core version {}", env!("CARGO_PKG_VERSION")));
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}

/// Resolves a full id or a unique id prefix against the collection.
fn resolve_transaction_id(context: &ShellContext, needle: &str) -> Result<Uuid, CommandError> {
    if let Ok(id) = needle.parse::<Uuid>() {
        return Ok(id);
    }
    let needle_lower = needle.to_lowercase();
    let matches: Vec<Uuid> = context
        .book
        .transactions(&TransactionFilter::default())
        .filter(|txn| txn.id.to_string().starts_with(&needle_lower))
        .map(|txn| txn.id)
        .collect();
    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(CommandError::InvalidArguments(format!(
            "no transaction matches id `{needle}`"
        ))),
        _ => Err(CommandError::InvalidArguments(format!(
            "id prefix `{needle}` is ambiguous ({} matches)",
            matches.len()
        ))),
    }
}

fn parse_filter_args(args: &[&str]) -> Result<TransactionFilter, CommandError> {
    let mut filter = TransactionFilter::default();
    let mut from: Option<NaiveDate> = None;
    let mut to: Option<NaiveDate> = None;
    for arg in args {
        if let Some(value) = arg.strip_prefix("category=") {
            filter.label = Some(value.to_string());
        } else if let Some(value) = arg.strip_prefix("month=") {
            filter.month = Some(value.parse().map_err(|_| {
                CommandError::InvalidArguments(format!(
                    "month must have the form YYYY-MM, got `{value}`"
                ))
            })?);
        } else if let Some(value) = arg.strip_prefix("from=") {
            from = Some(parse_date(value)?);
        } else if let Some(value) = arg.strip_prefix("to=") {
            to = Some(parse_date(value)?);
        } else {
            match *arg {
                "income" => filter.kind = Some(EntryKind::Income),
                "expense" => filter.kind = Some(EntryKind::Expense),
                other => {
                    return Err(CommandError::InvalidArguments(format!(
                        "unknown filter `{other}`"
                    )))
                }
            }
        }
    }
    filter.window = match (from, to) {
        (None, None) => None,
        (start, end) => Some(
            DateWindow::new(start.unwrap_or(NaiveDate::MIN), end.unwrap_or(NaiveDate::MAX))
                .map_err(|err| CommandError::InvalidArguments(err.to_string()))?,
        ),
    };
    Ok(filter)
}

fn parse_category_kind(raw: &str) -> Result<CategoryKind, CommandError> {
    match raw {
        "expense" => Ok(CategoryKind::Expense),
        "income" => Ok(CategoryKind::Income),
        other => Err(CommandError::InvalidArguments(format!(
            "category kind must be `expense` or `income`, got `{other}`"
        ))),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, CommandError> {
    raw.parse().map_err(|_| {
        CommandError::InvalidArguments(format!(
            "dates must have the form YYYY-MM-DD, got `{raw}`"
        ))
    })
}

fn describe(transaction: &Transaction, currency: &str) -> String {
    format!(
        "{} {} {} ({}) [{}]",
        transaction.date,
        transaction.amount,
        currency,
        transaction.label,
        short_id(transaction.id)
    )
}

fn short_id(id: Uuid) -> String {
    id.to_string()[..8].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::context::LoopControl;
    use crate::config::ConfigManager;
    use crate::core::book::BudgetBook;
    use crate::errors::BudgetError;
    use crate::storage::MemoryStore;
    use tempfile::TempDir;

    fn test_context() -> (ShellContext, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let book = BudgetBook::open(Box::new(MemoryStore::new()), "JPY").expect("open");
        let config_manager =
            ConfigManager::with_base_dir(temp.path().to_path_buf()).expect("config manager");
        (ShellContext::for_tests(book, config_manager), temp)
    }

    #[test]
    fn add_balance_remove_flow_round_trips() {
        let (mut context, _guard) = test_context();
        context
            .process_line("add-income 300000 Salary")
            .expect("add income");
        context
            .process_line("add-expense 50000 Food 2026-05-03 weekly groceries")
            .expect("add expense");

        let report = context.book.balance(&TransactionFilter::default());
        assert_eq!(report.balance, 250000.0);

        let id = context
            .book
            .transactions(&TransactionFilter::default())
            .find(|txn| txn.kind == EntryKind::Expense)
            .map(|txn| txn.id)
            .expect("expense stored");
        context
            .process_line(&format!("remove {id}"))
            .expect("remove in script mode needs no confirmation");
        assert_eq!(context.book.transaction_count(), 1);
    }

    #[test]
    fn invalid_amount_is_reported_as_core_error() {
        let (mut context, _guard) = test_context();
        let err = context
            .process_line("add-expense abc")
            .expect_err("bad amount");
        assert!(matches!(
            err,
            CommandError::Core(BudgetError::InvalidAmount(_))
        ));
        assert_eq!(context.book.transaction_count(), 0);
    }

    #[test]
    fn remove_unknown_full_id_surfaces_not_found() {
        let (mut context, _guard) = test_context();
        let err = context
            .process_line(&format!("remove {}", Uuid::new_v4()))
            .expect_err("unknown id");
        assert!(matches!(
            err,
            CommandError::Core(BudgetError::TransactionNotFound(_))
        ));
    }

    #[test]
    fn unknown_command_keeps_the_loop_running() {
        let (mut context, _guard) = test_context();
        let control = context.process_line("blance").expect("suggestion path");
        assert_eq!(control, LoopControl::Continue);
    }

    #[test]
    fn exit_requests_loop_termination() {
        let (mut context, _guard) = test_context();
        let control = context.process_line("exit").expect("exit maps to control");
        assert_eq!(control, LoopControl::Exit);
    }

    #[test]
    fn filter_args_parse_kinds_keys_and_windows() {
        let filter =
            parse_filter_args(&["expense", "category=Food", "month=2026-05"]).expect("parse");
        assert_eq!(filter.kind, Some(EntryKind::Expense));
        assert_eq!(filter.label.as_deref(), Some("Food"));
        assert!(filter.month.is_some());

        let filter = parse_filter_args(&["from=2026-05-01", "to=2026-05-31"]).expect("parse");
        let window = filter.window.expect("window");
        assert!(window.contains(NaiveDate::from_ymd_opt(2026, 5, 31).unwrap()));

        assert!(parse_filter_args(&["bogus"]).is_err());
        assert!(parse_filter_args(&["month=05-2026"]).is_err());
    }
}
