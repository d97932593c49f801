use anyhow::{Context, Result};

use spendsort::categorize::{GroupedTransactions, Summary};
use spendsort::config::Config;
use spendsort::import::dedup;
use spendsort::models::{Transaction, UNGROUPED};
use spendsort::store::{Store, TableCodec};
use spendsort::validate::check_consistency;

pub(crate) fn as_cli(args: &[String], config: &Config) -> Result<()> {
    match args[1].as_str() {
        "validate" => cli_validate(&args[2..], config),
        "reprocess" => cli_reprocess(&args[2..], config),
        "summary" | "s" => cli_summary(&args[2..], config),
        "categories" => cli_categories(&args[2..], config),
        "merge" => cli_merge(&args[2..], config),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("spendsort {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

pub(crate) fn print_usage() {
    println!("spendsort: sort bank transactions into spending categories");
    println!();
    println!("Usage: spendsort <command> [store]");
    println!();
    println!("Commands:");
    println!("  validate [store]              Check stored categories against the current rules");
    println!("  reprocess [store]             Re-run the rules over {UNGROUPED} and save");
    println!("  summary [store]               Print earnings, expenses and net");
    println!("  categories [store]            List categories with counts and totals");
    println!("  merge <other-store> [store]   Classify another store's transactions into this one");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
    println!();
    println!("The store defaults to the platform data directory; override it with");
    println!("SPENDSORT_STORE. SPENDSORT_DELIMITER and SPENDSORT_UNMATCHED (file|return)");
    println!("are also read. Log verbosity follows RUST_LOG.");
}

fn open_store(args: &[String], config: &Config) -> Store {
    let path = args
        .first()
        .filter(|a| !a.starts_with('-'))
        .map(|a| shellexpand(a).into())
        .unwrap_or_else(|| config.store_path.clone());
    Store::new(path, TableCodec::new(config.delimiter))
}

fn load(store: &Store, config: &Config) -> Result<GroupedTransactions> {
    let template = GroupedTransactions::from_registry(config.unmatched)
        .context("Failed to build the category registry")?;
    store.load(template).context("Failed to load store")
}

fn cli_validate(args: &[String], config: &Config) -> Result<()> {
    let store = open_store(args, config);
    let grouped = load(&store, config)?;

    let report = check_consistency(&grouped)
        .with_context(|| format!("Validation failed for {}", store.path().display()))?;
    println!(
        "OK: {} classified transactions match the current rules ({} in {UNGROUPED})",
        report.checked, report.ungrouped
    );
    Ok(())
}

fn cli_reprocess(args: &[String], config: &Config) -> Result<()> {
    let store = open_store(args, config);
    let mut grouped = load(&store, config)?;

    let moved = grouped
        .process_ungrouped()
        .context("Failed to reprocess ungrouped transactions")?;
    if moved == 0 {
        println!("Nothing to move; {} transactions remain in {UNGROUPED}", grouped.ungrouped().len());
        return Ok(());
    }

    store.save(&grouped).context("Failed to save store")?;
    println!(
        "Moved {moved} transactions out of {UNGROUPED} ({} remain)",
        grouped.ungrouped().len()
    );
    Ok(())
}

fn cli_summary(args: &[String], config: &Config) -> Result<()> {
    let store = open_store(args, config);
    let grouped = load(&store, config)?;
    let summary = Summary::of(&grouped);

    println!("spendsort: {}", store.path().display());
    println!("{}", "─".repeat(40));
    println!("  Earnings:   {:.2}", summary.earnings);
    println!("  Expenses:   {:.2}", summary.expenses.abs());
    println!("  Net:        {:.2}", summary.net());
    println!("  Total Txns: {}", grouped.total_transactions());

    if !summary.spending_categories.is_empty() {
        println!();
        println!("Spending by Category:");
        for name in &summary.spending_categories {
            let category = grouped.get_category(name)?;
            println!("  {name:<24} {:.2}", category.total().abs());
        }
    }
    if !summary.excluded_categories.is_empty() {
        println!();
        println!("Not counted: {}", summary.excluded_categories.join(", "));
    }
    Ok(())
}

fn cli_categories(args: &[String], config: &Config) -> Result<()> {
    let store = open_store(args, config);
    let grouped = load(&store, config)?;

    println!("{:<20} {:<9} {:>6} {:>12}", "Category", "Flow", "Count", "Total");
    println!("{}", "─".repeat(50));
    for category in grouped.get_categories() {
        println!(
            "{:<20} {:<9} {:>6} {:>12.2}",
            category.name(),
            category.flow_direction().as_str(),
            category.len(),
            category.total(),
        );
    }
    Ok(())
}

fn cli_merge(args: &[String], config: &Config) -> Result<()> {
    let Some(other_path) = args.first() else {
        anyhow::bail!("Usage: spendsort merge <other-store> [store]");
    };

    let other = Store::new(shellexpand(other_path), TableCodec::new(config.delimiter));
    if !other.path().exists() {
        anyhow::bail!("File not found: {other_path}");
    }
    let incoming = load(&other, config)?;
    let transactions: Vec<Transaction> = incoming
        .get_categories()
        .into_iter()
        .flat_map(|c| c.transactions().iter().cloned())
        .collect();
    let deduped = dedup(transactions);

    let store = open_store(&args[1..], config);
    let mut grouped = load(&store, config)?;
    let added = grouped
        .add_transactions(deduped.kept)
        .context("Failed to classify merged transactions")?;

    if added.filed > 0 {
        store.save(&grouped).context("Failed to save store")?;
    }
    println!(
        "Merged {} new transactions ({} duplicates skipped)",
        added.filed,
        added.duplicates + deduped.dropped.len()
    );
    if !added.unmatched.is_empty() {
        println!(
            "{} transactions matched no category and were not stored:",
            added.unmatched.len()
        );
        for tx in &added.unmatched {
            println!("  {tx}");
        }
    }
    Ok(())
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}
