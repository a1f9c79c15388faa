mod cli;
mod config;
mod dashboard;
mod domain;
mod search;
mod store;
mod suggest;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use clap::Parser;
use rust_decimal::Decimal;
use std::path::Path;
use uuid::Uuid;

use crate::cli::{
    AccountCmd, AnimalCmd, AssetCmd, CategoryCmd, Cli, Command, FarmCmd, InventoryCmd,
    LiabilityCmd, LoginArgs, SyncCmd, TxCmd,
};
use crate::config::{AppConfig, AppPaths, app_paths, load_or_init_config, now_utc, write_config};
use crate::dashboard::{
    DebtSummary, Urgency, days_until, debt_summary, gross_margin, monthly_series, summarize,
    top_expense_categories,
};
use crate::domain::{
    Account, AccountKind, AnimalLog, AnimalSpecies, Asset, CATEGORY_COLORS, Category, FarmState,
    InventoryItem, Liability, Transaction, TxKind, accounts_by_id, categories_by_id,
    parse_account_kind, parse_tx_kind, species_by_id,
};
use crate::search::search_all;
use crate::store::CloudStore;
use crate::suggest::{SuggestError, suggest_category};

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let paths = app_paths(cli.home.clone())?;
    let (mut cfg, cfg_path) = load_or_init_config(&paths)?;

    match cli.command {
        Command::Login(args) => handle_login(args, &mut cfg, &cfg_path),
        Command::Sync(args) => handle_sync(args.cmd, &paths, &mut cfg, &cfg_path),
        cmd => {
            let mut state = store::load_state(&paths)?;

            match cmd {
                Command::Farm(args) => handle_farm(args.cmd, &paths, &mut state),
                Command::Tx(args) => handle_tx(args.cmd, &paths, &mut state),
                Command::Category(args) => handle_category(args.cmd, &paths, &mut state, &cfg),
                Command::Account(args) => handle_account(args.cmd, &paths, &mut state),
                Command::Liability(args) => handle_liability(args.cmd, &paths, &mut state),
                Command::Animal(args) => handle_animal(args.cmd, &paths, &mut state),
                Command::Inventory(args) => handle_inventory(args.cmd, &paths, &mut state),
                Command::Asset(args) => handle_asset(args.cmd, &paths, &mut state),
                Command::Dashboard(args) => {
                    let now = parse_date_or_today(args.now.as_deref())?;
                    print_dashboard(&state, now);
                    Ok(())
                }
                Command::Upcoming(args) => {
                    let now = parse_date_or_today(args.now.as_deref())?;
                    let debts = debt_summary(
                        &state.liabilities,
                        &state.accounts,
                        &state.transactions,
                        now,
                    );
                    print_alerts(&debts, now);
                    println!("total-due-soon\t{}", debts.total_due_soon);
                    Ok(())
                }
                Command::Search(args) => {
                    print_search(&state, &args.query);
                    Ok(())
                }
                Command::Login(_) | Command::Sync(_) => unreachable!(),
            }
        }
    }
}

fn handle_login(args: LoginArgs, cfg: &mut AppConfig, cfg_path: &Path) -> Result<()> {
    let email = args.email.trim().to_string();
    if email.is_empty() {
        return Err(anyhow!("Login email must not be empty"));
    }

    cfg.identity = Some(email.clone());
    if let Some(url) = args.suggest_url {
        cfg.suggest_url = Some(url);
    }
    write_config(cfg_path, cfg)?;
    println!("Logged in as {email}.");
    Ok(())
}

fn handle_farm(cmd: FarmCmd, paths: &AppPaths, state: &mut FarmState) -> Result<()> {
    match cmd {
        FarmCmd::Rename { name } => {
            state.farm_name = name.clone();
            store::save_state(paths, state)?;
            println!("Renamed farm to '{name}'.");
            Ok(())
        }
    }
}

fn handle_tx(cmd: TxCmd, paths: &AppPaths, state: &mut FarmState) -> Result<()> {
    match cmd {
        TxCmd::Add {
            kind,
            amount,
            category,
            account,
            desc,
            date,
        } => {
            let kind = parse_tx_kind(&kind)
                .ok_or_else(|| anyhow!("Invalid transaction type '{kind}'. Expected: income | expense"))?;
            let amount = parse_nonnegative(amount, "amount")?;
            let date = parse_date_or_today(date.as_deref())?;

            let category_id = state
                .category_by_name(&category)
                .map(|c| c.id)
                .ok_or_else(|| {
                    anyhow!(
                        "No such category: '{category}'. Create it with: farmbook category add <name> --type <income|expense>"
                    )
                })?;
            let account_id = state.account_by_name(&account).map(|a| a.id).ok_or_else(|| {
                anyhow!(
                    "No such account: '{account}'. Create it with: farmbook account add <name> --type <standard|credit>"
                )
            })?;

            let tx = Transaction {
                id: Uuid::new_v4(),
                date,
                amount,
                kind,
                category_id,
                account_id,
                description: desc.unwrap_or_default(),
            };
            let id = tx.id;
            state.transactions.push(tx);
            store::save_state(paths, state)?;
            println!("Recorded transaction {id}.");
            Ok(())
        }
        TxCmd::List => {
            if state.transactions.is_empty() {
                println!("(no transactions)");
                return Ok(());
            }

            let categories = categories_by_id(&state.categories);
            let accounts = accounts_by_id(&state.accounts);
            let rows: Vec<Vec<String>> = state
                .transactions
                .iter()
                .map(|t| {
                    vec![
                        t.date.to_string(),
                        tx_kind_str(t.kind).to_string(),
                        t.amount.to_string(),
                        categories
                            .get(&t.category_id)
                            .map(|c| c.name.clone())
                            .unwrap_or_else(|| "Other".to_string()),
                        accounts
                            .get(&t.account_id)
                            .map(|a| a.name.clone())
                            .unwrap_or_else(|| "?".to_string()),
                        t.description.clone(),
                    ]
                })
                .collect();
            print_table(
                &["date", "type", "amount", "category", "account", "description"],
                &rows,
            );
            Ok(())
        }
    }
}

fn handle_category(
    cmd: CategoryCmd,
    paths: &AppPaths,
    state: &mut FarmState,
    cfg: &AppConfig,
) -> Result<()> {
    match cmd {
        CategoryCmd::Add { name, kind, color } => {
            let kind = parse_tx_kind(&kind)
                .ok_or_else(|| anyhow!("Invalid category type '{kind}'. Expected: income | expense"))?;
            if state.category_by_name(&name).is_some() {
                return Err(anyhow!("Category '{name}' already exists"));
            }

            let color = color.unwrap_or_else(|| {
                CATEGORY_COLORS[state.categories.len() % CATEGORY_COLORS.len()].to_string()
            });
            state.categories.push(Category {
                id: Uuid::new_v4(),
                name: name.clone(),
                kind,
                color,
            });
            store::save_state(paths, state)?;
            println!("Added category '{name}'.");
            Ok(())
        }
        CategoryCmd::List => {
            if state.categories.is_empty() {
                println!("(no categories)");
                return Ok(());
            }

            let rows: Vec<Vec<String>> = state
                .categories
                .iter()
                .map(|c| {
                    vec![
                        c.name.clone(),
                        tx_kind_str(c.kind).to_string(),
                        c.color.clone(),
                    ]
                })
                .collect();
            print_table(&["name", "type", "color"], &rows);
            Ok(())
        }
        CategoryCmd::Rm { name } => {
            let Some(pos) = state
                .categories
                .iter()
                .position(|c| c.name.eq_ignore_ascii_case(&name))
            else {
                return Err(anyhow!("No such category: '{name}'"));
            };

            let removed = state.categories.remove(pos);
            store::save_state(paths, state)?;
            println!(
                "Removed category '{}'. Its transactions now report under 'Other'.",
                removed.name
            );
            Ok(())
        }
        CategoryCmd::Suggest { description } => {
            let names: Vec<String> = state.categories.iter().map(|c| c.name.clone()).collect();
            if names.is_empty() {
                println!("(no categories to suggest from)");
                return Ok(());
            }

            match suggest_category(cfg.suggest_url.as_deref(), &description, &names) {
                Ok(raw) => match state.category_by_name(&raw) {
                    Some(c) => println!("Suggested category: {}", c.name),
                    None => println!("(no suggestion: service returned unknown category '{raw}')"),
                },
                Err(SuggestError::NotConfigured) => {
                    return Err(SuggestError::NotConfigured.into());
                }
                Err(err) => println!("(no suggestion: {err})"),
            }
            Ok(())
        }
    }
}

fn handle_account(cmd: AccountCmd, paths: &AppPaths, state: &mut FarmState) -> Result<()> {
    match cmd {
        AccountCmd::Add {
            name,
            kind,
            balance,
            payment_day,
        } => {
            let kind = parse_account_kind(&kind)
                .ok_or_else(|| anyhow!("Invalid account type '{kind}'. Expected: standard | credit"))?;
            if state.account_by_name(&name).is_some() {
                return Err(anyhow!("Account '{name}' already exists"));
            }

            if let Some(day) = payment_day {
                if kind != AccountKind::Credit {
                    return Err(anyhow!("--payment-day only applies to credit accounts"));
                }
                if !(1..=31).contains(&day) {
                    return Err(anyhow!("Invalid --payment-day. Expected 1-31"));
                }
            }

            let initial_balance = match balance {
                Some(raw) => parse_decimal(raw, "balance")?,
                None => Decimal::ZERO,
            };
            state.accounts.push(Account {
                id: Uuid::new_v4(),
                name: name.clone(),
                kind,
                initial_balance,
                payment_day,
            });
            store::save_state(paths, state)?;
            println!("Added account '{name}'.");
            Ok(())
        }
        AccountCmd::List => {
            if state.accounts.is_empty() {
                println!("(no accounts)");
                return Ok(());
            }

            let rows: Vec<Vec<String>> = state
                .accounts
                .iter()
                .map(|a| {
                    vec![
                        a.name.clone(),
                        account_kind_str(a.kind).to_string(),
                        a.initial_balance.to_string(),
                        a.payment_day
                            .map(|d| d.to_string())
                            .unwrap_or_else(|| "-".to_string()),
                    ]
                })
                .collect();
            print_table(&["name", "type", "opening", "payment-day"], &rows);
            Ok(())
        }
    }
}

fn handle_liability(cmd: LiabilityCmd, paths: &AppPaths, state: &mut FarmState) -> Result<()> {
    match cmd {
        LiabilityCmd::Add {
            name,
            balance,
            due,
            installment,
            category,
            notes,
        } => {
            let current_balance = parse_nonnegative(balance, "balance")?;
            let due_date = match due.as_deref() {
                Some(raw) => Some(parse_date(raw, "--due")?),
                None => None,
            };
            let installment_amount = match installment {
                Some(raw) => Some(parse_nonnegative(raw, "installment")?),
                None => None,
            };

            state.liabilities.push(Liability {
                id: Uuid::new_v4(),
                name: name.clone(),
                current_balance,
                due_date,
                installment_amount,
                category,
                notes,
            });
            store::save_state(paths, state)?;
            println!("Added liability '{name}'.");
            Ok(())
        }
        LiabilityCmd::List => {
            if state.liabilities.is_empty() {
                println!("(no liabilities)");
                return Ok(());
            }

            let rows: Vec<Vec<String>> = state
                .liabilities
                .iter()
                .map(|l| {
                    vec![
                        l.name.clone(),
                        l.current_balance.to_string(),
                        l.due_date
                            .map(|d| d.to_string())
                            .unwrap_or_else(|| "-".to_string()),
                        l.installment_amount
                            .map(|d| d.to_string())
                            .unwrap_or_else(|| "-".to_string()),
                    ]
                })
                .collect();
            print_table(&["name", "balance", "due", "installment"], &rows);
            Ok(())
        }
    }
}

fn handle_animal(cmd: AnimalCmd, paths: &AppPaths, state: &mut FarmState) -> Result<()> {
    match cmd {
        AnimalCmd::Add { name, breed, tag } => {
            if state.species_by_name(&name).is_some() {
                return Err(anyhow!("Animal species '{name}' already exists"));
            }

            state.animal_species.push(AnimalSpecies {
                id: Uuid::new_v4(),
                name: name.clone(),
                breed,
                tag,
            });
            store::save_state(paths, state)?;
            println!("Added animal species '{name}'.");
            Ok(())
        }
        AnimalCmd::Log {
            species,
            kind,
            note,
            date,
        } => {
            let species_id = state.species_by_name(&species).map(|s| s.id).ok_or_else(|| {
                anyhow!("No such animal species: '{species}'. Create it with: farmbook animal add <name>")
            })?;
            let date = parse_date_or_today(date.as_deref())?;

            state.animal_logs.push(AnimalLog {
                id: Uuid::new_v4(),
                species_id,
                kind: kind.clone(),
                note,
                date,
            });
            store::save_state(paths, state)?;
            println!("Logged '{kind}' for {species}.");
            Ok(())
        }
        AnimalCmd::List => {
            if state.animal_species.is_empty() {
                println!("(no animals)");
                return Ok(());
            }

            let rows: Vec<Vec<String>> = state
                .animal_species
                .iter()
                .map(|s| {
                    let logs = state
                        .animal_logs
                        .iter()
                        .filter(|l| l.species_id == s.id)
                        .count();
                    vec![
                        s.name.clone(),
                        s.breed.clone().unwrap_or_else(|| "-".to_string()),
                        s.tag.clone().unwrap_or_else(|| "-".to_string()),
                        logs.to_string(),
                    ]
                })
                .collect();
            print_table(&["name", "breed", "tag", "logs"], &rows);
            Ok(())
        }
    }
}

fn handle_inventory(cmd: InventoryCmd, paths: &AppPaths, state: &mut FarmState) -> Result<()> {
    match cmd {
        InventoryCmd::Add {
            name,
            quantity,
            sku,
            desc,
        } => {
            let quantity = parse_nonnegative(quantity, "quantity")?;
            state.inventory_items.push(InventoryItem {
                id: Uuid::new_v4(),
                name: name.clone(),
                sku,
                description: desc,
                quantity,
            });
            store::save_state(paths, state)?;
            println!("Added inventory item '{name}'.");
            Ok(())
        }
        InventoryCmd::List => {
            if state.inventory_items.is_empty() {
                println!("(no inventory)");
                return Ok(());
            }

            let rows: Vec<Vec<String>> = state
                .inventory_items
                .iter()
                .map(|i| {
                    vec![
                        i.name.clone(),
                        i.sku.clone().unwrap_or_else(|| "-".to_string()),
                        i.quantity.to_string(),
                        i.description.clone().unwrap_or_default(),
                    ]
                })
                .collect();
            print_table(&["name", "sku", "quantity", "description"], &rows);
            Ok(())
        }
    }
}

fn handle_asset(cmd: AssetCmd, paths: &AppPaths, state: &mut FarmState) -> Result<()> {
    match cmd {
        AssetCmd::Add {
            name,
            value,
            category,
            desc,
            purchased,
        } => {
            let value = parse_nonnegative(value, "value")?;
            let purchase_date = match purchased.as_deref() {
                Some(raw) => Some(parse_date(raw, "--purchased")?),
                None => None,
            };

            state.assets.push(Asset {
                id: Uuid::new_v4(),
                name: name.clone(),
                category,
                description: desc,
                purchase_date,
                value,
            });
            store::save_state(paths, state)?;
            println!("Added asset '{name}'.");
            Ok(())
        }
        AssetCmd::List => {
            if state.assets.is_empty() {
                println!("(no assets)");
                return Ok(());
            }

            let rows: Vec<Vec<String>> = state
                .assets
                .iter()
                .map(|a| {
                    vec![
                        a.name.clone(),
                        a.category.clone().unwrap_or_else(|| "-".to_string()),
                        a.value.to_string(),
                        a.purchase_date
                            .map(|d| d.to_string())
                            .unwrap_or_else(|| "-".to_string()),
                    ]
                })
                .collect();
            print_table(&["name", "category", "value", "purchased"], &rows);
            Ok(())
        }
    }
}

fn handle_sync(
    cmd: SyncCmd,
    paths: &AppPaths,
    cfg: &mut AppConfig,
    cfg_path: &Path,
) -> Result<()> {
    match cmd {
        SyncCmd::Status => {
            match &cfg.identity {
                Some(email) => println!("Identity: {email}"),
                None => println!("Identity: (not logged in)"),
            }
            println!("Device: {}", cfg.device_id);
            match cfg.last_sync_at {
                Some(t) => println!("Last sync: {}", t.to_rfc3339()),
                None => println!("Last sync: (never)"),
            }
            Ok(())
        }
        SyncCmd::Push => {
            let email = require_identity(cfg)?;
            let state = store::load_state(paths)?;
            let (cloud, db_path) = CloudStore::open(paths)?;
            cloud.push_state(&email, &state, now_utc())?;

            cfg.last_sync_at = Some(now_utc());
            write_config(cfg_path, cfg)?;
            println!(
                "Pushed farm data for {} to {}",
                store::normalize_identity(&email),
                db_path.display()
            );
            Ok(())
        }
        SyncCmd::Pull => {
            let email = require_identity(cfg)?;
            let (cloud, _) = CloudStore::open(paths)?;
            match cloud.pull_state(&email)? {
                Some(state) => {
                    store::save_state(paths, &state)?;
                    cfg.last_sync_at = Some(now_utc());
                    write_config(cfg_path, cfg)?;
                    println!("Pulled farm data for {}.", store::normalize_identity(&email));
                }
                None => {
                    println!("(no cloud data for {})", store::normalize_identity(&email));
                }
            }
            Ok(())
        }
    }
}

fn require_identity(cfg: &AppConfig) -> Result<String> {
    cfg.identity
        .clone()
        .ok_or_else(|| anyhow!("Not logged in. Run: farmbook login <email>"))
}

fn print_dashboard(state: &FarmState, now: NaiveDate) {
    let accounts = accounts_by_id(&state.accounts);
    let categories = categories_by_id(&state.categories);

    let summary = summarize(&state.transactions, &accounts);
    let margin = gross_margin(summary.income, summary.expense);
    let top = top_expense_categories(&state.transactions, &categories, 3);
    let series = monthly_series(&state.transactions, &accounts);
    let debts = debt_summary(&state.liabilities, &state.accounts, &state.transactions, now);

    println!("farm\t{}", state.farm_name);
    println!();
    println!("revenue\t{}", summary.income);
    println!("expenses\t{}", summary.expense);
    println!("net\t{}", summary.income - summary.expense);
    println!("total-debt\t{}", debts.total_outstanding);
    println!("due-soon-30d\t{}", debts.total_due_soon);
    println!("gross-margin\t{}%\t{}", margin.round_dp(1), margin_health(margin));

    if !top.is_empty() {
        println!();
        println!("(top expense segments)");
        for entry in &top {
            println!("{}\t{}", entry.name, entry.value);
        }
    }

    if !series.is_empty() {
        println!();
        println!("(monthly income vs expenses)");
        println!("month\tincome\texpense");
        for bucket in &series {
            println!("{}\t{}\t{}", bucket.label, bucket.income, bucket.expense);
        }
    }

    println!();
    print_alerts(&debts, now);
}

fn print_alerts(debts: &DebtSummary, now: NaiveDate) {
    println!("(payment alerts)");
    if debts.upcoming.is_empty() {
        println!("(no upcoming payments)");
        return;
    }

    println!("name\tamount\tdue\tdays\tstatus");
    for item in &debts.upcoming {
        let days = days_until(item.due, now);
        println!(
            "{}\t{}\t{}\t{}d\t{}",
            item.name,
            item.amount,
            item.due,
            days,
            urgency_str(Urgency::classify(days))
        );
    }
}

fn margin_health(margin: Decimal) -> &'static str {
    if margin > Decimal::from(20) {
        "healthy"
    } else if margin > Decimal::ZERO {
        "thin"
    } else {
        "loss"
    }
}

fn urgency_str(urgency: Urgency) -> &'static str {
    match urgency {
        Urgency::Overdue => "overdue",
        Urgency::DueToday => "today",
        Urgency::DueSoon => "soon",
        Urgency::Scheduled => "scheduled",
    }
}

fn print_search(state: &FarmState, query: &str) {
    let Some(results) = search_all(state, query) else {
        println!("(search inactive: empty query)");
        return;
    };
    if results.is_empty() {
        println!("(no matches for '{}')", query.trim());
        return;
    }

    let categories = categories_by_id(&state.categories);
    let species = species_by_id(&state.animal_species);
    let mut first = true;
    let mut section = |title: &str| {
        if !first {
            println!();
        }
        first = false;
        println!("({title})");
    };

    if !results.transactions.is_empty() {
        section("ledger items");
        for t in &results.transactions {
            let category = categories
                .get(&t.category_id)
                .map(|c| c.name.as_str())
                .unwrap_or("Other");
            println!(
                "{}\t{}\t{}\t{}\t{}",
                t.date,
                tx_kind_str(t.kind),
                t.amount,
                category,
                t.description
            );
        }
    }

    if !results.animals.is_empty() {
        section("animals");
        for s in &results.animals {
            println!(
                "{}\t{}\t{}",
                s.name,
                s.breed.as_deref().unwrap_or("-"),
                s.tag.as_deref().unwrap_or("-")
            );
        }
    }

    if !results.animal_logs.is_empty() {
        section("animal logs");
        for l in &results.animal_logs {
            let name = species
                .get(&l.species_id)
                .map(|s| s.name.as_str())
                .unwrap_or("?");
            println!(
                "{}\t{}\t{}\t{}",
                l.date,
                name,
                l.kind,
                l.note.as_deref().unwrap_or("")
            );
        }
    }

    if !results.inventory.is_empty() {
        section("inventory");
        for i in &results.inventory {
            println!(
                "{}\t{}\t{}",
                i.name,
                i.sku.as_deref().unwrap_or("-"),
                i.quantity
            );
        }
    }

    if !results.assets.is_empty() {
        section("assets");
        for a in &results.assets {
            println!(
                "{}\t{}\t{}",
                a.name,
                a.category.as_deref().unwrap_or("-"),
                a.value
            );
        }
    }

    if !results.liabilities.is_empty() {
        section("liabilities");
        for l in &results.liabilities {
            println!(
                "{}\t{}\t{}",
                l.name,
                l.current_balance,
                l.due_date
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".to_string())
            );
        }
    }
}

fn tx_kind_str(kind: TxKind) -> &'static str {
    match kind {
        TxKind::Income => "income",
        TxKind::Expense => "expense",
    }
}

fn account_kind_str(kind: AccountKind) -> &'static str {
    match kind {
        AccountKind::Standard => "standard",
        AccountKind::Credit => "credit",
    }
}

fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    if headers.is_empty() {
        println!("(no columns)");
        return;
    }

    let cols = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();

    for row in rows {
        for (i, cell) in row.iter().take(cols).enumerate() {
            widths[i] = widths[i].max(cell.len());
        }
    }

    fn print_row(cells: &[String], widths: &[usize]) {
        print!("|");
        for (i, w) in widths.iter().enumerate() {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            print!(" {:width$} |", cell, width = *w);
        }
        println!();
    }

    fn print_sep(widths: &[usize]) {
        print!("|");
        for w in widths {
            print!("{}|", "-".repeat(w + 2));
        }
        println!();
    }

    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    print_row(&header_cells, &widths);
    print_sep(&widths);
    for row in rows {
        print_row(row, &widths);
    }
}

fn parse_decimal(raw: String, field: &'static str) -> Result<Decimal> {
    raw.parse::<Decimal>()
        .with_context(|| format!("Invalid decimal for {field}: {raw}"))
}

fn parse_nonnegative(raw: String, field: &'static str) -> Result<Decimal> {
    let value = parse_decimal(raw, field)?;
    if value < Decimal::ZERO {
        return Err(anyhow!("{field} must be >= 0"));
    }
    Ok(value)
}

fn parse_date(raw: &str, field: &'static str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("Invalid {field}. Expected YYYY-MM-DD: {raw}"))
}

fn parse_date_or_today(raw: Option<&str>) -> Result<NaiveDate> {
    match raw {
        Some(s) => parse_date(s, "date"),
        None => Ok(now_utc().date_naive()),
    }
}
