use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use std::env;
use std::fs;
use std::path::Path;
use tracing_subscriber::EnvFilter;

use agent_portal::portfolio::reconcile_accounts;
use agent_portal::{
    build_customer_rows, compute_usd_preview_from_minor, decimal_to_minor, format_exchange_rate_minor,
    format_fee_percent_from_minor, format_minor_str, Account, Customer, ListResponse, PortalConfig,
};

fn main() -> Result<()> {
    init_logging();

    let args: Vec<String> = env::args().skip(1).collect();
    let command = args.first().map(String::as_str).unwrap_or("help");
    let rest = &args[args.len().min(1)..];

    match command {
        "to-minor" => run_to_minor(rest)?,
        "format" => run_format(rest)?,
        "rate" => run_rate(rest)?,
        "preview" => run_preview(rest)?,
        "reconcile" => run_reconcile(rest)?,
        "config" => run_config()?,
        _ => print_usage(),
    }

    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("agent_portal=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_usage() {
    println!("agent-portal {}", agent_portal::VERSION);
    println!();
    println!("USAGE:");
    println!("  agent-portal to-minor <amount>                    12.34 → 1234");
    println!("  agent-portal format <minor> <ccy>                 1234 EUR → 12.34 EUR");
    println!("  agent-portal rate <rateMinor|null> [feeMinor|null]");
    println!("  agent-portal preview <amount> <rateMinor> <feeMinor>");
    println!("  agent-portal reconcile <customers|accounts> <file.json>");
    println!("  agent-portal config");
}

fn arg<'a>(rest: &'a [String], index: usize, name: &str) -> Result<&'a str> {
    rest.get(index)
        .map(String::as_str)
        .with_context(|| format!("missing argument <{}>", name))
}

fn parse_optional(raw: Option<&str>) -> Result<Option<i64>> {
    match raw {
        None | Some("null") | Some("-") => Ok(None),
        Some(v) => Ok(Some(v.parse().with_context(|| format!("not an integer: {}", v))?)),
    }
}

fn run_to_minor(rest: &[String]) -> Result<()> {
    let amount = arg(rest, 0, "amount")?;
    println!("{}", decimal_to_minor(amount)?);
    Ok(())
}

fn run_format(rest: &[String]) -> Result<()> {
    let minor = arg(rest, 0, "minor")?;
    let ccy = arg(rest, 1, "ccy")?;
    println!("{}", format_minor_str(minor, ccy)?);
    Ok(())
}

fn run_rate(rest: &[String]) -> Result<()> {
    let rate = parse_optional(rest.first().map(String::as_str))?;
    let fee = parse_optional(rest.get(1).map(String::as_str))?;

    println!("💱 Rate: {}", format_exchange_rate_minor(rate).unwrap_or_else(|| "-".to_string()));
    println!("💸 Fee:  {}", format_fee_percent_from_minor(fee).unwrap_or_else(|| "-".to_string()));
    Ok(())
}

fn run_preview(rest: &[String]) -> Result<()> {
    let amount = arg(rest, 0, "amount")?;
    let rate = parse_optional(Some(arg(rest, 1, "rateMinor")?))?;
    let fee = parse_optional(Some(arg(rest, 2, "feeMinor")?))?;

    let (Some(rate), Some(fee)) = (rate, fee) else {
        bail!("no exchange rate or fee available, preview disabled");
    };

    let minor = decimal_to_minor(amount)?;
    let usd = compute_usd_preview_from_minor(&minor, rate, fee)?;
    println!("≈ {} USD (estimate only)", usd);
    Ok(())
}

/// Accepts either `{ "items": [...] }` or a bare array
fn load_items<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
    let items = if value.is_array() {
        serde_json::from_value(value)?
    } else {
        serde_json::from_value::<ListResponse<T>>(value)?.items
    };
    Ok(items)
}

fn run_reconcile(rest: &[String]) -> Result<()> {
    let kind = arg(rest, 0, "customers|accounts")?;
    let path = Path::new(arg(rest, 1, "file.json")?);

    match kind {
        "customers" => {
            let customers: Vec<Customer> = load_items(path)?;
            let rows = build_customer_rows(&customers, &[]);
            println!("👤 {} customers → {} current rows", customers.len(), rows.len());
            for row in rows {
                let c = row.customer;
                println!(
                    "  {:<32} {:<32} {:<12} {:?}",
                    c.display_name(),
                    c.customer_email.as_deref().unwrap_or("-"),
                    c.status.as_deref().unwrap_or("UNKNOWN"),
                    row.next_action()
                );
            }
        }
        "accounts" => {
            let accounts: Vec<Account> = load_items(path)?;
            let current = reconcile_accounts(&accounts);
            println!("💳 {} accounts → {} current rows", accounts.len(), current.len());
            for acc in current {
                println!(
                    "  {:<40} {:<12} {}",
                    acc.label(),
                    acc.status.as_deref().unwrap_or("UNKNOWN"),
                    acc.balance_display()
                );
            }
        }
        other => bail!("unknown entity kind: {} (expected customers or accounts)", other),
    }

    Ok(())
}

fn run_config() -> Result<()> {
    let config = PortalConfig::from_env()?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
