//! caseshop - command-line view of the storefront data layer.
//!
//! Preloads the user, catalog and banners from the configured API and prints
//! what the storefront would show. Useful for checking an API deployment and
//! a session token without opening the web client.

use std::io;
use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use caseshop_core::adapters::{
    BannersSource, CachedBanners, CachedCases, CachedUser, CasesSource, UserSource,
};
use caseshop_core::utils::{format_balance, item_label, resolve_image_with};
use caseshop_core::{ApiClient, BalanceUpdater, Config, PreloadCache};

const USAGE: &str =
    "Usage: caseshop [--json] [--save-config] [--spend <amount>] [--credit <amount>]";

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[derive(Debug, Default)]
struct Options {
    json: bool,
    save_config: bool,
    spend: Option<i64>,
    credit: Option<i64>,
}

fn parse_args(args: &[String]) -> Result<Options> {
    let mut options = Options::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--json" => options.json = true,
            "--save-config" => options.save_config = true,
            "--spend" | "--credit" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("{} needs an amount\n{}", arg, USAGE))?;
                let amount: i64 = value
                    .parse()
                    .map_err(|_| anyhow::anyhow!("Invalid amount: {}", value))?;
                if arg == "--spend" {
                    options.spend = Some(amount);
                } else {
                    options.credit = Some(amount);
                }
            }
            "-h" | "--help" => {
                println!("{}", USAGE);
                std::process::exit(0);
            }
            other => anyhow::bail!("Unknown argument: {}\n{}", other, USAGE),
        }
    }
    Ok(options)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = parse_args(&args)?;

    let config = Config::load()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load config, using defaults");
            Config::default()
        })
        .apply_env();
    info!(api = %config.api_base_url, "caseshop starting");

    if options.save_config {
        config.save()?;
        info!("Config saved");
    }

    let api = ApiClient::new(&config)?;
    let cache = PreloadCache::new(Arc::new(api));
    cache.spawn_preload().await?;

    let balance = BalanceUpdater::new(cache.clone());
    if let Some(amount) = options.spend {
        balance.decrease_balance(amount);
    }
    if let Some(amount) = options.credit {
        balance.increase_balance(amount);
    }

    if options.json {
        println!("{}", serde_json::to_string_pretty(&cache.snapshot())?);
    } else {
        print_summary(&cache, &config);
    }

    for rejected in balance.diagnostics() {
        eprintln!("Balance update rejected: {}", rejected);
    }
    Ok(())
}

fn print_summary(cache: &PreloadCache, config: &Config) {
    let user = CachedUser::new(cache.clone()).view();
    match (&user.user, &user.error) {
        (Some(u), _) => {
            let staff = if u.role.is_staff() { " [staff]" } else { "" };
            println!(
                "{}{} (level {}, {}%) - balance {}",
                u.username,
                staff,
                u.level.number(),
                u.level.progress_percent(),
                format_balance(u.balance)
            );
            println!("Inventory: {} {}", u.inventory_len(), item_label(u.inventory_len() as u64));
        }
        (None, Some(err)) if !user.is_authenticated => println!("Not signed in ({})", err),
        (None, Some(err)) => println!("User unavailable: {}", err),
        (None, None) => println!("User not loaded"),
    }

    let cases = CachedCases::new(cache.clone()).view();
    println!(
        "\nCatalog: {} {} (updated {})",
        cases.cases.len(),
        item_label(cases.cases.len() as u64),
        cache.cases().age_display()
    );
    if let Some(err) = &cases.error {
        println!("  ! {}", err);
    }
    let balance = cache.balance();
    for case in &cases.cases {
        // Anonymous sessions have no balance to compare against
        let marker = match balance {
            Some(balance) if case.is_affordable(balance) => "*",
            _ => " ",
        };
        println!(
            "{} #{:<5} {:<30} {:>10}  {}",
            marker,
            case.id,
            case.name,
            format_balance(case.price),
            resolve_image_with(case.image.as_deref(), &config.default_image_url)
        );
    }

    let banners = CachedBanners::new(cache.clone()).view();
    println!("\nBanners: {}", banners.banners.len());
    if let Some(err) = &banners.error {
        println!("  ! {}", err);
    }
    for banner in &banners.banners {
        println!("  {} -> {}", banner.title, banner.link.as_deref().unwrap_or("-"));
    }
}
