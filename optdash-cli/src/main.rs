//! optdash CLI: scanner, deep dive, suggestion and option-chain commands.
//!
//! Commands:
//! - `scan`: price, ATM IV and volume ratio for a watchlist
//! - `analyze`: technical status, strategy suggestion and Greeks for one ticker
//! - `suggest`: evaluate the decision table for given IV / RSI / MACD readings
//! - `chain`: calls and puts with Greeks for one expiry
//! - `config`: print the effective configuration as TOML

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use optdash_core::analysis::{suggest_with, MacdStatus, RsiStatus, Suggestion, TechnicalReport};
use optdash_core::config::DashboardConfig;
use optdash_core::data::{
    CircuitBreaker, DashboardProvider, StderrProgress, SyntheticProvider, YahooProvider,
};
use optdash_core::domain::{parse_ticker_list, OptionQuote, OptionSide};
use optdash_core::present;
use optdash_core::scanner::ScanRow;
use optdash_core::{ChainView, Dashboard, DeepDive, Section};

#[derive(Parser)]
#[command(name = "optdash", about = "optdash: options scanner and strategy suggestions")]
struct Cli {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use deterministic synthetic data instead of Yahoo Finance.
    #[arg(long, global = true, default_value_t = false)]
    offline: bool,

    /// Emit JSON instead of tables.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan tickers (space or comma separated). Defaults to the configured watchlist.
    Scan { tickers: Vec<String> },
    /// Deep dive: technicals, suggestion and option chain for one ticker.
    Analyze {
        /// Defaults to the configured deep-dive ticker.
        ticker: Option<String>,

        /// Expiry for the chain table (YYYY-MM-DD). Defaults to the nearest.
        #[arg(long)]
        expiry: Option<String>,
    },
    /// Evaluate the decision table directly.
    Suggest {
        /// ATM implied volatility in percent.
        #[arg(long, allow_hyphen_values = true)]
        iv: f64,

        /// RSI(14) reading.
        #[arg(long, allow_hyphen_values = true)]
        rsi: f64,

        /// MACD histogram value.
        #[arg(long, allow_hyphen_values = true)]
        macd: f64,
    },
    /// Option chain with Greeks for one expiry.
    Chain {
        ticker: String,

        /// Expiry (YYYY-MM-DD). Defaults to the nearest.
        #[arg(long)]
        expiry: Option<String>,

        /// call (CE), put (PE), or both when omitted.
        #[arg(long, value_parser = parse_side)]
        side: Option<OptionSide>,
    },
    /// Print the effective configuration as TOML.
    Config,
}

fn parse_side(s: &str) -> Result<OptionSide, String> {
    OptionSide::parse(s).ok_or_else(|| format!("unknown side '{s}'. Valid: call, put, ce, pe"))
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("invalid date '{s}'"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => DashboardConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DashboardConfig::default(),
    };

    match cli.command {
        Commands::Config => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
        Commands::Suggest { iv, rsi, macd } => run_suggest(&config, iv, rsi, macd, cli.json),
        Commands::Scan { tickers } => {
            let mut dashboard = build_dashboard(config, cli.offline)?;
            run_scan(&mut dashboard, &tickers, cli.json)
        }
        Commands::Analyze { ticker, expiry } => {
            let expiry = expiry.as_deref().map(parse_date).transpose()?;
            let mut dashboard = build_dashboard(config, cli.offline)?;
            run_analyze(&mut dashboard, ticker, expiry, cli.json)
        }
        Commands::Chain {
            ticker,
            expiry,
            side,
        } => {
            let expiry = expiry.as_deref().map(parse_date).transpose()?;
            let mut dashboard = build_dashboard(config, cli.offline)?;
            run_chain(&mut dashboard, &ticker, expiry, side, cli.json)
        }
    }
}

fn build_dashboard(config: DashboardConfig, offline: bool) -> Result<Dashboard> {
    let provider: Box<dyn DashboardProvider> = if offline {
        Box::new(SyntheticProvider::new(chrono::Local::now().date_naive()))
    } else {
        let circuit_breaker = Arc::new(CircuitBreaker::default_provider());
        Box::new(YahooProvider::new(circuit_breaker)?)
    };
    let dashboard = Dashboard::new(provider, config);
    tracing::debug!(provider = dashboard.provider_name(), "provider ready");
    Ok(dashboard)
}

fn run_scan(dashboard: &mut Dashboard, args: &[String], as_json: bool) -> Result<()> {
    let tickers = if args.is_empty() {
        dashboard.config().scan.tickers.clone()
    } else {
        parse_ticker_list(&args.join(","))
    };
    if tickers.is_empty() {
        println!("No tickers to scan.");
        return Ok(());
    }

    let rows = dashboard.scan(&tickers, &StderrProgress);

    if as_json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print_scan(&rows, &dashboard.config().display.currency);
    }
    Ok(())
}

fn run_analyze(
    dashboard: &mut Dashboard,
    ticker: Option<String>,
    expiry: Option<NaiveDate>,
    as_json: bool,
) -> Result<()> {
    let ticker = ticker.unwrap_or_else(|| dashboard.config().deep_dive.ticker.clone());
    let mut dive = dashboard.deep_dive(&ticker)?;
    if let Some(date) = expiry {
        dive.chain = dashboard.chain_for(&dive, date);
    }

    if as_json {
        println!("{}", serde_json::to_string_pretty(&dive)?);
        return Ok(());
    }

    let currency = dashboard.config().display.currency.clone();
    print_deep_dive(&dive, &currency);
    Ok(())
}

fn run_suggest(
    config: &DashboardConfig,
    iv: f64,
    rsi: f64,
    macd: f64,
    as_json: bool,
) -> Result<()> {
    let rsi_status = RsiStatus::classify_with(rsi, &config.thresholds.rsi);
    let macd_status = MacdStatus::classify(macd);
    let suggestion = suggest_with(iv, rsi_status, macd_status, &config.thresholds.iv);

    if as_json {
        let out = json!({
            "suggestion": suggestion,
            "label": suggestion.label(),
            "rationale": present::rationale(&suggestion),
            "disclaimer": present::DISCLAIMER,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("RSI (14):       {}", present::rsi_label(rsi_status));
    println!("MACD Status:    {}", present::macd_label(macd_status));
    print_suggestion(&suggestion);
    Ok(())
}

fn run_chain(
    dashboard: &mut Dashboard,
    ticker: &str,
    expiry: Option<NaiveDate>,
    side: Option<OptionSide>,
    as_json: bool,
) -> Result<()> {
    let section = dashboard.option_chain(ticker, expiry)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&section)?);
        return Ok(());
    }

    match &section {
        Section::Ready(view) => print_chain(view, side),
        other => eprintln!("{}", present::section_message(other).unwrap_or_default()),
    }
    Ok(())
}

// ── Output ───────────────────────────────────────────────────────────

fn print_scan(rows: &[ScanRow], currency: &str) {
    println!();
    println!("{:<14} {:>12} {:>10} {:>16}", "Ticker", "Price", "ATM IV %", "Stock Vol. Ratio");
    println!("{}", "-".repeat(55));
    for row in rows {
        println!(
            "{:<14} {:>12} {:>10} {:>16}",
            row.ticker,
            present::format_price(row.price, currency),
            present::format_iv_pct(row.atm_iv_pct),
            present::format_volume_ratio(row.volume_ratio),
        );
    }
    println!();
}

fn print_deep_dive(dive: &DeepDive, currency: &str) {
    println!();
    println!(
        "=== Analysis for: {} (Current Price: {}) ===",
        dive.ticker,
        present::format_price(Some(dive.price), currency)
    );

    println!();
    println!("--- Technical Status Summary ---");
    match &dive.technical {
        Section::Ready(report) => print_technical(report),
        other => println!("{}", present::section_message(other).unwrap_or_default()),
    }

    println!();
    println!("--- Trade Suggestion ---");
    if let Section::Ready(iv) = &dive.atm_iv {
        println!("ATM IV (nearest expiry): {}", present::format_iv_pct(Some(*iv)));
    }
    match &dive.suggestion {
        Section::Ready(suggestion) => print_suggestion(suggestion),
        other => println!("{}", present::section_message(other).unwrap_or_default()),
    }

    println!();
    println!("--- Option Chain ---");
    if !dive.expiries.is_empty() {
        let dates: Vec<String> = dive.expiries.iter().map(|d| d.to_string()).collect();
        println!("Expiries: {}", dates.join(", "));
    }
    match &dive.chain {
        Section::Ready(view) => print_chain(view, None),
        other => println!("{}", present::section_message(other).unwrap_or_default()),
    }
}

fn print_technical(report: &TechnicalReport) {
    let snap = &report.snapshot;
    println!("As of:          {}", snap.date);
    println!("Close:          {:.2}", snap.close);
    println!(
        "Bollinger:      {:.2} / {:.2} / {:.2}",
        snap.bollinger_lower, snap.bollinger_middle, snap.bollinger_upper
    );
    println!("RSI:            {:.2}", snap.rsi14);
    println!(
        "MACD:           {:.3} (signal {:.3}, hist {:.3})",
        snap.macd_line, snap.macd_signal, snap.macd_histogram
    );
    for (title, value) in present::status_summary(&report.status) {
        println!("{:<16}{value}", format!("{title}:"));
    }
}

fn print_suggestion(suggestion: &Suggestion) {
    println!();
    println!("{}", present::headline(suggestion));
    println!("Why: {}", present::rationale(suggestion));
    println!();
    println!("{}", present::DISCLAIMER);
}

fn print_chain(view: &ChainView, side: Option<OptionSide>) {
    let sides: &[OptionSide] = match side {
        Some(OptionSide::Call) => &[OptionSide::Call],
        Some(OptionSide::Put) => &[OptionSide::Put],
        None => &[OptionSide::Call, OptionSide::Put],
    };
    for &s in sides {
        let title = match s {
            OptionSide::Call => "Call Option",
            OptionSide::Put => "Put Option",
        };
        println!();
        println!("{title} ({}) Chain (Expiry: {})", s.suffix(), view.expiry);
        print_quotes(view.side(s));
    }
}

fn print_quotes(quotes: &[OptionQuote]) {
    if quotes.is_empty() {
        println!("(no contracts)");
        return;
    }
    println!(
        "{:>10} {:>10} {:>9} {:>8} {:>8} {:>8} {:>8} {:>10} {:>8}",
        "Strike", "Last", "IV", "Delta", "Theta", "Gamma", "Vega", "OI", "Volume"
    );
    println!("{}", "-".repeat(88));
    for q in quotes {
        println!(
            "{:>10.2} {:>10.2} {:>9} {:>8} {:>8} {:>8} {:>8} {:>10} {:>8}",
            q.strike,
            q.last_price,
            present::format_chain_iv(q.implied_vol),
            present::format_greek(q.delta),
            present::format_greek(q.theta),
            present::format_greek(q.gamma),
            present::format_greek(q.vega),
            q.open_interest,
            q.volume,
        );
    }
}
