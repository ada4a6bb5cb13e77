use chrono::Local;
use colored::*;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use crate::interfaces::{TimeRange, TokenTarget, Trade};
use crate::services::submission::SubmissionReport;
use crate::utils::format::{
    explorer_tx_url, format_trade_time, k_formatter, pretty_period, pretty_print_num, replace_tags,
    short_maker,
};

/// Diagnostics go through `tracing` on stderr, filtered by `RUST_LOG`.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub struct Logger;

impl Logger {
    fn get_logs_dir() -> PathBuf {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join("logs")
    }

    fn get_log_file_name() -> PathBuf {
        let date = Local::now().format("%Y-%m-%d").to_string();
        Self::get_logs_dir().join(format!("harvester-{}.log", date))
    }

    fn write_to_file(message: &str) {
        let _ = (|| -> std::io::Result<()> {
            fs::create_dir_all(Self::get_logs_dir())?;
            let log_entry = format!("[{}] {}\n", Local::now().to_rfc3339(), message);
            let mut file = fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(Self::get_log_file_name())?;
            file.write_all(log_entry.as_bytes())
        })();
    }

    pub fn header(title: &str) {
        println!("\n{}", "━".repeat(70).cyan());
        println!("{}", format!("  {}", title).cyan().bold());
        println!("{}\n", "━".repeat(70).cyan());
        Self::write_to_file(&format!("HEADER: {}", title));
    }

    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue(), message);
        Self::write_to_file(&format!("INFO: {}", message));
    }

    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
        Self::write_to_file(&format!("SUCCESS: {}", message));
    }

    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
        Self::write_to_file(&format!("WARNING: {}", message));
    }

    pub fn error(message: &str) {
        println!("{} {}", "✗".red(), message);
        Self::write_to_file(&format!("ERROR: {}", message));
    }

    /// Inline pagination progress, `+100 items..`
    pub fn progress(count: usize) {
        print!("{} ", format!("+{} items..", count).bright_black());
        let _ = std::io::stdout().flush();
    }

    pub fn separator() {
        println!("{}", "─".repeat(70).bright_black());
    }

    pub fn startup(target: Option<&TokenTarget>, capture_dir: &str) {
        Self::header("📡 TRADE WALLET HARVESTER");
        match target {
            Some(target) => {
                println!("{}", "🎯 Token:".cyan());
                println!("{}", format!("   chain {} | token {}", target.chain, target.token_id).bright_black());
            }
            None => println!("{}", "🎯 Token: not set (TOKEN_URL)".yellow()),
        }
        println!("{}", "\n🖼  Chart captures:".cyan());
        println!("{}\n", format!("   {}", capture_dir).bright_black());
    }

    pub fn key_help() {
        println!("{}", "⌨  Commands".yellow().bold());
        let rows = [
            ("f", "collect the quick window after the chart time"),
            ("d", "collect from the chart time until now"),
            ("s", "capture the chart time as the window start"),
            ("e", "capture the chart time as the window end"),
            ("from <label>", "type the window start, e.g. 04dec24143000"),
            ("to <label>", "type the window end"),
            ("r", "collect the typed window"),
            ("w", "save the wallets of the last collection"),
            ("p", "save the top PNL traders"),
            ("h", "save the top holders"),
            ("n", "save the most recent traders"),
            ("q", "quit"),
        ];
        for (key, text) in rows {
            println!("  {:<14} {}", key.green(), text.bright_black());
        }
        println!();
    }

    pub fn window(range: &TimeRange, tz_offset_hours: i64) {
        Self::info(&format!(
            "Window {} → {} ({})",
            format_trade_time(range.start(), tz_offset_hours),
            format_trade_time(range.end(), tz_offset_hours),
            pretty_period(range.duration_secs() as f64)
        ));
    }

    pub fn trades_table(trades: &[Trade], chain: &str, tz_offset_hours: i64) {
        if trades.is_empty() {
            return;
        }
        println!();
        println!(
            "{}",
            format!(
                "{:<16} {:<14} {:<4} {:>10} {:>16}  {}",
                "Date", "Maker", "Type", "$Buy", "$Pnl", "Tx"
            )
            .bright_black()
            .bold()
        );
        for trade in trades {
            let event = trade.event.chars().next().map(|c| c.to_string()).unwrap_or_default();
            let event = if trade.is_buy() { event.green().bold() } else { event.red().bold() };
            let realized = pretty_print_num(trade.realized_profit);
            let realized = if trade.realized_profit < 0.0 { realized.red() } else { realized.green() };
            let unrealized = if trade.unrealized_profit != 0.0 {
                pretty_print_num(trade.unrealized_profit)
            } else {
                String::new()
            };
            let mut maker = short_maker(&trade.maker);
            let tags = replace_tags(&trade.maker_token_tags);
            if !tags.is_empty() {
                maker = format!("{} {}", maker, tags);
            }
            let tx = explorer_tx_url(chain, &trade.tx_hash).unwrap_or_else(|| trade.tx_hash.clone());
            println!(
                "{:<16} {:<14} {:<4} {:>10} {:>7} {:>8}  {}",
                format_trade_time(trade.timestamp, tz_offset_hours),
                maker,
                event,
                pretty_print_num(trade.amount_usd),
                unrealized.bright_black(),
                realized,
                tx.bright_black()
            );
        }
        println!();
    }

    pub fn collection_summary(trades: &[Trade], wallets: usize) {
        let volume: f64 = trades.iter().map(|t| t.amount_usd).sum();
        println!();
        Self::success(&format!(
            "🔍 Found {} transactions, {} unique wallets, ${} volume",
            trades.len(),
            wallets,
            k_formatter(volume)
        ));
        Self::write_to_file(&format!("COLLECTED: {} trades | {} wallets", trades.len(), wallets));
    }

    /// Totals of a finished submission; chunks are reported as they land.
    pub fn submission(report: &SubmissionReport) {
        Self::success(&format!(
            "💾 Sent {} wallets in {} chunk(s)",
            report.sent, report.total_chunks
        ));
        if let Some(reported) = report.reported_total() {
            if reported != report.sent {
                Self::warning(&format!(
                    "Wallet store reported {} saved out of {} sent",
                    reported, report.sent
                ));
            }
        }
    }
}
