use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;

use trade_wallet_harvester::config::load_env;
use trade_wallet_harvester::interfaces::TokenTarget;
use trade_wallet_harvester::services::{CaptureDirProvider, FilterOutcome, Session, SubmissionReport};
use trade_wallet_harvester::utils::logger::init_tracing;
use trade_wallet_harvester::utils::{wait_until, Bound, CommandTasks, Logger};
use trade_wallet_harvester::HarvestResult;

fn show_filter(session: &Session, result: HarvestResult<FilterOutcome>) {
    match result {
        Ok(outcome) => {
            let env = session.env();
            Logger::trades_table(&outcome.trades, &session.target().chain, env.chart_tz_offset_hours);
            Logger::collection_summary(&outcome.trades, outcome.wallets.len());
            if !outcome.wallets.is_empty() {
                Logger::info("Press \"w\" to save these wallets");
            }
        }
        Err(e) => Logger::error(&format!("❌ {}", e)),
    }
}

fn show_save(result: HarvestResult<SubmissionReport>) {
    match result {
        Ok(report) => Logger::submission(&report),
        Err(e) => Logger::error(&format!("❌ Error saving wallets: {}", e)),
    }
}

fn show_bound(name: &str, result: HarvestResult<String>) {
    match result {
        Ok(label) => Logger::success(&format!("{} = {}", name, label)),
        Err(e) => Logger::error(&format!("❌ Failed to get date text from chart: {}", e)),
    }
}

/// Runs one command line. Each line gets its own task, so a key pressed
/// again while its operation is running is rejected as busy.
async fn handle_command(session: Arc<Session>, line: String) {
    let session = session.as_ref();
    let mut parts = line.splitn(2, char::is_whitespace);
    let command = parts.next().unwrap_or_default();
    let argument = parts.next().unwrap_or_default().trim();

    match command {
        "" => {}
        "f" => show_filter(session, session.quick_filter().await),
        "d" => show_filter(session, session.filter_to_now().await),
        "s" => show_bound("from", session.capture_bound(Bound::Start).await),
        "e" => show_bound("to", session.capture_bound(Bound::End).await),
        "from" => {
            let label = session.type_bound(Bound::Start, argument).await;
            Logger::info(&format!("from = {}", label));
        }
        "to" => {
            let label = session.type_bound(Bound::End, argument).await;
            Logger::info(&format!("to = {}", label));
        }
        "r" => show_filter(session, session.custom_filter().await),
        "w" => show_save(session.save_collected().await),
        "p" => show_save(session.save_top_pnl().await),
        "h" => show_save(session.save_top_holders().await),
        "n" => show_save(session.save_recent().await),
        "?" | "help" => Logger::key_help(),
        other => Logger::warning(&format!("Unknown command {:?}, type ? for help", other)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let env = Arc::new(load_env()?);
    init_tracing();

    let target = match std::env::args().nth(1) {
        Some(url) => TokenTarget::from_page_url(&url)?,
        None => env
            .token_target
            .clone()
            .context("Pass a token page URL or set TOKEN_URL in .env")?,
    };
    Logger::startup(Some(&target), &env.chart_capture_dir.display().to_string());

    let captures = CaptureDirProvider::new(env.chart_capture_dir.clone());
    Logger::info("Waiting for the chart time axis...");
    wait_until(
        "chart captures",
        || captures.has_regions(),
        Duration::from_millis(env.setup_poll_interval_ms),
        Duration::from_millis(env.setup_timeout_ms),
    )
    .await
    .with_context(|| format!("No time-axis captures in {}", captures.dir().display()))?;
    Logger::success("1/2: Chart captures are ok.");

    let session = Arc::new(Session::from_env(env.clone(), target)?);
    Logger::success("2/2: Session is ok. Press \"f\" to fetch transactions.");
    Logger::separator();
    Logger::key_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut tasks = CommandTasks::new();
    let mut interrupted = false;
    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(line) => {
                        let line = line.trim().to_string();
                        if matches!(line.as_str(), "q" | "quit" | "exit") {
                            break;
                        }
                        tasks.spawn(handle_command(session.clone(), line));
                    }
                    None => break,
                }
            }
            _ = signal::ctrl_c() => {
                Logger::separator();
                Logger::info("Received SIGINT, shutting down...");
                interrupted = true;
                break;
            }
        }
    }

    if !interrupted && tasks.pending() > 0 {
        Logger::info(&format!(
            "⏳ Waiting for {} running command(s), Ctrl-C to cancel...",
            tasks.pending()
        ));
        tokio::select! {
            _ = tasks.drain() => {}
            _ = signal::ctrl_c() => interrupted = true,
        }
    }
    if interrupted {
        let cancelled = tasks.cancel().await;
        if cancelled > 0 {
            Logger::warning(&format!(
                "Cancelled {} running command(s); a save cut short keeps only the chunks reported above",
                cancelled
            ));
        }
    }

    Logger::success("Session closed");
    Ok(())
}
