//! Collect the wallets active between two chart labels without the chart.
//!
//! Usage: collect_window <token-url> <from-label> <to-label> [--save]

use anyhow::{Context, Result};
use std::sync::Arc;

use trade_wallet_harvester::config::load_env;
use trade_wallet_harvester::interfaces::TokenTarget;
use trade_wallet_harvester::services::Session;
use trade_wallet_harvester::utils::logger::init_tracing;
use trade_wallet_harvester::utils::{Bound, Logger};

#[tokio::main]
async fn main() -> Result<()> {
    let env = Arc::new(load_env()?);
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let positional: Vec<&String> = args.iter().filter(|a| !a.starts_with("--")).collect();
    let save = args.iter().any(|a| a == "--save");

    let (target, from, to) = match positional.as_slice() {
        [url, from, to] => (TokenTarget::from_page_url(url)?, from.as_str(), to.as_str()),
        [from, to] => (
            env.token_target
                .clone()
                .context("Pass a token page URL or set TOKEN_URL in .env")?,
            from.as_str(),
            to.as_str(),
        ),
        _ => {
            println!("Usage: collect_window [token-url] <from-label> <to-label> [--save]");
            println!("Example: collect_window https://gmgn.ai/sol/token/abc_Mint 04dec24 04dec24 --save");
            return Ok(());
        }
    };

    Logger::header(&format!("📥 COLLECTING {}", target));
    let session = Session::from_env(env.clone(), target)?;
    session.type_bound(Bound::Start, from).await;
    session.type_bound(Bound::End, to).await;

    let outcome = session.custom_filter().await?;
    Logger::trades_table(&outcome.trades, &session.target().chain, env.chart_tz_offset_hours);
    Logger::collection_summary(&outcome.trades, outcome.wallets.len());

    if save && !outcome.wallets.is_empty() {
        let report = session.save_collected().await?;
        Logger::submission(&report);
    }

    for wallet in &outcome.wallets {
        println!("{}", wallet);
    }
    Ok(())
}
