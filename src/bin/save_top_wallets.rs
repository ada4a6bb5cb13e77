//! Save the top PNL traders, top holders or most recent traders of a token.
//!
//! Usage: save_top_wallets [token-url] <pnl|holders|soon>

use anyhow::{Context, Result};
use std::sync::Arc;

use trade_wallet_harvester::config::load_env;
use trade_wallet_harvester::interfaces::TokenTarget;
use trade_wallet_harvester::services::Session;
use trade_wallet_harvester::utils::logger::init_tracing;
use trade_wallet_harvester::utils::Logger;

#[tokio::main]
async fn main() -> Result<()> {
    let env = Arc::new(load_env()?);
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (target, kind) = match args.as_slice() {
        [url, kind] => (TokenTarget::from_page_url(url)?, kind.as_str()),
        [kind] => (
            env.token_target
                .clone()
                .context("Pass a token page URL or set TOKEN_URL in .env")?,
            kind.as_str(),
        ),
        _ => {
            println!("Usage: save_top_wallets [token-url] <pnl|holders|soon>");
            return Ok(());
        }
    };

    let session = Session::from_env(env, target)?;
    Logger::header(&format!("💾 SAVING {} WALLETS OF {}", kind.to_uppercase(), session.target()));

    let report = match kind {
        "pnl" => session.save_top_pnl().await?,
        "holders" => session.save_top_holders().await?,
        "soon" => session.save_recent().await?,
        other => anyhow::bail!("Unknown list {:?}: expected pnl, holders or soon", other),
    };
    Logger::submission(&report);
    Ok(())
}
