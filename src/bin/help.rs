//! Help command - displays all available harvester commands

use colored::*;

fn main() {
    println!("{}", "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".cyan().bold());
    println!("{}", "     📡 TRADE WALLET HARVESTER - COMMANDS".cyan().bold());
    println!("{}\n", "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".cyan().bold());

    println!("{}\n", "📖 GETTING STARTED".yellow().bold());
    println!("  {}   Interactive session on a token page", "cargo run -- <token-url>".green());
    println!("  {}            Compile Rust project", "cargo build --release".green());
    println!();

    println!("{}\n", "⌨  INTERACTIVE KEYS".yellow().bold());
    println!("  {}   Quick window after the chart time", "f".green());
    println!("  {}   Chart time until now", "d".green());
    println!("  {}   Capture window start / end from the chart", "s / e".green());
    println!("  {}   Collect the captured window", "r".green());
    println!("  {}   Save collected / top PNL / top holders / recent wallets", "w / p / h / n".green());
    println!();

    println!("{}\n", "🧰 ONE-SHOT TOOLS".yellow().bold());
    println!(
        "  {}   Collect a window by labels",
        "cargo run --bin collect_window -- <token-url> <from> <to> [--save]".green()
    );
    println!(
        "  {}        Save a ranked wallet list",
        "cargo run --bin save_top_wallets -- <token-url> <pnl|holders|soon>".green()
    );
    println!();

    println!("{}\n", "⚙  CONFIGURATION (.env)".yellow().bold());
    println!("  {}   token page, e.g. https://gmgn.ai/sol/token/abc_Mint", "TOKEN_URL".green());
    println!("  {}   directory the chart host writes time-axis captures to", "CHART_CAPTURE_DIR".green());
    println!("  {}   hours the chart clock runs ahead of UTC (default 7)", "CHART_TZ_OFFSET_HOURS".green());
    println!("  {}   tesseract binary and language", "TESSERACT_BIN / OCR_LANGUAGE".green());
    println!("  {}   market API and wallet store endpoints", "MARKET_API_URL / WALLET_STORE_URL".green());
    println!("  {}   diagnostics filter, e.g. debug", "RUST_LOG".green());
    println!();
}
