use chrono::{DateTime, FixedOffset, Offset, Utc};

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// `1234567` -> `1,234,567`
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Amounts as shown in the trade table: two decimals for dust, one decimal
/// below a dollar, grouped integers otherwise.
pub fn pretty_print_num(num: f64) -> String {
    if num < -1.0 {
        group_thousands(num.round() as i64)
    } else if num < 0.1 {
        format!("{}", round_to(num, 2))
    } else if num < 1.0 {
        format!("{}", round_to(num, 1))
    } else {
        group_thousands(num.round() as i64)
    }
}

pub fn k_formatter(num: f64) -> String {
    let abs = num.abs();
    let sign = if num < 0.0 { -1.0 } else { 1.0 };
    if abs > 999_999_999.0 {
        "tooBig".to_string()
    } else if abs > 999_999.0 {
        format!("{}M", sign * round_to(abs / 1_000_000.0, 1))
    } else if abs > 999.0 {
        format!("{}k", sign * round_to(abs / 1000.0, 1))
    } else {
        format!("{}", num.round() as i64)
    }
}

/// Largest whole unit of a duration in seconds: `2 d`, `5 h`, `3 m`, `42s`.
pub fn pretty_period(duration_secs: f64) -> String {
    let seconds = duration_secs.floor();
    for (unit_secs, suffix) in [(31_536_000.0, " y"), (86_400.0, " d"), (3_600.0, " h"), (60.0, " m")] {
        let interval = seconds / unit_secs;
        if interval > 1.0 {
            return format!("{}{}", interval.floor() as i64, suffix);
        }
    }
    format!("{}s", seconds as i64)
}

/// Trade time on the chart's clock, `dd/mm, HH:MM:SS`.
pub fn format_trade_time(timestamp: i64, tz_offset_hours: i64) -> String {
    let offset = FixedOffset::east_opt((tz_offset_hours * 3600) as i32)
        .unwrap_or_else(|| Utc.fix());
    match DateTime::<Utc>::from_timestamp(timestamp, 0) {
        Some(utc) => utc.with_timezone(&offset).format("%d/%m, %H:%M:%S").to_string(),
        None => timestamp.to_string(),
    }
}

/// Compact glyphs for the maker tags the API attaches to a trade.
pub fn replace_tags(tags: &[String]) -> String {
    tags.iter()
        .map(|tag| match tag.as_str() {
            "dev_team" => "👥",
            "top_holder" => "🏅",
            "sniper" => "⌖",
            other => other,
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn short_maker(maker: &str) -> String {
    let chars: Vec<char> = maker.chars().collect();
    if chars.len() <= 7 {
        return maker.to_string();
    }
    let head: String = chars[..3].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

pub fn explorer_tx_url(chain: &str, tx_hash: &str) -> Option<String> {
    let base = match chain {
        "bsc" => "https://bscscan.com/tx",
        "sol" | "solana" => "https://solscan.io/tx",
        "eth" => "https://etherscan.io/tx",
        "base" => "https://basescan.org/tx",
        _ => return None,
    };
    Some(format!("{}/{}", base, tx_hash))
}
