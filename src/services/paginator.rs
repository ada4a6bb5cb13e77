use crate::error::HarvestResult;
use crate::interfaces::{TimeRange, TokenTarget, Trade};
use crate::services::market::MarketData;

/// Walks the trade history backwards from `range.end()` to `range.start()`,
/// moving the `to` cursor onto the oldest trade of each page.
///
/// Stops on an empty page, or when a page's oldest trade does not move the
/// cursor back: the API has nothing older to hand out and asking again would
/// loop forever. Trades on a page boundary are returned by both pages and are kept
/// as delivered. The result is oldest-first.
pub async fn collect_trades<F>(
    source: &dyn MarketData,
    target: &TokenTarget,
    range: TimeRange,
    page_limit: usize,
    mut on_page: F,
) -> HarvestResult<Vec<Trade>>
where
    F: FnMut(&[Trade]),
{
    let mut collected: Vec<Trade> = Vec::new();
    let mut cursor = range.end();

    loop {
        let page = source
            .trade_page(target, range.start(), cursor, page_limit)
            .await?;
        let Some(oldest) = page.last().map(|t| t.timestamp) else {
            break;
        };

        on_page(&page);
        collected.extend(page);

        if oldest >= cursor {
            tracing::debug!(cursor, oldest, "cursor stalled");
            break;
        }
        cursor = oldest;
    }

    collected.reverse();
    Ok(collected)
}
