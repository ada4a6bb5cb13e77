//! Wallet dedup and chunked submission

mod common;

use common::{trade, RecordingSink};
use trade_wallet_harvester::interfaces::{Holder, Trader};
use trade_wallet_harvester::services::submission::{store_chain, ChunkReceipt, MAX_CHUNK_SIZE};
use trade_wallet_harvester::services::{submit_wallets, unique_addresses, SubmissionReport};
use trade_wallet_harvester::HarvestError;

fn wallets(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("W{:05}", i)).collect()
}

#[test]
fn test_unique_makers_keep_first_seen_order() {
    let trades = vec![trade("A", 1), trade("B", 2), trade("A", 3), trade("C", 4), trade("B", 5)];
    assert_eq!(unique_addresses(&trades), vec!["A", "B", "C"]);
}

#[test]
fn test_unique_addresses_skip_blank_makers() {
    let trades = vec![trade("", 1), trade("A", 2), trade("", 3)];
    assert_eq!(unique_addresses(&trades), vec!["A"]);
    assert!(unique_addresses::<Trader, _>(&[]).is_empty());
}

#[test]
fn test_unique_traders_and_holders() {
    let traders = vec![
        Trader { address: "T1".into(), realized_profit: 5.0, unrealized_profit: 0.0 },
        Trader { address: "T1".into(), realized_profit: 3.0, unrealized_profit: 0.0 },
        Trader { address: "T2".into(), realized_profit: 1.0, unrealized_profit: 0.0 },
    ];
    assert_eq!(unique_addresses(&traders), vec!["T1", "T2"]);

    let holders = vec![
        Holder { address: "H2".into(), amount_percentage: 0.3, usd_value: 100.0 },
        Holder { address: "H1".into(), amount_percentage: 0.2, usd_value: 50.0 },
    ];
    assert_eq!(unique_addresses(&holders), vec!["H2", "H1"]);
}

#[tokio::test]
async fn test_splits_into_ordered_chunks() {
    let sink = RecordingSink::default();
    let all = wallets(2500);
    let report = submit_wallets(&sink, "sol", &all, MAX_CHUNK_SIZE).await.unwrap();

    let posted = sink.posted();
    let sizes: Vec<usize> = posted.iter().map(|(_, chunk)| chunk.len()).collect();
    assert_eq!(sizes, vec![999, 999, 502]);
    assert!(posted.iter().all(|(chain, _)| chain == "sol"));

    let resent: Vec<String> = posted.into_iter().flat_map(|(_, chunk)| chunk).collect();
    assert_eq!(resent, all);

    assert_eq!(report.total_chunks, 3);
    assert_eq!(report.sent, 2500);
    assert_eq!(report.reported_total(), Some(2500));
    assert_eq!(
        report.receipts[2],
        ChunkReceipt { index: 3, size: 502, server_count: "502".to_string() }
    );
}

#[tokio::test]
async fn test_single_chunk_when_under_limit() {
    let sink = RecordingSink::default();
    let report = submit_wallets(&sink, "eth", &wallets(5), MAX_CHUNK_SIZE).await.unwrap();
    assert_eq!(report.total_chunks, 1);
    assert_eq!(sink.posted().len(), 1);
}

#[tokio::test]
async fn test_oversized_chunk_size_is_capped() {
    let sink = RecordingSink::default();
    submit_wallets(&sink, "sol", &wallets(1000), 5000).await.unwrap();
    let sizes: Vec<usize> = sink.posted().iter().map(|(_, c)| c.len()).collect();
    assert_eq!(sizes, vec![999, 1]);
}

#[tokio::test]
async fn test_failed_chunk_aborts_and_names_its_index() {
    let sink = RecordingSink::failing_on(2);
    let result = submit_wallets(&sink, "sol", &wallets(2500), MAX_CHUNK_SIZE).await;

    match result {
        Err(HarvestError::Submission { chunk, total, source }) => {
            assert_eq!((chunk, total), (2, 3));
            assert!(matches!(*source, HarvestError::Network { .. }));
        }
        other => panic!("expected a submission error, got {:?}", other),
    }
    // the first chunk stays stored, the third is never sent
    assert_eq!(sink.posted().len(), 1);
}

#[tokio::test]
async fn test_nothing_to_submit() {
    let sink = RecordingSink::default();
    let report = submit_wallets(&sink, "sol", &[], MAX_CHUNK_SIZE).await.unwrap();
    assert_eq!(report, SubmissionReport::default());
    assert!(sink.posted().is_empty());
}

#[test]
fn test_reported_total_needs_numeric_answers() {
    let report = SubmissionReport {
        total_chunks: 2,
        sent: 4,
        receipts: vec![
            ChunkReceipt { index: 1, size: 2, server_count: " 2\n".to_string() },
            ChunkReceipt { index: 2, size: 2, server_count: "1".to_string() },
        ],
    };
    // the store may count fewer than were sent; the sum is reported as-is
    assert_eq!(report.reported_total(), Some(3));

    let mut garbled = report.clone();
    garbled.receipts[1].server_count = "ok".to_string();
    assert_eq!(garbled.reported_total(), None);
}

#[test]
fn test_store_chain_names() {
    assert_eq!(store_chain("solana"), "sol");
    assert_eq!(store_chain("sol"), "sol");
    assert_eq!(store_chain("base"), "base");
}
