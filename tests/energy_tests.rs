// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for block, transaction and wallet energy reports

mod helpers;

use blockwatt::{ExplorerContext, ExplorerError};
use helpers::*;
use std::sync::Arc;

#[tokio::test]
async fn test_block_energy_includes_transactions() {
    let transport = Arc::new(MockTransport::new().respond(
        "rawblock/b1",
        block_json("b1", 2_000, OLD_TIME, &[("t1", 250), ("t2", 500)]),
    ));
    let ctx = ExplorerContext::with_transport(transport, test_config());

    let energy = ctx.energy().block_energy("b1").await.unwrap();

    assert_eq!(energy.consumed_energy, 2_000 * 4_560);
    assert_eq!(energy.time, OLD_TIME);
    assert_eq!(energy.transactions.len(), 2);
    assert_eq!(energy.transactions[0].consumed_energy, 250 * 4_560);
    assert_eq!(energy.transactions[1].hash, "t2");
}

#[tokio::test]
async fn test_transaction_energy_uses_configured_factor() {
    let transport =
        Arc::new(MockTransport::new().respond("rawtx/t1", tx_json("t1", 226, OLD_TIME)));
    let config = test_config_builder().watt_per_byte(10).build();
    let ctx = ExplorerContext::with_transport(transport, config);

    let energy = ctx.energy().transaction_energy("t1").await.unwrap();
    assert_eq!(energy.consumed_energy, 2_260);
    assert_eq!(energy.size, 226);
}

#[tokio::test]
async fn test_wallet_energy_paginates() {
    let transport = Arc::new(
        MockTransport::new()
            .respond("rawaddr/1abc?offset=0", wallet_json("1abc", 5, &[("a", 1), ("b", 2)]))
            .respond("rawaddr/1abc?offset=2", wallet_json("1abc", 5, &[("c", 3), ("d", 4)]))
            .respond("rawaddr/1abc?offset=4", wallet_json("1abc", 5, &[("e", 5)])),
    );
    let config = test_config_builder()
        .wallet_page_size(2)
        .watt_per_byte(1)
        .build();
    let ctx = ExplorerContext::with_transport(transport.clone(), config);

    let wallet = ctx.energy().wallet_energy("1abc").await.unwrap();

    assert_eq!(wallet.address, "1abc");
    assert_eq!(wallet.total_transactions, 5);
    assert_eq!(wallet.consumed_energy, 15);
    let hashes: Vec<&str> = wallet.transactions.iter().map(|t| t.hash.as_str()).collect();
    assert_eq!(hashes, vec!["a", "b", "c", "d", "e"]);
    assert_eq!(transport.call_count("rawaddr/"), 3);
}

#[tokio::test]
async fn test_wallet_energy_with_single_page() {
    let transport = Arc::new(
        MockTransport::new().respond("rawaddr/1one", wallet_json("1one", 1, &[("a", 100)])),
    );
    let ctx = ExplorerContext::with_transport(transport.clone(), test_config());

    let wallet = ctx.energy().wallet_energy("1one").await.unwrap();
    assert_eq!(wallet.consumed_energy, 100 * 4_560);
    assert_eq!(transport.calls(), vec!["rawaddr/1one?offset=0"]);
}

#[tokio::test]
async fn test_wallet_energy_fails_if_any_page_fails() {
    let transport = Arc::new(
        MockTransport::new()
            .respond("rawaddr/1abc?offset=0", wallet_json("1abc", 120, &[("a", 1)]))
            .fail("rawaddr/1abc?offset=50", 500)
            .respond("rawaddr/1abc?offset=100", wallet_json("1abc", 120, &[("c", 1)])),
    );
    let ctx = ExplorerContext::with_transport(transport, test_config());

    let err = ctx.energy().wallet_energy("1abc").await.unwrap_err();
    match err {
        ExplorerError::Transport(e) => assert_eq!(e.status(), Some(500)),
        other => panic!("expected transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_wallet_energy_rejects_absurd_transaction_count() {
    let transport = Arc::new(
        MockTransport::new().respond("rawaddr/1huge?offset=0", wallet_json("1huge", u64::MAX, &[("a", 1)])),
    );
    let ctx = ExplorerContext::with_transport(transport.clone(), test_config());

    let err = ctx.energy().wallet_energy("1huge").await.unwrap_err();
    assert!(matches!(err, ExplorerError::UpstreamData { .. }));
    // Only the first page was requested
    assert_eq!(transport.calls().len(), 1);
}

#[tokio::test]
async fn test_wallet_energy_page_limit_is_configurable() {
    let transport = Arc::new(
        MockTransport::new()
            .respond("rawaddr/1abc?offset=0", wallet_json("1abc", 5, &[("a", 1), ("b", 2)]))
            .respond("rawaddr/1abc?offset=2", wallet_json("1abc", 5, &[("c", 3), ("d", 4)]))
            .respond("rawaddr/1abc?offset=4", wallet_json("1abc", 5, &[("e", 5)])),
    );
    let at_limit = test_config_builder()
        .watt_per_byte(1)
        .wallet_page_size(2)
        .wallet_max_pages(3)
        .build();
    let ctx = ExplorerContext::with_transport(transport.clone(), at_limit);
    assert_eq!(ctx.energy().wallet_energy("1abc").await.unwrap().consumed_energy, 15);

    let below_limit = test_config_builder()
        .wallet_page_size(2)
        .wallet_max_pages(2)
        .build();
    let ctx = ExplorerContext::with_transport(transport, below_limit);
    let err = ctx.energy().wallet_energy("1abc").await.unwrap_err();
    assert!(matches!(err, ExplorerError::UpstreamData { .. }));
}

#[tokio::test]
async fn test_wallet_energy_rejects_empty_address() {
    let transport = Arc::new(MockTransport::new());
    let ctx = ExplorerContext::with_transport(transport.clone(), test_config());

    let err = ctx.energy().wallet_energy(" ").await.unwrap_err();
    assert!(matches!(err, ExplorerError::InvalidArgument { .. }));
    assert!(transport.calls().is_empty());
}
