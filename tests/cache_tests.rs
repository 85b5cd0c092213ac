// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Tests for request-scoped memoization

mod helpers;

use aprscan::{AggregationCache, AprWindow, GaugeRegistry, MemoCache, Network, Round};
use helpers::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_memo_cache_computes_once() {
    let cache: MemoCache<f64> = MemoCache::new("bal_price");
    let calls = AtomicUsize::new(0);

    for _ in 0..3 {
        let value = cache
            .get_or_compute("bal_price_52", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, String>(4.2)
            })
            .await
            .unwrap();
        assert_eq!(value, 4.2);
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(cache.name(), "bal_price");
    assert_eq!(cache.get("bal_price_52").await, Some(4.2));
    assert_eq!(cache.get("bal_price_53").await, None);
}

#[tokio::test]
async fn test_memo_cache_does_not_store_failures() {
    let cache: MemoCache<u64> = MemoCache::new("pool_weight");
    let calls = AtomicUsize::new(0);

    let first = cache
        .get_or_compute("k", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err::<u64, _>("rpc unavailable".to_string())
        })
        .await;
    assert!(first.is_err());
    assert!(cache.is_empty().await);

    let second = cache
        .get_or_compute("k", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, String>(11)
        })
        .await;
    assert_eq!(second, Ok(11));
    assert_eq!(calls.load(Ordering::SeqCst), 2, "failure must be retried");
    assert_eq!(cache.len().await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_memo_cache_single_flight_across_tasks() {
    let cache: Arc<MemoCache<u32>> = Arc::new(MemoCache::new("pool_data"));
    let calls = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let calls = Arc::clone(&calls);
            tokio::spawn(async move {
                cache
                    .get_or_compute("pool_data_0x01_52_1", || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(25)).await;
                        Ok::<_, String>(9)
                    })
                    .await
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), 9);
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    let stats = cache.stats().await;
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 15);
    assert_eq!(stats.entries, 1);
}

#[test]
fn test_aggregation_keys() {
    let round = Round::from_number(52).unwrap();
    let window = AprWindow::for_round(&round);
    let day = AprWindow::for_day(date(2023, 6, 1)).unwrap();
    let id = pool_id(1);

    assert_eq!(AggregationCache::bal_price_key(&window), "bal_price_52");
    assert_eq!(AggregationCache::bal_price_key(&day), "bal_price_2023-06-01");
    assert_eq!(
        AggregationCache::pool_data_key(&id, &window, Network::Polygon),
        format!("pool_data_{id}_52_137")
    );
    assert_eq!(
        AggregationCache::pool_weight_key(&id, &day, Network::Ethereum),
        format!("pool_weight_{id}_2023-06-01_1")
    );
    assert_eq!(
        AggregationCache::fee_window_key(&id, &window, Network::Arbitrum),
        format!("pool_fee_apr_{id}_52_42161")
    );
}

#[tokio::test]
async fn test_failed_input_is_retried_within_a_batch() {
    let mocks = Mocks::new();
    let pool = pool(1, Network::Ethereum);
    let window = AprWindow::for_day(date(2023, 6, 1)).unwrap();
    let calculator = mocks.calculator(GaugeRegistry::default());
    let cache = AggregationCache::new();

    mocks.prices.fail();
    assert!(calculator.calculate_pool_stats(&cache, &pool, &window).await.is_err());
    assert!(cache.bal_prices.is_empty().await);

    mocks.prices.set(Mocks::BAL_PRICE);
    let stats = calculator
        .calculate_pool_stats(&cache, &pool, &window)
        .await
        .unwrap();
    assert_eq!(stats.bal_price_usd, Mocks::BAL_PRICE);
    assert_eq!(mocks.prices.calls(), 2);
    assert_eq!(mocks.weights.calls(), 1, "successful inputs stay cached");
}

#[tokio::test]
async fn test_concurrent_units_share_inputs() {
    let mocks = Mocks::new();
    let window = AprWindow::for_day(date(2023, 6, 1)).unwrap();
    let calculator = mocks.calculator(GaugeRegistry::default());
    let cache = AggregationCache::new();
    let first = pool(1, Network::Ethereum);
    let second = pool(2, Network::Polygon);

    let (a, b) = tokio::join!(
        calculator.calculate_pool_stats(&cache, &first, &window),
        calculator.calculate_pool_stats(&cache, &second, &window),
    );
    assert!(a.is_ok() && b.is_ok());
    assert_eq!(mocks.prices.calls(), 1);
    assert_eq!(cache.bal_prices.len().await, 1);
    assert_eq!(cache.pool_data.len().await, 2);
}
