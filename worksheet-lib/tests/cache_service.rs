//! Tests for the TTL cache and its service wrapper.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::Utc;
use serde_json::json;
use worksheet_lib::cache::{CacheConfig, CacheProvider, CacheService, CachedValue, TtlCache};

#[test]
fn test_fresh_value_is_returned_until_expiry() {
    let cache = TtlCache::new();
    let now = Utc::now();
    cache.insert_entry("grades", CachedValue::new(12u8, now, Duration::from_secs(60)));

    let entry = cache.get_entry("grades").unwrap();
    assert!(!entry.is_expired_at(now + chrono::Duration::seconds(60)));
    assert!(entry.is_expired_at(now + chrono::Duration::seconds(61)));
    assert_eq!(cache.get("grades"), Some(12));
}

#[test]
fn test_expired_value_is_evicted_on_read() {
    let cache = TtlCache::new();
    cache.insert_entry(
        "subjects",
        CachedValue::new("math", Utc::now() - chrono::Duration::hours(2), Duration::from_secs(3600)),
    );
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get("subjects"), None);
    assert!(cache.is_empty());
}

#[test]
fn test_overwrite_replaces_ttl() {
    let cache = TtlCache::new();
    cache.set("k", 1, Duration::ZERO);
    cache.set("k", 2, Duration::from_secs(60));
    thread::sleep(Duration::from_millis(5));
    assert_eq!(cache.get("k"), Some(2));
}

#[test]
fn test_gc_removes_only_expired() {
    let cache = TtlCache::new();
    let old = Utc::now() - chrono::Duration::minutes(10);
    cache.insert_entry("a", CachedValue::new(1, old, Duration::from_secs(60)));
    cache.insert_entry("b", CachedValue::new(2, old, Duration::from_secs(60)));
    cache.set("c", 3, Duration::from_secs(60));

    assert_eq!(cache.gc(), 2);
    assert_eq!(cache.keys(), vec!["c".to_string()]);
}

#[test]
fn test_concurrent_writers_and_readers() {
    let cache = Arc::new(TtlCache::new());
    let handles: Vec<_> = (0..8)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..100 {
                    let key = format!("user-{}-{}", t, i);
                    cache.set(&key, i, Duration::from_secs(60));
                    assert_eq!(cache.get(&key), Some(i));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(cache.len(), 800);
}

#[test]
fn test_service_caches_json_config() {
    let service = CacheService::without_sweeper(CacheConfig::default());
    service.prewarm_static([
        ("question-types".to_string(), json!(["choice", "short", "essay"])),
        ("grade-levels".to_string(), json!([1, 2, 3, 4, 5, 6])),
    ]);

    let mut loads = 0;
    let prefs = service.get_or_load("prefs:kim", || {
        loads += 1;
        json!({"theme": "dark"})
    });
    let again = service.get_or_load("prefs:kim", || {
        loads += 1;
        json!({})
    });

    assert_eq!(prefs, again);
    assert_eq!(loads, 1);
    assert_eq!(service.cache().len(), 3);
}

#[tokio::test]
async fn test_sweeper_cleans_up_in_background() {
    let config = CacheConfig::default()
        .with_default_ttl(Duration::from_millis(10))
        .with_sweep_interval(Duration::from_millis(20));
    let service = CacheService::start(config);
    assert!(service.is_sweeping());

    service.set("session", 1u32);
    service.set_with_ttl("static", 2u32, Duration::from_secs(60));

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(service.cache().keys(), vec!["static".to_string()]);

    service.shutdown().await;
}

#[tokio::test]
async fn test_zero_sweep_interval_disables_sweeper() {
    let service: CacheService<u32> =
        CacheService::start(CacheConfig::default().with_sweep_interval(Duration::ZERO));
    assert!(!service.is_sweeping());
    service.shutdown().await;
}
