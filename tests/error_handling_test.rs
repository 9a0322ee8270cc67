mod common;

use std::time::Duration;

use bytes::Bytes;
use remote_config::{CacheConfig, ConfigAccessor, ConfigClientError, InMemoryTransport};

use common::{accessor, cache_config, fast_retry};

#[tokio::test]
async fn test_missing_key_is_not_found() {
    common::setup_test_logging();
    let transport = InMemoryTransport::new().shared();
    let config = accessor(&transport, &CacheConfig::default());

    let err = config.get_string("no.such.key").await.unwrap_err();
    assert_eq!(err, ConfigClientError::not_found("no.such.key", "dev"));
    assert_eq!(
        transport.fetch_count("no.such.key").await,
        1,
        "NotFound must not be retried"
    );
}

#[tokio::test]
async fn test_not_found_is_not_cached() {
    let transport = InMemoryTransport::new().shared();
    let config = accessor(&transport, &CacheConfig::default());

    assert!(config.get_bytes("late.key").await.unwrap_err().is_not_found());
    transport.insert("dev", "late.key", "here").await;
    assert_eq!(config.get_string("late.key").await.unwrap(), "here");
}

#[tokio::test]
async fn test_outage_is_remote_unavailable_and_retried() {
    let transport = InMemoryTransport::new().shared();
    transport.insert("dev", "db.host", "10.0.0.1").await;
    transport.set_unavailable(true);
    let config = accessor(&transport, &CacheConfig::default());

    let err = config.get_bytes("db.host").await.unwrap_err();
    assert!(matches!(err, ConfigClientError::RemoteUnavailable { .. }));
    assert_eq!(transport.fetch_count("db.host").await, 3);

    let err = config.get_bytes("db.host").await.unwrap_err();
    assert!(err.is_transient(), "failures are not cached");
    assert_eq!(transport.fetch_count("db.host").await, 6);

    transport.set_unavailable(false);
    assert_eq!(config.get_string("db.host").await.unwrap(), "10.0.0.1");
}

#[tokio::test]
async fn test_decode_failure_keeps_raw_bytes_available() {
    let transport = InMemoryTransport::new().shared();
    transport
        .insert("dev", "blob", Bytes::from_static(&[0xff, 0xfe, 0x00]))
        .await;
    transport.insert("dev", "port", "eighty").await;
    let config = accessor(&transport, &CacheConfig::default());

    let err = config.get_string("blob").await.unwrap_err();
    assert!(matches!(err, ConfigClientError::Decode { target: "string", .. }));
    assert_eq!(
        config.get_bytes("blob").await.unwrap(),
        Bytes::from_static(&[0xff, 0xfe, 0x00])
    );

    let err = config.get_int("port").await.unwrap_err();
    assert!(matches!(err, ConfigClientError::Decode { target: "integer", .. }));
    let err = config.get_object::<u16>("port").await.unwrap_err();
    assert!(matches!(err, ConfigClientError::Decode { target: "object", .. }));

    assert_eq!(transport.fetch_count("blob").await, 1);
    assert_eq!(transport.fetch_count("port").await, 1);
}

#[tokio::test]
async fn test_failed_set_is_sent_once() {
    let transport = InMemoryTransport::new().shared();
    transport.set_unavailable(true);
    let config = accessor(&transport, &CacheConfig::default());

    let err = config.set("db.host", "10.0.0.2").await.unwrap_err();
    assert!(err.is_transient());
    assert_eq!(transport.store_count(), 1);
    assert_eq!(transport.value("dev", "db.host").await, None);
}

#[tokio::test]
async fn test_slow_service_times_out_as_unavailable() {
    let transport = InMemoryTransport::new()
        .with_latency(Duration::from_millis(200))
        .shared();
    transport.insert("dev", "slow", "v").await;
    let config = ConfigAccessor::builder(transport.clone())
        .retry(fast_retry(1))
        .request_timeout(Duration::from_millis(20))
        .build();

    let err = config.get_bytes("slow").await.unwrap_err();
    assert!(err.is_transient());
    assert!(err.to_string().contains("timed out"), "got: {err}");
    assert_eq!(transport.fetch_count("slow").await, 2);

    let err = config.set("slow", "v2").await.unwrap_err();
    assert!(err.is_transient());
    assert_eq!(transport.store_count(), 1);
}

#[tokio::test]
async fn test_stale_value_served_during_outage_when_enabled() {
    let ttl = Duration::from_millis(40);
    let transport = InMemoryTransport::new().shared();
    transport.insert("dev", "pool.size", "12").await;

    let lenient = accessor(
        &transport,
        &CacheConfig {
            serve_stale_on_error: true,
            ..cache_config(16, ttl)
        },
    );
    let strict = accessor(&transport, &cache_config(16, ttl));

    assert_eq!(lenient.get_int("pool.size").await.unwrap(), 12);
    assert_eq!(strict.get_int("pool.size").await.unwrap(), 12);
    tokio::time::sleep(ttl * 3).await;
    transport.set_unavailable(true);

    assert_eq!(lenient.get_int("pool.size").await.unwrap(), 12);
    assert!(strict.get_int("pool.size").await.unwrap_err().is_transient());
}

#[tokio::test]
async fn test_stale_fallback_never_masks_missing_keys() {
    let ttl = Duration::from_millis(40);
    let transport = InMemoryTransport::new().shared();
    transport.insert("dev", "retired", "yes").await;
    let config = accessor(
        &transport,
        &CacheConfig {
            serve_stale_on_error: true,
            ..cache_config(16, ttl)
        },
    );

    assert!(config.get_bool("retired").await.unwrap());
    transport.remove("dev", "retired").await;
    tokio::time::sleep(ttl * 3).await;

    assert!(config.get_bool("retired").await.unwrap_err().is_not_found());
}
