//! Tests for the cache-aside points forwarder.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use mockall::predicate::eq;
use rstest::{fixture, rstest};
use serde_json::json;

use super::*;
use crate::domain::Point;
use crate::domain::ports::{
    MockPointsBackend, MockPointsCache, PointsBackendError, PointsCacheError, PointsCacheKey,
};

#[fixture]
fn payload() -> PointsPayload {
    PointsPayload::new(vec![
        Point::new(40.7128, -74.006).expect("valid point"),
        Point::new(34.0522, -118.2437).expect("valid point"),
    ])
    .expect("valid payload")
}

fn processed() -> ResponseBody {
    ResponseBody::new(json!({
        "message": "Processed by backend",
        "result": "some_value",
    }))
}

/// In-memory cache recording every write.
#[derive(Default)]
struct RecordingCache {
    entries: Mutex<HashMap<PointsCacheKey, ResponseBody>>,
    writes: AtomicUsize,
}

impl RecordingCache {
    fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PointsCache for RecordingCache {
    async fn get(&self, key: &PointsCacheKey) -> Result<Option<ResponseBody>, PointsCacheError> {
        Ok(self.entries.lock().expect("cache lock").get(key).cloned())
    }

    async fn set(&self, key: &PointsCacheKey, body: &ResponseBody) -> Result<(), PointsCacheError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.entries
            .lock()
            .expect("cache lock")
            .insert(key.clone(), body.clone());
        Ok(())
    }
}

/// Backend replaying scripted outcomes and counting calls.
struct ScriptedBackend {
    outcomes: Mutex<Vec<Result<ResponseBody, PointsBackendError>>>,
    calls: AtomicUsize,
}

impl ScriptedBackend {
    fn new(mut outcomes: Vec<Result<ResponseBody, PointsBackendError>>) -> Self {
        outcomes.reverse();
        Self {
            outcomes: Mutex::new(outcomes),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PointsBackend for ScriptedBackend {
    async fn process(&self, _payload: &PointsPayload) -> Result<ResponseBody, PointsBackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcomes
            .lock()
            .expect("outcomes lock")
            .pop()
            .unwrap_or_else(|| Err(PointsBackendError::transport("no scripted outcome left")))
    }
}

#[rstest]
#[tokio::test]
async fn cache_hit_skips_backend(payload: PointsPayload) {
    let key = fingerprint(&payload);
    let mut cache = MockPointsCache::new();
    cache
        .expect_get()
        .with(eq(key))
        .times(1)
        .return_once(|_| Ok(Some(ResponseBody::new(json!({ "message": "from cache" })))));
    cache.expect_set().times(0);
    let mut backend = MockPointsBackend::new();
    backend.expect_process().times(0);

    let forwarder = CacheAsideForwarder::new(Arc::new(cache), Arc::new(backend));
    let body = forwarder
        .process_points(&payload)
        .await
        .expect("cached body returned");

    assert_eq!(body.as_value(), &json!({ "message": "from cache" }));
}

#[rstest]
#[tokio::test]
async fn cache_miss_forwards_and_stores(payload: PointsPayload) {
    let key = fingerprint(&payload);
    let mut cache = MockPointsCache::new();
    cache.expect_get().times(1).return_once(|_| Ok(None));
    cache
        .expect_set()
        .withf(move |stored_key, body| *stored_key == key && *body == processed())
        .times(1)
        .return_once(|_, _| Ok(()));
    let mut backend = MockPointsBackend::new();
    let expected_payload = payload.clone();
    backend
        .expect_process()
        .withf(move |sent| *sent == expected_payload)
        .times(1)
        .return_once(|_| Ok(processed()));

    let forwarder = CacheAsideForwarder::new(Arc::new(cache), Arc::new(backend));
    let body = forwarder
        .process_points(&payload)
        .await
        .expect("backend body returned");

    assert_eq!(body, processed());
}

#[rstest]
#[case(json!(null))]
#[case(json!(""))]
#[case(json!(false))]
#[tokio::test]
async fn empty_cached_value_is_treated_as_miss(
    payload: PointsPayload,
    #[case] cached: serde_json::Value,
) {
    let mut cache = MockPointsCache::new();
    cache
        .expect_get()
        .times(1)
        .return_once(move |_| Ok(Some(ResponseBody::new(cached))));
    cache.expect_set().times(1).return_once(|_, _| Ok(()));
    let mut backend = MockPointsBackend::new();
    backend
        .expect_process()
        .times(1)
        .return_once(|_| Ok(processed()));

    let forwarder = CacheAsideForwarder::new(Arc::new(cache), Arc::new(backend));
    let body = forwarder
        .process_points(&payload)
        .await
        .expect("backend consulted");

    assert_eq!(body, processed());
}

#[rstest]
#[tokio::test]
async fn backend_failure_is_not_cached(payload: PointsPayload) {
    let mut cache = MockPointsCache::new();
    cache.expect_get().times(1).return_once(|_| Ok(None));
    cache.expect_set().times(0);
    let mut backend = MockPointsBackend::new();
    backend.expect_process().times(1).return_once(|_| {
        Err(PointsBackendError::rejected(
            500_u16,
            Some(json!({ "error": "X" })),
        ))
    });

    let forwarder = CacheAsideForwarder::new(Arc::new(cache), Arc::new(backend));
    let error = forwarder
        .process_points(&payload)
        .await
        .expect_err("backend failure surfaces");

    assert_eq!(error.status(), 500);
    assert_eq!(error.detail(), Some(&json!({ "error": "X" })));
}

#[rstest]
#[tokio::test]
async fn connection_failure_surfaces_generic_error(payload: PointsPayload) {
    let mut cache = MockPointsCache::new();
    cache.expect_get().times(1).return_once(|_| Ok(None));
    cache.expect_set().times(0);
    let mut backend = MockPointsBackend::new();
    backend
        .expect_process()
        .times(1)
        .return_once(|_| Err(PointsBackendError::transport("Network Error")));

    let forwarder = CacheAsideForwarder::new(Arc::new(cache), Arc::new(backend));
    let error = forwarder
        .process_points(&payload)
        .await
        .expect_err("transport failure surfaces");

    assert_eq!(error, ProcessingError::generic());
    assert_eq!(error.message(), "Failed to process points.");
}

#[rstest]
#[tokio::test]
async fn cache_read_failure_falls_through_to_backend(payload: PointsPayload) {
    let mut cache = MockPointsCache::new();
    cache
        .expect_get()
        .times(1)
        .return_once(|_| Err(PointsCacheError::backend("connection reset")));
    cache.expect_set().times(1).return_once(|_, _| Ok(()));
    let mut backend = MockPointsBackend::new();
    backend
        .expect_process()
        .times(1)
        .return_once(|_| Ok(processed()));

    let forwarder = CacheAsideForwarder::new(Arc::new(cache), Arc::new(backend));
    let body = forwarder
        .process_points(&payload)
        .await
        .expect("backend body returned");

    assert_eq!(body, processed());
}

#[rstest]
#[tokio::test]
async fn cache_write_failure_still_returns_body(payload: PointsPayload) {
    let mut cache = MockPointsCache::new();
    cache.expect_get().times(1).return_once(|_| Ok(None));
    cache
        .expect_set()
        .times(1)
        .return_once(|_, _| Err(PointsCacheError::serialization("bad bytes")));
    let mut backend = MockPointsBackend::new();
    backend
        .expect_process()
        .times(1)
        .return_once(|_| Ok(processed()));

    let forwarder = CacheAsideForwarder::new(Arc::new(cache), Arc::new(backend));
    let body = forwarder
        .process_points(&payload)
        .await
        .expect("backend body returned");

    assert_eq!(body, processed());
}

#[rstest]
#[tokio::test]
async fn second_identical_call_is_served_from_cache(payload: PointsPayload) {
    let cache = Arc::new(RecordingCache::default());
    let backend = Arc::new(ScriptedBackend::new(vec![Ok(processed())]));
    let forwarder = CacheAsideForwarder::new(Arc::clone(&cache), Arc::clone(&backend));

    let first = forwarder
        .process_points(&payload)
        .await
        .expect("first call succeeds");
    assert_eq!(backend.calls(), 1);
    assert_eq!(cache.writes(), 1);

    let second = forwarder
        .process_points(&payload.clone())
        .await
        .expect("second call succeeds");
    assert_eq!(backend.calls(), 1, "second call must not reach the backend");
    assert_eq!(cache.writes(), 1);
    assert_eq!(first, second);
    assert_eq!(second, processed());
}

#[rstest]
#[tokio::test]
async fn retry_after_failure_calls_backend_again(payload: PointsPayload) {
    let cache = Arc::new(RecordingCache::default());
    let backend = Arc::new(ScriptedBackend::new(vec![
        Err(PointsBackendError::transport("connection refused")),
        Ok(processed()),
    ]));
    let forwarder = CacheAsideForwarder::new(Arc::clone(&cache), Arc::clone(&backend));

    forwarder
        .process_points(&payload)
        .await
        .expect_err("first call fails");
    assert_eq!(cache.writes(), 0);

    let body = forwarder
        .process_points(&payload)
        .await
        .expect("retry succeeds");
    assert_eq!(backend.calls(), 2);
    assert_eq!(cache.writes(), 1);
    assert_eq!(body, processed());
}

#[rstest]
#[tokio::test]
async fn distinct_payloads_are_cached_separately(payload: PointsPayload) {
    let cache = Arc::new(RecordingCache::default());
    let backend = Arc::new(ScriptedBackend::new(vec![
        Ok(processed()),
        Ok(ResponseBody::new(json!({ "result": "other" }))),
    ]));
    let forwarder = CacheAsideForwarder::new(Arc::clone(&cache), Arc::clone(&backend));
    let reversed = PointsPayload::new(payload.points().iter().rev().copied().collect())
        .expect("valid payload");

    let first = forwarder.process_points(&payload).await.expect("first");
    let second = forwarder.process_points(&reversed).await.expect("second");

    assert_eq!(backend.calls(), 2);
    assert_eq!(first, processed());
    assert_eq!(second.as_value(), &json!({ "result": "other" }));
}
