/**
 * Idempotency Cache
 *
 * Replays mutating responses for retried requests. A client sends an
 * opaque token in the `Idempotency-Key` header; the first request bearing
 * the token runs its operation and the produced response (status, body
 * bytes, content type) is cached. Every later request with the same token
 * gets the cached response verbatim and the operation never runs again.
 * Error responses are cached and replayed exactly like successes.
 *
 * # Same-token races
 *
 * Each token owns a slot guarded by an async mutex. A request locks its
 * token's slot before deciding between replay and execute, so two
 * concurrent requests with the same fresh token serialize: the second one
 * blocks until the first result is cached, then replays it. The operation
 * runs at most once per token.
 *
 * # Scope and lifetime
 *
 * The cache is process-lifetime, unbounded, and global: a token is not
 * scoped to an endpoint or resource. Two clients reusing a token across
 * different endpoints will collide, and entries are never evicted; both
 * are accepted limitations rather than bugs to fix here.
 */

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex as StdMutex};

use axum::body::{to_bytes, Body};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::Response;
use bytes::Bytes;
use tokio::sync::Mutex;

/// Header carrying the client-supplied idempotency token.
pub const IDEMPOTENCY_HEADER: &str = "idempotency-key";

/// A buffered response, immutable once stored.
#[derive(Debug, Clone)]
struct StoredResponse {
    status: StatusCode,
    body: Bytes,
    content_type: Option<HeaderValue>,
}

impl StoredResponse {
    async fn buffer(response: Response) -> Self {
        let (parts, body) = response.into_parts();
        let body = match to_bytes(body, usize::MAX).await {
            Ok(bytes) => bytes,
            Err(err) => {
                // Handler bodies are in-memory; hitting this means a
                // handler streamed something it should not have.
                tracing::error!("failed to buffer response for idempotency cache: {err}");
                Bytes::new()
            }
        };
        Self {
            status: parts.status,
            body,
            content_type: parts.headers.get(CONTENT_TYPE).cloned(),
        }
    }

    fn to_response(&self) -> Response {
        let mut response = Response::new(Body::from(self.body.clone()));
        *response.status_mut() = self.status;
        if let Some(content_type) = &self.content_type {
            response
                .headers_mut()
                .insert(CONTENT_TYPE, content_type.clone());
        }
        response
    }
}

/// Token → cached response map with per-token serialization.
pub struct IdempotencyCache {
    slots: StdMutex<HashMap<String, Arc<Mutex<Option<StoredResponse>>>>>,
}

impl IdempotencyCache {
    pub fn new() -> Self {
        Self {
            slots: StdMutex::new(HashMap::new()),
        }
    }

    /// Run `operation` under the token's slot, or replay a cached result.
    ///
    /// Without a token the operation runs unconditionally and nothing is
    /// cached.
    pub async fn execute<F, Fut>(&self, token: Option<String>, operation: F) -> Response
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Response>,
    {
        let Some(token) = token else {
            return operation().await;
        };

        let slot = {
            let mut slots = self.slots.lock().expect("idempotency slot map poisoned");
            slots.entry(token.clone()).or_default().clone()
        };

        // Holding the slot across the operation is what serializes
        // concurrent requests with the same token.
        let mut entry = slot.lock().await;
        if let Some(stored) = entry.as_ref() {
            tracing::debug!(token = %token, "replaying cached idempotent response");
            return stored.to_response();
        }

        let stored = StoredResponse::buffer(operation().await).await;
        let response = stored.to_response();
        *entry = Some(stored);
        response
    }
}

impl Default for IdempotencyCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Pull the idempotency token out of request headers, if any.
pub fn token_from_headers(headers: &axum::http::HeaderMap) -> Option<String> {
    headers
        .get(IDEMPOTENCY_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn json_response(status: StatusCode, body: &str) -> Response {
        let mut response = Response::new(Body::from(body.to_string()));
        *response.status_mut() = status;
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        response
    }

    async fn body_bytes(response: Response) -> Bytes {
        to_bytes(response.into_body(), usize::MAX).await.unwrap()
    }

    #[tokio::test]
    async fn no_token_never_caches() {
        let cache = IdempotencyCache::new();
        let calls = AtomicUsize::new(0);
        for _ in 0..3 {
            cache
                .execute(None, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    json_response(StatusCode::CREATED, "{}")
                })
                .await;
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn retry_replays_identical_bytes_without_rerunning() {
        let cache = IdempotencyCache::new();
        let calls = AtomicUsize::new(0);

        let run = || {
            cache.execute(Some("tok-1".into()), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                json_response(StatusCode::CREATED, r#"{"id":"first"}"#)
            })
        };
        let first = run().await;
        let second = run().await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(first.status(), StatusCode::CREATED);
        assert_eq!(second.status(), StatusCode::CREATED);
        assert_eq!(
            second.headers().get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(body_bytes(first).await, body_bytes(second).await);
    }

    #[tokio::test]
    async fn distinct_tokens_do_not_share_results() {
        let cache = IdempotencyCache::new();
        let calls = AtomicUsize::new(0);
        for token in ["a", "b"] {
            cache
                .execute(Some(token.into()), || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    json_response(StatusCode::OK, "{}")
                })
                .await;
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn error_outcomes_replay_like_successes() {
        let cache = IdempotencyCache::new();
        let calls = AtomicUsize::new(0);

        let run = || {
            cache.execute(Some("tok-err".into()), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                json_response(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    r#"{"error":{"code":"validation_error"}}"#,
                )
            })
        };
        let first = run().await;
        let second = run().await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(first.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(second.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_bytes(first).await, body_bytes(second).await);
    }

    #[tokio::test]
    async fn concurrent_same_token_runs_operation_once() {
        let cache = Arc::new(IdempotencyCache::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = cache.clone();
            let calls = calls.clone();
            handles.push(tokio::spawn(async move {
                let response = cache
                    .execute(Some("shared".into()), || async {
                        calls.fetch_add(1, Ordering::SeqCst);
                        // Widen the race window.
                        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
                        json_response(StatusCode::CREATED, r#"{"winner":true}"#)
                    })
                    .await;
                body_bytes(response).await
            }));
        }

        let mut bodies = Vec::new();
        for handle in handles {
            bodies.push(handle.await.unwrap());
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(bodies.windows(2).all(|pair| pair[0] == pair[1]));
    }

    #[tokio::test]
    async fn token_extraction() {
        let mut headers = axum::http::HeaderMap::new();
        assert_eq!(token_from_headers(&headers), None);

        headers.insert(IDEMPOTENCY_HEADER, HeaderValue::from_static("abc"));
        assert_eq!(token_from_headers(&headers), Some("abc".to_string()));

        headers.insert(IDEMPOTENCY_HEADER, HeaderValue::from_static(""));
        assert_eq!(token_from_headers(&headers), None);
    }
}
