#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use geodash::models::{AmenityKind, PredictionRequest, PredictionResponse};
use geodash::parsing::RawProperties;
use geodash::services::ForecastTransport;
use geodash::ForecastResult;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// Restores variables on unwind and serializes access to process-global env
/// vars, since tests run in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// Feature properties as the map layer delivers them, concatenated price blob included.
pub fn sample_properties() -> RawProperties {
    object(json!({
        "AreaName": "Dubai Marina",
        "ZoneIndex": 12,
        "Hospital": 1,
        "metro": 2,
        "School": "3",
        "Park": 4,
        "ActualPrice": "{\"1 B/R\": {\"2021\": 80000, \"2022\": 85000}}{\"2 B/R\": {\"2021\": 120000, \"2022\": 126000}}",
        "PredictPrice": "{\"1 B/R\": {\"2023\": 90000, \"2024\": 94000}}{\"2 B/R\": {\"2023\": 131000, \"2024\": 137000}}"
    }))
}

pub fn object(value: Value) -> RawProperties {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {}", other),
    }
}

/// Answers every request with one point per year after the latest
/// predicted year, priced at `1000 * metro count`. Requests with an odd
/// metro count are answered after `slow_delay`.
pub struct ScriptedTransport {
    pub slow_delay: Duration,
    pub requests: Mutex<Vec<PredictionRequest>>,
}

impl ScriptedTransport {
    pub fn new(slow_delay: Duration) -> Self {
        Self {
            slow_delay,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }
}

#[async_trait]
impl ForecastTransport for ScriptedTransport {
    async fn fetch(&self, request: &PredictionRequest) -> ForecastResult<PredictionResponse> {
        if let Ok(mut seen) = self.requests.lock() {
            seen.push(request.clone());
        }

        let metro = request.amenities_counter.get(AmenityKind::Metro);
        if metro % 2 == 1 {
            tokio::time::sleep(self.slow_delay).await;
        }

        let start: i64 = request
            .predict_price
            .keys()
            .next_back()
            .and_then(|y| y.as_str().parse().ok())
            .unwrap_or(2024);
        let body = json!({
            "forecast": [
                {"year": start + 1, "price": 1000.0 * f64::from(metro)},
                {"year": (start + 2).to_string(), "price": 1000.0 * f64::from(metro)}
            ]
        });
        serde_json::from_value(body).map_err(|e| geodash::ForecastError::Decode(e.to_string()))
    }
}

/// Serve `router` on an ephemeral local port and return its base URL.
#[cfg(feature = "http-server")]
pub async fn spawn_stub_server(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    format!("http://{}", addr)
}
