#![allow(dead_code)]

use roomcast::error::{ReportError, SourceError};
use roomcast::services::map::client::{LocationPayload, LocationReporter, ReportReceipt};
use roomcast::source::VariableSource;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Scripted stand-in for the map service.
/// Pops one scripted reply per call; once the script runs out every call succeeds with 200.
#[derive(Default)]
pub struct ScriptedReporter {
    script: Mutex<VecDeque<Result<ReportReceipt, ReportError>>>,
    calls: Mutex<Vec<LocationPayload>>,
}

impl ScriptedReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then_status(self, status: u16) -> Self {
        let reply = if (200..300).contains(&status) {
            Ok(ReportReceipt { status, body: "ok".to_string() })
        } else {
            Err(ReportError::Status { status, body: "scripted failure".to_string() })
        };
        self.script.lock().unwrap().push_back(reply);
        self
    }

    pub fn then_timeout(self) -> Self {
        self.script.lock().unwrap().push_back(Err(ReportError::Timeout));
        self
    }

    pub fn calls(&self) -> Vec<LocationPayload> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl LocationReporter for ScriptedReporter {
    async fn report(&self, payload: &LocationPayload) -> Result<ReportReceipt, ReportError> {
        self.calls.lock().unwrap().push(payload.clone());
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(ReportReceipt { status: 200, body: "ok".to_string() }))
    }
}

/// Panics on the first call, succeeds afterwards.
#[derive(Default)]
pub struct PanicOnceReporter {
    calls: AtomicUsize,
}

impl PanicOnceReporter {
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LocationReporter for PanicOnceReporter {
    async fn report(&self, _payload: &LocationPayload) -> Result<ReportReceipt, ReportError> {
        let previous = self.calls.fetch_add(1, Ordering::SeqCst);
        if previous == 0 {
            panic!("reporter blew up");
        }
        Ok(ReportReceipt { status: 201, body: "created".to_string() })
    }
}

/// Holds every call open for `delay` and tracks how many overlap.
pub struct SlowReporter {
    delay: Duration,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl SlowReporter {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl LocationReporter for SlowReporter {
    async fn report(&self, _payload: &LocationPayload) -> Result<ReportReceipt, ReportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(ReportReceipt { status: 200, body: "ok".to_string() })
    }
}

/// Variable source that is always unavailable.
pub struct FailingSource;

impl VariableSource for FailingSource {
    fn get(&self, _name: &str) -> Result<Option<Value>, SourceError> {
        Err(SourceError::Unavailable("store offline".to_string()))
    }
}
