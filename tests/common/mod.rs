//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use tracing::field::{Field, Visit};
use tracing::Event;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use broker_extensions::middleware::initialize_prometheus_exporter;
use broker_extensions::{handler_fn, BrokerError, Next};

/// Installs the Prometheus recorder once per test binary and returns the
/// shared render handle. Tests must use unique action names to keep their
/// label series independent.
pub fn prometheus_handle() -> &'static PrometheusHandle {
    static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
    HANDLE.get_or_init(|| {
        initialize_prometheus_exporter().expect("prometheus recorder installs once")
    })
}

/// Handler that succeeds, echoing the action params, and counts its calls.
pub fn echo_handler() -> (Next, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let observed = Arc::clone(&calls);
    let handler = handler_fn(move |action| {
        let observed = Arc::clone(&observed);
        async move {
            observed.fetch_add(1, Ordering::SeqCst);
            Ok(json!({ "echo": action.params }))
        }
    });
    (handler, calls)
}

/// Handler that always fails with the given message.
pub fn failing_handler(message: &'static str) -> Next {
    handler_fn(move |_action| async move { Err(BrokerError::handler(message)) })
}

/// Layer that collects the message text of every emitted event.
struct CollectingLayer {
    messages: Arc<Mutex<Vec<String>>>,
}

impl<S: tracing::Subscriber> Layer<S> for CollectingLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor(None);
        event.record(&mut visitor);
        if let Some(message) = visitor.0 {
            self.messages.lock().unwrap().push(message);
        }
    }
}

struct MessageVisitor(Option<String>);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = Some(format!("{value:?}"));
        }
    }
}

/// Runs `f` under a capturing subscriber and returns its result together
/// with the message of every event emitted while it ran. Scoped to the
/// calling thread, so async work must be driven on a current-thread
/// runtime inside `f`.
pub fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, Vec<String>) {
    let messages: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let layer = CollectingLayer { messages: Arc::clone(&messages) };
    let subscriber = tracing_subscriber::registry().with(layer);

    let result = tracing::subscriber::with_default(subscriber, f);

    let collected = messages.lock().unwrap().clone();
    (result, collected)
}

/// Occurrences of `message` in a captured log sequence
pub fn count_of(messages: &[String], message: &str) -> usize {
    messages.iter().filter(|m| m.as_str() == message).count()
}
