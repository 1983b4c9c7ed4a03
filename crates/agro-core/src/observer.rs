//! # Rule Observer
//!
//! Hook invoked around every rule service operation.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  observe("create_farm", fut)                                           │
//! │     │                                                                   │
//! │     ├── observer.before("create_farm")                                 │
//! │     ├── fut.await                                                       │
//! │     └── Ok  → observer.after("create_farm", elapsed)                   │
//! │         Err → observer.on_error("create_farm", &err, elapsed)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Services default to [`TracingObserver`]. Embedders that want metrics or
//! audit trails supply their own implementation via `with_observer`.

use std::future::Future;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::error::{CoreError, CoreResult};

/// Callbacks around rule invocations. Every method defaults to a no-op.
pub trait RuleObserver: Send + Sync {
    fn before(&self, _operation: &'static str) {}

    fn after(&self, _operation: &'static str, _elapsed: Duration) {}

    fn on_error(&self, _operation: &'static str, _error: &CoreError, _elapsed: Duration) {}
}

/// Observer that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl RuleObserver for NoopObserver {}

/// Observer that emits `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl RuleObserver for TracingObserver {
    fn before(&self, operation: &'static str) {
        debug!(operation, "Rule started");
    }

    fn after(&self, operation: &'static str, elapsed: Duration) {
        info!(
            operation,
            elapsed_ms = elapsed_ms(elapsed),
            "Rule completed"
        );
    }

    fn on_error(&self, operation: &'static str, error: &CoreError, elapsed: Duration) {
        warn!(
            operation,
            elapsed_ms = elapsed_ms(elapsed),
            error_kind = error.kind().as_str(),
            error = %error,
            "Rule failed"
        );
    }
}

fn elapsed_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

/// Runs `fut` between the observer's callbacks.
pub(crate) async fn observe<T, F>(
    observer: &dyn RuleObserver,
    operation: &'static str,
    fut: F,
) -> CoreResult<T>
where
    F: Future<Output = CoreResult<T>>,
{
    observer.before(operation);
    let started = Instant::now();

    let result = fut.await;
    let elapsed = started.elapsed();

    match &result {
        Ok(_) => observer.after(operation, elapsed),
        Err(err) => observer.on_error(operation, err, elapsed),
    }

    result
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::error::EntityKind;

    /// Records every callback as "<event>:<operation>".
    #[derive(Debug, Default)]
    pub(crate) struct RecordingObserver {
        pub events: Mutex<Vec<String>>,
    }

    impl RecordingObserver {
        pub fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    impl RuleObserver for RecordingObserver {
        fn before(&self, operation: &'static str) {
            self.events.lock().unwrap().push(format!("before:{operation}"));
        }

        fn after(&self, operation: &'static str, _elapsed: Duration) {
            self.events.lock().unwrap().push(format!("after:{operation}"));
        }

        fn on_error(&self, operation: &'static str, error: &CoreError, _elapsed: Duration) {
            self.events
                .lock()
                .unwrap()
                .push(format!("error:{operation}:{}", error.kind()));
        }
    }

    #[tokio::test]
    async fn test_observe_success() {
        let observer = RecordingObserver::default();
        let value = observe(&observer, "count_farms", async { Ok::<_, CoreError>(3) })
            .await
            .unwrap();

        assert_eq!(value, 3);
        assert_eq!(
            observer.events(),
            vec!["before:count_farms", "after:count_farms"]
        );
    }

    #[tokio::test]
    async fn test_observe_failure() {
        let observer = RecordingObserver::default();
        let result: CoreResult<()> = observe(&observer, "find_farm", async {
            Err(CoreError::not_found(EntityKind::Farm, "f1"))
        })
        .await;

        assert!(result.is_err());
        assert_eq!(
            observer.events(),
            vec!["before:find_farm", "error:find_farm:not_found"]
        );
    }

    #[tokio::test]
    async fn test_default_observers_pass_results_through() {
        let value = observe(&NoopObserver, "noop", async { Ok::<_, CoreError>("x") })
            .await
            .unwrap();
        assert_eq!(value, "x");

        let value = observe(&TracingObserver, "traced", async { Ok::<_, CoreError>(1) })
            .await
            .unwrap();
        assert_eq!(value, 1);
    }

    #[test]
    fn test_elapsed_ms_saturates() {
        assert_eq!(elapsed_ms(Duration::from_millis(1500)), 1500);
        assert_eq!(elapsed_ms(Duration::MAX), u64::MAX);
    }
}
