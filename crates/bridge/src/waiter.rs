//! Cooperative wait for authentication to complete.

use std::time::Duration;

use {serde::Serialize, tracing::debug};

use crate::status::{StatusSnapshot, StatusSource};

/// Terminal states a wait can end in. Running out the clock is a normal
/// outcome here, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitStatus {
    Connected,
    Timeout,
}

/// What `wait_for_connection` reports back.
#[derive(Debug, Clone, Serialize)]
pub struct WaitOutcome {
    pub success: bool,
    pub status: WaitStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

/// Poll `source` until it reports connected or `timeout` elapses.
///
/// The whole wait is one ordinary future: suspension only happens in the
/// inter-poll sleep, and the surrounding `tokio::time::timeout` makes expiry
/// (and caller-side cancellation) cut in at the next await point — no
/// dedicated thread, no busy loop.
pub async fn wait_for_connection(
    source: &dyn StatusSource,
    timeout: Duration,
    poll_interval: Duration,
) -> WaitOutcome {
    let poll = async {
        loop {
            let snapshot = source.resolve().await;
            if snapshot.is_connected() {
                return snapshot;
            }
            debug!(state = %snapshot.state(), "still waiting for connection");
            tokio::time::sleep(poll_interval).await;
        }
    };

    match tokio::time::timeout(timeout, poll).await {
        Ok(snapshot) => connected_outcome(&snapshot),
        Err(_) => WaitOutcome {
            success: false,
            status: WaitStatus::Timeout,
            message: format!(
                "timed out waiting for WhatsApp connection after {} seconds",
                timeout.as_secs()
            ),
            phone_number: None,
        },
    }
}

fn connected_outcome(snapshot: &StatusSnapshot) -> WaitOutcome {
    WaitOutcome {
        success: true,
        status: WaitStatus::Connected,
        message: "WhatsApp is now connected".into(),
        phone_number: snapshot.phone_number().map(str::to_owned),
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicU32, Ordering},
        time::Instant,
    };

    use async_trait::async_trait;

    use super::*;

    /// Scripted source: disconnected for the first `flips_after` polls, then
    /// connected forever.
    struct FlippingSource {
        polls: AtomicU32,
        flips_after: u32,
    }

    impl FlippingSource {
        fn new(flips_after: u32) -> Self {
            Self {
                polls: AtomicU32::new(0),
                flips_after,
            }
        }
    }

    #[async_trait]
    impl StatusSource for FlippingSource {
        async fn resolve(&self) -> StatusSnapshot {
            let n = self.polls.fetch_add(1, Ordering::SeqCst);
            if n >= self.flips_after {
                StatusSnapshot::connected(Some("+15551234567".into()))
            } else {
                StatusSnapshot::disconnected("not yet")
            }
        }
    }

    #[tokio::test]
    async fn never_connecting_source_times_out_near_the_budget() {
        let source = FlippingSource::new(u32::MAX);
        let started = Instant::now();
        let outcome = wait_for_connection(
            &source,
            Duration::from_millis(300),
            Duration::from_millis(50),
        )
        .await;

        assert!(!outcome.success);
        assert_eq!(outcome.status, WaitStatus::Timeout);
        assert!(outcome.phone_number.is_none());
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(300));
        assert!(elapsed < Duration::from_millis(700), "overshot: {elapsed:?}");
    }

    #[tokio::test]
    async fn connection_mid_wait_is_detected_promptly() {
        // Connects on the fifth poll — ~200 ms in at a 50 ms interval.
        let source = FlippingSource::new(4);
        let started = Instant::now();
        let outcome = wait_for_connection(
            &source,
            Duration::from_secs(5),
            Duration::from_millis(50),
        )
        .await;

        assert!(outcome.success);
        assert_eq!(outcome.status, WaitStatus::Connected);
        assert_eq!(outcome.phone_number.as_deref(), Some("+15551234567"));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn already_connected_returns_without_sleeping() {
        let source = FlippingSource::new(0);
        let started = Instant::now();
        let outcome =
            wait_for_connection(&source, Duration::from_secs(5), Duration::from_secs(2)).await;

        assert!(outcome.success);
        assert!(started.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn timeout_message_names_the_budget() {
        let source = FlippingSource::new(u32::MAX);
        let outcome = wait_for_connection(
            &source,
            Duration::from_secs(1),
            Duration::from_millis(200),
        )
        .await;
        assert!(outcome.message.contains("after 1 seconds") || outcome.message.contains("1 second"));
    }
}
