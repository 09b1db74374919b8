//! Retry wrapper for rollup transport operations.

use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::warn;

use crate::domain::{AppError, FinishStatus, RollupConfig, RollupRequest};
use crate::ports::RollupTransport;

const DEFAULT_MAX_DELAY_MS: u64 = 30_000;
const MAX_LOG_ERROR_CHARS: usize = 512;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay_ms: u64,
    max_delay_ms: u64,
}

impl RetryPolicy {
    pub fn from_config(config: &RollupConfig) -> Self {
        Self {
            max_attempts: config.max_retries.max(1),
            base_delay_ms: config.retry_delay_ms.max(1),
            max_delay_ms: DEFAULT_MAX_DELAY_MS.max(config.retry_delay_ms),
        }
    }

    fn delay_for_retry(&self, failed_attempt: u32) -> Duration {
        // attempt=1 -> base, attempt=2 -> base*2, attempt=3 -> base*4, capped.
        let exponent = failed_attempt.saturating_sub(1).min(6);
        let multiplier = 1_u64 << exponent;
        let backoff_ms = self.base_delay_ms.saturating_mul(multiplier).min(self.max_delay_ms);
        let jitter_ms = compute_jitter_ms(backoff_ms);
        Duration::from_millis(backoff_ms.saturating_add(jitter_ms).min(self.max_delay_ms))
    }
}

/// Retries transient transport failures with capped exponential backoff.
///
/// `finish` is retried only when the connection could not be established. Any other
/// failure may have reached the host, and sending the status again would settle an
/// input that was never processed.
pub struct RetryingRollupTransport {
    inner: Box<dyn RollupTransport>,
    policy: RetryPolicy,
}

impl RetryingRollupTransport {
    pub fn new(inner: Box<dyn RollupTransport>, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    fn with_retry<T>(
        &self,
        operation: &str,
        retryable: fn(&AppError) -> bool,
        mut call: impl FnMut() -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let mut attempt = 1;
        loop {
            match call() {
                Ok(value) => return Ok(value),
                Err(error) => {
                    if !retryable(&error) || attempt >= self.policy.max_attempts {
                        return Err(error);
                    }

                    let delay = self.policy.delay_for_retry(attempt);
                    warn!(
                        "Rollup {} failed (attempt {}/{}): {}. Retrying in {} ms.",
                        operation,
                        attempt,
                        self.policy.max_attempts,
                        format_error_for_log(&error),
                        delay.as_millis()
                    );
                    thread::sleep(delay);
                    attempt += 1;
                }
            }
        }
    }
}

impl RollupTransport for RetryingRollupTransport {
    fn finish(&self, status: FinishStatus) -> Result<Option<RollupRequest>, AppError> {
        self.with_retry("finish", AppError::is_unsent, || self.inner.finish(status))
    }

    fn notice(&self, payload: &str) -> Result<(), AppError> {
        self.with_retry("notice", AppError::is_transient, || self.inner.notice(payload))
    }

    fn report(&self, payload: &str) -> Result<(), AppError> {
        self.with_retry("report", AppError::is_transient, || self.inner.report(payload))
    }
}

fn compute_jitter_ms(backoff_ms: u64) -> u64 {
    if backoff_ms <= 1 {
        return 0;
    }

    let jitter_cap = backoff_ms / 4; // 25% jitter upper bound
    if jitter_cap == 0 {
        return 0;
    }

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.subsec_nanos() as u64)
        .unwrap_or(0);

    nanos % jitter_cap
}

fn format_error_for_log(error: &AppError) -> String {
    match error {
        AppError::Transport { message, status } => {
            let sanitized = sanitize_and_truncate_for_log(message);
            match status {
                Some(code) => format!("Transport(status={}): {}", code, sanitized),
                None => format!("Transport: {}", sanitized),
            }
        }
        _ => sanitize_and_truncate_for_log(&error.to_string()),
    }
}

fn sanitize_and_truncate_for_log(input: &str) -> String {
    let mut output = String::new();

    for (count, ch) in input.chars().enumerate() {
        if count >= MAX_LOG_ERROR_CHARS {
            break;
        }
        output.push(if ch.is_control() { ' ' } else { ch });
    }

    let mut compact = output.split_whitespace().collect::<Vec<_>>().join(" ");
    if input.chars().count() > MAX_LOG_ERROR_CHARS {
        compact.push_str(" [truncated]");
    }
    compact.trim().to_string()
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Instant;

    use url::Url;

    use super::*;
    use crate::adapters::HttpRollupTransport;

    struct SequenceTransport {
        attempts: Arc<AtomicUsize>,
        responses: Mutex<Vec<Result<Option<RollupRequest>, AppError>>>,
    }

    impl SequenceTransport {
        fn new(responses: Vec<Result<Option<RollupRequest>, AppError>>) -> Self {
            Self { attempts: Arc::new(AtomicUsize::new(0)), responses: Mutex::new(responses) }
        }
    }

    impl RollupTransport for SequenceTransport {
        fn finish(&self, _status: FinishStatus) -> Result<Option<RollupRequest>, AppError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            let mut guard = self.responses.lock().expect("responses lock poisoned");
            if guard.is_empty() {
                return Err(AppError::transport("test: unexpected extra call", Some(500)));
            }
            guard.remove(0)
        }

        fn notice(&self, _payload: &str) -> Result<(), AppError> {
            self.finish(FinishStatus::Accept).map(|_| ())
        }

        fn report(&self, _payload: &str) -> Result<(), AppError> {
            self.finish(FinishStatus::Accept).map(|_| ())
        }
    }

    fn policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy { max_attempts, base_delay_ms: 1, max_delay_ms: 2 }
    }

    #[test]
    fn retries_transient_failures_and_succeeds() {
        let inner = SequenceTransport::new(vec![
            Err(AppError::transport("server error", Some(500))),
            Err(AppError::Connection("refused".into())),
            Err(AppError::Timeout("no response".into())),
            Ok(None),
        ]);
        let transport = RetryingRollupTransport::new(Box::new(inner), policy(4));

        transport.notice("x").unwrap();
    }

    #[test]
    fn finish_retries_only_unsent_requests() {
        let inner = SequenceTransport::new(vec![
            Err(AppError::Connection("refused".into())),
            Ok(None),
        ]);
        let transport = RetryingRollupTransport::new(Box::new(inner), policy(3));
        assert_eq!(transport.finish(FinishStatus::Accept).unwrap(), None);

        for delivered in [
            AppError::transport("server error", Some(503)),
            AppError::Timeout("no response".into()),
        ] {
            let inner = SequenceTransport::new(vec![Err(delivered), Ok(None)]);
            let attempts = Arc::clone(&inner.attempts);
            let transport = RetryingRollupTransport::new(Box::new(inner), policy(3));

            assert!(transport.finish(FinishStatus::Reject).is_err());
            assert_eq!(attempts.load(Ordering::SeqCst), 1);
        }
    }

    #[test]
    fn closed_port_is_retried_with_backoff() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let config = RollupConfig {
            server_url: Url::parse(&format!("http://127.0.0.1:{}", port)).unwrap(),
            timeout_secs: 1,
            max_retries: 3,
            retry_delay_ms: 50,
        };
        let inner = HttpRollupTransport::new(&config).unwrap();
        let transport =
            RetryingRollupTransport::new(Box::new(inner), RetryPolicy::from_config(&config));

        let started = Instant::now();
        let err = transport.finish(FinishStatus::Accept).unwrap_err();
        assert!(matches!(err, AppError::Connection(_)), "got {:?}", err);
        // Two backoffs: 50 ms then 100 ms.
        assert!(started.elapsed() >= Duration::from_millis(150));

        let started = Instant::now();
        assert!(transport.notice("hello").is_err());
        assert!(started.elapsed() >= Duration::from_millis(150));
    }

    #[test]
    fn does_not_retry_on_non_retryable_error() {
        let inner = SequenceTransport::new(vec![
            Err(AppError::transport("invalid request", Some(400))),
            Ok(None),
        ]);
        let transport = RetryingRollupTransport::new(Box::new(inner), policy(3));

        match transport.notice("x").unwrap_err() {
            AppError::Transport { status, .. } => assert_eq!(status, Some(400)),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn protocol_errors_are_not_retried() {
        let inner =
            SequenceTransport::new(vec![Err(AppError::Protocol("garbage".into())), Ok(None)]);
        let transport = RetryingRollupTransport::new(Box::new(inner), policy(3));

        assert!(matches!(transport.finish(FinishStatus::Accept), Err(AppError::Protocol(_))));
    }

    #[test]
    fn stops_after_max_attempts() {
        let inner = SequenceTransport::new(vec![
            Err(AppError::transport("server error", Some(503))),
            Err(AppError::transport("server error", Some(503))),
            Err(AppError::transport("server error", Some(503))),
            Ok(None),
        ]);
        let attempts = Arc::clone(&inner.attempts);
        let transport = RetryingRollupTransport::new(Box::new(inner), policy(3));

        assert!(transport.report("x").is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn backoff_is_capped() {
        let policy = RetryPolicy { max_attempts: 10, base_delay_ms: 1_000, max_delay_ms: 4_000 };
        assert!(policy.delay_for_retry(1) >= Duration::from_millis(1_000));
        assert_eq!(policy.delay_for_retry(9), Duration::from_millis(4_000));
    }

    #[test]
    fn log_format_sanitizes_control_characters() {
        let err = AppError::transport("bad\nerror\twith\rcontrols", Some(500));
        let formatted = format_error_for_log(&err);
        assert!(formatted.contains("Transport(status=500):"));
        assert!(!formatted.contains('\n'));
        assert!(!formatted.contains('\r'));
    }
}
