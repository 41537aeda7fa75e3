//! Runtime configuration with sensible defaults.

// Layer 1: Standard library imports
use std::time::Duration;

/// Default idle-poll cadence for the quiescence-watching loop.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Default cadence at which the driver logs a "still waiting" liveness
/// diagnostic while polling for quiescence.
pub const DEFAULT_LIVENESS_LOG_INTERVAL: Duration = Duration::from_secs(2);

/// Runtime-wide configuration.
///
/// # Examples
///
/// ```rust
/// use mote_rt::system::SystemConfig;
///
/// let config = SystemConfig::default();
/// assert!(config.worker_count.is_none());
///
/// let config = SystemConfig::builder()
///     .with_worker_count(4)
///     .build()
///     .unwrap();
/// assert_eq!(config.worker_count, Some(4));
/// ```
#[derive(Debug, Clone)]
pub struct SystemConfig {
    /// Fixed worker pool size. `None` resolves to the `WORKERS` environment
    /// variable, then to the host's available parallelism at startup.
    pub worker_count: Option<usize>,

    /// Wall-clock ceiling on the whole run. `None` means no timeout.
    pub timeout: Option<Duration>,

    /// Cadence of the idle-poll loop the driver uses while waiting for
    /// quiescence.
    pub poll_interval: Duration,

    /// Cadence of the "still waiting" liveness diagnostic.
    pub liveness_log_interval: Duration,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            worker_count: None,
            timeout: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            liveness_log_interval: DEFAULT_LIVENESS_LOG_INTERVAL,
        }
    }
}

impl SystemConfig {
    pub fn builder() -> SystemConfigBuilder {
        SystemConfigBuilder::default()
    }

    /// Resolve `worker_count`: an explicit value wins, then the `WORKERS`
    /// environment variable, then the host's available parallelism (and
    /// finally 1 if that cannot be determined either).
    pub fn resolved_worker_count(&self) -> usize {
        if let Some(count) = self.worker_count {
            return count;
        }
        if let Some(count) = Self::workers_from_env() {
            return count;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }

    /// Parse the `WORKERS` environment variable, if set and valid. A
    /// present-but-unparsable or zero value is ignored in favor of the next
    /// fallback rather than failing the run outright.
    fn workers_from_env() -> Option<usize> {
        std::env::var("WORKERS")
            .ok()
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|&count| count > 0)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.worker_count == Some(0) {
            return Err("worker_count must be > 0 when set".to_string());
        }
        if self.poll_interval.is_zero() {
            return Err("poll_interval must be > 0".to_string());
        }
        if self.liveness_log_interval.is_zero() {
            return Err("liveness_log_interval must be > 0".to_string());
        }
        Ok(())
    }
}

/// Builder for [`SystemConfig`].
#[derive(Debug, Default)]
pub struct SystemConfigBuilder {
    config: SystemConfig,
}

impl SystemConfigBuilder {
    pub fn with_worker_count(mut self, count: usize) -> Self {
        self.config.worker_count = Some(count);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval = interval;
        self
    }

    pub fn with_liveness_log_interval(mut self, interval: Duration) -> Self {
        self.config.liveness_log_interval = interval;
        self
    }

    pub fn build(self) -> Result<SystemConfig, String> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// `WORKERS` is process-global state; serialize the tests that touch it
    /// so they don't interfere with each other across threads.
    static WORKERS_ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn default_has_no_timeout_and_no_fixed_worker_count() {
        let config = SystemConfig::default();
        assert!(config.timeout.is_none());
        assert!(config.worker_count.is_none());
    }

    #[test]
    fn resolved_worker_count_respects_explicit_override() {
        let _guard = WORKERS_ENV_LOCK.lock().unwrap();
        unsafe { std::env::remove_var("WORKERS") };
        let config = SystemConfig::builder().with_worker_count(3).build().unwrap();
        assert_eq!(config.resolved_worker_count(), 3);
    }

    #[test]
    fn resolved_worker_count_falls_back_to_hardware_parallelism() {
        let _guard = WORKERS_ENV_LOCK.lock().unwrap();
        unsafe { std::env::remove_var("WORKERS") };
        let config = SystemConfig::default();
        assert!(config.resolved_worker_count() >= 1);
    }

    #[test]
    fn resolved_worker_count_reads_workers_env_var_when_unset() {
        let _guard = WORKERS_ENV_LOCK.lock().unwrap();
        unsafe { std::env::set_var("WORKERS", "5") };
        let config = SystemConfig::default();
        assert_eq!(config.resolved_worker_count(), 5);
        unsafe { std::env::remove_var("WORKERS") };
    }

    #[test]
    fn explicit_worker_count_wins_over_workers_env_var() {
        let _guard = WORKERS_ENV_LOCK.lock().unwrap();
        unsafe { std::env::set_var("WORKERS", "5") };
        let config = SystemConfig::builder().with_worker_count(2).build().unwrap();
        assert_eq!(config.resolved_worker_count(), 2);
        unsafe { std::env::remove_var("WORKERS") };
    }

    #[test]
    fn invalid_workers_env_var_falls_back_to_hardware_parallelism() {
        let _guard = WORKERS_ENV_LOCK.lock().unwrap();
        unsafe { std::env::set_var("WORKERS", "not-a-number") };
        let config = SystemConfig::default();
        assert!(config.resolved_worker_count() >= 1);
        unsafe { std::env::remove_var("WORKERS") };
    }

    #[test]
    fn zero_worker_count_fails_validation() {
        let result = SystemConfig::builder().with_worker_count(0).build();
        assert!(result.is_err());
    }

    #[test]
    fn builder_sets_timeout() {
        let config = SystemConfig::builder()
            .with_timeout(Duration::from_secs(10))
            .build()
            .unwrap();
        assert_eq!(config.timeout, Some(Duration::from_secs(10)));
    }
}
