//! Runtime configuration.

use std::time::Duration;

/// Configuration for the dashboard runtime.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// How often connected integrations have their last sync advanced.
    pub refresh_interval: Duration,
    /// How long the runtime reports itself as loading after start.
    pub loading_delay: Duration,
    /// Simulated authentication time for a connect.
    pub connect_delay: Duration,
    /// How long the insights view reports itself as analyzing.
    pub analysis_delay: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(60),
            loading_delay: Duration::from_millis(1500),
            connect_delay: Duration::from_secs(2),
            analysis_delay: Duration::from_secs(2),
        }
    }
}

impl RuntimeConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the refresh interval.
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    /// Sets the loading delay.
    pub fn with_loading_delay(mut self, delay: Duration) -> Self {
        self.loading_delay = delay;
        self
    }

    /// Sets the simulated connect delay.
    pub fn with_connect_delay(mut self, delay: Duration) -> Self {
        self.connect_delay = delay;
        self
    }

    /// Sets the simulated analysis delay.
    pub fn with_analysis_delay(mut self, delay: Duration) -> Self {
        self.analysis_delay = delay;
        self
    }

    /// Zero every simulated delay. The refresh interval is kept.
    pub fn without_delays(self) -> Self {
        self.with_loading_delay(Duration::ZERO)
            .with_connect_delay(Duration::ZERO)
            .with_analysis_delay(Duration::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RuntimeConfig::default();

        assert_eq!(config.refresh_interval, Duration::from_secs(60));
        assert_eq!(config.loading_delay, Duration::from_millis(1500));
        assert_eq!(config.connect_delay, Duration::from_secs(2));
        assert_eq!(config.analysis_delay, Duration::from_secs(2));
    }

    #[test]
    fn test_config_builder() {
        let config = RuntimeConfig::new()
            .with_refresh_interval(Duration::from_millis(100))
            .with_connect_delay(Duration::from_millis(10));

        assert_eq!(config.refresh_interval, Duration::from_millis(100));
        assert_eq!(config.connect_delay, Duration::from_millis(10));
    }

    #[test]
    fn test_without_delays() {
        let config = RuntimeConfig::new().without_delays();
        assert_eq!(config.loading_delay, Duration::ZERO);
        assert_eq!(config.connect_delay, Duration::ZERO);
        assert_eq!(config.analysis_delay, Duration::ZERO);
        assert_eq!(config.refresh_interval, Duration::from_secs(60));
    }
}
