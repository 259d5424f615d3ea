// triton_sim/src/timer.rs

use std::time::Duration;
use triton_core::errors::ConfigError;

/// A repeating timer driven by the fixed simulation step: accumulate the
/// elapsed time, fire once when a full period has passed, carry the
/// remainder. Fires at most once per `tick` call.
#[derive(Debug, Clone)]
pub struct Ticker {
    period: Duration,
    elapsed: Duration,
}

impl Ticker {
    /// Builds a ticker firing at `rate` Hz.
    pub fn from_rate_hz(rate: f64) -> Result<Self, ConfigError> {
        if !(rate > 0.0 && rate.is_finite()) {
            return Err(ConfigError::NonPositiveFrequency(rate));
        }
        Ok(Self {
            period: Duration::from_secs_f64(1.0 / rate),
            elapsed: Duration::ZERO,
        })
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Advances the timer by `dt`; true when the timer fired.
    pub fn tick(&mut self, dt: Duration) -> bool {
        self.elapsed += dt;
        if self.elapsed >= self.period {
            self.elapsed -= self.period;
            true
        } else {
            false
        }
    }
}
