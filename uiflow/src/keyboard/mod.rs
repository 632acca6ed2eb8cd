//! Text entry through a custom on-screen keyboard widget.
//!
//! The target field does not accept direct text injection, so every
//! character is an independent UI round-trip: resolve the key control,
//! wait for it to become actionable, click it. The first character that
//! cannot be activated within the timeout aborts the whole call; there is
//! no partial-text recovery or backspacing.

use crate::config::SelectorMap;
use crate::driver::UiDriver;
use crate::errors::UiFlowError;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Types text by clicking one on-screen key control per character.
#[derive(Debug, Clone)]
pub struct VirtualKeyboard {
    driver: Arc<dyn UiDriver>,
    selectors: SelectorMap,
    wait_timeout: Duration,
    pause: (Duration, Duration),
}

impl VirtualKeyboard {
    /// Default inter-keystroke pause interval.
    pub const DEFAULT_PAUSE: (Duration, Duration) =
        (Duration::from_millis(100), Duration::from_millis(300));

    /// Creates a keyboard over a driver with the given selector mapping
    /// and per-key wait timeout.
    #[must_use]
    pub fn new(driver: Arc<dyn UiDriver>, selectors: SelectorMap, wait_timeout: Duration) -> Self {
        Self {
            driver,
            selectors,
            wait_timeout,
            pause: Self::DEFAULT_PAUSE,
        }
    }

    /// Overrides the inter-keystroke pause interval. A zero interval
    /// disables pausing entirely (useful in tests).
    #[must_use]
    pub fn with_pause(mut self, min: Duration, max: Duration) -> Self {
        self.pause = (min, max);
        self
    }

    /// Types `text` one character at a time, fail-fast.
    ///
    /// # Errors
    ///
    /// Returns [`UiFlowError::KeyNotActivated`] for the first character
    /// whose key control cannot be resolved or clicked within the
    /// timeout; characters after it are never attempted.
    pub async fn type_text(&self, text: &str) -> Result<(), UiFlowError> {
        debug!(text = %text, "typing via on-screen keyboard");
        for ch in text.chars() {
            self.press_key(ch).await?;
        }
        Ok(())
    }

    async fn press_key(&self, ch: char) -> Result<(), UiFlowError> {
        let selector = self.selectors.key(ch);

        let handle = self
            .driver
            .find_actionable(&selector, self.wait_timeout)
            .await
            .map_err(|source| {
                warn!(key = %ch, selector = %selector, "virtual key not actionable");
                UiFlowError::KeyNotActivated { key: ch, source }
            })?;

        self.driver
            .click(&handle)
            .await
            .map_err(|source| UiFlowError::KeyNotActivated { key: ch, source })?;

        // Sampled before the await so no RNG handle lives across it.
        let pause = self.sample_pause();
        if !pause.is_zero() {
            tokio::time::sleep(pause).await;
        }
        Ok(())
    }

    fn sample_pause(&self) -> Duration {
        let (min, max) = self.pause;
        if min >= max {
            return min;
        }
        rand::thread_rng().gen_range(min..=max)
    }
}
