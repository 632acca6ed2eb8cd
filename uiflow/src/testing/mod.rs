//! Scripted driver doubles for exercising flows without a real UI.
//!
//! [`ScriptedDriver`] records every driver call and resolves selectors
//! according to a small per-driver script: selectors can be made to time
//! out, candidate lists can be sized, snapshots and releases can be made
//! to fail. [`ScriptedDriverFactory`] hands out one scripted driver per
//! acquire and retains them for post-hoc inspection.

use crate::driver::{ControlHandle, DriverFactory, Selector, UiDriver};
use crate::errors::DriverError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// One recorded driver call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverAction {
    /// `navigate(url)`.
    Navigate(String),
    /// `find_actionable(selector, ..)`, selector in display form.
    FindActionable(String),
    /// `click(handle)`, handle raw value (the selector that located it).
    Click(String),
    /// `set_value(handle, text)`.
    SetValue {
        /// Raw value of the target handle.
        target: String,
        /// The value written.
        value: String,
    },
    /// `capture_snapshot()`.
    Snapshot,
    /// `list_matching(selector, ..)`, selector in display form.
    ListMatching(String),
    /// `release()`.
    Release,
}

/// A recording [`UiDriver`] double with scriptable selector behavior.
#[derive(Debug, Default)]
pub struct ScriptedDriver {
    actions: Mutex<Vec<DriverAction>>,
    timing_out: Mutex<Vec<String>>,
    match_counts: Mutex<HashMap<String, usize>>,
    snapshots_fail: AtomicBool,
    release_fails: AtomicBool,
    released: AtomicBool,
}

impl ScriptedDriver {
    /// Creates a driver where every selector resolves.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Any selector whose display form contains `fragment` times out.
    pub fn fail_matching(&self, fragment: impl Into<String>) {
        self.timing_out.lock().push(fragment.into());
    }

    /// Sets how many controls `list_matching` returns for selectors whose
    /// display form contains `fragment`. Unscripted selectors return one.
    pub fn set_match_count(&self, fragment: impl Into<String>, count: usize) {
        self.match_counts.lock().insert(fragment.into(), count);
    }

    /// Makes every snapshot capture fail.
    pub fn fail_snapshots(&self) {
        self.snapshots_fail.store(true, Ordering::SeqCst);
    }

    /// Makes `release` fail.
    pub fn fail_release(&self) {
        self.release_fails.store(true, Ordering::SeqCst);
    }

    /// Returns whether `release` was called.
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }

    /// Returns every recorded call, in order.
    #[must_use]
    pub fn actions(&self) -> Vec<DriverAction> {
        self.actions.lock().clone()
    }

    /// Returns the raw targets of all recorded clicks, in order.
    #[must_use]
    pub fn clicked(&self) -> Vec<String> {
        self.actions
            .lock()
            .iter()
            .filter_map(|a| match a {
                DriverAction::Click(target) => Some(target.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, action: DriverAction) {
        self.actions.lock().push(action);
    }

    fn times_out(&self, rendered: &str) -> bool {
        self.timing_out
            .lock()
            .iter()
            .any(|fragment| rendered.contains(fragment.as_str()))
    }

    fn match_count(&self, rendered: &str) -> usize {
        self.match_counts
            .lock()
            .iter()
            .find(|(fragment, _)| rendered.contains(fragment.as_str()))
            .map_or(1, |(_, count)| *count)
    }
}

#[async_trait]
impl UiDriver for ScriptedDriver {
    async fn navigate(&self, url: &str) -> Result<(), DriverError> {
        self.record(DriverAction::Navigate(url.to_string()));
        Ok(())
    }

    async fn find_actionable(
        &self,
        selector: &Selector,
        timeout: Duration,
    ) -> Result<ControlHandle, DriverError> {
        let rendered = selector.to_string();
        self.record(DriverAction::FindActionable(rendered.clone()));
        if self.times_out(&rendered) {
            return Err(DriverError::ResolutionTimeout {
                selector: rendered,
                timeout,
            });
        }
        Ok(ControlHandle::new(rendered))
    }

    async fn click(&self, handle: &ControlHandle) -> Result<(), DriverError> {
        self.record(DriverAction::Click(handle.raw().to_string()));
        Ok(())
    }

    async fn set_value(&self, handle: &ControlHandle, text: &str) -> Result<(), DriverError> {
        self.record(DriverAction::SetValue {
            target: handle.raw().to_string(),
            value: text.to_string(),
        });
        Ok(())
    }

    async fn capture_snapshot(&self) -> Result<Vec<u8>, DriverError> {
        self.record(DriverAction::Snapshot);
        if self.snapshots_fail.load(Ordering::SeqCst) {
            return Err(DriverError::Backend(anyhow::anyhow!(
                "scripted snapshot failure"
            )));
        }
        Ok(b"snapshot".to_vec())
    }

    async fn list_matching(
        &self,
        selector: &Selector,
        timeout: Duration,
    ) -> Result<Vec<ControlHandle>, DriverError> {
        let rendered = selector.to_string();
        self.record(DriverAction::ListMatching(rendered.clone()));
        if self.times_out(&rendered) {
            return Err(DriverError::ResolutionTimeout {
                selector: rendered,
                timeout,
            });
        }
        let count = self.match_count(&rendered);
        Ok((0..count)
            .map(|i| ControlHandle::new(format!("{rendered}[{i}]")))
            .collect())
    }

    async fn release(&self) -> Result<(), DriverError> {
        self.record(DriverAction::Release);
        if self.release_fails.load(Ordering::SeqCst) {
            return Err(DriverError::Backend(anyhow::anyhow!(
                "scripted release failure"
            )));
        }
        self.released.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// A [`DriverFactory`] double that hands out scripted drivers.
///
/// Pre-scripted drivers are dispensed in push order; once the queue is
/// empty, fresh default drivers are created. Every dispensed driver is
/// retained so tests can inspect sessions after the batch ran.
#[derive(Debug, Default)]
pub struct ScriptedDriverFactory {
    queued: Mutex<VecDeque<Arc<ScriptedDriver>>>,
    acquired: Mutex<Vec<Arc<ScriptedDriver>>>,
    acquire_fails: AtomicBool,
}

impl ScriptedDriverFactory {
    /// Creates a factory dispensing default drivers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a pre-scripted driver for the next acquire.
    pub fn push(&self, driver: Arc<ScriptedDriver>) {
        self.queued.lock().push_back(driver);
    }

    /// Makes the next acquires fail.
    pub fn fail_acquire(&self) {
        self.acquire_fails.store(true, Ordering::SeqCst);
    }

    /// Returns every driver dispensed so far, in acquire order.
    #[must_use]
    pub fn acquired(&self) -> Vec<Arc<ScriptedDriver>> {
        self.acquired.lock().clone()
    }
}

#[async_trait]
impl DriverFactory for ScriptedDriverFactory {
    async fn acquire(&self) -> Result<Arc<dyn UiDriver>, DriverError> {
        if self.acquire_fails.load(Ordering::SeqCst) {
            return Err(DriverError::Backend(anyhow::anyhow!(
                "scripted acquire failure"
            )));
        }
        let driver = self
            .queued
            .lock()
            .pop_front()
            .unwrap_or_else(|| Arc::new(ScriptedDriver::new()));
        self.acquired.lock().push(Arc::clone(&driver));
        Ok(driver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_calls_in_order() {
        let driver = ScriptedDriver::new();
        driver.navigate("https://example.io").await.unwrap();
        let handle = driver
            .find_actionable(&Selector::LabelContains("NEXT".into()), Duration::from_secs(1))
            .await
            .unwrap();
        driver.click(&handle).await.unwrap();

        assert_eq!(
            driver.actions(),
            vec![
                DriverAction::Navigate("https://example.io".to_string()),
                DriverAction::FindActionable("label~'NEXT'".to_string()),
                DriverAction::Click("label~'NEXT'".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn scripted_timeout_applies_to_matching_selectors() {
        let driver = ScriptedDriver::new();
        driver.fail_matching("btn-primary");

        let err = driver
            .find_actionable(
                &Selector::SubmitWithClass("btn-primary".into()),
                Duration::from_secs(1),
            )
            .await
            .unwrap_err();
        assert!(err.is_timeout());

        // Unrelated selectors still resolve.
        driver
            .find_actionable(&Selector::FieldId("Login".into()), Duration::from_secs(1))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn match_counts_drive_list_matching() {
        let driver = ScriptedDriver::new();
        driver.set_match_count("time-slot-btn", 3);

        let slots = driver
            .list_matching(
                &Selector::CssClass("time-slot-btn".into()),
                Duration::from_secs(1),
            )
            .await
            .unwrap();
        assert_eq!(slots.len(), 3);
        assert_eq!(slots[0].raw(), ".time-slot-btn[0]");
    }

    #[tokio::test]
    async fn factory_dispenses_queued_then_fresh() {
        let factory = ScriptedDriverFactory::new();
        let scripted = Arc::new(ScriptedDriver::new());
        scripted.fail_matching("Password");
        factory.push(Arc::clone(&scripted));

        factory.acquire().await.unwrap();
        factory.acquire().await.unwrap();

        let acquired = factory.acquired();
        assert_eq!(acquired.len(), 2);
        assert!(Arc::ptr_eq(&acquired[0], &scripted));
    }
}
