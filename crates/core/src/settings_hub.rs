//! Process-wide settings distribution.
//!
//! One [`SettingsHub`] per process holds the current [`Settings`] value. The settings service
//! publishes after every successful write; editing sessions hold a [`SettingsSubscription`] and
//! consult it before each auto-save tick.

use crate::wire::Settings;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Clone, Debug)]
pub struct SettingsHub {
    tx: Arc<watch::Sender<Settings>>,
}

impl SettingsHub {
    pub fn new(initial: Settings) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// The most recently published value.
    pub fn current(&self) -> Settings {
        self.tx.borrow().clone()
    }

    /// Replace the current value and wake every subscriber.
    ///
    /// Publishing with no live subscribers still updates [`Self::current`].
    pub fn publish(&self, settings: Settings) {
        self.tx.send_replace(settings);
    }

    pub fn subscribe(&self) -> SettingsSubscription {
        SettingsSubscription {
            rx: self.tx.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for SettingsHub {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

/// A receiver of published settings. Dropping it unsubscribes.
#[derive(Clone, Debug)]
pub struct SettingsSubscription {
    rx: watch::Receiver<Settings>,
}

impl SettingsSubscription {
    pub fn current(&self) -> Settings {
        self.rx.borrow().clone()
    }

    pub fn auto_save_enabled(&self) -> bool {
        self.rx.borrow().auto_save
    }

    /// Wait for the next publish. Returns `None` once the hub is gone.
    pub async fn changed(&mut self) -> Option<Settings> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}
