//! Broadcast of classifier notifications to subscribed observers.
//!
//! Delivery is synchronous and in registration order. A failing observer is
//! reported and skipped; it never blocks its siblings or the classifier.

use std::sync::{Arc, Mutex};

use anyhow::Result;
use log::error;
use serde::Serialize;
use uuid::Uuid;

use crate::classifier::{DeviceClass, DeviceSnapshot, Orientation};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceClassChangedEvent {
    pub old: DeviceClass,
    pub new: DeviceClass,
    pub snapshot: DeviceSnapshot,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportChangedEvent {
    pub snapshot: DeviceSnapshot,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrientationChangedEvent {
    pub orientation: Orientation,
    pub snapshot: DeviceSnapshot,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "payload", rename_all = "camelCase")]
pub enum ClassifierEvent {
    DeviceClassChanged(DeviceClassChangedEvent),
    ViewportChanged(ViewportChangedEvent),
    OrientationChanged(OrientationChangedEvent),
}

impl ClassifierEvent {
    /// Wire name embedders forward to their webview.
    pub fn name(&self) -> &'static str {
        match self {
            ClassifierEvent::DeviceClassChanged(_) => "device-class-changed",
            ClassifierEvent::ViewportChanged(_) => "viewport-changed",
            ClassifierEvent::OrientationChanged(_) => "orientation-changed",
        }
    }
}

pub type Observer = dyn Fn(&ClassifierEvent) -> Result<()> + Send + Sync;

/// Capability handle returned by [`EventBus::subscribe`]; spend it on
/// [`EventBus::unsubscribe`] to stop delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionToken(Uuid);

struct Registration {
    token: Uuid,
    observer: Arc<Observer>,
}

#[derive(Clone)]
pub struct EventBus {
    observers: Arc<Mutex<Vec<Registration>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            observers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn subscribe<F>(&self, observer: F) -> SubscriptionToken
    where
        F: Fn(&ClassifierEvent) -> Result<()> + Send + Sync + 'static,
    {
        let token = Uuid::new_v4();
        self.observers.lock().unwrap().push(Registration {
            token,
            observer: Arc::new(observer),
        });
        SubscriptionToken(token)
    }

    pub fn unsubscribe(&self, token: &SubscriptionToken) -> bool {
        let mut guard = self.observers.lock().unwrap();
        let before = guard.len();
        guard.retain(|registration| registration.token != token.0);
        guard.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.observers.lock().unwrap().len()
    }

    pub fn publish(&self, event: &ClassifierEvent) {
        // Snapshot the list so an observer can subscribe or unsubscribe
        // from inside its own callback without deadlocking.
        let observers: Vec<Arc<Observer>> = self
            .observers
            .lock()
            .unwrap()
            .iter()
            .map(|registration| Arc::clone(&registration.observer))
            .collect();

        for observer in observers {
            if let Err(err) = observer(event) {
                error!("observer failed handling {}: {err:?}", event.name());
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ClassifierConfig;
    use crate::host::ViewportMetrics;
    use anyhow::anyhow;

    fn viewport_event() -> ClassifierEvent {
        let snapshot = DeviceSnapshot::from_metrics(
            &ViewportMetrics {
                width: 1200,
                height: 800,
                pixel_ratio: 1.0,
                touch_capable: Some(false),
            },
            &ClassifierConfig::default(),
        );
        ClassifierEvent::ViewportChanged(ViewportChangedEvent { snapshot })
    }

    #[test]
    fn test_delivery_in_registration_order() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for id in 0..3 {
            let seen = Arc::clone(&seen);
            bus.subscribe(move |_| {
                seen.lock().unwrap().push(id);
                Ok(())
            });
        }

        bus.publish(&viewport_event());
        assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_failing_observer_does_not_block_siblings() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        bus.subscribe(|_| Err(anyhow!("observer exploded")));
        {
            let seen = Arc::clone(&seen);
            bus.subscribe(move |_| {
                seen.lock().unwrap().push("survivor");
                Ok(())
            });
        }

        bus.publish(&viewport_event());
        assert_eq!(*seen.lock().unwrap(), vec!["survivor"]);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(0u32));

        let token = {
            let seen = Arc::clone(&seen);
            bus.subscribe(move |_| {
                *seen.lock().unwrap() += 1;
                Ok(())
            })
        };

        bus.publish(&viewport_event());
        assert!(bus.unsubscribe(&token));
        assert!(!bus.unsubscribe(&token));
        bus.publish(&viewport_event());

        assert_eq!(*seen.lock().unwrap(), 1);
        assert_eq!(bus.observer_count(), 0);
    }

    #[test]
    fn test_event_serializes_with_wire_name_payload() {
        let event = viewport_event();
        assert_eq!(event.name(), "viewport-changed");

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "viewportChanged");
        assert_eq!(json["payload"]["snapshot"]["deviceClass"], "desktop");
    }
}
