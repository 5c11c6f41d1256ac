use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use log::info;
use serde::Serialize;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::debounce::{run_after, Debouncer};
use crate::events::{
    ClassifierEvent, DeviceClassChangedEvent, EventBus, OrientationChangedEvent,
    SubscriptionToken, ViewportChangedEvent,
};
use crate::hints;
use crate::host::{HostSignal, PresentationSink, ViewportProbe};

use super::{ClassifierConfig, DeviceClass, DeviceSnapshot, Orientation};

/// Device classes before and after a refresh.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClassTransition {
    pub old: DeviceClass,
    pub new: DeviceClass,
}

impl ClassTransition {
    pub fn changed(&self) -> bool {
        self.old != self.new
    }
}

/// Owns the one viewport snapshot for the session and tells observers when
/// the derived classification moves.
///
/// Cloning shares the same snapshot, bus, and debouncer, so signal tasks
/// and embedders all see one classifier.
#[derive(Clone)]
pub struct DeviceClassifier {
    config: Arc<ClassifierConfig>,
    probe: Arc<dyn ViewportProbe>,
    sink: Arc<dyn PresentationSink>,
    snapshot: Arc<Mutex<DeviceSnapshot>>,
    bus: EventBus,
    resize_debouncer: Debouncer,
    listener: Arc<Mutex<Option<(JoinHandle<()>, CancellationToken)>>>,
}

impl DeviceClassifier {
    pub fn new(
        config: ClassifierConfig,
        probe: Arc<dyn ViewportProbe>,
        sink: Arc<dyn PresentationSink>,
    ) -> Self {
        let snapshot = DeviceSnapshot::from_metrics(&probe.measure(), &config);
        let resize_debouncer = Debouncer::new(Duration::from_millis(config.resize_debounce_ms));

        Self {
            config: Arc::new(config),
            probe,
            sink,
            snapshot: Arc::new(Mutex::new(snapshot)),
            bus: EventBus::new(),
            resize_debouncer,
            listener: Arc::new(Mutex::new(None)),
        }
    }

    /// First measurement plus presentation hints. Call once at startup.
    pub async fn initialize(&self) {
        let snapshot = {
            let mut guard = self.snapshot.lock().await;
            *guard = DeviceSnapshot::from_metrics(&self.probe.measure(), &self.config);
            guard.clone()
        };

        hints::apply(self.sink.as_ref(), &snapshot, &self.config);

        info!(
            "device classifier initialized: {:?} {}x{} ({:?}, ratio {})",
            snapshot.device_class,
            snapshot.width,
            snapshot.height,
            snapshot.orientation,
            snapshot.pixel_ratio
        );
    }

    /// Re-measures the viewport and rebuilds the snapshot in one step.
    ///
    /// Always publishes `viewport-changed`; `device-class-changed` and
    /// `orientation-changed` fire only when the respective field flipped.
    /// Hints are re-applied whenever the derived tag set moved, so
    /// orientation and density tags never go stale between class changes.
    pub async fn refresh(&self) -> ClassTransition {
        let metrics = self.probe.measure();

        let (transition, orientation_flip, tags_stale, snapshot) = {
            let mut guard = self.snapshot.lock().await;
            let previous = guard.clone();
            *guard = DeviceSnapshot::from_metrics(&metrics, &self.config);

            let transition = ClassTransition {
                old: previous.device_class,
                new: guard.device_class,
            };
            let orientation_flip = previous.orientation != guard.orientation;
            let tags_stale =
                hints::tags_for(&previous, &self.config) != hints::tags_for(&guard, &self.config);

            (transition, orientation_flip, tags_stale, guard.clone())
        };

        if tags_stale {
            hints::apply(self.sink.as_ref(), &snapshot, &self.config);
        }

        if transition.changed() {
            info!(
                "device class changed from {:?} to {:?}",
                transition.old, transition.new
            );
            self.bus
                .publish(&ClassifierEvent::DeviceClassChanged(DeviceClassChangedEvent {
                    old: transition.old,
                    new: transition.new,
                    snapshot: snapshot.clone(),
                }));
        }

        if orientation_flip {
            self.bus
                .publish(&ClassifierEvent::OrientationChanged(OrientationChangedEvent {
                    orientation: snapshot.orientation,
                    snapshot: snapshot.clone(),
                }));
        }

        self.bus
            .publish(&ClassifierEvent::ViewportChanged(ViewportChangedEvent { snapshot }));

        transition
    }

    /// Pushes the current classification out as presentation tags.
    pub async fn apply_presentation_hints(&self) {
        let snapshot = self.snapshot.lock().await.clone();
        hints::apply(self.sink.as_ref(), &snapshot, &self.config);
    }

    /// Owned copy of the current snapshot.
    pub async fn snapshot(&self) -> DeviceSnapshot {
        self.snapshot.lock().await.clone()
    }

    pub async fn is_mobile(&self) -> bool {
        self.snapshot.lock().await.device_class == DeviceClass::Mobile
    }

    pub async fn is_tablet(&self) -> bool {
        self.snapshot.lock().await.device_class == DeviceClass::Tablet
    }

    pub async fn is_desktop(&self) -> bool {
        self.snapshot.lock().await.device_class == DeviceClass::Desktop
    }

    pub async fn is_touch_capable(&self) -> bool {
        self.snapshot.lock().await.touch_capable
    }

    pub async fn is_portrait(&self) -> bool {
        self.snapshot.lock().await.orientation == Orientation::Portrait
    }

    pub async fn is_landscape(&self) -> bool {
        self.snapshot.lock().await.orientation == Orientation::Landscape
    }

    pub fn subscribe<F>(&self, observer: F) -> SubscriptionToken
    where
        F: Fn(&ClassifierEvent) -> Result<()> + Send + Sync + 'static,
    {
        self.bus.subscribe(observer)
    }

    pub fn unsubscribe(&self, token: &SubscriptionToken) -> bool {
        self.bus.unsubscribe(token)
    }

    /// Arms the resize debouncer; a newer signal restarts the quiet period.
    pub async fn notify_resize(&self) {
        let this = self.clone();
        self.resize_debouncer
            .schedule(move || async move {
                this.refresh().await;
            })
            .await;
    }

    /// Each orientation signal gets its own settle delay before measuring;
    /// they are not collapsed the way resize signals are.
    pub fn notify_orientation_change(&self) {
        let this = self.clone();
        let _ = run_after(
            Duration::from_millis(self.config.orientation_settle_ms),
            move || async move {
                this.refresh().await;
            },
        );
    }

    /// Spawns the listener that maps host signals onto the notify methods.
    /// Replaces any previous listener.
    pub async fn attach_signals(&self, mut signals: mpsc::UnboundedReceiver<HostSignal>) {
        let mut guard = self.listener.lock().await;
        if let Some((handle, token)) = guard.take() {
            token.cancel();
            handle.abort();
        }

        let token = CancellationToken::new();
        let loop_token = token.clone();
        let this = self.clone();

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    signal = signals.recv() => match signal {
                        Some(HostSignal::Resize) => this.notify_resize().await,
                        Some(HostSignal::OrientationChange) => this.notify_orientation_change(),
                        None => break,
                    },
                    _ = loop_token.cancelled() => {
                        info!("signal listener shutting down");
                        break;
                    }
                }
            }
        });

        *guard = Some((handle, token));
    }

    /// Stops the signal listener and drops any pending debounced refresh.
    pub async fn shutdown(&self) {
        if let Some((handle, token)) = self.listener.lock().await.take() {
            token.cancel();
            let _ = handle.await;
        }
        self.resize_debouncer.cancel().await;
    }
}
