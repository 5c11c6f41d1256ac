//! viewsense: viewport device classification with debounced change
//! broadcasting.
//!
//! A [`DeviceClassifier`] owns one [`DeviceSnapshot`] per session, keeps it
//! in sync with a host-provided [`ViewportProbe`], mirrors the derived
//! classification as presentation tags on a [`PresentationSink`], and
//! broadcasts [`ClassifierEvent`]s to subscribed observers. Resize signals
//! are debounced; orientation signals get a short settle delay.

pub mod classifier;
pub mod debounce;
pub mod events;
pub mod hints;
pub mod host;

pub use classifier::{
    ClassTransition, ClassifierConfig, DeviceClass, DeviceClassifier, DeviceSnapshot, Orientation,
};
pub use events::{ClassifierEvent, EventBus, SubscriptionToken};
pub use host::{
    HostSignal, MemorySink, PresentationSink, SimulatedViewport, ViewportMetrics, ViewportProbe,
};
