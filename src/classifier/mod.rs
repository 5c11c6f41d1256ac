pub mod config;
pub mod controller;
pub mod snapshot;

pub use config::ClassifierConfig;
pub use controller::{ClassTransition, DeviceClassifier};
pub use snapshot::{DeviceClass, DeviceSnapshot, Orientation};
