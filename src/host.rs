//! Boundary between the classifier and whatever hosts the viewport.
//!
//! Real embedders implement [`ViewportProbe`] and [`PresentationSink`]
//! against their webview bridge; [`SimulatedViewport`] and [`MemorySink`]
//! cover the demo driver and tests.

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

/// One viewport measurement as reported by the host environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportMetrics {
    pub width: u32,
    pub height: u32,
    pub pixel_ratio: f64,
    /// `None` when the host cannot report touch capability.
    pub touch_capable: Option<bool>,
}

/// Source of viewport measurements. Measurement is total: a host always has
/// dimensions to report.
pub trait ViewportProbe: Send + Sync {
    fn measure(&self) -> ViewportMetrics;
}

/// Tag store on the document root that styling rules key off of. Group
/// exclusivity is the caller's job; the sink just adds and removes.
pub trait PresentationSink: Send + Sync {
    fn add_tag(&self, tag: &str);
    fn remove_tags(&self, tags: &[&str]);
    fn active_tags(&self) -> Vec<String>;
}

/// Resize and orientation signals as delivered by the host event loop.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum HostSignal {
    Resize,
    OrientationChange,
}

/// Shared mutable viewport for driving the classifier without a real host.
#[derive(Clone)]
pub struct SimulatedViewport {
    metrics: Arc<RwLock<ViewportMetrics>>,
}

impl SimulatedViewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            metrics: Arc::new(RwLock::new(ViewportMetrics {
                width,
                height,
                pixel_ratio: 1.0,
                touch_capable: Some(false),
            })),
        }
    }

    pub fn set_size(&self, width: u32, height: u32) {
        let mut guard = self.metrics.write().unwrap();
        guard.width = width;
        guard.height = height;
    }

    pub fn set_pixel_ratio(&self, ratio: f64) {
        self.metrics.write().unwrap().pixel_ratio = ratio;
    }

    pub fn set_touch_capable(&self, touch: Option<bool>) {
        self.metrics.write().unwrap().touch_capable = touch;
    }
}

impl ViewportProbe for SimulatedViewport {
    fn measure(&self) -> ViewportMetrics {
        self.metrics.read().unwrap().clone()
    }
}

/// In-memory stand-in for a document root's class list.
#[derive(Default)]
pub struct MemorySink {
    tags: RwLock<HashSet<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.read().unwrap().contains(tag)
    }
}

impl PresentationSink for MemorySink {
    fn add_tag(&self, tag: &str) {
        self.tags.write().unwrap().insert(tag.to_string());
    }

    fn remove_tags(&self, tags: &[&str]) {
        let mut guard = self.tags.write().unwrap();
        for tag in tags {
            guard.remove(*tag);
        }
    }

    fn active_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.tags.read().unwrap().iter().cloned().collect();
        tags.sort();
        tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulated_viewport_reports_latest_size() {
        let viewport = SimulatedViewport::new(1280, 800);
        viewport.set_size(400, 700);

        let metrics = viewport.measure();
        assert_eq!(metrics.width, 400);
        assert_eq!(metrics.height, 700);
    }

    #[test]
    fn test_memory_sink_add_remove() {
        let sink = MemorySink::new();
        sink.add_tag("mobile");
        sink.add_tag("portrait");
        sink.remove_tags(&["mobile", "desktop"]);

        assert!(!sink.has_tag("mobile"));
        assert!(sink.has_tag("portrait"));
        assert_eq!(sink.active_tags(), vec!["portrait".to_string()]);
    }
}
