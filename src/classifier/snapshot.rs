use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::host::ViewportMetrics;

use super::ClassifierConfig;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum DeviceClass {
    Mobile,
    Tablet,
    Desktop,
}

impl DeviceClass {
    /// Width at or below a breakpoint falls to the smaller class, so
    /// 768px is Mobile and 1024px is Tablet.
    pub fn from_width(width: u32, config: &ClassifierConfig) -> Self {
        if width <= config.mobile_max_width {
            DeviceClass::Mobile
        } else if width <= config.tablet_max_width {
            DeviceClass::Tablet
        } else {
            DeviceClass::Desktop
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            DeviceClass::Mobile => "mobile",
            DeviceClass::Tablet => "tablet",
            DeviceClass::Desktop => "desktop",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    /// Square viewports count as portrait.
    pub fn from_dimensions(width: u32, height: u32) -> Self {
        if width > height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
        }
    }
}

/// Everything the classifier knows about the viewport at one measurement
/// instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceSnapshot {
    pub device_class: DeviceClass,
    pub width: u32,
    pub height: u32,
    pub orientation: Orientation,
    pub pixel_ratio: f64,
    pub touch_capable: bool,
    pub measured_at: DateTime<Utc>,
}

impl DeviceSnapshot {
    /// Rebuilds every field from a single measurement so readers never see
    /// a mix of two instants. Unknown touch capability degrades to `false`.
    pub fn from_metrics(metrics: &ViewportMetrics, config: &ClassifierConfig) -> Self {
        Self {
            device_class: DeviceClass::from_width(metrics.width, config),
            width: metrics.width,
            height: metrics.height,
            orientation: Orientation::from_dimensions(metrics.width, metrics.height),
            pixel_ratio: metrics.pixel_ratio,
            touch_capable: metrics.touch_capable.unwrap_or(false),
            measured_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(width: u32, height: u32) -> ViewportMetrics {
        ViewportMetrics {
            width,
            height,
            pixel_ratio: 1.0,
            touch_capable: Some(false),
        }
    }

    #[test]
    fn test_class_boundaries() {
        let config = ClassifierConfig::default();
        assert_eq!(DeviceClass::from_width(768, &config), DeviceClass::Mobile);
        assert_eq!(DeviceClass::from_width(769, &config), DeviceClass::Tablet);
        assert_eq!(DeviceClass::from_width(1024, &config), DeviceClass::Tablet);
        assert_eq!(DeviceClass::from_width(1025, &config), DeviceClass::Desktop);
    }

    #[test]
    fn test_class_extremes() {
        let config = ClassifierConfig::default();
        assert_eq!(DeviceClass::from_width(0, &config), DeviceClass::Mobile);
        assert_eq!(DeviceClass::from_width(3840, &config), DeviceClass::Desktop);
    }

    #[test]
    fn test_orientation_tie_is_portrait() {
        assert_eq!(Orientation::from_dimensions(800, 800), Orientation::Portrait);
        assert_eq!(Orientation::from_dimensions(801, 800), Orientation::Landscape);
        assert_eq!(Orientation::from_dimensions(800, 801), Orientation::Portrait);
    }

    #[test]
    fn test_unknown_touch_defaults_to_false() {
        let config = ClassifierConfig::default();
        let mut m = metrics(1200, 800);
        m.touch_capable = None;

        let snapshot = DeviceSnapshot::from_metrics(&m, &config);
        assert!(!snapshot.touch_capable);
    }

    #[test]
    fn test_snapshot_derives_all_fields_from_one_measurement() {
        let config = ClassifierConfig::default();
        let snapshot = DeviceSnapshot::from_metrics(&metrics(400, 700), &config);

        assert_eq!(snapshot.device_class, DeviceClass::Mobile);
        assert_eq!(snapshot.orientation, Orientation::Portrait);
        assert_eq!(snapshot.width, 400);
        assert_eq!(snapshot.height, 700);
    }
}
