//! Presentation tags derived from a snapshot.
//!
//! Three mutually exclusive groups plus one optional density tag. The apply
//! routine clears a whole group before setting its current member, so two
//! tags from one group are never active together.

use crate::classifier::{ClassifierConfig, DeviceSnapshot};
use crate::host::PresentationSink;

pub const DEVICE_TAGS: [&str; 3] = ["mobile", "tablet", "desktop"];
pub const ORIENTATION_TAGS: [&str; 2] = ["portrait", "landscape"];
pub const TOUCH_TAGS: [&str; 2] = ["touch", "no-touch"];
pub const HIGH_DENSITY_TAG: &str = "high-density";

fn touch_tag(snapshot: &DeviceSnapshot) -> &'static str {
    if snapshot.touch_capable {
        "touch"
    } else {
        "no-touch"
    }
}

/// The tag set a snapshot resolves to.
pub fn tags_for(snapshot: &DeviceSnapshot, config: &ClassifierConfig) -> Vec<&'static str> {
    let mut tags = vec![
        snapshot.device_class.tag(),
        snapshot.orientation.tag(),
        touch_tag(snapshot),
    ];
    if snapshot.pixel_ratio > config.high_density_ratio {
        tags.push(HIGH_DENSITY_TAG);
    }
    tags
}

pub fn apply(sink: &dyn PresentationSink, snapshot: &DeviceSnapshot, config: &ClassifierConfig) {
    sink.remove_tags(&DEVICE_TAGS);
    sink.add_tag(snapshot.device_class.tag());

    sink.remove_tags(&ORIENTATION_TAGS);
    sink.add_tag(snapshot.orientation.tag());

    sink.remove_tags(&TOUCH_TAGS);
    sink.add_tag(touch_tag(snapshot));

    if snapshot.pixel_ratio > config.high_density_ratio {
        sink.add_tag(HIGH_DENSITY_TAG);
    } else {
        sink.remove_tags(&[HIGH_DENSITY_TAG]);
    }
}
