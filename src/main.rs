use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use log::info;
use rand::Rng;
use tokio::sync::mpsc;
use tokio::time;

use viewsense::{
    ClassifierConfig, DeviceClassifier, HostSignal, MemorySink, PresentationSink,
    SimulatedViewport, ViewportProbe,
};

/// Demo driver: walks a simulated viewport from desktop width down to
/// mobile with noisy resize signals, then flips orientation.
#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("viewsense demo starting up...");

    let viewport = SimulatedViewport::new(1280, 800);
    let sink = Arc::new(MemorySink::new());
    let classifier = DeviceClassifier::new(
        ClassifierConfig::default(),
        Arc::new(viewport.clone()),
        sink.clone(),
    );

    classifier.initialize().await;

    classifier.subscribe(|event| {
        info!("{}: {}", event.name(), serde_json::to_string(event)?);
        Ok(())
    });

    let (signal_tx, signal_rx) = mpsc::unbounded_channel();
    classifier.attach_signals(signal_rx).await;

    // Drag the window narrower in noisy steps; only one refresh should land
    // per quiet period.
    let mut rng = rand::thread_rng();
    let mut width = 1280i32;
    while width > 400 {
        width -= 120;
        let jitter: i32 = rng.gen_range(-16..=16);
        viewport.set_size((width + jitter).max(320) as u32, 800);
        signal_tx.send(HostSignal::Resize)?;
        time::sleep(Duration::from_millis(40)).await;
    }
    time::sleep(Duration::from_millis(400)).await;

    // Rotate the device
    let metrics = viewport.measure();
    viewport.set_size(metrics.height, metrics.width);
    signal_tx.send(HostSignal::OrientationChange)?;
    time::sleep(Duration::from_millis(200)).await;

    info!("active tags: {:?}", sink.active_tags());
    classifier.shutdown().await;
    Ok(())
}
