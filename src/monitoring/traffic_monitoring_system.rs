use crate::renderer::Renderer;
use crate::shared_data::{current_timestamp, IntersectionSnapshot};
use crate::simulation_engine::intersections::{Approach, LightState};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

/// One row of the light-change log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightChangeRecord {
    pub timestamp: u64,
    pub elapsed_ms: u64,
    pub approach: Approach,
    pub light_state: LightState,
    pub live_vehicles: usize,
}

/// Watches snapshots for light changes and keeps simple traffic counters.
/// Optionally appends every change to a CSV log.
pub struct TrafficMonitor<W: Write> {
    recorder: Option<csv::Writer<W>>,
    last_light: Option<(Approach, LightState)>,
    light_changes: u64,
    peak_vehicles: usize,
}

impl TrafficMonitor<io::Sink> {
    /// Logs only, no CSV output.
    pub fn without_recorder() -> Self {
        Self::build(None)
    }
}

impl TrafficMonitor<File> {
    /// Appends to `path`, writing the header only when the file is new.
    pub fn to_csv_file(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let file_exists = path.as_ref().exists();
        let file = OpenOptions::new().append(true).create(true).open(path)?;
        let writer = csv::WriterBuilder::new()
            .has_headers(!file_exists)
            .from_writer(file);
        Ok(Self::build(Some(writer)))
    }
}

impl<W: Write> TrafficMonitor<W> {
    pub fn with_writer(out: W) -> Self {
        Self::build(Some(csv::Writer::from_writer(out)))
    }

    fn build(recorder: Option<csv::Writer<W>>) -> Self {
        Self {
            recorder,
            last_light: None,
            light_changes: 0,
            peak_vehicles: 0,
        }
    }

    /// Number of light changes seen, not counting the initial light.
    pub fn light_changes(&self) -> u64 {
        self.light_changes
    }

    pub fn peak_vehicles(&self) -> usize {
        self.peak_vehicles
    }

    /// Flushes and hands back the CSV sink.
    pub fn into_inner(self) -> Option<W> {
        self.recorder.and_then(|writer| writer.into_inner().ok())
    }

    fn record(&mut self, record: &LightChangeRecord) -> Result<(), Box<dyn Error>> {
        if let Some(writer) = self.recorder.as_mut() {
            writer.serialize(record)?;
            writer.flush()?;
        }
        Ok(())
    }
}

impl<W: Write> Renderer for TrafficMonitor<W> {
    fn render(&mut self, snapshot: &IntersectionSnapshot) {
        self.peak_vehicles = self.peak_vehicles.max(snapshot.vehicles.len());

        let light = (snapshot.active_approach, snapshot.light_state);
        if self.last_light == Some(light) {
            return;
        }
        if self.last_light.is_some() {
            self.light_changes += 1;
        }
        self.last_light = Some(light);

        log::info!(
            "[Monitor] {} is {:?} at {} ms with {} vehicles on the road",
            light.0,
            light.1,
            snapshot.elapsed_ms,
            snapshot.vehicles.len()
        );
        let record = LightChangeRecord {
            timestamp: current_timestamp(),
            elapsed_ms: snapshot.elapsed_ms,
            approach: light.0,
            light_state: light.1,
            live_vehicles: snapshot.vehicles.len(),
        };
        if let Err(e) = self.record(&record) {
            log::warn!("Error logging light change: {}", e);
        }
    }

    fn finish(&mut self) {
        log::info!(
            "[Monitor] {} light changes, peak of {} vehicles",
            self.light_changes,
            self.peak_vehicles
        );
    }
}
