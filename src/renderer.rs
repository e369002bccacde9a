use crate::shared_data::IntersectionSnapshot;
use std::error::Error;
use std::io::Write;

/// Consumer of the per-tick snapshot. Drawing layers implement this.
pub trait Renderer {
    fn render(&mut self, snapshot: &IntersectionSnapshot);

    /// Called once after the last tick.
    fn finish(&mut self) {}
}

impl Renderer for Vec<Box<dyn Renderer + Send>> {
    fn render(&mut self, snapshot: &IntersectionSnapshot) {
        for renderer in self.iter_mut() {
            renderer.render(snapshot);
        }
    }

    fn finish(&mut self) {
        for renderer in self.iter_mut() {
            renderer.finish();
        }
    }
}

/// Streams every snapshot as one JSON line, for external viewers.
pub struct SnapshotWriter<W: Write> {
    out: W,
    failed: bool,
}

impl<W: Write> SnapshotWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, failed: false }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, snapshot: &IntersectionSnapshot) -> Result<(), Box<dyn Error>> {
        serde_json::to_writer(&mut self.out, snapshot)?;
        self.out.write_all(b"\n")?;
        Ok(())
    }
}

impl<W: Write> Renderer for SnapshotWriter<W> {
    fn render(&mut self, snapshot: &IntersectionSnapshot) {
        if self.failed {
            return;
        }
        if let Err(e) = self.write_line(snapshot) {
            // Only report once; a broken sink stays broken.
            log::warn!("Error writing snapshot, disabling snapshot output: {}", e);
            self.failed = true;
        }
    }

    fn finish(&mut self) {
        if let Err(e) = self.out.flush() {
            log::warn!("Error flushing snapshots: {}", e);
        }
    }
}
