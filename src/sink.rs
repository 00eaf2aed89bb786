// Metric output. The telemetry backend is pluggable; JSON lines is the built-in sink.

use crate::models::ContainerMetrics;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

/// Sinks are driven from a blocking thread, so blocking I/O is fine here.
pub trait MetricSink: Send + Sync {
    fn emit(&self, batch: &ContainerMetrics) -> anyhow::Result<()>;

    /// Called once after every report.
    fn flush(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Writes each batch as one JSON object per line.
pub struct JsonLinesSink<W: Write + Send> {
    out: Mutex<W>,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(w) => w,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn lock(&self) -> anyhow::Result<std::sync::MutexGuard<'_, W>> {
        self.out
            .lock()
            .map_err(|_| anyhow::anyhow!("metric sink lock poisoned"))
    }
}

impl JsonLinesSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl JsonLinesSink<BufWriter<File>> {
    /// Appends to `path`, creating it if needed. Lines reach the file on `flush`.
    pub fn append_to(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write + Send> MetricSink for JsonLinesSink<W> {
    fn emit(&self, batch: &ContainerMetrics) -> anyhow::Result<()> {
        let line = serde_json::to_string(batch)?;
        writeln!(self.lock()?, "{}", line)?;
        Ok(())
    }

    fn flush(&self) -> anyhow::Result<()> {
        self.lock()?.flush()?;
        Ok(())
    }
}
