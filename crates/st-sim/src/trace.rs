//! CSV trace of a simulation run.
//!
//! One row per turn: `turn,mode,unvisited,energy,riding`.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::Writer;

use crate::{SimError, SimObserver, SimReport, SimResult, TurnSummary};

/// A [`SimObserver`] that writes one CSV row per turn.
///
/// Errors from the writer are stored internally because `SimObserver`
/// methods have no return value.  After `sim.run()` returns, check with
/// [`take_error`][Self::take_error].
pub struct CsvTraceWriter<W: Write> {
    writer:     Writer<W>,
    rows:       usize,
    last_error: Option<SimError>,
}

impl CsvTraceWriter<File> {
    /// Create (or truncate) `path` and write the header row.
    pub fn create(path: &Path) -> SimResult<Self> {
        Self::new(File::create(path)?)
    }
}

impl<W: Write> CsvTraceWriter<W> {
    pub fn new(inner: W) -> SimResult<Self> {
        let mut writer = Writer::from_writer(inner);
        writer.write_record(["turn", "mode", "unvisited", "energy", "riding"])?;
        Ok(Self { writer, rows: 0, last_error: None })
    }

    /// Data rows written so far (header excluded).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    pub fn take_error(&mut self) -> Option<SimError> {
        self.last_error.take()
    }

    /// Flush and unwrap the inner writer.
    pub fn into_inner(self) -> SimResult<W> {
        self.writer.into_inner().map_err(|e| SimError::Io(e.into_error()))
    }

    fn store_err(&mut self, result: SimResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }

    fn write_row(&mut self, s: &TurnSummary) -> SimResult<()> {
        self.writer.write_record(&[
            s.turn.0.to_string(),
            s.mode.as_str().to_string(),
            s.unvisited.to_string(),
            format!("{:.6}", s.energy),
            s.riding.to_string(),
        ])?;
        self.rows += 1;
        Ok(())
    }
}

impl<W: Write> SimObserver for CsvTraceWriter<W> {
    fn on_turn_end(&mut self, summary: &TurnSummary) {
        let result = self.write_row(summary);
        self.store_err(result);
    }

    fn on_sim_end(&mut self, _report: &SimReport) {
        let result = self.writer.flush().map_err(SimError::from);
        self.store_err(result);
    }
}
