//! Output sinks for encoded rows.

use std::io::Write;

use crate::error::PointCsvError;
use crate::Result;

/// Destination for encoded rows.
///
/// The streamer calls `flush` and then `close` exactly once, after the last
/// row of a successful run.
pub trait RowSink {
    fn write_row(&mut self, line: &str) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn close(&mut self) -> Result<()>;
}

/// Sink over any [`Write`] implementation.
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    inner: W,
    closed: bool,
    rows_written: usize,
}

impl<W: Write> WriterSink<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            closed: false,
            rows_written: 0,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Give back the wrapped writer.
    pub fn into_inner(self) -> W {
        self.inner
    }

    fn ensure_open(&self, operation: &str) -> Result<()> {
        if self.closed {
            return Err(PointCsvError::Sink(format!(
                "cannot {} a closed sink",
                operation
            )));
        }
        Ok(())
    }
}

impl<W: Write> RowSink for WriterSink<W> {
    fn write_row(&mut self, line: &str) -> Result<()> {
        self.ensure_open("write to")?;
        self.inner
            .write_all(line.as_bytes())
            .map_err(|e| PointCsvError::Sink(format!("write failed: {}", e)))?;
        self.rows_written += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.ensure_open("flush")?;
        self.inner
            .flush()
            .map_err(|e| PointCsvError::Sink(format!("flush failed: {}", e)))
    }

    fn close(&mut self) -> Result<()> {
        self.ensure_open("close")?;
        self.inner
            .flush()
            .map_err(|e| PointCsvError::Sink(format!("close failed: {}", e)))?;
        self.closed = true;
        Ok(())
    }
}
