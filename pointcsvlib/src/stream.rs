//! Streaming driver.
//!
//! [`CsvReportStreamer`] receives the report's point data as a push-style
//! event stream, buffers it in a [`ColumnSetAccumulator`] and, once the
//! stream ends, writes the whole table through a [`RowEncoder`] into a
//! [`RowSink`].
//!
//! Lifecycle: `Idle → Accumulating → Materializing → Closed`. Any call that
//! does not fit the current state fails with a protocol error. A failing
//! collaborator aborts the run and leaves the streamer `Closed`; the sink is
//! not finalized in that case.

use serde::Serialize;
use std::fmt;
use tracing::{debug, info, warn};

use crate::encode::{CsvRowEncoder, RowEncoder};
use crate::error::PointCsvError;
use crate::headers::{ColumnHeaders, HeaderBundle};
use crate::options::{StreamOptions, TimeZone};
use crate::render::RendererRef;
use crate::sink::RowSink;
use crate::table::ColumnSetAccumulator;
use crate::value::Value;
use crate::Result;

/// Metadata announced when a new point starts.
#[derive(Debug, Clone)]
pub struct PointInfo {
    /// Display name written to every `Name` cell of the point
    pub name: String,
    /// Renderer for the point's values
    pub renderer: RendererRef,
}

impl PointInfo {
    pub fn new(name: impl Into<String>, renderer: RendererRef) -> Self {
        Self {
            name: name.into(),
            renderer,
        }
    }
}

/// One sample of the current point.
#[derive(Debug, Clone, PartialEq)]
pub struct DataValue {
    /// Epoch milliseconds
    pub time: i64,
    /// Raw value; `None` when the source had no value
    pub value: Option<Value>,
    pub annotation: Option<String>,
}

impl DataValue {
    pub fn new(time: i64, value: impl Into<Value>) -> Self {
        Self {
            time,
            value: Some(value.into()),
            annotation: None,
        }
    }

    /// A sample without a value
    pub fn missing(time: i64) -> Self {
        Self {
            time,
            value: None,
            annotation: None,
        }
    }

    /// Builder: attach an annotation
    pub fn annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }
}

/// Receiver of a report's point data, in source order.
pub trait ReportStreamHandler {
    fn on_point_start(&mut self, point: PointInfo) -> Result<()>;
    fn on_point_value(&mut self, value: DataValue) -> Result<()>;
    fn on_stream_end(&mut self) -> Result<()>;
}

/// Lifecycle state of a streamer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Idle,
    Accumulating,
    Materializing,
    Closed,
}

impl fmt::Display for StreamState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StreamState::Idle => "idle",
            StreamState::Accumulating => "accumulating",
            StreamState::Materializing => "materializing",
            StreamState::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// Counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StreamSummary {
    /// Points started
    pub points: usize,
    /// Samples appended
    pub values: usize,
    /// Rows written to the sink, header row included
    pub rows: usize,
}

/// Lays out each point as a five-column block and writes one CSV table.
pub struct CsvReportStreamer<S: RowSink, E: RowEncoder = CsvRowEncoder> {
    encoder: E,
    sink: S,
    state: StreamState,
    accumulator: Option<ColumnSetAccumulator>,
    summary: StreamSummary,
}

impl<S: RowSink> CsvReportStreamer<S, CsvRowEncoder> {
    /// Create a streamer writing CSV into `sink`.
    pub fn new(sink: S, headers: &dyn HeaderBundle, options: StreamOptions) -> Self {
        Self::with_encoder(
            sink,
            CsvRowEncoder::new(&options),
            ColumnHeaders::from_bundle(headers),
            options.time_zone,
        )
    }
}

impl<S: RowSink, E: RowEncoder> CsvReportStreamer<S, E> {
    /// Create a streamer with a custom row encoder.
    pub fn with_encoder(sink: S, encoder: E, headers: ColumnHeaders, time_zone: TimeZone) -> Self {
        Self {
            encoder,
            sink,
            state: StreamState::Idle,
            accumulator: Some(ColumnSetAccumulator::new(headers, time_zone)),
            summary: StreamSummary::default(),
        }
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    pub fn summary(&self) -> StreamSummary {
        self.summary
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Give back the sink, e.g. to inspect a buffer after the run.
    pub fn into_sink(self) -> S {
        self.sink
    }

    fn accumulator_for(&mut self, call: &str) -> Result<&mut ColumnSetAccumulator> {
        match (self.state, self.accumulator.as_mut()) {
            (StreamState::Idle | StreamState::Accumulating, Some(acc)) => Ok(acc),
            (state, _) => Err(PointCsvError::protocol(format!(
                "{} is not allowed while the stream is {}",
                call, state
            ))),
        }
    }

    fn abort(&mut self, err: PointCsvError) -> PointCsvError {
        warn!(state = %self.state, error = %err, "report stream aborted");
        self.state = StreamState::Closed;
        self.accumulator = None;
        err
    }

    fn write_table(&mut self) -> Result<()> {
        let accumulator = self
            .accumulator
            .take()
            .ok_or_else(|| PointCsvError::protocol("column table already consumed"))?;
        let materializer = accumulator.into_materializer();
        debug!(
            width = materializer.width(),
            rows = materializer.row_count(),
            "materializing report table"
        );

        for row in materializer.rows() {
            let line = self.encoder.encode_row(&row)?;
            self.sink.write_row(&line)?;
            self.summary.rows += 1;
        }
        self.sink.flush()?;
        self.sink.close()
    }
}

impl<S: RowSink, E: RowEncoder> ReportStreamHandler for CsvReportStreamer<S, E> {
    fn on_point_start(&mut self, point: PointInfo) -> Result<()> {
        let acc = self.accumulator_for("point start")?;
        acc.begin_point(point.name, point.renderer);
        self.state = StreamState::Accumulating;
        self.summary.points += 1;
        Ok(())
    }

    fn on_point_value(&mut self, value: DataValue) -> Result<()> {
        if self.state != StreamState::Accumulating {
            return Err(PointCsvError::protocol(format!(
                "point value is not allowed while the stream is {}",
                self.state
            )));
        }
        let acc = self.accumulator_for("point value")?;
        let DataValue {
            time,
            value,
            annotation,
        } = value;
        if let Err(err) = acc.append_value(time, value.as_ref(), annotation) {
            return Err(self.abort(err));
        }
        self.summary.values += 1;
        Ok(())
    }

    fn on_stream_end(&mut self) -> Result<()> {
        self.accumulator_for("stream end")?;
        self.state = StreamState::Materializing;
        if let Err(err) = self.write_table() {
            return Err(self.abort(err));
        }
        self.state = StreamState::Closed;
        info!(
            points = self.summary.points,
            values = self.summary.values,
            rows = self.summary.rows,
            "report written"
        );
        Ok(())
    }
}
