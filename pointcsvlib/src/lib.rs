//! # pointcsvlib
//!
//! Lays out per-point time series side by side in a single wide CSV table.
//!
//! ## Overview
//!
//! A report's data arrives as a push-style stream: a point starts, its
//! samples follow, the next point starts, and so on. Each point becomes a
//! block of five columns:
//!
//! - **Name**: the point's display name, repeated on every sample
//! - **Time**: the sample timestamp as `yyyy/MM/dd HH:mm:ss`
//! - **Value**: the raw value's string form
//! - **Rendered**: the value as text from the point's renderer
//! - **Annotation**: free text attached to the sample
//!
//! Blocks are placed left to right in the order their points started. Points
//! with fewer samples are padded with empty cells so that every row has the
//! same number of fields.
//!
//! ## Pipeline
//!
//! 1. [`ColumnSetAccumulator`] buffers the stream column by column
//! 2. [`RowMaterializer`] turns the frozen columns into rectangular rows
//! 3. [`RowEncoder`] encodes each row, [`RowSink`] receives the lines
//!
//! [`CsvReportStreamer`] drives the pipeline behind the
//! [`ReportStreamHandler`] interface.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use pointcsvlib::{
//!     AnalogRenderer, CsvReportStreamer, DataValue, DefaultHeaders, PointInfo,
//!     ReportStreamHandler, StreamOptions, WriterSink,
//! };
//!
//! let mut streamer = CsvReportStreamer::new(
//!     WriterSink::new(Vec::new()),
//!     &DefaultHeaders,
//!     StreamOptions::new(),
//! );
//! streamer
//!     .on_point_start(PointInfo::new("Temp", Arc::new(AnalogRenderer::new(1))))
//!     .unwrap();
//! streamer.on_point_value(DataValue::new(0, 21.5)).unwrap();
//! streamer
//!     .on_point_value(DataValue::missing(60_000).annotation("FAULT"))
//!     .unwrap();
//! streamer.on_stream_end().unwrap();
//!
//! let csv = String::from_utf8(streamer.into_sink().into_inner()).unwrap();
//! assert_eq!(
//!     csv,
//!     "Point name,Time,Value,Rendered,Annotation\r\n\
//!      Temp,1970/01/01 00:00:00,21.5,21.5,\r\n\
//!      Temp,1970/01/01 00:01:00,,,FAULT\r\n"
//! );
//! ```

pub mod encode;
pub mod error;
pub mod events;
pub mod headers;
pub mod options;
pub mod render;
pub mod sink;
pub mod stream;
pub mod table;
pub mod value;

pub use encode::{CsvRowEncoder, RowEncoder};
pub use error::PointCsvError;
pub use events::{replay, RecordedEvent, ReplayStats};
pub use headers::{ColumnHeaders, DefaultHeaders, HeaderBundle, HeaderKey, MapHeaders, BLOCK_WIDTH};
pub use options::{LineTerminator, StreamOptions, TimeZone};
pub use render::{
    AnalogRenderer, BinaryRenderer, MultistateRenderer, PlainRenderer, RenderError, RenderHint,
    RendererConfig, RendererRef, StateLabel, TextRenderer,
};
pub use sink::{RowSink, WriterSink};
pub use stream::{
    CsvReportStreamer, DataValue, PointInfo, ReportStreamHandler, StreamState, StreamSummary,
};
pub use table::{BlockId, Column, ColumnSetAccumulator, RowMaterializer, Rows};
pub use value::{Cell, Value};

/// Result type for pointcsvlib operations
pub type Result<T> = std::result::Result<T, PointCsvError>;
