//! Row encoding.
//!
//! A [`RowEncoder`] turns one materialized row into one output line. The
//! stock [`CsvRowEncoder`] delegates quoting and escaping to the `csv` crate.

use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::io;

use crate::error::PointCsvError;
use crate::options::{LineTerminator, StreamOptions};
use crate::value::Cell;
use crate::Result;

/// Encodes a row of cells into one line of output, terminator included.
pub trait RowEncoder {
    fn encode_row(&mut self, cells: &[Cell]) -> Result<String>;
}

/// CSV encoder. Missing cells become empty fields.
pub struct CsvRowEncoder {
    builder: WriterBuilder,
}

impl CsvRowEncoder {
    pub fn new(options: &StreamOptions) -> Self {
        let terminator = match options.terminator {
            LineTerminator::Crlf => Terminator::CRLF,
            LineTerminator::Lf => Terminator::Any(b'\n'),
        };
        let mut builder = WriterBuilder::new();
        builder
            .delimiter(options.delimiter)
            .terminator(terminator)
            .quote_style(QuoteStyle::Necessary)
            .flexible(true);
        Self { builder }
    }
}

impl Default for CsvRowEncoder {
    fn default() -> Self {
        Self::new(&StreamOptions::default())
    }
}

impl RowEncoder for CsvRowEncoder {
    fn encode_row(&mut self, cells: &[Cell]) -> Result<String> {
        let mut writer = self.builder.from_writer(Vec::new());
        writer.write_record(cells.iter().map(|cell| cell.as_deref().unwrap_or("")))?;
        let bytes = writer
            .into_inner()
            .map_err(|e| PointCsvError::Encode(e.into_error().into()))?;
        String::from_utf8(bytes).map_err(|e| {
            PointCsvError::Encode(io::Error::new(io::ErrorKind::InvalidData, e).into())
        })
    }
}
