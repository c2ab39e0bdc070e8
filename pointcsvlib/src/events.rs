//! Recorded event streams.
//!
//! A recording is JSON lines, one event per line:
//!
//! ```text
//! {"event":"point","name":"Boiler temp","renderer":{"type":"analog","decimals":1,"suffix":" °C"}}
//! {"event":"value","time":1709296496000,"value":21.5}
//! {"event":"value","time":1709296556000,"value":null,"annotation":"FAULT"}
//! ```
//!
//! Blank lines are ignored. [`replay`] feeds a recording to any
//! [`ReportStreamHandler`] and ends the stream after the last line.

use serde::{Deserialize, Serialize};
use std::io::BufRead;
use tracing::debug;

use crate::error::PointCsvError;
use crate::render::RendererConfig;
use crate::stream::{DataValue, PointInfo, ReportStreamHandler};
use crate::value::Value;
use crate::Result;

/// One line of a recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RecordedEvent {
    /// A new point starts; following values belong to it
    Point {
        name: String,
        #[serde(default)]
        renderer: RendererConfig,
    },
    /// A sample of the current point
    Value {
        time: i64,
        #[serde(default)]
        value: Option<Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        annotation: Option<String>,
    },
}

impl RecordedEvent {
    /// Parse a single line of a recording.
    pub fn parse(line: &str, line_number: usize) -> Result<Self> {
        serde_json::from_str(line).map_err(|e| PointCsvError::Parse {
            line: line_number,
            message: e.to_string(),
        })
    }

    /// Deliver this event to a handler.
    pub fn apply<H: ReportStreamHandler + ?Sized>(self, handler: &mut H) -> Result<()> {
        match self {
            RecordedEvent::Point { name, renderer } => {
                handler.on_point_start(PointInfo::new(name, renderer.build()))
            }
            RecordedEvent::Value {
                time,
                value,
                annotation,
            } => handler.on_point_value(DataValue {
                time,
                value,
                annotation,
            }),
        }
    }
}

/// Counts from a replayed recording.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    /// Event lines delivered
    pub events: usize,
    /// Lines read, blank lines included
    pub lines: usize,
}

/// Replay a JSON-lines recording into `handler`, then end the stream.
pub fn replay<R, H>(reader: R, handler: &mut H) -> Result<ReplayStats>
where
    R: BufRead,
    H: ReportStreamHandler + ?Sized,
{
    let mut stats = ReplayStats::default();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        stats.lines += 1;
        if line.trim().is_empty() {
            continue;
        }
        RecordedEvent::parse(&line, index + 1)?.apply(handler)?;
        stats.events += 1;
    }
    debug!(events = stats.events, lines = stats.lines, "recording replayed");
    handler.on_stream_end()?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headers::DefaultHeaders;
    use crate::options::StreamOptions;
    use crate::sink::WriterSink;
    use crate::stream::{CsvReportStreamer, StreamState};
    use std::io::Cursor;

    /// Handler that records the calls it receives.
    #[derive(Debug, Default)]
    struct CallLog {
        calls: Vec<String>,
    }

    impl ReportStreamHandler for CallLog {
        fn on_point_start(&mut self, point: PointInfo) -> Result<()> {
            self.calls.push(format!("start {}", point.name));
            Ok(())
        }

        fn on_point_value(&mut self, value: DataValue) -> Result<()> {
            self.calls.push(format!(
                "value {} {:?} {:?}",
                value.time, value.value, value.annotation
            ));
            Ok(())
        }

        fn on_stream_end(&mut self) -> Result<()> {
            self.calls.push("end".to_string());
            Ok(())
        }
    }

    #[test]
    fn test_parse_events() {
        let event = RecordedEvent::parse(r#"{"event":"point","name":"Temp"}"#, 1).unwrap();
        assert_eq!(
            event,
            RecordedEvent::Point {
                name: "Temp".to_string(),
                renderer: RendererConfig::default(),
            }
        );

        let event = RecordedEvent::parse(
            r#"{"event":"value","time":5,"value":null,"annotation":"FAULT"}"#,
            2,
        )
        .unwrap();
        assert_eq!(
            event,
            RecordedEvent::Value {
                time: 5,
                value: None,
                annotation: Some("FAULT".to_string()),
            }
        );

        let event = RecordedEvent::parse(r#"{"event":"value","time":5,"value":2}"#, 3).unwrap();
        assert_eq!(
            event,
            RecordedEvent::Value {
                time: 5,
                value: Some(Value::MultiState(2)),
                annotation: None,
            }
        );
    }

    #[test]
    fn test_parse_error_reports_line() {
        let err = RecordedEvent::parse(r#"{"event":"bogus"}"#, 7).unwrap_err();
        assert!(matches!(err, PointCsvError::Parse { line: 7, .. }));
    }

    #[test]
    fn test_replay_order_and_end() {
        let recording = "\
{\"event\":\"point\",\"name\":\"A\"}
{\"event\":\"value\",\"time\":1,\"value\":1.5}

{\"event\":\"point\",\"name\":\"B\"}
{\"event\":\"value\",\"time\":2}
";
        let mut log = CallLog::default();
        let stats = replay(Cursor::new(recording), &mut log).unwrap();
        assert_eq!(stats.events, 4);
        assert_eq!(stats.lines, 5);
        assert_eq!(
            log.calls,
            vec![
                "start A",
                "value 1 Some(Numeric(1.5)) None",
                "start B",
                "value 2 None None",
                "end",
            ]
        );
    }

    #[test]
    fn test_replay_stops_at_bad_line() {
        let recording = "{\"event\":\"point\",\"name\":\"A\"}\nnot json\n";
        let mut log = CallLog::default();
        let err = replay(Cursor::new(recording), &mut log).unwrap_err();
        assert!(matches!(err, PointCsvError::Parse { line: 2, .. }));
        assert_eq!(log.calls, vec!["start A"]);
    }

    #[test]
    fn test_replay_into_streamer() {
        let recording = concat!(
            r#"{"event":"point","name":"Pump","renderer":{"type":"binary","zero_label":"Off","one_label":"On"}}"#,
            "\n",
            r#"{"event":"value","time":0,"value":true}"#,
            "\n",
        );
        let mut streamer = CsvReportStreamer::new(
            WriterSink::new(Vec::new()),
            &DefaultHeaders,
            StreamOptions::new(),
        );
        replay(Cursor::new(recording), &mut streamer).unwrap();
        assert_eq!(streamer.state(), StreamState::Closed);

        let text = String::from_utf8(streamer.into_sink().into_inner()).unwrap();
        assert_eq!(
            text,
            "Point name,Time,Value,Rendered,Annotation\r\nPump,1970/01/01 00:00:00,true,On,\r\n"
        );
    }
}
