//! Text rendering of raw point values.
//!
//! Each point carries a [`TextRenderer`] that turns its raw values into the
//! human-readable text written to the `Rendered` column. The report always
//! asks for [`RenderHint::Full`]; [`RenderHint::Raw`] drops units and labels.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;
use thiserror::Error;

use crate::value::Value;

/// How much decoration a renderer should add.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderHint {
    /// Value with units, labels and formatting
    #[default]
    Full,
    /// Bare value
    Raw,
}

/// Errors produced by a renderer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// The renderer does not handle values of this data type
    #[error("{renderer} renderer cannot render {value_type} value '{value}'")]
    UnsupportedValue {
        renderer: &'static str,
        value_type: &'static str,
        value: String,
    },
}

impl RenderError {
    fn unsupported(renderer: &'static str, value: &Value) -> Self {
        RenderError::UnsupportedValue {
            renderer,
            value_type: value.type_name(),
            value: value.to_string(),
        }
    }
}

/// Turns a raw value into display text.
pub trait TextRenderer: Debug {
    fn render(&self, value: &Value, hint: RenderHint) -> Result<String, RenderError>;
}

/// Shared handle to a point's renderer.
pub type RendererRef = Arc<dyn TextRenderer>;

/// Renders any value as its string form followed by a suffix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlainRenderer {
    pub suffix: String,
}

impl PlainRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the unit suffix
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }
}

impl TextRenderer for PlainRenderer {
    fn render(&self, value: &Value, hint: RenderHint) -> Result<String, RenderError> {
        Ok(match hint {
            RenderHint::Full => format!("{}{}", value, self.suffix),
            RenderHint::Raw => value.to_string(),
        })
    }
}

/// Renders numeric values with a fixed number of decimals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalogRenderer {
    pub decimals: usize,
    pub suffix: String,
}

impl AnalogRenderer {
    pub fn new(decimals: usize) -> Self {
        Self {
            decimals,
            suffix: String::new(),
        }
    }

    /// Builder: set the unit suffix
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }
}

impl TextRenderer for AnalogRenderer {
    fn render(&self, value: &Value, hint: RenderHint) -> Result<String, RenderError> {
        let number = value
            .as_f64()
            .ok_or_else(|| RenderError::unsupported("analog", value))?;
        let text = format!("{:.*}", self.decimals, number);
        Ok(match hint {
            RenderHint::Full => text + &self.suffix,
            RenderHint::Raw => text,
        })
    }
}

/// Renders binary values as one of two labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryRenderer {
    pub zero_label: String,
    pub one_label: String,
}

impl BinaryRenderer {
    pub fn new(zero_label: impl Into<String>, one_label: impl Into<String>) -> Self {
        Self {
            zero_label: zero_label.into(),
            one_label: one_label.into(),
        }
    }
}

impl TextRenderer for BinaryRenderer {
    fn render(&self, value: &Value, hint: RenderHint) -> Result<String, RenderError> {
        let Value::Binary(state) = value else {
            return Err(RenderError::unsupported("binary", value));
        };
        Ok(match (hint, state) {
            (RenderHint::Full, true) => self.one_label.clone(),
            (RenderHint::Full, false) => self.zero_label.clone(),
            (RenderHint::Raw, true) => "1".to_string(),
            (RenderHint::Raw, false) => "0".to_string(),
        })
    }
}

/// Renders multistate values through a state → label table.
///
/// States without a label render as their code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultistateRenderer {
    pub states: BTreeMap<i32, String>,
}

impl MultistateRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: label one state
    pub fn state(mut self, code: i32, label: impl Into<String>) -> Self {
        self.states.insert(code, label.into());
        self
    }
}

impl TextRenderer for MultistateRenderer {
    fn render(&self, value: &Value, hint: RenderHint) -> Result<String, RenderError> {
        let Value::MultiState(code) = value else {
            return Err(RenderError::unsupported("multistate", value));
        };
        if hint == RenderHint::Raw {
            return Ok(code.to_string());
        }
        Ok(self
            .states
            .get(code)
            .cloned()
            .unwrap_or_else(|| code.to_string()))
    }
}

/// Serializable description of a stock renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RendererConfig {
    Plain {
        #[serde(default)]
        suffix: String,
    },
    Analog {
        #[serde(default)]
        decimals: usize,
        #[serde(default)]
        suffix: String,
    },
    Binary {
        zero_label: String,
        one_label: String,
    },
    Multistate {
        #[serde(default)]
        states: Vec<StateLabel>,
    },
}

/// Label for one multistate code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateLabel {
    pub code: i32,
    pub label: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        RendererConfig::Plain {
            suffix: String::new(),
        }
    }
}

impl RendererConfig {
    /// Build the renderer this config describes
    pub fn build(&self) -> RendererRef {
        match self {
            RendererConfig::Plain { suffix } => Arc::new(PlainRenderer::new().suffix(suffix)),
            RendererConfig::Analog { decimals, suffix } => {
                Arc::new(AnalogRenderer::new(*decimals).suffix(suffix))
            }
            RendererConfig::Binary {
                zero_label,
                one_label,
            } => Arc::new(BinaryRenderer::new(zero_label, one_label)),
            RendererConfig::Multistate { states } => Arc::new(MultistateRenderer {
                states: states
                    .iter()
                    .map(|s| (s.code, s.label.clone()))
                    .collect(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_renderer() {
        let r = PlainRenderer::new().suffix(" kWh");
        assert_eq!(r.render(&Value::Numeric(3.5), RenderHint::Full).unwrap(), "3.5 kWh");
        assert_eq!(r.render(&Value::Numeric(3.5), RenderHint::Raw).unwrap(), "3.5");
        assert_eq!(r.render(&Value::from("ok"), RenderHint::Full).unwrap(), "ok kWh");
    }

    #[test]
    fn test_analog_renderer() {
        let r = AnalogRenderer::new(2).suffix(" °C");
        assert_eq!(r.render(&Value::Numeric(21.5), RenderHint::Full).unwrap(), "21.50 °C");
        assert_eq!(r.render(&Value::MultiState(7), RenderHint::Raw).unwrap(), "7.00");
    }

    #[test]
    fn test_analog_rejects_binary() {
        let r = AnalogRenderer::new(1);
        let err = r
            .render(&Value::Binary(true), RenderHint::Full)
            .unwrap_err();
        assert_eq!(
            err,
            RenderError::UnsupportedValue {
                renderer: "analog",
                value_type: "binary",
                value: "true".to_string(),
            }
        );
    }

    #[test]
    fn test_binary_renderer() {
        let r = BinaryRenderer::new("Off", "On");
        assert_eq!(r.render(&Value::Binary(true), RenderHint::Full).unwrap(), "On");
        assert_eq!(r.render(&Value::Binary(false), RenderHint::Full).unwrap(), "Off");
        assert_eq!(r.render(&Value::Binary(true), RenderHint::Raw).unwrap(), "1");
        assert!(r.render(&Value::Numeric(1.0), RenderHint::Full).is_err());
    }

    #[test]
    fn test_multistate_renderer() {
        let r = MultistateRenderer::new()
            .state(1, "Running")
            .state(2, "Stopped");
        assert_eq!(r.render(&Value::MultiState(2), RenderHint::Full).unwrap(), "Stopped");
        // Unlabelled state falls back to its code
        assert_eq!(r.render(&Value::MultiState(9), RenderHint::Full).unwrap(), "9");
        assert_eq!(r.render(&Value::MultiState(1), RenderHint::Raw).unwrap(), "1");
    }

    #[test]
    fn test_renderer_config_from_json() {
        let config: RendererConfig =
            serde_json::from_str(r#"{"type":"multistate","states":[{"code":1,"label":"Open"},{"code":2,"label":"Closed"}]}"#)
                .unwrap();
        let renderer = config.build();
        assert_eq!(
            renderer.render(&Value::MultiState(1), RenderHint::Full).unwrap(),
            "Open"
        );

        let config: RendererConfig =
            serde_json::from_str(r#"{"type":"analog","decimals":1,"suffix":"%"}"#).unwrap();
        assert_eq!(
            config.build().render(&Value::Numeric(0.26), RenderHint::Full).unwrap(),
            "0.3%"
        );
    }
}
