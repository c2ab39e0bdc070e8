//! Column header text.
//!
//! Every point block starts with the same five header cells. Their text comes
//! from a [`HeaderBundle`], looked up once per stream by bundle key.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::PointCsvError;
use crate::Result;

/// Number of columns in one point block
pub const BLOCK_WIDTH: usize = 5;

/// The five columns of a point block, in layout order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderKey {
    Name,
    Time,
    Value,
    Rendered,
    Annotation,
}

impl HeaderKey {
    /// All keys in column order
    pub const ALL: [HeaderKey; BLOCK_WIDTH] = [
        HeaderKey::Name,
        HeaderKey::Time,
        HeaderKey::Value,
        HeaderKey::Rendered,
        HeaderKey::Annotation,
    ];

    /// Message bundle key for this header
    pub fn bundle_key(&self) -> &'static str {
        match self {
            HeaderKey::Name => "reports.pointName",
            HeaderKey::Time => "common.time",
            HeaderKey::Value => "common.value",
            HeaderKey::Rendered => "reports.rendered",
            HeaderKey::Annotation => "common.annotation",
        }
    }

    /// Position of this column inside its block
    pub fn offset(&self) -> usize {
        *self as usize
    }
}

/// Source of localized header text.
pub trait HeaderBundle {
    fn lookup(&self, key: HeaderKey) -> String;
}

/// English header text.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHeaders;

impl HeaderBundle for DefaultHeaders {
    fn lookup(&self, key: HeaderKey) -> String {
        match key {
            HeaderKey::Name => "Point name",
            HeaderKey::Time => "Time",
            HeaderKey::Value => "Value",
            HeaderKey::Rendered => "Rendered",
            HeaderKey::Annotation => "Annotation",
        }
        .to_string()
    }
}

/// Header text from a bundle-key → text map.
///
/// Keys missing from the map fall back to [`DefaultHeaders`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapHeaders {
    messages: HashMap<String, String>,
}

impl MapHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the text for one bundle key
    pub fn message(mut self, bundle_key: impl Into<String>, text: impl Into<String>) -> Self {
        self.messages.insert(bundle_key.into(), text.into());
        self
    }

    /// Parse a JSON object of bundle key → text.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| PointCsvError::Config(format!("invalid header bundle: {}", e)))
    }

    /// Load a JSON header bundle from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&json)
    }
}

impl HeaderBundle for MapHeaders {
    fn lookup(&self, key: HeaderKey) -> String {
        self.messages
            .get(key.bundle_key())
            .cloned()
            .unwrap_or_else(|| DefaultHeaders.lookup(key))
    }
}

/// The five header strings, resolved once and copied into every block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnHeaders {
    texts: [String; BLOCK_WIDTH],
}

impl ColumnHeaders {
    pub fn from_bundle(bundle: &dyn HeaderBundle) -> Self {
        Self {
            texts: HeaderKey::ALL.map(|key| bundle.lookup(key)),
        }
    }

    pub fn get(&self, key: HeaderKey) -> &str {
        &self.texts[key.offset()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.texts.iter().map(String::as_str)
    }
}

impl Default for ColumnHeaders {
    fn default() -> Self {
        Self::from_bundle(&DefaultHeaders)
    }
}
