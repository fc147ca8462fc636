//! Maps left behind by earlier transformation passes

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use cssmap_codec::{CodecError, RawSourceMap, SourceMapConsumer, SourceMapGenerator};
use once_cell::sync::Lazy;
use once_cell::unsync::OnceCell;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix of the comment text that points at a source map
pub const ANNOTATION_MARKER: &str = "# sourceMappingURL=";

static ANNOTATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/\*\s*# sourceMappingURL=(.*?)\s*\*/").unwrap());

const INLINE_PREFIXES: [&str; 3] = [
    "data:application/json;charset=utf-8;base64,",
    "data:application/json;charset=utf8;base64,",
    "data:application/json;base64,",
];
const URI_PREFIX: &str = "data:application/json,";

#[derive(Debug, Error)]
pub enum PreviousMapError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// An inline annotation uses an encoding other than base64 or URI escaping
    #[error("Unsupported source map encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("Inline source map is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Inline source map is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Neither the input nor the map says which file the map describes
    #[error("Previous source map has no `file` and the input has no path")]
    UnknownFile,
}

/// Where the map of a previous pass comes from
///
/// Deserializes from `false` (ignore any previous map), a JSON string, or a
/// map object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrevMapSource {
    Flag(bool),
    Text(String),
    Map(Box<RawSourceMap>),
}

impl From<&SourceMapGenerator> for PrevMapSource {
    fn from(map: &SourceMapGenerator) -> Self {
        PrevMapSource::Map(Box::new(map.to_raw()))
    }
}

/// A source map produced by an earlier pass over an input
///
/// `file` is the path of the stylesheet this map describes, that is, the
/// output of the earlier pass and the input of the current one.
#[derive(Debug)]
pub struct PreviousMap {
    text: String,
    raw: RawSourceMap,
    file: String,
    root: Option<String>,
    inline: bool,
    annotation: bool,
    consumer: OnceCell<SourceMapConsumer>,
}

impl PreviousMap {
    /// Wrap map JSON describing `file`
    ///
    /// The JSON is parsed right away; mappings are decoded on first use.
    pub fn new(text: impl Into<String>, file: impl Into<String>) -> Result<Self, CodecError> {
        let text = text.into();
        let raw = RawSourceMap::from_json(&text)?;
        Ok(PreviousMap {
            text,
            raw,
            file: file.into(),
            root: None,
            inline: false,
            annotation: false,
            consumer: OnceCell::new(),
        })
    }

    /// Directory the map's sources are relative to
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Mark the map as having been embedded in its stylesheet
    pub fn with_inline(mut self, inline: bool) -> Self {
        self.inline = inline;
        self
    }

    /// Mark the stylesheet as having carried an annotation comment
    pub fn with_annotation(mut self, annotation: bool) -> Self {
        self.annotation = annotation;
        self
    }

    /// Find the map of a previous pass for an input stylesheet
    ///
    /// `prev` wins over anything found in `css`; `prev: false` ignores
    /// previous maps entirely. Without `prev`, an inline annotation comment
    /// is decoded. Annotations that reference an external file are noted
    /// but not followed, since reading files is left to the caller, who can
    /// pass the file's text as `prev`.
    ///
    /// Returns `Ok(None)` when there is no previous map.
    pub fn from_css(
        css: &str,
        from: Option<&str>,
        prev: Option<&PrevMapSource>,
    ) -> Result<Option<Self>, PreviousMapError> {
        let annotation = ANNOTATION
            .captures(css)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string());
        let inline = annotation
            .as_deref()
            .is_some_and(|text| text.starts_with("data:"));

        let text = match prev {
            Some(PrevMapSource::Flag(false)) => return Ok(None),
            Some(PrevMapSource::Text(text)) => text.clone(),
            Some(PrevMapSource::Map(raw)) => serde_json::to_string(raw).map_err(CodecError::from)?,
            Some(PrevMapSource::Flag(true)) | None => match annotation.as_deref() {
                Some(data) if inline => decode_inline(data)?,
                Some(external) => {
                    tracing::debug!(annotation = external, "External source map not loaded");
                    return Ok(None);
                }
                None => return Ok(None),
            },
        };

        let map = PreviousMap::new(text, String::new())?;
        let file = match from {
            Some(from) => from.to_string(),
            None => map.raw.file.clone().ok_or(PreviousMapError::UnknownFile)?,
        };

        Ok(Some(PreviousMap {
            file,
            inline,
            annotation: annotation.is_some(),
            ..map
        }))
    }

    /// Serialized map text
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn root(&self) -> Option<&str> {
        self.root.as_deref()
    }

    pub fn is_inline(&self) -> bool {
        self.inline
    }

    pub fn has_annotation(&self) -> bool {
        self.annotation
    }

    /// Whether the map embeds source text
    pub fn with_content(&self) -> bool {
        self.raw.has_sources_content()
    }

    /// Decoded form, built on first call and reused afterwards
    pub fn consumer(&self) -> Result<&SourceMapConsumer, CodecError> {
        self.consumer
            .get_or_try_init(|| SourceMapConsumer::from_raw(self.raw.clone()))
    }

    /// A freshly decoded copy with all embedded source text removed
    pub fn consumer_without_content(&self) -> Result<SourceMapConsumer, CodecError> {
        Ok(SourceMapConsumer::from_raw(self.raw.clone())?.without_sources_content())
    }
}

fn decode_inline(annotation: &str) -> Result<String, PreviousMapError> {
    if let Some(encoded) = annotation.strip_prefix(URI_PREFIX) {
        return Ok(percent_encoding::percent_decode_str(encoded)
            .decode_utf8()
            .map_err(|_| PreviousMapError::UnsupportedEncoding("invalid UTF-8 escape".into()))?
            .into_owned());
    }

    for prefix in INLINE_PREFIXES {
        if let Some(encoded) = annotation.strip_prefix(prefix) {
            let bytes = STANDARD.decode(encoded.trim())?;
            return Ok(String::from_utf8(bytes)?);
        }
    }

    let encoding = annotation
        .split_once(',')
        .map(|(head, _)| head)
        .unwrap_or(annotation);
    Err(PreviousMapError::UnsupportedEncoding(encoding.to_string()))
}
