//! Rendering of the final request listing.
//!
//! # Supported Formats
//!
//! - **Table**: aligned columns for a terminal (the default)
//! - **JSON**: a pretty-printed array of requests
//! - **Template**: a user-supplied Jinja2 template rendered with `minijinja`
//!
//! Every timestamp is converted to the configured [`DisplayZone`] before it
//! is written.

mod json;
mod table;
mod template;
mod zone;

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use serde::Serialize;

use crate::error::RequestListError;
use crate::request::Request;

pub use json::write_json;
pub use table::write_table;
pub use template::write_template;
pub use zone::DisplayZone;

/// Output format selected in the configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable aligned columns.
    #[default]
    Table,
    /// Pretty-printed JSON array.
    Json,
    /// User-supplied `minijinja` template.
    Template,
}

impl OutputFormat {
    /// Returns the configuration spelling of the format.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Json => "json",
            Self::Template => "template",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = RequestListError;

    /// Parses a format name case-insensitively; a blank name selects the
    /// table.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "template" => Ok(Self::Template),
            _ => Err(RequestListError::configuration(format!(
                "unsupported format `{s}` (expected table, json, or template)"
            ))),
        }
    }
}

/// Everything needed to render a listing.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions<'a> {
    /// Selected output format.
    pub format: OutputFormat,
    /// Zone timestamps are shown in.
    pub zone: DisplayZone,
    /// Template source, required by [`OutputFormat::Template`].
    pub template: Option<&'a str>,
}

/// Renders `requests` to `writer` in the selected format.
///
/// # Errors
///
/// Returns [`RequestListError::Configuration`] when the template format is
/// selected without a template or the template is invalid, and
/// [`RequestListError::Io`] when writing fails.
pub fn render<W: Write>(
    writer: &mut W,
    requests: &[Request],
    options: &RenderOptions<'_>,
) -> Result<(), RequestListError> {
    match options.format {
        OutputFormat::Table => write_table(writer, requests, options.zone),
        OutputFormat::Json => write_json(writer, requests, options.zone),
        OutputFormat::Template => {
            let template = options.template.ok_or_else(|| {
                RequestListError::configuration("format `template` requires a template file")
            })?;
            write_template(writer, requests, options.zone, template)
        }
    }
}

/// Serialisable view of a request with zone-adjusted RFC 3339 timestamps.
#[derive(Debug, Clone, Serialize)]
struct RequestView<'a> {
    repository: &'a str,
    name: &'a str,
    state: &'a str,
    url: &'a str,
    created: String,
    updated: String,
}

impl<'a> RequestView<'a> {
    fn new(request: &'a Request, zone: DisplayZone) -> Self {
        Self {
            repository: &request.repository,
            name: &request.name,
            state: &request.state,
            url: &request.url,
            created: zone.rfc3339(request.created),
            updated: zone.rfc3339(request.updated),
        }
    }
}

fn views(requests: &[Request], zone: DisplayZone) -> Vec<RequestView<'_>> {
    requests
        .iter()
        .map(|request| RequestView::new(request, zone))
        .collect()
}
