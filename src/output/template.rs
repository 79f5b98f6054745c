//! Template-driven rendering using Jinja2-compatible syntax.
//!
//! # Available Variables
//!
//! - `generated_at`: render timestamp (RFC 3339, display zone)
//! - `requests`: list of request objects
//!
//! Inside `{% for r in requests %}` each request exposes `r.repository`,
//! `r.name`, `r.state`, `r.url`, `r.created` and `r.updated`.

use std::io::Write;

use chrono::Utc;
use minijinja::{AutoEscape, Environment, context};

use crate::error::RequestListError;
use crate::request::Request;

use super::{DisplayZone, views};

const TEMPLATE_NAME: &str = "listing";

/// Writes `requests` through a user-provided Jinja2 template.
///
/// # Errors
///
/// Returns [`RequestListError::Configuration`] if the template has syntax
/// errors or fails to render, and [`RequestListError::Io`] if writing fails.
///
/// # Example Template
///
/// ```jinja2
/// {% for r in requests %}
/// - [{{ r.repository }}] {{ r.name }} ({{ r.url }})
/// {% endfor %}
/// ```
pub fn write_template<W: Write>(
    writer: &mut W,
    requests: &[Request],
    zone: DisplayZone,
    template_content: &str,
) -> Result<(), RequestListError> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.add_template(TEMPLATE_NAME, template_content)
        .map_err(|e| RequestListError::configuration(format!("invalid template syntax: {e}")))?;

    let ctx = context! {
        generated_at => zone.rfc3339(Utc::now()),
        requests => views(requests, zone),
    };

    let tmpl = env.get_template(TEMPLATE_NAME).map_err(|e| RequestListError::Io {
        message: format!("failed to retrieve template: {e}"),
    })?;
    let output = tmpl
        .render(ctx)
        .map_err(|e| RequestListError::configuration(format!("template rendering failed: {e}")))?;

    writer
        .write_all(output.as_bytes())
        .map_err(|e| RequestListError::Io {
            message: format!("failed to write template output: {e}"),
        })
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
