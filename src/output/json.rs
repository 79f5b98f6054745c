//! JSON formatter for request listings.

use std::io::Write;

use crate::error::{RequestListError, io_error};
use crate::request::Request;

use super::{DisplayZone, views};

/// Writes `requests` as a pretty-printed JSON array followed by a newline.
///
/// # Errors
///
/// Returns [`RequestListError::Io`] if serialisation or writing fails.
pub fn write_json<W: Write>(
    writer: &mut W,
    requests: &[Request],
    zone: DisplayZone,
) -> Result<(), RequestListError> {
    serde_json::to_writer_pretty(&mut *writer, &views(requests, zone)).map_err(|e| {
        RequestListError::Io {
            message: format!("JSON serialization failed: {e}"),
        }
    })?;
    writeln!(writer).map_err(|e| io_error(&e))
}
