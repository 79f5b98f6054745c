//! Aligned plain-text table for terminals.

use std::io::Write;

use unicode_width::UnicodeWidthStr;

use crate::error::{RequestListError, io_error};
use crate::request::Request;

use super::DisplayZone;

const HEADERS: [&str; 6] = ["Repository", "Name", "State", "URL", "Created", "Updated"];
const TIMESTAMP_PATTERN: &str = "%Y-%m-%d %H:%M";
const COLUMN_GAP: &str = "  ";

/// Writes `requests` as a table with one header row.
///
/// Column widths are measured in terminal cells, so wide characters in
/// titles keep the columns aligned. Trailing padding is not written.
///
/// # Errors
///
/// Returns [`RequestListError::Io`] if writing fails.
pub fn write_table<W: Write>(
    writer: &mut W,
    requests: &[Request],
    zone: DisplayZone,
) -> Result<(), RequestListError> {
    let rows: Vec<[String; 6]> = requests
        .iter()
        .map(|request| {
            [
                request.repository.clone(),
                request.name.clone(),
                request.state.clone(),
                request.url.clone(),
                zone.format(request.created, TIMESTAMP_PATTERN),
                zone.format(request.updated, TIMESTAMP_PATTERN),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|header| header.width());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.width());
        }
    }

    write_row(writer, &HEADERS, &widths)?;
    for row in &rows {
        write_row(writer, row, &widths)?;
    }
    Ok(())
}

fn write_row<W: Write, S: AsRef<str>>(
    writer: &mut W,
    cells: &[S],
    widths: &[usize],
) -> Result<(), RequestListError> {
    let mut line = String::new();
    for (index, (cell, width)) in cells.iter().zip(widths).enumerate() {
        let text = cell.as_ref();
        if index > 0 {
            line.push_str(COLUMN_GAP);
        }
        line.push_str(text);
        line.extend(std::iter::repeat_n(' ', width.saturating_sub(text.width())));
    }
    writeln!(writer, "{}", line.trim_end()).map_err(|e| io_error(&e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::test_helpers::request;

    fn rendered(requests: &[Request]) -> String {
        let zone: DisplayZone = "UTC".parse().expect("zone should parse");
        let mut buffer = Vec::new();
        write_table(&mut buffer, requests, zone).expect("should write table");
        String::from_utf8(buffer).expect("output should be valid UTF-8")
    }

    #[test]
    fn aligns_columns_to_the_widest_cell() {
        let output = rendered(&[
            request("group/app", "short", 9),
            request("group/much-longer-name", "x", 10),
        ]);

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        let name_columns: Vec<Option<usize>> = [("Name", 0), ("short", 1), ("x", 2)]
            .iter()
            .map(|(needle, line)| lines.get(*line).and_then(|text| text.find(needle)))
            .collect();
        assert!(
            name_columns.windows(2).all(|pair| pair.first() == pair.get(1)),
            "name column misaligned:\n{output}"
        );
    }

    #[test]
    fn renders_timestamps_in_the_display_zone() {
        let output = rendered(&[request("group/app", "first", 9)]);

        assert!(output.contains("2024-06-01 09:00"), "missing created: {output}");
        assert!(output.contains("2024-06-02 09:30"), "missing updated: {output}");
    }

    #[test]
    fn wide_characters_are_measured_in_cells() {
        let output = rendered(&[
            request("group/app", "修正中", 9),
            request("group/app", "abcd", 10),
        ]);

        let state_offsets: Vec<usize> = output
            .lines()
            .skip(1)
            .filter_map(|line| line.split_once("opened").map(|(prefix, _)| prefix.width()))
            .collect();
        assert_eq!(state_offsets.len(), 2);
        assert!(
            state_offsets.windows(2).all(|pair| pair.first() == pair.get(1)),
            "state column misaligned:\n{output}"
        );
    }

    #[test]
    fn empty_listing_prints_only_the_header() {
        let output = rendered(&[]);

        assert_eq!(output, "Repository  Name  State  URL  Created  Updated\n");
    }
}
