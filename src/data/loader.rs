use std::path::Path;

use crate::error::{PlotError, Result};
use crate::state::dataset::TabularDataset;

/// Load a CSV file into a [`TabularDataset`].
///
/// This is a plain line/comma splitter: one layer of surrounding double
/// quotes is stripped from each cell, but quoted commas are not understood.
/// Blank lines are skipped; every remaining row must have as many cells as
/// the header.
pub fn load_csv(path: &Path) -> Result<TabularDataset> {
    let content = std::fs::read(path).map_err(|e| PlotError::file_unreadable(path, e))?;

    // Fallback: treat non-UTF-8 input as latin1.
    let text = String::from_utf8(content.clone())
        .unwrap_or_else(|_| content.iter().map(|&b| b as char).collect());

    let rows = parse_rows(path, &text)?;
    tracing::info!(
        "Loaded {:?}: {} columns, {} rows",
        path,
        rows.first().map(|h| h.len()).unwrap_or(0),
        rows.len().saturating_sub(1)
    );
    Ok(TabularDataset::new(path.display().to_string(), rows))
}

/// Split already-read CSV text into validated rows.
pub fn parse_rows(path: &Path, text: &str) -> Result<Vec<Vec<String>>> {
    let mut rows: Vec<Vec<String>> = Vec::new();
    for (line_idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let row: Vec<String> = split_cells(line).map(|c| strip_quotes(c).to_string()).collect();

        if let Some(header) = rows.first() {
            if row.len() != header.len() {
                return Err(PlotError::MalformedRow {
                    path: path.to_path_buf(),
                    line: line_idx + 1,
                    expected: header.len(),
                    found: row.len(),
                });
            }
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(PlotError::EmptyFile {
            path: path.to_path_buf(),
        });
    }
    Ok(rows)
}

/// Comma-split one line. A single trailing comma ends the last cell rather
/// than opening an empty one.
fn split_cells(line: &str) -> impl Iterator<Item = &str> {
    line.strip_suffix(',').unwrap_or(line).split(',')
}

/// Strip exactly one leading and one trailing `"` from a cell.
pub fn strip_quotes(cell: &str) -> &str {
    let cell = cell.strip_prefix('"').unwrap_or(cell);
    cell.strip_suffix('"').unwrap_or(cell)
}

/// Parse a cell the way C `atof` does: surrounding whitespace is ignored,
/// the longest numeric prefix wins, and anything else is `0.0`.
///
/// Returns the value and whether the whole trimmed cell was numeric.
pub fn parse_cell(cell: &str) -> (f64, bool) {
    let trimmed = cell.trim();
    if let Ok(v) = trimmed.parse::<f64>() {
        return (v, true);
    }
    let mut end = trimmed.len();
    while end > 0 {
        if !trimmed.is_char_boundary(end) {
            end -= 1;
            continue;
        }
        if let Ok(v) = trimmed[..end].parse::<f64>() {
            return (v, false);
        }
        end -= 1;
    }
    (0.0, false)
}

/// Parse a whole column of cells leniently.
/// Returns the values and the number of cells that fell back to a partial or
/// zero parse.
pub fn column_to_f64<'a>(cells: impl Iterator<Item = &'a str>) -> (Vec<f64>, usize) {
    let mut fallbacks = 0usize;
    let values = cells
        .map(|c| {
            let (v, exact) = parse_cell(c);
            if !exact {
                fallbacks += 1;
            }
            v
        })
        .collect();
    (values, fallbacks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn rows(text: &str) -> Result<Vec<Vec<String>>> {
        parse_rows(&PathBuf::from("test.csv"), text)
    }

    #[test]
    fn splits_lines_and_cells() {
        let r = rows("a,b,c\n1,2,3\r\n4,5,6\n").unwrap();
        assert_eq!(r.len(), 3);
        assert_eq!(r[0], vec!["a", "b", "c"]);
        assert_eq!(r[2], vec!["4", "5", "6"]);
    }

    #[test]
    fn strips_single_layer_of_quotes() {
        assert_eq!(strip_quotes("\"time\""), "time");
        assert_eq!(strip_quotes("\"\"x\"\""), "\"x\"");
        assert_eq!(strip_quotes("plain"), "plain");
        assert_eq!(strip_quotes("\""), "");
    }

    #[test]
    fn quoted_commas_mis_split() {
        let r = rows("\"a,b\",c\n1,2,3\n").unwrap();
        assert_eq!(r[0], vec!["a", "b", "c"]);
        let r = rows("\"a,b\",c\n1,2\n").unwrap_err();
        assert!(matches!(
            r,
            PlotError::MalformedRow { line: 2, expected: 3, found: 2, .. }
        ));
    }

    #[test]
    fn trailing_comma_does_not_add_a_column() {
        let r = rows("a,b,\n1,2,\n").unwrap();
        assert_eq!(r[0], vec!["a", "b"]);
        assert_eq!(r[1], vec!["1", "2"]);

        let r = rows("a,b\n1,2,\n3,4,\n").unwrap();
        assert_eq!(r.len(), 3);
        assert_eq!(r[2], vec!["3", "4"]);
    }

    #[test]
    fn inner_and_doubled_trailing_commas_keep_empty_cells() {
        let r = rows("a,,c\n1,2,,\n").unwrap();
        assert_eq!(r[0], vec!["a", "", "c"]);
        assert_eq!(r[1], vec!["1", "2", ""]);
    }

    #[test]
    fn blank_lines_are_skipped() {
        let r = rows("a,b\n\n1,2\n   \n3,4\n").unwrap();
        assert_eq!(r.len(), 3);
    }

    #[test]
    fn empty_text_is_an_error() {
        assert!(matches!(rows("\n\n"), Err(PlotError::EmptyFile { .. })));
    }

    #[test]
    fn parse_cell_is_lenient() {
        assert_eq!(parse_cell("3.5"), (3.5, true));
        assert_eq!(parse_cell("  -2e3 "), (-2000.0, true));
        assert_eq!(parse_cell("3.5kg"), (3.5, false));
        assert_eq!(parse_cell("abc"), (0.0, false));
        assert_eq!(parse_cell(""), (0.0, false));
    }

    #[test]
    fn column_parse_counts_fallbacks() {
        let cells = ["1", "x", "2.5", "7m"];
        let (values, fallbacks) = column_to_f64(cells.iter().copied());
        assert_eq!(values, vec![1.0, 0.0, 2.5, 7.0]);
        assert_eq!(fallbacks, 2);
    }

    #[test]
    fn missing_file_is_unreadable() {
        let err = load_csv(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, PlotError::FileUnreadable { .. }));
    }
}
