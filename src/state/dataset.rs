/// One loaded CSV file: header row followed by data rows, all as raw strings.
///
/// Every row has the same number of cells as the header; the loader rejects
/// ragged files before a `TabularDataset` is ever built.
#[derive(Debug, Clone, PartialEq)]
pub struct TabularDataset {
    pub name: String,
    rows: Vec<Vec<String>>,
}

impl TabularDataset {
    /// Build a dataset from already-validated rows. Row 0 is the header.
    pub fn new(name: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_count(&self) -> usize {
        self.rows.first().map(|h| h.len()).unwrap_or(0)
    }

    /// Number of data rows (header excluded).
    pub fn row_count(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }

    pub fn headers(&self) -> &[String] {
        self.rows.first().map(|h| h.as_slice()).unwrap_or(&[])
    }

    pub fn header(&self, column: usize) -> Option<&str> {
        self.headers().get(column).map(|s| s.as_str())
    }

    /// Raw cells of one column, in row order, header excluded.
    pub fn column_cells(&self, column: usize) -> impl Iterator<Item = &str> + '_ {
        self.rows
            .iter()
            .skip(1)
            .filter_map(move |row| row.get(column).map(|s| s.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TabularDataset {
        TabularDataset::new(
            "sample.csv",
            vec![
                vec!["a".into(), "b".into()],
                vec!["1".into(), "2".into()],
                vec!["3".into(), "4".into()],
            ],
        )
    }

    #[test]
    fn counts_exclude_header() {
        let ds = sample();
        assert_eq!(ds.column_count(), 2);
        assert_eq!(ds.row_count(), 2);
        assert_eq!(ds.header(1), Some("b"));
        assert_eq!(ds.header(2), None);
    }

    #[test]
    fn column_cells_skip_header() {
        let ds = sample();
        let cells: Vec<&str> = ds.column_cells(1).collect();
        assert_eq!(cells, vec!["2", "4"]);
    }

    #[test]
    fn empty_dataset_has_no_columns() {
        let ds = TabularDataset::new("empty.csv", Vec::new());
        assert!(ds.is_empty());
        assert_eq!(ds.column_count(), 0);
        assert_eq!(ds.row_count(), 0);
    }
}
