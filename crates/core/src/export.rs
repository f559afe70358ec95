/// Column layout for tabular export of a record type.
pub trait Tabular {
    /// Header row.
    fn headers() -> &'static [&'static str];

    /// One cell per header, already formatted for display.
    fn row(&self) -> Vec<String>;
}

/// Placeholder written for an absent optional value.
pub const MISSING_CELL: &str = "N/A";

/// Format an optional number, trimming a trailing `.0`.
#[must_use]
pub fn number_cell(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING_CELL.to_owned(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_cells() {
        assert_eq!(number_cell(Some(72.0)), "72");
        assert_eq!(number_cell(Some(4.25)), "4.25");
        assert_eq!(number_cell(None), "N/A");
    }
}
