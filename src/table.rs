//! Parse HTML tables from raw markup and clean the box-office columns.
//!
//! Tables are extracted with the `scraper` crate: every `<table>` in
//! document order, a row per `<tr>`, a cell per `<th>`/`<td>` in document
//! order, with the first row taken as the header. The qualifying table is
//! the first one whose header carries both a "Title" and a "Worldwide
//! gross" column.

use crate::error::AnalysisError;
use scraper::{Html, Selector};

pub const TITLE_COLUMN: &str = "Title";
pub const GROSS_COLUMN: &str = "Worldwide gross";
pub const YEAR_COLUMN: &str = "Year";
pub const RANK_COLUMN: &str = "Rank";
pub const PEAK_COLUMN: &str = "Peak";

/// A rectangular table as it appears in the page: header plus text rows.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Whether this table carries both columns the analysis needs.
    pub fn qualifies(&self) -> bool {
        self.column(TITLE_COLUMN).is_some() && self.column(GROSS_COLUMN).is_some()
    }

    fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// One cleaned film row.
#[derive(Debug, Clone)]
pub struct FilmRow {
    pub title: String,
    /// Cleaned currency value. A row that cannot be cleaned aborts the
    /// whole table instead of becoming null.
    pub gross: f64,
    pub year: Option<i64>,
    pub rank: Option<f64>,
    pub peak: Option<f64>,
}

/// The cleaned dataset for one request.
#[derive(Debug, Clone, Default)]
pub struct FilmTable {
    pub rows: Vec<FilmRow>,
}

/// Extract every `<table>` from the document, in page order.
pub fn parse_tables(html: &str) -> Vec<RawTable> {
    let document = Html::parse_document(html);
    let table_sel = Selector::parse("table").unwrap();
    let row_sel = Selector::parse("tr").unwrap();
    let cell_sel = Selector::parse("th, td").unwrap();

    let mut tables = Vec::new();
    for table in document.select(&table_sel) {
        let mut rows = table.select(&row_sel);

        let headers = match rows.next() {
            Some(header_row) => header_row
                .select(&cell_sel)
                .map(|c| cell_text(&c))
                .collect::<Vec<_>>(),
            None => continue,
        };

        let body: Vec<Vec<String>> = rows
            .map(|row| row.select(&cell_sel).map(|c| cell_text(&c)).collect())
            .filter(|cells: &Vec<String>| !cells.is_empty())
            .collect();

        tables.push(RawTable {
            headers,
            rows: body,
        });
    }
    tables
}

/// Find the first table with both required columns.
pub fn find_film_table(tables: &[RawTable]) -> Option<&RawTable> {
    tables.iter().find(|t| t.qualifies())
}

/// Clean a qualifying raw table into typed columns.
///
/// The gross column must parse for every row; Year/Rank/Peak coerce
/// unparseable values to null. A qualifying table that lacks the Year,
/// Rank, or Peak column entirely is a server-tier error.
pub fn clean(raw: &RawTable) -> Result<FilmTable, AnalysisError> {
    let title_idx = raw
        .column(TITLE_COLUMN)
        .ok_or(AnalysisError::MissingColumn(TITLE_COLUMN))?;
    let gross_idx = raw
        .column(GROSS_COLUMN)
        .ok_or(AnalysisError::MissingColumn(GROSS_COLUMN))?;
    let year_idx = raw
        .column(YEAR_COLUMN)
        .ok_or(AnalysisError::MissingColumn(YEAR_COLUMN))?;
    let rank_idx = raw
        .column(RANK_COLUMN)
        .ok_or(AnalysisError::MissingColumn(RANK_COLUMN))?;
    let peak_idx = raw
        .column(PEAK_COLUMN)
        .ok_or(AnalysisError::MissingColumn(PEAK_COLUMN))?;

    let mut rows = Vec::with_capacity(raw.rows.len());
    for cells in &raw.rows {
        let cell = |idx: usize| cells.get(idx).map(String::as_str).unwrap_or("");

        rows.push(FilmRow {
            title: cell(title_idx).to_string(),
            gross: clean_currency(cell(gross_idx))?,
            year: parse_year(cell(year_idx)),
            rank: parse_numeric(cell(rank_idx)),
            peak: parse_numeric(cell(peak_idx)),
        });
    }

    Ok(FilmTable { rows })
}

/// Strip every character that is not an ASCII digit or a decimal point,
/// then parse as a float.
///
/// "$2,847,246,203" → 2847246203.0. A raw value with stray decimal-like
/// artifacts (footnote markers and the like) can produce a malformed
/// number; that parse failure aborts the request rather than being
/// silently dropped.
pub fn clean_currency(raw: &str) -> Result<f64, AnalysisError> {
    let stripped: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    stripped
        .parse::<f64>()
        .map_err(|_| AnalysisError::BadNumber {
            column: GROSS_COLUMN,
            raw: raw.to_string(),
        })
}

/// Coerce a cell to an integer year; anything unparseable becomes null.
fn parse_year(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if let Ok(y) = trimmed.parse::<i64>() {
        return Some(y);
    }
    // Whole-valued floats ("2009.0") still count as years.
    match trimmed.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 => Some(f as i64),
        _ => None,
    }
}

/// Coerce a cell to a float; anything unparseable becomes null.
fn parse_numeric(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Whitespace-collapsed text content of a cell.
fn cell_text(cell: &scraper::ElementRef<'_>) -> String {
    cell.text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILMS_HTML: &str = r#"
    <html><body>
    <table>
      <tr><th>Key</th><th>Meaning</th></tr>
      <tr><td>*</td><td>Includes theatrical re-release</td></tr>
    </table>
    <table>
      <tr><th>Rank</th><th>Peak</th><th>Title</th><th>Worldwide gross</th><th>Year</th></tr>
      <tr><td>1</td><td>1</td><th scope="row">Avatar</th><td>$2,923,706,026</td><td>2009</td></tr>
      <tr><td>2</td><td>1</td><th scope="row">Avengers: Endgame</th><td>$2,797,501,328</td><td>2019</td></tr>
      <tr><td>3</td><td>3</td><th scope="row">Titanic</th><td>$2,257,844,554</td><td>1997</td></tr>
    </table>
    </body></html>
    "#;

    #[test]
    fn test_parse_tables_in_page_order() {
        let tables = parse_tables(FILMS_HTML);
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].headers, vec!["Key", "Meaning"]);
        assert_eq!(tables[1].headers.len(), 5);
    }

    #[test]
    fn test_find_film_table_skips_non_qualifying() {
        let tables = parse_tables(FILMS_HTML);
        let film = find_film_table(&tables).expect("film table");
        assert_eq!(film.headers[2], "Title");
        assert_eq!(film.rows.len(), 3);
    }

    #[test]
    fn test_find_film_table_none_when_missing_columns() {
        let html = r#"
        <table><tr><th>Title</th><th>Budget</th></tr>
        <tr><td>Avatar</td><td>$237,000,000</td></tr></table>
        "#;
        let tables = parse_tables(html);
        assert!(find_film_table(&tables).is_none());
    }

    #[test]
    fn test_row_header_cells_kept_in_document_order() {
        let tables = parse_tables(FILMS_HTML);
        let film = find_film_table(&tables).unwrap();
        // The Title cell is a <th scope="row"> sandwiched between <td>s.
        assert_eq!(film.rows[0][2], "Avatar");
        assert_eq!(film.rows[0][3], "$2,923,706,026");
    }

    #[test]
    fn test_clean_full_table() {
        let tables = parse_tables(FILMS_HTML);
        let film = clean(find_film_table(&tables).unwrap()).unwrap();
        assert_eq!(film.rows.len(), 3);
        assert_eq!(film.rows[0].title, "Avatar");
        assert_eq!(film.rows[0].gross, 2_923_706_026.0);
        assert_eq!(film.rows[0].year, Some(2009));
        assert_eq!(film.rows[2].rank, Some(3.0));
    }

    #[test]
    fn test_clean_currency_strips_symbols() {
        assert_eq!(clean_currency("$2,847,246,203").unwrap(), 2_847_246_203.0);
        assert_eq!(clean_currency("T$920,400,000").unwrap(), 920_400_000.0);
        assert_eq!(clean_currency("1.5").unwrap(), 1.5);
    }

    #[test]
    fn test_clean_currency_rejects_empty_and_malformed() {
        assert!(clean_currency("").is_err());
        assert!(clean_currency("n/a").is_err());
        // Two decimal artifacts survive the strip and break the parse.
        assert!(clean_currency("$1.2 billion (approx. 1.9)").is_err());
    }

    #[test]
    fn test_year_coercion() {
        assert_eq!(parse_year("2015"), Some(2015));
        assert_eq!(parse_year(" 2009 "), Some(2009));
        assert_eq!(parse_year("2009.0"), Some(2009));
        assert_eq!(parse_year("2019*"), None);
        assert_eq!(parse_year(""), None);
    }

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(parse_numeric("24"), Some(24.0));
        assert_eq!(parse_numeric("3.5"), Some(3.5));
        assert_eq!(parse_numeric("24RK"), None);
        assert_eq!(parse_numeric(""), None);
    }

    #[test]
    fn test_missing_secondary_column_is_error() {
        let html = r#"
        <table><tr><th>Title</th><th>Worldwide gross</th></tr>
        <tr><td>Avatar</td><td>$2,923,706,026</td></tr></table>
        "#;
        let tables = parse_tables(html);
        let film = find_film_table(&tables).unwrap();
        let err = clean(film).unwrap_err();
        assert!(err.to_string().contains("Year"));
    }

    #[test]
    fn test_short_rows_read_as_empty_cells() {
        let html = r#"
        <table>
        <tr><th>Rank</th><th>Peak</th><th>Title</th><th>Worldwide gross</th><th>Year</th></tr>
        <tr><td>1</td><td>1</td><td>Avatar</td><td>$100</td></tr>
        </table>
        "#;
        let tables = parse_tables(html);
        let film = clean(find_film_table(&tables).unwrap()).unwrap();
        assert_eq!(film.rows[0].year, None);
    }
}
