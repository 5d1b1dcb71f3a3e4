// Copyright 2026 Filmstat Contributors
// SPDX-License-Identifier: Apache-2.0

//! The analysis pipeline: uploaded text → URL → table → four answers.
//!
//! Everything here is synchronous; the handler fetches the page first and
//! hands the raw HTML in, so no parse state lives across an await.

use crate::error::AnalysisError;
use crate::plot;
use crate::stats;
use crate::table;

/// Gross threshold for the Q1 count.
pub const Q1_GROSS_FLOOR: f64 = 2_000_000_000.0;
/// Q1 only counts films released before this year.
pub const Q1_YEAR_CAP: i64 = 2020;
/// Gross threshold for the Q2 earliest-film lookup.
pub const Q2_GROSS_FLOOR: f64 = 1_500_000_000.0;

/// Pick the target URL out of the uploaded text: the first line containing
/// the substring "http", trimmed. No further validation.
pub fn extract_url(content: &str) -> Result<&str, AnalysisError> {
    content
        .trim()
        .lines()
        .find(|line| line.contains("http"))
        .map(str::trim)
        .ok_or(AnalysisError::UrlNotFound)
}

/// Answer the four questions against raw page HTML.
///
/// Returns `[count, title, correlation, data_uri]`, all strings.
pub fn analyze(html: &str) -> Result<[String; 4], AnalysisError> {
    let tables = table::parse_tables(html);
    let raw = table::find_film_table(&tables).ok_or(AnalysisError::TableNotFound)?;
    let films = table::clean(raw)?;
    tracing::debug!(rows = films.rows.len(), "cleaned film table");

    let q1 = count_big_grossers(&films).to_string();
    let q2 = earliest_blockbuster(&films)?.to_string();

    let pairs: Vec<(f64, f64)> = films
        .rows
        .iter()
        .filter_map(|r| Some((r.rank?, r.peak?)))
        .collect();

    let r = stats::pearson(&pairs)
        .ok_or(AnalysisError::Degenerate("fewer than two points or no spread"))?;
    let q3 = format!("{r:.3}");

    let (slope, intercept) = stats::linear_fit(&pairs)
        .ok_or(AnalysisError::Degenerate("no spread on the Rank axis"))?;
    let q4 = plot::scatter_data_uri(&pairs, slope, intercept)?;

    Ok([q1, q2, q3, q4])
}

/// Q1: rows with gross at or above 2bn released before 2020. Rows with a
/// null year never satisfy the comparison.
fn count_big_grossers(films: &table::FilmTable) -> usize {
    films
        .rows
        .iter()
        .filter(|r| r.gross >= Q1_GROSS_FLOOR && r.year.is_some_and(|y| y < Q1_YEAR_CAP))
        .count()
}

/// Q2: title of the minimum-Year row among films grossing over 1.5bn,
/// first in table order on ties.
fn earliest_blockbuster(films: &table::FilmTable) -> Result<&str, AnalysisError> {
    let mut earliest: Option<(&table::FilmRow, i64)> = None;
    for row in films.rows.iter().filter(|r| r.gross > Q2_GROSS_FLOOR) {
        if let Some(year) = row.year {
            // Strictly-less keeps the first row on ties.
            if earliest.is_none_or(|(_, best)| year < best) {
                earliest = Some((row, year));
            }
        }
    }
    earliest
        .map(|(row, _)| row.title.as_str())
        .ok_or(AnalysisError::NoQualifyingFilm(Q2_GROSS_FLOOR as u64))
}
