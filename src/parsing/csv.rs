use std::path::Path;

use csv::{Position, ReaderBuilder, StringRecord, Trim};
use tracing::warn;

use crate::core::card::Card;
use crate::core::types::{CardId, Rarity};
use crate::parsing::{ParseError, MAX_RECORDS};

/// Column positions resolved from the header row
struct Columns {
    id: usize,
    rarity: usize,
    title: usize,
    series: Option<usize>,
}

impl Columns {
    fn from_header(header: &StringRecord) -> Result<Self, ParseError> {
        let find = |name: &str| {
            header
                .iter()
                .position(|f| f.trim_start_matches('\u{feff}').eq_ignore_ascii_case(name))
        };

        Ok(Self {
            id: find("id").ok_or(ParseError::MissingColumn("id"))?,
            rarity: find("rarity").ok_or(ParseError::MissingColumn("rarity"))?,
            title: find("title").ok_or(ParseError::MissingColumn("title"))?,
            series: find("series"),
        })
    }
}

/// Parse a card catalog CSV file
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or other parse errors
/// if the content is invalid.
pub fn parse_catalog_file(path: &Path) -> Result<Vec<Card>, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_catalog_text(&content)
}

/// Parse card catalog CSV text.
///
/// The first non-empty, non-comment row is the header. Columns are located by
/// name, so extra columns and column order do not matter. Quoted fields may
/// span lines. Rows with an unparsable `id` or `rarity` are skipped with a
/// warning.
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if there is no header row,
/// `ParseError::MissingColumn` if a required column is absent,
/// `ParseError::Csv` for malformed CSV, or `ParseError::TooManyRecords` if the
/// record limit is exceeded.
pub fn parse_catalog_text(text: &str) -> Result<Vec<Card>, ParseError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .comment(Some(b'#'))
        .trim(Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let header = reader.headers()?;
    if header.iter().all(str::is_empty) {
        return Err(ParseError::InvalidFormat(
            "No header row found in catalog".to_string(),
        ));
    }
    let cols = Columns::from_header(header)?;

    let mut cards = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line_num = record.position().map_or(0, Position::line);
        let field = |idx: usize| record.get(idx).unwrap_or("");

        let Ok(id) = field(cols.id).parse::<u32>() else {
            warn!("Skipping catalog line {line_num}: invalid id '{}'", field(cols.id));
            continue;
        };
        let Some(rarity) = Rarity::from_code(field(cols.rarity)) else {
            warn!(
                "Skipping catalog line {line_num}: invalid rarity '{}'",
                field(cols.rarity)
            );
            continue;
        };

        if cards.len() >= MAX_RECORDS {
            return Err(ParseError::TooManyRecords(MAX_RECORDS));
        }

        let mut card = Card::new(CardId(id), rarity, field(cols.title));
        if let Some(series) = cols.series.map(field).filter(|s| !s.is_empty()) {
            card = card.with_series(series);
        }
        cards.push(card);
    }

    Ok(cards)
}
