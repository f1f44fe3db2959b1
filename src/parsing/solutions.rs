use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::catalog::table::SolutionTable;
use crate::core::solution::Solution;
use crate::core::types::CardId;
use crate::parsing::{ParseError, MAX_RECORDS};

/// A solution record as found in the data files, before validation
#[derive(Debug, Deserialize)]
struct RawSolution {
    #[serde(default)]
    quad: Option<Vec<u32>>,

    #[serde(
        default,
        alias = "supportSet",
        alias = "card0s",
        alias = "set",
        alias = "dset"
    )]
    support_set: Option<Vec<u32>>,

    #[serde(default, alias = "set_tag", alias = "dset_tag")]
    tags: Option<Labels>,

    #[serde(default, alias = "color_pair")]
    colors: Option<Labels>,
}

/// Tags and colours appear either as `"a,b"` or as a list of strings/numbers
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Labels {
    Joined(String),
    List(Vec<Value>),
}

impl Labels {
    fn into_vec(self) -> Vec<String> {
        match self {
            Labels::Joined(s) => split_labels(&s),
            Labels::List(values) => values
                .into_iter()
                .map(|v| match v {
                    Value::String(s) => s,
                    other => other.to_string(),
                })
                .collect(),
        }
    }
}

fn split_labels(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn to_ids(raw: Vec<u32>) -> Vec<CardId> {
    raw.into_iter().map(CardId).collect()
}

impl RawSolution {
    fn into_solution(self) -> Option<Solution> {
        let quad = to_ids(self.quad?);
        let support = to_ids(self.support_set?);
        let solution = Solution::from_lists(&quad, support).ok()?;

        Some(
            solution
                .with_tags(self.tags.map(Labels::into_vec).unwrap_or_default())
                .with_colors(self.colors.map(Labels::into_vec).unwrap_or_default()),
        )
    }
}

/// Parse the canonical flat solution table.
///
/// The document is either a JSON array of solution objects or a JSON object
/// whose values are solution objects (keyed by index). Entries are kept in
/// document order. Malformed entries (missing or short `quad`, missing or
/// empty support set) are skipped with a warning.
///
/// # Errors
///
/// Returns `ParseError::Json` for invalid JSON, `ParseError::InvalidFormat`
/// if the top level is neither an array nor an object, or
/// `ParseError::TooManyRecords` if the record limit is exceeded.
pub fn parse_flat_solutions(text: &str) -> Result<SolutionTable, ParseError> {
    let root: Value = serde_json::from_str(text)?;

    let entries: Vec<Value> = match root {
        Value::Array(items) => items,
        Value::Object(map) => map.into_iter().map(|(_, v)| v).collect(),
        _ => {
            return Err(ParseError::InvalidFormat(
                "Solution table must be a JSON array or object".to_string(),
            ))
        }
    };

    if entries.len() > MAX_RECORDS {
        return Err(ParseError::TooManyRecords(MAX_RECORDS));
    }

    let mut table = SolutionTable::new();
    for (index, entry) in entries.into_iter().enumerate() {
        let solution = serde_json::from_value::<RawSolution>(entry)
            .ok()
            .and_then(RawSolution::into_solution);

        match solution {
            Some(solution) => table.push(solution),
            None => {
                warn!("Skipping malformed solution entry #{index}");
                table.record_skipped();
            }
        }
    }

    debug!(
        "Parsed {} solutions ({} skipped)",
        table.len(),
        table.skipped()
    );
    Ok(table)
}

/// Parse the legacy nested solution table.
///
/// `support_text` maps colour pair -> tag pair -> list of support card IDs;
/// `quads_text` maps colour pair -> tag pair -> list of quads. Each quad
/// becomes one solution whose support set is the matching support list. Pairs
/// missing from either document are ignored.
///
/// # Errors
///
/// Returns `ParseError::Json` for invalid JSON, `ParseError::InvalidFormat`
/// if either document is not a JSON object, or `ParseError::TooManyRecords`
/// if the record limit is exceeded.
pub fn parse_nested_solutions(
    support_text: &str,
    quads_text: &str,
) -> Result<SolutionTable, ParseError> {
    let support_root: Value = serde_json::from_str(support_text)?;
    let quads_root: Value = serde_json::from_str(quads_text)?;

    let (Some(support_by_color), Some(quads_by_color)) =
        (support_root.as_object(), quads_root.as_object())
    else {
        return Err(ParseError::InvalidFormat(
            "Nested solution documents must be JSON objects".to_string(),
        ));
    };

    let mut table = SolutionTable::new();

    for (color_pair, support_by_tag) in support_by_color {
        let (Some(support_by_tag), Some(quads_by_tag)) = (
            support_by_tag.as_object(),
            quads_by_color.get(color_pair).and_then(Value::as_object),
        ) else {
            continue;
        };

        for (tag_pair, support_value) in support_by_tag {
            let Some(quad_values) = quads_by_tag.get(tag_pair).and_then(Value::as_array) else {
                continue;
            };

            let Ok(support) = serde_json::from_value::<Vec<u32>>(support_value.clone()) else {
                warn!("Skipping {color_pair}/{tag_pair}: malformed support list");
                table.record_skipped_n(quad_values.len());
                continue;
            };
            let support = to_ids(support);

            for quad_value in quad_values {
                if table.len() >= MAX_RECORDS {
                    return Err(ParseError::TooManyRecords(MAX_RECORDS));
                }

                let solution = serde_json::from_value::<Vec<u32>>(quad_value.clone())
                    .ok()
                    .and_then(|quad| Solution::from_lists(&to_ids(quad), support.clone()).ok());

                match solution {
                    Some(solution) => table.push(
                        solution
                            .with_tags(split_labels(tag_pair))
                            .with_colors(split_labels(color_pair)),
                    ),
                    None => {
                        warn!("Skipping malformed quad in {color_pair}/{tag_pair}");
                        table.record_skipped();
                    }
                }
            }
        }
    }

    Ok(table)
}
