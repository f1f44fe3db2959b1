//! Centralized validation of user-supplied card ID lists.

use crate::core::types::CardId;

/// Maximum number of IDs accepted in a single request (DOS protection)
pub const MAX_INPUT_IDS: usize = 1_000;

/// Maximum raw input length in bytes, checked before any scanning
pub const MAX_INPUT_LENGTH: usize = 16 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("No card IDs provided")]
    Empty,
    #[error("Input must be a comma-separated list of card IDs (found {0:?})")]
    InvalidFormat(String),
    #[error("Card ID out of range: {0}")]
    OutOfRange(String),
    #[error("Too many card IDs: at most {MAX_INPUT_IDS} are accepted")]
    TooManyIds,
    #[error("Input too long: exceeds {MAX_INPUT_LENGTH} bytes")]
    TooLong,
}

/// Remove every whitespace character.
///
/// # Examples
///
/// ```
/// use deck_solver::utils::validation::strip_whitespace;
///
/// assert_eq!(strip_whitespace(" 1, 2 ,\t3\n"), "1,2,3");
/// ```
#[must_use]
pub fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Check that a whitespace-free string is one or more digit runs separated by
/// single commas, i.e. `^\d+(,\d+)*$`.
///
/// # Examples
///
/// ```
/// use deck_solver::utils::validation::is_valid_id_list;
///
/// assert!(is_valid_id_list("1,20,300"));
/// assert!(is_valid_id_list("007"));
/// assert!(!is_valid_id_list("1,,2"));
/// assert!(!is_valid_id_list("1,2,"));
/// assert!(!is_valid_id_list(""));
/// ```
#[must_use]
pub fn is_valid_id_list(s: &str) -> bool {
    !s.is_empty()
        && s
            .split(',')
            .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()))
}

/// Parse raw user input into external card IDs.
///
/// Whitespace anywhere in the input is ignored. Order and duplicates are
/// preserved; set semantics are applied later by the ownership filter.
///
/// # Errors
///
/// Returns `InputError::Empty` for blank input, `InputError::InvalidFormat`
/// if the text is not a comma-separated digit list, `InputError::OutOfRange`
/// for IDs that do not fit in 32 bits, and `InputError::TooLong` /
/// `InputError::TooManyIds` when the DOS limits are exceeded.
pub fn parse_id_list(raw: &str) -> Result<Vec<CardId>, InputError> {
    if raw.len() > MAX_INPUT_LENGTH {
        return Err(InputError::TooLong);
    }

    let text = strip_whitespace(raw);
    if text.is_empty() {
        return Err(InputError::Empty);
    }
    if !is_valid_id_list(&text) {
        return Err(InputError::InvalidFormat(text));
    }

    let mut ids = Vec::new();
    for part in text.split(',') {
        if ids.len() >= MAX_INPUT_IDS {
            return Err(InputError::TooManyIds);
        }
        let id: u32 = part
            .parse()
            .map_err(|_| InputError::OutOfRange(part.to_string()))?;
        ids.push(CardId(id));
    }

    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_list() {
        let ids = parse_id_list("1,2,3").unwrap();
        assert_eq!(ids, vec![CardId(1), CardId(2), CardId(3)]);
    }

    #[test]
    fn test_parse_strips_whitespace() {
        let ids = parse_id_list("  10, 20 ,\n30 ").unwrap();
        assert_eq!(ids, vec![CardId(10), CardId(20), CardId(30)]);
    }

    #[test]
    fn test_parse_keeps_duplicates_and_leading_zeros() {
        let ids = parse_id_list("05,5").unwrap();
        assert_eq!(ids, vec![CardId(5), CardId(5)]);
    }

    #[test]
    fn test_parse_rejects_bad_format() {
        for bad in ["1,,2", ",1", "1,", "1;2", "-1", "1.5", "abc", "1,a"] {
            assert!(
                matches!(parse_id_list(bad), Err(InputError::InvalidFormat(_))),
                "expected format error for {bad:?}"
            );
        }
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert_eq!(parse_id_list(""), Err(InputError::Empty));
        assert_eq!(parse_id_list("  \t"), Err(InputError::Empty));
    }

    #[test]
    fn test_parse_rejects_overflow() {
        let err = parse_id_list("1,99999999999").unwrap_err();
        assert_eq!(err, InputError::OutOfRange("99999999999".to_string()));
    }

    #[test]
    fn test_parse_id_limit() {
        let at_limit = vec!["1"; MAX_INPUT_IDS].join(",");
        assert_eq!(parse_id_list(&at_limit).unwrap().len(), MAX_INPUT_IDS);

        let over_limit = vec!["1"; MAX_INPUT_IDS + 1].join(",");
        assert_eq!(parse_id_list(&over_limit), Err(InputError::TooManyIds));
    }

    #[test]
    fn test_parse_length_limit() {
        let huge = "1".repeat(MAX_INPUT_LENGTH + 1);
        assert_eq!(parse_id_list(&huge), Err(InputError::TooLong));
    }
}
