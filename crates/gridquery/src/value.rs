use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

///
/// CellValue
///
/// Scalar payload of one cell. Cells are stored sparsely: an absent key
/// in a row's cell map reads as `Null`, and the two are indistinguishable
/// to every query operator.
///
/// The untagged representation keeps the JSON shape of persisted configs
/// and API payloads (`"text"`, `42`, `null`) while CBOR cursor payloads
/// stay self-describing.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(f64),
    #[default]
    Null,
}

impl CellValue {
    /// Whether the cell counts as empty: `Null` or the empty string.
    ///
    /// `isEmpty` semantics (`cell IS NULL OR cell = ''`). Note the TEXT
    /// `equals` operator does NOT share this rule: there `Null` never
    /// equals `""`.
    #[must_use]
    pub fn is_empty_cell(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(text) => text.is_empty(),
            Self::Number(_) => false,
        }
    }

    /// Best-effort numeric coercion, `NULLIF(cell, '')::numeric` style:
    /// empty text and `Null` coerce to nothing (never zero), non-numeric
    /// text coerces to nothing, and non-finite parses are discarded so
    /// comparisons stay total.
    #[must_use]
    pub fn as_numeric(&self) -> Option<f64> {
        match self {
            Self::Number(value) => value.is_finite().then_some(*value),
            Self::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return None;
                }
                trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
            }
            Self::Null => None,
        }
    }

    /// Text form of the cell, `coalesce(cell::text, '')` style: `Null`
    /// reads as the empty string and numbers render without a trailing
    /// `.0` when integral.
    #[must_use]
    pub fn text_form(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Number(value) => format_numeric(*value),
            Self::Null => String::new(),
        }
    }

    /// Case-insensitive unanchored substring match over the text form,
    /// `coalesce(cell::text, '') ILIKE '%needle%'` style. An empty
    /// needle matches every cell, `Null` included.
    #[must_use]
    pub fn contains_ci(&self, needle: &str) -> bool {
        self.text_form()
            .to_lowercase()
            .contains(&needle.to_lowercase())
    }
}

// Render a numeric cell the way `::text` on a numeric renders it:
// integral values without a fractional suffix.
fn format_numeric(value: f64) -> String {
    const INTEGRAL_EXACT: f64 = 9_007_199_254_740_992.0; // 2^53

    if value.fract() == 0.0 && value.abs() < INTEGRAL_EXACT {
        #[allow(clippy::cast_possible_truncation)]
        return format!("{}", value as i64);
    }

    format!("{value}")
}

/// Total order over optional sort keys with NULLs always last, then the
/// provided key ordering for the non-null pair.
pub(crate) fn compare_nulls_last<T, F>(left: Option<&T>, right: Option<&T>, cmp: F) -> Ordering
where
    F: FnOnce(&T, &T) -> Ordering,
{
    match (left, right) {
        (Some(l), Some(r)) => cmp(l, r),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

///
/// TESTS
///
