//! Spreadsheet row model and the row-to-candidate parser.
//!
//! Column labels are matched case-insensitively. When several labels
//! normalise to the same field, the conventional casings win in the order
//! `title`, `Title`, `TITLE`, followed by any other casing in column order.
//! Blank cells (empty text, zero, `false`) do not count as present, so a
//! later casing can still supply the value.

use super::poi::CandidatePoi;

/// A single decoded cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// No value.
    Empty,
    /// Text content.
    Text(String),
    /// Numeric content, including dates stored as serial numbers.
    Number(f64),
    /// Boolean content.
    Bool(bool),
}

impl CellValue {
    fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(text) => text.is_empty(),
            Self::Number(value) => *value == 0.0 || value.is_nan(),
            Self::Bool(value) => !*value,
        }
    }

    fn to_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(text) => text.clone(),
            Self::Number(value) => value.to_string(),
            Self::Bool(value) => value.to_string(),
        }
    }

    fn to_coordinate(&self) -> f64 {
        let value = match self {
            Self::Number(value) => *value,
            Self::Text(text) => leading_number(text).unwrap_or(0.0),
            Self::Empty | Self::Bool(_) => 0.0,
        };
        if value.is_finite() {
            value
        } else {
            0.0
        }
    }
}

/// Parse the longest decimal prefix of `text`, ignoring leading whitespace.
///
/// `"37.5 N"` yields `37.5`. Spellings such as `NaN` or `inf` are not
/// numbers here.
fn leading_number(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let digits_from = |start: usize| {
        bytes[start..]
            .iter()
            .take_while(|byte| byte.is_ascii_digit())
            .count()
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let integral = digits_from(end);
    end += integral;
    let mut fractional = 0;
    if bytes.get(end) == Some(&b'.') {
        fractional = digits_from(end + 1);
        if integral > 0 || fractional > 0 {
            end += 1 + fractional;
        }
    }
    if integral == 0 && fractional == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exponent = digits_from(end + 1 + sign);
        if exponent > 0 {
            end += 1 + sign + exponent;
        }
    }
    text[..end].parse().ok()
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// One spreadsheet row: column labels paired with cell values, in column
/// order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetRow {
    cells: Vec<(String, CellValue)>,
}

impl SheetRow {
    /// Create an empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a labelled cell.
    pub fn push(&mut self, label: impl Into<String>, value: CellValue) {
        self.cells.push((label.into(), value));
    }

    /// Builder-style variant of [`SheetRow::push`].
    ///
    /// # Examples
    /// ```
    /// use poi_backend::domain::{CellValue, SheetRow};
    ///
    /// let row = SheetRow::new()
    ///     .with("Title", CellValue::from("Gyeongbokgung"))
    ///     .with("LATITUDE", CellValue::from(37.5796));
    /// assert_eq!(row.len(), 2);
    /// ```
    #[must_use]
    pub fn with(mut self, label: impl Into<String>, value: CellValue) -> Self {
        self.push(label, value);
        self
    }

    /// Number of labelled cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the row has no labelled cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn lookup(&self, field: RowField) -> Option<&CellValue> {
        self.cells
            .iter()
            .filter(|(_, value)| !value.is_blank())
            .filter_map(|(label, value)| field.rank(label.trim()).map(|rank| (rank, value)))
            .min_by_key(|(rank, _)| *rank)
            .map(|(_, value)| value)
    }
}

#[derive(Debug, Clone, Copy)]
enum RowField {
    Title,
    Latitude,
    Longitude,
}

impl RowField {
    /// Conventional casings in priority order.
    fn casings(self) -> [&'static str; 3] {
        match self {
            Self::Title => ["title", "Title", "TITLE"],
            Self::Latitude => ["latitude", "Latitude", "LATITUDE"],
            Self::Longitude => ["longitude", "Longitude", "LONGITUDE"],
        }
    }

    fn rank(self, label: &str) -> Option<usize> {
        let casings = self.casings();
        if let Some(position) = casings.iter().position(|casing| *casing == label) {
            return Some(position);
        }
        let [canonical, ..] = casings;
        (label.to_lowercase() == canonical).then_some(casings.len())
    }
}

/// Turn one spreadsheet row into a candidate POI.
///
/// Missing or non-numeric coordinates become `0.0`; a missing title becomes
/// the empty string. The title is trimmed and a fresh identifier is assigned.
///
/// # Examples
/// ```
/// use poi_backend::domain::{CellValue, SheetRow, parse_row};
///
/// let row = SheetRow::new()
///     .with("TITLE", CellValue::from("  Namsan Tower "))
///     .with("latitude", CellValue::from("37.5512"))
///     .with("Longitude", CellValue::from(126.9882));
/// let candidate = parse_row(&row);
/// assert_eq!(candidate.title, "Namsan Tower");
/// assert_eq!(candidate.latitude, 37.5512);
/// assert_eq!(candidate.longitude, 126.9882);
/// ```
#[must_use]
pub fn parse_row(row: &SheetRow) -> CandidatePoi {
    let title = row
        .lookup(RowField::Title)
        .map(CellValue::to_text)
        .unwrap_or_default();
    let latitude = row
        .lookup(RowField::Latitude)
        .map_or(0.0, CellValue::to_coordinate);
    let longitude = row
        .lookup(RowField::Longitude)
        .map_or(0.0, CellValue::to_coordinate);

    CandidatePoi::new(title.trim(), latitude, longitude)
}

#[cfg(test)]
mod tests {
    //! Unit coverage for row parsing.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("title")]
    #[case("Title")]
    #[case("TITLE")]
    #[case("tItLe")]
    #[case(" title ")]
    fn title_is_found_under_any_casing(#[case] label: &str) {
        let row = SheetRow::new().with(label, CellValue::from("Bukchon"));
        assert_eq!(parse_row(&row).title, "Bukchon");
    }

    #[rstest]
    fn conventional_casings_win_in_priority_order() {
        let row = SheetRow::new()
            .with("TITLE", CellValue::from("upper"))
            .with("Title", CellValue::from("capitalised"))
            .with("tiTLE", CellValue::from("odd"));
        assert_eq!(parse_row(&row).title, "capitalised");

        let row = SheetRow::new()
            .with("Latitude", CellValue::from(1.5))
            .with("latitude", CellValue::from(2.5));
        assert_eq!(parse_row(&row).latitude, 2.5);
    }

    #[rstest]
    fn blank_values_fall_through_to_the_next_casing() {
        let row = SheetRow::new()
            .with("title", CellValue::from(""))
            .with("Title", CellValue::from("Insadong"))
            .with("latitude", CellValue::Number(0.0))
            .with("LATITUDE", CellValue::from("37.574"));
        let candidate = parse_row(&row);
        assert_eq!(candidate.title, "Insadong");
        assert_eq!(candidate.latitude, 37.574);
    }

    #[rstest]
    #[case(CellValue::from("abc"), 0.0)]
    #[case(CellValue::from("  12.25  "), 12.25)]
    #[case(CellValue::Bool(true), 0.0)]
    #[case(CellValue::Empty, 0.0)]
    #[case(CellValue::Number(-33.5), -33.5)]
    #[case(CellValue::from("127.05 E"), 127.05)]
    #[case(CellValue::from("-.5"), -0.5)]
    #[case(CellValue::from("1e2x"), 100.0)]
    #[case(CellValue::from("NaN"), 0.0)]
    #[case(CellValue::from("inf"), 0.0)]
    #[case(CellValue::from("infinity"), 0.0)]
    #[case(CellValue::from("1e400"), 0.0)]
    #[case(CellValue::from("."), 0.0)]
    #[case(CellValue::Number(f64::INFINITY), 0.0)]
    fn coordinates_are_coerced(#[case] cell: CellValue, #[case] expected: f64) {
        let row = SheetRow::new().with("longitude", cell);
        assert_eq!(parse_row(&row).longitude, expected);
    }

    #[rstest]
    #[case("NaN")]
    #[case("inf")]
    fn non_finite_text_is_reported_as_invalid_not_out_of_range(#[case] text: &str) {
        use crate::domain::poi_validation::{RejectionReason, rejection_reasons};

        let row = SheetRow::new()
            .with("title", CellValue::from("Namsan"))
            .with("latitude", CellValue::from(text))
            .with("longitude", CellValue::Number(126.99));
        let candidate = parse_row(&row);
        assert_eq!(candidate.latitude, 0.0);
        assert_eq!(
            rejection_reasons(&candidate),
            vec![RejectionReason::LatitudeInvalid]
        );
    }

    #[rstest]
    fn absent_fields_default_to_empty_and_zero() {
        let candidate = parse_row(&SheetRow::new().with("name", CellValue::from("x")));
        assert_eq!(candidate.title, "");
        assert_eq!(candidate.latitude, 0.0);
        assert_eq!(candidate.longitude, 0.0);
    }

    #[rstest]
    fn numeric_titles_are_rendered_as_text() {
        let row = SheetRow::new().with("title", CellValue::Number(63.0));
        assert_eq!(parse_row(&row).title, "63");
    }

    #[rstest]
    fn every_parse_generates_a_distinct_identifier() {
        let row = SheetRow::new().with("title", CellValue::from("Same"));
        assert_ne!(parse_row(&row).id, parse_row(&row).id);
    }
}
