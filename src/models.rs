use serde::{Deserialize, Serialize};

/// Inclusive range of years, e.g. `1980..=2018`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, year: i32) -> bool {
        year >= self.start && year <= self.end
    }

    /// Iterate all years in the range (empty when `start > end`).
    pub fn years(&self) -> impl Iterator<Item = i32> {
        self.start..=self.end
    }
}

/// Declarative description of one economic series.
///
/// `key` names the column in every table, `code` is the StatBank transaction
/// code (empty for derived series), `label` is used in the summary table and
/// `short` in chart legends and axis titles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesSpec {
    pub key: String,
    #[serde(default)]
    pub code: String,
    pub label: String,
    pub short: String,
}

impl SeriesSpec {
    pub fn new(key: &str, code: &str, label: &str, short: &str) -> Self {
        Self {
            key: key.into(),
            code: code.into(),
            label: label.into(),
            short: short.into(),
        }
    }
}

/// The six aggregates fetched from table `NAN1`.
pub fn default_series() -> Vec<SeriesSpec> {
    vec![
        SeriesSpec::new("gdp", "B1GQK", "Gross Domestic Product", "GDP"),
        SeriesSpec::new("priv_cons", "P31S1MD", "Private Consumption", "Private consumption"),
        SeriesSpec::new("publ_cons", "P3S13D", "Government Expenditure", "Government spending"),
        SeriesSpec::new("inv", "P51GD", "Investment", "Investment"),
        SeriesSpec::new("exp", "P6D", "Export", "Exports"),
        SeriesSpec::new("imp", "P7K", "Import", "Imports"),
    ]
}

/// Derived series: exports minus imports.
pub fn net_exports_series() -> SeriesSpec {
    SeriesSpec::new("nx", "", "Net Export", "Net exports")
}

/// One variable selection in a StatBank data query, e.g. `TRANSAKT=B1GQK`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableFilter {
    pub code: String,
    pub values: Vec<String>,
}

impl VariableFilter {
    pub fn new(code: &str, values: &[&str]) -> Self {
        Self {
            code: code.into(),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }
}

/// A flat text table exactly as returned by the data endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Position of a header, compared case-insensitively.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    }
}

/// Raw table fetched for one series descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSeries {
    pub spec: SeriesSpec,
    pub table: RawTable,
}

/// Response of the `tableinfo` endpoint (only the fields this crate reads).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableInfo {
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub updated: Option<String>,
    #[serde(default)]
    pub variables: Vec<Variable>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variable {
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub time: bool,
    #[serde(default)]
    pub values: Vec<VariableValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableValue {
    pub id: String,
    #[serde(default)]
    pub text: String,
}

/// Error payload returned by the StatBank API on a bad request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error_type_code: Option<String>,
    pub message: String,
}

/// Decimal and grouping separators of a number-formatting locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalStyle {
    pub decimal: char,
    pub grouping: char,
}

impl DecimalStyle {
    pub const DANISH: DecimalStyle = DecimalStyle {
        decimal: ',',
        grouping: '.',
    };
    pub const ENGLISH: DecimalStyle = DecimalStyle {
        decimal: '.',
        grouping: ',',
    };

    /// Style used by the API for a response language (`da` or `en`).
    pub fn for_lang(lang: &str) -> Self {
        match lang.to_ascii_lowercase().as_str() {
            "en" => Self::ENGLISH,
            _ => Self::DANISH,
        }
    }
}
