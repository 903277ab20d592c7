//! Parser configuration.

use serde::{Deserialize, Serialize};

/// Options controlling how CSV blocks are interpreted.
///
/// Which columns hold labels, which one holds instance weights, and what
/// separates fields. Validated once at parser construction; invalid
/// combinations fail there, never per row.
///
/// # Example
///
/// ```
/// use rowcsv::CsvConfig;
///
/// let config = CsvConfig::default()
///     .with_label_column("0")
///     .with_weight_column(1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvConfig {
    /// File format. Must be `"csv"`.
    pub format: String,
    /// Comma-separated list of column indices that hold labels.
    pub label_column: String,
    /// Field delimiter; only the first character is significant.
    pub delimiter: String,
    /// Column index holding per-row instance weights; `-1` means none.
    pub weight_column: i64,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            format: "csv".to_string(),
            label_column: String::new(),
            delimiter: ",".to_string(),
            weight_column: -1,
        }
    }
}

impl CsvConfig {
    /// Set the label column list.
    pub fn with_label_column(mut self, label_column: impl Into<String>) -> Self {
        self.label_column = label_column.into();
        self
    }

    /// Set the field delimiter.
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Set the weight column index (`-1` disables weights).
    pub fn with_weight_column(mut self, weight_column: i64) -> Self {
        self.weight_column = weight_column;
        self
    }
}
