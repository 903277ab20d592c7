//! Column role assignment.
//!
//! Classifies each raw 0-based CSV column as a label slot, the instance
//! weight, or a sparse feature. The map is built once from configuration and
//! immutable afterwards.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::error::ParseError;

/// A label-column list entry that was skipped during map construction.
///
/// These are diagnostics, not failures: the map is still built from the
/// remaining valid entries. Callers that want them logged should do so
/// themselves; they are never silently swallowed here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColumnWarning {
    #[error("ignoring missing label_column list entry")]
    EmptyEntry,

    #[error("ignoring non-numeric label_column list entry '{0}'")]
    NonNumeric(String),

    #[error("ignoring label_column list entry '{entry}' containing unexpected character '{found}'")]
    TrailingGarbage { entry: String, found: char },

    #[error("ignoring negative label_column index {0}")]
    Negative(i64),

    #[error("ignoring duplicate label_column index {0}")]
    Duplicate(usize),
}

/// Role of a raw CSV column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    /// Value is stored into the given output label slot.
    Label(usize),
    /// Value becomes the row's instance weight.
    Weight,
    /// Value is a sparse feature.
    Feature,
}

/// Immutable raw-column → role mapping derived from configuration.
///
/// Label slots are dense and assigned in first-seen order among the accepted
/// label-column entries. A column that is neither a label nor the weight
/// column is a feature column.
#[derive(Debug, Clone)]
pub struct ColumnRoleMap {
    labels: HashMap<usize, usize>,
    weight_column: Option<usize>,
    label_count: usize,
}

impl ColumnRoleMap {
    /// Build the map from the textual label-column list and the weight column.
    ///
    /// Invalid and duplicate list entries are skipped and reported as
    /// warnings. A weight column that collides with an accepted label column
    /// is a fatal configuration error. With no accepted entries the map still
    /// carries one label slot, defaulted to zero per row.
    pub fn from_config(
        label_column: &str,
        weight_column: i64,
    ) -> Result<(Self, Vec<ColumnWarning>), ParseError> {
        let mut labels = HashMap::new();
        let mut warnings = Vec::new();
        let mut next_slot = 0usize;

        if !label_column.is_empty() {
            for entry in label_column.split(',') {
                match parse_list_entry(entry) {
                    Ok(raw_index) => match labels.entry(raw_index) {
                        Entry::Vacant(slot) => {
                            slot.insert(next_slot);
                            next_slot += 1;
                        }
                        Entry::Occupied(_) => warnings.push(ColumnWarning::Duplicate(raw_index)),
                    },
                    Err(warning) => warnings.push(warning),
                }
            }
        }

        let label_count = labels.len().max(1);

        let weight_column = usize::try_from(weight_column).ok();
        if let Some(weight) = weight_column {
            if labels.contains_key(&weight) {
                return Err(ParseError::WeightColumnIsLabel(weight));
            }
        }

        Ok((
            Self {
                labels,
                weight_column,
                label_count,
            },
            warnings,
        ))
    }

    /// Number of label slots per row; always at least one.
    pub fn label_count(&self) -> usize {
        self.label_count
    }

    /// The weight column, if one is configured.
    pub fn weight_column(&self) -> Option<usize> {
        self.weight_column
    }

    /// Role of the given raw column index.
    pub fn role_of(&self, column: usize) -> ColumnRole {
        if let Some(&slot) = self.labels.get(&column) {
            ColumnRole::Label(slot)
        } else if self.weight_column == Some(column) {
            ColumnRole::Weight
        } else {
            ColumnRole::Feature
        }
    }
}

/// Parse one label-column list entry as a full non-negative integer.
fn parse_list_entry(entry: &str) -> Result<usize, ColumnWarning> {
    if entry.is_empty() {
        return Err(ColumnWarning::EmptyEntry);
    }
    let bytes = entry.as_bytes();
    if !(bytes[0].is_ascii_digit() || bytes[0] == b'-' || bytes[0] == b'+') {
        return Err(ColumnWarning::NonNumeric(entry.to_string()));
    }
    match entry.parse::<i64>() {
        Ok(index) if index < 0 => Err(ColumnWarning::Negative(index)),
        Ok(index) => Ok(index as usize),
        Err(_) => {
            // The entry starts numerically but does not parse fully; report
            // the first character past the numeric prefix, if any.
            let garbage = entry
                .char_indices()
                .skip(1)
                .find(|&(_, c)| !c.is_ascii_digit());
            match garbage {
                Some((_, found)) => Err(ColumnWarning::TrailingGarbage {
                    entry: entry.to_string(),
                    found,
                }),
                None => Err(ColumnWarning::NonNumeric(entry.to_string())),
            }
        }
    }
}
