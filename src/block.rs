//! Sparse row-block output structure.
//!
//! One [`RowBlock`] holds the rows of one parsed block in CSR-like layout:
//! `offset[i]` marks the end of row `i`'s slice of `index`/`value`, with the
//! leading zero left implicit, so `offset.len()` equals the row count.

use crate::error::ParseError;

/// Sparse row-oriented output of one block parse.
///
/// Owned by the caller: the parser fills it and never retains it. All
/// sequences are concatenated across rows; see [`RowBlock::row_features`] for
/// per-row access.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowBlock<T> {
    /// Feature positions, one per stored value, counted among feature
    /// columns only (label and weight columns do not advance the position).
    pub index: Vec<u32>,
    /// Feature values, parallel to `index`.
    pub value: Vec<T>,
    /// Row boundaries into `index`/`value`, implicit leading zero.
    pub offset: Vec<usize>,
    /// Label values, `label_count` per row, in row order.
    pub label: Vec<T>,
    /// Instance weights; empty, or exactly one per row.
    pub weight: Vec<f32>,
    /// Label slots per row; at least one after a successful parse.
    pub label_count: usize,
}

impl<T: Copy + Default> RowBlock<T> {
    /// An empty block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to the empty state, keeping allocations.
    pub fn clear(&mut self) {
        self.index.clear();
        self.value.clear();
        self.offset.clear();
        self.label.clear();
        self.weight.clear();
        self.label_count = 0;
    }

    /// Number of rows in the block.
    pub fn num_rows(&self) -> usize {
        self.offset.len()
    }

    /// Feature `(index, value)` slices of row `row`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.num_rows()`.
    pub fn row_features(&self, row: usize) -> (&[u32], &[T]) {
        let start = if row == 0 { 0 } else { self.offset[row - 1] };
        let end = self.offset[row];
        (&self.index[start..end], &self.value[start..end])
    }

    /// Label slice of row `row`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.num_rows()`.
    pub fn row_labels(&self, row: usize) -> &[T] {
        assert!(row < self.num_rows());
        &self.label[row * self.label_count..(row + 1) * self.label_count]
    }

    /// Append all rows of `other`, rebasing its offsets.
    ///
    /// Used to merge per-chunk blocks back into one. Fails when the blocks
    /// disagree on label layout or on weight presence, since the merged block
    /// could not satisfy the row-count invariants.
    pub fn append(&mut self, other: &RowBlock<T>) -> Result<(), ParseError> {
        if self.num_rows() == 0 {
            self.label_count = other.label_count;
        } else if self.label_count != other.label_count {
            return Err(ParseError::Inconsistent(
                "merged blocks disagree on label_count",
            ));
        }
        if other.num_rows() == 0 {
            return Ok(());
        }
        if self.num_rows() > 0 && self.weight.is_empty() != other.weight.is_empty() {
            return Err(ParseError::Inconsistent(
                "merged blocks disagree on weight presence",
            ));
        }

        let base = self.index.len();
        self.index.extend_from_slice(&other.index);
        self.value.extend_from_slice(&other.value);
        self.offset.extend(other.offset.iter().map(|&end| base + end));
        self.label.extend_from_slice(&other.label);
        self.weight.extend_from_slice(&other.weight);
        Ok(())
    }

    /// Verify the row-count invariants that must hold after every parse.
    pub fn check_consistency(&self) -> Result<(), ParseError> {
        if self.label_count == 0 {
            return Err(ParseError::Inconsistent("label_count must be at least one"));
        }
        if self.label.len() % self.label_count != 0 {
            return Err(ParseError::Inconsistent(
                "label length is not a multiple of label_count",
            ));
        }
        if self.label.len() / self.label_count != self.offset.len() {
            return Err(ParseError::Inconsistent(
                "label rows disagree with offset rows",
            ));
        }
        if !(self.weight.is_empty() || self.weight.len() == self.offset.len()) {
            return Err(ParseError::Inconsistent(
                "weights must be absent or one per row",
            ));
        }
        if self.index.len() != self.value.len() {
            return Err(ParseError::Inconsistent(
                "feature index and value lengths differ",
            ));
        }
        Ok(())
    }
}

/// Per-row accumulation state used by the block parser.
///
/// Reset at each row start, flushed at each row end. Making the per-line
/// locals an explicit struct keeps row closing testable on its own.
#[derive(Debug, Clone)]
pub(crate) struct RowState<T> {
    /// Label slots, zero-filled at row start; slots are dense and bounded by
    /// map construction.
    pub(crate) label: Vec<T>,
    /// Weight, once the weight column has been seen in this row.
    pub(crate) weight: Option<f32>,
    /// Position of the next feature column among feature columns only.
    pub(crate) feature_index: u32,
}

impl<T: Copy + Default> RowState<T> {
    pub(crate) fn new(label_count: usize) -> Self {
        Self {
            label: vec![T::default(); label_count],
            weight: None,
            feature_index: 0,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.label.fill(T::default());
        self.weight = None;
        self.feature_index = 0;
    }

    /// Close the current row: flush labels and weight, record the row end.
    pub(crate) fn flush_into(&self, out: &mut RowBlock<T>) {
        out.label.extend_from_slice(&self.label);
        if let Some(weight) = self.weight {
            out.weight.push(weight);
        }
        out.offset.push(out.index.len());
    }
}
