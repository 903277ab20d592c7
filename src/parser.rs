//! Block parser: one byte range in, one populated [`RowBlock`] out.

use std::marker::PhantomData;
use std::ops::Range;

use rayon::prelude::*;

use crate::block::{RowBlock, RowState};
use crate::columns::{ColumnRole, ColumnRoleMap, ColumnWarning};
use crate::config::CsvConfig;
use crate::error::ParseError;
use crate::field::FieldValue;
use crate::scan;

/// Parses CSV blocks into sparse row blocks.
///
/// The numeric representation `T` is fixed per instance (one of `f32`, `i32`,
/// `i64`), so field parsing is dispatched at compile time. Construction
/// validates the configuration once; [`parse_block`](Self::parse_block) is
/// then a pure function of the byte range and can run concurrently on
/// disjoint ranges.
#[derive(Debug, Clone)]
pub struct CsvBlockParser<T: FieldValue> {
    columns: ColumnRoleMap,
    delimiter: u8,
    _value: PhantomData<T>,
}

impl<T: FieldValue> CsvBlockParser<T> {
    /// Validate the configuration and build the column-role map.
    ///
    /// Returns the parser together with warnings for label-column entries
    /// that were skipped. Wrong format, an empty delimiter, or a weight
    /// column overlapping a label column fail construction.
    pub fn new(config: &CsvConfig) -> Result<(Self, Vec<ColumnWarning>), ParseError> {
        if config.format != "csv" {
            return Err(ParseError::UnsupportedFormat(config.format.clone()));
        }
        let delimiter = *config
            .delimiter
            .as_bytes()
            .first()
            .ok_or(ParseError::EmptyDelimiter)?;
        let (columns, warnings) =
            ColumnRoleMap::from_config(&config.label_column, config.weight_column)?;
        Ok((
            Self {
                columns,
                delimiter,
                _value: PhantomData,
            },
            warnings,
        ))
    }

    /// Label slots per row in the blocks this parser produces.
    pub fn label_count(&self) -> usize {
        self.columns.label_count()
    }

    /// Parse the byte range `bytes` into `out`.
    ///
    /// `out` is cleared first. On success the row-count invariants of
    /// [`RowBlock`] hold; on error the contents of `out` are unspecified and
    /// must be discarded. The range may start mid-newline-run and may carry a
    /// UTF-8 BOM on its first line; both are tolerated.
    pub fn parse_block(&self, bytes: &[u8], out: &mut RowBlock<T>) -> Result<(), ParseError> {
        out.clear();
        out.label_count = self.columns.label_count();
        let mut row = RowState::new(out.label_count);

        let mut pos = scan::skip_newlines(bytes, 0);
        pos = scan::skip_newlines(bytes, scan::skip_bom(bytes, pos));

        while pos < bytes.len() {
            let line_start = pos;
            let line_end = scan::find_line_end(bytes, pos);
            row.reset();

            let mut column_index = 0usize;
            let mut cursor = pos;
            while cursor < line_end {
                let (value, consumed) = T::parse_prefix(&bytes[cursor..line_end]);

                match self.columns.role_of(column_index) {
                    ColumnRole::Label(slot) => row.label[slot] = value,
                    ColumnRole::Weight if T::IS_FLOAT => row.weight = Some(value.to_weight()),
                    // A weight column under an integer representation is
                    // never matched and falls through to the feature path.
                    _ => {
                        if consumed != 0 {
                            out.index.push(row.feature_index);
                            out.value.push(value);
                        }
                        row.feature_index += 1;
                    }
                }

                cursor += consumed;
                column_index += 1;

                let delim_pos = scan::find_delimiter(bytes, cursor, line_end, self.delimiter);
                if delim_pos == line_end && row.feature_index == 0 {
                    return Err(ParseError::MissingDelimiter {
                        delimiter: self.delimiter as char,
                        line_start,
                    });
                }
                cursor = if delim_pos < line_end {
                    delim_pos + 1
                } else {
                    line_end
                };
            }

            row.flush_into(out);
            pos = scan::skip_newlines(bytes, line_end);
        }

        out.check_consistency()
    }

    /// Parse a whole in-memory buffer across rayon workers.
    ///
    /// The buffer is split into up to `num_chunks` newline-aligned chunks,
    /// each parsed independently with [`parse_block`](Self::parse_block), and
    /// the per-chunk blocks are merged back into `out` in input order. The
    /// result is identical to a single serial `parse_block` over the buffer.
    pub fn parse_buffer(
        &self,
        bytes: &[u8],
        num_chunks: usize,
        out: &mut RowBlock<T>,
    ) -> Result<(), ParseError> {
        out.clear();
        out.label_count = self.columns.label_count();

        let chunks = split_on_lines(bytes, num_chunks);
        let blocks: Vec<RowBlock<T>> = chunks
            .into_par_iter()
            .map(|range| {
                let mut block = RowBlock::new();
                self.parse_block(&bytes[range], &mut block)?;
                Ok(block)
            })
            .collect::<Result<_, ParseError>>()?;

        for block in &blocks {
            out.append(block)?;
        }
        out.check_consistency()
    }
}

/// Cut `bytes` into at most `num_chunks` ranges whose seams sit on newline
/// bytes, so every chunk starts at a line start (possibly inside a newline
/// run, which the block parser tolerates).
fn split_on_lines(bytes: &[u8], num_chunks: usize) -> Vec<Range<usize>> {
    let num_chunks = num_chunks.max(1);
    let mut ranges = Vec::with_capacity(num_chunks);
    let len = bytes.len();
    let mut start = 0;

    for i in 1..num_chunks {
        let target = len * i / num_chunks;
        if target <= start {
            continue;
        }
        let cut = scan::find_line_end(bytes, target);
        // A cut inside the trailing newline run would leave a degenerate
        // newline-only chunk; fold it into the final range instead.
        if scan::skip_newlines(bytes, cut) >= len {
            break;
        }
        if cut > start {
            ranges.push(start..cut);
            start = cut;
        }
    }
    if start < len {
        ranges.push(start..len);
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn float_parser(config: &CsvConfig) -> CsvBlockParser<f32> {
        let (parser, warnings) = CsvBlockParser::new(config).unwrap();
        assert!(warnings.is_empty());
        parser
    }

    #[test]
    fn rejects_non_csv_format() {
        let config = CsvConfig {
            format: "tsv".to_string(),
            ..CsvConfig::default()
        };
        let err = CsvBlockParser::<f32>::new(&config).unwrap_err();
        assert_eq!(err, ParseError::UnsupportedFormat("tsv".to_string()));
    }

    #[test]
    fn rejects_empty_delimiter() {
        let config = CsvConfig::default().with_delimiter("");
        let err = CsvBlockParser::<f32>::new(&config).unwrap_err();
        assert_eq!(err, ParseError::EmptyDelimiter);
    }

    #[test]
    fn only_the_first_delimiter_character_is_used() {
        let parser = float_parser(&CsvConfig::default().with_delimiter("; "));
        let mut out = RowBlock::new();
        parser.parse_block(b"1;2\n", &mut out).unwrap();
        assert_eq!(out.value, vec![1.0, 2.0]);
    }

    #[test]
    fn missing_delimiter_on_a_featureless_line_is_fatal() {
        let parser = float_parser(&CsvConfig::default().with_label_column("0"));
        let mut out = RowBlock::new();
        let err = parser.parse_block(b"1,2\n7\n", &mut out).unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingDelimiter {
                delimiter: ',',
                line_start: 4,
            }
        );
    }

    #[test]
    fn a_recorded_feature_disarms_the_delimiter_check() {
        // No label columns: the single field is a feature, so the line
        // needs no delimiter at all.
        let parser = float_parser(&CsvConfig::default());
        let mut out = RowBlock::new();
        parser.parse_block(b"7\n", &mut out).unwrap();
        assert_eq!(out.value, vec![7.0]);
        assert_eq!(out.offset, vec![1]);
    }

    #[test]
    fn weight_column_under_integer_blocks_stays_a_feature() {
        let config = CsvConfig::default().with_weight_column(1);
        let (parser, _) = CsvBlockParser::<i64>::new(&config).unwrap();
        let mut out = RowBlock::new();
        parser.parse_block(b"1,2,3\n", &mut out).unwrap();
        assert!(out.weight.is_empty());
        assert_eq!(out.value, vec![1, 2, 3]);
        assert_eq!(out.index, vec![0, 1, 2]);
    }

    #[test]
    fn chunk_seams_sit_on_newlines() {
        let bytes = b"1,2\n3,4\n5,6\n7,8\n";
        let ranges = split_on_lines(bytes, 3);
        assert_eq!(ranges.first().map(|r| r.start), Some(0));
        assert_eq!(ranges.last().map(|r| r.end), Some(bytes.len()));
        for window in ranges.windows(2) {
            assert_eq!(window[0].end, window[1].start);
            assert!(scan::is_newline(bytes[window[0].end]));
        }
    }

    #[test]
    fn more_chunks_than_lines_still_covers_the_buffer() {
        let bytes = b"1,2\n";
        let ranges = split_on_lines(bytes, 16);
        assert_eq!(ranges, vec![0..bytes.len()]);
    }
}
