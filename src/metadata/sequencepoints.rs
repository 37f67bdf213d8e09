//! Sequence points: the mapping from IL offsets to source locations.
//!
//! A method's sequence points are stored in the debug-symbol store as a compressed,
//! delta-encoded blob. This module decodes that blob, encodes it again for store authoring,
//! and defines [`SourceLocation`], the value diagnostics are anchored to.
//!
//! # Sequence Points Blob Format
//!
//! Each entry consists of:
//! - **IL Offset**: compressed unsigned int (absolute for the first entry, delta afterwards)
//! - **Start Line**: compressed unsigned int for the first entry, compressed signed delta afterwards
//! - **Start Column**: compressed unsigned int for the first entry, compressed signed delta afterwards
//! - **End Line Delta**: compressed unsigned int, added to start line
//! - **End Column Delta**: compressed unsigned int, added to start column
//!
//! For two sequence points
//! - first: il_offset=1, start_line=10, start_col=2, end_line_delta=0, end_col_delta=5
//! - second: il_offset_delta=4, start_line_delta=+1, start_col_delta=+1, end_line_delta=0, end_col_delta=2
//!
//! the blob is `[1, 10, 2, 0, 5, 4, 2, 2, 0, 2]`.
//!
//! ## Hidden Sequence Points
//!
//! A sequence point is hidden if its start line is `0xFEEFEE`. Compilers use it to mark
//! generated code that has no meaningful source line.

use std::fmt;

use crate::{
    file::{write_compressed_int, write_compressed_uint, Parser},
    Result,
};

/// Start line value marking a hidden sequence point.
pub const HIDDEN_LINE: u32 = 0xFE_EFEE;

/// A span in a source document.
///
/// Displays as `document(start_line,start_column,end_line,end_column)`, the location prefix
/// compilers use in their diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    /// Document URL or path
    pub document: String,
    /// Starting line in the source file
    pub start_line: u32,
    /// Starting column in the source file
    pub start_column: u16,
    /// Ending line in the source file
    pub end_line: u32,
    /// Ending column in the source file
    pub end_column: u16,
}

impl SourceLocation {
    /// Create a source location.
    pub fn new(
        document: impl Into<String>,
        start_line: u32,
        start_column: u16,
        end_line: u32,
        end_column: u16,
    ) -> Self {
        SourceLocation {
            document: document.into(),
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({},{},{},{})",
            self.document, self.start_line, self.start_column, self.end_line, self.end_column
        )
    }
}

/// Represents a single sequence point mapping IL offset to source code location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencePoint {
    /// Offset in the method's IL stream.
    pub il_offset: u32,
    /// Starting line in the source file.
    pub start_line: u32,
    /// Starting column in the source file.
    pub start_col: u16,
    /// Ending line in the source file.
    pub end_line: u32,
    /// Ending column in the source file.
    pub end_col: u16,
    /// True if this is a hidden sequence point (start_line == 0xFEEFEE).
    pub is_hidden: bool,
}

impl SequencePoint {
    /// Create a visible sequence point.
    #[must_use]
    pub fn new(
        il_offset: u32,
        start_line: u32,
        start_col: u16,
        end_line: u32,
        end_col: u16,
    ) -> Self {
        SequencePoint {
            il_offset,
            start_line,
            start_col,
            end_line,
            end_col,
            is_hidden: start_line == HIDDEN_LINE,
        }
    }

    /// Create a hidden sequence point at `il_offset`.
    #[must_use]
    pub fn hidden(il_offset: u32) -> Self {
        Self::new(il_offset, HIDDEN_LINE, 0, HIDDEN_LINE, 0)
    }

    /// Anchors this point in `document`.
    #[must_use]
    pub fn to_location(&self, document: &str) -> SourceLocation {
        SourceLocation::new(
            document,
            self.start_line,
            self.start_col,
            self.end_line,
            self.end_col,
        )
    }
}

/// Collection of sequence points for a method.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SequencePoints(pub Vec<SequencePoint>);

impl SequencePoints {
    /// Returns the sequence point for a given IL offset, if any.
    #[must_use]
    pub fn find_by_il_offset(&self, il_offset: u32) -> Option<&SequencePoint> {
        self.0.iter().find(|sp| sp.il_offset == il_offset)
    }

    /// Returns the visible (non-hidden) sequence point for a given IL offset, if any.
    #[must_use]
    pub fn find_visible(&self, il_offset: u32) -> Option<&SequencePoint> {
        self.0
            .iter()
            .find(|sp| sp.il_offset == il_offset && !sp.is_hidden)
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Parses a sequence points blob into a [`SequencePoints`] collection.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] for a truncated blob and [`crate::Error::Malformed`]
/// for invalid compressed integers or deltas that leave the valid line/column range.
pub fn parse_sequence_points(blob: &[u8]) -> Result<SequencePoints> {
    let mut parser = Parser::new(blob);
    let mut points = Vec::new();
    let mut il_offset = 0u32;
    let mut start_line = 0u32;
    let mut start_col = 0u16;
    let mut first = true;

    while parser.has_more_data() {
        let il_offset_delta = parser.read_compressed_uint()?;
        il_offset = if first {
            il_offset_delta
        } else {
            il_offset
                .checked_add(il_offset_delta)
                .ok_or_else(|| malformed_error!("IL offset overflow at entry {}", points.len()))?
        };

        if first {
            start_line = parser.read_compressed_uint()?;
            start_col = u16::try_from(parser.read_compressed_uint()?)
                .map_err(|_| malformed_error!("Start column out of range"))?;
        } else {
            let line_delta = parser.read_compressed_int()?;
            let col_delta = parser.read_compressed_int()?;
            start_line = start_line
                .checked_add_signed(line_delta)
                .ok_or_else(|| {
                    malformed_error!("Start line underflow at entry {}", points.len())
                })?;
            start_col = i32::from(start_col)
                .checked_add(col_delta)
                .and_then(|col| u16::try_from(col).ok())
                .ok_or_else(|| {
                    malformed_error!("Start column out of range at entry {}", points.len())
                })?;
        }

        let end_line_delta = parser.read_compressed_uint()?;
        let end_col_delta = parser.read_compressed_uint()?;
        let end_line = start_line
            .checked_add(end_line_delta)
            .ok_or_else(|| malformed_error!("End line overflow at entry {}", points.len()))?;
        let end_col = u16::try_from(end_col_delta)
            .ok()
            .and_then(|delta| start_col.checked_add(delta))
            .ok_or_else(|| {
                malformed_error!("End column out of range at entry {}", points.len())
            })?;

        points.push(SequencePoint {
            il_offset,
            start_line,
            start_col,
            end_line,
            end_col,
            is_hidden: start_line == HIDDEN_LINE,
        });
        first = false;
    }

    Ok(SequencePoints(points))
}

/// Encodes sequence points into the blob format read by [`parse_sequence_points`].
///
/// # Errors
/// Returns [`crate::Error::Malformed`] if points are not sorted by IL offset, if an end lies
/// before its start, or if a value does not fit the compressed encoding.
pub fn encode_sequence_points(points: &[SequencePoint]) -> Result<Vec<u8>> {
    let mut blob = Vec::new();
    let mut previous: Option<&SequencePoint> = None;

    for point in points {
        let end_line_delta = point
            .end_line
            .checked_sub(point.start_line)
            .ok_or_else(|| {
                malformed_error!("End line before start line at IL_{:04x}", point.il_offset)
            })?;
        let end_col_delta = point
            .end_col
            .checked_sub(point.start_col)
            .ok_or_else(|| {
                malformed_error!(
                    "End column before start column at IL_{:04x}",
                    point.il_offset
                )
            })?;

        match previous {
            None => {
                write_compressed_uint(point.il_offset, &mut blob)?;
                write_compressed_uint(point.start_line, &mut blob)?;
                write_compressed_uint(u32::from(point.start_col), &mut blob)?;
            }
            Some(previous) => {
                let offset_delta = point
                    .il_offset
                    .checked_sub(previous.il_offset)
                    .ok_or_else(|| {
                        malformed_error!("Unsorted sequence points at IL_{:04x}", point.il_offset)
                    })?;
                let line_delta = i64::from(point.start_line) - i64::from(previous.start_line);
                let line_delta = i32::try_from(line_delta)
                    .map_err(|_| malformed_error!("Line delta out of range - {}", line_delta))?;

                write_compressed_uint(offset_delta, &mut blob)?;
                write_compressed_int(line_delta, &mut blob)?;
                write_compressed_int(
                    i32::from(point.start_col) - i32::from(previous.start_col),
                    &mut blob,
                )?;
            }
        }

        write_compressed_uint(end_line_delta, &mut blob)?;
        write_compressed_uint(u32::from(end_col_delta), &mut blob)?;
        previous = Some(point);
    }

    Ok(blob)
}
