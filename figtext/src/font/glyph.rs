use std::fmt::{self, Display};
use std::num::NonZero;

use thiserror::Error;

/// A single FIGcharacter: a `height` by `width` grid of sub-characters
///
/// The grid is stored row-major. The height is copied from the owning [`Font`](super::Font) when
/// the glyph is built, so the width is always `data().len() / height()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Glyph {
    height: NonZero<usize>,
    width: usize,
    data: Vec<char>,
}

impl Glyph {
    /// Builds a glyph from the concatenation of its rows. Returns `None` if the length of `data`
    /// is not a multiple of `height`.
    pub(crate) fn new(data: Vec<char>, height: NonZero<usize>) -> Option<Self> {
        (data.len() % height == 0).then(|| Self {
            height,
            width: data.len() / height,
            data,
        })
    }

    /// Width in sub-characters.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Height in sub-characters, the same for every glyph of a font.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height.get()
    }

    /// All sub-characters, row after row.
    #[must_use]
    pub fn data(&self) -> &[char] {
        &self.data
    }

    /// The sub-character at the given column and row.
    ///
    /// # Errors
    /// [`OutOfRange::Cell`] if the position is outside the glyph.
    pub fn char_at(&self, column: usize, row: usize) -> Result<char, OutOfRange> {
        if row < self.height() && column < self.width {
            Ok(self.data[row * self.width + column])
        } else {
            Err(OutOfRange::Cell {
                column,
                row,
                width: self.width,
                height: self.height(),
            })
        }
    }

    /// One row of sub-characters.
    ///
    /// # Errors
    /// [`OutOfRange::Row`] if `row >= height`.
    pub fn row(&self, row: usize) -> Result<&[char], OutOfRange> {
        if row < self.height() {
            Ok(self.row_unchecked(row))
        } else {
            Err(OutOfRange::Row {
                row,
                height: self.height(),
            })
        }
    }

    /// Iterates over the rows from top to bottom.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[char]> {
        (0..self.height()).map(|row| self.row_unchecked(row))
    }

    fn row_unchecked(&self, row: usize) -> &[char] {
        let start = row * self.width;
        &self.data[start..start + self.width]
    }
}

impl Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for &c in row {
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// A glyph was queried outside of its grid.
///
/// This points at a bug in the caller or at corrupted font data, never at bad user input.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum OutOfRange {
    /// A row index past the height
    #[error("row {row} is outside a FIGcharacter of height {height}")]
    Row {
        /// The requested row
        row: usize,
        /// The glyph height
        height: usize,
    },
    /// A position outside the grid
    #[error("column {column}, row {row} is outside a {width}x{height} FIGcharacter")]
    Cell {
        /// The requested column
        column: usize,
        /// The requested row
        row: usize,
        /// The glyph width
        width: usize,
        /// The glyph height
        height: usize,
    },
}
