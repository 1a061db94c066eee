//! FIGfonts
//!
//! Font types and the logic for parsing `.flf` files.

mod glyph;
mod header;

use std::collections::HashMap;
use std::collections::hash_map::Iter;
use std::io::{self, Read};
use std::num::NonZero;
use std::str;

use bstr::{BString, ByteSlice as _};
use thiserror::Error;

pub use glyph::{Glyph, OutOfRange};
pub use header::{Hardblank, Header, HeaderError, PrintDirection, SIGNATURE};

use crate::render::layout::{self, LayoutOptions};
use crate::render::{LayoutOption, RenderError, Renderer};

/// The 102 codepoints for characters that are included in all FIGfonts, in file order
///
/// Consists of 95 printable ASCII characters and 7 Deutsch characters from the Latin-1 encoding.
pub const DEFAULT_CODEPOINTS: [u8; 102] = *b" !\"#$%&'()*+,-./0123456789:;<=>?@\
                                             ABCDEFGHIJKLMNOPQRSTUVWXYZ[\\]^_`\
                                             abcdefghijklmnopqrstuvwxyz{|}~\
                                             \xc4\xd6\xdc\xe4\xf6\xfc\xdf";

/// A FIGfont
///
/// Built once by [`Font::from_reader`] (or one of its siblings) and immutable afterwards, so a
/// font can be shared between any number of [`Renderer`]s.
///
/// ```
/// # use figtext::font::Font;
/// let source = concat!(
///     "flf2a$ 1 1 3 0 1\n",
///     "a single line of comments\n",
/// );
/// let mut source = source.to_owned();
/// for c in figtext::font::DEFAULT_CODEPOINTS {
///     source.push_str(&format!("{}@@\n", char::from(c).to_ascii_uppercase()));
/// }
/// let font = Font::from_bytes(source).unwrap();
/// assert_eq!(font.len(), 102);
/// assert_eq!(font.render("hi!").unwrap(), "HI!");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Font {
    header: Header,
    glyphs: HashMap<char, Glyph>,
    max_width: usize,
}

impl Font {
    /// Reads and decodes an `.flf` font from `reader`, logging any [`FontWarning`]s.
    ///
    /// The reader is consumed, so it is released whether decoding succeeds or not.
    ///
    /// # Errors
    /// Returns `Err` if reading fails or on a fatal decoding error; see [`FontError`].
    pub fn from_reader(reader: impl Read) -> Result<Self, FontError> {
        let (font, warnings) = Self::from_reader_with_warnings(reader)?;
        for warning in warnings {
            log::warn!("{warning}");
        }
        Ok(font)
    }

    /// Reads and decodes an `.flf` font from `reader`, also returning any non-fatal issues.
    ///
    /// # Errors
    /// Returns `Err` if reading fails or on a fatal decoding error; see [`FontError`].
    pub fn from_reader_with_warnings(
        mut reader: impl Read,
    ) -> Result<(Self, Vec<FontWarning>), FontError> {
        let mut bytes = Vec::new();
        let _ = reader.read_to_end(&mut bytes)?;
        Self::from_bytes_with_warnings(bytes)
    }

    /// Decodes the contents of an `.flf` file, logging any [`FontWarning`]s.
    ///
    /// # Errors
    /// Returns `Err` on a fatal decoding error; see [`FontError`] for details.
    pub fn from_bytes(bytes: impl AsRef<[u8]>) -> Result<Self, FontError> {
        let (font, warnings) = Self::from_bytes_with_warnings(bytes)?;
        for warning in warnings {
            log::warn!("{warning}");
        }
        Ok(font)
    }

    /// Decodes the contents of an `.flf` file and also returns any non-fatal issues found while
    /// decoding.
    ///
    /// Lines may end in LF, CR LF or a lone CR. Font lines are decoded as UTF-8, with invalid
    /// sequences replaced by U+FFFD.
    ///
    /// # Errors
    /// Returns `Err` on a fatal decoding error; see [`FontError`] for details.
    pub fn from_bytes_with_warnings(
        bytes: impl AsRef<[u8]>,
    ) -> Result<(Self, Vec<FontWarning>), FontError> {
        let font_string: BString = bytes
            .as_ref()
            .replace("\r\n", "\n")
            .into_iter()
            .map(|c| if c == b'\r' { b'\n' } else { c })
            .collect();
        let mut lines = font_string.lines().zip(1_usize..);

        let Some((header_line, _)) = lines.next() else {
            return Err(FontError::BadHeader(HeaderError::Missing));
        };
        let header = Header::decode(header_line)?;
        log::debug!("decoded FIGfont header {header:?}");

        let mut decoder = Decoder {
            lines,
            header: &header,
            line_number: 1,
            warnings: Vec::new(),
        };
        if !(1..=header.height.get()).contains(&header.baseline) {
            decoder.warnings.push(FontWarning::BaselineOutOfRange {
                baseline: header.baseline,
                height: header.height,
            });
        }
        decoder.skip_comments();
        let glyphs = decoder.decode_glyphs()?;
        let warnings = decoder.warnings;

        let max_width = glyphs.values().map(Glyph::width).max().unwrap_or(0);
        log::debug!("decoded {} FIGcharacters", glyphs.len());
        let font = Self {
            header,
            glyphs,
            max_width,
        };
        Ok((font, warnings))
    }

    /// Renders a string with the layout and print direction given by the font.
    ///
    /// # Errors
    /// [`RenderError::MissingGlyph`] if the string contains a character the font does not have.
    pub fn render(&self, string: &str) -> Result<String, RenderError> {
        Renderer::new(self).render(string)
    }

    /// The fully decoded font header.
    #[must_use]
    pub const fn header(&self) -> &Header {
        &self.header
    }

    /// The glyph for `c`, if the font has one.
    #[must_use]
    pub fn glyph(&self, c: char) -> Option<&Glyph> {
        self.glyphs.get(&c)
    }

    /// Iterates over all glyphs, in no particular order.
    pub fn glyphs(&self) -> Iter<'_, char, Glyph> {
        self.glyphs.iter()
    }

    /// Number of glyphs in the font.
    #[must_use]
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Returns true if the font has no glyphs. Never the case for a decoded font.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// The maximum width across all glyphs in this font, measured in sub-characters.
    #[must_use]
    pub const fn max_width(&self) -> usize {
        self.max_width
    }

    /// How many columns the glyph for `second` may slide into the glyph for `first`.
    ///
    /// `first` precedes `second` in the input; with [`PrintDirection::RightToLeft`] it ends up on
    /// the right. Every row is measured on its own, from the last visible sub-character of the
    /// left glyph to the first visible one of the right glyph, with one extra column when the
    /// touching pair can be smushed (or the left row is blank). The tightest row wins.
    ///
    /// Returns 0 when `mode` has neither [`LayoutOption::HorizontalFitting`] nor
    /// [`LayoutOption::HorizontalSmushing`], when a glyph is missing or when a glyph is narrower
    /// than two columns. `'\0'` stands for "no previous glyph" and never overlaps.
    #[must_use]
    pub fn overlap_amount(
        &self,
        first: char,
        second: char,
        mode: LayoutOptions,
        direction: PrintDirection,
    ) -> usize {
        if first == '\0' || second == '\0' {
            return 0;
        }
        if !layout::is_selected(
            mode,
            LayoutOption::HorizontalFitting | LayoutOption::HorizontalSmushing,
        ) {
            return 0;
        }
        let (left, right) = match direction {
            PrintDirection::LeftToRight => (first, second),
            PrintDirection::RightToLeft => (second, first),
        };
        let (Some(left), Some(right)) = (self.glyph(left), self.glyph(right)) else {
            return 0;
        };
        if left.width() < 2 || right.width() < 2 {
            return 0;
        }
        left.rows()
            .zip(right.rows())
            .map(|(left_row, right_row)| {
                let end = left_row.iter().rposition(|&c| c != ' ').unwrap_or(0);
                let start = right_row[..right.width() - 1]
                    .iter()
                    .position(|&c| c != ' ')
                    .unwrap_or(right.width() - 1);
                let amount = right.width().min(left.width() - end - 1 + start);
                let touching = left_row[end];
                if touching == ' '
                    || self
                        .smush(touching, right_row[start], mode, direction)
                        .is_some()
                {
                    amount + 1
                } else {
                    amount
                }
            })
            .fold(right.width(), usize::min)
    }

    /// Merges two horizontally adjacent sub-characters under `mode`, `left` being the one
    /// already in place. `None` means the pair cannot be smushed.
    ///
    /// ```
    /// # use figtext::font::{Font, PrintDirection};
    /// # use figtext::render::LayoutOption;
    /// # let mut source = String::from("flf2a$ 1\n");
    /// # for _ in figtext::font::DEFAULT_CODEPOINTS { source.push_str("x@\n"); }
    /// # let font = Font::from_bytes(source).unwrap();
    /// let mode = LayoutOption::HorizontalSmushing | LayoutOption::HorizontalOppositePair;
    /// let ltr = PrintDirection::LeftToRight;
    /// assert_eq!(font.smush('[', ']', mode, ltr), Some('|'));
    /// assert_eq!(font.smush(' ', ']', mode, ltr), Some(']'));
    /// assert_eq!(font.smush('[', '[', mode, ltr), None);
    /// ```
    #[must_use]
    pub fn smush(
        &self,
        left: char,
        right: char,
        mode: LayoutOptions,
        direction: PrintDirection,
    ) -> Option<char> {
        layout::smush(mode, left, right, self.header.hardblank, direction)
    }
}

struct Decoder<'a, I> {
    lines: I,
    header: &'a Header,
    line_number: usize,
    warnings: Vec<FontWarning>,
}

impl<'a, I: Iterator<Item = (&'a [u8], usize)>> Decoder<'a, I> {
    fn next_line(&mut self) -> Option<&'a [u8]> {
        let (line, number) = self.lines.next()?;
        self.line_number = number;
        Some(line)
    }

    fn skip_comments(&mut self) {
        for _ in 0..self.header.comment_lines {
            if self.next_line().is_none() {
                break;
            }
        }
    }

    fn decode_glyphs(&mut self) -> Result<HashMap<char, Glyph>, FontError> {
        let mut glyphs = HashMap::new();
        for codepoint in DEFAULT_CODEPOINTS {
            let codepoint = char::from(codepoint);
            let glyph = self.decode_glyph(codepoint.into())?;
            glyphs.insert(codepoint, glyph);
        }

        let mut code_tags = 0;
        while let Some(line) = self.next_line() {
            let tag = line.fields().next().unwrap_or_default();
            let invalid = || FontError::InvalidCharacterCode {
                line: self.line_number,
                tag: tag.into(),
            };
            let (codepoint, positive) = str::from_utf8(tag)
                .ok()
                .and_then(parse_codepoint)
                .ok_or_else(invalid)?;
            code_tags += 1;
            if positive {
                let c = char::from_u32(codepoint).ok_or_else(invalid)?;
                let glyph = self.decode_glyph(codepoint)?;
                // the last glyph with a given code wins
                glyphs.insert(c, glyph);
            } else {
                log::debug!("skipping glyph with negative code -{codepoint}");
                let _ = self.decode_rows(codepoint)?;
            }
        }
        if code_tags < self.header.code_tag_count {
            self.warnings.push(FontWarning::TooFewCodeTags {
                found: code_tags,
                expected: self.header.code_tag_count,
            });
        }
        Ok(glyphs)
    }

    fn decode_glyph(&mut self, codepoint: u32) -> Result<Glyph, FontError> {
        let rows = self.decode_rows(codepoint)?;
        let mut widths = rows.iter().map(Vec::len);
        let first = widths.next().unwrap_or(0);
        if widths.any(|width| width != first) {
            self.warnings.push(FontWarning::InconsistentWidth(codepoint));
        }
        let data: Vec<char> = rows.into_iter().flatten().collect();
        let length = data.len();
        Glyph::new(data, self.header.height).ok_or(FontError::RaggedGlyph {
            codepoint,
            length,
            height: self.header.height,
        })
    }

    fn decode_rows(&mut self, codepoint: u32) -> Result<Vec<Vec<char>>, FontError> {
        let height = self.header.height.get();
        let mut rows = Vec::new();
        for _ in 0..height {
            let Some(line) = self.next_line() else {
                return Err(FontError::Truncated {
                    line: self.line_number + 1,
                    codepoint,
                });
            };
            let max_length = self.header.max_length;
            let length = line.chars().count();
            if max_length > 0 && length > max_length {
                self.warnings.push(FontWarning::ExcessLength {
                    codepoint,
                    length,
                    max_length,
                });
            }
            let row = strip_end_marks(line).ok_or(FontError::EmptyRow {
                line: self.line_number,
                codepoint,
            })?;
            rows.push(row);
        }
        Ok(rows)
    }
}

/// Strips trailing whitespace and then the run of *end-marks*, the last visible character
/// repeated, from a raw glyph line. Returns `None` if the line has no end-mark.
fn strip_end_marks(line: &[u8]) -> Option<Vec<char>> {
    let mut row: Vec<char> = line.chars().collect();
    let last = row.iter().rposition(|c| !c.is_whitespace())?;
    let mark = row[last];
    let end = row[..last].iter().rposition(|&c| c != mark).map_or(0, |i| i + 1);
    row.truncate(end);
    Some(row)
}

/// Parses the code of a code tag (decimal, or hex with a `0x` prefix) into its magnitude and
/// whether it is positive. Negative codes mark blocks that are not characters, like translation
/// tables.
pub(crate) fn parse_codepoint(codepoint: &str) -> Option<(u32, bool)> {
    let (positive, codepoint) = codepoint
        .strip_prefix('-')
        .map_or((true, codepoint), |codepoint| (false, codepoint));
    let result = if let Some(codepoint) = codepoint
        .strip_prefix("0x")
        .or_else(|| codepoint.strip_prefix("0X"))
    {
        u32::from_str_radix(codepoint, 16)
    } else {
        codepoint.parse()
    };
    result.ok().map(|codepoint| (codepoint, positive))
}

/// An error in decoding a FIGfont
///
/// Apart from [`FontError::Io`], every variant means the input is not a valid FIGfont. Decoding
/// stops at the first such error and no font is produced.
#[derive(Debug, Error)]
pub enum FontError {
    /// An error in decoding the header
    #[error("bad header: {0}")]
    BadHeader(#[from] HeaderError),
    /// The input ended in the middle of a FIGcharacter.
    #[error(
        "line {line}: input ended inside FIGcharacter {}",
        FontWarning::char_debug(*.codepoint)
    )]
    Truncated {
        /// The line that is missing
        line: usize,
        /// Code of the FIGcharacter being read
        codepoint: u32,
    },
    /// A FIGcharacter row without an *end-mark*
    #[error(
        "line {line}: empty row in FIGcharacter {}",
        FontWarning::char_debug(*.codepoint)
    )]
    EmptyRow {
        /// The offending line
        line: usize,
        /// Code of the FIGcharacter being read
        codepoint: u32,
    },
    /// A code tag that cannot be parsed as a character code
    #[error(r#"line {line}: "{tag}" is not a valid character code"#)]
    InvalidCharacterCode {
        /// The offending line
        line: usize,
        /// The unparsable code
        tag: BString,
    },
    /// The rows of a FIGcharacter do not form a rectangle.
    #[error(
        "FIGcharacter {} has {length} sub-characters, not a multiple of the height {height}",
        FontWarning::char_debug(*.codepoint)
    )]
    RaggedGlyph {
        /// Code of the FIGcharacter
        codepoint: u32,
        /// Total number of sub-characters
        length: usize,
        /// The font height
        height: NonZero<usize>,
    },
    /// Reading the input failed.
    #[error("could not read font: {0}")]
    Io(#[from] io::Error),
}

/// A non-fatal issue with a FIGfont found while decoding
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum FontWarning {
    /// The baseline parameter is not between 1 and the height parameter (inclusive).
    #[error("baseline {baseline} not between 1 and {height} (height)")]
    BaselineOutOfRange {
        /// The baseline parameter
        baseline: usize,
        /// The height parameter
        height: NonZero<usize>,
    },
    /// The font contains fewer tagged characters than specified in the header.
    #[error("found {found} tagged characters but expected {expected} from header")]
    TooFewCodeTags {
        /// The number of tagged characters in the font
        found: usize,
        /// The number of tagged characters specified in the header
        expected: usize,
    },
    /// The rows of a FIGcharacter have different lengths.
    #[error("FIGcharacter {} has inconsistent width", Self::char_debug(*.0))]
    InconsistentWidth(u32),
    /// A raw line is longer than the maximum specified in the header.
    #[error(
        "FIGcharacter {} has a line of length {length} > {max_length} (from header)",
        Self::char_debug(*.codepoint)
    )]
    ExcessLength {
        /// The character code
        codepoint: u32,
        /// The length of the line, end-marks included
        length: usize,
        /// The maximum length specified in the header
        max_length: usize,
    },
}

impl FontWarning {
    pub(crate) fn char_debug(codepoint: u32) -> String {
        char::from_u32(codepoint).map_or_else(
            || format!("\\u{{{codepoint:04X}}}"),
            |c| format!("{c:?}"),
        )
    }
}
