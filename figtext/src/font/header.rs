use std::num::NonZero;
use std::str::{self, FromStr};

use bstr::{BString, ByteSlice as _};
use thiserror::Error;

use crate::render::LayoutOption;
use crate::render::layout::{self, LayoutOptions};

/// The magic string every FIGfont starts with.
pub const SIGNATURE: &[u8] = b"flf2";

/// A FIGfont header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    /// The *hardblank* character; see [`Hardblank`] for its significance in rendering.
    pub hardblank: Hardblank,
    /// Number of rows of sub-characters in each glyph. *Every* glyph in a given FIGfont has the
    /// same height, including any empty space above or below it.
    pub height: NonZero<usize>,
    /// The number of rows from the baseline of a glyph to the top of the tallest glyph, ignoring
    /// descenders. Does not affect the rendered output. Zero when the header omits it.
    pub baseline: usize,
    /// An upper bound for the length of each raw glyph line, usually the width of the widest
    /// glyph plus 2 for the end-marks. Zero when the header omits it.
    pub max_length: usize,
    /// The `Old_Layout` parameter, read as a set of flags.
    pub old_layout: LayoutOptions,
    /// The effective layout: `Full_Layout` if present, otherwise derived from `Old_Layout` (see
    /// [`layout::from_legacy`]).
    pub full_layout: LayoutOptions,
    /// Number of comment lines between the header and the glyphs.
    pub comment_lines: usize,
    /// The default print direction.
    pub print_direction: PrintDirection,
    /// Number of code-tagged glyphs following the 102 required ones, as announced by the header.
    pub code_tag_count: usize,
}

impl Header {
    /// Decode a header line.
    ///
    /// The line starts with `flf2` immediately followed by a signature suffix whose last
    /// character is the hardblank, e.g. `flf2a$`. The whitespace-separated parameters after that
    /// are `Height`, `Baseline`, `Max_Length`, `Old_Layout`, `Comment_Lines`, `Print_Direction`,
    /// `Full_Layout` and `Codetag_Count`. Only `Height` is required.
    ///
    /// ```
    /// # use figtext::font::{Header, PrintDirection};
    /// # use figtext::render::LayoutOption;
    /// let header = Header::decode("flf2a$ 6 5 16 15 11 0 24463 229").unwrap();
    /// assert_eq!(header.hardblank, '$');
    /// assert_eq!(header.height.get(), 6);
    /// assert_eq!(header.comment_lines, 11);
    /// assert_eq!(header.print_direction, PrintDirection::LeftToRight);
    /// assert!(header.full_layout.contains(LayoutOption::HorizontalSmushing));
    /// ```
    ///
    /// # Errors
    /// Any fatal decoding error, see [`HeaderError`] for details.
    pub fn decode(header_line: impl AsRef<[u8]>) -> Result<Self, HeaderError> {
        let header_line = header_line.as_ref();
        let mut parameters = header_line.fields();
        let Some(signature_and_hardblank) = parameters.next() else {
            return Err(HeaderError::Missing);
        };
        let Some(suffix) = signature_and_hardblank.strip_prefix(SIGNATURE) else {
            return Err(HeaderError::UnknownSignature(
                signature_and_hardblank.into(),
            ));
        };
        let Some(hardblank) = suffix.chars().next_back() else {
            return Err(HeaderError::MissingHardblank);
        };
        let hardblank = hardblank
            .try_into()
            .map_err(HeaderError::InvalidHardblankChar)?;

        let height = parameters.next().ok_or(HeaderError::MissingHeight)?;
        let Some(height) = NonZero::new(IntParameter::Height.parse(height)?) else {
            return Err(HeaderError::ZeroHeight);
        };
        let baseline = IntParameter::Baseline.parse_optional(parameters.next())?;
        let max_length = IntParameter::MaxLength.parse_optional(parameters.next())?;
        let old_layout: Option<i32> = IntParameter::OldLayout.parse_optional(parameters.next())?;
        let comment_lines = IntParameter::CommentLines.parse_optional(parameters.next())?;
        let print_direction = IntParameter::PrintDirection
            .parse_optional(parameters.next())?
            .map(PrintDirection::decode)
            .transpose()?;
        let full_layout = IntParameter::FullLayout.parse_optional(parameters.next())?;
        let code_tag_count = IntParameter::CodeTagCount.parse_optional(parameters.next())?;

        let default_layout = LayoutOptions::from(LayoutOption::HorizontalFitting);
        let header = Self {
            hardblank,
            height,
            baseline: baseline.unwrap_or(0),
            max_length: max_length.unwrap_or(0),
            old_layout: old_layout.map_or(default_layout, layout::from_raw),
            full_layout: full_layout.map_or_else(
                || old_layout.map_or(default_layout, layout::from_legacy),
                layout::from_raw,
            ),
            comment_lines: comment_lines.unwrap_or(0),
            print_direction: print_direction.unwrap_or_default(),
            code_tag_count: code_tag_count.unwrap_or(0),
        };
        Ok(header)
    }
}

/// Printing direction, left-to-right or right-to-left
///
/// Each font specifies a default, found in `font.header().print_direction`, which a
/// [`Renderer`](crate::render::Renderer) may override. The rendered string should always be read
/// left-to-right.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PrintDirection {
    /// Left-to-right
    #[default]
    LeftToRight,
    /// Right-to-left
    RightToLeft,
}

impl PrintDirection {
    /// Decodes the `Print_Direction` header value: `0` is left-to-right and `1` right-to-left.
    ///
    /// # Errors
    /// [`HeaderError::PrintDirection`] for any other value.
    pub fn decode(value: i32) -> Result<Self, HeaderError> {
        match value {
            0 => Ok(Self::LeftToRight),
            1 => Ok(Self::RightToLeft),
            other => Err(HeaderError::PrintDirection(other)),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum IntParameter {
    Height,
    Baseline,
    MaxLength,
    OldLayout,
    CommentLines,
    PrintDirection,
    FullLayout,
    CodeTagCount,
}

impl IntParameter {
    fn parse<T: FromStr>(self, bytes: &[u8]) -> Result<T, HeaderError> {
        str::from_utf8(bytes)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| HeaderError::Parse(self.name(), bytes.into()))
    }

    fn parse_optional<T: FromStr>(self, bytes: Option<&[u8]>) -> Result<Option<T>, HeaderError> {
        bytes.map(|bytes| self.parse(bytes)).transpose()
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Height => "Height",
            Self::Baseline => "Baseline",
            Self::MaxLength => "Max_Length",
            Self::OldLayout => "Old_Layout",
            Self::CommentLines => "Comment_Lines",
            Self::PrintDirection => "Print_Direction",
            Self::FullLayout => "Full_Layout",
            Self::CodeTagCount => "Codetag_Count",
        }
    }
}

/// A hardblank character
///
/// A hardblank is a special sub-character which is displayed as a blank (`' '`) once rendered, but
/// is treated like a visible sub-character when fitting or smushing. Hardblanks therefore keep
/// adjacent glyphs a certain distance apart.
///
/// The usual hardblank is a `$`, but it can be any character except a blank (`' '`), a
/// carriage-return, a newline or a null character.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hardblank(char);

impl Hardblank {
    /// The hardblank as a plain `char`.
    #[must_use]
    pub const fn get(self) -> char {
        self.0
    }
}

impl PartialEq<char> for Hardblank {
    fn eq(&self, other: &char) -> bool {
        self.0 == *other
    }
}

impl TryFrom<char> for Hardblank {
    type Error = char;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        if matches!(value, ' ' | '\r' | '\n' | '\0') {
            Err(value)
        } else {
            Ok(Self(value))
        }
    }
}

/// An error in decoding a FIGfont header
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HeaderError {
    /// There is no header, ie the contents are empty.
    #[error("missing header")]
    Missing,
    /// The header does not begin with `"flf2"`.
    #[error(r#""{0}" does not begin with "flf2""#)]
    UnknownSignature(BString),
    /// The signature has no character after `"flf2"` to serve as the hardblank.
    #[error("missing hardblank after the signature")]
    MissingHardblank,
    /// The specified hardblank is a blank (space), a carriage-return, a newline (linefeed) or a
    /// null character.
    #[error("{0:?} must not be the hardblank")]
    InvalidHardblankChar(char),
    /// The header stops after the signature.
    #[error("missing height parameter")]
    MissingHeight,
    /// The height parameter is 0.
    #[error("height parameter is 0")]
    ZeroHeight,
    /// One of the integer parameters cannot be parsed.
    #[error(r#""{1}" cannot be parsed as the parameter `{0}`"#)]
    Parse(&'static str, BString),
    /// The print direction parameter is not 0 or 1.
    #[error("{0} is an invalid print direction, expecting 0 or 1")]
    PrintDirection(i32),
}
