//! Renderer and rendering settings
pub mod layout;

use itertools::{Itertools as _, izip};
use thiserror::Error;

use crate::font::{Font, OutOfRange};
use crate::str_ext::CharSliceExt as _;

pub use crate::font::PrintDirection;
pub use layout::{HORIZONTAL_RULES, LayoutOption, LayoutOptions};

const DELETE: char = '\x7f';

/// The main type for rendering
///
/// Use [`render()`](Renderer::render) to process strings. The layout and print direction default
/// to those in the font header; the other methods are meant to override them in a builder
/// pattern:
/// ```
/// # use figtext::font::Font;
/// # use figtext::render::{LayoutOption, PrintDirection, Renderer};
/// # let mut source = String::from("flf2a$ 1 1 4 -1\n");
/// # for c in figtext::font::DEFAULT_CODEPOINTS {
/// #     source.push_str(&format!("{}{}@@\n", char::from(c), char::from(c)));
/// # }
/// let font = Font::from_bytes(source).unwrap();
/// assert_eq!(Renderer::new(&font).render("ab").unwrap(), "aabb");
/// let rendered = Renderer::new(&font)
///     .layout(LayoutOption::HorizontalSmushing.into())
///     .print_direction(PrintDirection::RightToLeft)
///     .render("ab")
///     .unwrap();
/// assert_eq!(rendered, "baa");
/// ```
#[must_use]
#[derive(Debug, Clone, Copy)]
pub struct Renderer<'font> {
    font: &'font Font,
    layout: LayoutOptions,
    direction: PrintDirection,
}

impl<'font> Renderer<'font> {
    /// Creates a renderer with the font's full layout and print direction.
    pub const fn new(font: &'font Font) -> Self {
        let header = font.header();
        Self {
            font,
            layout: header.full_layout,
            direction: header.print_direction,
        }
    }

    /// Sets the layout.
    pub const fn layout(mut self, layout: LayoutOptions) -> Self {
        self.layout = layout;
        self
    }

    /// Sets the print direction.
    pub const fn print_direction(mut self, direction: PrintDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Renders the given string.
    ///
    /// Spaces and tabs render as the font's space glyph. Any other whitespace starts a new output
    /// line, and other control characters (except DEL) are ignored. Every output line is as tall
    /// as the font, rows separated by `\n`; a line that ends in a line break keeps a trailing
    /// `\n`, the last line does not. Hardblanks come out as spaces.
    ///
    /// # Errors
    /// [`RenderError::MissingGlyph`] if the font has no glyph for some character. Nothing is
    /// rendered in that case.
    pub fn render(&self, string: &str) -> Result<String, RenderError> {
        let mut output = String::new();
        let mut rows = vec![Vec::new(); self.font.header().height.get()];
        let mut previous = None;
        for (position, c) in string.chars().enumerate() {
            let c = match c {
                '\t' | ' ' => ' ',
                c if c.is_whitespace() => {
                    self.flush(&mut output, &mut rows, true);
                    previous = None;
                    continue;
                }
                c if c.is_control() && c != DELETE => continue,
                c => c,
            };
            let glyph = self
                .font
                .glyph(c)
                .ok_or(RenderError::MissingGlyph { character: c, position })?;
            let overlap = previous.map_or(0, |previous| {
                self.font
                    .overlap_amount(previous, c, self.layout, self.direction)
            });
            for (index, buffer) in rows.iter_mut().enumerate() {
                self.splice(buffer, glyph.row(index)?, overlap);
            }
            previous = Some(c);
        }
        if rows.iter().any(|row| !row.is_empty()) {
            self.flush(&mut output, &mut rows, false);
        }
        Ok(output)
    }

    // Buffers hold rows in print order, so with right-to-left printing they are reversed and new
    // glyphs are always spliced onto the end.
    fn splice(&self, buffer: &mut Vec<char>, row: &[char], overlap: usize) {
        let incoming: Vec<char> = row.bidi_chars(self.direction).collect();
        let overlap = overlap.min(buffer.len()).min(incoming.len());
        let start = buffer.len() - overlap;
        for (existing, &new) in izip!(&mut buffer[start..], &incoming) {
            *existing = self
                .font
                .smush(*existing, new, self.layout, self.direction)
                .unwrap_or(new);
        }
        buffer.extend_from_slice(&incoming[overlap..]);
    }

    fn flush(&self, output: &mut String, rows: &mut [Vec<char>], line_break: bool) {
        let hardblank = self.font.header().hardblank;
        let line = rows
            .iter()
            .map(|row| {
                row.bidi_chars(self.direction)
                    .map(|c| if hardblank == c { ' ' } else { c })
                    .collect::<String>()
            })
            .join("\n");
        output.push_str(&line);
        if line_break {
            output.push('\n');
        }
        rows.iter_mut().for_each(Vec::clear);
    }
}

/// An error in rendering a string
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RenderError {
    /// The font has no FIGcharacter for a character of the input.
    #[error("no FIGcharacter for {character:?} (position {position} of the input)")]
    MissingGlyph {
        /// The missing character
        character: char,
        /// Index of the character in the input, counting `char`s
        position: usize,
    },
    /// Glyph data did not match the font height.
    #[error(transparent)]
    OutOfRange(#[from] OutOfRange),
}
