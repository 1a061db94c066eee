//! A crate for parsing FIGfonts and rendering text using these fonts.
//!
//! # Features
//!
//! - Decoding `.flf` files, including code-tagged characters in decimal or hexadecimal
//!   ([`Font`](crate::font::Font))
//! - Horizontal fitting and smushing with all six controlled rules as well as universal smushing
//!   ([`LayoutOption`](crate::render::LayoutOption))
//! - Left-to-right and right-to-left printing
//!   ([`PrintDirection`](crate::font::PrintDirection))
//!
//! # Example
//!
//! ```
//! # use figtext::font::{DEFAULT_CODEPOINTS, Font};
//! # use figtext::render::{LayoutOption, Renderer};
//! // a tiny font where every character is a slanted bar
//! let mut source = String::from("flf2a$ 2 2 4 -1 0 0 0\n");
//! for _ in DEFAULT_CODEPOINTS {
//!     source.push_str(" /@\n/ @@\n");
//! }
//! let font = Font::from_bytes(source).unwrap();
//! assert_eq!(font.render("ab").unwrap(), " / /\n/ / ");
//!
//! let fitted = Renderer::new(&font)
//!     .layout(LayoutOption::HorizontalFitting.into())
//!     .render("ab")
//!     .unwrap();
//! assert_eq!(fitted, " //\n// ");
//! ```

pub mod font;
pub mod render;
mod str_ext;
