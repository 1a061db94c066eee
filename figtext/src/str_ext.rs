use std::slice::Iter;

use crate::font::PrintDirection;

pub(crate) trait CharSliceExt {
    fn bidi_chars(&self, direction: PrintDirection) -> BidiChars<'_>;
}

impl CharSliceExt for [char] {
    fn bidi_chars(&self, direction: PrintDirection) -> BidiChars<'_> {
        BidiChars::new(self, direction)
    }
}

/// Iterates over a row of sub-characters in print order: front to back when printing
/// left-to-right, back to front otherwise.
pub(crate) struct BidiChars<'a> {
    chars: Iter<'a, char>,
    direction: PrintDirection,
}

impl<'a> BidiChars<'a> {
    fn new(row: &'a [char], direction: PrintDirection) -> Self {
        let chars = row.iter();
        Self { chars, direction }
    }
}

impl Iterator for BidiChars<'_> {
    type Item = char;

    fn next(&mut self) -> Option<Self::Item> {
        match self.direction {
            PrintDirection::LeftToRight => self.chars.next().copied(),
            PrintDirection::RightToLeft => self.chars.next_back().copied(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chars.size_hint()
    }
}

impl ExactSizeIterator for BidiChars<'_> {}

#[cfg(test)]
mod tests {
    use super::CharSliceExt as _;
    use crate::font::PrintDirection;

    #[test]
    fn reverses_right_to_left() {
        let row = ['a', 'b', 'c'];
        let forward: String = row.bidi_chars(PrintDirection::LeftToRight).collect();
        let backward: String = row.bidi_chars(PrintDirection::RightToLeft).collect();
        assert_eq!(forward, "abc");
        assert_eq!(backward, "cba");
        assert_eq!(row.bidi_chars(PrintDirection::RightToLeft).len(), 3);
    }
}
