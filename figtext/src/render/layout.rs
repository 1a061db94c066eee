//! Layout flags and the horizontal smushing rules
//!
//! Modes are plain sets of [`LayoutOption`]s; the free functions here convert them from and to
//! the raw header values.

use enumset::{EnumSet, EnumSetType, enum_set};

use crate::font::{Hardblank, PrintDirection};

/// A set of [`LayoutOption`]s, as stored in the `Old_Layout` and `Full_Layout` header parameters
///
/// Any combination of flags is a valid rendering mode. The renderer only acts on the horizontal
/// flags; the vertical ones are decoded and kept so that callers can inspect them.
///
/// ```
/// # use figtext::render::{LayoutOption, LayoutOptions, layout};
/// let mode = layout::from_raw(24463);
/// assert!(layout::is_selected(mode, LayoutOption::HorizontalSmushing));
/// assert!(!layout::is_selected(mode, LayoutOption::HorizontalBigX));
/// assert_eq!(layout::to_raw(mode), 24463);
/// ```
pub type LayoutOptions = EnumSet<LayoutOption>;

/// Individual layout flags, named after the FIGfont standard
///
/// The discriminant is the bit position in the `Full_Layout` header parameter. The low byte
/// describes horizontal layout, the high byte mirrors it for vertical layout.
#[derive(EnumSetType, Debug)]
#[enumset(repr = "u16")]
pub enum LayoutOption {
    /// Two identical sub-characters merge into one. Never applies to
    /// [hardblanks](crate::font::Hardblank).
    HorizontalEqualCharacter = 0,
    /// An underscore (`_`) is replaced by any of `|`, `/`, `\`, `[`, `]`, `{`, `}`, `(`, `)`, `<`
    /// or `>`.
    HorizontalUnderscore = 1,
    /// A hierarchy of six classes is used: `|`, `/\`, `[]`, `{}`, `()` and `<>`. When two
    /// sub-characters are from different classes, the one from the latter class is kept.
    HorizontalHierarchy = 2,
    /// Opposing brackets (`[]`), braces (`{}`) and parentheses (`()`), in either order, merge
    /// into a vertical bar (`|`).
    HorizontalOppositePair = 3,
    /// `/\` and `\/` merge into `|`, `><` merges into `X`. The pair `<>` is left alone.
    HorizontalBigX = 4,
    /// Two hardblanks merge into a single hardblank.
    HorizontalHardblank = 5,
    /// Glyphs slide together until they touch.
    HorizontalFitting = 6,
    /// Glyphs slide one step further after they touch, merging the touching sub-characters.
    HorizontalSmushing = 7,
    /// Vertical counterpart of [`LayoutOption::HorizontalEqualCharacter`].
    VerticalEqualCharacter = 8,
    /// Vertical counterpart of [`LayoutOption::HorizontalUnderscore`].
    VerticalUnderscore = 9,
    /// Vertical counterpart of [`LayoutOption::HorizontalHierarchy`].
    VerticalHierarchy = 10,
    /// Stacked `-` and `_` merge into `=`.
    VerticalHorizontalLine = 11,
    /// Stacked vertical bars (`|`) *supersmush* until some other sub-character would collide.
    VerticalLineSupersmushing = 12,
    /// Lines of output slide together vertically until they touch.
    VerticalFitting = 13,
    /// Lines of output slide one step further after they touch.
    VerticalSmushing = 14,
}

/// The six controlled horizontal smushing rules
pub const HORIZONTAL_RULES: LayoutOptions = enum_set!(
    LayoutOption::HorizontalEqualCharacter
        | LayoutOption::HorizontalUnderscore
        | LayoutOption::HorizontalHierarchy
        | LayoutOption::HorizontalOppositePair
        | LayoutOption::HorizontalBigX
        | LayoutOption::HorizontalHardblank
);

/// Rules tried after the hardblank checks, in order.
const CONTROLLED_CASCADE: [LayoutOption; 5] = [
    LayoutOption::HorizontalEqualCharacter,
    LayoutOption::HorizontalUnderscore,
    LayoutOption::HorizontalHierarchy,
    LayoutOption::HorizontalOppositePair,
    LayoutOption::HorizontalBigX,
];

/// Returns true if `mode` shares at least one flag with `flags`.
#[must_use]
pub fn is_selected(mode: LayoutOptions, flags: impl Into<LayoutOptions>) -> bool {
    !mode.is_disjoint(flags.into())
}

/// Decodes a raw `Full_Layout` value.
///
/// Values made only of known flags (bits 0 to 14) decode to that set. Anything else, including
/// negative values, silently decodes to the empty set: old fonts may carry bits this crate does
/// not understand, and they are rendered without any special layout.
///
/// ```
/// # use figtext::render::{LayoutOption, layout};
/// assert_eq!(
///     layout::from_raw(129),
///     LayoutOption::HorizontalEqualCharacter | LayoutOption::HorizontalSmushing
/// );
/// assert!(layout::from_raw(-3).is_empty());
/// assert!(layout::from_raw(0x8000).is_empty());
/// ```
#[must_use]
pub fn from_raw(raw: i32) -> LayoutOptions {
    u16::try_from(raw)
        .ok()
        .and_then(LayoutOptions::try_from_repr)
        .unwrap_or_default()
}

/// Converts an `Old_Layout` value into the equivalent full layout.
///
/// * `-1` (full width) becomes the empty set;
/// * `0` becomes [`LayoutOption::HorizontalFitting`];
/// * anything else is read bit for bit, since the six old rule bits coincide with the horizontal
///   rule bits of the full layout.
#[must_use]
pub fn from_legacy(legacy: i32) -> LayoutOptions {
    match legacy {
        -1 => LayoutOptions::empty(),
        0 => LayoutOption::HorizontalFitting.into(),
        other => from_raw(other),
    }
}

/// The raw `Full_Layout` encoding of a set of options.
#[must_use]
pub fn to_raw(options: LayoutOptions) -> u16 {
    options.as_repr()
}

/// Merges two horizontally adjacent sub-characters, `left` being the one already in place.
///
/// Blanks always give way. Without [`LayoutOption::HorizontalSmushing`] nothing merges. Without
/// any controlled rule, *universal smushing* keeps the visible character over a hardblank and
/// otherwise the later character in input order. With controlled rules, the hardblank rule is
/// tried first, any other hardblank pair fails, and then the remaining rules are tried in
/// order. `None` means the pair cannot be smushed.
pub(crate) fn smush(
    mode: LayoutOptions,
    left: char,
    right: char,
    hardblank: Hardblank,
    direction: PrintDirection,
) -> Option<char> {
    if left == ' ' {
        return Some(right);
    }
    if right == ' ' {
        return Some(left);
    }
    if !mode.contains(LayoutOption::HorizontalSmushing) {
        return None;
    }
    if mode.is_disjoint(HORIZONTAL_RULES) {
        // universal smushing
        let merged = if hardblank == left {
            right
        } else if hardblank == right {
            left
        } else {
            match direction {
                PrintDirection::LeftToRight => right,
                PrintDirection::RightToLeft => left,
            }
        };
        return Some(merged);
    }
    if mode.contains(LayoutOption::HorizontalHardblank) && hardblank == left && hardblank == right
    {
        return Some(left);
    }
    if hardblank == left || hardblank == right {
        return None;
    }
    CONTROLLED_CASCADE
        .into_iter()
        .filter(|&rule| mode.contains(rule))
        .find_map(|rule| rule.smush(left, right))
}

impl LayoutOption {
    fn smush(self, left: char, right: char) -> Option<char> {
        match self {
            Self::HorizontalEqualCharacter => (left == right).then_some(left),
            Self::HorizontalUnderscore => underscore(left, right).or_else(|| underscore(right, left)),
            Self::HorizontalHierarchy => hierarchy(left, right).or_else(|| hierarchy(right, left)),
            Self::HorizontalOppositePair => matches!(
                (left, right),
                ('[', ']') | (']', '[') | ('{', '}') | ('}', '{') | ('(', ')') | (')', '(')
            )
            .then_some('|'),
            Self::HorizontalBigX => match (left, right) {
                ('/', '\\') | ('\\', '/') => Some('|'),
                ('>', '<') => Some('X'),
                _ => None,
            },
            _ => None,
        }
    }
}

fn underscore(a: char, b: char) -> Option<char> {
    (a == '_' && matches!(b, '|' | '/' | '\\' | '[' | ']' | '{' | '}' | '(' | ')' | '<' | '>'))
        .then_some(b)
}

fn hierarchy(a: char, b: char) -> Option<char> {
    matches!(
        (a, b),
        ('|', '/' | '\\' | '[' | ']' | '{' | '}' | '(' | ')' | '<' | '>')
            | ('/' | '\\', '[' | ']' | '{' | '}' | '(' | ')' | '<' | '>')
            | ('[' | ']', '{' | '}' | '(' | ')' | '<' | '>')
            | ('{' | '}', '(' | ')' | '<' | '>')
            | ('(' | ')', '<' | '>')
    )
    .then_some(b)
}

#[cfg(test)]
mod tests {
    use enumset::EnumSet;

    use super::{
        HORIZONTAL_RULES, LayoutOption, LayoutOptions, from_legacy, from_raw, is_selected, smush,
        to_raw,
    };
    use crate::font::{Hardblank, PrintDirection};

    const LTR: PrintDirection = PrintDirection::LeftToRight;
    const RTL: PrintDirection = PrintDirection::RightToLeft;

    fn hardblank() -> Hardblank {
        Hardblank::try_from('$').unwrap()
    }

    fn controlled(rule: LayoutOption) -> LayoutOptions {
        rule | LayoutOption::HorizontalSmushing
    }

    fn merge(mode: LayoutOptions, left: char, right: char) -> Option<char> {
        smush(mode, left, right, hardblank(), LTR)
    }

    #[test]
    fn bit_positions() {
        assert_eq!(to_raw(LayoutOption::HorizontalEqualCharacter.into()), 1);
        assert_eq!(to_raw(LayoutOption::HorizontalHardblank.into()), 32);
        assert_eq!(to_raw(LayoutOption::HorizontalFitting.into()), 64);
        assert_eq!(to_raw(LayoutOption::HorizontalSmushing.into()), 128);
        assert_eq!(to_raw(LayoutOption::VerticalEqualCharacter.into()), 256);
        assert_eq!(to_raw(LayoutOption::VerticalSmushing.into()), 16384);
        assert_eq!(to_raw(HORIZONTAL_RULES), 63);
        assert_eq!(to_raw(EnumSet::all()), 0x7FFF);
    }

    #[test]
    fn selection() {
        let mode = LayoutOption::HorizontalFitting | LayoutOption::HorizontalBigX;
        assert!(is_selected(mode, LayoutOption::HorizontalFitting));
        assert!(is_selected(
            mode,
            LayoutOption::HorizontalFitting | LayoutOption::HorizontalSmushing
        ));
        assert!(!is_selected(mode, LayoutOption::HorizontalSmushing));
        assert!(!is_selected(mode, LayoutOptions::empty()));
    }

    #[test]
    fn legacy_mapping() {
        assert!(from_legacy(-1).is_empty());
        assert_eq!(
            from_legacy(0),
            LayoutOptions::from(LayoutOption::HorizontalFitting)
        );
        assert_eq!(
            from_legacy(15),
            LayoutOption::HorizontalEqualCharacter
                | LayoutOption::HorizontalUnderscore
                | LayoutOption::HorizontalHierarchy
                | LayoutOption::HorizontalOppositePair
        );
        assert!(from_legacy(-7).is_empty());
    }

    #[test]
    fn raw_values() {
        let standard = from_raw(24463);
        assert!(standard.contains(LayoutOption::HorizontalSmushing));
        assert!(standard.contains(LayoutOption::VerticalSmushing));
        assert!(!standard.contains(LayoutOption::VerticalFitting));
        assert_eq!(standard & HORIZONTAL_RULES, from_legacy(15));
        assert!(from_raw(-1).is_empty());
        assert!(from_raw(1 << 15).is_empty());
        assert!(from_raw(i32::MAX).is_empty());
    }

    #[test]
    fn blanks_always_yield() {
        let modes = [
            LayoutOptions::empty(),
            LayoutOption::HorizontalFitting.into(),
            LayoutOption::HorizontalSmushing.into(),
            EnumSet::all(),
        ];
        for mode in modes {
            for c in [' ', 'a', '$', '|', '_', '\\'] {
                for direction in [LTR, RTL] {
                    assert_eq!(smush(mode, ' ', c, hardblank(), direction), Some(c));
                    assert_eq!(smush(mode, c, ' ', hardblank(), direction), Some(c));
                }
            }
        }
    }

    #[test]
    fn kerning_only_without_smushing_flag() {
        let mode = LayoutOption::HorizontalFitting | LayoutOption::HorizontalEqualCharacter;
        assert_eq!(merge(mode, '|', '|'), None);
    }

    #[test]
    fn universal_smushing() {
        let mode = LayoutOption::HorizontalSmushing.into();
        assert_eq!(smush(mode, 'a', 'b', hardblank(), LTR), Some('b'));
        assert_eq!(smush(mode, 'a', 'b', hardblank(), RTL), Some('a'));
        assert_eq!(smush(mode, '$', 'b', hardblank(), LTR), Some('b'));
        assert_eq!(smush(mode, 'a', '$', hardblank(), RTL), Some('a'));
        assert_eq!(smush(mode, '$', '$', hardblank(), LTR), Some('$'));
    }

    #[test]
    fn hardblank_rule() {
        let mode = controlled(LayoutOption::HorizontalHardblank);
        assert_eq!(merge(mode, '$', '$'), Some('$'));
        assert_eq!(merge(mode, '$', '|'), None);
    }

    #[test]
    fn hardblanks_block_other_rules() {
        let mode = controlled(LayoutOption::HorizontalEqualCharacter);
        assert_eq!(merge(mode, '$', '$'), None);
        assert_eq!(merge(mode, '$', 'x'), None);
        assert_eq!(merge(mode, 'x', 'x'), Some('x'));
    }

    #[test]
    fn underscore_rule() {
        let mode = controlled(LayoutOption::HorizontalUnderscore);
        assert_eq!(merge(mode, '_', '/'), Some('/'));
        assert_eq!(merge(mode, '[', '_'), Some('['));
        assert_eq!(merge(mode, '_', '>'), Some('>'));
        assert_eq!(merge(mode, '_', 'x'), None);
        assert_eq!(merge(mode, '_', '_'), None);
    }

    #[test]
    fn hierarchy_rule() {
        let mode = controlled(LayoutOption::HorizontalHierarchy);
        assert_eq!(merge(mode, '|', '/'), Some('/'));
        assert_eq!(merge(mode, '\\', '|'), Some('\\'));
        assert_eq!(merge(mode, '(', '['), Some('('));
        assert_eq!(merge(mode, '<', '}'), Some('<'));
        assert_eq!(merge(mode, '{', ']'), Some('{'));
        assert_eq!(merge(mode, '[', ']'), None);
        assert_eq!(merge(mode, '|', '|'), None);
    }

    #[test]
    fn opposite_pair_rule() {
        let mode = controlled(LayoutOption::HorizontalOppositePair);
        assert_eq!(merge(mode, '[', ']'), Some('|'));
        assert_eq!(merge(mode, ')', '('), Some('|'));
        assert_eq!(merge(mode, '}', '{'), Some('|'));
        assert_eq!(merge(mode, '[', ')'), None);
        assert_eq!(merge(mode, '<', '>'), None);
    }

    #[test]
    fn big_x_rule() {
        let mode = controlled(LayoutOption::HorizontalBigX);
        assert_eq!(merge(mode, '/', '\\'), Some('|'));
        assert_eq!(merge(mode, '\\', '/'), Some('|'));
        assert_eq!(merge(mode, '>', '<'), Some('X'));
        assert_eq!(merge(mode, '<', '>'), None);
    }

    #[test]
    fn cascade_falls_through_to_later_rules() {
        let mode = LayoutOption::HorizontalHierarchy
            | LayoutOption::HorizontalOppositePair
            | LayoutOption::HorizontalSmushing;
        assert_eq!(merge(mode, '[', ']'), Some('|'));
        assert_eq!(merge(mode, '[', '('), Some('('));
        assert_eq!(merge(mode, 'a', 'b'), None);
    }
}
