//! DoS prevention constants.
//!
//! These limits keep pathological inputs from driving recursion or
//! scanning cost out of proportion with document length.

/// Maximum token nesting level for block containers (lists, blockquotes,
/// `:::` containers). Each list costs two levels (list + item). Lines that
/// would open a block past this depth are kept as paragraph text.
pub const MAX_BLOCK_NESTING: u32 = 32;

/// Maximum digits in ordered list marker (prevents big-integer parsing)
pub const MAX_LIST_MARKER_DIGITS: usize = 9;

/// Maximum ATX heading level.
pub const MAX_HEADING_LEVEL: usize = 6;

/// Columns of indentation that turn a line into indented code.
pub const CODE_INDENT: i32 = 4;
