//! Thematic breaks.

use crate::block::state::{BlockState, is_space};
use crate::block::{Nesting, TokenKind};
use crate::limits::CODE_INDENT;
use crate::Range;

/// Thematic break: three or more `*`, `-` or `_`, optionally spaced.
pub fn hr(state: &mut BlockState<'_>, start_line: usize, _end_line: usize, silent: bool) -> bool {
    if state.s_count[start_line] - state.blk_indent >= CODE_INDENT {
        return false;
    }

    let start = state.content_start(start_line);
    let max = state.e_marks[start_line];

    // Must start with -, *, or _
    let marker = match state.byte(start) {
        Some(b @ (b'-' | b'*' | b'_')) => b,
        _ => return false,
    };

    // Count markers and spaces
    let mut count = 0;
    for &b in &state.src.as_bytes()[start..max] {
        if b == marker {
            count += 1;
        } else if !is_space(b) {
            return false;
        }
    }

    // Need at least 3 markers
    if count < 3 {
        return false;
    }

    if silent {
        return true;
    }

    state.line = start_line + 1;

    let token = state.push(TokenKind::ThematicBreak, "hr", Nesting::Leaf);
    token.map = Some(Range::from_usize(start_line, start_line + 1));
    token.markup = char::from(marker).to_string().repeat(count);
    true
}
