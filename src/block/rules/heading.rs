//! ATX headings.

use crate::block::state::{BlockState, is_space};
use crate::block::{Nesting, TokenKind};
use crate::limits::{CODE_INDENT, MAX_HEADING_LEVEL};
use crate::Range;

const HEADING_TAGS: [&str; MAX_HEADING_LEVEL] = ["h1", "h2", "h3", "h4", "h5", "h6"];

/// ATX heading: `#` to `######` followed by space or end of line.
pub fn heading(state: &mut BlockState<'_>, start_line: usize, _end_line: usize, silent: bool) -> bool {
    if state.s_count[start_line] - state.blk_indent >= CODE_INDENT {
        return false;
    }

    let start = state.content_start(start_line);
    let max = state.e_marks[start_line];

    // Must start with #
    if start >= max || state.byte(start) != Some(b'#') {
        return false;
    }

    // Count # characters (1-6)
    let pos = state.skip_chars(start, b'#').min(max);
    let level = pos - start;
    if level > MAX_HEADING_LEVEL {
        return false;
    }

    // Must be followed by space, tab, or end of line
    if pos < max && !state.byte(pos).is_some_and(is_space) {
        return false;
    }

    if silent {
        return true;
    }

    // Trim trailing spaces, then an optional closing sequence preceded by space
    let mut end = state.skip_spaces_back(max, pos);
    let hashes = state.skip_chars_back(end, b'#', pos);
    if hashes > pos && state.byte(hashes - 1).is_some_and(is_space) {
        end = hashes;
    }

    let content = state.src[pos..end].trim().to_owned();
    let tag = HEADING_TAGS[level - 1];
    let map = Range::from_usize(start_line, start_line + 1);

    state.line = start_line + 1;

    let token = state.push(TokenKind::HeadingOpen, tag, Nesting::Open);
    token.markup = "#".repeat(level);
    token.map = Some(map);

    let token = state.push(TokenKind::Inline, "", Nesting::Leaf);
    token.content = content;
    token.map = Some(map);

    let token = state.push(TokenKind::HeadingClose, tag, Nesting::Close);
    token.markup = "#".repeat(level);
    true
}
