//! Bullet and ordered lists.

use crate::block::state::{BlockState, ParentKind, is_space};
use crate::block::{Nesting, TokenKind};
use crate::limits::{CODE_INDENT, MAX_LIST_MARKER_DIGITS};
use crate::Range;

/// Position right after a bullet marker (`-`, `+`, `*`), if the line has one.
fn skip_bullet_marker(state: &BlockState<'_>, line: usize) -> Option<usize> {
    let pos = state.content_start(line);
    let max = state.e_marks[line];

    if !matches!(state.byte(pos), Some(b'*' | b'-' | b'+')) || pos >= max {
        return None;
    }

    let pos = pos + 1;
    if pos < max && !state.byte(pos).is_some_and(is_space) {
        return None;
    }
    Some(pos)
}

/// Position right after an ordered marker (`1.` or `1)`), if the line has one.
fn skip_ordered_marker(state: &BlockState<'_>, line: usize) -> Option<usize> {
    let start = state.content_start(line);
    let max = state.e_marks[line];
    let mut pos = start;

    if pos + 1 >= max || !state.byte(pos).is_some_and(|b| b.is_ascii_digit()) {
        return None;
    }
    pos += 1;

    loop {
        if pos >= max {
            return None;
        }
        let ch = state.byte(pos)?;
        pos += 1;

        if ch.is_ascii_digit() {
            if pos - start > MAX_LIST_MARKER_DIGITS {
                return None;
            }
            continue;
        }

        if ch == b')' || ch == b'.' {
            break;
        }
        return None;
    }

    if pos < max && !state.byte(pos).is_some_and(is_space) {
        return None;
    }
    Some(pos)
}

/// Hide the paragraph tags directly inside the items of a tight list.
fn mark_tight_paragraphs(state: &mut BlockState<'_>, list_idx: usize) {
    let level = state.level + 2;
    let len = state.tokens.len();
    let mut i = list_idx + 2;
    while i + 2 < len {
        if state.tokens[i].level == level && state.tokens[i].kind == TokenKind::ParagraphOpen {
            state.tokens[i].hidden = true;
            state.tokens[i + 2].hidden = true;
            i += 2;
        }
        i += 1;
    }
}

/// List: a run of items sharing the same marker character.
pub fn list(state: &mut BlockState<'_>, start_line: usize, end_line: usize, silent: bool) -> bool {
    let mut next_line = start_line;

    if state.s_count[next_line] - state.blk_indent >= CODE_INDENT {
        return false;
    }

    // "  1. a\n  2. b" nested under a list that is itself indented as code
    if let Some(list_indent) = state.list_indent {
        if state.s_count[next_line] - list_indent >= CODE_INDENT
            && state.s_count[next_line] < state.blk_indent
        {
            return false;
        }
    }

    // Only some lists may interrupt a paragraph.
    let terminating_paragraph =
        silent && state.parent == ParentKind::Paragraph && state.s_count[next_line] >= state.blk_indent;

    let src = state.src;
    let mut start = state.content_start(next_line);
    let (ordered, mut pos_after_marker, marker_value) =
        if let Some(pos) = skip_ordered_marker(state, next_line) {
            let value: u32 = src[start..pos - 1].parse().unwrap_or(1);
            if terminating_paragraph && value != 1 {
                return false;
            }
            (true, pos, value)
        } else if let Some(pos) = skip_bullet_marker(state, next_line) {
            (false, pos, 1)
        } else {
            return false;
        };

    // An empty item cannot interrupt a paragraph.
    if terminating_paragraph && state.skip_spaces(pos_after_marker) >= state.e_marks[next_line] {
        return false;
    }

    if silent {
        return true;
    }

    let marker = src.as_bytes()[pos_after_marker - 1];
    let marker_str = char::from(marker).to_string();
    let list_idx = state.tokens.len();

    let (open_kind, close_kind, tag) = if ordered {
        (TokenKind::OrderedListOpen, TokenKind::OrderedListClose, "ol")
    } else {
        (TokenKind::BulletListOpen, TokenKind::BulletListClose, "ul")
    };

    let token = state.push(open_kind, tag, Nesting::Open);
    token.markup = marker_str.clone();
    if ordered && marker_value != 1 {
        token.attrs.push("start", marker_value.to_string());
    }

    let parser = state.parser;
    let terminators = parser.ruler().rules("list");
    let mut tight = true;

    state.with_parent(ParentKind::List, |state| {
        let mut prev_empty_end = false;

        while next_line < end_line {
            let mut pos = pos_after_marker;
            let max = state.e_marks[next_line];

            let initial = state.s_count[next_line] + (pos_after_marker - state.content_start(next_line)) as i32;
            let mut offset = initial;

            while pos < max {
                match state.byte(pos) {
                    Some(b'\t') => offset += 4 - offset % 4,
                    Some(b' ') => offset += 1,
                    _ => break,
                }
                pos += 1;
            }

            let content_start = pos;
            let mut indent_after_marker = if content_start >= max { 1 } else { offset - initial };

            // More than 4 spaces after the marker: the item starts with code.
            if indent_after_marker > CODE_INDENT {
                indent_after_marker = 1;
            }

            let indent = initial + indent_after_marker;

            let item_idx = state.tokens.len();
            let token = state.push(TokenKind::ListItemOpen, "li", Nesting::Open);
            token.markup = marker_str.clone();
            if ordered {
                token.info = src[start..pos_after_marker - 1].to_owned();
            }

            let old_tight = state.tight;
            let old_t_shift = state.t_shift[next_line];
            let old_s_count = state.s_count[next_line];
            let old_list_indent = state.list_indent;

            state.list_indent = Some(state.blk_indent);
            state.blk_indent = indent;
            state.tight = true;
            state.t_shift[next_line] = content_start - state.b_marks[next_line];
            state.s_count[next_line] = offset;

            if content_start >= max && state.is_empty(next_line + 1) {
                // An item can begin with at most one blank line.
                state.line = (state.line + 2).min(end_line);
            } else {
                parser.tokenize(state, next_line, end_line);
            }

            if !state.tight || prev_empty_end {
                tight = false;
            }

            // A trailing blank line inside an item makes the list loose
            // only if another item follows.
            prev_empty_end = state.line - next_line > 1 && state.is_empty(state.line - 1);

            state.blk_indent = state.list_indent.unwrap_or(0);
            state.list_indent = old_list_indent;
            state.t_shift[next_line] = old_t_shift;
            state.s_count[next_line] = old_s_count;
            state.tight = old_tight;

            let token = state.push(TokenKind::ListItemClose, "li", Nesting::Close);
            token.markup = marker_str.clone();

            let item_start = next_line;
            next_line = state.line;
            state.tokens[item_idx].map = Some(Range::from_usize(item_start, next_line));

            if next_line >= end_line {
                break;
            }

            // Dedented or code-indented lines end the list.
            if state.s_count[next_line] < state.blk_indent {
                break;
            }
            if state.s_count[next_line] - state.blk_indent >= CODE_INDENT {
                break;
            }

            if terminators.iter().any(|rule| rule(state, next_line, end_line, true)) {
                break;
            }

            let next_marker = if ordered {
                start = state.content_start(next_line);
                skip_ordered_marker(state, next_line)
            } else {
                skip_bullet_marker(state, next_line)
            };
            match next_marker {
                Some(pos) if src.as_bytes()[pos - 1] == marker => pos_after_marker = pos,
                _ => break,
            }
        }
    });

    let token = state.push(close_kind, tag, Nesting::Close);
    token.markup = marker_str;

    state.tokens[list_idx].map = Some(Range::from_usize(start_line, next_line));
    state.line = next_line;

    if tight {
        mark_tight_paragraphs(state, list_idx);
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockParser;

    fn parse(input: &str) -> Vec<crate::block::Token> {
        BlockParser::new().parse(input)
    }

    #[test]
    fn test_ordered_marker() {
        let parser = BlockParser::new();
        let state = BlockState::new("12. x\n1234567890. y\n1x", &parser);
        assert_eq!(skip_ordered_marker(&state, 0), Some(3));
        assert_eq!(skip_ordered_marker(&state, 1), None);
        assert_eq!(skip_ordered_marker(&state, 2), None);
    }

    #[test]
    fn test_bullet_marker() {
        let parser = BlockParser::new();
        let state = BlockState::new("- x\n-x\n+", &parser);
        assert_eq!(skip_bullet_marker(&state, 0), Some(1));
        assert_eq!(skip_bullet_marker(&state, 1), None);
        assert_eq!(skip_bullet_marker(&state, 2), Some(8));
    }

    #[test]
    fn test_marker_change_starts_new_list() {
        let tokens = parse("- a\n+ b");
        let lists = tokens.iter().filter(|t| t.kind == TokenKind::BulletListOpen).count();
        assert_eq!(lists, 2);
    }

    #[test]
    fn test_item_continuation_indent() {
        let tokens = parse("- a\n\n  b\n- c");
        let items = tokens.iter().filter(|t| t.kind == TokenKind::ListItemOpen).count();
        assert_eq!(items, 2);
        let paragraphs = tokens.iter().filter(|t| t.kind == TokenKind::ParagraphOpen).count();
        assert_eq!(paragraphs, 3);
    }

    #[test]
    fn test_ordered_cannot_interrupt_paragraph_unless_one() {
        let tokens = parse("text\n2. two");
        assert!(tokens.iter().all(|t| t.kind != TokenKind::OrderedListOpen));
        let tokens = parse("text\n1. one");
        assert!(tokens.iter().any(|t| t.kind == TokenKind::OrderedListOpen));
    }

    #[test]
    fn test_empty_item_cannot_interrupt_paragraph() {
        let tokens = parse("text\n-");
        assert!(tokens.iter().all(|t| t.kind != TokenKind::BulletListOpen));
    }

    #[test]
    fn test_item_map() {
        let tokens = parse("- a\n- b");
        let maps: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::ListItemOpen)
            .map(|t| t.map)
            .collect();
        assert_eq!(maps, vec![Some(Range::new(0, 1)), Some(Range::new(1, 2))]);
    }
}
