//! Fenced `:::` containers.

use crate::block::state::{BlockState, ParentKind, Scope};
use crate::block::{Nesting, TokenKind};
use crate::container;
use crate::limits::CODE_INDENT;
use crate::Range;

/// Fenced container block.
///
/// The opening run must be at least `min_markers` long and followed by a
/// parameter string [`container::validate`] accepts. The closing fence is
/// a run at least as long as the opening one with nothing else on the line.
/// Without one, the block autocloses at `end_line` or at the first line
/// dedented below the current block.
pub fn container(state: &mut BlockState<'_>, start_line: usize, end_line: usize, silent: bool) -> bool {
    let options = state.options().container;
    let marker = options.marker();

    let start = state.content_start(start_line);
    let max = state.e_marks[start_line];
    if start >= max || state.byte(start) != Some(marker) {
        return false;
    }

    let pos = state.skip_chars(start, marker).min(max);
    let marker_count = pos - start;
    if marker_count < options.min_markers() {
        return false;
    }

    let src = state.src;
    let params = &src[pos..max];
    if !container::validate(params, char::from(marker)) {
        if !silent {
            trace!(line = start_line, params, "container fence rejected: invalid parameters");
        }
        return false;
    }

    if silent {
        return true;
    }

    let mut next_line = start_line;
    let mut closing = None;

    loop {
        next_line += 1;
        if next_line >= end_line {
            break;
        }

        let line_start = state.content_start(next_line);
        let line_end = state.e_marks[next_line];

        if line_start < line_end && state.s_count[next_line] < state.blk_indent {
            // Dedented non-blank line ends the enclosing list item.
            break;
        }

        if state.byte(line_start) != Some(marker) {
            continue;
        }

        if state.s_count[next_line] - state.blk_indent >= CODE_INDENT {
            continue;
        }

        let run_end = state.skip_chars(line_start, marker).min(line_end);
        if run_end - line_start < marker_count {
            continue;
        }

        if state.skip_spaces(run_end) < line_end {
            continue;
        }

        closing = Some(&src[line_start..run_end]);
        break;
    }

    let closed = closing.is_some();
    trace!(line = start_line, markers = marker_count, "container opened");

    let scope = Scope {
        parent: ParentKind::Container,
        line_max: next_line,
    };
    let parser = state.parser;
    state.scoped(scope, |state| {
        let token = state.push(TokenKind::ContainerOpen, "div", Nesting::Open);
        token.markup = src[start..pos].to_owned();
        token.info = params.to_owned();
        token.map = Some(Range::from_usize(start_line, next_line));

        parser.tokenize(state, start_line + 1, next_line);

        let token = state.push(TokenKind::ContainerClose, "div", Nesting::Close);
        token.markup = closing.unwrap_or_default().to_owned();
    });

    state.line = next_line + usize::from(closed);
    trace!(line = next_line, closed, "container ended");
    true
}

#[cfg(test)]
mod tests {
    use crate::block::{BlockParser, Nesting, ParentKind, Token, TokenKind::*};
    use crate::{ContainerOptions, Options, Range};

    fn parse(input: &str) -> Vec<Token> {
        BlockParser::new().parse(input)
    }

    fn containers(tokens: &[Token]) -> Vec<&Token> {
        tokens
            .iter()
            .filter(|t| matches!(t.kind, ContainerOpen | ContainerClose))
            .collect()
    }

    #[test]
    fn test_basic_container() {
        let tokens = parse("::: warning\n*here be dragons*\n:::");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![ContainerOpen, ParagraphOpen, Inline, ParagraphClose, ContainerClose]
        );
        assert_eq!(tokens[0].markup, ":::");
        assert_eq!(tokens[0].info, " warning");
        assert_eq!(tokens[0].tag, "div");
        assert_eq!(tokens[0].map, Some(Range::new(0, 2)));
        assert_eq!(tokens[4].markup, ":::");
        assert_eq!(tokens[1].level, 1);
    }

    #[test]
    fn test_longer_closing_run_closes() {
        for k in 3..7 {
            for extra in 0..3 {
                let input = format!("{} note\nbody\n{}\nafter", ":".repeat(k), ":".repeat(k + extra));
                let tokens = parse(&input);
                let pair = containers(&tokens);
                assert_eq!(pair.len(), 2, "k={k} extra={extra}");
                assert_eq!(pair[1].markup.len(), k + extra);
                // `after` is a sibling paragraph at level 0.
                assert_eq!(tokens.last().map(|t| t.level), Some(0));
            }
        }
    }

    #[test]
    fn test_shorter_closing_run_is_content() {
        let tokens = parse("::::: outer\n:::\n:::::");
        let pair = containers(&tokens);
        assert_eq!(pair.len(), 2);
        assert_eq!(pair[1].markup, ":::::");
        let inline: Vec<_> = tokens.iter().filter(|t| t.kind == Inline).collect();
        assert_eq!(inline[0].content, ":::");
    }

    #[test]
    fn test_autoclose_at_end_of_document() {
        let tokens = parse("::: note\none\ntwo");
        let last = tokens.last().unwrap();
        assert_eq!(last.kind, ContainerClose);
        assert!(last.markup.is_empty());
        assert_eq!(tokens[0].map, Some(Range::new(0, 3)));
        assert_eq!(tokens[2].content, "one\ntwo");
    }

    #[test]
    fn test_invalid_params_fall_through() {
        let tokens = parse("::: not valid {{{\ntext\n:::");
        assert!(containers(&tokens).is_empty());
        assert_eq!(tokens[0].kind, ParagraphOpen);
        assert_eq!(tokens[1].content, "::: not valid {{{\ntext\n:::");
    }

    #[test]
    fn test_bare_markers_are_not_a_fence() {
        let tokens = parse(":::\ntext");
        assert!(containers(&tokens).is_empty());
    }

    #[test]
    fn test_too_few_markers() {
        assert!(containers(&parse(":: note\n::")).is_empty());
    }

    #[test]
    fn test_nested_shorter_run() {
        let tokens = parse("::::: outer\n::: inner\ntext\n:::\n:::::");
        let levels: Vec<_> = containers(&tokens)
            .iter()
            .map(|t| (t.kind, t.level, t.info.trim().to_owned()))
            .collect();
        assert_eq!(levels, vec![
            (ContainerOpen, 0, "outer".to_owned()),
            (ContainerOpen, 1, "inner".to_owned()),
            (ContainerClose, 1, String::new()),
            (ContainerClose, 0, String::new()),
        ]);
    }

    #[test]
    fn test_indented_closing_candidate_is_content() {
        let tokens = parse("::: a\n    :::\n:::");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![ContainerOpen, CodeBlock, ContainerClose]);
        assert_eq!(tokens[1].content, ":::\n");
    }

    #[test]
    fn test_closing_with_trailing_text_is_content() {
        let tokens = parse("::: a\n::: b\n:::");
        // `::: b` cannot close the outer block, so it opens an inner one
        // that autocloses where the outer block ends.
        let pair = containers(&tokens);
        assert_eq!(pair.len(), 4);
        assert!(pair[2].markup.is_empty());
        assert_eq!(pair[3].markup, ":::");
    }

    #[test]
    fn test_interrupts_paragraph() {
        let tokens = parse("text\n::: note\nbody\n:::");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(kinds[..4], [ParagraphOpen, Inline, ParagraphClose, ContainerOpen]);
    }

    #[test]
    fn test_scope_restored_after_container() {
        let parser = BlockParser::new();
        let mut state = crate::block::BlockState::new("::: a\nx\n\ny", &parser);
        let end = state.line_max;
        assert!(super::container(&mut state, 0, end, false));
        assert_eq!(state.parent, ParentKind::Root);
        assert_eq!(state.line_max, end);
        assert_eq!(state.level, 0);
        assert_eq!(state.line, end);
    }

    #[test]
    fn test_silent_mode_has_no_side_effects() {
        let parser = BlockParser::new();
        let mut state = crate::block::BlockState::new("::: a\nx\n:::", &parser);
        let end = state.line_max;
        assert!(super::container(&mut state, 0, end, true));
        assert!(state.tokens.is_empty());
        assert_eq!(state.line, 0);
    }

    #[test]
    fn test_silent_rejection_has_no_side_effects() {
        let parser = BlockParser::new();
        let mut state = crate::block::BlockState::new("::: {bad\nx", &parser);
        let end = state.line_max;
        assert!(!super::container(&mut state, 0, end, true));
        assert!(state.tokens.is_empty());
        assert_eq!(state.line, 0);
    }

    #[cfg(feature = "trace")]
    #[test]
    fn test_only_real_rejections_are_traced() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;
        use tracing::field::{Field, Visit};
        use tracing::span::{Attributes, Id, Record};
        use tracing::{Event, Metadata, Subscriber};

        struct Rejections(Arc<AtomicUsize>);

        struct IsRejection(bool);

        impl Visit for IsRejection {
            fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
                if field.name() == "message" && format!("{value:?}").contains("rejected") {
                    self.0 = true;
                }
            }
        }

        impl Subscriber for Rejections {
            fn enabled(&self, _: &Metadata<'_>) -> bool {
                true
            }
            fn new_span(&self, _: &Attributes<'_>) -> Id {
                Id::from_u64(1)
            }
            fn record(&self, _: &Id, _: &Record<'_>) {}
            fn record_follows_from(&self, _: &Id, _: &Id) {}
            fn event(&self, event: &Event<'_>) {
                let mut visitor = IsRejection(false);
                event.record(&mut visitor);
                if visitor.0 {
                    self.0.fetch_add(1, Ordering::Relaxed);
                }
            }
            fn enter(&self, _: &Id) {}
            fn exit(&self, _: &Id) {}
        }

        let count = Arc::new(AtomicUsize::new(0));

        // Line 1 is only tried as a paragraph terminator.
        tracing::subscriber::with_default(Rejections(Arc::clone(&count)), || {
            parse("text\n::: {bad\nmore");
        });
        assert_eq!(count.load(Ordering::Relaxed), 0);

        tracing::subscriber::with_default(Rejections(Arc::clone(&count)), || {
            parse("::: {bad\nmore");
        });
        assert_eq!(count.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_inside_list_autocloses_at_dedent() {
        let tokens = parse("- ::: note\n  inside\nafter");
        let close = tokens.iter().position(|t| t.kind == ContainerClose).unwrap();
        let item_close = tokens.iter().position(|t| t.kind == ListItemClose).unwrap();
        assert!(close < item_close);
        assert!(tokens[close].markup.is_empty());
    }

    #[test]
    fn test_inside_blockquote() {
        let tokens = parse("> ::: note\n> body\n> :::");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![
            BlockquoteOpen,
            ContainerOpen,
            ParagraphOpen,
            Inline,
            ParagraphClose,
            ContainerClose,
            BlockquoteClose,
        ]);
        assert_eq!(tokens[5].markup, ":::");
    }

    #[test]
    fn test_custom_marker() {
        let parser = BlockParser::new_with_options(Options {
            container: ContainerOptions::new('!', 2).unwrap(),
            ..Options::default()
        });
        let tokens = parser.parse("!! tip\nbody\n!!!");
        let pair = containers(&tokens);
        assert_eq!(pair.len(), 2);
        assert_eq!(pair[0].markup, "!!");
        assert_eq!(pair[1].markup, "!!!");
        assert!(containers(&parser.parse("::: tip\nbody\n:::")).is_empty());
    }

    #[test]
    fn test_empty_container() {
        let tokens = parse("::: empty\n:::");
        let kinds: Vec<_> = tokens.iter().map(|t| (t.kind, t.nesting)).collect();
        assert_eq!(kinds, vec![
            (ContainerOpen, Nesting::Open),
            (ContainerClose, Nesting::Close),
        ]);
    }
}
