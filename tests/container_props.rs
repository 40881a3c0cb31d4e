use fencemark::block::Attrs;
use fencemark::container::{self, ParamKind};
use fencemark::{parse, to_html, TokenKind};
use proptest::prelude::*;

fn arb_name() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z_\u{C0}-\u{D6}\u{4E00}-\u{9FFF}][a-zA-Z0-9_\\-\u{4E00}-\u{9FFF}]{0,8}")
        .unwrap()
}

fn arb_attr() -> impl Strategy<Value = String> {
    prop_oneof![
        arb_name().prop_map(|n| format!(".{n}")),
        arb_name().prop_map(|n| format!("#{n}")),
        (arb_name(), "[a-z =&]{0,6}").prop_map(|(n, v)| format!("{n}=\"{v}\"")),
    ]
}

fn arb_params() -> impl Strategy<Value = String> {
    prop_oneof![
        arb_name().prop_map(|n| format!(" {n}")),
        prop::collection::vec(arb_attr(), 1..5).prop_map(|a| format!(" {{{}}}", a.join(" "))),
        "[ -~]{0,20}".prop_filter("must not extend the marker run", |s| !s.starts_with(':')),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A closing run at least as long as the opening run closes the block.
    #[test]
    fn prop_longer_closing_run_closes(k in 3usize..10, extra in 0usize..5) {
        let input = format!("{} box\nbody\n{}\nafter", ":".repeat(k), ":".repeat(k + extra));
        let tokens = parse(&input);
        let close = tokens.iter().find(|t| t.kind == TokenKind::ContainerClose);
        prop_assert_eq!(close.map(|t| t.markup.len()), Some(k + extra));
        prop_assert!(to_html(&input).ends_with("</div>\n<p>after</p>\n"));
    }

    /// A shorter closing run is interior content and the block autocloses.
    #[test]
    fn prop_shorter_closing_run_ignored(k in 4usize..10, short in 3usize..4) {
        let input = format!("{} box\n{}", ":".repeat(k), ":".repeat(short));
        let tokens = parse(&input);
        let close = tokens.iter().find(|t| t.kind == TokenKind::ContainerClose);
        prop_assert_eq!(close.map(|t| t.markup.as_str()), Some(""));
    }

    /// Bare names always become exactly one class.
    #[test]
    fn prop_bare_name_is_class(name in arb_name()) {
        let params = format!(" {name}");
        prop_assert_eq!(container::classify(&params, ':'), Some(ParamKind::Name));
        let mut attrs = Attrs::new();
        container::apply(&params, ':', &mut attrs);
        let pairs: Vec<_> = attrs.iter().collect();
        prop_assert_eq!(pairs, vec![("class", name.as_str())]);
    }

    /// Whatever validates produces a container; anything else does not.
    #[test]
    fn prop_validate_matches_recognition(params in arb_params()) {
        let input = format!(":::{params}\nx\n:::");
        let opened = parse(&input).iter().any(|t| t.kind == TokenKind::ContainerOpen);
        prop_assert_eq!(opened, container::validate(&params, ':'));
    }

    /// Generated attribute lists validate and apply one attribute per item.
    #[test]
    fn prop_attribute_list_round_trip(attrs in prop::collection::vec(arb_attr(), 1..5)) {
        let params = format!(" {{{}}}", attrs.join(" "));
        prop_assert_eq!(container::classify(&params, ':'), Some(ParamKind::AttributeList));
        prop_assert_eq!(container::attributes(&params).count(), attrs.len());
    }

    /// Arbitrary input never panics and keeps open/close tokens balanced.
    #[test]
    fn prop_no_panic_and_balanced(input in "[:{}#.=\"a-z \n>\\-*`]{0,80}") {
        let tokens = parse(&input);
        let opens = tokens.iter().filter(|t| t.kind == TokenKind::ContainerOpen).count();
        let closes = tokens.iter().filter(|t| t.kind == TokenKind::ContainerClose).count();
        prop_assert_eq!(opens, closes);
        let _ = to_html(&input);
    }
}
