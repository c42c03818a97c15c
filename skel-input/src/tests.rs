use skel::{KeyWidth, Skeleton};
use skel_automaton::{CharsetError, DfaError, TagCommand};

use crate::{parse_automaton, ParseError, SourcePos};

const IDENTIFIER: &str = r#"
# [a-z] to an accepting state
charset 0 97 123 256
rule ident

state 0
  1 -> 1
state 1 accept ident
"#;

#[test]
fn test_parse_identifier() {
    let desc = parse_automaton(IDENTIFIER).unwrap();
    assert_eq!(desc.charset.bounds(), &[0, 97, 123, 256]);
    assert_eq!(desc.default_rule, None);
    assert_eq!(desc.dfa.rules.len(), 1);
    assert_eq!(desc.dfa.rules[0].name, "ident");
    assert_eq!(desc.dfa.states.len(), 2);
    assert_eq!(desc.dfa.states[0].arcs, vec![None, Some(1), None]);
    assert_eq!(desc.dfa.states[0].rule, None);
    assert_eq!(desc.dfa.states[1].arcs, vec![None, None, None]);
    assert_eq!(desc.dfa.states[1].rule, Some(0));
}

#[test]
fn test_parse_commands() {
    let source = r#"
charset 0 10 20 30
rule a
rule b
tag x
tag y
default b
state 0
  0..1 -> 1 {save 3, copy 4 = 3}
  2 -> none {bottom 5}
state 1 accept a {copy 6=4}
"#;
    let desc = parse_automaton(source).unwrap();
    assert_eq!(desc.default_rule, Some(1));
    assert_eq!(desc.dfa.tags.len(), 2);
    assert_eq!(desc.dfa.maxtagver, 6);

    let start = &desc.dfa.states[0];
    assert_eq!(start.arcs, vec![Some(1), Some(1), None]);
    let expected = TagCommand::new().save(3).copy(4, 3);
    assert_eq!(start.tcmd[0], expected);
    assert_eq!(start.tcmd[1], expected);
    assert_eq!(start.tcmd[2], TagCommand::new().save_bottom(5));
    assert!(start.final_command().is_empty());

    let accept = &desc.dfa.states[1];
    assert_eq!(accept.final_command(), &TagCommand::new().copy(6, 4));
}

#[test]
fn test_skeleton_from_description() {
    let desc = parse_automaton(IDENTIFIER).unwrap();
    let skeleton = Skeleton::new(
        &desc.dfa,
        &desc.charset,
        desc.default_rule,
        "ident",
        "",
        1,
    )
    .unwrap();
    assert_eq!(skeleton.nodes().len(), 3);
    assert_eq!(skeleton.node(0).arcs()[&1].len(), 1);
    assert!(skeleton.node(1).end());
    assert_eq!(skeleton.sizeof_key(), KeyWidth::U8);
}

#[test]
fn test_syntax_error() {
    let source = "charset 0 256\nrule r\nstate 0\n  0 -> x\n";
    let error = parse_automaton(source).unwrap_err();
    assert_eq!(
        error,
        ParseError::Syntax {
            pos: SourcePos { line: 4, col: 3 },
            found: "0".to_string()
        }
    );
    assert_eq!(error.pos(), Some(SourcePos { line: 4, col: 3 }));
}

#[test]
fn test_missing_charset() {
    let error = parse_automaton("rule r\nstate 0\n").unwrap_err();
    assert_eq!(error, ParseError::MissingCharset);
    assert_eq!(error.pos(), None);
}

#[test]
fn test_invalid_charset() {
    let error = parse_automaton("charset 0 20 10\n").unwrap_err();
    assert_eq!(
        error,
        ParseError::InvalidCharset {
            pos: SourcePos { line: 1, col: 1 },
            error: CharsetError::NotIncreasing { prev: 20, next: 10 }
        }
    );
    let error = parse_automaton("charset 0 256\ncharset 0 10 256\n").unwrap_err();
    assert_eq!(
        error,
        ParseError::DuplicateCharset {
            pos: SourcePos { line: 2, col: 1 }
        }
    );
}

#[test]
fn test_unknown_rule() {
    let error = parse_automaton("charset 0 256\nstate 0 accept nope\n").unwrap_err();
    assert_eq!(
        error,
        ParseError::UnknownRule {
            pos: SourcePos { line: 2, col: 16 },
            name: "nope".to_string()
        }
    );
}

#[test]
fn test_duplicates() {
    let error = parse_automaton("charset 0 256\nrule r\nrule r\n").unwrap_err();
    assert!(matches!(error, ParseError::DuplicateRule { .. }));
    let error = parse_automaton("charset 0 256\nrule r\ndefault r\ndefault r\n").unwrap_err();
    assert_eq!(
        error,
        ParseError::DuplicateDefault {
            pos: SourcePos { line: 4, col: 9 }
        }
    );
}

#[test]
fn test_state_order() {
    let error = parse_automaton("charset 0 256\nstate 0\nstate 2\n").unwrap_err();
    assert_eq!(
        error,
        ParseError::StateOrder {
            pos: SourcePos { line: 3, col: 7 },
            expected: 1,
            found: 2
        }
    );
}

#[test]
fn test_transition_ranges() {
    let error = parse_automaton("charset 0 10 256\nstate 0\n  0..2 -> 0\n").unwrap_err();
    assert_eq!(
        error,
        ParseError::ClassOutOfRange {
            pos: SourcePos { line: 3, col: 3 },
            class: 2,
            count: 2
        }
    );
    let error = parse_automaton("charset 0 10 256\nstate 0\n  1 -> 3\n").unwrap_err();
    assert_eq!(
        error,
        ParseError::UnknownState {
            pos: SourcePos { line: 3, col: 3 },
            target: 3,
            count: 1
        }
    );
}

#[test]
fn test_reversed_class_range() {
    let error = parse_automaton("charset 0 10 20 256\nstate 0\n  2..0 -> 0\n").unwrap_err();
    assert_eq!(
        error,
        ParseError::ReversedClassRange {
            pos: SourcePos { line: 3, col: 3 },
            first: 2,
            last: 0
        }
    );
    assert_eq!(error.pos(), Some(SourcePos { line: 3, col: 3 }));
}

#[test]
fn test_automaton_error_passthrough() {
    let error: ParseError = DfaError::RuleOutOfRange {
        state: 0,
        rule: 1,
        count: 1,
    }
    .into();
    assert_eq!(error.pos(), None);
    assert_eq!(
        error.to_string(),
        "state 0 accepts rule 1, but there are only 1 rules"
    );
}

#[test]
fn test_keywords_demo() {
    let desc = parse_automaton(include_str!("../../demos/keywords.skel")).unwrap();
    assert_eq!(desc.charset.class_count(), 9);
    assert_eq!(desc.default_rule, Some(1));

    let skeleton = Skeleton::new(
        &desc.dfa,
        &desc.charset,
        desc.default_rule,
        "keywords",
        "",
        1,
    )
    .unwrap();
    assert_eq!(skeleton.nodes().len(), 6);
    assert_eq!(skeleton.ntagver, 4);
    assert_eq!(skeleton.maxpath(), 7);
    assert_eq!(skeleton.sizeof_key(), KeyWidth::U8);

    let start = skeleton.node(0);
    let to_ident: Vec<_> = start.arcs()[&2].iter().map(|r| r.symbols()).collect();
    assert_eq!(to_ident, vec![97..=104, 106..=122]);
    assert_eq!(start.arcs()[&1][0].symbols(), 105..=105);

    let digits = &skeleton.node(1).arcs()[&4];
    assert_eq!(digits[0].symbols(), 48..=57);
    assert_eq!(digits[0].cmd, &TagCommand::new().save(2));
    assert_eq!(skeleton.node(3).rule(), Some(0));
    assert_eq!(
        skeleton.node(4).cmd(),
        Some(&TagCommand::new().copy(3, 2))
    );

    let stats = skeleton.stats();
    assert_eq!(stats.leaves, 1);
    assert!(stats.cyclic);
}
