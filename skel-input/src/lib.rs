use std::{collections::HashMap, fmt::Display};

use skel_automaton::{
    Charset, CharsetError, Dfa, DfaError, DfaState, Rule, RuleId, StateId, Tag,
};
use thiserror::Error;

mod parser;

use parser::{Item, RawState};

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct SourcePos {
    pub line: usize,
    pub col: usize,
}

impl SourcePos {
    /// Position of `token` inside `source`. `token` must be a subslice of
    /// `source`.
    fn locate(source: &[u8], token: &[u8]) -> SourcePos {
        let offset = (token.as_ptr() as usize)
            .saturating_sub(source.as_ptr() as usize)
            .min(source.len());
        let before = &source[..offset];
        let line = before.iter().filter(|&&c| c == b'\n').count() + 1;
        let line_start = before
            .iter()
            .rposition(|&c| c == b'\n')
            .map(|i| i + 1)
            .unwrap_or(0);
        SourcePos {
            line,
            col: offset - line_start + 1,
        }
    }
}

impl Display for SourcePos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected input `{found}`")]
    Syntax { pos: SourcePos, found: String },
    #[error("missing `charset` declaration")]
    MissingCharset,
    #[error("duplicate `charset` declaration")]
    DuplicateCharset { pos: SourcePos },
    #[error("invalid charset: {error}")]
    InvalidCharset { pos: SourcePos, error: CharsetError },
    #[error("duplicate `default` declaration")]
    DuplicateDefault { pos: SourcePos },
    #[error("rule `{name}` is declared twice")]
    DuplicateRule { pos: SourcePos, name: String },
    #[error("unknown rule `{name}`")]
    UnknownRule { pos: SourcePos, name: String },
    #[error("expected state {expected}, found state {found}")]
    StateOrder {
        pos: SourcePos,
        expected: StateId,
        found: StateId,
    },
    #[error("symbol class {class} is out of range, there are {count} classes")]
    ClassOutOfRange {
        pos: SourcePos,
        class: usize,
        count: usize,
    },
    #[error("symbol class range {first}..{last} is reversed")]
    ReversedClassRange {
        pos: SourcePos,
        first: usize,
        last: usize,
    },
    #[error("state {target} does not exist, there are {count} states")]
    UnknownState {
        pos: SourcePos,
        target: StateId,
        count: usize,
    },
    #[error(transparent)]
    Automaton(#[from] DfaError),
}

impl ParseError {
    pub fn pos(&self) -> Option<SourcePos> {
        match self {
            ParseError::Syntax { pos, .. }
            | ParseError::DuplicateCharset { pos }
            | ParseError::InvalidCharset { pos, .. }
            | ParseError::DuplicateDefault { pos }
            | ParseError::DuplicateRule { pos, .. }
            | ParseError::UnknownRule { pos, .. }
            | ParseError::StateOrder { pos, .. }
            | ParseError::ClassOutOfRange { pos, .. }
            | ParseError::ReversedClassRange { pos, .. }
            | ParseError::UnknownState { pos, .. } => Some(*pos),
            ParseError::MissingCharset | ParseError::Automaton(_) => None,
        }
    }
}

/// A DFA together with its symbol classes, as read from a description file.
#[derive(Debug)]
pub struct AutomatonDescription {
    pub dfa: Dfa,
    pub charset: Charset,
    pub default_rule: Option<RuleId>,
}

fn name_of(token: &[u8]) -> String {
    String::from_utf8_lossy(token).to_string()
}

struct Builder<'src> {
    source: &'src [u8],
    charset: Option<Charset>,
    rules: Vec<Rule>,
    rule_ids: HashMap<&'src [u8], RuleId>,
    tags: Vec<Tag>,
    default_rule: Option<RuleId>,
    default_seen: bool,
}

impl<'src> Builder<'src> {
    fn pos(&self, token: &[u8]) -> SourcePos {
        SourcePos::locate(self.source, token)
    }

    fn rule(&self, token: &[u8]) -> Result<RuleId, ParseError> {
        self.rule_ids
            .get(token)
            .copied()
            .ok_or_else(|| ParseError::UnknownRule {
                pos: self.pos(token),
                name: name_of(token),
            })
    }

    fn declare(&mut self, item: &Item<'src>) -> Result<(), ParseError> {
        match item {
            Item::Charset { at, bounds } => {
                if self.charset.is_some() {
                    return Err(ParseError::DuplicateCharset { pos: self.pos(at) });
                }
                let charset = Charset::new(bounds.clone()).map_err(|error| {
                    ParseError::InvalidCharset {
                        pos: self.pos(at),
                        error,
                    }
                })?;
                self.charset = Some(charset);
            }
            Item::Rule { name } => {
                if self.rule_ids.contains_key(*name) {
                    return Err(ParseError::DuplicateRule {
                        pos: self.pos(name),
                        name: name_of(name),
                    });
                }
                self.rule_ids.insert(*name, self.rules.len());
                self.rules.push(Rule::new(&name_of(name)));
            }
            Item::Tag { name } => self.tags.push(Tag::new(&name_of(name))),
            Item::Default { .. } | Item::State(_) => {}
        }
        Ok(())
    }

    fn state(
        &self,
        raw: &RawState<'src>,
        expected: StateId,
        count: usize,
        class_count: usize,
    ) -> Result<DfaState, ParseError> {
        if raw.index != expected {
            return Err(ParseError::StateOrder {
                pos: self.pos(raw.at),
                expected,
                found: raw.index,
            });
        }
        let mut state = DfaState::new(class_count);
        if let Some((name, cmd)) = &raw.accept {
            state.accept(self.rule(name)?, cmd.clone());
        }
        for transition in &raw.transitions {
            let pos = self.pos(transition.at);
            let (first, last) = transition.classes;
            for class in [first, last] {
                if class >= class_count {
                    return Err(ParseError::ClassOutOfRange {
                        pos,
                        class,
                        count: class_count,
                    });
                }
            }
            if first > last {
                return Err(ParseError::ReversedClassRange { pos, first, last });
            }
            if let Some(target) = transition.target {
                if target >= count {
                    return Err(ParseError::UnknownState { pos, target, count });
                }
            }
            for class in first..=last {
                state.set_transition(class, transition.target, transition.cmd.clone());
            }
        }
        Ok(state)
    }
}

pub fn parse_automaton(source: &str) -> Result<AutomatonDescription, ParseError> {
    let input = source.as_bytes();
    let items = parser::parse_items(input).map_err(|rest| ParseError::Syntax {
        pos: SourcePos::locate(input, rest),
        found: parser::first_word(rest),
    })?;

    let mut builder = Builder {
        source: input,
        charset: None,
        rules: Vec::new(),
        rule_ids: HashMap::new(),
        tags: Vec::new(),
        default_rule: None,
        default_seen: false,
    };
    for item in &items {
        builder.declare(item)?;
    }
    for item in &items {
        if let Item::Default { name } = item {
            if builder.default_seen {
                return Err(ParseError::DuplicateDefault {
                    pos: builder.pos(name),
                });
            }
            builder.default_rule = Some(builder.rule(name)?);
            builder.default_seen = true;
        }
    }

    let charset = builder.charset.take().ok_or(ParseError::MissingCharset)?;
    let class_count = charset.class_count();
    let raw_states: Vec<&RawState> = items
        .iter()
        .filter_map(|item| match item {
            Item::State(raw) => Some(raw),
            _ => None,
        })
        .collect();
    let count = raw_states.len();
    let states = raw_states
        .iter()
        .enumerate()
        .map(|(expected, raw)| builder.state(raw, expected, count, class_count))
        .collect::<Result<Vec<_>, _>>()?;

    let dfa = Dfa::new(class_count, states, builder.rules, builder.tags)?;
    Ok(AutomatonDescription {
        dfa,
        charset,
        default_rule: builder.default_rule,
    })
}

#[cfg(test)]
mod tests;
