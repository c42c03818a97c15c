use thiserror::Error;

mod charset;
mod command;

pub use charset::{Charset, CharsetError};
pub use command::{TagCommand, TagCopy, TagSave, TagVersion};

pub type StateId = usize;
pub type RuleId = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub name: String,
}

impl Rule {
    pub fn new(name: &str) -> Self {
        Rule {
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
}

impl Tag {
    pub fn new(name: &str) -> Self {
        Tag {
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DfaError {
    #[error("state {state} has {found} transitions, expected one per symbol class ({expected})")]
    TransitionTableSize {
        state: StateId,
        expected: usize,
        found: usize,
    },
    #[error("state {state} has {found} tag commands, expected {expected}")]
    CommandTableSize {
        state: StateId,
        expected: usize,
        found: usize,
    },
    #[error("state {state} transitions to state {target} on class {class}, but there are only {count} states")]
    TargetOutOfRange {
        state: StateId,
        class: usize,
        target: StateId,
        count: usize,
    },
    #[error("state {state} accepts rule {rule}, but there are only {count} rules")]
    RuleOutOfRange {
        state: StateId,
        rule: RuleId,
        count: usize,
    },
}

/// One automaton state as dense per-class tables. `arcs[c]` is `None` when
/// there is no transition on class `c`. `tcmd` has one extra slot at the
/// end, fired when the automaton accepts in this state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DfaState {
    pub arcs: Vec<Option<StateId>>,
    pub tcmd: Vec<TagCommand>,
    pub rule: Option<RuleId>,
}

impl DfaState {
    pub fn new(class_count: usize) -> Self {
        DfaState {
            arcs: vec![None; class_count],
            tcmd: vec![TagCommand::default(); class_count + 1],
            rule: None,
        }
    }

    pub fn set_transition(&mut self, class: usize, target: Option<StateId>, cmd: TagCommand) {
        self.arcs[class] = target;
        self.tcmd[class] = cmd;
    }

    pub fn accept(&mut self, rule: RuleId, cmd: TagCommand) {
        self.rule = Some(rule);
        let last = self.tcmd.len() - 1;
        self.tcmd[last] = cmd;
    }

    pub fn final_command(&self) -> &TagCommand {
        &self.tcmd[self.tcmd.len() - 1]
    }
}

#[derive(Debug)]
pub struct Dfa {
    class_count: usize,
    pub states: Vec<DfaState>,
    pub rules: Vec<Rule>,
    pub tags: Vec<Tag>,
    pub maxtagver: TagVersion,
}

impl Dfa {
    pub fn new(
        class_count: usize,
        states: Vec<DfaState>,
        rules: Vec<Rule>,
        tags: Vec<Tag>,
    ) -> Result<Self, DfaError> {
        let mut maxtagver = tags.len() as TagVersion;
        for (index, state) in states.iter().enumerate() {
            if state.arcs.len() != class_count {
                return Err(DfaError::TransitionTableSize {
                    state: index,
                    expected: class_count,
                    found: state.arcs.len(),
                });
            }
            if state.tcmd.len() != class_count + 1 {
                return Err(DfaError::CommandTableSize {
                    state: index,
                    expected: class_count + 1,
                    found: state.tcmd.len(),
                });
            }
            for (class, target) in state.arcs.iter().enumerate() {
                if let Some(target) = *target {
                    if target >= states.len() {
                        return Err(DfaError::TargetOutOfRange {
                            state: index,
                            class,
                            target,
                            count: states.len(),
                        });
                    }
                }
            }
            if let Some(rule) = state.rule {
                if rule >= rules.len() {
                    return Err(DfaError::RuleOutOfRange {
                        state: index,
                        rule,
                        count: rules.len(),
                    });
                }
            }
            let versions = state.tcmd.iter().flat_map(|cmd| cmd.versions());
            maxtagver = versions.fold(maxtagver, TagVersion::max);
        }
        Ok(Dfa {
            class_count,
            states,
            rules,
            tags,
            maxtagver,
        })
    }

    pub fn class_count(&self) -> usize {
        self.class_count
    }
}
