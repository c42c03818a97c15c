use std::{
    collections::BTreeMap,
    fmt::{Debug, Display},
    ops::RangeInclusive,
};

use skel_automaton::{Charset, DfaState, RuleId, TagCommand};

pub type NodeId = usize;

/// A run of symbols `[lower, upper]` that lead to the same destination with
/// the same tag command.
#[derive(Clone, Copy)]
pub struct Range<'dfa> {
    pub lower: u32,
    pub upper: u32,
    pub cmd: &'dfa TagCommand,
}

impl<'dfa> Range<'dfa> {
    pub fn symbols(&self) -> RangeInclusive<u32> {
        RangeInclusive::new(self.lower, self.upper)
    }
}

pub(crate) fn fmt_symbol(symbol: u32) -> String {
    match char::from_u32(symbol) {
        Some(ch) if ch.is_ascii_graphic() && ch != '\'' && ch != '\\' => format!("'{}'", ch),
        _ => format!("0x{:02x}", symbol),
    }
}

impl<'dfa> Display for Range<'dfa> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.lower == self.upper {
            write!(f, "[{}]", fmt_symbol(self.lower))?;
        } else {
            write!(
                f,
                "[{}-{}]",
                fmt_symbol(self.lower),
                fmt_symbol(self.upper)
            )?;
        }
        if !self.cmd.is_empty() {
            write!(f, " {}", self.cmd)?;
        }
        Ok(())
    }
}

impl<'dfa> Debug for Range<'dfa> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

#[derive(Debug)]
pub struct Node<'dfa> {
    arcs: BTreeMap<NodeId, Vec<Range<'dfa>>>,
    rule: Option<RuleId>,
    cmd: Option<&'dfa TagCommand>,
    default: bool,
}

impl<'dfa> Node<'dfa> {
    /// The sink every missing transition leads to. It has no arcs, no rule
    /// and no command.
    pub fn default_node() -> Self {
        Node {
            arcs: BTreeMap::new(),
            rule: None,
            cmd: None,
            default: true,
        }
    }

    /// Compresses the per-class tables of `state` into ranges. Missing
    /// transitions go to `nil`; a state whose every class goes to `nil` with
    /// the same command gets no arcs at all.
    pub fn from_state(state: &'dfa DfaState, charset: &Charset, nil: NodeId) -> Self {
        let nc = charset.class_count();
        let mut arcs: BTreeMap<NodeId, Vec<Range<'dfa>>> = BTreeMap::new();

        let mut c = 0;
        let mut lower = 0;
        while c < nc {
            let target = state.arcs[c];
            let cmd = &state.tcmd[c];
            c += 1;
            while c < nc && state.arcs[c] == target && state.tcmd[c].same(cmd) {
                c += 1;
            }
            let target = target.unwrap_or(nil);

            // everything falls through to the default node
            if lower == 0 && c == nc && target == nil {
                break;
            }

            let upper = charset[c];
            arcs.entry(target).or_default().push(Range {
                lower,
                upper: upper - 1,
                cmd,
            });
            lower = upper;
        }

        Node {
            arcs,
            rule: state.rule,
            cmd: Some(&state.tcmd[nc]),
            default: false,
        }
    }

    pub fn arcs(&self) -> &BTreeMap<NodeId, Vec<Range<'dfa>>> {
        &self.arcs
    }

    pub fn rule(&self) -> Option<RuleId> {
        self.rule
    }

    /// The command fired when the automaton accepts in this node.
    pub fn cmd(&self) -> Option<&'dfa TagCommand> {
        self.rule.and(self.cmd)
    }

    pub fn end(&self) -> bool {
        self.arcs.is_empty()
    }

    pub fn is_default(&self) -> bool {
        self.default
    }
}
