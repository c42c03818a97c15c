use std::fmt::Display;

use log::{debug, trace, warn};
use skel_automaton::{Charset, Dfa, Rule, RuleId, Tag};
use thiserror::Error;

mod graph;
mod key;
mod maxpath;
mod node;

pub use graph::{ArcLabel, NodeLabel, SkeletonGraph, SkeletonStats};
pub use key::{rule2key, InvalidKeyWidth, KeyWidth};
pub use maxpath::maxpath;
pub use node::{Node, NodeId, Range};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SkeletonError {
    #[error("DFA path {}is too long", incond(.cond))]
    PathTooLong { cond: String },
    #[error("DFA has {dfa} symbol classes, but the charset has {charset}")]
    ClassCountMismatch { dfa: usize, charset: usize },
}

fn incond(cond: &str) -> String {
    if cond.is_empty() {
        String::new()
    } else {
        format!("for condition '{}' ", cond)
    }
}

/// Compressed view of a DFA used for path enumeration. Node `i` corresponds
/// to DFA state `i`; the last node is the default node that missing
/// transitions lead to.
///
/// The skeleton borrows rules, tags and tag commands from the DFA it was
/// built from.
#[derive(Debug)]
pub struct Skeleton<'dfa> {
    pub name: String,
    pub cond: String,
    pub line: u32,
    nodes: Vec<Node<'dfa>>,
    sizeof_key: KeyWidth,
    maxpath: u32,
    pub defrule: Option<RuleId>,
    pub ntagver: usize,
    pub rules: &'dfa [Rule],
    pub tags: &'dfa [Tag],
}

impl<'dfa> Skeleton<'dfa> {
    pub fn new(
        dfa: &'dfa Dfa,
        charset: &Charset,
        defrule: Option<RuleId>,
        name: &str,
        cond: &str,
        line: u32,
    ) -> Result<Self, SkeletonError> {
        if dfa.class_count() != charset.class_count() {
            return Err(SkeletonError::ClassCountMismatch {
                dfa: dfa.class_count(),
                charset: charset.class_count(),
            });
        }

        let nil = dfa.states.len();
        let mut nodes: Vec<Node> = Vec::with_capacity(nil + 1);
        for (i, state) in dfa.states.iter().enumerate() {
            let node = Node::from_state(state, charset, nil);
            trace!(
                "node {}: {} destinations, rule {:?}",
                i,
                node.arcs().len(),
                node.rule()
            );
            nodes.push(node);
        }
        nodes.push(Node::default_node());

        let mut skeleton = Skeleton {
            name: name.to_string(),
            cond: cond.to_string(),
            line,
            nodes,
            sizeof_key: KeyWidth::U64,
            maxpath: 0,
            defrule,
            ntagver: dfa.maxtagver as usize + 1,
            rules: &dfa.rules,
            tags: &dfa.tags,
        };

        let maxlen = maxpath(&skeleton)?;
        // one more for the "no rule" key
        let maxrule = dfa.rules.len() as u64 + 1;
        let max = u64::from(maxlen).max(maxrule);
        skeleton.maxpath = maxlen;
        skeleton.sizeof_key = KeyWidth::for_max(max);
        if skeleton.sizeof_key == KeyWidth::U64 {
            warn!(
                "skeleton '{}' needs 8-byte keys ({} rules)",
                skeleton.name,
                dfa.rules.len()
            );
        }
        debug!(
            "built skeleton '{}' with {} nodes, longest path {}, {} rules, key {}",
            skeleton.name,
            skeleton.nodes.len(),
            maxlen,
            dfa.rules.len(),
            skeleton.sizeof_key
        );
        Ok(skeleton)
    }

    pub fn nodes(&self) -> &[Node<'dfa>] {
        &self.nodes
    }

    pub fn node(&self, index: NodeId) -> &Node<'dfa> {
        &self.nodes[index]
    }

    /// Index of the default node.
    pub fn nil(&self) -> NodeId {
        self.nodes.len() - 1
    }

    pub fn default_node(&self) -> &Node<'dfa> {
        &self.nodes[self.nil()]
    }

    pub fn sizeof_key(&self) -> KeyWidth {
        self.sizeof_key
    }

    pub fn maxpath(&self) -> u32 {
        self.maxpath
    }

    pub fn rule2key(&self, rule: Option<RuleId>) -> u64 {
        self.sizeof_key.encode_rule(rule, self.defrule)
    }

    fn rule_name(&self, rule: RuleId) -> &str {
        self.rules
            .get(rule)
            .map(|r| r.name.as_str())
            .unwrap_or("?")
    }
}

impl<'dfa> Display for Skeleton<'dfa> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let nil = self.nil();
        for (i, node) in self.nodes.iter().enumerate() {
            if node.is_default() {
                writeln!(f, "{}: default", i)?;
                continue;
            }
            write!(f, "{}:", i)?;
            if let Some(rule) = node.rule() {
                write!(f, " accept {}", self.rule_name(rule))?;
                if let Some(cmd) = node.cmd().filter(|cmd| !cmd.is_empty()) {
                    write!(f, " {}", cmd)?;
                }
            }
            writeln!(f)?;
            for (dest, ranges) in node.arcs() {
                let ranges: Vec<String> = ranges.iter().map(|r| r.to_string()).collect();
                if *dest == nil {
                    writeln!(f, "    -> default {}", ranges.join(" "))?;
                } else {
                    writeln!(f, "    -> {} {}", dest, ranges.join(" "))?;
                }
            }
        }
        Ok(())
    }
}
