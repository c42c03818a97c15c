use std::fmt::Display;

use petgraph::{algo::is_cyclic_directed, dot::Dot, graph::NodeIndex, prelude::DiGraph};

use crate::{node::fmt_symbol, KeyWidth, Range, Skeleton};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeLabel {
    State { index: usize, rule: Option<String> },
    Default,
}

impl Display for NodeLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeLabel::State { index, rule: None } => write!(f, "{}", index),
            NodeLabel::State {
                index,
                rule: Some(rule),
            } => write!(f, "{} ({})", index, rule),
            NodeLabel::Default => write!(f, "default"),
        }
    }
}

/// All symbol ranges between one source and one destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArcLabel {
    pub ranges: Vec<(u32, u32)>,
    pub tagged: bool,
}

impl ArcLabel {
    fn new(ranges: &[Range]) -> Self {
        ArcLabel {
            ranges: ranges.iter().map(|r| (r.lower, r.upper)).collect(),
            tagged: ranges.iter().any(|r| !r.cmd.is_empty()),
        }
    }
}

impl Display for ArcLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ranges: Vec<String> = self
            .ranges
            .iter()
            .map(|(lower, upper)| {
                if lower == upper {
                    fmt_symbol(*lower)
                } else {
                    format!("{}-{}", fmt_symbol(*lower), fmt_symbol(*upper))
                }
            })
            .collect();
        write!(f, "[{}]", ranges.join(" "))?;
        if self.tagged {
            write!(f, " /t")?;
        }
        Ok(())
    }
}

pub type SkeletonGraph = DiGraph<NodeLabel, ArcLabel>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkeletonStats {
    pub nodes: usize,
    pub leaves: usize,
    pub arcs: usize,
    pub ranges: usize,
    pub maxpath: u32,
    pub cyclic: bool,
    pub sizeof_key: KeyWidth,
}

impl Display for SkeletonStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "nodes:     {} ({} leaves)", self.nodes, self.leaves)?;
        writeln!(f, "arcs:      {} ({} ranges)", self.arcs, self.ranges)?;
        writeln!(
            f,
            "max path:  {}{}",
            self.maxpath,
            if self.cyclic { " (cyclic)" } else { "" }
        )?;
        write!(
            f,
            "key:       {} ({} bytes)",
            self.sizeof_key,
            self.sizeof_key.bytes()
        )
    }
}

impl<'dfa> Skeleton<'dfa> {
    /// The skeleton as a petgraph graph. Node indices match skeleton node
    /// indices.
    pub fn graph(&self) -> SkeletonGraph {
        let mut graph = DiGraph::with_capacity(self.nodes().len(), 0);
        for (index, node) in self.nodes().iter().enumerate() {
            let label = if node.is_default() {
                NodeLabel::Default
            } else {
                NodeLabel::State {
                    index,
                    rule: node.rule().map(|r| self.rule_name(r).to_string()),
                }
            };
            graph.add_node(label);
        }
        for (index, node) in self.nodes().iter().enumerate() {
            for (dest, ranges) in node.arcs() {
                graph.add_edge(
                    NodeIndex::new(index),
                    NodeIndex::new(*dest),
                    ArcLabel::new(ranges),
                );
            }
        }
        graph
    }

    pub fn dot(&self) -> String {
        let graph = self.graph();
        format!("{}", Dot::with_config(&graph, &[]))
    }

    pub fn stats(&self) -> SkeletonStats {
        let nodes = self.nodes();
        SkeletonStats {
            nodes: nodes.len(),
            leaves: nodes.iter().filter(|n| n.end()).count(),
            arcs: nodes.iter().map(|n| n.arcs().len()).sum(),
            ranges: nodes
                .iter()
                .flat_map(|n| n.arcs().values())
                .map(|ranges| ranges.len())
                .sum(),
            maxpath: self.maxpath(),
            cyclic: is_cyclic_directed(&self.graph()),
            sizeof_key: self.sizeof_key(),
        }
    }
}
