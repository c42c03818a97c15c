use std::fmt::{Debug, Display};

pub type TagVersion = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TagSave {
    pub version: TagVersion,
    pub bottom: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TagCopy {
    pub lhs: TagVersion,
    pub rhs: TagVersion,
}

/// Tag bookkeeping performed when a transition is taken (or, for the final
/// slot of a state, when the automaton accepts there).
#[derive(Default, Clone, PartialEq, Eq, Hash)]
pub struct TagCommand {
    pub save: Vec<TagSave>,
    pub copy: Vec<TagCopy>,
}

impl TagCommand {
    pub fn new() -> Self {
        TagCommand::default()
    }

    pub fn save(mut self, version: TagVersion) -> Self {
        self.save.push(TagSave {
            version,
            bottom: false,
        });
        self
    }

    pub fn save_bottom(mut self, version: TagVersion) -> Self {
        self.save.push(TagSave {
            version,
            bottom: true,
        });
        self
    }

    pub fn copy(mut self, lhs: TagVersion, rhs: TagVersion) -> Self {
        self.copy.push(TagCopy { lhs, rhs });
        self
    }

    pub fn same(&self, other: &TagCommand) -> bool {
        self.save == other.save && self.copy == other.copy
    }

    pub fn is_empty(&self) -> bool {
        self.save.is_empty() && self.copy.is_empty()
    }

    pub(crate) fn versions(&self) -> impl Iterator<Item = TagVersion> + '_ {
        self.save
            .iter()
            .map(|s| s.version)
            .chain(self.copy.iter().flat_map(|c| [c.lhs, c.rhs]))
    }
}

impl Display for TagCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ops = Vec::new();
        for save in &self.save {
            if save.bottom {
                ops.push(format!("bottom {}", save.version));
            } else {
                ops.push(format!("save {}", save.version));
            }
        }
        for copy in &self.copy {
            ops.push(format!("copy {}={}", copy.lhs, copy.rhs));
        }
        write!(f, "{{{}}}", ops.join(", "))
    }
}

impl Debug for TagCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}
