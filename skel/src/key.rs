use std::fmt::Display;

use skel_automaton::RuleId;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid key width of {0} bytes, expected 1, 2, 4 or 8")]
pub struct InvalidKeyWidth(pub usize);

/// Fixed-width unsigned integer used for path lengths and rule keys.
///
/// Rules are encoded as their id, except that "no rule" takes the largest
/// value of the width and the default rule takes the one below it. The width
/// is always chosen large enough that no real rule id reaches either value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyWidth {
    U8,
    U16,
    U32,
    U64,
}

impl KeyWidth {
    pub fn from_bytes(bytes: usize) -> Result<Self, InvalidKeyWidth> {
        match bytes {
            1 => Ok(KeyWidth::U8),
            2 => Ok(KeyWidth::U16),
            4 => Ok(KeyWidth::U32),
            8 => Ok(KeyWidth::U64),
            _ => Err(InvalidKeyWidth(bytes)),
        }
    }

    /// Narrowest width that can hold `max`.
    pub fn for_max(max: u64) -> Self {
        if max <= u8::MAX as u64 {
            KeyWidth::U8
        } else if max <= u16::MAX as u64 {
            KeyWidth::U16
        } else if max <= u32::MAX as u64 {
            KeyWidth::U32
        } else {
            KeyWidth::U64
        }
    }

    pub fn bytes(self) -> usize {
        match self {
            KeyWidth::U8 => 1,
            KeyWidth::U16 => 2,
            KeyWidth::U32 => 4,
            KeyWidth::U64 => 8,
        }
    }

    pub fn max_key(self) -> u64 {
        match self {
            KeyWidth::U8 => u8::MAX as u64,
            KeyWidth::U16 => u16::MAX as u64,
            KeyWidth::U32 => u32::MAX as u64,
            KeyWidth::U64 => u64::MAX,
        }
    }

    pub fn encode_rule(self, rule: Option<RuleId>, def: Option<RuleId>) -> u64 {
        let rule = match rule {
            None => return self.max_key(),
            Some(_) if rule == def => return self.max_key() - 1,
            Some(rule) => rule,
        };
        debug_assert!(
            (rule as u64) < self.max_key() - 1,
            "rule {} does not fit a {} key",
            rule,
            self
        );
        match self {
            KeyWidth::U8 => rule as u8 as u64,
            KeyWidth::U16 => rule as u16 as u64,
            KeyWidth::U32 => rule as u32 as u64,
            KeyWidth::U64 => rule as u64,
        }
    }

    pub fn decode_rule(self, key: u64, def: Option<RuleId>) -> Option<RuleId> {
        let max = self.max_key();
        if key == max {
            None
        } else if key == max - 1 {
            def
        } else {
            Some(key as RuleId)
        }
    }
}

impl TryFrom<usize> for KeyWidth {
    type Error = InvalidKeyWidth;

    fn try_from(bytes: usize) -> Result<Self, Self::Error> {
        KeyWidth::from_bytes(bytes)
    }
}

impl Display for KeyWidth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyWidth::U8 => write!(f, "u8"),
            KeyWidth::U16 => write!(f, "u16"),
            KeyWidth::U32 => write!(f, "u32"),
            KeyWidth::U64 => write!(f, "u64"),
        }
    }
}

/// Encodes `rule` in a key of `key` bytes.
///
/// Panics if `key` is not 1, 2, 4 or 8.
pub fn rule2key(rule: Option<RuleId>, key: usize, def: Option<RuleId>) -> u64 {
    match KeyWidth::from_bytes(key) {
        Ok(width) => width.encode_rule(rule, def),
        Err(e) => panic!("{}", e),
    }
}
