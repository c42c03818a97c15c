use std::ops::{Index, RangeInclusive};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CharsetError {
    #[error("charset has no boundaries")]
    Empty,
    #[error("charset must start at symbol 0, found {0}")]
    NonZeroStart(u32),
    #[error("charset boundary {next} does not follow {prev}")]
    NotIncreasing { prev: u32, next: u32 },
    #[error("range {start}..={end} does not continue the previous range")]
    Discontiguous { start: u32, end: u32 },
}

/// Partition of the symbol space into classes. Class `c` covers the symbols
/// `bounds[c]..bounds[c + 1]`; the last boundary is one past the largest
/// symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Charset {
    bounds: Vec<u32>,
}

impl Charset {
    pub fn new(bounds: Vec<u32>) -> Result<Self, CharsetError> {
        match bounds.first() {
            None => return Err(CharsetError::Empty),
            Some(&first) if first != 0 => return Err(CharsetError::NonZeroStart(first)),
            _ => {}
        }
        for pair in bounds.windows(2) {
            if pair[1] <= pair[0] {
                return Err(CharsetError::NotIncreasing {
                    prev: pair[0],
                    next: pair[1],
                });
            }
        }
        Ok(Charset { bounds })
    }

    /// Builds the partition from contiguous inclusive ranges, the way an
    /// alphabet is usually produced by the regex front end.
    pub fn from_ranges(ranges: &[RangeInclusive<u32>]) -> Result<Self, CharsetError> {
        let mut bounds = vec![0];
        for range in ranges {
            let expected = *bounds.last().unwrap_or(&0);
            let next = range.end().checked_add(1);
            match next {
                Some(next) if *range.start() == expected && range.start() <= range.end() => {
                    bounds.push(next)
                }
                _ => {
                    return Err(CharsetError::Discontiguous {
                        start: *range.start(),
                        end: *range.end(),
                    })
                }
            }
        }
        Charset::new(bounds)
    }

    pub fn class_count(&self) -> usize {
        self.bounds.len() - 1
    }

    pub fn bounds(&self) -> &[u32] {
        &self.bounds
    }

    pub fn class_range(&self, class: usize) -> RangeInclusive<u32> {
        RangeInclusive::new(self.bounds[class], self.bounds[class + 1] - 1)
    }

    pub fn find_class(&self, symbol: u32) -> Option<usize> {
        if symbol >= *self.bounds.last()? {
            return None;
        }
        match self.bounds.binary_search(&symbol) {
            Ok(index) => Some(index),
            Err(index) => Some(index - 1),
        }
    }
}

impl Index<usize> for Charset {
    type Output = u32;

    fn index(&self, index: usize) -> &u32 {
        &self.bounds[index]
    }
}
