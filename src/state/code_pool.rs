use std::collections::HashSet;

use crate::error::{Result, SignupError};

/// Ordered set of activation codes with a cursor marking the next unissued one.
///
/// The cursor only ever moves forward: a code counts as issued the moment
/// [`CodePool::allocate`] returns it, whatever happens to the registration
/// afterwards.
#[derive(Debug, Clone)]
pub struct CodePool {
    codes: Vec<String>,
    cursor: usize,
}

impl CodePool {
    /// Build a pool, rejecting empty or repeated codes.
    pub fn new(codes: Vec<String>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(codes.len());
        for (index, code) in codes.iter().enumerate() {
            if code.is_empty() {
                return Err(SignupError::ConfigValidation {
                    message: format!("key pool entry {} is empty", index),
                });
            }
            if !seen.insert(code.as_str()) {
                return Err(SignupError::ConfigValidation {
                    message: format!("key pool contains duplicate key at entry {}", index),
                });
            }
        }

        Ok(Self { codes, cursor: 0 })
    }

    /// Hand out the next code, or `None` once the pool is used up.
    pub fn allocate(&mut self) -> Option<String> {
        let code = self.codes.get(self.cursor)?.clone();
        self.cursor += 1;
        Some(code)
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.codes.len()
    }

    pub fn issued(&self) -> usize {
        self.cursor
    }

    pub fn remaining(&self) -> usize {
        self.codes.len() - self.cursor
    }
}
