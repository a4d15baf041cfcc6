//! Resource (chopstick) model
//!
//! A binary shared unit that two neighbouring actors both need. There is
//! no owner field: mutual exclusion follows from the actor checking
//! `is_free` on both sides before acquiring, inside a single sequential
//! handler.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Contract violations on a resource
///
/// Either one means an actor handler is broken; the simulation treats
/// both as fatal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResourceError {
    #[error("Resource {index} acquired while already held")]
    AlreadyHeld { index: usize },

    #[error("Resource {index} released while free")]
    NotHeld { index: usize },
}

/// A free/held binary resource
///
/// # Example
/// ```
/// use dining_sim_core_rs::Resource;
///
/// let mut fork = Resource::new(0);
/// assert!(fork.is_free());
///
/// fork.acquire().unwrap();
/// assert!(!fork.is_free());
/// assert!(fork.acquire().is_err());
///
/// fork.release().unwrap();
/// assert!(fork.is_free());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Position in the ring
    index: usize,

    is_free: bool,
}

impl Resource {
    /// Create a free resource at ring position `index`
    pub fn new(index: usize) -> Self {
        Self {
            index,
            is_free: true,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_free(&self) -> bool {
        self.is_free
    }

    /// Transition free → held
    pub fn acquire(&mut self) -> Result<(), ResourceError> {
        if !self.is_free {
            return Err(ResourceError::AlreadyHeld { index: self.index });
        }
        self.is_free = false;
        Ok(())
    }

    /// Transition held → free
    pub fn release(&mut self) -> Result<(), ResourceError> {
        if self.is_free {
            return Err(ResourceError::NotHeld { index: self.index });
        }
        self.is_free = true;
        Ok(())
    }
}
