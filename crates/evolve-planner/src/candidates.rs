//! Candidate frames
//!
//! One append-only frame per open declaration scope. Every
//! [`CandidateStack::push`] hands out a [`FrameId`] that must be returned to
//! the matching [`CandidateStack::pop`].

use evolve_catalog::Evolution;
use evolve_syntax::{SyntaxNode, SyntaxPath};

/// A viable evolution found while a scope was open
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    pub evolution: Evolution,
    pub node: &'a SyntaxNode,
    pub path: SyntaxPath,
}

/// Handle for an open frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a frame must be popped with the id its push returned"]
pub struct FrameId {
    depth: usize,
    serial: u64,
}

#[derive(Debug)]
struct Frame<'a> {
    serial: u64,
    candidates: Vec<Candidate<'a>>,
}

/// Stack of candidate frames, one per open scope
#[derive(Debug, Default)]
pub struct CandidateStack<'a> {
    frames: Vec<Frame<'a>>,
    next_serial: u64,
}

impl<'a> CandidateStack<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an empty frame
    pub fn push(&mut self) -> FrameId {
        let serial = self.next_serial;
        self.next_serial += 1;
        let id = FrameId {
            depth: self.frames.len(),
            serial,
        };
        self.frames.push(Frame {
            serial,
            candidates: Vec::new(),
        });
        id
    }

    /// Append to the innermost open frame
    ///
    /// Returns the candidate back if no frame is open.
    pub fn append(&mut self, candidate: Candidate<'a>) -> Result<(), Candidate<'a>> {
        match self.frames.last_mut() {
            Some(frame) => {
                frame.candidates.push(candidate);
                Ok(())
            }
            None => Err(candidate),
        }
    }

    /// Close the innermost frame and return its candidates
    ///
    /// # Panics
    ///
    /// If `id` is not the innermost open frame.
    pub fn pop(&mut self, id: FrameId) -> Vec<Candidate<'a>> {
        let frame = self
            .frames
            .pop()
            .unwrap_or_else(|| panic!("pop of frame {id:?} with no open frame"));
        assert!(
            id.depth == self.frames.len() && id.serial == frame.serial,
            "frame pop out of order: expected serial {}, got {id:?}",
            frame.serial
        );
        frame.candidates
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
