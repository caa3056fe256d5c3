//! Scoped composition state: locks and undo blocks released on drop.

use crate::{foundation::error::FuResult, objects::composition::Composition};

/// Undo block name used when none is given.
pub const DEFAULT_UNDO_NAME: &str = "Script CMD";

/// Keeps a composition locked (non-interactive) while alive.
#[must_use = "the composition is unlocked as soon as the guard is dropped"]
#[derive(Debug)]
pub struct CompLock<'a> {
    comp: &'a Composition,
}

impl<'a> CompLock<'a> {
    pub fn new(comp: &'a Composition) -> FuResult<Self> {
        comp.lock()?;
        Ok(Self { comp })
    }
}

impl Drop for CompLock<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.comp.unlock() {
            tracing::warn!(error = %e, "failed to unlock composition");
        }
    }
}

/// Collects every change made while alive into one undo event.
#[must_use = "the undo block is closed as soon as the guard is dropped"]
#[derive(Debug)]
pub struct UndoChunk<'a> {
    comp: &'a Composition,
    keep: bool,
}

impl<'a> UndoChunk<'a> {
    pub fn new(comp: &'a Composition, name: &str) -> FuResult<Self> {
        comp.start_undo(name)?;
        Ok(Self { comp, keep: true })
    }

    /// Undo block named [`DEFAULT_UNDO_NAME`].
    pub fn with_default_name(comp: &'a Composition) -> FuResult<Self> {
        Self::new(comp, DEFAULT_UNDO_NAME)
    }

    /// Close the block without recording an undo event.
    pub fn discard(mut self) {
        self.keep = false;
    }
}

impl Drop for UndoChunk<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.comp.end_undo(self.keep) {
            tracing::warn!(error = %e, keep = self.keep, "failed to close undo block");
        }
    }
}

/// Lock plus undo block; the undo block closes before the lock is released.
#[must_use = "the composition is unlocked as soon as the guard is dropped"]
#[derive(Debug)]
pub struct LockAndUndo<'a> {
    // Field order is drop order: undo first, then lock.
    undo: UndoChunk<'a>,
    _lock: CompLock<'a>,
}

impl<'a> LockAndUndo<'a> {
    pub fn new(comp: &'a Composition, undo_name: &str) -> FuResult<Self> {
        let lock = CompLock::new(comp)?;
        let undo = UndoChunk::new(comp, undo_name)?;
        Ok(Self { undo, _lock: lock })
    }

    pub fn with_default_name(comp: &'a Composition) -> FuResult<Self> {
        Self::new(comp, DEFAULT_UNDO_NAME)
    }

    /// Drop the captured changes from the undo history; the lock is still released.
    pub fn discard(mut self) {
        self.undo.keep = false;
    }
}
