//! Editor windows
//!
//! An [`EditorWindow`] is one pane of the split tree. It shows one of its
//! own buffers at a time and carries the processor pipeline the renderer
//! runs over that buffer.

use std::collections::HashMap;

use crate::buffer::{BufferId, BufferManager};
use crate::error::SnoError;

pub mod processor;

pub use processor::{compose, default_processors, Processor};

/// Unique identifier for windows
pub type WindowId = u64;

#[derive(Debug, Clone)]
pub struct EditorWindow {
    id: WindowId,
    /// Buffers in the order they were added to this window
    buffers: Vec<BufferId>,
    active: usize,
    /// Cursor line per buffer, restored when switching back
    cursors: HashMap<BufferId, usize>,
    local: Vec<Processor>,
    processors: Vec<Processor>,
}

impl EditorWindow {
    /// Window showing `buffer`, with diagnostics highlighting layered
    /// under `defaults`
    pub fn new(id: WindowId, buffer: BufferId, defaults: &[Processor]) -> Self {
        Self::with_processors(id, buffer, &[Processor::LspDiagnostics], defaults)
    }

    pub fn with_processors(
        id: WindowId,
        buffer: BufferId,
        local: &[Processor],
        defaults: &[Processor],
    ) -> Self {
        Self {
            id,
            buffers: vec![buffer],
            active: 0,
            cursors: HashMap::new(),
            local: local.to_vec(),
            processors: compose(local, defaults),
        }
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn processors(&self) -> &[Processor] {
        &self.processors
    }

    /// Replace the default part of the pipeline, keeping window-local
    /// processors in front. Used after `:set` changes a default.
    pub fn refresh_processors(&mut self, defaults: &[Processor]) {
        self.processors = compose(&self.local, defaults);
    }

    // ============================================================
    // Buffers
    // ============================================================

    /// Append `buffer` to this window's list. A buffer already in the list
    /// is not added twice. Returns its index.
    pub fn add_buffer(&mut self, buffer: BufferId) -> usize {
        match self.index_of(buffer) {
            Some(index) => index,
            None => {
                self.buffers.push(buffer);
                self.buffers.len() - 1
            }
        }
    }

    /// Make `buffer` the active one. It must already be in this window.
    pub fn switch_to_buffer(&mut self, buffer: BufferId) -> Result<(), SnoError> {
        let index = self.index_of(buffer).ok_or_else(|| {
            SnoError::invalid_window_op(format!(
                "buffer {buffer} is not shown in window {}",
                self.id
            ))
        })?;
        self.active = index;
        Ok(())
    }

    /// Select by 0-based position. `None` when out of range.
    pub fn select_buffer_by_index(&mut self, index: usize) -> Option<BufferId> {
        let buffer = *self.buffers.get(index)?;
        self.active = index;
        Some(buffer)
    }

    /// Select the first buffer whose short name, or failing that whose
    /// full name, equals `name`
    pub fn select_buffer_by_name(&mut self, name: &str, buffers: &BufferManager) -> Option<BufferId> {
        let named = |short: bool| {
            self.buffers.iter().position(|&id| {
                buffers
                    .get(id)
                    .is_some_and(|b| b.display_name(short) == name)
            })
        };
        let index = named(true).or_else(|| named(false))?;
        self.active = index;
        Some(self.buffers[index])
    }

    pub fn active_buffer(&self) -> BufferId {
        self.buffers[self.active]
    }

    pub fn get_active_buffer_index(&self) -> usize {
        self.active
    }

    pub fn get_buffer_count(&self) -> usize {
        self.buffers.len()
    }

    pub fn buffers(&self) -> &[BufferId] {
        &self.buffers
    }

    pub fn contains(&self, buffer: BufferId) -> bool {
        self.buffers.contains(&buffer)
    }

    fn index_of(&self, buffer: BufferId) -> Option<usize> {
        self.buffers.iter().position(|&b| b == buffer)
    }

    pub fn next_buffer(&mut self) -> BufferId {
        self.active = (self.active + 1) % self.buffers.len();
        self.active_buffer()
    }

    pub fn previous_buffer(&mut self) -> BufferId {
        self.active = if self.active == 0 {
            self.buffers.len() - 1
        } else {
            self.active - 1
        };
        self.active_buffer()
    }

    /// Drop `buffer` from this window. The sole buffer of a window cannot
    /// be removed; the caller closes the window instead.
    ///
    /// Returns whether the buffer was removed.
    pub fn remove_buffer(&mut self, buffer: BufferId) -> bool {
        let Some(pos) = self.index_of(buffer) else {
            return false;
        };
        if self.buffers.len() == 1 {
            return false;
        }
        self.buffers.remove(pos);
        self.cursors.remove(&buffer);
        if pos < self.active || self.active >= self.buffers.len() {
            self.active = self.active.saturating_sub(1);
        }
        true
    }

    // ============================================================
    // Cursor
    // ============================================================

    /// Cursor line in the active buffer
    pub fn cursor_line(&self) -> usize {
        self.cursors
            .get(&self.active_buffer())
            .copied()
            .unwrap_or(0)
    }

    pub fn set_cursor_line(&mut self, line: usize) {
        self.cursors.insert(self.active_buffer(), line);
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
