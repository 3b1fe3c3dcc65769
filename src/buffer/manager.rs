//! Buffer ownership
//!
//! Every open buffer lives here, in the order it was opened. The message
//! log is kept apart from that order so it never shows up in listings.

use std::collections::HashMap;
use std::path::Path;

use super::{normalize_path, Buffer, BufferId};
use crate::constants::ui;
use crate::error::SnoError;

/// Summary information about a buffer for listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferInfo {
    pub id: BufferId,
    pub name: String,
    pub is_dirty: bool,
    pub is_read_only: bool,
}

pub struct BufferManager {
    buffers: HashMap<BufferId, Buffer>,
    order: Vec<BufferId>,
    next_buffer_id: BufferId,
    log: BufferId,
}

impl BufferManager {
    pub fn new() -> Self {
        let log = 1;
        let mut buffers = HashMap::new();
        buffers.insert(log, Buffer::log(log));
        BufferManager {
            buffers,
            order: Vec::new(),
            next_buffer_id: log + 1,
            log,
        }
    }

    fn next_id(&mut self) -> BufferId {
        let id = self.next_buffer_id;
        self.next_buffer_id += 1;
        id
    }

    fn insert(&mut self, buffer: Buffer) -> BufferId {
        let id = buffer.id();
        self.order.push(id);
        self.buffers.insert(id, buffer);
        id
    }

    /// New unnamed buffer
    pub fn create_empty(&mut self) -> BufferId {
        let id = self.next_id();
        self.insert(Buffer::new(id))
    }

    /// Buffer for `path`, reusing an open one. A new buffer is loaded from
    /// disk before it is registered, so a failed load registers nothing.
    ///
    /// Returns the id and whether the buffer was created.
    pub async fn open(&mut self, path: &Path) -> Result<(BufferId, bool), SnoError> {
        if let Some(id) = self.find_by_path(path) {
            return Ok((id, false));
        }
        let mut buffer = Buffer::with_path(self.next_buffer_id, path);
        buffer.load().await?;
        self.next_buffer_id += 1;
        Ok((self.insert(buffer), true))
    }

    pub fn find_by_path(&self, path: &Path) -> Option<BufferId> {
        let wanted = normalize_path(path);
        self.order.iter().copied().find(|id| {
            self.buffers
                .get(id)
                .and_then(Buffer::abs_path)
                .is_some_and(|p| p == wanted.as_path())
        })
    }

    pub fn get(&self, id: BufferId) -> Option<&Buffer> {
        self.buffers.get(&id)
    }

    pub fn get_mut(&mut self, id: BufferId) -> Option<&mut Buffer> {
        self.buffers.get_mut(&id)
    }

    /// Take a buffer out of the manager. The log cannot be removed.
    pub fn remove(&mut self, id: BufferId) -> Option<Buffer> {
        if id == self.log {
            return None;
        }
        self.order.retain(|&b| b != id);
        self.buffers.remove(&id)
    }

    /// Open buffers in the order they were opened, log excluded
    pub fn ids(&self) -> &[BufferId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn log_buffer_id(&self) -> BufferId {
        self.log
    }

    pub fn log_buffer(&self) -> Option<&Buffer> {
        self.buffers.get(&self.log)
    }

    /// Append a line to the message log, dropping the oldest lines past
    /// `ui::MESSAGE_LOG_LINES`
    pub fn log_message(&mut self, message: &str) {
        if let Some(log) = self.buffers.get_mut(&self.log) {
            log.append_line(message);
            log.keep_last_lines(ui::MESSAGE_LOG_LINES);
        }
    }

    pub fn info(&self, id: BufferId) -> Option<BufferInfo> {
        let buffer = self.buffers.get(&id)?;
        Some(BufferInfo {
            id,
            name: buffer.display_name(false),
            is_dirty: buffer.is_dirty(),
            is_read_only: buffer.is_read_only(),
        })
    }

    /// Buffers with unsaved changes, in opening order
    pub fn dirty_buffers(&self) -> Vec<BufferId> {
        self.order
            .iter()
            .copied()
            .filter(|id| self.buffers.get(id).is_some_and(Buffer::is_dirty))
            .collect()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        !self.dirty_buffers().is_empty()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Buffer> {
        self.buffers.values_mut()
    }
}

impl Default for BufferManager {
    fn default() -> Self {
        Self::new()
    }
}
