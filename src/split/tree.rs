use std::collections::HashMap;

use crate::buffer::BufferId;
use crate::error::SnoError;
use crate::window::{EditorWindow, Processor, WindowId};

/// Orientation of a split. `Horizontal` stacks its children top to
/// bottom, `Vertical` places them left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitDirection {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitNode {
    Leaf(WindowId),
    Split {
        direction: SplitDirection,
        children: Vec<SplitNode>,
    },
}

impl SplitNode {
    fn pair(direction: SplitDirection, first: WindowId, second: WindowId) -> Self {
        SplitNode::Split {
            direction,
            children: vec![SplitNode::Leaf(first), SplitNode::Leaf(second)],
        }
    }

    pub fn contains(&self, id: WindowId) -> bool {
        match self {
            SplitNode::Leaf(leaf) => *leaf == id,
            SplitNode::Split { children, .. } => children.iter().any(|c| c.contains(id)),
        }
    }

    /// Leaf windows in pre-order
    pub fn leaves(&self) -> Vec<WindowId> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves(&self, out: &mut Vec<WindowId>) {
        match self {
            SplitNode::Leaf(id) => out.push(*id),
            SplitNode::Split { children, .. } => {
                for child in children {
                    child.collect_leaves(out);
                }
            }
        }
    }

    pub fn first_leaf(&self) -> Option<WindowId> {
        match self {
            SplitNode::Leaf(id) => Some(*id),
            SplitNode::Split { children, .. } => children.first()?.first_leaf(),
        }
    }

    /// Child indices leading from this node to the leaf `id`
    fn path_to(&self, id: WindowId) -> Option<Vec<usize>> {
        match self {
            SplitNode::Leaf(leaf) => (*leaf == id).then(Vec::new),
            SplitNode::Split { children, .. } => {
                children.iter().enumerate().find_map(|(i, child)| {
                    let mut path = child.path_to(id)?;
                    path.insert(0, i);
                    Some(path)
                })
            }
        }
    }

    fn node_at_mut(&mut self, path: &[usize]) -> Option<&mut SplitNode> {
        match path.split_first() {
            None => Some(self),
            Some((&i, rest)) => match self {
                SplitNode::Split { children, .. } => children.get_mut(i)?.node_at_mut(rest),
                SplitNode::Leaf(_) => None,
            },
        }
    }

    /// Collapse single-child splits and merge children that split the
    /// same way as their parent
    fn normalize(self) -> SplitNode {
        match self {
            SplitNode::Leaf(_) => self,
            SplitNode::Split {
                direction,
                children,
            } => {
                let mut flat = Vec::with_capacity(children.len());
                for child in children {
                    match child.normalize() {
                        SplitNode::Split {
                            direction: inner,
                            children: grand,
                        } if inner == direction => flat.extend(grand),
                        other => flat.push(other),
                    }
                }
                if flat.len() == 1 {
                    flat.swap_remove(0)
                } else {
                    SplitNode::Split {
                        direction,
                        children: flat,
                    }
                }
            }
        }
    }

    /// No split with fewer than two children, and no split directly
    /// inside one of the same direction
    pub fn is_normalized(&self) -> bool {
        match self {
            SplitNode::Leaf(_) => true,
            SplitNode::Split {
                direction,
                children,
            } => {
                children.len() >= 2
                    && children.iter().all(|child| match child {
                        SplitNode::Leaf(_) => true,
                        SplitNode::Split { direction: d, .. } => {
                            d != direction && child.is_normalized()
                        }
                    })
            }
        }
    }
}

/// Owns every window and the split tree that places them.
///
/// Each mutation checks its arguments before touching anything, so a
/// failed call leaves the tree and the active window as they were.
pub struct WindowManager {
    pub(super) windows: HashMap<WindowId, EditorWindow>,
    pub(super) root: Option<SplitNode>,
    pub(super) active: Option<WindowId>,
    next_window_id: WindowId,
    defaults: Vec<Processor>,
    pub(super) rows: usize,
    pub(super) cols: usize,
}

impl WindowManager {
    pub fn new(defaults: Vec<Processor>, rows: usize, cols: usize) -> Self {
        WindowManager {
            windows: HashMap::new(),
            root: None,
            active: None,
            next_window_id: 1,
            defaults,
            rows,
            cols,
        }
    }

    fn allocate(&mut self, buffer: BufferId) -> WindowId {
        let id = self.next_window_id;
        self.next_window_id += 1;
        self.windows
            .insert(id, EditorWindow::new(id, buffer, &self.defaults));
        id
    }

    fn ensure_window(&self, id: WindowId) -> Result<(), SnoError> {
        let placed = self.root.as_ref().is_some_and(|root| root.contains(id));
        if placed && self.windows.contains_key(&id) {
            Ok(())
        } else {
            Err(SnoError::invalid_window_op(format!(
                "window {id} is not in the layout"
            )))
        }
    }

    /// First window of an empty layout
    pub fn create_window(&mut self, buffer: BufferId) -> Result<WindowId, SnoError> {
        if self.root.is_some() {
            return Err(SnoError::invalid_window_op(
                "layout already has windows; split one instead",
            ));
        }
        let id = self.allocate(buffer);
        self.root = Some(SplitNode::Leaf(id));
        self.active = Some(id);
        tracing::debug!(window = id, buffer, "created first window");
        Ok(id)
    }

    /// Split `target`, placing a new window after it. The new window shows
    /// `buffer`, or the target's active buffer, and becomes active.
    pub fn split(
        &mut self,
        target: WindowId,
        direction: SplitDirection,
        buffer: Option<BufferId>,
    ) -> Result<WindowId, SnoError> {
        self.ensure_window(target)?;
        let Some(path) = self.root.as_ref().and_then(|root| root.path_to(target)) else {
            return Err(SnoError::invalid_window_op(format!(
                "window {target} is not in the layout"
            )));
        };

        let (source_buffer, cursor) = {
            let window = &self.windows[&target];
            (window.active_buffer(), window.cursor_line())
        };
        let buffer = buffer.unwrap_or(source_buffer);
        let id = self.allocate(buffer);
        if buffer == source_buffer {
            if let Some(window) = self.windows.get_mut(&id) {
                window.set_cursor_line(cursor);
            }
        }

        match path.split_last() {
            // The target is the root leaf
            None => self.root = Some(SplitNode::pair(direction, target, id)),
            Some((&index, parent_path)) => {
                let parent = self
                    .root
                    .as_mut()
                    .and_then(|root| root.node_at_mut(parent_path));
                if let Some(SplitNode::Split {
                    direction: parent_direction,
                    children,
                }) = parent
                {
                    if *parent_direction == direction {
                        children.insert(index + 1, SplitNode::Leaf(id));
                    } else {
                        children[index] = SplitNode::pair(direction, target, id);
                    }
                }
            }
        }

        self.active = Some(id);
        tracing::debug!(target, window = id, ?direction, buffer, "split window");
        Ok(id)
    }

    /// Remove `id` from the layout. Closing the last window empties the
    /// layout, leaving no active window.
    pub fn close_window(&mut self, id: WindowId) -> Result<(), SnoError> {
        self.ensure_window(id)?;

        let root = self.root.take();
        self.root = match root {
            Some(SplitNode::Leaf(_)) | None => None,
            Some(mut root) => {
                let path = root.path_to(id).unwrap_or_default();
                if let Some((&index, parent_path)) = path.split_last() {
                    if let Some(SplitNode::Split { children, .. }) = root.node_at_mut(parent_path) {
                        children.remove(index);
                    }
                }
                Some(root.normalize())
            }
        };
        self.windows.remove(&id);

        if self.active == Some(id) {
            self.active = self.root.as_ref().and_then(SplitNode::first_leaf);
        }
        tracing::debug!(window = id, remaining = self.windows.len(), "closed window");
        Ok(())
    }

    /// Close every window except `id`. Returns the closed windows.
    pub fn only(&mut self, id: WindowId) -> Result<Vec<WindowId>, SnoError> {
        self.ensure_window(id)?;
        let closed: Vec<WindowId> = self
            .walk_windows()
            .into_iter()
            .filter(|&w| w != id)
            .collect();
        for w in &closed {
            self.windows.remove(w);
        }
        self.root = Some(SplitNode::Leaf(id));
        self.active = Some(id);
        Ok(closed)
    }

    // ============================================================
    // Focus
    // ============================================================

    pub fn focus_window(&mut self, id: WindowId) -> Result<(), SnoError> {
        self.ensure_window(id)?;
        self.active = Some(id);
        Ok(())
    }

    pub fn focus_next_window(&mut self) -> Option<WindowId> {
        self.cycle_focus(1)
    }

    pub fn focus_previous_window(&mut self) -> Option<WindowId> {
        self.cycle_focus(-1)
    }

    fn cycle_focus(&mut self, step: isize) -> Option<WindowId> {
        let order = self.walk_windows();
        if order.is_empty() {
            return None;
        }
        let len = order.len() as isize;
        let current = self
            .active
            .and_then(|a| order.iter().position(|&w| w == a))
            .unwrap_or(0) as isize;
        let next = order[(current + step).rem_euclid(len) as usize];
        self.active = Some(next);
        Some(next)
    }

    // ============================================================
    // Queries
    // ============================================================

    pub fn root(&self) -> Option<&SplitNode> {
        self.root.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    pub fn active_window_id(&self) -> Option<WindowId> {
        self.active
    }

    pub fn active_window(&self) -> Option<&EditorWindow> {
        self.windows.get(&self.active?)
    }

    pub fn active_window_mut(&mut self) -> Option<&mut EditorWindow> {
        self.windows.get_mut(&self.active?)
    }

    pub fn window(&self, id: WindowId) -> Option<&EditorWindow> {
        self.windows.get(&id)
    }

    pub fn window_mut(&mut self, id: WindowId) -> Option<&mut EditorWindow> {
        self.windows.get_mut(&id)
    }

    /// Window ids in pre-order
    pub fn walk_windows(&self) -> Vec<WindowId> {
        self.root
            .as_ref()
            .map(SplitNode::leaves)
            .unwrap_or_default()
    }

    /// Windows that list `buffer`, in pre-order
    pub fn windows_for_buffer(&self, buffer: BufferId) -> Vec<WindowId> {
        self.walk_windows()
            .into_iter()
            .filter(|id| self.windows.get(id).is_some_and(|w| w.contains(buffer)))
            .collect()
    }

    /// Rebuild every window's pipeline around new defaults
    pub fn set_default_processors(&mut self, defaults: Vec<Processor>) {
        for window in self.windows.values_mut() {
            window.refresh_processors(&defaults);
        }
        self.defaults = defaults;
    }

    pub fn default_processors(&self) -> &[Processor] {
        &self.defaults
    }
}
