use super::tree::{SplitDirection, SplitNode, WindowManager};
use crate::window::WindowId;

/// Screen rectangle given to one window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowLayout {
    pub window_id: WindowId,
    pub row: usize,
    pub col: usize,
    pub rows: usize,
    pub cols: usize,
}

impl WindowManager {
    /// Remember the screen size used by [`WindowManager::navigate`]
    pub fn resize(&mut self, rows: usize, cols: usize) {
        self.rows = rows;
        self.cols = cols;
    }

    pub fn size(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Rectangles for every window, in pre-order. Siblings share their
    /// parent's extent equally, with a one-cell separator between them.
    pub fn compute_layout(&self, total_rows: usize, total_cols: usize) -> Vec<WindowLayout> {
        let mut layouts = Vec::new();
        if let Some(root) = &self.root {
            compute_node_layout(root, 0, 0, total_rows, total_cols, &mut layouts);
        }
        layouts
    }
}

/// Sizes of `count` children sharing `extent` cells, separators excluded.
/// Leftover cells go to the leading children.
pub fn share(extent: usize, count: usize) -> Vec<usize> {
    if count == 0 {
        return Vec::new();
    }
    let available = extent.saturating_sub(count - 1);
    let base = available / count;
    let extra = available % count;
    (0..count).map(|i| base + usize::from(i < extra)).collect()
}

fn compute_node_layout(
    node: &SplitNode,
    row: usize,
    col: usize,
    rows: usize,
    cols: usize,
    layouts: &mut Vec<WindowLayout>,
) {
    match node {
        SplitNode::Leaf(window_id) => {
            layouts.push(WindowLayout {
                window_id: *window_id,
                row,
                col,
                rows,
                cols,
            });
        }
        SplitNode::Split {
            direction: SplitDirection::Horizontal,
            children,
        } => {
            let mut at = row;
            for (child, size) in children.iter().zip(share(rows, children.len())) {
                compute_node_layout(child, at, col, size, cols, layouts);
                at += size + 1;
            }
        }
        SplitNode::Split {
            direction: SplitDirection::Vertical,
            children,
        } => {
            let mut at = col;
            for (child, size) in children.iter().zip(share(cols, children.len())) {
                compute_node_layout(child, row, at, rows, size, layouts);
                at += size + 1;
            }
        }
    }
}
