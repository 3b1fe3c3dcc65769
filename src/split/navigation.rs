use super::layout::WindowLayout;
use super::tree::WindowManager;
use crate::window::WindowId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl WindowManager {
    /// Focus the neighbour of the active window in `direction`, picking
    /// the one sharing the longest edge with it.
    pub fn navigate(&mut self, direction: Direction) -> Option<WindowId> {
        let layouts = self.compute_layout(self.rows, self.cols);
        let active = self.active?;
        let from = layouts.iter().find(|l| l.window_id == active)?;
        let target = navigate_from(from, direction, &layouts)?;
        self.active = Some(target);
        Some(target)
    }
}

fn overlap(a_start: usize, a_len: usize, b_start: usize, b_len: usize) -> usize {
    let start = a_start.max(b_start);
    let end = (a_start + a_len).min(b_start + b_len);
    end.saturating_sub(start)
}

pub fn navigate_from(
    from: &WindowLayout,
    direction: Direction,
    layouts: &[WindowLayout],
) -> Option<WindowId> {
    layouts
        .iter()
        .filter(|candidate| candidate.window_id != from.window_id)
        .filter(|candidate| match direction {
            // A separator cell sits between neighbours
            Direction::Left => candidate.col + candidate.cols + 1 == from.col,
            Direction::Right => from.col + from.cols + 1 == candidate.col,
            Direction::Up => candidate.row + candidate.rows + 1 == from.row,
            Direction::Down => from.row + from.rows + 1 == candidate.row,
        })
        .map(|candidate| {
            let shared = match direction {
                Direction::Left | Direction::Right => {
                    overlap(from.row, from.rows, candidate.row, candidate.rows)
                }
                Direction::Up | Direction::Down => {
                    overlap(from.col, from.cols, candidate.col, candidate.cols)
                }
            };
            (candidate.window_id, shared)
        })
        .filter(|&(_, shared)| shared > 0)
        // First in pre-order wins a tie
        .fold(None, |best: Option<(WindowId, usize)>, (id, shared)| match best {
            Some((_, best_shared)) if best_shared >= shared => best,
            _ => Some((id, shared)),
        })
        .map(|(id, _)| id)
}
