//! Split tree and window management
//!
//! Windows are the leaves of an n-ary tree of splits. Splitting in the
//! direction of the parent adds a sibling; splitting across it nests a
//! new two-window split in the target's place.

pub mod layout;
pub mod navigation;
pub mod tree;

pub use layout::WindowLayout;
pub use navigation::Direction;
pub use tree::{SplitDirection, SplitNode, WindowManager};
