mod int_skip_list;
mod level;
mod skip_list;

pub use int_skip_list::IntSkipList;
pub use level::{LevelGenerator, MAX_LEVEL};
pub use skip_list::{SkipIter, SkipList};
