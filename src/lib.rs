//! 跳表实现的有序多重集合
//!
//! 以随机层高代替树的旋转平衡, 查找/插入/删除的期望复杂度为O(log(n)),
//! 重复插入的值只保存一个节点, 由节点上的计数记录次数

mod arr;
mod error;

pub use arr::{IntSkipList, LevelGenerator, SkipIter, SkipList, MAX_LEVEL};
pub use error::{Result, SkipListError};
