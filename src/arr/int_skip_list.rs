// Copyright 2022 - 2024 Wenmeng See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Author: tickbh
// -----
// Created Date: 2024/06/11 14:20:48

use log::trace;

use super::{LevelGenerator, SkipList};
use crate::{Result, SkipListError};

/// 只存放非负整数的跳表, 插入负数时返回错误
///
/// # Examples
///
/// ```
/// use multiskip::{IntSkipList, SkipListError};
/// fn main() {
///     let mut val = IntSkipList::new();
///     assert!(val.add(3).is_ok());
///     assert_eq!(val.add(-1), Err(SkipListError::NegativeValue(-1)));
///     assert!(val.search(3));
///     assert!(!val.search(-1));
///     assert!(val.erase(3));
///     assert!(!val.erase(-1));
/// }
/// ```
#[derive(Clone, Debug, Default)]
pub struct IntSkipList {
    list: SkipList<u32>,
}

impl IntSkipList {
    pub fn new() -> Self {
        Self {
            list: SkipList::new(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            list: SkipList::with_seed(seed),
        }
    }

    pub fn with_generator(generator: LevelGenerator) -> Self {
        Self {
            list: SkipList::with_generator(generator),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    #[inline]
    pub fn total(&self) -> usize {
        self.list.total()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// 负数不可能存在于表中
    pub fn search(&self, target: i32) -> bool {
        u32::try_from(target).map_or(false, |v| self.list.search(&v))
    }

    pub fn count(&self, value: i32) -> usize {
        u32::try_from(value).map_or(0, |v| self.list.count(&v))
    }

    pub fn add(&mut self, value: i32) -> Result<()> {
        let v = u32::try_from(value).map_err(|_| {
            trace!("skip list reject negative value {}", value);
            SkipListError::NegativeValue(value)
        })?;
        self.list.add(v);
        Ok(())
    }

    pub fn erase(&mut self, value: i32) -> bool {
        u32::try_from(value).map_or(false, |v| self.list.erase(&v))
    }

    /// 按从小到大的顺序遍历, 返回值及其重复次数
    pub fn iter(&self) -> impl Iterator<Item = (i32, usize)> + '_ {
        // 存入的值均来自非负的i32
        self.list.iter().map(|(v, count)| (*v as i32, count))
    }

    pub fn as_list(&self) -> &SkipList<u32> {
        &self.list
    }
}
