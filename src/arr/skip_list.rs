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
// Created Date: 2024/06/11 10:45:12

use std::fmt;

use log::{debug, trace};

use super::level::{LevelGenerator, MAX_LEVEL};

/// 空链接
const NIL: usize = usize::MAX;
/// 头节点的位置, 头节点不存放在节点数组中
const HEAD: usize = usize::MAX - 1;

#[derive(Clone)]
struct SkipNode<T> {
    value: T,
    /// 重复插入的次数
    count: usize,
    /// 第i层的下一个节点位置, 长度即为该节点的层高
    forward: Vec<usize>,
}

/// 跳表实现的有序多重集合, 相同的值只保存一个节点, 以计数记录重复次数
///
/// 节点存放于数组中, 节点之间以数组下标相连, 删除后的位置会被复用
///
/// # Examples
///
/// ```
/// use multiskip::SkipList;
/// fn main() {
///     let mut val = SkipList::new();
///     val.add(3);
///     val.add(1);
///     val.add(4);
///     val.add(1);
///     assert!(val.search(&4));
///     assert!(!val.search(&2));
///     assert!(val.erase(&1));
///     assert!(val.search(&1));
///     assert!(val.erase(&1));
///     assert!(!val.search(&1));
/// }
/// ```
#[derive(Clone)]
pub struct SkipList<T> {
    nodes: Vec<Option<SkipNode<T>>>,
    // 存储空闲位置, 用O(1)的时间复杂度取出空闲位置
    free: Vec<usize>,
    header: [usize; MAX_LEVEL],
    /// 当前使用中的最高层
    level: usize,
    len: usize,
    total: usize,
    generator: LevelGenerator,
}

impl<T> SkipList<T> {
    #[inline]
    fn node_ref(&self, idx: usize) -> Option<&SkipNode<T>> {
        self.nodes.get(idx).and_then(|node| node.as_ref())
    }

    #[inline]
    fn node_mut(&mut self, idx: usize) -> Option<&mut SkipNode<T>> {
        self.nodes.get_mut(idx).and_then(|node| node.as_mut())
    }

    #[inline]
    fn value_of(&self, idx: usize) -> Option<&T> {
        self.node_ref(idx).map(|node| &node.value)
    }

    #[inline]
    fn next_at(&self, prev: usize, level: usize) -> usize {
        if prev == HEAD {
            self.header[level]
        } else {
            self.node_ref(prev).map_or(NIL, |node| node.forward[level])
        }
    }

    #[inline]
    fn set_next(&mut self, prev: usize, level: usize, next: usize) {
        if prev == HEAD {
            self.header[level] = next;
        } else if let Some(node) = self.node_mut(prev) {
            node.forward[level] = next;
        }
    }

    fn alloc(&mut self, node: SkipNode<T>) -> usize {
        match self.free.pop() {
            Some(idx) => {
                self.nodes[idx] = Some(node);
                idx
            }
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            }
        }
    }

    /// 不同值的个数
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// 包含重复次数在内的元素总数
    #[inline]
    pub fn total(&self) -> usize {
        self.total
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 当前使用中的最高层, 空表为0
    #[inline]
    pub fn height(&self) -> usize {
        self.level
    }

    #[inline]
    pub fn max_level(&self) -> usize {
        self.generator.max_level()
    }

    /// 清除数据, 保留层高配置及随机源
    /// # Examples
    ///
    /// ```
    /// use multiskip::SkipList;
    /// fn main() {
    ///     let mut val = SkipList::new();
    ///     val.add(1);
    ///     val.add(1);
    ///     assert_eq!(val.total(), 2);
    ///     val.clear();
    ///     assert_eq!(val.total(), 0);
    ///     assert!(!val.search(&1));
    /// }
    /// ```
    pub fn clear(&mut self) {
        debug!("skip list clear {} nodes", self.len);
        self.nodes.clear();
        self.free.clear();
        self.header = [NIL; MAX_LEVEL];
        self.level = 0;
        self.len = 0;
        self.total = 0;
    }

    /// 最小的值及其重复次数
    ///
    /// # Examples
    ///
    /// ```
    /// use multiskip::SkipList;
    /// fn main() {
    ///     let val: SkipList<u32> = vec![5, 2, 2, 9].into_iter().collect();
    ///     assert_eq!(val.first(), Some((&2, 2)));
    /// }
    /// ```
    pub fn first(&self) -> Option<(&T, usize)> {
        self.node_ref(self.header[0])
            .map(|node| (&node.value, node.count))
    }

    /// 最大的值及其重复次数, 从最高层向右向下走到底
    ///
    /// # Examples
    ///
    /// ```
    /// use multiskip::SkipList;
    /// fn main() {
    ///     let val: SkipList<u32> = vec![5, 2, 9, 9].into_iter().collect();
    ///     assert_eq!(val.last(), Some((&9, 2)));
    /// }
    /// ```
    pub fn last(&self) -> Option<(&T, usize)> {
        let mut x = HEAD;
        for i in (0..self.level).rev() {
            loop {
                let next = self.next_at(x, i);
                if next == NIL {
                    break;
                }
                x = next;
            }
        }
        self.node_ref(x).map(|node| (&node.value, node.count))
    }

    /// 按从小到大的顺序遍历, 返回值及其重复次数
    ///
    /// # Examples
    ///
    /// ```
    /// use multiskip::SkipList;
    /// fn main() {
    ///     let mut val = SkipList::new();
    ///     val.add(4);
    ///     val.add(2);
    ///     val.add(1);
    ///     val.add(2);
    ///     let mut iter = val.iter();
    ///     assert_eq!(iter.next(), Some((&1, 1)));
    ///     assert_eq!(iter.next(), Some((&2, 2)));
    ///     assert_eq!(iter.next(), Some((&4, 1)));
    ///     assert_eq!(iter.next(), None);
    /// }
    /// ```
    pub fn iter(&self) -> SkipIter<'_, T> {
        SkipIter {
            list: self,
            cur: self.header[0],
            len: self.len,
        }
    }

    /// 每种层高的节点数, 下标k-1对应层高k
    pub fn level_histogram(&self) -> Vec<usize> {
        let mut histogram = vec![0; self.max_level()];
        for node in self.nodes.iter().flatten() {
            histogram[node.forward.len() - 1] += 1;
        }
        histogram
    }
}

impl<T: Ord> SkipList<T> {
    pub fn new() -> Self {
        Self::with_generator(LevelGenerator::default())
    }

    /// 指定最大层数, 必须在 1..=MAX_LEVEL 之间
    pub fn with_max_level(max_level: usize) -> Self {
        Self::with_generator(LevelGenerator::new(max_level))
    }

    /// 以固定种子产生层高, 相同的插入顺序得到相同的结构
    pub fn with_seed(seed: u64) -> Self {
        Self::with_generator(LevelGenerator::from_seed(MAX_LEVEL, seed))
    }

    pub fn with_generator(generator: LevelGenerator) -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            header: [NIL; MAX_LEVEL],
            level: 0,
            len: 0,
            total: 0,
            generator,
        }
    }

    /// 自顶向下逐层查找, update记录每层最后一个小于value的节点
    /// stop为true时, 在任一层遇到相等的节点即停止
    /// 返回停止处的下一个节点, 相等与否由调用方判断
    fn descend(&self, value: &T, update: &mut [usize; MAX_LEVEL], stop: bool) -> usize {
        let mut x = HEAD;
        for i in (0..self.level).rev() {
            let mut next = self.next_at(x, i);
            while let Some(v) = self.value_of(next) {
                if v >= value {
                    break;
                }
                x = next;
                next = self.next_at(x, i);
            }
            update[i] = x;
            if stop && self.value_of(next) == Some(value) {
                return next;
            }
        }
        self.next_at(x, 0)
    }

    fn find(&self, value: &T) -> Option<&SkipNode<T>> {
        let mut update = [HEAD; MAX_LEVEL];
        let x = self.descend(value, &mut update, true);
        self.node_ref(x).filter(|node| &node.value == value)
    }

    /// 查找是否存在该值
    ///
    /// # Examples
    ///
    /// ```
    /// use multiskip::SkipList;
    /// fn main() {
    ///     let mut val = SkipList::new();
    ///     assert!(!val.search(&1));
    ///     val.add(1);
    ///     assert!(val.search(&1));
    /// }
    /// ```
    #[inline]
    pub fn search(&self, target: &T) -> bool {
        self.find(target).is_some()
    }

    /// 该值的重复次数, 不存在为0
    ///
    /// # Examples
    ///
    /// ```
    /// use multiskip::SkipList;
    /// fn main() {
    ///     let mut val = SkipList::new();
    ///     val.add(5);
    ///     val.add(5);
    ///     assert_eq!(val.count(&5), 2);
    ///     assert_eq!(val.count(&6), 0);
    /// }
    /// ```
    pub fn count(&self, value: &T) -> usize {
        self.find(value).map_or(0, |node| node.count)
    }

    /// 插入数据, 已存在时只增加计数
    ///
    /// # Examples
    ///
    /// ```
    /// use multiskip::SkipList;
    /// fn main() {
    ///     let mut val = SkipList::new();
    ///     val.add(5);
    ///     val.add(5);
    ///     val.add(7);
    ///     assert_eq!(val.len(), 2);
    ///     assert_eq!(val.total(), 3);
    /// }
    /// ```
    pub fn add(&mut self, value: T) {
        let mut update = [HEAD; MAX_LEVEL];
        let x = self.descend(&value, &mut update, true);
        if self.value_of(x) == Some(&value) {
            if let Some(node) = self.node_mut(x) {
                node.count += 1;
            }
            self.total += 1;
            return;
        }

        let level = self.generator.random_level();
        if level > self.level {
            // 更高层的前驱均为头节点, update初始值即为HEAD
            debug!("skip list height grow {} -> {}", self.level, level);
            self.level = level;
        }

        let forward = (0..level).map(|i| self.next_at(update[i], i)).collect();
        let idx = self.alloc(SkipNode {
            value,
            count: 1,
            forward,
        });
        for i in 0..level {
            self.set_next(update[i], i, idx);
        }
        trace!("skip list link node {} with level {}", idx, level);
        self.len += 1;
        self.total += 1;
    }

    /// 删除一次该值, 计数归零时删除节点
    ///
    /// # Examples
    ///
    /// ```
    /// use multiskip::SkipList;
    /// fn main() {
    ///     let mut val = SkipList::new();
    ///     val.add(5);
    ///     val.add(5);
    ///     assert!(val.erase(&5));
    ///     assert!(val.search(&5));
    ///     assert!(val.erase(&5));
    ///     assert!(!val.search(&5));
    ///     assert!(!val.erase(&5));
    /// }
    /// ```
    pub fn erase(&mut self, value: &T) -> bool {
        let mut update = [HEAD; MAX_LEVEL];
        let x = self.descend(value, &mut update, false);
        let count = match self.node_ref(x) {
            Some(node) if &node.value == value => node.count,
            _ => return false,
        };
        if count > 1 {
            if let Some(node) = self.node_mut(x) {
                node.count -= 1;
            }
            self.total -= 1;
        } else {
            self.remove_node(x, &update);
        }
        true
    }

    /// 删除该值的所有重复, 返回删除的个数
    ///
    /// # Examples
    ///
    /// ```
    /// use multiskip::SkipList;
    /// fn main() {
    ///     let mut val = SkipList::new();
    ///     val.add(5);
    ///     val.add(5);
    ///     assert_eq!(val.erase_all(&5), 2);
    ///     assert_eq!(val.erase_all(&5), 0);
    /// }
    /// ```
    pub fn erase_all(&mut self, value: &T) -> usize {
        let mut update = [HEAD; MAX_LEVEL];
        let x = self.descend(value, &mut update, false);
        match self.node_ref(x) {
            Some(node) if &node.value == value => {
                let count = node.count;
                self.remove_node(x, &update);
                count
            }
            _ => 0,
        }
    }

    /// update为完整下降得到的每层前驱, 第i层前驱的下一个节点在节点层高内必为x
    fn remove_node(&mut self, x: usize, update: &[usize; MAX_LEVEL]) {
        let node = match self.nodes.get_mut(x).and_then(|node| node.take()) {
            Some(node) => node,
            None => return,
        };
        for (i, &next) in node.forward.iter().enumerate() {
            debug_assert_eq!(self.next_at(update[i], i), x);
            self.set_next(update[i], i, next);
        }
        self.free.push(x);
        trace!("skip list unlink node {} with level {}", x, node.forward.len());

        while self.level > 0 && self.header[self.level - 1] == NIL {
            self.level -= 1;
        }
        self.len -= 1;
        self.total -= node.count;
    }

    /// 校验各层有序, 高层为低层的子序列, 以及计数的一致性
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        let mut bottom = vec![];
        let mut cur = self.header[0];
        let mut total = 0;
        while let Some(node) = self.node_ref(cur) {
            assert!(node.count >= 1);
            assert!(node.forward.len() >= 1 && node.forward.len() <= self.max_level());
            assert!(node.forward.len() <= self.level);
            if let Some(&prev) = bottom.last() {
                assert!(self.value_of(prev) < Some(&node.value));
            }
            total += node.count;
            bottom.push(cur);
            cur = node.forward[0];
        }
        assert_eq!(cur, NIL);
        assert_eq!(bottom.len(), self.len);
        assert_eq!(total, self.total);
        assert_eq!(self.nodes.iter().flatten().count(), self.len);
        assert_eq!(self.nodes.len(), self.len + self.free.len());

        for i in 1..MAX_LEVEL {
            let mut walk = vec![];
            let mut cur = self.header[i];
            while let Some(node) = self.node_ref(cur) {
                walk.push(cur);
                cur = node.forward[i];
            }
            assert_eq!(cur, NIL);
            let expect = bottom
                .iter()
                .copied()
                .filter(|&idx| self.node_ref(idx).map_or(0, |n| n.forward.len()) > i)
                .collect::<Vec<_>>();
            assert_eq!(walk, expect, "level {} is not the subsequence", i + 1);
        }

        for i in self.level..MAX_LEVEL {
            assert_eq!(self.header[i], NIL);
        }
        if self.level > 0 {
            assert_ne!(self.header[self.level - 1], NIL);
        }
    }
}

impl<T: Ord> Default for SkipList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> FromIterator<T> for SkipList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = SkipList::new();
        list.extend(iter);
        list
    }
}

impl<T: Ord> Extend<T> for SkipList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.add(value);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for SkipList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, T> IntoIterator for &'a SkipList<T> {
    type Item = (&'a T, usize);
    type IntoIter = SkipIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct SkipIter<'a, T> {
    list: &'a SkipList<T>,
    cur: usize,
    len: usize,
}

impl<'a, T> Clone for SkipIter<'a, T> {
    fn clone(&self) -> Self {
        Self {
            list: self.list,
            cur: self.cur,
            len: self.len,
        }
    }
}

impl<'a, T> Iterator for SkipIter<'a, T> {
    type Item = (&'a T, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.node_ref(self.cur)?;
        self.cur = node.forward[0];
        self.len -= 1;
        Some((&node.value, node.count))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, T> ExactSizeIterator for SkipIter<'a, T> {}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::SkipList;
    use crate::{LevelGenerator, MAX_LEVEL};

    #[test]
    fn test_empty() {
        let mut m: SkipList<u32> = SkipList::new();
        for x in [0, 1, 99, u32::MAX] {
            assert!(!m.search(&x));
            assert!(!m.erase(&x));
        }
        assert_eq!(m.len(), 0);
        assert_eq!(m.height(), 0);
        assert_eq!(m.first(), None);
        assert_eq!(m.last(), None);
        m.check_invariants();
    }

    #[test]
    fn test_round_trip() {
        let mut m = SkipList::with_seed(1);
        m.add(10);
        assert!(m.search(&10));
        assert!(m.erase(&10));
        assert!(!m.search(&10));
        assert!(m.is_empty());
        assert_eq!(m.height(), 0);
        m.check_invariants();
    }

    #[test]
    fn test_multiplicity() {
        let mut m = SkipList::with_seed(2);
        m.add(5);
        m.add(5);
        assert_eq!(m.len(), 1);
        assert_eq!(m.total(), 2);
        assert!(m.erase(&5));
        assert!(m.search(&5));
        assert!(m.erase(&5));
        assert!(!m.search(&5));
        m.check_invariants();
    }

    #[test]
    fn test_scenario() {
        let mut m = SkipList::with_seed(3);
        for x in [3, 1, 4, 1, 5] {
            m.add(x);
        }
        assert!(m.search(&4));
        assert!(!m.search(&2));
        assert!(m.erase(&1));
        assert!(m.search(&1));
        assert!(m.erase(&1));
        assert!(!m.search(&1));
        assert_eq!(m.iter().map(|(v, _)| *v).collect::<Vec<_>>(), vec![3, 4, 5]);
        m.check_invariants();
    }

    #[test]
    fn test_erase_missing() {
        let mut m = SkipList::with_seed(4);
        for x in 0..50u32 {
            m.add(x * 2);
        }
        assert!(!m.erase(&99));
        assert!(!m.erase(&7));
        assert_eq!(m.len(), 50);
        for x in 0..50u32 {
            assert!(m.search(&(x * 2)));
            assert!(!m.search(&(x * 2 + 1)));
        }
        m.check_invariants();
    }

    #[test]
    fn test_many_duplicate() {
        let mut m = SkipList::with_seed(5);
        for _ in 0..1000 {
            m.add(42u32);
        }
        assert_eq!(m.len(), 1);
        for _ in 0..999 {
            assert!(m.erase(&42));
        }
        assert!(m.search(&42));
        assert_eq!(m.count(&42), 1);
        assert!(m.erase(&42));
        assert!(!m.search(&42));
        assert!(!m.erase(&42));
        m.check_invariants();
    }

    #[test]
    fn test_sorted() {
        let mut m = SkipList::with_seed(6);
        let mut expect = vec![];
        for i in 0..2000u32 {
            let x = i.wrapping_mul(2654435761) % 5003;
            m.add(x);
            expect.push(x);
        }
        expect.sort();
        expect.dedup();
        assert_eq!(m.iter().map(|(v, _)| *v).collect::<Vec<_>>(), expect);
        assert_eq!(m.iter().len(), expect.len());
        assert_eq!(m.first().map(|(v, _)| *v), expect.first().copied());
        assert_eq!(m.last().map(|(v, _)| *v), expect.last().copied());
        assert!(m.height() <= MAX_LEVEL);
        m.check_invariants();
    }

    #[test]
    fn test_reuse_slot() {
        let mut m = SkipList::with_seed(7);
        for x in 0..100u32 {
            m.add(x);
        }
        for x in 0..100u32 {
            if x % 3 == 0 {
                assert!(m.erase(&x));
            }
        }
        m.check_invariants();
        for x in 100..134u32 {
            m.add(x);
        }
        m.check_invariants();
        assert_eq!(m.len(), 100);
    }

    #[test]
    fn test_erase_all() {
        let mut m: SkipList<u32> = vec![1, 2, 2, 2, 3].into_iter().collect();
        assert_eq!(m.erase_all(&2), 3);
        assert_eq!(m.total(), 2);
        assert_eq!(m.erase_all(&2), 0);
        assert!(!m.search(&2));
        m.check_invariants();
    }

    #[test]
    fn test_max_level() {
        let mut m = SkipList::with_generator(LevelGenerator::from_seed(2, 8));
        for x in 0..500u32 {
            m.add(x);
        }
        assert_eq!(m.max_level(), 2);
        assert!(m.height() <= 2);
        let histogram = m.level_histogram();
        assert_eq!(histogram.len(), 2);
        assert_eq!(histogram.iter().sum::<usize>(), 500);
        m.check_invariants();
    }

    #[test]
    fn test_same_seed_same_shape() {
        let mut a = SkipList::with_seed(9);
        let mut b = SkipList::with_seed(9);
        for x in 0..300u32 {
            a.add(x);
            b.add(x);
        }
        assert_eq!(a.level_histogram(), b.level_histogram());
        assert_eq!(a.height(), b.height());
    }

    #[test]
    fn test_signed() {
        let mut m = SkipList::with_seed(10);
        for x in [-5i64, 3, -100, 0, 7] {
            m.add(x);
        }
        assert!(m.search(&-100));
        assert_eq!(m.first(), Some((&-100, 1)));
        m.check_invariants();
    }

    #[test]
    fn test_clear() {
        let mut m = SkipList::with_seed(11);
        m.extend(0..64u32);
        m.clear();
        assert!(m.is_empty());
        assert_eq!(m.level_histogram().iter().sum::<usize>(), 0);
        m.check_invariants();
        m.add(1);
        assert!(m.search(&1));
        m.check_invariants();
    }

    #[test]
    fn test_debug() {
        let m: SkipList<u32> = vec![2, 1, 2].into_iter().collect();
        assert_eq!(format!("{:?}", m), "{1: 1, 2: 2}");
    }

    #[test]
    fn test_clone() {
        let mut m = SkipList::with_seed(12);
        m.extend([1u32, 2, 3]);
        let m2 = m.clone();
        m.clear();
        assert!(m2.search(&2));
        assert_eq!(m2.len(), 3);
        m2.check_invariants();
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_model(seed in any::<u64>(), ops in prop::collection::vec((any::<bool>(), 0u32..64), 0..400)) {
                let mut list = SkipList::with_seed(seed);
                let mut expected: BTreeMap<u32, usize> = BTreeMap::new();

                for (add, value) in ops {
                    if add {
                        list.add(value);
                        *expected.entry(value).or_default() += 1;
                    } else {
                        let present = match expected.get_mut(&value) {
                            Some(count) if *count > 1 => {
                                *count -= 1;
                                true
                            }
                            Some(_) => {
                                expected.remove(&value);
                                true
                            }
                            None => false,
                        };
                        prop_assert_eq!(list.erase(&value), present);
                    }
                    list.check_invariants();
                }

                for value in 0u32..64 {
                    prop_assert_eq!(list.search(&value), expected.contains_key(&value));
                    prop_assert_eq!(list.count(&value), expected.get(&value).copied().unwrap_or(0));
                }
                let items = list.iter().map(|(v, c)| (*v, c)).collect::<Vec<_>>();
                let model = expected.into_iter().collect::<Vec<_>>();
                prop_assert_eq!(items, model);
            }
        }
    }
}
