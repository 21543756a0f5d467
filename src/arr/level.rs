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
// Created Date: 2024/06/11 10:21:37

use rand::{rngs::StdRng, Rng, SeedableRng};

/// 跳表的最大层数, 建议存放的元素个数不超过 2^MAX_LEVEL
pub const MAX_LEVEL: usize = 15;

/// 每次抛硬币升层的概率
const PROBABILITY: f64 = 0.5;

/// 新节点层高的生成器, 以抛硬币的方式产生几何分布的层高
///
/// 层高从1开始, 每次抛中则加一, 直到未抛中或者达到上限,
/// 所以层高不低于k的概率为 2^-(k-1)
///
/// # Examples
///
/// ```
/// use multiskip::LevelGenerator;
/// fn main() {
///     let mut gen = LevelGenerator::from_seed(4, 7);
///     for _ in 0..100 {
///         let level = gen.random_level();
///         assert!(level >= 1 && level <= 4);
///     }
/// }
/// ```
#[derive(Clone, Debug)]
pub struct LevelGenerator {
    max_level: usize,
    rng: StdRng,
}

impl LevelGenerator {
    /// 以系统随机源初始化
    pub fn new(max_level: usize) -> Self {
        Self::check(max_level);
        Self {
            max_level,
            rng: StdRng::from_os_rng(),
        }
    }

    /// 以固定种子初始化, 相同的种子产生相同的层高序列
    pub fn from_seed(max_level: usize, seed: u64) -> Self {
        Self::check(max_level);
        Self {
            max_level,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn check(max_level: usize) {
        assert!(
            max_level > 0 && max_level <= MAX_LEVEL,
            "max level must be in 1..={}, got {}",
            MAX_LEVEL,
            max_level
        );
    }

    #[inline]
    pub fn max_level(&self) -> usize {
        self.max_level
    }

    pub fn random_level(&mut self) -> usize {
        let mut level = 1;
        while level < self.max_level && self.rng.random_bool(PROBABILITY) {
            level += 1;
        }
        level
    }
}

impl Default for LevelGenerator {
    fn default() -> Self {
        Self::new(MAX_LEVEL)
    }
}
