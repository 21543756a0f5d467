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
// Created Date: 2024/06/11 14:02:05

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipListError {
    /// 整数跳表只存放非负整数
    #[error("negative value {0} can not be stored, only non-negative integers are allowed")]
    NegativeValue(i32),
}

pub type Result<T> = std::result::Result<T, SkipListError>;
