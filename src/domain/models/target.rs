// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::record::ProfileRecord;
use serde::{Deserialize, Serialize};

/// 抓取目标
///
/// 表示目录列表中的一个成员档案。`index`是该档案在原始
/// 列表中的位置，入队后不可变，用于结果回填、去重和
/// 进度编号；`url`是档案详情页地址。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// 在原始列表中的位置索引
    pub index: usize,
    /// 档案详情页URL
    pub url: String,
}

impl Target {
    pub fn new(index: usize, url: impl Into<String>) -> Self {
        Self {
            index,
            url: url.into(),
        }
    }

    /// 用于进度显示的档案编号（从1开始）
    pub fn profile_number(&self) -> usize {
        self.index + 1
    }
}

/// 目标最终结果
///
/// 一个目标在重试预算耗尽或成功后的最终裁决。
/// 每个目标有且仅有一个最终结果，进度统计依赖此不变量
/// 来避免重复计数。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetOutcome {
    /// 对应的抓取目标
    pub target: Target,
    /// 成功时提取到的档案记录
    pub record: Option<ProfileRecord>,
    /// 失败时的最后一次错误描述
    pub error: Option<String>,
}

impl TargetOutcome {
    /// 构造成功结果
    pub fn success(target: Target, record: ProfileRecord) -> Self {
        Self {
            target,
            record: Some(record),
            error: None,
        }
    }

    /// 构造失败结果，携带最后一次尝试的错误原因
    pub fn failure(target: Target, error: impl Into<String>) -> Self {
        Self {
            target,
            record: None,
            error: Some(error.into()),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.record.is_some()
    }
}

/// 目标完成事件
///
/// 调度器在每个目标裁决后向观察者广播的通知。
/// 通知通道是至少一次语义：观察者可能收到重复事件，
/// 也可能因为掉线而丢失事件，因此消费者必须按
/// `target_index` 幂等处理，且最终输出不得依赖该通道。
#[derive(Debug, Clone)]
pub struct CompletionEvent {
    /// 目标的稳定索引（去重键）
    pub target_index: usize,
    /// 用于展示的档案编号（index + 1）
    pub profile_number: usize,
    /// 是否成功
    pub succeeded: bool,
    /// 失败原因
    pub error: Option<String>,
}

impl CompletionEvent {
    pub fn from_outcome(outcome: &TargetOutcome) -> Self {
        Self {
            target_index: outcome.target.index,
            profile_number: outcome.target.profile_number(),
            succeeded: outcome.succeeded(),
            error: outcome.error.clone(),
        }
    }
}
