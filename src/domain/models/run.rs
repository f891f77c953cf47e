// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::target::TargetOutcome;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// 运行状态枚举
///
/// 表示一次批量抓取运行在其生命周期中的不同状态。
/// 状态转换遵循以下流程：
/// Idle → Running → Completed/Cancelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// 空闲，尚未开始
    #[default]
    Idle,
    /// 运行中
    Running,
    /// 已完成，所有目标均已裁决
    Completed,
    /// 已取消，剩余分组不再派发
    Cancelled,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RunStatus::Idle => write!(f, "idle"),
            RunStatus::Running => write!(f, "running"),
            RunStatus::Completed => write!(f, "completed"),
            RunStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl FromStr for RunStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idle" => Ok(RunStatus::Idle),
            "running" => Ok(RunStatus::Running),
            "completed" => Ok(RunStatus::Completed),
            "cancelled" => Ok(RunStatus::Cancelled),
            _ => Err(()),
        }
    }
}

/// 运行状态
///
/// 一次批量抓取运行的过程状态：已裁决目标的索引集合
/// （去重依据）、成功/失败计数器和起始时间。每次运行
/// 创建全新实例，计数器在运行期间单调递增，绝不回退。
#[derive(Debug)]
pub struct RunState {
    /// 目标总数
    pub total: usize,
    /// 已裁决目标的索引集合
    resolved: HashSet<usize>,
    /// 成功计数
    pub succeeded: usize,
    /// 失败计数
    pub failed: usize,
    /// 运行起始时间
    pub started_at: DateTime<Utc>,
}

impl RunState {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            resolved: HashSet::new(),
            succeeded: 0,
            failed: 0,
            started_at: Utc::now(),
        }
    }

    /// 标记一个目标已裁决
    ///
    /// 以稳定的目标索引作为去重键。重复标记同一目标时
    /// 返回false且不改变任何计数器。
    pub fn mark_resolved(&mut self, index: usize, succeeded: bool) -> bool {
        if !self.resolved.insert(index) {
            return false;
        }
        if succeeded {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        true
    }

    /// 已裁决目标数量
    pub fn resolved_count(&self) -> usize {
        self.resolved.len()
    }

    /// 所有目标是否均已裁决
    pub fn is_complete(&self) -> bool {
        self.resolved.len() == self.total
    }
}

/// 运行报告
///
/// 一次运行结束后的最终产物：按原始位置排序的目标结果、
/// 取消标记、运行级错误和成功/失败计数。
#[derive(Debug)]
pub struct RunReport {
    /// 按原始索引排序的目标结果（取消或运行级错误时可能不完整）
    pub outcomes: Vec<TargetOutcome>,
    /// 运行是否被取消
    pub cancelled: bool,
    /// 运行级基础设施错误（不影响已收集的结果）
    pub error: Option<String>,
    /// 成功目标数
    pub succeeded: usize,
    /// 失败目标数
    pub failed: usize,
}

impl RunReport {
    /// 运行是否完整裁决了所有目标且无运行级错误
    pub fn is_success(&self) -> bool {
        !self.cancelled && self.error.is_none()
    }
}
