// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::models::record::ProfileRecord;
use crate::domain::models::target::Target;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// 提取错误类型
#[derive(Error, Debug)]
pub enum ExtractError {
    /// 等待档案数据超时
    #[error("Timeout waiting for profile data")]
    Timeout,
    /// 页面已响应但未提取到可用记录
    #[error("No data extracted")]
    NoData,
    /// 执行载体失败（无法分配上下文或发送请求）
    #[error("Transport error: {0}")]
    Transport(String),
    /// 抓取基础设施整体不可用，对整个运行致命
    #[error("Infrastructure failure: {0}")]
    Infrastructure(String),
}

impl ExtractError {
    /// 判断错误是否可重试
    ///
    /// # 返回值
    ///
    /// 超时、无数据和传输错误在尝试预算内均可重试；
    /// 基础设施错误不可重试，应中止整个运行
    pub fn is_retryable(&self) -> bool {
        !self.is_fatal()
    }

    /// 判断错误是否对整个运行致命
    pub fn is_fatal(&self) -> bool {
        matches!(self, ExtractError::Infrastructure(_))
    }
}

/// 页面加载结果
///
/// 加载等待超时不视为错误：页面可能仍然可用，
/// 后续提取自带独立的超时预算
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// 页面加载完成
    Loaded,
    /// 等待加载超时
    TimedOut,
}

/// 档案提取端口
///
/// 调度器对抓取载体的唯一依赖。一次尝试的生命周期为：
/// `allocate` 分配独立的执行上下文（如一个浏览器标签页），
/// `wait_loaded` 等待页面加载，`extract` 提取结构化记录，
/// `release` 归还上下文。上下文归`allocate`的调用方独占，
/// 在任何退出路径上都必须通过`release`归还，绝不跨尝试复用。
#[async_trait]
pub trait ProfilePort: Send + Sync {
    /// 一次尝试独占的执行上下文
    type Context: Send;

    /// 为目标分配一个全新的执行上下文
    async fn allocate(&self, target: &Target) -> Result<Self::Context, ExtractError>;

    /// 等待页面加载完成，超出预算时返回`LoadStatus::TimedOut`
    async fn wait_loaded(
        &self,
        ctx: &mut Self::Context,
        timeout: Duration,
    ) -> Result<LoadStatus, ExtractError>;

    /// 在预算内提取档案记录
    async fn extract(
        &self,
        ctx: &mut Self::Context,
        timeout: Duration,
    ) -> Result<ProfileRecord, ExtractError>;

    /// 归还执行上下文；必须容忍上下文已经失效的情况
    async fn release(&self, ctx: Self::Context);
}
