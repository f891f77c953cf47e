// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::ScrapeSettings;
use crate::domain::models::record::ProfileRecord;
use crate::domain::models::target::{Target, TargetOutcome};
use crate::engines::traits::{ExtractError, LoadStatus, ProfilePort};
use crate::utils::errors::RunError;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// 重试策略
///
/// 将单个目标的一次提取包装为有界的重试执行：每次尝试
/// 分配全新的执行上下文（失败的上下文可能已损坏，绝不复用），
/// 在预算内等待加载和提取，并在每条退出路径上归还上下文。
/// 尝试之间等待固定间隔，预算耗尽后产出携带最后错误原因的
/// 失败结果。
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// 最大尝试次数（含首次）
    pub max_attempts: u32,
    /// 页面加载超时时间
    pub load_timeout: Duration,
    /// 字段提取超时时间
    pub extract_timeout: Duration,
    /// 两次尝试之间的等待时间
    pub retry_delay: Duration,
    /// 加载后等待客户端渲染的时间
    pub render_settle: Duration,
}

impl RetryPolicy {
    pub fn new(settings: &ScrapeSettings) -> Self {
        Self {
            max_attempts: settings.max_attempts.max(1),
            load_timeout: settings.load_timeout(),
            extract_timeout: settings.extract_timeout(),
            retry_delay: settings.retry_delay(),
            render_settle: settings.render_settle(),
        }
    }

    /// 判断是否还应该重试
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt + 1 < self.max_attempts
    }

    /// 执行单个目标直至成功或预算耗尽
    ///
    /// 目标级错误永远不会向上抛出，而是折叠为失败结果；
    /// 只有基础设施级错误会作为运行级错误返回。
    ///
    /// # 参数
    ///
    /// * `port` - 档案提取端口
    /// * `target` - 抓取目标
    ///
    /// # 返回值
    ///
    /// * `Ok(TargetOutcome)` - 该目标的最终裁决（有且仅有一个）
    /// * `Err(RunError)` - 基础设施失败，整个运行应当中止
    pub async fn execute<P: ProfilePort>(
        &self,
        port: &P,
        target: &Target,
    ) -> Result<TargetOutcome, RunError> {
        let mut last_error: Option<ExtractError> = None;

        for attempt in 0..self.max_attempts {
            match self.attempt(port, target).await {
                Ok(record) => {
                    debug!(
                        "Profile {} extracted on attempt {}/{}",
                        target.profile_number(),
                        attempt + 1,
                        self.max_attempts
                    );
                    return Ok(TargetOutcome::success(target.clone(), record));
                }
                Err(e) if e.is_fatal() => {
                    return Err(RunError::Infrastructure(e.to_string()));
                }
                Err(e) => {
                    warn!(
                        "Attempt {}/{} failed for {}: {}",
                        attempt + 1,
                        self.max_attempts,
                        target.url,
                        e
                    );
                    last_error = Some(e);
                    if self.should_retry(attempt) {
                        sleep(self.retry_delay).await;
                    }
                }
            }
        }

        let reason = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "unknown error".to_string());
        Ok(TargetOutcome::failure(target.clone(), reason))
    }

    /// 一次尝试：分配上下文、驱动加载与提取、归还上下文
    async fn attempt<P: ProfilePort>(
        &self,
        port: &P,
        target: &Target,
    ) -> Result<ProfileRecord, ExtractError> {
        let mut ctx = port.allocate(target).await?;
        let result = self.drive(port, &mut ctx).await;
        // 成功、超时还是出错，上下文都必须归还
        port.release(ctx).await;
        result
    }

    async fn drive<P: ProfilePort>(
        &self,
        port: &P,
        ctx: &mut P::Context,
    ) -> Result<ProfileRecord, ExtractError> {
        match port.wait_loaded(ctx, self.load_timeout).await? {
            LoadStatus::Loaded => {}
            // 慢页面的内容可能仍然可用，提取阶段有独立的超时预算
            LoadStatus::TimedOut => debug!("Load wait expired, proceeding to extraction"),
        }

        if !self.render_settle.is_zero() {
            sleep(self.render_settle).await;
        }

        port.extract(ctx, self.extract_timeout).await
    }
}
