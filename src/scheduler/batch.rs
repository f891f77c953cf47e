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

use crate::config::settings::ScrapeSettings;
use crate::domain::models::run::{RunReport, RunState, RunStatus};
use crate::domain::models::target::{CompletionEvent, Target, TargetOutcome};
use crate::engines::traits::ProfilePort;
use crate::scheduler::pacer::Pacer;
use crate::scheduler::retry::RetryPolicy;
use crate::utils::errors::RunError;
use futures::future::join_all;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, error, info};

/// 取消句柄
///
/// 由调用方持有，用于请求停止一次运行。取消只在分组边界
/// 生效：在途的尝试会跑完自己的生命周期，已收集的结果全部保留。
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// 请求取消；幂等
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// 批量调度器
///
/// 一次批量抓取运行的核心状态机：持有待处理目标队列，
/// 按并发宽度切分为派发分组，组内全部目标并发交给重试策略，
/// 组间设置屏障并应用限速器的停顿。单个目标的失败不会中止
/// 运行；只有基础设施失败会提前结束运行，且已收集的结果
/// 全部保留在报告中。
///
/// 每个调度器实例最多执行一次运行；再次运行需要新实例，
/// 由此保证不存在跨运行共享的可变状态。
pub struct BatchScheduler<P: ProfilePort> {
    port: Arc<P>,
    retry: RetryPolicy,
    pacer: Pacer,
    batch_size: usize,
    status: Mutex<RunStatus>,
    events: broadcast::Sender<CompletionEvent>,
    cancel: CancelHandle,
}

impl<P: ProfilePort> BatchScheduler<P> {
    pub fn new(port: Arc<P>, settings: &ScrapeSettings) -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            port,
            retry: RetryPolicy::new(settings),
            pacer: Pacer::new(settings),
            batch_size: settings.batch_size.max(1),
            status: Mutex::new(RunStatus::Idle),
            events,
            cancel: CancelHandle::new(),
        }
    }

    /// 订阅目标完成事件
    ///
    /// 通道为至少一次、无序语义：慢消费者可能丢失事件，
    /// 重复投递也可能出现。消费者必须按目标索引幂等处理；
    /// 最终输出只依赖运行报告，不依赖该通道。
    pub fn subscribe(&self) -> broadcast::Receiver<CompletionEvent> {
        self.events.subscribe()
    }

    /// 获取取消句柄
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// 当前运行状态
    pub fn status(&self) -> RunStatus {
        *self.status.lock()
    }

    /// 执行一次批量抓取运行
    ///
    /// 消耗传入的目标列表，分组派发直至全部裁决、被取消或
    /// 遭遇基础设施失败。结果按目标的原始索引排序，与组内
    /// 完成顺序无关。
    ///
    /// # 参数
    ///
    /// * `targets` - 待抓取目标，索引在入队前已经固定
    ///
    /// # 返回值
    ///
    /// * `Ok(RunReport)` - 运行报告（含取消标记和可能的运行级错误）
    /// * `Err(RunError::AlreadyStarted)` - 调度器已被使用过
    pub async fn run(&self, targets: Vec<Target>) -> Result<RunReport, RunError> {
        {
            let mut status = self.status.lock();
            if *status != RunStatus::Idle {
                return Err(RunError::AlreadyStarted);
            }
            *status = RunStatus::Running;
        }

        let total = targets.len();
        let mut state = RunState::new(total);
        let mut slots: BTreeMap<usize, TargetOutcome> = BTreeMap::new();
        let mut cancelled = false;
        let mut run_error: Option<String> = None;

        let groups: Vec<&[Target]> = targets.chunks(self.batch_size).collect();
        let total_groups = groups.len();
        info!(
            "Starting run: {} targets in {} groups of up to {}",
            total, total_groups, self.batch_size
        );

        for (group_index, group) in groups.iter().enumerate() {
            // 取消只在分组边界检查，在途尝试不被打断
            if self.cancel.is_cancelled() {
                cancelled = true;
                info!("Run cancelled before group {}", group_index + 1);
                break;
            }

            debug!(
                "Dispatching group {}/{} ({} targets)",
                group_index + 1,
                total_groups,
                group.len()
            );

            let attempts = group.iter().enumerate().map(|(slot, target)| {
                let retry = self.retry.clone();
                let pacer = self.pacer.clone();
                let port = Arc::clone(&self.port);
                let target = target.clone();
                async move {
                    pacer.wait_slot(slot).await;
                    retry.execute(port.as_ref(), &target).await
                }
            });

            // 组屏障：等整组裁决后才进入下一组
            let resolved = join_all(attempts).await;

            for result in resolved {
                match result {
                    Ok(outcome) => {
                        state.mark_resolved(outcome.target.index, outcome.succeeded());
                        // 没有订阅者时发送失败，通知本就允许丢失
                        let _ = self.events.send(CompletionEvent::from_outcome(&outcome));
                        slots.insert(outcome.target.index, outcome);
                    }
                    Err(e) => {
                        error!("Infrastructure failure, aborting run: {}", e);
                        run_error.get_or_insert(e.to_string());
                    }
                }
            }

            if run_error.is_some() {
                break;
            }

            self.pacer.between_groups(group_index, total_groups).await;
        }

        let final_status = if cancelled {
            RunStatus::Cancelled
        } else {
            RunStatus::Completed
        };
        *self.status.lock() = final_status;

        info!(
            "Run {}: {} succeeded, {} failed, {}/{} resolved",
            final_status,
            state.succeeded,
            state.failed,
            state.resolved_count(),
            total
        );

        Ok(RunReport {
            outcomes: slots.into_values().collect(),
            cancelled,
            error: run_error,
            succeeded: state.succeeded,
            failed: state.failed,
        })
    }
}
