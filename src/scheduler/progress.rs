// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::run::RunState;
use crate::domain::models::target::CompletionEvent;
use crate::utils::time_format::format_duration_secs;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::time::Instant;
use tracing::{info, warn};

/// 进度快照
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSnapshot {
    /// 已裁决目标数
    pub resolved: usize,
    /// 成功数
    pub succeeded: usize,
    /// 失败数
    pub failed: usize,
    /// 目标总数
    pub total: usize,
    /// 平均每目标耗时（秒）；尚无完成目标时为None
    pub average_secs: Option<f64>,
    /// 预计剩余时间（秒）
    pub eta_secs: Option<f64>,
}

/// 进度统计器
///
/// 消费目标完成事件并维护运行计数与耗时统计。通知通道是
/// 至少一次语义，同一目标的事件可能重复到达，因此内部以
/// 目标索引为键去重：检查与标记在同一把锁下完成，重复事件
/// 不会改变任何计数器。计数器在运行内单调递增，绝不回退。
pub struct ProgressTracker {
    state: Mutex<RunState>,
    started: Instant,
}

impl ProgressTracker {
    pub fn new(total: usize) -> Self {
        Self {
            state: Mutex::new(RunState::new(total)),
            started: Instant::now(),
        }
    }

    /// 处理一个完成事件
    ///
    /// # 返回值
    ///
    /// 首次见到该目标时返回true；重复事件返回false且不产生任何影响
    pub fn on_event(&self, event: &CompletionEvent) -> bool {
        let mut state = self.state.lock();
        state.mark_resolved(event.target_index, event.succeeded)
    }

    /// 当前进度快照
    pub fn snapshot(&self) -> ProgressSnapshot {
        let state = self.state.lock();
        let resolved = state.resolved_count();
        let elapsed = self.started.elapsed().as_secs_f64();
        let average_secs = (resolved > 0).then(|| elapsed / resolved as f64);
        let eta_secs =
            average_secs.map(|avg| (avg * (state.total - resolved) as f64).max(0.0));

        ProgressSnapshot {
            resolved,
            succeeded: state.succeeded,
            failed: state.failed,
            total: state.total,
            average_secs,
            eta_secs,
        }
    }

    /// 消费事件通道直至其关闭，按唯一完成输出进度日志
    ///
    /// 通道滞后造成的丢失只影响日志展示，不影响最终输出的正确性。
    pub async fn consume(self: Arc<Self>, mut rx: broadcast::Receiver<CompletionEvent>) {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    if self.on_event(&event) {
                        let snap = self.snapshot();
                        let eta = snap
                            .eta_secs
                            .map(format_duration_secs)
                            .unwrap_or_else(|| "--".to_string());
                        info!(
                            "Profile {}/{} {} ({} ok, {} failed, avg {:.1}s, eta {})",
                            snap.resolved,
                            snap.total,
                            if event.succeeded { "done" } else { "failed" },
                            snap.succeeded,
                            snap.failed,
                            snap.average_secs.unwrap_or(0.0),
                            eta
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!("Progress channel lagged, {} events dropped", n);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }
}
