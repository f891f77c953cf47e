// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 批量调度器的端到端行为测试
//!
//! 使用脚本化的MockPort驱动调度器，在暂停的tokio时钟下
//! 验证重试预算、上下文生命周期、分组屏障、取消语义和
//! 结果排序等核心不变量。

use async_trait::async_trait;
use harvestrs::config::settings::ScrapeSettings;
use harvestrs::domain::models::record::ProfileRecord;
use harvestrs::domain::models::run::RunStatus;
use harvestrs::domain::models::target::Target;
use harvestrs::engines::traits::{ExtractError, LoadStatus, ProfilePort};
use harvestrs::output::merge;
use harvestrs::scheduler::batch::BatchScheduler;
use harvestrs::scheduler::progress::ProgressTracker;
use harvestrs::scheduler::retry::RetryPolicy;
use harvestrs::utils::errors::RunError;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// 单次提取尝试的脚本化结果
#[derive(Debug, Clone)]
enum Step {
    Succeed,
    Timeout,
    NoData,
    Transport,
    Fatal,
}

/// 脚本化的提取端口
///
/// 按目标索引回放预设的尝试结果序列（脚本耗尽后默认成功），
/// 并记录上下文的分配/归还次数和分配顺序。
#[derive(Default)]
struct MockPort {
    scripts: Mutex<HashMap<usize, VecDeque<Step>>>,
    extract_delays: HashMap<usize, Duration>,
    allocated: AtomicUsize,
    released: AtomicUsize,
    allocation_order: Mutex<Vec<usize>>,
}

impl MockPort {
    fn script(self, index: usize, steps: &[Step]) -> Self {
        self.scripts
            .lock()
            .insert(index, steps.iter().cloned().collect());
        self
    }

    fn delay(mut self, index: usize, delay: Duration) -> Self {
        self.extract_delays.insert(index, delay);
        self
    }

    fn pairs(&self) -> (usize, usize) {
        (
            self.allocated.load(Ordering::SeqCst),
            self.released.load(Ordering::SeqCst),
        )
    }
}

fn record_for(index: usize) -> ProfileRecord {
    ProfileRecord {
        name: format!("member-{}", index),
        ..Default::default()
    }
}

#[async_trait]
impl ProfilePort for MockPort {
    type Context = usize;

    async fn allocate(&self, target: &Target) -> Result<usize, ExtractError> {
        self.allocated.fetch_add(1, Ordering::SeqCst);
        self.allocation_order.lock().push(target.index);
        Ok(target.index)
    }

    async fn wait_loaded(
        &self,
        _ctx: &mut usize,
        _timeout: Duration,
    ) -> Result<LoadStatus, ExtractError> {
        Ok(LoadStatus::Loaded)
    }

    async fn extract(
        &self,
        ctx: &mut usize,
        _timeout: Duration,
    ) -> Result<ProfileRecord, ExtractError> {
        if let Some(delay) = self.extract_delays.get(ctx) {
            tokio::time::sleep(*delay).await;
        }

        let step = self
            .scripts
            .lock()
            .get_mut(ctx)
            .and_then(|queue| queue.pop_front())
            .unwrap_or(Step::Succeed);

        match step {
            Step::Succeed => Ok(record_for(*ctx)),
            Step::Timeout => Err(ExtractError::Timeout),
            Step::NoData => Err(ExtractError::NoData),
            Step::Transport => Err(ExtractError::Transport("socket closed".to_string())),
            Step::Fatal => Err(ExtractError::Infrastructure("browser gone".to_string())),
        }
    }

    async fn release(&self, _ctx: usize) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

fn scrape_settings(batch_size: usize) -> ScrapeSettings {
    ScrapeSettings {
        batch_size,
        batch_delay_ms: 3000,
        long_break_interval: 15,
        long_break_duration_ms: 15000,
        profile_delay_ms: 2000,
        max_attempts: 3,
        retry_delay_ms: 2000,
        load_timeout_ms: 15000,
        extract_timeout_ms: 12000,
        render_settle_ms: 0,
    }
}

fn targets(count: usize) -> Vec<Target> {
    (0..count)
        .map(|i| Target::new(i, format!("https://example.com/profile/{}", i)))
        .collect()
}

#[tokio::test(start_paused = true)]
async fn always_timing_out_target_exhausts_attempt_budget() {
    let port = MockPort::default().script(0, &[Step::Timeout, Step::Timeout, Step::Timeout]);
    let policy = RetryPolicy::new(&scrape_settings(5));

    let outcome = policy
        .execute(&port, &Target::new(0, "https://example.com/profile/0"))
        .await
        .unwrap();

    assert!(!outcome.succeeded());
    assert_eq!(
        outcome.error.as_deref(),
        Some("Timeout waiting for profile data")
    );
    // 每次尝试都分配并归还一个全新的上下文
    assert_eq!(port.pairs(), (3, 3));
}

#[tokio::test(start_paused = true)]
async fn failed_attempt_is_retried_after_fixed_delay() {
    let port = MockPort::default().script(0, &[Step::NoData, Step::Succeed]);
    let policy = RetryPolicy::new(&scrape_settings(5));

    let start = tokio::time::Instant::now();
    let outcome = policy
        .execute(&port, &Target::new(0, "https://example.com/profile/0"))
        .await
        .unwrap();

    assert!(outcome.succeeded());
    assert_eq!(port.pairs(), (2, 2));
    // 两次尝试之间必须观察到固定的重试间隔
    assert!(start.elapsed() >= Duration::from_millis(2000));
}

#[tokio::test(start_paused = true)]
async fn transport_errors_are_retried_within_budget() {
    let port = MockPort::default().script(0, &[Step::Transport, Step::Transport, Step::Succeed]);
    let policy = RetryPolicy::new(&scrape_settings(5));

    let outcome = policy
        .execute(&port, &Target::new(0, "https://example.com/profile/0"))
        .await
        .unwrap();

    assert!(outcome.succeeded());
    assert_eq!(port.pairs(), (3, 3));
}

#[tokio::test(start_paused = true)]
async fn seven_targets_with_width_five_form_two_groups() {
    let port = Arc::new(MockPort::default());
    let scheduler = BatchScheduler::new(Arc::clone(&port), &scrape_settings(5));

    let report = scheduler.run(targets(7)).await.unwrap();

    assert!(!report.cancelled);
    assert!(report.error.is_none());
    assert_eq!(report.succeeded + report.failed, 7);
    assert_eq!(report.succeeded, 7);
    assert_eq!(scheduler.status(), RunStatus::Completed);

    // 组屏障：第一组(0..5)全部分配完毕后，第二组(5..7)才开始
    let order = port.allocation_order.lock().clone();
    assert_eq!(order.len(), 7);
    let mut first_group: Vec<usize> = order[..5].to_vec();
    first_group.sort_unstable();
    assert_eq!(first_group, vec![0, 1, 2, 3, 4]);
    let mut second_group: Vec<usize> = order[5..].to_vec();
    second_group.sort_unstable();
    assert_eq!(second_group, vec![5, 6]);
}

#[tokio::test(start_paused = true)]
async fn outcomes_are_reported_in_original_order() {
    // 组内完成顺序被人为打乱：0号最慢，1号最快
    let port = Arc::new(
        MockPort::default()
            .delay(0, Duration::from_millis(9000))
            .delay(1, Duration::from_millis(100))
            .delay(2, Duration::from_millis(4000)),
    );
    let scheduler = BatchScheduler::new(Arc::clone(&port), &scrape_settings(3));

    let report = scheduler.run(targets(3)).await.unwrap();

    let indices: Vec<usize> = report.outcomes.iter().map(|o| o.target.index).collect();
    assert_eq!(indices, vec![0, 1, 2]);

    let summary = vec![Default::default(); 3];
    let merged = merge::merge(&summary, &report.outcomes);
    assert_eq!(merged[0].detail.name, "member-0");
    assert_eq!(merged[2].detail.name, "member-2");
}

#[tokio::test(start_paused = true)]
async fn one_failed_target_does_not_abort_the_run() {
    let port = Arc::new(MockPort::default().script(
        1,
        &[Step::Timeout, Step::NoData, Step::Timeout],
    ));
    let scheduler = BatchScheduler::new(Arc::clone(&port), &scrape_settings(2));

    let report = scheduler.run(targets(4)).await.unwrap();

    assert!(report.error.is_none());
    assert_eq!(report.succeeded, 3);
    assert_eq!(report.failed, 1);
    assert_eq!(report.succeeded + report.failed, 4);

    let failed: Vec<usize> = report
        .outcomes
        .iter()
        .filter(|o| !o.succeeded())
        .map(|o| o.target.index)
        .collect();
    assert_eq!(failed, vec![1]);
    assert_eq!(
        report.outcomes[1].error.as_deref(),
        Some("Timeout waiting for profile data")
    );
}

#[tokio::test(start_paused = true)]
async fn cancellation_takes_effect_at_group_boundary() {
    let port = Arc::new(MockPort::default());
    let scheduler = Arc::new(BatchScheduler::new(Arc::clone(&port), &scrape_settings(3)));

    let cancel = scheduler.cancel_handle();
    let mut rx = scheduler.subscribe();
    let watcher = tokio::spawn(async move {
        let mut resolved = 0usize;
        while let Ok(_event) = rx.recv().await {
            resolved += 1;
            if resolved == 3 {
                // 第一组全部裁决后请求取消
                cancel.cancel();
                break;
            }
        }
    });

    let report = scheduler.run(targets(9)).await.unwrap();
    watcher.await.unwrap();

    assert!(report.cancelled);
    assert_eq!(scheduler.status(), RunStatus::Cancelled);

    // 仅第一组被裁决，第二、三组从未派发
    let indices: Vec<usize> = report.outcomes.iter().map(|o| o.target.index).collect();
    assert_eq!(indices, vec![0, 1, 2]);
    assert_eq!(port.allocation_order.lock().len(), 3);
    assert_eq!(report.succeeded + report.failed, 3);
}

#[tokio::test(start_paused = true)]
async fn infrastructure_failure_aborts_run_but_keeps_collected_outcomes() {
    let port = Arc::new(MockPort::default().script(2, &[Step::Fatal]));
    let scheduler = BatchScheduler::new(Arc::clone(&port), &scrape_settings(2));

    let report = scheduler.run(targets(6)).await.unwrap();

    assert!(report.error.is_some());
    assert!(report.error.as_deref().unwrap().contains("browser gone"));
    assert!(!report.cancelled);

    // 第一组和故障组的同组目标保留，后续分组不再派发
    let indices: Vec<usize> = report.outcomes.iter().map(|o| o.target.index).collect();
    assert_eq!(indices, vec![0, 1, 3]);
}

#[tokio::test(start_paused = true)]
async fn duplicate_event_delivery_does_not_skew_progress() {
    let port = Arc::new(MockPort::default().script(
        1,
        &[Step::Timeout, Step::Timeout, Step::Timeout],
    ));
    let scheduler = Arc::new(BatchScheduler::new(Arc::clone(&port), &scrape_settings(2)));
    let tracker = Arc::new(ProgressTracker::new(4));

    let mut rx = scheduler.subscribe();
    let observer = {
        let tracker = Arc::clone(&tracker);
        tokio::spawn(async move {
            while let Ok(event) = rx.recv().await {
                // 模拟传输层的至少一次投递：每个事件处理两遍
                tracker.on_event(&event);
                tracker.on_event(&event);
            }
        })
    };

    let report = scheduler.run(targets(4)).await.unwrap();
    drop(scheduler);
    observer.await.unwrap();

    let snap = tracker.snapshot();
    assert_eq!(snap.resolved, 4);
    assert_eq!(snap.succeeded, report.succeeded);
    assert_eq!(snap.failed, report.failed);
    assert_eq!(snap.succeeded, 3);
    assert_eq!(snap.failed, 1);
}

#[tokio::test(start_paused = true)]
async fn scheduler_is_not_restartable() {
    let port = Arc::new(MockPort::default());
    let scheduler = BatchScheduler::new(Arc::clone(&port), &scrape_settings(2));

    scheduler.run(targets(2)).await.unwrap();
    let second = scheduler.run(targets(2)).await;
    assert!(matches!(second, Err(RunError::AlreadyStarted)));
}

#[tokio::test(start_paused = true)]
async fn empty_target_list_completes_immediately() {
    let port = Arc::new(MockPort::default());
    let scheduler = BatchScheduler::new(Arc::clone(&port), &scrape_settings(5));

    let report = scheduler.run(Vec::new()).await.unwrap();

    assert!(report.outcomes.is_empty());
    assert_eq!(report.succeeded + report.failed, 0);
    assert!(!report.cancelled);
    assert_eq!(scheduler.status(), RunStatus::Completed);
}
