// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::ScrapeSettings;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

/// 限速器
///
/// 对远端服务器的纯粹节奏控制：组内相邻目标错开起步，
/// 组间固定等待，每处理N个分组后进行一次长休眠以避免
/// 触发远端封锁。限速器只按派发计数工作，不感知成功与失败。
#[derive(Debug, Clone)]
pub struct Pacer {
    /// 组内相邻目标的起步间隔
    slot_spacing: Duration,
    /// 组间等待时间
    group_delay: Duration,
    /// 每处理N个分组后长休眠
    long_break_interval: usize,
    /// 长休眠持续时间
    long_break: Duration,
}

impl Pacer {
    pub fn new(settings: &ScrapeSettings) -> Self {
        Self {
            slot_spacing: Duration::from_millis(settings.profile_delay_ms),
            group_delay: Duration::from_millis(settings.batch_delay_ms),
            long_break_interval: settings.long_break_interval.max(1),
            long_break: Duration::from_millis(settings.long_break_duration_ms),
        }
    }

    /// 等待分组内第`slot`个目标的起步时刻
    ///
    /// 同组目标并发在途，但起步按`slot_spacing`错开，
    /// 保证对远端的请求间隔不低于配置值。
    pub async fn wait_slot(&self, slot: usize) {
        if slot > 0 {
            sleep(self.slot_spacing * slot as u32).await;
        }
    }

    /// 计算刚完成的分组之后需要的停顿
    ///
    /// 最后一个分组之后不再停顿；每完成`long_break_interval`
    /// 个分组后停顿升级为长休眠。
    pub fn pause_after(&self, group_index: usize, total_groups: usize) -> Option<Duration> {
        let completed = group_index + 1;
        if completed >= total_groups {
            return None;
        }
        if completed % self.long_break_interval == 0 {
            Some(self.long_break)
        } else {
            Some(self.group_delay)
        }
    }

    /// 在分组之间挂起调用方
    pub async fn between_groups(&self, group_index: usize, total_groups: usize) {
        if let Some(pause) = self.pause_after(group_index, total_groups) {
            if pause >= self.long_break {
                info!(
                    "Taking extended break ({}s) to avoid rate limits",
                    pause.as_secs()
                );
            } else {
                debug!("Waiting {}ms before next group", pause.as_millis());
            }
            sleep(pause).await;
        }
    }
}
