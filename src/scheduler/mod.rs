// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 调度模块
///
/// 批量抓取的核心编排，包括：
/// - 批量调度器（batch）：分组并发派发与运行状态机
/// - 重试策略（retry）：单目标的尝试预算与上下文生命周期
/// - 限速器（pacer）：组内起步间隔、组间等待和周期性长休眠
/// - 进度统计（progress）：幂等的完成计数与ETA估算
pub mod batch;
pub mod pacer;
pub mod progress;
pub mod retry;
