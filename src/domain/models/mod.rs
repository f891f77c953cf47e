// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 抓取目标（target）：目标URL及其在原始列表中的位置
/// - 档案记录（record）：详情页字段与目录列表摘要行
/// - 运行状态（run）：运行状态机、计数器和最终报告
pub mod record;
pub mod run;
pub mod target;
