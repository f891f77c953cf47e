// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务实体：
/// - 抓取目标（target）：目录中待访问的单个成员档案
/// - 档案记录（record）：从档案页提取的结构化字段
/// - 运行状态（run）：一次批量抓取的状态与最终报告
///
/// 领域层不依赖于任何外部实现，
/// 体现了纯粹的业务逻辑和业务规则。
pub mod models;
