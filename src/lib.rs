// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含核心业务实体：抓取目标、档案记录、运行状态
pub mod domain;

/// 引擎模块
///
/// 实现基于浏览器的档案抓取端口
pub mod engines;

/// 提取模块
///
/// 负责从页面DOM中提取结构化字段
pub mod extract;

/// 输出模块
///
/// 负责结果合并与CSV导出
pub mod output;

/// 调度模块
///
/// 实现批量抓取的核心编排：分组并发、重试、限速、进度统计
pub mod scheduler;

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
pub mod utils;
