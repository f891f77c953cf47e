// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 提取模块
///
/// 该模块是面向目标站点的DOM提取胶水层，包括：
/// - 列表提取（listing）：目录列表页的成员摘要行和档案链接
/// - 档案提取（profile）：详情页的联系方式等结构化字段
/// - 过滤器提取（filters）：从列表URL推导导出文件名关键词
pub mod filters;
pub mod listing;
pub mod profile;
