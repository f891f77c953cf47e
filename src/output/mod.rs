// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 输出模块
///
/// 负责抓取结果的收尾：
/// - 合并（merge）：摘要行与详情记录按原始位置合并
/// - CSV导出（csv_sink）：写出带时间戳文件名的CSV文件
pub mod csv_sink;
pub mod merge;
