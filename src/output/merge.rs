// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::record::{ProfileRecord, SummaryRow};
use crate::domain::models::target::TargetOutcome;
use std::collections::HashMap;

/// 合并后的档案行
///
/// 目录摘要与详情记录的并集，即导出文件中的一行。
#[derive(Debug, Clone, Default)]
pub struct MergedProfile {
    pub summary: SummaryRow,
    pub detail: ProfileRecord,
}

impl MergedProfile {
    /// 按导出列顺序展开为字段数组
    pub fn as_row(&self) -> [&str; 20] {
        [
            &self.summary.name,
            &self.summary.profile_link,
            &self.summary.chapter,
            &self.summary.company,
            &self.summary.city,
            &self.summary.industry,
            &self.summary.connect,
            &self.detail.name,
            &self.detail.phone1,
            &self.detail.email,
            &self.detail.website,
            &self.detail.phone2,
            &self.detail.address,
            &self.detail.city,
            &self.detail.postal_code,
            &self.detail.country,
            &self.detail.industry,
            &self.detail.about,
            &self.detail.keywords,
            &self.detail.other,
        ]
        .map(String::as_str)
    }
}

/// 合并摘要行与目标结果
///
/// 以摘要行的位置为准：结果按目标的稳定索引回填，与组内
/// 完成顺序无关。失败或未抓取的行保留摘要信息，详情字段留空。
pub fn merge(summary: &[SummaryRow], outcomes: &[TargetOutcome]) -> Vec<MergedProfile> {
    let by_index: HashMap<usize, &ProfileRecord> = outcomes
        .iter()
        .filter_map(|o| o.record.as_ref().map(|r| (o.target.index, r)))
        .collect();

    summary
        .iter()
        .enumerate()
        .map(|(i, row)| MergedProfile {
            summary: row.clone(),
            detail: by_index.get(&i).map(|r| (*r).clone()).unwrap_or_default(),
        })
        .collect()
}
