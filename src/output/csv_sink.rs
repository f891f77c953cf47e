// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::OutputSettings;
use crate::output::merge::MergedProfile;
use crate::utils::errors::RunError;
use chrono::Local;
use std::path::{Path, PathBuf};
use tracing::info;

/// 导出文件的列头
pub const HEADERS: [&str; 20] = [
    "NAME",
    "PROFILE LINK",
    "CHAPTER",
    "COMPANY",
    "CITY",
    "INDUSTRY TAG",
    "CONNECT",
    "DETAILED NAME",
    "PHONE NO",
    "EMAIL",
    "WEBSITE",
    "PHONE NO 2",
    "ADDRESS",
    "DETAILED CITY",
    "POSTAL CODE",
    "COUNTRY",
    "DETAILED INDUSTRY",
    "ABOUT",
    "KEYWORD",
    "OTHER",
];

/// CSV输出槽
///
/// 接收合并后的有序档案行并写出CSV文件。文件名由前缀、
/// 过滤器关键词和秒级时间戳组成，保证同目录下不会互相覆盖。
pub struct CsvSink {
    dir: PathBuf,
    prefix: String,
}

impl CsvSink {
    pub fn new(settings: &OutputSettings) -> Self {
        Self {
            dir: PathBuf::from(&settings.dir),
            prefix: settings.prefix.clone(),
        }
    }

    /// 生成导出文件名：`<前缀>-<关键词>-<yyyymmdd-HHMMSS>.csv`
    pub fn filename(&self, filter: &str) -> String {
        format!(
            "{}-{}-{}.csv",
            self.prefix,
            filter,
            Local::now().format("%Y%m%d-%H%M%S")
        )
    }

    /// 导出档案行
    ///
    /// # 参数
    ///
    /// * `rows` - 按原始位置排序的合并档案行
    /// * `filter` - 文件名中的过滤器关键词
    ///
    /// # 返回值
    ///
    /// 写出的文件完整路径
    pub fn export(&self, rows: &[MergedProfile], filter: &str) -> Result<PathBuf, RunError> {
        let path = self.dir.join(self.filename(filter));
        self.write_to(rows, &path)?;
        info!("Exported {} profiles to {}", rows.len(), path.display());
        Ok(path)
    }

    fn write_to(&self, rows: &[MergedProfile], path: &Path) -> Result<(), RunError> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(HEADERS)?;
        for row in rows {
            writer.write_record(row.as_row())?;
        }
        writer.flush()?;
        Ok(())
    }
}
