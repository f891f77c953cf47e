// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

/// 运行级错误类型
///
/// 目标级失败不会出现在这里：它们被重试策略折叠为失败的
/// 目标结果。此处只有让整个运行无法继续的错误。
#[derive(Error, Debug)]
pub enum RunError {
    #[error("运行已启动，同一调度器不可重复运行")]
    AlreadyStarted,

    #[error("基础设施错误: {0}")]
    Infrastructure(String),

    #[error("浏览器错误: {0}")]
    Browser(String),

    #[error("导出错误: {0}")]
    Export(#[from] csv::Error),

    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("配置错误: {0}")]
    Config(#[from] config::ConfigError),
}
