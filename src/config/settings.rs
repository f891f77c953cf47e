// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// 应用程序配置设置
///
/// 包含浏览器、抓取节奏/重试和输出等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 浏览器配置
    pub browser: BrowserSettings,
    /// 抓取配置
    pub scrape: ScrapeSettings,
    /// 输出配置
    pub output: OutputSettings,
}

/// 浏览器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserSettings {
    /// 远程调试地址（为空时启动本地Chromium实例）
    pub remote_debugging_url: Option<String>,
    /// CDP请求超时时间（秒）
    pub request_timeout_secs: u64,
}

/// 抓取配置设置
///
/// 控制批量抓取的节奏、并发宽度和重试预算
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeSettings {
    /// 每个分组的并发宽度
    pub batch_size: usize,
    /// 分组之间的等待时间（毫秒）
    pub batch_delay_ms: u64,
    /// 每处理N个分组后进行一次长休眠
    pub long_break_interval: usize,
    /// 长休眠持续时间（毫秒）
    pub long_break_duration_ms: u64,
    /// 分组内相邻目标启动的最小间隔（毫秒）
    pub profile_delay_ms: u64,
    /// 单个目标的最大尝试次数（含首次）
    pub max_attempts: u32,
    /// 两次尝试之间的等待时间（毫秒）
    pub retry_delay_ms: u64,
    /// 页面加载超时时间（毫秒）
    pub load_timeout_ms: u64,
    /// 字段提取超时时间（毫秒）
    pub extract_timeout_ms: u64,
    /// 页面加载后等待客户端渲染的时间（毫秒）
    pub render_settle_ms: u64,
}

/// 输出配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct OutputSettings {
    /// 导出文件目录
    pub dir: String,
    /// 导出文件名前缀
    pub prefix: String,
}

impl ScrapeSettings {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout_ms)
    }

    pub fn extract_timeout(&self) -> Duration {
        Duration::from_millis(self.extract_timeout_ms)
    }

    pub fn render_settle(&self) -> Duration {
        Duration::from_millis(self.render_settle_ms)
    }
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从配置文件和环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Default browser settings
            .set_default("browser.request_timeout_secs", 30)?
            // Default scrape pacing settings
            .set_default("scrape.batch_size", 5)?
            .set_default("scrape.batch_delay_ms", 3000)?
            .set_default("scrape.long_break_interval", 15)?
            .set_default("scrape.long_break_duration_ms", 15000)?
            .set_default("scrape.profile_delay_ms", 2000)?
            // Default retry settings
            .set_default("scrape.max_attempts", 3)?
            .set_default("scrape.retry_delay_ms", 2000)?
            .set_default("scrape.load_timeout_ms", 15000)?
            .set_default("scrape.extract_timeout_ms", 12000)?
            .set_default("scrape.render_settle_ms", 2000)?
            // Default output settings
            .set_default("output.dir", ".")?
            .set_default("output.prefix", "BNI")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("HARVESTRS").separator("__"));

        builder.build()?.try_deserialize()
    }
}
