// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::BrowserSettings;
use crate::domain::models::record::{ProfileRecord, SummaryRow};
use crate::domain::models::target::Target;
use crate::engines::traits::{ExtractError, LoadStatus, ProfilePort};
use crate::extract::{listing, profile};
use crate::utils::errors::RunError;
use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, info};

// Global browser instance to avoid re-launching Chrome on every attempt.
// Tabs are cheap, browser processes are not.
static BROWSER_INSTANCE: OnceCell<Browser> = OnceCell::const_new();

/// 浏览器引擎
///
/// 基于chromiumoxide实现的档案提取端口。浏览器实例全局共享，
/// 每次尝试分配一个全新的标签页作为执行上下文，用完即关。
pub struct BrowserEngine {
    settings: BrowserSettings,
    render_settle: Duration,
}

/// 一次尝试独占的标签页上下文
pub struct TabContext {
    page: Page,
    url: String,
}

impl BrowserEngine {
    pub fn new(settings: BrowserSettings, render_settle: Duration) -> Self {
        Self {
            settings,
            render_settle,
        }
    }

    /// 获取或初始化共享浏览器实例
    ///
    /// 优先连接配置中的远程调试地址（或`CHROMIUM_REMOTE_DEBUGGING_URL`
    /// 环境变量），否则启动本地Chromium。初始化失败视为基础设施
    /// 错误，对整个运行致命。
    async fn browser(&self) -> Result<&'static Browser, ExtractError> {
        BROWSER_INSTANCE
            .get_or_try_init(|| async {
                let remote_url = self
                    .settings
                    .remote_debugging_url
                    .clone()
                    .or_else(|| std::env::var("CHROMIUM_REMOTE_DEBUGGING_URL").ok());

                let (browser, mut handler) = if let Some(ref url) = remote_url {
                    info!("Connecting to remote Chrome instance at: {}", url);
                    Browser::connect(url).await.map_err(|e| {
                        ExtractError::Infrastructure(format!(
                            "Failed to connect to remote Chrome: {}",
                            e
                        ))
                    })?
                } else {
                    let builder = BrowserConfig::builder()
                        .no_sandbox()
                        .request_timeout(Duration::from_secs(self.settings.request_timeout_secs))
                        .arg("--disable-gpu")
                        .arg("--disable-dev-shm-usage");

                    Browser::launch(
                        builder
                            .build()
                            .map_err(|e| ExtractError::Infrastructure(e.to_string()))?,
                    )
                    .await
                    .map_err(|e| ExtractError::Infrastructure(e.to_string()))?
                };

                // Drain browser events so the CDP connection stays alive
                tokio::spawn(async move {
                    while let Some(h) = handler.next().await {
                        if h.is_err() {
                            break;
                        }
                    }
                });

                Ok(browser)
            })
            .await
    }

    /// 抓取目录列表页
    ///
    /// 打开列表页，等待客户端渲染，提取成员摘要行和档案链接。
    /// 列表页失败没有可用的目标集合，直接视为运行级错误。
    ///
    /// # 参数
    ///
    /// * `url` - 目录列表页地址
    ///
    /// # 返回值
    ///
    /// 摘要行（与页面顺序一致）和待抓取目标（仅含有链接的行）
    pub async fn fetch_listing(&self, url: &str) -> Result<(Vec<SummaryRow>, Vec<Target>), RunError> {
        let browser = self
            .browser()
            .await
            .map_err(|e| RunError::Infrastructure(e.to_string()))?;

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| RunError::Browser(e.to_string()))?;

        let result = self.read_listing(&page, url).await;

        if let Err(e) = page.close().await {
            debug!("Listing page already closed: {}", e);
        }

        result
    }

    async fn read_listing(
        &self,
        page: &Page,
        url: &str,
    ) -> Result<(Vec<SummaryRow>, Vec<Target>), RunError> {
        page.goto(url)
            .await
            .map_err(|e| RunError::Browser(e.to_string()))?;

        // 列表由客户端渲染，等页面安定下来再读DOM
        tokio::time::sleep(self.render_settle).await;

        let html = page
            .content()
            .await
            .map_err(|e| RunError::Browser(e.to_string()))?;

        Ok(listing::parse(&html))
    }
}

#[async_trait]
impl ProfilePort for BrowserEngine {
    type Context = TabContext;

    /// 为目标打开一个全新的后台标签页
    ///
    /// 失败的上下文可能已经损坏，因此每次尝试都分配新页面，
    /// 绝不复用。浏览器本身不可用属于基础设施错误。
    async fn allocate(&self, target: &Target) -> Result<TabContext, ExtractError> {
        let browser = self.browser().await?;
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| ExtractError::Transport(e.to_string()))?;

        Ok(TabContext {
            page,
            url: target.url.clone(),
        })
    }

    /// 导航到档案页并等待加载完成
    ///
    /// 加载等待超时不算失败：慢页面的内容可能仍然可用，
    /// 提取阶段有自己的超时预算。
    async fn wait_loaded(
        &self,
        ctx: &mut TabContext,
        timeout: Duration,
    ) -> Result<LoadStatus, ExtractError> {
        match tokio::time::timeout(timeout, ctx.page.goto(ctx.url.as_str())).await {
            Ok(Ok(_)) => Ok(LoadStatus::Loaded),
            Ok(Err(e)) => Err(ExtractError::Transport(e.to_string())),
            Err(_) => Ok(LoadStatus::TimedOut),
        }
    }

    /// 读取页面内容并提取档案字段
    async fn extract(
        &self,
        ctx: &mut TabContext,
        timeout: Duration,
    ) -> Result<ProfileRecord, ExtractError> {
        let html = tokio::time::timeout(timeout, ctx.page.content())
            .await
            .map_err(|_| ExtractError::Timeout)?
            .map_err(|e| ExtractError::Transport(e.to_string()))?;

        profile::parse(&html)
    }

    /// 关闭标签页
    ///
    /// 每次尝试结束都必须归还标签页，防止页面堆积。
    /// 标签页可能已被浏览器回收，关闭失败只记录日志。
    async fn release(&self, ctx: TabContext) {
        if let Err(e) = ctx.page.close().await {
            debug!("Tab already closed or removed: {}", e);
        }
    }
}
