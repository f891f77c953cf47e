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

use anyhow::Context;
use harvestrs::config::settings::Settings;
use harvestrs::engines::browser_engine::BrowserEngine;
use harvestrs::extract::filters;
use harvestrs::output::csv_sink::CsvSink;
use harvestrs::output::merge;
use harvestrs::scheduler::batch::BatchScheduler;
use harvestrs::scheduler::progress::ProgressTracker;
use harvestrs::utils::telemetry;
use std::sync::Arc;
use tracing::{info, warn};

/// 主函数
///
/// 应用程序入口点：读取目录列表页，批量抓取成员档案，
/// 合并后导出CSV文件
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting harvestrs...");

    // 2. Load configuration
    let settings = Settings::new().context("Failed to load configuration")?;

    let listing_url = std::env::args()
        .nth(1)
        .context("Usage: harvestrs <listing-url>")?;

    // 3. Initialize browser engine and fetch the directory listing
    let engine = Arc::new(BrowserEngine::new(
        settings.browser.clone(),
        settings.scrape.render_settle(),
    ));
    let (summary, targets) = engine.fetch_listing(&listing_url).await?;
    info!(
        "Found {} profiles on listing page ({} with profile links)",
        summary.len(),
        targets.len()
    );
    if targets.is_empty() {
        warn!("No profile links found, nothing to scrape");
        return Ok(());
    }

    // 4. Set up the scheduler, progress observer and Ctrl-C cancellation
    let scheduler = BatchScheduler::new(Arc::clone(&engine), &settings.scrape);
    let tracker = Arc::new(ProgressTracker::new(targets.len()));
    tokio::spawn(Arc::clone(&tracker).consume(scheduler.subscribe()));

    let cancel = scheduler.cancel_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Cancellation requested, finishing current group...");
            cancel.cancel();
        }
    });

    // 5. Run the batch scrape
    let report = scheduler.run(targets).await?;
    if let Some(ref error) = report.error {
        warn!("Run aborted early: {}", error);
    }
    info!(
        "Scraping finished: {} succeeded, {} failed, cancelled: {}",
        report.succeeded, report.failed, report.cancelled
    );

    // 6. Merge with the listing summary and export
    let rows = merge::merge(&summary, &report.outcomes);
    let filter = filters::filter_keyword(&listing_url);
    let sink = CsvSink::new(&settings.output);
    let path = sink.export(&rows, &filter)?;
    info!("Done. Results saved to {}", path.display());

    Ok(())
}
