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

use listrs::config::settings::Settings;
use listrs::domain::services::listing_resolver::ListingResolver;
use listrs::engines::chromium_session::ChromiumSession;
use listrs::infrastructure::sheets_ledger::SheetsLedger;
use listrs::utils::telemetry;
use listrs::workers::BatchPipeline;
use std::sync::Arc;
use tracing::{info, warn};

/// 主函数
///
/// 加载配置，连接账本，启动浏览器，然后跑完一轮批处理流水线
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting listrs...");

    // 2. Load configuration
    let settings = Settings::new()?;
    settings.validate()?;
    info!("Configuration loaded");

    // 3. Connect to the ledger
    let ledger = Arc::new(SheetsLedger::new(&settings.ledger)?);
    info!(
        "Using worksheet '{}' of spreadsheet {}",
        settings.ledger.worksheet, settings.ledger.spreadsheet_id
    );

    // 4. Launch the browser
    let session = ChromiumSession::launch(&settings.browser, settings.poll_interval()).await?;
    info!("Browser session ready");

    // 5. Run the pipeline
    let resolver = ListingResolver::new(
        session,
        settings.extraction_schema(),
        settings.contact_probe(),
        settings.resolver_timings(),
    );
    let mut pipeline = BatchPipeline::new(ledger, resolver, settings.pipeline_options());
    let outcome = pipeline.run().await;

    // 6. Release the browser whatever the outcome
    if let Err(e) = pipeline.into_resolver().into_session().close().await {
        warn!("Failed to close browser: {}", e);
    }

    let summary = outcome?;
    info!(
        "All listings processed: {} done, {} failed, {} skipped",
        summary.done, summary.failed, summary.skipped
    );
    Ok(())
}
