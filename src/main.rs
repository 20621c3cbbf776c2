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

use rentflow::application::use_cases::listing_pipeline::ListingPipeline;
use rentflow::config::settings::Settings;
use rentflow::utils::telemetry;
use tracing::info;

/// 主函数
///
/// 读取配置，执行一次抓取-投递运行后退出
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Legacy .env file, real environment takes precedence
    dotenvy::dotenv().ok();

    // 2. Initialize logging
    telemetry::init_telemetry();
    info!("Starting rentflow...");

    // 3. Load configuration
    let settings = Settings::new()?;

    // 4. Run the pipeline once
    let pipeline = ListingPipeline::from_settings(&settings)?;
    let summary = pipeline.run().await?;

    match &summary.report {
        Some(report) => info!(
            "Run {} done: {} listings, {} records, {} delivered, {} timed out, {} failed",
            summary.run_id,
            summary.listings,
            summary.records,
            report.succeeded,
            report.timed_out,
            report.failed
        ),
        None => info!(
            "Run {} done: {} listings, nothing delivered",
            summary.run_id, summary.listings
        ),
    }

    Ok(())
}
