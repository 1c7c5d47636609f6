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

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

use crate::domain::schema::{ExtractionSchema, FieldMap};
use crate::domain::services::contact_probe::ContactProbe;
use crate::domain::services::listing_resolver::ResolverTimings;
use crate::workers::pipeline::PipelineOptions;

/// 应用程序配置设置
///
/// 包含账本存储、浏览器、时序和提取规则等所有配置项
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// 账本存储配置
    pub ledger: LedgerSettings,
    /// 浏览器配置
    pub browser: BrowserSettings,
    /// 等待与节奏配置
    pub timing: TimingSettings,
    /// 提取规则配置
    pub extraction: ExtractionSettings,
}

/// 账本存储配置设置
#[derive(Debug, Deserialize)]
pub struct LedgerSettings {
    /// 表格ID
    pub spreadsheet_id: String,
    /// 工作表名称
    pub worksheet: String,
    /// OAuth访问令牌
    pub access_token: String,
    /// API基础地址
    pub api_base: String,
}

/// 浏览器配置设置
#[derive(Debug, Deserialize)]
pub struct BrowserSettings {
    /// 远程调试地址，设置后不再启动本地浏览器
    pub remote_debugging_url: Option<String>,
    /// 浏览器用户数据目录
    pub user_data_dir: Option<String>,
    /// 是否无头模式
    pub headless: bool,
    /// 是否禁用沙箱
    pub no_sandbox: bool,
    /// CDP请求超时时间（秒）
    pub request_timeout_secs: u64,
}

/// 时序配置设置
#[derive(Debug, Deserialize)]
pub struct TimingSettings {
    /// 页面就绪等待超时（秒）
    pub ready_timeout_secs: u64,
    /// 联系方式按钮等待超时（秒）
    pub reveal_timeout_secs: u64,
    /// 电话链接等待超时（秒）
    pub phone_timeout_secs: u64,
    /// 点击联系方式按钮后的停顿（秒）
    pub reveal_pause_secs: u64,
    /// 就绪后的初始停顿（秒）
    pub settle_initial_secs: u64,
    /// 滚动到底部后的停顿（秒）
    pub settle_after_bottom_secs: u64,
    /// 滚动回顶部后的停顿（秒）
    pub settle_after_top_secs: u64,
    /// 每条记录之间的间隔（秒）
    pub pacing_secs: u64,
    /// 等待条件轮询间隔（毫秒）
    pub poll_interval_ms: u64,
}

/// 提取规则配置设置
#[derive(Debug, Deserialize)]
pub struct ExtractionSettings {
    /// 货币标记
    pub currency_marker: String,
    /// 面积单位关键字
    pub unit_keyword: String,
    /// 价格量级词
    pub magnitude_words: Vec<String>,
    /// 噪声标签子串
    pub noise_labels: Vec<String>,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次加载默认值、`config/default`、`config/{APP_ENVIRONMENT}` 和 `LISTRS__` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("LISTRS").separator("__"));

        builder.build()?.try_deserialize()
    }

    /// 只包含内置默认值的配置构建器，不读取文件和环境变量
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            // Ledger
            .set_default("ledger.spreadsheet_id", "")?
            .set_default("ledger.worksheet", "Zameen_Listings_Tracker")?
            .set_default("ledger.access_token", "")?
            .set_default("ledger.api_base", "https://sheets.googleapis.com")?
            // Browser
            .set_default("browser.headless", false)?
            .set_default("browser.no_sandbox", false)?
            .set_default("browser.request_timeout_secs", 30)?
            // Timing
            .set_default("timing.ready_timeout_secs", 40)?
            .set_default("timing.reveal_timeout_secs", 10)?
            .set_default("timing.phone_timeout_secs", 10)?
            .set_default("timing.reveal_pause_secs", 2)?
            .set_default("timing.settle_initial_secs", 5)?
            .set_default("timing.settle_after_bottom_secs", 3)?
            .set_default("timing.settle_after_top_secs", 2)?
            .set_default("timing.pacing_secs", 8)?
            .set_default("timing.poll_interval_ms", 250)?
            // Extraction
            .set_default("extraction.currency_marker", "PKR")?
            .set_default("extraction.unit_keyword", "Marla")?
            .set_default(
                "extraction.magnitude_words",
                vec!["Lakh", "Crore", "Million", "Thousand"],
            )?
            .set_default("extraction.noise_labels", vec!["months ago", "%", "Scheme"])
    }

    /// 仅由内置默认值构造配置
    pub fn from_defaults() -> Result<Self, ConfigError> {
        Self::defaults()?.build()?.try_deserialize()
    }

    /// 校验运行流水线所必需的配置项
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ledger.spreadsheet_id.trim().is_empty() {
            return Err(ConfigError::Message(
                "ledger.spreadsheet_id must be set".to_string(),
            ));
        }
        if self.ledger.access_token.trim().is_empty() {
            return Err(ConfigError::Message(
                "ledger.access_token must be set".to_string(),
            ));
        }
        Ok(())
    }

    /// 等待条件的轮询间隔
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.timing.poll_interval_ms)
    }

    /// 解析器时序
    pub fn resolver_timings(&self) -> ResolverTimings {
        ResolverTimings {
            ready_timeout: Duration::from_secs(self.timing.ready_timeout_secs),
            settle_initial: Duration::from_secs(self.timing.settle_initial_secs),
            settle_after_bottom: Duration::from_secs(self.timing.settle_after_bottom_secs),
            settle_after_top: Duration::from_secs(self.timing.settle_after_top_secs),
        }
    }

    /// 联系方式探测器
    pub fn contact_probe(&self) -> ContactProbe {
        ContactProbe {
            reveal_timeout: Duration::from_secs(self.timing.reveal_timeout_secs),
            phone_timeout: Duration::from_secs(self.timing.phone_timeout_secs),
            reveal_pause: Duration::from_secs(self.timing.reveal_pause_secs),
            ..ContactProbe::default()
        }
    }

    /// 提取模式，字段映射使用内置默认值
    pub fn extraction_schema(&self) -> ExtractionSchema {
        ExtractionSchema {
            field_map: FieldMap::default(),
            noise_labels: self.extraction.noise_labels.clone(),
            currency_marker: self.extraction.currency_marker.clone(),
            magnitude_words: self.extraction.magnitude_words.clone(),
            unit_keyword: self.extraction.unit_keyword.clone(),
        }
    }

    /// 流水线选项
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            pacing: Duration::from_secs(self.timing.pacing_secs),
        }
    }
}
