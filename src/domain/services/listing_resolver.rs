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

use chrono::Local;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

use crate::domain::models::listing::{CanonicalRecord, ContactInfo};
use crate::domain::schema::{columns, ExtractionSchema};
use crate::domain::services::contact_probe::ContactProbe;
use crate::domain::services::field_extractors::{
    extract_min_unit_size, extract_price, ExtractError,
};
use crate::domain::services::normalizer::normalize;
use crate::domain::services::pair_scanner::{PairScanner, SpanPairScanner};
use crate::engines::traits::{Locator, RenderError, RenderSession, WaitCondition};

pub const SCROLL_TO_BOTTOM: &str = "window.scrollTo(0, document.body.scrollHeight);";
pub const SCROLL_TO_TOP: &str = "window.scrollTo(0, 0);";

/// 解析错误类型
///
/// 单个房源的硬失败，流水线据此把该行标记为 Failed 并继续处理下一行
#[derive(Error, Debug)]
pub enum ResolveError {
    /// 页面在超时时间内未就绪
    #[error("Listing did not become ready within {0:?}")]
    ReadinessTimeout(Duration),
    /// 导航失败
    #[error("Navigation failed: {0}")]
    Navigation(#[source] RenderError),
}

/// 解析器时序
#[derive(Debug, Clone)]
pub struct ResolverTimings {
    /// 就绪等待超时
    pub ready_timeout: Duration,
    /// 就绪后的初始停顿
    pub settle_initial: Duration,
    /// 滚动到底部后的停顿
    pub settle_after_bottom: Duration,
    /// 滚动回顶部后的停顿
    pub settle_after_top: Duration,
}

impl Default for ResolverTimings {
    fn default() -> Self {
        Self {
            ready_timeout: Duration::from_secs(40),
            settle_initial: Duration::from_secs(5),
            settle_after_bottom: Duration::from_secs(3),
            settle_after_top: Duration::from_secs(2),
        }
    }
}

/// 房源解析器
///
/// 编排单个URL的处理：导航、等待就绪、稳定页面、运行各提取器、合并结果并打上时间戳。
/// 状态流转：Navigating → WaitingForReady → (Ready | ReadyTimeout)
pub struct ListingResolver<S: RenderSession> {
    session: S,
    scanner: Box<dyn PairScanner>,
    schema: ExtractionSchema,
    contact_probe: ContactProbe,
    timings: ResolverTimings,
}

impl<S: RenderSession> ListingResolver<S> {
    /// 创建解析器，使用默认的span对扫描器
    pub fn new(
        session: S,
        schema: ExtractionSchema,
        contact_probe: ContactProbe,
        timings: ResolverTimings,
    ) -> Self {
        let scanner = Box::new(SpanPairScanner::new(schema.noise_labels.clone()));
        Self {
            session,
            scanner,
            schema,
            contact_probe,
            timings,
        }
    }

    /// 替换标签/值扫描器
    pub fn with_scanner(mut self, scanner: Box<dyn PairScanner>) -> Self {
        self.scanner = scanner;
        self
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut S {
        &mut self.session
    }

    pub fn into_session(self) -> S {
        self.session
    }

    /// 解析单个房源
    ///
    /// # 返回值
    ///
    /// * `Ok(CanonicalRecord)` - 规范记录，提取器失败只会让对应字段缺失
    /// * `Err(ResolveError)` - 导航失败或页面未就绪
    #[instrument(skip(self))]
    pub async fn resolve(&mut self, url: &str) -> Result<CanonicalRecord, ResolveError> {
        // Navigating
        self.session
            .navigate(url)
            .await
            .map_err(ResolveError::Navigation)?;

        // WaitingForReady
        let ready = Locator::text(self.schema.currency_marker.clone());
        if let Err(e) = self
            .session
            .wait_until(&ready, WaitCondition::Present, self.timings.ready_timeout)
            .await
        {
            warn!("Failed to load {}: {}", url, e);
            return Err(ResolveError::ReadinessTimeout(self.timings.ready_timeout));
        }

        // Ready
        self.settle().await;

        let (raw, price, min_size) = match self.session.snapshot().await {
            Ok(page) => (
                self.scanner.scan(&page),
                degrade("price", extract_price(&page, &self.schema)),
                degrade("min unit size", extract_min_unit_size(&page, &self.schema)),
            ),
            Err(e) => {
                debug!("Snapshot failed, extracting nothing from page: {}", e);
                (HashMap::new(), String::new(), String::new())
            }
        };

        let contact = self.contact_probe.probe(&mut self.session).await;

        let record = CanonicalRecord {
            fields: merge(normalize(&raw, &self.schema.field_map), price, min_size, contact),
            scraped_at: Local::now(),
        };
        info!("Resolved {} fields from {}", record.fields.len(), url);
        Ok(record)
    }

    /// 稳定页面：停顿、滚动到底部、停顿、滚动回顶部、停顿，让懒加载内容出现
    async fn settle(&mut self) {
        sleep(self.timings.settle_initial).await;
        if let Err(e) = self.session.execute(SCROLL_TO_BOTTOM).await {
            debug!("Scroll to bottom failed: {}", e);
        }
        sleep(self.timings.settle_after_bottom).await;
        if let Err(e) = self.session.execute(SCROLL_TO_TOP).await {
            debug!("Scroll to top failed: {}", e);
        }
        sleep(self.timings.settle_after_top).await;
    }
}

fn degrade(field: &str, result: Result<String, ExtractError>) -> String {
    result.unwrap_or_else(|e| {
        debug!("No {} extracted: {}", field, e);
        String::new()
    })
}

/// 合并规范字段与专用提取器输出，非空值覆盖或新增对应列
pub fn merge(
    mut fields: HashMap<String, String>,
    price: String,
    min_size: String,
    contact: ContactInfo,
) -> HashMap<String, String> {
    let extracted = [
        (columns::PRICE, price),
        (columns::MARLA_SIZE, min_size),
        (columns::AGENT_NAME, contact.agent),
        (columns::AGENCY_NAME, contact.agency),
        (columns::PHONE_NUMBER, contact.phone),
    ];
    for (column, value) in extracted {
        if !value.is_empty() {
            fields.insert(column.to_string(), value);
        }
    }
    fields
}
