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

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::domain::models::listing::CanonicalRecord;
use crate::domain::models::work_item::{WorkItem, WorkStatus};
use crate::domain::repositories::ledger_store::{column_index, LedgerError, LedgerStore};
use crate::domain::schema::columns;
use crate::domain::services::listing_resolver::ListingResolver;
use crate::engines::traits::RenderSession;

/// 流水线错误类型
#[derive(Error, Debug)]
pub enum PipelineError {
    /// 账本读写失败，终止本轮运行
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

/// 流水线选项
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// 每处理完一条记录后的间隔
    pub pacing: Duration,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            pacing: Duration::from_secs(8),
        }
    }
}

/// 运行统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// 快照中的行数
    pub total: usize,
    /// 完成的行数
    pub done: usize,
    /// 失败的行数
    pub failed: usize,
    /// 跳过的行数（空URL或已完成）
    pub skipped: usize,
}

impl RunSummary {
    /// 实际调用解析器的行数
    pub fn processed(&self) -> usize {
        self.done + self.failed
    }
}

/// 可恢复的批处理流水线
///
/// 在启动时对账本做一次快照，按顺序处理每个工作项。每行处理完成后立即写回，
/// 写回即检查点：下一轮运行会跳过 Done 的行，重新处理 Failed 的行。
pub struct BatchPipeline<L, S>
where
    L: LedgerStore,
    S: RenderSession,
{
    ledger: Arc<L>,
    resolver: ListingResolver<S>,
    options: PipelineOptions,
}

impl<L, S> BatchPipeline<L, S>
where
    L: LedgerStore,
    S: RenderSession,
{
    /// 创建新的流水线实例
    pub fn new(ledger: Arc<L>, resolver: ListingResolver<S>, options: PipelineOptions) -> Self {
        Self {
            ledger,
            resolver,
            options,
        }
    }

    pub fn into_resolver(self) -> ListingResolver<S> {
        self.resolver
    }

    /// 运行一轮流水线直到快照耗尽
    ///
    /// # 返回值
    ///
    /// * `Ok(RunSummary)` - 本轮运行统计
    /// * `Err(PipelineError)` - 账本读写失败
    pub async fn run(&mut self) -> Result<RunSummary, PipelineError> {
        let snapshot = self.ledger.snapshot().await?;
        info!("Rows in ledger: {}", snapshot.items.len());

        let mut summary = RunSummary {
            total: snapshot.items.len(),
            ..RunSummary::default()
        };

        for item in &snapshot.items {
            if !item.is_eligible() {
                summary.skipped += 1;
                continue;
            }

            info!("Scraping: {}", item.url);
            match self.resolver.resolve(&item.url).await {
                Ok(record) => {
                    self.commit_done(item, &record).await?;
                    summary.done += 1;
                }
                Err(e) => {
                    warn!("Row {} failed: {}", item.row_index, e);
                    self.commit_failed(item).await?;
                    summary.failed += 1;
                }
            }

            sleep(self.options.pacing).await;
        }

        info!(
            "Run finished: {} rows ({} done, {} failed, {} skipped)",
            summary.total, summary.done, summary.failed, summary.skipped
        );
        Ok(summary)
    }

    /// 写回成功结果
    ///
    /// 列位置在写入时按表头重新查找，账本中不存在的列被静默丢弃。
    /// 状态列最后写入，中途中断的行在下一轮仍会被处理。
    async fn commit_done(&self, item: &WorkItem, record: &CanonicalRecord) -> Result<(), LedgerError> {
        let headers = self.ledger.columns().await?;
        let status_column = status_column(&headers)?;

        for (key, value) in &record.fields {
            match column_index(&headers, key) {
                Some(column) => self.ledger.write_cell(item.row_index, column, value).await?,
                None => debug!("Dropping {} for row {}: no such column", key, item.row_index),
            }
        }

        if let Some(column) = column_index(&headers, columns::SCRAPED_ON) {
            self.ledger
                .write_cell(item.row_index, column, &record.scraped_on())
                .await?;
        }

        self.ledger
            .write_cell(item.row_index, status_column, &WorkStatus::Done.to_string())
            .await?;
        info!("Row {} committed as {}", item.row_index, WorkStatus::Done);
        Ok(())
    }

    /// 写回失败状态，不写其他列
    async fn commit_failed(&self, item: &WorkItem) -> Result<(), LedgerError> {
        let headers = self.ledger.columns().await?;
        let status_column = status_column(&headers)?;
        self.ledger
            .write_cell(item.row_index, status_column, &WorkStatus::Failed.to_string())
            .await
    }
}

fn status_column(headers: &[String]) -> Result<u32, LedgerError> {
    column_index(headers, columns::STATUS)
        .ok_or_else(|| LedgerError::MissingColumn(columns::STATUS.to_string()))
}
