// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::work_item::{WorkItem, WorkStatus};
use crate::domain::schema::columns;
use async_trait::async_trait;
use thiserror::Error;

/// 账本错误类型
#[derive(Error, Debug)]
pub enum LedgerError {
    /// 网络请求失败
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// 服务端返回错误
    #[error("Ledger API returned {status}: {body}")]
    Api { status: u16, body: String },
    /// 缺少必需的列
    #[error("Required column missing: {0}")]
    MissingColumn(String),
    /// 响应内容无法解析
    #[error("Malformed ledger data: {0}")]
    Malformed(String),
}

/// 账本快照
///
/// 流水线启动时读取一次，运行期间对账本的修改不会反映到快照中
#[derive(Debug, Clone, Default)]
pub struct LedgerSnapshot {
    /// 表头
    pub headers: Vec<String>,
    /// 按账本顺序排列的工作项
    pub items: Vec<WorkItem>,
}

impl LedgerSnapshot {
    /// 由原始行构造快照
    ///
    /// 第一行为表头，第k个数据行（0起始）对应账本第k+2行。`URL` 与 `Status` 两列必须存在。
    pub fn from_rows(rows: Vec<Vec<String>>) -> Result<Self, LedgerError> {
        let mut rows = rows.into_iter();
        let headers: Vec<String> = rows
            .next()
            .ok_or_else(|| LedgerError::Malformed("ledger has no header row".to_string()))?
            .into_iter()
            .map(|h| h.trim().to_string())
            .collect();

        let url_idx = position(&headers, columns::URL)
            .ok_or_else(|| LedgerError::MissingColumn(columns::URL.to_string()))?;
        let status_idx = position(&headers, columns::STATUS)
            .ok_or_else(|| LedgerError::MissingColumn(columns::STATUS.to_string()))?;

        let items = rows
            .enumerate()
            .map(|(offset, row)| {
                // Trailing empty cells are omitted by the store
                let cell = |idx: usize| row.get(idx).map(String::as_str).unwrap_or("");
                WorkItem {
                    row_index: offset as u32 + 2,
                    url: cell(url_idx).trim().to_string(),
                    status: WorkStatus::from_cell(cell(status_idx)),
                }
            })
            .collect();

        Ok(Self { headers, items })
    }

    /// 列名对应的1起始列号
    pub fn column_index(&self, name: &str) -> Option<u32> {
        column_index(&self.headers, name)
    }
}

fn position(headers: &[String], name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

/// 在表头中查找列名，返回1起始列号
pub fn column_index(headers: &[String], name: &str) -> Option<u32> {
    position(headers, name).map(|idx| idx as u32 + 1)
}

/// 账本存储特质
///
/// 行列式表格存储：流水线从中读取工作项，并逐个单元格写回结果和状态
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// 读取全部行的快照
    async fn snapshot(&self) -> Result<LedgerSnapshot, LedgerError>;
    /// 读取当前表头
    async fn columns(&self) -> Result<Vec<String>, LedgerError>;
    /// 按1起始行列号写入单个单元格
    async fn write_cell(&self, row: u32, column: u32, value: &str) -> Result<(), LedgerError>;
}
