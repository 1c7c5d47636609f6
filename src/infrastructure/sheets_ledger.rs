// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::config::settings::LedgerSettings;
use crate::domain::repositories::ledger_store::{LedgerError, LedgerSnapshot, LedgerStore};

/// 表格区域的取值
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValueRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    major_dimension: Option<String>,
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// Google Sheets 账本
///
/// 通过 Sheets API v4 的 values 接口读写单个工作表。访问令牌由外部提供。
pub struct SheetsLedger {
    client: Client,
    api_base: Url,
    spreadsheet_id: String,
    worksheet: String,
    access_token: String,
}

impl SheetsLedger {
    pub fn new(settings: &LedgerSettings) -> Result<Self, LedgerError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        let api_base = Url::parse(&settings.api_base)
            .map_err(|e| LedgerError::Malformed(format!("invalid api_base: {}", e)))?;

        Ok(Self {
            client,
            api_base,
            spreadsheet_id: settings.spreadsheet_id.clone(),
            worksheet: settings.worksheet.clone(),
            access_token: settings.access_token.clone(),
        })
    }

    /// 工作表内的A1区域，工作表名总是加引号
    fn range(&self, cells: Option<&str>) -> String {
        let sheet = format!("'{}'", self.worksheet.replace('\'', "''"));
        match cells {
            Some(cells) => format!("{}!{}", sheet, cells),
            None => sheet,
        }
    }

    fn values_url(&self, range: &str) -> Result<Url, LedgerError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| LedgerError::Malformed("api_base cannot be a base URL".to_string()))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", self.spreadsheet_id.as_str(), "values", range]);
        Ok(url)
    }

    async fn read_range(&self, range: &str) -> Result<Vec<Vec<String>>, LedgerError> {
        let url = self.values_url(range)?;
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .query(&[("majorDimension", "ROWS")])
            .send()
            .await?;
        let body: ValueRange = check(response).await?.json().await?;

        Ok(body
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect())
    }
}

async fn check(response: Response) -> Result<Response, LedgerError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(LedgerError::Api {
        status: status.as_u16(),
        body,
    })
}

fn cell_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// 1起始列号转换为A1列字母（1 → A，27 → AA）
pub fn column_letters(mut column: u32) -> String {
    let mut letters = Vec::new();
    while column > 0 {
        let rem = (column - 1) % 26;
        letters.push(char::from(b'A' + rem as u8));
        column = (column - 1) / 26;
    }
    letters.iter().rev().collect()
}

#[async_trait]
impl LedgerStore for SheetsLedger {
    async fn snapshot(&self) -> Result<LedgerSnapshot, LedgerError> {
        let rows = self.read_range(&self.range(None)).await?;
        LedgerSnapshot::from_rows(rows)
    }

    async fn columns(&self) -> Result<Vec<String>, LedgerError> {
        let mut rows = self.read_range(&self.range(Some("1:1"))).await?;
        let headers = if rows.is_empty() {
            Vec::new()
        } else {
            rows.swap_remove(0)
        };
        Ok(headers.into_iter().map(|h| h.trim().to_string()).collect())
    }

    async fn write_cell(&self, row: u32, column: u32, value: &str) -> Result<(), LedgerError> {
        let cell = format!("{}{}", column_letters(column), row);
        let range = self.range(Some(&cell));
        let url = self.values_url(&range)?;
        debug!("Writing {} = {:?}", range, value);

        let body = ValueRange {
            range: Some(range),
            major_dimension: Some("ROWS".to_string()),
            values: vec![vec![Value::String(value.to_string())]],
        };
        let response = self
            .client
            .put(url)
            .bearer_auth(&self.access_token)
            .query(&[("valueInputOption", "USER_ENTERED")])
            .json(&body)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }
}
