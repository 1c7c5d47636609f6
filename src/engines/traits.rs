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

use crate::engines::document::PageSnapshot;
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// 渲染引擎错误类型
#[derive(Error, Debug)]
pub enum RenderError {
    /// 等待超时
    #[error("Timed out after {0:?} waiting for {1}")]
    Timeout(Duration, Locator),
    /// 元素未找到
    #[error("Element not found: {0}")]
    NotFound(Locator),
    /// 无效的CSS选择器
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),
    /// 导航失败
    #[error("Navigation failed: {0}")]
    Navigation(String),
    /// 脚本执行失败
    #[error("Script failed: {0}")]
    Script(String),
    /// 浏览器错误
    #[error("Browser error: {0}")]
    Browser(String),
}

impl RenderError {
    /// 判断是否为超时错误
    pub fn is_timeout(&self) -> bool {
        matches!(self, RenderError::Timeout(..))
    }
}

/// 元素定位器
///
/// CSS选择器加可选的"自身文本包含"条件。自身文本只计算元素的直接文本子节点，
/// 对应 `//*[contains(text(), '...')]` 的语义。同一个定位器既可以在浏览器内求值，
/// 也可以在 [`PageSnapshot`] 上求值。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    /// CSS选择器
    pub css: String,
    /// 直接文本节点需包含的子串
    pub own_text: Option<String>,
}

impl Locator {
    /// 仅按CSS选择器定位
    pub fn css(css: impl Into<String>) -> Self {
        Self {
            css: css.into(),
            own_text: None,
        }
    }

    /// 任意元素，自身文本包含给定子串
    pub fn text(needle: impl Into<String>) -> Self {
        Self::css("*").with_own_text(needle)
    }

    pub fn with_own_text(mut self, needle: impl Into<String>) -> Self {
        self.own_text = Some(needle.into());
        self
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.own_text {
            Some(needle) => write!(f, "{} containing '{}'", self.css, needle),
            None => write!(f, "{}", self.css),
        }
    }
}

/// 等待条件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitCondition {
    /// 元素存在于DOM中
    Present,
    /// 元素可见且未禁用
    Clickable,
}

/// 渲染会话特质
///
/// 一个可导航、可执行脚本的渲染页面句柄。查询类操作通过 [`snapshot`](RenderSession::snapshot)
/// 返回的DOM快照完成，交互类操作（等待、点击、滚动）直接作用于实时页面。
#[async_trait]
pub trait RenderSession: Send {
    /// 导航到指定URL
    async fn navigate(&mut self, url: &str) -> Result<(), RenderError>;

    /// 在超时时间内等待定位器满足条件
    async fn wait_until(
        &mut self,
        locator: &Locator,
        condition: WaitCondition,
        timeout: Duration,
    ) -> Result<(), RenderError>;

    /// 点击第一个匹配的元素
    async fn click(&mut self, locator: &Locator) -> Result<(), RenderError>;

    /// 执行页面脚本（滚动等副作用）
    async fn execute(&mut self, script: &str) -> Result<(), RenderError>;

    /// 获取当前渲染后的DOM快照
    async fn snapshot(&mut self) -> Result<PageSnapshot, RenderError>;
}
