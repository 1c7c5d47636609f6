// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::BrowserSettings;
use crate::engines::document::{PageSnapshot, NON_RENDERED_TAGS};
use crate::engines::traits::{Locator, RenderError, RenderSession, WaitCondition};
use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, sleep, Instant};
use tracing::{debug, info};

/// Chromium渲染会话
///
/// 基于chromiumoxide实现，整个流水线生命周期内持有同一个浏览器和同一个页面。
pub struct ChromiumSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    poll_interval: Duration,
}

impl ChromiumSession {
    /// 启动本地浏览器或连接远程调试端口，并打开一个空白页面
    pub async fn launch(
        settings: &BrowserSettings,
        poll_interval: Duration,
    ) -> Result<Self, RenderError> {
        let (browser, mut handler) = if let Some(ref url) = settings.remote_debugging_url {
            info!("Connecting to remote Chrome instance at: {}", url);
            Browser::connect(url.as_str())
                .await
                .map_err(|e| RenderError::Browser(format!("Failed to connect to remote Chrome: {}", e)))?
        } else {
            let mut builder = BrowserConfig::builder()
                .request_timeout(Duration::from_secs(settings.request_timeout_secs))
                .arg("--start-maximized")
                .arg("--disable-dev-shm-usage");

            if !settings.headless {
                builder = builder.with_head();
            }
            if settings.no_sandbox {
                builder = builder.no_sandbox();
            }
            if let Some(ref dir) = settings.user_data_dir {
                builder = builder.user_data_dir(dir);
            }

            let config = builder.build().map_err(RenderError::Browser)?;
            Browser::launch(config)
                .await
                .map_err(|e| RenderError::Browser(e.to_string()))?
        };

        // Drive the CDP event loop until the browser goes away
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| RenderError::Browser(e.to_string()))?;

        Ok(Self {
            browser,
            page,
            handler,
            poll_interval,
        })
    }

    /// 关闭浏览器并等待事件循环退出
    pub async fn close(mut self) -> Result<(), RenderError> {
        self.browser
            .close()
            .await
            .map_err(|e| RenderError::Browser(e.to_string()))?;
        let _ = self.handler.await;
        Ok(())
    }
}

async fn evaluate_bool(page: &Page, script: String) -> Result<bool, RenderError> {
    page
        .evaluate(script)
        .await
        .map_err(|e| RenderError::Script(e.to_string()))?
        .into_value::<bool>()
        .map_err(|e| RenderError::Script(e.to_string()))
}

/// 反复执行检查直到返回 `true` 或超时
///
/// 单次检查同样受截止时间约束，卡住的检查不会让等待超过 `timeout`。
/// 检查出错时（例如页面正在跳转）记录日志并继续轮询。
pub async fn poll_until<F, Fut>(timeout: Duration, interval: Duration, mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, RenderError>>,
{
    let deadline = Instant::now() + timeout;

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match time::timeout(remaining, check()).await {
            Ok(Ok(true)) => return true,
            Ok(Ok(false)) => {}
            Ok(Err(e)) => debug!("Wait check failed: {}", e),
            Err(_) => return false,
        }

        if Instant::now() >= deadline {
            return false;
        }
        sleep(interval.min(deadline.saturating_duration_since(Instant::now()))).await;
    }
}

/// 生成在页面中定位元素的脚本表达式，结果为元素或null
pub fn locator_script(locator: &Locator) -> String {
    let css = serde_json::Value::String(locator.css.clone());
    let needle = match &locator.own_text {
        Some(text) => serde_json::Value::String(text.clone()),
        None => serde_json::Value::Null,
    };
    let hidden = serde_json::Value::String(NON_RENDERED_TAGS.join(", "));
    format!(
        "(() => {{ const needle = {needle}; \
         for (const el of document.querySelectorAll({css})) {{ \
           if (el.closest({hidden}) !== null) continue; \
           const first = Array.from(el.childNodes).find(n => n.nodeType === Node.TEXT_NODE); \
           if (needle === null || (first !== undefined && first.textContent.includes(needle))) return el; \
         }} \
         return null; }})()"
    )
}

fn condition_script(locator: &Locator, condition: WaitCondition) -> String {
    let query = locator_script(locator);
    match condition {
        WaitCondition::Present => format!("(() => {} !== null)()", query),
        WaitCondition::Clickable => format!(
            "(() => {{ const el = {}; return el !== null && el.getClientRects().length > 0 && !el.disabled; }})()",
            query
        ),
    }
}

#[async_trait]
impl RenderSession for ChromiumSession {
    async fn navigate(&mut self, url: &str) -> Result<(), RenderError> {
        self.page
            .goto(url)
            .await
            .map_err(|e| RenderError::Navigation(format!("{}: {}", url, e)))?;
        Ok(())
    }

    async fn wait_until(
        &mut self,
        locator: &Locator,
        condition: WaitCondition,
        timeout: Duration,
    ) -> Result<(), RenderError> {
        let script = condition_script(locator, condition);
        let page = &self.page;
        let script = &script;
        let satisfied = poll_until(timeout, self.poll_interval, move || {
            evaluate_bool(page, script.clone())
        })
        .await;

        if satisfied {
            Ok(())
        } else {
            Err(RenderError::Timeout(timeout, locator.clone()))
        }
    }

    async fn click(&mut self, locator: &Locator) -> Result<(), RenderError> {
        let script = format!(
            "(() => {{ const el = {}; if (el === null) return false; el.click(); return true; }})()",
            locator_script(locator)
        );
        if evaluate_bool(&self.page, script).await? {
            Ok(())
        } else {
            Err(RenderError::NotFound(locator.clone()))
        }
    }

    async fn execute(&mut self, script: &str) -> Result<(), RenderError> {
        self.page
            .evaluate(script)
            .await
            .map_err(|e| RenderError::Script(e.to_string()))?;
        Ok(())
    }

    async fn snapshot(&mut self) -> Result<PageSnapshot, RenderError> {
        let content = self
            .page
            .content()
            .await
            .map_err(|e| RenderError::Browser(e.to_string()))?;
        Ok(PageSnapshot::parse(&content))
    }
}
