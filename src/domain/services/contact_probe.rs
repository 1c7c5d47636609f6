// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::listing::ContactInfo;
use crate::domain::services::field_extractors::ExtractError;
use crate::engines::document::{find_within, nearest_ancestor, rendered_text, PageSnapshot};
use crate::engines::traits::{Locator, RenderSession, WaitCondition};
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

/// 联系方式探测器
///
/// 多步尽力而为的探测：点击"显示联系方式"控件，等待电话链接出现，
/// 再从电话链接所在的最近容器中找经纪人和中介名称。任何一步失败只会让对应字段为空。
#[derive(Debug, Clone)]
pub struct ContactProbe {
    /// 显示联系方式的控件
    pub reveal: Locator,
    /// 电话链接
    pub phone: Locator,
    /// 电话链接向上查找的容器标签
    pub container_tag: String,
    /// 经纪人名称选择器
    pub agent_css: String,
    /// 中介名称选择器
    pub agency_css: String,
    /// 控件可点击的等待超时
    pub reveal_timeout: Duration,
    /// 电话链接出现的等待超时
    pub phone_timeout: Duration,
    /// 点击后的停顿
    pub reveal_pause: Duration,
}

impl Default for ContactProbe {
    fn default() -> Self {
        Self {
            reveal: Locator::css("button, span").with_own_text("Call"),
            phone: Locator::css("a[href*=\"tel\"]"),
            container_tag: "div".to_string(),
            agent_css: "h5, strong".to_string(),
            agency_css: "p, span".to_string(),
            reveal_timeout: Duration::from_secs(10),
            phone_timeout: Duration::from_secs(10),
            reveal_pause: Duration::from_secs(2),
        }
    }
}

impl ContactProbe {
    /// 探测联系方式，从不返回错误
    pub async fn probe<S>(&self, session: &mut S) -> ContactInfo
    where
        S: RenderSession + ?Sized,
    {
        match self.try_probe(session).await {
            Ok(contact) => contact,
            Err(e) => {
                debug!("Contact probe degraded: {}", e);
                ContactInfo::default()
            }
        }
    }

    async fn try_probe<S>(&self, session: &mut S) -> Result<ContactInfo, ExtractError>
    where
        S: RenderSession + ?Sized,
    {
        session
            .wait_until(&self.reveal, WaitCondition::Clickable, self.reveal_timeout)
            .await?;
        session.click(&self.reveal).await?;
        sleep(self.reveal_pause).await;

        session
            .wait_until(&self.phone, WaitCondition::Present, self.phone_timeout)
            .await?;

        let page = session.snapshot().await?;
        self.read_contact(&page)
    }

    /// 从快照中读取联系方式，容器或子元素缺失时对应字段为空
    pub fn read_contact(&self, page: &PageSnapshot) -> Result<ContactInfo, ExtractError> {
        let phone_link = page
            .find_first(&self.phone)?
            .ok_or(ExtractError::NotFound)?;

        let mut contact = ContactInfo {
            phone: rendered_text(phone_link),
            ..ContactInfo::default()
        };

        let Some(container) = nearest_ancestor(phone_link, &self.container_tag) else {
            return Ok(contact);
        };

        if let Some(agent) = find_within(container, &self.agent_css)? {
            contact.agent = rendered_text(agent);
        }
        if let Some(agency) = find_within(container, &self.agency_css)? {
            contact.agency = rendered_text(agency);
        }
        Ok(contact)
    }
}
