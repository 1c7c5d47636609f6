// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::traits::{Locator, RenderError};
use scraper::{ElementRef, Html, Selector};

/// 渲染页面的DOM快照
///
/// 对渲染后的HTML做一次解析，提供查询接口：按定位器查找、元素文本、
/// 子孙查找和祖先遍历。合成的HTML同样可以构造快照，便于在没有浏览器的情况下测试。
pub struct PageSnapshot {
    html: Html,
}

impl PageSnapshot {
    /// 从HTML文本解析快照
    pub fn parse(content: &str) -> Self {
        Self {
            html: Html::parse_document(content),
        }
    }

    /// 按文档顺序返回所有匹配定位器的元素
    pub fn find_all(&self, locator: &Locator) -> Result<Vec<ElementRef<'_>>, RenderError> {
        let selector = parse_selector(&locator.css)?;
        Ok(self
            .html
            .select(&selector)
            .filter(|el| is_rendered(*el))
            .filter(|el| match &locator.own_text {
                Some(needle) => own_text_contains(*el, needle),
                None => true,
            })
            .collect())
    }

    /// 返回第一个匹配定位器的元素
    pub fn find_first(&self, locator: &Locator) -> Result<Option<ElementRef<'_>>, RenderError> {
        Ok(self.find_all(locator)?.into_iter().next())
    }

    /// 判断定位器是否至少匹配一个元素
    pub fn contains(&self, locator: &Locator) -> Result<bool, RenderError> {
        Ok(self.find_first(locator)?.is_some())
    }

    /// 按文档顺序遍历所有会被渲染的元素
    pub fn elements(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.html
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|el| is_rendered(*el))
    }
}

pub(crate) fn parse_selector(css: &str) -> Result<Selector, RenderError> {
    Selector::parse(css).map_err(|e| RenderError::InvalidSelector(format!("{}: {:?}", css, e)))
}

/// 浏览器不会显示其内容的元素
pub const NON_RENDERED_TAGS: &[&str] = &["head", "title", "script", "style", "noscript", "template"];

fn is_non_rendered_tag(name: &str) -> bool {
    NON_RENDERED_TAGS
        .iter()
        .any(|tag| name.eq_ignore_ascii_case(tag))
}

/// 元素自身及其祖先都不是不可见元素
pub fn is_rendered(element: ElementRef<'_>) -> bool {
    !std::iter::once(*element)
        .chain(element.ancestors())
        .filter_map(|node| node.value().as_element())
        .any(|el| is_non_rendered_tag(el.name()))
}

/// 元素的渲染文本
///
/// 拼接可见的子孙文本节点，折叠连续空白并去除首尾空白。
/// `script`、`style` 等元素内的文本不计入，与浏览器的可见文本一致。
pub fn rendered_text(element: ElementRef<'_>) -> String {
    if is_non_rendered_tag(element.value().name()) {
        return String::new();
    }

    let raw: String = element
        .descendants()
        .filter_map(|node| node.value().as_text().map(|text| (node, text)))
        .filter(|(node, _)| {
            !node
                .ancestors()
                .take_while(|ancestor| ancestor.id() != element.id())
                .filter_map(|ancestor| ancestor.value().as_element())
                .any(|el| is_non_rendered_tag(el.name()))
        })
        .map(|(_, text)| &**text)
        .collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 元素的第一个直接文本子节点是否包含给定子串
///
/// 与 XPath 1.0 `contains(text(), ...)` 一致：只看第一个文本节点
pub fn own_text_contains(element: ElementRef<'_>, needle: &str) -> bool {
    element
        .children()
        .find_map(|child| child.value().as_text())
        .is_some_and(|text| text.contains(needle))
}

/// 向上查找最近的指定标签祖先
pub fn nearest_ancestor<'a>(element: ElementRef<'a>, tag: &str) -> Option<ElementRef<'a>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| ancestor.value().name().eq_ignore_ascii_case(tag))
}

/// 在元素内部按文档顺序查找第一个匹配的子孙元素（不含元素自身）
pub fn find_within<'a>(
    element: ElementRef<'a>,
    css: &str,
) -> Result<Option<ElementRef<'a>>, RenderError> {
    let selector = parse_selector(css)?;
    Ok(element
        .select(&selector)
        .find(|candidate| candidate.id() != element.id() && is_rendered(*candidate)))
}

/// 返回元素内部所有匹配的子孙元素（不含元素自身）
pub fn find_all_within<'a>(
    element: ElementRef<'a>,
    selector: &Selector,
) -> Vec<ElementRef<'a>> {
    element
        .select(selector)
        .filter(|candidate| candidate.id() != element.id() && is_rendered(*candidate))
        .collect()
}
