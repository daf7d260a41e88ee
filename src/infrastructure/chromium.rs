//! Chromium 页面 - 基础设施层
//!
//! 持有唯一的 Page 资源，把 `AutomationSurface` 翻译成 CDP 调用

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::{Element, Page};
use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::error::SurfaceError;
use crate::infrastructure::surface::{AutomationSurface, Condition};

/// 轮询间隔
const POLL_INTERVAL: Duration = Duration::from_millis(250);

const CLICKABLE_JS: &str = r#"
function() {
    const rect = this.getBoundingClientRect();
    const style = window.getComputedStyle(this);
    return !this.disabled
        && rect.width > 0
        && rect.height > 0
        && style.visibility !== 'hidden'
        && style.display !== 'none';
}
"#;

// <option> 上的 click() 不会改变 select 的取值，需要直接设置 selected
const ACTIVATE_JS: &str = r#"
function() {
    if (this.tagName === 'OPTION') {
        this.selected = true;
        const select = this.closest('select');
        if (select) {
            select.dispatchEvent(new Event('input', { bubbles: true }));
            select.dispatchEvent(new Event('change', { bubbles: true }));
        }
        return true;
    }
    this.click();
    return true;
}
"#;

const CLEAR_JS: &str = r#"
function() {
    this.value = '';
    this.dispatchEvent(new Event('input', { bubbles: true }));
    this.dispatchEvent(new Event('change', { bubbles: true }));
    return true;
}
"#;

/// Chromium 页面
///
/// 职责：
/// - 持有唯一的 Page 资源
/// - 实现定位 / 等待 / 点击 / 输入 / 读取
/// - 不认识问题类型，也不认识申请流程
pub struct ChromiumSurface {
    page: Page,
}

impl ChromiumSurface {
    /// 创建新的 Chromium 页面
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// 在元素上执行一个返回布尔值的函数
    async fn call_bool(&self, element: &Element, js: &str) -> Result<bool, SurfaceError> {
        let returns = element.call_js_fn(js, false).await?;
        Ok(returns
            .result
            .value
            .and_then(|v| v.as_bool())
            .unwrap_or(false))
    }
}

#[async_trait]
impl AutomationSurface for ChromiumSurface {
    type Handle = Element;

    async fn find(&self, selector: &str) -> Result<Option<Element>, SurfaceError> {
        // find_element 对不存在的节点返回协议错误，统一用 find_elements 判空
        let mut elements = self.page.find_elements(selector).await?;
        if elements.is_empty() {
            Ok(None)
        } else {
            Ok(Some(elements.remove(0)))
        }
    }

    async fn find_all(&self, selector: &str) -> Result<Vec<Element>, SurfaceError> {
        Ok(self.page.find_elements(selector).await?)
    }

    async fn find_in(
        &self,
        parent: &Element,
        selector: &str,
    ) -> Result<Option<Element>, SurfaceError> {
        let mut elements = parent.find_elements(selector).await?;
        if elements.is_empty() {
            Ok(None)
        } else {
            Ok(Some(elements.remove(0)))
        }
    }

    async fn find_all_in(
        &self,
        parent: &Element,
        selector: &str,
    ) -> Result<Vec<Element>, SurfaceError> {
        Ok(parent.find_elements(selector).await?)
    }

    async fn wait_for(
        &self,
        selector: &str,
        condition: Condition,
        timeout: Duration,
    ) -> Result<Element, SurfaceError> {
        let deadline = Instant::now() + timeout;

        loop {
            if let Ok(elements) = self.page.find_elements(selector).await {
                for element in elements {
                    let ready = match condition {
                        Condition::Present => true,
                        Condition::Clickable => {
                            self.call_bool(&element, CLICKABLE_JS).await.unwrap_or(false)
                        }
                    };
                    if ready {
                        return Ok(element);
                    }
                }
            }

            if Instant::now() >= deadline {
                debug!("等待超时 ({:?}): {}", timeout, selector);
                return Err(SurfaceError::TimedOut {
                    selector: selector.to_string(),
                    timeout,
                });
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn click(&self, handle: &Element) -> Result<(), SurfaceError> {
        handle.click().await?;
        Ok(())
    }

    async fn activate(&self, handle: &Element) -> Result<(), SurfaceError> {
        handle.call_js_fn(ACTIVATE_JS, false).await?;
        Ok(())
    }

    async fn type_text(&self, handle: &Element, text: &str) -> Result<(), SurfaceError> {
        handle.focus().await?;
        handle.type_str(text).await?;
        Ok(())
    }

    async fn clear(&self, handle: &Element) -> Result<(), SurfaceError> {
        handle.call_js_fn(CLEAR_JS, false).await?;
        Ok(())
    }

    async fn read_text(&self, handle: &Element) -> Result<String, SurfaceError> {
        Ok(handle.inner_text().await?.unwrap_or_default())
    }

    async fn read_attribute(
        &self,
        handle: &Element,
        name: &str,
    ) -> Result<Option<String>, SurfaceError> {
        Ok(handle.attribute(name).await?)
    }

    async fn navigate(&self, url: &str) -> Result<(), SurfaceError> {
        debug!("导航到: {}", url);
        self.page.goto(url).await?;
        Ok(())
    }
}
