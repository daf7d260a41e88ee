//! 页面自动化接口 - 基础设施层
//!
//! 流程层只通过这个 trait 接触页面：定位、等待、点击、输入、读取。
//! 真实实现见 `ChromiumSurface`，测试使用内存中的假页面。

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use crate::error::SurfaceError;

/// 等待条件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// 元素出现在文档中
    Present,
    /// 元素可见且未被禁用
    Clickable,
}

/// 页面自动化能力
///
/// 句柄只在当前渲染内有效，任何可能改变 DOM 的点击之后都必须重新查询。
#[async_trait]
pub trait AutomationSurface: Send + Sync {
    /// 元素句柄
    type Handle: Send + Sync;

    /// 在整个页面中查找第一个匹配元素
    async fn find(&self, selector: &str) -> Result<Option<Self::Handle>, SurfaceError>;

    /// 在整个页面中查找全部匹配元素（按文档顺序）
    async fn find_all(&self, selector: &str) -> Result<Vec<Self::Handle>, SurfaceError>;

    /// 在某个元素内部查找第一个匹配元素
    async fn find_in(
        &self,
        parent: &Self::Handle,
        selector: &str,
    ) -> Result<Option<Self::Handle>, SurfaceError>;

    /// 在某个元素内部查找全部匹配元素（按文档顺序）
    async fn find_all_in(
        &self,
        parent: &Self::Handle,
        selector: &str,
    ) -> Result<Vec<Self::Handle>, SurfaceError>;

    /// 在限定时间内等待元素满足条件，超时返回 `SurfaceError::TimedOut`
    async fn wait_for(
        &self,
        selector: &str,
        condition: Condition,
        timeout: Duration,
    ) -> Result<Self::Handle, SurfaceError>;

    /// 原生点击
    async fn click(&self, handle: &Self::Handle) -> Result<(), SurfaceError>;

    /// 通过脚本触发激活（不经过鼠标，覆盖层无法拦截）
    async fn activate(&self, handle: &Self::Handle) -> Result<(), SurfaceError>;

    /// 向输入框输入文本
    async fn type_text(&self, handle: &Self::Handle, text: &str) -> Result<(), SurfaceError>;

    /// 清空输入框
    async fn clear(&self, handle: &Self::Handle) -> Result<(), SurfaceError>;

    /// 读取可见文本
    async fn read_text(&self, handle: &Self::Handle) -> Result<String, SurfaceError>;

    /// 读取属性
    async fn read_attribute(
        &self,
        handle: &Self::Handle,
        name: &str,
    ) -> Result<Option<String>, SurfaceError>;

    /// 导航到指定地址
    async fn navigate(&self, url: &str) -> Result<(), SurfaceError>;
}

/// 点击后等待页面稳定
pub async fn settle(delay: Duration) {
    if !delay.is_zero() {
        sleep(delay).await;
    }
}
