use chromiumoxide::{Browser, Page};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::error::BrowserError;

/// 连接到已登录的浏览器并获取页面
///
/// 优先复用地址包含 `preferred_host` 的标签页，否则新建空白页
pub async fn connect_to_browser_and_page(
    port: u16,
    preferred_host: Option<&str>,
) -> Result<(Browser, Page, JoinHandle<()>), BrowserError> {
    let browser_url = format!("http://localhost:{}", port);
    info!("正在连接到浏览器: {}", browser_url);

    let (browser, mut handler) = Browser::connect(&browser_url).await.map_err(|e| {
        error!("连接浏览器失败: {}", e);
        BrowserError::ConnectionFailed { port, source: e }
    })?;
    debug!("浏览器连接成功");

    // 在后台处理浏览器事件
    let events = tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 添加短暂延迟以等待浏览器状态同步
    sleep(tokio::time::Duration::from_millis(300)).await;

    let pages = browser
        .pages()
        .await
        .map_err(|e| BrowserError::ConnectionFailed { port, source: e })?;
    debug!("获取到 {} 个页面", pages.len());

    if let Some(host) = preferred_host {
        for p in pages.iter() {
            if let Ok(Some(url)) = p.url().await {
                debug!("检查页面地址: {}", url);
                if url.contains(host) {
                    info!("✓ 复用已打开的页面: {}", url);
                    return Ok((browser, p.clone(), events));
                }
            }
        }
        debug!("未找到 {} 的页面，将创建新页面", host);
    }

    let page = browser
        .new_page("about:blank")
        .await
        .map_err(|e| BrowserError::ConnectionFailed { port, source: e })?;
    Ok((browser, page, events))
}
