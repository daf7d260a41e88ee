use std::path::Path;

use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::error::BrowserError;

/// 自行启动浏览器
///
/// # 参数
/// - `headless`: 是否无头
/// - `executable`: 浏览器可执行文件，不指定时由 chromiumoxide 自动查找
/// - `user_data_dir`: 用户数据目录，指定已登录过的目录可以保留会话
pub async fn launch_browser(
    headless: bool,
    executable: Option<&str>,
    user_data_dir: Option<&str>,
) -> Result<(Browser, Page, JoinHandle<()>), BrowserError> {
    info!("🚀 启动浏览器 (无头: {})...", headless);

    let mut builder = BrowserConfig::builder()
        .args(vec!["--disable-gpu", "--no-sandbox", "--disable-dev-shm-usage"])
        .window_size(1400, 1000);

    if headless {
        builder = builder.new_headless_mode();
    } else {
        builder = builder.with_head();
    }
    if let Some(executable) = executable {
        builder = builder.chrome_executable(Path::new(executable));
    }
    if let Some(dir) = user_data_dir {
        builder = builder.user_data_dir(dir);
    }

    let config = builder.build().map_err(|e| {
        error!("配置浏览器失败: {}", e);
        BrowserError::ConfigurationFailed(e)
    })?;

    let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
        error!("启动浏览器失败: {}", e);
        BrowserError::LaunchFailed(e)
    })?;
    debug!("浏览器启动成功");

    // 在后台处理浏览器事件
    let events = tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    sleep(tokio::time::Duration::from_millis(300)).await;

    let page = browser
        .new_page("about:blank")
        .await
        .map_err(BrowserError::LaunchFailed)?;

    Ok((browser, page, events))
}
