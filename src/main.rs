use anyhow::Result;
use easy_apply::utils::logging;
use easy_apply::{App, Config};
use tracing::error;

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置，命令行第一个参数为简历路径
    let mut config = Config::from_env();
    if let Some(path) = std::env::args().nth(1) {
        config.resume_path = Some(path);
    }

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    let app = App::initialize(config).await.map_err(|e| {
        error!("❌ 初始化失败: {:#}", e);
        e
    })?;

    let result = app.run().await;
    app.shutdown().await;

    if let Err(e) = &result {
        error!("❌ 运行失败: {:#}", e);
    }
    result.map(|_| ())
}
