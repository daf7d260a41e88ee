/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::orchestrator::RunStats;

/// 初始化日志
///
/// `RUST_LOG` 优先；否则默认 `info`，详细模式下为 `debug`
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // 重复初始化（例如测试中）直接忽略
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config, resume_path: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - Easy Apply 自动申请");
    info!("📄 简历: {}", resume_path);
    info!("🔍 搜索: '{}' @ {}", config.job_keywords, config.job_location);
    info!("🤖 模型: {} ({})", config.llm_model_name, config.llm_api_base_url);
    info!("{}", "=".repeat(60));
}

/// 记录结果页开始信息
///
/// # 参数
/// - `page_number`: 页码
/// - `cards`: 本页职位卡片数量
pub fn log_page_start(page_number: usize, cards: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始处理第 {} 页结果", page_number);
    info!("📄 本页职位: {} 个", cards);
    info!("{}", "=".repeat(60));
}

/// 打印最终统计信息
pub fn print_final_stats(stats: &RunStats) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("📄 结果页: {}", stats.pages);
    info!("🔍 职位: {}", stats.jobs_seen);
    info!("✅ 已提交: {}", stats.applied);
    info!("⚠️ 已放弃: {}", stats.abandoned);
    info!("⏭️ 跳过: {}", stats.skipped);
    info!("❌ 出错: {}", stats.errors);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（字符数）
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
