use std::time::Duration;

use thiserror::Error;

/// 应用程序错误类型
///
/// 只有会终止整个运行的错误才会走到这里（浏览器连接失败、简历读取失败、配置错误），
/// 单个问题 / 单个职位上的失败都在最近的一层被记录并吞掉。
#[derive(Debug, Error)]
pub enum AppError {
    /// 浏览器相关错误
    #[error("浏览器错误: {0}")]
    Browser(#[from] BrowserError),
    /// 简历读取错误
    #[error("简历错误: {0}")]
    Resume(#[from] ResumeError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 页面操作错误
    #[error("页面操作错误: {0}")]
    Surface(#[from] SurfaceError),
}

/// 浏览器启动 / 连接错误
#[derive(Debug, Error)]
pub enum BrowserError {
    /// 连接浏览器失败
    #[error("无法连接到浏览器 (端口: {port}): {source}")]
    ConnectionFailed {
        port: u16,
        #[source]
        source: chromiumoxide::error::CdpError,
    },
    /// 浏览器配置失败
    #[error("浏览器配置失败: {0}")]
    ConfigurationFailed(String),
    /// 启动浏览器失败
    #[error("启动浏览器失败: {0}")]
    LaunchFailed(#[source] chromiumoxide::error::CdpError),
}

/// 简历读取错误
#[derive(Debug, Error)]
pub enum ResumeError {
    /// 简历文件不存在
    #[error("简历文件不存在: {path}")]
    NotFound { path: String },
    /// 无法从简历中提取文本
    #[error("无法从简历中提取文本: {path}")]
    EmptyText { path: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 未提供简历路径
    #[error("未提供简历路径 (命令行第一个参数或环境变量 RESUME_PATH)")]
    MissingResumePath,
    /// 选择器文件读取失败
    #[error("读取选择器文件失败 ({path}): {source}")]
    SelectorsReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 选择器文件解析失败
    #[error("解析选择器文件失败 ({path}): {source}")]
    SelectorsParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 搜索地址构建失败
    #[error("无效的搜索地址: {0}")]
    InvalidSearchUrl(#[from] url::ParseError),
}

/// 页面操作错误
///
/// 对应自动化接口上的所有失败形态。调用方自行决定"找不到"是否有意义。
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// 元素不存在
    #[error("未找到元素: {selector}")]
    NotFound { selector: String },
    /// 等待超时
    #[error("等待元素超时 ({timeout:?}): {selector}")]
    TimedOut { selector: String, timeout: Duration },
    /// 元素句柄已失效（页面已重新渲染）
    #[error("元素句柄已失效")]
    Stale,
    /// 底层驱动错误
    #[error("驱动错误: {0}")]
    Driver(String),
}

impl SurfaceError {
    /// 是否属于"找不到"一类（不存在或等待超时）
    pub fn is_absent(&self) -> bool {
        matches!(
            self,
            SurfaceError::NotFound { .. } | SurfaceError::TimedOut { .. }
        )
    }
}

impl From<chromiumoxide::error::CdpError> for SurfaceError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        let message = err.to_string();
        // CDP 对已脱离文档的节点返回这几种提示
        if message.contains("Could not find node")
            || message.contains("No node with given id")
            || message.contains("Cannot find context")
        {
            SurfaceError::Stale
        } else {
            SurfaceError::Driver(message)
        }
    }
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
