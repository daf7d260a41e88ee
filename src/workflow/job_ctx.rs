//! 职位处理上下文
//!
//! 封装"我正在处理结果列表第几页的第几个职位"这一信息

use std::fmt::Display;

/// 职位处理上下文
#[derive(Debug, Clone)]
pub struct JobCtx {
    /// 本次运行中的职位序号（从1开始）
    pub job_index: usize,

    /// 结果列表页码（从1开始）
    pub page_number: usize,

    /// 职位标题（仅用于日志显示）
    pub title: String,
}

impl JobCtx {
    /// 创建新的职位上下文
    pub fn new(job_index: usize, page_number: usize, title: impl Into<String>) -> Self {
        Self {
            job_index,
            page_number,
            title: title.into(),
        }
    }
}

impl Display for JobCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[职位 #{} 第{}页]", self.job_index, self.page_number)
    }
}
