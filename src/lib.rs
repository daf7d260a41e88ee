//! # Easy Apply
//!
//! 自动完成招聘网站 Easy Apply 申请表的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的分层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露页面操作能力
//! - `AutomationSurface` - 定位 / 等待 / 点击 / 输入 / 读取
//! - `ChromiumSurface` - 唯一的 page owner
//! - `browser/` - 连接已登录的浏览器或自行启动
//! - `markup/` - 字段选择器集中在 `MarkupProfile`，站点改版只改这里
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，不关心页面结构
//! - `Oracle` / `LlmOracle` - 根据简历回答一个问题
//! - `answer` - 把任意回答收敛成合法取值（是/否、选项、数字）
//! - `resume` - 读取简历文本
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个申请"的完整处理流程
//! - `JobCtx` - 上下文封装（职位序号 + 页码）
//! - `QuestionResponder` - 识别题型并作答
//! - `ApplicationFlow` - Easy Apply → 下一步 → 作答 → 审核 / 提交 → 关闭
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/search_runner` - 搜索、翻页、资源管理和统计
//! - `orchestrator/job_processor` - 单个职位：打开详情、匹配判断、申请
//!
//! ## 模块结构

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod markup;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use browser::{connect_to_browser_and_page, launch_browser};
pub use config::{Config, Timing};
pub use error::{AppError, AppResult};
pub use infrastructure::{AutomationSurface, ChromiumSurface};
pub use markup::{MarkupProfile, SelectorSet};
pub use orchestrator::{App, RunStats};
pub use services::{LlmOracle, Oracle};
pub use workflow::{ApplicationFlow, QuestionResponder, SessionOutcome};
