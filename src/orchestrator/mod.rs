//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责一次完整运行的调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `search_runner` - 搜索与翻页
//! - 管理应用生命周期（初始化、运行、释放）
//! - 导航到搜索结果，逐页逐个处理职位卡片
//! - 管理浏览器资源（Browser、ChromiumSurface）
//! - 输出全局统计信息
//!
//! ### `job_processor` - 单个职位处理器
//! - 打开职位详情，读取描述
//! - 匹配判断
//! - 委托 ApplicationFlow 完成申请
//!
//! ## 层次关系
//!
//! ```text
//! search_runner (处理结果列表)
//!     ↓
//! job_processor (处理单个职位)
//!     ↓
//! workflow::ApplicationFlow (处理单个申请表)
//!     ↓
//! services (能力层：oracle / answer / resume)
//!     ↓
//! infrastructure (基础设施：AutomationSurface)
//! ```

pub mod job_processor;
pub mod search_runner;

pub use job_processor::{AlwaysApply, JobFit, JobOutcome, JobProcessor};
pub use search_runner::{build_search_url, run_listing, App, RunStats};
