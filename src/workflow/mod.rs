//! 流程层（Workflow Layer）
//!
//! 定义"一个职位的申请"完整处理流程
//!
//! - `job_ctx` - 上下文封装（职位序号 + 页码）
//! - `question_responder` - 识别并回答当前页的问题
//! - `application_flow` - Easy Apply → 下一步 → 作答 → 审核 / 提交 → 关闭

pub mod application_flow;
pub mod job_ctx;
pub mod question_responder;

pub use application_flow::{ApplicationFlow, ApplicationReport, SessionOutcome, SessionState};
pub use job_ctx::JobCtx;
pub use question_responder::{PageReport, QuestionKind, QuestionResponder};
