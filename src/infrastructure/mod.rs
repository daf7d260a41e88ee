//! 基础设施层
//!
//! 持有稀缺资源（Page），只向上暴露页面操作能力

pub mod chromium;
#[cfg(test)]
pub(crate) mod fake;
pub mod surface;

pub use chromium::ChromiumSurface;
pub use surface::{settle, AutomationSurface, Condition};
