//! 简历读取服务 - 业务能力层
//!
//! 只负责"把简历文件变成纯文本"

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use tracing::{info, warn};

use crate::error::ResumeError;

/// 文档读取能力
///
/// 失败时返回空字符串
pub trait DocumentReader {
    fn extract_text(&self, path: &Path) -> String;
}

/// PDF 简历读取
///
/// pdf-extract 遇到字体资源缺失等畸形文件时会 panic，这里统一折叠为空字符串
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfResumeReader;

impl DocumentReader for PdfResumeReader {
    fn extract_text(&self, path: &Path) -> String {
        match panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text(path))) {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                warn!("读取 PDF 失败 ({}): {}", path.display(), e);
                String::new()
            }
            Err(_) => {
                warn!("⚠️ 解析 PDF 时崩溃，文件可能已损坏: {}", path.display());
                String::new()
            }
        }
    }
}

/// 加载简历文本
///
/// 文件不存在或提取不到任何文字都视为致命错误：没有简历就无法回答任何问题。
pub fn load_resume(reader: &dyn DocumentReader, path: &Path) -> Result<String, ResumeError> {
    if !path.is_file() {
        return Err(ResumeError::NotFound {
            path: path.display().to_string(),
        });
    }

    let text = reader.extract_text(path);
    if text.trim().is_empty() {
        return Err(ResumeError::EmptyText {
            path: path.display().to_string(),
        });
    }

    info!("✓ 简历已读取: {} 字符", text.chars().count());
    Ok(text)
}
