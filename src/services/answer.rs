//! 答案规整 - 业务能力层
//!
//! 模型输出不可信，这里的规则把任何输出都收敛成页面能接受的值。
//! 所有函数都是纯函数，不会失败。

use std::sync::LazyLock;

use regex::Regex;

use crate::markup::BinaryChoice;

/// 模型无回答时下拉题使用的默认值
pub const DROPDOWN_FALLBACK: &str = "Professional";

/// 模型无回答时数字题使用的默认值
pub const NUMERIC_FALLBACK: &str = "0";

static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("静态正则"));

/// 去掉空白，空字符串视为无回答
pub fn normalize(answer: Option<&str>) -> Option<&str> {
    answer.map(str::trim).filter(|a| !a.is_empty())
}

/// 是非题：只有（忽略大小写）等于 "Yes" 才是肯定，其余一律为否定
pub fn coerce_binary(answer: Option<&str>) -> BinaryChoice {
    match normalize(answer) {
        Some(a) if a.eq_ignore_ascii_case(BinaryChoice::Yes.token()) => BinaryChoice::Yes,
        _ => BinaryChoice::No,
    }
}

/// 下拉题：返回第一个包含答案（忽略大小写）的选项下标；
/// 都不包含时返回第二个选项（第一个通常是占位提示）。
///
/// 选项不足两个且无匹配时返回 None。
pub fn match_option(answer: &str, options: &[String]) -> Option<usize> {
    let needle = answer.trim().to_lowercase();
    options
        .iter()
        .position(|opt| opt.to_lowercase().contains(&needle))
        .or_else(|| (options.len() > 1).then_some(1))
}

/// 数字题：答案中第一段连续数字，没有数字时为 "0"
pub fn extract_number(answer: &str) -> String {
    DIGITS
        .find(answer)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| NUMERIC_FALLBACK.to_string())
}
