//! 页面结构适配
//!
//! 把"某种字段在页面上长什么样"集中到一个接口里。站点改版时只需要换选择器，
//! 分类和作答逻辑不受影响。

pub mod loader;
pub mod selectors;

pub use loader::load_selector_set;
pub use selectors::{BinaryChoice, Control, SelectorSet};

/// 选择器提供者
///
/// 每种字段类型一项能力
pub trait MarkupProfile: Send + Sync {
    /// 问题分组
    fn question_section(&self) -> &str;

    /// 是非题：(单选组, 提示语)
    fn binary(&self) -> (&str, &str);

    /// 是非题中某个答案对应的单选框
    fn binary_option(&self, choice: BinaryChoice) -> String;

    /// 下拉题：(下拉框, 标签, 选项)
    fn dropdown(&self) -> (&str, &str, &str);

    /// 数字题：(输入框, 标签)
    fn numeric(&self) -> (&str, &str);

    /// 流程控件
    fn control(&self, control: Control) -> &str;

    /// 结果列表：(职位卡片, 卡片标题链接, 职位描述)
    fn listing(&self) -> (&str, &str, &str);
}

impl MarkupProfile for SelectorSet {
    fn question_section(&self) -> &str {
        &self.form.section
    }

    fn binary(&self) -> (&str, &str) {
        (&self.binary.group, &self.binary.prompt)
    }

    fn binary_option(&self, choice: BinaryChoice) -> String {
        self.binary.option.replace("{choice}", choice.token())
    }

    fn dropdown(&self) -> (&str, &str, &str) {
        (
            &self.dropdown.control,
            &self.dropdown.label,
            &self.dropdown.option,
        )
    }

    fn numeric(&self) -> (&str, &str) {
        (&self.numeric.input, &self.numeric.label)
    }

    fn control(&self, control: Control) -> &str {
        let controls = &self.controls;
        match control {
            Control::ApplyTrigger => &controls.apply_trigger,
            Control::NextStep => &controls.next_step,
            Control::Review => &controls.review,
            Control::Submit => &controls.submit,
            Control::Dismiss => &controls.dismiss,
            Control::NextPage => &controls.next_page,
        }
    }

    fn listing(&self) -> (&str, &str, &str) {
        (
            &self.listing.job_card,
            &self.listing.job_link,
            &self.listing.description,
        )
    }
}
