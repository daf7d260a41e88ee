//! 选择器集合
//!
//! 默认值对应招聘站点当前的页面结构，任何字段都可以被 TOML 文件覆盖。

use serde::{Deserialize, Serialize};

/// 是非题的两个标准答案
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryChoice {
    Yes,
    No,
}

impl BinaryChoice {
    /// 页面上单选框的取值
    pub fn token(self) -> &'static str {
        match self {
            BinaryChoice::Yes => "Yes",
            BinaryChoice::No => "No",
        }
    }
}

/// 页面上的流程控件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Easy Apply 按钮
    ApplyTrigger,
    /// 继续下一步
    NextStep,
    /// 审核申请
    Review,
    /// 提交申请
    Submit,
    /// 关闭申请弹窗
    Dismiss,
    /// 结果列表下一页
    NextPage,
}

impl Control {
    /// 日志中使用的名称
    pub fn label(self) -> &'static str {
        match self {
            Control::ApplyTrigger => "Easy Apply",
            Control::NextStep => "Continue to next step",
            Control::Review => "Review your application",
            Control::Submit => "Submit application",
            Control::Dismiss => "Dismiss",
            Control::NextPage => "View next page",
        }
    }
}

/// 全部选择器
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorSet {
    pub form: FormSelectors,
    pub binary: BinarySelectors,
    pub dropdown: DropdownSelectors,
    pub numeric: NumericSelectors,
    pub controls: ControlSelectors,
    pub listing: ListingSelectors,
}

/// 表单分组
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormSelectors {
    /// 一个问题分组
    pub section: String,
}

impl Default for FormSelectors {
    fn default() -> Self {
        Self {
            section: "div[class*='fb-dash-form-element']".to_string(),
        }
    }
}

/// 是非题
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BinarySelectors {
    /// 带提示语的单选组
    pub group: String,
    /// 单选组中的提示语
    pub prompt: String,
    /// 单选框模板，`{choice}` 会被替换为 Yes / No
    pub option: String,
}

impl Default for BinarySelectors {
    fn default() -> Self {
        Self {
            group: "fieldset:has(legend)".to_string(),
            prompt: "legend span".to_string(),
            option: "input[value='{choice}']".to_string(),
        }
    }
}

/// 下拉题
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DropdownSelectors {
    pub control: String,
    pub label: String,
    pub option: String,
}

impl Default for DropdownSelectors {
    fn default() -> Self {
        Self {
            control: "select".to_string(),
            label: "label[class*='fb-dash-form-element__label']".to_string(),
            option: "option".to_string(),
        }
    }
}

/// 数字填空题
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NumericSelectors {
    pub input: String,
    pub label: String,
}

impl Default for NumericSelectors {
    fn default() -> Self {
        Self {
            input: "input[class*='artdeco-text-input--input']".to_string(),
            label: "label[class*='artdeco-text-input--label']".to_string(),
        }
    }
}

/// 流程控件
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlSelectors {
    pub apply_trigger: String,
    pub next_step: String,
    pub review: String,
    pub submit: String,
    pub dismiss: String,
    pub next_page: String,
}

impl Default for ControlSelectors {
    fn default() -> Self {
        Self {
            apply_trigger: "button.jobs-apply-button.artdeco-button--primary".to_string(),
            next_step: "button[aria-label*='Continue to next step']".to_string(),
            review: "button[aria-label*='Review your application']".to_string(),
            submit: "button[aria-label*='Submit application']".to_string(),
            dismiss: "[aria-label='Dismiss']".to_string(),
            next_page: "button[aria-label='View next page']".to_string(),
        }
    }
}

/// 搜索结果列表
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingSelectors {
    pub job_card: String,
    pub job_link: String,
    pub description: String,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            job_card: "div.job-card-container.job-card-list".to_string(),
            job_link: "a[class*='job-card-container__link']".to_string(),
            description: "#job-details".to_string(),
        }
    }
}
