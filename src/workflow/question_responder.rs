//! 问题分类与作答 - 流程层
//!
//! 对当前表单页上的每个问题分组：
//! 1. 按固定优先级探测控件结构，确定题型（是非 → 下拉 → 数字，先匹配先得）
//! 2. 向答题服务提问
//! 3. 把答案规整成该题型的合法值
//! 4. 写回页面
//!
//! 单个分组出错只记录日志并跳过，不影响同页其他分组。

use std::fmt::Display;

use tracing::{debug, info, warn};

use crate::error::SurfaceError;
use crate::infrastructure::AutomationSurface;
use crate::markup::MarkupProfile;
use crate::services::answer::{self, DROPDOWN_FALLBACK, NUMERIC_FALLBACK};
use crate::services::Oracle;
use crate::workflow::job_ctx::JobCtx;

/// 题型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    /// 是非题（单选组）
    Binary,
    /// 下拉题
    Dropdown,
    /// 数字填空题
    Numeric,
}

impl Display for QuestionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            QuestionKind::Binary => "是非题",
            QuestionKind::Dropdown => "下拉题",
            QuestionKind::Numeric => "数字题",
        };
        f.write_str(name)
    }
}

/// 探测结果：题型 + 用来写入答案的控件
pub struct ProbedSection<H> {
    pub kind: QuestionKind,
    pub input: H,
}

/// 一次整页作答的统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PageReport {
    /// 成功作答
    pub answered: usize,
    /// 无法识别题型，跳过
    pub skipped: usize,
    /// 作答过程中出错
    pub failed: usize,
}

/// 问题分类与作答
///
/// - 不持有任何资源，只借用页面、选择器和答题服务
/// - 每次调用 `answer_page` 都重新查询分组，不复用旧句柄
pub struct QuestionResponder<'a, S: AutomationSurface> {
    surface: &'a S,
    markup: &'a dyn MarkupProfile,
    oracle: &'a dyn Oracle,
    resume: &'a str,
}

impl<'a, S: AutomationSurface> QuestionResponder<'a, S> {
    pub fn new(
        surface: &'a S,
        markup: &'a dyn MarkupProfile,
        oracle: &'a dyn Oracle,
        resume: &'a str,
    ) -> Self {
        Self {
            surface,
            markup,
            oracle,
            resume,
        }
    }

    /// 回答当前页面上的所有问题
    pub async fn answer_page(&self, ctx: &JobCtx) -> PageReport {
        let mut report = PageReport::default();

        let sections = match self.surface.find_all(self.markup.question_section()).await {
            Ok(sections) => sections,
            Err(e) => {
                warn!("{} ⚠️ 无法读取问题分组: {}", ctx, e);
                return report;
            }
        };

        debug!("{} 当前页共有 {} 个问题分组", ctx, sections.len());

        for (index, section) in sections.iter().enumerate() {
            match self.answer_section(section, ctx).await {
                Ok(Some(_)) => report.answered += 1,
                Ok(None) => {
                    debug!("{} 分组 {} 无法识别题型，跳过", ctx, index + 1);
                    report.skipped += 1;
                }
                Err(e) => {
                    warn!("{} ⚠️ 分组 {} 作答失败: {}", ctx, index + 1, e);
                    report.failed += 1;
                }
            }
        }

        info!(
            "{} 本页作答: 成功 {}, 跳过 {}, 失败 {}",
            ctx, report.answered, report.skipped, report.failed
        );
        report
    }

    /// 按优先级探测题型，都不匹配时返回 None
    pub async fn classify(
        &self,
        section: &S::Handle,
    ) -> Result<Option<ProbedSection<S::Handle>>, SurfaceError> {
        let (group, _) = self.markup.binary();
        if let Some(input) = self.surface.find_in(section, group).await? {
            return Ok(Some(ProbedSection {
                kind: QuestionKind::Binary,
                input,
            }));
        }

        let (select, _, _) = self.markup.dropdown();
        if let Some(input) = self.surface.find_in(section, select).await? {
            return Ok(Some(ProbedSection {
                kind: QuestionKind::Dropdown,
                input,
            }));
        }

        let (field, _) = self.markup.numeric();
        if let Some(input) = self.surface.find_in(section, field).await? {
            return Ok(Some(ProbedSection {
                kind: QuestionKind::Numeric,
                input,
            }));
        }

        Ok(None)
    }

    /// 处理单个分组，返回识别到的题型
    pub async fn answer_section(
        &self,
        section: &S::Handle,
        ctx: &JobCtx,
    ) -> Result<Option<QuestionKind>, SurfaceError> {
        let Some(probed) = self.classify(section).await? else {
            return Ok(None);
        };

        match probed.kind {
            QuestionKind::Binary => self.answer_binary(section, &probed.input, ctx).await?,
            QuestionKind::Dropdown => self.answer_dropdown(section, &probed.input, ctx).await?,
            QuestionKind::Numeric => self.answer_numeric(section, &probed.input, ctx).await?,
        }

        Ok(Some(probed.kind))
    }

    /// 是非题：模型回答收敛为 Yes / No，通过脚本激活对应单选框
    async fn answer_binary(
        &self,
        section: &S::Handle,
        group: &S::Handle,
        ctx: &JobCtx,
    ) -> Result<(), SurfaceError> {
        let (_, prompt_selector) = self.markup.binary();
        let prompt = self.required_text(group, prompt_selector).await?;

        let reply = self.oracle.ask(&prompt, self.resume).await;
        let choice = answer::coerce_binary(reply.as_deref());

        let option_selector = self.markup.binary_option(choice);
        let radio = self.required(section, &option_selector).await?;
        // 原生点击可能被覆盖层拦截
        self.surface.activate(&radio).await?;

        info!("{} ❓ {}: {} → {}", ctx, QuestionKind::Binary, prompt, choice.token());
        Ok(())
    }

    /// 下拉题：按子串匹配选项，匹配不到时选第二项
    async fn answer_dropdown(
        &self,
        section: &S::Handle,
        select: &S::Handle,
        ctx: &JobCtx,
    ) -> Result<(), SurfaceError> {
        let (_, label_selector, option_selector) = self.markup.dropdown();
        let label = self.required_text(section, label_selector).await?;

        let reply = self.oracle.ask(&label, self.resume).await;
        let reply = answer::normalize(reply.as_deref()).unwrap_or(DROPDOWN_FALLBACK);

        // 只保留有 value 的选项
        let mut options = Vec::new();
        for option in self.surface.find_all_in(select, option_selector).await? {
            let value = self.surface.read_attribute(&option, "value").await?;
            if value.is_some_and(|v| !v.is_empty()) {
                let text = self.surface.read_text(&option).await?.trim().to_string();
                options.push((option, text));
            }
        }

        let labels: Vec<String> = options.iter().map(|(_, text)| text.clone()).collect();
        let index = answer::match_option(reply, &labels).ok_or_else(|| SurfaceError::NotFound {
            selector: format!("{} (可选项不足)", option_selector),
        })?;
        let (option, text) = &options[index];

        self.surface.click(select).await?;
        self.surface.activate(option).await?;

        info!("{} ❓ {}: {} → {}", ctx, QuestionKind::Dropdown, label, text);
        Ok(())
    }

    /// 数字题：取回答中的第一段数字，先清空再输入
    async fn answer_numeric(
        &self,
        section: &S::Handle,
        input: &S::Handle,
        ctx: &JobCtx,
    ) -> Result<(), SurfaceError> {
        let (_, label_selector) = self.markup.numeric();
        let label = self.required_text(section, label_selector).await?;

        let reply = self.oracle.ask(&label, self.resume).await;
        let number = answer::normalize(reply.as_deref())
            .map(answer::extract_number)
            .unwrap_or_else(|| NUMERIC_FALLBACK.to_string());

        self.surface.clear(input).await?;
        self.surface.type_text(input, &number).await?;

        info!("{} ❓ {}: {} → {}", ctx, QuestionKind::Numeric, label, number);
        Ok(())
    }

    async fn required(&self, parent: &S::Handle, selector: &str) -> Result<S::Handle, SurfaceError> {
        self.surface
            .find_in(parent, selector)
            .await?
            .ok_or_else(|| SurfaceError::NotFound {
                selector: selector.to_string(),
            })
    }

    async fn required_text(&self, parent: &S::Handle, selector: &str) -> Result<String, SurfaceError> {
        let element = self.required(parent, selector).await?;
        Ok(self.surface.read_text(&element).await?.trim().to_string())
    }
}
