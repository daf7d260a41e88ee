//! 单个职位处理器 - 编排层
//!
//! ## 职责
//!
//! 处理结果列表中的一张职位卡片：
//!
//! 1. **打开详情**：点击卡片标题链接
//! 2. **读取描述**：等待职位描述出现并记录前 500 字
//! 3. **匹配判断**：交给 `JobFit` 决定是否申请
//! 4. **申请**：委托 `ApplicationFlow` 完成整个申请表

use anyhow::{anyhow, Context, Result};
use tracing::info;

use crate::config::Timing;
use crate::infrastructure::{settle, AutomationSurface, Condition};
use crate::markup::MarkupProfile;
use crate::services::Oracle;
use crate::utils::logging::truncate_text;
use crate::workflow::{ApplicationFlow, ApplicationReport, JobCtx, QuestionResponder};

/// 日志中显示的职位描述长度
const DESCRIPTION_PREVIEW_CHARS: usize = 500;

/// 职位匹配判断
pub trait JobFit: Send + Sync {
    fn should_apply(&self, title: &str, description: &str) -> bool;
}

/// 所有职位都申请
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysApply;

impl JobFit for AlwaysApply {
    fn should_apply(&self, _title: &str, _description: &str) -> bool {
        true
    }
}

/// 单个职位的处理结果
#[derive(Debug)]
pub enum JobOutcome {
    /// 进入了申请流程
    Attempted(ApplicationReport),
    /// 不匹配，未申请
    NotFit,
}

/// 单个职位处理器
///
/// 持有处理一个职位所需的全部只读资源，整个运行期间复用
pub struct JobProcessor<'a, S: AutomationSurface> {
    surface: &'a S,
    markup: &'a dyn MarkupProfile,
    oracle: &'a dyn Oracle,
    resume: &'a str,
    timing: &'a Timing,
    fit: &'a dyn JobFit,
}

impl<'a, S: AutomationSurface> JobProcessor<'a, S> {
    pub fn new(
        surface: &'a S,
        markup: &'a dyn MarkupProfile,
        oracle: &'a dyn Oracle,
        resume: &'a str,
        timing: &'a Timing,
        fit: &'a dyn JobFit,
    ) -> Self {
        Self {
            surface,
            markup,
            oracle,
            resume,
            timing,
            fit,
        }
    }

    /// 处理一张职位卡片
    ///
    /// # 参数
    /// - `card`: 职位卡片句柄
    /// - `job_index`: 本次运行中的职位序号（用于日志）
    /// - `page_number`: 结果列表页码（用于日志）
    pub async fn process_job(
        &self,
        card: &S::Handle,
        job_index: usize,
        page_number: usize,
    ) -> Result<JobOutcome> {
        let (_, link_selector, description_selector) = self.markup.listing();

        // ========== 1. 打开详情 ==========
        let link = self
            .surface
            .find_in(card, link_selector)
            .await?
            .ok_or_else(|| anyhow!("职位卡片中没有标题链接"))?;
        let title = self.surface.read_text(&link).await?.trim().to_string();
        let ctx = JobCtx::new(job_index, page_number, title);

        info!("\n{} 💼 {}", ctx, ctx.title);
        self.surface
            .click(&link)
            .await
            .with_context(|| format!("{} 打开职位详情失败", ctx))?;
        settle(self.timing.settle_delay).await;

        // ========== 2. 读取描述 ==========
        let description = self
            .surface
            .wait_for(
                description_selector,
                Condition::Present,
                self.timing.control_timeout,
            )
            .await
            .with_context(|| format!("{} 职位描述未出现", ctx))?;
        let description = self.surface.read_text(&description).await?;
        info!(
            "{} 职位描述: {}",
            ctx,
            truncate_text(description.trim(), DESCRIPTION_PREVIEW_CHARS)
        );

        // ========== 3. 匹配判断 ==========
        if !self.fit.should_apply(&ctx.title, &description) {
            info!("{} ⏭️ 不匹配，跳过", ctx);
            return Ok(JobOutcome::NotFit);
        }

        // ========== 4. 申请 ==========
        info!("{} 🚀 开始 Easy Apply", ctx);
        let responder = QuestionResponder::new(self.surface, self.markup, self.oracle, self.resume);
        let flow = ApplicationFlow::new(self.surface, self.markup, responder, self.timing);
        let report = flow.run(&ctx).await;

        info!(
            "{} 📊 结果: {:?} (下一步 {} 次, 作答 {} / 跳过 {} / 失败 {})",
            ctx,
            report.outcome,
            report.steps_advanced,
            report.page.answered,
            report.page.skipped,
            report.page.failed
        );

        Ok(JobOutcome::Attempted(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::fake::{Action, FakeDom, FakeNode, FakeSurface, NodeId};
    use crate::markup::{Control, SelectorSet};
    use crate::services::oracle::scripted::ScriptedOracle;
    use crate::workflow::SessionOutcome;

    struct RejectAll;

    impl JobFit for RejectAll {
        fn should_apply(&self, _title: &str, _description: &str) -> bool {
            false
        }
    }

    struct Listing {
        dom: FakeDom,
        m: SelectorSet,
        card: NodeId,
        link: NodeId,
    }

    /// 一张卡片 + 点击后出现的描述 + Easy Apply + 提交
    fn listing(with_description: bool) -> Listing {
        let m = SelectorSet::default();
        let mut dom = FakeDom::default();
        let (card_sel, link_sel, description_sel) = m.listing();
        let card = dom.add_root(FakeNode::matching(&[card_sel]));
        let link = dom.add_child(
            card,
            FakeNode::matching(&[link_sel]).text("  Machine Learning Engineer \n"),
        );
        if with_description {
            let description_sel = description_sel.to_string();
            dom.on_click(link, move |dom| {
                dom.add_root(FakeNode::matching(&[&description_sel]).text("Build models."));
            });
        }
        dom.add_root(FakeNode::matching(&[m.control(Control::ApplyTrigger)]));
        dom.add_root(FakeNode::matching(&[m.control(Control::Submit)]));
        Listing {
            dom,
            m,
            card,
            link,
        }
    }

    #[tokio::test]
    async fn test_job_is_opened_and_applied() {
        let Listing { dom, m, card, link } = listing(true);
        let surface = FakeSurface::new(dom);
        let oracle = ScriptedOracle::new();
        let timing = Timing::immediate();
        let processor = JobProcessor::new(&surface, &m, &oracle, "resume", &timing, &AlwaysApply);

        let outcome = processor.process_job(&card, 1, 1).await.unwrap();

        match outcome {
            JobOutcome::Attempted(report) => {
                assert_eq!(report.outcome, SessionOutcome::SubmittedDirectly)
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(surface.actions().first(), Some(&Action::Click(link)));
    }

    #[tokio::test]
    async fn test_unfit_job_is_not_applied() {
        let Listing { dom, m, card, .. } = listing(true);
        let apply = m.control(Control::ApplyTrigger).to_string();
        let surface = FakeSurface::new(dom);
        let oracle = ScriptedOracle::new();
        let timing = Timing::immediate();
        let processor = JobProcessor::new(&surface, &m, &oracle, "resume", &timing, &RejectAll);

        let outcome = processor.process_job(&card, 1, 1).await.unwrap();

        assert!(matches!(outcome, JobOutcome::NotFit));
        let trigger = surface.find(&apply).await.unwrap().unwrap();
        assert!(!surface.clicked(trigger));
    }

    #[tokio::test]
    async fn test_missing_description_is_an_error() {
        let Listing { dom, m, card, .. } = listing(false);
        let surface = FakeSurface::new(dom);
        let oracle = ScriptedOracle::new();
        let timing = Timing::immediate();
        let processor = JobProcessor::new(&surface, &m, &oracle, "resume", &timing, &AlwaysApply);

        let err = processor.process_job(&card, 3, 2).await.unwrap_err();

        assert!(err.to_string().contains("[职位 #3 第2页]"));
    }

    #[tokio::test]
    async fn test_card_without_link_is_an_error() {
        let m = SelectorSet::default();
        let mut dom = FakeDom::default();
        let card = dom.add_root(FakeNode::matching(&[m.listing().0]));
        let surface = FakeSurface::new(dom);
        let oracle = ScriptedOracle::new();
        let timing = Timing::immediate();
        let processor = JobProcessor::new(&surface, &m, &oracle, "resume", &timing, &AlwaysApply);

        assert!(processor.process_job(&card, 1, 1).await.is_err());
    }

    #[test]
    fn test_always_apply() {
        assert!(AlwaysApply.should_apply("anything", ""));
    }
}
