//! 申请表流程 - 流程层
//!
//! 核心职责：把一个职位的申请从 Easy Apply 推进到终态
//!
//! 流程顺序：
//! 1. 点击 Easy Apply，等待第一页渲染
//! 2. 连续点击"下一步"，直到该按钮不存在（有上限）
//! 3. 对当前页所有问题作答一次
//! 4. 审核 → 提交；没有审核则直接提交；都没有则放弃
//! 5. 无论结果如何，尝试关闭申请弹窗
//!
//! 所有控件查找都有超时，找不到只会降级为"不存在"，不会一直阻塞。

use tracing::{debug, info, warn};

use crate::config::Timing;
use crate::infrastructure::{settle, AutomationSurface, Condition};
use crate::markup::{Control, MarkupProfile};
use crate::workflow::job_ctx::JobCtx;
use crate::workflow::question_responder::{PageReport, QuestionResponder};

/// 申请终态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// 审核后提交
    ReviewedThenSubmitted,
    /// 直接提交
    SubmittedDirectly,
    /// 点了审核但找不到提交按钮
    ReviewedNotSubmitted,
    /// 审核和提交按钮都不存在
    AbandonedNoButton,
    /// "下一步"点击次数达到上限仍未消失
    AbandonedStepCap,
    /// Easy Apply 无法打开或中途出错
    AbandonedError,
}

impl SessionOutcome {
    /// 是否已提交
    pub fn is_submitted(self) -> bool {
        matches!(
            self,
            SessionOutcome::ReviewedThenSubmitted | SessionOutcome::SubmittedDirectly
        )
    }
}

/// 申请状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Opened,
    AdvancingSteps,
    QuestionsAnswered,
    Finished(SessionOutcome),
    Closed,
}

/// 一次申请的结果
#[derive(Debug, Clone)]
pub struct ApplicationReport {
    pub outcome: SessionOutcome,
    /// 点击"下一步"的次数
    pub steps_advanced: usize,
    /// 作答统计（未到达作答阶段时为空）
    pub page: PageReport,
    /// 经历过的状态
    pub trail: Vec<SessionState>,
}

/// 申请表流程
///
/// - 编排单个职位的完整申请
/// - 决定何时前进、何时提交、何时放弃
/// - 作答委托给 `QuestionResponder`
pub struct ApplicationFlow<'a, S: AutomationSurface> {
    surface: &'a S,
    markup: &'a dyn MarkupProfile,
    responder: QuestionResponder<'a, S>,
    timing: &'a Timing,
}

impl<'a, S: AutomationSurface> ApplicationFlow<'a, S> {
    pub fn new(
        surface: &'a S,
        markup: &'a dyn MarkupProfile,
        responder: QuestionResponder<'a, S>,
        timing: &'a Timing,
    ) -> Self {
        Self {
            surface,
            markup,
            responder,
            timing,
        }
    }

    pub async fn run(&self, ctx: &JobCtx) -> ApplicationReport {
        let mut report = ApplicationReport {
            outcome: SessionOutcome::AbandonedError,
            steps_advanced: 0,
            page: PageReport::default(),
            trail: Vec::new(),
        };

        // ========== 1. 打开申请表 ==========
        if !self
            .press(Control::ApplyTrigger, self.timing.apply_timeout, ctx)
            .await
        {
            warn!("{} ⚠️ 无法打开 Easy Apply", ctx);
            self.finish(&mut report, SessionOutcome::AbandonedError, ctx)
                .await;
            return report;
        }
        self.enter(&mut report, SessionState::Opened, ctx);
        settle(self.timing.form_open_delay).await;

        // ========== 2. 连续前进 ==========
        self.enter(&mut report, SessionState::AdvancingSteps, ctx);
        if !self.advance_steps(&mut report, ctx).await {
            warn!(
                "{} ⚠️ \"下一步\" 已点击 {} 次仍未结束，放弃本次申请",
                ctx, report.steps_advanced
            );
            self.finish(&mut report, SessionOutcome::AbandonedStepCap, ctx)
                .await;
            return report;
        }

        // ========== 3. 作答 ==========
        info!("{} 📝 正在回答附加问题...", ctx);
        report.page = self.responder.answer_page(ctx).await;
        self.enter(&mut report, SessionState::QuestionsAnswered, ctx);

        // ========== 4. 审核 / 提交 ==========
        let outcome = self.resolve_terminal(ctx).await;
        self.finish(&mut report, outcome, ctx).await;
        report
    }

    /// 点击"下一步"直到它不存在
    ///
    /// 达到上限且按钮仍在时返回 false
    async fn advance_steps(&self, report: &mut ApplicationReport, ctx: &JobCtx) -> bool {
        let selector = self.markup.control(Control::NextStep);

        loop {
            let next = match self
                .surface
                .wait_for(selector, Condition::Clickable, self.timing.control_timeout)
                .await
            {
                Ok(next) => next,
                Err(e) if e.is_absent() => {
                    debug!("{} 没有更多的\"下一步\"", ctx);
                    return true;
                }
                Err(e) => {
                    warn!("{} ⚠️ 查找\"下一步\"失败: {}", ctx, e);
                    return true;
                }
            };

            if report.steps_advanced >= self.timing.max_advance_steps {
                return false;
            }

            if let Err(e) = self.surface.click(&next).await {
                // 点击失败等同于按钮不可用，停止前进
                warn!("{} ⚠️ 点击\"下一步\"失败: {}", ctx, e);
                return true;
            }
            report.steps_advanced += 1;
            info!("{} ➡️ 下一步 ({})", ctx, report.steps_advanced);
            settle(self.timing.settle_delay).await;
        }
    }

    /// 按固定顺序寻找终态控件
    async fn resolve_terminal(&self, ctx: &JobCtx) -> SessionOutcome {
        info!("{} 正在寻找审核 / 提交按钮...", ctx);
        let timeout = self.timing.control_timeout;

        if self.press(Control::Review, timeout, ctx).await {
            if self.press(Control::Submit, timeout, ctx).await {
                info!("{} ✅ 已审核并提交申请", ctx);
                SessionOutcome::ReviewedThenSubmitted
            } else {
                warn!("{} ⚠️ 审核后找不到提交按钮", ctx);
                SessionOutcome::ReviewedNotSubmitted
            }
        } else if self.press(Control::Submit, timeout, ctx).await {
            info!("{} ✅ 已直接提交申请（无审核步骤）", ctx);
            SessionOutcome::SubmittedDirectly
        } else {
            warn!("{} ⚠️ 审核和提交按钮都不存在", ctx);
            SessionOutcome::AbandonedNoButton
        }
    }

    /// 等待控件可点击并点击，找不到或点击失败都返回 false
    async fn press(&self, control: Control, timeout: std::time::Duration, ctx: &JobCtx) -> bool {
        let selector = self.markup.control(control);

        let element = match self
            .surface
            .wait_for(selector, Condition::Clickable, timeout)
            .await
        {
            Ok(element) => element,
            Err(e) if e.is_absent() => {
                debug!("{} 未找到 '{}'", ctx, control.label());
                return false;
            }
            Err(e) => {
                warn!("{} ⚠️ 查找 '{}' 失败: {}", ctx, control.label(), e);
                return false;
            }
        };

        match self.surface.click(&element).await {
            Ok(()) => {
                debug!("{} 已点击 '{}'", ctx, control.label());
                settle(self.timing.settle_delay).await;
                true
            }
            Err(e) => {
                warn!("{} ⚠️ 点击 '{}' 失败: {}", ctx, control.label(), e);
                false
            }
        }
    }

    /// 记录终态，尝试关闭弹窗
    async fn finish(&self, report: &mut ApplicationReport, outcome: SessionOutcome, ctx: &JobCtx) {
        report.outcome = outcome;
        self.enter(report, SessionState::Finished(outcome), ctx);

        // 关闭失败不影响终态
        if self
            .press(Control::Dismiss, self.timing.control_timeout, ctx)
            .await
        {
            info!("{} 已关闭申请弹窗", ctx);
        } else {
            debug!("{} 没有需要关闭的申请弹窗", ctx);
        }
        self.enter(report, SessionState::Closed, ctx);
    }

    fn enter(&self, report: &mut ApplicationReport, state: SessionState, ctx: &JobCtx) {
        debug!("{} 状态 → {:?}", ctx, state);
        report.trail.push(state);
    }
}
