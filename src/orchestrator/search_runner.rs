//! 搜索与翻页 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责一次完整运行的资源管理和调度。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：读取简历、加载选择器、连接 / 启动浏览器、创建答题服务
//! 2. **搜索**：拼出带筛选条件的职位搜索地址并导航
//! 3. **结果循环**：逐个处理职位卡片，单个卡片失败不影响后续
//! 4. **翻页**：本页处理完后点击"下一页"，按钮不存在或不可用时结束
//! 5. **全局统计**：汇总所有职位的处理结果
//!
//! ## 设计特点
//!
//! - **资源所有者**：唯一持有 Browser 的模块
//! - **严格顺序**：同一时刻只有一个申请在进行

use std::path::Path;

use anyhow::{Context, Result};
use chromiumoxide::Browser;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::browser;
use crate::config::{Config, Timing};
use crate::error::{AppError, AppResult, ConfigError, ResumeError};
use crate::infrastructure::{settle, AutomationSurface, ChromiumSurface, Condition};
use crate::markup::{load_selector_set, Control, MarkupProfile, SelectorSet};
use crate::orchestrator::job_processor::{AlwaysApply, JobOutcome, JobProcessor};
use crate::services::{load_resume, LlmOracle, PdfResumeReader};
use crate::utils::logging::{log_page_start, log_startup, print_final_stats};

/// 职位搜索页地址
pub const JOBS_SEARCH_URL: &str = "https://www.linkedin.com/jobs/search/";

/// 复用已打开标签页时匹配的域名
const SITE_HOST: &str = "linkedin.com";

/// 运行统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    /// 处理过的结果页
    pub pages: usize,
    /// 处理过的职位卡片
    pub jobs_seen: usize,
    /// 已提交
    pub applied: usize,
    /// 进入申请但未提交
    pub abandoned: usize,
    /// 不匹配而跳过
    pub skipped: usize,
    /// 处理过程中出错
    pub errors: usize,
}

impl RunStats {
    fn record(&mut self, outcome: &JobOutcome) {
        match outcome {
            JobOutcome::Attempted(report) if report.outcome.is_submitted() => self.applied += 1,
            JobOutcome::Attempted(_) => self.abandoned += 1,
            JobOutcome::NotFit => self.skipped += 1,
        }
    }
}

/// 拼出职位搜索地址
///
/// 关键字、地点、仅 Easy Apply、24 小时内发布
pub fn build_search_url(config: &Config) -> Result<Url, ConfigError> {
    let mut params = vec![
        ("keywords", config.job_keywords.as_str()),
        ("location", config.job_location.as_str()),
    ];
    if config.easy_apply_only {
        params.push(("f_AL", "true"));
    }
    if config.past_24_hours {
        params.push(("f_TPR", "r86400"));
    }
    Ok(Url::parse_with_params(JOBS_SEARCH_URL, &params)?)
}

/// 处理整个结果列表（含翻页）
///
/// 每处理完一个职位后按序号重新查询卡片，避免页面重渲染后的失效句柄。
pub async fn run_listing<S: AutomationSurface>(
    surface: &S,
    markup: &dyn MarkupProfile,
    processor: &JobProcessor<'_, S>,
    timing: &Timing,
    max_pages: Option<usize>,
) -> RunStats {
    let (card_selector, _, _) = markup.listing();
    let mut stats = RunStats::default();
    let mut page_number = 1;

    loop {
        let cards = match surface
            .wait_for(card_selector, Condition::Present, timing.control_timeout)
            .await
        {
            Ok(_) => surface.find_all(card_selector).await.map(|c| c.len()).unwrap_or(0),
            Err(e) => {
                debug!("第 {} 页没有职位卡片: {}", page_number, e);
                0
            }
        };

        if cards == 0 {
            warn!("⚠️ 第 {} 页没有职位卡片，结束", page_number);
            break;
        }

        stats.pages += 1;
        log_page_start(page_number, cards);

        for index in 0..cards {
            let card = match surface.find_all(card_selector).await {
                Ok(found) => found.into_iter().nth(index),
                Err(e) => {
                    error!("[第{}页] 重新读取职位卡片失败: {}", page_number, e);
                    None
                }
            };
            let Some(card) = card else {
                warn!("[第{}页] ⚠️ 第 {} 张卡片已不存在，结束本页", page_number, index + 1);
                break;
            };

            stats.jobs_seen += 1;
            match processor.process_job(&card, stats.jobs_seen, page_number).await {
                Ok(outcome) => stats.record(&outcome),
                Err(e) => {
                    error!("[职位 #{} 第{}页] ❌ 处理失败: {:#}", stats.jobs_seen, page_number, e);
                    stats.errors += 1;
                }
            }
        }

        if max_pages.is_some_and(|max| page_number >= max) {
            info!("已达到最大页数 {}，结束", page_number);
            break;
        }
        if !go_to_next_page(surface, markup, timing).await {
            info!("没有更多结果页");
            break;
        }
        page_number += 1;
    }

    stats
}

/// 点击"下一页"，按钮在超时内没有变为可点击时返回 false
///
/// 最后一个职位的弹窗关闭后分页器可能稍晚才渲染，所以这里要等待而不是直接查找
async fn go_to_next_page<S: AutomationSurface>(
    surface: &S,
    markup: &dyn MarkupProfile,
    timing: &Timing,
) -> bool {
    let selector = markup.control(Control::NextPage);

    let next = match surface
        .wait_for(selector, Condition::Clickable, timing.control_timeout)
        .await
    {
        Ok(next) => next,
        Err(e) if e.is_absent() => return false,
        Err(e) => {
            warn!("⚠️ 查找下一页按钮失败: {}", e);
            return false;
        }
    };

    if let Err(e) = surface.click(&next).await {
        warn!("⚠️ 点击下一页失败: {}", e);
        return false;
    }
    info!("➡️ 翻到下一页");
    settle(timing.settle_delay).await;
    true
}

/// 应用主结构
pub struct App {
    config: Config,
    browser: Browser,
    events: JoinHandle<()>,
    surface: ChromiumSurface,
    markup: SelectorSet,
    oracle: LlmOracle,
    resume: String,
}

impl App {
    /// 初始化应用
    ///
    /// 简历读取放在连接浏览器之前：没有简历就不需要浏览器
    pub async fn initialize(config: Config) -> AppResult<Self> {
        let resume_path = config
            .resume_path
            .clone()
            .ok_or(ConfigError::MissingResumePath)?;
        log_startup(&config, &resume_path);

        // PDF 解析是纯 CPU 工作，放到阻塞线程池
        let path = resume_path.clone();
        let resume = tokio::task::spawn_blocking(move || load_resume(&PdfResumeReader, Path::new(&path)))
            .await
            .map_err(|e| {
                warn!("⚠️ 简历读取任务失败: {}", e);
                ResumeError::EmptyText {
                    path: resume_path.clone(),
                }
            })??;
        let markup = load_selector_set(config.selectors_file.as_deref()).await?;

        let (browser, page, events) = if config.browser_launch {
            browser::launch_browser(
                config.browser_headless,
                config.chrome_executable.as_deref(),
                config.chrome_user_data_dir.as_deref(),
            )
            .await?
        } else {
            browser::connect_to_browser_and_page(config.browser_debug_port, Some(SITE_HOST)).await?
        };

        let oracle = LlmOracle::new(&config);

        Ok(Self {
            config,
            browser,
            events,
            surface: ChromiumSurface::new(page),
            markup,
            oracle,
            resume,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<RunStats> {
        let url = build_search_url(&self.config).map_err(AppError::from)?;
        info!("🔍 打开职位搜索: {}", url);
        self.surface
            .navigate(url.as_str())
            .await
            .map_err(AppError::from)
            .with_context(|| format!("导航到 {} 失败", url))?;
        settle(self.config.timing.settle_delay).await;

        let processor = JobProcessor::new(
            &self.surface,
            &self.markup,
            &self.oracle,
            &self.resume,
            &self.config.timing,
            &AlwaysApply,
        );
        let stats = run_listing(
            &self.surface,
            &self.markup,
            &processor,
            &self.config.timing,
            self.config.max_result_pages,
        )
        .await;

        print_final_stats(&stats);
        Ok(stats)
    }

    /// 释放浏览器会话
    ///
    /// 自行启动的浏览器会被关闭；连接的浏览器只断开，不关闭用户的窗口
    pub async fn shutdown(self) {
        let Self {
            config,
            mut browser,
            events,
            ..
        } = self;

        if config.browser_launch {
            if let Err(e) = browser.close().await {
                warn!("⚠️ 关闭浏览器失败: {}", e);
            }
            let _ = browser.wait().await;
        }
        events.abort();
        info!("浏览器会话已释放");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::fake::{FakeDom, FakeNode, FakeSurface, NodeId};
    use crate::services::oracle::scripted::ScriptedOracle;

    #[test]
    fn test_search_url_carries_filters() {
        let url = build_search_url(&Config::default()).unwrap();
        let query: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(url.host_str(), Some("www.linkedin.com"));
        assert!(query.contains(&("keywords".into(), "deep learning".into())));
        assert!(query.contains(&("location".into(), "Malaysia".into())));
        assert!(query.contains(&("f_AL".into(), "true".into())));
        assert!(query.contains(&("f_TPR".into(), "r86400".into())));
    }

    #[test]
    fn test_search_url_without_filters() {
        let config = Config {
            easy_apply_only: false,
            past_24_hours: false,
            job_keywords: "rust & go".to_string(),
            ..Config::default()
        };
        let url = build_search_url(&config).unwrap();
        assert!(!url.as_str().contains("f_AL"));
        assert!(!url.as_str().contains("f_TPR"));
        assert!(url.as_str().contains("keywords=rust+%26+go"));
    }

    /// 每张卡片：标题链接，点击后出现描述；页面上常驻 Easy Apply 和提交按钮
    fn add_card(dom: &mut FakeDom, m: &SelectorSet, title: &str) -> NodeId {
        let (card_sel, link_sel, description_sel) = m.listing();
        let card = dom.add_root(FakeNode::matching(&[card_sel]));
        let link = dom.add_child(card, FakeNode::matching(&[link_sel]).text(title));
        let description_sel = description_sel.to_string();
        dom.on_click(link, move |dom| {
            dom.add_root(FakeNode::matching(&[&description_sel]).text("About the job"));
        });
        card
    }

    fn apply_controls(dom: &mut FakeDom, m: &SelectorSet) {
        dom.add_root(FakeNode::matching(&[m.control(Control::ApplyTrigger)]));
        dom.add_root(FakeNode::matching(&[m.control(Control::Submit)]));
    }

    async fn run(dom: FakeDom, m: &SelectorSet, max_pages: Option<usize>) -> RunStats {
        let surface = FakeSurface::new(dom);
        let oracle = ScriptedOracle::new();
        let timing = Timing::immediate();
        let processor = JobProcessor::new(&surface, m, &oracle, "resume", &timing, &AlwaysApply);
        run_listing(&surface, m, &processor, &timing, max_pages).await
    }

    #[tokio::test]
    async fn test_every_card_is_processed() {
        let m = SelectorSet::default();
        let mut dom = FakeDom::default();
        add_card(&mut dom, &m, "Job A");
        add_card(&mut dom, &m, "Job B");
        apply_controls(&mut dom, &m);

        let stats = run(dom, &m, None).await;

        assert_eq!(stats.pages, 1);
        assert_eq!(stats.jobs_seen, 2);
        assert_eq!(stats.applied, 2);
        assert_eq!(stats.errors, 0);
    }

    #[tokio::test]
    async fn test_bad_card_does_not_stop_the_run() {
        let m = SelectorSet::default();
        let mut dom = FakeDom::default();
        // 没有标题链接的卡片
        dom.add_root(FakeNode::matching(&[m.listing().0]));
        add_card(&mut dom, &m, "Job B");
        apply_controls(&mut dom, &m);

        let stats = run(dom, &m, None).await;

        assert_eq!(stats.jobs_seen, 2);
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.applied, 1);
    }

    #[tokio::test]
    async fn test_no_terminal_button_counts_as_abandoned() {
        let m = SelectorSet::default();
        let mut dom = FakeDom::default();
        add_card(&mut dom, &m, "Job A");
        dom.add_root(FakeNode::matching(&[m.control(Control::ApplyTrigger)]));

        let stats = run(dom, &m, None).await;

        assert_eq!(stats.abandoned, 1);
        assert_eq!(stats.applied, 0);
    }

    #[tokio::test]
    async fn test_pagination_follows_next_page() {
        let m = SelectorSet::default();
        let mut dom = FakeDom::default();
        let first = add_card(&mut dom, &m, "Job A");
        apply_controls(&mut dom, &m);
        let next_page = dom.add_root(FakeNode::matching(&[m.control(Control::NextPage)]));

        // 翻页后：旧卡片消失，出现新卡片，"下一页"变为禁用
        let card_sel = m.listing().0.to_string();
        let link_sel = m.listing().1.to_string();
        let description_sel = m.listing().2.to_string();
        let next_sel = m.control(Control::NextPage).to_string();
        dom.on_click(next_page, move |dom| {
            dom.detach(first);
            dom.detach(next_page);
            let card = dom.add_root(FakeNode::matching(&[&card_sel]));
            dom.add_child(card, FakeNode::matching(&[&link_sel]).text("Job B"));
            dom.add_root(FakeNode::matching(&[&description_sel]));
            dom.add_root(FakeNode::matching(&[&next_sel]).disabled());
        });

        let stats = run(dom, &m, None).await;

        assert_eq!(stats.pages, 2);
        assert_eq!(stats.jobs_seen, 2);
        assert_eq!(stats.applied, 2);
    }

    #[tokio::test]
    async fn test_disabled_next_page_ends_the_run() {
        let m = SelectorSet::default();
        let mut dom = FakeDom::default();
        add_card(&mut dom, &m, "Job A");
        apply_controls(&mut dom, &m);
        let next_page = dom.add_root(FakeNode::matching(&[m.control(Control::NextPage)]).disabled());

        let surface = FakeSurface::new(dom);
        let oracle = ScriptedOracle::new();
        let timing = Timing::immediate();
        let processor = JobProcessor::new(&surface, &m, &oracle, "resume", &timing, &AlwaysApply);
        let stats = run_listing(&surface, &m, &processor, &timing, None).await;

        assert_eq!(stats.pages, 1);
        assert!(!surface.clicked(next_page));
    }

    #[tokio::test]
    async fn test_next_page_rendered_after_dismiss_is_followed() {
        let m = SelectorSet::default();
        let mut dom = FakeDom::default();
        let first = add_card(&mut dom, &m, "Job A");
        apply_controls(&mut dom, &m);
        let dismiss = dom.add_root(FakeNode::matching(&[m.control(Control::Dismiss)]));

        // 分页器在申请弹窗关闭之后才出现
        let next_sel = m.control(Control::NextPage).to_string();
        let card_sel = m.listing().0.to_string();
        let mut rendered = false;
        dom.on_click(dismiss, move |dom| {
            if rendered {
                return;
            }
            rendered = true;
            let next_page = dom.add_root(FakeNode::matching(&[&next_sel]));
            let card_sel = card_sel.clone();
            dom.on_click(next_page, move |dom| {
                dom.detach(first);
                dom.detach(next_page);
                dom.add_root(FakeNode::matching(&[&card_sel]));
            });
        });

        let stats = run(dom, &m, None).await;

        assert_eq!(stats.pages, 2);
        assert_eq!(stats.jobs_seen, 2);
    }

    #[tokio::test]
    async fn test_max_pages_stops_pagination() {
        let m = SelectorSet::default();
        let mut dom = FakeDom::default();
        add_card(&mut dom, &m, "Job A");
        apply_controls(&mut dom, &m);
        let next_page = dom.add_root(FakeNode::matching(&[m.control(Control::NextPage)]));

        let surface = FakeSurface::new(dom);
        let oracle = ScriptedOracle::new();
        let timing = Timing::immediate();
        let processor = JobProcessor::new(&surface, &m, &oracle, "resume", &timing, &AlwaysApply);
        let stats = run_listing(&surface, &m, &processor, &timing, Some(1)).await;

        assert_eq!(stats.pages, 1);
        assert!(!surface.clicked(next_page));
    }

    #[tokio::test]
    async fn test_empty_listing() {
        let m = SelectorSet::default();
        let stats = run(FakeDom::default(), &m, None).await;
        assert_eq!(stats, RunStats::default());
    }
}
