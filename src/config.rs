use std::time::Duration;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 简历文件路径（命令行参数优先）
    pub resume_path: Option<String>,
    /// 浏览器调试端口
    pub browser_debug_port: u16,
    /// 是否自行启动浏览器（否则连接已登录的浏览器）
    pub browser_launch: bool,
    /// 自行启动时是否无头
    pub browser_headless: bool,
    /// 自行启动时使用的浏览器可执行文件
    pub chrome_executable: Option<String>,
    /// 自行启动时使用的用户数据目录（保留登录状态）
    pub chrome_user_data_dir: Option<String>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- 搜索配置 ---
    pub job_keywords: String,
    pub job_location: String,
    pub easy_apply_only: bool,
    pub past_24_hours: bool,
    /// 最多翻几页结果（None 表示直到没有下一页）
    pub max_result_pages: Option<usize>,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    pub oracle_timeout: Duration,
    // --- 页面结构 ---
    /// 覆盖默认选择器的 TOML 文件
    pub selectors_file: Option<String>,
    pub timing: Timing,
}

/// 等待与节奏参数
#[derive(Clone, Debug)]
pub struct Timing {
    /// 普通控件（下一步 / 审核 / 提交 / 关闭）的等待上限
    pub control_timeout: Duration,
    /// Easy Apply 按钮的等待上限
    pub apply_timeout: Duration,
    /// 每次点击后让页面稳定的时间
    pub settle_delay: Duration,
    /// 打开申请表后等待第一页渲染的时间
    pub form_open_delay: Duration,
    /// "下一步" 最多连续点击次数
    pub max_advance_steps: usize,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            control_timeout: Duration::from_secs(10),
            apply_timeout: Duration::from_secs(5),
            settle_delay: Duration::from_millis(2000),
            form_open_delay: Duration::from_millis(5000),
            max_advance_steps: 25,
        }
    }
}

impl Timing {
    /// 所有等待都为零，供测试使用
    pub fn immediate() -> Self {
        Self {
            control_timeout: Duration::ZERO,
            apply_timeout: Duration::ZERO,
            settle_delay: Duration::ZERO,
            form_open_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            resume_path: None,
            browser_debug_port: 9222,
            browser_launch: false,
            browser_headless: false,
            chrome_executable: None,
            chrome_user_data_dir: None,
            verbose_logging: false,
            job_keywords: "deep learning".to_string(),
            job_location: "Malaysia".to_string(),
            easy_apply_only: true,
            past_24_hours: true,
            max_result_pages: None,
            llm_api_key: "ollama".to_string(),
            llm_api_base_url: "http://localhost:11434/v1".to_string(),
            llm_model_name: "mistral".to_string(),
            oracle_timeout: Duration::from_secs(120),
            selectors_file: None,
            timing: Timing::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        let timing = Timing {
            control_timeout: env_parse("CONTROL_TIMEOUT_SECS").map(Duration::from_secs).unwrap_or(default.timing.control_timeout),
            apply_timeout: env_parse("APPLY_TIMEOUT_SECS").map(Duration::from_secs).unwrap_or(default.timing.apply_timeout),
            settle_delay: env_parse("SETTLE_DELAY_MS").map(Duration::from_millis).unwrap_or(default.timing.settle_delay),
            form_open_delay: env_parse("FORM_OPEN_DELAY_MS").map(Duration::from_millis).unwrap_or(default.timing.form_open_delay),
            max_advance_steps: env_parse("MAX_ADVANCE_STEPS").unwrap_or(default.timing.max_advance_steps),
        };
        Self {
            resume_path: std::env::var("RESUME_PATH").ok().or(default.resume_path),
            browser_debug_port: env_parse("BROWSER_DEBUG_PORT").unwrap_or(default.browser_debug_port),
            browser_launch: env_parse("BROWSER_LAUNCH").unwrap_or(default.browser_launch),
            browser_headless: env_parse("BROWSER_HEADLESS").unwrap_or(default.browser_headless),
            chrome_executable: std::env::var("CHROME_EXECUTABLE").ok().or(default.chrome_executable),
            chrome_user_data_dir: std::env::var("CHROME_USER_DATA_DIR").ok().or(default.chrome_user_data_dir),
            verbose_logging: env_parse("VERBOSE_LOGGING").unwrap_or(default.verbose_logging),
            job_keywords: std::env::var("JOB_KEYWORDS").unwrap_or(default.job_keywords),
            job_location: std::env::var("JOB_LOCATION").unwrap_or(default.job_location),
            easy_apply_only: env_parse("EASY_APPLY_ONLY").unwrap_or(default.easy_apply_only),
            past_24_hours: env_parse("PAST_24_HOURS").unwrap_or(default.past_24_hours),
            max_result_pages: env_parse("MAX_RESULT_PAGES").or(default.max_result_pages),
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            oracle_timeout: env_parse("ORACLE_TIMEOUT_SECS").map(Duration::from_secs).unwrap_or(default.oracle_timeout),
            selectors_file: std::env::var("SELECTORS_FILE").ok().or(default.selectors_file),
            timing,
        }
    }
}

/// 读取并解析环境变量，不存在或解析失败时返回 None
fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
