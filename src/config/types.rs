use serde::Deserialize;

/// Realistic desktop Chrome identity presented to the target site.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/108.0.0.0 Safari/537.36";

/// Main configuration structure for Etalase
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub traversal: TraversalConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Target site configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Base URL of the target marketplace, used to resolve relative
    /// product links and to reject foreign URLs up front
    #[serde(rename = "base-url")]
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://shopee.co.id".to_string(),
        }
    }
}

/// Browser session configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserConfig {
    /// Address of the WebDriver server (e.g. chromedriver)
    #[serde(rename = "webdriver-url")]
    pub webdriver_url: String,

    /// Run the browser without a visible window
    #[serde(default = "default_true")]
    pub headless: bool,

    /// Fixed viewport width in pixels
    #[serde(rename = "window-width", default = "default_window_width")]
    pub window_width: u32,

    /// Fixed viewport height in pixels
    #[serde(rename = "window-height", default = "default_window_height")]
    pub window_height: u32,

    /// Client identity string presented to the target site
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".to_string(),
            headless: true,
            window_width: default_window_width(),
            window_height: default_window_height(),
            user_agent: default_user_agent(),
        }
    }
}

/// Traversal pacing and timeout configuration
///
/// All delays are randomized uniformly within their `[min, max]` range to
/// emulate human pacing and avoid load spikes on the target.
#[derive(Debug, Clone, Deserialize)]
pub struct TraversalConfig {
    /// Seconds to wait for the listing container after navigation
    #[serde(rename = "page-load-timeout", default = "default_page_load_timeout")]
    pub page_load_timeout: u64,

    /// Seconds to wait for pagination / expansion controls
    #[serde(rename = "control-wait-timeout", default = "default_control_wait")]
    pub control_wait_timeout: u64,

    /// Maximum scroll-to-bottom passes per page
    #[serde(rename = "max-scroll-passes", default = "default_scroll_passes")]
    pub max_scroll_passes: u32,

    /// Pause between scroll passes, milliseconds
    #[serde(rename = "scroll-pause-min-ms", default = "default_scroll_pause_min")]
    pub scroll_pause_min_ms: u64,
    #[serde(rename = "scroll-pause-max-ms", default = "default_scroll_pause_max")]
    pub scroll_pause_max_ms: u64,

    /// Delay after advancing to the next page, milliseconds
    #[serde(rename = "page-delay-min-ms", default = "default_page_delay_min")]
    pub page_delay_min_ms: u64,
    #[serde(rename = "page-delay-max-ms", default = "default_page_delay_max")]
    pub page_delay_max_ms: u64,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            page_load_timeout: default_page_load_timeout(),
            control_wait_timeout: default_control_wait(),
            max_scroll_passes: default_scroll_passes(),
            scroll_pause_min_ms: default_scroll_pause_min(),
            scroll_pause_max_ms: default_scroll_pause_max(),
            page_delay_min_ms: default_page_delay_min(),
            page_delay_max_ms: default_page_delay_max(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving one CSV file per completed run.
    /// The ETALASE_OUTPUT_DIR environment variable overrides this.
    #[serde(default = "default_output_dir")]
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_window_width() -> u32 {
    1920
}

fn default_window_height() -> u32 {
    1080
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_page_load_timeout() -> u64 {
    20
}

fn default_control_wait() -> u64 {
    5
}

fn default_scroll_passes() -> u32 {
    3
}

fn default_scroll_pause_min() -> u64 {
    1_000
}

fn default_scroll_pause_max() -> u64 {
    3_000
}

fn default_page_delay_min() -> u64 {
    2_000
}

fn default_page_delay_max() -> u64 {
    8_000
}

fn default_output_dir() -> String {
    "./harvests".to_string()
}
