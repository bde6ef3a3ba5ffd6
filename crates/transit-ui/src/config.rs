//! Session configuration.
//!
//! Consumed at construction time; nothing in here is owned by the
//! interaction layer itself. Environment overrides mirror the knobs the
//! suite is driven with in CI: `TRANSIT_BASE_URL` and `TRANSIT_HEADLESS`.

use std::time::Duration;

use crate::wait::{WaitProfile, DEFAULT_POLL_INTERVAL_MS};

/// Calculator page of the se-en site; overridable for staging environments.
pub const DEFAULT_BASE_URL: &str =
    "https://www.dhl.com/se-en/home/freight/tools/european-road-freight-transit-time-calculator.html";

/// Named wait budgets for the calculator's asynchronous behavior.
///
/// `loader_appear` is deliberately short: a fast backend answer may remove
/// the loading indicator before it ever renders, and waiting the full action
/// budget for it would only slow every submission down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitTimeouts {
    /// Budget for primary actions (element visible, clickable, page open)
    pub default: Duration,
    /// Budget for "did the transient loading indicator appear"
    pub loader_appear: Duration,
    /// Budget for "did the loading indicator go away again"
    pub loader_settle: Duration,
    /// Polling cadence shared by all profiles
    pub poll_interval: Duration,
}

impl Default for WaitTimeouts {
    fn default() -> Self {
        Self {
            default: Duration::from_secs(10),
            loader_appear: Duration::from_secs(2),
            loader_settle: Duration::from_secs(10),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

impl WaitTimeouts {
    /// Profile for primary actions.
    #[must_use]
    pub const fn default_profile(&self) -> WaitProfile {
        WaitProfile::new(self.default, self.poll_interval)
    }

    /// Short profile for transient-indicator appearance.
    #[must_use]
    pub const fn appear_profile(&self) -> WaitProfile {
        WaitProfile::new(self.loader_appear, self.poll_interval)
    }

    /// Long profile for the indicator clearing after a submission.
    #[must_use]
    pub const fn settle_profile(&self) -> WaitProfile {
        WaitProfile::new(self.loader_settle, self.poll_interval)
    }
}

/// Configuration for one calculator session.
#[derive(Debug, Clone)]
pub struct CalculatorConfig {
    /// URL of the calculator page
    pub base_url: String,
    /// Run the browser headless
    pub headless: bool,
    /// Browser window size
    pub window: (u32, u32),
    /// User agent override, if any
    pub user_agent: Option<String>,
    /// Wait budgets
    pub waits: WaitTimeouts,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            headless: true,
            window: (1920, 1080),
            user_agent: None,
            waits: WaitTimeouts::default(),
        }
    }
}

impl CalculatorConfig {
    /// Create a config with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults plus `TRANSIT_BASE_URL` / `TRANSIT_HEADLESS` environment
    /// overrides. Unparsable values fall back to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("TRANSIT_BASE_URL") {
            if !url.is_empty() {
                config.base_url = url;
            }
        }
        if let Ok(headless) = std::env::var("TRANSIT_HEADLESS") {
            if let Ok(flag) = headless.parse() {
                config.headless = flag;
            }
        }
        config
    }

    /// Set the calculator URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set headless mode.
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set the browser window size.
    #[must_use]
    pub const fn with_window(mut self, width: u32, height: u32) -> Self {
        self.window = (width, height);
        self
    }

    /// Set a user agent override.
    #[must_use]
    pub fn with_user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Replace the wait budgets.
    #[must_use]
    pub const fn with_waits(mut self, waits: WaitTimeouts) -> Self {
        self.waits = waits;
        self
    }
}
