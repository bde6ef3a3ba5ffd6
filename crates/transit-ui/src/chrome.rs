//! Real Chrome session over the DevTools protocol.
//!
//! Only compiled with the `browser` feature. Launch configuration follows the
//! suite's CI setup: headless by default, 1920×1080 window, optional
//! user-agent override. Element state is read through a small snapshot script
//! evaluated per query, so the session hands out state readouts rather than
//! live handles.

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::future::BoxFuture;
use futures::StreamExt;
use tokio::sync::Mutex;

use async_trait::async_trait;

use crate::config::CalculatorConfig;
use crate::page::CalculatorPage;
use crate::result::{UiError, UiResult};
use crate::session::{BrowserSession, ElementSnapshot};

/// Embed a string into generated JavaScript as a quoted literal.
fn js_literal(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| String::from("\"\""))
}

/// Snapshot script shared by [`ChromeSession::query`] and
/// [`ChromeSession::query_all`]: computes visibility from layout and
/// computed style, and a re-resolvable address for each matched element.
fn snapshot_js(selector: &str, all: bool) -> String {
    let sel = js_literal(selector);
    let collect = if all {
        "Array.from(document.querySelectorAll(sel))"
    } else {
        "[document.querySelector(sel)].filter(Boolean)"
    };
    format!(
        r"(() => {{
            const sel = {sel};
            const cssPath = (el) => {{
                if (el.id) return '#' + el.id;
                const parts = [];
                while (el && el.nodeType === Node.ELEMENT_NODE) {{
                    let part = el.tagName.toLowerCase();
                    if (el.id) {{ parts.unshift(part + '#' + el.id); break; }}
                    const siblings = el.parentNode
                        ? Array.from(el.parentNode.children).filter(s => s.tagName === el.tagName)
                        : [];
                    if (siblings.length > 1) {{
                        part += ':nth-of-type(' + (siblings.indexOf(el) + 1) + ')';
                    }}
                    parts.unshift(part);
                    el = el.parentNode;
                }}
                return parts.join(' > ');
            }};
            const snapshot = (el) => {{
                const style = window.getComputedStyle(el);
                const rect = el.getBoundingClientRect();
                return {{
                    selector: cssPath(el),
                    tag: el.tagName.toLowerCase(),
                    id: el.id || null,
                    visible: style.display !== 'none'
                        && style.visibility !== 'hidden'
                        && rect.width > 0
                        && rect.height > 0,
                    enabled: !el.disabled,
                    text: el.innerText || '',
                    value: ('value' in el) ? String(el.value) : null,
                }};
            }};
            return {collect}.map(snapshot);
        }})()"
    )
}

/// Browser session backed by a launched Chrome instance.
#[derive(Debug)]
pub struct ChromeSession {
    browser: Mutex<Browser>,
    page: Page,
    #[allow(dead_code)]
    handle: tokio::task::JoinHandle<()>,
}

impl ChromeSession {
    /// Launch Chrome with the session options from `config`.
    ///
    /// # Errors
    ///
    /// [`UiError::BrowserLaunch`] when Chrome cannot be started or the
    /// initial page cannot be created.
    pub async fn launch(config: &CalculatorConfig) -> UiResult<Self> {
        let (width, height) = config.window;
        let mut builder = BrowserConfig::builder().window_size(width, height);
        if !config.headless {
            builder = builder.with_head();
        }
        if let Some(ua) = &config.user_agent {
            builder = builder.arg(format!("--user-agent={ua}"));
        }

        let browser_config = builder.build().map_err(|message| UiError::BrowserLaunch {
            message,
        })?;

        let (browser, mut handler) =
            Browser::launch(browser_config)
                .await
                .map_err(|e| UiError::BrowserLaunch {
                    message: e.to_string(),
                })?;

        let handle = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| UiError::BrowserLaunch {
                message: e.to_string(),
            })?;

        tracing::info!(headless = config.headless, "chrome session started");
        Ok(Self {
            browser: Mutex::new(browser),
            page,
            handle,
        })
    }

    async fn find(&self, selector: &str) -> UiResult<chromiumoxide::element::Element> {
        self.page
            .find_element(selector)
            .await
            .map_err(|e| UiError::Session {
                message: format!("no element matches {selector}: {e}"),
            })
    }

    async fn eval<T: serde::de::DeserializeOwned>(&self, script: &str) -> UiResult<T> {
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| UiError::Script {
                message: e.to_string(),
            })?;
        result.into_value().map_err(|e| UiError::Script {
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl BrowserSession for ChromeSession {
    async fn open(&self, url: &str) -> UiResult<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| UiError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn query(&self, selector: &str) -> UiResult<Option<ElementSnapshot>> {
        let mut snapshots: Vec<ElementSnapshot> =
            self.eval(&snapshot_js(selector, false)).await?;
        Ok(if snapshots.is_empty() {
            None
        } else {
            Some(snapshots.swap_remove(0))
        })
    }

    async fn query_all(&self, selector: &str) -> UiResult<Vec<ElementSnapshot>> {
        self.eval(&snapshot_js(selector, true)).await
    }

    async fn click(&self, selector: &str) -> UiResult<()> {
        let element = self.find(selector).await?;
        element.click().await.map_err(|e| UiError::Session {
            message: format!("click on {selector} failed: {e}"),
        })?;
        Ok(())
    }

    async fn clear(&self, selector: &str) -> UiResult<()> {
        let element = self.find(selector).await?;
        element
            .call_js_fn(
                "function() { \
                     this.value = ''; \
                     this.dispatchEvent(new Event('input', { bubbles: true })); \
                     this.dispatchEvent(new Event('change', { bubbles: true })); \
                 }",
                false,
            )
            .await
            .map_err(|e| UiError::Session {
                message: format!("clear of {selector} failed: {e}"),
            })?;
        Ok(())
    }

    async fn type_text(&self, selector: &str, text: &str) -> UiResult<()> {
        let element = self.find(selector).await?;
        // A click both focuses the field and matches how a user reaches it.
        element.click().await.map_err(|e| UiError::Session {
            message: format!("focus of {selector} failed: {e}"),
        })?;
        element.type_str(text).await.map_err(|e| UiError::Session {
            message: format!("typing into {selector} failed: {e}"),
        })?;
        Ok(())
    }

    async fn scroll_into_view(&self, selector: &str) -> UiResult<()> {
        let element = self.find(selector).await?;
        element
            .scroll_into_view()
            .await
            .map_err(|e| UiError::Session {
                message: format!("scroll to {selector} failed: {e}"),
            })?;
        Ok(())
    }

    async fn select_by_value(&self, selector: &str, value: &str) -> UiResult<bool> {
        let script = format!(
            r"(() => {{
                const select = document.querySelector({sel});
                if (!select || select.tagName.toLowerCase() !== 'select') return false;
                const option = Array.from(select.options)
                    .find(o => o.value === {val});
                if (!option) return false;
                select.value = option.value;
                select.dispatchEvent(new Event('input', {{ bubbles: true }}));
                select.dispatchEvent(new Event('change', {{ bubbles: true }}));
                return true;
            }})()",
            sel = js_literal(selector),
            val = js_literal(value),
        );
        self.eval(&script).await
    }

    async fn select_by_label(&self, selector: &str, label: &str) -> UiResult<bool> {
        let script = format!(
            r"(() => {{
                const select = document.querySelector({sel});
                if (!select || select.tagName.toLowerCase() !== 'select') return false;
                const option = Array.from(select.options)
                    .find(o => o.label.trim() === {lab} || o.text.trim() === {lab});
                if (!option) return false;
                select.value = option.value;
                select.dispatchEvent(new Event('input', {{ bubbles: true }}));
                select.dispatchEvent(new Event('change', {{ bubbles: true }}));
                return true;
            }})()",
            sel = js_literal(selector),
            lab = js_literal(label),
        );
        self.eval(&script).await
    }

    async fn execute_script(&self, script: &str) -> UiResult<serde_json::Value> {
        self.eval(script).await
    }

    async fn quit(&self) -> UiResult<()> {
        let mut browser = self.browser.lock().await;
        browser.close().await.map_err(|e| UiError::Session {
            message: format!("browser close failed: {e}"),
        })?;
        tracing::info!("chrome session closed");
        Ok(())
    }
}

/// Launch Chrome, run a scenario against the calculator page and always shut
/// the browser down again, whatever the scenario did.
///
/// The scenario returns a boxed future so it may borrow the page it is
/// handed: `with_chrome(config, |page| Box::pin(async move { ... }))`.
///
/// # Errors
///
/// Launch failures, then whatever the scenario returned; a clean scenario
/// still fails when the browser cannot be shut down.
pub async fn with_chrome<F, T>(config: CalculatorConfig, scenario: F) -> UiResult<T>
where
    F: for<'a> FnOnce(&'a CalculatorPage<ChromeSession>) -> BoxFuture<'a, UiResult<T>>,
{
    let session = ChromeSession::launch(&config).await?;
    let page = CalculatorPage::new(session, config);
    crate::page::with_page(&page, scenario).await
}
