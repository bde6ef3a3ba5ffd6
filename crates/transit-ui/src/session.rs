//! Browser session capability and the element addressing vocabulary.
//!
//! The harness never holds live element handles. Every operation is addressed
//! by a [`Locator`] and re-resolved by the session at the moment it runs, so
//! an element being replaced in the DOM between two actions is invisible to
//! callers. Sessions answer element queries with [`ElementSnapshot`]s: plain
//! state readouts taken at poll time, valid only for the poll that produced
//! them.

use std::borrow::Cow;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::result::UiResult;

/// Declarative address of a DOM region: a CSS selector plus the human
/// readable region name used in errors and logs.
///
/// Registry locators are `const`-constructed; narrowed locators (for example
/// an option inside an open dropdown) are built at interaction time with
/// [`Locator::narrowed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    name: &'static str,
    selector: Cow<'static, str>,
}

impl Locator {
    /// Create a locator for a fixed page region.
    #[must_use]
    pub const fn new(name: &'static str, selector: &'static str) -> Self {
        Self {
            name,
            selector: Cow::Borrowed(selector),
        }
    }

    /// Create a locator whose selector was computed at interaction time.
    #[must_use]
    pub fn narrowed(name: &'static str, selector: String) -> Self {
        Self {
            name,
            selector: Cow::Owned(selector),
        }
    }

    /// Region name used in diagnostics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// CSS selector string.
    #[must_use]
    pub fn selector(&self) -> &str {
        &self.selector
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.selector)
    }
}

/// State of one matched element at the moment of a single query.
///
/// `selector` is a concrete address that re-resolves to the same element,
/// usable for a follow-up action on it. A snapshot is never cached across
/// polls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementSnapshot {
    /// Concrete re-resolvable selector for this element
    pub selector: String,
    /// Lowercase tag name
    pub tag: String,
    /// Element id attribute, if any
    pub id: Option<String>,
    /// Whether the element is rendered and takes up space
    pub visible: bool,
    /// Whether the element is enabled for interaction
    pub enabled: bool,
    /// Rendered text content
    pub text: String,
    /// Current input value, for form controls
    pub value: Option<String>,
}

impl ElementSnapshot {
    /// Create a snapshot with the given address and tag; visible and enabled
    /// by default.
    #[must_use]
    pub fn new(selector: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            tag: tag.into(),
            id: None,
            visible: true,
            enabled: true,
            text: String::new(),
            value: None,
        }
    }

    /// An element is clickable when it is both visible and enabled.
    #[must_use]
    pub const fn is_clickable(&self) -> bool {
        self.visible && self.enabled
    }
}

/// Capability required from a browser session.
///
/// The harness drives exactly these primitives; process lifecycle, headless
/// configuration and driver provisioning belong to the implementation
/// ([`crate::chrome::ChromeSession`] for a real Chrome, the scripted
/// [`crate::mock::MockCalculator`] for tests).
///
/// Selector-taking methods re-resolve the selector on every call. Queries
/// report absence as `Ok(None)` / an empty list; only genuine session faults
/// return `Err`.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// Navigate to a URL.
    async fn open(&self, url: &str) -> UiResult<()>;

    /// Resolve a selector to the first matching element, if any.
    async fn query(&self, selector: &str) -> UiResult<Option<ElementSnapshot>>;

    /// Resolve a selector to all matching elements.
    async fn query_all(&self, selector: &str) -> UiResult<Vec<ElementSnapshot>>;

    /// Click the element the selector resolves to.
    async fn click(&self, selector: &str) -> UiResult<()>;

    /// Clear the current value of an input element.
    async fn clear(&self, selector: &str) -> UiResult<()>;

    /// Type text into an input element (appends to the current value).
    async fn type_text(&self, selector: &str, text: &str) -> UiResult<()>;

    /// Scroll the element into the viewport center.
    async fn scroll_into_view(&self, selector: &str) -> UiResult<()>;

    /// Select an option of a native selection control by its value attribute.
    /// Returns whether any option matched.
    async fn select_by_value(&self, selector: &str, value: &str) -> UiResult<bool>;

    /// Select an option of a native selection control by its visible label.
    /// Returns whether any option matched.
    async fn select_by_label(&self, selector: &str, label: &str) -> UiResult<bool>;

    /// Evaluate a script in the page and return its JSON result.
    async fn execute_script(&self, script: &str) -> UiResult<serde_json::Value>;

    /// End the session, releasing the underlying browser.
    async fn quit(&self) -> UiResult<()>;
}

#[async_trait]
impl<S: BrowserSession + ?Sized> BrowserSession for std::sync::Arc<S> {
    async fn open(&self, url: &str) -> UiResult<()> {
        (**self).open(url).await
    }

    async fn query(&self, selector: &str) -> UiResult<Option<ElementSnapshot>> {
        (**self).query(selector).await
    }

    async fn query_all(&self, selector: &str) -> UiResult<Vec<ElementSnapshot>> {
        (**self).query_all(selector).await
    }

    async fn click(&self, selector: &str) -> UiResult<()> {
        (**self).click(selector).await
    }

    async fn clear(&self, selector: &str) -> UiResult<()> {
        (**self).clear(selector).await
    }

    async fn type_text(&self, selector: &str, text: &str) -> UiResult<()> {
        (**self).type_text(selector, text).await
    }

    async fn scroll_into_view(&self, selector: &str) -> UiResult<()> {
        (**self).scroll_into_view(selector).await
    }

    async fn select_by_value(&self, selector: &str, value: &str) -> UiResult<bool> {
        (**self).select_by_value(selector, value).await
    }

    async fn select_by_label(&self, selector: &str, label: &str) -> UiResult<bool> {
        (**self).select_by_label(selector, label).await
    }

    async fn execute_script(&self, script: &str) -> UiResult<serde_json::Value> {
        (**self).execute_script(script).await
    }

    async fn quit(&self) -> UiResult<()> {
        (**self).quit().await
    }
}
