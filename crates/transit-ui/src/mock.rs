//! Scripted stand-in for the live calculator.
//!
//! [`MockCalculator`] implements [`BrowserSession`] over an in-memory page
//! state keyed by the same selectors the real form uses, and reproduces its
//! asynchronous behavior on the tokio clock: a submission validates the
//! postcodes, shows the button loader on a scripted schedule, then lands on
//! field errors, a global retrieval error, or the result panel. Under a
//! paused-clock test runtime the whole dance is deterministic and instant.
//!
//! The country dropdowns can be rendered either as native `<select>`s or as
//! custom open-then-click widgets, so both selection protocols are coverable
//! against the same control.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::fixtures::{Country, POSTAL_CODE_ERROR, TOOL_UNAVAILABLE_ERROR};
use crate::page::{locators, FormSide};
use crate::result::{UiError, UiResult};
use crate::session::{BrowserSession, ElementSnapshot};

const COUNTRIES: [Country; 2] = [Country::CzechRepublic, Country::Sweden];

/// How the loading indicator behaves after a submission that reaches the
/// backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderBehavior {
    /// Renders `delay` after the click and clears `visible_for` later.
    Shown {
        /// Time between the click and the indicator rendering
        delay: Duration,
        /// How long the indicator stays visible
        visible_for: Duration,
    },
    /// The backend answers before the indicator ever renders.
    Skipped,
    /// The indicator renders and never clears (backend hang).
    Stuck {
        /// Time between the click and the indicator rendering
        delay: Duration,
    },
}

impl Default for LoaderBehavior {
    fn default() -> Self {
        Self::Shown {
            delay: Duration::from_millis(50),
            visible_for: Duration::from_millis(300),
        }
    }
}

/// Markup the country dropdowns are rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropdownMarkup {
    /// Standard `<select>` elements
    #[default]
    NativeSelect,
    /// Hand-rolled popup widgets
    CustomWidget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Result,
    Mismatch,
}

#[derive(Debug)]
struct Pending {
    finalize_at: Option<Instant>,
    verdict: Verdict,
}

#[derive(Debug)]
struct PageState {
    opened: bool,
    closed: bool,
    cookie_banner: bool,
    origin_country: Country,
    destination_country: Country,
    origin_postcode: String,
    destination_postcode: String,
    origin_error: Option<String>,
    destination_error: Option<String>,
    global_error: Option<String>,
    result_shown: bool,
    open_dropdown: Option<FormSide>,
    loader_from: Option<Instant>,
    loader_until: Option<Instant>,
    pending: Option<Pending>,
}

impl PageState {
    // Both sides default to Sweden, like the se-en page.
    fn new() -> Self {
        Self {
            opened: false,
            closed: false,
            cookie_banner: false,
            origin_country: Country::Sweden,
            destination_country: Country::Sweden,
            origin_postcode: String::new(),
            destination_postcode: String::new(),
            origin_error: None,
            destination_error: None,
            global_error: None,
            result_shown: false,
            open_dropdown: None,
            loader_from: None,
            loader_until: None,
            pending: None,
        }
    }

    fn country(&self, side: FormSide) -> Country {
        match side {
            FormSide::Origin => self.origin_country,
            FormSide::Destination => self.destination_country,
        }
    }

    fn postcode(&self, side: FormSide) -> &str {
        match side {
            FormSide::Origin => &self.origin_postcode,
            FormSide::Destination => &self.destination_postcode,
        }
    }

    fn postcode_mut(&mut self, side: FormSide) -> &mut String {
        match side {
            FormSide::Origin => &mut self.origin_postcode,
            FormSide::Destination => &mut self.destination_postcode,
        }
    }

    fn error(&self, side: FormSide) -> Option<&String> {
        match side {
            FormSide::Origin => self.origin_error.as_ref(),
            FormSide::Destination => self.destination_error.as_ref(),
        }
    }

    /// Materialize a scheduled backend answer once its time has come.
    fn advance(&mut self, now: Instant) {
        let due = self
            .pending
            .as_ref()
            .and_then(|p| p.finalize_at)
            .map_or(false, |at| now >= at);
        if due {
            if let Some(pending) = self.pending.take() {
                match pending.verdict {
                    Verdict::Result => self.result_shown = true,
                    Verdict::Mismatch => {
                        self.global_error = Some(TOOL_UNAVAILABLE_ERROR.to_string());
                    }
                }
            }
        }
    }

    fn loader_visible(&self, now: Instant) -> bool {
        match self.loader_from {
            Some(from) if now >= from => self.loader_until.map_or(true, |until| now < until),
            _ => false,
        }
    }

    fn submit(&mut self, loader: LoaderBehavior, now: Instant) {
        // A new submission clears whatever the previous one showed.
        self.origin_error = None;
        self.destination_error = None;
        self.global_error = None;
        self.result_shown = false;
        self.pending = None;
        self.loader_from = None;
        self.loader_until = None;

        let origin_owner = postcode_owner(&self.origin_postcode);
        let destination_owner = postcode_owner(&self.destination_postcode);

        // Client-side validation fires before any network round-trip.
        if origin_owner.is_none() {
            self.origin_error = Some(POSTAL_CODE_ERROR.to_string());
        }
        if destination_owner.is_none() {
            self.destination_error = Some(POSTAL_CODE_ERROR.to_string());
        }
        if self.origin_error.is_some() || self.destination_error.is_some() {
            return;
        }

        let verdict = if origin_owner == Some(self.origin_country)
            && destination_owner == Some(self.destination_country)
        {
            Verdict::Result
        } else {
            Verdict::Mismatch
        };

        let finalize_at = match loader {
            LoaderBehavior::Skipped => Some(now),
            LoaderBehavior::Shown { delay, visible_for } => {
                self.loader_from = Some(now + delay);
                self.loader_until = Some(now + delay + visible_for);
                Some(now + delay + visible_for)
            }
            LoaderBehavior::Stuck { delay } => {
                self.loader_from = Some(now + delay);
                self.loader_until = None;
                None
            }
        };
        self.pending = Some(Pending {
            finalize_at,
            verdict,
        });
    }
}

/// A postcode belongs to the country that accepts it; anything else is
/// invalid.
fn postcode_owner(postcode: &str) -> Option<Country> {
    let postcode = postcode.trim();
    COUNTRIES
        .into_iter()
        .find(|c| c.valid_postcode() == postcode)
}

/// In-memory calculator page with scripted asynchronous behavior.
#[derive(Debug)]
pub struct MockCalculator {
    loader: LoaderBehavior,
    markup: DropdownMarkup,
    state: Mutex<PageState>,
    calls: Mutex<Vec<String>>,
}

impl Default for MockCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCalculator {
    /// A calculator with native selects and a well-behaved loader.
    #[must_use]
    pub fn new() -> Self {
        Self {
            loader: LoaderBehavior::default(),
            markup: DropdownMarkup::default(),
            state: Mutex::new(PageState::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Script the loading indicator.
    #[must_use]
    pub fn with_loader(mut self, loader: LoaderBehavior) -> Self {
        self.loader = loader;
        self
    }

    /// Render the country dropdowns as custom open-then-click widgets.
    #[must_use]
    pub fn with_custom_dropdowns(mut self) -> Self {
        self.markup = DropdownMarkup::CustomWidget;
        self
    }

    /// Start with the cookie-consent banner present.
    #[must_use]
    pub fn with_cookie_banner(self) -> Self {
        self.state.lock().expect("mock state poisoned").cookie_banner = true;
        self
    }

    /// Calls received so far, for verification.
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.calls.lock().expect("mock call log poisoned").clone()
    }

    /// Whether any received call starts with `prefix`.
    #[must_use]
    pub fn was_called(&self, prefix: &str) -> bool {
        self.history().iter().any(|c| c.starts_with(prefix))
    }

    fn record(&self, call: String) {
        self.calls.lock().expect("mock call log poisoned").push(call);
    }

    fn guard(&self) -> UiResult<MutexGuard<'_, PageState>> {
        let state = self.state.lock().expect("mock state poisoned");
        if state.closed {
            return Err(UiError::Session {
                message: "session closed".to_string(),
            });
        }
        Ok(state)
    }

    /// The side whose country control the selector addresses, if any.
    fn country_side(selector: &str) -> Option<FormSide> {
        for side in [FormSide::Origin, FormSide::Destination] {
            if selector == side.country().selector() {
                return Some(side);
            }
        }
        None
    }

    /// The side whose postcode input the selector addresses, if any.
    fn postcode_side(selector: &str) -> Option<FormSide> {
        for side in [FormSide::Origin, FormSide::Destination] {
            if selector == side.postcode().selector() {
                return Some(side);
            }
        }
        None
    }

    /// Parse a per-option selector emitted by [`Self::option_snapshot`].
    fn parse_option(selector: &str) -> Option<(FormSide, Country)> {
        for side in [FormSide::Origin, FormSide::Destination] {
            let prefix = format!("{} [data-value='", side.country().selector());
            if let Some(rest) = selector.strip_prefix(prefix.as_str()) {
                let code = rest.strip_suffix("']")?;
                return COUNTRIES.into_iter().find(|c| c.code() == code).map(|c| (side, c));
            }
        }
        None
    }

    /// The side whose option list the selector queries, if any.
    fn options_side(selector: &str) -> Option<FormSide> {
        for side in [FormSide::Origin, FormSide::Destination] {
            let root = side.country().selector();
            if selector.starts_with(root) && selector.contains("option") {
                return Some(side);
            }
        }
        None
    }

    fn option_snapshot(side: FormSide, country: Country, visible: bool, tag: &str) -> ElementSnapshot {
        let mut snap = ElementSnapshot::new(
            format!("{} [data-value='{}']", side.country().selector(), country.code()),
            tag,
        );
        snap.visible = visible;
        snap.text = country.label().to_string();
        snap.value = Some(country.code().to_string());
        snap
    }

    fn lookup(&self, state: &PageState, selector: &str, now: Instant) -> Option<ElementSnapshot> {
        if !state.opened {
            return None;
        }

        if selector == locators::SECTION_ROOT.selector() {
            return Some(ElementSnapshot::new(selector, "section"));
        }

        if let Some(side) = Self::country_side(selector) {
            let tag = match self.markup {
                DropdownMarkup::NativeSelect => "select",
                DropdownMarkup::CustomWidget => "div",
            };
            let mut snap = ElementSnapshot::new(selector, tag);
            snap.id = selector.strip_prefix('#').map(str::to_string);
            snap.text = state.country(side).label().to_string();
            snap.value = Some(state.country(side).code().to_string());
            return Some(snap);
        }

        if let Some(side) = Self::postcode_side(selector) {
            let mut snap = ElementSnapshot::new(selector, "input");
            snap.value = Some(state.postcode(side).to_string());
            return Some(snap);
        }

        for side in [FormSide::Origin, FormSide::Destination] {
            if selector == side.error().selector() {
                return state.error(side).map(|text| {
                    let mut snap = ElementSnapshot::new(selector, "span");
                    // The live region renders the copy with padding around it.
                    snap.text = format!(" {text} ");
                    snap
                });
            }
        }

        if let Some((side, country)) = Self::parse_option(selector) {
            let open = state.open_dropdown == Some(side)
                || self.markup == DropdownMarkup::NativeSelect;
            return Some(Self::option_snapshot(side, country, open, "li"));
        }

        match selector {
            s if s == locators::CALCULATE_BUTTON.selector() => {
                Some(ElementSnapshot::new(selector, "button"))
            }
            s if s == locators::BUTTON_LOADER.selector() => {
                state
                    .loader_visible(now)
                    .then(|| ElementSnapshot::new(selector, "button"))
            }
            s if s == locators::RESULT_PANEL.selector() => {
                state
                    .result_shown
                    .then(|| ElementSnapshot::new(selector, "div"))
            }
            s if s == locators::OVERLAY.selector() => {
                state
                    .result_shown
                    .then(|| ElementSnapshot::new(selector, "div"))
            }
            s if s == locators::GLOBAL_ERROR.selector() => state.global_error.as_ref().map(|text| {
                let mut snap = ElementSnapshot::new(selector, "div");
                snap.text = text.clone();
                snap
            }),
            s if s == locators::COOKIE_ACCEPT.selector() => {
                state
                    .cookie_banner
                    .then(|| ElementSnapshot::new(selector, "button"))
            }
            _ => None,
        }
    }
}

#[async_trait]
impl BrowserSession for MockCalculator {
    async fn open(&self, url: &str) -> UiResult<()> {
        self.record(format!("open:{url}"));
        self.guard()?.opened = true;
        Ok(())
    }

    async fn query(&self, selector: &str) -> UiResult<Option<ElementSnapshot>> {
        let now = Instant::now();
        let mut state = self.guard()?;
        state.advance(now);
        Ok(self.lookup(&state, selector, now))
    }

    async fn query_all(&self, selector: &str) -> UiResult<Vec<ElementSnapshot>> {
        let now = Instant::now();
        let mut state = self.guard()?;
        state.advance(now);

        if let Some(side) = Self::options_side(selector) {
            let (visible, tag) = match self.markup {
                DropdownMarkup::NativeSelect => (true, "option"),
                DropdownMarkup::CustomWidget => (state.open_dropdown == Some(side), "li"),
            };
            if self.markup == DropdownMarkup::CustomWidget && state.open_dropdown != Some(side) {
                return Ok(Vec::new());
            }
            return Ok(COUNTRIES
                .into_iter()
                .map(|c| Self::option_snapshot(side, c, visible, tag))
                .collect());
        }

        Ok(self.lookup(&state, selector, now).into_iter().collect())
    }

    async fn click(&self, selector: &str) -> UiResult<()> {
        self.record(format!("click:{selector}"));
        let now = Instant::now();
        let mut state = self.guard()?;
        state.advance(now);

        if selector == locators::CALCULATE_BUTTON.selector() {
            state.submit(self.loader, now);
            return Ok(());
        }
        if selector == locators::COOKIE_ACCEPT.selector() {
            if !state.cookie_banner {
                return Err(UiError::Session {
                    message: "cookie banner is not present".to_string(),
                });
            }
            state.cookie_banner = false;
            return Ok(());
        }
        if let Some(side) = Self::country_side(selector) {
            if self.markup == DropdownMarkup::CustomWidget {
                state.open_dropdown = match state.open_dropdown {
                    Some(open) if open == side => None,
                    _ => Some(side),
                };
            }
            return Ok(());
        }
        if let Some((side, country)) = Self::parse_option(selector) {
            if self.markup == DropdownMarkup::CustomWidget && state.open_dropdown != Some(side) {
                return Err(UiError::Session {
                    message: format!("option {selector} clicked while the dropdown is closed"),
                });
            }
            match side {
                FormSide::Origin => state.origin_country = country,
                FormSide::Destination => state.destination_country = country,
            }
            state.open_dropdown = None;
            return Ok(());
        }

        match self.lookup(&state, selector, now) {
            Some(snap) if snap.is_clickable() => Ok(()),
            Some(_) => Err(UiError::Session {
                message: format!("element {selector} is not clickable"),
            }),
            None => Err(UiError::Session {
                message: format!("no element matches {selector}"),
            }),
        }
    }

    async fn clear(&self, selector: &str) -> UiResult<()> {
        self.record(format!("clear:{selector}"));
        let mut state = self.guard()?;
        let Some(side) = Self::postcode_side(selector) else {
            return Err(UiError::Session {
                message: format!("{selector} is not a text input"),
            });
        };
        state.postcode_mut(side).clear();
        Ok(())
    }

    async fn type_text(&self, selector: &str, text: &str) -> UiResult<()> {
        self.record(format!("type:{selector}:{text}"));
        let mut state = self.guard()?;
        let Some(side) = Self::postcode_side(selector) else {
            return Err(UiError::Session {
                message: format!("{selector} is not a text input"),
            });
        };
        // Keystrokes append; clearing is a separate, deliberate step.
        state.postcode_mut(side).push_str(text);
        Ok(())
    }

    async fn scroll_into_view(&self, selector: &str) -> UiResult<()> {
        self.record(format!("scroll:{selector}"));
        let now = Instant::now();
        let mut state = self.guard()?;
        state.advance(now);
        if self.lookup(&state, selector, now).is_none() {
            return Err(UiError::Session {
                message: format!("no element matches {selector}"),
            });
        }
        Ok(())
    }

    async fn select_by_value(&self, selector: &str, value: &str) -> UiResult<bool> {
        self.record(format!("select_value:{selector}:{value}"));
        let mut state = self.guard()?;
        let Some(side) = Self::country_side(selector) else {
            return Ok(false);
        };
        if self.markup != DropdownMarkup::NativeSelect {
            return Ok(false);
        }
        let Some(country) = COUNTRIES.into_iter().find(|c| c.code() == value) else {
            return Ok(false);
        };
        match side {
            FormSide::Origin => state.origin_country = country,
            FormSide::Destination => state.destination_country = country,
        }
        Ok(true)
    }

    async fn select_by_label(&self, selector: &str, label: &str) -> UiResult<bool> {
        self.record(format!("select_label:{selector}:{label}"));
        let mut state = self.guard()?;
        let Some(side) = Self::country_side(selector) else {
            return Ok(false);
        };
        if self.markup != DropdownMarkup::NativeSelect {
            return Ok(false);
        }
        let Some(country) = COUNTRIES.into_iter().find(|c| c.label() == label) else {
            return Ok(false);
        };
        match side {
            FormSide::Origin => state.origin_country = country,
            FormSide::Destination => state.destination_country = country,
        }
        Ok(true)
    }

    async fn execute_script(&self, script: &str) -> UiResult<serde_json::Value> {
        self.record(format!("script:{script}"));
        self.guard()?;
        Ok(serde_json::Value::Null)
    }

    async fn quit(&self) -> UiResult<()> {
        self.record("quit".to_string());
        self.state.lock().expect("mock state poisoned").closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::BrowserSession;

    async fn opened() -> MockCalculator {
        let mock = MockCalculator::new();
        mock.open("https://calculator.test/").await.unwrap();
        mock
    }

    mod element_routing {
        use super::*;

        #[tokio::test]
        async fn nothing_resolves_before_the_page_is_open() {
            let mock = MockCalculator::new();
            let root = mock.query(locators::SECTION_ROOT.selector()).await.unwrap();
            assert!(root.is_none());
        }

        #[tokio::test]
        async fn root_and_form_controls_resolve_after_open() {
            let mock = opened().await;

            let root = mock.query(locators::SECTION_ROOT.selector()).await.unwrap();
            assert!(root.is_some());

            let country = mock
                .query(locators::ORIGIN_COUNTRY.selector())
                .await
                .unwrap()
                .unwrap();
            assert_eq!(country.tag, "select");
            assert_eq!(country.value.as_deref(), Some("SE"));

            let postcode = mock
                .query(locators::ORIGIN_POSTCODE.selector())
                .await
                .unwrap()
                .unwrap();
            assert_eq!(postcode.tag, "input");
            assert_eq!(postcode.value.as_deref(), Some(""));
        }

        #[tokio::test]
        async fn error_regions_are_absent_until_validation_fires() {
            let mock = opened().await;
            let error = mock
                .query(locators::ORIGIN_POSTCODE_ERROR.selector())
                .await
                .unwrap();
            assert!(error.is_none());
        }

        #[tokio::test]
        async fn closed_session_faults_instead_of_answering() {
            let mock = opened().await;
            mock.quit().await.unwrap();
            assert!(mock.query(locators::SECTION_ROOT.selector()).await.is_err());
        }
    }

    mod dropdown_markup {
        use super::*;

        #[tokio::test]
        async fn custom_widget_reports_a_non_select_tag() {
            let mock = MockCalculator::new().with_custom_dropdowns();
            mock.open("https://calculator.test/").await.unwrap();

            let country = mock
                .query(locators::ORIGIN_COUNTRY.selector())
                .await
                .unwrap()
                .unwrap();
            assert_eq!(country.tag, "div");
        }

        #[tokio::test]
        async fn custom_options_only_exist_while_the_widget_is_open() {
            let mock = MockCalculator::new().with_custom_dropdowns();
            mock.open("https://calculator.test/").await.unwrap();
            let options_selector =
                format!("{root} option, {root} [role='option']", root = "#origin-country");

            assert!(mock.query_all(&options_selector).await.unwrap().is_empty());

            mock.click(locators::ORIGIN_COUNTRY.selector()).await.unwrap();
            let options = mock.query_all(&options_selector).await.unwrap();
            assert_eq!(options.len(), 2);
            assert!(options.iter().any(|o| o.value.as_deref() == Some("CZ")));
        }

        #[tokio::test]
        async fn clicking_an_option_sets_the_country_and_closes_the_widget() {
            let mock = MockCalculator::new().with_custom_dropdowns();
            mock.open("https://calculator.test/").await.unwrap();

            mock.click(locators::ORIGIN_COUNTRY.selector()).await.unwrap();
            mock.click("#origin-country [data-value='CZ']").await.unwrap();

            let country = mock
                .query(locators::ORIGIN_COUNTRY.selector())
                .await
                .unwrap()
                .unwrap();
            assert_eq!(country.value.as_deref(), Some("CZ"));

            let options_selector =
                format!("{root} option, {root} [role='option']", root = "#origin-country");
            assert!(mock.query_all(&options_selector).await.unwrap().is_empty());
        }

        #[tokio::test]
        async fn native_select_ignores_unknown_values_and_labels() {
            let mock = opened().await;
            let root = locators::ORIGIN_COUNTRY.selector();

            assert!(!mock.select_by_value(root, "XX").await.unwrap());
            assert!(!mock.select_by_label(root, "Atlantis").await.unwrap());
            assert!(mock.select_by_value(root, "CZ").await.unwrap());
            assert!(mock.select_by_label(root, "Sweden").await.unwrap());
        }
    }

    mod submission {
        use super::*;
        use crate::fixtures::Country;

        async fn fill(mock: &MockCalculator, origin: &str, destination: &str) {
            mock.type_text(locators::ORIGIN_POSTCODE.selector(), origin)
                .await
                .unwrap();
            mock.type_text(locators::DESTINATION_POSTCODE.selector(), destination)
                .await
                .unwrap();
        }

        #[tokio::test(start_paused = true)]
        async fn empty_submission_shows_both_field_errors_without_a_loader() {
            let mock = opened().await;
            mock.click(locators::CALCULATE_BUTTON.selector()).await.unwrap();

            let origin = mock
                .query(locators::ORIGIN_POSTCODE_ERROR.selector())
                .await
                .unwrap()
                .unwrap();
            assert_eq!(origin.text.trim(), POSTAL_CODE_ERROR);
            assert!(mock
                .query(locators::BUTTON_LOADER.selector())
                .await
                .unwrap()
                .is_none());
        }

        #[tokio::test(start_paused = true)]
        async fn loader_follows_its_script_and_the_result_lands_after_it() {
            let mock = opened().await;
            mock.select_by_value(locators::ORIGIN_COUNTRY.selector(), "CZ")
                .await
                .unwrap();
            fill(
                &mock,
                Country::CzechRepublic.valid_postcode(),
                Country::Sweden.valid_postcode(),
            )
            .await;
            mock.click(locators::CALCULATE_BUTTON.selector()).await.unwrap();

            // Not yet rendered right after the click.
            assert!(mock
                .query(locators::BUTTON_LOADER.selector())
                .await
                .unwrap()
                .is_none());

            tokio::time::sleep(Duration::from_millis(100)).await;
            assert!(mock
                .query(locators::BUTTON_LOADER.selector())
                .await
                .unwrap()
                .is_some());
            assert!(mock
                .query(locators::RESULT_PANEL.selector())
                .await
                .unwrap()
                .is_none());

            tokio::time::sleep(Duration::from_millis(500)).await;
            assert!(mock
                .query(locators::BUTTON_LOADER.selector())
                .await
                .unwrap()
                .is_none());
            assert!(mock
                .query(locators::RESULT_PANEL.selector())
                .await
                .unwrap()
                .is_some());
            assert!(mock
                .query(locators::OVERLAY.selector())
                .await
                .unwrap()
                .is_some());
        }

        #[tokio::test(start_paused = true)]
        async fn mismatched_postcodes_end_in_the_global_error() {
            let mock = opened().await;
            // Sweden selected on both sides, Czech postcodes typed.
            fill(
                &mock,
                Country::CzechRepublic.valid_postcode(),
                Country::CzechRepublic.valid_postcode(),
            )
            .await;
            mock.click(locators::CALCULATE_BUTTON.selector()).await.unwrap();

            tokio::time::sleep(Duration::from_secs(1)).await;
            let error = mock
                .query(locators::GLOBAL_ERROR.selector())
                .await
                .unwrap()
                .unwrap();
            assert!(error.text.contains(TOOL_UNAVAILABLE_ERROR));
            assert!(mock
                .query(locators::RESULT_PANEL.selector())
                .await
                .unwrap()
                .is_none());
        }

        #[tokio::test(start_paused = true)]
        async fn stuck_loader_never_clears_and_never_lands() {
            let mock = MockCalculator::new().with_loader(LoaderBehavior::Stuck {
                delay: Duration::from_millis(50),
            });
            mock.open("https://calculator.test/").await.unwrap();
            mock.select_by_value(locators::ORIGIN_COUNTRY.selector(), "CZ")
                .await
                .unwrap();
            fill(
                &mock,
                Country::CzechRepublic.valid_postcode(),
                Country::Sweden.valid_postcode(),
            )
            .await;
            mock.click(locators::CALCULATE_BUTTON.selector()).await.unwrap();

            tokio::time::sleep(Duration::from_secs(60)).await;
            assert!(mock
                .query(locators::BUTTON_LOADER.selector())
                .await
                .unwrap()
                .is_some());
            assert!(mock
                .query(locators::RESULT_PANEL.selector())
                .await
                .unwrap()
                .is_none());
            assert!(mock
                .query(locators::GLOBAL_ERROR.selector())
                .await
                .unwrap()
                .is_none());
        }
    }

    mod text_input {
        use super::*;

        #[tokio::test]
        async fn typing_appends_and_clearing_empties() {
            let mock = opened().await;
            let input = locators::ORIGIN_POSTCODE.selector();

            mock.type_text(input, "148").await.unwrap();
            mock.type_text(input, "00").await.unwrap();
            let snap = mock.query(input).await.unwrap().unwrap();
            assert_eq!(snap.value.as_deref(), Some("14800"));

            mock.clear(input).await.unwrap();
            let snap = mock.query(input).await.unwrap().unwrap();
            assert_eq!(snap.value.as_deref(), Some(""));
        }

        #[tokio::test]
        async fn typing_into_a_non_input_faults() {
            let mock = opened().await;
            assert!(mock
                .type_text(locators::SECTION_ROOT.selector(), "oops")
                .await
                .is_err());
        }
    }

    mod chrome_region {
        use super::*;

        #[tokio::test]
        async fn cookie_banner_disappears_once_accepted() {
            let mock = MockCalculator::new().with_cookie_banner();
            mock.open("https://calculator.test/").await.unwrap();

            assert!(mock
                .query(locators::COOKIE_ACCEPT.selector())
                .await
                .unwrap()
                .is_some());
            mock.click(locators::COOKIE_ACCEPT.selector()).await.unwrap();
            assert!(mock
                .query(locators::COOKIE_ACCEPT.selector())
                .await
                .unwrap()
                .is_none());
            assert!(mock.was_called("click:#onetrust-accept-btn-handler"));
        }
    }
}
