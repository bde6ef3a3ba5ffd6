//! Country dropdown selection.
//!
//! The production form's dropdown markup is not stable across releases: the
//! same control ships sometimes as a native `<select>`, sometimes as a
//! hand-rolled popup. The resolver classifies the root fresh on every call
//! (the origin and destination controls can legitimately differ on the same
//! page) and runs whichever protocol fits, instead of hardcoding one shape.

use tokio::time::Instant;

use crate::interact;
use crate::result::{UiError, UiResult};
use crate::session::{BrowserSession, ElementSnapshot, Locator};
use crate::wait::{wait_for, Condition, WaitProfile};

/// Shape of a dropdown control, determined at interaction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropdownKind {
    /// Standard browser selection element
    Native,
    /// Hand-built widget requiring open-then-click-option interaction
    Custom,
}

impl DropdownKind {
    /// Classify a dropdown root by its live tag name. Never cached.
    #[must_use]
    pub fn of(root: &ElementSnapshot) -> Self {
        if root.tag.eq_ignore_ascii_case("select") {
            Self::Native
        } else {
            Self::Custom
        }
    }
}

/// Select `choice` (a value or a visible label) in the dropdown at `root`.
///
/// Native controls are driven through the session's select-by-value API,
/// retrying by label when no value matches. Custom widgets are opened with a
/// real click and the matching option clicked through the same reliable-click
/// path as any other element.
///
/// # Errors
///
/// [`UiError::Interaction`] when the root never becomes clickable;
/// [`UiError::Selection`] when no option matches `choice` within `profile`.
pub async fn select<S: BrowserSession>(
    session: &S,
    root: &Locator,
    choice: &str,
    profile: WaitProfile,
) -> UiResult<()> {
    let observation = wait_for(session, root, Condition::Clickable, profile).await?;
    let Some(snapshot) = observation.into_element() else {
        return Err(UiError::interaction(
            root.name(),
            root.selector(),
            format!("dropdown not clickable within {}ms", profile.timeout.as_millis()),
        ));
    };

    let kind = DropdownKind::of(&snapshot);
    tracing::debug!(locator = %root, ?kind, choice, "selecting dropdown option");

    match kind {
        DropdownKind::Native => select_native(session, root, choice).await,
        DropdownKind::Custom => select_custom(session, root, choice, profile).await,
    }
}

async fn select_native<S: BrowserSession>(
    session: &S,
    root: &Locator,
    choice: &str,
) -> UiResult<()> {
    if session.select_by_value(root.selector(), choice).await? {
        return Ok(());
    }
    // No option carries the requested value; the caller may have passed the
    // visible label instead.
    if session.select_by_label(root.selector(), choice).await? {
        return Ok(());
    }
    Err(no_such_option(root, choice))
}

async fn select_custom<S: BrowserSession>(
    session: &S,
    root: &Locator,
    choice: &str,
    profile: WaitProfile,
) -> UiResult<()> {
    interact::click(session, root, profile).await?;

    let options_selector = format!(
        "{root} option, {root} [role='option']",
        root = root.selector()
    );
    let deadline = Instant::now() + profile.timeout;

    loop {
        let options = session.query_all(&options_selector).await?;
        if let Some(option) = options.iter().find(|o| matches_choice(o, choice)) {
            let target = Locator::narrowed("dropdown option", option.selector.clone());
            return interact::click(session, &target, profile).await;
        }

        if Instant::now() >= deadline {
            return Err(no_such_option(root, choice));
        }
        tokio::time::sleep(profile.poll_interval).await;
    }
}

/// An option matches when its value attribute or its normalized visible text
/// equals the request.
fn matches_choice(option: &ElementSnapshot, choice: &str) -> bool {
    option.visible
        && (option.value.as_deref() == Some(choice) || option.text.trim() == choice)
}

fn no_such_option(root: &Locator, choice: &str) -> UiError {
    UiError::Selection {
        region: root.name().to_string(),
        selector: root.selector().to_string(),
        value: choice.to_string(),
    }
}
