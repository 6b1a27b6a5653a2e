// App lifecycle observer: watches foreground/background transitions for
// diagnostics. Recording deliberately keeps running while backgrounded, so
// this never touches the controller.

use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::info;

/// Coarse application lifecycle state as reported by the host shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppLifecycleState {
    /// App is foregrounded and interactive
    Active,
    /// App is transitioning or obscured (system dialog, app switcher)
    Inactive,
    /// App is fully backgrounded
    Background,
}

impl AppLifecycleState {
    /// Both `inactive` and `background` count as "not in the foreground"
    pub fn is_backgrounded(self) -> bool {
        matches!(self, AppLifecycleState::Inactive | AppLifecycleState::Background)
    }
}

impl FromStr for AppLifecycleState {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(AppLifecycleState::Active),
            "inactive" => Ok(AppLifecycleState::Inactive),
            "background" => Ok(AppLifecycleState::Background),
            other => bail!("unknown app lifecycle state: {}", other),
        }
    }
}

/// A foreground/background boundary crossing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleTransition {
    CameToForeground,
    WentToBackground,
}

/// Tracks the previous lifecycle state and classifies each change
pub struct AppStateObserver {
    current: AppLifecycleState,
}

impl AppStateObserver {
    pub fn new() -> Self {
        Self {
            current: AppLifecycleState::Active,
        }
    }

    pub fn current(&self) -> AppLifecycleState {
        self.current
    }

    /// Record a lifecycle change and classify the transition, if any.
    ///
    /// Moving between `inactive` and `background` is not a transition; only
    /// crossing the foreground boundary is.
    pub fn observe(&mut self, next: AppLifecycleState) -> Option<LifecycleTransition> {
        let previous = self.current;
        self.current = next;

        if previous.is_backgrounded() && next == AppLifecycleState::Active {
            info!("App has come to the foreground");
            Some(LifecycleTransition::CameToForeground)
        } else if previous == AppLifecycleState::Active && next.is_backgrounded() {
            info!("App moved to the background; recording continues");
            Some(LifecycleTransition::WentToBackground)
        } else {
            None
        }
    }
}

impl Default for AppStateObserver {
    fn default() -> Self {
        Self::new()
    }
}
