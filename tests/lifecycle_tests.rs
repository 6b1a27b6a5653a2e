// Tests for the app lifecycle observer
//
// The observer only classifies foreground boundary crossings; whether
// recording keeps running is the controller's business (it does).

use memo_recorder::{AppLifecycleState, AppStateObserver, LifecycleTransition};

#[test]
fn test_parses_host_state_strings() {
    assert_eq!(
        "active".parse::<AppLifecycleState>().unwrap(),
        AppLifecycleState::Active
    );
    assert_eq!(
        "inactive".parse::<AppLifecycleState>().unwrap(),
        AppLifecycleState::Inactive
    );
    assert_eq!(
        "background".parse::<AppLifecycleState>().unwrap(),
        AppLifecycleState::Background
    );

    assert!("suspended".parse::<AppLifecycleState>().is_err());
    assert!("Active".parse::<AppLifecycleState>().is_err());
}

#[test]
fn test_inactive_and_background_both_count_as_backgrounded() {
    assert!(!AppLifecycleState::Active.is_backgrounded());
    assert!(AppLifecycleState::Inactive.is_backgrounded());
    assert!(AppLifecycleState::Background.is_backgrounded());
}

#[test]
fn test_observer_starts_in_the_foreground() {
    let observer = AppStateObserver::new();
    assert_eq!(observer.current(), AppLifecycleState::Active);
}

#[test]
fn test_going_to_background_is_a_transition() {
    let mut observer = AppStateObserver::new();

    assert_eq!(
        observer.observe(AppLifecycleState::Background),
        Some(LifecycleTransition::WentToBackground)
    );
    assert_eq!(observer.current(), AppLifecycleState::Background);
}

#[test]
fn test_becoming_inactive_is_a_transition() {
    let mut observer = AppStateObserver::new();

    assert_eq!(
        observer.observe(AppLifecycleState::Inactive),
        Some(LifecycleTransition::WentToBackground)
    );
}

#[test]
fn test_returning_to_foreground_is_a_transition() {
    let mut observer = AppStateObserver::new();
    observer.observe(AppLifecycleState::Background);

    assert_eq!(
        observer.observe(AppLifecycleState::Active),
        Some(LifecycleTransition::CameToForeground)
    );
    assert_eq!(observer.current(), AppLifecycleState::Active);
}

#[test]
fn test_moving_within_the_background_is_not_a_transition() {
    let mut observer = AppStateObserver::new();
    observer.observe(AppLifecycleState::Inactive);

    // inactive -> background never crosses the foreground boundary
    assert_eq!(observer.observe(AppLifecycleState::Background), None);
    assert_eq!(observer.observe(AppLifecycleState::Inactive), None);
    assert_eq!(observer.current(), AppLifecycleState::Inactive);
}

#[test]
fn test_repeated_state_is_not_a_transition() {
    let mut observer = AppStateObserver::new();

    assert_eq!(observer.observe(AppLifecycleState::Active), None);
}

#[test]
fn test_full_round_trip() {
    let mut observer = AppStateObserver::new();

    let observed: Vec<_> = [
        AppLifecycleState::Inactive,
        AppLifecycleState::Background,
        AppLifecycleState::Active,
        AppLifecycleState::Active,
        AppLifecycleState::Background,
    ]
    .into_iter()
    .map(|state| observer.observe(state))
    .collect();

    assert_eq!(
        observed,
        vec![
            Some(LifecycleTransition::WentToBackground),
            None,
            Some(LifecycleTransition::CameToForeground),
            None,
            Some(LifecycleTransition::WentToBackground),
        ]
    );
}
