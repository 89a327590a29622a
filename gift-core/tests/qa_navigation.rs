//! QA tests for screen navigation through a session.
//!
//! Run with: `cargo test -p gift-core --test qa_navigation`

use std::time::Duration;

use gift_core::navigation::TRANSITION_DURATION;
use gift_core::{Screen, SessionError, SessionEvent, TestHarness};

// =============================================================================
// TEST 1: The full happy path visits every screen
// =============================================================================

#[test]
fn test_full_tour() {
    let mut harness = TestHarness::new();
    harness.assert_screen(Screen::Home);

    harness.walk(&[Screen::AcceptConfirmation, Screen::Home, Screen::PresentSelection]);
    harness.walk(&[Screen::Song, Screen::PresentSelection]);
    harness.walk(&[Screen::PictureAnimation, Screen::PresentSelection]);
    harness.walk(&[Screen::Letter, Screen::LoveMessage, Screen::PresentSelection]);
    harness.walk(&[Screen::PhotoBooth, Screen::Home]);

    harness.assert_screen(Screen::Home);
}

// =============================================================================
// TEST 2: Requests outside the capability table are rejected
// =============================================================================

#[test]
fn test_unreachable_targets_rejected() {
    let mut harness = TestHarness::new();
    for target in Screen::ALL {
        if Screen::Home.can_reach(target) {
            continue;
        }
        let result = harness.session.navigate(target);
        assert!(
            matches!(result, Err(SessionError::Navigation(_))),
            "home -> {target} should be rejected"
        );
        harness.assert_screen(Screen::Home);
    }
}

// =============================================================================
// TEST 3: Every screen except home can get back home
// =============================================================================

#[test]
fn test_home_reachable_from_everywhere() {
    for start in Screen::ALL {
        let mut seen = vec![start];
        let mut frontier = vec![start];
        while let Some(screen) = frontier.pop() {
            for &next in screen.allowed_targets() {
                if !seen.contains(&next) {
                    seen.push(next);
                    frontier.push(next);
                }
            }
        }
        assert!(seen.contains(&Screen::Home), "{start} cannot reach home");
    }
}

// =============================================================================
// TEST 4: Transitions settle after the enter animation
// =============================================================================

#[test]
fn test_transition_settles() {
    let mut harness = TestHarness::new();
    harness.session.navigate(Screen::PresentSelection).unwrap();
    assert!(harness.session.navigator().transition().is_some());

    let half = harness.tick(TRANSITION_DURATION / 2);
    assert!(half.is_empty());
    let progress = harness.session.navigator().transition_progress();
    assert!((progress - 0.5).abs() < 0.01);

    let rest = harness.tick(TRANSITION_DURATION / 2);
    assert_eq!(rest, vec![SessionEvent::Settled(Screen::PresentSelection)]);
    assert_eq!(harness.session.navigator().transition_progress(), 1.0);
}

// =============================================================================
// TEST 5: A new request replaces an unfinished transition
// =============================================================================

#[test]
fn test_navigation_does_not_wait_for_animation() {
    let mut harness = TestHarness::new();
    harness.session.navigate(Screen::PresentSelection).unwrap();
    harness.tick(Duration::from_millis(50));
    let transition = harness.session.navigate(Screen::Song).unwrap();
    assert_eq!(transition.from, Screen::PresentSelection);
    assert_eq!(harness.session.navigator().transition().map(|t| t.elapsed), Some(Duration::ZERO));
}

// =============================================================================
// TEST 6: Playback flag survives navigation
// =============================================================================

#[test]
fn test_playback_flag_is_shared() {
    let mut harness = TestHarness::new();
    harness.walk(&[Screen::PresentSelection, Screen::Song]);
    assert!(harness.session.navigator_mut().toggle_playback());
    harness.walk(&[Screen::PresentSelection, Screen::PictureAnimation]);
    assert!(harness.session.navigator().is_playing());
}
