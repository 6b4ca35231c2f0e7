//! Integration tests for the live preview lifecycle and the capture control.

mod common;

use campanel_app::Panel;
use campanel_stream::{StreamChange, StreamState};
use campanel_ui::{DisableReason, Locale, Message, PreviewSurface};
use common::{Fixture, Reply, StreamPlan};

fn assert_capture_control_consistent(panel: &Panel) {
    let control = panel.capture_control();
    let expected = panel.stream_state() == StreamState::Active && !panel.capture_in_flight();
    assert_eq!(control.enabled, expected, "state {:?}", panel.stream_state());
    assert_eq!(control.enabled, control.disabled_reason.is_none());
}

#[test]
fn first_frame_makes_the_stream_active() {
    let mut fx = Fixture::new();

    assert!(fx.panel.toggle_preview());
    assert_eq!(fx.panel.stream_state(), StreamState::Connecting);
    assert_eq!(
        fx.panel.capture_control().disabled_reason,
        Some(DisableReason::Connecting)
    );

    assert_eq!(fx.panel.pump(), Some(StreamChange::Connected));
    assert_eq!(fx.panel.stream_state(), StreamState::Active);
    assert!(matches!(fx.panel.surface(), PreviewSurface::Live { frames: 1, .. }));
    assert!(fx.panel.capture_control().enabled);
}

#[test]
fn watchdog_fires_when_no_frame_arrives() {
    let mut fx = Fixture::new();
    fx.transport.plan_stream(StreamPlan::Silent);
    fx.panel.toggle_preview();

    fx.clock.advance_ms(4_999);
    assert_eq!(fx.panel.pump(), None);
    assert_eq!(fx.panel.stream_state(), StreamState::Connecting);

    fx.clock.advance_ms(1);
    assert_eq!(fx.panel.pump(), Some(StreamChange::TimedOut));
    assert_eq!(fx.panel.stream_state(), StreamState::Stopped);
    assert_eq!(fx.transport.streams_closed(), 1);
    assert_eq!(
        fx.panel.surface().placeholder(Locale::English),
        Some(Message::StreamTimeoutPlaceholder.text(Locale::English))
    );
    assert_eq!(
        fx.panel.capture_control().disabled_reason,
        Some(DisableReason::StreamTimeout)
    );
}

#[test]
fn stream_error_stops_the_preview() {
    let mut fx = Fixture::new();
    fx.transport.plan_stream(StreamPlan::ErrorEvent);
    fx.panel.toggle_preview();

    assert_eq!(fx.panel.pump(), Some(StreamChange::Failed));

    assert_eq!(fx.panel.stream_state(), StreamState::Stopped);
    assert_eq!(fx.panel.surface(), &PreviewSurface::StreamFailed);
    assert_eq!(
        fx.panel.capture_control().disabled_reason,
        Some(DisableReason::StreamFailed)
    );

    fx.clock.advance_ms(10_000);
    assert_eq!(fx.panel.pump(), None);
}

#[test]
fn refused_stream_leaves_the_preview_stopped() {
    let mut fx = Fixture::new();
    fx.transport.plan_stream(StreamPlan::FailOnOpen);

    assert!(!fx.panel.toggle_preview());

    assert_eq!(fx.panel.stream_state(), StreamState::Stopped);
    assert_eq!(fx.panel.surface(), &PreviewSurface::StreamFailed);
    assert_eq!(fx.transport.streams_opened(), 0);
    assert!(fx.panel.toggle_preview());
}

#[test]
fn toggle_while_connecting_stops_and_disarms_the_watchdog() {
    let mut fx = Fixture::new();
    fx.transport.plan_stream(StreamPlan::Silent);
    fx.panel.toggle_preview();

    assert!(!fx.panel.toggle_preview());
    assert_eq!(fx.panel.surface(), &PreviewSurface::Idle);

    fx.tick(10_000);
    assert_eq!(fx.panel.surface(), &PreviewSurface::Idle);
    assert_eq!(
        fx.panel.capture_control().disabled_reason,
        Some(DisableReason::PreviewStopped)
    );
}

#[test]
fn each_start_gets_a_new_generation() {
    let mut fx = Fixture::new();
    fx.go_live();
    let first = fx.panel.stream_generation();

    fx.panel.toggle_preview();
    fx.go_live();

    assert_eq!(fx.panel.stream_generation(), first + 1);
    assert_eq!(fx.transport.streams_opened(), 2);
    assert_eq!(fx.transport.streams_closed(), 1);
}

#[test]
fn capture_control_tracks_stream_state_across_operations() {
    let mut fx = Fixture::new();
    fx.transport
        .reply("POST /app/capture", Reply::ok(r#"{"success":true,"filename":"a.jpg"}"#));
    fx.transport
        .reply("GET /app/hardware", Reply::ok(r#"{"chipModel":"ESP32"}"#));
    fx.transport.plan_stream(StreamPlan::Silent);
    fx.transport.plan_stream(StreamPlan::ErrorEvent);

    let steps: [fn(&mut Fixture); 12] = [
        |fx| {
            fx.panel.toggle_preview();
        },
        |fx| fx.tick(5_000),
        |fx| {
            fx.panel.toggle_preview();
        },
        |fx| fx.tick(10),
        |fx| {
            fx.panel.toggle_preview();
        },
        |fx| fx.tick(10),
        |fx| {
            fx.panel.capture_photo();
        },
        |fx| fx.tick(10),
        |fx| {
            fx.panel.open_hardware_modal();
        },
        |fx| {
            fx.panel.close_hardware_modal();
        },
        |fx| fx.tick(100),
        |fx| fx.tick(10),
    ];

    assert_capture_control_consistent(&fx.panel);
    for step in steps {
        step(&mut fx);
        assert_capture_control_consistent(&fx.panel);
    }
    assert_eq!(fx.panel.stream_state(), StreamState::Active);
}
