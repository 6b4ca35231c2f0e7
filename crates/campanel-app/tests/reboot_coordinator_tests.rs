//! Integration tests for the reboot flow.

mod common;

use std::sync::Arc;
use std::time::Duration;

use campanel_app::RebootOutcome;
use campanel_core::Clock;
use campanel_link::Method;
use campanel_stream::StreamState;
use campanel_ui::{Locale, Message, ToastKind};
use common::{Fixture, RecordingHost, Reply, START_MS};

fn device_back_at(fx: &Fixture, back_at_ms: u64) {
    let clock = Arc::clone(&fx.clock);
    fx.transport.on("HEAD /app/stream", move |_| {
        if clock.now_ms() >= back_at_ms {
            Reply::status(200)
        } else {
            Reply::Unreachable
        }
    });
}

#[test]
fn device_back_before_deadline_reloads_with_cache_buster() {
    let mut fx = Fixture::new();
    fx.transport.reply("POST /app/reboot", Reply::TimeOut);
    device_back_at(&fx, START_MS + 10_000);
    let mut host = RecordingHost::accepting();

    let outcome = fx.panel.reboot_device(&mut host);

    let expected_target = format!("/?v={}", fx.clock_now());
    assert_eq!(
        outcome,
        RebootOutcome::Online {
            reload_target: expected_target.clone(),
            attempts: 9,
        }
    );
    assert_eq!(host.reloads, vec![expected_target]);
    assert_eq!(fx.clock_now() - START_MS, 11_100);
    assert_eq!(
        fx.panel.toasts().all()[0].text,
        Message::Rebooting.text(Locale::English)
    );
}

#[test]
fn health_probes_are_uncached_heads_bounded_by_the_probe_timeout() {
    let mut fx = Fixture::new();
    device_back_at(&fx, START_MS + 5_000);
    let mut host = RecordingHost::accepting();

    fx.panel.reboot_device(&mut host);

    let probes: Vec<_> = fx
        .transport
        .seen()
        .into_iter()
        .filter(|seen| seen.request.method == Method::Head)
        .collect();
    assert!(probes.len() > 1);
    for probe in &probes {
        assert!(probe.request.no_store);
        assert_eq!(probe.request.timeout, Some(Duration::from_millis(1_500)));
    }
    for pair in probes.windows(2) {
        assert_eq!(pair[1].at_ms - pair[0].at_ms, 1_200);
    }
}

#[test]
fn device_never_back_gives_up_exactly_at_the_deadline() {
    let mut fx = Fixture::new();
    fx.transport.reply("POST /app/reboot", Reply::status(200));
    fx.transport.reply("HEAD /app/stream", Reply::TimeOut);
    let mut host = RecordingHost::accepting();

    let outcome = fx.panel.reboot_device(&mut host);

    assert_eq!(outcome, RebootOutcome::Unreachable { attempts: 12 });
    assert_eq!(fx.clock_now() - START_MS, 30_000);
    assert!(host.reloads.is_empty());

    let last_probe = fx.transport.seen().pop().expect("probes should be sent");
    assert_eq!(last_probe.request.timeout, Some(Duration::from_millis(300)));

    fx.tick(60_000);
    let toast = fx.panel.toasts().latest().expect("error toast should stay");
    assert_eq!(toast.kind, ToastKind::Error);
    assert_eq!(toast.text, Message::RebootUnreachable.text(Locale::English));
}

#[test]
fn reboot_request_failure_is_swallowed() {
    let mut fx = Fixture::new();
    let mut host = RecordingHost::accepting();

    let outcome = fx.panel.reboot_device(&mut host);

    assert!(matches!(outcome, RebootOutcome::Online { attempts: 1, .. }));
    assert_eq!(fx.transport.count("POST /app/reboot"), 1);
}

#[test]
fn declined_reboot_sends_nothing_and_restores_the_preview() {
    let mut fx = Fixture::new();
    fx.go_live();
    fx.transport.forget_requests();
    let mut host = RecordingHost::declining();

    let outcome = fx.panel.reboot_device(&mut host);

    assert_eq!(outcome, RebootOutcome::Cancelled);
    assert_eq!(host.prompts, vec![Message::ConfirmReboot.text(Locale::English)]);
    assert!(fx.transport.routes().is_empty());
    assert_eq!(fx.panel.stream_state(), StreamState::Stopped);
    assert_eq!(fx.panel.restart_due_ms(), Some(START_MS + 100));

    fx.tick(99);
    assert_eq!(fx.panel.stream_state(), StreamState::Stopped);
    fx.tick(1);
    assert_eq!(fx.panel.stream_state(), StreamState::Connecting);
    fx.panel.pump();
    assert_eq!(fx.panel.stream_state(), StreamState::Active);
}

#[test]
fn declined_reboot_while_stopped_schedules_nothing() {
    let mut fx = Fixture::new();
    let mut host = RecordingHost::declining();

    assert_eq!(fx.panel.reboot_device(&mut host), RebootOutcome::Cancelled);
    assert_eq!(fx.panel.restart_due_ms(), None);
}

#[test]
fn confirmed_reboot_tears_down_the_live_stream() {
    let mut fx = Fixture::new();
    fx.go_live();
    let mut host = RecordingHost::accepting();

    fx.panel.reboot_device(&mut host);

    assert_eq!(fx.transport.streams_closed(), 1);
    assert_eq!(fx.panel.stream_state(), StreamState::Stopped);
    assert_eq!(fx.panel.restart_due_ms(), None);
}
