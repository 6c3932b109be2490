//! Integration tests: start / stop / reset against the channel driver.

use crate::mock_driver::{DriverCall, MockDriver, RAW_FALL, RAW_RISE, RAW_SPARE, Tag};

use pwmcapture::{
    CaptureConfig, CaptureEngine, CaptureMode, CaptureResult, ChannelError, ConfigError, Error,
    Sequence,
};

fn make_engine() -> CaptureEngine<MockDriver> {
    let cfg = CaptureConfig::new(RAW_RISE, RAW_FALL, 1e-6);
    CaptureEngine::new(cfg, CaptureMode::DirectEdgePair, MockDriver::new()).unwrap()
}

// ── Init ─────────────────────────────────────────────────────

#[test]
fn init_does_not_arm_channels() {
    let e = make_engine();
    assert!(e.driver().calls.is_empty());
    assert!(!e.is_running());
}

#[test]
fn init_rejects_unmapped_channel() {
    let cfg = CaptureConfig::new(RAW_RISE, 99, 1e-6);
    let err = CaptureEngine::new(cfg, CaptureMode::DirectEdgePair, MockDriver::new())
        .err()
        .unwrap();
    assert_eq!(err, Error::Config(ConfigError::UnmappedChannel(99)));
}

#[test]
fn init_rejects_zero_tick_duration() {
    let cfg = CaptureConfig::new(RAW_RISE, RAW_FALL, 0.0);
    let err = CaptureEngine::new(cfg, CaptureMode::DirectEdgePair, MockDriver::new())
        .err()
        .unwrap();
    assert_eq!(err, Error::Config(ConfigError::InvalidTickDuration));
}

// ── Start / stop ─────────────────────────────────────────────

#[test]
fn start_arms_both_channels() {
    let mut e = make_engine();
    e.start().unwrap();
    assert!(e.is_running());
    assert_eq!(
        e.driver().calls,
        vec![DriverCall::Start(Tag::Rise), DriverCall::Start(Tag::Fall)]
    );
}

#[test]
fn events_while_stopped_change_nothing() {
    let mut e = make_engine();
    e.on_edge_event(Tag::Rise, 1000);
    e.on_edge_event(Tag::Fall, 250);
    assert_eq!(e.sequence(), Sequence::AwaitingRise);
    assert!(!e.is_result_ready());
    assert_eq!(e.latest(), CaptureResult::ZERO);
    assert_eq!(e.stats().cycles_completed, 0);
}

#[test]
fn stop_clears_ready_and_disarms() {
    let mut e = make_engine();
    e.start().unwrap();
    e.on_edge_event(Tag::Rise, 1000);
    e.on_edge_event(Tag::Fall, 250);
    assert!(e.is_result_ready());

    e.stop().unwrap();
    assert!(!e.is_running());
    assert!(!e.is_result_ready());
    assert!(!e.driver().is_armed(Tag::Rise));
    assert!(!e.driver().is_armed(Tag::Fall));
    // Accessors still return the last latched value.
    assert_eq!(e.frequency(), 1000);
}

#[test]
fn stop_is_idempotent() {
    let mut e = make_engine();
    e.start().unwrap();
    assert!(e.stop().is_ok());
    assert!(e.stop().is_ok());
    assert!(!e.is_running());
}

#[test]
fn stop_then_start_resumes_without_reset() {
    let mut e = make_engine();
    e.start().unwrap();
    e.on_edge_event(Tag::Rise, 1000);

    e.stop().unwrap();
    e.on_edge_event(Tag::Fall, 999);
    assert_eq!(e.sequence(), Sequence::AwaitingSecondRiseOrFall);

    e.start().unwrap();
    e.on_edge_event(Tag::Fall, 500);
    let r = e.take_result().unwrap();
    assert_eq!(r.pulse_width_ticks, 500);
}

#[test]
fn stop_reports_driver_failure_but_still_stops() {
    let mut e = make_engine();
    e.start().unwrap();
    let cfg = *e.config();
    assert_eq!(cfg.rise_channel, RAW_RISE);

    let mut drv = e.release();
    drv.fail_stop = true;
    let mut e = CaptureEngine::new(cfg, CaptureMode::DirectEdgePair, drv).unwrap();
    e.start().unwrap();
    assert_eq!(e.stop(), Err(Error::Channel(ChannelError::StopFailed)));
    assert!(!e.is_running());
}

// ── Reset ────────────────────────────────────────────────────

#[test]
fn reset_mid_sequence_returns_to_awaiting_rise() {
    let mut e = make_engine();
    e.start().unwrap();
    e.on_edge_event(Tag::Rise, 1000);
    assert_eq!(e.sequence(), Sequence::AwaitingSecondRiseOrFall);

    e.reset().unwrap();
    assert_eq!(e.sequence(), Sequence::AwaitingRise);
    assert!(!e.is_result_ready());
    assert!(e.is_running());

    // The stale rise must not pair with the next fall.
    e.on_edge_event(Tag::Fall, 250);
    assert!(!e.is_result_ready());
}

#[test]
fn reset_clears_result_and_rearms() {
    let mut e = make_engine();
    e.start().unwrap();
    e.on_edge_event(Tag::Rise, 1000);
    e.on_edge_event(Tag::Fall, 250);

    e.reset().unwrap();
    assert_eq!(e.latest(), CaptureResult::ZERO);
    assert_eq!(e.frequency(), 0);
    assert_eq!(
        e.driver().last_call(),
        Some(&DriverCall::Start(Tag::Fall))
    );
    assert!(e.driver().is_armed(Tag::Rise));
}

#[test]
fn reset_from_stopped_starts_running() {
    let mut e = make_engine();
    e.reset().unwrap();
    assert!(e.is_running());
}

// ── Channel routing ──────────────────────────────────────────

#[test]
fn spare_channel_events_are_ignored() {
    let mut e = make_engine();
    e.start().unwrap();
    e.on_edge_event(Tag::Spare, 1000);
    e.on_edge_event(Tag::Fall, 250);
    assert!(!e.is_result_ready());
    assert_eq!(e.sequence(), Sequence::AwaitingRise);
}

#[test]
fn spare_channel_can_be_configured() {
    let cfg = CaptureConfig::new(RAW_SPARE, RAW_FALL, 1e-6);
    let mut e = CaptureEngine::new(cfg, CaptureMode::DirectEdgePair, MockDriver::new()).unwrap();
    e.start().unwrap();
    e.on_edge_event(Tag::Rise, 1000);
    assert_eq!(e.sequence(), Sequence::AwaitingRise);
    e.on_edge_event(Tag::Spare, 1000);
    assert_eq!(e.sequence(), Sequence::AwaitingSecondRiseOrFall);
}
