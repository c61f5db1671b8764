// Integration tests for playback navigation and the tick scheduler

use heapreel::playback::{stride_for_speed, Mode, Playback, Ticker};
use std::time::{Duration, Instant};

#[test]
fn test_initial_state() {
    let playback = Playback::new(10);
    assert_eq!(playback.position(), 0);
    assert_eq!(playback.mode(), Mode::Paused);
    assert_eq!(playback.stride(), 1);
    assert!(playback.is_at_start());
    assert!(!playback.is_at_end());
}

#[test]
fn test_seek_clamps_into_range() {
    let mut playback = Playback::new(10);

    playback.seek(-5);
    assert_eq!(playback.position(), 0);

    playback.seek(999);
    assert_eq!(playback.position(), 9);
    assert!(playback.is_at_end());
    assert!(!playback.is_at_start());

    playback.seek(4);
    playback.seek(4);
    assert_eq!(playback.position(), 4);
}

#[test]
fn test_step_moves_and_clamps() {
    let mut playback = Playback::new(3);
    playback.step(1);
    assert_eq!(playback.position(), 1);
    playback.step(5);
    assert_eq!(playback.position(), 2);
    playback.step(-1);
    assert_eq!(playback.position(), 1);
    playback.step(-10);
    assert_eq!(playback.position(), 0);
    playback.step(i64::MIN);
    assert_eq!(playback.position(), 0);
}

#[test]
fn test_play_with_stride_stops_at_end() {
    let mut playback = Playback::new(11).with_stride(2);
    playback.play();
    assert!(playback.is_playing());

    let mut positions = Vec::new();
    for _ in 0..5 {
        playback.tick();
        positions.push(playback.position());
    }

    assert_eq!(positions, vec![2, 4, 6, 8, 10]);
    assert_eq!(playback.position(), 10);
    assert_eq!(playback.mode(), Mode::Paused);
}

#[test]
fn test_play_never_overshoots() {
    let mut playback = Playback::new(10).with_stride(4);
    playback.play();
    while playback.tick() {}
    assert_eq!(playback.position(), 9);
    assert_eq!(playback.mode(), Mode::Paused);
    assert!(!playback.tick());
}

#[test]
fn test_pause_stops_ticks() {
    let mut playback = Playback::new(10);
    playback.play();
    assert!(playback.tick());
    playback.pause();
    assert!(!playback.tick());
    assert_eq!(playback.position(), 1);
}

#[test]
fn test_play_at_end_stays_paused() {
    let mut playback = Playback::new(5);
    playback.seek(4);
    playback.play();
    assert_eq!(playback.mode(), Mode::Paused);

    playback.seek(0);
    playback.toggle();
    assert!(playback.is_playing());
    playback.toggle();
    assert!(!playback.is_playing());
}

#[test]
fn test_empty_sequence_is_bounded_at_zero() {
    let mut playback = Playback::new(0);
    playback.seek(7);
    assert_eq!(playback.position(), 0);
    playback.step(-1);
    assert_eq!(playback.position(), 0);
    playback.play();
    assert!(!playback.is_playing());
    assert!(!playback.tick());
    assert_eq!(playback.timeline_index(0.5), 0);
}

#[test]
fn test_stride_for_speed() {
    assert_eq!(stride_for_speed(1), 1);
    assert_eq!(stride_for_speed(5), 1);
    assert_eq!(stride_for_speed(10), 2);
    assert_eq!(stride_for_speed(100), 20);
    assert_eq!(Playback::new(3).with_stride(0).stride(), 1);
}

#[test]
fn test_timeline_index() {
    let playback = Playback::new(10);
    assert_eq!(playback.timeline_index(0.0), 0);
    assert_eq!(playback.timeline_index(0.25), 2);
    assert_eq!(playback.timeline_index(0.999), 9);
    assert_eq!(playback.timeline_index(1.0), 9);
    assert_eq!(playback.timeline_index(-3.0), 0);
    assert_eq!(playback.timeline_index(f64::NAN), 0);
}

#[test]
fn test_ticker_fires_once_per_arm() {
    let start = Instant::now();
    let mut ticker = Ticker::new(Duration::from_millis(50));
    assert!(!ticker.is_armed());
    assert!(!ticker.fire(start + Duration::from_secs(1)));

    ticker.arm(start);
    assert!(!ticker.fire(start + Duration::from_millis(10)));
    assert_eq!(
        ticker.remaining(start + Duration::from_millis(10)),
        Some(Duration::from_millis(40))
    );
    assert!(ticker.fire(start + Duration::from_millis(50)));
    // Not re-armed until the caller asks
    assert!(!ticker.fire(start + Duration::from_millis(200)));
}

#[test]
fn test_ticker_cancel_withholds_tick() {
    let start = Instant::now();
    let mut ticker = Ticker::new(Duration::from_millis(50));
    ticker.arm_immediately(start);
    ticker.cancel();
    assert!(!ticker.fire(start + Duration::from_secs(1)));
    assert_eq!(ticker.remaining(start), None);
}
