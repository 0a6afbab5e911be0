use super::*;

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

#[test]
fn test_frame_time_from_framerate() {
    assert_eq!(FrameClock::new(50).frame_time(), ms(20));
    assert_eq!(FrameClock::new(1).frame_time(), Duration::from_secs(1));
    // Zero is clamped to 1 fps
    assert_eq!(FrameClock::new(0).frame_time(), Duration::from_secs(1));
}

#[test]
fn test_from_config_uses_target_framerate() {
    let config = Config::default().with_framerate(25);
    assert_eq!(FrameClock::from_config(&config).frame_time(), ms(40));
}

#[test]
fn test_renders_once_interval_accumulates() {
    let start = Instant::now();
    let mut clock = FrameClock::starting_at(50, start);

    assert!(!clock.should_render_at(start + ms(10)));
    assert!(!clock.should_render_at(start + ms(19)));
    assert!(clock.should_render_at(start + ms(20)));
    assert_eq!(clock.frames(), 1);
    assert_eq!(clock.delta(), ms(1));
}

#[test]
fn test_accumulator_restarts_after_render() {
    let start = Instant::now();
    let mut clock = FrameClock::starting_at(50, start);

    // A long stall renders once; the surplus is dropped
    assert!(clock.should_render_at(start + ms(70)));
    assert!(!clock.should_render_at(start + ms(80)));
    assert!(clock.should_render_at(start + ms(90)));
    assert_eq!(clock.frames(), 2);
}

#[test]
fn test_earlier_timestamp_counts_as_zero() {
    let start = Instant::now();
    let mut clock = FrameClock::starting_at(50, start + ms(5));

    assert!(!clock.should_render_at(start));
    assert_eq!(clock.delta(), Duration::ZERO);
}

#[test]
fn test_set_framerate_keeps_accumulated_time() {
    let start = Instant::now();
    let mut clock = FrameClock::starting_at(10, start);

    assert!(!clock.should_render_at(start + ms(30)));
    clock.set_framerate(40);
    assert!(clock.should_render_at(start + ms(30)));
}
