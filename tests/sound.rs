//! Sound trigger with a real monitor thread

use std::thread;
use std::time::{Duration, Instant};
use torchlight::arbiter::{ArbiterConfig, ArbiterError, FeatureArbiter, RecordingSink};
use torchlight::platform::mock::{MockClock, MockPlatform};
use torchlight::platform::Permission;
use torchlight_core::feature::{Feature, FeatureRequest, IconState};
use torchlight_core::parameters::Settings;

type Arbiter = FeatureArbiter<MockPlatform, MockClock, RecordingSink>;

fn arbiter(platform: MockPlatform) -> Arbiter {
    let config = ArbiterConfig {
        sound_poll_interval: Duration::from_millis(1),
        ..ArbiterConfig::default()
    };
    FeatureArbiter::with_config(
        platform,
        MockClock::new(),
        RecordingSink::new(),
        Settings::default(),
        config,
    )
}

/// Pump the arbiter until `done` holds or two seconds pass
fn pump_until(arbiter: &mut Arbiter, done: impl Fn(&Arbiter) -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        arbiter.run_pending();
        if done(arbiter) {
            return true;
        }
        thread::sleep(Duration::from_millis(1));
    }
    false
}

#[test]
fn loud_sound_flips_torch() {
    let platform = MockPlatform::new();
    let mic = platform.microphone();
    mic.push_samples(&[100, 100, 20_000]);
    let mut arbiter = arbiter(platform);

    arbiter.activate(FeatureRequest::Sound).unwrap();
    assert!(pump_until(&mut arbiter, |a| a.is_torch_on()));

    mic.push_samples(&[100, 25_000]);
    assert!(pump_until(&mut arbiter, |a| !a.is_torch_on()));
}

#[test]
fn deactivation_joins_monitor() {
    let platform = MockPlatform::new();
    let mic = platform.microphone();
    let mut arbiter = arbiter(platform);

    arbiter.activate(FeatureRequest::Sound).unwrap();
    assert!(arbiter.deactivate(Feature::Sound));

    let reads = mic.read_count();
    mic.push_samples(&[100, 30_000]);
    thread::sleep(Duration::from_millis(20));
    arbiter.run_pending();
    assert_eq!(mic.read_count(), reads);
    assert!(!arbiter.is_torch_on());
}

#[test]
fn preempting_sound_stops_thread() {
    let platform = MockPlatform::new();
    let mic = platform.microphone();
    let mut arbiter = arbiter(platform);

    arbiter.activate(FeatureRequest::Sound).unwrap();
    arbiter.activate(FeatureRequest::Flashlight).unwrap();
    let reads = mic.read_count();
    thread::sleep(Duration::from_millis(20));
    assert_eq!(mic.read_count(), reads);
    assert_eq!(arbiter.owner(), Some(Feature::Flashlight));
}

#[test]
fn microphone_loss_deactivates() {
    let platform = MockPlatform::new();
    let mic = platform.microphone();
    let mut arbiter = arbiter(platform);

    arbiter.activate(FeatureRequest::Sound).unwrap();
    mic.set_failing(true);
    assert!(pump_until(&mut arbiter, |a| a.owner().is_none()));
    assert_eq!(arbiter.icon(Feature::Sound), IconState::Inactive);
}

#[test]
fn microphone_permission_required() {
    let mut platform = MockPlatform::new();
    platform.deny(Permission::RecordAudio);
    let mut arbiter = arbiter(platform);

    assert!(matches!(
        arbiter.activate(FeatureRequest::Sound),
        Err(ArbiterError::PermissionDenied { .. })
    ));
    assert_eq!(arbiter.platform().microphone_opens(), 0);
}

#[test]
fn microphone_open_failure_rolls_back() {
    let mut platform = MockPlatform::new();
    platform.set_microphone_failing(true);
    let mut arbiter = arbiter(platform);

    assert!(matches!(
        arbiter.activate(FeatureRequest::Sound),
        Err(ArbiterError::StartFailed { .. })
    ));
    assert_eq!(arbiter.owner(), None);
    assert_eq!(arbiter.icon(Feature::Sound), IconState::Inactive);
}
