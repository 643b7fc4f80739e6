//! Arbiter behaviour against the mock platform

use torchlight::arbiter::{
    ArbiterConfig, ArbiterError, ArbiterEvent, FeatureArbiter, RecordingSink,
};
use torchlight::platform::mock::{MockClock, MockPlatform};
use torchlight::platform::{CallState, Permission, Platform, SensorEvent, SensorKind};
use torchlight_core::feature::{
    Feature, FeatureRequest, FeatureSet, Hardware, IconState, PreemptionTable,
};
use torchlight_core::parameters::Settings;
use torchlight_core::traits::TimeSource;

type Arbiter = FeatureArbiter<MockPlatform, MockClock, RecordingSink>;

struct Harness {
    clock: MockClock,
    events: RecordingSink,
    arbiter: Arbiter,
}

impl Harness {
    fn new() -> Self {
        Self::with_platform(MockPlatform::new())
    }

    fn with_platform(platform: MockPlatform) -> Self {
        Self::with(platform, Settings::default(), ArbiterConfig::default())
    }

    fn with(platform: MockPlatform, settings: Settings, config: ArbiterConfig) -> Self {
        let clock = MockClock::starting_at(10_000);
        let events = RecordingSink::new();
        let arbiter =
            FeatureArbiter::with_config(platform, clock.clone(), events.clone(), settings, config);
        Self {
            clock,
            events,
            arbiter,
        }
    }

    /// Advance to `ms` after the start, dispatching every timer on the way
    fn run_to(&mut self, ms: u64) {
        let target = 10_000 + ms;
        while let Some(due) = self.arbiter.next_deadline_ms() {
            if due > target {
                break;
            }
            self.clock.set(due.max(self.clock.now_ms()));
            self.arbiter.run_pending();
        }
        self.clock.set(target);
        self.arbiter.run_pending();
    }

    fn torch(&self) -> bool {
        self.arbiter.is_torch_on()
    }

    fn history(&self) -> Vec<bool> {
        self.arbiter.platform().torch_ref().history().to_vec()
    }
}

fn rotation(deg: f32) -> SensorEvent {
    SensorEvent::Rotation {
        x: (deg.to_radians() / 2.0).sin(),
        y: 0.0,
        z: 0.0,
    }
}

fn battery(percent: u32) -> SensorEvent {
    SensorEvent::Battery {
        level: percent,
        scale: 100,
    }
}

#[test]
fn at_most_one_owner_most_recent_wins() {
    let mut h = Harness::new();
    let sequence = [
        FeatureRequest::Flashlight,
        FeatureRequest::Sos,
        FeatureRequest::Flicker { hz: 10 },
        FeatureRequest::Battery { target_percent: 80 },
        FeatureRequest::Tilt,
        FeatureRequest::Flashlight,
        FeatureRequest::Timer { at_ms: 60_000 },
    ];

    for request in sequence {
        h.arbiter.activate(request).unwrap();
        assert_eq!(h.arbiter.owner(), Some(request.feature()));
        assert_eq!(h.arbiter.activated(), &[request.feature()]);
        let active = Feature::ALL
            .iter()
            .filter(|f| h.arbiter.icon(**f) == IconState::Active)
            .count();
        assert_eq!(active, 1);
    }
}

#[test]
fn preempted_owner_releases_resources() {
    let mut h = Harness::new();
    let hub = h.arbiter.platform().sensor_hub();

    h.arbiter
        .activate(FeatureRequest::Altitude { target_m: 100 })
        .unwrap();
    assert!(hub.is_registered(SensorKind::Pressure));

    h.arbiter.activate(FeatureRequest::Flicker { hz: 10 }).unwrap();
    assert_eq!(hub.active_count(), 0);
    assert!(h.events.contains(&ArbiterEvent::FeatureChanged {
        feature: Feature::Altitude,
        icon: IconState::Inactive,
    }));
}

#[test]
fn deactivate_then_activate_equals_single_activate() {
    let mut once = Harness::new();
    once.arbiter.activate(FeatureRequest::Flicker { hz: 10 }).unwrap();

    let mut twice = Harness::new();
    twice.arbiter.activate(FeatureRequest::Flicker { hz: 10 }).unwrap();
    assert!(twice.arbiter.deactivate(Feature::Flicker));
    twice.arbiter.activate(FeatureRequest::Flicker { hz: 10 }).unwrap();

    assert_eq!(once.arbiter.owner(), twice.arbiter.owner());
    assert_eq!(once.arbiter.activated(), twice.arbiter.activated());
    assert_eq!(once.torch(), twice.torch());
    assert_eq!(once.arbiter.pending_timers(), twice.arbiter.pending_timers());
    assert_eq!(once.arbiter.next_deadline_ms(), twice.arbiter.next_deadline_ms());
}

#[test]
fn deactivate_non_owner_is_noop() {
    let mut h = Harness::new();
    h.arbiter.activate(FeatureRequest::Sos).unwrap();
    assert!(!h.arbiter.deactivate(Feature::Flicker));
    assert_eq!(h.arbiter.owner(), Some(Feature::Sos));
}

#[test]
fn toggle_torch_is_idempotent() {
    let mut h = Harness::new();
    h.arbiter.toggle_torch(true).unwrap();
    h.arbiter.toggle_torch(true).unwrap();
    h.arbiter.toggle_torch(false).unwrap();
    h.arbiter.toggle_torch(false).unwrap();
    assert_eq!(h.history(), vec![true, false]);
}

#[test]
fn torch_failure_reported_not_fatal() {
    let mut h = Harness::new();
    h.arbiter.platform_mut().torch().fail_next(1);
    assert!(matches!(
        h.arbiter.toggle_torch(true),
        Err(ArbiterError::Platform(_))
    ));
    assert!(!h.torch());
    h.arbiter.toggle_torch(true).unwrap();
    assert!(h.torch());
}

#[test]
fn manual_flicker_timing() {
    let mut h = Harness::new();
    h.arbiter.activate(FeatureRequest::Flicker { hz: 10 }).unwrap();
    assert!(h.torch());

    h.run_to(49);
    assert!(h.torch());
    h.run_to(50);
    assert!(!h.torch());
    h.run_to(99);
    assert!(!h.torch());
    h.run_to(100);
    assert!(h.torch());
    h.run_to(150);
    assert!(!h.torch());
}

#[test]
fn flicker_above_max_rejected_and_owner_kept() {
    let mut h = Harness::new();
    h.arbiter.activate(FeatureRequest::Sos).unwrap();
    let err = h.arbiter.activate(FeatureRequest::Flicker { hz: 21 }).unwrap_err();
    assert!(matches!(err, ArbiterError::InvalidRequest(_)));
    assert_eq!(h.arbiter.owner(), Some(Feature::Sos));
}

#[test]
fn deactivation_stops_flicker_loop() {
    let mut h = Harness::new();
    h.arbiter.activate(FeatureRequest::Flicker { hz: 10 }).unwrap();
    h.run_to(120);
    h.arbiter.deactivate(Feature::Flicker);
    let calls = h.history().len();

    h.run_to(2_000);
    assert_eq!(h.history().len(), calls);
    assert!(!h.torch());
    assert_eq!(h.arbiter.pending_timers(), 0);
}

#[test]
fn sos_timing() {
    let mut h = Harness::new();
    h.arbiter.activate(FeatureRequest::Sos).unwrap();
    assert!(h.torch());

    // S: three dits
    h.run_to(250);
    assert!(!h.torch());
    h.run_to(500);
    assert!(h.torch());
    h.run_to(1_250);
    assert!(!h.torch());

    // O starts after the 750 ms letter gap
    h.run_to(1_999);
    assert!(!h.torch());
    h.run_to(2_000);
    assert!(h.torch());
    h.run_to(2_750);
    assert!(!h.torch());

    // last dit of the second S ends at 6750, word spans 7500
    h.run_to(6_750);
    assert!(!h.torch());
    h.run_to(8_499);
    assert!(!h.torch());

    // repeat
    h.run_to(8_500);
    assert!(h.torch());

    // 9 on/off pairs per word, plus the repeat's first on
    assert_eq!(h.history().len(), 19);
}

#[test]
fn battery_threshold_fires_at_target() {
    let settings = Settings {
        flicker_duration_battery_ms: 20_000,
        ..Settings::default()
    };
    let mut h = Harness::with(MockPlatform::new(), settings, ArbiterConfig::default());
    let hub = h.arbiter.platform().sensor_hub();

    h.arbiter
        .activate(FeatureRequest::Battery { target_percent: 80 })
        .unwrap();
    h.arbiter.on_sensor_event(battery(50));
    assert!(h.events.contains(&ArbiterEvent::ThresholdBaseline {
        feature: Feature::Battery,
        baseline: 50.0,
    }));

    h.arbiter.on_sensor_event(battery(79));
    assert!(!h.torch());
    assert!(h.history().is_empty());

    h.arbiter.on_sensor_event(battery(80));
    assert!(h.torch());
    assert!(h.events.contains(&ArbiterEvent::TriggerFired {
        feature: Feature::Battery
    }));
    assert!(!hub.is_registered(SensorKind::Battery));

    h.run_to(50);
    assert!(!h.torch());
    h.run_to(19_999);
    assert_eq!(h.arbiter.owner(), Some(Feature::Battery));

    h.run_to(20_000);
    assert_eq!(h.arbiter.owner(), None);
    assert!(!h.torch());
    assert_eq!(h.arbiter.icon(Feature::Battery), IconState::Inactive);
    assert_eq!(h.arbiter.pending_timers(), 0);
}

#[test]
fn battery_falling_target() {
    let mut h = Harness::new();
    h.arbiter
        .activate(FeatureRequest::Battery { target_percent: 20 })
        .unwrap();
    h.arbiter.on_sensor_event(battery(60));
    h.arbiter.on_sensor_event(battery(21));
    assert!(!h.torch());
    h.arbiter.on_sensor_event(battery(20));
    assert!(h.torch());
}

#[test]
fn altitude_threshold_from_pressure() {
    let mut h = Harness::new();
    h.arbiter
        .activate(FeatureRequest::Altitude { target_m: 100 })
        .unwrap();
    h.arbiter.on_sensor_event(SensorEvent::Pressure { hpa: 1013.25 });
    h.arbiter.on_sensor_event(SensorEvent::Pressure { hpa: 1005.0 });
    assert!(!h.torch());
    h.arbiter.on_sensor_event(SensorEvent::Pressure { hpa: 1000.0 });
    assert!(h.torch());
}

#[test]
fn network_change_fires_once() {
    let mut h = Harness::new();
    h.arbiter.activate(FeatureRequest::Network).unwrap();
    h.arbiter
        .on_sensor_event(SensorEvent::Connectivity { connected: true });
    h.arbiter
        .on_sensor_event(SensorEvent::Connectivity { connected: true });
    assert!(!h.torch());

    h.arbiter
        .on_sensor_event(SensorEvent::Connectivity { connected: false });
    assert!(h.torch());

    h.run_to(30_000);
    assert_eq!(h.arbiter.owner(), None);
}

#[test]
fn timer_fires_at_scheduled_time() {
    let mut h = Harness::new();
    assert!(matches!(
        h.arbiter.activate(FeatureRequest::Timer { at_ms: 10_000 }),
        Err(ArbiterError::InvalidRequest(_))
    ));

    h.arbiter
        .activate(FeatureRequest::Timer { at_ms: 15_000 })
        .unwrap();
    h.run_to(4_999);
    assert!(!h.torch());
    h.run_to(5_000);
    assert!(h.torch());

    h.run_to(35_000);
    assert_eq!(h.arbiter.owner(), None);
    assert!(!h.torch());
}

#[test]
fn tilt_flips_on_each_rising_edge() {
    let mut h = Harness::new();
    h.arbiter.activate(FeatureRequest::Tilt).unwrap();

    h.arbiter.on_sensor_event(rotation(80.0));
    assert!(!h.torch(), "already tilted at activation");

    h.arbiter.on_sensor_event(rotation(10.0));
    h.arbiter.on_sensor_event(rotation(75.0));
    assert!(h.torch());

    // within hysteresis, no re-arm
    h.arbiter.on_sensor_event(rotation(67.0));
    h.arbiter.on_sensor_event(rotation(80.0));
    assert!(h.torch());

    h.arbiter.on_sensor_event(rotation(30.0));
    h.arbiter.on_sensor_event(rotation(85.0));
    assert!(!h.torch());
}

#[test]
fn tilt_fires_at_lowest_angle() {
    let settings = Settings {
        tilt_angle_deg: 5,
        ..Settings::default()
    };
    let mut h = Harness::with(MockPlatform::new(), settings, ArbiterConfig::default());
    h.arbiter.activate(FeatureRequest::Tilt).unwrap();

    for deg in [0.0, 30.0, 0.0, 60.0, 0.0, 90.0] {
        h.arbiter.on_sensor_event(rotation(deg));
    }
    assert_eq!(h.history(), vec![true, false, true]);
    assert!(h.torch());
}

#[test]
fn incoming_call_flickers_while_ringing() {
    let mut h = Harness::new();
    h.arbiter.activate(FeatureRequest::IncomingCall).unwrap();

    h.arbiter
        .on_sensor_event(SensorEvent::CallState(CallState::Ringing));
    assert!(h.torch());
    h.run_to(1_000);

    h.arbiter
        .on_sensor_event(SensorEvent::CallState(CallState::OffHook));
    assert!(!h.torch());
    assert_eq!(h.arbiter.owner(), Some(Feature::IncomingCall));
    assert_eq!(h.arbiter.pending_timers(), 0);

    // still armed
    h.arbiter
        .on_sensor_event(SensorEvent::CallState(CallState::Ringing));
    assert!(h.torch());
}

#[test]
fn sms_flicker_bounded_by_duration() {
    let mut h = Harness::new();
    h.arbiter.activate(FeatureRequest::IncomingSms).unwrap();
    h.arbiter.on_sensor_event(SensorEvent::SmsReceived);
    assert!(h.torch());

    h.run_to(15_000);
    assert!(!h.torch());
    assert_eq!(h.arbiter.owner(), Some(Feature::IncomingSms));
    assert_eq!(h.arbiter.pending_timers(), 0);
}

#[test]
fn events_for_other_sensors_ignored() {
    let mut h = Harness::new();
    h.arbiter
        .activate(FeatureRequest::Battery { target_percent: 80 })
        .unwrap();
    h.arbiter.on_sensor_event(rotation(90.0));
    h.arbiter.on_sensor_event(SensorEvent::SmsReceived);
    assert!(h.history().is_empty());
    assert!(!h.events.contains(&ArbiterEvent::ThresholdBaseline {
        feature: Feature::Battery,
        baseline: 50.0,
    }));
}

#[test]
fn missing_hardware_reported_once() {
    let platform = MockPlatform::new().with_capabilities(Hardware::TORCH);
    let mut h = Harness::with_platform(platform);

    let banners = h
        .events
        .count(|e| matches!(e, ArbiterEvent::HardwareUnavailable { .. }));
    assert_eq!(banners, 1);
    assert!(h.events.contains(&ArbiterEvent::HardwareUnavailable {
        features: FeatureSet::TILT
            | FeatureSet::SOUND
            | FeatureSet::ALTITUDE
            | FeatureSet::INCOMING_CALL
            | FeatureSet::INCOMING_SMS,
    }));
    assert_eq!(h.arbiter.icon(Feature::Altitude), IconState::Unavailable);

    assert!(matches!(
        h.arbiter.activate(FeatureRequest::Altitude { target_m: 10 }),
        Err(ArbiterError::HardwareUnavailable(Feature::Altitude))
    ));
    assert_eq!(h.arbiter.icon(Feature::Altitude), IconState::Unavailable);
    h.arbiter.activate(FeatureRequest::Flashlight).unwrap();
}

#[test]
fn permission_denied_marks_icon() {
    let mut platform = MockPlatform::new();
    platform.deny(Permission::ReceiveSms);
    let mut h = Harness::with_platform(platform);
    h.arbiter.activate(FeatureRequest::Sos).unwrap();

    let err = h.arbiter.activate(FeatureRequest::IncomingSms).unwrap_err();
    assert!(matches!(err, ArbiterError::PermissionDenied { .. }));
    assert_eq!(h.arbiter.icon(Feature::IncomingSms), IconState::NoPermission);
    assert!(h.events.contains(&ArbiterEvent::PermissionRequired {
        feature: Feature::IncomingSms,
        permission: Permission::ReceiveSms,
    }));
    assert_eq!(h.arbiter.owner(), Some(Feature::Sos));

    h.arbiter.platform_mut().grant(Permission::ReceiveSms);
    h.arbiter.activate(FeatureRequest::IncomingSms).unwrap();
    assert_eq!(h.arbiter.icon(Feature::IncomingSms), IconState::Active);
}

#[test]
fn failed_start_rolls_back() {
    let mut h = Harness::new();
    h.arbiter.platform_mut().torch().fail_next(1);

    let err = h.arbiter.activate(FeatureRequest::Flashlight).unwrap_err();
    assert!(matches!(
        err,
        ArbiterError::StartFailed {
            feature: Feature::Flashlight,
            ..
        }
    ));
    assert_eq!(h.arbiter.owner(), None);
    assert!(h.arbiter.activated().is_empty());
    assert_eq!(h.arbiter.icon(Feature::Flashlight), IconState::Inactive);
    assert_eq!(h.arbiter.pending_timers(), 0);
}

#[test]
fn failed_listener_registration_rolls_back() {
    let mut h = Harness::new();
    h.arbiter
        .platform()
        .sensor_hub()
        .remove_sensor(SensorKind::RotationVector);

    assert!(matches!(
        h.arbiter.activate(FeatureRequest::Tilt),
        Err(ArbiterError::StartFailed { .. })
    ));
    assert_eq!(h.arbiter.owner(), None);
}

#[test]
fn transient_torch_failure_keeps_flicker_running() {
    let mut h = Harness::new();
    h.arbiter.activate(FeatureRequest::Flicker { hz: 10 }).unwrap();
    h.arbiter.platform_mut().torch().fail_next(1);

    h.run_to(50);
    assert!(h.torch(), "off call failed, state unchanged");
    h.run_to(150);
    assert!(!h.torch());
    assert_eq!(h.arbiter.owner(), Some(Feature::Flicker));
}

#[test]
fn non_preempting_owner_refuses() {
    let table = PreemptionTable::exclusive().with_rule(Feature::Sos, FeatureSet::empty());
    let config = ArbiterConfig {
        preemption: table,
        ..ArbiterConfig::default()
    };
    let mut h = Harness::with(MockPlatform::new(), Settings::default(), config);

    h.arbiter.activate(FeatureRequest::Flashlight).unwrap();
    // Sos may not revoke Flashlight
    assert!(matches!(
        h.arbiter.activate(FeatureRequest::Sos),
        Err(ArbiterError::Busy {
            requested: Feature::Sos,
            owner: Feature::Flashlight,
        })
    ));
    assert_eq!(h.arbiter.owner(), Some(Feature::Flashlight));
}

#[test]
fn shutdown_releases_everything() {
    let mut h = Harness::new();
    let hub = h.arbiter.platform().sensor_hub();
    h.arbiter.activate(FeatureRequest::Network).unwrap();
    h.arbiter
        .on_sensor_event(SensorEvent::Connectivity { connected: true });

    h.arbiter.shutdown();
    assert_eq!(h.arbiter.owner(), None);
    assert_eq!(hub.active_count(), 0);
    assert_eq!(h.arbiter.pending_timers(), 0);
}

#[test]
fn drop_turns_torch_off() {
    let h = Harness::new();
    let Harness {
        events,
        mut arbiter,
        ..
    } = h;
    arbiter.activate(FeatureRequest::Flashlight).unwrap();
    drop(arbiter);
    assert_eq!(
        events.events().last(),
        Some(&ArbiterEvent::FeatureChanged {
            feature: Feature::Flashlight,
            icon: IconState::Inactive,
        })
    );
    assert!(events.contains(&ArbiterEvent::TorchChanged { on: false }));
}
