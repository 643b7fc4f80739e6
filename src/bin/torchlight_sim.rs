//! Desktop simulation of the torch arbiter.
//!
//! Runs one feature against the mock platform in real time, feeding it a
//! scripted sequence of sensor events, and logs every torch change.
//!
//! Usage: torchlight_sim <scenario> [seconds]
//!
//! Scenarios: flashlight, flicker[=HZ], sos, tilt, sound, network, battery,
//! altitude, timer, call, sms
//!
//! Settings persist in `$TMPDIR/torchlight-settings.bin`.
//! Set `RUST_LOG=debug` to see every torch transition.

use std::process::ExitCode;
use std::thread;
use std::time::Duration;
use torchlight::app::TorchlightApp;
use torchlight::arbiter::LogEventSink;
use torchlight::platform::host::{FileStorage, SystemClock};
use torchlight::platform::mock::MockPlatform;
use torchlight::platform::{CallState, SensorEvent};
use torchlight_core::feature::FeatureRequest;
use torchlight_core::traits::TimeSource;

/// Longest sleep between loop iterations
const MAX_IDLE_MS: u64 = 10;

const USAGE: &str = "usage: torchlight_sim \
    <flashlight|flicker[=HZ]|sos|tilt|sound|network|battery|altitude|timer|call|sms> [seconds]";

/// Sensor event delivered at an offset from the start of the run
type Scripted = (u64, SensorEvent);

fn rotation(deg: f32) -> SensorEvent {
    let half = (deg.to_radians() / 2.0).sin();
    SensorEvent::Rotation {
        x: half,
        y: 0.0,
        z: 0.0,
    }
}

fn scenario(name: &str, now_ms: u64) -> Option<(FeatureRequest, Vec<Scripted>)> {
    let (name, arg) = match name.split_once('=') {
        Some((name, arg)) => (name, Some(arg)),
        None => (name, None),
    };

    let plan = match name {
        "flashlight" => (FeatureRequest::Flashlight, vec![]),
        "flicker" => {
            let hz = arg.and_then(|a| a.parse().ok()).unwrap_or(10);
            (FeatureRequest::Flicker { hz }, vec![])
        }
        "sos" => (FeatureRequest::Sos, vec![]),
        "tilt" => (
            FeatureRequest::Tilt,
            vec![
                (0, rotation(10.0)),
                (1_000, rotation(80.0)),
                (2_000, rotation(20.0)),
                (3_000, rotation(85.0)),
            ],
        ),
        "sound" => (FeatureRequest::Sound, vec![]),
        "network" => (
            FeatureRequest::Network,
            vec![
                (0, SensorEvent::Connectivity { connected: true }),
                (1_500, SensorEvent::Connectivity { connected: false }),
            ],
        ),
        "battery" => (
            FeatureRequest::Battery { target_percent: 80 },
            (0..=30)
                .map(|i| (i * 100, SensorEvent::Battery { level: 50 + i as u32, scale: 100 }))
                .collect(),
        ),
        "altitude" => (
            FeatureRequest::Altitude { target_m: 100 },
            (0..=20)
                .map(|i| (i * 100, SensorEvent::Pressure { hpa: 1013.25 - i as f32 }))
                .collect(),
        ),
        "timer" => (FeatureRequest::Timer { at_ms: now_ms + 2_000 }, vec![]),
        "call" => (
            FeatureRequest::IncomingCall,
            vec![
                (1_000, SensorEvent::CallState(CallState::Ringing)),
                (4_000, SensorEvent::CallState(CallState::Idle)),
            ],
        ),
        "sms" => (FeatureRequest::IncomingSms, vec![(1_000, SensorEvent::SmsReceived)]),
        _ => return None,
    };
    Some(plan)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(name) = args.first() else {
        eprintln!("{USAGE}");
        return ExitCode::FAILURE;
    };
    let seconds: u64 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(10);

    let clock = SystemClock::new();
    let storage = FileStorage::new(std::env::temp_dir().join("torchlight-settings.bin"));
    let platform = MockPlatform::new();
    platform
        .microphone()
        .push_samples(&[500, 500, 20_000, 20_000, 500, 500, 500, 25_000, 400]);

    let mut app = TorchlightApp::create(platform, clock.clone(), LogEventSink::new(), storage);

    let start = clock.now_ms();
    let Some((request, mut script)) = scenario(name, start) else {
        eprintln!("unknown scenario {name:?}\n{USAGE}");
        return ExitCode::FAILURE;
    };

    if let Err(e) = app.arbiter_mut().activate(request) {
        log::error!("activation failed: {e}");
        app.teardown();
        return ExitCode::FAILURE;
    }

    script.reverse();
    let end = start + seconds * 1_000;
    while clock.now_ms() < end {
        let elapsed = clock.elapsed_since(start);
        while script.last().is_some_and(|(at, _)| *at <= elapsed) {
            if let Some((_, event)) = script.pop() {
                app.arbiter_mut().on_sensor_event(event);
            }
        }

        app.arbiter_mut().run_pending();

        let now = clock.now_ms();
        let wake = app
            .arbiter()
            .next_deadline_ms()
            .unwrap_or(u64::MAX)
            .min(script.last().map_or(u64::MAX, |(at, _)| start + at))
            .min(end);
        thread::sleep(Duration::from_millis(wake.saturating_sub(now).clamp(1, MAX_IDLE_MS)));
    }

    log::info!(
        "{} torch calls, owner at exit: {:?}",
        app.arbiter().platform().torch_ref().call_count(),
        app.arbiter().owner()
    );
    app.teardown();
    ExitCode::SUCCESS
}
