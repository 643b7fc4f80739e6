//! Feature arbiter
//!
//! Owns the torch and guarantees at most one torch-driving feature is active.
//!
//! ## Responsibilities
//!
//! - Resolve the current owner against the preemption table on activation
//! - Map each activation to a [`FlickerPolicy`] and start driving the torch
//! - Hold the feature's resources (listener, sound thread, timers) and
//!   release all of them on deactivation
//! - Funnel every torch change through one idempotent writer
//! - Report state changes through an [`EventSink`]
//!
//! ## Threading
//!
//! Everything runs on the owner's thread. The host loop calls
//! [`FeatureArbiter::run_pending`] to dispatch due timers and sound signals,
//! and [`FeatureArbiter::on_sensor_event`] for each delivered reading. The
//! sound monitor is the only other thread and never touches the torch.
//!
//! ## Failures
//!
//! A platform failure while starting a feature rolls the activation back.
//! A torch failure after that is logged and the operation abandoned; the
//! feature keeps running.

mod config;
mod error;
mod events;
mod listener;

pub use config::{ArbiterConfig, DEFAULT_SOUND_POLL_INTERVAL, DEFAULT_TILT_HYSTERESIS_DEG};
pub use error::ArbiterError;
pub use events::{ArbiterEvent, EventSink, LogEventSink, RecordingSink};
pub use listener::ListenerGuard;

use crate::platform::{
    CallState, Permission, Platform, PlatformError, SensorEvent, SensorKind, TorchInterface,
};
use crate::subsystems::{SoundMonitor, SoundSignal};
use torchlight_core::feature::{
    ActivatedFeatureList, Feature, FeatureRequest, FeatureSet, FlickerPolicy, Hardware, IconState,
    RequestError,
};
use torchlight_core::morse::MorseWord;
use torchlight_core::parameters::Settings;
use torchlight_core::scheduler::{Expired, SchedulerError, TimerQueue};
use torchlight_core::traits::TimeSource;
use torchlight_core::trigger::{
    altitude_from_pressure, battery_percent, tilt_from_rotation_vector, ChangeDetector,
    EdgeDetector, ThresholdTrigger, TriggerDecision,
};

/// Pending timer entries the arbiter can hold
pub const TIMER_QUEUE_CAPACITY: usize = 32;

/// Delayed arbiter actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerAction {
    /// Torch on, schedule off and the next cycle
    FlickerCycle { off_after_ms: u32, period_ms: u32 },
    TorchOn,
    TorchOff,
    /// Start the next repetition of the SOS word
    SosRepeat,
    /// End a telephony flicker; the feature stays armed
    StopFlicker,
    /// End a one-shot trigger's flicker and deactivate the feature
    StopFeature,
    /// Scheduled time reached
    TimerFired,
}

/// Live trigger state of the active feature
#[derive(Debug)]
enum Trigger {
    /// Feature has no trigger logic
    None,
    Tilt(EdgeDetector),
    Threshold(ThresholdTrigger),
    Network(ChangeDetector<bool>),
    Telephony { flickering: bool },
    /// One-shot trigger has fired
    Fired,
}

/// What a sensor event asks the arbiter to do
enum Reaction {
    Nothing,
    FlipTorch,
    Baseline(f32),
    Fire,
    StopFlicker,
}

/// The current torch owner and everything it holds
#[derive(Debug)]
struct ActiveFeature<S: crate::platform::SensorHub> {
    feature: Feature,
    policy: FlickerPolicy,
    trigger: Trigger,
    listener: Option<ListenerGuard<S>>,
    sound: Option<SoundMonitor>,
}

impl<S: crate::platform::SensorHub> ActiveFeature<S> {
    fn new(feature: Feature, policy: FlickerPolicy) -> Self {
        Self {
            feature,
            policy,
            trigger: Trigger::None,
            listener: None,
            sound: None,
        }
    }
}

/// Single-owner torch arbiter
///
/// # Example
///
/// ```
/// use torchlight::arbiter::{FeatureArbiter, RecordingSink};
/// use torchlight::platform::mock::{MockClock, MockPlatform};
/// use torchlight_core::feature::{Feature, FeatureRequest};
/// use torchlight_core::parameters::Settings;
///
/// let clock = MockClock::new();
/// let mut arbiter = FeatureArbiter::new(
///     MockPlatform::new(),
///     clock.clone(),
///     RecordingSink::new(),
///     Settings::default(),
/// );
///
/// arbiter.activate(FeatureRequest::Flicker { hz: 10 }).unwrap();
/// assert!(arbiter.is_torch_on());
///
/// clock.advance(50);
/// arbiter.run_pending();
/// assert!(!arbiter.is_torch_on());
///
/// arbiter.activate(FeatureRequest::Sos).unwrap();
/// assert_eq!(arbiter.owner(), Some(Feature::Sos));
/// ```
pub struct FeatureArbiter<P: Platform, C: TimeSource, E: EventSink> {
    platform: P,
    clock: C,
    events: E,
    config: ArbiterConfig,
    settings: Settings,
    capabilities: Hardware,
    icons: [IconState; Feature::COUNT],
    owner: Option<ActiveFeature<P::Sensors>>,
    activated: ActivatedFeatureList,
    timers: TimerQueue<TimerAction, TIMER_QUEUE_CAPACITY>,
    torch_on: bool,
    sos: MorseWord,
}

impl<P: Platform, C: TimeSource, E: EventSink> FeatureArbiter<P, C, E> {
    /// Create an arbiter with the default configuration
    pub fn new(platform: P, clock: C, events: E, settings: Settings) -> Self {
        Self::with_config(platform, clock, events, settings, ArbiterConfig::default())
    }

    /// Create an arbiter
    ///
    /// Features whose hardware is missing are marked unavailable and
    /// reported once through a `HardwareUnavailable` event.
    pub fn with_config(
        platform: P,
        clock: C,
        mut events: E,
        settings: Settings,
        config: ArbiterConfig,
    ) -> Self {
        let capabilities = platform.capabilities();

        let mut icons = [IconState::Inactive; Feature::COUNT];
        let mut unavailable = FeatureSet::empty();
        for feature in Feature::ALL {
            if !capabilities.contains(feature.required_hardware()) {
                icons[feature.index()] = IconState::Unavailable;
                unavailable |= feature.flag();
            }
        }
        if !unavailable.is_empty() {
            events.emit(ArbiterEvent::HardwareUnavailable {
                features: unavailable,
            });
        }

        for (by, victim) in config.preemption.asymmetric_pairs() {
            crate::log_warn!("{} preempts {} but not the other way round", by, victim);
        }

        Self {
            platform,
            clock,
            events,
            config,
            settings,
            capabilities,
            icons,
            owner: None,
            activated: ActivatedFeatureList::new(),
            timers: TimerQueue::new(),
            torch_on: false,
            sos: MorseWord::sos(),
        }
    }

    /// Activate a feature
    ///
    /// Revokes the current owner if the preemption table allows it;
    /// re-activating the current owner restarts it. Validation happens before
    /// anything is revoked, so a rejected request leaves the current owner
    /// running.
    ///
    /// # Errors
    ///
    /// - `HardwareUnavailable` / `PermissionDenied` before any state change
    /// - `InvalidRequest` for out-of-range parameters
    /// - `Busy` if the current owner may not be revoked
    /// - `StartFailed` / `Scheduler` if starting failed; the new feature is
    ///   rolled back
    pub fn activate(&mut self, request: FeatureRequest) -> Result<(), ArbiterError> {
        let feature = request.feature();
        let now = self.clock.now_ms();

        if !self.capabilities.contains(feature.required_hardware()) {
            crate::log_warn!("{} unavailable: missing hardware", feature);
            return Err(ArbiterError::HardwareUnavailable(feature));
        }

        if let Some(permission) = Permission::required_by(feature) {
            if !self.platform.has_permission(permission) {
                self.set_icon(feature, IconState::NoPermission);
                self.events.emit(ArbiterEvent::PermissionRequired {
                    feature,
                    permission,
                });
                return Err(ArbiterError::PermissionDenied {
                    feature,
                    permission,
                });
            }
        }

        let policy = FlickerPolicy::for_request(&request, &self.settings)?;
        if let FeatureRequest::Timer { at_ms } = request {
            if at_ms <= now {
                return Err(RequestError::TimeInPast { at_ms, now_ms: now }.into());
            }
        }

        if let Some(owner) = self.owner() {
            if owner == feature {
                crate::log_info!("{} restarted", feature);
            } else if self.config.preemption.preempts(feature, owner) {
                crate::log_info!("{} preempts {}", feature, owner);
            } else {
                crate::log_warn!("{} blocked by {}", feature, owner);
                return Err(ArbiterError::Busy {
                    requested: feature,
                    owner,
                });
            }
            self.deactivate(owner);
        }

        match self.start(request, policy, now) {
            Ok(active) => {
                self.owner = Some(active);
                self.activated.push(feature);
                self.set_icon(feature, IconState::Active);
                crate::log_info!("{} active ({:?})", feature, policy);
                Ok(())
            }
            Err(err) => {
                crate::log_error!("{}", err);
                self.timers.cancel_all();
                self.drive_torch(false);
                let icon = match &err {
                    ArbiterError::StartFailed {
                        source: PlatformError::PermissionDenied(_),
                        ..
                    } => IconState::NoPermission,
                    _ => IconState::Inactive,
                };
                self.set_icon(feature, icon);
                Err(err)
            }
        }
    }

    /// Deactivate `feature` if it is the current owner
    ///
    /// Cancels every pending timer, joins the sound thread, releases the
    /// listener and turns the torch off. Returns `false` (and does nothing)
    /// when `feature` is not the owner.
    pub fn deactivate(&mut self, feature: Feature) -> bool {
        if self.owner() != Some(feature) {
            return false;
        }
        let Some(active) = self.owner.take() else {
            return false;
        };

        let cancelled = self.timers.cancel_all();
        crate::log_debug!("{}: {} pending timers cancelled", feature, cancelled);

        let ActiveFeature {
            listener, sound, ..
        } = active;
        if let Some(monitor) = sound {
            monitor.stop();
        }
        drop(listener);

        self.drive_torch(false);
        self.activated.remove(feature);
        self.set_icon(feature, IconState::Inactive);
        crate::log_info!("{} deactivated", feature);
        true
    }

    /// Switch the torch
    ///
    /// Idempotent: asking for the current state makes no hardware call.
    ///
    /// # Errors
    ///
    /// The platform error from the torch; the recorded state is unchanged.
    pub fn toggle_torch(&mut self, on: bool) -> Result<(), ArbiterError> {
        self.switch_torch(on).map_err(|e| {
            crate::log_warn!("torch {} failed: {}", if on { "on" } else { "off" }, e);
            ArbiterError::Platform(e)
        })
    }

    /// Dispatch sound signals and every timer due at the current time
    ///
    /// Returns the number of actions handled.
    pub fn run_pending(&mut self) -> usize {
        let now = self.clock.now_ms();
        let mut handled = self.drain_sound();
        while let Some(expired) = self.timers.pop_due(now) {
            self.dispatch(expired, now);
            handled += 1;
        }
        handled
    }

    /// Feed a sensor reading or broadcast
    ///
    /// Ignored unless the current owner holds a listener of the event's kind.
    pub fn on_sensor_event(&mut self, event: SensorEvent) {
        let now = self.clock.now_ms();
        let Some(active) = self.owner.as_mut() else {
            crate::log_trace!("no owner, dropping {:?}", event);
            return;
        };
        if active.listener.as_ref().map(ListenerGuard::kind) != Some(event.kind()) {
            crate::log_trace!("{} not listening for {:?}", active.feature, event);
            return;
        }
        let feature = active.feature;

        let reaction = match (&mut active.trigger, event) {
            (Trigger::Tilt(edge), SensorEvent::Rotation { x, y, z }) => {
                if edge.observe(tilt_from_rotation_vector(x, y, z)) {
                    Reaction::FlipTorch
                } else {
                    Reaction::Nothing
                }
            }
            (Trigger::Threshold(trigger), SensorEvent::Battery { level, scale }) => {
                match battery_percent(level, scale) {
                    Some(percent) => threshold_reaction(trigger.observe(f32::from(percent))),
                    None => Reaction::Nothing,
                }
            }
            (Trigger::Threshold(trigger), SensorEvent::Pressure { hpa }) => {
                threshold_reaction(trigger.observe(altitude_from_pressure(hpa)))
            }
            (Trigger::Network(detector), SensorEvent::Connectivity { connected }) => {
                if detector.observe(connected) {
                    Reaction::Fire
                } else {
                    Reaction::Nothing
                }
            }
            (
                Trigger::Telephony { flickering: false },
                SensorEvent::CallState(CallState::Ringing),
            ) => Reaction::Fire,
            (Trigger::Telephony { flickering: true }, SensorEvent::CallState(state))
                if state != CallState::Ringing =>
            {
                Reaction::StopFlicker
            }
            (Trigger::Telephony { .. }, SensorEvent::SmsReceived) => Reaction::Fire,
            _ => Reaction::Nothing,
        };

        match reaction {
            Reaction::Nothing => {}
            Reaction::FlipTorch => {
                let on = !self.torch_on;
                self.drive_torch(on);
            }
            Reaction::Baseline(baseline) => {
                self.events
                    .emit(ArbiterEvent::ThresholdBaseline { feature, baseline });
            }
            Reaction::Fire => self.fire(now),
            Reaction::StopFlicker => self.stop_flicker(),
        }
    }

    /// Deactivate the owner and leave the torch off
    ///
    /// Called on teardown and from `Drop`.
    pub fn shutdown(&mut self) {
        if let Some(owner) = self.owner() {
            self.deactivate(owner);
        }
        self.timers.cancel_all();
        self.drive_torch(false);
    }

    /// Current torch owner
    pub fn owner(&self) -> Option<Feature> {
        self.owner.as_ref().map(|a| a.feature)
    }

    /// Policy of the current owner
    pub fn policy(&self) -> Option<FlickerPolicy> {
        self.owner.as_ref().map(|a| a.policy)
    }

    pub fn icon(&self, feature: Feature) -> IconState {
        self.icons[feature.index()]
    }

    /// Features currently shown as active
    pub fn activated(&self) -> &[Feature] {
        self.activated.as_slice()
    }

    pub fn is_torch_on(&self) -> bool {
        self.torch_on
    }

    /// Time of the earliest pending timer
    pub fn next_deadline_ms(&self) -> Option<u64> {
        self.timers.next_due_ms()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace settings; running features keep the values they started with
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    pub fn config(&self) -> &ArbiterConfig {
        &self.config
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    fn start(
        &mut self,
        request: FeatureRequest,
        policy: FlickerPolicy,
        now: u64,
    ) -> Result<ActiveFeature<P::Sensors>, ArbiterError> {
        let feature = request.feature();
        let mut active = ActiveFeature::new(feature, policy);
        let start_failed = |source| ArbiterError::StartFailed { feature, source };

        match request {
            FeatureRequest::Flashlight => {
                self.switch_torch(true).map_err(start_failed)?;
            }
            FeatureRequest::Flicker { .. } => {
                if let Some((off_after_ms, period_ms)) = policy.cycle() {
                    self.switch_torch(true).map_err(start_failed)?;
                    self.schedule_cycle(now, off_after_ms, period_ms)?;
                }
            }
            FeatureRequest::Sos => {
                self.switch_torch(true).map_err(start_failed)?;
                self.schedule_sos_word(now)?;
            }
            FeatureRequest::Tilt => {
                active.listener = Some(self.listen(feature, SensorKind::RotationVector)?);
                active.trigger = Trigger::Tilt(EdgeDetector::new(
                    self.settings.tilt_angle_deg as f32,
                    self.config.tilt_hysteresis_deg,
                ));
            }
            FeatureRequest::Sound => {
                let microphone = self.platform.open_microphone().map_err(start_failed)?;
                let threshold = u16::try_from(self.settings.sound_threshold).unwrap_or(u16::MAX);
                let monitor =
                    SoundMonitor::start(microphone, threshold, self.config.sound_poll_interval)
                        .map_err(|e| start_failed(PlatformError::Io(e)))?;
                active.sound = Some(monitor);
            }
            FeatureRequest::Network => {
                active.listener = Some(self.listen(feature, SensorKind::Connectivity)?);
                active.trigger = Trigger::Network(ChangeDetector::new());
            }
            FeatureRequest::Battery { target_percent } => {
                active.listener = Some(self.listen(feature, SensorKind::Battery)?);
                active.trigger =
                    Trigger::Threshold(ThresholdTrigger::new(f32::from(target_percent)));
            }
            FeatureRequest::Altitude { target_m } => {
                active.listener = Some(self.listen(feature, SensorKind::Pressure)?);
                active.trigger = Trigger::Threshold(ThresholdTrigger::new(target_m as f32));
            }
            FeatureRequest::Timer { at_ms } => {
                self.timers.schedule_at(at_ms, TimerAction::TimerFired)?;
            }
            FeatureRequest::IncomingCall => {
                active.listener = Some(self.listen(feature, SensorKind::CallState)?);
                active.trigger = Trigger::Telephony { flickering: false };
            }
            FeatureRequest::IncomingSms => {
                active.listener = Some(self.listen(feature, SensorKind::Sms)?);
                active.trigger = Trigger::Telephony { flickering: false };
            }
        }

        Ok(active)
    }

    fn listen(
        &self,
        feature: Feature,
        kind: SensorKind,
    ) -> Result<ListenerGuard<P::Sensors>, ArbiterError> {
        ListenerGuard::register(self.platform.sensors(), kind)
            .map_err(|source| ArbiterError::StartFailed { feature, source })
    }

    fn dispatch(&mut self, expired: Expired<TimerAction>, now: u64) {
        match expired.action {
            TimerAction::TorchOn => self.drive_torch(true),
            TimerAction::TorchOff => self.drive_torch(false),
            TimerAction::FlickerCycle {
                off_after_ms,
                period_ms,
            } => {
                let base = catch_up(expired.due_ms, now, period_ms);
                match self
                    .timers
                    .reschedule(&expired, base + u64::from(period_ms), expired.action)
                {
                    Ok(true) => {}
                    Ok(false) => return,
                    Err(e) => {
                        crate::log_error!("flicker stopped: {}", e);
                        return;
                    }
                }
                self.drive_torch(true);
                if let Err(e) = self
                    .timers
                    .schedule_at(base + u64::from(off_after_ms), TimerAction::TorchOff)
                {
                    crate::log_error!("flicker off-phase dropped: {}", e);
                }
            }
            TimerAction::SosRepeat => {
                if expired.generation != self.timers.generation() {
                    return;
                }
                let base = catch_up(expired.due_ms, now, self.sos.repeat_after_ms());
                self.drive_torch(true);
                if let Err(e) = self.schedule_sos_word(base) {
                    crate::log_error!("SOS stopped: {}", e);
                }
            }
            TimerAction::StopFlicker => self.stop_flicker(),
            TimerAction::StopFeature => {
                if let Some(owner) = self.owner() {
                    crate::log_info!("{} flicker duration elapsed", owner);
                    self.deactivate(owner);
                }
            }
            TimerAction::TimerFired => self.fire(now),
        }
    }

    /// Start the bounded flicker of a conditional trigger
    fn fire(&mut self, now: u64) {
        let Some(active) = self.owner.as_mut() else {
            return;
        };
        let FlickerPolicy::Bounded {
            period_ms,
            duration_ms,
        } = active.policy
        else {
            return;
        };
        let feature = active.feature;

        let stop = match &mut active.trigger {
            Trigger::Telephony { flickering } => {
                *flickering = true;
                TimerAction::StopFlicker
            }
            trigger => {
                *trigger = Trigger::Fired;
                active.listener = None;
                TimerAction::StopFeature
            }
        };

        crate::log_info!("{} fired, flickering for {} ms", feature, duration_ms);
        self.events.emit(ArbiterEvent::TriggerFired { feature });

        // A telephony trigger may fire again while flickering; restart cleanly.
        self.timers.cancel_all();
        self.drive_torch(true);
        let scheduled = self
            .schedule_cycle(now, period_ms / 2, period_ms)
            .and_then(|_| {
                self.timers
                    .schedule_at(now + u64::from(duration_ms), stop)
                    .map_err(ArbiterError::from)
            });
        if let Err(e) = scheduled {
            crate::log_error!("{} flicker not scheduled: {}", feature, e);
        }
    }

    fn stop_flicker(&mut self) {
        self.timers.cancel_all();
        self.drive_torch(false);
        if let Some(ActiveFeature {
            trigger: Trigger::Telephony { flickering },
            ..
        }) = self.owner.as_mut()
        {
            *flickering = false;
        }
    }

    fn schedule_cycle(
        &mut self,
        base_ms: u64,
        off_after_ms: u32,
        period_ms: u32,
    ) -> Result<(), ArbiterError> {
        self.timers
            .schedule_at(base_ms + u64::from(off_after_ms), TimerAction::TorchOff)?;
        self.timers.schedule_at(
            base_ms + u64::from(period_ms),
            TimerAction::FlickerCycle {
                off_after_ms,
                period_ms,
            },
        )?;
        Ok(())
    }

    /// Schedule one SOS word starting at `start_ms`
    ///
    /// The word's first step (torch on at offset 0) is left to the caller.
    fn schedule_sos_word(&mut self, start_ms: u64) -> Result<(), SchedulerError> {
        for step in self.sos.steps().iter().skip(1) {
            let action = if step.on {
                TimerAction::TorchOn
            } else {
                TimerAction::TorchOff
            };
            self.timers
                .schedule_at(start_ms + u64::from(step.offset_ms), action)?;
        }
        self.timers.schedule_at(
            start_ms + u64::from(self.sos.repeat_after_ms()),
            TimerAction::SosRepeat,
        )
    }

    fn drain_sound(&mut self) -> usize {
        let mut flips = 0;
        loop {
            let signal = match self.owner.as_ref().and_then(|a| a.sound.as_ref()) {
                Some(monitor) => monitor.try_next(),
                None => break,
            };
            match signal {
                Some(SoundSignal::Loud { amplitude }) => {
                    crate::log_debug!("sound event, amplitude {}", amplitude);
                    let on = !self.torch_on;
                    self.drive_torch(on);
                    flips += 1;
                }
                Some(SoundSignal::CaptureFailed) => {
                    crate::log_warn!("microphone lost, stopping sound trigger");
                    self.deactivate(Feature::Sound);
                    break;
                }
                None => break,
            }
        }
        flips
    }

    /// Single torch writer
    fn switch_torch(&mut self, on: bool) -> Result<(), PlatformError> {
        if self.torch_on == on {
            return Ok(());
        }
        self.platform.torch().set_torch(on)?;
        self.torch_on = on;
        self.events.emit(ArbiterEvent::TorchChanged { on });
        Ok(())
    }

    /// Torch change from inside a running feature: log and carry on
    fn drive_torch(&mut self, on: bool) {
        if let Err(e) = self.switch_torch(on) {
            crate::log_warn!("torch {} failed: {}", if on { "on" } else { "off" }, e);
        }
    }

    fn set_icon(&mut self, feature: Feature, icon: IconState) {
        let slot = &mut self.icons[feature.index()];
        if *slot != icon {
            *slot = icon;
            self.events
                .emit(ArbiterEvent::FeatureChanged { feature, icon });
        }
    }
}

impl<P: Platform, C: TimeSource, E: EventSink> Drop for FeatureArbiter<P, C, E> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn threshold_reaction(decision: TriggerDecision) -> Reaction {
    match decision {
        TriggerDecision::BaselineCaptured { baseline, .. } => Reaction::Baseline(baseline),
        TriggerDecision::Crossed { .. } => Reaction::Fire,
        TriggerDecision::Waiting | TriggerDecision::Spent => Reaction::Nothing,
    }
}

/// Base time for the next repetition of a periodic action
///
/// Skips missed repetitions instead of replaying them when the loop ran late
/// by a full period or more.
fn catch_up(due_ms: u64, now_ms: u64, period_ms: u32) -> u64 {
    if now_ms.saturating_sub(due_ms) >= u64::from(period_ms) {
        now_ms
    } else {
        due_ms
    }
}
