//! Committing picker values to device state and the remote service.

use crate::device::{DeviceRecord, DeviceRegistry};
use crate::error::PanelError;
use crate::transport::{ControlCommand, DeviceTransport};
use crate::values::{FanSpeed, LightSetting};

use log::{debug, warn};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Status summary shown on a device's entry in the device list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceBadge {
    /// Current mode name, or `off`.
    pub light: &'static str,
    /// Fan speed name.
    pub fan: &'static str,
}

impl DeviceBadge {
    /// Render the badge for a record.
    pub fn render(record: &DeviceRecord) -> Self {
        Self {
            light: record.effective_mode().as_str(),
            fan: record.fan_speed.name(),
        }
    }
}

// =============================================================================
// Status Banner
// =============================================================================

/// Whether a status message reports success or failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// The request succeeded.
    Success,
    /// The request failed.
    Error,
}

/// One message in the status banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    /// Success or failure.
    pub kind: StatusKind,
    /// Text to display.
    pub text: String,
    shown_at: Instant,
}

/// A transient banner that clears itself after a fixed hold time.
#[derive(Debug, Clone)]
pub struct StatusBanner {
    hold: Duration,
    message: Option<StatusMessage>,
}

impl StatusBanner {
    /// Create an empty banner.
    pub fn new(hold: Duration) -> Self {
        Self {
            hold,
            message: None,
        }
    }

    /// Show a message starting at `now`, replacing any previous one.
    pub fn show(&mut self, kind: StatusKind, text: impl Into<String>, now: Instant) {
        self.message = Some(StatusMessage {
            kind,
            text: text.into(),
            shown_at: now,
        });
    }

    /// Show the outcome of a request.
    pub fn show_outcome(&mut self, outcome: &Result<String, PanelError>, now: Instant) {
        match outcome {
            Ok(body) => self.show(StatusKind::Success, format!("Status: {}", body), now),
            Err(e) => self.show(StatusKind::Error, format!("Error: {}", e), now),
        }
    }

    /// The message visible at `now`, if it has not expired.
    pub fn visible_at(&self, now: Instant) -> Option<&StatusMessage> {
        self.message
            .as_ref()
            .filter(|m| now.saturating_duration_since(m.shown_at) < self.hold)
    }

    /// The message visible right now.
    pub fn visible(&self) -> Option<&StatusMessage> {
        self.visible_at(Instant::now())
    }
}

// =============================================================================
// ControlSync
// =============================================================================

/// A control push that has been applied locally and still needs sending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPush {
    /// Monotonic sequence number of this push.
    pub seq: u64,
    /// The command to send.
    pub command: ControlCommand,
}

/// Copies committed values into the registry and pushes them to the service.
///
/// Local state is updated optimistically before the request is sent and is
/// never rolled back; a failure only shows in the status banner until the
/// next full reload. Completions are ordered by sequence number: a response
/// older than the newest one already shown is dropped.
#[derive(Debug, Clone)]
pub struct ControlSync {
    next_seq: u64,
    latest_shown: u64,
    badges: HashMap<String, DeviceBadge>,
    banner: StatusBanner,
}

impl ControlSync {
    /// Create with a status banner that holds messages for `status_hold`.
    pub fn new(status_hold: Duration) -> Self {
        Self {
            next_seq: 1,
            latest_shown: 0,
            badges: HashMap::new(),
            banner: StatusBanner::new(status_hold),
        }
    }

    /// Apply a setting to the registry, re-render the badge, and build the push.
    ///
    /// Returns `None` (and logs) if the address is unknown, which happens when
    /// the view still references a device removed in the meantime.
    pub fn stage(
        &mut self,
        registry: &mut DeviceRegistry,
        address: &str,
        setting: LightSetting,
        fan: FanSpeed,
    ) -> Option<PendingPush> {
        let Some(record) = registry.get_mut(address) else {
            warn!("ignoring update for unknown device {}", address);
            return None;
        };

        record.apply_setting(setting);
        record.fan_speed = fan;
        self.badges
            .insert(address.to_string(), DeviceBadge::render(record));

        let seq = self.next_seq;
        self.next_seq += 1;
        debug!("staged push #{} for {}: {:?}, fan={:?}", seq, address, setting, fan);

        Some(PendingPush {
            seq,
            command: ControlCommand {
                address: address.to_string(),
                setting,
                fan,
            },
        })
    }

    /// Record the outcome of push `seq` as of `now`.
    ///
    /// Returns `false` if the outcome was stale and dropped.
    pub fn finish_at(
        &mut self,
        seq: u64,
        outcome: Result<String, PanelError>,
        now: Instant,
    ) -> bool {
        if let Err(e) = &outcome {
            warn!("push #{} failed: {}", seq, e);
        }
        if seq < self.latest_shown {
            debug!(
                "dropping stale response for push #{} (already showing #{})",
                seq, self.latest_shown
            );
            return false;
        }
        self.latest_shown = seq;
        self.banner.show_outcome(&outcome, now);
        true
    }

    /// Record the outcome of push `seq`.
    pub fn finish(&mut self, seq: u64, outcome: Result<String, PanelError>) -> bool {
        self.finish_at(seq, outcome, Instant::now())
    }

    /// Stage, send, and finish one update. Returns the push sequence number.
    pub fn apply<T: DeviceTransport + ?Sized>(
        &mut self,
        registry: &mut DeviceRegistry,
        transport: &T,
        address: &str,
        setting: LightSetting,
        fan: FanSpeed,
    ) -> Option<u64> {
        let push = self.stage(registry, address, setting, fan)?;
        let outcome = transport.control(&push.command);
        self.finish(push.seq, outcome);
        Some(push.seq)
    }

    /// Re-render every badge after a full reload.
    pub fn render_all(&mut self, registry: &DeviceRegistry) {
        self.badges = registry
            .iter()
            .map(|record| (record.address.clone(), DeviceBadge::render(record)))
            .collect();
    }

    /// The badge for a device.
    pub fn badge(&self, address: &str) -> Option<&DeviceBadge> {
        self.badges.get(address)
    }

    /// Show a message that is not tied to a control push.
    pub fn report(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.banner.show(kind, text, Instant::now());
    }

    /// The status banner.
    pub fn banner(&self) -> &StatusBanner {
        &self.banner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;
    use crate::values::{LightMode, RadialValue, RectValue};

    fn registry() -> DeviceRegistry {
        let mut registry = DeviceRegistry::new();
        registry.replace([DeviceRecord::new("AA", "Lamp")]);
        registry
    }

    #[test]
    fn test_apply_mutates_and_pushes() {
        let mut registry = registry();
        let mock = MockTransport::with_devices(registry.iter().cloned());
        let mut sync = ControlSync::new(Duration::from_secs(3));

        let value = RectValue::new(77, 12).unwrap();
        let seq = sync.apply(
            &mut registry,
            &mock,
            "AA",
            LightSetting::Main(value),
            FanSpeed::High,
        );
        assert_eq!(seq, Some(1));

        let record = registry.get("AA").unwrap();
        assert!(record.is_on);
        assert_eq!(record.main_value(), value);
        assert_eq!(record.fan_speed, FanSpeed::High);

        let badge = sync.badge("AA").unwrap();
        assert_eq!(badge.light, "main");
        assert_eq!(badge.fan, "High");

        let sent = mock.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].setting, LightSetting::Main(value));

        let message = sync.banner().visible().unwrap();
        assert_eq!(message.kind, StatusKind::Success);
        assert_eq!(message.text, "Status: OK");
    }

    #[test]
    fn test_off_keeps_stored_values() {
        let mut registry = registry();
        let mock = MockTransport::with_devices(registry.iter().cloned());
        let mut sync = ControlSync::new(Duration::from_secs(3));

        let ring = RadialValue::new(10, 20).unwrap();
        sync.apply(&mut registry, &mock, "AA", LightSetting::Rgb(ring), FanSpeed::Off);
        sync.apply(&mut registry, &mock, "AA", LightSetting::Off, FanSpeed::Low);

        let record = registry.get("AA").unwrap();
        assert!(!record.is_on);
        assert_eq!(record.ring_value(), ring);
        assert_eq!(sync.badge("AA").unwrap().light, "off");
        assert_eq!(sync.badge("AA").unwrap().fan, "Low");
    }

    #[test]
    fn test_unknown_device_is_ignored() {
        let mut registry = registry();
        let mock = MockTransport::new();
        let mut sync = ControlSync::new(Duration::from_secs(3));

        let seq = sync.apply(&mut registry, &mock, "ZZ", LightSetting::Off, FanSpeed::Off);
        assert_eq!(seq, None);
        assert!(mock.sent().is_empty());
        assert!(sync.banner().visible().is_none());
    }

    #[test]
    fn test_failure_keeps_optimistic_state() {
        let mut registry = registry();
        let mock = MockTransport::with_devices(registry.iter().cloned());
        mock.set_failure(Some(500));
        let mut sync = ControlSync::new(Duration::from_secs(3));

        let value = RadialValue::new(60, 200).unwrap();
        sync.apply(&mut registry, &mock, "AA", LightSetting::Rgb(value), FanSpeed::Off);

        assert_eq!(registry.get("AA").unwrap().light_mode, LightMode::Rgb);
        let message = sync.banner().visible().unwrap();
        assert_eq!(message.kind, StatusKind::Error);
        assert_eq!(message.text, "Error: 500 Mock Failure");
    }

    #[test]
    fn test_stale_responses_are_dropped() {
        let mut registry = registry();
        let mut sync = ControlSync::new(Duration::from_secs(3));
        let now = Instant::now();

        let first = sync
            .stage(&mut registry, "AA", LightSetting::Off, FanSpeed::Off)
            .unwrap();
        let second = sync
            .stage(&mut registry, "AA", LightSetting::Off, FanSpeed::Low)
            .unwrap();
        assert!(second.seq > first.seq);

        assert!(sync.finish_at(second.seq, Ok("second".into()), now));
        assert!(!sync.finish_at(first.seq, Ok("first".into()), now));
        assert_eq!(sync.banner().visible_at(now).unwrap().text, "Status: second");
    }

    #[test]
    fn test_banner_expires() {
        let mut banner = StatusBanner::new(Duration::from_secs(3));
        let now = Instant::now();
        banner.show(StatusKind::Success, "hi", now);
        assert!(banner.visible_at(now + Duration::from_secs(2)).is_some());
        assert!(banner.visible_at(now + Duration::from_secs(3)).is_none());
    }
}
