//! The membership tracking engine.

use std::sync::Arc;
use std::time::Instant;

use cordon_core::{AgentId, Vec3};
use cordon_tag::TagRegistry;
use cordon_zone::{build_zone_set, MapTransform, RejectedRecord, Zone, ZoneProvider};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::config::{ConfigError, TrackerConfig};
use crate::error::ReloadError;
use crate::events::ZoneEvent;
use crate::metrics::PollMetrics;
use crate::set::ZoneSet;
use crate::source::PositionSource;

/// Per-agent tracking state.
///
/// `zones` is keyed by lowercased zone name in enter order; values
/// are the zone objects from the set that was current when the agent
/// entered, re-pointed on reload.
struct Membership {
    zones: IndexMap<String, Arc<Zone>>,
    last_poll: Option<Instant>,
    last_position: Option<Vec3>,
}

impl Membership {
    fn new() -> Self {
        Self {
            zones: IndexMap::new(),
            last_poll: None,
            last_position: None,
        }
    }
}

/// Outcome of a successful reload.
#[derive(Debug)]
pub struct ReloadReport {
    /// Zones in the new set.
    pub loaded: usize,
    /// Records the provider delivered that failed assembly.
    pub rejected: Vec<RejectedRecord>,
    /// Memberships dropped because their zone vanished from the set.
    pub pruned_memberships: usize,
}

/// Tracks which agents are inside which zones.
///
/// The engine is single-threaded by design: the host calls
/// [`ZoneEngine::poll`] from its own tick loop and every transition
/// is resolved synchronously within that call. Tag handlers run
/// inline; the host listens on the event channel from wherever it
/// likes.
///
/// Within one poll of one agent, exits fire while the zone scan runs
/// and enters are queued until the scan completes, so a teleporting
/// agent always leaves its old zones before entering any new one.
pub struct ZoneEngine {
    config: TrackerConfig,
    zones: Arc<ZoneSet>,
    registry: TagRegistry,
    transform: Option<MapTransform>,
    members: IndexMap<AgentId, Membership>,
    events_tx: Sender<ZoneEvent>,
    events_rx: Option<Receiver<ZoneEvent>>,
    reload_in_progress: bool,
    metrics: PollMetrics,
}

impl ZoneEngine {
    /// Build an engine with an empty zone set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the configuration is unusable.
    pub fn new(config: TrackerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let (events_tx, events_rx) = bounded(config.event_capacity);
        Ok(Self {
            config,
            zones: Arc::new(ZoneSet::empty()),
            registry: TagRegistry::new(),
            transform: None,
            members: IndexMap::new(),
            events_tx,
            events_rx: Some(events_rx),
            reload_in_progress: false,
            metrics: PollMetrics::default(),
        })
    }

    /// Take the host event receiver.
    ///
    /// Yields `Some` exactly once. A host that never takes it loses
    /// nothing but the events; once the channel fills, further events
    /// are counted in [`PollMetrics::events_dropped`] and discarded.
    pub fn take_events(&mut self) -> Option<Receiver<ZoneEvent>> {
        self.events_rx.take()
    }

    /// Set or clear the map transform used by subsequent reloads.
    pub fn set_map_transform(&mut self, transform: Option<MapTransform>) {
        self.transform = transform;
    }

    /// The transform applied to map-coordinate records on reload.
    pub fn map_transform(&self) -> Option<MapTransform> {
        self.transform
    }

    /// The current zone set.
    pub fn zones(&self) -> &Arc<ZoneSet> {
        &self.zones
    }

    /// The tag registry, for registering factories.
    pub fn registry_mut(&mut self) -> &mut TagRegistry {
        &mut self.registry
    }

    /// Counters since the last reset.
    pub fn metrics(&self) -> &PollMetrics {
        &self.metrics
    }

    /// Zero the counters.
    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }

    /// Start tracking an agent. Idempotent.
    pub fn connect(&mut self, agent: AgentId) {
        self.members.entry(agent).or_insert_with(Membership::new);
    }

    /// Whether an agent is being tracked.
    pub fn is_connected(&self, agent: AgentId) -> bool {
        self.members.contains_key(&agent)
    }

    /// Number of tracked agents.
    pub fn agent_count(&self) -> usize {
        self.members.len()
    }

    /// Stop tracking an agent, firing exits for every zone it was
    /// inside, in the order they were entered.
    pub fn disconnect(&mut self, agent: AgentId) {
        let Some(record) = self.members.shift_remove(&agent) else {
            return;
        };
        for (_, zone) in record.zones {
            self.metrics.exits += 1;
            self.registry.notify_exit(agent, zone.name());
            self.emit(ZoneEvent::Exit { agent, zone });
        }
    }

    /// Whether the agent is currently inside the named zone.
    pub fn is_inside_zone(&self, agent: AgentId, zone_name: &str) -> bool {
        self.members
            .get(&agent)
            .is_some_and(|r| r.zones.contains_key(&zone_name.to_ascii_lowercase()))
    }

    /// Display names of the zones the agent is inside, in enter
    /// order.
    pub fn zone_names(&self, agent: AgentId) -> Vec<String> {
        self.members
            .get(&agent)
            .map(|r| r.zones.values().map(|z| z.name().to_string()).collect())
            .unwrap_or_default()
    }

    /// Evaluate every tracked agent against the current zone set.
    ///
    /// Agents polled more recently than the configured interval are
    /// skipped, as are agents whose position is unchanged or
    /// unavailable. Transitions notify tag handlers synchronously
    /// and push an event for the host.
    pub fn poll(&mut self, source: &dyn PositionSource, now: Instant) {
        self.metrics.passes += 1;
        let agents: Vec<AgentId> = self.members.keys().copied().collect();
        for agent in agents {
            self.poll_agent(source, now, agent);
        }
    }

    fn poll_agent(&mut self, source: &dyn PositionSource, now: Instant, agent: AgentId) {
        {
            let Some(record) = self.members.get_mut(&agent) else {
                return;
            };
            if let Some(last) = record.last_poll {
                if now.duration_since(last).as_secs_f64() < self.config.poll_interval_secs {
                    self.metrics.throttled += 1;
                    return;
                }
            }
            record.last_poll = Some(now);
        }

        let Some(pos) = source.position(agent) else {
            self.metrics.missing_position += 1;
            return;
        };
        if let Some(record) = self.members.get(&agent) {
            if record.last_position == Some(pos) {
                self.metrics.unchanged += 1;
                return;
            }
        }

        // Exit pass, resolved inline.
        let mut exited: Vec<Arc<Zone>> = Vec::new();
        if let Some(record) = self.members.get_mut(&agent) {
            record.zones.retain(|_, zone| {
                if zone.contains(pos) {
                    true
                } else {
                    exited.push(Arc::clone(zone));
                    false
                }
            });
        }
        for zone in &exited {
            self.metrics.exits += 1;
            self.registry.notify_exit(agent, zone.name());
            self.emit(ZoneEvent::Exit {
                agent,
                zone: Arc::clone(zone),
            });
        }

        // Enter pass, queued until the scan is complete.
        let set = Arc::clone(&self.zones);
        let ground = pos.ground();
        let mut entered: Vec<Arc<Zone>> = Vec::new();
        {
            let record = self.members.get(&agent);
            for zone in set.iter() {
                if record.is_some_and(|r| r.zones.contains_key(&zone.key())) {
                    continue;
                }
                if !zone.bounds().contains(ground) {
                    self.metrics.bounds_rejects += 1;
                    continue;
                }
                self.metrics.exact_tests += 1;
                if zone.contains(pos) {
                    entered.push(Arc::clone(zone));
                }
            }
        }
        for zone in entered {
            if let Some(record) = self.members.get_mut(&agent) {
                record.zones.insert(zone.key(), Arc::clone(&zone));
            }
            self.metrics.enters += 1;
            self.registry.notify_enter(agent, zone.name());
            self.emit(ZoneEvent::Enter { agent, zone });
        }

        if let Some(record) = self.members.get_mut(&agent) {
            record.last_position = Some(pos);
        }
    }

    /// Replace the zone set from the provider.
    ///
    /// Rejected records never abort the reload; they come back in the
    /// report. Agents inside a zone that survived keep their
    /// membership; agents inside a zone that vanished get a host
    /// exit event. Handlers for vanished zones were already torn
    /// down, so no handler notification accompanies those exits.
    ///
    /// # Errors
    ///
    /// [`ReloadError::InProgress`] when called reentrantly (a
    /// provider that pumps the engine while loading), or
    /// [`ReloadError::Provider`] when the provider fails.
    pub fn reload(&mut self, provider: &mut dyn ZoneProvider) -> Result<ReloadReport, ReloadError> {
        if self.reload_in_progress {
            return Err(ReloadError::InProgress);
        }
        self.reload_in_progress = true;
        let result = self.reload_inner(provider);
        self.reload_in_progress = false;
        result
    }

    fn reload_inner(
        &mut self,
        provider: &mut dyn ZoneProvider,
    ) -> Result<ReloadReport, ReloadError> {
        let records = provider.load()?;
        let build = build_zone_set(&records, self.transform.as_ref());
        let new_set = Arc::new(ZoneSet::from_zones(build.zones));

        self.zones = Arc::clone(&new_set);
        self.registry.clear();
        for zone in new_set.iter() {
            self.registry.install_zone(Arc::clone(zone));
        }

        // Prune memberships for vanished zones; re-point survivors at
        // the new zone objects and force a fresh evaluation.
        let mut pruned = 0usize;
        let agents: Vec<AgentId> = self.members.keys().copied().collect();
        for agent in agents {
            let mut removed: Vec<Arc<Zone>> = Vec::new();
            if let Some(record) = self.members.get_mut(&agent) {
                let old = std::mem::take(&mut record.zones);
                for (key, zone) in old {
                    match new_set.get(&key) {
                        Some(current) => {
                            record.zones.insert(key, Arc::clone(current));
                        }
                        None => removed.push(zone),
                    }
                }
                record.last_position = None;
            }
            for zone in removed {
                pruned += 1;
                self.metrics.exits += 1;
                self.emit(ZoneEvent::Exit { agent, zone });
            }
        }

        debug!(
            zones = new_set.len(),
            rejected = build.rejected.len(),
            pruned,
            "zone set reloaded"
        );
        Ok(ReloadReport {
            loaded: new_set.len(),
            rejected: build.rejected,
            pruned_memberships: pruned,
        })
    }

    fn emit(&mut self, event: ZoneEvent) {
        match self.events_tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                self.metrics.events_dropped += 1;
                warn!(
                    agent = %event.agent(),
                    zone = %event.zone().name(),
                    "event channel full, dropping event"
                );
            }
            Err(TrySendError::Disconnected(_)) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use cordon_zone::{ProviderError, ZoneBuilder, ZoneRecord};

    struct FixedProvider(Vec<ZoneRecord>);

    impl ZoneProvider for FixedProvider {
        fn load(&mut self) -> Result<Vec<ZoneRecord>, ProviderError> {
            Ok(self.0.clone())
        }

        fn save(&mut self, _records: &[ZoneRecord]) -> Result<(), ProviderError> {
            Ok(())
        }
    }

    struct BrokenProvider;

    impl ZoneProvider for BrokenProvider {
        fn load(&mut self) -> Result<Vec<ZoneRecord>, ProviderError> {
            Err(ProviderError::new("disk on fire"))
        }

        fn save(&mut self, _records: &[ZoneRecord]) -> Result<(), ProviderError> {
            Ok(())
        }
    }

    fn circle(name: &str, x: f32, z: f32, radius: f32) -> ZoneRecord {
        ZoneBuilder::new(name)
            .position(x, z)
            .circle(radius)
            .finish()
            .unwrap()
    }

    fn engine_with(records: Vec<ZoneRecord>) -> (ZoneEngine, Receiver<ZoneEvent>) {
        let mut engine = ZoneEngine::new(TrackerConfig::default()).unwrap();
        let events = engine.take_events().unwrap();
        engine.reload(&mut FixedProvider(records)).unwrap();
        (engine, events)
    }

    fn drain(rx: &Receiver<ZoneEvent>) -> Vec<(bool, String, AgentId)> {
        rx.try_iter()
            .map(|e| (e.is_enter(), e.zone().name().to_string(), e.agent()))
            .collect()
    }

    #[test]
    fn bad_config_is_rejected() {
        let config = TrackerConfig {
            event_capacity: 0,
            ..Default::default()
        };
        assert!(ZoneEngine::new(config).is_err());
    }

    #[test]
    fn movement_produces_enter_then_exit() {
        let (mut engine, events) = engine_with(vec![circle("Depot", 0.0, 0.0, 10.0)]);
        let agent = AgentId(1);
        engine.connect(agent);

        let t0 = Instant::now();
        engine.poll(&|_: AgentId| Some(Vec3::new(0.0, 0.0, 0.0)), t0);
        assert!(engine.is_inside_zone(agent, "depot"));
        assert_eq!(
            drain(&events),
            vec![(true, "Depot".to_string(), agent)]
        );

        let t1 = t0 + Duration::from_millis(300);
        engine.poll(&|_: AgentId| Some(Vec3::new(50.0, 0.0, 0.0)), t1);
        assert!(!engine.is_inside_zone(agent, "depot"));
        assert_eq!(
            drain(&events),
            vec![(false, "Depot".to_string(), agent)]
        );
    }

    #[test]
    fn polls_within_the_interval_are_throttled() {
        let (mut engine, events) = engine_with(vec![circle("Depot", 0.0, 0.0, 10.0)]);
        let agent = AgentId(1);
        engine.connect(agent);

        let t0 = Instant::now();
        engine.poll(&|_: AgentId| Some(Vec3::new(0.0, 0.0, 0.0)), t0);
        drain(&events);

        // 100ms later the agent has left, but the interval has not
        // elapsed, so the engine must not notice yet.
        let t1 = t0 + Duration::from_millis(100);
        engine.poll(&|_: AgentId| Some(Vec3::new(50.0, 0.0, 0.0)), t1);
        assert!(engine.is_inside_zone(agent, "depot"));
        assert_eq!(engine.metrics().throttled, 1);
        assert!(drain(&events).is_empty());

        let t2 = t0 + Duration::from_millis(300);
        engine.poll(&|_: AgentId| Some(Vec3::new(50.0, 0.0, 0.0)), t2);
        assert!(!engine.is_inside_zone(agent, "depot"));
    }

    #[test]
    fn unchanged_positions_are_skipped() {
        let (mut engine, _events) = engine_with(vec![circle("Depot", 0.0, 0.0, 10.0)]);
        let agent = AgentId(1);
        engine.connect(agent);

        let t0 = Instant::now();
        engine.poll(&|_: AgentId| Some(Vec3::new(0.0, 0.0, 0.0)), t0);
        let t1 = t0 + Duration::from_millis(300);
        engine.poll(&|_: AgentId| Some(Vec3::new(0.0, 0.0, 0.0)), t1);
        assert_eq!(engine.metrics().unchanged, 1);
        assert_eq!(engine.metrics().enters, 1);
    }

    #[test]
    fn missing_position_keeps_membership() {
        let (mut engine, events) = engine_with(vec![circle("Depot", 0.0, 0.0, 10.0)]);
        let agent = AgentId(1);
        engine.connect(agent);

        let t0 = Instant::now();
        engine.poll(&|_: AgentId| Some(Vec3::new(0.0, 0.0, 0.0)), t0);
        drain(&events);

        let t1 = t0 + Duration::from_millis(300);
        engine.poll(&|_: AgentId| None, t1);
        assert!(engine.is_inside_zone(agent, "depot"));
        assert_eq!(engine.metrics().missing_position, 1);
        assert!(drain(&events).is_empty());
    }

    #[test]
    fn teleport_exits_before_entering() {
        let (mut engine, events) = engine_with(vec![
            circle("West", 0.0, 0.0, 10.0),
            circle("East", 1000.0, 0.0, 10.0),
        ]);
        let agent = AgentId(1);
        engine.connect(agent);

        let t0 = Instant::now();
        engine.poll(&|_: AgentId| Some(Vec3::new(0.0, 0.0, 0.0)), t0);
        drain(&events);

        let t1 = t0 + Duration::from_millis(300);
        engine.poll(&|_: AgentId| Some(Vec3::new(1000.0, 0.0, 0.0)), t1);
        assert_eq!(
            drain(&events),
            vec![
                (false, "West".to_string(), agent),
                (true, "East".to_string(), agent),
            ]
        );
    }

    #[test]
    fn disconnect_exits_in_enter_order() {
        let (mut engine, events) = engine_with(vec![
            circle("Outer", 0.0, 0.0, 100.0),
            circle("Inner", 0.0, 0.0, 10.0),
        ]);
        let agent = AgentId(1);
        engine.connect(agent);
        engine.poll(&|_: AgentId| Some(Vec3::new(0.0, 0.0, 0.0)), Instant::now());
        drain(&events);

        engine.disconnect(agent);
        assert!(!engine.is_connected(agent));
        assert_eq!(
            drain(&events),
            vec![
                (false, "Outer".to_string(), agent),
                (false, "Inner".to_string(), agent),
            ]
        );
    }

    #[test]
    fn overlapping_zones_report_enter_order() {
        let (mut engine, _events) = engine_with(vec![
            circle("Outer", 0.0, 0.0, 100.0),
            circle("Inner", 0.0, 0.0, 10.0),
        ]);
        let agent = AgentId(1);
        engine.connect(agent);
        engine.poll(&|_: AgentId| Some(Vec3::new(0.0, 0.0, 0.0)), Instant::now());
        assert_eq!(engine.zone_names(agent), vec!["Outer", "Inner"]);
    }

    #[test]
    fn provider_failure_leaves_the_old_set() {
        let (mut engine, _events) = engine_with(vec![circle("Depot", 0.0, 0.0, 10.0)]);
        match engine.reload(&mut BrokenProvider) {
            Err(ReloadError::Provider(e)) => assert!(e.reason.contains("disk")),
            other => panic!("expected Provider error, got {other:?}"),
        }
        assert_eq!(engine.zones().len(), 1);
    }

    #[test]
    fn reload_prunes_vanished_zones() {
        let (mut engine, events) = engine_with(vec![
            circle("Keep", 0.0, 0.0, 10.0),
            circle("Drop", 1000.0, 0.0, 10.0),
        ]);
        let agent = AgentId(1);
        engine.connect(agent);
        // Stand where both zones overlap is impossible here; park the
        // agent in Keep, then force membership of Drop via a second
        // agent standing in it.
        let bystander = AgentId(2);
        engine.connect(bystander);
        engine.poll(
            &|a: AgentId| {
                if a == agent {
                    Some(Vec3::new(0.0, 0.0, 0.0))
                } else {
                    Some(Vec3::new(1000.0, 0.0, 0.0))
                }
            },
            Instant::now(),
        );
        drain(&events);

        let report = engine
            .reload(&mut FixedProvider(vec![circle("Keep", 0.0, 0.0, 10.0)]))
            .unwrap();
        assert_eq!(report.loaded, 1);
        assert_eq!(report.pruned_memberships, 1);
        assert!(engine.is_inside_zone(agent, "keep"));
        assert!(!engine.is_inside_zone(bystander, "drop"));
        assert_eq!(
            drain(&events),
            vec![(false, "Drop".to_string(), bystander)]
        );
    }

    #[test]
    fn reload_rejects_are_reported_not_fatal() {
        let (mut engine, _events) = engine_with(vec![circle("Depot", 0.0, 0.0, 10.0)]);
        let mut records = vec![circle("Good", 0.0, 0.0, 10.0)];
        records.push(ZoneRecord {
            shape: cordon_zone::ShapeRecord::Circle { radius: -1.0 },
            ..circle("Bad", 0.0, 0.0, 1.0)
        });
        let report = engine.reload(&mut FixedProvider(records)).unwrap();
        assert_eq!(report.loaded, 1);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].name, "Bad");
    }

    #[test]
    fn full_event_channel_drops_and_counts() {
        let config = TrackerConfig {
            event_capacity: 1,
            ..Default::default()
        };
        let mut engine = ZoneEngine::new(config).unwrap();
        engine
            .reload(&mut FixedProvider(vec![
                circle("A", 0.0, 0.0, 10.0),
                circle("B", 0.0, 0.0, 20.0),
            ]))
            .unwrap();
        let agent = AgentId(1);
        engine.connect(agent);
        engine.poll(&|_: AgentId| Some(Vec3::new(0.0, 0.0, 0.0)), Instant::now());
        assert_eq!(engine.metrics().enters, 2);
        assert_eq!(engine.metrics().events_dropped, 1);
    }
}
