//! The per-zone tag handler registry.

use std::collections::HashMap;
use std::sync::Arc;

use cordon_core::{AgentId, TagDescriptor};
use cordon_zone::Zone;
use indexmap::IndexMap;
use smallvec::SmallVec;
use tracing::warn;

use crate::handler::{TagFactory, TagHandler};

/// Handler slots for one installed zone.
///
/// `slots` runs parallel to the zone's tag list; a `None` slot is a
/// tag whose handler was never built, failed, or is mid hot-swap.
struct ZoneSlots {
    zone: Arc<Zone>,
    slots: SmallVec<[Option<Box<dyn TagHandler>>; 4]>,
}

/// Owns every live tag handler and routes notifications to them.
///
/// Factories are registered by tag name; zones are installed with
/// their parsed tag lists, and the registry builds one handler per
/// matching tag. Zone keys and tag names are compared ignoring ASCII
/// case throughout.
///
/// Re-registering a factory under an existing name hot-swaps it:
/// every live handler for that tag is dropped first, across all
/// installed zones, and only then are replacements built from the
/// new factory. The two passes keep old and new handler instances
/// from coexisting, which matters for handlers whose teardown
/// releases a shared resource their successor re-acquires.
#[derive(Default)]
pub struct TagRegistry {
    factories: HashMap<String, Box<dyn TagFactory>>,
    installed: IndexMap<String, ZoneSlots>,
}

impl TagRegistry {
    /// An empty registry with no factories and no zones.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or hot-swap the factory for its tag name.
    pub fn register_factory(&mut self, factory: Box<dyn TagFactory>) {
        let key = factory.tag_name().to_ascii_lowercase();

        // Dispose pass: drop every live handler for this tag before
        // the new factory builds any replacement.
        for entry in self.installed.values_mut() {
            for (idx, tag) in entry.zone.tags().iter().enumerate() {
                if tag.name.eq_ignore_ascii_case(&key) {
                    entry.slots[idx] = None;
                }
            }
        }

        self.factories.insert(key.clone(), factory);

        // Rebuild pass.
        let factory = match self.factories.get(&key) {
            Some(f) => f.as_ref(),
            None => return,
        };
        for entry in self.installed.values_mut() {
            for (idx, tag) in entry.zone.tags().iter().enumerate() {
                if tag.name.eq_ignore_ascii_case(&key) {
                    entry.slots[idx] = build_slot(factory, &entry.zone, tag);
                }
            }
        }
    }

    /// Whether a factory is registered for `tag_name`.
    pub fn has_factory(&self, tag_name: &str) -> bool {
        self.factories.contains_key(&tag_name.to_ascii_lowercase())
    }

    /// Install a zone, building handlers for each of its tags.
    ///
    /// Tags with no registered factory get an empty slot and a
    /// warning. Installing a zone whose key is already present
    /// replaces the old entry, dropping its handlers.
    pub fn install_zone(&mut self, zone: Arc<Zone>) {
        let mut slots = SmallVec::with_capacity(zone.tags().len());
        for tag in zone.tags() {
            match self.factories.get(&tag.name.to_ascii_lowercase()) {
                Some(factory) => slots.push(build_slot(factory.as_ref(), &zone, tag)),
                None => {
                    warn!(zone = %zone.name(), tag = %tag.name, "no factory for tag");
                    slots.push(None);
                }
            }
        }
        self.installed.insert(zone.key(), ZoneSlots { zone, slots });
    }

    /// Uninstall a zone by name, dropping its handlers.
    ///
    /// Returns whether the zone was installed.
    pub fn remove_zone(&mut self, name: &str) -> bool {
        self.installed
            .shift_remove(&name.to_ascii_lowercase())
            .is_some()
    }

    /// Uninstall every zone. Factories stay registered.
    pub fn clear(&mut self) {
        self.installed.clear();
    }

    /// Count of live handlers for a zone, zero when not installed.
    pub fn live_handlers(&self, name: &str) -> usize {
        self.installed
            .get(&name.to_ascii_lowercase())
            .map(|entry| entry.slots.iter().filter(|s| s.is_some()).count())
            .unwrap_or(0)
    }

    /// Installed zones, in installation order.
    pub fn zones(&self) -> impl Iterator<Item = &Arc<Zone>> {
        self.installed.values().map(|entry| &entry.zone)
    }

    /// Notify every live handler on the zone that an agent entered.
    pub fn notify_enter(&mut self, agent: AgentId, zone_name: &str) {
        if let Some(entry) = self.installed.get_mut(&zone_name.to_ascii_lowercase()) {
            for slot in entry.slots.iter_mut() {
                if let Some(handler) = slot {
                    handler.on_enter(agent, &entry.zone);
                }
            }
        }
    }

    /// Notify every live handler on the zone that an agent left.
    pub fn notify_exit(&mut self, agent: AgentId, zone_name: &str) {
        if let Some(entry) = self.installed.get_mut(&zone_name.to_ascii_lowercase()) {
            for slot in entry.slots.iter_mut() {
                if let Some(handler) = slot {
                    handler.on_exit(agent, &entry.zone);
                }
            }
        }
    }
}

fn build_slot(
    factory: &dyn TagFactory,
    zone: &Arc<Zone>,
    tag: &TagDescriptor,
) -> Option<Box<dyn TagHandler>> {
    match factory.create(zone, tag) {
        Ok(mut handler) => {
            if handler.init() {
                Some(handler)
            } else {
                warn!(zone = %zone.name(), tag = %tag.name, "tag handler declined to initialize");
                None
            }
        }
        Err(error) => {
            warn!(zone = %zone.name(), tag = %tag.name, %error, "tag handler construction failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use cordon_zone::{ZoneBuilder, ZoneRecord};

    use crate::handler::BuildError;

    type Log = Arc<Mutex<Vec<String>>>;

    struct RecordingHandler {
        label: String,
        log: Log,
        init_ok: bool,
    }

    impl TagHandler for RecordingHandler {
        fn name(&self) -> &str {
            "rec"
        }

        fn init(&mut self) -> bool {
            self.log.lock().unwrap().push(format!("init:{}", self.label));
            self.init_ok
        }

        fn on_enter(&mut self, agent: AgentId, zone: &Zone) {
            self.log
                .lock()
                .unwrap()
                .push(format!("enter:{}:{agent}:{}", self.label, zone.name()));
        }

        fn on_exit(&mut self, agent: AgentId, zone: &Zone) {
            self.log
                .lock()
                .unwrap()
                .push(format!("exit:{}:{agent}:{}", self.label, zone.name()));
        }
    }

    impl Drop for RecordingHandler {
        fn drop(&mut self) {
            self.log.lock().unwrap().push(format!("drop:{}", self.label));
        }
    }

    struct RecordingFactory {
        generation: &'static str,
        log: Log,
        init_ok: bool,
    }

    impl TagFactory for RecordingFactory {
        fn tag_name(&self) -> &str {
            "rec"
        }

        fn create(
            &self,
            zone: &Arc<Zone>,
            _tag: &TagDescriptor,
        ) -> Result<Box<dyn TagHandler>, BuildError> {
            Ok(Box::new(RecordingHandler {
                label: format!("{}:{}", self.generation, zone.name()),
                log: self.log.clone(),
                init_ok: self.init_ok,
            }))
        }
    }

    struct FailingFactory;

    impl TagFactory for FailingFactory {
        fn tag_name(&self) -> &str {
            "rec"
        }

        fn create(
            &self,
            _zone: &Arc<Zone>,
            _tag: &TagDescriptor,
        ) -> Result<Box<dyn TagHandler>, BuildError> {
            Err(BuildError::new("always fails"))
        }
    }

    fn zone(name: &str, tags: &[&str]) -> Arc<Zone> {
        let mut b = ZoneBuilder::new(name).position(0.0, 0.0).circle(10.0);
        for t in tags {
            b = b.tag(*t);
        }
        let rec: ZoneRecord = b.finish().unwrap();
        Arc::new(Zone::from_record(&rec, None).unwrap())
    }

    fn drain(log: &Log) -> Vec<String> {
        std::mem::take(&mut *log.lock().unwrap())
    }

    #[test]
    fn install_builds_one_handler_per_matching_tag() {
        let log: Log = Arc::default();
        let mut reg = TagRegistry::new();
        reg.register_factory(Box::new(RecordingFactory {
            generation: "v1",
            log: log.clone(),
            init_ok: true,
        }));
        reg.install_zone(zone("Depot", &["#rec", "#rec", "#unknown"]));
        assert_eq!(reg.live_handlers("depot"), 2);
        assert_eq!(
            drain(&log),
            vec!["init:v1:Depot".to_string(), "init:v1:Depot".to_string()]
        );
    }

    #[test]
    fn failed_init_leaves_an_empty_slot() {
        let log: Log = Arc::default();
        let mut reg = TagRegistry::new();
        reg.register_factory(Box::new(RecordingFactory {
            generation: "v1",
            log: log.clone(),
            init_ok: false,
        }));
        reg.install_zone(zone("Depot", &["#rec"]));
        assert_eq!(reg.live_handlers("Depot"), 0);
        // The declined handler is dropped immediately.
        assert_eq!(
            drain(&log),
            vec!["init:v1:Depot".to_string(), "drop:v1:Depot".to_string()]
        );
    }

    #[test]
    fn failed_construction_leaves_an_empty_slot() {
        let mut reg = TagRegistry::new();
        reg.register_factory(Box::new(FailingFactory));
        reg.install_zone(zone("Depot", &["#rec"]));
        assert_eq!(reg.live_handlers("Depot"), 0);
    }

    #[test]
    fn notifications_reach_live_handlers() {
        let log: Log = Arc::default();
        let mut reg = TagRegistry::new();
        reg.register_factory(Box::new(RecordingFactory {
            generation: "v1",
            log: log.clone(),
            init_ok: true,
        }));
        reg.install_zone(zone("Depot", &["#rec"]));
        drain(&log);

        reg.notify_enter(AgentId(7), "DEPOT");
        reg.notify_exit(AgentId(7), "depot");
        assert_eq!(
            drain(&log),
            vec![
                "enter:v1:Depot:7:Depot".to_string(),
                "exit:v1:Depot:7:Depot".to_string()
            ]
        );
    }

    #[test]
    fn hot_swap_disposes_everything_before_rebuilding() {
        let log: Log = Arc::default();
        let mut reg = TagRegistry::new();
        reg.register_factory(Box::new(RecordingFactory {
            generation: "v1",
            log: log.clone(),
            init_ok: true,
        }));
        reg.install_zone(zone("Alpha", &["#rec"]));
        reg.install_zone(zone("Bravo", &["#rec"]));
        drain(&log);

        reg.register_factory(Box::new(RecordingFactory {
            generation: "v2",
            log: log.clone(),
            init_ok: true,
        }));
        assert_eq!(
            drain(&log),
            vec![
                "drop:v1:Alpha".to_string(),
                "drop:v1:Bravo".to_string(),
                "init:v2:Alpha".to_string(),
                "init:v2:Bravo".to_string(),
            ]
        );
        assert_eq!(reg.live_handlers("alpha"), 1);
        assert_eq!(reg.live_handlers("bravo"), 1);
    }

    #[test]
    fn remove_zone_drops_its_handlers() {
        let log: Log = Arc::default();
        let mut reg = TagRegistry::new();
        reg.register_factory(Box::new(RecordingFactory {
            generation: "v1",
            log: log.clone(),
            init_ok: true,
        }));
        reg.install_zone(zone("Depot", &["#rec"]));
        drain(&log);

        assert!(reg.remove_zone("DEPOT"));
        assert!(!reg.remove_zone("depot"));
        assert_eq!(drain(&log), vec!["drop:v1:Depot".to_string()]);
    }

    #[test]
    fn registry_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<TagRegistry>();
    }
}
