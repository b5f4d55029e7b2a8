//! Record sources and zone-set assembly.
//!
//! A [`ZoneProvider`] is wherever authored records live: a file, a
//! database, an in-memory fixture. The tracker never talks to storage
//! directly; it asks the provider for records and runs them through
//! [`build_zone_set`], which isolates per-record failures so one bad
//! zone never takes down a reload.

use std::collections::HashSet;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

use tracing::warn;

use crate::error::ZoneDefinitionError;
use crate::record::ZoneRecord;
use crate::transform::MapTransform;
use crate::zone::Zone;

/// A source of authored zone records.
///
/// # Contract
///
/// - `load` returns every record the source currently holds, in
///   storage order. Order is preserved through assembly.
/// - `save` replaces the source's contents with the given records.
/// - Neither call validates records; validation happens during
///   assembly.
pub trait ZoneProvider {
    /// Read all records from the source.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when the source cannot be read.
    fn load(&mut self) -> Result<Vec<ZoneRecord>, ProviderError>;

    /// Replace the source's contents.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when the source cannot be written.
    fn save(&mut self, records: &[ZoneRecord]) -> Result<(), ProviderError>;
}

/// A provider could not read or write its backing store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    /// Human-readable failure description.
    pub reason: String,
}

impl ProviderError {
    /// Build an error from any displayable reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "zone provider failed: {}", self.reason)
    }
}

impl Error for ProviderError {}

/// One record that failed assembly, with its error.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRecord {
    /// Name of the failing record, as authored.
    pub name: String,
    /// Why it failed.
    pub error: ZoneDefinitionError,
}

/// Outcome of assembling records into runtime zones.
#[derive(Debug)]
pub struct ZoneSetBuild {
    /// Successfully built zones, in record order.
    pub zones: Vec<Arc<Zone>>,
    /// Records that failed, in record order.
    pub rejected: Vec<RejectedRecord>,
}

/// Build runtime zones from authored records.
///
/// Each record is validated and converted independently; a failure is
/// reported in [`ZoneSetBuild::rejected`] and logged, and the rest of
/// the set is unaffected. Names must be unique ignoring ASCII case;
/// when two records collide the earlier one wins and the later one is
/// rejected with [`ZoneDefinitionError::DuplicateName`].
pub fn build_zone_set(records: &[ZoneRecord], transform: Option<&MapTransform>) -> ZoneSetBuild {
    let mut zones = Vec::with_capacity(records.len());
    let mut rejected = Vec::new();
    let mut seen: HashSet<String> = HashSet::with_capacity(records.len());

    for record in records {
        let key = record.name.to_ascii_lowercase();
        if !key.is_empty() && seen.contains(&key) {
            warn!(zone = %record.name, "rejecting duplicate zone name");
            rejected.push(RejectedRecord {
                name: record.name.clone(),
                error: ZoneDefinitionError::DuplicateName {
                    name: record.name.clone(),
                },
            });
            continue;
        }
        match Zone::from_record(record, transform) {
            Ok(zone) => {
                seen.insert(key);
                zones.push(Arc::new(zone));
            }
            Err(error) => {
                warn!(zone = %record.name, %error, "rejecting zone record");
                rejected.push(RejectedRecord {
                    name: record.name.clone(),
                    error,
                });
            }
        }
    }

    ZoneSetBuild { zones, rejected }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ZoneBuilder;

    fn circle(name: &str) -> ZoneRecord {
        ZoneBuilder::new(name)
            .position(0.0, 0.0)
            .circle(10.0)
            .finish()
            .unwrap()
    }

    #[test]
    fn one_bad_record_does_not_sink_the_set() {
        let bad = ZoneRecord {
            shape: crate::record::ShapeRecord::Circle { radius: -5.0 },
            ..circle("bad")
        };
        let records = vec![circle("alpha"), bad, circle("bravo")];
        let build = build_zone_set(&records, None);
        assert_eq!(build.zones.len(), 2);
        assert_eq!(build.rejected.len(), 1);
        assert_eq!(build.rejected[0].name, "bad");
        match &build.rejected[0].error {
            ZoneDefinitionError::InvalidRadius { value } => assert_eq!(*value, -5.0),
            other => panic!("expected InvalidRadius, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_names_keep_the_first_record() {
        let records = vec![circle("Depot"), circle("depot")];
        let build = build_zone_set(&records, None);
        assert_eq!(build.zones.len(), 1);
        assert_eq!(build.zones[0].name(), "Depot");
        match &build.rejected[0].error {
            ZoneDefinitionError::DuplicateName { name } => assert_eq!(name, "depot"),
            other => panic!("expected DuplicateName, got {other:?}"),
        }
    }

    #[test]
    fn record_order_is_preserved() {
        let records = vec![circle("c"), circle("a"), circle("b")];
        let build = build_zone_set(&records, None);
        let names: Vec<&str> = build.zones.iter().map(|z| z.name()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn map_records_fail_without_a_transform() {
        let rec = ZoneBuilder::new("mapped")
            .position(500.0, 500.0)
            .map_coordinates()
            .circle(10.0)
            .finish()
            .unwrap();
        let build = build_zone_set(&[rec], None);
        assert!(build.zones.is_empty());
        assert_eq!(
            build.rejected[0].error,
            ZoneDefinitionError::MapTransformUnavailable
        );
    }
}
