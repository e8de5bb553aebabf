// Copyright 2025 the Glimmer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyed join of a primary record set against attribute sets.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::DataError;
use crate::record::{JoinedEntity, Key, RawRecord};

/// What to do with a primary record that is missing an attribute match.
///
/// A record is unmatched when any attribute set lacks its key, or when no
/// matched source supplies a value.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinPolicy {
    /// Exclude the entity and log it.
    #[default]
    Drop,
    /// Keep the entity with `no_data` set and a NaN value.
    MarkNoData,
    /// Fail the whole join with [`DataError::Join`].
    Strict,
}

/// Join `primary` against every set in `attributes` by key.
///
/// Output order follows `primary`. Duplicate keys keep their first record.
/// Fields from later sets overwrite same-named fields from earlier ones, and
/// the value of the last matched set that carries one wins.
pub fn join(
    primary: Vec<RawRecord>,
    attributes: Vec<Vec<RawRecord>>,
    policy: JoinPolicy,
) -> Result<Vec<JoinedEntity>, DataError> {
    let lookups: Vec<HashMap<Key, RawRecord>> = attributes.into_iter().map(index_by_key).collect();

    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(primary.len());
    let mut dropped = 0_usize;
    for record in primary {
        if !seen.insert(record.key.clone()) {
            warn!(key = %record.key, "duplicate primary key; keeping the first record");
            continue;
        }
        let RawRecord {
            key,
            mut value,
            mut fields,
            mut geometry,
        } = record;
        let mut matched = true;
        for lookup in &lookups {
            match lookup.get(&key) {
                Some(attr) => {
                    fields.extend(attr.fields.iter().map(|(k, v)| (k.clone(), v.clone())));
                    value = attr.value.or(value);
                    if geometry.is_none() {
                        geometry = attr.geometry.clone();
                    }
                }
                None => matched = false,
            }
        }
        match (matched, value) {
            (true, Some(value)) => out.push(JoinedEntity {
                key,
                geometry,
                value,
                attributes: fields,
                no_data: false,
            }),
            _ => match policy {
                JoinPolicy::Drop => {
                    warn!(%key, "no attribute match; entity dropped");
                    dropped += 1;
                }
                JoinPolicy::MarkNoData => out.push(JoinedEntity {
                    key,
                    geometry,
                    value: f64::NAN,
                    attributes: fields,
                    no_data: true,
                }),
                JoinPolicy::Strict => return Err(DataError::Join { key }),
            },
        }
    }

    let orphans = lookups
        .iter()
        .flat_map(HashMap::keys)
        .filter(|k| !seen.contains(*k))
        .count();
    if orphans > 0 {
        debug!(orphans, "attribute records without a primary match ignored");
    }
    debug!(joined = out.len(), dropped, "join complete");
    Ok(out)
}

fn index_by_key(records: Vec<RawRecord>) -> HashMap<Key, RawRecord> {
    let mut map = HashMap::with_capacity(records.len());
    for record in records {
        if map.contains_key(&record.key) {
            warn!(key = %record.key, "duplicate attribute key; keeping the first record");
            continue;
        }
        map.insert(record.key.clone(), record);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{BezPath, Rect, Shape};

    fn geometry(ids: &[&str]) -> Vec<RawRecord> {
        ids.iter()
            .map(|id| {
                RawRecord::new(*id).with_geometry(Rect::new(0.0, 0.0, 1.0, 1.0).into_path(0.1))
            })
            .collect()
    }

    fn education(rows: &[(&str, f64)]) -> Vec<RawRecord> {
        rows.iter()
            .map(|(id, v)| {
                RawRecord::new(*id)
                    .with_value(*v)
                    .with_field("area_name", format!("County {id}").as_str())
            })
            .collect()
    }

    #[test]
    fn drop_policy_excludes_unmatched() {
        let out = join(
            geometry(&["a", "b", "c"]),
            vec![education(&[("a", 10.0), ("c", 30.0)])],
            JoinPolicy::Drop,
        )
        .unwrap();
        let keys: Vec<_> = out.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, ["a", "c"]);
        assert_eq!(out[1].value, 30.0);
        assert!(out[0].geometry.is_some());
        assert_eq!(out[0].text("area_name"), Some("County a"));
    }

    #[test]
    fn mark_policy_keeps_unmatched_with_flag() {
        let out = join(
            geometry(&["a", "b", "c"]),
            vec![education(&[("a", 10.0), ("c", 30.0)])],
            JoinPolicy::MarkNoData,
        )
        .unwrap();
        assert_eq!(out.len(), 3);
        assert!(out[1].no_data);
        assert!(out[1].value.is_nan());
        assert!(!out[0].no_data);
    }

    #[test]
    fn strict_policy_fails_on_first_unmatched() {
        let err = join(
            geometry(&["a", "b", "c"]),
            vec![education(&[("a", 10.0)])],
            JoinPolicy::Strict,
        )
        .unwrap_err();
        assert!(err.is_join());
        assert!(matches!(err, DataError::Join { key } if key.as_str() == "b"));
    }

    #[test]
    fn single_source_needs_a_value() {
        let primary = vec![RawRecord::new("x").with_value(1.0), RawRecord::new("y")];
        let out = join(primary, Vec::new(), JoinPolicy::Drop).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].key.as_str(), "x");
    }

    #[test]
    fn duplicates_keep_first() {
        let primary = vec![
            RawRecord::new("k").with_value(1.0),
            RawRecord::new("k").with_value(2.0),
        ];
        let attrs = vec![vec![
            RawRecord::new("k").with_field("n", "first"),
            RawRecord::new("k").with_field("n", "second"),
        ]];
        let out = join(primary, attrs, JoinPolicy::Drop).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].value, 1.0);
        assert_eq!(out[0].text("n"), Some("first"));
    }

    #[test]
    fn geometry_can_come_from_an_attribute_set() {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((1.0, 0.0));
        let primary = vec![RawRecord::new("k").with_value(3.0)];
        let attrs = vec![vec![RawRecord::new("k").with_geometry(path.clone())]];
        let out = join(primary, attrs, JoinPolicy::Drop).unwrap();
        assert_eq!(out[0].geometry, Some(path));
    }
}
