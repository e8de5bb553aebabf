// Copyright 2025 the Glimmer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! TopoJSON decoding into Kurbo paths.
//!
//! Only polygonal geometry is decoded; points and lines are skipped. Coordinates
//! are used as-is (identity projection), which suits pre-projected topologies
//! such as the US counties file.
//!
//! ```
//! use glimmer_data::topojson;
//! use serde_json::json;
//!
//! let topology = json!({
//!     "type": "Topology",
//!     "objects": {
//!         "shapes": {
//!             "type": "GeometryCollection",
//!             "geometries": [{ "type": "Polygon", "id": 7, "arcs": [[0]] }]
//!         }
//!     },
//!     "arcs": [[[0, 0], [10, 0], [10, 10], [0, 0]]]
//! });
//!
//! let features = topojson::features(&topology, "shapes").unwrap();
//! assert_eq!(features.len(), 1);
//! assert_eq!(features[0].id.as_ref().map(|k| k.as_str()), Some("7"));
//! ```

use std::collections::{BTreeMap, HashMap};

use kurbo::{BezPath, Point};
use serde::Deserialize;
use serde_json::Value;

use crate::error::TopologyError;
use crate::record::{Key, Scalar};

/// A decoded polygonal feature.
#[derive(Clone, Debug, PartialEq)]
pub struct Feature {
    /// Geometry `id`, if present.
    pub id: Option<Key>,
    /// All rings of the geometry as closed subpaths.
    pub path: BezPath,
    /// Scalar entries of the geometry's `properties`.
    pub properties: BTreeMap<String, Scalar>,
}

#[derive(Deserialize)]
struct Topology {
    #[serde(default)]
    transform: Option<Transform>,
    objects: HashMap<String, Geometry>,
    arcs: Vec<Vec<Vec<f64>>>,
}

#[derive(Copy, Clone, Deserialize)]
struct Transform {
    scale: [f64; 2],
    translate: [f64; 2],
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    GeometryCollection {
        geometries: Vec<Geometry>,
    },
    Polygon {
        #[serde(default)]
        id: Option<Value>,
        #[serde(default)]
        properties: Option<serde_json::Map<String, Value>>,
        arcs: Vec<Vec<i64>>,
    },
    MultiPolygon {
        #[serde(default)]
        id: Option<Value>,
        #[serde(default)]
        properties: Option<serde_json::Map<String, Value>>,
        arcs: Vec<Vec<Vec<i64>>>,
    },
    #[serde(other)]
    Other,
}

/// Decode every polygonal geometry under `objects[object]`.
///
/// Geometry collections are flattened in document order.
pub fn features(topology: &Value, object: &str) -> Result<Vec<Feature>, TopologyError> {
    let topology =
        Topology::deserialize(topology).map_err(|e| TopologyError::Decode(e.to_string()))?;
    let arcs = decode_arcs(&topology.arcs, topology.transform);
    let root = topology
        .objects
        .get(object)
        .ok_or_else(|| TopologyError::MissingObject(object.to_string()))?;
    let mut out = Vec::new();
    collect(root, &arcs, &mut out)?;
    Ok(out)
}

fn collect(geometry: &Geometry, arcs: &[Vec<Point>], out: &mut Vec<Feature>) -> Result<(), TopologyError> {
    match geometry {
        Geometry::GeometryCollection { geometries } => {
            for g in geometries {
                collect(g, arcs, out)?;
            }
        }
        Geometry::Polygon {
            id,
            properties,
            arcs: rings,
        } => {
            let mut path = BezPath::new();
            for ring in rings {
                push_ring(&mut path, ring, arcs)?;
            }
            out.push(feature(id.as_ref(), properties.as_ref(), path));
        }
        Geometry::MultiPolygon {
            id,
            properties,
            arcs: polygons,
        } => {
            let mut path = BezPath::new();
            for ring in polygons.iter().flatten() {
                push_ring(&mut path, ring, arcs)?;
            }
            out.push(feature(id.as_ref(), properties.as_ref(), path));
        }
        Geometry::Other => {}
    }
    Ok(())
}

fn feature(
    id: Option<&Value>,
    properties: Option<&serde_json::Map<String, Value>>,
    path: BezPath,
) -> Feature {
    let properties = properties
        .into_iter()
        .flatten()
        .filter_map(|(k, v)| Scalar::from_json(v).map(|s| (k.clone(), s)))
        .collect();
    Feature {
        id: id.and_then(Key::from_json),
        path,
        properties,
    }
}

/// Absolute arc coordinates, undoing quantization and delta encoding when a
/// transform is present.
fn decode_arcs(arcs: &[Vec<Vec<f64>>], transform: Option<Transform>) -> Vec<Vec<Point>> {
    arcs.iter()
        .map(|arc| match transform {
            Some(t) => {
                let (mut x, mut y) = (0.0, 0.0);
                arc.iter()
                    .filter(|p| p.len() >= 2)
                    .map(|p| {
                        x += p[0];
                        y += p[1];
                        Point::new(
                            x * t.scale[0] + t.translate[0],
                            y * t.scale[1] + t.translate[1],
                        )
                    })
                    .collect()
            }
            None => arc
                .iter()
                .filter(|p| p.len() >= 2)
                .map(|p| Point::new(p[0], p[1]))
                .collect(),
        })
        .collect()
}

/// Stitch a ring from arc references. A negative index `i` refers to arc `!i`
/// traversed in reverse. Consecutive arcs share an endpoint, so the first
/// point of every arc after the first is skipped.
fn push_ring(path: &mut BezPath, ring: &[i64], arcs: &[Vec<Point>]) -> Result<(), TopologyError> {
    let mut points: Vec<Point> = Vec::new();
    for &index in ring {
        let (slot, reversed) = if index < 0 { (!index, true) } else { (index, false) };
        let arc = usize::try_from(slot)
            .ok()
            .and_then(|s| arcs.get(s))
            .ok_or(TopologyError::ArcIndex(index))?;
        let skip = usize::from(!points.is_empty());
        if reversed {
            points.extend(arc.iter().rev().skip(skip).copied());
        } else {
            points.extend(arc.iter().skip(skip).copied());
        }
    }
    let mut it = points.into_iter();
    if let Some(first) = it.next() {
        path.move_to(first);
        for p in it {
            path.line_to(p);
        }
        path.close_path();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Shape;
    use serde_json::json;

    fn square_topology() -> Value {
        // Two arcs forming a unit square split along the diagonal.
        json!({
            "type": "Topology",
            "objects": {
                "counties": {
                    "type": "GeometryCollection",
                    "geometries": [
                        { "type": "Polygon", "id": 1001, "arcs": [[0, 1]],
                          "properties": { "name": "Autauga" } },
                        { "type": "Polygon", "id": "1003", "arcs": [[-1, -2]] },
                        { "type": "Point", "coordinates": [0, 0] }
                    ]
                }
            },
            "arcs": [
                [[0, 0], [10, 0], [10, 10]],
                [[10, 10], [0, 10], [0, 0]]
            ]
        })
    }

    #[test]
    fn decodes_polygons_and_skips_points() {
        let f = features(&square_topology(), "counties").unwrap();
        assert_eq!(f.len(), 2);
        assert_eq!(f[0].id, Some(Key::from("1001")));
        assert_eq!(f[1].id, Some(Key::from("1003")));
        assert_eq!(
            f[0].properties.get("name"),
            Some(&Scalar::Text("Autauga".into()))
        );
        let area = f[0].path.area().abs();
        assert!((area - 100.0).abs() < 1e-9, "area was {area}");
        assert!(f[0].path.contains(Point::new(5.0, 5.0)));
    }

    #[test]
    fn reversed_arcs_trace_the_same_ring() {
        let f = features(&square_topology(), "counties").unwrap();
        assert!((f[1].path.area().abs() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn quantized_arcs_are_delta_decoded() {
        let topology = json!({
            "type": "Topology",
            "transform": { "scale": [2.0, 3.0], "translate": [100.0, 200.0] },
            "objects": { "a": { "type": "MultiPolygon", "id": 1,
                                "arcs": [[[0]], [[1]]] } },
            "arcs": [
                [[0, 0], [1, 0], [0, 1], [-1, -1]],
                [[5, 5], [1, 0], [0, 1], [-1, -1]]
            ]
        });
        let f = features(&topology, "a").unwrap();
        assert_eq!(f.len(), 1);
        let b = f[0].path.bounding_box();
        assert_eq!((b.x0, b.y0), (100.0, 200.0));
        assert_eq!((b.x1, b.y1), (112.0, 218.0));
    }

    #[test]
    fn missing_object_and_bad_arc() {
        assert_eq!(
            features(&square_topology(), "states").unwrap_err(),
            TopologyError::MissingObject("states".into())
        );
        let bad = json!({
            "type": "Topology",
            "objects": { "a": { "type": "Polygon", "arcs": [[5]] } },
            "arcs": []
        });
        assert_eq!(features(&bad, "a").unwrap_err(), TopologyError::ArcIndex(5));
        assert!(matches!(
            features(&json!([1, 2]), "a").unwrap_err(),
            TopologyError::Decode(_)
        ));
    }
}
