//! Overpass JSON loader, enabled with the `osm` Cargo feature.
//!
//! # Usage
//!
//! ```ignore
//! use pgs_spatial::osm::load_overpass_json;
//!
//! let json = std::fs::read_to_string("downtown.json")?;
//! let mut builder = load_overpass_json(&json, 50.0)?;
//! builder.simplify();
//! let network = builder.build();
//! ```
//!
//! # What is loaded
//!
//! Every `way` becomes one directed street per consecutive node pair, in the
//! order the way lists its nodes.  Length is the haversine distance between
//! the two nodes; the speed limit is the numeric prefix of `maxspeed`, or
//! the caller's default.  Only nodes referenced by a way are kept.  Other
//! element types (relations, areas) are ignored.
//!
//! The loader returns a builder rather than a network so callers can run
//! [`StreetNetworkBuilder::simplify`] first.

use std::collections::HashMap;

use log::{info, warn};
use serde::Deserialize;

use pgs_core::{GeoPoint, NodeId};

use crate::network::{StreetNetworkBuilder, StreetTags};
use crate::{SpatialError, SpatialResult};

#[derive(Deserialize)]
struct OverpassDoc {
    elements: Vec<OverpassElement>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum OverpassElement {
    Node {
        id:  i64,
        lat: f64,
        lon: f64,
    },
    Way {
        nodes: Vec<i64>,
        #[serde(default)]
        tags:  HashMap<String, String>,
    },
    #[serde(other)]
    Other,
}

/// Parse an Overpass `out body` JSON document into a street builder.
///
/// # Errors
///
/// Returns [`SpatialError::Parse`] if the document is not valid Overpass
/// JSON.
pub fn load_overpass_json(json: &str, default_speed_kmh: f64) -> SpatialResult<StreetNetworkBuilder> {
    let doc: OverpassDoc =
        serde_json::from_str(json).map_err(|e| SpatialError::Parse(e.to_string()))?;

    let mut positions: HashMap<i64, GeoPoint> = HashMap::new();
    let mut ways = Vec::new();
    for element in doc.elements {
        match element {
            OverpassElement::Node { id, lat, lon } => {
                positions.insert(id, GeoPoint::new(lat, lon));
            }
            OverpassElement::Way { nodes, tags } => ways.push((nodes, tags)),
            OverpassElement::Other => {}
        }
    }

    let mut builder = StreetNetworkBuilder::with_capacity(positions.len(), ways.len() * 4);
    let mut osm_to_pgs: HashMap<i64, NodeId> = HashMap::new();
    let mut missing = 0usize;

    for (refs, tags) in &ways {
        let speed_kmh = tags
            .get("maxspeed")
            .and_then(|v| parse_speed(v))
            .unwrap_or(default_speed_kmh);
        let street_tags = StreetTags {
            name:     tags.get("name").cloned(),
            junction: tags.get("junction").cloned(),
        };

        for pair in refs.windows(2) {
            let (Some(&a), Some(&b)) = (positions.get(&pair[0]), positions.get(&pair[1])) else {
                missing += 1;
                continue;
            };
            let from = *osm_to_pgs.entry(pair[0]).or_insert_with(|| builder.add_node(a));
            let to = *osm_to_pgs.entry(pair[1]).or_insert_with(|| builder.add_node(b));
            builder.add_street(from, to, a.distance_m(b), speed_kmh, street_tags.clone());
        }
    }

    if missing > 0 {
        warn!("overpass: skipped {missing} way segments referencing unknown nodes");
    }
    info!(
        "overpass: loaded {} nodes, {} streets from {} ways",
        builder.node_count(),
        builder.edge_count(),
        ways.len()
    );
    Ok(builder)
}

/// Kilometres per mile.
const KM_PER_MILE: f64 = 1.609_344;

/// A `maxspeed` value in km/h: `"30"` → 30, `"20 mph"` → 32.19.
fn parse_speed(value: &str) -> Option<f64> {
    let value = value.trim();
    let end = value
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(value.len());
    let speed: f64 = value[..end].parse().ok()?;
    if value[end..].trim().eq_ignore_ascii_case("mph") {
        Some(speed * KM_PER_MILE)
    } else {
        Some(speed)
    }
}
