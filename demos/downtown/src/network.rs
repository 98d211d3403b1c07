//! Synthetic downtown street grid.
//!
//! `rows × cols` intersections.  Avenues run south–north and are two-way;
//! streets run west–east and are one-way, alternating direction by row.
//! Every street block is drawn as two half-block segments through a
//! mid-block node, the way raw map data splits ways at shape points; graph
//! simplification merges them back into one street per block.
//!
//! ```text
//!   (1, 0) ◀─·── (1, 1) ◀─·── (1, 2)      "2nd Street", westbound
//!     ║            ║            ║
//!   (0, 0) ──·─▶ (0, 1) ──·─▶ (0, 2)      "1st Street", eastbound
//!  "1st Avenue"   "2nd Avenue" …           two-way
//! ```

use pgs_core::{GeoPoint, NodeId};
use pgs_spatial::{StreetNetworkBuilder, StreetTags};

use crate::MapConfig;

/// Southern latitude and western longitude of the grid.
const LAT_MIN: f64 = 52.370;
const LON_MIN: f64 = 4.880;

const M_PER_DEG_LAT: f64 = 111_320.0;

pub fn build_grid(map: &MapConfig) -> StreetNetworkBuilder {
    let lat_step = map.block_m / M_PER_DEG_LAT;
    let lon_step = map.block_m / (M_PER_DEG_LAT * LAT_MIN.to_radians().cos());
    let half = map.block_m / 2.0;

    let mut b = StreetNetworkBuilder::with_capacity(map.rows * map.cols * 3, map.rows * map.cols * 8);
    let mut nodes = vec![NodeId::INVALID; map.rows * map.cols];
    for row in 0..map.rows {
        for col in 0..map.cols {
            let pos = GeoPoint::new(LAT_MIN + row as f64 * lat_step, LON_MIN + col as f64 * lon_step);
            nodes[row * map.cols + col] = b.add_node(pos);
        }
    }

    for row in 0..map.rows {
        for col in 0..map.cols {
            let here = nodes[row * map.cols + col];
            if col + 1 < map.cols {
                let east = nodes[row * map.cols + col + 1];
                let name = format!("{} Street", ordinal(row + 1));
                let (from, to) = if row % 2 == 0 { (here, east) } else { (east, here) };
                split_block(&mut b, from, to, half, map.speed_limit_kmh, &name);
            }
            if row + 1 < map.rows {
                let north = nodes[(row + 1) * map.cols + col];
                let name = format!("{} Avenue", ordinal(col + 1));
                b.add_two_way(here, north, map.block_m, map.speed_limit_kmh, StreetTags::named(name));
            }
        }
    }
    b
}

/// One-way block `from → to` in two segments.
fn split_block(b: &mut StreetNetworkBuilder, from: NodeId, to: NodeId, half_m: f64, kmh: f64, name: &str) {
    let (pa, pz) = (b.node_pos(from), b.node_pos(to));
    let mid = b.add_node(GeoPoint::new((pa.lat + pz.lat) / 2.0, (pa.lon + pz.lon) / 2.0));
    b.add_street(from, mid, half_m, kmh, StreetTags::named(name));
    b.add_street(mid, to, half_m, kmh, StreetTags::named(name));
}

fn ordinal(n: usize) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}
