//! `pgs-spatial` — street network topology and path search.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                     |
//! |-------------|--------------------------------------------------------------|
//! | [`network`] | `StreetNetwork` (CSR out/in adjacency), `StreetNetworkBuilder`, `StreetTags` |
//! | [`router`]  | `EdgeWeight` trait, `SpeedLimitWeight`, `ShortestPaths`, `Route` |
//! | [`osm`]     | `load_overpass_json` (feature = `"osm"` only)                |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                           |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                        |
//! |---------|---------------------------------------------------------------|
//! | `osm`   | Enables Overpass JSON loading via `serde_json`.               |
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.            |

pub mod error;
pub mod network;
pub mod router;

#[cfg(feature = "osm")]
pub mod osm;


pub use error::{SpatialError, SpatialResult};
pub use network::{StreetNetwork, StreetNetworkBuilder, StreetTags};
pub use router::{EdgeWeight, Route, ShortestPaths, SpeedLimitWeight, shortest_route};
