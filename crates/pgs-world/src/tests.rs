//! Unit tests for pgs-world.

#[cfg(test)]
mod helpers {
    use pgs_core::{GeoPoint, NodeId};
    use pgs_spatial::{StreetNetwork, StreetNetworkBuilder, StreetTags};

    use crate::{World, WorldConfig};

    /// Config with every spot free and no randomness in occupancy.
    pub fn all_free() -> WorldConfig {
        WorldConfig { initial_free_rate: 1.0, ..WorldConfig::default() }
    }

    /// One named 100 m street `0 → 1` at 50 km/h.
    pub fn single_street() -> StreetNetwork {
        let mut b = StreetNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 0.001));
        b.add_street(a, c, 100.0, 50.0, StreetTags::named("Main"));
        b.build()
    }

    /// Triangle `0 → 1 → 2 → 0` plus a shortcut `0 → 2`; only the
    /// shortcut is unnamed.
    pub fn triangle() -> (StreetNetwork, [NodeId; 3]) {
        let mut b = StreetNetworkBuilder::new();
        let n0 = b.add_node(GeoPoint::new(0.0, 0.0));
        let n1 = b.add_node(GeoPoint::new(0.0, 0.001));
        let n2 = b.add_node(GeoPoint::new(0.001, 0.0));
        b.add_street(n0, n1, 100.0, 50.0, StreetTags::named("A"));
        b.add_street(n1, n2, 100.0, 50.0, StreetTags::named("B"));
        b.add_street(n2, n0, 100.0, 50.0, StreetTags::named("C"));
        b.add_street(n0, n2, 150.0, 50.0, StreetTags::default());
        (b.build(), [n0, n1, n2])
    }

    pub fn single_street_world() -> World {
        World::new(single_street(), all_free()).unwrap()
    }
}

// ── Construction ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod construction {
    use pgs_core::{EdgeId, SpotId};

    use crate::{SpotState, World, WorldConfig, WorldError};

    #[test]
    fn spots_are_evenly_spaced() {
        let world = super::helpers::single_street_world();
        let street = world.street(EdgeId(0));
        // floor(floor(100 / 5) * 0.5) = 10 spots, spacing (100 - 50) / 10 = 5.
        assert_eq!(street.spot_count, 10);
        assert_eq!(street.spot_spacing_m, 5.0);
        assert_eq!(street.capacity, 20);
        let spots = street.spots_snapshot();
        for (i, spot) in spots.iter().enumerate() {
            assert_eq!(spot.index as usize, i);
            assert_eq!(spot.id, SpotId(i as u32));
            assert_eq!(spot.distance_from_source_m, i as f64 * 10.0);
            assert_eq!(spot.state, SpotState::Free);
        }
    }

    #[test]
    fn every_spot_is_indexed() {
        let (net, _) = super::helpers::triangle();
        let world = World::new(net, super::helpers::all_free()).unwrap();
        let total = world.stats().total_spots;
        assert_eq!(total, 30);
        for id in 0..total as u32 {
            let loc = world.locate_spot(SpotId(id)).unwrap();
            let spots = world.street(loc.edge).spots_snapshot();
            assert_eq!(spots[loc.index].id, SpotId(id));
        }
        assert!(world.locate_spot(SpotId(total as u32)).is_none());
    }

    #[test]
    fn unnamed_streets_have_no_spots() {
        let (net, [n0, _, n2]) = super::helpers::triangle();
        let shortcut = net.find_edge(n0, n2).unwrap();
        let world = World::new(net, super::helpers::all_free()).unwrap();
        assert_eq!(world.street(shortcut).spot_count, 0);
        assert_eq!(world.street(shortcut).spot_spacing_m, 0.0);
    }

    #[test]
    fn zero_free_rate_fills_every_spot_with_background_traffic() {
        let config = WorldConfig { initial_free_rate: 0.0, ..WorldConfig::default() };
        let world = World::new(super::helpers::single_street(), config).unwrap();
        assert_eq!(world.free_spot_count(), 0);
        let stats = world.stats();
        assert_eq!(stats.initially_free_spots, 0);
        assert_eq!(stats.free_spots, 0);
        for spot in world.street(EdgeId(0)).spots_snapshot() {
            assert_eq!(spot.state, SpotState::Occupied { by: None });
        }
    }

    #[test]
    fn same_seed_same_occupancy() {
        let config = WorldConfig { initial_free_rate: 0.5, ..WorldConfig::default() };
        let (net_a, _) = super::helpers::triangle();
        let (net_b, _) = super::helpers::triangle();
        let a = World::new(net_a, config.clone()).unwrap();
        let b = World::new(net_b, config).unwrap();
        assert_eq!(a.stats(), b.stats());
    }

    #[test]
    fn out_of_range_density_rejected() {
        let config = WorldConfig { parking_density: 1.5, ..WorldConfig::default() };
        let result = World::new(super::helpers::single_street(), config);
        assert!(matches!(result, Err(WorldError::Config(_))));
    }

    #[test]
    fn malformed_street_rejected() {
        use pgs_core::GeoPoint;
        use pgs_spatial::{StreetNetworkBuilder, StreetTags};

        let mut b = StreetNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 0.001));
        b.add_street(a, c, -3.0, 50.0, StreetTags::default());
        let result = World::new(b.build(), WorldConfig::default());
        assert!(matches!(result, Err(WorldError::Config(_))));
    }
}

// ── Speed model ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod speed {
    use pgs_core::units::{MIN_SAFE_SPEED_MS, kmh_to_ms};
    use pgs_core::EdgeId;

    #[test]
    fn empty_street_runs_at_the_limit() {
        let world = super::helpers::single_street_world();
        let street = world.street(EdgeId(0));
        assert_eq!(street.car_count(), 0);
        assert_eq!(street.current_max_speed_ms(), kmh_to_ms(50.0));
    }

    #[test]
    fn traffic_slows_the_street() {
        let world = super::helpers::single_street_world();
        for _ in 0..10 {
            world.increment_car_count(EdgeId(0));
        }
        // (100 - 10 * 5) / 10 = 5 m/s, below the 13.9 m/s limit.
        let street = world.street(EdgeId(0));
        assert_eq!(street.current_max_speed_ms(), 5.0);
        assert_eq!(street.current_cover_duration_secs(), 20.0);
    }

    #[test]
    fn jammed_street_still_crawls() {
        let world = super::helpers::single_street_world();
        let street = world.street(EdgeId(0));
        assert_eq!(street.max_speed_for(20), MIN_SAFE_SPEED_MS);
        assert_eq!(street.max_speed_for(40), MIN_SAFE_SPEED_MS);
    }

    #[test]
    fn congestion_weight_avoids_busy_streets() {
        use pgs_spatial::ShortestPaths;
        use crate::{CongestionWeight, World};

        let (net, [n0, n1, n2]) = super::helpers::triangle();
        let shortcut = net.find_edge(n0, n2).unwrap();
        let via_n1 = net.find_edge(n0, n1).unwrap();
        let world = World::new(net, super::helpers::all_free()).unwrap();

        // Free flow: the 150 m shortcut beats 200 m via n1.
        let tree = ShortestPaths::compute(world.network(), n0, &CongestionWeight(&world)).unwrap();
        assert_eq!(tree.path_to(world.network(), n2).unwrap().edges, vec![shortcut]);

        for _ in 0..25 {
            world.increment_car_count(shortcut);
        }
        let tree = ShortestPaths::compute(world.network(), n0, &CongestionWeight(&world)).unwrap();
        assert_eq!(tree.path_to(world.network(), n2).unwrap().edges[0], via_n1);
    }
}

// ── Car counts ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod car_count {
    use pgs_core::EdgeId;

    use crate::WorldError;

    #[test]
    fn decrement_at_zero_is_an_error() {
        let world = super::helpers::single_street_world();
        assert!(matches!(
            world.decrement_car_count(EdgeId(0)),
            Err(WorldError::CarCountUnderflow(EdgeId(0)))
        ));
        assert_eq!(world.street(EdgeId(0)).car_count(), 0);
    }

    #[test]
    fn move_car_transfers_one_car() {
        let (net, [n0, n1, n2]) = super::helpers::triangle();
        let a = net.find_edge(n0, n1).unwrap();
        let b = net.find_edge(n1, n2).unwrap();
        let world = crate::World::new(net, super::helpers::all_free()).unwrap();
        world.increment_car_count(a);
        world.move_car(a, b).unwrap();
        assert_eq!(world.street(a).car_count(), 0);
        assert_eq!(world.street(b).car_count(), 1);
        assert!(world.move_car(a, b).is_err());
    }

    #[test]
    fn concurrent_updates_never_go_negative() {
        let world = super::helpers::single_street_world();
        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    for _ in 0..1_000 {
                        world.increment_car_count(EdgeId(0));
                        world.decrement_car_count(EdgeId(0)).unwrap();
                    }
                });
            }
        });
        assert_eq!(world.street(EdgeId(0)).car_count(), 0);
    }
}

// ── Spot lifecycle ────────────────────────────────────────────────────────────

#[cfg(test)]
mod spots {
    use pgs_core::{AgentId, EdgeId};

    use crate::{SpotState, WorldError};

    const CAR: AgentId = AgentId(1);
    const OTHER: AgentId = AgentId(2);

    #[test]
    fn local_parking_takes_the_nearest_passed_spot() {
        let world = super::helpers::single_street_world();
        world.increment_car_count(EdgeId(0));
        // Passed spots at 20, 30, 40: the nearest to 45 m is at 40.
        let loc = world.try_park_locally(EdgeId(0), 15.0, 45.0, CAR, true).unwrap().unwrap();
        assert_eq!(loc.distance_from_source_m, 40.0);
        assert_eq!(world.spot_state(loc), SpotState::Occupied { by: Some(CAR) });
        assert_eq!(world.street(EdgeId(0)).car_count(), 0);
        assert_eq!(world.stats().park_events, 1);
        assert_eq!(world.stats().free_spots, 9);
    }

    #[test]
    fn no_passed_spot_leaves_the_car_driving() {
        let world = super::helpers::single_street_world();
        world.increment_car_count(EdgeId(0));
        let loc = world.try_park_locally(EdgeId(0), 41.0, 49.0, CAR, true).unwrap();
        assert!(loc.is_none());
        assert_eq!(world.street(EdgeId(0)).car_count(), 1);
    }

    #[test]
    fn reservations_bind_local_parkers_but_not_rogues() {
        let world = super::helpers::single_street_world();
        world.increment_car_count(EdgeId(0));
        world.increment_car_count(EdgeId(0));
        let target = world.first_free_spot(EdgeId(0)).unwrap();
        assert!(world.reserve_spot(target, OTHER));

        // Only the reserved spot at 0 m has been passed.
        assert!(world.try_park_locally(EdgeId(0), 0.0, 5.0, CAR, true).unwrap().is_none());
        let taken = world.try_park_locally(EdgeId(0), 0.0, 5.0, CAR, false).unwrap().unwrap();
        assert_eq!(taken, target);

        // The holder finds out when it arrives.
        assert!(!world.claim_reserved(target, OTHER).unwrap());
        assert!(!world.cancel_reservation(target, OTHER));
    }

    #[test]
    fn reserve_then_claim() {
        let world = super::helpers::single_street_world();
        world.increment_car_count(EdgeId(0));
        let loc = world.first_free_spot(EdgeId(0)).unwrap();

        assert!(world.reserve_spot(loc, CAR));
        assert!(!world.reserve_spot(loc, OTHER));
        assert!(world.spot_state(loc).occupied());
        assert!(world.spot_state(loc).reserved());
        assert_eq!(world.stats().free_spots, 9);

        assert!(world.claim_reserved(loc, CAR).unwrap());
        assert_eq!(world.spot_state(loc), SpotState::Occupied { by: Some(CAR) });
        assert_eq!(world.stats().free_spots, 9);
        assert_eq!(world.street(EdgeId(0)).car_count(), 0);
    }

    #[test]
    fn cancel_returns_the_spot() {
        let world = super::helpers::single_street_world();
        let loc = world.first_free_spot(EdgeId(0)).unwrap();
        assert!(world.reserve_spot(loc, CAR));
        assert!(!world.cancel_reservation(loc, OTHER));
        assert!(world.cancel_reservation(loc, CAR));
        assert_eq!(world.spot_state(loc), SpotState::Free);
        assert_eq!(world.stats().free_spots, 10);
    }

    #[test]
    fn release_then_repark_round_trips() {
        let world = super::helpers::single_street_world();
        world.increment_car_count(EdgeId(0));
        let loc = world.try_park_locally(EdgeId(0), 0.0, 0.0, CAR, true).unwrap().unwrap();
        let before_count = world.street(EdgeId(0)).car_count();
        let before_state = world.spot_state(loc);

        world.release_spot(loc, CAR).unwrap();
        assert_eq!(world.street(EdgeId(0)).car_count(), before_count + 1);
        assert_eq!(world.spot_state(loc), SpotState::Free);

        let again = world.try_park_locally(EdgeId(0), 0.0, 0.0, CAR, true).unwrap().unwrap();
        assert_eq!(again, loc);
        assert_eq!(world.street(EdgeId(0)).car_count(), before_count);
        assert_eq!(world.spot_state(loc), before_state);
    }

    #[test]
    fn releasing_someone_elses_spot_fails() {
        let world = super::helpers::single_street_world();
        let loc = world.first_free_spot(EdgeId(0)).unwrap();
        assert!(world.place_parked_car(loc, CAR));
        assert!(matches!(
            world.release_spot(loc, OTHER),
            Err(WorldError::SpotNotHeld { agent: OTHER, .. })
        ));
        // Pre-parked cars never entered traffic.
        assert_eq!(world.street(EdgeId(0)).car_count(), 0);
        world.release_spot(loc, CAR).unwrap();
        assert_eq!(world.street(EdgeId(0)).car_count(), 1);
    }

    #[test]
    fn counters_track_the_scan() {
        let world = super::helpers::single_street_world();
        let mut rng = pgs_core::SimRng::new(3);
        for agent in 0..4 {
            let loc = world.random_unoccupied_spot(rng.inner()).unwrap();
            assert!(world.place_parked_car(loc, AgentId(agent)));
        }
        assert_eq!(world.free_spot_count(), 6);
        assert_eq!(world.stats().free_spots, 6);
    }

    #[test]
    fn random_spot_none_when_full() {
        let world = super::helpers::single_street_world();
        for (i, spot) in world.street(EdgeId(0)).spots_snapshot().iter().enumerate() {
            let loc = world.locate_spot(spot.id).unwrap();
            assert!(world.place_parked_car(loc, AgentId(i as u32)));
        }
        let mut rng = pgs_core::SimRng::new(1);
        assert!(world.random_unoccupied_spot(rng.inner()).is_none());
        assert!(world.first_free_spot(EdgeId(0)).is_none());
    }

    #[test]
    fn last_spot_goes_to_exactly_one_parker() {
        let world = super::helpers::single_street_world();
        let spots = world.street(EdgeId(0)).spots_snapshot();
        for spot in &spots[1..] {
            let loc = world.locate_spot(spot.id).unwrap();
            assert!(world.place_parked_car(loc, AgentId(100 + spot.index)));
        }
        for _ in 0..8 {
            world.increment_car_count(EdgeId(0));
        }

        let winners: Vec<bool> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let world = &world;
                    s.spawn(move || {
                        world
                            .try_park_locally(EdgeId(0), 0.0, 100.0, AgentId(i), true)
                            .unwrap()
                            .is_some()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert_eq!(winners.iter().filter(|w| **w).count(), 1);
        assert_eq!(world.street(EdgeId(0)).car_count(), 7);
    }
}
