//! Unit tests for pgs-guidance.

#[cfg(test)]
mod helpers {
    use pgs_core::{AgentId, EdgeId, GeoPoint, NodeId};
    use pgs_spatial::{StreetNetwork, StreetNetworkBuilder, StreetTags};
    use pgs_world::{World, WorldConfig};

    pub fn all_free() -> WorldConfig {
        WorldConfig { initial_free_rate: 1.0, ..WorldConfig::default() }
    }

    /// One 100 m street with spots at 0 m and 50 m, the one at 0 m taken.
    pub fn one_free_spot_at_50() -> World {
        let mut b = StreetNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 0.001));
        b.add_street(a, c, 100.0, 50.0, StreetTags::named("Main"));
        // floor(floor(100 / 25) * 0.5) = 2 spots, spacing 25 m.
        let config = WorldConfig { spot_length_m: 25.0, ..all_free() };
        let world = World::new(b.build(), config).unwrap();
        let first = world.first_free_spot(EdgeId(0)).unwrap();
        assert_eq!(first.distance_from_source_m, 0.0);
        assert!(world.place_parked_car(first, AgentId(999)));
        world
    }

    /// Triangle `0 → 1 → 2 → 0` of named streets plus an unnamed shortcut
    /// `0 → 2`.
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

    /// Occupy every free spot on `edge` with background-like holders.
    pub fn fill(world: &World, edge: EdgeId) {
        let mut holder = 10_000;
        while let Some(loc) = world.first_free_spot(edge) {
            assert!(world.place_parked_car(loc, AgentId(holder)));
            holder += 1;
        }
    }
}

// ── Strategy ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod strategy {
    use pgs_core::{GeoPoint, NodeId};
    use pgs_spatial::{StreetNetworkBuilder, StreetTags};
    use pgs_world::{World, WorldConfig};

    use crate::{NearestParkingStrategy, ParkingStrategy};

    #[test]
    fn search_is_idempotent() {
        let (net, [n0, ..]) = super::helpers::triangle();
        let world = World::new(net, super::helpers::all_free()).unwrap();
        let first = NearestParkingStrategy.find_spot(&world, n0);
        let second = NearestParkingStrategy.find_spot(&world, n0);
        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[test]
    fn nearest_spot_on_first_street_wins() {
        let (net, [n0, n1, _]) = super::helpers::triangle();
        let a = net.find_edge(n0, n1).unwrap();
        let world = World::new(net, super::helpers::all_free()).unwrap();
        let spot = NearestParkingStrategy.find_spot(&world, n0).unwrap();
        assert_eq!(spot.edge, a);
        assert_eq!(spot.index, 0);
    }

    #[test]
    fn full_streets_push_the_search_one_hop_out() {
        let (net, [n0, n1, n2]) = super::helpers::triangle();
        let a = net.find_edge(n0, n1).unwrap();
        let b = net.find_edge(n1, n2).unwrap();
        let c = net.find_edge(n2, n0).unwrap();
        let world = World::new(net, super::helpers::all_free()).unwrap();
        super::helpers::fill(&world, a);
        super::helpers::fill(&world, c);

        // Around n0: A (full), shortcut (no spots), C (full); next hop finds B.
        let spot = NearestParkingStrategy.find_spot(&world, n0).unwrap();
        assert_eq!(spot.edge, b);
    }

    #[test]
    fn no_free_spot_anywhere_is_none() {
        let config = WorldConfig { initial_free_rate: 0.0, ..WorldConfig::default() };
        let (net, [n0, ..]) = super::helpers::triangle();
        let world = World::new(net, config).unwrap();
        assert!(NearestParkingStrategy.find_spot(&world, n0).is_none());
    }

    #[test]
    fn isolated_destination_is_none() {
        let mut b = StreetNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 0.001));
        let lonely = b.add_node(GeoPoint::new(1.0, 1.0));
        b.add_street(a, c, 100.0, 50.0, StreetTags::named("Main"));
        let world = World::new(b.build(), super::helpers::all_free()).unwrap();
        assert!(NearestParkingStrategy.find_spot(&world, lonely).is_none());
        assert!(NearestParkingStrategy.find_spot(&world, NodeId(77)).is_none());
    }
}

// ── Service ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod service {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, mpsc};
    use std::time::Duration;

    use pgs_core::{AgentId, EdgeId, GeoPoint, NodeId, SpotId};
    use pgs_spatial::{StreetNetworkBuilder, StreetTags};
    use pgs_world::{SpotLocation, SpotState, World};

    use crate::{
        GuidanceError, NearestParkingStrategy, ParkingGuidanceService, ParkingStrategy,
    };

    #[test]
    fn spot_ahead_on_the_same_street() {
        let world = super::helpers::one_free_spot_at_50();
        let service = ParkingGuidanceService::default();
        let target = world.network().target(EdgeId(0));

        let guidance = service
            .request_guidance(&world, AgentId(1), EdgeId(0), 0.0, target)
            .unwrap()
            .unwrap();
        assert_eq!(guidance.route, vec![EdgeId(0)]);
        assert_eq!(guidance.spot.distance_from_source_m, 50.0);
        assert_eq!(world.spot_state(guidance.spot), SpotState::Reserved { by: AgentId(1) });
    }

    #[test]
    fn spot_behind_routes_around_the_block() {
        let (net, [n0, _, n2]) = super::helpers::triangle();
        let c = net.find_edge(n2, n0).unwrap();
        let shortcut = net.find_edge(n0, n2).unwrap();
        let world = World::new(net, super::helpers::all_free()).unwrap();
        let service = ParkingGuidanceService::default();

        // Destination n2: the first street examined is C, whose first free
        // spot (0 m) is behind a car at 10 m on C.
        let guidance = service
            .request_guidance(&world, AgentId(1), c, 10.0, n2)
            .unwrap()
            .unwrap();
        assert_eq!(guidance.spot.edge, c);
        assert_eq!(guidance.route, vec![c, shortcut, c]);
    }

    #[test]
    fn nothing_free_means_no_guidance() {
        let world = super::helpers::one_free_spot_at_50();
        super::helpers::fill(&world, EdgeId(0));
        let service = ParkingGuidanceService::default();
        let result = service.request_guidance(&world, AgentId(1), EdgeId(0), 0.0, NodeId(1));
        assert!(matches!(result, Ok(None)));
    }

    #[test]
    fn unreachable_spot_is_not_reserved() {
        let mut b = StreetNetworkBuilder::new();
        let n0 = b.add_node(GeoPoint::new(0.0, 0.0));
        let n1 = b.add_node(GeoPoint::new(0.0, 0.001));
        let n2 = b.add_node(GeoPoint::new(1.0, 0.0));
        let n3 = b.add_node(GeoPoint::new(1.0, 0.001));
        b.add_street(n0, n1, 100.0, 50.0, StreetTags::named("Island"));
        b.add_street(n2, n3, 100.0, 50.0, StreetTags::default());
        let net = b.build();
        let car_street = net.find_edge(n2, n3).unwrap();
        let world = World::new(net, super::helpers::all_free()).unwrap();
        let free_before = world.stats().free_spots;

        let service = ParkingGuidanceService::default();
        let result = service.request_guidance(&world, AgentId(1), car_street, 0.0, n1).unwrap();
        assert!(result.is_none());
        assert_eq!(world.stats().free_spots, free_before);
    }

    #[test]
    fn two_cars_one_spot() {
        let world = super::helpers::one_free_spot_at_50();
        let service = ParkingGuidanceService::default();

        let results: Vec<bool> = std::thread::scope(|s| {
            let handles: Vec<_> = (1..=2)
                .map(|i| {
                    let (world, service) = (&world, &service);
                    s.spawn(move || {
                        service
                            .request_guidance(world, AgentId(i), EdgeId(0), 0.0, NodeId(1))
                            .unwrap()
                            .is_some()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert_eq!(results.iter().filter(|r| **r).count(), 1);
        assert_eq!(world.stats().free_spots, 0);
    }

    /// Hands out a fixed, already-taken spot once, then defers to the
    /// nearest strategy, like a local parker winning the race.
    struct StaleOnce {
        stale: SpotLocation,
        used: AtomicBool,
    }

    impl ParkingStrategy for StaleOnce {
        fn find_spot(&self, world: &World, destination: NodeId) -> Option<SpotLocation> {
            if !self.used.swap(true, Ordering::SeqCst) {
                return Some(self.stale);
            }
            NearestParkingStrategy.find_spot(world, destination)
        }
    }

    #[test]
    fn lost_race_retries_the_search() {
        let (net, [n0, n1, _]) = super::helpers::triangle();
        let a = net.find_edge(n0, n1).unwrap();
        let world = World::new(net, super::helpers::all_free()).unwrap();
        let taken = world.first_free_spot(a).unwrap();
        assert!(world.place_parked_car(taken, AgentId(50)));

        let service = ParkingGuidanceService::new(Box::new(StaleOnce {
            stale: taken,
            used: AtomicBool::new(false),
        }));
        let guidance = service
            .request_guidance(&world, AgentId(1), a, 0.0, n0)
            .unwrap()
            .unwrap();
        assert_ne!(guidance.spot, taken);
        assert_eq!(guidance.spot.edge, a);
        assert_eq!(guidance.spot.index, 1);
    }

    /// Always offers the same spot, free or not.
    struct Sticky(SpotLocation);

    impl ParkingStrategy for Sticky {
        fn find_spot(&self, _world: &World, _destination: NodeId) -> Option<SpotLocation> {
            Some(self.0)
        }
    }

    #[test]
    fn repeated_taken_spot_ends_the_request() {
        let world = super::helpers::one_free_spot_at_50();
        let taken = world.locate_spot(SpotId(0)).unwrap();
        assert_eq!(taken.distance_from_source_m, 0.0);
        assert!(world.spot_state(taken).occupied());
        let world = Arc::new(world);
        let service = Arc::new(ParkingGuidanceService::new(Box::new(Sticky(taken))));

        let (tx, rx) = mpsc::channel();
        {
            let (world, service) = (Arc::clone(&world), Arc::clone(&service));
            std::thread::spawn(move || {
                let result = service.request_guidance(&world, AgentId(1), EdgeId(0), 0.0, NodeId(1));
                let _ = tx.send(matches!(result, Ok(None)));
            });
        }
        assert_eq!(rx.recv_timeout(Duration::from_secs(5)), Ok(true));
        assert_eq!(world.stats().free_spots, 1);
        // The critical section was released.
        assert!(service
            .request_guidance(&world, AgentId(2), EdgeId(0), 0.0, NodeId(1))
            .is_ok());
    }

    struct Bogus;

    impl ParkingStrategy for Bogus {
        fn find_spot(&self, _world: &World, _destination: NodeId) -> Option<SpotLocation> {
            Some(SpotLocation {
                spot: SpotId(9_999),
                edge: EdgeId(0),
                index: 0,
                distance_from_source_m: 0.0,
            })
        }
    }

    #[test]
    fn unindexed_spot_fails_loudly() {
        let world = super::helpers::one_free_spot_at_50();
        let service = ParkingGuidanceService::new(Box::new(Bogus));
        let result = service.request_guidance(&world, AgentId(1), EdgeId(0), 0.0, NodeId(1));
        assert!(matches!(result, Err(GuidanceError::IncoherentSpotIndex(SpotId(9_999)))));
        assert_eq!(world.stats().free_spots, 1);
    }
}
