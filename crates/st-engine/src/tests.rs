//! Unit tests for st-engine.

#[cfg(test)]
mod helpers {
    use st_core::{EngineConfig, NodeId, Point};

    use crate::{Engine, TurnSnapshot};

    /// A quick-planning config so closed-loop tests stay fast.
    pub fn config() -> EngineConfig {
        EngineConfig { planning_budget_ms: 20, ..EngineConfig::default() }
    }

    /// Star 0 at the origin, stars 1..=3 along +x and 4..=6 along +y, 10 apart.
    pub fn cross() -> Vec<Point> {
        vec![
            Point::new(0, 0),
            Point::new(10, 0),
            Point::new(20, 0),
            Point::new(30, 0),
            Point::new(0, 10),
            Point::new(0, 20),
            Point::new(0, 30),
        ]
    }

    /// A 4×3 grid with spacing 50.
    pub fn grid() -> Vec<Point> {
        let mut pts = Vec::new();
        for y in 0..3 {
            for x in 0..4 {
                pts.push(Point::new(x * 50, y * 50));
            }
        }
        pts
    }

    pub fn n(v: &[u32]) -> Vec<NodeId> {
        v.iter().map(|&i| NodeId(i)).collect()
    }

    /// Play `turns` turns, feeding each turn's moves back as the next ship
    /// positions.  `ufos_at(turn)` supplies the UFO part of each snapshot.
    /// Returns every node any ship occupied, in order.
    pub fn play(
        engine: &mut Engine,
        start: Vec<NodeId>,
        turns: u32,
        mut ufos_at: impl FnMut(u32) -> Vec<crate::UfoSighting>,
    ) -> Vec<NodeId> {
        let mut ships = start;
        let mut seen = ships.clone();
        for t in 0..turns {
            let snap = TurnSnapshot::new(ufos_at(t), ships.clone());
            let moves = engine.make_moves(&snap);
            assert_eq!(moves.len(), ships.len());
            seen.extend(&moves);
            ships = moves;
        }
        seen
    }
}

// ── Snapshot ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod snapshot {
    use st_core::NodeId;

    use crate::{TurnSnapshot, UfoSighting};

    #[test]
    fn from_flat_decodes_triples() {
        let s = TurnSnapshot::from_flat(&[0, 1, 2, 3, 4, 5], &[6, 7]);
        assert_eq!(s.ufos, vec![
            UfoSighting::new(NodeId(0), NodeId(1), NodeId(2)),
            UfoSighting::new(NodeId(3), NodeId(4), NodeId(5)),
        ]);
        assert_eq!(s.ships, vec![NodeId(6), NodeId(7)]);
    }

    #[test]
    fn partial_triple_is_dropped() {
        let s = TurnSnapshot::from_flat(&[0, 1, 2, 3, 4], &[]);
        assert_eq!(s.ufos.len(), 1);
    }

    #[test]
    fn bad_values_become_invalid() {
        let s = TurnSnapshot::from_flat(&[-1, 1, 2], &[-5, 1 << 40]);
        assert_eq!(s.ufos[0].current, NodeId::INVALID);
        assert_eq!(s.ships, vec![NodeId::INVALID, NodeId::INVALID]);
    }
}

// ── State ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod state {
    use st_core::{NodeId, Turn};

    use crate::EngineState;

    #[test]
    fn visits_count_once() {
        let mut s = EngineState::new(3, 12);
        assert!(s.mark_visited(NodeId(1)));
        assert!(!s.mark_visited(NodeId(1)));
        assert!(!s.mark_visited(NodeId::INVALID));
        assert_eq!(s.remaining_unvisited, 2);
        assert_eq!(s.unvisited(), vec![NodeId(0), NodeId(2)]);
    }

    #[test]
    fn trigger_threshold() {
        let mut s = EngineState::new(10, 40);
        s.turn = Turn(1);
        assert_eq!(s.remaining_turns(), 40);
        assert!(!s.should_plan(2));
        // Turn 33: 8 turns left, 10 unvisited.
        s.turn = Turn(33);
        assert!(s.should_plan(0));
        s.planning_triggered = true;
        assert!(!s.should_plan(0));
    }

    #[test]
    fn nothing_left_never_triggers() {
        let mut s = EngineState::new(1, 1);
        s.mark_visited(NodeId(0));
        s.turn = Turn(100);
        assert!(!s.should_plan(5));
    }
}

// ── Policy ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod policy {
    use st_core::{Mount, NodeId, Point, Turn, TransportId};
    use st_spatial::{DistanceTable, StarField};

    use crate::{EngineState, HitchhikePolicy, Ship, TurnContext, Ufo};

    fn ufo(current: u32, next: u32, next_next: u32) -> Ufo {
        Ufo {
            current: NodeId(current),
            next: NodeId(next),
            next_next: NodeId(next_next),
            ..Ufo::new(1)
        }
    }

    fn world(points: Vec<Point>, visited: &[u32]) -> (StarField, DistanceTable, EngineState) {
        let field = StarField::from_points(points).unwrap();
        let table = DistanceTable::from_field(&field);
        let mut state = EngineState::new(field.len(), 100);
        for &v in visited {
            state.mark_visited(NodeId(v));
        }
        (field, table, state)
    }

    #[test]
    fn change_line_widens_after_early_game() {
        let p = HitchhikePolicy::default();
        assert_eq!(p.change_line(Turn(1), 1), 40.0);
        assert_eq!(p.change_line(Turn(101), 1), 120.0);
        assert_eq!(p.change_line(Turn(1), 4), 20.0);
    }

    #[test]
    fn capacity_one_is_never_double_booked() {
        let (field, table, state) = world(super::helpers::cross(), &[0]);
        let ctx = TurnContext::new(Turn(1), &field, &table, &state);
        // Three ships share star 0 with both UFOs.
        let mut ships = vec![Ship::at(NodeId(0)), Ship::at(NodeId(0)), Ship::at(NodeId(0))];
        let mut ufos = vec![ufo(0, 1, 2), ufo(0, 4, 5)];

        let moves = HitchhikePolicy::default().decide(&ctx, &mut ships, &mut ufos);

        assert!(ufos.iter().all(|u| u.occupants <= 1));
        assert_eq!(ships[0].mount, Mount::Riding(TransportId(0)));
        assert_eq!(ships[1].mount, Mount::Riding(TransportId(1)));
        assert_eq!(ships[2].mount, Mount::OnFoot);
        assert_eq!(moves, super::helpers::n(&[1, 4, 0]));
    }

    #[test]
    fn two_ships_two_adjacent_ufos() {
        let (field, table, state) = world(super::helpers::cross(), &[0, 3]);
        let ctx = TurnContext::new(Turn(1), &field, &table, &state);
        let mut ships = vec![Ship::at(NodeId(0)), Ship::at(NodeId(3))];
        let mut ufos = vec![ufo(0, 1, 2), ufo(3, 2, 1)];

        HitchhikePolicy::default().decide(&ctx, &mut ships, &mut ufos);

        for (u, ufo) in ufos.iter().enumerate() {
            let riders = ships
                .iter()
                .filter(|s| s.mount == Mount::Riding(TransportId(u as u32)))
                .count();
            assert!(riders <= 1);
            assert_eq!(riders as u32, ufo.occupants);
        }
    }

    #[test]
    fn walking_wins_when_ride_leads_away() {
        // Star 1 is right next to the ship; the UFO heads far away.
        let pts = vec![Point::new(0, 0), Point::new(5, 0), Point::new(200, 0), Point::new(400, 0)];
        let (field, table, state) = world(pts, &[0, 2, 3]);
        let ctx = TurnContext::new(Turn(1), &field, &table, &state);
        let mut ships = vec![Ship::at(NodeId(0))];
        let mut ufos = vec![ufo(0, 2, 3)];

        let moves = HitchhikePolicy::default().decide(&ctx, &mut ships, &mut ufos);

        assert_eq!(ships[0].mount, Mount::OnFoot);
        assert_eq!(ufos[0].occupants, 0);
        assert_eq!(moves, vec![NodeId(0)]);
    }

    #[test]
    fn boarding_respects_change_line() {
        // The ship is 30 from the UFO's next stop and 60 from the nearest
        // unvisited star.  The early line for one ship is 40, for four 20.
        let pts = vec![Point::new(0, 0), Point::new(30, 0), Point::new(60, 0), Point::new(90, 0), Point::new(0, 0)];
        let (field, table, state) = world(pts, &[0, 1, 4]);
        let p = HitchhikePolicy::default();

        let ctx = TurnContext::new(Turn(1), &field, &table, &state);
        let mut ships = vec![Ship::at(NodeId(0))];
        let mut ufos = vec![ufo(4, 1, 2)];
        // Star 4 shares coordinates with star 0 but is a different star, so
        // boarding costs the walk to star 1.
        p.decide(&ctx, &mut ships, &mut ufos);
        assert!(ships[0].mount.is_riding());

        let mut ships = vec![Ship::at(NodeId(0)); 4];
        let mut ufos = vec![ufo(4, 1, 2)];
        p.decide(&ctx, &mut ships, &mut ufos);
        assert!(ships.iter().all(|s| !s.mount.is_riding()));
    }

    #[test]
    fn ride_off_when_nothing_unvisited_nearby() {
        let pts = vec![Point::new(0, 0), Point::new(10, 0), Point::new(20, 0), Point::new(500, 500)];
        let (field, table, state) = world(pts, &[0, 1, 2]);
        let ctx = TurnContext::new(Turn(5), &field, &table, &state);
        let p = HitchhikePolicy::default();
        let mut u = ufo(0, 1, 2);
        u.occupants = 1;
        let mut ufos = vec![u];
        let mut ships = vec![Ship { mount: Mount::Riding(TransportId(0)), ..Ship::at(NodeId(0)) }];

        assert!(p.should_ride_off(&ufos[0], &ctx));
        let moves = p.decide(&ctx, &mut ships, &mut ufos);
        assert_eq!(ships[0].mount, Mount::OnFoot);
        assert_eq!(ufos[0].occupants, 0);
        assert_eq!(moves, vec![NodeId(0)]);
    }

    #[test]
    fn ride_off_when_shuttling_over_visited() {
        let (field, table, state) = world(super::helpers::cross(), &[0, 1]);
        let ctx = TurnContext::new(Turn(5), &field, &table, &state);
        let p = HitchhikePolicy::default();
        // 0 → 1 → 0 with 1 already visited.
        assert!(p.should_ride_off(&ufo(0, 1, 0), &ctx));
        // 0 → 1 → 2 continues into new territory.
        assert!(!p.should_ride_off(&ufo(0, 1, 2), &ctx));
    }

    #[test]
    fn riders_follow_their_ufo() {
        let (field, table, state) = world(super::helpers::cross(), &[0]);
        let ctx = TurnContext::new(Turn(2), &field, &table, &state);
        let mut u = ufo(0, 1, 2);
        u.occupants = 1;
        let mut ufos = vec![u];
        let mut ships = vec![Ship { mount: Mount::Riding(TransportId(0)), ..Ship::at(NodeId(0)) }];
        let moves = HitchhikePolicy::default().decide(&ctx, &mut ships, &mut ufos);
        assert_eq!(moves, vec![NodeId(1)]);
        assert_eq!(ufos[0].occupants, 1);
    }
}

// ── Planner ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod planner {
    use st_core::{EngineConfig, NodeId, PollBudget, SimRng, Strategy};
    use st_spatial::{DistanceTable, StarField};

    use crate::Planner;

    #[test]
    fn plan_partitions_unvisited() {
        let field = StarField::from_points(super::helpers::grid()).unwrap();
        let table = DistanceTable::from_field(&field);
        let anchors = super::helpers::n(&[0, 11]);
        let unvisited: Vec<NodeId> = (1..11).map(NodeId).collect();
        for strategy in Strategy::ALL {
            let cfg = EngineConfig { strategy, check_interval: 8, ..EngineConfig::default() };
            let planner = Planner::new(&cfg, &field, &table);
            let out = planner.commit_with(
                &anchors,
                &unvisited,
                &mut PollBudget::new(4),
                &mut PollBudget::new(50),
                &mut SimRng::new(1),
            );
            out.plan.validate_for(&unvisited, 2).unwrap();
            assert!((out.cost - out.plan.cost(&anchors, &table)).abs() < 1e-9);
        }
    }

    #[test]
    fn zero_budget_still_plans_everything() {
        let field = StarField::from_points(super::helpers::grid()).unwrap();
        let table = DistanceTable::from_field(&field);
        let cfg = EngineConfig { planning_budget_ms: 0, ..EngineConfig::default() };
        let unvisited: Vec<NodeId> = (1..12).map(NodeId).collect();
        let out = Planner::new(&cfg, &field, &table).commit(&[NodeId(0)], &unvisited, &mut SimRng::new(3));
        out.plan.validate_for(&unvisited, 1).unwrap();
    }

    #[test]
    fn closest_ship_gets_the_warm_start() {
        let field = StarField::from_points(super::helpers::grid()).unwrap();
        let table = DistanceTable::from_field(&field);
        let cfg = EngineConfig::default();
        // Ship 1 sits at star 2, next to unvisited star 3.
        let out = Planner::new(&cfg, &field, &table).commit_with(
            &super::helpers::n(&[8, 2]),
            &super::helpers::n(&[3]),
            &mut PollBudget::new(0),
            &mut PollBudget::new(0),
            &mut SimRng::new(1),
        );
        assert!(out.plan.tours[0].is_empty());
        assert_eq!(out.plan.tours[1], vec![NodeId(3)]);
    }

    #[test]
    fn nothing_to_plan() {
        let field = StarField::from_points(super::helpers::grid()).unwrap();
        let table = DistanceTable::from_field(&field);
        let cfg = EngineConfig::default();
        let out = Planner::new(&cfg, &field, &table).commit(&super::helpers::n(&[0, 1]), &[], &mut SimRng::new(1));
        assert_eq!(out.plan.tours, vec![Vec::<NodeId>::new(), Vec::new()]);
        assert_eq!(out.cost, 0.0);
    }
}

// ── Engine ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod engine {
    use rustc_hash::FxHashSet;

    use st_core::{EngineConfig, NodeId, Point};

    use crate::{Engine, EngineError, Mode, TurnSnapshot, UfoSighting};

    use super::helpers::{config, grid, n, play};

    #[test]
    fn rejects_empty_field_and_bad_config() {
        assert!(matches!(Engine::new(config(), Vec::new()), Err(EngineError::EmptyField)));
        assert!(matches!(Engine::from_flat(config(), &[]), Err(EngineError::EmptyField)));
        assert!(matches!(Engine::from_flat(config(), &[1, 2, 3]), Err(EngineError::Spatial(_))));
        let bad = EngineConfig { turn_factor: 0, ..config() };
        assert!(matches!(Engine::new(bad, grid()), Err(EngineError::Core(_))));
    }

    #[test]
    fn one_valid_move_per_ship() {
        let mut e = Engine::new(config(), grid()).unwrap();
        let snap = TurnSnapshot::new(Vec::new(), vec![NodeId(0), NodeId(5), NodeId(11)]);
        let moves = e.make_moves(&snap);
        assert_eq!(moves.len(), 3);
        assert!(moves.iter().all(|&m| e.field().contains(m)));
        assert_eq!(e.state().remaining_unvisited, 9);
    }

    #[test]
    fn invalid_ship_position_falls_back() {
        let mut e = Engine::new(config(), grid()).unwrap();
        let snap = TurnSnapshot::from_flat(&[], &[99, -1, 3]);
        let moves = e.make_moves(&snap);
        assert_eq!(moves[0], NodeId(0));
        assert_eq!(moves[1], NodeId(0));
        assert_eq!(moves[2], NodeId(3));
    }

    #[test]
    fn no_ships_no_moves() {
        let mut e = Engine::new(config(), grid()).unwrap();
        assert!(e.make_moves(&TurnSnapshot::default()).is_empty());
    }

    #[test]
    fn visits_everything_without_ufos() {
        let mut e = Engine::new(config(), grid()).unwrap();
        let budget = e.state().initial_budget;
        let seen = play(&mut e, n(&[0, 11]), budget, |_| Vec::new());
        let visited: FxHashSet<NodeId> = seen.into_iter().collect();
        assert_eq!(visited.len(), 12);
        assert_eq!(e.mode(), Mode::Executing);
    }

    #[test]
    fn mode_switch_is_monotone_and_plan_is_a_partition() {
        let mut e = Engine::new(config(), grid()).unwrap();
        let mut ships = n(&[0, 11]);
        let mut switched_at = None;
        for t in 0..e.state().initial_budget {
            ships = e.make_moves(&TurnSnapshot::new(Vec::new(), ships));
            match (e.mode(), switched_at) {
                (Mode::Executing, None) => switched_at = Some(t),
                (Mode::Hitchhiking, Some(_)) => panic!("mode went back at turn {t}"),
                _ => {}
            }
        }
        assert!(switched_at.is_some());
        let outcome = e.outcome().unwrap();
        outcome.plan.validate_for(&outcome.unvisited, 2).unwrap();
        assert!(e.plan_cost().unwrap() > 0.0);
    }

    #[test]
    fn hitchhiking_follows_a_circulating_ufo() {
        // One UFO loops 0 → 1 → 2 → … → 11 → 0 along the grid.
        let mut e = Engine::new(config(), grid()).unwrap();
        let loop_at = |t: u32| {
            let c = t % 12;
            vec![UfoSighting::new(NodeId(c), NodeId((c + 1) % 12), NodeId((c + 2) % 12))]
        };
        let mut ships = n(&[0]);
        let first = e.make_moves(&TurnSnapshot::new(loop_at(0), ships.clone()));
        assert_eq!(first, n(&[1]), "ship sharing the UFO's star rides along");
        ships = first;
        let second = e.make_moves(&TurnSnapshot::new(loop_at(1), ships));
        assert_eq!(second, n(&[2]));
        assert_eq!(e.ufos()[0].visits, 1);
        assert_eq!(e.ufos()[0].distance, 50.0);
        assert_eq!(e.ufos()[0].occupants, 1);
    }

    #[test]
    fn stranded_rider_is_dismounted() {
        let mut e = Engine::new(config(), grid()).unwrap();
        let ufo = |c: u32| vec![UfoSighting::new(NodeId(c), NodeId(c + 1), NodeId(c + 2))];
        e.make_moves(&TurnSnapshot::new(ufo(0), n(&[0])));
        assert!(e.ships()[0].mount.is_riding());
        // The ship did not arrive with the UFO.
        e.make_moves(&TurnSnapshot::new(ufo(1), n(&[6])));
        assert!(e.ufos()[0].occupants <= 1);
        let riding = e.ships()[0].mount.is_riding();
        assert_eq!(riding, e.ufos()[0].occupants == 1);
    }

    #[test]
    fn vanished_ufo_releases_riders() {
        let mut e = Engine::new(config(), grid()).unwrap();
        let ufo = vec![UfoSighting::new(NodeId(0), NodeId(1), NodeId(2))];
        e.make_moves(&TurnSnapshot::new(ufo, n(&[0])));
        assert!(e.ships()[0].mount.is_riding());
        e.make_moves(&TurnSnapshot::new(Vec::new(), n(&[1])));
        assert!(!e.ships()[0].mount.is_riding());
        assert!(e.ufos().is_empty());
    }

    #[test]
    fn single_star_field() {
        let mut e = Engine::new(config(), vec![Point::new(5, 5)]).unwrap();
        let moves = e.make_moves(&TurnSnapshot::new(Vec::new(), n(&[0])));
        assert_eq!(moves, n(&[0]));
        assert_eq!(e.state().remaining_unvisited, 0);
        assert_eq!(e.mode(), Mode::Hitchhiking);
    }
}
