//! Genetic operators for flight plans.
//!
//! - [`random_genome`]: uniform bases and actions, no feasibility check
//! - [`repair`]: replaces moves that leave the grid with `Stay`
//! - [`mutate`]: per-gene resampling restricted to in-bounds moves
//! - [`crossover`]: single temporal cut shared by all drones
//!
//! Repair and mutation only reason about grid bounds. Obstacles and
//! drone-to-drone collisions are left to the simulator's penalty.

use super::genome::Genome;
use crate::grid::{Action, Coord, Grid};
use rand::Rng;

/// Creates a plan with uniformly drawn bases and actions.
///
/// Bases are drawn first (one per drone), then actions drone by drone, tick
/// by tick.
///
/// # Panics
/// Panics if the grid has no bases.
pub fn random_genome<R: Rng>(drones: usize, ticks: usize, grid: &Grid, rng: &mut R) -> Genome {
    let base_ids: Vec<usize> = (0..drones)
        .map(|_| rng.random_range(0..grid.num_bases()))
        .collect();
    let actions: Vec<Action> = (0..drones * ticks)
        .map(|_| Action::ALL[rng.random_range(0..Action::COUNT)])
        .collect();
    Genome::from_flat(base_ids, actions, ticks)
}

/// Overwrites every move that would leave the grid with [`Action::Stay`].
///
/// Each drone is walked from its base; a rejected move leaves the drone in
/// place for the next tick. Idempotent. Returns the number of genes
/// rewritten.
pub fn repair(genome: &mut Genome, grid: &Grid) -> usize {
    let mut fixed = 0;
    for drone in 0..genome.drones() {
        let mut pos = grid.base(genome.base_id(drone));
        for action in genome.drone_actions_mut(drone) {
            let next = pos.step(*action);
            if grid.in_bounds(next) {
                pos = next;
            } else {
                *action = Action::Stay;
                fixed += 1;
            }
        }
    }
    fixed
}

/// Actions that keep a drone at `pos` inside the grid.
///
/// `Stay` is always first; the rest follow in the order N, NE, NW, E, SE, S,
/// SW, W.
pub fn valid_actions(pos: Coord, grid: &Grid) -> Vec<Action> {
    let mut out = Vec::with_capacity(Action::COUNT);
    push_valid_actions(pos, grid, &mut out);
    out
}

fn push_valid_actions(pos: Coord, grid: &Grid, out: &mut Vec<Action>) {
    let up = pos.row > 0;
    let down = pos.row < grid.rows() - 1;
    let left = pos.col > 0;
    let right = pos.col < grid.cols() - 1;

    out.push(Action::Stay);
    if up {
        out.push(Action::N);
        if right {
            out.push(Action::NE);
        }
        if left {
            out.push(Action::NW);
        }
    }
    if right {
        out.push(Action::E);
        if down {
            out.push(Action::SE);
        }
    }
    if down {
        out.push(Action::S);
        if left {
            out.push(Action::SW);
        }
    }
    if left {
        out.push(Action::W);
    }
}

/// Resamples each gene with probability `rate` from the moves that keep the
/// drone inside the grid at that point of its route.
///
/// Positions are tracked along the (partially mutated) route so every later
/// gene sees the trajectory produced by the genes before it. `rate` is
/// clamped to `[0, 1]`; a NaN rate mutates nothing.
pub fn mutate<R: Rng>(genome: &mut Genome, grid: &Grid, rate: f64, rng: &mut R) {
    let rate = if rate.is_nan() { 0.0 } else { rate.clamp(0.0, 1.0) };
    let mut choices = Vec::with_capacity(Action::COUNT);
    for drone in 0..genome.drones() {
        let mut pos = grid.base(genome.base_id(drone));
        for action in genome.drone_actions_mut(drone) {
            if rng.random_bool(rate) {
                choices.clear();
                push_valid_actions(pos, grid, &mut choices);
                *action = choices[rng.random_range(0..choices.len())];
            }
            pos = pos.step(*action);
        }
    }
    genome.invalidate();
}

/// Single-point temporal crossover.
///
/// The child takes every base from `parent1`. A cut tick `c` is drawn
/// uniformly from `[1, T - 2]`; for every drone, ticks `[0, c)` come from
/// `parent1` and ticks `[c, T)` from `parent2`.
///
/// # Panics
/// Panics if the horizon is shorter than 3 ticks or the parents differ in
/// shape.
pub fn crossover<R: Rng>(parent1: &Genome, parent2: &Genome, rng: &mut R) -> Genome {
    let ticks = parent1.ticks();
    assert!(
        ticks >= 3,
        "crossover requires a horizon of at least 3 ticks, got {ticks}"
    );
    assert!(
        parent2.ticks() == ticks && parent2.drones() == parent1.drones(),
        "parents must have the same shape"
    );

    let cut = rng.random_range(1..=ticks - 2);
    let mut child = parent1.clone();
    for drone in 0..child.drones() {
        child.drone_actions_mut(drone)[cut..].copy_from_slice(&parent2.drone_actions(drone)[cut..]);
    }
    child.invalidate();
    child
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patrol::simulator::{evaluate, FlightSimulator, SimState, Violation};
    use crate::random::create_rng;
    use proptest::prelude::*;
    use Action::*;

    fn grid_3x3() -> Grid {
        Grid::new(3, 3)
            .with_base(Coord::new(0, 0))
            .with_base(Coord::new(2, 2))
    }

    fn in_bounds_everywhere(genome: &Genome, grid: &Grid) -> bool {
        (0..genome.drones()).all(|d| genome.trajectory(d, grid).all(|c| grid.in_bounds(c)))
    }

    // ---- random_genome ----

    #[test]
    fn test_random_genome_shape() {
        let grid = grid_3x3();
        let mut rng = create_rng(1);
        let g = random_genome(4, 12, &grid, &mut rng);
        assert_eq!(g.drones(), 4);
        assert_eq!(g.ticks(), 12);
        assert!(g.base_ids().iter().all(|&b| b < 2));
        assert!(g.fitness().is_infinite());
    }

    #[test]
    fn test_random_genome_uses_all_actions() {
        let grid = grid_3x3();
        let mut rng = create_rng(5);
        let g = random_genome(3, 200, &grid, &mut rng);
        let mut seen = [false; Action::COUNT];
        for d in 0..3 {
            for &a in g.drone_actions(d) {
                seen[a.code() as usize] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    // ---- repair ----

    #[test]
    fn test_repair_replaces_exits_with_stay() {
        let grid = grid_3x3();
        // From (0,0): N exits, E ok -> (0,1), NE exits, S ok -> (1,1).
        let mut g = Genome::from_actions(vec![0], &[vec![N, E, NE, S]]);
        assert_eq!(repair(&mut g, &grid), 2);
        assert_eq!(g.drone_actions(0), &[Stay, E, Stay, S]);
    }

    #[test]
    fn test_repair_keeps_position_after_rejection() {
        let grid = grid_3x3();
        // Base (2,2): SE exits and the drone stays; W then moves to (2,1).
        let mut g = Genome::from_actions(vec![1], &[vec![SE, W, W, W]]);
        repair(&mut g, &grid);
        assert_eq!(g.drone_actions(0), &[Stay, W, W, Stay]);
    }

    #[test]
    fn test_repair_ignores_obstacles_and_collisions() {
        let grid = Grid::new(1, 3)
            .with_obstacle(Coord::new(0, 1))
            .with_base(Coord::new(0, 0));
        let mut g = Genome::from_actions(vec![0], &[vec![E, Stay, Stay]]);
        assert_eq!(repair(&mut g, &grid), 0);
        let mut sim = FlightSimulator::new(&g, &grid);
        assert!(matches!(
            sim.step(),
            SimState::Failed {
                violation: Violation::Obstacle,
                ..
            }
        ));
    }

    // ---- valid_actions ----

    #[test]
    fn test_valid_actions_corner_and_center() {
        let grid = grid_3x3();
        assert_eq!(valid_actions(Coord::new(0, 0), &grid), vec![Stay, E, SE, S]);
        assert_eq!(valid_actions(Coord::new(2, 2), &grid), vec![Stay, N, NW, W]);
        assert_eq!(
            valid_actions(Coord::new(1, 1), &grid),
            vec![Stay, N, NE, NW, E, SE, S, SW, W]
        );
    }

    #[test]
    fn test_valid_actions_single_cell_grid() {
        let grid = Grid::new(1, 1).with_base(Coord::new(0, 0));
        assert_eq!(valid_actions(Coord::new(0, 0), &grid), vec![Stay]);
    }

    // ---- mutate ----

    #[test]
    fn test_mutate_rate_zero_is_identity() {
        let grid = grid_3x3();
        let mut rng = create_rng(9);
        let original = random_genome(2, 10, &grid, &mut rng);
        let mut g = original.clone();
        mutate(&mut g, &grid, 0.0, &mut rng);
        assert_eq!(g.base_ids(), original.base_ids());
        for d in 0..2 {
            assert_eq!(g.drone_actions(d), original.drone_actions(d));
        }
    }

    #[test]
    fn test_mutate_out_of_range_rates() {
        let grid = grid_3x3();
        let mut rng = create_rng(5);
        let original = random_genome(2, 8, &grid, &mut rng);

        let mut g = original.clone();
        mutate(&mut g, &grid, f64::NAN, &mut rng);
        assert_eq!(g.drone_actions(0), original.drone_actions(0));
        assert_eq!(g.drone_actions(1), original.drone_actions(1));

        let mut g = original.clone();
        mutate(&mut g, &grid, -0.5, &mut rng);
        assert_eq!(g.drone_actions(0), original.drone_actions(0));

        let mut g = original;
        mutate(&mut g, &grid, 7.0, &mut rng);
        assert!(in_bounds_everywhere(&g, &grid));
    }

    #[test]
    fn test_mutate_rate_one_stays_in_bounds() {
        let grid = Grid::new(2, 5).with_base(Coord::new(0, 4));
        let mut rng = create_rng(21);
        for _ in 0..50 {
            let mut g = random_genome(3, 15, &grid, &mut rng);
            mutate(&mut g, &grid, 1.0, &mut rng);
            assert!(in_bounds_everywhere(&g, &grid));
        }
    }

    #[test]
    fn test_mutate_clears_evaluation() {
        let grid = grid_3x3();
        let mut g = Genome::new(vec![0], 4);
        g.set_evaluation(evaluate(&g, &grid));
        assert!(g.is_valid());
        mutate(&mut g, &grid, 0.5, &mut create_rng(2));
        assert!(!g.is_valid());
        assert!(g.fitness().is_infinite());
    }

    // ---- crossover ----

    #[test]
    fn test_crossover_splices_all_drones_at_one_cut() {
        let p1 = Genome::from_actions(vec![0, 1], &[vec![N; 6], vec![E; 6]]);
        let p2 = Genome::from_actions(vec![1, 0], &[vec![S; 6], vec![W; 6]]);
        let mut rng = create_rng(4);
        for _ in 0..50 {
            let child = crossover(&p1, &p2, &mut rng);
            assert_eq!(child.base_ids(), &[0, 1]);
            let cut = child.drone_actions(0).iter().position(|&a| a == S).unwrap();
            assert!((1..=4).contains(&cut));
            assert!(child.drone_actions(0)[cut..].iter().all(|&a| a == S));
            assert_eq!(
                child.drone_actions(1).iter().position(|&a| a == W),
                Some(cut)
            );
        }
    }

    #[test]
    fn test_crossover_minimum_horizon() {
        let p1 = Genome::from_actions(vec![0], &[vec![N; 3]]);
        let p2 = Genome::from_actions(vec![0], &[vec![S; 3]]);
        let child = crossover(&p1, &p2, &mut create_rng(0));
        assert_eq!(child.drone_actions(0), &[N, S, S]);
    }

    #[test]
    #[should_panic(expected = "at least 3 ticks")]
    fn test_crossover_short_horizon_panics() {
        let p = Genome::new(vec![0], 2);
        crossover(&p, &p, &mut create_rng(0));
    }

    // ---- properties ----

    fn arb_case() -> impl Strategy<Value = (Grid, Genome, u64)> {
        (1i32..6, 1i32..6, 1usize..4, 3usize..12, any::<u64>()).prop_flat_map(
            |(rows, cols, drones, ticks, seed)| {
                let bases = prop::collection::vec((0..rows, 0..cols), 1..3);
                let base_ids = prop::collection::vec(any::<prop::sample::Index>(), drones);
                let codes = prop::collection::vec(0u8..9, drones * ticks);
                (bases, base_ids, codes).prop_map(move |(bases, base_ids, codes)| {
                    let mut grid = Grid::new(rows, cols);
                    for (r, c) in bases.iter().copied() {
                        grid.add_base(Coord::new(r, c));
                    }
                    let base_ids = base_ids.iter().map(|i| i.index(bases.len())).collect();
                    let actions = codes
                        .iter()
                        .map(|&c| Action::from_code(c).unwrap())
                        .collect();
                    (grid, Genome::from_flat(base_ids, actions, ticks), seed)
                })
            },
        )
    }

    proptest! {
        #[test]
        fn prop_repair_is_idempotent((grid, genome, _seed) in arb_case()) {
            let mut once = genome.clone();
            repair(&mut once, &grid);
            let mut twice = once.clone();
            prop_assert_eq!(repair(&mut twice, &grid), 0);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_repaired_plans_never_leave_the_grid((grid, mut genome, _seed) in arb_case()) {
            repair(&mut genome, &grid);
            prop_assert!(in_bounds_everywhere(&genome, &grid));
            let mut sim = FlightSimulator::new(&genome, &grid);
            while sim.step() == SimState::Running {}
            let out_of_bounds = matches!(
                sim.state(),
                SimState::Failed { violation: Violation::OutOfBounds, .. }
            );
            prop_assert!(!out_of_bounds);
        }

        #[test]
        fn prop_mutated_genes_are_in_bounds_moves(
            (grid, mut genome, seed) in arb_case(),
            rate in 0.0f64..=1.0,
        ) {
            repair(&mut genome, &grid);
            let before = genome.clone();
            mutate(&mut genome, &grid, rate, &mut create_rng(seed));
            for d in 0..genome.drones() {
                let path: Vec<Coord> = genome.trajectory(d, &grid).collect();
                for t in 0..genome.ticks() {
                    // Unmutated genes after a mutated one may now exit the
                    // grid; only resampled genes are guaranteed in-bounds.
                    if genome.action(d, t) != before.action(d, t) && grid.in_bounds(path[t]) {
                        prop_assert!(grid.in_bounds(path[t + 1]));
                    }
                }
            }
            // The loop always repairs after mutating.
            repair(&mut genome, &grid);
            prop_assert!(in_bounds_everywhere(&genome, &grid));
        }

        #[test]
        fn prop_crossover_is_prefix_plus_suffix(
            (grid, p1, seed) in arb_case(),
        ) {
            let mut p2 = p1.clone();
            mutate(&mut p2, &grid, 0.7, &mut create_rng(seed ^ 0x5eed));
            let child = crossover(&p1, &p2, &mut create_rng(seed));
            prop_assert_eq!(child.base_ids(), p1.base_ids());
            let t = p1.ticks();
            let ok = (1..=t - 2).any(|cut| {
                (0..p1.drones()).all(|d| {
                    child.drone_actions(d)[..cut] == p1.drone_actions(d)[..cut]
                        && child.drone_actions(d)[cut..] == p2.drone_actions(d)[cut..]
                })
            });
            prop_assert!(ok);
        }

        #[test]
        fn prop_evaluate_is_deterministic((grid, genome, _seed) in arb_case()) {
            prop_assert_eq!(evaluate(&genome, &grid), evaluate(&genome, &grid));
        }
    }
}
