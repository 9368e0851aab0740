//! Random scenario generation.

use rustc_hash::FxHashSet;

use st_core::{NodeId, Point, SimRng};
use st_engine::UfoSighting;

use crate::{SimError, SimResult};

/// Parameters of a synthetic game.
///
/// Loaded from JSON by the application crate (with the `serde` feature);
/// missing fields take their defaults.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScenarioConfig {
    pub star_count: usize,
    pub ship_count: usize,
    pub ufo_count: usize,
    /// Seats per UFO.
    pub ufo_capacity: u32,
    /// A UFO picks its next stop as the nearest of this many random stars.
    pub ufo_candidates: usize,
    /// Stars are placed in `[0, field_size)²`.
    pub field_size: i32,
    /// Turn limit is `turn_factor × star_count`.
    pub turn_factor: u32,
    pub seed: u64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            star_count:     200,
            ship_count:     3,
            ufo_count:      4,
            ufo_capacity:   1,
            ufo_candidates: 3,
            field_size:     1024,
            turn_factor:    4,
            seed:           1,
        }
    }
}

impl ScenarioConfig {
    pub fn validate(&self) -> SimResult<()> {
        if self.star_count == 0 {
            return Err(SimError::Config("star_count must be at least 1".into()));
        }
        if self.ship_count == 0 {
            return Err(SimError::Config("ship_count must be at least 1".into()));
        }
        if self.ufo_candidates == 0 {
            return Err(SimError::Config("ufo_candidates must be at least 1".into()));
        }
        if self.turn_factor == 0 {
            return Err(SimError::Config("turn_factor must be at least 1".into()));
        }
        let cells = (self.field_size.max(0) as u64).pow(2);
        if cells < self.star_count as u64 {
            return Err(SimError::Config(format!(
                "{} distinct stars do not fit in a {}×{} field",
                self.star_count, self.field_size, self.field_size
            )));
        }
        Ok(())
    }

    /// Turn limit for this scenario.
    #[inline]
    pub fn turn_limit(&self) -> u32 {
        (self.star_count as u64 * self.turn_factor as u64).min(u32::MAX as u64) as u32
    }
}

/// A generated game: star positions and the initial fleet.
#[derive(Clone, Debug)]
pub struct Scenario {
    pub config: ScenarioConfig,
    pub stars: Vec<Point>,
    /// Starting star of each ship.
    pub ships: Vec<NodeId>,
    pub ufos: Vec<UfoSighting>,
}

impl Scenario {
    /// Place distinct stars uniformly at random, then drop ships and UFOs on
    /// random stars.
    pub fn generate(config: ScenarioConfig) -> SimResult<Scenario> {
        config.validate()?;
        let mut rng = SimRng::new(config.seed);

        let mut taken: FxHashSet<Point> = FxHashSet::default();
        let mut stars = Vec::with_capacity(config.star_count);
        while stars.len() < config.star_count {
            let p = Point::new(
                rng.gen_range(0..config.field_size),
                rng.gen_range(0..config.field_size),
            );
            if taken.insert(p) {
                stars.push(p);
            }
        }

        let n = stars.len() as u32;
        let ships = (0..config.ship_count).map(|_| NodeId(rng.gen_range(0..n))).collect();

        let mut ufo_rng = rng.child(1);
        let ufos = (0..config.ufo_count)
            .map(|_| {
                let current = NodeId(ufo_rng.gen_range(0..n));
                let next = next_stop(&stars, current, config.ufo_candidates, &mut ufo_rng);
                let next_next = next_stop(&stars, next, config.ufo_candidates, &mut ufo_rng);
                UfoSighting::new(current, next, next_next)
            })
            .collect();

        Ok(Scenario { config, stars, ships, ufos })
    }
}

/// The nearest of `candidates` random stars other than `from`.  With a
/// single star the UFO stays put.
pub(crate) fn next_stop(stars: &[Point], from: NodeId, candidates: usize, rng: &mut SimRng) -> NodeId {
    let n = stars.len() as u32;
    if n < 2 {
        return from;
    }
    let here = stars[from.index()];
    let mut best: Option<(i64, NodeId)> = None;
    for _ in 0..candidates.max(1) {
        // Uniform over every star except `from`.
        let mut pick = rng.gen_range(0..n - 1);
        if pick >= from.0 {
            pick += 1;
        }
        let d = here.distance_sq(stars[pick as usize]);
        if best.is_none_or(|(bd, _)| d < bd) {
            best = Some((d, NodeId(pick)));
        }
    }
    best.map_or(from, |(_, id)| id)
}
