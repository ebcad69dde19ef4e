//! Goal-biased random sampling

use rand::Rng;
use rand_distr::{Distribution, Uniform};

use crate::common::{Point2D, RandArea};

/// Draws candidate points for tree expansion
#[derive(Debug, Clone)]
pub struct Sampler {
    goal: Point2D,
    goal_sample_rate: u32,
    coord: Uniform<f64>,
}

impl Sampler {
    /// `goal_sample_rate` is a percentage in `0..=100`; `rand_area` must
    /// satisfy `min <= max`.
    pub fn new(goal: Point2D, rand_area: RandArea, goal_sample_rate: u32) -> Self {
        Sampler {
            goal,
            goal_sample_rate,
            coord: Uniform::new_inclusive(rand_area.min, rand_area.max),
        }
    }

    /// Return the goal with probability `goal_sample_rate / 100`, otherwise a
    /// point drawn uniformly from the sampling square.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Point2D {
        if rng.gen_range(0..100) < self.goal_sample_rate {
            self.goal
        } else {
            Point2D::new(self.coord.sample(rng), self.coord.sample(rng))
        }
    }
}
