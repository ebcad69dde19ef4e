//! RRT planner: configuration and the sample / nearest / steer / validate loop

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::common::{
    AreaBounds, CircleObstacle, NoopObserver, Path2D, PathPlanner, PlannerError, PlannerResult,
    PlanningObserver, Point2D, RandArea, SamplingBasedPlanner, Visualizable,
};
use crate::utils::Visualizer;

use super::node::Tree;
use super::sampler::Sampler;
use super::steer::steer;
use super::validator::{is_collision_free, is_valid};

/// Configuration for RRT planner
#[derive(Debug, Clone)]
pub struct RRTConfig {
    /// Expansion distance per step
    pub expand_dis: f64,
    /// Path resolution for collision checking
    pub path_resolution: f64,
    /// Goal sampling rate (0-100)
    pub goal_sample_rate: u32,
    /// Maximum iterations
    pub max_iter: usize,
    /// Nodes outside this rectangle are rejected
    pub play_area: Option<AreaBounds>,
    /// Seed for `planning()`; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for RRTConfig {
    fn default() -> Self {
        Self {
            expand_dis: 3.0,
            path_resolution: 0.5,
            goal_sample_rate: 5,
            max_iter: 500,
            play_area: None,
            seed: None,
        }
    }
}

impl RRTConfig {
    pub fn validate(&self) -> PlannerResult<()> {
        if !self.expand_dis.is_finite() || self.expand_dis <= 0.0 {
            return Err(invalid(format!("expand_dis must be > 0, got {}", self.expand_dis)));
        }
        if !self.path_resolution.is_finite() || self.path_resolution <= 0.0 {
            return Err(invalid(format!(
                "path_resolution must be > 0, got {}",
                self.path_resolution
            )));
        }
        if self.path_resolution > self.expand_dis {
            return Err(invalid(format!(
                "path_resolution ({}) must not exceed expand_dis ({})",
                self.path_resolution, self.expand_dis
            )));
        }
        if self.goal_sample_rate > 100 {
            return Err(invalid(format!(
                "goal_sample_rate must be within 0..=100, got {}",
                self.goal_sample_rate
            )));
        }
        if self.max_iter == 0 {
            return Err(invalid("max_iter must be > 0".to_string()));
        }
        if let Some(area) = &self.play_area {
            let finite = [area.xmin, area.xmax, area.ymin, area.ymax]
                .iter()
                .all(|v| v.is_finite());
            if !finite || area.xmin > area.xmax || area.ymin > area.ymax {
                return Err(invalid(format!("malformed play area {:?}", area)));
            }
        }
        Ok(())
    }
}

fn invalid(msg: String) -> PlannerError {
    PlannerError::InvalidParameter(msg)
}

/// RRT path planner
#[derive(Debug, Clone)]
pub struct RRTPlanner {
    config: RRTConfig,
    obstacles: Vec<CircleObstacle>,
    rand_area: RandArea,
    start: Point2D,
    goal: Point2D,
    tree: Tree,
    iterations: usize,
}

impl RRTPlanner {
    /// Create a new RRT planner, validating every parameter
    pub fn new(
        start: Point2D,
        goal: Point2D,
        obstacles: Vec<CircleObstacle>,
        rand_area: RandArea,
        config: RRTConfig,
    ) -> PlannerResult<Self> {
        config.validate()?;

        if !start.is_finite() || !goal.is_finite() {
            return Err(invalid(format!(
                "start {:?} and goal {:?} must be finite",
                start, goal
            )));
        }
        if !rand_area.min.is_finite()
            || !rand_area.max.is_finite()
            || rand_area.min > rand_area.max
            || !(rand_area.max - rand_area.min).is_finite()
        {
            return Err(invalid(format!("malformed sampling bounds {:?}", rand_area)));
        }
        if let Some(obs) = obstacles
            .iter()
            .find(|o| !o.center().is_finite() || !o.radius.is_finite() || o.radius < 0.0)
        {
            return Err(invalid(format!("malformed obstacle {:?}", obs)));
        }

        Ok(RRTPlanner {
            config,
            obstacles,
            rand_area,
            start,
            goal,
            tree: Tree::new(start),
            iterations: 0,
        })
    }

    /// Create from plain arrays and `(x, y, radius)` tuples
    pub fn from_obstacles(
        start: [f64; 2],
        goal: [f64; 2],
        obstacle_list: Vec<(f64, f64, f64)>,
        rand_area: [f64; 2],
        config: RRTConfig,
    ) -> PlannerResult<Self> {
        let obstacles = obstacle_list.into_iter().map(CircleObstacle::from).collect();
        Self::new(start.into(), goal.into(), obstacles, rand_area.into(), config)
    }

    /// Plan with an RNG seeded from `config.seed`.
    ///
    /// Returns `None` when `max_iter` iterations pass without reaching the goal.
    pub fn planning(&mut self) -> Option<Path2D> {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.planning_with_rng(&mut rng)
    }

    /// Plan using the supplied randomness source
    pub fn planning_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Path2D> {
        self.planning_with_observer(rng, &mut NoopObserver)
    }

    /// Plan using the supplied randomness source, reporting every iteration to `observer`
    pub fn planning_with_observer<R, O>(&mut self, rng: &mut R, observer: &mut O) -> Option<Path2D>
    where
        R: Rng + ?Sized,
        O: PlanningObserver + ?Sized,
    {
        let sampler = Sampler::new(self.goal, self.rand_area, self.config.goal_sample_rate);
        let expand_dis = self.config.expand_dis;
        let path_resolution = self.config.path_resolution;

        self.tree = Tree::new(self.start);
        self.iterations = 0;

        debug!(
            "RRT planning from {:?} to {:?} with {} obstacles, max_iter {}",
            self.start,
            self.goal,
            self.obstacles.len(),
            self.config.max_iter
        );

        for i in 0..self.config.max_iter {
            self.iterations = i + 1;

            let rnd = sampler.sample(rng);
            let nearest_ind = self.tree.nearest_index(&rnd);
            let new_node = steer(&self.tree.nodes()[nearest_ind], nearest_ind, &rnd, expand_dis, path_resolution);

            if is_valid(&new_node, &self.obstacles, self.config.play_area.as_ref()) {
                self.tree.push(new_node);
            } else {
                trace!("iteration {}: rejected node at {:?}", i, new_node.position);
            }

            observer.on_iteration(i, rnd, &self.tree);

            let last_index = self.tree.last_index();
            let last = self.tree.last();
            if self.calc_dist_to_goal(&last.position) <= expand_dis {
                let final_node = steer(last, last_index, &self.goal, expand_dis, path_resolution);
                if is_collision_free(Some(&final_node), &self.obstacles) {
                    let path = self.tree.extract_path(last_index, self.goal);
                    debug!(
                        "RRT found path after {} iterations: {} nodes, {} waypoints",
                        self.iterations,
                        self.tree.len(),
                        path.len()
                    );
                    return Some(path);
                }
            }
        }

        debug!(
            "RRT could not find path within {} iterations ({} nodes)",
            self.config.max_iter,
            self.tree.len()
        );
        None
    }

    fn calc_dist_to_goal(&self, point: &Point2D) -> f64 {
        point.distance(&self.goal)
    }

    /// Tree grown by the last planning call
    pub fn get_tree(&self) -> &Tree {
        &self.tree
    }

    /// Iterations run by the last planning call
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn get_obstacles(&self) -> &[CircleObstacle] {
        &self.obstacles
    }

    pub fn config(&self) -> &RRTConfig {
        &self.config
    }

    pub fn start(&self) -> Point2D {
        self.start
    }

    pub fn goal(&self) -> Point2D {
        self.goal
    }
}

impl PathPlanner for RRTPlanner {
    /// Plan on a fresh copy of this planner with the given endpoints.
    ///
    /// Exhaustion is reported as `PlannerError::PlanningError`.
    fn plan(&self, start: Point2D, goal: Point2D) -> PlannerResult<Path2D> {
        let mut planner = RRTPlanner::new(
            start,
            goal,
            self.obstacles.clone(),
            self.rand_area,
            self.config.clone(),
        )?;

        planner.planning().ok_or_else(|| {
            PlannerError::PlanningError(format!(
                "RRT: Cannot find path within {} iterations",
                planner.config.max_iter
            ))
        })
    }
}

impl SamplingBasedPlanner for RRTPlanner {
    fn tree(&self) -> &Tree {
        &self.tree
    }

    fn set_max_iterations(&mut self, max_iter: usize) -> PlannerResult<()> {
        let config = RRTConfig {
            max_iter,
            ..self.config.clone()
        };
        config.validate()?;
        self.config = config;
        Ok(())
    }
}

impl Visualizable for RRTPlanner {
    fn visualize(&self, vis: &mut Visualizer) {
        vis.plot_circle_obstacles(&self.obstacles);
        if let Some(area) = &self.config.play_area {
            vis.plot_area_bounds(area);
        }
        vis.plot_rrt_tree(&self.tree);
        vis.plot_start(self.start);
        vis.plot_goal(self.goal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    fn line_config(goal_sample_rate: u32, max_iter: usize) -> RRTConfig {
        RRTConfig {
            expand_dis: 1.0,
            path_resolution: 1.0,
            goal_sample_rate,
            max_iter,
            ..Default::default()
        }
    }

    fn create_test_planner(seed: u64) -> RRTPlanner {
        let obstacles = vec![
            CircleObstacle::new(5.0, 5.0, 1.0),
            CircleObstacle::new(3.0, 6.0, 2.0),
            CircleObstacle::new(3.0, 8.0, 2.0),
            CircleObstacle::new(3.0, 10.0, 2.0),
            CircleObstacle::new(7.0, 5.0, 2.0),
            CircleObstacle::new(9.0, 5.0, 2.0),
            CircleObstacle::new(8.0, 10.0, 1.0),
        ];
        let config = RRTConfig {
            max_iter: 2000,
            seed: Some(seed),
            ..Default::default()
        };
        RRTPlanner::new(
            Point2D::new(0.0, 0.0),
            Point2D::new(6.0, 10.0),
            obstacles,
            RandArea::new(-2.0, 15.0),
            config,
        )
        .unwrap()
    }

    // Re-discretize every waypoint pair the same way edges are checked
    fn assert_collision_free(path: &Path2D, obstacles: &[CircleObstacle], resolution: f64) {
        for (a, b) in path.points.iter().tuple_windows() {
            let (d, theta) = a.distance_and_angle(b);
            let n = (d / resolution).floor() as usize;
            let steps = (0..=n)
                .map(|k| {
                    let s = k as f64 * resolution;
                    Point2D::new(a.x + s * theta.cos(), a.y + s * theta.sin())
                })
                .chain(std::iter::once(*b));
            for p in steps {
                for obs in obstacles {
                    assert!(
                        obs.center().distance(&p) > obs.radius,
                        "{:?} hits {:?}",
                        p,
                        obs
                    );
                }
            }
        }
    }

    #[test]
    fn test_rrt_config_default() {
        let config = RRTConfig::default();
        assert_eq!(config.expand_dis, 3.0);
        assert_eq!(config.path_resolution, 0.5);
        assert_eq!(config.goal_sample_rate, 5);
        assert_eq!(config.max_iter, 500);
        assert!(config.play_area.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let bad = [
            RRTConfig { expand_dis: 0.0, ..Default::default() },
            RRTConfig { expand_dis: f64::NAN, ..Default::default() },
            RRTConfig { path_resolution: 0.0, ..Default::default() },
            RRTConfig { path_resolution: 3.5, ..Default::default() },
            RRTConfig { goal_sample_rate: 101, ..Default::default() },
            RRTConfig { max_iter: 0, ..Default::default() },
            RRTConfig {
                play_area: Some(AreaBounds::new(1.0, 0.0, 0.0, 1.0)),
                ..Default::default()
            },
        ];
        for config in bad.iter() {
            let result = RRTPlanner::new(
                Point2D::origin(),
                Point2D::new(1.0, 1.0),
                Vec::new(),
                RandArea::new(0.0, 1.0),
                config.clone(),
            );
            assert!(
                matches!(result, Err(PlannerError::InvalidParameter(_))),
                "accepted {:?}",
                config
            );
        }
    }

    #[test]
    fn test_invalid_geometry_rejected() {
        let negative_radius = RRTPlanner::from_obstacles(
            [0.0, 0.0],
            [1.0, 1.0],
            vec![(0.5, 0.5, -1.0)],
            [0.0, 1.0],
            RRTConfig::default(),
        );
        assert!(matches!(negative_radius, Err(PlannerError::InvalidParameter(_))));

        let inverted_area = RRTPlanner::from_obstacles(
            [0.0, 0.0],
            [1.0, 1.0],
            Vec::new(),
            [2.0, 1.0],
            RRTConfig::default(),
        );
        assert!(matches!(inverted_area, Err(PlannerError::InvalidParameter(_))));
    }

    #[test]
    fn test_overflowing_sampling_span_rejected() {
        let result = RRTPlanner::from_obstacles(
            [0.0, 0.0],
            [1.0, 1.0],
            Vec::new(),
            [-1e308, 1e308],
            RRTConfig::default(),
        );
        assert!(matches!(result, Err(PlannerError::InvalidParameter(_))));

        let wide = RRTPlanner::from_obstacles(
            [0.0, 0.0],
            [1.0, 1.0],
            Vec::new(),
            [-1e300, 1e300],
            RRTConfig { goal_sample_rate: 0, max_iter: 3, seed: Some(0), ..Default::default() },
        );
        assert!(wide.is_ok());
        let mut wide = wide.unwrap();
        wide.planning();
        assert!(wide.iterations() >= 1 && wide.iterations() <= 3);
        assert!(wide.get_tree().nodes().iter().all(|n| n.position.is_finite()));
    }

    #[test]
    fn test_trivial_success() {
        let mut planner = RRTPlanner::from_obstacles(
            [0.0, 0.0],
            [5.0, 0.0],
            Vec::new(),
            [0.0, 5.0],
            line_config(100, 10),
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        let path = planner.planning_with_rng(&mut rng).expect("path");
        assert!(planner.iterations() <= 6);
        assert_eq!(path.first(), Some(&Point2D::new(0.0, 0.0)));
        assert_eq!(path.last(), Some(&Point2D::new(5.0, 0.0)));
        for (a, b) in path.points.iter().tuple_windows() {
            assert!(a.distance(b) <= 1.0 + 1e-12);
        }
    }

    #[test]
    fn test_blocked_path() {
        let mut planner = RRTPlanner::from_obstacles(
            [0.0, 0.0],
            [5.0, 0.0],
            vec![(2.0, 0.0, 1.0)],
            [0.0, 5.0],
            line_config(100, 5),
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        assert!(planner.planning_with_rng(&mut rng).is_none());
        assert_eq!(planner.iterations(), 5);
        assert_eq!(planner.get_tree().len(), 1);
    }

    #[test]
    fn test_goal_connects_on_rejected_iteration() {
        // Every sample lies up and to the right, so each steer from the root
        // leaves the play area; the root itself is within reach of the goal.
        let config = RRTConfig {
            play_area: Some(AreaBounds::new(-1.0, 2.5, -1.0, 1.0)),
            goal_sample_rate: 0,
            max_iter: 10,
            ..Default::default()
        };
        let mut planner = RRTPlanner::from_obstacles(
            [0.0, 0.0],
            [2.0, 0.0],
            Vec::new(),
            [10.0, 20.0],
            config,
        )
        .unwrap();

        let mut seen = Vec::new();
        let mut observer = |i: usize, _sample: Point2D, tree: &Tree| seen.push((i, tree.len()));
        let mut rng = StdRng::seed_from_u64(21);
        let path = planner.planning_with_observer(&mut rng, &mut observer);

        assert_eq!(seen, vec![(0, 1)]);
        assert_eq!(planner.iterations(), 1);
        assert_eq!(planner.get_tree().len(), 1);
        let path = path.expect("goal reachable from the root");
        assert_eq!(path.points, vec![Point2D::new(0.0, 0.0), Point2D::new(2.0, 0.0)]);
    }

    #[test]
    fn test_bounds_rejection() {
        let play_area = AreaBounds::new(0.0, 4.0, 0.0, 4.0);
        let config = RRTConfig {
            play_area: Some(play_area),
            max_iter: 300,
            goal_sample_rate: 0,
            seed: Some(5),
            ..Default::default()
        };
        let mut planner = RRTPlanner::from_obstacles(
            [1.0, 1.0],
            [30.0, 30.0],
            vec![(2.0, 2.5, 0.5)],
            [-10.0, 14.0],
            config,
        )
        .unwrap();

        assert!(planner.planning().is_none());
        let tree = planner.get_tree();
        assert!(tree.len() > 1);
        for node in tree.nodes().iter().skip(1) {
            assert!(play_area.contains(&node.position), "{:?} outside", node.position);
        }
    }

    #[test]
    fn test_path_valid_and_collision_free() {
        for seed in 0..5 {
            let mut planner = create_test_planner(seed);
            if let Some(path) = planner.planning() {
                assert_eq!(path.first(), Some(&planner.start()));
                assert_eq!(path.last(), Some(&planner.goal()));
                assert_collision_free(&path, planner.get_obstacles(), 0.5);
            }
        }
    }

    #[test]
    fn test_open_field_finds_path() {
        let config = RRTConfig {
            seed: Some(42),
            ..Default::default()
        };
        let mut planner = RRTPlanner::from_obstacles(
            [0.0, 0.0],
            [10.0, 10.0],
            Vec::new(),
            [-2.0, 15.0],
            config,
        )
        .unwrap();
        let path = planner.planning().expect("open field");
        assert_eq!(path.first(), Some(&Point2D::new(0.0, 0.0)));
        assert_eq!(path.last(), Some(&Point2D::new(10.0, 10.0)));
    }

    #[test]
    fn test_determinism() {
        let mut a = create_test_planner(7);
        let mut b = create_test_planner(7);
        let path_a = a.planning();
        let path_b = b.planning();
        assert_eq!(path_a, path_b);
        assert_eq!(a.get_tree(), b.get_tree());
        assert_eq!(a.iterations(), b.iterations());
    }

    #[test]
    fn test_replanning_resets_tree() {
        let mut planner = create_test_planner(3);
        let first = planner.planning();
        let first_tree = planner.get_tree().clone();
        let second = planner.planning();
        assert_eq!(first, second);
        assert_eq!(&first_tree, planner.get_tree());
    }

    #[test]
    fn test_tree_acyclic() {
        let mut planner = create_test_planner(11);
        planner.planning();
        let tree = planner.get_tree();
        for i in 0..tree.len() {
            let chain: Vec<usize> = tree.ancestors(i).take(tree.len() + 1).collect();
            assert!(chain.len() <= tree.len());
            assert_eq!(*chain.last().unwrap(), 0);
            assert!(chain.iter().all_unique());
            for (child, parent) in chain.iter().tuple_windows() {
                assert!(parent < child);
            }
        }
    }

    #[test]
    fn test_observer_called_once_per_iteration() {
        let mut planner = RRTPlanner::from_obstacles(
            [0.0, 0.0],
            [5.0, 0.0],
            vec![(2.0, 0.0, 1.0)],
            [0.0, 5.0],
            line_config(100, 5),
        )
        .unwrap();
        let mut seen = Vec::new();
        let mut observer = |i: usize, sample: Point2D, tree: &Tree| {
            assert_eq!(tree.len(), 1);
            seen.push((i, sample));
        };
        let mut rng = StdRng::seed_from_u64(0);
        planner.planning_with_observer(&mut rng, &mut observer);

        let goal = Point2D::new(5.0, 0.0);
        assert_eq!(seen, (0..5).map(|i| (i, goal)).collect::<Vec<_>>());
    }

    #[test]
    fn test_path_planner_trait() {
        let planner = create_test_planner(0);
        let blocked = RRTPlanner::from_obstacles(
            [0.0, 0.0],
            [5.0, 0.0],
            vec![(2.0, 0.0, 1.0)],
            [0.0, 5.0],
            line_config(100, 5),
        )
        .unwrap();

        let open = planner.plan(Point2D::new(12.0, 0.0), Point2D::new(12.0, 3.0));
        assert!(open.is_ok());
        assert!(matches!(
            blocked.plan(Point2D::new(0.0, 0.0), Point2D::new(5.0, 0.0)),
            Err(PlannerError::PlanningError(_))
        ));
        assert!(matches!(
            planner.plan(Point2D::new(f64::NAN, 0.0), Point2D::origin()),
            Err(PlannerError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_set_max_iterations() {
        let mut planner = create_test_planner(0);
        assert!(planner.set_max_iterations(0).is_err());
        assert_eq!(planner.config().max_iter, 2000);
        planner.set_max_iterations(10).unwrap();
        assert_eq!(planner.config().max_iter, 10);
    }
}
