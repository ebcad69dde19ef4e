//! Common traits defining the planner interfaces

use crate::common::types::*;
use crate::common::error::PlannerResult;
use crate::path_planning::rrt::Tree;

/// Trait for path planning algorithms
pub trait PathPlanner {
    /// Plan a path from start to goal
    fn plan(&self, start: Point2D, goal: Point2D) -> PlannerResult<Path2D>;
}

/// Trait for sampling-based path planning algorithms
pub trait SamplingBasedPlanner: PathPlanner {
    /// Get the tree built during the last planning call
    fn tree(&self) -> &Tree;

    /// Set maximum iterations for planning
    fn set_max_iterations(&mut self, max_iter: usize) -> PlannerResult<()>;
}

/// Hook invoked once per planning iteration, after the insert step.
///
/// Any `FnMut(usize, Point2D, &Tree)` closure can be used as an observer.
pub trait PlanningObserver {
    fn on_iteration(&mut self, iteration: usize, sample: Point2D, tree: &Tree);
}

impl<F> PlanningObserver for F
where
    F: FnMut(usize, Point2D, &Tree),
{
    fn on_iteration(&mut self, iteration: usize, sample: Point2D, tree: &Tree) {
        self(iteration, sample, tree)
    }
}

/// Observer that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PlanningObserver for NoopObserver {
    fn on_iteration(&mut self, _iteration: usize, _sample: Point2D, _tree: &Tree) {}
}

/// Trait for visualizable algorithms
pub trait Visualizable {
    /// Draw current state to visualizer
    fn visualize(&self, vis: &mut crate::utils::Visualizer);
}
