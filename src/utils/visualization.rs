//! Visualization utilities for rrt_planning
//!
//! Provides a unified interface for plotting using gnuplot. Plot calls are
//! collected as layers and drawn onto a single set of axes when the figure
//! is shown or saved.

use gnuplot::{Figure, Caption, Color, PointSymbol, PointSize, LineWidth, AxesCommon, AutoOption};
use crate::common::{AreaBounds, CircleObstacle, Path2D, PlannerError, PlannerResult, PlanningObserver, Point2D};
use crate::path_planning::rrt::Tree;

/// Color palette for consistent styling
pub mod colors {
    pub const BLACK: &str = "#000000";
    pub const RED: &str = "#FF0000";
    pub const GREEN: &str = "#00FF00";
    pub const BLUE: &str = "#0000FF";
    pub const GRAY: &str = "#808080";

    // Semantic colors
    pub const OBSTACLE: &str = BLUE;
    pub const START: &str = RED;
    pub const GOAL: &str = RED;
    pub const PATH: &str = RED;
    pub const TREE: &str = GREEN;
    pub const PLAY_AREA: &str = BLACK;
    pub const SAMPLE: &str = GRAY;
}

/// Segments used to approximate a circle (5 degree steps)
const CIRCLE_SEGMENTS: usize = 72;

/// Style for path rendering
#[derive(Debug, Clone)]
pub struct PathStyle {
    pub color: String,
    pub line_width: f64,
    pub caption: String,
}

impl PathStyle {
    pub fn new(color: &str, caption: &str) -> Self {
        Self {
            color: color.to_string(),
            line_width: 2.0,
            caption: caption.to_string(),
        }
    }

    pub fn with_line_width(mut self, width: f64) -> Self {
        self.line_width = width;
        self
    }
}

impl Default for PathStyle {
    fn default() -> Self {
        Self {
            color: colors::PATH.to_string(),
            line_width: 2.0,
            caption: "Path".to_string(),
        }
    }
}

/// Style for point rendering
#[derive(Debug, Clone)]
pub struct PointStyle {
    pub color: String,
    pub size: f64,
    pub symbol: char,
    pub caption: String,
}

impl PointStyle {
    pub fn new(color: &str, caption: &str) -> Self {
        Self {
            color: color.to_string(),
            size: 1.0,
            symbol: 'O',
            caption: caption.to_string(),
        }
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    pub fn with_symbol(mut self, symbol: char) -> Self {
        self.symbol = symbol;
        self
    }
}

#[derive(Debug, Clone)]
enum Layer {
    Lines { x: Vec<f64>, y: Vec<f64>, style: PathStyle },
    Points { x: Vec<f64>, y: Vec<f64>, style: PointStyle },
}

/// Main visualizer struct
pub struct Visualizer {
    figure: Figure,
    layers: Vec<Layer>,
    title: String,
    x_label: String,
    y_label: String,
    x_range: Option<(f64, f64)>,
    y_range: Option<(f64, f64)>,
    aspect_ratio: Option<f64>,
}

impl Visualizer {
    /// Create a new visualizer
    pub fn new() -> Self {
        Self {
            figure: Figure::new(),
            layers: Vec::new(),
            title: String::new(),
            x_label: "X [m]".to_string(),
            y_label: "Y [m]".to_string(),
            x_range: None,
            y_range: None,
            aspect_ratio: Some(1.0),
        }
    }

    /// Set the plot title
    pub fn set_title(&mut self, title: &str) -> &mut Self {
        self.title = title.to_string();
        self
    }

    /// Set X axis range
    pub fn set_x_range(&mut self, min: f64, max: f64) -> &mut Self {
        self.x_range = Some((min, max));
        self
    }

    /// Set Y axis range
    pub fn set_y_range(&mut self, min: f64, max: f64) -> &mut Self {
        self.y_range = Some((min, max));
        self
    }

    /// Drop every collected layer, keeping axis settings
    pub fn clear(&mut self) -> &mut Self {
        self.layers.clear();
        self
    }

    /// Number of collected layers
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Plot a path
    pub fn plot_path(&mut self, path: &Path2D, style: &PathStyle) -> &mut Self {
        self.plot_path_xy(&path.x_coords(), &path.y_coords(), style)
    }

    /// Plot a path from x,y vectors
    pub fn plot_path_xy(&mut self, x: &[f64], y: &[f64], style: &PathStyle) -> &mut Self {
        self.layers.push(Layer::Lines {
            x: x.to_vec(),
            y: y.to_vec(),
            style: style.clone(),
        });
        self
    }

    /// Plot a single point (start, goal, etc.)
    pub fn plot_point(&mut self, point: Point2D, style: &PointStyle) -> &mut Self {
        self.layers.push(Layer::Points {
            x: vec![point.x],
            y: vec![point.y],
            style: style.clone(),
        });
        self
    }

    /// Plot circular obstacles as closed outlines
    pub fn plot_circle_obstacles(&mut self, obstacles: &[CircleObstacle]) -> &mut Self {
        for (i, obs) in obstacles.iter().enumerate() {
            let (x, y): (Vec<f64>, Vec<f64>) = (0..=CIRCLE_SEGMENTS)
                .map(|k| {
                    let angle = (k as f64) * std::f64::consts::TAU / CIRCLE_SEGMENTS as f64;
                    (obs.x + obs.radius * angle.cos(), obs.y + obs.radius * angle.sin())
                })
                .unzip();
            let caption = if i == 0 { "Obstacles" } else { "" };
            self.plot_path_xy(&x, &y, &PathStyle::new(colors::OBSTACLE, caption).with_line_width(1.0));
        }
        self
    }

    /// Plot the play area rectangle
    pub fn plot_area_bounds(&mut self, area: &AreaBounds) -> &mut Self {
        let x = [area.xmin, area.xmax, area.xmax, area.xmin, area.xmin];
        let y = [area.ymin, area.ymin, area.ymax, area.ymax, area.ymin];
        self.plot_path_xy(&x, &y, &PathStyle::new(colors::PLAY_AREA, "Play area").with_line_width(1.0))
    }

    /// Plot every tree edge along its discretized path
    pub fn plot_rrt_tree(&mut self, tree: &Tree) -> &mut Self {
        let mut first = true;
        for node in tree.nodes().iter().filter(|n| !n.is_root()) {
            let x: Vec<f64> = node.path.iter().map(|p| p.x).collect();
            let y: Vec<f64> = node.path.iter().map(|p| p.y).collect();
            let caption = if first { "Tree" } else { "" };
            first = false;
            self.plot_path_xy(&x, &y, &PathStyle::new(colors::TREE, caption).with_line_width(1.0));
        }
        self
    }

    /// Plot start position
    pub fn plot_start(&mut self, point: Point2D) -> &mut Self {
        self.plot_point(point, &PointStyle::new(colors::START, "Start").with_size(1.5).with_symbol('x'))
    }

    /// Plot goal position
    pub fn plot_goal(&mut self, point: Point2D) -> &mut Self {
        self.plot_point(point, &PointStyle::new(colors::GOAL, "Goal").with_size(1.5).with_symbol('x'))
    }

    /// Finalize and show the plot
    pub fn show(&mut self) -> PlannerResult<()> {
        self.render();
        self.figure
            .show()
            .map(|_| ())
            .map_err(|e| PlannerError::VisualizationError(e.to_string()))
    }

    /// Redraw without blocking, for animation
    pub fn show_and_keep_running(&mut self) -> PlannerResult<()> {
        self.render();
        self.figure
            .show_and_keep_running()
            .map(|_| ())
            .map_err(|e| PlannerError::VisualizationError(e.to_string()))
    }

    /// Save plot to PNG file
    pub fn save_png(&mut self, path: &str, width: u32, height: u32) -> PlannerResult<()> {
        if let Some(dir) = std::path::Path::new(path).parent() {
            std::fs::create_dir_all(dir)?;
        }
        self.render();
        self.figure
            .save_to_png(path, width, height)
            .map_err(|e| PlannerError::VisualizationError(e.to_string()))
    }

    fn render(&mut self) {
        self.figure.clear_axes();
        let axes = self.figure.axes2d();

        for layer in &self.layers {
            match layer {
                Layer::Lines { x, y, style } => {
                    axes.lines(x, y, &[
                        Caption(&style.caption),
                        Color(&style.color),
                        LineWidth(style.line_width),
                    ]);
                }
                Layer::Points { x, y, style } => {
                    axes.points(x, y, &[
                        Caption(&style.caption),
                        Color(&style.color),
                        PointSymbol(style.symbol),
                        PointSize(style.size),
                    ]);
                }
            }
        }

        if !self.title.is_empty() {
            axes.set_title(&self.title, &[]);
        }
        axes.set_x_label(&self.x_label, &[]);
        axes.set_y_label(&self.y_label, &[]);

        if let Some((min, max)) = self.x_range {
            axes.set_x_range(AutoOption::Fix(min), AutoOption::Fix(max));
        }
        if let Some((min, max)) = self.y_range {
            axes.set_y_range(AutoOption::Fix(min), AutoOption::Fix(max));
        }
        if let Some(ratio) = self.aspect_ratio {
            axes.set_aspect_ratio(AutoOption::Fix(ratio));
        }
    }
}

impl Default for Visualizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Planning observer that redraws the growing tree every `interval` iterations
pub struct TreeAnimator {
    vis: Visualizer,
    obstacles: Vec<CircleObstacle>,
    play_area: Option<AreaBounds>,
    start: Point2D,
    goal: Point2D,
    interval: usize,
}

impl TreeAnimator {
    pub fn new(
        obstacles: &[CircleObstacle],
        play_area: Option<AreaBounds>,
        start: Point2D,
        goal: Point2D,
        interval: usize,
    ) -> Self {
        Self {
            vis: Visualizer::new(),
            obstacles: obstacles.to_vec(),
            play_area,
            start,
            goal,
            interval: interval.max(1),
        }
    }

    /// Access the underlying visualizer, e.g. to fix axis ranges
    pub fn visualizer_mut(&mut self) -> &mut Visualizer {
        &mut self.vis
    }

    fn redraw(&mut self, sample: Point2D, tree: &Tree) {
        self.vis.clear();
        self.vis.plot_circle_obstacles(&self.obstacles);
        if let Some(area) = &self.play_area {
            self.vis.plot_area_bounds(area);
        }
        self.vis.plot_rrt_tree(tree);
        self.vis.plot_point(sample, &PointStyle::new(colors::SAMPLE, "Sample").with_symbol('^'));
        self.vis.plot_start(self.start);
        self.vis.plot_goal(self.goal);
    }
}

impl PlanningObserver for TreeAnimator {
    fn on_iteration(&mut self, iteration: usize, sample: Point2D, tree: &Tree) {
        if iteration % self.interval != 0 {
            return;
        }
        self.redraw(sample, tree);
        if let Err(e) = self.vis.show_and_keep_running() {
            log::warn!("RRT animation disabled: {}", e);
            self.interval = usize::MAX;
        }
    }
}
