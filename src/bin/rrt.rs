// RRT path planning demo
//
// Grows a tree through a field of circular obstacles and plots the result.

use rand::rngs::StdRng;
use rand::SeedableRng;

use rrt_planning::path_planning::rrt::{RRTConfig, RRTPlanner};
use rrt_planning::utils::visualization::TreeAnimator;
use rrt_planning::utils::{PathStyle, Visualizer};
use rrt_planning::Visualizable;

const SHOW_ANIMATION: bool = false;

fn main() {
    println!("RRT path planning start!!");

    // [x, y, radius]
    let obstacle_list = vec![
        (-1.0, 1.0, 1.0),
        (-1.0, 4.0, 1.0),
        (-1.0, 7.0, 1.0),
        (-1.0, 10.0, 1.0),
        (1.0, 13.0, 1.0),
        (4.0, 13.0, 1.0),
        (7.0, 13.0, 1.0),
        (10.0, 13.0, 1.0),
        (13.0, 13.0, 1.0),
        (15.0, 10.0, 1.0),
        (15.0, 7.0, 1.0),
        (15.0, 4.0, 1.0),
        (12.0, 3.0, 1.0),
        (9.0, 3.0, 1.0),
        (6.0, 3.0, 1.0),
        (4.0, 1.0, 1.0),
        (4.0, -1.0, 1.0),
    ];

    let config = RRTConfig::default();
    let seed = 0;

    let mut rrt = match RRTPlanner::from_obstacles(
        [-1.0, -1.0],
        [16.0, 14.0],
        obstacle_list,
        [-2.0, 15.0],
        config,
    ) {
        Ok(rrt) => rrt,
        Err(e) => {
            println!("Invalid planner setup: {}", e);
            return;
        }
    };

    let mut rng = StdRng::seed_from_u64(seed);
    let path = if SHOW_ANIMATION {
        let mut animator = TreeAnimator::new(rrt.get_obstacles(), None, rrt.start(), rrt.goal(), 5);
        animator.visualizer_mut().set_x_range(-2.0, 15.0).set_y_range(-2.0, 15.0);
        rrt.planning_with_observer(&mut rng, &mut animator)
    } else {
        rrt.planning_with_rng(&mut rng)
    };

    println!("Tree size: {} nodes after {} iterations", rrt.get_tree().len(), rrt.iterations());

    let mut vis = Visualizer::new();
    vis.set_title("RRT Path Planning");
    rrt.visualize(&mut vis);

    match path {
        Some(path) => {
            println!("found path!!");
            if let (Some(first), Some(last)) = (path.first(), path.last()) {
                println!("From ({:.2}, {:.2}) to ({:.2}, {:.2})", first.x, first.y, last.x, last.y);
            }
            println!("Path length: {:.3} m over {} waypoints", path.total_length(), path.len());
            vis.plot_path(&path, &PathStyle::default());
        }
        None => println!("Cannot find path"),
    }

    match vis.save_png("img/path_planning/rrt_result.png", 800, 600) {
        Ok(()) => println!("Plot saved to: img/path_planning/rrt_result.png"),
        Err(e) => println!("Could not save plot: {}", e),
    }
    if SHOW_ANIMATION {
        let _ = vis.show();
    }

    println!("RRT path planning finish!!");
}
