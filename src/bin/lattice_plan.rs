use gnuplot::{AxesCommon, Caption, Color, Figure};
use nalgebra::{DMatrix, DVector};
use tracing_subscriber::fmt::SubscriberBuilder;

use lattice_planner::{
    EuclideanHeuristic, GraphParams, GraphSearch, MotionPrimitive, PointObstacleMap,
    PrimitiveGraph,
};

// Planner parameters
const RESOLUTION: f64 = 1.0; // lattice step [m]
const CLEARANCE: f64 = 0.5; // obstacle inflation radius [m]
const SAMPLE_STEP: f64 = 0.25; // collision sampling interval [s]
const GOAL_THRESHOLD: f64 = 0.4; // goal region radius [m]
const SHOW_ANIMATION: bool = true;

/// Build an 8-connected double-integrator lattice.
///
/// Vertex 0 is the canonical origin; vertices 1..=8 are the unit moves.
/// With `num_tiles` equal to the vertex count every state normalizes to
/// column 0, so the same move set is available from any expanded state.
fn build_lattice(resolution: f64) -> PrimitiveGraph {
    let moves: [(f64, f64); 8] = [
        (1.0, 0.0),
        (0.0, 1.0),
        (-1.0, 0.0),
        (0.0, -1.0),
        (-1.0, -1.0),
        (-1.0, 1.0),
        (1.0, -1.0),
        (1.0, 1.0),
    ];

    let num_vertices = moves.len() + 1;
    let mut vertex_rows = vec![0.0; num_vertices * 4];
    let mut edges = DMatrix::from_element(num_vertices, 1, -1);
    let mut mps = Vec::with_capacity(moves.len());

    for (index, &(dx, dy)) in moves.iter().enumerate() {
        let ex = dx * resolution;
        let ey = dy * resolution;
        vertex_rows[(index + 1) * 4] = ex;
        vertex_rows[(index + 1) * 4 + 1] = ey;

        edges[(index + 1, 0)] = index as i32;
        // straight line over t in [0, 1]
        let coeffs = DMatrix::from_row_slice(2, 2, &[ex, 0.0, ey, 0.0]);
        mps.push(MotionPrimitive::new(
            2,
            DVector::from_row_slice(&[0.0, 0.0, 0.0, 0.0]),
            DVector::from_row_slice(&[ex, ey, 0.0, 0.0]),
            (ex * ex + ey * ey).sqrt(),
            1.0,
            coeffs,
        ));
    }

    let params = GraphParams {
        dispersion: resolution,
        rho: 1.0,
        spatial_dim: 2,
        control_space_dim: 2,
        max_state: DVector::from_row_slice(&[10.0, 10.0, 5.0, 5.0]),
        num_tiles: num_vertices,
        tiling: true,
    };
    let vertices = DMatrix::from_row_slice(num_vertices, 4, &vertex_rows);
    PrimitiveGraph::new(params, vertices, edges, mps).expect("lattice construction failed")
}

fn path_polyline(start: &DVector<f64>, path: &[MotionPrimitive]) -> (Vec<f64>, Vec<f64>) {
    let mut xs = vec![start[0]];
    let mut ys = vec![start[1]];
    for mp in path {
        for position in mp.sampled_positions(0.1) {
            xs.push(position[0]);
            ys.push(position[1]);
        }
    }
    (xs, ys)
}

fn main() {
    SubscriberBuilder::default().with_target(false).init();

    println!("Lattice planning start!!");

    let sx = 2.0; // start x position [m]
    let sy = 2.0; // start y position [m]
    let gx = 8.0; // goal x position [m]
    let gy = 8.0; // goal y position [m]

    // Boundary obstacles plus an internal wall
    let mut ox = Vec::new();
    let mut oy = Vec::new();
    for i in 0..11 {
        ox.push(i as f64);
        oy.push(0.0);
        ox.push(i as f64);
        oy.push(10.0);
        ox.push(0.0);
        oy.push(i as f64);
        ox.push(10.0);
        oy.push(i as f64);
    }
    for i in 4..7 {
        ox.push(5.0);
        oy.push(i as f64);
    }
    println!("Created {} obstacles", ox.len());

    let graph = build_lattice(RESOLUTION);
    println!("{}", graph);

    let obstacles = PointObstacleMap::from_xy(&ox, &oy, CLEARANCE, SAMPLE_STEP);
    let heuristic = EuclideanHeuristic::new(2, 1.0);

    let start = DVector::from_row_slice(&[sx, sy, 0.0, 0.0]);
    let goal = DVector::from_row_slice(&[gx, gy, 0.0, 0.0]);

    let mut searcher = GraphSearch::new(&graph, &obstacles, &heuristic);
    let path = searcher.search(&start, &goal, GOAL_THRESHOLD, false);

    if path.is_empty() {
        println!("No path found!");
        return;
    }

    let cost: f64 = path.iter().map(|mp| mp.cost()).sum();
    println!(
        "Path found with {} primitives, cost {:.3}, {} states visited",
        path.len(),
        cost,
        searcher.visited_states().len()
    );
    for (label, seconds) in searcher.timings() {
        println!("  {}: {:.6}s", label, seconds);
    }

    // Parallel expansion reaches the goal at the same cost
    let parallel_path = searcher.search(&start, &goal, GOAL_THRESHOLD, true);
    let parallel_cost: f64 = parallel_path.iter().map(|mp| mp.cost()).sum();
    println!("Parallel search cost {:.3}", parallel_cost);

    if SHOW_ANIMATION {
        let (px, py) = path_polyline(&start, &path);

        let mut fg = Figure::new();
        fg.axes2d()
            .points(&ox, &oy, &[Caption("Obstacles"), Color("black")])
            .points(&[sx], &[sy], &[Caption("Start"), Color("green")])
            .points(&[gx], &[gy], &[Caption("Goal"), Color("blue")])
            .lines(&px, &py, &[Caption("Path"), Color("red")])
            .set_aspect_ratio(gnuplot::AutoOption::Fix(1.0))
            .set_title("Motion Primitive Lattice Planning", &[])
            .set_x_label("X [m]", &[])
            .set_y_label("Y [m]", &[]);

        std::fs::create_dir_all("img").ok();
        let output_path = "img/lattice_plan_result.png";
        fg.save_to_png(output_path, 800, 600).unwrap();
        println!("Plot saved to: {}", output_path);
    }

    println!("Lattice planning finish!!");
}
