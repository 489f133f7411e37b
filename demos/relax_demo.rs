//! Lloyd relaxation on user-supplied sites

use rust_voronoi_diagram::generation::generate_random_sites;
use rust_voronoi_diagram::*;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let bbox = BoundingBox::from_size(400.0, 400.0)?;
    let sites = generate_random_sites(300, &bbox, 7);

    let mut diagram = VoronoiGenerator::default().compute(&sites, bbox);

    println!("iteration  cells  max displacement  total displacement");
    for iteration in 0..=8 {
        let displacement = centroid_displacement(&diagram);
        println!(
            "{:>9}  {:>5}  {:>16.4}  {:>18.4}",
            iteration,
            diagram.cell_count(),
            displacement.max,
            displacement.total
        );
        diagram = diagram.relax();
    }

    // Same thing with early termination
    let options = LloydOptions {
        max_iterations: 50,
        convergence_threshold: 0.0005,
    };
    let relaxed = lloyd_relaxation_with_options(
        VoronoiGenerator::default().compute(&sites, bbox),
        options,
    );
    println!(
        "\nConverged diagram: {} cells, max displacement {:.4}",
        relaxed.cell_count(),
        centroid_displacement(&relaxed).max
    );

    Ok(())
}
