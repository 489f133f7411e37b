//! Demonstration of diagram generation and queries

use rust_voronoi_diagram::*;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("Generating diagram...");

    let config = DiagramConfigBuilder::new()
        .seed(42)
        .site_count(500)?
        .bounds(1024.0, 768.0)?
        .distribution(SiteDistribution::JitteredGrid)
        .lloyd_iterations(3)?
        .build()?;

    let diagram = Diagram::generate(&config)?;

    println!("Generated {} cells", diagram.cell_count());
    println!("Edges: {}, vertices: {}", diagram.edges().len(), diagram.vertices().len());
    println!(
        "Covered area: {:.3} of {:.3}",
        diagram.total_area(),
        diagram.bbox().area()
    );

    // Show neighbor count distribution
    let mut counts = std::collections::BTreeMap::new();
    for cell in diagram.cells() {
        *counts.entry(cell.neighbor_count()).or_insert(0) += 1;
    }

    println!("\nNeighbor counts:");
    for (neighbors, count) in &counts {
        let pct = (*count as f64 / diagram.cell_count() as f64) * 100.0;
        println!("  {}: {} ({:.1}%)", neighbors, count, pct);
    }

    // Test spatial index if available
    #[cfg(feature = "spatial-index")]
    {
        let pos = diagram.bbox().center();
        if let Some(cell_id) = diagram.find_cell_at(pos) {
            println!("\nPosition {:?} is in cell {}", pos, cell_id);
            println!("Containment: {:?}", diagram.contains_point(cell_id, pos)?);

            let neighbors = diagram.get_neighbors(cell_id)?;
            println!("Cell {} has {} neighbors", cell_id, neighbors.len());

            let nearby = diagram.find_cells_within_radius(cell_id, 2)?;
            println!("Found {} cells within 2 hops of cell {}", nearby.len(), cell_id);

            if let Some(bounds) = diagram.cell_bounds(cell_id)? {
                println!("Cell bounds: {:?} .. {:?}", bounds.min, bounds.max);
            }
        }
    }

    Ok(())
}
