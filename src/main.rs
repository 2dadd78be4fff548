use RustedWorksheets::Utils::logger::{init_logger, save_points_to_csv};
use RustedWorksheets::Utils::plots::plot_curve_graph;
use RustedWorksheets::Utils::tables::problems_table;
use RustedWorksheets::grid::grid_builder::GridBuilder;
use RustedWorksheets::grid::grid_config::TaskDocument;
use log::{LevelFilter, info};
use std::error::Error;
use std::path::{Path, PathBuf};

const OUTPUT_DIR: &str = "output";

/// used when no task file is given
const DEFAULT_TASK: &str = "
grid
type: derivatives n: 5
lm: 60 tm: 80 bm: 60 columns: 1
document
name: derivatives size: letter
";

fn main() -> Result<(), Box<dyn Error>> {
    let output = PathBuf::from(OUTPUT_DIR);
    if let Some(log_file) = init_logger(LevelFilter::Info, Some(&output))? {
        info!("debug log written to {}", log_file.display());
    }
    let task = match std::env::args().nth(1) {
        Some(path) => TaskDocument::from_file(Path::new(&path))?,
        None => TaskDocument::parse(DEFAULT_TASK)?,
    };

    let grid = GridBuilder::new(task.grid.clone()).build()?;
    let placements = grid.placements(&task.page)?;
    println!("{}", problems_table(&grid.problems));

    for (problem, cell) in grid.problems.iter().zip(&placements) {
        info!(
            "{} at ({:.1}, {:.1}), cell {:.1} x {:.1}",
            cell.label, cell.x, cell.y, cell.width, cell.height
        );
        if let Some(graph) = &problem.graph {
            let stem = format!("{}_{}", task.name, cell.number);
            plot_curve_graph(graph, &output.join(format!("{}.png", stem)))?;
            save_points_to_csv(graph, &output.join(format!("{}.csv", stem)))?;
            info!("curve {} saved as {}.png and {}.csv", graph.label, stem, stem);
        }
    }
    Ok(())
}
