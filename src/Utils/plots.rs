use crate::numerical::volumes::CurveGraph;
use plotters::prelude::*;
use std::error::Error;
use std::path::Path;

/// Axis ranges of a curve plot: the region padded by 5% and the y-range stretched to include 0.
pub fn plot_bounds(graph: &CurveGraph) -> ((f64, f64), (f64, f64)) {
    let (a, b) = graph.region;
    let pad = 0.05 * (b - a);
    let (y_min, y_max) = graph.y_range();
    let y_min = y_min.min(0.0);
    let y_max = if y_max > y_min { y_max * 1.05 } else { y_min + 1.0 };
    ((a - pad, b + pad), (y_min, y_max))
}

/// Draws the curve of a volume problem with vertical lines at both ends of the region.
pub fn plot_curve_graph(graph: &CurveGraph, path: &Path) -> Result<(), Box<dyn Error>> {
    let ((x_min, x_max), (y_min, y_max)) = plot_bounds(graph);
    let (a, b) = graph.region;
    let root_area = BitMapBackend::new(path, (800, 600)).into_drawing_area();
    root_area.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root_area)
        .caption("Graph of the function", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    chart.configure_mesh().x_desc("x").y_desc("f(x)").draw()?;

    chart
        .draw_series(LineSeries::new(graph.points.iter().copied(), BLUE.stroke_width(2)))?
        .label(format!("y = {}", graph.label))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));
    chart
        .draw_series(LineSeries::new(vec![(a, y_min), (a, y_max)], RED))?
        .label(format!("x = {}", a))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));
    chart
        .draw_series(LineSeries::new(vec![(b, y_min), (b, y_max)], GREEN))?
        .label(format!("x = {}", b))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], GREEN));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    root_area.present()?;
    Ok(())
}
