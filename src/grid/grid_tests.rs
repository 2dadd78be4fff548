use crate::errors::{ConfigurationError, WorksheetError};
use crate::generators::{Difficulty, ProblemKind};
use crate::grid::grid_builder::{GridBuilder, GridState, generator_for};
use crate::grid::grid_config::{GridSpec, MAX_PROBLEMS, TaskDocument};
use crate::grid::grid_layout::PageSize;
use crate::generators::ProblemGenerator;
use approx::assert_relative_eq;
use std::collections::HashSet;
use std::io::Write;

fn seeded(kind: ProblemKind, n: usize, seed: u64) -> GridSpec {
    let mut spec = GridSpec::new(kind, n);
    spec.seed = Some(seed);
    spec
}

#[test]
fn test_derivatives_grid_is_complete_and_distinct() {
    let mut builder = GridBuilder::new(seeded(ProblemKind::Derivatives, 5, 1));
    assert_eq!(builder.state(), &GridState::Pending);
    let grid = builder.build().unwrap();
    assert_eq!(builder.state(), &GridState::Done);
    assert_eq!(grid.problems.len(), 5);
    let statements: HashSet<&str> = grid.problems.iter().map(|p| p.statement.as_str()).collect();
    assert_eq!(statements.len(), 5);
    for problem in &grid.problems {
        assert!(!problem.statement.is_empty() && !problem.answer.is_empty());
    }
}

#[test]
fn test_extreme_volumes_on_unit_interval() {
    let mut spec = seeded(ProblemKind::Volumes, 3, 2);
    spec.difficulty = Difficulty::Extreme;
    spec.region = Some((0.0, 1.0));
    let mut builder = GridBuilder::new(spec);
    match builder.build() {
        Ok(grid) => {
            assert_eq!(grid.problems.len(), 3);
            for problem in grid.problems {
                let volume: f64 = problem.answer.parse().unwrap();
                assert!(volume.is_finite() && volume > 0.0);
                let graph = problem.graph.unwrap();
                assert!(!graph.points.is_empty());
                assert!(graph.points.iter().all(|(x, y)| x.is_finite() && y.is_finite()));
            }
        }
        Err(WorksheetError::Generation(e)) => {
            assert_eq!(e.kind, ProblemKind::Volumes);
            assert!(e.index.is_some());
            assert!(matches!(builder.state(), GridState::Failed { .. }));
        }
        Err(e) => panic!("unexpected error {}", e),
    }
}

#[test]
fn test_same_seed_same_grid() {
    for kind in [ProblemKind::Taylor, ProblemKind::Nash, ProblemKind::HorizontalTangent] {
        let first = GridBuilder::new(seeded(kind, 3, 77)).build().unwrap();
        let second = GridBuilder::new(seeded(kind, 3, 77)).build().unwrap();
        assert_eq!(first.problems, second.problems);
    }
}

#[test]
fn test_invalid_specs_fail_before_generation() {
    let mut builder = GridBuilder::new(GridSpec::new(ProblemKind::Nash, 0));
    assert!(matches!(
        builder.build(),
        Err(WorksheetError::Configuration(ConfigurationError::ProblemCountOutOfRange { .. }))
    ));
    assert_eq!(builder.state(), &GridState::Pending);

    let mut spec = GridSpec::new(ProblemKind::Volumes, 2);
    spec.region = Some((3.0, 1.0));
    assert!(matches!(spec.validate(), Err(ConfigurationError::InvalidRegion { .. })));
    let mut spec = GridSpec::new(ProblemKind::Nash, MAX_PROBLEMS + 1);
    assert!(spec.validate().is_err());
    spec.n = 3;
    spec.lm = -1.0;
    assert!(matches!(spec.validate(), Err(ConfigurationError::NegativeMargin { name: "lm", .. })));
    spec.lm = 0.0;
    spec.columns = 0;
    assert_eq!(spec.validate(), Err(ConfigurationError::ZeroColumns));
}

#[test]
fn test_generator_follows_spec() {
    let mut spec = GridSpec::new(ProblemKind::HorizontalTangent, 1);
    assert_eq!(generator_for(&spec).kind(), ProblemKind::HorizontalTangent);
    spec.kind = ProblemKind::Volumes;
    assert_eq!(generator_for(&spec).kind(), ProblemKind::Volumes);
}

#[test]
fn test_placements() {
    let mut spec = seeded(ProblemKind::Nash, 5, 3);
    spec.columns = 2;
    spec.lm = 50.0;
    spec.tm = 100.0;
    spec.bm = 92.0;
    let grid = GridBuilder::new(spec).build().unwrap();
    let cells = grid.placements(&PageSize::letter()).unwrap();
    assert_eq!(cells.len(), 5);
    // 3 rows of (792 - 192) / 3 = 200 pt, 2 columns of (612 - 100) / 2 = 256 pt
    assert_relative_eq!(cells[0].width, 256.0);
    assert_relative_eq!(cells[0].height, 200.0);
    assert_relative_eq!(cells[0].x, 50.0);
    assert_relative_eq!(cells[0].y, 492.0);
    assert_relative_eq!(cells[1].x, 306.0);
    assert_eq!((cells[4].row, cells[4].column), (2, 0));
    assert_relative_eq!(cells[4].y, 92.0);
    assert_eq!(cells[4].label, "5)");
    assert_relative_eq!(cells[4].label_x, 30.0);
    assert_relative_eq!(cells[4].label_y, 192.0);
}

#[test]
fn test_page_too_small() {
    let mut spec = seeded(ProblemKind::Nash, 2, 4);
    spec.tm = 500.0;
    spec.bm = 320.0;
    let grid = GridBuilder::new(spec).build().unwrap();
    assert!(matches!(
        grid.placements(&PageSize::letter()),
        Err(ConfigurationError::PageTooSmall { .. })
    ));
    assert!(grid.placements(&PageSize::a4()).is_ok());
}

#[test]
fn test_task_document() {
    let input = "grid\n type: volumes n: 3 difficulty: extreme\n x_left: 0 x_right: 1\n lm: 60 tm: 80 bm: 60 columns: 1\ndocument\n name: unit size: a4 seed: 42\n";
    let task = TaskDocument::parse(input).unwrap();
    assert_eq!(task.grid.kind, ProblemKind::Volumes);
    assert_eq!(task.grid.n, 3);
    assert_eq!(task.grid.difficulty, Difficulty::Extreme);
    assert_eq!(task.grid.region, Some((0.0, 1.0)));
    assert_eq!(task.grid.seed, Some(42));
    assert_relative_eq!(task.grid.lm, 60.0);
    assert_eq!(task.page, PageSize::a4());
    assert_eq!(task.name, "unit");
    let spec = GridSpec::from_document("grid\n type: taylor a: 0.5").unwrap();
    assert_eq!(spec.n, 9);
    assert_relative_eq!(spec.center, 0.5);
}

#[test]
fn test_task_document_errors() {
    assert!(matches!(
        GridSpec::from_document("grid\n type: integrals n: 3"),
        Err(ConfigurationError::UnknownProblemType(kind)) if kind == "integrals"
    ));
    assert!(matches!(
        GridSpec::from_document("grid\n type: volumes difficulty: insane"),
        Err(ConfigurationError::UnknownDifficulty(_))
    ));
    assert!(matches!(
        GridSpec::from_document("grid\n type: nash n: 61"),
        Err(ConfigurationError::ProblemCountOutOfRange { n: 61, .. })
    ));
    assert!(matches!(
        GridSpec::from_document("grid\n n: 3"),
        Err(ConfigurationError::MissingKey(key)) if key == "type"
    ));
    assert!(matches!(
        GridSpec::from_document("grid\n type: volumes x_left: 2"),
        Err(ConfigurationError::MissingKey(_))
    ));
    assert!(matches!(
        GridSpec::from_document("grid\n type: nash n: 2.5"),
        Err(ConfigurationError::InvalidValue { .. })
    ));
}

#[test]
fn test_task_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "# nash worksheet").unwrap();
    writeln!(file, "grid").unwrap();
    writeln!(file, "type: nash n: 2 columns: 2").unwrap();
    let task = TaskDocument::from_file(file.path()).unwrap();
    assert_eq!(task.grid.kind, ProblemKind::Nash);
    assert_eq!(task.grid.columns, 2);
    assert_eq!(task.page, PageSize::letter());
    assert_eq!(task.name, "nash");
}

#[test]
fn test_unknown_grid_key_is_ignored() {
    let spec = GridSpec::from_document("grid\n type: nash n: 2 colour: red").unwrap();
    assert_eq!(spec.kind, ProblemKind::Nash);
    assert_eq!(spec.n, 2);
}
