use crate::errors::{GenerationError, WorksheetError};
use crate::generators::derivatives::DerivativesGenerator;
use crate::generators::horizontal_tangent::HorizontalTangentGenerator;
use crate::generators::nash::NashGenerator;
use crate::generators::taylor::TaylorGenerator;
use crate::generators::volumes::VolumesGenerator;
use crate::generators::{Generator, Problem, ProblemGenerator, ProblemKind};
use crate::grid::grid_config::GridSpec;
use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashSet;
use std::time::Instant;

/// redraws allowed when a problem repeats an earlier statement of the same grid
pub const MAX_DUPLICATE_RETRIES: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub enum GridState {
    Pending,
    /// 0-based index of the problem being generated
    Generating { index: usize },
    Done,
    Failed { index: usize },
}

/// A finished grid: the problems in generation order and the spec they came from
#[derive(Debug, Clone)]
pub struct Grid {
    pub spec: GridSpec,
    pub problems: Vec<Problem>,
}

/// The generator a spec asks for, configured with its difficulty, region and center.
pub fn generator_for(spec: &GridSpec) -> Generator {
    match spec.kind {
        ProblemKind::Derivatives => DerivativesGenerator::default().into(),
        ProblemKind::Volumes => VolumesGenerator::new(spec.difficulty, spec.region).into(),
        ProblemKind::Taylor => TaylorGenerator::with_center(spec.center).into(),
        ProblemKind::Nash => NashGenerator::default().into(),
        ProblemKind::HorizontalTangent => match spec.region {
            Some(window) => HorizontalTangentGenerator::with_window(window).into(),
            None => HorizontalTangentGenerator::default().into(),
        },
    }
}

pub struct GridBuilder {
    spec: GridSpec,
    state: GridState,
}

impl GridBuilder {
    pub fn new(spec: GridSpec) -> Self {
        Self {
            spec,
            state: GridState::Pending,
        }
    }

    pub fn state(&self) -> &GridState {
        &self.state
    }

    pub fn spec(&self) -> &GridSpec {
        &self.spec
    }

    /// Validates the spec and generates all `n` problems. Any generator failure aborts the
    /// whole grid with the index of the failing problem.
    pub fn build(&mut self) -> Result<Grid, WorksheetError> {
        self.spec.validate()?;
        let mut rng = match self.spec.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let generator = generator_for(&self.spec);
        info!(
            "building grid of {} {} problems (difficulty {}, seed {:?})",
            self.spec.n, self.spec.kind, self.spec.difficulty, self.spec.seed
        );
        let start = Instant::now();
        let mut problems = Vec::with_capacity(self.spec.n);
        let mut seen = HashSet::new();
        for index in 0..self.spec.n {
            self.state = GridState::Generating { index };
            match self.distinct_problem(&generator, &mut seen, &mut rng) {
                Ok(problem) => problems.push(problem),
                Err(e) => {
                    let e = e.at_index(index);
                    warn!("grid build failed: {}", e);
                    self.state = GridState::Failed { index };
                    return Err(e.into());
                }
            }
        }
        self.state = GridState::Done;
        info!(
            "grid of {} {} problems built in {:?}",
            problems.len(),
            self.spec.kind,
            start.elapsed()
        );
        Ok(Grid {
            spec: self.spec.clone(),
            problems,
        })
    }

    fn distinct_problem(
        &self,
        generator: &Generator,
        seen: &mut HashSet<String>,
        rng: &mut StdRng,
    ) -> Result<Problem, GenerationError> {
        for retry in 0..=MAX_DUPLICATE_RETRIES {
            let problem = generator.generate(rng)?;
            if seen.insert(problem.statement.clone()) {
                return Ok(problem);
            }
            debug!("duplicate problem {} redrawn ({} retries)", problem.statement, retry + 1);
        }
        Err(GenerationError::new(
            generator.kind(),
            MAX_DUPLICATE_RETRIES,
            "every redraw repeated an earlier problem of the grid",
        ))
    }
}
