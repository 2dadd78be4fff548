//! Volumes of solids of revolution.
//!
//! The rotated curve is the derivative of a generated expression, so it contains the same
//! function families in differentiated form. Difficulty controls the term count and the
//! families:
//!
//! | difficulty | terms | families                                  | compose |
//! |------------|-------|-------------------------------------------|---------|
//! | simple     | 1     | poly, exponent, log, root, trig           | no      |
//! | hard       | 2     | simple + reciprocal                       | no      |
//! | extreme    | 2..3  | all                                       | yes     |
use crate::errors::GenerationError;
use crate::generators::expression_generator::{ExpressionGenerator, FunctionFamily, GeneratorConfig};
use crate::generators::{Difficulty, LatexPair, Problem, ProblemGenerator, ProblemKind};
use crate::numerical::quadrature::{AdaptiveGaussLegendre, QuadratureConfig};
use crate::numerical::volumes::{
    CurveGraph, VolumeConfig, draw_integer_region, natural_domain, rotation_volume, validate_curve,
};
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::format_significant;
use log::debug;
use rand::rngs::StdRng;

pub const MAX_ATTEMPTS: usize = 200;

fn difficulty_setup(difficulty: Difficulty) -> (GeneratorConfig, (usize, usize)) {
    use FunctionFamily::*;
    let base = GeneratorConfig {
        p_trig: (0.5, 0.9),
        ..GeneratorConfig::default()
    };
    match difficulty {
        Difficulty::Simple => (
            GeneratorConfig {
                power_range: (1, 3),
                p_compose: 0.0,
                function_choice: vec![Poly, Exponent, Log, Root, Trig],
                ..base
            },
            (1, 1),
        ),
        Difficulty::Hard => (
            GeneratorConfig {
                power_range: (1, 3),
                p_compose: 0.0,
                function_choice: vec![Poly, Exponent, Log, Root, Reciprocal, Trig],
                ..base
            },
            (2, 2),
        ),
        Difficulty::Extreme => (base, (2, 3)),
    }
}

/// "Rotate y = f(x) about the x-axis on [a, b], find the volume"
pub struct VolumesGenerator {
    generator: ExpressionGenerator,
    term_range: (usize, usize),
    difficulty: Difficulty,
    /// fixed rotation region, otherwise one is drawn per curve
    region: Option<(f64, f64)>,
    config: VolumeConfig,
    quadrature: QuadratureConfig,
}

impl Default for VolumesGenerator {
    fn default() -> Self {
        Self::new(Difficulty::default(), None)
    }
}

impl VolumesGenerator {
    pub fn new(difficulty: Difficulty, region: Option<(f64, f64)>) -> Self {
        let (generator_config, term_range) = difficulty_setup(difficulty);
        Self {
            generator: ExpressionGenerator::new("x", generator_config),
            term_range,
            difficulty,
            region,
            config: VolumeConfig::default(),
            quadrature: QuadratureConfig::default(),
        }
    }

    pub fn with_configs(mut self, config: VolumeConfig, quadrature: QuadratureConfig) -> Self {
        self.config = config;
        self.quadrature = quadrature;
        self
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Draws a curve, picks its region and checks it. Returns the curve with the region or
    /// the reason of the rejection.
    fn candidate(&self, rng: &mut StdRng) -> Result<(Expr, (f64, f64)), String> {
        let x = self.generator.var();
        let f = self.generator.expression(self.term_range, rng);
        let curve = f.diff(x).simplify();
        if !curve.contains_variable(x) {
            return Err(format!("curve {} is constant", curve));
        }
        let region = match self.region {
            Some(region) => region,
            None => {
                let domain = natural_domain(&curve, x, self.config.window, &self.config)
                    .ok_or_else(|| format!("{} has no usable values on the window", curve))?;
                draw_integer_region(domain, rng)
                    .ok_or_else(|| format!("domain {:?} of {} is too short", domain, curve))?
            }
        };
        validate_curve(&curve, x, region, &self.config)
            .map_err(|e| format!("{} on [{}, {}]: {}", curve, region.0, region.1, e))?;
        Ok((curve, region))
    }
}

impl ProblemGenerator for VolumesGenerator {
    fn kind(&self) -> ProblemKind {
        ProblemKind::Volumes
    }

    fn generate(&self, rng: &mut StdRng) -> Result<Problem, GenerationError> {
        let quad = AdaptiveGaussLegendre::with_config(self.quadrature.clone())
            .map_err(|e| GenerationError::new(ProblemKind::Volumes, 0, e.to_string()))?;
        let x = self.generator.var();
        let mut last_reason = String::new();
        for attempt in 1..=MAX_ATTEMPTS {
            let (curve, region) = match self.candidate(rng) {
                Ok(accepted) => accepted,
                Err(reason) => {
                    debug!("volumes: attempt {} rejected: {}", attempt, reason);
                    last_reason = reason;
                    continue;
                }
            };
            let volume = match rotation_volume(&curve, x, region, &quad) {
                Ok(volume) => volume,
                Err(e) => {
                    last_reason = format!("volume of {} not computed: {}", curve, e);
                    debug!("volumes: attempt {} rejected: {}", attempt, last_reason);
                    continue;
                }
            };
            let graph = match CurveGraph::new(&curve, x, region, self.config.plot_points) {
                Ok(graph) => graph,
                Err(e) => {
                    last_reason = format!("graph of {} not sampled: {}", curve, e);
                    debug!("volumes: attempt {} rejected: {}", attempt, last_reason);
                    continue;
                }
            };
            debug!(
                "volumes: accepted {} on [{}, {}] after {} attempts",
                curve, region.0, region.1, attempt
            );
            let answer = format_significant(volume, self.config.significant_digits);
            return Ok(Problem {
                kind: ProblemKind::Volumes,
                statement: format!("y = {}, {} <= x <= {}", curve.render(), region.0, region.1),
                latex: Some(LatexPair {
                    statement: format!(
                        "y = {}, \\quad {} \\le x \\le {}",
                        curve.to_latex(),
                        region.0,
                        region.1
                    ),
                    answer: answer.clone(),
                }),
                answer,
                graph: Some(graph),
            });
        }
        Err(GenerationError::new(ProblemKind::Volumes, MAX_ATTEMPTS, last_reason))
    }
}
