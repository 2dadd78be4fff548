//! 2x2 bimatrix games.
//!
//! A random integer payoff table is drawn, tables with ties in a best-response comparison are
//! rejected, and the answer lists the pure equilibria (best-response intersection over the four
//! cells) together with the mixed equilibrium from the indifference conditions.
use crate::errors::GenerationError;
use crate::generators::{LatexPair, Problem, ProblemGenerator, ProblemKind};
use crate::symbolic::utils::format_decimal;
use log::debug;
use rand::Rng;
use rand::rngs::StdRng;
use tabled::builder::Builder;
use tabled::settings::Style;

pub const MAX_ATTEMPTS: usize = 100;

#[derive(Debug, Clone)]
pub struct NashConfig {
    /// inclusive range of every payoff
    pub payoff_range: (i32, i32),
    pub row_player: String,
    pub column_player: String,
    pub row_strategies: [String; 2],
    pub column_strategies: [String; 2],
}

impl Default for NashConfig {
    fn default() -> Self {
        Self {
            payoff_range: (0, 10),
            row_player: "Taxpayer".to_string(),
            column_player: "Auditor".to_string(),
            row_strategies: ["Declare".to_string(), "Cheat".to_string()],
            column_strategies: ["Audit".to_string(), "Neglect".to_string()],
        }
    }
}

/// `payoffs[i][j] = (row payoff, column payoff)` when row plays `i` and column plays `j`
#[derive(Debug, Clone, PartialEq)]
pub struct PayoffTable {
    pub payoffs: [[(i32, i32); 2]; 2],
    pub row_player: String,
    pub column_player: String,
    pub row_strategies: [String; 2],
    pub column_strategies: [String; 2],
}

#[derive(Debug, Clone, PartialEq)]
pub enum MixedOutcome {
    /// row plays its first strategy with probability `p`, column its first with `q`
    Equilibrium { p: f64, q: f64 },
    /// a player has a weakly dominant strategy
    NoMixedEquilibrium,
    /// a player is indifferent everywhere (all payoffs equal)
    NotComputed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NashSolution {
    /// (row strategy, column strategy) of every pure equilibrium, row-major order
    pub pure: Vec<(usize, usize)>,
    pub mixed: MixedOutcome,
}

impl PayoffTable {
    pub fn new(payoffs: [[(i32, i32); 2]; 2], config: &NashConfig) -> Self {
        Self {
            payoffs,
            row_player: config.row_player.clone(),
            column_player: config.column_player.clone(),
            row_strategies: config.row_strategies.clone(),
            column_strategies: config.column_strategies.clone(),
        }
    }

    fn row(&self, i: usize, j: usize) -> f64 {
        self.payoffs[i][j].0 as f64
    }

    fn column(&self, i: usize, j: usize) -> f64 {
        self.payoffs[i][j].1 as f64
    }

    fn row_payoffs_equal(&self) -> bool {
        let first = self.payoffs[0][0].0;
        self.payoffs.iter().flatten().all(|&(a, _)| a == first)
    }

    fn column_payoffs_equal(&self) -> bool {
        let first = self.payoffs[0][0].1;
        self.payoffs.iter().flatten().all(|&(_, b)| b == first)
    }

    pub fn row_has_dominant_strategy(&self) -> bool {
        let (d0, d1) = (
            self.payoffs[0][0].0 - self.payoffs[1][0].0,
            self.payoffs[0][1].0 - self.payoffs[1][1].0,
        );
        (d0 >= 0 && d1 >= 0) || (d0 <= 0 && d1 <= 0)
    }

    pub fn column_has_dominant_strategy(&self) -> bool {
        let (d0, d1) = (
            self.payoffs[0][0].1 - self.payoffs[0][1].1,
            self.payoffs[1][0].1 - self.payoffs[1][1].1,
        );
        (d0 >= 0 && d1 >= 0) || (d0 <= 0 && d1 <= 0)
    }

    /// Why the table makes a poor exercise, `None` if it is fine.
    pub fn degeneracy(&self) -> Option<String> {
        if self.row_payoffs_equal() {
            return Some(format!("all payoffs of {} are equal", self.row_player));
        }
        if self.column_payoffs_equal() {
            return Some(format!("all payoffs of {} are equal", self.column_player));
        }
        for j in 0..2 {
            if self.payoffs[0][j].0 == self.payoffs[1][j].0 {
                return Some(format!(
                    "{} is indifferent against {}",
                    self.row_player, self.column_strategies[j]
                ));
            }
        }
        for i in 0..2 {
            if self.payoffs[i][0].1 == self.payoffs[i][1].1 {
                return Some(format!(
                    "{} is indifferent against {}",
                    self.column_player, self.row_strategies[i]
                ));
            }
        }
        None
    }

    pub fn solve(&self) -> NashSolution {
        let mut pure = Vec::new();
        for i in 0..2 {
            for j in 0..2 {
                let row_best = self.payoffs[i][j].0 >= self.payoffs[1 - i][j].0;
                let column_best = self.payoffs[i][j].1 >= self.payoffs[i][1 - j].1;
                if row_best && column_best {
                    pure.push((i, j));
                }
            }
        }
        let mixed = if self.row_payoffs_equal() || self.column_payoffs_equal() {
            MixedOutcome::NotComputed
        } else if self.row_has_dominant_strategy() || self.column_has_dominant_strategy() {
            MixedOutcome::NoMixedEquilibrium
        } else {
            // q makes the row player indifferent, p the column player
            let q = (self.row(1, 1) - self.row(0, 1))
                / (self.row(0, 0) - self.row(0, 1) - self.row(1, 0) + self.row(1, 1));
            let p = (self.column(1, 1) - self.column(1, 0))
                / (self.column(0, 0) - self.column(1, 0) - self.column(0, 1) + self.column(1, 1));
            MixedOutcome::Equilibrium { p, q }
        };
        NashSolution { pure, mixed }
    }

    /// Plain text table with `(row payoff, column payoff)` cells.
    pub fn render(&self) -> String {
        let mut builder = Builder::default();
        let mut header = vec![format!("{} \\ {}", self.row_player, self.column_player)];
        header.extend(self.column_strategies.iter().cloned());
        builder.push_record(header);
        for i in 0..2 {
            let mut record = vec![self.row_strategies[i].clone()];
            for j in 0..2 {
                let (a, b) = self.payoffs[i][j];
                record.push(format!("({}, {})", a, b));
            }
            builder.push_record(record);
        }
        let mut table = builder.build();
        table.with(Style::modern_rounded());
        table.to_string()
    }

    pub fn to_latex(&self) -> String {
        let mut latex = format!(
            "\\begin{{array}}{{c|cc}} & \\text{{{}}} & \\text{{{}}} \\\\ \\hline ",
            self.column_strategies[0], self.column_strategies[1]
        );
        for i in 0..2 {
            latex.push_str(&format!(
                "\\text{{{}}} & ({}, {}) & ({}, {}) \\\\ ",
                self.row_strategies[i],
                self.payoffs[i][0].0,
                self.payoffs[i][0].1,
                self.payoffs[i][1].0,
                self.payoffs[i][1].1
            ));
        }
        latex.push_str("\\end{array}");
        latex
    }

    /// Answer text of a solution of this table.
    pub fn describe(&self, solution: &NashSolution) -> String {
        let pure = if solution.pure.is_empty() {
            "no pure equilibrium".to_string()
        } else {
            solution
                .pure
                .iter()
                .map(|&(i, j)| {
                    let (a, b) = self.payoffs[i][j];
                    format!(
                        "({}, {}) with payoffs ({}, {})",
                        self.row_strategies[i], self.column_strategies[j], a, b
                    )
                })
                .collect::<Vec<_>>()
                .join(", ")
        };
        let mixed = match solution.mixed {
            MixedOutcome::Equilibrium { p, q } => format!(
                "{} plays {} with p = {}, {} plays {} with q = {}",
                self.row_player,
                self.row_strategies[0],
                format_decimal(p, 2),
                self.column_player,
                self.column_strategies[0],
                format_decimal(q, 2)
            ),
            MixedOutcome::NoMixedEquilibrium => {
                "no mixed equilibrium (dominant strategy)".to_string()
            }
            MixedOutcome::NotComputed => "mixed equilibrium not computed".to_string(),
        };
        format!("Pure: {}; Mixed: {}", pure, mixed)
    }
}

#[derive(Default)]
pub struct NashGenerator {
    config: NashConfig,
}

impl NashGenerator {
    pub fn new(config: NashConfig) -> Self {
        Self { config }
    }

    pub fn random_table(&self, rng: &mut StdRng) -> PayoffTable {
        let (lo, hi) = self.config.payoff_range;
        let mut payoffs = [[(0, 0); 2]; 2];
        for cell in payoffs.iter_mut().flatten() {
            *cell = (rng.random_range(lo..=hi), rng.random_range(lo..=hi));
        }
        PayoffTable::new(payoffs, &self.config)
    }
}

impl ProblemGenerator for NashGenerator {
    fn kind(&self) -> ProblemKind {
        ProblemKind::Nash
    }

    fn generate(&self, rng: &mut StdRng) -> Result<Problem, GenerationError> {
        let mut last_reason = String::new();
        for attempt in 1..=MAX_ATTEMPTS {
            let table = self.random_table(rng);
            if let Some(reason) = table.degeneracy() {
                debug!("nash: attempt {} rejected: {}", attempt, reason);
                last_reason = reason;
                continue;
            }
            let solution = table.solve();
            debug!("nash: accepted {:?} -> {:?}", table.payoffs, solution);
            let answer = table.describe(&solution);
            return Ok(Problem {
                kind: ProblemKind::Nash,
                statement: table.render(),
                latex: Some(LatexPair {
                    statement: table.to_latex(),
                    answer: answer.clone(),
                }),
                answer,
                graph: None,
            });
        }
        Err(GenerationError::new(ProblemKind::Nash, MAX_ATTEMPTS, last_reason))
    }
}
