use crate::generators::Problem;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Tabled)]
pub struct ProblemRow {
    #[tabled(rename = "#")]
    number: usize,
    problem: String,
    answer: String,
}

/// Numbered problem/answer table of a grid
pub fn problems_table(problems: &[Problem]) -> String {
    let rows: Vec<ProblemRow> = problems
        .iter()
        .enumerate()
        .map(|(i, p)| ProblemRow {
            number: i + 1,
            problem: p.statement.clone(),
            answer: p.answer.clone(),
        })
        .collect();
    let mut table = Table::new(&rows);
    table.with(Style::modern_rounded());
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::ProblemKind;

    #[test]
    fn test_problems_table() {
        let problems = vec![
            Problem {
                kind: ProblemKind::Derivatives,
                statement: "3*x^2".to_string(),
                answer: "6*x".to_string(),
                latex: None,
                graph: None,
            },
            Problem {
                kind: ProblemKind::Derivatives,
                statement: "sin(x)".to_string(),
                answer: "cos(x)".to_string(),
                latex: None,
                graph: None,
            },
        ];
        let table = problems_table(&problems);
        for needle in ["#", "problem", "answer", "3*x^2", "6*x", "cos(x)", "2"] {
            assert!(table.contains(needle), "{}", table);
        }
        assert!(table.lines().count() >= 4);
    }
}
