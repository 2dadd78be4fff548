//! Grid parameters and the task document they are read from.
//!
//! A task document is a sequence of sections, each a title followed by `key: value, value`
//! pairs; lines starting with `//`, `#`, `%` or `;` are comments:
//! ```text
//! grid
//! type: volumes n: 3 difficulty: extreme
//! x_left: 0 x_right: 1
//! lm: 60 tm: 80 bm: 60 columns: 1
//! document
//! name: volumes_extreme size: a4 seed: 42
//! ```
use crate::errors::ConfigurationError;
use crate::generators::{Difficulty, ProblemKind};
use crate::grid::grid_layout::PageSize;
use log::warn;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{alpha1, alphanumeric1, multispace0, space0},
    combinator::{map, recognize},
    multi::{many0, many1, separated_list0},
    sequence::{delimited, pair, separated_pair, terminated},
};
use std::collections::HashMap;
use std::fmt::{self, Display};
use std::path::Path;
use std::str::FromStr;

/// Largest grid that fits on one worksheet page
pub const MAX_PROBLEMS: usize = 60;

type SectionMap = HashMap<String, Vec<Value>>;
type DocumentMap = HashMap<String, SectionMap>;

/// A scalar of a task document
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Float(f64),
    Integer(i64),
    Boolean(bool),
}

impl Value {
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        if let Value::Integer(i) = self {
            Some(*i)
        } else {
            None
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::Float(val) => write!(f, "{}", val),
            Value::Integer(val) => write!(f, "{}", val),
            Value::Boolean(val) => write!(f, "{}", val),
        }
    }
}

fn parse_identifier(input: &str) -> IResult<&str, String> {
    let parser = recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ));
    map(parser, String::from).parse(input)
}

fn parse_value(input: &str) -> IResult<&str, Value> {
    let value_parser = take_while1(|c: char| !matches!(c, ',' | ' ' | '\t' | '\r' | '\n' | ';'));
    map(value_parser, |s: &str| {
        if let Ok(val) = s.parse::<i64>() {
            Value::Integer(val)
        } else if let Ok(val) = s.parse::<f64>() {
            Value::Float(val)
        } else if let Ok(val) = s.parse::<bool>() {
            Value::Boolean(val)
        } else {
            Value::String(s.to_string())
        }
    })
    .parse(input)
}

fn parse_value_list(input: &str) -> IResult<&str, Vec<Value>> {
    let (input, _) = space0(input)?;
    let separator = delimited(space0, tag(","), space0);
    separated_list0(separator, parse_value).parse(input)
}

fn parse_key_value_pair(input: &str) -> IResult<&str, (String, Vec<Value>)> {
    let colon = delimited(space0, tag(":"), space0);
    let (input, result) = separated_pair(parse_identifier, colon, parse_value_list).parse(input)?;
    Ok((input.trim_start(), result))
}

fn parse_section(input: &str) -> IResult<&str, (String, SectionMap)> {
    let (input, title) = parse_identifier(input)?;
    let (input, _) = multispace0(input)?;
    let (input, pairs) = many1(terminated(parse_key_value_pair, multispace0)).parse(input)?;
    Ok((input, (title, pairs.into_iter().collect())))
}

fn filter_comments(input: &str) -> String {
    input
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty()
                && !trimmed.starts_with("//")
                && !trimmed.starts_with('#')
                && !trimmed.starts_with('%')
                && !trimmed.starts_with(';')
        })
        .collect::<Vec<&str>>()
        .join("\n")
}

/// Parses a whole task document into `section -> key -> values`.
pub fn parse_document(input: &str) -> Result<DocumentMap, ConfigurationError> {
    let filtered = filter_comments(input);
    let mut parser = many1(delimited(multispace0, parse_section, multispace0));
    let (remaining, sections) = parser
        .parse(filtered.as_str())
        .map_err(|e| ConfigurationError::Parse(format!("{:?}", e)))?;
    if !remaining.trim().is_empty() {
        return Err(ConfigurationError::Parse(format!(
            "failed to parse entire document, remaining: '{}'",
            remaining
        )));
    }
    let mut document = DocumentMap::new();
    for (title, section) in sections {
        document.entry(title).or_default().extend(section);
    }
    Ok(document)
}

/// What to generate and how to lay it out
#[derive(Debug, Clone, PartialEq)]
pub struct GridSpec {
    pub kind: ProblemKind,
    pub n: usize,
    pub difficulty: Difficulty,
    /// rotation region of volumes, search window of horizontal tangents
    pub region: Option<(f64, f64)>,
    /// expansion point of Taylor problems
    pub center: f64,
    pub columns: usize,
    /// left (and right) margin
    pub lm: f64,
    pub tm: f64,
    pub bm: f64,
    /// RNG seed, `None` for OS entropy
    pub seed: Option<u64>,
}

impl GridSpec {
    pub fn new(kind: ProblemKind, n: usize) -> Self {
        Self {
            kind,
            n,
            difficulty: Difficulty::Simple,
            region: None,
            center: 1.0,
            columns: 1,
            lm: 0.0,
            tm: 0.0,
            bm: 0.0,
            seed: None,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.n == 0 || self.n > MAX_PROBLEMS {
            return Err(ConfigurationError::ProblemCountOutOfRange {
                n: self.n as i64,
                max: MAX_PROBLEMS,
            });
        }
        if let Some((x_left, x_right)) = self.region {
            if !(x_left.is_finite() && x_right.is_finite()) || x_left >= x_right {
                return Err(ConfigurationError::InvalidRegion { x_left, x_right });
            }
        }
        if !self.center.is_finite() {
            return Err(ConfigurationError::InvalidValue {
                key: "a".to_string(),
                value: self.center.to_string(),
            });
        }
        for (name, value) in [("lm", self.lm), ("tm", self.tm), ("bm", self.bm)] {
            if !(value >= 0.0) {
                return Err(ConfigurationError::NegativeMargin { name, value });
            }
        }
        if self.columns == 0 {
            return Err(ConfigurationError::ZeroColumns);
        }
        Ok(())
    }

    /// The `grid` section of a task document.
    pub fn from_document(input: &str) -> Result<Self, ConfigurationError> {
        TaskDocument::parse(input).map(|task| task.grid)
    }
}

/// A parsed task document: the grid plus page level settings
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDocument {
    pub grid: GridSpec,
    pub page: PageSize,
    /// base name of the output files
    pub name: String,
}

fn single<'a>(section: &'a SectionMap, key: &str) -> Result<Option<&'a Value>, ConfigurationError> {
    match section.get(key).map(Vec::as_slice) {
        None => Ok(None),
        Some([value]) => Ok(Some(value)),
        Some(values) => Err(ConfigurationError::InvalidValue {
            key: key.to_string(),
            value: values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", "),
        }),
    }
}

fn invalid(key: &str, value: &Value) -> ConfigurationError {
    ConfigurationError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn float_of(section: &SectionMap, key: &str) -> Result<Option<f64>, ConfigurationError> {
    single(section, key)?
        .map(|v| v.as_float().ok_or_else(|| invalid(key, v)))
        .transpose()
}

fn integer_of(section: &SectionMap, key: &str) -> Result<Option<i64>, ConfigurationError> {
    single(section, key)?
        .map(|v| v.as_integer().ok_or_else(|| invalid(key, v)))
        .transpose()
}

const GRID_KEYS: [&str; 10] = [
    "type", "n", "difficulty", "x_left", "x_right", "a", "columns", "lm", "tm", "bm",
];

impl TaskDocument {
    pub fn parse(input: &str) -> Result<Self, ConfigurationError> {
        let document = parse_document(input)?;
        let grid = document
            .get("grid")
            .ok_or_else(|| ConfigurationError::MissingKey("grid".to_string()))?;
        for key in grid.keys() {
            if !GRID_KEYS.contains(&key.as_str()) {
                warn!("unknown key '{}' in section grid ignored", key);
            }
        }

        let kind = match single(grid, "type")? {
            Some(value) => ProblemKind::from_str(&value.to_string())
                .map_err(|_| ConfigurationError::UnknownProblemType(value.to_string()))?,
            None => return Err(ConfigurationError::MissingKey("type".to_string())),
        };
        let n = integer_of(grid, "n")?.unwrap_or(9);
        if n < 1 || n > MAX_PROBLEMS as i64 {
            return Err(ConfigurationError::ProblemCountOutOfRange { n, max: MAX_PROBLEMS });
        }
        let mut spec = GridSpec::new(kind, n as usize);
        if let Some(value) = single(grid, "difficulty")? {
            spec.difficulty = Difficulty::from_str(&value.to_string())
                .map_err(|_| ConfigurationError::UnknownDifficulty(value.to_string()))?;
        }
        spec.region = match (float_of(grid, "x_left")?, float_of(grid, "x_right")?) {
            (Some(x_left), Some(x_right)) => Some((x_left, x_right)),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigurationError::MissingKey("x_right".to_string())),
            (None, Some(_)) => return Err(ConfigurationError::MissingKey("x_left".to_string())),
        };
        if let Some(center) = float_of(grid, "a")? {
            spec.center = center;
        }
        if let Some(columns) = integer_of(grid, "columns")? {
            spec.columns = usize::try_from(columns).map_err(|_| ConfigurationError::ZeroColumns)?;
        }
        spec.lm = float_of(grid, "lm")?.unwrap_or(spec.lm);
        spec.tm = float_of(grid, "tm")?.unwrap_or(spec.tm);
        spec.bm = float_of(grid, "bm")?.unwrap_or(spec.bm);

        let empty = SectionMap::new();
        let page_section = document.get("document").unwrap_or(&empty);
        if let Some(seed) = integer_of(page_section, "seed")? {
            spec.seed = Some(u64::try_from(seed).map_err(|_| ConfigurationError::InvalidValue {
                key: "seed".to_string(),
                value: seed.to_string(),
            })?);
        }
        let page = match single(page_section, "size")? {
            Some(value) => PageSize::from_str(&value.to_string())?,
            None => PageSize::letter(),
        };
        let name = match single(page_section, "name")? {
            Some(value) => value.to_string(),
            None => kind.to_string(),
        };
        spec.validate()?;
        Ok(TaskDocument {
            grid: spec,
            page,
            name,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigurationError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigurationError::Parse(format!("cannot read {}: {}", path.display(), e)))?;
        Self::parse(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("123, next").unwrap(), (", next", Value::Integer(123)));
        assert_eq!(parse_value("0.5 x").unwrap(), (" x", Value::Float(0.5)));
        assert_eq!(parse_value("true").unwrap(), ("", Value::Boolean(true)));
        assert_eq!(
            parse_value("volumes\n").unwrap(),
            ("\n", Value::String("volumes".to_string()))
        );
    }

    #[test]
    fn test_parse_document_sections() {
        let input = "grid\n type: taylor n: 4\n a: 0.5\n// comment\ndocument\n size: a4";
        let document = parse_document(input).unwrap();
        assert_eq!(document.len(), 2);
        let grid = &document["grid"];
        assert_eq!(grid["type"], vec![Value::String("taylor".to_string())]);
        assert_eq!(grid["n"], vec![Value::Integer(4)]);
        assert_eq!(grid["a"], vec![Value::Float(0.5)]);
        assert_eq!(document["document"]["size"], vec![Value::String("a4".to_string())]);
    }

    #[test]
    fn test_value_lists() {
        let document = parse_document("grid\n labels: a, b ,c").unwrap();
        assert_eq!(document["grid"]["labels"].len(), 3);
    }

    #[test]
    fn test_malformed_document() {
        assert!(matches!(
            parse_document("grid type volumes"),
            Err(ConfigurationError::Parse(_))
        ));
        assert!(parse_document("").is_err());
    }
}
