//! # Grid orchestrator
//!
//! A grid is the block of `n` generated problems of one type placed on a worksheet page.
//!
//! - [`grid_config`] - `GridSpec` (what to generate and how to lay it out), its validation and
//!   the task document parser
//! - [`grid_builder`] - runs the selected generator `n` times on one seeded RNG, with the
//!   `Pending -> Generating -> Done | Failed` state machine
//! - [`grid_layout`] - cell coordinates of the finished grid on a page
//!
//! ## Example
//! ```
//! use RustedWorksheets::grid::grid_config::GridSpec;
//! use RustedWorksheets::grid::grid_builder::GridBuilder;
//! use RustedWorksheets::grid::grid_layout::PageSize;
//! use RustedWorksheets::generators::ProblemKind;
//! let mut spec = GridSpec::new(ProblemKind::Nash, 4);
//! spec.seed = Some(7);
//! spec.columns = 2;
//! let grid = GridBuilder::new(spec).build().unwrap();
//! assert_eq!(grid.problems.len(), 4);
//! let cells = grid.placements(&PageSize::letter()).unwrap();
//! assert_eq!(cells[1].column, 1);
//! ```
pub mod grid_builder;
pub mod grid_config;
pub mod grid_layout;
#[cfg(test)]
mod grid_tests;
