//! different utility modules used by the binary and the benchmarks
/// logger initialisation and CSV export of sampled curves
pub mod logger;
/// PNG plots of volume curves
pub mod plots;
/// pretty-printed problem/answer tables
pub mod tables;
