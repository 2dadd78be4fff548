use crate::numerical::volumes::CurveGraph;
use chrono::Local;
use csv::Writer;
use log::LevelFilter;
use simplelog::*;
use std::error::Error;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// `log_<timestamp>.txt`
pub fn log_file_name() -> String {
    let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
    format!("log_{}.txt", date_and_time)
}

/// Terminal logger at `level`; with `log_dir` also a debug level file logger in that directory.
/// Returns the path of the log file, if any.
pub fn init_logger(level: LevelFilter, log_dir: Option<&Path>) -> Result<Option<PathBuf>, Box<dyn Error>> {
    let terminal: Box<dyn SharedLogger> = TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    );
    match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let path = dir.join(log_file_name());
            let file: Box<dyn SharedLogger> =
                WriteLogger::new(LevelFilter::Debug, Config::default(), File::create(&path)?);
            CombinedLogger::init(vec![terminal, file])?;
            Ok(Some(path))
        }
        None => {
            CombinedLogger::init(vec![terminal])?;
            Ok(None)
        }
    }
}

/// Writes the sampled points of a curve as `x,<curve label>` rows.
pub fn save_points_to_csv(graph: &CurveGraph, path: &Path) -> Result<(), csv::Error> {
    let file = File::create(path)?;
    let mut writer = Writer::from_writer(file);
    writer.write_record(["x", graph.label.as_str()])?;
    for (x, y) in &graph.points {
        writer.write_record([x.to_string(), y.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}
