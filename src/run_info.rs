use chrono::{DateTime, Local};
use serde::Serialize;

/// Run metadata logged at the start and end of a training run: the
/// corpus and output paths, thread count, and wall-clock start/end
/// timestamps.
#[derive(Clone, Serialize)]
pub struct RunInfo {
    corpus: String,
    output: Option<String>,
    n_threads: u32,
    start_datetime: String,
    end_datetime: Option<String>,
}

impl RunInfo {
    pub fn new(corpus: String, output: Option<String>, n_threads: u32) -> Self {
        let start: DateTime<Local> = Local::now();
        RunInfo {
            corpus,
            output,
            n_threads,
            start_datetime: start.format("%Y-%m-%d %H:%M:%S").to_string(),
            end_datetime: None,
        }
    }

    pub fn set_end(&mut self) {
        let end: DateTime<Local> = Local::now();
        self.end_datetime = Some(end.format("%Y-%m-%d %H:%M:%S").to_string());
    }
}
