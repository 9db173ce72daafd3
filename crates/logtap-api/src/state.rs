use logtap_core::TailReader;
use std::path::PathBuf;

use crate::config::Settings;

pub struct AppState {
    pub settings: Settings,
    pub reader: TailReader,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            reader: TailReader::new(),
        }
    }

    /// `filename` must already have passed validation.
    pub fn log_path(&self, filename: &str) -> PathBuf {
        self.settings.log_directory.join(filename)
    }
}
