pub mod init;
pub mod packets;
pub mod quiz;
pub mod scores;
pub mod validate;

use std::path::PathBuf;

use anyhow::Result;

use verbivisa_core::config::{load_config_from, VisaConfig};
use verbivisa_core::model::WordTable;
use verbivisa_core::words::load_words;

use crate::SourceArgs;

/// Configuration plus the word list a command works on.
pub struct Workspace {
    pub config: VisaConfig,
    pub words: WordTable,
}

impl SourceArgs {
    pub fn load_config(&self) -> Result<VisaConfig> {
        load_config_from(self.config.as_deref())
    }

    /// The selected word list: `--words`, else the configured default.
    pub fn words_path(&self, config: &VisaConfig) -> PathBuf {
        self.words.clone().unwrap_or_else(|| config.words.clone())
    }

    /// Load the configuration and the selected word list.
    pub fn open(&self) -> Result<Workspace> {
        let config = self.load_config()?;
        let words = load_words(&self.words_path(&config), &config.columns)?;
        Ok(Workspace { config, words })
    }
}
