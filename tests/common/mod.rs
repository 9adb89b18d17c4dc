//! Common test utilities
//!
//! This module is shared across all integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;
use std::path::Path;
use std::sync::Arc;
use ytrelay::config::Settings;
use ytrelay::conversion::{ImageCrateStrategy, ThumbnailConverter};
use ytrelay::download::ExtractionBackend;
use ytrelay::telegram::Relay;
use ytrelay::{Prompter, RunContext};

/// Prompter answering from a fixed script; running out of answers is EOF
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    pub asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            asked: Vec::new(),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, prompt: &str) -> io::Result<String> {
        self.asked.push(prompt.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, format!("unexpected prompt: {}", prompt)))
    }
}

pub fn settings_in(dir: &Path) -> Settings {
    Settings {
        download_dir: dir.to_path_buf(),
        ..Default::default()
    }
}

/// Context with in-process thumbnail conversion only (no ffmpeg needed)
pub fn context(settings: Settings, extractor: Arc<dyn ExtractionBackend>, relay: Arc<dyn Relay>) -> RunContext {
    RunContext::new(
        settings,
        extractor,
        relay,
        ThumbnailConverter::with_strategies(vec![Box::new(ImageCrateStrategy)]),
    )
}

/// File names left in `dir`, sorted
pub fn remaining_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs_err::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
