//! Interactive flow: prompts the user and sequences listing, estimation,
//! fetch, thumbnail conversion, relay and cleanup.
//!
//! Resources are processed strictly one after another. In a collection run
//! every member is fail-isolated: an error is logged with the member's title
//! and the loop moves on.

use crate::core::context::RunContext;
use crate::core::error::AppError;
use crate::core::validation::{
    ensure_resource_url, is_selection_valid, parse_container_choice, parse_selection, ValidationError,
};
use crate::download::cleanup::ArtifactGuard;
use crate::download::types::{format_duration, ContainerKind, FormatSelection, PlaylistEntry, ResourceInfo};
use crate::download::{estimate_size_mb, fetch, is_collection, list_entries, list_formats};
use std::fmt;
use std::io::{self, BufRead, Write};
use strum::IntoEnumIterator;

/// Source of user answers
pub trait Prompter {
    /// Shows `prompt` and returns the trimmed answer.
    ///
    /// End of input is an `UnexpectedEof` error.
    fn ask(&mut self, prompt: &str) -> io::Result<String>;
}

/// Reads answers from standard input
#[derive(Debug, Default)]
pub struct StdinPrompter;

impl Prompter for StdinPrompter {
    fn ask(&mut self, prompt: &str) -> io::Result<String> {
        print!("{}", prompt);
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim().to_string())
    }
}

/// Asks for the resource URL; re-prompts on a malformed URL, fails on empty input.
pub fn prompt_url<P: Prompter + ?Sized>(prompter: &mut P) -> Result<String, AppError> {
    loop {
        let url = prompter.ask("Enter YouTube video or playlist URL: ")?;
        if url.is_empty() {
            return Err(ValidationError::EmptyInput.into());
        }
        match ensure_resource_url(&url) {
            Ok(()) => return Ok(url),
            Err(e) => println!("{}. Please try again.", e),
        }
    }
}

/// Asks for a cookie file path; empty input keeps `default`.
pub fn prompt_cookie_file<P: Prompter + ?Sized>(
    prompter: &mut P,
    default: Option<&str>,
) -> Result<Option<String>, AppError> {
    let prompt = match default {
        Some(d) => format!("Cookie file path (Enter for {}, '-' for none): ", d),
        None => "Cookie file path (Enter to skip): ".to_string(),
    };
    let answer = prompter.ask(&prompt)?;
    Ok(match answer.as_str() {
        "" => default.map(String::from),
        "-" => None,
        path => Some(path.to_string()),
    })
}

/// Final tally of a collection run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub total: usize,
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} successful", self.succeeded, self.total)
    }
}

/// How a single-resource run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SingleOutcome {
    Uploaded,
    /// The user declined the oversize confirmation
    Declined,
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Single(SingleOutcome),
    Collection(BatchSummary),
}

/// What happened to one collection member
#[derive(Debug, Clone, PartialEq)]
enum MemberOutcome {
    Uploaded,
    Skipped { size_mb: f64 },
}

pub struct Orchestrator<P: Prompter> {
    ctx: RunContext,
    prompter: P,
}

impl<P: Prompter> Orchestrator<P> {
    pub fn new(ctx: RunContext, prompter: P) -> Self {
        Self { ctx, prompter }
    }

    pub fn context(&self) -> &RunContext {
        &self.ctx
    }

    pub fn prompter(&self) -> &P {
        &self.prompter
    }

    /// Dispatches to the collection or single-resource flow
    pub async fn run(&mut self, url: &str) -> Result<RunOutcome, AppError> {
        if is_collection(self.ctx.extractor.as_ref(), url).await {
            self.run_collection(url).await.map(RunOutcome::Collection)
        } else {
            self.run_single(url).await.map(RunOutcome::Single)
        }
    }

    pub async fn run_single(&mut self, url: &str) -> Result<SingleOutcome, AppError> {
        println!("Fetching available formats...");
        let info = list_formats(self.ctx.extractor.as_ref(), url).await?;
        self.print_resource(&info)?;

        let selection = self.prompt_selection(&info)?;
        let container = self.prompt_container()?;

        let size_mb = estimate_size_mb(self.ctx.extractor.as_ref(), url, &selection).await;
        println!("Estimated size: {:.1} MB", size_mb);

        let ceiling = self.ctx.settings.max_size_mb;
        if size_mb > ceiling {
            let prompt = format!(
                "Estimated size {:.1} MB exceeds {:.0} MB. Continue anyway? [Y/n]: ",
                size_mb, ceiling
            );
            if !self.confirm(&prompt)? {
                println!("Download cancelled.");
                return Ok(SingleOutcome::Declined);
            }
        }

        self.deliver(url, &selection, container).await?;
        Ok(SingleOutcome::Uploaded)
    }

    pub async fn run_collection(&mut self, url: &str) -> Result<BatchSummary, AppError> {
        println!("Fetching playlist entries...");
        let entries = list_entries(self.ctx.extractor.as_ref(), url).await?;

        println!("\nPlaylist contains {} videos:", entries.len());
        for (i, entry) in entries.iter().enumerate() {
            println!("{}. {}", i + 1, entry.title);
        }

        let indices = self.prompt_indices(entries.len())?;
        let container = self.prompt_container()?;

        let mut summary = BatchSummary {
            succeeded: 0,
            total: indices.len(),
        };
        let mut remembered: Option<FormatSelection> = None;

        for (position, &index) in indices.iter().enumerate() {
            let entry = &entries[index];
            println!("\n[{}/{}] {}", position + 1, summary.total, entry.title);

            match self.process_member(entry, container, &mut remembered).await {
                Ok(MemberOutcome::Uploaded) => summary.succeeded += 1,
                Ok(MemberOutcome::Skipped { size_mb }) => {
                    log::info!(
                        "Skipping '{}': {:.1} MB exceeds {:.0} MB",
                        entry.title,
                        size_mb,
                        self.ctx.settings.playlist_max_size_mb
                    );
                }
                Err(e) => {
                    log::error!("Failed to process '{}' ({}): {}", entry.title, e.kind(), e);
                    println!("Error processing {}: {}", entry.title, e);
                }
            }
        }

        println!("\n{}", summary);
        Ok(summary)
    }

    async fn process_member(
        &mut self,
        entry: &PlaylistEntry,
        container: ContainerKind,
        remembered: &mut Option<FormatSelection>,
    ) -> Result<MemberOutcome, AppError> {
        let info = list_formats(self.ctx.extractor.as_ref(), &entry.url).await?;
        if info.video_formats.is_empty() {
            return Err(AppError::Extraction(format!("No video formats available for {}", entry.title)));
        }

        let reusable = remembered.as_ref().filter(|s| {
            is_selection_valid(&info.video_formats, &s.video)
                && s.audio
                    .as_deref()
                    .map_or(true, |a| is_selection_valid(&info.audio_formats, a))
        });
        let selection = match reusable {
            Some(selection) => {
                log::debug!("Reusing formats {} for '{}'", selection.spec(), entry.title);
                selection.clone()
            }
            None => {
                self.print_resource(&info)?;
                let selection = self.prompt_selection(&info)?;
                *remembered = Some(selection.clone());
                selection
            }
        };

        let size_mb = estimate_size_mb(self.ctx.extractor.as_ref(), &entry.url, &selection).await;
        if size_mb > self.ctx.settings.playlist_max_size_mb {
            return Ok(MemberOutcome::Skipped { size_mb });
        }

        self.deliver(&entry.url, &selection, container).await?;
        Ok(MemberOutcome::Uploaded)
    }

    /// Fetch, thumbnail conversion and relay of one resource; artifacts are
    /// removed when the guard drops, whatever the outcome.
    async fn deliver(&self, url: &str, selection: &FormatSelection, container: ContainerKind) -> Result<(), AppError> {
        println!("Downloading...");
        let result = fetch(
            self.ctx.extractor.as_ref(),
            url,
            selection,
            container,
            &self.ctx.settings.download_dir,
        )
        .await?;
        let mut guard = ArtifactGuard::new(result);

        if let Some(original) = guard.result().thumbnail_path.clone() {
            let converted = self.ctx.thumbnails.convert(&original).await;
            guard.result_mut().thumbnail_path = converted;
        }

        println!("Uploading to Telegram...");
        self.ctx.relay.send_video(guard.result()).await?;
        println!("Successfully uploaded: {}", guard.result().title);
        Ok(())
    }

    fn print_resource(&self, info: &ResourceInfo) -> Result<(), AppError> {
        if info.video_formats.is_empty() {
            return Err(AppError::Extraction(format!("No video formats available for {}", info.title)));
        }

        println!("\nTitle: {}", info.title);
        println!("Duration: {}", format_duration(info.duration));

        println!("\nAvailable video formats:");
        for descriptor in info.video_formats.iter() {
            println!("  {}", descriptor);
        }
        if !info.audio_formats.is_empty() {
            println!("\nAvailable audio formats:");
            for descriptor in info.audio_formats.iter() {
                println!("  {}", descriptor);
            }
        }
        Ok(())
    }

    /// Video id (re-prompted until listed) and optional audio id (an unknown id is dropped)
    fn prompt_selection(&mut self, info: &ResourceInfo) -> Result<FormatSelection, AppError> {
        let video = loop {
            let answer = self.prompter.ask("\nEnter video format ID: ")?;
            if is_selection_valid(&info.video_formats, &answer) {
                break answer;
            }
            println!("Invalid video format ID. Please choose one from the list.");
        };

        let audio = if info.audio_formats.is_empty() {
            None
        } else {
            let answer = self.prompter.ask("Enter audio format ID (or press Enter to skip): ")?;
            if answer.is_empty() {
                None
            } else if is_selection_valid(&info.audio_formats, &answer) {
                Some(answer)
            } else {
                log::warn!("Invalid audio format ID '{}'", answer);
                println!("Warning: Invalid audio format ID. Proceeding without separate audio.");
                None
            }
        };

        Ok(FormatSelection::new(video, audio))
    }

    fn prompt_container(&mut self) -> Result<ContainerKind, AppError> {
        println!("\nAvailable output formats:");
        for (i, kind) in ContainerKind::iter().enumerate() {
            println!("{}. {}", i + 1, kind);
        }

        loop {
            let answer = self
                .prompter
                .ask(&format!("Choose output format (Enter for {}): ", ContainerKind::default()))?;
            match parse_container_choice(&answer) {
                Ok(kind) => return Ok(kind),
                Err(e) => println!("{}. Please try again.", e),
            }
        }
    }

    fn prompt_indices(&mut self, len: usize) -> Result<Vec<usize>, AppError> {
        loop {
            let answer = self
                .prompter
                .ask("\nEnter video numbers to download (e.g. 1,3-5 or 'all'): ")?;
            match parse_selection(&answer, len) {
                Ok(indices) => return Ok(indices),
                Err(e) => println!("{}. Please try again.", e),
            }
        }
    }

    /// Yes/no question that defaults to yes
    fn confirm(&mut self, prompt: &str) -> Result<bool, AppError> {
        let answer = self.prompter.ask(prompt)?.to_ascii_lowercase();
        Ok(!matches!(answer.as_str(), "n" | "no"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    struct Answers(VecDeque<String>);

    impl Answers {
        fn new(answers: &[&str]) -> Self {
            Self(answers.iter().map(|a| a.to_string()).collect())
        }
    }

    impl Prompter for Answers {
        fn ask(&mut self, _prompt: &str) -> io::Result<String> {
            self.0
                .pop_front()
                .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no more answers"))
        }
    }

    #[test]
    fn test_prompt_url_reprompts_on_invalid() {
        let mut answers = Answers::new(&["not a url", "https://youtu.be/abc"]);
        assert_eq!(prompt_url(&mut answers).unwrap(), "https://youtu.be/abc");
    }

    #[test]
    fn test_prompt_url_empty_is_error() {
        let mut answers = Answers::new(&[""]);
        assert!(matches!(
            prompt_url(&mut answers),
            Err(AppError::Validation(ValidationError::EmptyInput))
        ));
    }

    #[test]
    fn test_prompt_url_eof_is_io_error() {
        let mut answers = Answers::new(&[]);
        assert!(matches!(prompt_url(&mut answers), Err(AppError::Io(_))));
    }

    #[test]
    fn test_prompt_cookie_file() {
        let mut answers = Answers::new(&["", "-", "~/c.txt"]);
        assert_eq!(
            prompt_cookie_file(&mut answers, Some("/etc/cookies.txt")).unwrap(),
            Some("/etc/cookies.txt".to_string())
        );
        assert_eq!(prompt_cookie_file(&mut answers, Some("/etc/cookies.txt")).unwrap(), None);
        assert_eq!(prompt_cookie_file(&mut answers, None).unwrap(), Some("~/c.txt".to_string()));
    }

    #[test]
    fn test_batch_summary_display() {
        let summary = BatchSummary { succeeded: 2, total: 3 };
        assert_eq!(summary.to_string(), "2/3 successful");
    }
}
