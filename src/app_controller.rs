use anyhow::{Context, Result};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app_config::Config;
use crate::database::{DatabaseConnection, Repository, SearchFilters, TransactionRecord};
use crate::file_utils::{FileManager, TEXT_EXTENSION};
use crate::pipeline::{Pipeline, PipelineReport};
use crate::providers::{Translator, create_translator};
use crate::translation::augmenter::CancellationFlag;

// @module: Application controller for certificate processing

/// Result of processing one input file
#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub report: PipelineReport,
    /// Ids of the stored records; empty on a dry run
    pub stored_ids: Vec<i64>,
}

/// Totals of a folder run
#[derive(Debug, Clone, Default)]
pub struct FolderSummary {
    pub outcomes: Vec<FileOutcome>,
    pub failed_files: usize,
    pub cancelled: bool,
}

impl FolderSummary {
    pub fn record_count(&self) -> usize {
        self.outcomes.iter().map(|o| o.report.record_count()).sum()
    }
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
    pipeline: Pipeline,
    repository: Repository,
    cancel: CancellationFlag,
}

impl Controller {
    // @method: Create a controller from configuration, opening the configured database
    pub fn with_config(config: Config) -> Result<Self> {
        let db = match &config.storage.database_path {
            Some(path) => DatabaseConnection::new(path)?,
            None => DatabaseConnection::new_default()?,
        };
        Self::with_repository(config, Repository::new(db))
    }

    /// Create a controller storing into the given repository
    pub fn with_repository(config: Config, repository: Repository) -> Result<Self> {
        let translator = create_translator(&config).context("Failed to create translation provider")?;
        Ok(Self::with_parts(config, translator, repository))
    }

    /// Create a controller from explicit collaborators
    pub fn with_parts(config: Config, translator: Arc<dyn Translator>, repository: Repository) -> Self {
        let pipeline = Pipeline::new(&config, translator);
        Self {
            config,
            pipeline,
            repository,
            cancel: CancellationFlag::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    /// Flag that stops the current upload before its next unit of work
    pub fn cancellation_flag(&self) -> CancellationFlag {
        self.cancel.clone()
    }

    /// Process a single text file
    pub async fn run(&self, input_file: PathBuf, dry_run: bool) -> Result<FileOutcome> {
        let multi_progress = MultiProgress::new();
        self.run_with_progress(&input_file, dry_run, &multi_progress).await
    }

    async fn run_with_progress(
        &self,
        input_file: &Path,
        dry_run: bool,
        multi_progress: &MultiProgress,
    ) -> Result<FileOutcome> {
        let start_time = std::time::Instant::now();

        if !FileManager::file_exists(input_file) {
            return Err(anyhow::anyhow!("Input file does not exist: {:?}", input_file));
        }

        let bytes = FileManager::read_bytes(input_file)?;
        let file_name = FileManager::display_name(input_file);

        let progress_bar = multi_progress.add(ProgressBar::new(0));
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} records ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("=> "));
        progress_bar.set_message("Translating");

        info!(
            "{}: {} - {}",
            file_name,
            self.config.translation.provider.display_name(),
            self.config.translation.get_model()
        );

        let pb = progress_bar.clone();
        let report = async {
            let text = Pipeline::decode(&bytes)?;
            self.pipeline
                .process_with_progress(text, &file_name, &self.cancel, move |completed, total| {
                    pb.set_length(total as u64);
                    pb.set_position(completed as u64);
                })
                .await
        }
        .await;
        progress_bar.finish_and_clear();
        let report = report.with_context(|| format!("Rejected input file: {:?}", input_file))?;

        if report.records.is_empty() {
            warn!("{}: no transactions found", file_name);
        }

        let stored_ids = if dry_run {
            Vec::new()
        } else {
            self.repository
                .insert_all(report.records.clone())
                .await
                .with_context(|| format!("Failed to store records from {}", file_name))?
        };

        info!(
            "{}: {} records {} in {}",
            file_name,
            report.record_count(),
            if dry_run { "extracted" } else { "stored" },
            Self::format_duration(start_time.elapsed())
        );

        Ok(FileOutcome { report, stored_ids })
    }

    // Format duration in a human-readable format
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }

    /// Process every `.txt` file under a directory
    ///
    /// A file that fails is logged and counted; the remaining files still run.
    pub async fn run_folder(&self, input_dir: PathBuf, dry_run: bool) -> Result<FolderSummary> {
        let start_time = std::time::Instant::now();

        if !FileManager::dir_exists(&input_dir) {
            return Err(anyhow::anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let files = FileManager::find_files(&input_dir, TEXT_EXTENSION)?;
        if files.is_empty() {
            return Err(anyhow::anyhow!("No .{} files found in directory: {:?}", TEXT_EXTENSION, input_dir));
        }

        let multi_progress = MultiProgress::new();
        let folder_pb = multi_progress.add(ProgressBar::new(files.len() as u64));
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(style.progress_chars("=> "));
        folder_pb.set_message("Processing files");

        let mut summary = FolderSummary::default();

        for file in &files {
            if self.cancel.is_cancelled() {
                summary.cancelled = true;
                break;
            }

            folder_pb.set_message(format!("Processing: {}", FileManager::display_name(file)));

            match self.run_with_progress(file, dry_run, &multi_progress).await {
                Ok(outcome) => {
                    summary.cancelled |= outcome.report.cancelled;
                    summary.outcomes.push(outcome);
                }
                Err(e) => {
                    error!("Error processing file {:?}: {:#}", file, e);
                    summary.failed_files += 1;
                }
            }

            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Folder processing complete");

        info!(
            "Processed {} files ({} failed), {} records in {}",
            summary.outcomes.len(),
            summary.failed_files,
            summary.record_count(),
            Self::format_duration(start_time.elapsed())
        );

        Ok(summary)
    }

    /// List stored records matching the filters
    pub async fn search(&self, filters: &SearchFilters) -> Result<Vec<TransactionRecord>> {
        self.repository.query(filters).await
    }
}
