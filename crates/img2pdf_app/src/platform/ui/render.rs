use std::time::Duration;

use img2pdf_core::{AddOutcome, AppViewModel, LastResult, ProgressView, SubmissionState};
use indicatif::{ProgressBar, ProgressStyle};

/// Terminal presentation of the view model. Holds the live progress bar and
/// remembers what was last printed so repeated renders stay quiet.
pub struct Renderer {
    bar: Option<ProgressBar>,
    show_listing: bool,
    last_listing: Vec<String>,
    last_result: Option<LastResult>,
}

impl Renderer {
    pub fn new(show_listing: bool) -> Self {
        Self {
            bar: None,
            show_listing,
            last_listing: Vec::new(),
            last_result: None,
        }
    }

    pub fn render(&mut self, view: &AppViewModel) {
        if self.show_listing {
            let listing = listing_lines(view);
            if listing != self.last_listing {
                self.println_all(&listing);
                self.last_listing = listing;
            }
        }

        match (&view.progress, view.submission) {
            (Some(progress), SubmissionState::InFlight) => self.show_progress(progress),
            _ => self.finish_progress(),
        }

        if view.last_result != self.last_result {
            // Failures already reached the user as alerts.
            if let Some(result @ LastResult::Saved(_)) = &view.last_result {
                self.note(&result_line(result));
            }
            self.last_result = view.last_result.clone();
        }
    }

    /// Print the full listing regardless of what was shown before.
    pub fn print_listing(&mut self, view: &AppViewModel) {
        let listing = listing_lines(view);
        self.println_all(&listing);
        self.last_listing = listing;
        if let Some(result) = &view.last_result {
            self.note(&result_line(result));
        }
    }

    pub fn alert(&self, text: &str) {
        let line = format!("! {text}");
        match &self.bar {
            Some(bar) => bar.suspend(|| eprintln!("{line}")),
            None => eprintln!("{line}"),
        }
    }

    pub fn note(&self, text: &str) {
        match &self.bar {
            Some(bar) => bar.println(text),
            None => println!("{text}"),
        }
    }

    fn println_all(&self, lines: &[String]) {
        for line in lines {
            self.note(line);
        }
    }

    fn show_progress(&mut self, progress: &ProgressView) {
        let bar = self.bar.get_or_insert_with(new_progress_bar);
        bar.set_position(u64::from(progress.percent));
        bar.set_message(progress.label);
    }

    fn finish_progress(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

fn new_progress_bar() -> ProgressBar {
    let bar = ProgressBar::new(100);
    let style = ProgressStyle::with_template("{spinner:.cyan} [{bar:40.green/238}] {pos:>3}% {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");
    bar.set_style(style);
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

/// File rows followed by the options line; a single line when nothing is picked.
pub fn listing_lines(view: &AppViewModel) -> Vec<String> {
    if view.files.is_empty() {
        return vec!["No files selected.".to_string()];
    }
    let mut lines: Vec<String> = view
        .files
        .iter()
        .map(|row| {
            format!(
                "  [{}] {}  {}  {}",
                row.index, row.name, row.size_label, row.mime_type
            )
        })
        .collect();
    if let Some(line) = options_line(view) {
        lines.push(line);
    }
    lines
}

pub fn options_line(view: &AppViewModel) -> Option<String> {
    let options = view.options.as_ref()?;
    let mode = if options.mode_choice_offered {
        format!("mode: {} (merged|individual)", options.mode)
    } else {
        format!("mode: {}", options.mode)
    };
    Some(format!(
        "{} file(s) -> {}{}  {}  quality: {}",
        view.file_count, options.base_name, options.extension, mode, view.quality
    ))
}

pub fn result_line(result: &LastResult) -> String {
    match result {
        LastResult::Saved(saved) => format!(
            "Saved {} ({}) to {}",
            saved.filename,
            img2pdf_core::format_file_size(saved.byte_len),
            saved.location
        ),
        LastResult::Failed(message) => format!("Conversion failed: {message}"),
    }
}

/// One line about what a pick skipped; `None` when everything was added.
pub fn add_summary(outcome: &AddOutcome) -> Option<String> {
    let mut skipped = Vec::new();
    if outcome.duplicates > 0 {
        skipped.push(format!("{} already selected", outcome.duplicates));
    }
    if outcome.not_images > 0 {
        skipped.push(format!("{} not an image", outcome.not_images));
    }
    if skipped.is_empty() {
        return None;
    }
    Some(format!(
        "Added {} file(s); skipped {}.",
        outcome.added,
        skipped.join(", ")
    ))
}
