//! Terminal and HTML output for [`DisplayUpdate`]s.
//!
//! Updates always carry the full record sequence. The [`Printer`] remembers
//! how much of the current session it has already written and only emits
//! the new tail, so a long session is printed once, line by line. Status
//! changes (connecting, ended, rejected commands) go to the status writer so
//! the log writer carries nothing but log lines.

use std::io::Write;
use std::path::PathBuf;

use logtide_core::renderer::render_document;
use logtide_core::{DisplayState, DisplayUpdate, SourceInfo};

pub struct Printer<W, S> {
    out: W,
    status: S,
    html_path: Option<PathBuf>,
    generation: Option<u64>,
    printed: usize,
    last_state: Option<DisplayState>,
    last_notice: Option<String>,
    banner_shown: bool,
}

impl<W: Write, S: Write> Printer<W, S> {
    pub fn new(out: W, status: S, html_path: Option<PathBuf>) -> Self {
        Self {
            out,
            status,
            html_path,
            generation: None,
            printed: 0,
            last_state: None,
            last_notice: None,
            banner_shown: false,
        }
    }

    /// Write whatever `update` adds over the previous one.
    pub fn show(&mut self, update: &DisplayUpdate) -> anyhow::Result<()> {
        if self.generation != Some(update.generation) {
            self.generation = Some(update.generation);
            self.printed = 0;
            self.last_state = None;
            self.banner_shown = false;
            if let Some(source) = &update.source {
                writeln!(self.status, "== {source} (tail {}) ==", update.tail_depth)?;
            }
        }

        if update.notice.is_some() && update.notice != self.last_notice {
            if let Some(notice) = &update.notice {
                writeln!(self.status, "! {notice}")?;
            }
        }
        self.last_notice = update.notice.clone();

        // A connection error banner leads the sequence; the buffered lines
        // follow it unchanged.
        let lead = usize::from(update.state == DisplayState::Error && !update.records.is_empty());
        let body = &update.records[lead..];
        for record in body.iter().skip(self.printed) {
            writeln!(self.out, "{}", record.to_text())?;
        }
        self.printed = self.printed.max(body.len());

        if lead == 1 && !self.banner_shown {
            writeln!(self.status, "! {}", update.records[0].text())?;
            self.banner_shown = true;
        }

        if self.last_state != Some(update.state) {
            self.last_state = Some(update.state);
            match &update.placeholder {
                Some(text) => writeln!(self.status, "[{}] {text}", update.state)?,
                None => writeln!(self.status, "[{}]", update.state)?,
            }
        }

        self.out.flush()?;
        self.export(update)
    }

    pub fn show_sources(&mut self, sources: &[SourceInfo]) -> anyhow::Result<()> {
        if sources.is_empty() {
            writeln!(self.status, "no sources")?;
        }
        for source in sources {
            writeln!(
                self.status,
                "  {:<24} {:<24} {}",
                source.source_id, source.name, source.state
            )?;
        }
        Ok(())
    }

    pub fn message(&mut self, text: &str) -> anyhow::Result<()> {
        writeln!(self.status, "{text}")?;
        Ok(())
    }

    /// Consume the printer, returning its writers.
    pub fn into_parts(self) -> (W, S) {
        (self.out, self.status)
    }

    /// Rewrite the HTML file, if one was requested, from `update`.
    pub fn export(&self, update: &DisplayUpdate) -> anyhow::Result<()> {
        let Some(path) = &self.html_path else {
            return Ok(());
        };
        let title = update.source.as_deref().unwrap_or("logtide");
        std::fs::write(path, render_document(title, &update.records))?;
        Ok(())
    }
}
