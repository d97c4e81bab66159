//! Voice Translator — egui/eframe application window.
//!
//! # Architecture
//!
//! [`TranslatorApp`] is the top-level [`eframe::App`]. It owns:
//!
//! * `command_tx` — sends [`PipelineCommand`] to the pipeline orchestrator.
//! * `status_rx`  — receives human-readable status lines from every
//!   pipeline stage, appended to the scrolling log pane.
//! * a handle on the [`SharedState`] the orchestrator writes, snapshotted
//!   once per frame.
//!
//! The start button is disabled for the whole cycle (recording through
//! playback hand-off), so a new recording can never overlap a running one.

use std::path::PathBuf;
use std::time::Duration;

use eframe::egui;
use tokio::sync::mpsc;

use crate::catalog;
use crate::config::AppConfig;
use crate::pipeline::{PipelineCommand, SharedState};

/// Keep at most this many status lines in the log pane.
const STATUS_LOG_CAP: usize = 100;

// ---------------------------------------------------------------------------
// TranslatorApp
// ---------------------------------------------------------------------------

pub struct TranslatorApp {
    /// Pipeline state written by the orchestrator, read each frame.
    shared: SharedState,
    /// Send commands to the background pipeline orchestrator.
    command_tx: mpsc::Sender<PipelineCommand>,
    /// Receive status lines from the pipeline.
    status_rx: mpsc::UnboundedReceiver<String>,
    /// Rolling status log, newest last.
    status_log: Vec<String>,
    /// Index into [`catalog::LANGUAGES`]; 0 is the "Select Language" row.
    selected_language: usize,
    /// Application configuration (read-only after startup).
    pub config: AppConfig,
}

impl TranslatorApp {
    pub fn new(
        shared: SharedState,
        command_tx: mpsc::Sender<PipelineCommand>,
        status_rx: mpsc::UnboundedReceiver<String>,
        config: AppConfig,
    ) -> Self {
        Self {
            shared,
            command_tx,
            status_rx,
            status_log: Vec::new(),
            selected_language: 0,
            config,
        }
    }

    /// Drain all pending status lines (non-blocking).
    fn poll_status(&mut self) {
        while let Ok(line) = self.status_rx.try_recv() {
            self.status_log.push(line);
        }
        if self.status_log.len() > STATUS_LOG_CAP {
            let overflow = self.status_log.len() - STATUS_LOG_CAP;
            self.status_log.drain(..overflow);
        }
    }

    fn send_start(&self) {
        let language_code = catalog::LANGUAGES[self.selected_language].code.to_string();
        // try_send: if the orchestrator is wedged, dropping the request is
        // better than freezing the UI thread.
        let _ = self
            .command_tx
            .try_send(PipelineCommand::Start { language_code });
    }

    fn send_download(&self) {
        let _ = self.command_tx.try_send(PipelineCommand::Download {
            dest: download_destination(),
        });
    }
}

/// Timestamped destination in the platform download directory.
fn download_destination() -> PathBuf {
    let epoch = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let dir = dirs::download_dir().unwrap_or_else(|| PathBuf::from("."));
    dir.join(download_file_name(epoch))
}

fn download_file_name(epoch_secs: u64) -> String {
    format!("translation-{epoch_secs}.wav")
}

// ---------------------------------------------------------------------------
// eframe::App
// ---------------------------------------------------------------------------

impl eframe::App for TranslatorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_status();

        // One snapshot per frame; the orchestrator owns the mutations.
        let (pipeline, recognized, translated, can_download) = {
            let state = self.shared.lock().unwrap();
            (
                state.pipeline,
                state.recognized_text.clone(),
                state.translated_text.clone(),
                state.can_download,
            )
        };

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Voice Translator");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        egui::RichText::new(pipeline.label())
                            .color(if pipeline.is_busy() {
                                egui::Color32::from_rgb(255, 140, 80)
                            } else {
                                egui::Color32::from_rgb(120, 200, 120)
                            })
                            .size(13.0),
                    );
                });
            });
            ui.separator();

            // ── Language + start ─────────────────────────────────────────
            ui.horizontal(|ui| {
                egui::ComboBox::from_id_salt("target-language").show_index(
                    ui,
                    &mut self.selected_language,
                    catalog::LANGUAGES.len(),
                    |i| catalog::LANGUAGES[i].name.to_string(),
                );

                if ui
                    .add_enabled(
                        !pipeline.is_busy(),
                        egui::Button::new("Start Recording"),
                    )
                    .clicked()
                {
                    self.send_start();
                }
            });

            ui.add_space(8.0);

            // ── Transcript + translation panes ───────────────────────────
            text_pane(ui, ctx, "Recognized", recognized.as_deref());
            ui.add_space(4.0);
            text_pane(ui, ctx, "Translated", translated.as_deref());

            ui.add_space(8.0);
            if ui
                .add_enabled(can_download, egui::Button::new("Download Audio"))
                .clicked()
            {
                self.send_download();
            }

            ui.add_space(8.0);
            ui.separator();

            ui.collapsing("Services", |ui| {
                let dim = egui::Color32::from_rgb(140, 140, 140);
                ui.label(
                    egui::RichText::new(format!(
                        "recognition: {}",
                        self.config.recognition.base_url
                    ))
                    .color(dim)
                    .size(11.0),
                );
                ui.label(
                    egui::RichText::new(format!(
                        "translation: {}",
                        self.config.translation.base_url
                    ))
                    .color(dim)
                    .size(11.0),
                );
                ui.label(
                    egui::RichText::new(format!("synthesis: {}", self.config.synthesis.base_url))
                        .color(dim)
                        .size(11.0),
                );
            });

            // ── Status log ───────────────────────────────────────────────
            egui::ScrollArea::vertical()
                .stick_to_bottom(true)
                .max_height(120.0)
                .show(ui, |ui| {
                    for line in &self.status_log {
                        ui.label(
                            egui::RichText::new(line.as_str())
                                .color(egui::Color32::from_rgb(160, 160, 160))
                                .size(11.0),
                        );
                    }
                });
        });

        // Background progress must show even while the pointer is still.
        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

/// A labelled read-only text block with a copy button.
fn text_pane(ui: &mut egui::Ui, ctx: &egui::Context, label: &str, text: Option<&str>) {
    ui.horizontal(|ui| {
        ui.label(
            egui::RichText::new(label)
                .color(egui::Color32::from_rgb(180, 180, 180))
                .size(12.0),
        );
        if let Some(text) = text {
            if ui.small_button("copy").clicked() {
                ctx.copy_text(text.to_string());
            }
        }
    });
    ui.label(
        egui::RichText::new(text.unwrap_or("—"))
            .color(egui::Color32::from_rgb(220, 220, 220))
            .size(13.0),
    );
}
