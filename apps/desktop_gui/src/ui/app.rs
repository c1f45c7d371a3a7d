use std::{collections::HashMap, path::PathBuf, time::Duration};

use arboard::Clipboard;
use chrono::Local;
use client_core::{
    render::{render, APP_TITLE, CHOOSE_FILE_LABEL, SUBMIT_LABEL},
    FileSelector, RawFile, ServiceEndpoint, UploadAnalysisController, WorkflowEvent,
    WorkflowState, WorkflowUpdate,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use url::Url;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{ImageLoad, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::ui::panels::{show_banner, show_result, summary_text, BannerSeverity, ImageSlot};

pub struct DesktopGuiApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,

    endpoint: ServiceEndpoint,
    selector: FileSelector,
    workflow: UploadAnalysisController,
    images: HashMap<Url, ImageSlot>,

    status: String,
}

impl DesktopGuiApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        endpoint: ServiceEndpoint,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            endpoint,
            selector: FileSelector::new(),
            workflow: UploadAnalysisController::new(),
            images: HashMap::new(),
            status: "Starting".to_string(),
        }
    }

    pub fn workflow_state(&self) -> &WorkflowState {
        self.workflow.state()
    }

    pub fn file_label(&self) -> &str {
        self.selector.label()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::Workflow(update) => {
                    if self.workflow.apply(update) {
                        self.note_run_progress();
                    }
                }
                UiEvent::Image(load) => self.store_image(load),
                UiEvent::Error(err) => {
                    tracing::warn!(
                        context = ?err.context(),
                        category = ?err.category(),
                        "{}",
                        err.message()
                    );
                    self.status = err.status_text();
                }
            }
        }
    }

    fn note_run_progress(&mut self) {
        match self.workflow.state() {
            WorkflowState::Succeeded(_) => {
                self.status = format!("Last run finished at {}", Local::now().format("%H:%M:%S"));
                self.request_result_images();
            }
            WorkflowState::Failed(_) => {
                self.status = format!("Last run finished at {}", Local::now().format("%H:%M:%S"));
            }
            WorkflowState::Analyzing => {
                self.status = "Upload complete; analysing".to_string();
            }
            WorkflowState::Idle | WorkflowState::Uploading => {}
        }
    }

    fn request_result_images(&mut self) {
        let Some(result) = render(self.workflow.state(), &self.endpoint).result else {
            return;
        };
        let generation = self.workflow.generation();
        for url in [result.initial_image.url, result.processed_image.url] {
            let cmd = BackendCommand::FetchImage {
                generation,
                url: url.clone(),
            };
            let slot = match dispatch_backend_command(&self.cmd_tx, cmd) {
                Ok(()) => ImageSlot::Loading,
                Err(err) => ImageSlot::Failed(err.message().to_string()),
            };
            self.images.insert(url, slot);
        }
    }

    fn store_image(&mut self, load: ImageLoad) {
        if load.generation != self.workflow.generation() {
            tracing::debug!(generation = load.generation, "dropping image from superseded run");
            return;
        }
        let slot = match load.outcome {
            Ok(preview) => ImageSlot::Decoded(preview),
            Err(err) => ImageSlot::Failed(err),
        };
        self.images.insert(load.url, slot);
    }

    pub fn select(&mut self, raw: Option<RawFile>) {
        match self.selector.select(raw) {
            Ok(file) => {
                tracing::info!(file = file.name(), "selected scan");
                self.workflow.selection_accepted();
            }
            Err(err) => {
                self.images.clear();
                self.workflow.selection_rejected(err);
            }
        }
    }

    fn choose_file(&mut self) {
        let mut dialog = rfd::FileDialog::new()
            .add_filter("DICOM", &["dcm", "DCM"])
            .add_filter("All files", &["*"]);
        if let Some(dir) = default_scan_dir() {
            dialog = dialog.set_directory(dir);
        }
        // A cancelled dialog leaves the current selection alone.
        if let Some(path) = dialog.pick_file() {
            self.select(Some(RawFile::from_path(path)));
        }
    }

    fn take_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let Some(file) = dropped.into_iter().next() else {
            return;
        };
        let raw = match (file.path, file.bytes) {
            (Some(path), _) => Some(RawFile::from_path(path)),
            (None, Some(bytes)) => Some(RawFile::in_memory(file.name, bytes.to_vec())),
            (None, None) => None,
        };
        self.select(raw);
    }

    pub fn submit(&mut self) {
        self.images.clear();
        let Some(ticket) = self.workflow.begin_submit(self.selector.selected()) else {
            return;
        };
        let generation = ticket.generation;
        self.status = format!("Uploading {}", ticket.file.name());
        if let Err(err) = dispatch_backend_command(&self.cmd_tx, BackendCommand::Submit(ticket)) {
            self.status = err.status_text();
            self.workflow.apply(WorkflowUpdate {
                generation,
                event: WorkflowEvent::UploadFailed,
            });
        }
    }

    fn copy_summary(&mut self, text: String) {
        match Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text)) {
            Ok(()) => self.status = "Summary copied to clipboard".to_string(),
            Err(err) => self.status = format!("Failed to copy summary: {err}"),
        }
    }

    fn show_main(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.weak(self.status());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.weak(self.endpoint.base().as_str());
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(18.0);
                ui.vertical_centered(|ui| {
                    ui.heading(APP_TITLE);
                });
                ui.add_space(14.0);

                ui.horizontal(|ui| {
                    if ui.button(CHOOSE_FILE_LABEL).clicked() {
                        self.choose_file();
                    }
                    ui.weak(self.file_label());
                });
                ui.add_space(6.0);
                if ui.button(SUBMIT_LABEL).clicked() {
                    self.submit();
                }
                ui.add_space(10.0);

                let view = render(self.workflow.state(), &self.endpoint);
                if let Some(message) = &view.error_banner {
                    show_banner(ui, BannerSeverity::Error, message);
                }
                if let Some(message) = view.progress {
                    show_banner(ui, BannerSeverity::Info, message);
                }
                if let Some(result) = &view.result {
                    ui.add_space(10.0);
                    if show_result(ui, result, &mut self.images) {
                        self.copy_summary(summary_text(result));
                    }
                }
            });
        });
    }
}

fn default_scan_dir() -> Option<PathBuf> {
    dirs::document_dir().or_else(dirs::home_dir)
}

impl eframe::App for DesktopGuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.take_dropped_files(ctx);
        self.show_main(ctx);

        if self.workflow_state().is_in_flight() {
            ctx.request_repaint_after(Duration::from_millis(50));
        } else {
            ctx.request_repaint_after(Duration::from_millis(250));
        }
    }
}
