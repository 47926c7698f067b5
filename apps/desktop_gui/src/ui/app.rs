//! Docente management window: search box, entry form, and card grid.

use std::time::Duration;

use client_core::{EditorEvent, EditorStatus, Operation};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::{
    domain::{filter_by_nombre, Docente, DocenteId, Draft, DraftField},
    error::FieldError,
};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorCategory, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;

pub const WINDOW_TITLE: &str = "Gestión de Docentes";

const CARD_COLUMNS: usize = 2;

fn field_label(field: DraftField) -> &'static str {
    match field {
        DraftField::Nombre => "Nombre",
        DraftField::Email => "Email",
        DraftField::Especialidad => "Especialidad",
    }
}

fn field_hint(field: DraftField) -> &'static str {
    match field {
        DraftField::Nombre => "Nombre completo",
        DraftField::Email => "correo@ejemplo.com",
        DraftField::Especialidad => "Área de especialidad",
    }
}

pub struct DocentesApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    docentes: Vec<Docente>,
    draft: Draft,
    draft_seq: u64,
    editing: Option<DocenteId>,
    filter: String,
    status: EditorStatus,
    field_errors: Vec<FieldError>,
    last_error: Option<UiError>,
    status_line: String,
}

impl DocentesApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            docentes: Vec::new(),
            draft: Draft::default(),
            draft_seq: 0,
            editing: None,
            filter: String::new(),
            status: EditorStatus::Loading,
            field_errors: Vec::new(),
            last_error: None,
            status_line: "Conectando...".to_string(),
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            self.apply_event(event);
        }
    }

    fn apply_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Info(message) => {
                self.status_line = message;
            }
            // The filter stays local; the worker's copy only mirrors it. The
            // form is taken from the worker only once it has seen every edit.
            UiEvent::Snapshot {
                snapshot,
                draft_seq,
            } => {
                self.docentes = snapshot.docentes;
                self.status = snapshot.status;
                if draft_seq == self.draft_seq {
                    self.draft = snapshot.draft;
                    self.editing = snapshot.editing;
                } else {
                    tracing::debug!(
                        draft_seq,
                        local_seq = self.draft_seq,
                        "keeping newer local draft"
                    );
                }
            }
            UiEvent::Editor(EditorEvent::StatusChanged(status)) => self.status = status,
            UiEvent::Editor(EditorEvent::DraftCleared) => self.field_errors.clear(),
            UiEvent::Editor(EditorEvent::CollectionReplaced { count }) => {
                tracing::debug!(count, "collection replaced");
                if self
                    .last_error
                    .as_ref()
                    .is_some_and(|err| err.category() == UiErrorCategory::Transport)
                {
                    self.last_error = None;
                }
            }
            UiEvent::Editor(EditorEvent::TransportFailed {
                operation: Operation::Refresh,
                message,
            }) => {
                self.status_line = format!("La lista puede estar desactualizada: {message}");
            }
            UiEvent::Editor(_) => {}
            UiEvent::Error(err) => {
                tracing::warn!(context = ?err.context(), "{}", err.message());
                if err.category() == UiErrorCategory::Validation {
                    self.field_errors = err.field_errors().to_vec();
                } else {
                    self.last_error = Some(err);
                }
            }
        }
    }

    fn busy(&self) -> bool {
        self.status != EditorStatus::Idle
    }

    fn visible_docentes(&self) -> Vec<&Docente> {
        filter_by_nombre(&self.docentes, &self.filter)
    }

    fn dispatch(&mut self, cmd: BackendCommand) {
        dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status_line);
    }

    fn next_draft_seq(&mut self) -> u64 {
        self.draft_seq += 1;
        self.draft_seq
    }

    fn edit_field(&mut self, field: DraftField, value: String) {
        let seq = self.next_draft_seq();
        self.dispatch(BackendCommand::UpdateField { field, value, seq });
    }

    fn submit(&mut self) {
        self.field_errors.clear();
        self.last_error = None;
        let seq = self.next_draft_seq();
        self.dispatch(BackendCommand::Submit {
            draft: self.draft.clone(),
            editing: self.editing,
            seq,
        });
    }

    fn begin_edit(&mut self, docente: Docente) {
        self.field_errors.clear();
        self.draft = docente.to_draft();
        self.editing = Some(docente.id);
        let seq = self.next_draft_seq();
        self.dispatch(BackendCommand::BeginEdit { docente, seq });
    }

    fn cancel_edit(&mut self) {
        self.field_errors.clear();
        self.draft = Draft::default();
        self.editing = None;
        let seq = self.next_draft_seq();
        self.dispatch(BackendCommand::CancelEdit { seq });
    }

    fn remove(&mut self, id: DocenteId) {
        self.last_error = None;
        self.dispatch(BackendCommand::Remove { id });
    }

    fn show_header(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading(WINDOW_TITLE);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .add_enabled(!self.busy(), egui::Button::new("Recargar"))
                    .clicked()
                {
                    self.dispatch(BackendCommand::Refresh);
                }
                if self.busy() {
                    ui.spinner();
                }
            });
        });
        ui.label(egui::RichText::new(&self.status_line).weak());
        if let Some(err) = &self.last_error {
            ui.colored_label(ui.visuals().error_fg_color, err.message());
        }
    }

    fn show_form(&mut self, ui: &mut egui::Ui) {
        let mut edits = Vec::new();
        let mut submit_clicked = false;
        let mut cancel_clicked = false;
        let error_color = ui.visuals().error_fg_color;
        let busy = self.busy();
        let editing = self.editing.is_some();

        egui::Frame::NONE
            .fill(ui.visuals().faint_bg_color)
            .stroke(ui.visuals().widgets.noninteractive.bg_stroke)
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(12, 10))
            .show(ui, |ui| {
                let title = if editing {
                    "Editar docente"
                } else {
                    "Nuevo docente"
                };
                ui.label(egui::RichText::new(title).strong());
                ui.add_space(4.0);

                for field in DraftField::ALL {
                    ui.label(field_label(field));
                    let response = ui.add(
                        egui::TextEdit::singleline(self.draft.field_mut(field))
                            .id_salt(("docente_form", field.as_str()))
                            .hint_text(field_hint(field))
                            .desired_width(f32::INFINITY),
                    );
                    if response.changed() {
                        edits.push((field, self.draft.get(field).to_string()));
                    }
                    for err in self.field_errors.iter().filter(|e| e.field == field) {
                        ui.colored_label(error_color, &err.message);
                    }
                    ui.add_space(4.0);
                }

                ui.horizontal(|ui| {
                    let submit_label = if editing {
                        "Actualizar"
                    } else {
                        "Agregar"
                    };
                    if ui
                        .add_enabled(!busy, egui::Button::new(submit_label))
                        .clicked()
                    {
                        submit_clicked = true;
                    }
                    if editing
                        && ui
                            .add_enabled(!busy, egui::Button::new("Cancelar"))
                            .clicked()
                    {
                        cancel_clicked = true;
                    }
                });
            });

        for (field, value) in edits {
            self.edit_field(field, value);
        }
        if submit_clicked {
            self.submit();
        } else if cancel_clicked {
            self.cancel_edit();
        }
    }

    fn show_search(&mut self, ui: &mut egui::Ui) {
        let response = ui.add(
            egui::TextEdit::singleline(&mut self.filter)
                .id_salt("docente_filter")
                .hint_text("Buscar por nombre...")
                .desired_width(f32::INFINITY),
        );
        if response.changed() {
            let text = self.filter.clone();
            self.dispatch(BackendCommand::SetFilter { text });
        }
    }

    fn show_cards(&mut self, ui: &mut egui::Ui) {
        let busy = self.busy();
        let editing = self.editing;
        let mut edit_target = None;
        let mut remove_target = None;

        let visible = self.visible_docentes();
        if visible.is_empty() {
            ui.vertical_centered(|ui| {
                ui.add_space(16.0);
                if self.docentes.is_empty() {
                    ui.label("No hay docentes registrados.");
                } else {
                    ui.label("Ningún docente coincide con la búsqueda.");
                }
            });
            return;
        }

        for row in visible.chunks(CARD_COLUMNS) {
            ui.columns(CARD_COLUMNS, |columns| {
                for (column, docente) in columns.iter_mut().zip(row) {
                    let highlighted = editing == Some(docente.id);
                    let stroke = if highlighted {
                        column.visuals().selection.stroke
                    } else {
                        column.visuals().widgets.noninteractive.bg_stroke
                    };
                    egui::Frame::NONE
                        .fill(column.visuals().extreme_bg_color)
                        .stroke(stroke)
                        .corner_radius(8.0)
                        .inner_margin(egui::Margin::symmetric(10, 8))
                        .show(column, |ui| {
                            ui.set_width(ui.available_width());
                            ui.label(egui::RichText::new(&docente.nombre).strong());
                            ui.label(&docente.email);
                            ui.label(egui::RichText::new(&docente.especialidad).italics());
                            ui.horizontal_wrapped(|ui| {
                                if ui.add_enabled(!busy, egui::Button::new("Editar")).clicked() {
                                    edit_target = Some((*docente).clone());
                                }
                                if ui
                                    .add_enabled(!busy, egui::Button::new("Eliminar"))
                                    .clicked()
                                {
                                    remove_target = Some(docente.id);
                                }
                            });
                        });
                }
            });
            ui.add_space(6.0);
        }

        if let Some(docente) = edit_target {
            self.begin_edit(docente);
        }
        if let Some(id) = remove_target {
            self.remove(id);
        }
    }
}

impl eframe::App for DocentesApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        egui::TopBottomPanel::top("docentes_header")
            .frame(
                egui::Frame::side_top_panel(&ctx.style())
                    .inner_margin(egui::Margin::symmetric(12, 8)),
            )
            .show(ctx, |ui| self.show_header(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    self.show_form(ui);
                    ui.add_space(12.0);
                    self.show_search(ui);
                    ui.add_space(8.0);
                    self.show_cards(ui);
                });
        });

        if self.busy() {
            ctx.request_repaint_after(Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}

#[cfg(test)]
#[path = "../tests/app_tests.rs"]
mod tests;
