use eframe::egui;

use super::render::{draw_background, draw_records, record_color};
use super::{CloudApp, actions, help};

impl eframe::App for CloudApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let wants_keyboard = ctx.wants_keyboard_input();
        ctx.input_mut(|i| {
            if i.consume_key(egui::Modifiers::COMMAND, egui::Key::S) {
                self.save_dialog();
            }
            if i.consume_key(egui::Modifiers::COMMAND, egui::Key::O) {
                self.open_folder_dialog();
            }
            if i.consume_key(egui::Modifiers::COMMAND, egui::Key::Z) {
                self.undo_delete();
            }
            if i.consume_key(egui::Modifiers::NONE, egui::Key::F1) {
                self.show_help = true;
            }
            if !wants_keyboard {
                if i.consume_key(egui::Modifiers::NONE, egui::Key::Delete)
                    || i.consume_key(egui::Modifiers::NONE, egui::Key::Backspace)
                {
                    self.delete_selected();
                }
                if i.consume_key(egui::Modifiers::NONE, egui::Key::Escape) {
                    self.clear_selection();
                }
                if i.consume_key(egui::Modifiers::NONE, egui::Key::F) {
                    self.request_fit();
                }
            }
        });

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Delete Selected").clicked() {
                    self.delete_selected();
                }
                if ui.button("Undo Delete").clicked() {
                    self.undo_delete();
                }
                if ui.button("Save As…").clicked() {
                    self.save_dialog();
                }
                ui.separator();
                if ui.button("Open Folder…").clicked() {
                    self.open_folder_dialog();
                }
                if ui.button("Fit View").clicked() {
                    self.request_fit();
                }
                ui.separator();
                if ui.checkbox(&mut self.show_legend, "Legend").changed() {
                    self.persist_settings();
                }
                if ui
                    .add(
                        egui::Slider::new(&mut self.point_radius, 0.5..=5.0)
                            .text("Point size"),
                    )
                    .drag_stopped()
                {
                    self.persist_settings();
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(actions::folder_label(&self.folder));
                    ui.label("Folder:");
                });
            });
        });

        if self.show_legend {
            egui::SidePanel::right("legend_panel")
                .default_width(220.0)
                .show(ctx, |ui| {
                    ui.heading("Point clouds");
                    ui.separator();
                    let mut toggled = None;
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        for (idx, record) in self.catalog.visible() {
                            ui.horizontal(|ui| {
                                let (swatch, _) = ui.allocate_exact_size(
                                    egui::vec2(12.0, 12.0),
                                    egui::Sense::hover(),
                                );
                                ui.painter().rect_filled(swatch, 2.0, record_color(idx));
                                let label =
                                    format!("{} ({})", record.file_name, record.table.len());
                                if ui.selectable_label(record.selected, label).clicked() {
                                    toggled = Some(idx);
                                }
                            });
                        }
                    });
                    if let Some(idx) = toggled {
                        self.toggle_record(idx);
                    }
                });
        }

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(status) = &self.status {
                    ui.label(status);
                } else {
                    ui.label("Ready");
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(format!("Scale: {:.3} px/unit", self.view.scale));
                    ui.separator();
                    ui.label(format!("Deleted: {}", self.catalog.deleted_count()));
                    ui.separator();
                    ui.label(format!("Selected: {}", self.catalog.selected_count()));
                    ui.separator();
                    ui.label(format!(
                        "Visible: {}/{}",
                        self.catalog.visible_count(),
                        self.catalog.records.len()
                    ));
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let (rect, response) =
                ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());

            if self.fit_requested {
                self.view.fit_bounds(rect, self.catalog.data_bounds());
                self.fit_requested = false;
            }

            let scroll_delta = ctx.input(|i| i.raw_scroll_delta.y);
            if scroll_delta.abs() > 0.0 {
                if let Some(hover_pos) = ctx.input(|i| i.pointer.hover_pos()) {
                    if rect.contains(hover_pos) {
                        let zoom_delta = (1.0 + scroll_delta * 0.001).clamp(0.8, 1.25);
                        self.view
                            .zoom_about_screen_point(rect, hover_pos, zoom_delta as f64);
                    }
                }
            }

            if response.dragged() {
                self.view.pan_pixels(response.drag_delta());
            }

            // Drags pan; only a plain click toggles selection.
            if response.clicked() {
                if let Some(pos) = response.interact_pointer_pos() {
                    let (x, y) = self.view.screen_to_data(rect, pos);
                    if let Some(idx) = self.catalog.hit_test(x, y) {
                        self.toggle_record(idx);
                    }
                }
            }

            let painter = ui.painter().with_clip_rect(rect);
            draw_background(&painter, rect, &self.view);
            draw_records(&painter, rect, &self.view, &self.catalog, self.point_radius);
            if self.catalog.visible_count() == 0 {
                painter.text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    "No visible point clouds",
                    egui::FontId::proportional(14.0),
                    egui::Color32::from_gray(140),
                );
            }
        });

        help::draw_help_window(ctx, &mut self.show_help);
    }
}
