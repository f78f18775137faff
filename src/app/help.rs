use eframe::egui;

pub(super) fn draw_help_window(ctx: &egui::Context, open: &mut bool) {
    egui::Window::new("Help")
        .open(open)
        .resizable(true)
        .default_width(420.0)
        .show(ctx, |ui| {
            ui.heading("Mouse");
            ui.separator();
            help_row(ui, "Click a box", "Toggle that point cloud's selection");
            help_row(ui, "Drag", "Pan the plot");
            help_row(ui, "Scroll wheel", "Zoom about the pointer");

            ui.add_space(10.0);
            ui.heading("Keyboard");
            ui.separator();
            help_row(ui, "Delete / Backspace", "Delete selected point clouds");
            help_row(ui, "⌘Z", "Undo the last delete");
            help_row(ui, "⌘S", "Save surviving files to a folder");
            help_row(ui, "⌘O", "Open another folder");
            help_row(ui, "F", "Fit the view to the data");
            help_row(ui, "Escape", "Clear the selection");
            help_row(ui, "F1", "Show this window");

            ui.add_space(10.0);
            ui.label("Bounding boxes are blue when unselected and green when selected.");
        });
}

fn help_row(ui: &mut egui::Ui, keys: &str, action: &str) {
    ui.horizontal(|ui| {
        ui.monospace(format!("{keys:<20}"));
        ui.label(action);
    });
}
