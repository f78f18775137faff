use std::path::PathBuf;

use eframe::egui;

use crate::model;

mod actions;
mod help;
mod render;
mod settings;
mod update;

/// Mapping between data coordinates and screen pixels. Data Y grows upward,
/// screen Y grows downward, so the Y axis flips in both directions.
#[derive(Clone, Copy, Debug)]
struct View {
    center: (f64, f64),
    scale: f64,
}

impl Default for View {
    fn default() -> Self {
        Self {
            center: (0.0, 0.0),
            scale: 1.0,
        }
    }
}

impl View {
    fn data_to_screen(&self, rect: egui::Rect, x: f64, y: f64) -> egui::Pos2 {
        let c = rect.center();
        egui::pos2(
            c.x + ((x - self.center.0) * self.scale) as f32,
            c.y - ((y - self.center.1) * self.scale) as f32,
        )
    }

    fn screen_to_data(&self, rect: egui::Rect, pos: egui::Pos2) -> (f64, f64) {
        let c = rect.center();
        (
            self.center.0 + (pos.x - c.x) as f64 / self.scale,
            self.center.1 - (pos.y - c.y) as f64 / self.scale,
        )
    }

    fn pan_pixels(&mut self, delta: egui::Vec2) {
        self.center.0 -= delta.x as f64 / self.scale;
        self.center.1 += delta.y as f64 / self.scale;
    }

    fn zoom_about_screen_point(&mut self, rect: egui::Rect, screen_point: egui::Pos2, zoom_delta: f64) {
        let before = self.screen_to_data(rect, screen_point);
        self.scale = (self.scale * zoom_delta).clamp(1e-9, 1e12);
        let after = self.data_to_screen(rect, before.0, before.1);
        self.center.0 += (after.x - screen_point.x) as f64 / self.scale;
        self.center.1 -= (after.y - screen_point.y) as f64 / self.scale;
    }

    /// Centers on `bounds` and picks the largest scale that keeps it inside
    /// `rect` with a small margin. Degenerate extents fall back sanely.
    fn fit_bounds(&mut self, rect: egui::Rect, bounds: model::Bounds) {
        if bounds.is_empty() || rect.width() <= 0.0 || rect.height() <= 0.0 {
            return;
        }
        self.center = bounds.center();
        let sx = rect.width() as f64 / bounds.width();
        let sy = rect.height() as f64 / bounds.height();
        let scale = sx.min(sy) * 0.9;
        self.scale = if scale.is_finite() && scale > 0.0 {
            scale.clamp(1e-9, 1e12)
        } else {
            1.0
        };
    }
}

pub struct CloudApp {
    catalog: model::Catalog,
    folder: PathBuf,
    view: View,
    fit_requested: bool,
    status: Option<String>,
    settings_path: String,
    save_folder: Option<PathBuf>,
    point_radius: f32,
    show_legend: bool,
    show_help: bool,
}

impl CloudApp {
    fn config_path() -> Option<String> {
        if let Some(home) = std::env::var_os("HOME") {
            let path = PathBuf::from(home).join(".config").join("cloudcull.toml");
            if path.exists() {
                return Some(path.display().to_string());
            }
        }
        if std::path::Path::new("cloudcull.toml").exists() {
            return Some("cloudcull.toml".to_string());
        }
        None
    }

    /// Loads settings, asks for the source folder and loads it. Returns
    /// `None` (after telling the user why) when the dialog is cancelled or
    /// the folder cannot be read at all.
    pub fn bootstrap() -> Option<Self> {
        let settings_path = Self::config_path().unwrap_or_else(|| "cloudcull.toml".to_string());
        let stored = settings::load_settings(&settings_path).unwrap_or_default();

        let mut dialog =
            rfd::FileDialog::new().set_title("Choose a folder of point cloud .txt files");
        if let Some(last) = &stored.last_folder {
            dialog = dialog.set_directory(last);
        }
        let Some(folder) = dialog.pick_folder() else {
            rfd::MessageDialog::new()
                .set_level(rfd::MessageLevel::Error)
                .set_title("Cloud Cull")
                .set_description("No folder selected. Exiting.")
                .show();
            return None;
        };

        let catalog = match model::Catalog::load_folder(&folder) {
            Ok(catalog) => catalog,
            Err(e) => {
                log::error!("cannot read {}: {}", folder.display(), e);
                rfd::MessageDialog::new()
                    .set_level(rfd::MessageLevel::Error)
                    .set_title("Cloud Cull")
                    .set_description(format!("Cannot read {}: {}", folder.display(), e))
                    .show();
                return None;
            }
        };

        let loaded = catalog.records.len();
        let app = Self {
            catalog,
            folder,
            view: View::default(),
            fit_requested: true,
            status: Some(format!("Loaded {} point cloud(s)", loaded)),
            settings_path,
            save_folder: stored.save_folder.map(PathBuf::from),
            point_radius: stored.point_radius,
            show_legend: stored.show_legend,
            show_help: false,
        };
        app.persist_settings();
        Some(app)
    }
}
