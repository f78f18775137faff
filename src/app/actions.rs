use std::path::Path;

use crate::model;

use super::{CloudApp, settings};

fn info_dialog(text: &str) {
    rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Info)
        .set_title("Cloud Cull")
        .set_description(text)
        .show();
}

fn error_dialog(text: &str) {
    rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Error)
        .set_title("Cloud Cull")
        .set_description(text)
        .show();
}

impl CloudApp {
    pub(super) fn open_folder_dialog(&mut self) {
        let folder = rfd::FileDialog::new()
            .set_title("Choose a folder of point cloud .txt files")
            .set_directory(&self.folder)
            .pick_folder();
        let Some(folder) = folder else {
            self.status = Some("Open cancelled".to_string());
            return;
        };
        match model::Catalog::load_folder(&folder) {
            Ok(catalog) => {
                let loaded = catalog.records.len();
                self.catalog = catalog;
                self.folder = folder;
                self.fit_requested = true;
                self.status = Some(format!("Loaded {} point cloud(s)", loaded));
                self.persist_settings();
            }
            Err(e) => {
                log::error!("cannot read {}: {}", folder.display(), e);
                error_dialog(&format!("Cannot read {}: {}", folder.display(), e));
            }
        }
    }

    pub(super) fn toggle_record(&mut self, idx: usize) {
        self.catalog.toggle_selected(idx);
        if let Some(record) = self.catalog.records.get(idx) {
            self.status = Some(if record.selected {
                format!("Selected {}", record.file_name)
            } else {
                format!("Deselected {}", record.file_name)
            });
        }
    }

    pub(super) fn clear_selection(&mut self) {
        self.catalog.clear_selection();
        self.status = None;
    }

    pub(super) fn delete_selected(&mut self) {
        let deleted = self.catalog.delete_selected();
        if deleted == 0 {
            info_dialog("No point clouds are selected.");
            return;
        }
        self.status = Some(format!("Deleted {} point cloud(s)", deleted));
    }

    pub(super) fn undo_delete(&mut self) {
        let Some(idx) = self.catalog.undo_delete() else {
            info_dialog("There is nothing to undo.");
            return;
        };
        self.status = Some(format!("Restored {}", self.catalog.records[idx].file_name));
    }

    pub(super) fn save_dialog(&mut self) {
        let mut dialog = rfd::FileDialog::new().set_title("Choose a folder to save into");
        if let Some(dir) = &self.save_folder {
            dialog = dialog.set_directory(dir);
        }
        let Some(dir) = dialog.pick_folder() else {
            info_dialog("No save folder selected.");
            return;
        };
        match self.catalog.save_surviving(&dir) {
            Ok(written) => {
                self.save_folder = Some(dir.clone());
                self.status = Some(format!("Saved {} file(s) to {}", written, dir.display()));
                self.persist_settings();
                info_dialog(&format!("Saved {} point cloud file(s).", written));
            }
            Err(e) => {
                log::error!("save to {} failed: {}", dir.display(), e);
                self.status = Some(format!("Save failed: {e}"));
                error_dialog(&format!("Save failed: {e}"));
            }
        }
    }

    pub(super) fn request_fit(&mut self) {
        self.fit_requested = true;
    }

    pub(super) fn settings_snapshot(&self) -> settings::AppSettings {
        settings::AppSettings {
            last_folder: Some(self.folder.display().to_string()),
            save_folder: self
                .save_folder
                .as_ref()
                .map(|dir| dir.display().to_string()),
            point_radius: self.point_radius,
            show_legend: self.show_legend,
        }
    }

    pub(super) fn persist_settings(&self) {
        if let Err(e) = settings::save_settings(&self.settings_path, &self.settings_snapshot()) {
            log::warn!("could not save settings to {}: {}", self.settings_path, e);
        }
    }
}

pub(super) fn folder_label(folder: &Path) -> String {
    folder
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| folder.display().to_string())
}
