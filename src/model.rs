use std::io;
use std::path::Path;

use crate::table::{self, PointTable};

/// Axis-aligned extent of a record's XY projection. Non-finite coordinates
/// never contribute, so a table of NaNs ends up with empty bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            min_y: f64::INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    pub fn expand(&mut self, x: f64, y: f64) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        !self.is_empty() && x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    pub fn union(self, other: Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            max_x: self.max_x.max(other.max_x),
            min_y: self.min_y.min(other.min_y),
            max_y: self.max_y.max(other.max_y),
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_x + self.max_x) * 0.5,
            (self.min_y + self.max_y) * 0.5,
        )
    }

    pub fn from_xy(x: &[f64], y: &[f64]) -> Self {
        let mut bounds = Self::empty();
        for (&px, &py) in x.iter().zip(y) {
            bounds.expand(px, py);
        }
        bounds
    }
}

/// One loaded point-cloud file. Records are created at load time and never
/// destroyed; delete/undo only flip the flags. `selected` is meaningful
/// only while `deleted` is false.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub file_name: String,
    pub table: PointTable,
    pub bounds: Bounds,
    pub selected: bool,
    pub deleted: bool,
}

impl Record {
    pub fn new(file_name: String, table: PointTable) -> Self {
        let bounds = Bounds::from_xy(&table.x, &table.y);
        Self {
            file_name,
            table,
            bounds,
            selected: false,
            deleted: false,
        }
    }
}

/// The loaded records plus the LIFO undo stack. The stack stores record
/// indices; popping one clears its deleted flag.
#[derive(Debug, Default)]
pub struct Catalog {
    pub records: Vec<Record>,
    undo_stack: Vec<usize>,
}

impl Catalog {
    /// Loads every `*.txt` file in `dir`, in file-name order. Files that
    /// fail to read or parse are logged and skipped; the rest still load.
    pub fn load_folder(dir: &Path) -> io::Result<Self> {
        let mut paths: Vec<_> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
            })
            .collect();
        paths.sort();

        let mut records = Vec::new();
        for path in paths {
            let file_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or_default()
                .to_string();
            match table::read_table(&path) {
                Ok(table) => {
                    log::debug!("loaded {} ({} points)", file_name, table.len());
                    records.push(Record::new(file_name, table));
                }
                Err(e) => log::warn!("skipping {}: {}", path.display(), e),
            }
        }
        log::info!(
            "loaded {} point cloud(s) from {}",
            records.len(),
            dir.display()
        );

        Ok(Self {
            records,
            undo_stack: Vec::new(),
        })
    }

    pub fn visible(&self) -> impl Iterator<Item = (usize, &Record)> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, r)| !r.deleted)
    }

    pub fn visible_count(&self) -> usize {
        self.visible().count()
    }

    pub fn selected_count(&self) -> usize {
        self.visible().filter(|(_, r)| r.selected).count()
    }

    pub fn deleted_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// The first non-deleted record whose bounds contain the point, in
    /// record order.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<usize> {
        self.visible()
            .find(|(_, r)| r.bounds.contains(x, y))
            .map(|(idx, _)| idx)
    }

    pub fn toggle_selected(&mut self, idx: usize) {
        if let Some(record) = self.records.get_mut(idx) {
            if !record.deleted {
                record.selected = !record.selected;
            }
        }
    }

    pub fn clear_selection(&mut self) {
        for record in &mut self.records {
            record.selected = false;
        }
    }

    /// Marks every selected record deleted (clearing its selection) and
    /// pushes it onto the undo stack. Returns how many were deleted.
    pub fn delete_selected(&mut self) -> usize {
        let mut deleted = 0;
        for (idx, record) in self.records.iter_mut().enumerate() {
            if record.selected && !record.deleted {
                record.deleted = true;
                record.selected = false;
                self.undo_stack.push(idx);
                deleted += 1;
            }
        }
        deleted
    }

    /// Restores the most recently deleted record. Returns its index.
    pub fn undo_delete(&mut self) -> Option<usize> {
        let idx = self.undo_stack.pop()?;
        self.records[idx].deleted = false;
        Some(idx)
    }

    /// Union of all visible bounds, for fitting the view.
    pub fn data_bounds(&self) -> Bounds {
        self.visible()
            .map(|(_, r)| r.bounds)
            .fold(Bounds::empty(), Bounds::union)
    }

    /// Writes every non-deleted record into `dir` under its original file
    /// name. Stops at the first failing write; files already written stay.
    pub fn save_surviving(&self, dir: &Path) -> io::Result<usize> {
        let mut written = 0;
        for (_, record) in self.visible() {
            table::write_table(dir.join(&record.file_name), &record.table)?;
            written += 1;
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(points: &[(f64, f64)]) -> PointTable {
        PointTable {
            columns: vec!["//X".to_string(), "Y".to_string()],
            rows: points
                .iter()
                .map(|(x, y)| vec![x.to_string(), y.to_string()])
                .collect(),
            delimiter: ' ',
            x: points.iter().map(|(x, _)| *x).collect(),
            y: points.iter().map(|(_, y)| *y).collect(),
        }
    }

    fn catalog_of(files: &[(&str, &[(f64, f64)])]) -> Catalog {
        Catalog {
            records: files
                .iter()
                .map(|(name, pts)| Record::new(name.to_string(), table(pts)))
                .collect(),
            undo_stack: Vec::new(),
        }
    }

    #[test]
    fn bounds_match_coordinate_extents() {
        let record = Record::new(
            "a.txt".to_string(),
            table(&[(1.0, 5.0), (-2.0, 3.0), (4.0, -1.0)]),
        );
        assert_eq!(record.bounds.min_x, -2.0);
        assert_eq!(record.bounds.max_x, 4.0);
        assert_eq!(record.bounds.min_y, -1.0);
        assert_eq!(record.bounds.max_y, 5.0);
    }

    #[test]
    fn bounds_ignore_non_finite_points() {
        let mut bounds = Bounds::empty();
        bounds.expand(f64::NAN, 1.0);
        bounds.expand(1.0, f64::INFINITY);
        assert!(bounds.is_empty());
        bounds.expand(2.0, 3.0);
        assert!(!bounds.is_empty());
        assert!(bounds.contains(2.0, 3.0));
    }

    #[test]
    fn empty_bounds_contain_nothing() {
        let bounds = Bounds::empty();
        assert!(!bounds.contains(0.0, 0.0));
    }

    #[test]
    fn hit_test_picks_first_containing_record() {
        let mut catalog = catalog_of(&[
            ("a.txt", &[(0.0, 0.0), (10.0, 10.0)]),
            ("b.txt", &[(5.0, 5.0), (20.0, 20.0)]),
        ]);
        // Inside both boxes: a.txt wins by record order.
        assert_eq!(catalog.hit_test(7.0, 7.0), Some(0));
        // Inside b.txt only.
        assert_eq!(catalog.hit_test(15.0, 15.0), Some(1));
        // Outside everything.
        assert_eq!(catalog.hit_test(-5.0, -5.0), None);

        catalog.records[0].deleted = true;
        assert_eq!(catalog.hit_test(7.0, 7.0), Some(1));
    }

    #[test]
    fn toggle_flips_selection_only_for_live_records() {
        let mut catalog = catalog_of(&[("a.txt", &[(0.0, 0.0)])]);
        catalog.toggle_selected(0);
        assert!(catalog.records[0].selected);
        catalog.toggle_selected(0);
        assert!(!catalog.records[0].selected);

        catalog.records[0].deleted = true;
        catalog.toggle_selected(0);
        assert!(!catalog.records[0].selected);
    }

    #[test]
    fn delete_clears_selection_and_stacks_lifo() {
        let mut catalog = catalog_of(&[
            ("a.txt", &[(0.0, 0.0)]),
            ("b.txt", &[(1.0, 1.0)]),
            ("c.txt", &[(2.0, 2.0)]),
        ]);
        catalog.toggle_selected(0);
        catalog.toggle_selected(2);
        assert_eq!(catalog.delete_selected(), 2);

        assert!(catalog.records[0].deleted);
        assert!(!catalog.records[0].selected);
        assert!(catalog.records[2].deleted);
        assert_eq!(catalog.visible_count(), 1);

        // LIFO: c.txt was pushed last, so it comes back first.
        assert_eq!(catalog.undo_delete(), Some(2));
        assert!(!catalog.records[2].deleted);
        assert_eq!(catalog.undo_delete(), Some(0));
        assert_eq!(catalog.undo_delete(), None);
    }

    #[test]
    fn delete_with_no_selection_is_a_no_op() {
        let mut catalog = catalog_of(&[("a.txt", &[(0.0, 0.0)])]);
        assert_eq!(catalog.delete_selected(), 0);
        assert!(!catalog.can_undo());
    }

    #[test]
    fn data_bounds_skip_deleted_records() {
        let mut catalog = catalog_of(&[
            ("a.txt", &[(0.0, 0.0), (1.0, 1.0)]),
            ("b.txt", &[(100.0, 100.0)]),
        ]);
        catalog.records[1].deleted = true;
        let bounds = catalog.data_bounds();
        assert_eq!(bounds.max_x, 1.0);
        assert_eq!(bounds.max_y, 1.0);
    }

    #[test]
    fn load_folder_skips_unreadable_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("good.txt"), "//X Y\n1 2\n").unwrap();
        std::fs::write(dir.path().join("bad.txt"), "no header here").unwrap();
        std::fs::write(dir.path().join("ignored.csv"), "X,Y\n1,2\n").unwrap();

        let catalog = Catalog::load_folder(dir.path()).unwrap();
        assert_eq!(catalog.records.len(), 1);
        assert_eq!(catalog.records[0].file_name, "good.txt");
    }

    #[test]
    fn load_delete_undo_save_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let a = "//X Y\n0 0\n1 1\n";
        let b = "//X Y\n10 10\n11 11\n";
        let c = "//X Y\n20 20\n21 21\n";
        std::fs::write(dir.path().join("a.txt"), a).unwrap();
        std::fs::write(dir.path().join("b.txt"), b).unwrap();
        std::fs::write(dir.path().join("c.txt"), c).unwrap();

        let mut catalog = Catalog::load_folder(dir.path()).unwrap();
        assert_eq!(catalog.records.len(), 3);
        assert_eq!(catalog.records[1].file_name, "b.txt");

        // Click inside b's box, delete, then undo.
        let hit = catalog.hit_test(10.5, 10.5).unwrap();
        assert_eq!(hit, 1);
        catalog.toggle_selected(hit);
        assert_eq!(catalog.delete_selected(), 1);
        assert_eq!(catalog.visible_count(), 2);
        assert_eq!(catalog.undo_delete(), Some(1));
        assert_eq!(catalog.visible_count(), 3);

        let out = tempfile::tempdir().unwrap();
        assert_eq!(catalog.save_surviving(out.path()).unwrap(), 3);
        assert_eq!(
            std::fs::read_to_string(out.path().join("a.txt")).unwrap(),
            a
        );
        assert_eq!(
            std::fs::read_to_string(out.path().join("b.txt")).unwrap(),
            b
        );
        assert_eq!(
            std::fs::read_to_string(out.path().join("c.txt")).unwrap(),
            c
        );
    }

    #[test]
    fn save_writes_only_surviving_records() {
        let mut catalog = catalog_of(&[("a.txt", &[(0.0, 0.0)]), ("b.txt", &[(1.0, 1.0)])]);
        catalog.toggle_selected(1);
        catalog.delete_selected();

        let out = tempfile::tempdir().unwrap();
        assert_eq!(catalog.save_surviving(out.path()).unwrap(), 1);
        assert!(out.path().join("a.txt").exists());
        assert!(!out.path().join("b.txt").exists());
    }
}
