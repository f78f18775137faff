use std::fs;
use std::io;
use std::path::Path;

/// One parsed point-cloud text file: a header row of column names followed
/// by delimited data rows. Row cells are kept as the original strings so a
/// saved file reproduces its source rows under the same column layout.
#[derive(Debug, Clone, PartialEq)]
pub struct PointTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub delimiter: char,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl PointTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Reads a whitespace- or tab-delimited point table. The header row must
/// name an X and a Y column (CloudCompare exports write `//X` and `Y`).
pub fn read_table(path: impl AsRef<Path>) -> io::Result<PointTable> {
    let text = fs::read_to_string(path)?;
    let mut lines = text.lines();
    let header = lines
        .next()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "file has no header row"))?;

    let delimiter = if header.contains('\t') { '\t' } else { ' ' };
    let columns: Vec<String> = split_cells(header, delimiter)
        .map(str::to_string)
        .collect();
    if columns.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "header row is empty",
        ));
    }

    let x_col = find_coordinate_column(&columns, "x").ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidData, "no X column in header")
    })?;
    let y_col = find_coordinate_column(&columns, "y").ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidData, "no Y column in header")
    })?;

    let mut rows = Vec::new();
    let mut x = Vec::new();
    let mut y = Vec::new();
    for (lineno, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let cells: Vec<String> = split_cells(line, delimiter).map(str::to_string).collect();
        if cells.len() != columns.len() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "line {}: expected {} fields, found {}",
                    lineno + 2,
                    columns.len(),
                    cells.len()
                ),
            ));
        }
        x.push(parse_coordinate(&cells[x_col], lineno)?);
        y.push(parse_coordinate(&cells[y_col], lineno)?);
        rows.push(cells);
    }

    Ok(PointTable {
        columns,
        rows,
        delimiter,
        x,
        y,
    })
}

/// Writes the table back out, header first, one row per line, cells joined
/// with the table's original delimiter.
pub fn write_table(path: impl AsRef<Path>, table: &PointTable) -> io::Result<()> {
    let sep = table.delimiter.to_string();
    let mut out = String::new();
    out.push_str(&table.columns.join(&sep));
    out.push('\n');
    for row in &table.rows {
        out.push_str(&row.join(&sep));
        out.push('\n');
    }
    fs::write(path, out)
}

fn split_cells(line: &str, delimiter: char) -> impl Iterator<Item = &str> {
    line.split(delimiter)
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
}

/// Matches a coordinate column by name, ignoring case and any leading `/`
/// comment markers, so `//X`, `X` and `x` all bind the X axis.
fn find_coordinate_column(columns: &[String], axis: &str) -> Option<usize> {
    columns
        .iter()
        .position(|name| name.trim_start_matches('/').eq_ignore_ascii_case(axis))
}

fn parse_coordinate(cell: &str, lineno: usize) -> io::Result<f64> {
    cell.parse::<f64>().map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("line {}: invalid coordinate {:?}", lineno + 2, cell),
        )
    })
}
