use std::fs;
use std::io::Write;

use camino::Utf8Path;
use tracing::info;

use crate::aggregate::Aggregation;
use crate::error::GpadError;

pub const HEADER: [&str; 4] = ["GP Code", "GP Name", "Appointment Systems", "Main System"];

/// Write the supplier table to any sink, header first.
pub fn write_rows<W: Write>(writer: W, aggregation: &Aggregation) -> Result<usize, GpadError> {
    let rows = aggregation.rows()?;
    let mut writer = csv::Writer::from_writer(writer);
    writer
        .write_record(HEADER)
        .map_err(|err| GpadError::Csv(err.to_string()))?;
    for row in &rows {
        writer
            .write_record([
                row.code.as_str(),
                row.name.as_str(),
                row.appointment_systems.as_str(),
                row.main_system.as_str(),
            ])
            .map_err(|err| GpadError::Csv(err.to_string()))?;
    }
    writer
        .flush()
        .map_err(|err| GpadError::Csv(err.to_string()))?;
    Ok(rows.len())
}

pub fn write_suppliers(path: &Utf8Path, aggregation: &Aggregation) -> Result<usize, GpadError> {
    if let Some(parent) = path.parent() {
        if !parent.as_str().is_empty() {
            fs::create_dir_all(parent.as_std_path())
                .map_err(|err| GpadError::Filesystem(format!("create {parent}: {err}")))?;
        }
    }
    let file = fs::File::create(path.as_std_path())
        .map_err(|err| GpadError::Filesystem(format!("create {path}: {err}")))?;
    let written = write_rows(file, aggregation)?;
    info!(file = %path, rows = written, "written output file");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_only_for_empty_aggregation() {
        let mut out = Vec::new();
        let written = write_rows(&mut out, &Aggregation::default()).unwrap();
        assert_eq!(written, 0);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "GP Code,GP Name,Appointment Systems,Main System\n"
        );
    }
}
