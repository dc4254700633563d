use std::fs;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, info};
use zip::ZipArchive;

use crate::domain::IsoMonth;
use crate::error::GpadError;

/// Unpack every entry of `zip_path` under `target_dir`, creating it if absent,
/// and return the files written.
///
/// Entry names are all checked before anything is written, so an archive
/// with an entry escaping `target_dir` leaves no partial extraction behind.
pub fn extract_zip(
    zip_path: &Utf8Path,
    target_dir: &Utf8Path,
) -> Result<Vec<Utf8PathBuf>, GpadError> {
    let file = fs::File::open(zip_path.as_std_path())
        .map_err(|err| GpadError::Filesystem(format!("open zip {zip_path}: {err}")))?;
    let mut archive = ZipArchive::new(file).map_err(|err| GpadError::Archive(err.to_string()))?;

    let mut plan = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let entry = archive
            .by_index(index)
            .map_err(|err| GpadError::Archive(err.to_string()))?;
        let relative = entry
            .enclosed_name()
            .ok_or_else(|| GpadError::UnsafeArchiveEntry(entry.name().to_string()))?;
        let relative = Utf8PathBuf::from_path_buf(relative)
            .map_err(|path| GpadError::Archive(format!("non UTF-8 entry {}", path.display())))?;
        plan.push((index, target_dir.join(relative), entry.is_dir()));
    }

    fs::create_dir_all(target_dir.as_std_path())
        .map_err(|err| GpadError::Filesystem(format!("create {target_dir}: {err}")))?;

    let mut written = Vec::new();
    for (index, destination, is_dir) in plan {
        let directory = if is_dir {
            Some(destination.as_path())
        } else {
            destination.parent()
        };
        if let Some(directory) = directory {
            fs::create_dir_all(directory.as_std_path())
                .map_err(|err| GpadError::Filesystem(format!("create {directory}: {err}")))?;
        }
        if is_dir {
            continue;
        }
        let mut entry = archive
            .by_index(index)
            .map_err(|err| GpadError::Archive(err.to_string()))?;
        let mut outfile = fs::File::create(destination.as_std_path())
            .map_err(|err| GpadError::Filesystem(format!("create {destination}: {err}")))?;
        io::copy(&mut entry, &mut outfile)
            .map_err(|err| GpadError::Archive(format!("{}: {err}", entry.name())))?;
        debug!(file = %destination, "extracted");
        written.push(destination);
    }
    Ok(written)
}

/// Files directly inside `dir` whose names end with the month's
/// `<Mon>_<YY>.csv` suffix, sorted by path.
pub fn find_month_files(
    dir: &Utf8Path,
    month: &IsoMonth,
) -> Result<Vec<Utf8PathBuf>, GpadError> {
    let suffix = month.abbreviated_suffix();
    let mut files = list_files(dir)?
        .into_iter()
        .filter(|path| path.file_name().is_some_and(|name| name.ends_with(&suffix)))
        .collect::<Vec<_>>();
    files.sort();
    Ok(files)
}

/// Input files for aggregation: the month-named CSVs when the release has
/// them, otherwise every CSV in the extraction directory.
pub fn resolve_data_files(
    dir: &Utf8Path,
    month: &IsoMonth,
) -> Result<Vec<Utf8PathBuf>, GpadError> {
    let month_files = find_month_files(dir, month)?;
    if !month_files.is_empty() {
        return Ok(month_files);
    }
    let mut files = list_files(dir)?
        .into_iter()
        .filter(|path| path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("csv")))
        .collect::<Vec<_>>();
    if files.is_empty() {
        return Err(GpadError::MissingDataFile(dir.to_path_buf()));
    }
    files.sort();
    Ok(files)
}

/// Remove the downloaded archive and the extraction directory for a month.
pub fn remove_tmp_files(zip_path: &Utf8Path, extract_dir: &Utf8Path) -> Result<(), GpadError> {
    fs::remove_file(zip_path.as_std_path())
        .map_err(|err| GpadError::Filesystem(format!("remove {zip_path}: {err}")))?;
    fs::remove_dir_all(extract_dir.as_std_path())
        .map_err(|err| GpadError::Filesystem(format!("remove {extract_dir}: {err}")))?;
    info!(archive = %zip_path, dir = %extract_dir, "removed temporary files");
    Ok(())
}

fn list_files(dir: &Utf8Path) -> Result<Vec<Utf8PathBuf>, GpadError> {
    let entries = fs::read_dir(dir.as_std_path())
        .map_err(|_| GpadError::MissingDataFile(dir.to_path_buf()))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| GpadError::Filesystem(err.to_string()))?;
        let file_type = entry
            .file_type()
            .map_err(|err| GpadError::Filesystem(err.to_string()))?;
        if !file_type.is_file() {
            continue;
        }
        match Utf8PathBuf::from_path_buf(entry.path()) {
            Ok(path) => files.push(path),
            Err(path) => {
                return Err(GpadError::Filesystem(format!(
                    "non UTF-8 file name: {}",
                    path.display()
                )));
            }
        }
    }
    Ok(files)
}
