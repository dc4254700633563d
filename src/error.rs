use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum GpadError {
    #[error("invalid month (expected YYYY-MM): {0}")]
    InvalidMonth(String),

    #[error("failed to read config file at {0}")]
    ConfigRead(Utf8PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("No downloads found.")]
    NoDownloads,

    #[error("Found {found} downloads. No Annex 1 CSV downloads found.")]
    NoAnnexDownload { found: usize },

    #[error("download card has no link: {0}")]
    MissingHref(String),

    #[error("invalid URL {url}: {message}")]
    InvalidUrl { url: String, message: String },

    #[error("portal request failed: {0}")]
    PortalHttp(String),

    #[error("portal returned status {status} for {url}")]
    PortalStatus { status: u16, url: String },

    #[error("filesystem error: {0}")]
    Filesystem(String),

    #[error("failed to read archive: {0}")]
    Archive(String),

    #[error("archive entry escapes the extraction directory: {0}")]
    UnsafeArchiveEntry(String),

    #[error("no data file found in {0}")]
    MissingDataFile(Utf8PathBuf),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("row {line} has {columns} columns, expected at least 4")]
    ShortRow { line: u64, columns: usize },

    #[error("no GP name recorded for code {0}")]
    MissingName(String),

    #[error("no appointment systems recorded for code {0}")]
    MissingSystems(String),
}
