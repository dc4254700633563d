use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use tracing::{error, info};

use crate::aggregate::aggregate_files;
use crate::archive::{extract_zip, remove_tmp_files, resolve_data_files};
use crate::config::Settings;
use crate::domain::IsoMonth;
use crate::error::GpadError;
use crate::links::{page_url, resolve_link, select_download_link};
use crate::portal::{PortalClient, stage_archive};
use crate::suppliers::write_suppliers;

#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub month: IsoMonth,
    pub download_link: String,
    pub archive_path: Utf8PathBuf,
    pub extract_dir: Utf8PathBuf,
    pub input_files: Vec<Utf8PathBuf>,
    pub practices: usize,
    pub output: Utf8PathBuf,
    pub removed_tmp_files: bool,
}

pub struct App<P: PortalClient> {
    settings: Settings,
    portal: P,
}

impl<P: PortalClient> App<P> {
    pub fn new(settings: Settings, portal: P) -> Self {
        Self { settings, portal }
    }

    /// Run the whole pipeline for one month. The first failing stage aborts
    /// the run and leaves temporary files in place.
    pub fn run(
        &self,
        month: IsoMonth,
        archive_override: Option<&str>,
    ) -> Result<RunResult, GpadError> {
        let archive_path = self.settings.archive_path(&month);
        let extract_dir = self.settings.extract_dir(&month);

        let download_link = logged(
            "downloading zip file",
            self.download(&month, archive_override, &archive_path),
        )?;

        let extracted = logged(
            "unzipping zip file",
            extract_zip(&archive_path, &extract_dir),
        )?;
        info!(dir = %extract_dir, files = extracted.len(), "unzipped zip file");

        let input_files = logged(
            "locating data file",
            resolve_data_files(&extract_dir, &month),
        )?;
        let aggregation = logged(
            "processing data file",
            aggregate_files(&input_files, self.settings.check_header),
        )?;

        let practices = logged(
            "writing output file",
            write_suppliers(&self.settings.output, &aggregation),
        )?;

        let removed_tmp_files = if self.settings.keep_tmp {
            info!("keeping temporary files");
            false
        } else {
            logged(
                "removing temporary files",
                remove_tmp_files(&archive_path, &extract_dir),
            )?;
            true
        };

        info!(%month, practices, "completed processing data");
        Ok(RunResult {
            month,
            download_link,
            archive_path,
            extract_dir,
            input_files,
            practices,
            output: self.settings.output.clone(),
            removed_tmp_files,
        })
    }

    /// Resolve the Annex 1 link for a month by scraping its publication page.
    pub fn resolve_download_link(&self, month: &IsoMonth) -> Result<String, GpadError> {
        let url = page_url(&self.settings.base_url, month);
        info!(%month, %url, "finding download link");
        let html = self.portal.fetch_page(&url)?;
        let href = select_download_link(&html)?;
        resolve_link(&url, &href)
    }

    fn download(
        &self,
        month: &IsoMonth,
        archive_override: Option<&str>,
        archive_path: &Utf8Path,
    ) -> Result<String, GpadError> {
        let link = match archive_override {
            Some(location) => {
                info!(%location, "skipping link resolution, using provided zip file");
                location.to_string()
            }
            None => self.resolve_download_link(month)?,
        };
        info!(%link, "downloading zip file");
        stage_archive(&self.portal, &link, archive_path.as_std_path())?;
        info!(path = %archive_path, "downloaded zip file");
        Ok(link)
    }
}

fn logged<T>(stage: &str, result: Result<T, GpadError>) -> Result<T, GpadError> {
    result.map_err(|err| {
        error!("Error {stage}: {err}");
        err
    })
}
