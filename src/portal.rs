use std::fs::{self, File};
use std::path::Path;
use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

use crate::error::GpadError;

/// Access to the publication portal: HTML pages and archive downloads.
pub trait PortalClient {
    fn fetch_page(&self, url: &str) -> Result<String, GpadError>;
    fn download(&self, url: &str, destination: &Path) -> Result<(), GpadError>;
}

impl<P: PortalClient + ?Sized> PortalClient for &P {
    fn fetch_page(&self, url: &str) -> Result<String, GpadError> {
        (**self).fetch_page(url)
    }

    fn download(&self, url: &str, destination: &Path) -> Result<(), GpadError> {
        (**self).download(url, destination)
    }
}

#[derive(Clone)]
pub struct PortalHttpClient {
    client: Client,
}

impl PortalHttpClient {
    pub fn new(timeout_secs: u64) -> Result<Self, GpadError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("gpad-suppliers/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| GpadError::PortalHttp(err.to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|err| GpadError::PortalHttp(err.to_string()))?;
        Ok(Self { client })
    }

    fn get(&self, url: &str) -> Result<Response, GpadError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| GpadError::PortalHttp(err.to_string()))?;
        handle_status(response, url)
    }
}

impl PortalClient for PortalHttpClient {
    fn fetch_page(&self, url: &str) -> Result<String, GpadError> {
        self.get(url)?
            .text()
            .map_err(|err| GpadError::PortalHttp(err.to_string()))
    }

    fn download(&self, url: &str, destination: &Path) -> Result<(), GpadError> {
        let mut response = self.get(url)?;
        create_parent(destination)?;
        let mut file =
            File::create(destination).map_err(|err| GpadError::Filesystem(err.to_string()))?;
        std::io::copy(&mut response, &mut file)
            .map_err(|err| GpadError::PortalHttp(err.to_string()))?;
        Ok(())
    }
}

fn handle_status(response: Response, url: &str) -> Result<Response, GpadError> {
    if response.status().is_success() {
        return Ok(response);
    }
    Err(GpadError::PortalStatus {
        status: response.status().as_u16(),
        url: url.to_string(),
    })
}

/// Whether an archive location names something to fetch over HTTP rather
/// than a file already on disk.
pub fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Place a caller-supplied archive at `destination`, downloading it when the
/// location is an URL and copying it otherwise.
pub fn stage_archive<P: PortalClient>(
    client: &P,
    location: &str,
    destination: &Path,
) -> Result<(), GpadError> {
    if is_remote(location) {
        return client.download(location, destination);
    }
    create_parent(destination)?;
    fs::copy(location, destination)
        .map_err(|err| GpadError::Filesystem(format!("copy {location}: {err}")))?;
    Ok(())
}

fn create_parent(path: &Path) -> Result<(), GpadError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| GpadError::Filesystem(err.to_string()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_locations() {
        assert!(is_remote("https://files.digital.nhs.uk/a/b.zip"));
        assert!(is_remote("http://localhost/b.zip"));
        assert!(!is_remote("tmp/2025-10.zip"));
        assert!(!is_remote("/data/release.zip"));
    }
}
