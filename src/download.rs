//! Listing and fetching raw files from the e-CALLISTO archive.
//!
//! The archive is a plain directory tree, one HTML index per day:
//! `{base}/{YYYY}/{MM}/{DD}/`. Listing parses the anchors of that page; downloading writes each
//! file verbatim (still gzip-compressed) into a local directory.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use tracing::{debug, trace};

use crate::{SpectrumError, SpectrumResult};

/// Public archive root.
pub const DEFAULT_BASE_URL: &str =
    "http://soleil80.cs.technik.fhnw.ch/solarradio/data/2002-20yy_Callisto/";

const FITS_SUFFIX: &str = ".fit.gz";

/// `href` target of an anchor tag, single or double quoted.
static HREF: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"(?i)<a\s[^>]*?href\s*=\s*["']([^"']+)["']"#).ok());

/// A file available in the archive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemoteFits {
    /// File name, e.g. `ALASKA-COHOE_20240101_120000_01.fit.gz`.
    pub name: String,
    /// Absolute URL of the file.
    pub url: String,
}

/// Blocking HTTP client for the archive.
#[derive(Debug, Clone)]
pub struct ArchiveClient {
    /// Archive root; a trailing `/` is optional.
    pub base_url: String,
    /// Timeout for fetching a day listing.
    pub list_timeout: Duration,
    /// Timeout for each file download.
    pub download_timeout: Duration,
}

impl Default for ArchiveClient {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            list_timeout: Duration::from_secs(10),
            download_timeout: Duration::from_secs(30),
        }
    }
}

fn http_err(e: reqwest::Error) -> SpectrumError {
    SpectrumError::Download(e.to_string())
}

impl ArchiveClient {
    /// Client for a mirror or a local test server.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// URL of the directory listing for `day`.
    pub fn day_url(&self, day: NaiveDate) -> String {
        format!(
            "{}/{:04}/{:02}/{:02}/",
            self.base_url.trim_end_matches('/'),
            day.year(),
            day.month(),
            day.day()
        )
    }

    fn client(&self, timeout: Duration) -> SpectrumResult<reqwest::blocking::Client> {
        reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(http_err)
    }

    /// Lists the files recorded on `day` whose start hour is `hour` and whose name contains
    /// `station_substring` (case-insensitive; empty matches every station).
    ///
    /// # Errors
    /// [`SpectrumError::InvalidParameter`] if `hour` is not in `0..=23`,
    /// [`SpectrumError::Download`] if the listing cannot be fetched.
    pub fn list_remote_fits(
        &self,
        day: NaiveDate,
        hour: u32,
        station_substring: &str,
    ) -> SpectrumResult<Vec<RemoteFits>> {
        validate_hour(hour)?;
        let url = self.day_url(day);
        debug!(%url, hour, station = station_substring, "listing archive day");

        let body = self
            .client(self.list_timeout)?
            .get(url.as_str())
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.text())
            .map_err(http_err)?;

        let found = parse_listing(&body, &url, hour, station_substring);
        debug!(count = found.len(), "archive listing parsed");
        Ok(found)
    }

    /// Downloads `items` into `out_dir` (created if missing), returning the written paths in
    /// order. Existing files are overwritten.
    ///
    /// # Errors
    /// [`SpectrumError::Download`] for HTTP failures, [`SpectrumError::Io`] for filesystem ones.
    /// Files written before the failure are left in place.
    pub fn download_files(
        &self,
        items: &[RemoteFits],
        out_dir: impl AsRef<Path>,
    ) -> SpectrumResult<Vec<PathBuf>> {
        let out_dir = out_dir.as_ref();
        std::fs::create_dir_all(out_dir)?;

        let client = self.client(self.download_timeout)?;
        let mut saved = Vec::with_capacity(items.len());
        for item in items {
            trace!(url = %item.url, "downloading");
            let bytes = client
                .get(item.url.as_str())
                .send()
                .and_then(|r| r.error_for_status())
                .and_then(|r| r.bytes())
                .map_err(http_err)?;

            let target = out_dir.join(&item.name);
            std::fs::write(&target, &bytes)?;
            saved.push(target);
        }
        debug!(count = saved.len(), dir = %out_dir.display(), "download finished");
        Ok(saved)
    }
}

fn validate_hour(hour: u32) -> SpectrumResult<()> {
    if hour > 23 {
        return Err(SpectrumError::invalid_parameter(format!(
            "hour must be in [0, 23], got {hour}"
        )));
    }
    Ok(())
}

/// Extracts matching `.fit.gz` entries from a day listing served at `day_url`.
///
/// Relative links are resolved against `day_url`; the entry name is the last path segment.
/// A file matches when its name contains the trimmed, lowercased `station_substring` and its
/// third `_`-separated part starts with `hour` as two digits. Names with fewer parts are skipped.
pub fn parse_listing(
    html: &str,
    day_url: &str,
    hour: u32,
    station_substring: &str,
) -> Vec<RemoteFits> {
    let Some(links) = HREF.as_ref() else {
        return Vec::new();
    };
    let station = station_substring.trim().to_lowercase();

    links
        .captures_iter(html)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .filter(|href| href.ends_with(FITS_SUFFIX))
        .filter_map(|href| {
            let name = href.rsplit('/').next().unwrap_or(href);
            if !station.is_empty() && !name.to_lowercase().contains(&station) {
                return None;
            }
            let file_hour = name
                .split('_')
                .nth(2)
                .and_then(|part| part.get(..2))
                .and_then(|hh| hh.parse::<u32>().ok())?;
            if file_hour != hour {
                return None;
            }
            let url = if href.starts_with("http://") || href.starts_with("https://") {
                href.to_string()
            } else {
                format!("{day_url}{}", href.trim_start_matches("./"))
            };
            Some(RemoteFits {
                name: name.to_string(),
                url,
            })
        })
        .collect()
}
