use std::fs;
use std::path::Path;

use anyhow::Result;
use log::info;

/// National covid case snapshot consumed by the case aggregation transform.
pub const COVID_CASES_URL: &str =
    "https://raw.githubusercontent.com/nytimes/covid-19-data/master/us.csv";

/// One-shot snapshot download: the response body is written verbatim to
/// `dest`. No retry, no partial-content handling; failures propagate.
pub fn download(url: &str, dest: &Path) -> Result<()> {
    let response = reqwest::blocking::get(url)?;
    let body = response.bytes()?;
    fs::write(dest, &body)?;
    info!("downloaded {} bytes from {}", body.len(), url);
    Ok(())
}
