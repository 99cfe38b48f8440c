use anyhow::{Context, Result};

use crate::core::Report;

pub const REPORT_URL: &str = "https://ubuntu-archive-team.ubuntu.com/sru_report.yaml";

/// Where the SRU report comes from.
pub trait ReportSource {
    fn fetch(&self) -> Result<Report>;
}

/// Downloads the report with a single unauthenticated GET.
#[derive(Debug, Clone)]
pub struct HttpReportSource {
    url: String,
    show_progress: bool,
    use_env_proxy: bool,
}

impl Default for HttpReportSource {
    fn default() -> Self {
        Self::new(REPORT_URL)
    }
}

impl HttpReportSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            show_progress: false,
            use_env_proxy: true,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    #[cfg(test)]
    fn without_env_proxy(mut self) -> Self {
        self.use_env_proxy = false;
        self
    }

    fn download(&self) -> Result<Vec<u8>> {
        // No request timeout: a stalled server blocks the run.
        let mut builder = reqwest::blocking::Client::builder().timeout(None);
        if !self.use_env_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build().context("failed to build HTTP client")?;

        tracing::debug!(url = %self.url, "fetching report");
        let resp = client
            .get(&self.url)
            .send()
            .context("failed to get report")?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(url = %self.url, %status, "report request did not succeed, decoding body anyway");
        }

        let body = resp.bytes().context("failed to read report")?;
        tracing::debug!(bytes = body.len(), %status, "downloaded report");
        Ok(body.to_vec())
    }
}

impl ReportSource for HttpReportSource {
    fn fetch(&self) -> Result<Report> {
        let pb = crate::ui::spinner(self.show_progress, "fetching SRU report...");
        let body = self.download();
        if let Some(pb) = pb {
            pb.finish_and_clear();
        }
        decode_report(&body?)
    }
}

pub fn decode_report(bytes: &[u8]) -> Result<Report> {
    let report = if bytes.iter().all(u8::is_ascii_whitespace) {
        Report::new()
    } else {
        serde_yaml::from_slice::<Option<Report>>(bytes)
            .context("failed to parse YAML report")?
            .unwrap_or_default()
    };
    tracing::debug!(
        releases = report.len(),
        srus = report.values().map(Vec::len).sum::<usize>(),
        "decoded report"
    );
    Ok(report)
}
