//! Size estimation for a chosen selection.
//!
//! A failed estimate yields 0.0 instead of an error, so an unreliable
//! backend never blocks the flow. Callers compare the result with their
//! ceiling; 0.0 always passes.

use crate::download::backend::{ExtractionBackend, InfoQuery, RawInfo};
use crate::download::types::{FormatSelection, BYTES_PER_MB};

/// Sums the declared (else approximate, else 0) size of each requested format, in bytes.
pub fn sum_requested_sizes(info: &RawInfo) -> f64 {
    if info.requested_formats.is_empty() {
        // Single-format selection: sizes sit on the top-level document
        info.filesize.or(info.filesize_approx).unwrap_or(0.0)
    } else {
        info.requested_formats
            .iter()
            .map(|f| f.best_size_bytes().unwrap_or(0.0))
            .sum()
    }
}

/// Estimates the download size of `selection` in megabytes.
pub async fn estimate_size_mb(backend: &dyn ExtractionBackend, url: &str, selection: &FormatSelection) -> f64 {
    let spec = selection.spec();
    log::debug!("Estimating size of {} for {}", spec, url);

    match backend.extract_info(url, &InfoQuery::with_format(spec.as_str())).await {
        Ok(info) => {
            let mb = sum_requested_sizes(&info) / BYTES_PER_MB;
            log::info!("Estimated size for {} [{}]: {:.2} MB", url, spec, mb);
            mb
        }
        Err(e) => {
            log::warn!("Size estimation failed for {} [{}]: {}. Assuming 0 MB.", url, spec, e);
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::download::backend::RawFormat;

    fn sized(filesize: Option<f64>, approx: Option<f64>) -> RawFormat {
        RawFormat {
            format_id: "x".into(),
            filesize,
            filesize_approx: approx,
            ..Default::default()
        }
    }

    #[test]
    fn test_sum_prefers_declared_then_approx() {
        let info = RawInfo {
            requested_formats: vec![
                sized(Some(1_048_576.0), Some(9e9)),
                sized(None, Some(2_097_152.0)),
                sized(None, None),
            ],
            ..Default::default()
        };
        assert_eq!(sum_requested_sizes(&info), 3_145_728.0);
    }

    #[test]
    fn test_sum_single_format_uses_top_level() {
        let info = RawInfo {
            filesize_approx: Some(5_242_880.0),
            ..Default::default()
        };
        assert_eq!(sum_requested_sizes(&info) / BYTES_PER_MB, 5.0);
        assert_eq!(sum_requested_sizes(&RawInfo::default()), 0.0);
    }
}
