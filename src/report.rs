//! End-to-end audit pipeline
//!
//! Scanner, optional AI assessment, scoring. [`ScanReport`] is the
//! serialisable unit the CLI prints.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::ai::{AssessmentInput, DesignAssessor, assess_or_none};
use crate::scanner::Scanner;
use crate::scoring::{ScoreResult, score};
use crate::signals::PageSignals;
use crate::utils::ScanResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub scan_id: Uuid,
    pub scanned_at: DateTime<Utc>,
    pub signals: PageSignals,
    pub result: ScoreResult,
}

impl ScanReport {
    /// Score `signals` and stamp the report
    pub fn new(signals: PageSignals) -> Self {
        let result = score(&signals);
        Self {
            scan_id: Uuid::new_v4(),
            scanned_at: Utc::now(),
            signals,
            result,
        }
    }
}

pub struct TrustAuditor {
    scanner: Scanner,
    assessor: Option<Arc<dyn DesignAssessor>>,
    ai_timeout: Duration,
}

impl TrustAuditor {
    pub fn new(scanner: Scanner) -> Self {
        Self {
            scanner,
            assessor: None,
            ai_timeout: Duration::from_secs(crate::utils::constants::DEFAULT_AI_TIMEOUT_SECS),
        }
    }

    pub fn with_assessor(mut self, assessor: Arc<dyn DesignAssessor>, timeout: Duration) -> Self {
        self.assessor = Some(assessor);
        self.ai_timeout = timeout;
        self
    }

    /// Scan, enrich and score one storefront
    ///
    /// Fails only when the scanner fails, i.e. the storefront did not load.
    pub async fn audit(&self, target_url: &str) -> ScanResult<ScanReport> {
        let mut signals = self.scanner.extract(target_url).await?;

        if let Some(assessor) = &self.assessor {
            match signals.screenshots.desktop.as_deref() {
                Some(desktop) => {
                    let input = AssessmentInput {
                        desktop_screenshot: desktop,
                        mobile_screenshot: signals.screenshots.mobile.as_deref(),
                    };
                    let assessment = assess_or_none(assessor.as_ref(), input, self.ai_timeout).await;
                    signals.ai_assessment = assessment;
                }
                None => debug!("No desktop screenshot for {}, skipping AI assessment", target_url),
            }
        }

        let report = ScanReport::new(signals);
        info!(
            url = %report.signals.url,
            score = report.result.score,
            grade = ?report.result.grade,
            "Trust audit complete"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Grade;

    #[test]
    fn test_report_serialises_camel_case() {
        let report = ScanReport::new(PageSignals::unevaluated("https://shop.example/", true));
        let json = serde_json::to_value(&report).unwrap();

        assert!(json.get("scanId").is_some());
        assert!(json.get("scannedAt").is_some());
        assert_eq!(json["signals"]["isSecure"], true);
        assert_eq!(json["signals"]["screenshots"]["desktop"], serde_json::Value::Null);
        assert_eq!(json["result"]["score"], 20);
        assert_eq!(report.result.grade, Grade::D);
    }

    #[test]
    fn test_report_ids_are_unique() {
        let a = ScanReport::new(PageSignals::default());
        let b = ScanReport::new(PageSignals::default());
        assert_ne!(a.scan_id, b.scan_id);
    }
}
