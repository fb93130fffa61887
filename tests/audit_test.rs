//! Full pipeline: fake page -> scanner -> AI assessor -> score -> report.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use common::{FakeSource, PageScript, fast_scan_config, product_snapshot, trusted_store_snapshot};
use storefront_trust_scan::ai::{AssessError, AssessmentInput};
use storefront_trust_scan::scoring::Category;
use storefront_trust_scan::{AiAssessment, DesignAssessor, Grade, Scanner, ScanError, TrustAuditor};

const HOME: &str = "https://trusted.example/";
const FINAL: &str = "https://www.trusted.example/";
const PRODUCT: &str = "https://www.trusted.example/products/linen-shirt";

/// Returns a fixed verdict and counts how often it was asked
struct FixedAssessor {
    design_score: u8,
    calls: AtomicUsize,
}

#[async_trait]
impl DesignAssessor for FixedAssessor {
    async fn assess(&self, input: AssessmentInput<'_>) -> Result<AiAssessment, AssessError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert!(!input.desktop_screenshot.is_empty());
        assert!(input.mobile_screenshot.is_some());
        Ok(AiAssessment {
            design_score: self.design_score,
            assessment: "Consistent branding, clear navigation.".to_string(),
            priority_fixes: vec!["Show delivery times on the homepage".to_string()],
            niche_comparison: "Typical for apparel".to_string(),
        })
    }
}

struct FailingAssessor;

#[async_trait]
impl DesignAssessor for FailingAssessor {
    async fn assess(&self, _input: AssessmentInput<'_>) -> Result<AiAssessment, AssessError> {
        Err(AssessError::Status {
            status: 401,
            body: "invalid x-api-key".to_string(),
        })
    }
}

fn trusted_source() -> FakeSource {
    FakeSource::new(
        PageScript::serving(HOME, FINAL, trusted_store_snapshot()).with_product(PRODUCT, product_snapshot()),
    )
}

fn auditor(source: &FakeSource) -> TrustAuditor {
    TrustAuditor::new(Scanner::new(Arc::new(source.clone()), &fast_scan_config()).unwrap())
}

#[tokio::test]
async fn test_trusted_store_without_ai_hits_the_85_ceiling() {
    let report = auditor(&trusted_source()).audit(HOME).await.unwrap();

    assert_eq!(report.result.score, 85);
    assert_eq!(report.result.grade, Grade::B);
    assert_eq!(report.result.breakdown.len(), 6);
    assert!(report.result.recommendations.is_empty());
    assert!(report.signals.ai_assessment.is_none());
}

#[tokio::test]
async fn test_ai_assessment_adds_design_points_and_fixes() {
    let assessor = Arc::new(FixedAssessor {
        design_score: 8,
        calls: AtomicUsize::new(0),
    });
    let report = auditor(&trusted_source())
        .with_assessor(assessor.clone(), Duration::from_secs(5))
        .audit(HOME)
        .await
        .unwrap();

    assert_eq!(assessor.calls.load(Ordering::SeqCst), 1);
    assert_eq!(report.result.score, 97);
    assert_eq!(report.result.grade, Grade::A);

    let ai_entry = report.result.breakdown.last().unwrap();
    assert_eq!(ai_entry.category, Category::AiDesign);
    assert_eq!(ai_entry.points_awarded, 12);
    assert!(ai_entry.passed);

    assert_eq!(report.result.recommendations.len(), 1);
    assert_eq!(
        report.result.recommendations[0].fix_instructions,
        "Show delivery times on the homepage"
    );
}

#[tokio::test]
async fn test_failing_provider_scores_without_ai() {
    let report = auditor(&trusted_source())
        .with_assessor(Arc::new(FailingAssessor), Duration::from_secs(5))
        .audit(HOME)
        .await
        .unwrap();

    assert!(report.signals.ai_assessment.is_none());
    assert_eq!(report.result.score, 85);
    assert_eq!(report.result.breakdown.len(), 6);
}

#[tokio::test]
async fn test_no_screenshot_skips_the_provider() {
    let mut script = PageScript::serving(HOME, FINAL, trusted_store_snapshot());
    script.screenshots_fail = true;
    let source = FakeSource::new(script);
    let assessor = Arc::new(FixedAssessor {
        design_score: 10,
        calls: AtomicUsize::new(0),
    });

    let report = auditor(&source)
        .with_assessor(assessor.clone(), Duration::from_secs(5))
        .audit(HOME)
        .await
        .unwrap();

    assert_eq!(assessor.calls.load(Ordering::SeqCst), 0);
    assert_eq!(report.result.score, 85);
}

#[tokio::test]
async fn test_unreachable_store_fails_the_audit() {
    let source = FakeSource::new(PageScript::default());
    let err = auditor(&source).audit("https://gone.example/").await.unwrap_err();
    assert!(matches!(err, ScanError::Navigation { .. }));
}

#[tokio::test]
async fn test_report_json_shape() {
    let report = auditor(&trusted_source()).audit(HOME).await.unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["signals"]["url"], FINAL);
    assert_eq!(json["signals"]["screenshots"]["desktop"], "iVBORw0KGgo=");
    assert_eq!(json["signals"]["trustBadges"]["totalCount"], 1);
    assert_eq!(json["signals"]["trustBadges"]["items"][0]["kind"], "payment");
    assert_eq!(json["signals"]["productPage"]["found"], true);
    assert_eq!(json["signals"]["aiAssessment"], serde_json::Value::Null);
    assert_eq!(json["result"]["grade"], "B");
    assert_eq!(json["result"]["breakdown"][0]["category"], "trustBadges");
    assert_eq!(json["result"]["breakdown"][0]["maxPoints"], 25);

    // screenshots round-trip through base64
    let back: storefront_trust_scan::ScanReport = serde_json::from_value(json).unwrap();
    assert_eq!(back, report);
}
