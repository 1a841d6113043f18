//! Integration tests for the IOC detail panel flow.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use reportlens::api::ReportApi;
use reportlens::error::{ReportLensError, Result};
use reportlens::indicator::IocType;
use reportlens::panel::PanelPhase;
use reportlens::schemas::{IocDetails, Sentence, TitleColor};
use reportlens::viewer::ReportViewer;

/// In-memory enrichment backend serving one canned JSON payload.
struct FakeEnrichment {
    payload: Option<String>,
    calls: AtomicUsize,
}

impl FakeEnrichment {
    fn ok(payload: &str) -> Arc<Self> {
        Arc::new(Self {
            payload: Some(payload.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            payload: None,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl ReportApi for FakeEnrichment {
    async fn sentences(&self, _report_id: i64) -> Result<Vec<Sentence>> {
        Ok(Vec::new())
    }

    async fn ioc_details(&self, _value: &str, _ioc_type: IocType) -> Result<IocDetails> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.payload {
            Some(p) => Ok(serde_json::from_str(p)?),
            None => Err(ReportLensError::Http {
                message: "503 service unavailable".to_string(),
            }),
        }
    }
}

fn pulse_payload(ids: &[&str]) -> String {
    let pulses: Vec<String> = ids
        .iter()
        .map(|id| {
            format!(
                r#"{{"id": "{}", "name": "pulse {}", "author_name": "otx", "tags": ["apt"]}}"#,
                id, id
            )
        })
        .collect();
    format!(
        r#"{{"response_code": 1, "info": "malicious", "result": {{"pulse_info": {{"pulses": [{}]}}}}}}"#,
        pulses.join(",")
    )
}

#[tokio::test]
async fn test_malicious_result_renders_one_section_per_pulse() {
    let api = FakeEnrichment::ok(&pulse_payload(&["aa1", "bb2", "cc3", "dd4"]));
    let mut viewer = ReportViewer::new(api, 1);
    viewer.lookup_ioc("evil.example", None).await;

    let panel = viewer.panel();
    assert_eq!(panel.phase(), PanelPhase::Ready);
    assert!(!panel.spinner_visible());
    assert!(panel.content_visible());
    assert_eq!(panel.title(), "evil.example - malicious");
    assert_eq!(panel.title_color(), Some(TitleColor::Red));

    let body = panel.body_html();
    assert_eq!(body.matches("accordion-item").count(), 4);
    let mut dom_ids = Vec::new();
    for id in ["aa1", "bb2", "cc3", "dd4"] {
        let dom_id = format!("id=\"pulse-{}\"", id);
        assert!(body.contains(&dom_id), "missing section for pulse {}", id);
        dom_ids.push(dom_id);
    }
    dom_ids.dedup();
    assert_eq!(dom_ids.len(), 4);
}

#[tokio::test]
async fn test_validated_result_renders_blocks_in_order() {
    let api = FakeEnrichment::ok(
        r#"{
            "response_code": 3,
            "info": "whitelisted",
            "validations": [
                {"name": "alexa-top", "message": "ranked 120", "source": "alexa"},
                {"name": "akamai", "message": "CDN host", "source": "akamai"}
            ]
        }"#,
    );
    let mut viewer = ReportViewer::new(api, 1);
    viewer.lookup_ioc("cdn.example", None).await;

    let panel = viewer.panel();
    assert_eq!(panel.title(), "cdn.example - whitelisted");
    assert_eq!(panel.title_color(), Some(TitleColor::Green));

    let body = panel.body_html();
    assert_eq!(body.matches("validation-block").count(), 2);
    assert!(body.find("alexa-top").unwrap() < body.find("akamai").unwrap());
}

#[tokio::test]
async fn test_quiet_codes_color_title_only() {
    let cases = [
        (-1, TitleColor::Red),
        (0, TitleColor::Green),
        (2, TitleColor::Orange),
    ];
    for (code, color) in cases {
        let api = FakeEnrichment::ok(&format!(
            r#"{{"response_code": {}, "info": "seen"}}"#,
            code
        ));
        let mut viewer = ReportViewer::new(api, 1);
        viewer.lookup_ioc("203.0.113.9", Some(IocType::IPv4)).await;

        let panel = viewer.panel();
        assert_eq!(panel.title_color(), Some(color), "code {}", code);
        assert!(
            panel.body_html().is_empty(),
            "code {} should render no body",
            code
        );
    }
}

#[tokio::test]
async fn test_lookup_failure_shows_fixed_error_title() {
    let api = FakeEnrichment::failing();
    let mut viewer = ReportViewer::new(api, 1);
    viewer.lookup_ioc("evil.example", None).await;

    let panel = viewer.panel();
    assert_eq!(panel.phase(), PanelPhase::Failed);
    assert_eq!(panel.title(), "HTTP ERROR");
    assert!(!panel.spinner_visible());
    assert!(panel.content_visible());
    assert!(panel.body_html().is_empty());
}

#[tokio::test]
async fn test_private_ip_answered_without_network_call() {
    let api = FakeEnrichment::failing();
    let mut viewer = ReportViewer::new(api.clone(), 1);
    viewer.lookup_ioc("192.168.1.10", None).await;

    let panel = viewer.panel();
    assert_eq!(panel.phase(), PanelPhase::Ready);
    assert_eq!(panel.title_color(), Some(TitleColor::Green));
    assert_eq!(api.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_repeated_lookups_refetch_every_time() {
    let api = FakeEnrichment::ok(r#"{"response_code": 0, "info": "clean"}"#);
    let mut viewer = ReportViewer::new(api.clone(), 1);
    viewer.lookup_ioc("8.8.8.8", Some(IocType::IPv4)).await;
    viewer.lookup_ioc("8.8.8.8", Some(IocType::IPv4)).await;
    assert_eq!(api.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_pulse_markup_is_escaped() {
    let api = FakeEnrichment::ok(
        r#"{
            "response_code": 1,
            "info": "malicious",
            "result": {"pulse_info": {"pulses": [{
                "id": "x1",
                "name": "<script>alert(1)</script>",
                "description": "drops <b>bad</b> things"
            }]}}
        }"#,
    );
    let mut viewer = ReportViewer::new(api, 1);
    viewer.lookup_ioc("evil.example", None).await;

    let body = viewer.panel().body_html();
    assert!(!body.contains("<script>"));
    assert!(body.contains("&lt;script&gt;"));
    assert!(!body.contains("<b>bad</b>"));
}
