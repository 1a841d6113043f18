//! Top-level viewer: sentence snapshot plus the IOC detail panel.

use std::sync::Arc;

use tracing::{info, warn};

use crate::api::ReportApi;
use crate::error::Result;
use crate::indicator::{self, IocType};
use crate::panel::IocPanel;
use crate::schemas::{IocDetails, ResponseCode};
use crate::state::ReportSnapshot;

/// Button label while the ATT&CK matrix is hidden.
pub const SHOW_MATRIX_LABEL: &str = "Display ATT&CK Matrix";
/// Button label while the ATT&CK matrix is shown.
pub const HIDE_MATRIX_LABEL: &str = "Hide ATT&CK Matrix";

/// Flip the matrix toggle button label. Anything other than the display
/// literal (including stray text) flips back to it.
pub fn toggle_matrix_label(current: &str) -> &'static str {
    if current == SHOW_MATRIX_LABEL {
        HIDE_MATRIX_LABEL
    } else {
        SHOW_MATRIX_LABEL
    }
}

/// Client-side state for one report view. Created when the page opens a
/// report, discarded on navigation.
pub struct ReportViewer {
    api: Arc<dyn ReportApi>,
    report_id: i64,
    snapshot: ReportSnapshot,
    panel: IocPanel,
}

impl ReportViewer {
    pub fn new(api: Arc<dyn ReportApi>, report_id: i64) -> Self {
        Self {
            api,
            report_id,
            snapshot: ReportSnapshot::default(),
            panel: IocPanel::new(),
        }
    }

    /// Load all sentences of the report and replace the snapshot wholesale.
    /// On failure the prior snapshot is left untouched and the error is
    /// logged; the page never surfaced load failures beyond that.
    pub async fn load_sentences(&mut self) -> Result<usize> {
        match self.api.sentences(self.report_id).await {
            Ok(sentences) => {
                self.snapshot = ReportSnapshot::from_sentences(sentences);
                info!(
                    "Loaded {} sentences for report {}",
                    self.snapshot.len(),
                    self.report_id
                );
                Ok(self.snapshot.len())
            }
            Err(e) => {
                warn!("Sentence load failed for report {}: {}", self.report_id, e);
                Err(e)
            }
        }
    }

    /// Run one IOC enrichment lookup and drive the panel through it.
    /// Private IPv4 addresses are answered locally as clean without a
    /// network call. Repeated lookups always re-fetch; nothing is cached.
    pub async fn lookup_ioc(&mut self, value: &str, ioc_type: Option<IocType>) {
        let ioc_type = ioc_type.unwrap_or_else(|| indicator::infer_type(value));
        let generation = self.panel.begin_lookup(value);

        if ioc_type == IocType::IPv4 && indicator::is_private_ip(value) {
            let details = IocDetails {
                response_code: ResponseCode::Clean,
                info: "private address, not queried".to_string(),
                result: None,
                validations: Vec::new(),
            };
            self.panel.apply(generation, value, &details);
            return;
        }

        match self.api.ioc_details(value, ioc_type).await {
            Ok(details) => {
                self.panel.apply(generation, value, &details);
            }
            Err(e) => {
                warn!("IOC lookup failed for {} ({}): {}", value, ioc_type, e);
                self.panel.fail(generation);
            }
        }
    }

    pub fn snapshot(&self) -> &ReportSnapshot {
        &self.snapshot
    }

    pub fn panel(&self) -> &IocPanel {
        &self.panel
    }

    pub fn report_id(&self) -> i64 {
        self.report_id
    }
}
