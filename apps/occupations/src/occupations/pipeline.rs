//! Pipeline Orchestrator: clear store → resolve codes → build each code in order.
//!
//! Strictly sequential: one request in flight at a time, codes processed in
//! resolver order. A failing code is omitted, never fatal. Runs are serialised
//! so concurrent callers cannot interleave clears and writes on the store.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;

use crate::occupations::builder::RecordBuilder;
use crate::occupations::record::OccupationRecord;
use crate::occupations::resolver::{resolve_codes, Resolution};
use crate::occupations::store::{RecordStore, StoreError};
use crate::occupations::{Notice, NoticeLevel, Stage};
use crate::onet_client::{Endpoints, Transport, TransportError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Everything one run produced: the records (the run result) plus the
/// warnings and errors raised along the way.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub keyword: String,
    pub records: Vec<OccupationRecord>,
    pub notices: Vec<Notice>,
}

/// The user-visible outcome of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Fetched(usize),
    NoMatches,
    SearchFailed(String),
}

impl RunReport {
    pub fn outcome(&self) -> RunOutcome {
        if let Some(notice) = self
            .notices
            .iter()
            .find(|n| n.stage == Stage::Search && n.level == NoticeLevel::Error)
        {
            return RunOutcome::SearchFailed(notice.message.clone());
        }
        if self.records.is_empty() {
            RunOutcome::NoMatches
        } else {
            RunOutcome::Fetched(self.records.len())
        }
    }
}

pub struct Pipeline {
    transport: Arc<dyn Transport>,
    endpoints: Endpoints,
    store: RecordStore,
    report_detail_failures: bool,
    run_lock: Mutex<()>,
}

impl Pipeline {
    pub fn new(
        transport: Arc<dyn Transport>,
        endpoints: Endpoints,
        store: RecordStore,
        report_detail_failures: bool,
    ) -> Self {
        Self {
            transport,
            endpoints,
            store,
            report_detail_failures,
            run_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Runs the whole fetch for `keyword`. Only connection failures and a
    /// failure to clear the store are returned as errors.
    pub async fn run(&self, keyword: &str) -> Result<RunReport, PipelineError> {
        let _guard = self.run_lock.lock().await;

        info!("Fetching occupation data for '{keyword}'");
        self.store.clear().await?;

        let mut report = RunReport {
            keyword: keyword.to_string(),
            records: Vec::new(),
            notices: Vec::new(),
        };

        let codes = match resolve_codes(self.transport.as_ref(), &self.endpoints, keyword).await? {
            Resolution::Codes(codes) => codes,
            Resolution::NoMatches(notice) | Resolution::Failed(notice) => {
                report.notices.push(notice);
                return Ok(report);
            }
        };

        let builder = RecordBuilder {
            transport: self.transport.as_ref(),
            endpoints: &self.endpoints,
            store: &self.store,
            report_detail_failures: self.report_detail_failures,
        };

        for code in &codes {
            let outcome = builder.build(code).await?;
            report.notices.extend(outcome.notices);
            if let Some(record) = outcome.record {
                report.records.push(record);
            }
        }

        info!(
            "Run for '{keyword}' finished: {} of {} code(s) produced records",
            report.records.len(),
            codes.len()
        );
        Ok(report)
    }
}
