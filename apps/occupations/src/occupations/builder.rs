//! Record Builder: one classification code to one persisted `OccupationRecord`.
//!
//! Steps: detail fetch → detail parse → task fetch → task parse → save.
//! Only the detail steps can drop a code; task failures degrade to `tasks = []`.

use tracing::{debug, error, warn};

use crate::occupations::pipeline::PipelineError;
use crate::occupations::record::{parse_detail, parse_tasks, OccupationRecord};
use crate::occupations::store::RecordStore;
use crate::occupations::{Notice, Stage};
use crate::onet_client::{Endpoints, Transport};

/// What building one code produced. `record` is `None` when the code was skipped.
#[derive(Debug, Default)]
pub struct BuildOutcome {
    pub record: Option<OccupationRecord>,
    pub notices: Vec<Notice>,
}

pub struct RecordBuilder<'a> {
    pub transport: &'a dyn Transport,
    pub endpoints: &'a Endpoints,
    pub store: &'a RecordStore,
    /// Surface detail-stage HTTP failures as notices; otherwise they are only logged.
    pub report_detail_failures: bool,
}

impl RecordBuilder<'_> {
    /// Fetches, parses and persists the record for `code`.
    ///
    /// Only connection failures abort; everything else is handled here and
    /// reported through the returned notices. A record whose save failed is
    /// still returned.
    pub async fn build(&self, code: &str) -> Result<BuildOutcome, PipelineError> {
        let mut outcome = BuildOutcome::default();

        let detail_url = self.endpoints.occupation(code);
        let response = self.transport.get(&detail_url).await?;

        if !response.is_ok() {
            debug!(
                "Detail fetch for {code} returned {}: {}",
                response.status, response.body
            );
            if self.report_detail_failures {
                error!("Failed to fetch data for SOC code {code} (status {})", response.status);
                outcome.notices.push(Notice::error(
                    Stage::Detail,
                    Some(code),
                    format!(
                        "Failed to fetch data for SOC code {code} (status {}): {}",
                        response.status, response.body
                    ),
                ));
            }
            return Ok(outcome);
        }

        let detail = match parse_detail(&response.body) {
            Ok(detail) => detail,
            Err(e) => {
                error!("Failed to parse detail XML for {code}: {e}");
                outcome.notices.push(Notice::error(
                    Stage::Detail,
                    Some(code),
                    format!("Failed to parse XML for SOC code {code}."),
                ));
                return Ok(outcome);
            }
        };

        let tasks_response = self.transport.get(&Endpoints::tasks(&detail_url)).await?;
        let tasks = if tasks_response.is_ok() {
            match parse_tasks(&tasks_response.body) {
                Ok(tasks) => tasks,
                Err(e) => {
                    error!("Failed to parse tasks XML for {code}: {e}");
                    outcome.notices.push(Notice::error(
                        Stage::Tasks,
                        Some(code),
                        format!("Failed to parse tasks for SOC code {code}."),
                    ));
                    Vec::new()
                }
            }
        } else {
            warn!(
                "Task fetch for {code} returned {}; keeping record without tasks",
                tasks_response.status
            );
            Vec::new()
        };

        let record = detail.into_record(tasks);
        if let Err(e) = self.store.save(code, &record).await {
            error!("Failed to save record for {code}: {e}");
            outcome.notices.push(Notice::error(
                Stage::Store,
                Some(code),
                format!("Failed to save data for SOC code {code}: {e}"),
            ));
        }

        outcome.record = Some(record);
        Ok(outcome)
    }
}
