//! Chat dispatcher: classify a message, then run its action against the
//! loaded property database.

use crate::aggregate::wall_summary;
use crate::config::Settings;
use crate::error::{ConfigError, ReadinessError};
use crate::export::{metadata_table, thickness_chart, thickness_table, ChartAction, TableAction};
use crate::filter::{filter_by_condition_with, wall_records};
use crate::intent::{reply_text, ChatReply, Classifier, Intent, Mode, ViewKind};
use crate::model::PropertyDatabase;
use crate::normalize::Normalizer;
use crate::store::PropertyStore;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Elements the viewer should isolate or hide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub mode: Mode,
    pub ids: Vec<u64>,
}

/// Everything produced for one chat message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    #[serde(flatten)]
    pub reply: ChatReply,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<Selection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<TableAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<ChartAction>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl Outcome {
    fn reply_only(reply: ChatReply) -> Self {
        Self {
            reply,
            selection: None,
            table: None,
            chart: None,
            notes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Assistant {
    classifier: Classifier,
    normalizer: Normalizer,
    store: Arc<PropertyStore>,
    timeout: Duration,
}

impl Assistant {
    #[must_use]
    pub fn new(
        classifier: Classifier,
        normalizer: Normalizer,
        store: Arc<PropertyStore>,
        timeout: Duration,
    ) -> Self {
        Self {
            classifier,
            normalizer,
            store,
            timeout,
        }
    }

    pub fn from_settings(settings: &Settings, store: Arc<PropertyStore>) -> Result<Self, ConfigError> {
        Ok(Self::new(
            Classifier::new(settings.vocabulary.clone()),
            Normalizer::new(&settings.field_keys)?,
            store,
            settings.ready_timeout(),
        ))
    }

    #[must_use]
    pub fn store(&self) -> &Arc<PropertyStore> {
        &self.store
    }

    /// Classifies `message` and, when it carries an action, waits for the
    /// property database and runs the action against it.
    pub fn handle(&self, message: &str) -> Result<Outcome, ReadinessError> {
        let message = message.trim();
        let intent = self.classifier.classify(message);
        let reply = ChatReply {
            reply: reply_text(&intent, message),
            action: intent.to_action(),
        };

        if intent == Intent::None {
            return Ok(Outcome::reply_only(reply));
        }

        let db = self.store.wait_ready(self.timeout)?;
        let outcome = self.dispatch(&intent, &db, reply);
        info!(
            selected = outcome.selection.as_ref().map_or(0, |s| s.ids.len()),
            table_rows = outcome.table.as_ref().map_or(0, |t| t.rows.len()),
            "chat action applied"
        );
        Ok(outcome)
    }

    /// Runs an intent's action against a database.
    #[must_use]
    pub fn dispatch(&self, intent: &Intent, db: &PropertyDatabase, reply: ChatReply) -> Outcome {
        let mut outcome = Outcome::reply_only(reply);

        if intent.wants_thickness_stats() {
            let summary = wall_summary(wall_records(db, &self.normalizer));
            if summary.records.is_empty() {
                outcome.notes.push("(자동) 모델에서 벽체 두께 데이터를 찾지 못했습니다.".to_string());
            }
            outcome.selection = Some(Selection {
                mode: intent.mode(),
                ids: summary.records.iter().map(|r| r.id).collect(),
            });
            outcome.table = Some(thickness_table(&summary.thickness_aggregates));
            if let Intent::MetadataRequest(request) = intent {
                if request.view == Some(ViewKind::Chart) {
                    outcome.chart = Some(thickness_chart(&summary.thickness_aggregates));
                }
            }
            return outcome;
        }

        let Some(condition) = intent.to_condition() else {
            return outcome;
        };
        let ids = filter_by_condition_with(&self.normalizer, db, &condition);
        if ids.is_empty() {
            let category = intent.category().unwrap_or("요청 조건");
            outcome
                .notes
                .push(format!("(자동) '{category}'에 해당하는 객체가 모델에 없습니다."));
        }

        if let Intent::MetadataRequest(request) = intent {
            outcome.table = Some(metadata_table(db, &ids, &request.properties));
        }
        outcome.selection = Some(Selection {
            mode: intent.mode(),
            ids,
        });
        outcome
    }
}
