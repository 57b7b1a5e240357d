// Comparison composer - Overlays similar patients onto the primary patient's channels
use crate::application::series_store::ChannelSeriesStore;
use crate::domain::dashboard::{ComparisonOutcome, SkipReason};
use crate::domain::error::DashboardError;
use crate::domain::patient::PatientId;
use crate::domain::styling::{style_grouped, Origin, Palette, StyledSeries};
use crate::infrastructure::config::render_template;
use std::collections::HashMap;
use std::sync::Arc;

pub const DEFAULT_ANNOTATION_TEMPLATE: &str =
    "supporting context for the stated diagnosis of patient ${patient}";

/// Styled series of one request plus the fate of each comparison patient.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub series: Vec<StyledSeries>,
    pub outcomes: Vec<ComparisonOutcome>,
}

impl Comparison {
    pub fn annotations(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                ComparisonOutcome::Included { annotation, .. } => Some(annotation.clone()),
                ComparisonOutcome::Skipped { .. } => None,
            })
            .collect()
    }

    pub fn skipped(&self) -> impl Iterator<Item = &ComparisonOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, ComparisonOutcome::Skipped { .. }))
    }
}

#[derive(Clone)]
pub struct ComparisonComposer {
    store: Arc<dyn ChannelSeriesStore>,
    palette: Palette,
    annotation_template: String,
}

impl ComparisonComposer {
    pub fn new(store: Arc<dyn ChannelSeriesStore>, palette: Palette) -> Self {
        Self {
            store,
            palette,
            annotation_template: DEFAULT_ANNOTATION_TEMPLATE.to_string(),
        }
    }

    pub fn with_annotation_template(mut self, template: impl Into<String>) -> Self {
        self.annotation_template = template.into();
        self
    }

    /// Primary channels first, then each comparison patient in the order given.
    ///
    /// A missing primary dataset fails the request. A missing comparison
    /// dataset is recorded as skipped; any other comparison failure propagates.
    pub async fn compose(
        &self,
        primary: &PatientId,
        comparisons: &[PatientId],
    ) -> Result<Comparison, DashboardError> {
        let raw = self.store.load_series(primary).await?;
        tracing::debug!(
            "Loaded {} samples for primary patient {}",
            raw.samples.len(),
            primary
        );
        let mut series = style_grouped(primary, Origin::Primary, raw.group(), &self.palette);

        let mut outcomes = Vec::with_capacity(comparisons.len());
        for patient in comparisons {
            match self.store.load_series(patient).await {
                Ok(raw) => {
                    series.extend(style_grouped(
                        patient,
                        Origin::Comparison,
                        raw.group(),
                        &self.palette,
                    ));
                    outcomes.push(ComparisonOutcome::Included {
                        patient: patient.clone(),
                        annotation: self.annotation(patient),
                    });
                }
                Err(DashboardError::DatasetNotFound { table, .. }) => {
                    tracing::warn!(
                        "Skipping comparison patient {} for {}: no {} dataset",
                        patient,
                        primary,
                        table
                    );
                    outcomes.push(ComparisonOutcome::Skipped {
                        patient: patient.clone(),
                        reason: SkipReason::DatasetNotFound { table },
                    });
                }
                Err(e) => return Err(e),
            }
        }

        Ok(Comparison { series, outcomes })
    }

    fn annotation(&self, patient: &PatientId) -> String {
        let mut vars = HashMap::new();
        vars.insert("patient".to_string(), patient.to_string());
        render_template(&self.annotation_template, &vars)
    }
}
