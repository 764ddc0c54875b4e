use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::db::DraftStore;
use crate::error::AppError;
use crate::models::{Basics, CoursePayload, CourseStatus, DraftRecord, Pricing, Section};
use crate::platform::PlatformClient;
use crate::publish::publish_checks;

/// The five authoring steps. Navigation is never gated; only the terminal
/// publish action consults validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WizardStep {
    Basics,
    Curriculum,
    Pricing,
    Preview,
    Publish,
}

impl WizardStep {
    pub fn next(self) -> Self {
        match self {
            WizardStep::Basics => WizardStep::Curriculum,
            WizardStep::Curriculum => WizardStep::Pricing,
            WizardStep::Pricing => WizardStep::Preview,
            WizardStep::Preview => WizardStep::Publish,
            WizardStep::Publish => WizardStep::Publish,
        }
    }

    pub fn back(self) -> Self {
        match self {
            WizardStep::Basics => WizardStep::Basics,
            WizardStep::Curriculum => WizardStep::Basics,
            WizardStep::Pricing => WizardStep::Curriculum,
            WizardStep::Preview => WizardStep::Pricing,
            WizardStep::Publish => WizardStep::Preview,
        }
    }
}

/// One instructor's authoring session: the current document, the wizard
/// position, and the store that keeps the draft durable. Every mutation
/// snapshots the whole triple and writes it back asynchronously.
pub struct AuthoringSession {
    step: WizardStep,
    basics: Basics,
    sections: Vec<Section>,
    pricing: Pricing,
    status: CourseStatus,
    store: DraftStore,
}

impl AuthoringSession {
    /// Hydrates from durable storage, falling back to the seed document.
    pub async fn open(store: DraftStore) -> Result<Self, AppError> {
        let draft = match store.load().await? {
            Some(draft) => {
                info!("hydrated draft from storage key '{}'", store.key());
                draft
            }
            None => DraftRecord::starter(),
        };

        Ok(Self {
            step: WizardStep::Basics,
            basics: draft.basics,
            sections: draft.sections,
            pricing: draft.pricing,
            status: CourseStatus::Draft,
            store,
        })
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn status(&self) -> CourseStatus {
        self.status
    }

    pub fn basics(&self) -> &Basics {
        &self.basics
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn pricing(&self) -> &Pricing {
        &self.pricing
    }

    pub fn goto(&mut self, step: WizardStep) {
        self.step = step;
    }

    pub fn advance(&mut self) {
        self.step = self.step.next();
    }

    pub fn retreat(&mut self) {
        self.step = self.step.back();
    }

    pub fn snapshot(&self) -> DraftRecord {
        DraftRecord {
            basics: self.basics.clone(),
            sections: self.sections.clone(),
            pricing: self.pricing.clone(),
        }
    }

    pub fn set_basics(&mut self, basics: Basics) {
        self.basics = basics;
        self.persist();
    }

    pub fn update_basics(&mut self, f: impl FnOnce(&Basics) -> Basics) {
        let next = f(&self.basics);
        self.basics = next;
        self.persist();
    }

    pub fn set_pricing(&mut self, pricing: Pricing) {
        self.pricing = pricing;
        self.persist();
    }

    pub fn update_sections(&mut self, f: impl FnOnce(&[Section]) -> Vec<Section>) {
        let next = f(&self.sections);
        self.sections = next;
        self.persist();
    }

    // Fire-and-forget: a failed autosave only logs, the in-memory document
    // stays authoritative and the next mutation writes again.
    fn persist(&self) {
        let store = self.store.clone();
        let snapshot = self.snapshot();
        tokio::spawn(async move {
            if let Err(e) = store.save(&snapshot).await {
                warn!("draft autosave failed: {}", e);
            }
        });
    }

    /// Synchronous save of the current snapshot, for callers that need the
    /// write to have landed (tests, shutdown paths).
    pub async fn save_now(&self) -> Result<(), AppError> {
        self.store.save(&self.snapshot()).await
    }

    pub fn payload(&self, status: CourseStatus) -> CoursePayload {
        CoursePayload {
            basics: self.basics.clone(),
            sections: self.sections.clone(),
            pricing: self.pricing.clone(),
            status,
        }
    }

    pub fn publish_violations(&self) -> Vec<String> {
        publish_checks(&self.basics, &self.sections, &self.pricing)
    }

    /// Sends the draft to the platform without any validation gate.
    pub async fn save_draft(&self, platform: &dyn PlatformClient) -> Result<String, AppError> {
        platform.save_course(&self.payload(CourseStatus::Draft)).await
    }

    /// Publishes the course. Refuses with the full ordered violation list
    /// when the draft is not publish-ready; the document is never partially
    /// published.
    pub async fn publish(&mut self, platform: &dyn PlatformClient) -> Result<String, AppError> {
        let violations = self.publish_violations();
        if !violations.is_empty() {
            return Err(AppError::PublishBlocked(violations));
        }

        let message = platform
            .save_course(&self.payload(CourseStatus::Published))
            .await?;
        self.status = CourseStatus::Published;
        info!("course published");
        Ok(message)
    }

    /// Clears durable storage and replaces the draft with the seed document.
    pub async fn reset(&mut self) -> Result<(), AppError> {
        self.store.clear().await?;
        let draft = DraftRecord::starter();
        self.basics = draft.basics;
        self.sections = draft.sections;
        self.pricing = draft.pricing;
        self.status = CourseStatus::Draft;
        self.step = WizardStep::Basics;
        Ok(())
    }
}
