use std::sync::Arc;

use super::StoreState;
use crate::client::{ApiError, HiringBackend};
use crate::hiring::applications::{
    filter_by_certification, filter_by_position, filter_by_stage, search_applications,
    stage_count, total_count, Applicant, Application, ApplicationStage,
};
use crate::hiring::positions::Position;

/// Applications list, optionally scoped to one position.
#[derive(Debug)]
pub struct ApplicationsStore<B> {
    backend: Arc<B>,
    position: Option<String>,
    pub state: StoreState<Application>,
}

impl<B: HiringBackend> ApplicationsStore<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            position: None,
            state: StoreState::default(),
        }
    }

    pub fn for_position(backend: Arc<B>, position: impl Into<String>) -> Self {
        Self {
            position: Some(position.into()),
            ..Self::new(backend)
        }
    }

    pub fn items(&self) -> &[Application] {
        &self.state.items
    }

    /// Server-side total when the list was paginated, else the loaded count.
    pub fn total_count(&self) -> usize {
        total_count(self.state.pagination.as_ref(), self.state.items.len())
    }

    /// Loaded applications whose name, email or current role contains `term`.
    pub fn search(&self, term: &str) -> Vec<&Application> {
        search_applications(&self.state.items, term)
    }

    pub fn filter_by_stage(&self, stage: ApplicationStage) -> Vec<&Application> {
        filter_by_stage(&self.state.items, stage)
    }

    pub fn filter_by_position(&self, position_id: &str) -> Vec<&Application> {
        filter_by_position(&self.state.items, position_id)
    }

    pub fn filter_by_certification(&self, certified: bool) -> Vec<&Application> {
        filter_by_certification(&self.state.items, certified)
    }

    pub fn stage_count(&self, stage: ApplicationStage) -> usize {
        stage_count(&self.state.items, stage)
    }

    /// Flattened rows, with position columns filled from `positions` where available.
    pub fn applicants(&self, positions: &[Position]) -> Vec<Applicant> {
        self.state
            .items
            .iter()
            .map(|application| {
                let applicant = Applicant::from_application(application);
                match positions.iter().find(|p| p.id == application.position) {
                    Some(position) => applicant.with_position(position),
                    None => applicant,
                }
            })
            .collect()
    }

    pub async fn fetch(&mut self) -> Result<(), ApiError> {
        self.state.begin();
        let result = self
            .backend
            .list_applications(self.position.as_deref())
            .await;
        self.state.load("fetch applications", result)
    }

    pub async fn get(&mut self, id: &str) -> Result<Application, ApiError> {
        self.state.begin();
        let result = self.backend.get_application(id).await;
        let application = self.state.finish("fetch application", result)?;
        self.state.upsert(&application);
        Ok(application)
    }

    pub async fn advance_stage(&mut self, id: &str) -> Result<Application, ApiError> {
        self.state.begin();
        let result = self.backend.advance_stage(id).await;
        let application = self.state.finish("advance application stage", result)?;
        self.state.upsert(&application);
        Ok(application)
    }

    pub async fn reject(&mut self, id: &str) -> Result<Application, ApiError> {
        self.state.begin();
        let result = self.backend.reject_application(id).await;
        let application = self.state.finish("reject application", result)?;
        self.state.upsert(&application);
        Ok(application)
    }

    /// Demo-only override that jumps straight to `stage`.
    pub async fn set_stage(
        &mut self,
        id: &str,
        stage: ApplicationStage,
    ) -> Result<Application, ApiError> {
        self.state.begin();
        let result = self.backend.demo_set_stage(id, stage).await;
        let application = self.state.finish("set application stage", result)?;
        self.state.upsert(&application);
        Ok(application)
    }
}
