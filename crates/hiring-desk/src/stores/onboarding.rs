use std::sync::Arc;

use super::StoreState;
use crate::client::{ApiError, HiringBackend};
use crate::onboarding::{
    CandidateFilter, CreateOnboardingCandidate, OnboardingCandidate, OnboardingStats,
    SectionProgress, SectionUpdate,
};

#[derive(Debug)]
pub struct OnboardingStore<B> {
    backend: Arc<B>,
    pub state: StoreState<OnboardingCandidate>,
    pub stats: Option<OnboardingStats>,
}

impl<B: HiringBackend> OnboardingStore<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            state: StoreState::default(),
            stats: None,
        }
    }

    pub fn items(&self) -> &[OnboardingCandidate] {
        &self.state.items
    }

    pub fn filtered(&self, filter: &CandidateFilter) -> Vec<&OnboardingCandidate> {
        filter.apply(&self.state.items)
    }

    pub async fn fetch(&mut self) -> Result<(), ApiError> {
        self.state.begin();
        let result = self.backend.list_onboarding_candidates().await;
        self.state.load("fetch onboarding candidates", result)
    }

    pub async fn get(&mut self, id: &str) -> Result<OnboardingCandidate, ApiError> {
        self.state.begin();
        let result = self.backend.get_onboarding_candidate(id).await;
        let candidate = self.state.finish("fetch onboarding candidate", result)?;
        self.state.upsert(&candidate);
        Ok(candidate)
    }

    pub async fn create(
        &mut self,
        request: &CreateOnboardingCandidate,
    ) -> Result<OnboardingCandidate, ApiError> {
        self.state.begin();
        let result = self.backend.create_onboarding_candidate(request).await;
        let candidate = self.state.finish("create onboarding candidate", result)?;
        self.state.append(&candidate);
        Ok(candidate)
    }

    /// Saves one section and refreshes the candidate from the response.
    pub async fn save_section(
        &mut self,
        id: &str,
        update: &SectionUpdate,
    ) -> Result<SectionProgress, ApiError> {
        self.state.begin();
        let result = self.backend.update_onboarding_section(id, update).await;
        let saved = self.state.finish("save onboarding section", result)?;
        self.state.upsert(&saved.candidate);
        Ok(saved.section)
    }

    pub async fn submit(&mut self, id: &str) -> Result<OnboardingCandidate, ApiError> {
        self.state.begin();
        let result = self.backend.submit_onboarding(id).await;
        let submitted = self.state.finish("submit onboarding", result)?;
        tracing::info!(candidate = id, message = %submitted.message, "onboarding submitted");
        self.state.upsert(&submitted.candidate);
        Ok(submitted.candidate)
    }

    pub async fn delete(&mut self, id: &str) -> Result<(), ApiError> {
        self.state.begin();
        let result = self.backend.delete_onboarding_candidate(id).await;
        self.state.finish("delete onboarding candidate", result)?;
        self.state.remove(id);
        Ok(())
    }

    pub async fn fetch_stats(&mut self) -> Result<OnboardingStats, ApiError> {
        self.state.begin();
        let result = self.backend.onboarding_stats().await;
        let stats = self.state.finish("fetch onboarding stats", result)?;
        self.stats = Some(stats);
        Ok(stats)
    }
}
