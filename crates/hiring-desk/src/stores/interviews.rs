use std::sync::Arc;

use chrono::NaiveDate;

use super::StoreState;
use crate::client::{ApiError, HiringBackend};
use crate::hiring::interviews::{
    CompleteInterview, Interview, InterviewStats, InterviewUpdate, ScheduleInterview,
};

#[derive(Debug)]
pub struct InterviewsStore<B> {
    backend: Arc<B>,
    pub state: StoreState<Interview>,
    pub stats: Option<InterviewStats>,
}

impl<B: HiringBackend> InterviewsStore<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            state: StoreState::default(),
            stats: None,
        }
    }

    pub fn items(&self) -> &[Interview] {
        &self.state.items
    }

    pub fn for_application<'a>(
        &'a self,
        application: &'a str,
    ) -> impl Iterator<Item = &'a Interview> {
        self.state
            .items
            .iter()
            .filter(move |interview| interview.application == application)
    }

    pub async fn fetch(&mut self) -> Result<(), ApiError> {
        self.state.begin();
        let result = self.backend.list_interviews().await;
        self.state.load("fetch interviews", result)
    }

    /// Replaces the list with scheduled interviews in the next `days` days.
    pub async fn fetch_upcoming(&mut self, days: i64) -> Result<(), ApiError> {
        self.state.begin();
        let result = self.backend.upcoming_interviews(days).await;
        self.state.replace_items("fetch upcoming interviews", result)
    }

    pub async fn fetch_range(&mut self, start: NaiveDate, end: NaiveDate) -> Result<(), ApiError> {
        self.state.begin();
        let result = self.backend.interviews_by_date_range(start, end).await;
        self.state.replace_items("fetch interviews by date range", result)
    }

    pub async fn schedule(&mut self, request: &ScheduleInterview) -> Result<Interview, ApiError> {
        self.state.begin();
        let result = self.backend.schedule_interview(request).await;
        let interview = self.state.finish("schedule interview", result)?;
        self.state.append(&interview);
        Ok(interview)
    }

    pub async fn complete(
        &mut self,
        id: &str,
        request: &CompleteInterview,
    ) -> Result<Interview, ApiError> {
        self.state.begin();
        let result = self.backend.complete_interview(id, request).await;
        let interview = self.state.finish("complete interview", result)?;
        self.state.upsert(&interview);
        Ok(interview)
    }

    pub async fn update(
        &mut self,
        id: &str,
        update: &InterviewUpdate,
    ) -> Result<Interview, ApiError> {
        self.state.begin();
        let result = self.backend.update_interview(id, update).await;
        let interview = self.state.finish("update interview", result)?;
        self.state.upsert(&interview);
        Ok(interview)
    }

    pub async fn cancel(&mut self, id: &str) -> Result<Interview, ApiError> {
        self.update(id, &InterviewUpdate::cancel()).await
    }

    pub async fn delete(&mut self, id: &str) -> Result<(), ApiError> {
        self.state.begin();
        let result = self.backend.delete_interview(id).await;
        self.state.finish("delete interview", result)?;
        self.state.remove(id);
        Ok(())
    }

    pub async fn fetch_stats(&mut self) -> Result<InterviewStats, ApiError> {
        self.state.begin();
        let result = self.backend.interview_stats().await;
        let stats = self.state.finish("fetch interview stats", result)?;
        self.stats = Some(stats);
        Ok(stats)
    }
}
