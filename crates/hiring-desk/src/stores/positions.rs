use std::sync::Arc;

use super::StoreState;
use crate::client::{ApiError, ApplicantQuery, HiringBackend};
use crate::hiring::applications::Application;
use crate::hiring::positions::{Position, PositionForm, PositionStats};

#[derive(Debug)]
pub struct PositionsStore<B> {
    backend: Arc<B>,
    pub state: StoreState<Position>,
    pub stats: Option<PositionStats>,
}

impl<B: HiringBackend> PositionsStore<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            state: StoreState::default(),
            stats: None,
        }
    }

    pub fn items(&self) -> &[Position] {
        &self.state.items
    }

    pub async fn fetch(&mut self) -> Result<(), ApiError> {
        self.state.begin();
        let result = self.backend.list_positions().await;
        self.state.load("fetch positions", result)
    }

    pub async fn get(&mut self, id: &str) -> Result<Position, ApiError> {
        self.state.begin();
        let result = self.backend.get_position(id).await;
        let position = self.state.finish("fetch position", result)?;
        self.state.upsert(&position);
        Ok(position)
    }

    pub async fn create(&mut self, form: &PositionForm) -> Result<Position, ApiError> {
        self.state.begin();
        let result = self.backend.create_position(form).await;
        let position = self.state.finish("create position", result)?;
        self.state.append(&position);
        Ok(position)
    }

    pub async fn update(&mut self, id: &str, form: &PositionForm) -> Result<Position, ApiError> {
        self.state.begin();
        let result = self.backend.update_position(id, form).await;
        let position = self.state.finish("update position", result)?;
        self.state.upsert(&position);
        Ok(position)
    }

    pub async fn delete(&mut self, id: &str) -> Result<(), ApiError> {
        self.state.begin();
        let result = self.backend.delete_position(id).await;
        self.state.finish("delete position", result)?;
        self.state.remove(id);
        Ok(())
    }

    pub async fn applicants(
        &mut self,
        id: &str,
        query: ApplicantQuery,
    ) -> Result<Vec<Application>, ApiError> {
        self.state.begin();
        let result = self.backend.position_applicants(id, query).await;
        self.state.finish("fetch position applicants", result)
    }

    pub async fn fetch_stats(&mut self) -> Result<PositionStats, ApiError> {
        self.state.begin();
        let result = self.backend.position_stats().await;
        let stats = self.state.finish("fetch position stats", result)?;
        self.stats = Some(stats.clone());
        Ok(stats)
    }
}
