use std::collections::BTreeMap;
use std::sync::Arc;

use super::StoreState;
use crate::client::{ApiError, HiringBackend};
use crate::hiring::offers::{CreateOfferTemplate, OfferTemplate};

#[derive(Debug)]
pub struct OfferTemplatesStore<B> {
    backend: Arc<B>,
    pub state: StoreState<OfferTemplate>,
    pub active: Option<OfferTemplate>,
}

impl<B: HiringBackend> OfferTemplatesStore<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            state: StoreState::default(),
            active: None,
        }
    }

    pub fn items(&self) -> &[OfferTemplate] {
        &self.state.items
    }

    pub async fn fetch(&mut self) -> Result<(), ApiError> {
        self.state.begin();
        let result = self.backend.list_offer_templates().await;
        self.state.load("fetch offer templates", result)
    }

    /// A 404 means no template is active; it clears `active` without raising.
    pub async fn fetch_active(&mut self) -> Result<Option<&OfferTemplate>, ApiError> {
        self.state.begin();
        let result = match self.backend.active_offer_template().await {
            Ok(template) => Ok(Some(template)),
            Err(error) if error.is_not_found() => Ok(None),
            Err(error) => Err(error),
        };
        self.active = self.state.finish("fetch active offer template", result)?;
        Ok(self.active.as_ref())
    }

    pub async fn create(
        &mut self,
        request: &CreateOfferTemplate,
    ) -> Result<OfferTemplate, ApiError> {
        self.state.begin();
        let result = self.backend.create_offer_template(request).await;
        let template = self.state.finish("create offer template", result)?;
        self.state.append(&template);
        Ok(template)
    }

    pub async fn update(
        &mut self,
        id: &str,
        request: &CreateOfferTemplate,
    ) -> Result<OfferTemplate, ApiError> {
        self.state.begin();
        let result = self.backend.update_offer_template(id, request).await;
        let template = self.state.finish("update offer template", result)?;
        self.state.upsert(&template);
        Ok(template)
    }

    pub async fn delete(&mut self, id: &str) -> Result<(), ApiError> {
        self.state.begin();
        let result = self.backend.delete_offer_template(id).await;
        self.state.finish("delete offer template", result)?;
        self.state.remove(id);
        if self.active.as_ref().is_some_and(|active| active.id == id) {
            self.active = None;
        }
        Ok(())
    }

    pub async fn preview(
        &mut self,
        id: &str,
        data: &BTreeMap<String, String>,
    ) -> Result<String, ApiError> {
        self.state.begin();
        let result = self.backend.preview_offer_template(id, data).await;
        self.state
            .finish("preview offer template", result)
            .map(|response| response.preview)
    }
}
