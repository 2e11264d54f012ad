use std::sync::Arc;

use super::StoreState;
use crate::client::{ApiError, HiringBackend};
use crate::hiring::offers::{CreateOffer, DeclineOffer, Offer, OfferStats, OfferUpdate};

#[derive(Debug)]
pub struct OffersStore<B> {
    backend: Arc<B>,
    pub state: StoreState<Offer>,
    /// Result of the last `expiring_soon` lookup, kept apart from the main list.
    pub expiring: Vec<Offer>,
    pub stats: Option<OfferStats>,
}

impl<B: HiringBackend> OffersStore<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            state: StoreState::default(),
            expiring: Vec::new(),
            stats: None,
        }
    }

    pub fn items(&self) -> &[Offer] {
        &self.state.items
    }

    pub async fn fetch(&mut self) -> Result<(), ApiError> {
        self.state.begin();
        let result = self.backend.list_offers().await;
        self.state.load("fetch offers", result)
    }

    pub async fn get(&mut self, id: &str) -> Result<Offer, ApiError> {
        self.state.begin();
        let result = self.backend.get_offer(id).await;
        let offer = self.state.finish("fetch offer", result)?;
        self.state.upsert(&offer);
        Ok(offer)
    }

    pub async fn create(&mut self, request: &CreateOffer) -> Result<Offer, ApiError> {
        self.state.begin();
        let result = self.backend.create_offer(request).await;
        let offer = self.state.finish("create offer", result)?;
        self.state.append(&offer);
        Ok(offer)
    }

    pub async fn update(&mut self, id: &str, update: &OfferUpdate) -> Result<Offer, ApiError> {
        self.state.begin();
        let result = self.backend.update_offer(id, update).await;
        let offer = self.state.finish("update offer", result)?;
        self.state.upsert(&offer);
        Ok(offer)
    }

    pub async fn delete(&mut self, id: &str) -> Result<(), ApiError> {
        self.state.begin();
        let result = self.backend.delete_offer(id).await;
        self.state.finish("delete offer", result)?;
        self.state.remove(id);
        Ok(())
    }

    pub async fn accept(&mut self, id: &str) -> Result<Offer, ApiError> {
        self.state.begin();
        let result = self.backend.accept_offer(id).await;
        let offer = self.state.finish("accept offer", result)?;
        self.state.upsert(&offer);
        Ok(offer)
    }

    pub async fn decline(
        &mut self,
        id: &str,
        reason: impl Into<String>,
    ) -> Result<Offer, ApiError> {
        self.state.begin();
        let request = DeclineOffer {
            reason: reason.into(),
        };
        let result = self.backend.decline_offer(id, &request).await;
        let offer = self.state.finish("decline offer", result)?;
        self.state.upsert(&offer);
        Ok(offer)
    }

    pub async fn fetch_expiring(&mut self, days: i64) -> Result<&[Offer], ApiError> {
        self.state.begin();
        let result = self.backend.expiring_offers(days).await;
        self.expiring = self.state.finish("fetch expiring offers", result)?;
        Ok(self.expiring.as_slice())
    }

    pub async fn fetch_stats(&mut self) -> Result<OfferStats, ApiError> {
        self.state.begin();
        let result = self.backend.offer_stats().await;
        let stats = self.state.finish("fetch offer stats", result)?;
        self.stats = Some(stats);
        Ok(stats)
    }
}
