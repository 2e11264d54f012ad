//! Offers, offer-letter templates and the offer wizard.

pub mod domain;
pub mod form;
pub mod templates;

pub use domain::{
    CreateOffer, DeclineOffer, Offer, OfferDateFilter, OfferFilter, OfferStats, OfferStatus,
    OfferUpdate,
};
pub use form::{OfferForm, OfferFormError, OfferStep};
pub use templates::{
    extract_template_fields, fill_template, CreateOfferTemplate, OfferTemplate, PreviewRequest,
    PreviewResponse, OFFER_LETTER_TEMPLATE, OFFER_TEMPLATE_FIELDS,
};
