//! Connector-gateway proxy: raw candidates and offers for the combined analysis.

pub mod client;
pub mod insights;

pub use client::{GatewayClient, GatewayError, OfferPage};
pub use insights::{match_offers, rank_candidates, CandidateListing, OfferMatch};
