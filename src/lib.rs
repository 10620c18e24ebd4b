//! Artisan Market - Services Marketplace Backend
//!
//! This crate implements the commission and payment-transaction
//! reconciliation engine for a two-sided services marketplace: rate
//! determination, the transaction ledger and its status machines, payment
//! gateway webhook ingestion, and the manual commission settlement workflow.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
