//! Lending workflows exposed by the webhook service.

pub mod applications;
