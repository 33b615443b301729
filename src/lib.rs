//! Email-subscription capture for the marketing site.
//!
//! The hero block, the subscribe modal and the tools-page block all use the
//! same flow: validate the address, submit it once, and report the outcome.
//! That flow lives in [`controller::SubscriptionController`]; the surfaces in
//! [`surfaces`] are thin adapters over it.

pub mod backend;
pub mod configuration;
pub mod controller;
pub mod domain;
pub mod notification;
pub mod startup;
pub mod surfaces;
pub mod telemetry;
