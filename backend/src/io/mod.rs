//! # IO Module
//!
//! The gateway's face towards the booking UI: a JSON REST API under `/api`.
//! Handlers translate HTTP into domain commands and domain results and errors
//! back into HTTP; they hold no business rules of their own.

pub mod rest;
