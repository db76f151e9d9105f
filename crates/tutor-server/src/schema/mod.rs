//! API schema types for request/response definitions.
//!
//! Each sub-module defines the request and response types for one group of
//! routes. Field names follow what the frontend sends (`xMin`,
//! `educationLevel`, ...).

pub mod onboarding;
pub mod plot;
pub mod tutor;
