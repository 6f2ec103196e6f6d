//! Admission webhook configuration models for `admissionregistration.k8s.io`
//! and the conversion of the `v1` model into the legacy `v1beta1` one.
//!
//! The `v1` schema is a superset of `v1beta1`: every `v1beta1` manifest this
//! crate emits is derived from a `v1` value through [`conversion`].

pub mod admissionregistration;
pub mod constants;
pub mod conversion;

pub use admissionregistration::{v1, v1beta1};
