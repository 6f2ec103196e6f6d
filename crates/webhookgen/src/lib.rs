//! Generation of `MutatingWebhookConfiguration` and
//! `ValidatingWebhookConfiguration` manifests for every served
//! `admissionregistration.k8s.io` version.

pub mod downgrade;
pub mod errors;
pub mod generator;
pub mod manifest;
pub mod source;
