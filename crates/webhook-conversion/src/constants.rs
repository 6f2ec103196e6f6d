pub const ADMISSIONREGISTRATION_V1: &str = "admissionregistration.k8s.io/v1";
pub const ADMISSIONREGISTRATION_V1BETA1: &str = "admissionregistration.k8s.io/v1beta1";

pub const MUTATING_WEBHOOK_CONFIGURATION_KIND: &str = "MutatingWebhookConfiguration";
pub const VALIDATING_WEBHOOK_CONFIGURATION_KIND: &str = "ValidatingWebhookConfiguration";
