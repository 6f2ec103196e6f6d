//! Downgrade of `admissionregistration.k8s.io/v1` webhook configurations to
//! `admissionregistration.k8s.io/v1beta1`.
//!
//! Kubernetes ships no conversion functions between the two webhook APIs, so
//! they are spelled out here. Every function is pure: inputs are borrowed and
//! outputs are freshly allocated, never sharing storage with the input.
//!
//! Fields the legacy schema does not know about (selectors, timeouts, match
//! conditions, reinvocation policy, rule scope, service port and
//! `admissionReviewVersions`) are dropped.

use crate::constants::ADMISSIONREGISTRATION_V1BETA1;
use crate::{v1, v1beta1};

/// Converts a list of `v1` mutating webhooks, keeping their order.
pub fn mutating_webhooks(webhooks: &[v1::MutatingWebhook]) -> Vec<v1beta1::MutatingWebhook> {
    webhooks
        .iter()
        .map(|webhook| LegacyWebhookFields::from(WebhookFields::from(webhook)).into_mutating())
        .collect()
}

/// Converts a list of `v1` validating webhooks, keeping their order.
pub fn validating_webhooks(
    webhooks: &[v1::ValidatingWebhook],
) -> Vec<v1beta1::ValidatingWebhook> {
    webhooks
        .iter()
        .map(|webhook| LegacyWebhookFields::from(WebhookFields::from(webhook)).into_validating())
        .collect()
}

pub fn mutating_webhook_configuration(
    config: &v1::MutatingWebhookConfiguration,
) -> v1beta1::MutatingWebhookConfiguration {
    v1beta1::MutatingWebhookConfiguration {
        api_version: ADMISSIONREGISTRATION_V1BETA1.to_string(),
        kind: config.kind.clone(),
        metadata: config.metadata.clone(),
        webhooks: mutating_webhooks(&config.webhooks),
    }
}

pub fn validating_webhook_configuration(
    config: &v1::ValidatingWebhookConfiguration,
) -> v1beta1::ValidatingWebhookConfiguration {
    v1beta1::ValidatingWebhookConfiguration {
        api_version: ADMISSIONREGISTRATION_V1BETA1.to_string(),
        kind: config.kind.clone(),
        metadata: config.metadata.clone(),
        webhooks: validating_webhooks(&config.webhooks),
    }
}

/// Converts the client config of a webhook.
///
/// # Panics
///
/// Panics when `config` has no service reference. URL based targets have no
/// conversion; callers are expected to only hand over service based configs.
pub fn client_config(config: &v1::WebhookClientConfig) -> v1beta1::WebhookClientConfig {
    let service = match &config.service {
        Some(service) => service,
        None => panic!(
            "cannot convert webhook client config without a service reference (url: {:?})",
            config.url
        ),
    };

    v1beta1::WebhookClientConfig {
        url: None,
        service: Some(v1beta1::ServiceReference {
            name: service.name.clone(),
            namespace: service.namespace.clone(),
            path: service.path.clone(),
        }),
        ca_bundle: config.ca_bundle.clone(),
    }
}

pub fn rules(rules: &[v1::RuleWithOperations]) -> Vec<v1beta1::RuleWithOperations> {
    rules
        .iter()
        .map(|rule| v1beta1::RuleWithOperations {
            operations: rule.operations.iter().copied().map(operation).collect(),
            api_groups: rule.api_groups.clone(),
            api_versions: rule.api_versions.clone(),
            resources: rule.resources.clone(),
        })
        .collect()
}

pub fn failure_policy(
    policy: Option<&v1::FailurePolicyType>,
) -> Option<v1beta1::FailurePolicyType> {
    policy.copied().map(Into::into)
}

pub fn match_policy(policy: Option<&v1::MatchPolicyType>) -> Option<v1beta1::MatchPolicyType> {
    policy.copied().map(Into::into)
}

pub fn side_effects(class: Option<&v1::SideEffectClass>) -> Option<v1beta1::SideEffectClass> {
    class.copied().map(Into::into)
}

pub fn operation(operation: v1::OperationType) -> v1beta1::OperationType {
    operation.into()
}

impl From<v1::FailurePolicyType> for v1beta1::FailurePolicyType {
    fn from(policy: v1::FailurePolicyType) -> Self {
        match policy {
            v1::FailurePolicyType::Ignore => v1beta1::FailurePolicyType::Ignore,
            v1::FailurePolicyType::Fail => v1beta1::FailurePolicyType::Fail,
        }
    }
}

impl From<v1::MatchPolicyType> for v1beta1::MatchPolicyType {
    fn from(policy: v1::MatchPolicyType) -> Self {
        match policy {
            v1::MatchPolicyType::Exact => v1beta1::MatchPolicyType::Exact,
            v1::MatchPolicyType::Equivalent => v1beta1::MatchPolicyType::Equivalent,
        }
    }
}

impl From<v1::SideEffectClass> for v1beta1::SideEffectClass {
    fn from(class: v1::SideEffectClass) -> Self {
        match class {
            v1::SideEffectClass::Unknown => v1beta1::SideEffectClass::Unknown,
            v1::SideEffectClass::None => v1beta1::SideEffectClass::None,
            v1::SideEffectClass::Some => v1beta1::SideEffectClass::Some,
            v1::SideEffectClass::NoneOnDryRun => v1beta1::SideEffectClass::NoneOnDryRun,
        }
    }
}

impl From<v1::OperationType> for v1beta1::OperationType {
    fn from(operation: v1::OperationType) -> Self {
        match operation {
            v1::OperationType::All => v1beta1::OperationType::All,
            v1::OperationType::Create => v1beta1::OperationType::Create,
            v1::OperationType::Update => v1beta1::OperationType::Update,
            v1::OperationType::Delete => v1beta1::OperationType::Delete,
            v1::OperationType::Connect => v1beta1::OperationType::Connect,
        }
    }
}

// The fields shared by `v1` mutating and validating webhooks. The two kinds
// are unrelated types, both are viewed through this struct so the field
// mapping is written once.
struct WebhookFields<'a> {
    name: &'a str,
    client_config: &'a v1::WebhookClientConfig,
    rules: &'a [v1::RuleWithOperations],
    failure_policy: Option<&'a v1::FailurePolicyType>,
    match_policy: Option<&'a v1::MatchPolicyType>,
    side_effects: Option<&'a v1::SideEffectClass>,
}

impl<'a> From<&'a v1::MutatingWebhook> for WebhookFields<'a> {
    fn from(webhook: &'a v1::MutatingWebhook) -> Self {
        WebhookFields {
            name: &webhook.name,
            client_config: &webhook.client_config,
            rules: &webhook.rules,
            failure_policy: webhook.failure_policy.as_ref(),
            match_policy: webhook.match_policy.as_ref(),
            side_effects: webhook.side_effects.as_ref(),
        }
    }
}

impl<'a> From<&'a v1::ValidatingWebhook> for WebhookFields<'a> {
    fn from(webhook: &'a v1::ValidatingWebhook) -> Self {
        WebhookFields {
            name: &webhook.name,
            client_config: &webhook.client_config,
            rules: &webhook.rules,
            failure_policy: webhook.failure_policy.as_ref(),
            match_policy: webhook.match_policy.as_ref(),
            side_effects: webhook.side_effects.as_ref(),
        }
    }
}

struct LegacyWebhookFields {
    name: String,
    client_config: v1beta1::WebhookClientConfig,
    rules: Vec<v1beta1::RuleWithOperations>,
    failure_policy: Option<v1beta1::FailurePolicyType>,
    match_policy: Option<v1beta1::MatchPolicyType>,
    side_effects: Option<v1beta1::SideEffectClass>,
}

impl From<WebhookFields<'_>> for LegacyWebhookFields {
    fn from(fields: WebhookFields<'_>) -> Self {
        LegacyWebhookFields {
            name: fields.name.to_string(),
            client_config: client_config(fields.client_config),
            rules: rules(fields.rules),
            failure_policy: failure_policy(fields.failure_policy),
            match_policy: match_policy(fields.match_policy),
            side_effects: side_effects(fields.side_effects),
        }
    }
}

impl LegacyWebhookFields {
    fn into_mutating(self) -> v1beta1::MutatingWebhook {
        v1beta1::MutatingWebhook {
            name: self.name,
            client_config: self.client_config,
            rules: self.rules,
            failure_policy: self.failure_policy,
            match_policy: self.match_policy,
            side_effects: self.side_effects,
        }
    }

    fn into_validating(self) -> v1beta1::ValidatingWebhook {
        v1beta1::ValidatingWebhook {
            name: self.name,
            client_config: self.client_config,
            rules: self.rules,
            failure_policy: self.failure_policy,
            match_policy: self.match_policy,
            side_effects: self.side_effects,
        }
    }
}
