//! The `admissionregistration.k8s.io/v1` webhook configuration schema.
//!
//! This is the canonical model: generators build these values and derive any
//! other served version from them.

use std::fmt;

use k8s_openapi::ByteString;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use serde::{Deserialize, Serialize};

use crate::constants::{
    ADMISSIONREGISTRATION_V1, MUTATING_WEBHOOK_CONFIGURATION_KIND,
    VALIDATING_WEBHOOK_CONFIGURATION_KIND,
};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MutatingWebhookConfiguration {
    pub api_version: String,
    pub kind: String,
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub webhooks: Vec<MutatingWebhook>,
}

impl MutatingWebhookConfiguration {
    pub fn new(name: impl Into<String>, webhooks: Vec<MutatingWebhook>) -> Self {
        MutatingWebhookConfiguration {
            api_version: ADMISSIONREGISTRATION_V1.to_string(),
            kind: MUTATING_WEBHOOK_CONFIGURATION_KIND.to_string(),
            metadata: ObjectMeta {
                name: Some(name.into()),
                ..Default::default()
            },
            webhooks,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ValidatingWebhookConfiguration {
    pub api_version: String,
    pub kind: String,
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub webhooks: Vec<ValidatingWebhook>,
}

impl ValidatingWebhookConfiguration {
    pub fn new(name: impl Into<String>, webhooks: Vec<ValidatingWebhook>) -> Self {
        ValidatingWebhookConfiguration {
            api_version: ADMISSIONREGISTRATION_V1.to_string(),
            kind: VALIDATING_WEBHOOK_CONFIGURATION_KIND.to_string(),
            metadata: ObjectMeta {
                name: Some(name.into()),
                ..Default::default()
            },
            webhooks,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MutatingWebhook {
    pub name: String,
    pub client_config: WebhookClientConfig,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<RuleWithOperations>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_policy: Option<FailurePolicyType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_policy: Option<MatchPolicyType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side_effects: Option<SideEffectClass>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub admission_review_versions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace_selector: Option<LabelSelector>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_selector: Option<LabelSelector>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub match_conditions: Vec<MatchCondition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reinvocation_policy: Option<ReinvocationPolicyType>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ValidatingWebhook {
    pub name: String,
    pub client_config: WebhookClientConfig,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<RuleWithOperations>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_policy: Option<FailurePolicyType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_policy: Option<MatchPolicyType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side_effects: Option<SideEffectClass>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub admission_review_versions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace_selector: Option<LabelSelector>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_selector: Option<LabelSelector>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub match_conditions: Vec<MatchCondition>,
}

/// How the API server reaches the webhook. Exactly one of `url` and
/// `service` is expected to be set.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WebhookClientConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<ServiceReference>,
    /// PEM encoded CA bundle, base64 encoded on the wire.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_bundle: Option<ByteString>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ServiceReference {
    pub name: String,
    pub namespace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<i32>,
}

/// A CEL expression an admission request must satisfy to be sent to the
/// webhook.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MatchCondition {
    pub name: String,
    pub expression: String,
}

/// A rule together with the operations it matches. The rule fields are
/// inlined, as they are on the wire.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RuleWithOperations {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub operations: Vec<OperationType>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub api_groups: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub api_versions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<String>,
    /// `Cluster`, `Namespaced` or `*`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum FailurePolicyType {
    Ignore,
    Fail,
}

impl FailurePolicyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailurePolicyType::Ignore => "Ignore",
            FailurePolicyType::Fail => "Fail",
        }
    }
}

impl fmt::Display for FailurePolicyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum MatchPolicyType {
    Exact,
    Equivalent,
}

impl MatchPolicyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchPolicyType::Exact => "Exact",
            MatchPolicyType::Equivalent => "Equivalent",
        }
    }
}

impl fmt::Display for MatchPolicyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum SideEffectClass {
    Unknown,
    None,
    Some,
    NoneOnDryRun,
}

impl SideEffectClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            SideEffectClass::Unknown => "Unknown",
            SideEffectClass::None => "None",
            SideEffectClass::Some => "Some",
            SideEffectClass::NoneOnDryRun => "NoneOnDryRun",
        }
    }
}

impl fmt::Display for SideEffectClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum ReinvocationPolicyType {
    Never,
    IfNeeded,
}

impl ReinvocationPolicyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReinvocationPolicyType::Never => "Never",
            ReinvocationPolicyType::IfNeeded => "IfNeeded",
        }
    }
}

impl fmt::Display for ReinvocationPolicyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum OperationType {
    #[serde(rename = "*")]
    All,
    #[serde(rename = "CREATE")]
    Create,
    #[serde(rename = "UPDATE")]
    Update,
    #[serde(rename = "DELETE")]
    Delete,
    #[serde(rename = "CONNECT")]
    Connect,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::All => "*",
            OperationType::Create => "CREATE",
            OperationType::Update => "UPDATE",
            OperationType::Delete => "DELETE",
            OperationType::Connect => "CONNECT",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
