//! The legacy `admissionregistration.k8s.io/v1beta1` webhook configuration
//! schema.
//!
//! Types mirror [`super::v1`] but are nominally distinct. Values are built
//! by [`crate::conversion`] and never hand-written by generators.

use std::fmt;

use k8s_openapi::ByteString;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::{Deserialize, Serialize};

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
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WebhookClientConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<ServiceReference>,
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
}

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
