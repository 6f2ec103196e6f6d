use std::{fs, path::Path, str::FromStr};

use k8s_openapi::ByteString;
use serde::Deserialize;
use webhook_conversion::v1;

use crate::errors::{SourceError, SourceResult};

pub const WEBHOOK_SERVICE_NAME: &str = "webhook-service";
pub const WEBHOOK_SERVICE_NAMESPACE: &str = "system";

/// The webhooks a project serves, as written by its developers.
///
/// This is how a source file looks like:
/// ```yaml
/// webhooks:
///   - name: default.deployment.example.com
///     path: /mutate-apps-v1-deployment
///     mutating: true
///     failurePolicy: fail
///     sideEffects: None
///     groups: ["apps"]
///     versions: ["v1"]
///     resources: ["deployments"]
///     verbs: ["create", "update"]
/// ```
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WebhookSource {
    #[serde(default)]
    pub webhooks: Vec<WebhookDefinition>,
}

impl WebhookSource {
    pub fn from_path(path: &Path) -> SourceResult<WebhookSource> {
        let contents = fs::read_to_string(path).map_err(|e| {
            SourceError::CannotReadSourceFile(path.display().to_string(), e)
        })?;
        contents.parse()
    }

    pub fn mutating_webhooks(&self) -> SourceResult<Vec<v1::MutatingWebhook>> {
        self.webhooks
            .iter()
            .filter(|definition| definition.mutating)
            .map(WebhookDefinition::to_mutating_webhook)
            .collect()
    }

    pub fn validating_webhooks(&self) -> SourceResult<Vec<v1::ValidatingWebhook>> {
        self.webhooks
            .iter()
            .filter(|definition| !definition.mutating)
            .map(WebhookDefinition::to_validating_webhook)
            .collect()
    }
}

impl FromStr for WebhookSource {
    type Err = SourceError;

    fn from_str(contents: &str) -> SourceResult<Self> {
        Ok(serde_yaml::from_str(contents)?)
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WebhookDefinition {
    pub name: String,
    /// Path of the webhook endpoint inside of the webhook service
    pub path: String,
    #[serde(default)]
    pub mutating: bool,
    #[serde(default = "default_failure_policy")]
    pub failure_policy: String,
    #[serde(default)]
    pub match_policy: Option<String>,
    #[serde(default)]
    pub side_effects: Option<String>,
    /// API groups, `core` is the legacy core group
    #[serde(default)]
    pub groups: Vec<String>,
    #[serde(default)]
    pub versions: Vec<String>,
    #[serde(default)]
    pub resources: Vec<String>,
    #[serde(default)]
    pub verbs: Vec<String>,
    #[serde(default = "default_admission_review_versions")]
    pub admission_review_versions: Vec<String>,
    #[serde(default)]
    pub ca_bundle: Option<ByteString>,
}

fn default_failure_policy() -> String {
    String::from("fail")
}

fn default_admission_review_versions() -> Vec<String> {
    vec![String::from("v1beta1")]
}

impl WebhookDefinition {
    pub fn to_mutating_webhook(&self) -> SourceResult<v1::MutatingWebhook> {
        Ok(v1::MutatingWebhook {
            name: self.name.clone(),
            client_config: self.client_config(),
            rules: self.rules()?,
            failure_policy: self.failure_policy()?,
            match_policy: self.match_policy()?,
            side_effects: self.side_effects()?,
            admission_review_versions: self.admission_review_versions.clone(),
            ..Default::default()
        })
    }

    pub fn to_validating_webhook(&self) -> SourceResult<v1::ValidatingWebhook> {
        Ok(v1::ValidatingWebhook {
            name: self.name.clone(),
            client_config: self.client_config(),
            rules: self.rules()?,
            failure_policy: self.failure_policy()?,
            match_policy: self.match_policy()?,
            side_effects: self.side_effects()?,
            admission_review_versions: self.admission_review_versions.clone(),
            ..Default::default()
        })
    }

    // Webhooks are always served by the project's webhook service
    fn client_config(&self) -> v1::WebhookClientConfig {
        v1::WebhookClientConfig {
            url: None,
            service: Some(v1::ServiceReference {
                name: WEBHOOK_SERVICE_NAME.to_string(),
                namespace: WEBHOOK_SERVICE_NAMESPACE.to_string(),
                path: Some(self.path.clone()),
                port: None,
            }),
            ca_bundle: self.ca_bundle.clone(),
        }
    }

    fn rules(&self) -> SourceResult<Vec<v1::RuleWithOperations>> {
        let operations = self
            .verbs
            .iter()
            .map(|verb| self.operation(verb))
            .collect::<SourceResult<Vec<v1::OperationType>>>()?;

        let api_groups = self
            .groups
            .iter()
            .map(|group| match group.as_str() {
                "core" => String::new(),
                _ => group.clone(),
            })
            .collect();

        Ok(vec![v1::RuleWithOperations {
            operations,
            api_groups,
            api_versions: self.versions.clone(),
            resources: self.resources.clone(),
            scope: None,
        }])
    }

    fn operation(&self, verb: &str) -> SourceResult<v1::OperationType> {
        match verb.to_ascii_lowercase().as_str() {
            "create" => Ok(v1::OperationType::Create),
            "update" => Ok(v1::OperationType::Update),
            "delete" => Ok(v1::OperationType::Delete),
            "connect" => Ok(v1::OperationType::Connect),
            "*" => Ok(v1::OperationType::All),
            _ => Err(SourceError::UnknownVerb {
                webhook: self.name.clone(),
                value: verb.to_string(),
            }),
        }
    }

    fn failure_policy(&self) -> SourceResult<Option<v1::FailurePolicyType>> {
        match self.failure_policy.to_ascii_lowercase().as_str() {
            "fail" => Ok(Some(v1::FailurePolicyType::Fail)),
            "ignore" => Ok(Some(v1::FailurePolicyType::Ignore)),
            _ => Err(SourceError::UnknownFailurePolicy {
                webhook: self.name.clone(),
                value: self.failure_policy.clone(),
            }),
        }
    }

    fn match_policy(&self) -> SourceResult<Option<v1::MatchPolicyType>> {
        let Some(policy) = &self.match_policy else {
            return Ok(None);
        };
        match policy.to_ascii_lowercase().as_str() {
            "exact" => Ok(Some(v1::MatchPolicyType::Exact)),
            "equivalent" => Ok(Some(v1::MatchPolicyType::Equivalent)),
            _ => Err(SourceError::UnknownMatchPolicy {
                webhook: self.name.clone(),
                value: policy.clone(),
            }),
        }
    }

    fn side_effects(&self) -> SourceResult<Option<v1::SideEffectClass>> {
        let Some(side_effects) = &self.side_effects else {
            return Ok(None);
        };
        match side_effects.to_ascii_lowercase().as_str() {
            "none" => Ok(Some(v1::SideEffectClass::None)),
            "noneondryrun" => Ok(Some(v1::SideEffectClass::NoneOnDryRun)),
            "some" => Ok(Some(v1::SideEffectClass::Some)),
            "unknown" => Ok(Some(v1::SideEffectClass::Unknown)),
            _ => Err(SourceError::UnknownSideEffects {
                webhook: self.name.clone(),
                value: side_effects.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    fn definition(name: &str) -> WebhookDefinition {
        WebhookDefinition {
            name: name.to_string(),
            path: "/validate".to_string(),
            mutating: false,
            failure_policy: default_failure_policy(),
            match_policy: None,
            side_effects: None,
            groups: vec!["apps".to_string()],
            versions: vec!["v1".to_string()],
            resources: vec!["deployments".to_string()],
            verbs: vec!["create".to_string()],
            admission_review_versions: default_admission_review_versions(),
            ca_bundle: None,
        }
    }

    #[test]
    fn parse_source_with_defaults() {
        let source: WebhookSource = r#"
webhooks:
  - name: validate.example.com
    path: /validate
"#
        .parse()
        .unwrap();

        assert_eq!(1, source.webhooks.len());
        let webhook = &source.webhooks[0];
        assert!(!webhook.mutating);
        assert_eq!("fail", webhook.failure_policy);
        assert_eq!(vec!["v1beta1".to_string()], webhook.admission_review_versions);
        assert!(webhook.match_policy.is_none());
        assert!(webhook.side_effects.is_none());
    }

    #[test]
    fn unknown_source_fields_are_rejected() {
        let result = r#"
webhooks:
  - name: validate.example.com
    path: /validate
    timeoutSeconds: 10
"#
        .parse::<WebhookSource>();

        assert!(matches!(result, Err(SourceError::InvalidSource(_))));
    }

    #[test]
    fn webhooks_are_split_by_kind_keeping_order() {
        let mut first = definition("first.example.com");
        first.mutating = true;
        let second = definition("second.example.com");
        let mut third = definition("third.example.com");
        third.mutating = true;
        let source = WebhookSource {
            webhooks: vec![first, second, third],
        };

        let mutating: Vec<String> = source
            .mutating_webhooks()
            .unwrap()
            .into_iter()
            .map(|w| w.name)
            .collect();
        let validating: Vec<String> = source
            .validating_webhooks()
            .unwrap()
            .into_iter()
            .map(|w| w.name)
            .collect();

        assert_eq!(vec!["first.example.com", "third.example.com"], mutating);
        assert_eq!(vec!["second.example.com"], validating);
    }

    #[test]
    fn client_config_targets_the_webhook_service() {
        let webhook = definition("validate.example.com")
            .to_validating_webhook()
            .unwrap();

        let service = webhook.client_config.service.unwrap();
        assert_eq!(WEBHOOK_SERVICE_NAME, service.name);
        assert_eq!(WEBHOOK_SERVICE_NAMESPACE, service.namespace);
        assert_eq!(Some("/validate".to_string()), service.path);
        assert!(webhook.client_config.url.is_none());
    }

    #[test]
    fn core_group_is_the_empty_group() {
        let mut definition = definition("validate.example.com");
        definition.groups = vec!["core".to_string(), "apps".to_string()];

        let webhook = definition.to_validating_webhook().unwrap();

        assert_eq!(
            vec!["".to_string(), "apps".to_string()],
            webhook.rules[0].api_groups
        );
    }

    #[rstest]
    #[case::lowercase(vec!["create", "update", "delete", "connect"], vec![
        v1::OperationType::Create,
        v1::OperationType::Update,
        v1::OperationType::Delete,
        v1::OperationType::Connect,
    ])]
    #[case::uppercase(vec!["CREATE", "Update"], vec![v1::OperationType::Create, v1::OperationType::Update])]
    #[case::all(vec!["*"], vec![v1::OperationType::All])]
    fn verbs_to_operations(#[case] verbs: Vec<&str>, #[case] expected: Vec<v1::OperationType>) {
        let mut definition = definition("validate.example.com");
        definition.verbs = verbs.into_iter().map(String::from).collect();

        let webhook = definition.to_validating_webhook().unwrap();

        assert_eq!(expected, webhook.rules[0].operations);
    }

    #[test]
    fn unknown_verb() {
        let mut definition = definition("validate.example.com");
        definition.verbs = vec!["patch".to_string()];

        let err = definition.to_validating_webhook().unwrap_err();

        assert!(matches!(
            err,
            SourceError::UnknownVerb { ref webhook, ref value }
                if webhook == "validate.example.com" && value == "patch"
        ));
    }

    #[rstest]
    #[case::fail("fail", Some(v1::FailurePolicyType::Fail))]
    #[case::fail_capitalized("Fail", Some(v1::FailurePolicyType::Fail))]
    #[case::ignore("IGNORE", Some(v1::FailurePolicyType::Ignore))]
    fn failure_policies(#[case] value: &str, #[case] expected: Option<v1::FailurePolicyType>) {
        let mut definition = definition("validate.example.com");
        definition.failure_policy = value.to_string();

        let webhook = definition.to_mutating_webhook().unwrap();

        assert_eq!(expected, webhook.failure_policy);
    }

    #[rstest]
    #[case::unset(None, None)]
    #[case::exact(Some("exact"), Some(v1::MatchPolicyType::Exact))]
    #[case::equivalent(Some("Equivalent"), Some(v1::MatchPolicyType::Equivalent))]
    fn match_policies(#[case] value: Option<&str>, #[case] expected: Option<v1::MatchPolicyType>) {
        let mut definition = definition("validate.example.com");
        definition.match_policy = value.map(String::from);

        let webhook = definition.to_validating_webhook().unwrap();

        assert_eq!(expected, webhook.match_policy);
    }

    #[rstest]
    #[case::unset(None, None)]
    #[case::none(Some("None"), Some(v1::SideEffectClass::None))]
    #[case::none_on_dry_run(Some("NoneOnDryRun"), Some(v1::SideEffectClass::NoneOnDryRun))]
    #[case::some(Some("some"), Some(v1::SideEffectClass::Some))]
    #[case::unknown(Some("Unknown"), Some(v1::SideEffectClass::Unknown))]
    fn side_effect_classes(
        #[case] value: Option<&str>,
        #[case] expected: Option<v1::SideEffectClass>,
    ) {
        let mut definition = definition("validate.example.com");
        definition.side_effects = value.map(String::from);

        let webhook = definition.to_validating_webhook().unwrap();

        assert_eq!(expected, webhook.side_effects);
    }

    #[rstest]
    #[case::failure_policy("failurePolicy: never", "unknown failure policy \"never\"")]
    #[case::match_policy("matchPolicy: fuzzy", "unknown match policy \"fuzzy\"")]
    #[case::side_effects("sideEffects: maybe", "unknown side effects \"maybe\"")]
    fn unknown_enum_values(#[case] field: &str, #[case] expected_message: &str) {
        let source: WebhookSource = format!(
            "webhooks:\n  - name: validate.example.com\n    path: /validate\n    {field}\n"
        )
        .parse()
        .unwrap();

        let err = source.validating_webhooks().unwrap_err();

        assert!(err.to_string().contains("validate.example.com"));
        assert!(err.to_string().contains(expected_message));
    }
}
