use serde::Deserialize;
use webhook_conversion::constants::{
    MUTATING_WEBHOOK_CONFIGURATION_KIND, VALIDATING_WEBHOOK_CONFIGURATION_KIND,
};
use webhook_conversion::{conversion, v1};

use crate::errors::{ManifestError, ManifestResult};
use crate::manifest::{push_document, split_documents};

// Only `kind` is looked at, everything else is left to the strict
// deserialization of the matching configuration type.
#[derive(Deserialize)]
struct DocumentKind {
    #[serde(default)]
    kind: String,
}

/// Converts a `v1` manifest into the equivalent `v1beta1` manifest.
///
/// The manifest can hold any number of mutating and validating webhook
/// configurations, in any order. Documents are converted in place, so the
/// output keeps the input order.
pub fn downgrade_manifest(manifest: &str) -> ManifestResult<String> {
    let documents = split_documents(manifest);
    if documents.is_empty() {
        return Err(ManifestError::NoDocuments);
    }

    let mut downgraded = String::new();
    for (index, document) in documents.into_iter().enumerate() {
        let position = index + 1;
        let DocumentKind { kind } = serde_yaml::from_str(document)
            .map_err(|source| ManifestError::InvalidDocument { position, source })?;

        match kind.as_str() {
            MUTATING_WEBHOOK_CONFIGURATION_KIND => {
                let config: v1::MutatingWebhookConfiguration = serde_yaml::from_str(document)
                    .map_err(ManifestError::InvalidMutatingDocument)?;
                push_document(
                    &mut downgraded,
                    &conversion::mutating_webhook_configuration(&config),
                )?;
            }
            VALIDATING_WEBHOOK_CONFIGURATION_KIND => {
                let config: v1::ValidatingWebhookConfiguration = serde_yaml::from_str(document)
                    .map_err(ManifestError::InvalidValidatingDocument)?;
                push_document(
                    &mut downgraded,
                    &conversion::validating_webhook_configuration(&config),
                )?;
            }
            other => {
                return Err(ManifestError::UnsupportedKind {
                    position,
                    kind: other.to_string(),
                });
            }
        }
    }

    Ok(downgraded)
}
