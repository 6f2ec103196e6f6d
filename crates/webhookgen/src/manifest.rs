//! Multi-document manifest streams.
//!
//! Every document is preceded by a `---` line, so a manifest always starts
//! with an empty chunk before the first separator.

use serde::{Serialize, de::DeserializeOwned};

use crate::errors::{ManifestError, ManifestResult};

pub const DOCUMENT_SEPARATOR: &str = "\n---\n";

/// Appends `document` to `manifest`, preceded by the document separator.
pub fn push_document<T: Serialize>(manifest: &mut String, document: &T) -> ManifestResult<()> {
    let yaml = serde_yaml::to_string(document)?;
    manifest.push_str(DOCUMENT_SEPARATOR);
    manifest.push_str(&yaml);
    Ok(())
}

/// Returns the documents of `manifest`, discarding whatever comes before
/// the first separator.
pub fn split_documents(manifest: &str) -> Vec<&str> {
    manifest.split(DOCUMENT_SEPARATOR).skip(1).collect()
}

/// Reads a manifest made of exactly one mutating webhook configuration
/// followed by one validating webhook configuration. Unknown fields are
/// rejected.
pub fn read_configurations<M, V>(manifest: &str) -> ManifestResult<(M, V)>
where
    M: DeserializeOwned,
    V: DeserializeOwned,
{
    let documents = split_documents(manifest);
    if documents.len() != 2 {
        return Err(ManifestError::DocumentCount {
            found: documents.len(),
        });
    }

    let mutating: M =
        serde_yaml::from_str(documents[0]).map_err(ManifestError::InvalidMutatingDocument)?;
    let validating: V =
        serde_yaml::from_str(documents[1]).map_err(ManifestError::InvalidValidatingDocument)?;

    Ok((mutating, validating))
}

#[cfg(test)]
mod tests {
    use super::*;
    use webhook_conversion::v1;

    const MANIFEST: &str = r#"
---
apiVersion: admissionregistration.k8s.io/v1
kind: MutatingWebhookConfiguration
metadata:
  name: mutating-webhook-configuration

---
apiVersion: admissionregistration.k8s.io/v1
kind: ValidatingWebhookConfiguration
metadata:
  name: validating-webhook-configuration
"#;

    #[test]
    fn leading_chunk_is_discarded() {
        let documents = split_documents("# generated\n---\na: 1\n---\nb: 2\n");
        assert_eq!(vec!["a: 1", "b: 2\n"], documents);
    }

    #[test]
    fn no_separator_means_no_documents() {
        assert!(split_documents("a: 1\n").is_empty());
    }

    #[test]
    fn read_mutating_then_validating() {
        let (mutating, validating): (
            v1::MutatingWebhookConfiguration,
            v1::ValidatingWebhookConfiguration,
        ) = read_configurations(MANIFEST).unwrap();

        assert_eq!(
            Some("mutating-webhook-configuration".to_string()),
            mutating.metadata.name
        );
        assert_eq!(
            Some("validating-webhook-configuration".to_string()),
            validating.metadata.name
        );
        assert!(mutating.webhooks.is_empty());
    }

    #[test]
    fn wrong_document_count() {
        let manifest = format!("{MANIFEST}{DOCUMENT_SEPARATOR}kind: Extra\n");

        let result = read_configurations::<
            v1::MutatingWebhookConfiguration,
            v1::ValidatingWebhookConfiguration,
        >(&manifest);

        assert!(matches!(result, Err(ManifestError::DocumentCount { found: 3 })));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let manifest = MANIFEST.replace(
            "kind: ValidatingWebhookConfiguration",
            "kind: ValidatingWebhookConfiguration\nlabels: {}",
        );

        let result = read_configurations::<
            v1::MutatingWebhookConfiguration,
            v1::ValidatingWebhookConfiguration,
        >(&manifest);

        assert!(matches!(
            result,
            Err(ManifestError::InvalidValidatingDocument(_))
        ));
    }

    #[test]
    fn pushed_documents_can_be_read_back() {
        let mut manifest = String::new();
        push_document(
            &mut manifest,
            &v1::MutatingWebhookConfiguration::new("mutating", vec![]),
        )
        .unwrap();
        push_document(
            &mut manifest,
            &v1::ValidatingWebhookConfiguration::new("validating", vec![]),
        )
        .unwrap();

        assert!(manifest.starts_with(DOCUMENT_SEPARATOR));
        let (mutating, validating): (
            v1::MutatingWebhookConfiguration,
            v1::ValidatingWebhookConfiguration,
        ) = read_configurations(&manifest).unwrap();
        assert_eq!(Some("mutating".to_string()), mutating.metadata.name);
        assert_eq!(Some("validating".to_string()), validating.metadata.name);
    }
}
