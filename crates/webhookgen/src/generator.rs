use std::{
    fmt, fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use tracing::{debug, info, warn};
use webhook_conversion::{conversion, v1};

use crate::errors::{GeneratorError, GeneratorResult, ManifestResult, SourceResult};
use crate::manifest::push_document;
use crate::source::WebhookSource;

pub const MUTATING_WEBHOOK_CONFIGURATION_NAME: &str = "mutating-webhook-configuration";
pub const VALIDATING_WEBHOOK_CONFIGURATION_NAME: &str = "validating-webhook-configuration";

/// `admissionregistration.k8s.io` versions manifests can be generated for.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum WebhookVersion {
    V1,
    V1Beta1,
}

impl WebhookVersion {
    pub const DEFAULT: WebhookVersion = WebhookVersion::V1;

    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookVersion::V1 => "v1",
            WebhookVersion::V1Beta1 => "v1beta1",
        }
    }

    /// The default version goes to `manifests.yaml`, every other one to
    /// `manifests.<version>.yaml`.
    pub fn manifest_file_name(&self) -> String {
        if *self == WebhookVersion::DEFAULT {
            String::from("manifests.yaml")
        } else {
            format!("manifests.{}.yaml", self.as_str())
        }
    }
}

impl FromStr for WebhookVersion {
    type Err = GeneratorError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "v1" => Ok(WebhookVersion::V1),
            "v1beta1" => Ok(WebhookVersion::V1Beta1),
            _ => Err(GeneratorError::UnsupportedWebhookVersion(value.to_string())),
        }
    }
}

impl fmt::Display for WebhookVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `v1` configurations described by a webhook source. All the other
/// versions are derived from these.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookConfigurations {
    pub mutating: v1::MutatingWebhookConfiguration,
    pub validating: v1::ValidatingWebhookConfiguration,
}

impl WebhookConfigurations {
    pub fn from_source(source: &WebhookSource) -> SourceResult<WebhookConfigurations> {
        Ok(WebhookConfigurations {
            mutating: v1::MutatingWebhookConfiguration::new(
                MUTATING_WEBHOOK_CONFIGURATION_NAME,
                source.mutating_webhooks()?,
            ),
            validating: v1::ValidatingWebhookConfiguration::new(
                VALIDATING_WEBHOOK_CONFIGURATION_NAME,
                source.validating_webhooks()?,
            ),
        })
    }

    /// Renders the configurations as a manifest of the given version,
    /// mutating configuration first. Configurations without webhooks are
    /// left out.
    pub fn render(&self, version: WebhookVersion) -> ManifestResult<String> {
        let mut manifest = String::new();

        if self.mutating.webhooks.is_empty() {
            warn!(
                version = version.as_str(),
                "no mutating webhooks, skipping the mutating webhook configuration"
            );
        } else {
            match version {
                WebhookVersion::V1 => push_document(&mut manifest, &self.mutating)?,
                WebhookVersion::V1Beta1 => {
                    let converted = conversion::mutating_webhook_configuration(&self.mutating);
                    debug!(
                        webhooks = converted.webhooks.len(),
                        "converted mutating webhook configuration to v1beta1"
                    );
                    push_document(&mut manifest, &converted)?
                }
            }
        }

        if self.validating.webhooks.is_empty() {
            warn!(
                version = version.as_str(),
                "no validating webhooks, skipping the validating webhook configuration"
            );
        } else {
            match version {
                WebhookVersion::V1 => push_document(&mut manifest, &self.validating)?,
                WebhookVersion::V1Beta1 => {
                    let converted =
                        conversion::validating_webhook_configuration(&self.validating);
                    debug!(
                        webhooks = converted.webhooks.len(),
                        "converted validating webhook configuration to v1beta1"
                    );
                    push_document(&mut manifest, &converted)?
                }
            }
        }

        Ok(manifest)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generator {
    webhook_versions: Vec<WebhookVersion>,
}

impl Default for Generator {
    fn default() -> Self {
        Generator {
            webhook_versions: vec![WebhookVersion::DEFAULT],
        }
    }
}

impl Generator {
    /// Creates a generator for the given versions. Duplicates are ignored,
    /// no versions means the default one.
    pub fn new<S: AsRef<str>>(webhook_versions: &[S]) -> GeneratorResult<Generator> {
        let mut versions: Vec<WebhookVersion> = Vec::with_capacity(webhook_versions.len());
        for version in webhook_versions {
            let version: WebhookVersion = version.as_ref().parse()?;
            if !versions.contains(&version) {
                versions.push(version);
            }
        }

        if versions.is_empty() {
            return Ok(Generator::default());
        }
        Ok(Generator {
            webhook_versions: versions,
        })
    }

    pub fn webhook_versions(&self) -> &[WebhookVersion] {
        &self.webhook_versions
    }

    /// Renders one manifest per requested version, in request order.
    pub fn render(&self, source: &WebhookSource) -> GeneratorResult<Vec<(WebhookVersion, String)>> {
        let configurations = WebhookConfigurations::from_source(source)?;

        self.webhook_versions
            .iter()
            .map(|version| -> GeneratorResult<(WebhookVersion, String)> {
                Ok((*version, configurations.render(*version)?))
            })
            .collect()
    }

    /// Writes the manifests of every requested version into `output_dir`,
    /// returning the paths of the written files.
    pub fn generate(
        &self,
        source: &WebhookSource,
        output_dir: &Path,
    ) -> GeneratorResult<Vec<PathBuf>> {
        let manifests = self.render(source)?;

        fs::create_dir_all(output_dir).map_err(|e| {
            GeneratorError::CannotCreateOutputDir(output_dir.display().to_string(), e)
        })?;

        let mut written = Vec::with_capacity(manifests.len());
        for (version, manifest) in manifests {
            let path = output_dir.join(version.manifest_file_name());
            fs::write(&path, manifest).map_err(|e| {
                GeneratorError::CannotWriteManifest(path.display().to_string(), e)
            })?;
            info!(
                version = version.as_str(),
                path = %path.display(),
                "webhook manifest written"
            );
            written.push(path);
        }

        Ok(written)
    }
}
