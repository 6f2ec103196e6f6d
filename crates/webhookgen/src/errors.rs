use thiserror::Error;

pub type SourceResult<T> = std::result::Result<T, SourceError>;
pub type ManifestResult<T> = std::result::Result<T, ManifestError>;
pub type GeneratorResult<T> = std::result::Result<T, GeneratorError>;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("cannot read webhook source {0}: {1}")]
    CannotReadSourceFile(String, #[source] std::io::Error),
    #[error("cannot parse webhook source: {0}")]
    InvalidSource(#[from] serde_yaml::Error),
    #[error("webhook {webhook}: unknown failure policy \"{value}\", must be one of: fail, ignore")]
    UnknownFailurePolicy { webhook: String, value: String },
    #[error("webhook {webhook}: unknown match policy \"{value}\", must be one of: exact, equivalent")]
    UnknownMatchPolicy { webhook: String, value: String },
    #[error(
        "webhook {webhook}: unknown side effects \"{value}\", must be one of: none, noneondryrun, some, unknown"
    )]
    UnknownSideEffects { webhook: String, value: String },
    #[error("webhook {webhook}: unknown verb \"{value}\", must be one of: create, update, delete, connect, *")]
    UnknownVerb { webhook: String, value: String },
}

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("expected two documents in manifest, found {found}")]
    DocumentCount { found: usize },
    #[error("manifest has no documents")]
    NoDocuments,
    #[error("document {position}: cannot read resource kind: {source}")]
    InvalidDocument {
        position: usize,
        #[source]
        source: serde_yaml::Error,
    },
    #[error(
        "document {position}: unsupported kind \"{kind}\", must be one of: MutatingWebhookConfiguration, ValidatingWebhookConfiguration"
    )]
    UnsupportedKind { position: usize, kind: String },
    #[error("invalid mutating webhook configuration: {0}")]
    InvalidMutatingDocument(#[source] serde_yaml::Error),
    #[error("invalid validating webhook configuration: {0}")]
    InvalidValidatingDocument(#[source] serde_yaml::Error),
    #[error("cannot serialize manifest document: {0}")]
    CannotSerializeDocument(#[from] serde_yaml::Error),
}

#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("unsupported webhook version \"{0}\", must be one of: v1, v1beta1")]
    UnsupportedWebhookVersion(String),
    #[error("cannot create output directory {0}: {1}")]
    CannotCreateOutputDir(String, #[source] std::io::Error),
    #[error("cannot write manifest {0}: {1}")]
    CannotWriteManifest(String, #[source] std::io::Error),
    #[error(transparent)]
    SourceError(#[from] SourceError),
    #[error(transparent)]
    ManifestError(#[from] ManifestError),
}
