use std::borrow::Cow;
use std::fmt;

use http::StatusCode;

/// Failure raised by a request handler
///
/// Implemented by each application's error type. The exception handler
/// resolves a fault into a `RestError` by looking up its [`FaultKind`],
/// keeping application errors decoupled from response rendering.
pub trait Fault: std::error::Error + Send + Sync + 'static {
    /// Classification used to look up configured mappings
    fn kind(&self) -> FaultKind;

    /// Status carried by the fault itself
    ///
    /// Consulted only when no configured mapping matches the kind.
    fn status(&self) -> Option<StatusCode> {
        None
    }
}

/// Dotted classification of a fault, most general segment first
///
/// `resource.not_found.user` descends from `resource.not_found`, which in
/// turn descends from `resource`. Walking [`FaultKind::lineage`] visits the
/// kind itself first and its most general ancestor last.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FaultKind(Cow<'static, str>);

impl FaultKind {
    /// Create a kind from a static string
    pub const fn from_static(kind: &'static str) -> Self {
        Self(Cow::Borrowed(kind))
    }

    /// Create a kind, stripping leading and trailing dots
    pub fn new(kind: impl Into<Cow<'static, str>>) -> Self {
        let kind = kind.into();
        let trimmed = kind.trim_matches('.');

        if trimmed.len() == kind.len() {
            Self(kind)
        } else {
            Self(Cow::Owned(trimmed.to_owned()))
        }
    }

    /// The dotted kind string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the kind carries no classification at all
    pub fn is_empty(&self) -> bool {
        self.0.trim_matches('.').is_empty()
    }

    /// Iterate from this kind to its most general ancestor
    pub fn lineage(&self) -> Lineage<'_> {
        let kind = self.0.trim_matches('.');
        Lineage {
            remaining: (!kind.is_empty()).then_some(kind),
        }
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for FaultKind {
    fn from(kind: &'static str) -> Self {
        Self::new(kind)
    }
}

impl From<String> for FaultKind {
    fn from(kind: String) -> Self {
        Self::new(kind)
    }
}

/// Iterator over a kind and its ancestors, most specific first
#[derive(Debug, Clone)]
pub struct Lineage<'a> {
    remaining: Option<&'a str>,
}

impl<'a> Iterator for Lineage<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.remaining?;
        self.remaining = current
            .rfind('.')
            .map(|idx| current[..idx].trim_end_matches('.'))
            .filter(|parent| !parent.is_empty());
        Some(current)
    }
}

/// Fault built from a kind and message at the call site
///
/// Useful when a dedicated error enum would be overkill, and for tooling
/// that previews how a configured kind renders.
#[derive(Debug, Clone)]
pub struct SimpleFault {
    kind: FaultKind,
    message: String,
    status: Option<StatusCode>,
}

impl SimpleFault {
    /// Create a fault of the given kind
    pub fn new(kind: impl Into<FaultKind>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            status: None,
        }
    }

    /// Attach a status carried by the fault itself
    #[must_use]
    pub const fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }
}

impl fmt::Display for SimpleFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for SimpleFault {}

impl Fault for SimpleFault {
    fn kind(&self) -> FaultKind {
        self.kind.clone()
    }

    fn status(&self) -> Option<StatusCode> {
        self.status
    }
}
