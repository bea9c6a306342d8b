/// Opaque concurrency token carried by a persisted counter record.
///
/// The token changes on every successful write; a conditional write applies
/// only when the token it presents still matches the store's current one.
/// Generators never inspect the contents; document stores typically map this
/// onto an entity tag, SQL stores onto a row version column.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct VersionToken(String);

impl From<String> for VersionToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for VersionToken {
    fn from(token: &str) -> Self {
        Self(token.to_owned())
    }
}

/// The durable counter record for one scope: the single cross-process source
/// of truth reconciling concurrent batch reservations.
///
/// One logical record exists per scope. It is created on first access with a
/// configurable starting number (default 1), only ever updated through
/// conditional writes, and never deleted.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CounterState {
    /// Scope name, doubling as the record's partition/lookup key.
    pub scope: String,
    /// First number not yet reserved by any process, as last durably written.
    pub next_available: i64,
    /// Concurrency token observed when this state was read.
    pub version: VersionToken,
}

impl CounterState {
    /// Creates a counter state as read from (or about to be written to) the
    /// store.
    pub fn new(
        scope: impl Into<String>,
        next_available: i64,
        version: impl Into<VersionToken>,
    ) -> Self {
        Self {
            scope: scope.into(),
            next_available,
            version: version.into(),
        }
    }
}
