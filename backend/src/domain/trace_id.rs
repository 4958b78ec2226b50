//! Request-scoped trace identifier correlating relay logs and error payloads.
//!
//! The identifier lives in Tokio task-local storage for the lifetime of one
//! request, so the forwarder, the error envelope and log events can read it
//! without threading it through every call. Task locals do not follow
//! `tokio::spawn`; wrap spawned work in [`TraceId::scope`] to carry it along.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

task_local! {
    static CURRENT: TraceId;
}

/// Correlation identifier assigned to each relayed request.
///
/// # Examples
/// ```
/// use point_relay::domain::TraceId;
///
/// let id: TraceId = "6f1c3a52-4d7e-4bb1-9a55-2f0b9c1d0e77".parse().expect("uuid");
/// assert_eq!(id.to_string(), "6f1c3a52-4d7e-4bb1-9a55-2f0b9c1d0e77");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Mint a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Adopt a caller-supplied identifier, ignoring blank or non-UUID input.
    ///
    /// # Examples
    /// ```
    /// use point_relay::domain::TraceId;
    ///
    /// assert!(TraceId::from_inbound(" 00000000-0000-0000-0000-000000000001 ").is_some());
    /// assert!(TraceId::from_inbound("not-a-uuid").is_none());
    /// assert!(TraceId::from_inbound("00000000-0000-0000-0000-000000000000").is_none());
    /// ```
    #[must_use]
    pub fn from_inbound(raw: &str) -> Option<Self> {
        raw.trim()
            .parse::<Self>()
            .ok()
            .filter(|id| !id.0.is_nil())
    }

    /// Identifier of the request currently being handled, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    /// Borrow the inner UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Run `fut` with `trace_id` installed as the current identifier.
    ///
    /// # Examples
    /// ```
    /// use point_relay::domain::TraceId;
    ///
    /// # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
    /// let id = TraceId::generate();
    /// assert_eq!(TraceId::scope(id, async { TraceId::current() }).await, Some(id));
    /// # });
    /// ```
    pub async fn scope<Fut>(trace_id: Self, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        CURRENT.scope(trace_id, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}
