use serde::Serialize;

/// Queue a request asks for on the load balancer.
///
/// Travels as an HTTP header, never inside the JSON-RPC payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Low,
}

impl Priority {
    #[must_use]
    pub const fn from_flag(is_high: bool) -> Self {
        if is_high { Self::High } else { Self::Low }
    }

    /// Header value sent on the wire.
    #[must_use]
    pub const fn header_value(self) -> &'static str {
        match self {
            Self::High => "true",
            Self::Low => "false",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Low => "low",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
