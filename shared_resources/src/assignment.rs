use std::fmt;

/// A scheduling decision waiting to be committed to the backend.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub request_id: String,
    pub carrier_id: String,
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.request_id, self.carrier_id)
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UnserviceableReason {
    /// No carrier's service range contains both the start and end floor.
    NoCarrierInRange,
    /// Carriers cover the trip, but none of them answered with usable telemetry.
    TelemetryUnavailable,
}

impl fmt::Display for UnserviceableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnserviceableReason::NoCarrierInRange => f.write_str("no carrier serves both floors"),
            UnserviceableReason::TelemetryUnavailable => {
                f.write_str("no telemetry from any eligible carrier")
            }
        }
    }
}

/// Recorded whenever a request leaves the pipeline without an assignment.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UnservicedRequest {
    pub request_id: String,
    pub start_floor: i32,
    pub end_floor: i32,
    pub reason: UnserviceableReason,
}
