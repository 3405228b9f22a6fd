//! Application Constants
//!
//! Centralized location for fixed numbers and user-facing strings.
//! All magic numbers should be defined here with documentation.

/// HTTP/Network constants
pub mod network {
    /// Per-attempt request timeout (seconds)
    pub const REQUEST_TIMEOUT_SECS: u64 = 10;

    /// Default service base address
    pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

    /// Environment variable allowed to override the base address
    pub const BASE_URL_ENV: &str = "HITLENS_API_URL";
}

/// Retry policy constants
pub mod retry {
    /// Maximum total attempts per request (first try included)
    pub const MAX_ATTEMPTS: usize = 3;

    /// Base delay for exponential backoff (milliseconds)
    pub const BASE_DELAY_MS: u64 = 1000;

    /// Backoff multiplier
    pub const BACKOFF_FACTOR: f32 = 2.0;
}

/// Service endpoint paths, relative to the base address
pub mod endpoints {
    pub const PREDICT: &str = "/predict";
    pub const SIMILAR: &str = "/similar";
    pub const EDA_DATA: &str = "/eda-data";
    pub const HEALTH: &str = "/health";
}

/// Workflow constants
pub mod workflow {
    /// Default number of similar tracks requested after a prediction
    pub const DEFAULT_RECOMMENDATIONS: usize = 5;

    /// Smallest recommendation count the service honours
    pub const MIN_RECOMMENDATIONS: usize = 3;

    /// Largest recommendation count the service honours
    pub const MAX_RECOMMENDATIONS: usize = 10;

    /// Allowed deviation of `hit + miss` from 1.0
    pub const PROBABILITY_TOLERANCE: f64 = 1e-6;
}

/// User-facing messages. These are the only strings a failed request may surface.
pub mod messages {
    pub const INCOMPLETE_SUBMISSION: &str = "Please fill in all required fields";

    pub const GENERIC_RESPONSE_ERROR: &str = "An error occurred";

    pub const NETWORK_ERROR: &str =
        "Network error: Unable to reach the server. Please check your connection.";

    pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred";
}
