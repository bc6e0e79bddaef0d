use crate::id::MemberId;

/// Everything that can abort a simulation run.
///
/// There are no retries: any of these ends the run it came from.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// A city was expected to have an ambassador (local events, retreats)
    /// but none was found. Means the promotion phase did not run or broke.
    #[error("city {city:?} has no ambassador")]
    MissingAmbassador { city: String },

    /// More distinct members were requested than the population holds.
    #[error("{context}: requested {requested} distinct members but only {available} available")]
    InsufficientPopulation {
        context: &'static str,
        requested: usize,
        available: usize,
    },

    #[error("unknown member {0}")]
    UnknownMember(MemberId),

    #[error("member {0} cannot link to itself")]
    SelfLink(MemberId),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("weighted sampling failed: {0}")]
    Weights(#[from] rand::distr::weighted::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
