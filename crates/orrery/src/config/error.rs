//! Configuration error types.

/// Errors raised while building a system. All of them are programmer or data
/// errors, reported once at construction; nothing in the tick path returns one.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Manifest JSON did not parse.
    #[error("system manifest JSON: {0}")]
    Parse(#[source] serde_json::Error),

    /// Eccentricity outside `[0, 1)`; only bound orbits are modelled.
    #[error("body `{body}`: eccentricity {eccentricity} is not in [0, 1)")]
    InvalidEccentricity { body: String, eccentricity: f64 },

    #[error("body `{body}`: radius {radius} must be non-negative")]
    NegativeRadius { body: String, radius: f64 },

    #[error("body `{body}`: invalid orbit: {reason}")]
    InvalidOrbit { body: String, reason: String },

    #[error("body `{body}`: `{field}` is not finite")]
    NonFinite { body: String, field: &'static str },

    #[error("body `{body}`: framing ratio {ratio} is not in (0, 1]")]
    InvalidFramingRatio { body: String, ratio: f64 },

    #[error("duplicate body name `{0}`")]
    DuplicateName(String),

    #[error("body `{body}` orbits unknown parent `{parent}`")]
    UnknownParent { body: String, parent: String },

    #[error("body `{body}` is part of a parent cycle")]
    Cycle { body: String },

    #[error("body `{body}` sits at depth {depth}, deeper than the maximum {max}")]
    TooDeep { body: String, depth: usize, max: usize },

    #[error("system has no bodies")]
    EmptySystem,

    #[error("setting `{name}`: {reason}")]
    InvalidSetting { name: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_body() {
        let err = ConfigError::UnknownParent { body: "Moon".into(), parent: "Terra".into() };
        assert_eq!(err.to_string(), "body `Moon` orbits unknown parent `Terra`");

        let err = ConfigError::InvalidEccentricity { body: "Comet".into(), eccentricity: 1.2 };
        assert!(err.to_string().contains("Comet"));
    }

    #[test]
    fn parse_error_keeps_source() {
        let inner = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = ConfigError::Parse(inner);
        assert!(std::error::Error::source(&err).is_some());
    }
}
