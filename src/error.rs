use thiserror::Error;

/// Problems found while checking a grammar before it is used.
///
/// Resolution itself never fails; these are authoring mistakes caught when
/// sentences or extensions are handed to a [`crate::Parser`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GrammarError {
    #[error("literal {text:?} has score {score}, expected a value in (0, 1]")]
    InvalidScore { text: String, score: f64 },

    #[error("phrase identity must not be empty")]
    EmptyIdentity,

    #[error("extension {identity:?} cannot supplement or override itself")]
    SelfExtension { identity: &'static str },
}
