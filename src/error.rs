/// Faults raised by the rating engine itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("malformed match {home:?} vs {away:?}: {reason}")]
    MalformedMatch {
        home: String,
        away: String,
        reason: &'static str,
    },
}
