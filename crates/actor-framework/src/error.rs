//! # Framework Errors
//!
//! Errors raised by the actor plumbing itself. Entity-level failures travel
//! inside [`FrameworkError::EntityError`] and can be recovered with
//! [`FrameworkError::into_entity_error`].

/// Errors that can occur within the actor framework itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Duplicate id: {0}")]
    DuplicateId(String),
    #[error("Id sequence exhausted")]
    IdsExhausted,
    #[error("Entity error: {0}")]
    EntityError(Box<dyn std::error::Error + Send + Sync>),
}

impl FrameworkError {
    /// Recovers the typed entity error carried by `EntityError`.
    ///
    /// Returns `Err(self)` for plumbing errors or when the boxed error is of a
    /// different type.
    pub fn into_entity_error<E>(self) -> Result<E, FrameworkError>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        match self {
            FrameworkError::EntityError(inner) => inner
                .downcast::<E>()
                .map(|e| *e)
                .map_err(FrameworkError::EntityError),
            other => Err(other),
        }
    }

    /// `true` when the request never reached a live actor or its reply was lost.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, FrameworkError::ActorClosed | FrameworkError::ActorDropped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error, PartialEq)]
    #[error("locked")]
    struct Locked;

    #[derive(Debug, thiserror::Error)]
    #[error("other")]
    struct Other;

    #[test]
    fn entity_error_round_trips_through_box() {
        let err = FrameworkError::EntityError(Box::new(Locked));
        assert_eq!(err.into_entity_error::<Locked>().unwrap(), Locked);
    }

    #[test]
    fn mismatched_entity_error_is_returned_unchanged() {
        let err = FrameworkError::EntityError(Box::new(Other));
        let back = err.into_entity_error::<Locked>().unwrap_err();
        assert!(matches!(back, FrameworkError::EntityError(_)));
    }

    #[test]
    fn plumbing_errors_are_unavailable() {
        assert!(FrameworkError::ActorClosed.is_unavailable());
        assert!(FrameworkError::ActorDropped.is_unavailable());
        assert!(!FrameworkError::NotFound("1".into()).is_unavailable());
        assert!(FrameworkError::ActorClosed
            .into_entity_error::<Locked>()
            .is_err());
    }
}
