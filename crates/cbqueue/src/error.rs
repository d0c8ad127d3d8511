//! Queue error types.

/// Failure to enqueue. The rejected value is handed back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PushError<T> {
    /// Queue is at capacity. Only returned by the `try_*` family.
    #[error("queue is full")]
    Full(T),

    /// Queue has been shut down by `clear`.
    #[error("queue is shut down")]
    Shutdown(T),
}

impl<T> PushError<T> {
    /// Returns the value that could not be enqueued.
    pub fn into_inner(self) -> T {
        match self {
            Self::Full(value) | Self::Shutdown(value) => value,
        }
    }

    /// Returns true if the push failed because the queue was full.
    pub fn is_full(&self) -> bool {
        matches!(self, Self::Full(_))
    }

    /// Returns true if the push failed because the queue was shut down.
    pub fn is_shutdown(&self) -> bool {
        matches!(self, Self::Shutdown(_))
    }

    /// Maps the carried value, keeping the failure kind.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> PushError<U> {
        match self {
            Self::Full(value) => PushError::Full(f(value)),
            Self::Shutdown(value) => PushError::Shutdown(f(value)),
        }
    }
}

/// Failure to dequeue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PopError {
    /// Queue holds no element. Only returned by the `try_*` family.
    #[error("queue is empty")]
    Empty,

    /// Queue has been shut down by `clear`.
    #[error("queue is shut down")]
    Shutdown,
}

impl PopError {
    /// Returns true if the pop failed because the queue was empty.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns true if the pop failed because the queue was shut down.
    pub fn is_shutdown(&self) -> bool {
        matches!(self, Self::Shutdown)
    }
}

/// Invalid capacity passed to [`BoundedQueue::try_new`](crate::BoundedQueue::try_new).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CapacityError {
    /// A queue must be able to hold at least one element.
    #[error("queue capacity must be positive")]
    Zero,

    /// `capacity + 1` slots cannot be addressed.
    #[error("queue capacity {capacity} is too large")]
    TooLarge { capacity: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_error_hands_value_back() {
        assert_eq!(PushError::Full(7).into_inner(), 7);
        assert_eq!(PushError::Shutdown("x").into_inner(), "x");
    }

    #[test]
    fn push_error_map_keeps_kind() {
        let mapped = PushError::Full(2).map(|v| v * 10);
        assert_eq!(mapped, PushError::Full(20));

        let mapped = PushError::Shutdown(2).map(|v| v.to_string());
        assert!(mapped.is_shutdown());
        assert_eq!(mapped.into_inner(), "2");
    }

    #[test]
    fn display_messages() {
        assert_eq!(PushError::Full(()).to_string(), "queue is full");
        assert_eq!(PopError::Shutdown.to_string(), "queue is shut down");
        assert_eq!(
            CapacityError::TooLarge { capacity: usize::MAX }.to_string(),
            format!("queue capacity {} is too large", usize::MAX)
        );
    }
}
