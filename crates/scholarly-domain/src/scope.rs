//! View lifetimes.
//!
//! A [`ViewScope`] stands for one screen's worth of outstanding work.
//! Cancelling or dropping the scope makes every call it wraps resolve to
//! [`DomainError::Cancelled`] instead of delivering a late result.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::DomainError;

#[derive(Debug, Default)]
pub struct ViewScope {
    token: CancellationToken,
}

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// A scope cancelled together with this one, e.g. a dialog over a table.
    pub fn child(&self) -> ViewScope {
        ViewScope {
            token: self.token.child_token(),
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Token for handing to spawned work.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Run `work` unless the scope is torn down first.
    ///
    /// Any error type that can carry a [`DomainError`] works, so callers
    /// outside this crate can wrap their own fallible futures.
    pub async fn run<T, E, F>(&self, work: F) -> std::result::Result<T, E>
    where
        F: Future<Output = std::result::Result<T, E>>,
        E: From<DomainError>,
    {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(DomainError::Cancelled.into()),
            result = work => result,
        }
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
