use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::{ClientError, ClientResult};

/// Cancellation handle passed to every call.
///
/// Contexts form a tree: cancelling a context cancels all contexts derived
/// from it. A derived deadline never outlives the parent one.
#[derive(Debug, Clone, Default)]
pub struct Context {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Context {
    /// A context which never ends on its own.
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(&self, deadline: Instant) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: Some(match self.deadline {
                Some(parent) => parent.min(deadline),
                None => deadline,
            }),
        }
    }

    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Fails if the context has already ended.
    pub fn check(&self) -> ClientResult<()> {
        if self.token.is_cancelled() {
            return Err(ClientError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if deadline <= Instant::now() => Err(ClientError::DeadlineExceeded),
            _ => Ok(()),
        }
    }

    /// Resolves when the context ends, with the reason.
    pub async fn done(&self) -> ClientError {
        let deadline = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.token.cancelled() => ClientError::Cancelled,
            _ = deadline => ClientError::DeadlineExceeded,
        }
    }

    /// Drives `fut` until it completes or the context ends.
    ///
    /// The future is dropped as soon as the context ends.
    pub async fn run<F, T>(&self, fut: F) -> ClientResult<T>
    where
        F: Future<Output = ClientResult<T>>,
    {
        self.check()?;
        tokio::select! {
            biased;
            reason = self.done() => Err(reason),
            res = fut => res,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn cancellation_propagates_to_children() {
        let parent = Context::background();
        let child = parent.child();
        let grandchild = child.with_timeout(Duration::from_secs(60));

        parent.cancel();
        assert!(child.is_cancelled());
        assert!(matches!(grandchild.check(), Err(ClientError::Cancelled)));
    }

    #[tokio::test]
    async fn run_aborts_pending_future() {
        let ctx = Context::background();
        let handle = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            handle.cancel();
        });

        let res = ctx
            .run(std::future::pending::<ClientResult<()>>())
            .await;
        assert!(matches!(res, Err(ClientError::Cancelled)));
    }

    #[tokio::test]
    async fn deadline() {
        let ctx = Context::background().with_timeout(Duration::from_millis(20));
        let res = ctx
            .run(std::future::pending::<ClientResult<()>>())
            .await;
        assert!(matches!(res, Err(ClientError::DeadlineExceeded)));
        assert!(ctx.check().is_err());

        // Children can only shorten the parent deadline.
        let parent = Context::background().with_timeout(Duration::from_millis(10));
        let child = parent.with_timeout(Duration::from_secs(60));
        assert_eq!(child.deadline(), parent.deadline());

        let ok = Context::background().run(async { Ok(5) }).await;
        assert_eq!(ok.unwrap(), 5);
    }
}
