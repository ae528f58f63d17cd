//! The `Execute` trait implemented by every board command.
//!
//! Commands are plain structs whose fields are their parameters; the
//! context they run against provides storage access and policy, not logic.

use async_trait::async_trait;

#[async_trait]
pub trait Execute<C: ?Sized + Sync, E> {
    type Output: Send;

    async fn execute(&self, ctx: &C) -> Result<Self::Output, E>;
}
