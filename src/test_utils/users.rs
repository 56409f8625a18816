use crate::types::UserId;
use crate::App;

/// Registers every user in order, returning their ids.
#[tracing::instrument(skip(app), name = "test_utils.users.register_all")]
pub async fn register_all(app: &App, names: &[&str]) -> Vec<UserId> {
    let mut ids = Vec::with_capacity(names.len());
    for name in names {
        ids.push(app.users.create(name).await.unwrap());
    }
    ids
}
