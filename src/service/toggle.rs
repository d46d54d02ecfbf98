//! Idempotent toggle over engagement edges
//!
//! Per (actor, target) pair the edge is either absent or present.
//! `toggle_on` and `toggle_off` are check-then-act; the race between the
//! check and the write is closed by the store's UNIQUE constraint and by
//! counting deleted rows.

use crate::data::{EdgeInsert, EdgeStore};
use crate::error::AppError;
use crate::metrics::TOGGLE_OUTCOMES_TOTAL;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOn {
    Created,
    AlreadyExists,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOff {
    Deleted,
    NotFound,
}

fn record(edge: &'static str, outcome: &'static str) {
    TOGGLE_OUTCOMES_TOTAL.with_label_values(&[edge, outcome]).inc();
}

/// Absent -> Present (`Created`), Present -> Present (`AlreadyExists`)
pub async fn toggle_on(
    store: &dyn EdgeStore,
    actor: &str,
    target: &str,
) -> Result<ToggleOn, AppError> {
    let edge = store.edge_name();

    if store.exists(actor, target).await? {
        record(edge, "already_exists");
        return Ok(ToggleOn::AlreadyExists);
    }

    let outcome = match store.insert(actor, target).await? {
        EdgeInsert::Inserted => ToggleOn::Created,
        EdgeInsert::Duplicate => {
            tracing::debug!(edge, actor, target, "lost insert race; edge already present");
            ToggleOn::AlreadyExists
        }
    };

    record(
        edge,
        match outcome {
            ToggleOn::Created => "created",
            ToggleOn::AlreadyExists => "already_exists",
        },
    );
    Ok(outcome)
}

/// Present -> Absent (`Deleted`), Absent -> Absent (`NotFound`)
pub async fn toggle_off(
    store: &dyn EdgeStore,
    actor: &str,
    target: &str,
) -> Result<ToggleOff, AppError> {
    let edge = store.edge_name();

    if !store.exists(actor, target).await? {
        record(edge, "not_found");
        return Ok(ToggleOff::NotFound);
    }

    let outcome = if store.delete(actor, target).await? > 0 {
        ToggleOff::Deleted
    } else {
        tracing::debug!(edge, actor, target, "lost delete race; edge already absent");
        ToggleOff::NotFound
    };

    record(
        edge,
        match outcome {
            ToggleOff::Deleted => "deleted",
            ToggleOff::NotFound => "not_found",
        },
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceKind;
    use crate::data::{Database, LikeStore, LikeTarget, MockEdgeStore};
    use tempfile::TempDir;

    async fn like_store() -> (LikeStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db = Database::connect(&temp_dir.path().join("likes.db"), ServiceKind::Likes)
            .await
            .unwrap();
        (LikeStore::new(db.pool().clone()), temp_dir)
    }

    #[tokio::test]
    async fn toggle_on_twice_keeps_one_edge() {
        let (store, _temp_dir) = like_store().await;
        let edges = store.edges(LikeTarget::Post);

        assert_eq!(
            toggle_on(&edges, "bob", "p1").await.unwrap(),
            ToggleOn::Created
        );
        assert_eq!(
            toggle_on(&edges, "bob", "p1").await.unwrap(),
            ToggleOn::AlreadyExists
        );
        assert_eq!(store.count(LikeTarget::Post, "p1").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn toggle_off_twice_leaves_edge_absent() {
        let (store, _temp_dir) = like_store().await;
        let edges = store.edges(LikeTarget::Post);
        toggle_on(&edges, "bob", "p1").await.unwrap();

        assert_eq!(
            toggle_off(&edges, "bob", "p1").await.unwrap(),
            ToggleOff::Deleted
        );
        assert_eq!(
            toggle_off(&edges, "bob", "p1").await.unwrap(),
            ToggleOff::NotFound
        );
        assert_eq!(store.count(LikeTarget::Post, "p1").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn concurrent_toggle_on_creates_exactly_once() {
        let (store, _temp_dir) = like_store().await;

        let mut handles = Vec::new();
        for _ in 0..8 {
            let edges = store.edges(LikeTarget::Comment);
            handles.push(tokio::spawn(async move {
                toggle_on(&edges, "bob", "c1").await.unwrap()
            }));
        }

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap() == ToggleOn::Created {
                created += 1;
            }
        }

        assert_eq!(created, 1);
        assert_eq!(store.count(LikeTarget::Comment, "c1").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn unique_violation_after_check_reports_already_exists() {
        let mut store = MockEdgeStore::new();
        store.expect_edge_name().return_const("post_like");
        store.expect_exists().returning(|_, _| Ok(false));
        store
            .expect_insert()
            .times(1)
            .returning(|_, _| Ok(EdgeInsert::Duplicate));

        assert_eq!(
            toggle_on(&store, "bob", "p1").await.unwrap(),
            ToggleOn::AlreadyExists
        );
    }

    #[tokio::test]
    async fn zero_row_delete_after_check_reports_not_found() {
        let mut store = MockEdgeStore::new();
        store.expect_edge_name().return_const("follow");
        store.expect_exists().returning(|_, _| Ok(true));
        store.expect_delete().times(1).returning(|_, _| Ok(0));

        assert_eq!(
            toggle_off(&store, "bob", "alice").await.unwrap(),
            ToggleOff::NotFound
        );
    }

    #[tokio::test]
    async fn store_failures_propagate() {
        let mut store = MockEdgeStore::new();
        store.expect_edge_name().return_const("follow");
        store
            .expect_exists()
            .returning(|_, _| Err(AppError::Database(sqlx::Error::PoolTimedOut)));

        assert!(matches!(
            toggle_on(&store, "bob", "alice").await,
            Err(AppError::Database(_))
        ));
    }
}
