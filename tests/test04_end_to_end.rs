#![cfg(feature = "sqlite")]

mod common;

use sql_bridge::prelude::*;

use common::{User, UserPatch, create_users_table, session_and_pool};

fn installed() -> Result<(Installer<SqliteSession>, Mirror<User>, MirrorQuery<User>), SqlBridgeError>
{
    let (session, pool) = session_and_pool()?;
    create_users_table(&session)?;
    let installer = Installer::new(session, pool);
    let (mirror, query) = installer.install_full::<User>()?;
    Ok((installer, mirror, query))
}

#[tokio::test(flavor = "current_thread")]
async fn create_then_retrieve_all() -> Result<(), SqlBridgeError> {
    let (_installer, mirror, _query) = installed()?;

    let created = mirror
        .create(User {
            id: 1,
            username: "test-user-0".into(),
        })
        .await?;

    let users = mirror.all().await?;
    assert_eq!(users, vec![created]);
    assert_eq!(users[0].username, "test-user-0");
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn update_then_get_reflects_change() -> Result<(), SqlBridgeError> {
    let (_installer, mirror, query) = installed()?;
    mirror
        .create(User {
            id: 1,
            username: "test-user-0".into(),
        })
        .await?;

    let changed = query
        .filter(Filter::new().eq("id", RowValues::Int(1)))
        .update(UserPatch {
            username: Some("test-user-1".into()),
        })
        .await?;
    assert_eq!(changed, 1);

    let updated = mirror.get(1).await?;
    assert_eq!(updated.username, "test-user-1");
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn delete_then_retrieve_all_is_empty() -> Result<(), SqlBridgeError> {
    let (_installer, mirror, _query) = installed()?;
    mirror
        .create(User {
            id: 1,
            username: "test-user-0".into(),
        })
        .await?;

    mirror.delete(1).await?;
    assert!(mirror.all().await?.is_empty());
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn save_persists_instance_changes() -> Result<(), SqlBridgeError> {
    let (_installer, mirror, _query) = installed()?;
    let mut user = mirror
        .create(User {
            id: 1,
            username: "test-user-0".into(),
        })
        .await?;

    user.username = "updated-user-0".into();
    let saved = mirror.save(user).await?;

    let fetched = mirror.get(1).await?;
    assert_eq!(fetched.username, saved.username);
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn queryset_filter_and_delete() -> Result<(), SqlBridgeError> {
    let (_installer, mirror, query) = installed()?;
    for (id, name) in [(1, "ada"), (2, "grace"), (3, "ada")] {
        mirror
            .create(User {
                id,
                username: name.into(),
            })
            .await?;
    }

    let adas = query
        .filter(Filter::new().eq("username", RowValues::Text("ada".into())))
        .all()
        .await?;
    assert_eq!(adas.len(), 2);

    let one = query
        .filter(Filter::new().eq("id", RowValues::Int(2)))
        .get()
        .await?;
    assert_eq!(one.username, "grace");

    let removed = query
        .filter(Filter::new().eq("username", RowValues::Text("ada".into())))
        .delete()
        .await?;
    assert_eq!(removed, 2);
    assert_eq!(query.all().await?.len(), 1);
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn mirror_results_match_blocking_results() -> Result<(), SqlBridgeError> {
    let (installer, mirror, _query) = installed()?;
    let session = installer.session();

    // Same inputs through both paths.
    User::insert(
        session,
        &User {
            id: 1,
            username: "blocking".into(),
        },
    )?;
    mirror
        .create(User {
            id: 2,
            username: "mirrored".into(),
        })
        .await?;

    let blocking = User::fetch_all(session)?;
    let mirrored = mirror.all().await?;
    assert_eq!(blocking, mirrored);

    // Errors match too: a missing row fails identically on both paths.
    let blocking_err = User::fetch_one(session, &99).expect_err("missing row");
    let mirrored_err = mirror.get(99).await.expect_err("missing row");
    assert_eq!(blocking_err.to_string(), mirrored_err.to_string());
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn driver_rejection_matches_blocking_path() -> Result<(), SqlBridgeError> {
    let (installer, mirror, _query) = installed()?;
    let session = installer.session();

    // Drop the fixture table so the blocking operation itself fails.
    session.execute_batch("DROP TABLE users;")?;

    let blocking_err = User::fetch_all(session).expect_err("missing table");
    let mirrored_err = mirror.all().await.expect_err("missing table");
    assert!(matches!(mirrored_err, SqlBridgeError::SqliteError(_)));
    assert_eq!(blocking_err.to_string(), mirrored_err.to_string());
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn shutdown_pool_fails_at_submission_phase() -> Result<(), SqlBridgeError> {
    let (installer, mirror, _query) = installed()?;

    installer.pool().shutdown();

    let err = mirror
        .create(User {
            id: 1,
            username: "late".into(),
        })
        .await
        .expect_err("pool is shut down");
    assert!(
        matches!(err, SqlBridgeError::SubmissionError(_)),
        "submission-phase failure expected, got {err}"
    );
    Ok(())
}
