#![cfg(feature = "sqlite")]

mod common;

use sql_bridge::install_mirrors;
use sql_bridge::prelude::*;

use common::{AuditLog, User, create_users_table, session_and_pool};

fn installer() -> Result<Installer<SqliteSession>, SqlBridgeError> {
    let (session, pool) = session_and_pool()?;
    create_users_table(&session)?;
    Ok(Installer::new(session, pool))
}

#[tokio::test(flavor = "current_thread")]
async fn installation_is_idempotent() -> Result<(), SqlBridgeError> {
    let installer = installer()?;

    let _first = installer.install::<User>()?;
    let _second = installer.install::<User>()?;

    // One registry entry, one operation set; the second call was a no-op.
    assert_eq!(installer.registry().len(), 1);
    let installed = installer
        .registry()
        .installed_operations::<User>(Surface::Model)
        .expect("installed");
    assert_eq!(
        installed,
        vec![
            Operation::Create,
            Operation::All,
            Operation::Get,
            Operation::Delete,
            Operation::Save,
        ]
    );
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn install_full_covers_both_surfaces() -> Result<(), SqlBridgeError> {
    let installer = installer()?;

    let (_mirror, _query) = installer.install_full::<User>()?;

    assert_eq!(installer.registry().len(), 2);
    assert!(installer.registry().is_installed::<User>(Surface::Model));
    assert!(installer.registry().is_installed::<User>(Surface::QuerySet));
    assert_eq!(installer.registry().installed_types(), vec![
        std::any::type_name::<User>()
    ]);
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn undeclared_operation_fails_fast() -> Result<(), SqlBridgeError> {
    let installer = installer()?;

    // AuditLog declares only Create and All.
    let err = installer
        .install_with::<AuditLog>(&[Operation::Create, Operation::Get])
        .expect_err("Get is not declared");
    assert!(matches!(err, SqlBridgeError::ConfigError(_)));

    // Nothing was recorded for the failed install.
    assert!(!installer.registry().is_installed::<AuditLog>(Surface::Model));
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn mirror_lookup_requires_installation() -> Result<(), SqlBridgeError> {
    let installer = installer()?;

    let err = installer
        .mirror::<User>()
        .expect_err("not installed yet");
    assert!(matches!(err, SqlBridgeError::ConfigError(_)));

    installer.install::<User>()?;
    assert!(installer.mirror::<User>().is_ok());
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn install_mirrors_macro_registers_each_model() -> Result<(), SqlBridgeError> {
    let installer = installer()?;

    install_mirrors!(installer, User, AuditLog)?;

    assert!(installer.registry().is_installed::<User>(Surface::Model));
    assert!(installer.registry().is_installed::<User>(Surface::QuerySet));
    assert!(installer.registry().is_installed::<AuditLog>(Surface::Model));

    // Running the registration step again is a no-op, not an error.
    install_mirrors!(installer, User, AuditLog)?;
    assert_eq!(installer.registry().len(), 4);
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn undeclared_method_stays_unsupported_at_call_time() -> Result<(), SqlBridgeError> {
    let installer = installer()?;
    installer
        .session()
        .execute_batch("CREATE TABLE audit_log (id INTEGER PRIMARY KEY, message TEXT NOT NULL);")?;

    let mirror = installer.install::<AuditLog>()?;
    mirror
        .create(AuditLog {
            id: 1,
            message: "created".into(),
        })
        .await?;

    // `get` was never declared; the blocking default answers for it.
    let err = mirror.get(1).await.expect_err("get is undeclared");
    assert!(matches!(err, SqlBridgeError::Unsupported(_)));
    Ok(())
}
