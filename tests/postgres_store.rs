//! Runs against a live database only when `LENSLOCKED_TEST_DSN` is set.
//! The users table is dropped and recreated, so point it at a scratch database.

#![allow(clippy::unwrap_used)]

use lenslocked::models::{
    Error, PasswordCost, PgUserStore, User, UserConfig, UserService, UserStore,
};
use secrecy::SecretString;

async fn store() -> Option<PgUserStore> {
    let dsn = std::env::var("LENSLOCKED_TEST_DSN").ok()?;
    let store = PgUserStore::connect(&dsn).await.unwrap();
    store.destructive_reset().await.unwrap();
    Some(store)
}

fn row(email: &str, remember_hash: &str) -> User {
    User {
        email: email.to_string(),
        password_hash: "$argon2id$placeholder".to_string(),
        remember_hash: remember_hash.to_string(),
        ..User::default()
    }
}

// One test so the table reset is not raced by parallel tests.
#[tokio::test]
async fn postgres_store_round_trip() {
    let Some(store) = store().await else {
        return;
    };

    // raw store behaviour
    let id = store.create(&row("pam@dundermifflin.com", "h1")).await.unwrap();
    assert!(id > 0);
    assert_eq!(store.by_id(id).await.unwrap().email, "pam@dundermifflin.com");
    assert_eq!(
        store.by_email("pam@dundermifflin.com").await.unwrap().id,
        id
    );
    assert_eq!(store.by_remember_hash("h1").await.unwrap().id, id);
    assert!(matches!(store.by_id(id + 100).await, Err(Error::NotFound)));

    let err = store
        .create(&row("pam@dundermifflin.com", "h2"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::EmailTaken));

    let err = store
        .create(&row("jim@dundermifflin.com", "h1"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Storage(_)));

    assert!(matches!(
        store.update(&User { id: id + 100, ..row("x@y.io", "h9") }).await,
        Err(Error::NotFound)
    ));
    assert!(matches!(store.delete(id + 100).await, Err(Error::NotFound)));
    store.delete(id).await.unwrap();

    // service over postgres
    let config = UserConfig::new(
        SecretString::from("secret-random-string"),
        SecretString::from("secret-hmac-key"),
    )
    .with_password_cost(PasswordCost::new(8, 1, 1));
    let service = UserService::new(store, &config).unwrap();

    let user = service
        .create(User::new("Michael Scott", "Michael@DunderMifflin.com", "bestboss"))
        .await
        .unwrap();
    assert_eq!(service.by_remember(&user.remember).await.unwrap().id, user.id);

    let stored = service.by_id(user.id).await.unwrap();
    assert!(stored.password.is_empty());
    assert!(stored.remember.is_empty());

    let authed = service
        .authenticate("michael@dundermifflin.com", "bestboss")
        .await
        .unwrap();
    assert_eq!(authed.id, user.id);

    service.delete(user.id).await.unwrap();
    assert!(matches!(service.by_id(user.id).await, Err(Error::NotFound)));
}
