//! Tests for the password account service.

use std::sync::Arc;

use mockall::predicate::eq;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{MockPasswordHasher, MockUserRepository};
use crate::test_support::clock::{MutableClock, fixture_instant};

type Service = PasswordAccountService<MockUserRepository, MockPasswordHasher>;

fn make_service(users: MockUserRepository, hasher: MockPasswordHasher) -> Service {
    PasswordAccountService::new(
        Arc::new(users),
        Arc::new(hasher),
        Arc::new(MutableClock::fixed()),
    )
}

#[fixture]
fn hasher() -> MockPasswordHasher {
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .returning(|password| Ok(format!("hashed:{password}")));
    hasher
        .expect_verify()
        .returning(|password, hash| Ok(hash == format!("hashed:{password}")));
    hasher
        .expect_unknown_account_hash()
        .returning(|| "hashed:\u{0}".to_owned());
    hasher
}

fn stored_account(password: &str) -> UserAccount {
    let registration =
        Registration::try_from_parts("angler@example.org", "angler", password).expect("valid");
    UserAccount {
        user: User {
            id: UserId::random(),
            email: registration.email().clone(),
            username: registration.username().clone(),
            created_at: fixture_instant(),
        },
        password_hash: format!("hashed:{password}"),
    }
}

#[rstest]
#[tokio::test]
async fn register_stores_hash_and_returns_user(hasher: MockPasswordHasher) {
    let mut users = MockUserRepository::new();
    users
        .expect_create()
        .withf(|account| account.password_hash == "hashed:correct horse")
        .times(1)
        .return_once(|_| Ok(()));
    let service = make_service(users, hasher);

    let registration =
        Registration::try_from_parts("Angler@Example.org", "angler", "correct horse")
            .expect("valid registration");
    let user = service.register(registration).await.expect("registered");

    assert_eq!(user.email.as_ref(), "angler@example.org");
    assert_eq!(user.created_at, fixture_instant());
}

#[rstest]
#[case(UserRepositoryError::duplicate_email(), "email")]
#[case(UserRepositoryError::duplicate_username(), "username")]
#[tokio::test]
async fn register_maps_duplicates_to_conflict(
    hasher: MockPasswordHasher,
    #[case] failure: UserRepositoryError,
    #[case] field: &str,
) {
    let mut users = MockUserRepository::new();
    users.expect_create().return_once(move |_| Err(failure));
    let service = make_service(users, hasher);

    let registration =
        Registration::try_from_parts("angler@example.org", "angler", "correct horse")
            .expect("valid registration");
    let err = service.register(registration).await.expect_err("conflict");

    assert_eq!(err.code(), ErrorCode::Conflict);
    let details = err.details().expect("details");
    assert_eq!(details["field"], field);
}

#[rstest]
#[tokio::test]
async fn login_accepts_matching_password(hasher: MockPasswordHasher) {
    let account = stored_account("correct horse");
    let expected = account.user.clone();
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .return_once(move |_| Ok(Some(account)));
    let service = make_service(users, hasher);

    let creds = LoginCredentials::try_from_parts("angler@example.org", "correct horse")
        .expect("valid credentials");
    let user = service.login(creds).await.expect("login succeeds");
    assert_eq!(user, expected);
}

#[rstest]
#[case(true)]
#[case(false)]
#[tokio::test]
async fn login_failures_are_indistinguishable(hasher: MockPasswordHasher, #[case] known: bool) {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .return_once(move |_| Ok(known.then(|| stored_account("correct horse"))));
    let service = make_service(users, hasher);

    let creds = LoginCredentials::try_from_parts("angler@example.org", "wrong guess")
        .expect("valid credentials");
    let err = service.login(creds).await.expect_err("rejected");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.message(), INVALID_CREDENTIALS);
}

#[rstest]
#[case(None)]
#[case(Some("wrong guess"))]
#[tokio::test]
async fn every_failed_login_verifies_exactly_once(#[case] stored_password: Option<&'static str>) {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .return_once(move |_| Ok(stored_password.map(stored_account)));
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_unknown_account_hash()
        .returning(|| "placeholder".to_owned());
    hasher.expect_verify().times(1).returning(|_, _| Ok(false));
    let service = make_service(users, hasher);

    let creds = LoginCredentials::try_from_parts("angler@example.org", "correct horse")
        .expect("valid credentials");
    let err = service.login(creds).await.expect_err("rejected");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn unknown_emails_are_checked_against_the_placeholder_hash() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().return_once(|_| Ok(None));
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_unknown_account_hash()
        .times(1)
        .returning(|| "placeholder".to_owned());
    hasher
        .expect_verify()
        .withf(|_, hash| hash == "placeholder")
        .times(1)
        .returning(|_, _| Ok(true));
    let service = make_service(users, hasher);

    let creds = LoginCredentials::try_from_parts("nobody@example.org", "correct horse")
        .expect("valid credentials");
    let err = service.login(creds).await.expect_err("no such account");
    assert_eq!(err.message(), INVALID_CREDENTIALS);
}

#[rstest]
#[tokio::test]
async fn connection_failures_surface_as_store_errors(hasher: MockPasswordHasher) {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .return_once(|_| Err(UserRepositoryError::connection("refused")));
    let service = make_service(users, hasher);

    let creds = LoginCredentials::try_from_parts("angler@example.org", "correct horse")
        .expect("valid credentials");
    let err = service.login(creds).await.expect_err("store failure");
    assert_eq!(err.code(), ErrorCode::Store);
}

#[rstest]
#[tokio::test]
async fn change_password_rehashes_after_checking_current(hasher: MockPasswordHasher) {
    let account = stored_account("correct horse");
    let id = account.user.id.clone();
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .with(eq(id.clone()))
        .return_once(move |_| Ok(Some(account)));
    users
        .expect_update_password_hash()
        .withf(|_, hash, at| hash == "hashed:battery staple" && *at == fixture_instant())
        .times(1)
        .return_once(|_, _, _| Ok(true));
    let service = make_service(users, hasher);

    let change = PasswordChange::try_from_parts("correct horse", "battery staple")
        .expect("valid change");
    service
        .change_password(&id, change)
        .await
        .expect("password changed");
}

#[rstest]
#[tokio::test]
async fn change_password_rejects_wrong_current_password(hasher: MockPasswordHasher) {
    let account = stored_account("correct horse");
    let id = account.user.id.clone();
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(account)));
    users.expect_update_password_hash().never();
    let service = make_service(users, hasher);

    let change = PasswordChange::try_from_parts("not my password", "battery staple")
        .expect("valid change");
    let err = service
        .change_password(&id, change)
        .await
        .expect_err("rejected");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn current_user_requires_existing_account(hasher: MockPasswordHasher) {
    let mut users = MockUserRepository::new();
    users.expect_find_by_id().return_once(|_| Ok(None));
    let service = make_service(users, hasher);

    let err = service
        .current_user(&UserId::random())
        .await
        .expect_err("missing");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}
