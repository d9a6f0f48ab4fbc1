//! Password-based implementation of the authentication use-case.
//!
//! Built from the credential-store and password-hasher ports so the
//! non-enumeration behaviour is testable with stub stores and a cheap
//! fake hasher.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::credentials::{LoginCredentials, Registration};
use crate::domain::error::Error;
use crate::domain::ports::{
    AuthError, AuthService, NewUser, PasswordHashError, PasswordHasher, RegistrationError,
    UserPersistenceError, UserRepository,
};
use crate::domain::user::{PasswordHash, User};

/// Well-formed bcrypt hash of an unrelated value. Verification runs
/// against it when the email is unknown so lookup misses and password
/// mismatches take the same time.
const DUMMY_HASH: &str = "$2y$10$R9h/cIPz0gi.URNNX3kh2OPST9/PgBkqquzi.Ss7KIUgO2t0jWMUW";

fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => Error::service_unavailable(message),
        UserPersistenceError::Query { message } => Error::internal(message),
        UserPersistenceError::DuplicateEmail => {
            // Callers translate duplicates before reaching this mapping;
            // anything arriving here is a store misbehaving.
            Error::conflict("email address already registered")
        }
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    match error {
        PasswordHashError::Hashing { message } => Error::internal(message),
    }
}

/// [`AuthService`] backed by a credential store and a password hasher.
#[derive(Clone)]
pub struct PasswordAuthenticator {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl PasswordAuthenticator {
    /// Create a new authenticator from its ports.
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { users, hasher }
    }
}

#[async_trait]
impl AuthService for PasswordAuthenticator {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, AuthError> {
        let maybe_user = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(|err| AuthError::Service(map_user_persistence_error(err)))?;

        let Some(user) = maybe_user else {
            // Burn the same hashing work as the found path; the outcome
            // is discarded.
            if let Err(error) = self.hasher.verify(credentials.password(), DUMMY_HASH).await {
                warn!(%error, "dummy hash verification failed");
            }
            return Err(AuthError::InvalidCredentials);
        };

        let matches = self
            .hasher
            .verify(credentials.password(), user.password_hash().expose())
            .await
            .map_err(|err| AuthError::Service(map_hash_error(err)))?;

        if matches {
            Ok(user)
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }

    async fn register(&self, registration: &Registration) -> Result<User, RegistrationError> {
        let encoded = self
            .hasher
            .hash(registration.password())
            .await
            .map_err(|err| RegistrationError::Service(map_hash_error(err)))?;

        let new_user = NewUser {
            name: registration.name().clone(),
            email: registration.email().clone(),
            password_hash: PasswordHash::new(encoded),
        };

        self.users.create(new_user).await.map_err(|err| match err {
            UserPersistenceError::DuplicateEmail => RegistrationError::DuplicateEmail,
            other => RegistrationError::Service(map_user_persistence_error(other)),
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use std::sync::Mutex;

    use rstest::rstest;

    use super::*;
    use crate::domain::error::ErrorCode;
    use crate::domain::user::{EmailAddress, UserId};

    /// Hasher that encodes passwords reversibly; cheap and deterministic.
    struct FakeHasher;

    #[async_trait]
    impl PasswordHasher for FakeHasher {
        async fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
            Ok(format!("fake:{password}"))
        }

        async fn verify(
            &self,
            password: &str,
            encoded_hash: &str,
        ) -> Result<bool, PasswordHashError> {
            Ok(encoded_hash == format!("fake:{password}"))
        }
    }

    #[derive(Default)]
    struct StubUserRepository {
        users: Mutex<Vec<User>>,
        find_failure: Mutex<Option<UserPersistenceError>>,
    }

    impl StubUserRepository {
        fn set_find_failure(&self, failure: UserPersistenceError) {
            *self.find_failure.lock().expect("failure lock") = Some(failure);
        }
    }

    #[async_trait]
    impl UserRepository for StubUserRepository {
        async fn create(&self, new_user: NewUser) -> Result<User, UserPersistenceError> {
            let mut users = self.users.lock().expect("users lock");
            if users.iter().any(|u| u.email() == &new_user.email) {
                return Err(UserPersistenceError::duplicate_email());
            }
            let user = User::new(
                UserId::random(),
                new_user.name,
                new_user.email,
                new_user.password_hash,
            );
            users.push(user.clone());
            Ok(user)
        }

        async fn find_by_email(
            &self,
            email: &EmailAddress,
        ) -> Result<Option<User>, UserPersistenceError> {
            if let Some(failure) = self.find_failure.lock().expect("failure lock").clone() {
                return Err(failure);
            }
            let users = self.users.lock().expect("users lock");
            Ok(users.iter().find(|u| u.email() == email).cloned())
        }

        async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
            let users = self.users.lock().expect("users lock");
            Ok(users.iter().find(|u| u.id() == id).cloned())
        }
    }

    fn authenticator(users: Arc<StubUserRepository>) -> PasswordAuthenticator {
        PasswordAuthenticator::new(users, Arc::new(FakeHasher))
    }

    fn registration(email: &str, password: &str) -> Registration {
        Registration::parse("Ada Lovelace", email, password, password)
            .expect("valid registration fixture")
    }

    fn credentials(email: &str, password: &str) -> LoginCredentials {
        LoginCredentials::try_from_parts(email, password).expect("valid credentials fixture")
    }

    #[tokio::test]
    async fn register_then_authenticate_yields_same_identity() {
        let repository = Arc::new(StubUserRepository::default());
        let service = authenticator(repository);

        let registered = service
            .register(&registration("ada@example.com", "abc123"))
            .await
            .expect("registration succeeds");
        let authenticated = service
            .authenticate(&credentials("ada@example.com", "abc123"))
            .await
            .expect("authentication succeeds");

        assert_eq!(authenticated.id(), registered.id());
        assert_eq!(authenticated.email().as_ref(), "ada@example.com");
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_fail_identically() {
        let repository = Arc::new(StubUserRepository::default());
        let service = authenticator(repository);
        service
            .register(&registration("ada@example.com", "abc123"))
            .await
            .expect("registration succeeds");

        let wrong_password = service
            .authenticate(&credentials("ada@example.com", "nope99"))
            .await
            .expect_err("wrong password fails");
        let unknown_email = service
            .authenticate(&credentials("ghost@example.com", "abc123"))
            .await
            .expect_err("unknown email fails");

        assert_eq!(wrong_password, AuthError::InvalidCredentials);
        assert_eq!(wrong_password, unknown_email);
    }

    #[tokio::test]
    async fn duplicate_registration_is_tagged() {
        let repository = Arc::new(StubUserRepository::default());
        let service = authenticator(repository);
        service
            .register(&registration("ada@example.com", "abc123"))
            .await
            .expect("first registration succeeds");

        let err = service
            .register(&registration("ada@example.com", "other9"))
            .await
            .expect_err("second registration fails");
        assert_eq!(err, RegistrationError::DuplicateEmail);
    }

    #[rstest]
    #[case(UserPersistenceError::connection("down"), ErrorCode::ServiceUnavailable)]
    #[case(UserPersistenceError::query("broken"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn lookup_failures_surface_as_service_errors(
        #[case] failure: UserPersistenceError,
        #[case] expected: ErrorCode,
    ) {
        let repository = Arc::new(StubUserRepository::default());
        repository.set_find_failure(failure);
        let service = authenticator(repository);

        let err = service
            .authenticate(&credentials("ada@example.com", "abc123"))
            .await
            .expect_err("store failure surfaces");
        match err {
            AuthError::Service(error) => assert_eq!(error.code(), expected),
            AuthError::InvalidCredentials => panic!("store failure must not look like bad creds"),
        }
    }
}
