//! In-memory implementations of every repository port.
//!
//! [`InMemoryStore`] mirrors the PostgreSQL schema's constraints: unique
//! emails and usernames, unique location names per owner, foreign keys from
//! sessions to locations and from catches to sessions, and the cascade from
//! a session to its catches. Toggling [`InMemoryStore::set_unavailable`]
//! makes every call fail as if the database were unreachable.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::{Page, PageRequest};
use uuid::Uuid;

use crate::domain::ports::{
    CatchRepository, CatchRepositoryError, FishingSessionFilter, FishingSessionRepository,
    FishingSessionRepositoryError, LocationDeletion, LocationRepository, LocationRepositoryError,
    PasswordHashError, PasswordHasher, UserRepository, UserRepositoryError,
};
use crate::domain::{
    Catch, CatchFilter, EmailAddress, FishingSession, FishingSessionSummary, Location,
    UserAccount, UserId,
};

const UNAVAILABLE: &str = "store offline";

#[derive(Default)]
struct Tables {
    users: HashMap<UserId, UserAccount>,
    locations: HashMap<Uuid, Location>,
    sessions: HashMap<Uuid, FishingSession>,
    catches: HashMap<Uuid, Catch>,
}

impl Tables {
    fn location_exists(&self, owner: &UserId, id: Uuid) -> bool {
        self.locations
            .get(&id)
            .is_some_and(|location| &location.owner == owner)
    }

    fn session_exists(&self, owner: &UserId, id: Uuid) -> bool {
        self.sessions
            .get(&id)
            .is_some_and(|session| &session.owner == owner)
    }

    fn name_taken(&self, location: &Location) -> bool {
        self.locations.values().any(|other| {
            other.id != location.id
                && other.owner == location.owner
                && other.details.name() == location.details.name()
        })
    }

    fn summarise(&self, session: &FishingSession) -> FishingSessionSummary {
        let location_name = self
            .locations
            .get(&session.details.location_id())
            .map(|location| location.details.name().to_owned())
            .unwrap_or_default();
        let catches_count = self
            .catches
            .values()
            .filter(|catch| catch.details.session_id() == Some(session.id))
            .count();
        FishingSessionSummary {
            session: session.clone(),
            location_name,
            catches_count: catches_count as u64,
        }
    }

    fn check_catch_link(&self, catch: &Catch) -> Result<(), CatchRepositoryError> {
        match catch.details.session_id() {
            Some(session_id) if !self.session_exists(&catch.owner, session_id) => {
                Err(CatchRepositoryError::missing_session(session_id))
            }
            _ => Ok(()),
        }
    }
}

fn page_of<T>(mut items: Vec<T>, page: PageRequest) -> Page<T> {
    let total = items.len() as u64;
    let start = usize::try_from(page.offset()).unwrap_or(usize::MAX).min(items.len());
    let end = start
        .saturating_add(usize::try_from(page.limit()).unwrap_or(usize::MAX))
        .min(items.len());
    let window: Vec<T> = items.drain(start..end).collect();
    Page::new(window, total, page)
}

fn newest_first(a: DateTime<Utc>, a_id: Uuid, b: DateTime<Utc>, b_id: Uuid) -> std::cmp::Ordering {
    b.cmp(&a).then(a_id.cmp(&b_id))
}

/// Shared in-memory store implementing all four repository ports.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    unavailable: AtomicBool,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the database going away (or coming back).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of stored locations across all owners.
    pub fn location_count(&self) -> usize {
        self.lock().locations.len()
    }

    /// Number of stored sessions across all owners.
    pub fn session_count(&self) -> usize {
        self.lock().sessions.len()
    }

    /// Number of stored catches across all owners.
    pub fn catch_count(&self) -> usize {
        self.lock().catches.len()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        match self.tables.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn open<E>(&self, offline: impl FnOnce(&'static str) -> E) -> Result<MutexGuard<'_, Tables>, E> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(offline(UNAVAILABLE));
        }
        Ok(self.lock())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, account: &UserAccount) -> Result<(), UserRepositoryError> {
        let mut tables = self.open(UserRepositoryError::connection)?;
        let user = &account.user;
        if tables.users.values().any(|other| other.user.email == user.email) {
            return Err(UserRepositoryError::duplicate_email());
        }
        if tables
            .users
            .values()
            .any(|other| other.user.username == user.username)
        {
            return Err(UserRepositoryError::duplicate_username());
        }
        tables.users.insert(user.id.clone(), account.clone());
        Ok(())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, UserRepositoryError> {
        let tables = self.open(UserRepositoryError::connection)?;
        Ok(tables
            .users
            .values()
            .find(|account| &account.user.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, UserRepositoryError> {
        let tables = self.open(UserRepositoryError::connection)?;
        Ok(tables.users.get(id).cloned())
    }

    async fn update_password_hash(
        &self,
        id: &UserId,
        password_hash: &str,
        _updated_at: DateTime<Utc>,
    ) -> Result<bool, UserRepositoryError> {
        let mut tables = self.open(UserRepositoryError::connection)?;
        Ok(tables.users.get_mut(id).is_some_and(|account| {
            account.password_hash = password_hash.to_owned();
            true
        }))
    }
}

#[async_trait]
impl LocationRepository for InMemoryStore {
    async fn create(&self, location: &Location) -> Result<(), LocationRepositoryError> {
        let mut tables = self.open(LocationRepositoryError::connection)?;
        if tables.name_taken(location) {
            return Err(LocationRepositoryError::duplicate_name(
                location.details.name(),
            ));
        }
        tables.locations.insert(location.id, location.clone());
        Ok(())
    }

    async fn find_for_owner(
        &self,
        owner: &UserId,
        id: Uuid,
    ) -> Result<Option<Location>, LocationRepositoryError> {
        let tables = self.open(LocationRepositoryError::connection)?;
        Ok(tables
            .locations
            .get(&id)
            .filter(|location| &location.owner == owner)
            .cloned())
    }

    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Location>, LocationRepositoryError> {
        let tables = self.open(LocationRepositoryError::connection)?;
        let mut owned: Vec<Location> = tables
            .locations
            .values()
            .filter(|location| &location.owner == owner)
            .cloned()
            .collect();
        owned.sort_by(|a, b| {
            a.details
                .name()
                .cmp(b.details.name())
                .then(a.id.cmp(&b.id))
        });
        Ok(owned)
    }

    async fn update(&self, location: &Location) -> Result<bool, LocationRepositoryError> {
        let mut tables = self.open(LocationRepositoryError::connection)?;
        if !tables.location_exists(&location.owner, location.id) {
            return Ok(false);
        }
        if tables.name_taken(location) {
            return Err(LocationRepositoryError::duplicate_name(
                location.details.name(),
            ));
        }
        tables.locations.insert(location.id, location.clone());
        Ok(true)
    }

    async fn delete_if_unused(
        &self,
        owner: &UserId,
        id: Uuid,
    ) -> Result<LocationDeletion, LocationRepositoryError> {
        let mut tables = self.open(LocationRepositoryError::connection)?;
        if !tables.location_exists(owner, id) {
            return Ok(LocationDeletion::NotFound);
        }
        let sessions = tables
            .sessions
            .values()
            .filter(|session| session.details.location_id() == id)
            .count() as u64;
        if sessions > 0 {
            return Ok(LocationDeletion::InUse { sessions });
        }
        tables.locations.remove(&id);
        Ok(LocationDeletion::Deleted)
    }
}

#[async_trait]
impl FishingSessionRepository for InMemoryStore {
    async fn create(&self, session: &FishingSession) -> Result<(), FishingSessionRepositoryError> {
        let mut tables = self.open(FishingSessionRepositoryError::connection)?;
        let location_id = session.details.location_id();
        if !tables.location_exists(&session.owner, location_id) {
            return Err(FishingSessionRepositoryError::missing_location(location_id));
        }
        tables.sessions.insert(session.id, session.clone());
        Ok(())
    }

    async fn find_for_owner(
        &self,
        owner: &UserId,
        id: Uuid,
    ) -> Result<Option<FishingSession>, FishingSessionRepositoryError> {
        let tables = self.open(FishingSessionRepositoryError::connection)?;
        Ok(tables
            .sessions
            .get(&id)
            .filter(|session| &session.owner == owner)
            .cloned())
    }

    async fn list_for_owner(
        &self,
        owner: &UserId,
        filter: FishingSessionFilter,
        page: PageRequest,
    ) -> Result<Page<FishingSessionSummary>, FishingSessionRepositoryError> {
        let tables = self.open(FishingSessionRepositoryError::connection)?;
        let mut owned: Vec<&FishingSession> = tables
            .sessions
            .values()
            .filter(|session| &session.owner == owner)
            .filter(|session| {
                filter
                    .location_id
                    .is_none_or(|id| session.details.location_id() == id)
            })
            .collect();
        owned.sort_by(|a, b| {
            b.details
                .date()
                .cmp(&a.details.date())
                .then(b.details.start_time().cmp(&a.details.start_time()))
                .then(a.id.cmp(&b.id))
        });
        let summaries = owned
            .into_iter()
            .map(|session| tables.summarise(session))
            .collect();
        Ok(page_of(summaries, page))
    }

    async fn list_all_for_owner(
        &self,
        owner: &UserId,
    ) -> Result<Vec<FishingSession>, FishingSessionRepositoryError> {
        let tables = self.open(FishingSessionRepositoryError::connection)?;
        Ok(tables
            .sessions
            .values()
            .filter(|session| &session.owner == owner)
            .cloned()
            .collect())
    }

    async fn update(&self, session: &FishingSession) -> Result<bool, FishingSessionRepositoryError> {
        let mut tables = self.open(FishingSessionRepositoryError::connection)?;
        if !tables.session_exists(&session.owner, session.id) {
            return Ok(false);
        }
        let location_id = session.details.location_id();
        if !tables.location_exists(&session.owner, location_id) {
            return Err(FishingSessionRepositoryError::missing_location(location_id));
        }
        tables.sessions.insert(session.id, session.clone());
        Ok(true)
    }

    async fn delete_with_catches(
        &self,
        owner: &UserId,
        id: Uuid,
    ) -> Result<Option<u64>, FishingSessionRepositoryError> {
        let mut tables = self.open(FishingSessionRepositoryError::connection)?;
        if !tables.session_exists(owner, id) {
            return Ok(None);
        }
        let before = tables.catches.len();
        tables
            .catches
            .retain(|_, catch| catch.details.session_id() != Some(id));
        let removed = (before - tables.catches.len()) as u64;
        tables.sessions.remove(&id);
        Ok(Some(removed))
    }
}

#[async_trait]
impl CatchRepository for InMemoryStore {
    async fn create(&self, catch: &Catch) -> Result<(), CatchRepositoryError> {
        let mut tables = self.open(CatchRepositoryError::connection)?;
        tables.check_catch_link(catch)?;
        tables.catches.insert(catch.id, catch.clone());
        Ok(())
    }

    async fn find_for_owner(
        &self,
        owner: &UserId,
        id: Uuid,
    ) -> Result<Option<Catch>, CatchRepositoryError> {
        let tables = self.open(CatchRepositoryError::connection)?;
        Ok(tables
            .catches
            .get(&id)
            .filter(|catch| &catch.owner == owner)
            .cloned())
    }

    async fn list_for_owner(
        &self,
        owner: &UserId,
        filter: &CatchFilter,
        page: PageRequest,
    ) -> Result<Page<Catch>, CatchRepositoryError> {
        let tables = self.open(CatchRepositoryError::connection)?;
        let mut matching: Vec<Catch> = tables
            .catches
            .values()
            .filter(|catch| &catch.owner == owner && filter.matches(catch))
            .cloned()
            .collect();
        matching.sort_by(|a, b| newest_first(a.created_at, a.id, b.created_at, b.id));
        Ok(page_of(matching, page))
    }

    async fn list_for_session(
        &self,
        owner: &UserId,
        session_id: Uuid,
    ) -> Result<Vec<Catch>, CatchRepositoryError> {
        let tables = self.open(CatchRepositoryError::connection)?;
        let mut attached: Vec<Catch> = tables
            .catches
            .values()
            .filter(|catch| &catch.owner == owner && catch.details.session_id() == Some(session_id))
            .cloned()
            .collect();
        attached.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(attached)
    }

    async fn list_all_for_owner(&self, owner: &UserId) -> Result<Vec<Catch>, CatchRepositoryError> {
        let tables = self.open(CatchRepositoryError::connection)?;
        Ok(tables
            .catches
            .values()
            .filter(|catch| &catch.owner == owner)
            .cloned()
            .collect())
    }

    async fn update(&self, catch: &Catch) -> Result<bool, CatchRepositoryError> {
        let mut tables = self.open(CatchRepositoryError::connection)?;
        let owned = tables
            .catches
            .get(&catch.id)
            .is_some_and(|stored| stored.owner == catch.owner);
        if !owned {
            return Ok(false);
        }
        tables.check_catch_link(catch)?;
        tables.catches.insert(catch.id, catch.clone());
        Ok(true)
    }

    async fn delete(&self, owner: &UserId, id: Uuid) -> Result<bool, CatchRepositoryError> {
        let mut tables = self.open(CatchRepositoryError::connection)?;
        let owned = tables
            .catches
            .get(&id)
            .is_some_and(|catch| &catch.owner == owner);
        if owned {
            tables.catches.remove(&id);
        }
        Ok(owned)
    }
}

/// Reversible "hash" for tests where Argon2's cost would dominate.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaintextPasswordHasher;

const PLAINTEXT_PREFIX: &str = "plain$";

#[async_trait]
impl PasswordHasher for PlaintextPasswordHasher {
    async fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        Ok(format!("{PLAINTEXT_PREFIX}{password}"))
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError> {
        hash.strip_prefix(PLAINTEXT_PREFIX)
            .map(|stored| stored == password)
            .ok_or_else(|| PasswordHashError::malformed_hash("missing plaintext prefix"))
    }

    fn unknown_account_hash(&self) -> String {
        // Passwords are never empty, so nothing verifies against this.
        PLAINTEXT_PREFIX.to_owned()
    }
}
