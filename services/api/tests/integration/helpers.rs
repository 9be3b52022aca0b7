use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use chrono::Utc;

use soundcave_api::domain::password::PasswordHasher;
use soundcave_api::domain::repository::{
    ArtistRepository, FollowRepository, ObjectStore, UserRepository,
};
use soundcave_api::domain::types::{Artist, ArtistPatch, NewArtist, NewUser, User, UserFilter, UserPatch};
use soundcave_api::error::ApiError;
use soundcave_api::usecase::follow::{FollowUseCase, ListFollowersUseCase, UnfollowUseCase};
use soundcave_domain::follow::{FollowTarget, TargetKind};
use soundcave_domain::id::{ArtistId, UserId};
use soundcave_domain::pagination::{Page, PageMeta, PageRequest};
use soundcave_domain::user::Role;

/// Lowest bcrypt cost; keeps hashing fast in tests.
pub fn test_hasher() -> PasswordHasher {
    PasswordHasher::new(4)
}

pub fn test_user(id: i64, role: Role) -> User {
    User {
        id: UserId(id),
        full_name: format!("User {id}"),
        email: format!("user{id}@example.com"),
        password_hash: None,
        phone: None,
        location: None,
        bio: None,
        profile_image: None,
        role,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn test_artist(id: i64) -> Artist {
    Artist {
        id: ArtistId(id),
        ref_user_id: None,
        name: format!("Artist {id}"),
        bio: "Plays in caves.".into(),
        genre: None,
        country: None,
        debut_year: None,
        website: None,
        email: format!("artist{id}@example.com"),
        phone: None,
        profile_image: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

// ── MockUserRepo ─────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockUserRepo {
    pub users: Arc<Mutex<Vec<User>>>,
}

impl MockUserRepo {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn get(&self, id: i64) -> Option<User> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == UserId(id))
            .cloned()
    }
}

impl UserRepository for MockUserRepo {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, ApiError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create(&self, user: &NewUser) -> Result<User, ApiError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(ApiError::EmailAlreadyExists);
        }
        let id = users.iter().map(|u| u.id.0).max().unwrap_or(0) + 1;
        let now = Utc::now();
        let created = User {
            id: UserId(id),
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            phone: user.phone.clone(),
            location: None,
            bio: None,
            profile_image: None,
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        users.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: UserId, patch: &UserPatch) -> Result<Option<User>, ApiError> {
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(ref v) = patch.full_name {
            user.full_name = v.clone();
        }
        if let Some(ref v) = patch.phone {
            user.phone = Some(v.clone());
        }
        if let Some(ref v) = patch.location {
            user.location = Some(v.clone());
        }
        if let Some(ref v) = patch.bio {
            user.bio = Some(v.clone());
        }
        if let Some(ref v) = patch.profile_image {
            user.profile_image = Some(v.clone());
        }
        if let Some(role) = patch.role {
            user.role = role;
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn soft_delete(&self, id: UserId) -> Result<bool, ApiError> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(users.len() < before)
    }

    async fn list(&self, filter: &UserFilter, page: PageRequest) -> Result<Page<User>, ApiError> {
        let users = self.users.lock().unwrap();
        let matching: Vec<User> = users
            .iter()
            .filter(|u| filter.role.is_none_or(|role| u.role == role))
            .cloned()
            .collect();
        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect();
        Ok(Page {
            items,
            meta: PageMeta::new(page, total),
        })
    }
}

// ── MockArtistRepo ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockArtistRepo {
    pub artists: Arc<Mutex<Vec<Artist>>>,
}

impl MockArtistRepo {
    pub fn new(artists: Vec<Artist>) -> Self {
        Self {
            artists: Arc::new(Mutex::new(artists)),
        }
    }
}

impl ArtistRepository for MockArtistRepo {
    async fn find_by_id(&self, id: ArtistId) -> Result<Option<Artist>, ApiError> {
        Ok(self
            .artists
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .cloned())
    }

    async fn create(&self, _artist: &NewArtist) -> Result<Artist, ApiError> {
        unreachable!("artist creation is covered by unit tests")
    }

    async fn update(&self, id: ArtistId, patch: &ArtistPatch) -> Result<Option<Artist>, ApiError> {
        let mut artists = self.artists.lock().unwrap();
        let Some(artist) = artists.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        if let Some(ref name) = patch.name {
            artist.name = name.clone();
        }
        if let Some(ref bio) = patch.bio {
            artist.bio = bio.clone();
        }
        artist.updated_at = Utc::now();
        Ok(Some(artist.clone()))
    }

    /// Deleted artists are dropped, matching the `deleted_at IS NULL` filter.
    async fn soft_delete(&self, id: ArtistId) -> Result<bool, ApiError> {
        let mut artists = self.artists.lock().unwrap();
        let before = artists.len();
        artists.retain(|a| a.id != id);
        Ok(artists.len() < before)
    }

    async fn list(&self, page: PageRequest) -> Result<Page<Artist>, ApiError> {
        let artists = self.artists.lock().unwrap();
        Ok(Page {
            items: artists.clone(),
            meta: PageMeta::new(page, artists.len() as u64),
        })
    }
}

// ── MockFollowRepo ───────────────────────────────────────────────────────────

/// Edge list guarded by one lock, so check-and-insert is atomic like the
/// database's unique key.
#[derive(Clone, Default)]
pub struct MockFollowRepo {
    pub edges: Arc<Mutex<Vec<(UserId, FollowTarget)>>>,
}

impl MockFollowRepo {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn fans_of(&self, target: FollowTarget) -> Vec<UserId> {
        self.edges
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, t)| *t == target)
            .map(|(fan, _)| *fan)
            .collect()
    }
}

impl FollowRepository for MockFollowRepo {
    async fn follow(&self, fan: UserId, target: FollowTarget) -> Result<Option<u64>, ApiError> {
        let mut edges = self.edges.lock().unwrap();
        if edges.contains(&(fan, target)) {
            return Ok(None);
        }
        edges.push((fan, target));
        Ok(Some(edges.iter().filter(|(_, t)| *t == target).count() as u64))
    }

    async fn unfollow(
        &self,
        fan: UserId,
        target: FollowTarget,
    ) -> Result<Option<u64>, ApiError> {
        let mut edges = self.edges.lock().unwrap();
        let Some(pos) = edges.iter().position(|edge| *edge == (fan, target)) else {
            return Ok(None);
        };
        edges.remove(pos);
        Ok(Some(edges.iter().filter(|(_, t)| *t == target).count() as u64))
    }

    async fn count(&self, target: FollowTarget) -> Result<u64, ApiError> {
        Ok(self.fans_of(target).len() as u64)
    }

    async fn count_many(
        &self,
        kind: TargetKind,
        ids: &[i64],
    ) -> Result<HashMap<i64, u64>, ApiError> {
        let mut counts = HashMap::new();
        for (_, target) in self.edges.lock().unwrap().iter() {
            if target.kind() == kind && ids.contains(&target.raw_id()) {
                *counts.entry(target.raw_id()).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }

    async fn list_followers(&self, target: FollowTarget) -> Result<Vec<UserId>, ApiError> {
        Ok(self.fans_of(target))
    }
}

// ── MockObjectStore ──────────────────────────────────────────────────────────

pub const MOCK_STORE_BASE_URL: &str = "https://cdn.test";

#[derive(Clone, Default)]
pub struct MockObjectStore {
    pub objects: Arc<Mutex<HashMap<String, (Bytes, String)>>>,
}

impl ObjectStore for MockObjectStore {
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<String, ApiError> {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_owned(), (bytes, content_type.to_owned()));
        Ok(format!("{MOCK_STORE_BASE_URL}/{key}"))
    }

    async fn delete(&self, key: &str) -> Result<(), ApiError> {
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }

    fn key_for_url(&self, url: &str) -> Option<String> {
        url.strip_prefix(MOCK_STORE_BASE_URL)?
            .strip_prefix('/')
            .map(str::to_owned)
    }
}

// ── Follow fixture ───────────────────────────────────────────────────────────

/// Shared repositories wired into the three follow use cases.
pub struct FollowFixture {
    pub users: MockUserRepo,
    pub artists: MockArtistRepo,
    pub follows: MockFollowRepo,
}

impl FollowFixture {
    pub fn new(users: Vec<User>, artists: Vec<Artist>) -> Self {
        Self {
            users: MockUserRepo::new(users),
            artists: MockArtistRepo::new(artists),
            follows: MockFollowRepo::empty(),
        }
    }

    pub fn follow(&self) -> FollowUseCase<MockUserRepo, MockArtistRepo, MockFollowRepo> {
        FollowUseCase {
            users: self.users.clone(),
            artists: self.artists.clone(),
            follows: self.follows.clone(),
        }
    }

    pub fn unfollow(&self) -> UnfollowUseCase<MockUserRepo, MockArtistRepo, MockFollowRepo> {
        UnfollowUseCase {
            users: self.users.clone(),
            artists: self.artists.clone(),
            follows: self.follows.clone(),
        }
    }

    pub fn followers(
        &self,
    ) -> ListFollowersUseCase<MockUserRepo, MockArtistRepo, MockFollowRepo> {
        ListFollowersUseCase {
            users: self.users.clone(),
            artists: self.artists.clone(),
            follows: self.follows.clone(),
        }
    }
}
