//! Database repositories against an in-memory SQLite schema built from the
//! entities. SQLite ignores row locks, so these cover the edge and target
//! logic rather than lock contention.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ConnectOptions, ConnectionTrait, Database,
    DatabaseConnection, EntityTrait, Schema,
};

use soundcave_api::domain::repository::{ArtistRepository, FollowRepository, UserRepository};
use soundcave_api::domain::types::ArtistPatch;
use soundcave_api::error::ApiError;
use soundcave_api::infra::db::{DbArtistRepository, DbFollowRepository, DbUserRepository};
use soundcave_api_schema::{artists, follows, users};
use soundcave_domain::follow::{FollowTarget, TargetKind};
use soundcave_domain::id::{ArtistId, UserId};

const INDIE: i64 = 7;
const PLAIN: i64 = 8;
const ARTIST: i64 = 3;

async fn create_table<E: EntityTrait>(db: &DatabaseConnection, entity: E) {
    let backend = db.get_database_backend();
    let stmt = Schema::new(backend).create_table_from_entity(entity);
    db.execute(backend.build(&stmt)).await.unwrap();
}

async fn insert_user(db: &DatabaseConnection, id: i64, role: &str) {
    let now = Utc::now();
    users::ActiveModel {
        id: Set(id),
        full_name: Set(format!("User {id}")),
        email: Set(format!("user{id}@example.com")),
        password_hash: Set(None),
        phone: Set(None),
        location: Set(None),
        bio: Set(None),
        profile_image: Set(None),
        role: Set(role.to_owned()),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
    }
    .insert(db)
    .await
    .unwrap();
}

async fn database() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    // One connection keeps every query on the same in-memory database.
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();

    create_table(&db, users::Entity).await;
    create_table(&db, artists::Entity).await;
    create_table(&db, follows::Entity).await;

    for id in [42, 43, PLAIN] {
        insert_user(&db, id, "user").await;
    }
    insert_user(&db, INDIE, "independent").await;

    let now = Utc::now();
    artists::ActiveModel {
        id: Set(ARTIST),
        ref_user_id: Set(None),
        name: Set("Artist 3".into()),
        bio: Set("Plays in caves.".into()),
        genre: Set(None),
        country: Set(None),
        debut_year: Set(None),
        website: Set(None),
        email: Set("artist3@example.com".into()),
        phone: Set(None),
        profile_image: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
    }
    .insert(&db)
    .await
    .unwrap();
    db
}

fn indie() -> FollowTarget {
    FollowTarget::User(UserId(INDIE))
}

#[tokio::test]
async fn should_store_concurrent_follows_and_ignore_duplicates() {
    let db = database().await;
    let repo = DbFollowRepository { db: db.clone() };

    let (a, b) = tokio::join!(
        repo.follow(UserId(42), indie()),
        repo.follow(UserId(43), indie()),
    );
    let mut counts = vec![a.unwrap().unwrap(), b.unwrap().unwrap()];
    counts.sort();
    assert_eq!(counts, vec![1, 2]);
    assert_eq!(repo.count(indie()).await.unwrap(), 2);

    let duplicate = repo.follow(UserId(42), indie()).await.unwrap();
    assert_eq!(duplicate, None);
    assert_eq!(repo.count(indie()).await.unwrap(), 2);

    let mut fans = repo.list_followers(indie()).await.unwrap();
    fans.sort();
    assert_eq!(fans, vec![UserId(42), UserId(43)]);

    let totals = repo
        .count_many(TargetKind::User, &[INDIE, PLAIN])
        .await
        .unwrap();
    assert_eq!(totals.get(&INDIE), Some(&2));
    assert_eq!(totals.get(&PLAIN), None);
}

#[tokio::test]
async fn should_remove_edge_once_on_unfollow() {
    let db = database().await;
    let repo = DbFollowRepository { db };
    repo.follow(UserId(42), indie()).await.unwrap();
    repo.follow(UserId(43), indie()).await.unwrap();

    assert_eq!(repo.unfollow(UserId(42), indie()).await.unwrap(), Some(1));
    assert_eq!(repo.unfollow(UserId(42), indie()).await.unwrap(), None);
    assert_eq!(repo.list_followers(indie()).await.unwrap(), vec![UserId(43)]);
}

#[tokio::test]
async fn should_keep_user_and_artist_targets_apart() {
    let db = database().await;
    let repo = DbFollowRepository { db };
    let artist = FollowTarget::Artist(ArtistId(ARTIST));

    assert_eq!(repo.follow(UserId(42), artist).await.unwrap(), Some(1));
    assert_eq!(repo.count(artist).await.unwrap(), 1);
    assert_eq!(
        repo.count(FollowTarget::User(UserId(ARTIST))).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn should_recheck_target_inside_follow_transaction() {
    let db = database().await;
    let follows = DbFollowRepository { db: db.clone() };

    let plain = follows
        .follow(UserId(42), FollowTarget::User(UserId(PLAIN)))
        .await;
    assert!(matches!(plain, Err(ApiError::NotFollowable)));

    let missing = follows
        .follow(UserId(42), FollowTarget::Artist(ArtistId(404)))
        .await;
    assert!(matches!(missing, Err(ApiError::ArtistNotFound)));

    let users = DbUserRepository { db: db.clone() };
    assert!(users.soft_delete(UserId(INDIE)).await.unwrap());
    let deleted_user = follows.follow(UserId(42), indie()).await;
    assert!(matches!(deleted_user, Err(ApiError::UserNotFound)));

    let artists = DbArtistRepository { db };
    assert!(artists.soft_delete(ArtistId(ARTIST)).await.unwrap());
    let deleted_artist = follows
        .follow(UserId(42), FollowTarget::Artist(ArtistId(ARTIST)))
        .await;
    assert!(matches!(deleted_artist, Err(ApiError::ArtistNotFound)));
    assert_eq!(follows.count(indie()).await.unwrap(), 0);
}

#[tokio::test]
async fn should_update_and_soft_delete_artist_rows() {
    let db = database().await;
    let repo = DbArtistRepository { db };

    let updated = repo
        .update(
            ArtistId(ARTIST),
            &ArtistPatch {
                genre: Some("jazz".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.genre.as_deref(), Some("jazz"));
    assert_eq!(updated.name, "Artist 3");

    assert!(repo.soft_delete(ArtistId(ARTIST)).await.unwrap());
    assert!(!repo.soft_delete(ArtistId(ARTIST)).await.unwrap());
    assert!(repo.find_by_id(ArtistId(ARTIST)).await.unwrap().is_none());
    let gone = repo
        .update(
            ArtistId(ARTIST),
            &ArtistPatch {
                name: Some("Ghost".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(gone.is_none());
}
