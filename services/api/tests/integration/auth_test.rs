use soundcave_api::error::ApiError;
use soundcave_api::usecase::auth::{LoginInput, LoginUseCase};
use soundcave_api::usecase::user::{CreateUserInput, CreateUserUseCase};
use soundcave_domain::id::UserId;
use soundcave_domain::user::Role;
use soundcave_testing::auth::test_keys;

use crate::helpers::{MockUserRepo, test_hasher, test_user};

fn signup(email: &str, password: &str) -> CreateUserInput {
    CreateUserInput {
        full_name: "Cave Fan".into(),
        email: email.into(),
        password: password.into(),
        phone: Some("  ".into()),
        role: Role::User,
    }
}

fn login_usecase(repo: MockUserRepo) -> LoginUseCase<MockUserRepo> {
    LoginUseCase {
        repo,
        keys: test_keys(),
        hasher: test_hasher(),
    }
}

// ── Register ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_register_user_with_hashed_password() {
    let repo = MockUserRepo::empty();
    let usecase = CreateUserUseCase {
        repo: repo.clone(),
        hasher: test_hasher(),
    };
    let user = usecase
        .execute(signup("fan@example.com", "cave-pass"))
        .await
        .unwrap();

    assert_eq!(user.role, Role::User);
    assert_eq!(user.phone, None, "blank phone is stored as NULL");
    let stored = repo.get(user.id.0).unwrap();
    let hash = stored.password_hash.unwrap();
    assert_ne!(hash, "cave-pass");
    assert!(hash.starts_with("$2"));
}

#[tokio::test]
async fn should_reject_duplicate_email_on_register() {
    let repo = MockUserRepo::empty();
    let usecase = CreateUserUseCase {
        repo,
        hasher: test_hasher(),
    };
    usecase
        .execute(signup("fan@example.com", "cave-pass"))
        .await
        .unwrap();
    let result = usecase.execute(signup("fan@example.com", "other-pass")).await;
    assert!(matches!(result, Err(ApiError::EmailAlreadyExists)));
}

#[tokio::test]
async fn should_reject_short_password_on_register() {
    let usecase = CreateUserUseCase {
        repo: MockUserRepo::empty(),
        hasher: test_hasher(),
    };
    let result = usecase.execute(signup("fan@example.com", "abc")).await;
    assert!(matches!(result, Err(ApiError::InvalidInput(_))));
}

#[tokio::test]
async fn should_reject_email_without_at_sign() {
    let usecase = CreateUserUseCase {
        repo: MockUserRepo::empty(),
        hasher: test_hasher(),
    };
    let result = usecase.execute(signup("fan.example.com", "cave-pass")).await;
    assert!(matches!(result, Err(ApiError::InvalidInput(_))));
}

// ── Login ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_issue_token_that_validates_to_same_identity() {
    let repo = MockUserRepo::empty();
    let user = CreateUserUseCase {
        repo: repo.clone(),
        hasher: test_hasher(),
    }
    .execute(signup("fan@example.com", "cave-pass"))
    .await
    .unwrap();

    let output = login_usecase(repo)
        .execute(LoginInput {
            email: " fan@example.com".into(),
            password: "cave-pass".into(),
        })
        .await
        .unwrap();
    assert_eq!(output.user.id, user.id);

    let claims = test_keys().validate(&output.token.token).unwrap();
    assert_eq!(claims.sub.parse::<UserId>().unwrap(), user.id);
    assert_eq!(claims.email, "fan@example.com");
    assert_eq!(claims.role, Role::User);
    assert_eq!(claims.exp, output.token.expires_at);
}

#[tokio::test]
async fn should_not_distinguish_unknown_email_from_wrong_password() {
    let repo = MockUserRepo::empty();
    CreateUserUseCase {
        repo: repo.clone(),
        hasher: test_hasher(),
    }
    .execute(signup("fan@example.com", "cave-pass"))
    .await
    .unwrap();
    let usecase = login_usecase(repo);

    let wrong_password = usecase
        .execute(LoginInput {
            email: "fan@example.com".into(),
            password: "not-it".into(),
        })
        .await
        .err()
        .unwrap();
    let unknown_email = usecase
        .execute(LoginInput {
            email: "nobody@example.com".into(),
            password: "cave-pass".into(),
        })
        .await
        .err()
        .unwrap();

    assert!(matches!(wrong_password, ApiError::InvalidLogin));
    assert!(matches!(unknown_email, ApiError::InvalidLogin));
    assert_eq!(wrong_password.to_string(), unknown_email.to_string());
}

#[tokio::test]
async fn should_refuse_password_login_for_provider_accounts() {
    let provider_user = test_user(5, Role::User);
    assert!(provider_user.password_hash.is_none());
    let result = login_usecase(MockUserRepo::new(vec![provider_user]))
        .execute(LoginInput {
            email: "user5@example.com".into(),
            password: "anything".into(),
        })
        .await;
    assert!(matches!(result, Err(ApiError::PasswordLoginUnavailable)));
}
