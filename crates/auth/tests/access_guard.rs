//! Access Guard against a real (in-memory SQLite) store.

use auth::{AccessDenied, AccessError, AccessGuard};
use chrono::Utc;
use entity::{project_members, projects, sea_orm_active_enums::UserRole, users};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use uuid::Uuid;

async fn insert_user(db: &DatabaseConnection, name: &str) -> Uuid {
    let now = Utc::now();
    let id = Uuid::new_v4();
    users::ActiveModel {
        id:            Set(id),
        name:          Set(name.to_string()),
        email:         Set(format!("{}-{}@example.com", name.to_lowercase(), id)),
        password_hash: Set("$argon2id$placeholder".to_string()),
        role:          Set(UserRole::Developer),
        created_at:    Set(now),
        updated_at:    Set(now),
    }
    .insert(db)
    .await
    .unwrap();
    id
}

async fn insert_project(db: &DatabaseConnection, created_by: Uuid, members: &[Uuid]) -> Uuid {
    let now = Utc::now();
    let id = Uuid::new_v4();
    projects::ActiveModel {
        id:          Set(id),
        title:       Set("Apollo".to_string()),
        description: Set(String::new()),
        created_by:  Set(created_by),
        deadline:    Set(None),
        created_at:  Set(now),
        updated_at:  Set(now),
    }
    .insert(db)
    .await
    .unwrap();

    for member in members {
        project_members::ActiveModel {
            project_id: Set(id),
            user_id: Set(*member),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap();
    }
    id
}

#[tokio::test]
async fn test_authorize_creator_member_and_outsider() {
    let db = migration::connect_in_memory().await.unwrap();
    let u1 = insert_user(&db, "Ada").await;
    let u2 = insert_user(&db, "Grace").await;
    let u3 = insert_user(&db, "Linus").await;
    let project_id = insert_project(&db, u1, &[u2]).await;

    let guard = AccessGuard::new(&db);

    let access = guard.authorize(project_id, u1).await.unwrap();
    assert_eq!(access.project.id, project_id);
    assert_eq!(access.members, vec![u2]);

    assert!(guard.authorize(project_id, u2).await.is_ok());

    match guard.authorize(project_id, u3).await {
        Err(AccessError::Denied(AccessDenied::NotMember)) => {},
        other => panic!("expected NotMember, got {:?}", other),
    }
    match guard.authorize_chat(project_id, u3).await {
        Err(AccessError::Denied(AccessDenied::NotChatMember)) => {},
        other => panic!("expected NotChatMember, got {:?}", other),
    }
}

#[tokio::test]
async fn test_authorize_missing_project() {
    let db = migration::connect_in_memory().await.unwrap();
    let user = insert_user(&db, "Ada").await;

    let result = AccessGuard::new(&db)
        .authorize(Uuid::new_v4(), user)
        .await;
    assert!(matches!(
        result,
        Err(AccessError::Denied(AccessDenied::ProjectNotFound))
    ));
}

#[tokio::test]
async fn test_member_order_is_insertion_order() {
    let db = migration::connect_in_memory().await.unwrap();
    let owner = insert_user(&db, "Owner").await;
    let c = insert_user(&db, "Charlie").await;
    let a = insert_user(&db, "Alice").await;
    let b = insert_user(&db, "Bob").await;
    let project_id = insert_project(&db, owner, &[c, a, b]).await;

    let access = AccessGuard::new(&db)
        .authorize(project_id, owner)
        .await
        .unwrap();
    assert_eq!(access.members, vec![c, a, b]);
}
