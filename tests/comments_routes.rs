use bulletin_api::auth::routes::{RegisterResponse, TokenResponse, login, register};
use bulletin_api::models::ContentItem;
use bulletin_api::routes::comments::{
    create_comment, delete_comment, edit_comment, get_comment, like_comment, list_comments,
};
use bulletin_api::test_support::{TestDatabase, TestFixtures, TestRocketBuilder, test_auth_state};
use rocket::http::{Header, Status};
use rocket::local::asynchronous::Client;
use rocket::routes;

async fn register_with_token(client: &Client, email: &str, password: &str) -> RegisterResponse {
    let response = client
        .post("/api/auth/register")
        .json(&serde_json::json!({
            "firstName": "Test",
            "lastName": "User",
            "email": email,
            "password": password,
            "confirmPassword": password,
        }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Created);
    response.into_json().await.expect("register payload")
}

#[tokio::test]
async fn comment_lifecycle_with_likes_and_authorization() {
    let test_db = TestDatabase::new()
        .await
        .expect("failed to provision test database");
    let auth_state = test_auth_state();

    let fixtures = TestFixtures::new(test_db.pool());
    let admin_hash = auth_state
        .password_service
        .hash_password("admin-secret")
        .expect("hash");
    fixtures
        .insert_user("root@example.com", "Site", "Admin", "admin", &admin_hash)
        .await
        .expect("insert admin");

    {
    let client = TestRocketBuilder::new()
        .manage_pg_pool(test_db.pool_clone())
        .manage_auth_state(auth_state)
        .mount_api_routes(routes![
            register,
            login,
            list_comments,
            get_comment,
            create_comment,
            edit_comment,
            like_comment,
            delete_comment
        ])
        .async_client()
        .await;

    let alice = register_with_token(&client, "alice@example.com", "secret1").await;
    let bob = register_with_token(&client, "bob@example.com", "secret2").await;

    let response = client
        .post("/api/comments")
        .header(Header::new("x-access-token", alice.token.clone()))
        .json(&serde_json::json!({ "content": "nice post" }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Created);
    let posted: ContentItem = response.into_json().await.expect("created comment");
    assert_eq!(posted.content, "nice post");
    assert_eq!(posted.author_id, alice.user.id);
    assert!(posted.likes.is_empty());

    // Like toggling is idempotent across the pair of calls.
    let response = client
        .post(format!("/api/comments/{}/like", posted.id))
        .header(Header::new("x-access-token", bob.token.clone()))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let liked: ContentItem = response.into_json().await.expect("liked comment");
    assert_eq!(liked.likes, vec![bob.user.id]);

    let response = client
        .post(format!("/api/comments/{}/like", posted.id))
        .header(Header::new("x-access-token", bob.token.clone()))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let unliked: ContentItem = response.into_json().await.expect("unliked comment");
    assert!(unliked.likes.is_empty());

    // Only the author may edit.
    let response = client
        .put("/api/comments/update-comment")
        .header(Header::new("x-access-token", bob.token.clone()))
        .json(&serde_json::json!({
            "newContent": "hijacked",
            "commentId": posted.id,
        }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Unauthorized);

    let response = client
        .put("/api/comments/update-comment")
        .header(Header::new("x-access-token", alice.token.clone()))
        .json(&serde_json::json!({
            "newContent": "nice post indeed",
            "commentId": posted.id,
        }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let edited: ContentItem = response.into_json().await.expect("edited comment");
    assert_eq!(edited.content, "nice post indeed");

    // Non-author, non-admin deletion is refused; an admin's goes through.
    let response = client
        .delete(format!("/api/comments/{}", posted.id))
        .header(Header::new("x-access-token", bob.token.clone()))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Unauthorized);

    let response = client
        .post("/api/auth/login")
        .json(&serde_json::json!({ "email": "root@example.com", "password": "admin-secret" }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let admin_login: TokenResponse = response.into_json().await.expect("admin login");

    let response = client
        .delete(format!("/api/comments/{}", posted.id))
        .header(Header::new("x-access-token", admin_login.token))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);

    let response = client
        .get(format!("/api/comments/{}", posted.id))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NotFound);

    }
    test_db.close().await.expect("failed to drop test database");
}
