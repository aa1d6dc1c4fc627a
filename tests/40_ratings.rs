mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

use common::{data, TestServer};

#[tokio::test]
async fn second_rating_overwrites_the_first() -> Result<()> {
    let server = TestServer::spawn().await?;
    let admin = server.admin_token().await?;
    let movie = server.create_movie(&admin, json!({ "title": "Alien" })).await?;
    let (user, token) = server.user_with_token("hudson", "pw").await?;

    for stars in [4, 2] {
        let res = server
            .post("/ratings", &token, json!({ "movieid": movie, "userid": user, "stars": stars }))
            .await?;
        assert_eq!(res.status(), StatusCode::OK);
    }

    let ratings = data(server.get(&format!("/ratings/{}", user), &token).await?).await?;
    assert_eq!(ratings, json!([{ "movieid": movie, "userid": user, "stars": 2 }]));
    Ok(())
}

#[tokio::test]
async fn rating_requires_known_movie_and_valid_stars() -> Result<()> {
    let server = TestServer::spawn().await?;
    let admin = server.admin_token().await?;
    let movie = server.create_movie(&admin, json!({ "title": "Alien" })).await?;
    let (user, token) = server.user_with_token("gorman", "pw").await?;

    let res = server
        .post("/ratings", &token, json!({ "movieid": 999, "userid": user, "stars": 3 }))
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = server
        .post("/ratings", &token, json!({ "movieid": movie, "userid": user, "stars": 6 }))
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = server
        .post("/ratings", &token, json!({ "movieid": movie, "userid": user, "stars": "lots" }))
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // A bad body is reported before the movie lookup
    let res = server
        .post("/ratings", &token, json!({ "movieid": 999, "userid": user, "stars": 9 }))
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let ratings = data(server.get(&format!("/ratings/{}", user), &token).await?).await?;
    assert_eq!(ratings, json!([]));
    Ok(())
}

#[tokio::test]
async fn users_cannot_rate_for_someone_else() -> Result<()> {
    let server = TestServer::spawn().await?;
    let admin = server.admin_token().await?;
    let movie = server.create_movie(&admin, json!({ "title": "Alien" })).await?;
    let (_, token) = server.user_with_token("burke", "pw").await?;
    let (victim, _) = server.user_with_token("newt", "pw").await?;

    let res = server
        .post("/ratings", &token, json!({ "movieid": movie, "userid": victim, "stars": 0 }))
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = server.get(&format!("/ratings/{}", victim), &token).await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    Ok(())
}
