use actix_web::{web, HttpResponse};

use crate::http::error::user_id;
use crate::http::forms::FollowStatus;
use crate::{App, Result};

#[tracing::instrument(skip(app), name = "http.follows.followers")]
pub async fn followers(app: web::Data<App>, path: web::Path<u64>) -> Result<HttpResponse> {
    let users = app.follows.followers(user_id(path.into_inner())?).await?;
    Ok(HttpResponse::Ok().json(users))
}

#[tracing::instrument(skip(app), name = "http.follows.following")]
pub async fn following(app: web::Data<App>, path: web::Path<u64>) -> Result<HttpResponse> {
    let users = app.follows.following(user_id(path.into_inner())?).await?;
    Ok(HttpResponse::Ok().json(users))
}

#[tracing::instrument(skip(app), name = "http.follows.is_following")]
pub async fn is_following(
    app: web::Data<App>,
    path: web::Path<(u64, u64)>,
) -> Result<HttpResponse> {
    let (follower, target) = path.into_inner();
    let following = app
        .follows
        .is_following(user_id(follower)?, user_id(target)?)
        .await?;

    Ok(HttpResponse::Ok().json(FollowStatus { following }))
}

#[tracing::instrument(skip(app), name = "http.follows.follow")]
pub async fn follow(app: web::Data<App>, path: web::Path<(u64, u64)>) -> Result<HttpResponse> {
    let (follower, target) = path.into_inner();
    app.follows
        .follow(user_id(follower)?, user_id(target)?)
        .await?;

    Ok(HttpResponse::NoContent().finish())
}

#[tracing::instrument(skip(app), name = "http.follows.unfollow")]
pub async fn unfollow(app: web::Data<App>, path: web::Path<(u64, u64)>) -> Result<HttpResponse> {
    let (follower, target) = path.into_inner();
    app.follows
        .unfollow(user_id(follower)?, user_id(target)?)
        .await?;

    Ok(HttpResponse::NoContent().finish())
}
