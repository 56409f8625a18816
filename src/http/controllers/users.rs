use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::http::error::user_id;
use crate::http::forms::{CreateUser, CreatedUser, RenameUser};
use crate::{App, Result};

#[tracing::instrument(skip(app), name = "http.users.list")]
pub async fn list(app: web::Data<App>) -> Result<HttpResponse> {
    let users = app.users.list().await?;
    Ok(HttpResponse::Ok().json(users))
}

#[tracing::instrument(skip(app), name = "http.users.create")]
pub async fn create(app: web::Data<App>, form: web::Json<CreateUser>) -> Result<HttpResponse> {
    form.validate()?;

    let id = app.users.create(&form.username).await?;
    Ok(HttpResponse::Created().json(CreatedUser { id }))
}

#[tracing::instrument(skip(app), name = "http.users.get")]
pub async fn get(app: web::Data<App>, path: web::Path<u64>) -> Result<HttpResponse> {
    let user = app.users.get(user_id(path.into_inner())?).await?;
    Ok(HttpResponse::Ok().json(user))
}

#[tracing::instrument(skip(app), name = "http.users.get_by_username")]
pub async fn get_by_username(
    app: web::Data<App>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let user = app.users.get_by_username(path.as_str()).await?;
    Ok(HttpResponse::Ok().json(user))
}

#[tracing::instrument(skip(app), name = "http.users.rename")]
pub async fn rename(
    app: web::Data<App>,
    path: web::Path<u64>,
    form: web::Json<RenameUser>,
) -> Result<HttpResponse> {
    form.validate()?;

    app.users
        .rename(user_id(path.into_inner())?, &form.username)
        .await?;

    Ok(HttpResponse::NoContent().finish())
}

#[tracing::instrument(skip(app), name = "http.users.delete")]
pub async fn delete(app: web::Data<App>, path: web::Path<u64>) -> Result<HttpResponse> {
    app.users.delete(user_id(path.into_inner())?).await?;
    Ok(HttpResponse::NoContent().finish())
}
