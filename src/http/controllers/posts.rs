use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::http::error::post_id;
use crate::http::forms::{EditPost, PublishPost};
use crate::{App, Result};

#[tracing::instrument(skip(app), name = "http.posts.publish")]
pub async fn publish(app: web::Data<App>, form: web::Json<PublishPost>) -> Result<HttpResponse> {
    form.validate()?;

    let post = app.posts.publish(form.author_id, &form.content).await?;
    Ok(HttpResponse::Created().json(post))
}

#[tracing::instrument(skip(app), name = "http.posts.get")]
pub async fn get(app: web::Data<App>, path: web::Path<u64>) -> Result<HttpResponse> {
    let post = app.posts.get(post_id(path.into_inner())?).await?;
    Ok(HttpResponse::Ok().json(post))
}

#[tracing::instrument(skip(app), name = "http.posts.edit")]
pub async fn edit(
    app: web::Data<App>,
    path: web::Path<u64>,
    form: web::Json<EditPost>,
) -> Result<HttpResponse> {
    form.validate()?;

    let post = app
        .posts
        .edit(post_id(path.into_inner())?, &form.content)
        .await?;

    Ok(HttpResponse::Ok().json(post))
}

#[tracing::instrument(skip(app), name = "http.posts.delete")]
pub async fn delete(app: web::Data<App>, path: web::Path<u64>) -> Result<HttpResponse> {
    app.posts.delete(post_id(path.into_inner())?).await?;
    Ok(HttpResponse::NoContent().finish())
}
