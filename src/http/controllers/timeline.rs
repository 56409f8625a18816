use actix_web::{web, HttpResponse};

use crate::http::error::user_id;
use crate::{App, Result};

#[tracing::instrument(skip(app), name = "http.timeline.user")]
pub async fn user_timeline(app: web::Data<App>, path: web::Path<u64>) -> Result<HttpResponse> {
    let posts = app.timeline.user_timeline(user_id(path.into_inner())?).await?;
    Ok(HttpResponse::Ok().json(posts))
}

#[tracing::instrument(skip(app), name = "http.timeline.dashboard")]
pub async fn dashboard_feed(app: web::Data<App>, path: web::Path<u64>) -> Result<HttpResponse> {
    let posts = app.timeline.dashboard_feed(user_id(path.into_inner())?).await?;
    Ok(HttpResponse::Ok().json(posts))
}
