use actix_web::web;

use crate::Error;

pub mod follows;
pub mod posts;
pub mod timeline;
pub mod users;

pub fn configure(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default().error_handler(|err, _| {
        Error::invalid_argument(format!("Malformed request body: {err}")).into()
    });

    // ids in paths must be positive integers
    let path_config = web::PathConfig::default().error_handler(|err, _| {
        Error::invalid_argument(format!("Invalid request path: {err}")).into()
    });

    cfg.app_data(json_config)
        .app_data(path_config)
        .service(
            web::scope("/users")
                .service(
                    web::resource("")
                        .route(web::get().to(users::list))
                        .route(web::post().to(users::create)),
                )
                .service(web::resource("/@{name}").route(web::get().to(users::get_by_username)))
                .service(
                    web::resource("/{id}")
                        .route(web::get().to(users::get))
                        .route(web::put().to(users::rename))
                        .route(web::delete().to(users::delete)),
                )
                .service(web::resource("/{id}/followers").route(web::get().to(follows::followers)))
                .service(web::resource("/{id}/following").route(web::get().to(follows::following)))
                .service(
                    web::resource("/{id}/following/{target}")
                        .route(web::get().to(follows::is_following))
                        .route(web::put().to(follows::follow))
                        .route(web::delete().to(follows::unfollow)),
                )
                .service(web::resource("/{id}/posts").route(web::get().to(timeline::user_timeline)))
                .service(web::resource("/{id}/feed").route(web::get().to(timeline::dashboard_feed))),
        )
        .service(
            web::scope("/posts")
                .service(web::resource("").route(web::post().to(posts::publish)))
                .service(
                    web::resource("/{id}")
                        .route(web::get().to(posts::get))
                        .route(web::put().to(posts::edit))
                        .route(web::delete().to(posts::delete)),
                ),
        );
}
