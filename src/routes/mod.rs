//! Route handlers.
//!
//! `health` is mounted at the root; everything else lives under the `/admin`
//! scope that `main` wraps in `AuthMiddleware`.

pub mod admin_users;
pub mod comments;
pub mod dashboard;
pub mod health;
pub mod passwords;
pub mod projects;
pub mod sessions;
pub mod tasks;

use actix_web::web;

/// Registers the admin routes. Within each resource scope `/new` comes before
/// `/{id}` so it is not taken for an id.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(dashboard::root)
        .service(dashboard::dashboard)
        .service(sessions::login_form)
        .service(sessions::login)
        .service(sessions::logout)
        .service(
            web::scope("/password")
                .service(passwords::new_form)
                .service(passwords::send_instructions)
                .service(passwords::edit_form)
                .service(passwords::reset),
        )
        .service(
            web::scope("/admin_users")
                .service(admin_users::index)
                .service(admin_users::new_form)
                .service(admin_users::create)
                .service(admin_users::show)
                .service(admin_users::edit_form)
                .service(admin_users::update)
                .service(admin_users::destroy)
                .service(admin_users::delete),
        )
        .service(
            web::scope("/projects")
                .service(projects::index)
                .service(projects::new_form)
                .service(projects::create)
                .service(projects::show)
                .service(projects::edit_form)
                .service(projects::update)
                .service(projects::destroy)
                .service(projects::delete),
        )
        .service(
            web::scope("/tasks")
                .service(tasks::index)
                .service(tasks::new_form)
                .service(tasks::create)
                .service(tasks::show)
                .service(tasks::edit_form)
                .service(tasks::update)
                .service(tasks::create_comment)
                .service(tasks::destroy)
                .service(tasks::delete),
        )
        .service(web::scope("/comments").service(comments::index));
}
