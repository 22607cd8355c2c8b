/// HTTP server factory and configuration.
/// Provides a reusable function to create and configure the HTTP server
/// for use in both the main binary and tests.
use actix_web::{middleware, web, App, HttpServer};

use crate::auth::AuthConfig;
use crate::db::DbPool;
use crate::handlers;

/// Register every route on the given service config. Shared between
/// the real server, the test server, and in-process test apps.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::index))
        .route("/health", web::get().to(handlers::health))
        .service(
            web::scope("/api")
                .route("/auth/login", web::post().to(handlers::login))
                .route(
                    "/complaints/analytics",
                    web::get().to(handlers::get_analytics),
                )
                .route("/complaints", web::post().to(handlers::create_complaint))
                .route("/complaints", web::get().to(handlers::list_complaints))
                .route(
                    "/complaints/{id}",
                    web::patch().to(handlers::update_complaint),
                )
                .route("/branches", web::get().to(handlers::list_branches))
                .route("/branches", web::post().to(handlers::create_branch))
                .route("/branches/{id}", web::delete().to(handlers::delete_branch))
                .route("/users", web::get().to(handlers::list_users))
                .route("/users", web::post().to(handlers::create_user)),
        );
}

/// Create a configured HTTP server
///
/// Takes a database pool, the auth configuration, and a bind address,
/// then returns a fully configured `HttpServer` ready to be run.
pub fn create_http_server(
    pool: web::Data<DbPool>,
    auth_config: web::Data<AuthConfig>,
    bind_addr: &str,
) -> std::io::Result<actix_web::dev::Server> {
    let server = HttpServer::new(move || {
        App::new()
            .app_data(pool.clone())
            .app_data(auth_config.clone())
            .wrap(middleware::Logger::default())
            .configure(configure_routes)
    })
    .bind(bind_addr)?
    .run();

    Ok(server)
}

/// Create a test HTTP server over an in-memory database
///
/// Binds to a random available port and returns (server, bind_address).
pub fn create_test_http_server() -> std::io::Result<(actix_web::dev::Server, String)> {
    let pool = web::Data::new(crate::db::create_test_pool());
    let auth_config = web::Data::new(AuthConfig {
        jwt_secret: "test-secret".to_string(),
    });

    let server = HttpServer::new(move || {
        App::new()
            .app_data(pool.clone())
            .app_data(auth_config.clone())
            .wrap(middleware::Logger::default())
            .configure(configure_routes)
    })
    .bind("127.0.0.1:0")?;

    let addrs = server.addrs();
    let addr_str = addrs
        .first()
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, "No bind address found"))?
        .to_string();

    let server = server.run();

    Ok((server, addr_str))
}
