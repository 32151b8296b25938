use actix_files::Files;
use actix_web::{middleware, web, App, HttpResponse, HttpServer};
use std::env;

async fn healthz() -> HttpResponse {
    HttpResponse::Ok().body("ok")
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    // Get port and bundle directory from environment
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);
    let dist = env::var("DIST_DIR").unwrap_or_else(|_| "./dist".to_string());

    println!("Starting server on 0.0.0.0:{port}, serving {dist}");

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .route("/healthz", web::get().to(healthz))
            .service(Files::new("/", dist.clone()).index_file("index.html"))
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
