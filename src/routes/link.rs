use actix_web::web;

use crate::handlers::{redirect_handler, shorten_handler};

// Configure link routes; the catch-all redirect must come last
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api").route("/shorten", web::post().to(shorten_handler)));
    cfg.route("/{id}", web::get().to(redirect_handler));
}
