use std::sync::Arc;

use actix_web::web;

mod id_allocator;
mod redirect;
mod shorten;

pub use id_allocator::IdAllocator;
pub use redirect::RedirectResolver;
pub use shorten::{BulkOutcome, ShortenOutcome, ShortenRequest, ShortenService, ShortenSettings};

use crate::{config::Config, stores::LinkStore};

/// Services shared by every worker
#[derive(Clone)]
pub struct Services {
    pub shorten: web::Data<ShortenService>,
    pub resolver: web::Data<RedirectResolver>,
}

impl Services {
    pub fn new(store: Arc<dyn LinkStore>, config: &Config) -> Self {
        let allocator = IdAllocator::from_config(&config.shortener);
        let settings = ShortenSettings::from_config(config);

        Self::from_parts(store, allocator, settings)
    }

    pub fn from_parts(
        store: Arc<dyn LinkStore>,
        allocator: IdAllocator,
        settings: ShortenSettings,
    ) -> Self {
        Self {
            shorten: web::Data::new(ShortenService::new(store.clone(), allocator, settings)),
            resolver: web::Data::new(RedirectResolver::new(store)),
        }
    }

    /// Service Register
    pub fn register(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.shorten.clone());
        cfg.app_data(self.resolver.clone());
    }
}
