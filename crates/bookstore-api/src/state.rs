//! Application state and sub-state extractors.
//!
//! AppState is split into sub-states so handlers extract only what they need
//! via Axum's `FromRef`.

use axum::extract::FromRef;
use bookstore_core::Config;
use bookstore_db::{
    AuthorRepository, BookRepository, CatalogRepository, CategoryRepository, ContactRepository,
    IdentityRepository, WishlistRepository,
};
use bookstore_storage::UploadStore;
use sqlx::PgPool;
use std::sync::Arc;

use crate::auth::IdentityLookup;
use crate::services::{BookService, TaxonomyService};

/// Database pool and the repositories behind the public pages.
#[derive(Clone)]
pub struct DbState {
    pub pool: PgPool,
    pub catalog: CatalogRepository,
    pub wishlists: WishlistRepository,
    pub contacts: ContactRepository,
}

/// Identity lookups and account creation.
#[derive(Clone)]
pub struct AuthState {
    pub lookup: Arc<dyn IdentityLookup>,
    pub identities: IdentityRepository,
}

/// Back-office write services.
#[derive(Clone)]
pub struct AdminState {
    pub books: BookService,
    pub taxonomy: TaxonomyService,
    pub uploads: Arc<UploadStore>,
}

pub struct AppState {
    pub db: DbState,
    pub auth: AuthState,
    pub admin: AdminState,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config, pool: PgPool, uploads: Arc<UploadStore>) -> Self {
        let identities = IdentityRepository::new(pool.clone());

        AppState {
            db: DbState {
                catalog: CatalogRepository::new(pool.clone()),
                wishlists: WishlistRepository::new(pool.clone()),
                contacts: ContactRepository::new(pool.clone()),
                pool: pool.clone(),
            },
            auth: AuthState {
                lookup: Arc::new(identities.clone()),
                identities,
            },
            admin: AdminState {
                books: BookService::new(BookRepository::new(pool.clone()), uploads.clone()),
                taxonomy: TaxonomyService::new(
                    AuthorRepository::new(pool.clone()),
                    CategoryRepository::new(pool),
                ),
                uploads,
            },
            config,
        }
    }
}

impl FromRef<Arc<AppState>> for DbState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.db.clone()
    }
}

impl FromRef<Arc<AppState>> for AuthState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.auth.clone()
    }
}

impl FromRef<Arc<AppState>> for AdminState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.admin.clone()
    }
}
