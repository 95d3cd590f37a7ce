use std::sync::Arc;

use gwiit_core::{EmailClient, PasswordGenerator, PasswordHasher, RelationshipPolicies, UserStore};

/// Everything the user routes need, shared behind one `Arc`.
pub struct AppState<U, H, G, E> {
    pub user_store: U,
    pub password_hasher: H,
    pub password_generator: G,
    pub email_client: E,
    pub relationships: RelationshipPolicies,
}

impl<U, H, G, E> AppState<U, H, G, E>
where
    U: UserStore,
    H: PasswordHasher,
    G: PasswordGenerator,
    E: EmailClient,
{
    pub fn new(
        user_store: U,
        password_hasher: H,
        password_generator: G,
        email_client: E,
        relationships: RelationshipPolicies,
    ) -> Arc<Self> {
        Arc::new(Self {
            user_store,
            password_hasher,
            password_generator,
            email_client,
            relationships,
        })
    }
}
