use gwiit_core::{Reference, RelationshipPolicies, UserStore, UserStoreError};

/// Runs when an organization or site is removed, applying the configured
/// on-delete policy to the users pointing at it.
pub struct ReleaseReferenceUseCase<'a, U>
where
    U: UserStore,
{
    user_store: &'a U,
    policies: RelationshipPolicies,
}

impl<'a, U> ReleaseReferenceUseCase<'a, U>
where
    U: UserStore,
{
    pub fn new(user_store: &'a U, policies: RelationshipPolicies) -> Self {
        Self {
            user_store,
            policies,
        }
    }

    /// Returns how many users were affected. A `Restrict` policy fails with
    /// `ReferencedByUsers` while any user still points at the parent.
    #[tracing::instrument(name = "ReleaseReferenceUseCase::execute", skip(self), fields(reference = %reference))]
    pub async fn execute(&self, reference: Reference) -> Result<u64, UserStoreError> {
        let policy = self.policies.policy_for(reference);
        let affected = self.user_store.release_reference(reference, policy).await?;

        tracing::info!(?policy, affected, "Released user references");
        Ok(affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gwiit_adapters::HashMapUserStore;
    use gwiit_core::{
        HashedPassword, LoginIdentifiers, NewUser, OnDelete, OrganizationId, SiteId,
    };
    use secrecy::Secret;

    fn member(username: &str, org: i64, site: i64) -> NewUser {
        NewUser {
            identifiers: LoginIdentifiers::parse(None, Some(username), None, None).unwrap(),
            password_hash: HashedPassword::new(Secret::from("digest".to_string())),
            first_name: None,
            last_name: None,
            organization_id: Some(OrganizationId::new(org)),
            site_id: Some(SiteId::new(site)),
            created_by_id: None,
            is_active: true,
            is_staff: false,
            is_superuser: false,
        }
    }

    #[tokio::test]
    async fn default_policy_clears_the_reference() {
        let store = HashMapUserStore::new();
        let user = store.add_user(member("jdoe", 2, 5)).await.unwrap();

        let affected = ReleaseReferenceUseCase::new(&store, RelationshipPolicies::default())
            .execute(Reference::Site(SiteId::new(5)))
            .await
            .unwrap();

        assert_eq!(affected, 1);
        let user = store.get_user(user.id).await.unwrap();
        assert_eq!(user.site_id, None);
        assert!(user.is_active);
    }

    #[tokio::test]
    async fn policies_are_chosen_per_relationship() {
        let store = HashMapUserStore::new();
        store.add_user(member("jdoe", 2, 5)).await.unwrap();
        let policies = RelationshipPolicies {
            organization: OnDelete::Restrict,
            site: OnDelete::Cascade,
        };
        let use_case = ReleaseReferenceUseCase::new(&store, policies);

        let restricted = use_case
            .execute(Reference::Organization(OrganizationId::new(2)))
            .await;
        assert_eq!(restricted, Err(UserStoreError::ReferencedByUsers(1)));

        let cascaded = use_case.execute(Reference::Site(SiteId::new(5))).await;
        assert_eq!(cascaded, Ok(1));
    }

    #[tokio::test]
    async fn cascade_never_leaves_the_site_without_a_superuser() {
        let store = HashMapUserStore::new();
        let root = store
            .add_user(NewUser {
                is_staff: true,
                is_superuser: true,
                ..member("root", 2, 5)
            })
            .await
            .unwrap();
        let policies = RelationshipPolicies {
            organization: OnDelete::SetNull,
            site: OnDelete::Cascade,
        };

        let affected = ReleaseReferenceUseCase::new(&store, policies)
            .execute(Reference::Site(SiteId::new(5)))
            .await
            .unwrap();

        assert_eq!(affected, 1);
        let root = store.get_user(root.id).await.unwrap();
        assert!(root.is_active);
        assert_eq!(root.site_id, None);
    }

    #[tokio::test]
    async fn unreferenced_parent_affects_nobody() {
        let store = HashMapUserStore::new();
        store.add_user(member("jdoe", 2, 5)).await.unwrap();

        let affected = ReleaseReferenceUseCase::new(&store, RelationshipPolicies::default())
            .execute(Reference::Organization(OrganizationId::new(3)))
            .await
            .unwrap();
        assert_eq!(affected, 0);
    }
}
