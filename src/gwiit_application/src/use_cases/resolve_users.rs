use chrono::Utc;
use gwiit_core::{
    DEFAULT_RECENT_DAYS, OrganizationId, SiteId, User, UserFilter, UserId, UserQuery, UserStore,
    UserStoreError, joined_since,
};

/// Read-side queries scoping users by organization, site and join date.
///
/// Every method returns users in ascending id order. Unknown identifiers
/// produce an empty list, never an error.
pub struct AssociationResolver<'a, U>
where
    U: UserStore,
{
    user_store: &'a U,
}

impl<'a, U> AssociationResolver<'a, U>
where
    U: UserStore,
{
    pub fn new(user_store: &'a U) -> Self {
        Self { user_store }
    }

    #[tracing::instrument(name = "AssociationResolver::find", skip(self))]
    pub async fn find(&self, query: &UserQuery) -> Result<Vec<User>, UserStoreError> {
        self.user_store.find_users(query).await
    }

    pub async fn active_users(&self) -> Result<Vec<User>, UserStoreError> {
        self.find(&UserQuery::active()).await
    }

    pub async fn inactive_users(&self) -> Result<Vec<User>, UserStoreError> {
        self.find(&UserQuery::inactive()).await
    }

    /// Active users belonging to both the organization and the site.
    pub async fn users_by_organization_and_site(
        &self,
        organization_id: OrganizationId,
        site_id: SiteId,
    ) -> Result<Vec<User>, UserStoreError> {
        self.find(&UserQuery::organization_and_site(organization_id, site_id))
            .await
    }

    /// Users who joined in the last `days` days (30 when `None`).
    pub async fn recently_joined(&self, days: Option<u32>) -> Result<Vec<User>, UserStoreError> {
        self.find(&recent(days)).await
    }

    pub async fn recently_joined_from_site(
        &self,
        site_id: SiteId,
        days: Option<u32>,
    ) -> Result<Vec<User>, UserStoreError> {
        self.find(&recent(days).filter(UserFilter::Site(site_id)))
            .await
    }

    pub async fn recently_joined_from_organization(
        &self,
        organization_id: OrganizationId,
        days: Option<u32>,
    ) -> Result<Vec<User>, UserStoreError> {
        self.find(&recent(days).filter(UserFilter::Organization(organization_id)))
            .await
    }

    pub async fn from_site(&self, site_id: SiteId) -> Result<Vec<User>, UserStoreError> {
        self.find(&UserQuery::from_site(site_id)).await
    }

    pub async fn from_organization(
        &self,
        organization_id: OrganizationId,
    ) -> Result<Vec<User>, UserStoreError> {
        self.find(&UserQuery::from_organization(organization_id))
            .await
    }

    pub async fn active_from_site(&self, site_id: SiteId) -> Result<Vec<User>, UserStoreError> {
        self.find(&UserQuery::active().filter(UserFilter::Site(site_id)))
            .await
    }

    pub async fn inactive_from_site(&self, site_id: SiteId) -> Result<Vec<User>, UserStoreError> {
        self.find(&UserQuery::inactive().filter(UserFilter::Site(site_id)))
            .await
    }

    pub async fn active_from_organization(
        &self,
        organization_id: OrganizationId,
    ) -> Result<Vec<User>, UserStoreError> {
        self.find(&UserQuery::active().filter(UserFilter::Organization(organization_id)))
            .await
    }

    pub async fn inactive_from_organization(
        &self,
        organization_id: OrganizationId,
    ) -> Result<Vec<User>, UserStoreError> {
        self.find(&UserQuery::inactive().filter(UserFilter::Organization(organization_id)))
            .await
    }

    pub async fn staff(&self) -> Result<Vec<User>, UserStoreError> {
        self.find(&UserQuery::staff()).await
    }

    pub async fn created_by(&self, user_id: UserId) -> Result<Vec<User>, UserStoreError> {
        self.find(&UserQuery::created_by(user_id)).await
    }

    pub async fn modified_by(&self, user_id: UserId) -> Result<Vec<User>, UserStoreError> {
        self.find(&UserQuery::modified_by(user_id)).await
    }

    /// Case-insensitive substring match on both name parts.
    pub async fn by_full_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<Vec<User>, UserStoreError> {
        self.find(&UserQuery::by_full_name(first_name, last_name))
            .await
    }
}

fn recent(days: Option<u32>) -> UserQuery {
    let since = joined_since(days.unwrap_or(DEFAULT_RECENT_DAYS), Utc::now());
    UserQuery::new().filter(UserFilter::JoinedSince(since))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use gwiit_adapters::HashMapUserStore;
    use gwiit_core::{HashedPassword, LoginIdentifiers, NewUser};
    use secrecy::Secret;

    fn member(username: &str, org: Option<i64>, site: Option<i64>, active: bool) -> NewUser {
        NewUser {
            identifiers: LoginIdentifiers::parse(None, Some(username), None, None).unwrap(),
            password_hash: HashedPassword::new(Secret::from("digest".to_string())),
            first_name: Some("Grace".to_string()),
            last_name: Some("Hopper".to_string()),
            organization_id: org.map(OrganizationId::new),
            site_id: site.map(SiteId::new),
            created_by_id: Some(UserId::new(1)),
            is_active: active,
            is_staff: false,
            is_superuser: false,
        }
    }

    fn ids(users: &[User]) -> Vec<i64> {
        users.iter().map(|user| user.id.get()).collect()
    }

    async fn seeded() -> HashMapUserStore {
        let store = HashMapUserStore::new();
        let members = [
            member("u1", Some(2), Some(5), true),
            member("u2", Some(2), Some(6), true),
            member("u3", Some(3), Some(5), true),
            member("u4", Some(2), Some(5), false),
            member("u5", None, None, true),
            member("u6", Some(2), Some(5), true),
        ];
        for member in members {
            store.add_user(member).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn organization_and_site_returns_exactly_the_active_members() {
        let store = seeded().await;
        let resolver = AssociationResolver::new(&store);

        let users = resolver
            .users_by_organization_and_site(OrganizationId::new(2), SiteId::new(5))
            .await
            .unwrap();
        assert_eq!(ids(&users), vec![1, 6]);
    }

    #[tokio::test]
    async fn unknown_scope_is_empty_not_an_error() {
        let store = seeded().await;
        let resolver = AssociationResolver::new(&store);

        let users = resolver
            .users_by_organization_and_site(OrganizationId::new(99), SiteId::new(5))
            .await
            .unwrap();
        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn activity_scoped_queries() {
        let store = seeded().await;
        let resolver = AssociationResolver::new(&store);

        assert_eq!(ids(&resolver.active_users().await.unwrap()), vec![1, 2, 3, 5, 6]);
        assert_eq!(ids(&resolver.inactive_users().await.unwrap()), vec![4]);
        assert_eq!(
            ids(&resolver.from_site(SiteId::new(5)).await.unwrap()),
            vec![1, 3, 4, 6]
        );
        assert_eq!(
            ids(&resolver.active_from_site(SiteId::new(5)).await.unwrap()),
            vec![1, 3, 6]
        );
        assert_eq!(
            ids(&resolver.inactive_from_site(SiteId::new(5)).await.unwrap()),
            vec![4]
        );
        assert_eq!(
            ids(&resolver
                .active_from_organization(OrganizationId::new(2))
                .await
                .unwrap()),
            vec![1, 2, 6]
        );
        assert_eq!(
            ids(&resolver
                .inactive_from_organization(OrganizationId::new(2))
                .await
                .unwrap()),
            vec![4]
        );
        assert_eq!(
            ids(&resolver.from_organization(OrganizationId::new(3)).await.unwrap()),
            vec![3]
        );
    }

    #[tokio::test]
    async fn recently_joined_respects_the_window() {
        let store = seeded().await;
        let mut veteran = store.get_user(UserId::new(1)).await.unwrap();
        veteran.date_joined = Utc::now() - Duration::days(45);
        store.update_user(veteran).await.unwrap();

        let resolver = AssociationResolver::new(&store);
        let recent = resolver.recently_joined(None).await.unwrap();
        assert!(!ids(&recent).contains(&1));
        assert_eq!(recent.len(), 5);

        let wide = resolver.recently_joined(Some(60)).await.unwrap();
        assert_eq!(wide.len(), 6);

        let from_site = resolver
            .recently_joined_from_site(SiteId::new(5), None)
            .await
            .unwrap();
        assert_eq!(ids(&from_site), vec![3, 4, 6]);

        let from_org = resolver
            .recently_joined_from_organization(OrganizationId::new(2), Some(60))
            .await
            .unwrap();
        assert_eq!(ids(&from_org), vec![1, 2, 4, 6]);
    }

    #[tokio::test]
    async fn audit_and_name_queries() {
        let store = seeded().await;
        let mut edited = store.get_user(UserId::new(2)).await.unwrap();
        edited.modified_by_id = Some(UserId::new(3));
        edited.is_staff = true;
        store.update_user(edited).await.unwrap();

        let resolver = AssociationResolver::new(&store);
        assert_eq!(resolver.created_by(UserId::new(1)).await.unwrap().len(), 6);
        assert_eq!(ids(&resolver.modified_by(UserId::new(3)).await.unwrap()), vec![2]);
        assert_eq!(ids(&resolver.staff().await.unwrap()), vec![2]);
        assert_eq!(resolver.by_full_name("GRA", "hop").await.unwrap().len(), 6);
        assert!(resolver.by_full_name("Ada", "").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn find_composes_arbitrary_filters() {
        let store = seeded().await;
        let resolver = AssociationResolver::new(&store);

        let query = UserQuery::active()
            .filter(UserFilter::Organization(OrganizationId::new(2)))
            .filter(UserFilter::Username("u2".to_string()));
        assert_eq!(ids(&resolver.find(&query).await.unwrap()), vec![2]);
    }
}
