use gwiit_core::{
    EmailClient, LoginIdentifiers, NewUser, OrganizationId, Password, PasswordGenerator,
    PasswordHashError, PasswordHasher, SiteId, User, UserError, UserId, UserStore,
    UserStoreError, clean_name,
};
use secrecy::{ExposeSecret, Secret};

pub const CREDENTIALS_EMAIL_SUBJECT: &str = "Your Account Credentials";

/// Raw account details as submitted by an administrator.
#[derive(Debug, Clone)]
pub struct NewUserRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub badge_barcode: Option<String>,
    pub badge_rfid: Option<String>,
    /// Generated when absent.
    pub password: Option<Secret<String>>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub organization_id: Option<OrganizationId>,
    pub site_id: Option<SiteId>,
    pub created_by_id: Option<UserId>,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl Default for NewUserRequest {
    fn default() -> Self {
        Self {
            email: None,
            username: None,
            badge_barcode: None,
            badge_rfid: None,
            password: None,
            first_name: None,
            last_name: None,
            organization_id: None,
            site_id: None,
            created_by_id: None,
            is_active: true,
            is_staff: false,
            is_superuser: false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CreateUserError {
    #[error(transparent)]
    InvalidUser(#[from] UserError),
    #[error("A superuser must have a username")]
    MissingSuperuserUsername,
    #[error(transparent)]
    PasswordHashError(#[from] PasswordHashError),
    #[error(transparent)]
    UserStoreError(#[from] UserStoreError),
}

/// Validates, normalizes and persists new accounts.
pub struct CreateUserUseCase<'a, U, H, G, E>
where
    U: UserStore,
    H: PasswordHasher,
    G: PasswordGenerator,
    E: EmailClient,
{
    user_store: &'a U,
    password_hasher: &'a H,
    password_generator: &'a G,
    email_client: &'a E,
}

impl<'a, U, H, G, E> CreateUserUseCase<'a, U, H, G, E>
where
    U: UserStore,
    H: PasswordHasher,
    G: PasswordGenerator,
    E: EmailClient,
{
    pub fn new(
        user_store: &'a U,
        password_hasher: &'a H,
        password_generator: &'a G,
        email_client: &'a E,
    ) -> Self {
        Self {
            user_store,
            password_hasher,
            password_generator,
            email_client,
        }
    }

    /// Execute the create user use case
    ///
    /// Every validation runs before the single insert, so a rejected request
    /// leaves nothing behind. Requests flagged `is_superuser` go through
    /// [`Self::execute_superuser`].
    ///
    /// # Returns
    /// The persisted user, or the first validation, hashing or store failure
    #[tracing::instrument(name = "CreateUserUseCase::execute", skip_all)]
    pub async fn execute(&self, request: NewUserRequest) -> Result<User, CreateUserError> {
        if request.is_superuser {
            return self.execute_superuser(request).await;
        }
        self.create(request).await
    }

    /// Creates an active staff superuser. A username is required on top of the
    /// usual rules.
    #[tracing::instrument(name = "CreateUserUseCase::execute_superuser", skip_all)]
    pub async fn execute_superuser(
        &self,
        request: NewUserRequest,
    ) -> Result<User, CreateUserError> {
        let has_username = request
            .username
            .as_deref()
            .is_some_and(|name| !name.trim().is_empty());
        if !has_username {
            return Err(CreateUserError::MissingSuperuserUsername);
        }

        self.create(NewUserRequest {
            is_active: true,
            is_staff: true,
            is_superuser: true,
            ..request
        })
        .await
    }

    async fn create(&self, request: NewUserRequest) -> Result<User, CreateUserError> {
        let identifiers = LoginIdentifiers::parse(
            request.email.as_deref(),
            request.username.as_deref(),
            request.badge_barcode.as_deref(),
            request.badge_rfid.as_deref(),
        )?;

        let (password, generated) = match request.password {
            Some(raw) => (Password::parse(raw).map_err(UserError::from)?, false),
            None => (
                self.password_generator
                    .generate()
                    .map_err(UserError::from)?,
                true,
            ),
        };
        let password_hash = self.password_hasher.hash(&password).await?;

        let new_user = NewUser {
            identifiers,
            password_hash,
            first_name: clean_name(request.first_name),
            last_name: clean_name(request.last_name),
            organization_id: request.organization_id,
            site_id: request.site_id,
            created_by_id: request.created_by_id,
            is_active: request.is_active,
            is_staff: request.is_staff,
            is_superuser: request.is_superuser,
        };

        let user = self.user_store.add_user(new_user).await?;
        tracing::info!(user_id = %user.id, "User created");

        self.send_credentials(&user, generated.then_some(&password))
            .await;

        Ok(user)
    }

    async fn send_credentials(&self, user: &User, generated_password: Option<&Password>) {
        let Some(recipient) = user.identifiers.email() else {
            return;
        };

        let content = credentials_message(user, generated_password);
        if let Err(e) = self
            .email_client
            .send_email(recipient, CREDENTIALS_EMAIL_SUBJECT, &content)
            .await
        {
            tracing::warn!(user_id = %user.id, error = %e, "Failed to send credentials email");
        }
    }
}

fn credentials_message(user: &User, generated_password: Option<&Password>) -> String {
    let name = user.full_name();
    let greeting = if name.is_empty() { "there" } else { &name };

    let mut lines = vec![
        format!("Hello {greeting},"),
        String::new(),
        "An account has been created for you. You can sign in with:".to_string(),
    ];
    lines.extend(
        user.identifiers
            .iter()
            .map(|(field, value)| format!("  {field}: {value}")),
    );
    if let Some(password) = generated_password {
        lines.push(format!(
            "  temporary password: {}",
            password.as_ref().expose_secret()
        ));
        lines.push(String::new());
        lines.push("Please change your password after signing in.".to_string());
    }

    lines.join("\n")
}
