//! Session - logged-in identity and selected branch
//!
//! One `Session` is created per app and handed to every view model. `start`
//! logs in and picks the branch; `end` logs out and clears the identity. The
//! local store is written only from here.

mod store;

pub use store::{LocalStore, StoredSession};

use std::sync::{Arc, RwLock};

use shared::error::{AppError, ErrorCode};
use shared::models::{Capability, User};
use tokio::sync::watch;

use crate::api::AuthApi;
use crate::{ClientError, ClientResult};

#[derive(Debug, Default)]
struct SessionState {
    user: Option<User>,
}

/// Auth and branch context
pub struct Session {
    auth: Arc<dyn AuthApi>,
    store: LocalStore,
    state: RwLock<SessionState>,
    branch: watch::Sender<Option<String>>,
}

impl Session {
    pub fn new(auth: Arc<dyn AuthApi>, store: LocalStore) -> Self {
        let (branch, _) = watch::channel(None);
        Self {
            auth,
            store,
            state: RwLock::new(SessionState::default()),
            branch,
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Log in and select the initial branch
    ///
    /// The persisted selection wins when the user still has access to it;
    /// otherwise the user's preferred (or first accessible) branch is used.
    pub async fn start(&self, email: &str, password: &str) -> ClientResult<User> {
        let response = self.auth.login(email, password).await?;
        self.begin(response.user.clone());
        Ok(response.user)
    }

    /// Restore a session from an existing token
    pub async fn resume(&self) -> ClientResult<User> {
        let user = self.auth.me().await?;
        self.begin(user.clone());
        Ok(user)
    }

    fn begin(&self, user: User) {
        let branch = self
            .store
            .selected_branch()
            .filter(|b| user.has_branch_access(b))
            .or_else(|| user.default_branch().map(str::to_string));

        tracing::info!(user_id = %user.id, branch = ?branch, "Session started");
        self.store.set_last_user(Some(user.clone()));
        self.write().user = Some(user);
        self.set_branch(branch);
    }

    /// Log out and clear the identity
    ///
    /// Local state is cleared even when the logout call fails; the error is
    /// still returned for the notification.
    pub async fn end(&self) -> ClientResult<()> {
        let result = self.auth.logout().await;
        self.write().user = None;
        self.store.set_last_user(None);
        self.branch.send_replace(None);
        tracing::info!("Session ended");
        result
    }

    pub fn is_active(&self) -> bool {
        self.read().user.is_some()
    }

    pub fn user(&self) -> Option<User> {
        self.read().user.clone()
    }

    /// Last user seen on this device (for prefilling the login form)
    pub fn last_user(&self) -> Option<User> {
        self.store.last_user()
    }

    /// Current user, if allowed to `capability`
    pub fn require(&self, capability: Capability) -> ClientResult<User> {
        let user = self.user().ok_or(ClientError::Unauthorized)?;
        if !user.can(capability) {
            return Err(ClientError::Forbidden(format!(
                "Role {} is not allowed to do this ({capability:?})",
                user.role
            )));
        }
        Ok(user)
    }

    /// Select a branch the user has access to
    pub fn select_branch(&self, branch_id: &str) -> ClientResult<()> {
        let user = self.user().ok_or(ClientError::Unauthorized)?;
        if !user.has_branch_access(branch_id) {
            return Err(AppError::new(ErrorCode::BranchAccessDenied)
                .with_detail("branchId", branch_id)
                .into());
        }
        self.set_branch(Some(branch_id.to_string()));
        Ok(())
    }

    fn set_branch(&self, branch: Option<String>) {
        self.store.set_selected_branch(branch.clone());
        self.branch.send_if_modified(|current| {
            if *current == branch {
                return false;
            }
            tracing::info!(branch = ?branch, "Branch selected");
            *current = branch;
            true
        });
    }

    /// Selected branch
    pub fn branch(&self) -> Option<String> {
        self.branch.borrow().clone()
    }

    /// Selected branch, or an error when none is selected
    pub fn require_branch(&self) -> ClientResult<String> {
        self.branch()
            .ok_or_else(|| AppError::new(ErrorCode::BranchNotSelected).into())
    }

    /// Watch branch changes
    pub fn watch_branch(&self) -> watch::Receiver<Option<String>> {
        self.branch.subscribe()
    }

    /// Store backing this session
    pub fn store(&self) -> &LocalStore {
        &self.store
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user().map(|u| u.id))
            .field("branch", &self.branch())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use shared::client::LoginResponse;
    use shared::models::{Branch, Role};

    /// Auth fake returning a fixed user
    pub(crate) struct FakeAuth {
        pub user: User,
        pub fail_logout: bool,
    }

    #[async_trait]
    impl AuthApi for FakeAuth {
        async fn login(&self, _email: &str, password: &str) -> ClientResult<LoginResponse> {
            if password != "secret" {
                return Err(ClientError::Unauthorized);
            }
            Ok(LoginResponse {
                token: "tok".into(),
                user: self.user.clone(),
            })
        }
        async fn me(&self) -> ClientResult<User> {
            Ok(self.user.clone())
        }
        async fn logout(&self) -> ClientResult<()> {
            if self.fail_logout {
                return Err(ClientError::Realtime("offline".into()));
            }
            Ok(())
        }
        async fn branches(&self) -> ClientResult<Vec<Branch>> {
            Ok(vec![])
        }
    }

    pub(crate) fn user(role: Role, access: &[&str], preferred: Option<&str>) -> User {
        User {
            id: "u1".into(),
            email: "crew@example.com".into(),
            name: Some("Crew".into()),
            role,
            branch_access: access.iter().map(|s| s.to_string()).collect(),
            preferred_branch: preferred.map(str::to_string),
        }
    }

    /// Started session for view-model tests
    pub(crate) async fn started(role: Role, branch: &str) -> Arc<Session> {
        let auth = Arc::new(FakeAuth {
            user: user(role, &[branch], Some(branch)),
            fail_logout: false,
        });
        let session = Arc::new(Session::new(auth, LocalStore::in_memory()));
        session.start("crew@example.com", "secret").await.unwrap();
        session
    }

    #[tokio::test]
    async fn test_start_selects_preferred_branch() {
        let auth = Arc::new(FakeAuth { user: user(Role::Crew, &["b1", "b2"], Some("b2")), fail_logout: false });
        let session = Session::new(auth, LocalStore::in_memory());
        assert!(!session.is_active());

        session.start("crew@example.com", "secret").await.unwrap();
        assert!(session.is_active());
        assert_eq!(session.branch().as_deref(), Some("b2"));
        assert_eq!(session.store().selected_branch().as_deref(), Some("b2"));
    }

    #[tokio::test]
    async fn test_persisted_branch_wins_when_accessible() {
        let store = LocalStore::in_memory();
        store.set_selected_branch(Some("b1".into()));
        let auth = Arc::new(FakeAuth { user: user(Role::Crew, &["b1", "b2"], Some("b2")), fail_logout: false });
        let session = Session::new(auth, store);
        session.start("crew@example.com", "secret").await.unwrap();
        assert_eq!(session.branch().as_deref(), Some("b1"));

        let store = LocalStore::in_memory();
        store.set_selected_branch(Some("b9".into()));
        let auth = Arc::new(FakeAuth { user: user(Role::Crew, &["b1"], None), fail_logout: false });
        let session = Session::new(auth, store);
        session.start("crew@example.com", "secret").await.unwrap();
        assert_eq!(session.branch().as_deref(), Some("b1"));
    }

    #[tokio::test]
    async fn test_failed_login_leaves_session_inactive() {
        let auth = Arc::new(FakeAuth { user: user(Role::Crew, &["b1"], None), fail_logout: false });
        let session = Session::new(auth, LocalStore::in_memory());
        let err = session.start("crew@example.com", "wrong").await.unwrap_err();
        assert!(matches!(err, ClientError::Unauthorized));
        assert!(!session.is_active());
        assert!(session.require_branch().is_err());
    }

    #[tokio::test]
    async fn test_select_branch_access() {
        let session = started(Role::Crew, "b1").await;
        let err = session.select_branch("b2").unwrap_err();
        assert_eq!(err.code(), ErrorCode::BranchAccessDenied);
        assert_eq!(session.branch().as_deref(), Some("b1"));

        let mut rx = session.watch_branch();
        let auth = Arc::new(FakeAuth { user: user(Role::SuperAdmin, &[], None), fail_logout: false });
        let admin = Session::new(auth, LocalStore::in_memory());
        admin.start("a@example.com", "secret").await.unwrap();
        admin.select_branch("anywhere").unwrap();
        assert_eq!(admin.branch().as_deref(), Some("anywhere"));
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_require_capability() {
        let session = started(Role::OrderTaker, "b1").await;
        assert!(session.require(Capability::TakeOrders).is_ok());
        let err = session.require(Capability::ManagePhotos).unwrap_err();
        assert!(matches!(err, ClientError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_end_clears_even_when_logout_fails() {
        let auth = Arc::new(FakeAuth { user: user(Role::Crew, &["b1"], None), fail_logout: true });
        let session = Session::new(auth, LocalStore::in_memory());
        session.start("crew@example.com", "secret").await.unwrap();
        assert!(session.last_user().is_some());

        assert!(session.end().await.is_err());
        assert!(!session.is_active());
        assert!(session.branch().is_none());
        assert!(session.last_user().is_none());
        assert!(matches!(session.require(Capability::TrackTime), Err(ClientError::Unauthorized)));
    }
}
