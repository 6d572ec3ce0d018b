//! Session state holder with observer subscriptions.
//!
//! # Responsibility
//! - Keep the single current-user value shared by every page.
//! - Notify observers on sign-in, sign-up and sign-out.
//! - Gate feature pages behind a signed-in session.
//!
//! # Invariants
//! - `observe` invokes the new callback once with the current state.
//! - Observers are notified only after the backend call succeeds.
//! - An unsubscribed observer is never invoked again.

use crate::auth::backend::{AuthBackend, AuthError, AuthResult, AuthUser};
use log::debug;
use std::collections::BTreeMap;

pub type SubscriptionId = u64;

type Observer = Box<dyn Fn(Option<&AuthUser>) + Send + Sync>;

/// Current-user holder. Backends are passed per call so the holder can
/// outlive any single connection.
#[derive(Default)]
pub struct SessionProvider {
    current: Option<AuthUser>,
    observers: BTreeMap<SubscriptionId, Observer>,
    next_subscription: SubscriptionId,
}

impl SessionProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_user(&self) -> Option<&AuthUser> {
        self.current.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.current.is_some()
    }

    /// Registers `observer` and immediately calls it with the current user.
    pub fn observe(
        &mut self,
        observer: impl Fn(Option<&AuthUser>) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        observer(self.current.as_ref());
        self.observers.insert(id, Box::new(observer));
        debug!("event=session_observe module=auth status=ok subscription={id}");
        id
    }

    /// Returns `false` when `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.remove(&id).is_some()
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Creates an account and signs it in.
    pub fn sign_up<B: AuthBackend>(
        &mut self,
        backend: &B,
        email: &str,
        password: &str,
    ) -> AuthResult<AuthUser> {
        let user = backend.sign_up(email, password)?;
        self.replace(Some(user.clone()));
        Ok(user)
    }

    pub fn sign_in<B: AuthBackend>(
        &mut self,
        backend: &B,
        email: &str,
        password: &str,
    ) -> AuthResult<AuthUser> {
        let user = backend.sign_in(email, password)?;
        self.replace(Some(user.clone()));
        Ok(user)
    }

    pub fn sign_out<B: AuthBackend>(&mut self, backend: &B) -> AuthResult<()> {
        let user = self.current.as_ref().ok_or(AuthError::NotSignedIn)?;
        backend.sign_out(user)?;
        self.replace(None);
        Ok(())
    }

    /// Returns `target` when signed in, otherwise the sign-in page.
    pub fn guard(&self, target: Route) -> Route {
        if target.requires_session() && !self.is_signed_in() {
            return Route::SignIn;
        }
        target
    }

    fn replace(&mut self, user: Option<AuthUser>) {
        self.current = user;
        for observer in self.observers.values() {
            observer(self.current.as_ref());
        }
    }
}

/// Navigable pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    SignIn,
    SignUp,
    CreateVerdict,
    ManageVerdicts,
    CaseAnalytics,
    EditVerdict(String),
    ViewVerdict(String),
}

impl Route {
    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = path.trim().trim_end_matches('/');
        let route = match trimmed {
            "" => Self::Home,
            "/sign-in" => Self::SignIn,
            "/sign-up" => Self::SignUp,
            "/create-verdict" => Self::CreateVerdict,
            "/manage-verdicts" => Self::ManageVerdicts,
            "/case-analytics" => Self::CaseAnalytics,
            other => {
                if let Some(id) = non_empty_suffix(other, "/edit-verdict/") {
                    Self::EditVerdict(id)
                } else if let Some(id) = non_empty_suffix(other, "/view-verdict/") {
                    Self::ViewVerdict(id)
                } else {
                    return None;
                }
            }
        };
        Some(route)
    }

    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::SignIn => "/sign-in".to_string(),
            Self::SignUp => "/sign-up".to_string(),
            Self::CreateVerdict => "/create-verdict".to_string(),
            Self::ManageVerdicts => "/manage-verdicts".to_string(),
            Self::CaseAnalytics => "/case-analytics".to_string(),
            Self::EditVerdict(id) => format!("/edit-verdict/{id}"),
            Self::ViewVerdict(id) => format!("/view-verdict/{id}"),
        }
    }

    fn requires_session(&self) -> bool {
        !matches!(self, Self::Home | Self::SignIn | Self::SignUp)
    }
}

fn non_empty_suffix(path: &str, prefix: &str) -> Option<String> {
    path.strip_prefix(prefix)
        .filter(|rest| !rest.is_empty() && !rest.contains('/'))
        .map(str::to_string)
}
