use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::access::Role;
use crate::forms::PaymentRequest;
use crate::{AppError, TOKEN_EXPIRY_MARGIN_MS};

/// Token material that must never appear in logs or debug output.
///
/// The inner string is wiped on drop. Cloning is allowed because tokens
/// travel into request builders; every clone wipes itself independently.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Drop for Secret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Secret([REDACTED])")
    }
}

/// The fixed set of storage slots that make up a persisted session.
///
/// `as_str` values are the literal storage keys and form a compatibility
/// contract with every shell; changing one silently signs users out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKey {
    Token,
    RefreshToken,
    TokenExpires,
    RefreshTokenExpires,
    Role,
    Name,
    Email,
    RoleId,
}

impl SessionKey {
    pub const ALL: [Self; 8] = [
        Self::Token,
        Self::RefreshToken,
        Self::TokenExpires,
        Self::RefreshTokenExpires,
        Self::Role,
        Self::Name,
        Self::Email,
        Self::RoleId,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Token => "token",
            Self::RefreshToken => "refreshToken",
            Self::TokenExpires => "tokenExpires",
            Self::RefreshTokenExpires => "refreshTokenExpires",
            Self::Role => "role",
            Self::Name => "name",
            Self::Email => "email",
            Self::RoleId => "roleId",
        }
    }

    /// Keys in `ALL` order, as owned strings for a storage batch read.
    #[must_use]
    pub fn all_keys() -> Vec<String> {
        Self::ALL.iter().map(|k| k.as_str().to_string()).collect()
    }
}

/// In-memory view of the persisted session.
///
/// Everything is optional: storage may hold any subset of the slots, and a
/// half-written session must still load. Numeric slots are parsed leniently;
/// garbage parses to `None`, which downstream checks treat the same as
/// absent.
#[derive(Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    pub access_token: Option<Secret>,
    pub refresh_token: Option<Secret>,
    pub token_expires_ms: Option<u64>,
    pub refresh_token_expires_ms: Option<u64>,
    pub role: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub role_id: Option<i64>,
}

impl SessionSnapshot {
    /// Build a snapshot from a batch read issued over [`SessionKey::ALL`].
    /// Missing trailing slots are tolerated.
    #[must_use]
    pub fn from_values(values: &[Option<String>]) -> Self {
        let slot = |key: SessionKey| -> Option<&String> {
            let index = SessionKey::ALL.iter().position(|k| *k == key)?;
            values.get(index)?.as_ref()
        };

        Self {
            access_token: slot(SessionKey::Token).map(Secret::new),
            refresh_token: slot(SessionKey::RefreshToken).map(Secret::new),
            token_expires_ms: slot(SessionKey::TokenExpires).and_then(|v| v.trim().parse().ok()),
            refresh_token_expires_ms: slot(SessionKey::RefreshTokenExpires)
                .and_then(|v| v.trim().parse().ok()),
            role: slot(SessionKey::Role).cloned(),
            name: slot(SessionKey::Name).cloned(),
            email: slot(SessionKey::Email).cloned(),
            role_id: slot(SessionKey::RoleId).and_then(|v| v.trim().parse().ok()),
        }
    }

    /// A session counts as signed in only when a non-empty access token is
    /// present, regardless of how stale it is.
    #[must_use]
    pub fn signed_in(&self) -> bool {
        self.access_token.as_ref().is_some_and(|t| !t.is_empty())
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role.as_deref().map_or(Role::Unknown, Role::parse)
    }

    /// Fold a refresh grant into the snapshot. Mirrors the storage writes in
    /// [`TokenGrant::storage_writes`]: each token pair is applied only when
    /// present and non-empty, so a grant carrying a single pair updates that
    /// pair and leaves the other untouched.
    pub fn apply_grant(&mut self, grant: &TokenGrant) {
        if let Some(pair) = grant.token.as_ref().filter(|p| !p.token.is_empty()) {
            self.access_token = Some(Secret::new(pair.token.clone()));
            self.token_expires_ms = Some(pair.expires_ms);
        }
        if let Some(pair) = grant.refresh_token.as_ref().filter(|p| !p.token.is_empty()) {
            self.refresh_token = Some(Secret::new(pair.token.clone()));
            self.refresh_token_expires_ms = Some(pair.expires_ms);
        }
    }
}

impl std::fmt::Debug for SessionSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSnapshot")
            .field(
                "access_token_present",
                &self.access_token.as_ref().map(|t| !t.is_empty()),
            )
            .field(
                "refresh_token_present",
                &self.refresh_token.as_ref().map(|t| !t.is_empty()),
            )
            .field("token_expires_ms", &self.token_expires_ms)
            .field("refresh_token_expires_ms", &self.refresh_token_expires_ms)
            .field("role", &self.role)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("role_id", &self.role_id)
            .finish()
    }
}

/// A token with its expiry, as issued inside a refresh response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedToken {
    pub token: String,
    #[serde(rename = "expires")]
    pub expires_ms: u64,
}

/// Body of a successful refresh response. Either pair may be missing; the
/// API sometimes rotates only the access token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenGrant {
    #[serde(default)]
    pub token: Option<IssuedToken>,
    #[serde(default, rename = "refreshToken")]
    pub refresh_token: Option<IssuedToken>,
}

impl TokenGrant {
    /// Storage writes implied by this grant. A pair is written only when its
    /// token is present and non-empty, and always together with its expiry,
    /// so storage never holds a token whose expiry belongs to a previous one.
    #[must_use]
    pub fn storage_writes(&self) -> Vec<(SessionKey, String)> {
        let mut writes = Vec::new();
        if let Some(pair) = self.token.as_ref().filter(|p| !p.token.is_empty()) {
            writes.push((SessionKey::Token, pair.token.clone()));
            writes.push((SessionKey::TokenExpires, pair.expires_ms.to_string()));
        }
        if let Some(pair) = self.refresh_token.as_ref().filter(|p| !p.token.is_empty()) {
            writes.push((SessionKey::RefreshToken, pair.token.clone()));
            writes.push((SessionKey::RefreshTokenExpires, pair.expires_ms.to_string()));
        }
        writes
    }

    /// The freshly issued access token, when the grant carries a usable one.
    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.token
            .as_ref()
            .map(|p| p.token.as_str())
            .filter(|t| !t.is_empty())
    }
}

/// True when the token expires within the refresh margin, or already has.
/// An absent or unreadable expiry also counts as expiring: refreshing a
/// valid token early is cheap, using a dead one is a 401.
#[must_use]
pub fn is_expiring_soon(expires_ms: Option<u64>, now_ms: u64) -> bool {
    let Some(expires_ms) = expires_ms else {
        return true;
    };
    expires_ms.saturating_sub(now_ms) < TOKEN_EXPIRY_MARGIN_MS
}

/// An action that was deferred because the token needed refreshing first.
#[derive(Debug, Clone, PartialEq)]
pub enum GuardedAction {
    SubmitPayment { payload: PaymentRequest },
}

/// Book-keeping for the single-flight refresh rule: at most one refresh
/// request exists at a time, and actions arriving while it is out wait in
/// `pending` to be replayed (or dropped, on failure) when it resolves.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenGuard {
    pub refresh_in_flight: bool,
    pub pending: Vec<GuardedAction>,
}

impl TokenGuard {
    /// Closes the refresh window and hands back whatever was queued behind it.
    #[must_use]
    pub fn finish_refresh(&mut self) -> Vec<GuardedAction> {
        self.refresh_in_flight = false;
        std::mem::take(&mut self.pending)
    }
}

/// What a guarded action should do about the token, decided up front so the
/// update loop stays a pure dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenPlan {
    /// Token is fresh; proceed with it.
    UseToken(Secret),
    /// A refresh must go out before the action can run.
    StartRefresh { refresh_token: Secret },
    /// A refresh is already in flight; queue behind it.
    AlreadyRefreshing,
    /// No usable token and no way to get one.
    Failed(AppError),
}

#[must_use]
pub fn ensure_token_plan(
    session: &SessionSnapshot,
    guard: &TokenGuard,
    now_ms: u64,
) -> TokenPlan {
    if guard.refresh_in_flight {
        return TokenPlan::AlreadyRefreshing;
    }

    if !is_expiring_soon(session.token_expires_ms, now_ms) {
        // A fresh expiry without a token still falls through to a refresh.
        if let Some(token) = session.access_token.as_ref().filter(|t| !t.is_empty()) {
            return TokenPlan::UseToken(token.clone());
        }
    }

    match session.refresh_token.as_ref().filter(|t| !t.is_empty()) {
        Some(refresh_token) => TokenPlan::StartRefresh {
            refresh_token: refresh_token.clone(),
        },
        None => TokenPlan::Failed(AppError::NoRefreshToken),
    }
}
