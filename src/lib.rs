// lib.rs - Payment operations dashboard core

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]

pub mod access;
pub mod api;
pub mod capabilities;
pub mod data;
pub mod event;
pub mod forms;
pub mod layout;
pub mod search;
pub mod session;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use access::Role;
use capabilities::{HttpError, KvError};
use data::{
    ChatMessage, HomeSection, NavIcon, NewPaymentOption, PaymentStatus, RowAction, TransactionsTab,
};
use forms::{PaymentDraft, PaymentFormState};
use layout::LayoutState;
use search::SearchState;
use session::{SessionSnapshot, TokenGuard};

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use event::Event;

/// Below this viewport width the chrome switches to the mobile drawer.
pub const MOBILE_BREAKPOINT_PX: u32 = 1024;

/// Quiet period between the last keystroke and the search firing.
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 800;

/// Access tokens are refreshed when they have less than this long to live.
pub const TOKEN_EXPIRY_MARGIN_MS: u64 = 2 * 60 * 1000;

pub const API_BASE_URL: &str = "https://payments-api.example.com/api";
pub const TOKEN_REFRESH_URL: &str = "https://payments-api.example.com/api/v1/Auth/Refresh";
pub const API_KEY_HEADER: &str = "X-Api-Key";
pub const API_KEY: &str = "7D3FA41E-52C8-4B9D-9F1A-8E64C20D5B17";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorSeverity {
    Transient,
    Permanent,
    Fatal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Network,
    Timeout,
    Http,
    Auth,
    Storage,
    Decode,
    Internal,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Network => "NETWORK_ERROR",
            Self::Timeout => "TIMEOUT",
            Self::Http => "HTTP_ERROR",
            Self::Auth => "AUTH_ERROR",
            Self::Storage => "STORAGE_ERROR",
            Self::Decode => "DECODE_ERROR",
            Self::Internal => "INTERNAL_ERROR",
        }
    }

    #[must_use]
    pub const fn default_severity(self) -> ErrorSeverity {
        match self {
            Self::Network | Self::Timeout | Self::Storage => ErrorSeverity::Transient,
            Self::Http | Self::Auth => ErrorSeverity::Permanent,
            Self::Decode | Self::Internal => ErrorSeverity::Fatal,
        }
    }

    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::Network | Self::Timeout | Self::Storage)
    }
}

/// Application-level failures, as surfaced to the shell.
///
/// The `Http`, `NoRefreshToken` and `RefreshFailed` display strings are a
/// compatibility contract: shells and support tooling match on the exact
/// wording, so it must not drift.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppError {
    #[error("HTTP error! status: {status}")]
    Http { status: u16 },

    #[error("No refresh token available")]
    NoRefreshToken,

    #[error("Failed to refresh token")]
    RefreshFailed,

    #[error("network error: {message}")]
    Network { message: String },

    #[error("request timed out")]
    Timeout,

    #[error("could not build request: {reason}")]
    RequestBuild { reason: String },

    #[error("could not decode response: {reason}")]
    Decode { reason: String },

    #[error("storage error: {message}")]
    Storage { message: String },
}

impl AppError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Network { .. } => ErrorKind::Network,
            Self::Timeout => ErrorKind::Timeout,
            Self::Http { .. } => ErrorKind::Http,
            Self::NoRefreshToken | Self::RefreshFailed => ErrorKind::Auth,
            Self::RequestBuild { .. } => ErrorKind::Internal,
            Self::Decode { .. } => ErrorKind::Decode,
            Self::Storage { .. } => ErrorKind::Storage,
        }
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind().code()
    }

    #[must_use]
    pub const fn severity(&self) -> ErrorSeverity {
        self.kind().default_severity()
    }

    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }

    #[must_use]
    pub fn user_facing_message(&self) -> String {
        match self {
            Self::Network { .. } => {
                "Unable to connect. Please check your internet connection and try again.".into()
            }
            Self::Timeout => "The request timed out. Please try again.".into(),
            Self::Http { status } => {
                format!("The server rejected the request (status {status}). Please try again.")
            }
            Self::NoRefreshToken | Self::RefreshFailed => {
                "Your session has expired. Please sign in again.".into()
            }
            Self::RequestBuild { .. } => "An unexpected error occurred. Please try again.".into(),
            Self::Decode { .. } => {
                "A data error occurred. Please contact support if this persists.".into()
            }
            Self::Storage { .. } => "Unable to read saved session data. Please sign in again.".into(),
        }
    }
}

impl From<HttpError> for AppError {
    fn from(e: HttpError) -> Self {
        match e {
            HttpError::Network { message } => Self::Network { message },
            HttpError::Timeout { .. } => Self::Timeout,
            HttpError::InvalidResponse { reason } => Self::Decode { reason },
            other => Self::RequestBuild {
                reason: other.to_string(),
            },
        }
    }
}

impl From<KvError> for AppError {
    fn from(e: KvError) -> Self {
        Self::Storage {
            message: e.to_string(),
        }
    }
}

#[must_use]
pub fn get_current_time_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToastMessage {
    pub message: String,
    pub kind: ToastKind,
    pub created_at_ms: u64,
    pub duration_ms: u64,
}

impl ToastMessage {
    #[must_use]
    pub fn new(message: impl Into<String>, kind: ToastKind) -> Self {
        Self {
            message: message.into(),
            kind,
            created_at_ms: get_current_time_ms(),
            duration_ms: kind.default_duration_ms(),
        }
    }

    #[must_use]
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.created_at_ms) > self.duration_ms
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ToastKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl ToastKind {
    #[must_use]
    pub const fn default_duration_ms(self) -> u64 {
        match self {
            Self::Info => 3000,
            Self::Success => 2000,
            Self::Warning => 4000,
            Self::Error => 5000,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatState {
    pub open: bool,
    pub draft: String,
    pub messages: Vec<ChatMessage>,
}

impl Default for ChatState {
    fn default() -> Self {
        Self {
            open: false,
            draft: String::new(),
            messages: data::assistant_transcript(),
        }
    }
}

pub struct Model {
    pub session: SessionSnapshot,
    pub session_loaded: bool,
    pub token_guard: TokenGuard,
    pub layout: LayoutState,
    pub search: SearchState,
    pub route: String,
    pub active_query: Option<String>,
    pub home_section: HomeSection,
    pub active_tab: TransactionsTab,
    pub current_page: usize,
    pub open_row_menu: Option<u64>,
    pub new_payment_menu_open: bool,
    pub chat: ChatState,
    pub payment_form: PaymentFormState,
    pub active_error: Option<AppError>,
    pub active_toast: Option<ToastMessage>,
    pub view_timestamp_ms: u64,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            session: SessionSnapshot::default(),
            session_loaded: false,
            token_guard: TokenGuard::default(),
            layout: LayoutState::default(),
            search: SearchState::default(),
            route: data::HOME_ROUTE.to_string(),
            active_query: None,
            home_section: HomeSection::default(),
            active_tab: TransactionsTab::default(),
            current_page: 1,
            open_row_menu: None,
            new_payment_menu_open: false,
            chat: ChatState::default(),
            payment_form: PaymentFormState::default(),
            active_error: None,
            active_toast: None,
            view_timestamp_ms: get_current_time_ms(),
        }
    }
}

impl Model {
    pub fn update_timestamp(&mut self) {
        self.view_timestamp_ms = get_current_time_ms();
    }

    pub fn set_error(&mut self, error: AppError) {
        self.active_error = Some(error);
    }

    pub fn clear_error(&mut self) {
        self.active_error = None;
    }

    pub fn show_toast(&mut self, message: impl Into<String>, kind: ToastKind) {
        self.active_toast = Some(ToastMessage::new(message, kind));
    }

    pub fn clear_toast(&mut self) {
        self.active_toast = None;
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LayoutView {
    pub mobile: bool,
    pub sidebar_open: bool,
    pub mobile_menu_open: bool,
    pub sidebar_width_px: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct NavItemView {
    pub route: String,
    pub label: String,
    pub icon: NavIcon,
    pub active: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchView {
    pub input: String,
    pub placeholder: String,
    pub disabled: bool,
    pub active_query: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionView {
    pub signed_in: bool,
    pub name: String,
    pub email: Option<String>,
    pub role: Role,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatView {
    pub open: bool,
    pub title: String,
    pub placeholder: String,
    pub draft: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatView {
    pub label: String,
    pub value: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SectionView {
    pub section: HomeSection,
    pub label: String,
    pub active: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HomePaymentView {
    pub id: u64,
    pub payee: String,
    pub due_date: String,
    pub amount: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HomeView {
    pub stats: Vec<StatView>,
    pub sections: Vec<SectionView>,
    pub rows: Vec<HomePaymentView>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TabView {
    pub tab: TransactionsTab,
    pub label: String,
    pub active: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentRowView {
    pub id: u64,
    pub payee: String,
    pub status: PaymentStatus,
    pub status_label: String,
    pub initiator: String,
    pub due_date: String,
    pub amount: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RowActionView {
    pub action: RowAction,
    pub label: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MenuOptionView {
    pub option: NewPaymentOption,
    pub label: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaginationView {
    pub pages: Vec<usize>,
    pub current_page: usize,
    pub summary: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransactionsView {
    pub tabs: Vec<TabView>,
    pub active_tab: TransactionsTab,
    pub rows: Vec<PaymentRowView>,
    pub actions: Vec<RowActionView>,
    pub open_row_menu: Option<u64>,
    pub new_payment_menu_open: bool,
    pub new_payment_options: Vec<MenuOptionView>,
    pub queue_warning: Option<String>,
    pub pagination: PaginationView,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct InvoiceView {
    pub draft: PaymentDraft,
    pub errors: BTreeMap<String, String>,
    pub submitting: bool,
    pub submitted: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PageView {
    Home(HomeView),
    Transactions(TransactionsView),
    Invoice(InvoiceView),
    Reports,
    Reconcillation,
    Settings,
    Profile,
    Admin,
    NotFound,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserFacingError {
    pub message: String,
    pub is_transient: bool,
    pub is_retryable: bool,
    pub error_code: String,
}

impl From<&AppError> for UserFacingError {
    fn from(e: &AppError) -> Self {
        Self {
            message: e.user_facing_message(),
            is_transient: e.severity() == ErrorSeverity::Transient,
            is_retryable: e.is_retryable(),
            error_code: e.code().to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToastView {
    pub message: String,
    pub kind: ToastKind,
    pub duration_ms: u64,
}

impl From<&ToastMessage> for ToastView {
    fn from(t: &ToastMessage) -> Self {
        Self {
            message: t.message.clone(),
            kind: t.kind,
            duration_ms: t.duration_ms,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ViewModel {
    pub page: PageView,
    pub route: String,
    pub layout: LayoutView,
    pub nav: Vec<NavItemView>,
    pub search: SearchView,
    pub session: SessionView,
    pub chat: ChatView,
    pub balance: String,
    pub balance_updated: String,
    pub error: Option<UserFacingError>,
    pub toast: Option<ToastView>,
}

pub mod app {
    use super::*;
    use crate::capabilities::KvOutput;
    use crate::data::ChatSender;
    use crate::forms::PaymentRequest;
    use crate::layout::RegionId;
    use crate::search::SettleOutcome;
    use crate::session::{
        ensure_token_plan, GuardedAction, Secret, SessionKey, TokenGrant, TokenPlan,
    };

    #[derive(Default)]
    pub struct App;

    impl App {
        fn navigate(model: &mut Model, caps: &Capabilities, route: String) {
            // Bare "/" is an alias for the home page.
            let route = if route == "/" {
                data::HOME_ROUTE.to_string()
            } else {
                route
            };
            if !access::route_visible(model.session.signed_in(), model.session.role(), &route) {
                caps.telemetry
                    .event("nav_denied", vec![("route".to_string(), route)]);
                model.show_toast(data::UNAUTHORIZED_ROUTE_MESSAGE, ToastKind::Warning);
                return;
            }

            model.layout.route_changed(&route);
            if model.layout.mobile {
                model.layout.close();
            }
            model.open_row_menu = None;
            model.new_payment_menu_open = false;
            model.route = route;
        }

        /// Run a payment submission through the token guard. Exactly one of:
        /// post immediately, start the single refresh, queue behind it, or
        /// fail outright.
        fn guarded_submit(model: &mut Model, caps: &Capabilities, payload: PaymentRequest) {
            match ensure_token_plan(&model.session, &model.token_guard, get_current_time_ms()) {
                TokenPlan::UseToken(token) => {
                    Self::post_payment(model, caps, &payload, &token);
                }
                TokenPlan::StartRefresh { refresh_token } => {
                    model.token_guard.refresh_in_flight = true;
                    model
                        .token_guard
                        .pending
                        .push(GuardedAction::SubmitPayment { payload });
                    Self::start_refresh(model, caps, &refresh_token);
                }
                TokenPlan::AlreadyRefreshing => {
                    caps.telemetry.counter("token.queued_behind_refresh", 1);
                    model
                        .token_guard
                        .pending
                        .push(GuardedAction::SubmitPayment { payload });
                }
                TokenPlan::Failed(error) => {
                    Self::fail_submission(model, caps, error);
                }
            }
        }

        fn post_payment(
            model: &mut Model,
            caps: &Capabilities,
            payload: &PaymentRequest,
            token: &Secret,
        ) {
            match api::post_json(api::PAYMENTS_PATH, payload, token) {
                Ok(request) => {
                    caps.http
                        .send(request, |result| Event::PaymentPostResponded(Box::new(result)));
                }
                Err(error) => Self::fail_submission(model, caps, error),
            }
        }

        fn start_refresh(model: &mut Model, caps: &Capabilities, refresh_token: &Secret) {
            tracing::info!(target: "paydesk::auth", "access token unusable, refreshing");
            match api::refresh_request(refresh_token) {
                Ok(request) => {
                    caps.http
                        .send(request, |result| Event::RefreshResponded(Box::new(result)));
                }
                Err(error) => Self::refresh_failed(model, caps, error),
            }
        }

        /// Queue one storage write per slot the grant carries. Writes that
        /// fail are logged and dropped; the in-memory session already holds
        /// the new tokens, so a partial save costs at most an extra refresh
        /// on the next launch.
        fn persist_grant(caps: &Capabilities, grant: &TokenGrant) {
            for (key, value) in grant.storage_writes() {
                caps.kv.set(key.as_str(), value, |result| {
                    Event::TokensPersisted(Box::new(result))
                });
            }
        }

        fn fail_submission(model: &mut Model, caps: &Capabilities, error: AppError) {
            model.payment_form.submit_failed();
            caps.telemetry.error(&error.to_string(), error.code());
            model.show_toast(data::PAYMENT_FAILED_MESSAGE, ToastKind::Error);
            model.set_error(error);
        }

        /// A refresh came back unusable. The queue drains exactly once;
        /// whatever was waiting is dropped rather than retried, because a
        /// second refresh would fail the same way.
        fn refresh_failed(model: &mut Model, caps: &Capabilities, error: AppError) {
            let dropped = model.token_guard.finish_refresh();
            if !dropped.is_empty() {
                model.payment_form.submit_failed();
            }
            tracing::warn!(
                target: "paydesk::auth",
                dropped = dropped.len(),
                error = %error,
                "token refresh failed"
            );
            caps.telemetry.error(&error.to_string(), error.code());
            model.show_toast(error.user_facing_message(), ToastKind::Error);
            model.set_error(error);
        }

        fn transaction_rows(model: &Model) -> Vec<PaymentRowView> {
            let query = model
                .active_query
                .as_deref()
                .map(str::trim)
                .filter(|q| !q.is_empty())
                .map(str::to_lowercase);

            model
                .active_tab
                .rows()
                .iter()
                .filter(|row| match &query {
                    Some(needle) => row.payee.to_lowercase().contains(needle),
                    None => true,
                })
                .map(|row| PaymentRowView {
                    id: row.id,
                    payee: row.payee.to_string(),
                    status: row.status,
                    status_label: row.status.label().to_string(),
                    initiator: row.initiator.to_string(),
                    due_date: row.due_date.to_string(),
                    amount: row.amount.to_string(),
                })
                .collect()
        }

        fn build_home(model: &Model) -> HomeView {
            HomeView {
                stats: data::STAT_CARDS
                    .iter()
                    .map(|card| StatView {
                        label: card.label.to_string(),
                        value: card.value,
                    })
                    .collect(),
                sections: HomeSection::ALL
                    .iter()
                    .map(|section| SectionView {
                        section: *section,
                        label: section.label().to_string(),
                        active: *section == model.home_section,
                    })
                    .collect(),
                rows: model
                    .home_section
                    .rows()
                    .iter()
                    .map(|payment| HomePaymentView {
                        id: payment.id,
                        payee: payment.payee.to_string(),
                        due_date: payment.due_date.to_string(),
                        amount: payment.amount.to_string(),
                    })
                    .collect(),
            }
        }

        fn build_transactions(model: &Model) -> TransactionsView {
            TransactionsView {
                tabs: [TransactionsTab::InProcess, TransactionsTab::InQueue]
                    .iter()
                    .map(|tab| TabView {
                        tab: *tab,
                        label: tab.label().to_string(),
                        active: *tab == model.active_tab,
                    })
                    .collect(),
                active_tab: model.active_tab,
                rows: Self::transaction_rows(model),
                actions: model
                    .active_tab
                    .actions()
                    .iter()
                    .map(|action| RowActionView {
                        action: *action,
                        label: action.label().to_string(),
                    })
                    .collect(),
                open_row_menu: model.open_row_menu,
                new_payment_menu_open: model.new_payment_menu_open,
                new_payment_options: NewPaymentOption::ALL
                    .iter()
                    .map(|option| MenuOptionView {
                        option: *option,
                        label: option.label().to_string(),
                    })
                    .collect(),
                queue_warning: if model.active_tab == TransactionsTab::InQueue {
                    Some(data::QUEUE_WARNING.to_string())
                } else {
                    None
                },
                pagination: PaginationView {
                    pages: data::PAGE_NUMBERS.to_vec(),
                    current_page: model.current_page,
                    summary: format!(
                        "Showing {} of {}",
                        data::ITEMS_PER_PAGE,
                        data::TOTAL_REPORTED_ITEMS
                    ),
                },
            }
        }

        fn build_invoice(model: &Model) -> InvoiceView {
            InvoiceView {
                draft: model.payment_form.draft.clone(),
                errors: model.payment_form.errors.clone(),
                submitting: model.payment_form.submitting,
                submitted: model.payment_form.submitted,
            }
        }

        fn build_page(model: &Model) -> PageView {
            match model.route.as_str() {
                data::HOME_ROUTE => PageView::Home(Self::build_home(model)),
                data::TRANSACTIONS_ROUTE => PageView::Transactions(Self::build_transactions(model)),
                data::INVOICE_ROUTE => PageView::Invoice(Self::build_invoice(model)),
                "/reports" => PageView::Reports,
                "/reconcillation" => PageView::Reconcillation,
                "/settings" => PageView::Settings,
                data::PROFILE_ROUTE => PageView::Profile,
                data::ADMIN_ROUTE => PageView::Admin,
                _ => PageView::NotFound,
            }
        }
    }

    impl crux_core::App for App {
        type Event = Event;
        type Model = Model;
        type ViewModel = ViewModel;
        type Capabilities = Capabilities;

        fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
            model.update_timestamp();

            let event_name = event.name();
            caps.telemetry.counter(&format!("event.{event_name}"), 1);
            if event.is_user_initiated() {
                caps.telemetry.event(
                    "user_action",
                    vec![("event".to_string(), event_name.to_string())],
                );
            }

            match event {
                Event::Started { viewport_width } => {
                    model.layout = LayoutState::at_width(viewport_width);
                    caps.kv.get_multi(SessionKey::all_keys(), |result| {
                        Event::SessionLoaded(Box::new(result))
                    });
                    caps.render.render();
                }

                Event::SessionLoaded(result) => {
                    match *result {
                        Ok(KvOutput::Values(values)) => {
                            model.session = SessionSnapshot::from_values(&values);
                            tracing::debug!(
                                target: "paydesk::session",
                                signed_in = model.session.signed_in(),
                                "session loaded from storage"
                            );
                        }
                        Ok(KvOutput::Written) => {
                            caps.telemetry.error(
                                "session load answered with a write receipt",
                                "STORAGE_ERROR",
                            );
                        }
                        Err(error) => {
                            caps.telemetry.error(&error.to_string(), "STORAGE_ERROR");
                            tracing::warn!(
                                target: "paydesk::session",
                                error = %error,
                                "session load failed, starting signed out"
                            );
                        }
                    }
                    model.session_loaded = true;
                    caps.render.render();
                }

                Event::ViewportResized { width } => {
                    if model.layout.resize(width) {
                        caps.telemetry.event(
                            "layout_mode_changed",
                            vec![("mobile".to_string(), model.layout.mobile.to_string())],
                        );
                    }
                    caps.render.render();
                }

                Event::MenuToggled => {
                    model.layout.toggle();
                    caps.render.render();
                }

                Event::MenuClosed => {
                    model.layout.close();
                    caps.render.render();
                }

                Event::PointerPressed { region } => {
                    model.layout.pointer_pressed(region);
                    // Any press away from a popup menu dismisses it.
                    if region != Some(RegionId::RowActionMenu) {
                        model.open_row_menu = None;
                    }
                    if region != Some(RegionId::NewPaymentMenu) {
                        model.new_payment_menu_open = false;
                    }
                    caps.render.render();
                }

                Event::NavigateTo(route) => {
                    Self::navigate(model, caps, route);
                    caps.render.render();
                }

                Event::SearchInputChanged(text) => {
                    if let Some(timer) = model.search.input_changed(text) {
                        caps.timer
                            .after(timer.id, timer.delay_ms, Event::SearchDebounceElapsed);
                    }
                    caps.render.render();
                }

                Event::SearchDebounceElapsed(elapsed) => {
                    match model.search.timer_elapsed(elapsed.id) {
                        SettleOutcome::Stale => {
                            // Superseded by a later keystroke. No render either;
                            // nothing observable happened.
                            caps.telemetry.counter("search.stale_timer", 1);
                        }
                        SettleOutcome::NoChange => {
                            if model.search.settled().trim().is_empty() {
                                model.active_query = None;
                                model.current_page = 1;
                            }
                            caps.render.render();
                        }
                        SettleOutcome::Trigger(query) => {
                            caps.telemetry.event(
                                "search_triggered",
                                vec![("length".to_string(), query.chars().count().to_string())],
                            );
                            model.active_query = Some(query);
                            model.current_page = 1;
                            caps.render.render();
                        }
                    }
                }

                Event::SearchSubmitted => {
                    if let Some(query) = model.search.submit() {
                        model.active_query = if query.trim().is_empty() {
                            None
                        } else {
                            Some(query)
                        };
                        model.current_page = 1;
                    }
                    caps.render.render();
                }

                Event::SearchDelayChanged(delay_ms) => {
                    model.search.set_delay(delay_ms);
                    caps.render.render();
                }

                Event::RefreshResponded(result) => {
                    match *result {
                        Ok(response) => match api::decode_refresh(&response) {
                            Ok(grant) => {
                                model.session.apply_grant(&grant);
                                Self::persist_grant(caps, &grant);
                                let pending = model.token_guard.finish_refresh();
                                caps.telemetry.counter("token.refreshed", 1);
                                tracing::info!(
                                    target: "paydesk::auth",
                                    replayed = pending.len(),
                                    "token refresh complete"
                                );
                                for action in pending {
                                    match action {
                                        GuardedAction::SubmitPayment { payload } => {
                                            match model.session.access_token.clone() {
                                                Some(token) if !token.is_empty() => {
                                                    Self::post_payment(
                                                        model, caps, &payload, &token,
                                                    );
                                                }
                                                _ => Self::fail_submission(
                                                    model,
                                                    caps,
                                                    AppError::RefreshFailed,
                                                ),
                                            }
                                        }
                                    }
                                }
                            }
                            Err(error) => Self::refresh_failed(model, caps, error),
                        },
                        Err(error) => Self::refresh_failed(model, caps, error.into()),
                    }
                    caps.render.render();
                }

                Event::TokensPersisted(result) => {
                    // Partial saves are tolerated; the next launch refreshes.
                    if let Err(error) = *result {
                        caps.telemetry.error(&error.to_string(), "STORAGE_ERROR");
                        tracing::warn!(
                            target: "paydesk::session",
                            error = %error,
                            "token write failed, session continues in memory"
                        );
                    }
                }

                Event::HomeSectionSelected(section) => {
                    model.home_section = section;
                    caps.render.render();
                }

                Event::TabSelected(tab) => {
                    model.active_tab = tab;
                    model.current_page = 1;
                    model.open_row_menu = None;
                    caps.render.render();
                }

                Event::PageSelected(page) => {
                    model.current_page = page.clamp(1, data::PAGE_NUMBERS[data::PAGE_NUMBERS.len() - 1]);
                    caps.render.render();
                }

                Event::RowMenuToggled(payment_id) => {
                    model.open_row_menu = if model.open_row_menu == Some(payment_id) {
                        None
                    } else {
                        Some(payment_id)
                    };
                    model.new_payment_menu_open = false;
                    caps.render.render();
                }

                Event::RowActionInvoked { payment_id, action } => {
                    model.open_row_menu = None;
                    caps.telemetry.event(
                        "row_action",
                        vec![
                            ("action".to_string(), action.code().to_string()),
                            ("payment_id".to_string(), payment_id.to_string()),
                        ],
                    );
                    caps.render.render();
                }

                Event::NewPaymentMenuToggled => {
                    model.new_payment_menu_open = !model.new_payment_menu_open;
                    model.open_row_menu = None;
                    caps.render.render();
                }

                Event::NewPaymentOptionChosen(option) => {
                    model.new_payment_menu_open = false;
                    match option {
                        NewPaymentOption::AddInvoice => {
                            Self::navigate(model, caps, data::INVOICE_ROUTE.to_string());
                        }
                        NewPaymentOption::UploadBulkInvoice | NewPaymentOption::DownloadTemplate => {
                            caps.telemetry.event(
                                "new_payment_option",
                                vec![("option".to_string(), option.label().to_string())],
                            );
                        }
                    }
                    caps.render.render();
                }

                Event::ChatToggled => {
                    model.chat.open = !model.chat.open;
                    caps.render.render();
                }

                Event::ChatDraftChanged(text) => {
                    model.chat.draft = text;
                    caps.render.render();
                }

                Event::ChatSubmitted => {
                    let text = model.chat.draft.trim().to_string();
                    if !text.is_empty() {
                        model
                            .chat
                            .messages
                            .push(ChatMessage::text(ChatSender::User, &text, ""));
                        model.chat.draft.clear();
                    }
                    caps.render.render();
                }

                Event::FormFieldChanged { field, value } => {
                    model.payment_form.field_changed(field, value);
                    caps.render.render();
                }

                Event::FormSubmitted => {
                    match forms::validate(&model.payment_form.draft) {
                        Err(errors) => {
                            caps.telemetry.counter("invoice.validation_failed", 1);
                            model.payment_form.errors = errors;
                        }
                        Ok(payload) => {
                            model.payment_form.begin_submit();
                            Self::guarded_submit(model, caps, payload);
                        }
                    }
                    caps.render.render();
                }

                Event::PaymentPostResponded(result) => {
                    match *result {
                        Ok(response) => match api::decode_write(&response) {
                            Ok(_) => {
                                model.payment_form.submit_succeeded();
                                model.clear_error();
                                model.show_toast(data::PAYMENT_SUBMITTED_MESSAGE, ToastKind::Success);
                                caps.telemetry.counter("invoice.submitted", 1);
                            }
                            Err(error) => Self::fail_submission(model, caps, error),
                        },
                        Err(error) => Self::fail_submission(model, caps, error.into()),
                    }
                    caps.render.render();
                }

                Event::ToastDismissed => {
                    model.clear_toast();
                    caps.render.render();
                }

                Event::ErrorDismissed => {
                    model.clear_error();
                    caps.render.render();
                }
            }
        }

        fn view(&self, model: &Model) -> ViewModel {
            let role = model.session.role();

            let nav = data::NAV_ITEMS
                .iter()
                .filter(|item| !item.admin_only || role.is_admin())
                .map(|item| NavItemView {
                    route: item.route.to_string(),
                    label: item.label.to_string(),
                    icon: item.icon,
                    active: model.route == item.route,
                })
                .collect();

            ViewModel {
                page: Self::build_page(model),
                route: model.route.clone(),
                layout: LayoutView {
                    mobile: model.layout.mobile,
                    sidebar_open: model.layout.sidebar_open,
                    mobile_menu_open: model.layout.mobile_menu_open,
                    sidebar_width_px: model.layout.sidebar_width_px(),
                },
                nav,
                search: SearchView {
                    input: model.search.input.clone(),
                    placeholder: data::SEARCH_PLACEHOLDER.to_string(),
                    disabled: model.search.disabled,
                    active_query: model.active_query.clone(),
                },
                session: SessionView {
                    signed_in: model.session.signed_in(),
                    name: model
                        .session
                        .name
                        .clone()
                        .filter(|name| !name.is_empty())
                        .unwrap_or_else(|| data::FALLBACK_USER_NAME.to_string()),
                    email: model.session.email.clone(),
                    role,
                },
                chat: ChatView {
                    open: model.chat.open,
                    title: data::CHAT_TITLE.to_string(),
                    placeholder: data::CHAT_INPUT_PLACEHOLDER.to_string(),
                    draft: model.chat.draft.clone(),
                    messages: model.chat.messages.clone(),
                },
                balance: data::BALANCE_DISPLAY.to_string(),
                balance_updated: data::BALANCE_UPDATED_LABEL.to_string(),
                error: model.active_error.as_ref().map(UserFacingError::from),
                toast: model
                    .active_toast
                    .as_ref()
                    .filter(|toast| !toast.is_expired(model.view_timestamp_ms))
                    .map(ToastView::from),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod error_tests {
        use super::*;

        #[test]
        fn test_http_error_display_matches_legacy_wording() {
            let error = AppError::Http { status: 500 };
            assert_eq!(error.to_string(), "HTTP error! status: 500");
        }

        #[test]
        fn test_refresh_error_display() {
            assert_eq!(
                AppError::NoRefreshToken.to_string(),
                "No refresh token available"
            );
            assert_eq!(
                AppError::RefreshFailed.to_string(),
                "Failed to refresh token"
            );
        }

        #[test]
        fn test_http_transport_errors_convert_by_shape() {
            let network: AppError = HttpError::Network {
                message: "dns".to_string(),
            }
            .into();
            assert_eq!(
                network,
                AppError::Network {
                    message: "dns".to_string()
                }
            );

            let timeout: AppError = HttpError::Timeout { after_ms: 30_000 }.into();
            assert_eq!(timeout, AppError::Timeout);

            let decode: AppError = HttpError::InvalidResponse {
                reason: "not json".to_string(),
            }
            .into();
            assert!(matches!(decode, AppError::Decode { .. }));

            let build: AppError = HttpError::InvalidHeader {
                name: "x".to_string(),
                reason: "bad".to_string(),
            }
            .into();
            assert!(matches!(build, AppError::RequestBuild { .. }));
        }

        #[test]
        fn test_kv_errors_become_storage_errors() {
            let error: AppError = KvError::Storage {
                message: "quota".to_string(),
                is_retryable: true,
            }
            .into();
            assert!(matches!(error, AppError::Storage { .. }));
            assert_eq!(error.kind(), ErrorKind::Storage);
        }

        #[test]
        fn test_retryability_follows_kind() {
            assert!(AppError::Timeout.is_retryable());
            assert!(AppError::Network {
                message: String::new()
            }
            .is_retryable());
            assert!(!AppError::Http { status: 500 }.is_retryable());
            assert!(!AppError::RefreshFailed.is_retryable());
        }

        #[test]
        fn test_error_codes_are_stable() {
            assert_eq!(AppError::Http { status: 401 }.code(), "HTTP_ERROR");
            assert_eq!(AppError::NoRefreshToken.code(), "AUTH_ERROR");
            assert_eq!(AppError::Timeout.code(), "TIMEOUT");
        }

        #[test]
        fn test_auth_errors_tell_the_user_to_sign_in() {
            let message = AppError::RefreshFailed.user_facing_message();
            assert!(message.contains("sign in again"));
            assert_eq!(message, AppError::NoRefreshToken.user_facing_message());
        }
    }

    mod toast_tests {
        use super::*;

        #[test]
        fn test_durations_by_kind() {
            assert_eq!(ToastKind::Info.default_duration_ms(), 3000);
            assert_eq!(ToastKind::Success.default_duration_ms(), 2000);
            assert_eq!(ToastKind::Warning.default_duration_ms(), 4000);
            assert_eq!(ToastKind::Error.default_duration_ms(), 5000);
        }

        #[test]
        fn test_expiry_window() {
            let mut toast = ToastMessage::new("saved", ToastKind::Success);
            toast.created_at_ms = 10_000;
            assert!(!toast.is_expired(10_000));
            assert!(!toast.is_expired(12_000));
            assert!(toast.is_expired(12_001));
        }
    }

    mod model_tests {
        use super::*;

        #[test]
        fn test_default_model_starts_on_home() {
            let model = Model::default();
            assert_eq!(model.route, data::HOME_ROUTE);
            assert_eq!(model.current_page, 1);
            assert!(!model.session_loaded);
            assert!(!model.token_guard.refresh_in_flight);
            assert_eq!(model.chat.messages, data::assistant_transcript());
        }

        #[test]
        fn test_toast_and_error_lifecycle() {
            let mut model = Model::default();
            model.show_toast("hello", ToastKind::Info);
            model.set_error(AppError::Timeout);
            assert!(model.active_toast.is_some());
            assert!(model.active_error.is_some());

            model.clear_toast();
            model.clear_error();
            assert!(model.active_toast.is_none());
            assert!(model.active_error.is_none());
        }
    }

    mod view_tests {
        use super::*;
        use crux_core::App as _;

        fn signed_in_model(role: &str) -> Model {
            let mut model = Model::default();
            model.session.access_token = Some(session::Secret::new("tok"));
            model.session.role = Some(role.to_string());
            model
        }

        #[test]
        fn test_nav_hides_admin_entry_for_non_admins() {
            let model = signed_in_model("callcentermanager");
            let view = App.view(&model);
            assert_eq!(view.nav.len(), data::NAV_ITEMS.len() - 1);
            assert!(view.nav.iter().all(|item| item.route != data::ADMIN_ROUTE));
        }

        #[test]
        fn test_nav_shows_admin_entry_for_admins() {
            let model = signed_in_model("Admin");
            let view = App.view(&model);
            assert!(view.nav.iter().any(|item| item.route == data::ADMIN_ROUTE));
        }

        #[test]
        fn test_active_route_is_flagged() {
            let mut model = signed_in_model("callcentermanager");
            model.route = data::TRANSACTIONS_ROUTE.to_string();
            let view = App.view(&model);
            let active: Vec<_> = view.nav.iter().filter(|item| item.active).collect();
            assert_eq!(active.len(), 1);
            assert_eq!(active[0].route, data::TRANSACTIONS_ROUTE);
        }

        #[test]
        fn test_missing_name_falls_back_to_default_display_name() {
            let view = App.view(&Model::default());
            assert_eq!(view.session.name, data::FALLBACK_USER_NAME);
            assert!(!view.session.signed_in);
        }

        #[test]
        fn test_transactions_page_shows_all_process_rows() {
            let mut model = signed_in_model("callcentermanager");
            model.route = data::TRANSACTIONS_ROUTE.to_string();
            let view = App.view(&model);
            let PageView::Transactions(page) = view.page else {
                panic!("expected the transactions page");
            };
            assert_eq!(page.rows.len(), data::PROCESS_ROWS.len());
            assert!(page.queue_warning.is_none());
            assert_eq!(page.pagination.summary, "Showing 10 of 135");
            assert_eq!(page.pagination.pages, vec![1, 2, 3, 4, 5]);
        }

        #[test]
        fn test_search_filter_narrows_rows_case_insensitively() {
            let mut model = signed_in_model("callcentermanager");
            model.route = data::TRANSACTIONS_ROUTE.to_string();
            model.active_query = Some("OKTA".to_string());
            let view = App.view(&model);
            let PageView::Transactions(page) = view.page else {
                panic!("expected the transactions page");
            };
            assert_eq!(page.rows.len(), 1);
            assert_eq!(page.rows[0].payee, "Okta Support");
        }

        #[test]
        fn test_queue_tab_shows_warning_and_queue_rows() {
            let mut model = signed_in_model("callcentermanager");
            model.route = data::TRANSACTIONS_ROUTE.to_string();
            model.active_tab = TransactionsTab::InQueue;
            let view = App.view(&model);
            let PageView::Transactions(page) = view.page else {
                panic!("expected the transactions page");
            };
            assert_eq!(page.rows.len(), data::QUEUE_ROWS.len());
            assert_eq!(page.queue_warning.as_deref(), Some(data::QUEUE_WARNING));
            assert_eq!(page.actions.len(), 2);
        }

        #[test]
        fn test_unknown_route_renders_not_found() {
            let mut model = Model::default();
            model.route = "/nowhere".to_string();
            let view = App.view(&model);
            assert_eq!(view.page, PageView::NotFound);
        }

        #[test]
        fn test_expired_toast_is_not_rendered() {
            let mut model = Model::default();
            model.show_toast("done", ToastKind::Success);
            let created = model.active_toast.as_ref().unwrap().created_at_ms;
            model.view_timestamp_ms = created + 60_000;
            let view = App.view(&model);
            assert!(view.toast.is_none());

            model.view_timestamp_ms = created + 1_000;
            let view = App.view(&model);
            assert_eq!(view.toast.unwrap().message, "done");
        }

        #[test]
        fn test_home_page_reflects_selected_section() {
            let mut model = signed_in_model("callcentermanager");
            model.home_section = HomeSection::UpcomingPayments;
            let view = App.view(&model);
            let PageView::Home(page) = view.page else {
                panic!("expected the home page");
            };
            assert_eq!(page.stats.len(), 4);
            assert_eq!(
                page.rows,
                vec![
                    HomePaymentView {
                        id: 5,
                        payee: "Mike Wilson".to_string(),
                        due_date: "2025-12-01".to_string(),
                        amount: "$1,500.00".to_string(),
                    },
                    HomePaymentView {
                        id: 6,
                        payee: "Sarah Davis".to_string(),
                        due_date: "2025-12-05".to_string(),
                        amount: "$900.00".to_string(),
                    },
                ]
            );
            let active: Vec<_> = page.sections.iter().filter(|s| s.active).collect();
            assert_eq!(active.len(), 1);
            assert_eq!(active[0].section, HomeSection::UpcomingPayments);
        }
    }
}
