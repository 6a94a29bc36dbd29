use serde::{Deserialize, Serialize};

use crate::capabilities::{HttpResult, KvResult, TimerElapsed};
use crate::data::{HomeSection, NewPaymentOption, RowAction, TransactionsTab};
use crate::forms::FormField;
use crate::layout::RegionId;

/// Everything that can happen to the core, from the shell or from a
/// capability resolving. Capability results are boxed to keep the enum
/// small; the shell only ever constructs the unboxed user-facing variants.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Event {
    // Lifecycle
    Started { viewport_width: u32 },
    SessionLoaded(Box<KvResult>),

    // Responsive chrome & navigation
    ViewportResized { width: u32 },
    MenuToggled,
    MenuClosed,
    PointerPressed { region: Option<RegionId> },
    NavigateTo(String),

    // Search box
    SearchInputChanged(String),
    SearchDebounceElapsed(TimerElapsed),
    SearchSubmitted,
    SearchDelayChanged(u64),

    // Token lifecycle
    RefreshResponded(Box<HttpResult>),
    TokensPersisted(Box<KvResult>),

    // Home page
    HomeSectionSelected(HomeSection),

    // Transactions page
    TabSelected(TransactionsTab),
    PageSelected(usize),
    RowMenuToggled(u64),
    RowActionInvoked { payment_id: u64, action: RowAction },
    NewPaymentMenuToggled,
    NewPaymentOptionChosen(NewPaymentOption),

    // Assistant panel
    ChatToggled,
    ChatDraftChanged(String),
    ChatSubmitted,

    // Invoice form
    FormFieldChanged { field: FormField, value: String },
    FormSubmitted,
    PaymentPostResponded(Box<HttpResult>),

    // Notices
    ToastDismissed,
    ErrorDismissed,
}

impl Event {
    /// Stable snake_case name, used as the telemetry counter key.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Started { .. } => "started",
            Self::SessionLoaded(_) => "session_loaded",
            Self::ViewportResized { .. } => "viewport_resized",
            Self::MenuToggled => "menu_toggled",
            Self::MenuClosed => "menu_closed",
            Self::PointerPressed { .. } => "pointer_pressed",
            Self::NavigateTo(_) => "navigate_to",
            Self::SearchInputChanged(_) => "search_input_changed",
            Self::SearchDebounceElapsed(_) => "search_debounce_elapsed",
            Self::SearchSubmitted => "search_submitted",
            Self::SearchDelayChanged(_) => "search_delay_changed",
            Self::RefreshResponded(_) => "refresh_responded",
            Self::TokensPersisted(_) => "tokens_persisted",
            Self::HomeSectionSelected(_) => "home_section_selected",
            Self::TabSelected(_) => "tab_selected",
            Self::PageSelected(_) => "page_selected",
            Self::RowMenuToggled(_) => "row_menu_toggled",
            Self::RowActionInvoked { .. } => "row_action_invoked",
            Self::NewPaymentMenuToggled => "new_payment_menu_toggled",
            Self::NewPaymentOptionChosen(_) => "new_payment_option_chosen",
            Self::ChatToggled => "chat_toggled",
            Self::ChatDraftChanged(_) => "chat_draft_changed",
            Self::ChatSubmitted => "chat_submitted",
            Self::FormFieldChanged { .. } => "form_field_changed",
            Self::FormSubmitted => "form_submitted",
            Self::PaymentPostResponded(_) => "payment_post_responded",
            Self::ToastDismissed => "toast_dismissed",
            Self::ErrorDismissed => "error_dismissed",
        }
    }

    /// True for events the shell raises on behalf of the user, false for
    /// capability results and timers resolving. Interaction counters only
    /// track the former.
    #[must_use]
    pub const fn is_user_initiated(&self) -> bool {
        !matches!(
            self,
            Self::SessionLoaded(_)
                | Self::SearchDebounceElapsed(_)
                | Self::RefreshResponded(_)
                | Self::TokensPersisted(_)
                | Self::PaymentPostResponded(_)
        )
    }
}
