use serde::{Deserialize, Serialize};

pub const HOME_ROUTE: &str = "/home";
pub const TRANSACTIONS_ROUTE: &str = "/transactions";
pub const INVOICE_ROUTE: &str = "/invoice";
pub const PROFILE_ROUTE: &str = "/profile";
pub const ADMIN_ROUTE: &str = "/admin";

pub const SEARCH_PLACEHOLDER: &str = "Search";
pub const CHAT_TITLE: &str = "Assistant";
pub const CHAT_INPUT_PLACEHOLDER: &str = "Enter your message...";

pub const BALANCE_DISPLAY: &str = "$ 1,000,000.00";
pub const BALANCE_UPDATED_LABEL: &str = "Now";
pub const FALLBACK_USER_NAME: &str = "John Smith";

pub const ITEMS_PER_PAGE: usize = 10;
pub const TOTAL_REPORTED_ITEMS: usize = 135;
/// Page numbers the selector offers. The backend reports more pages than
/// this, but the widget has always shown a fixed window of five.
pub const PAGE_NUMBERS: [usize; 5] = [1, 2, 3, 4, 5];

pub const QUEUE_WARNING: &str =
    "There are certain entries with incomplete information. please complete them before submitting.";

pub const PAYMENT_SUBMITTED_MESSAGE: &str = "Payment request submitted successfully!";
pub const PAYMENT_FAILED_MESSAGE: &str = "Failed to submit payment request. Please try again.";
pub const UNAUTHORIZED_ROUTE_MESSAGE: &str = "You are not authorized to view this page";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavIcon {
    Home,
    Wallet,
    FileText,
    Search,
    PlusSquare,
    Shield,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub route: &'static str,
    pub label: &'static str,
    pub icon: NavIcon,
    pub admin_only: bool,
}

pub const NAV_ITEMS: [NavItem; 6] = [
    NavItem {
        route: HOME_ROUTE,
        label: "Home",
        icon: NavIcon::Home,
        admin_only: false,
    },
    NavItem {
        route: TRANSACTIONS_ROUTE,
        label: "Transactions",
        icon: NavIcon::Wallet,
        admin_only: false,
    },
    NavItem {
        route: "/reports",
        label: "Reports",
        icon: NavIcon::FileText,
        admin_only: false,
    },
    // Historical spelling; saved links and shell routing depend on it.
    NavItem {
        route: "/reconcillation",
        label: "Bank Reconcillation",
        icon: NavIcon::Search,
        admin_only: false,
    },
    NavItem {
        route: "/settings",
        label: "Settings",
        icon: NavIcon::PlusSquare,
        admin_only: false,
    },
    NavItem {
        route: ADMIN_ROUTE,
        label: "Admin",
        icon: NavIcon::Shield,
        admin_only: true,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    DueSoon,
    Overdue,
    Completed,
}

impl PaymentStatus {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::DueSoon => "Due Soon",
            Self::Overdue => "Overdue",
            Self::Completed => "Completed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaymentRow {
    pub id: u64,
    pub payee: &'static str,
    pub status: PaymentStatus,
    pub initiator: &'static str,
    pub due_date: &'static str,
    pub amount: &'static str,
}

const fn process_row(id: u64, payee: &'static str, status: PaymentStatus) -> PaymentRow {
    PaymentRow {
        id,
        payee,
        status,
        initiator: "Kamran Nobari",
        due_date: "30 Apr 2025",
        amount: "$1,000,000",
    }
}

pub const PROCESS_ROWS: [PaymentRow; 9] = [
    process_row(123, "Okta Support", PaymentStatus::Pending),
    process_row(124, "BSA Motors", PaymentStatus::Pending),
    process_row(125, "Ekta Hardwares pvt", PaymentStatus::Pending),
    process_row(126, "J&J Associate", PaymentStatus::Pending),
    process_row(127, "Macro PLC LLW", PaymentStatus::DueSoon),
    process_row(128, "Worx Enterprise", PaymentStatus::Overdue),
    process_row(129, "JWS Steel Manufactures", PaymentStatus::Completed),
    process_row(130, "Hotjar", PaymentStatus::Completed),
    process_row(131, "Milton pvt ltd", PaymentStatus::Completed),
];

pub const QUEUE_ROWS: [PaymentRow; 2] = [
    PaymentRow {
        id: 132,
        payee: "Tech Corp",
        status: PaymentStatus::Pending,
        initiator: "John Doe",
        due_date: "05 May 2025",
        amount: "$500,000",
    },
    PaymentRow {
        id: 133,
        payee: "Global Solutions",
        status: PaymentStatus::Pending,
        initiator: "Jane Smith",
        due_date: "10 May 2025",
        amount: "$750,000",
    },
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionsTab {
    #[default]
    InProcess,
    InQueue,
}

impl TransactionsTab {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::InProcess => "In Process (9)",
            Self::InQueue => "In Queue (5)",
        }
    }

    #[must_use]
    pub const fn rows(self) -> &'static [PaymentRow] {
        match self {
            Self::InProcess => &PROCESS_ROWS,
            Self::InQueue => &QUEUE_ROWS,
        }
    }

    #[must_use]
    pub const fn actions(self) -> &'static [RowAction] {
        match self {
            Self::InProcess => &[
                RowAction::RevokePayment,
                RowAction::NotifyApprover,
                RowAction::EditRequest,
            ],
            Self::InQueue => &[RowAction::ViewDetails, RowAction::Approve],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowAction {
    RevokePayment,
    NotifyApprover,
    EditRequest,
    ViewDetails,
    Approve,
}

impl RowAction {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::RevokePayment => "Revoke Payment",
            Self::NotifyApprover => "Notify Approver",
            Self::EditRequest => "Edit Request",
            Self::ViewDetails => "View Details",
            Self::Approve => "Approve",
        }
    }

    /// Short code reported to telemetry when the action is invoked.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::RevokePayment => "revoke",
            Self::NotifyApprover => "notify",
            Self::EditRequest => "edit",
            Self::ViewDetails => "view",
            Self::Approve => "approve",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewPaymentOption {
    AddInvoice,
    UploadBulkInvoice,
    DownloadTemplate,
}

impl NewPaymentOption {
    pub const ALL: [Self; 3] = [Self::AddInvoice, Self::UploadBulkInvoice, Self::DownloadTemplate];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::AddInvoice => "Add an Invoice",
            Self::UploadBulkInvoice => "Upload Bulk Invoice",
            Self::DownloadTemplate => "Download Template",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatCard {
    pub label: &'static str,
    pub value: u32,
}

pub const STAT_CARDS: [StatCard; 4] = [
    StatCard {
        label: "Information Requested",
        value: 15,
    },
    StatCard {
        label: "Recently Completed",
        value: 4,
    },
    StatCard {
        label: "Upcoming Payments",
        value: 12,
    },
    StatCard {
        label: "Under Review",
        value: 5,
    },
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HomeSection {
    #[default]
    ActionRequested,
    RecentlyCompleted,
    UpcomingPayments,
}

impl HomeSection {
    pub const ALL: [Self; 3] = [
        Self::ActionRequested,
        Self::RecentlyCompleted,
        Self::UpcomingPayments,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ActionRequested => "Action Requested",
            Self::RecentlyCompleted => "Recently Completed",
            Self::UpcomingPayments => "Upcoming Payments",
        }
    }

    #[must_use]
    pub const fn rows(self) -> &'static [HomePayment] {
        match self {
            Self::ActionRequested => &[
                HomePayment {
                    id: 1,
                    payee: "John Doe",
                    due_date: "2025-11-01",
                    amount: "$1,200.00",
                },
                HomePayment {
                    id: 2,
                    payee: "Jane Smith",
                    due_date: "2025-11-05",
                    amount: "$850.00",
                },
            ],
            Self::RecentlyCompleted => &[
                HomePayment {
                    id: 3,
                    payee: "Bob Johnson",
                    due_date: "2025-11-10",
                    amount: "$2,300.00",
                },
                HomePayment {
                    id: 4,
                    payee: "Alice Brown",
                    due_date: "2025-11-15",
                    amount: "$750.00",
                },
            ],
            Self::UpcomingPayments => &[
                HomePayment {
                    id: 5,
                    payee: "Mike Wilson",
                    due_date: "2025-12-01",
                    amount: "$1,500.00",
                },
                HomePayment {
                    id: 6,
                    payee: "Sarah Davis",
                    due_date: "2025-12-05",
                    amount: "$900.00",
                },
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HomePayment {
    pub id: u64,
    pub payee: &'static str,
    pub due_date: &'static str,
    pub amount: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatSender {
    Bot,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatBody {
    Text {
        text: String,
    },
    File {
        name: String,
        date: String,
        size_label: String,
        kind: String,
    },
    Link {
        label: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: ChatSender,
    pub body: ChatBody,
    pub time: String,
}

impl ChatMessage {
    #[must_use]
    pub fn text(sender: ChatSender, text: &str, time: &str) -> Self {
        Self {
            sender,
            body: ChatBody::Text {
                text: text.to_string(),
            },
            time: time.to_string(),
        }
    }
}

/// The canned conversation the assistant panel opens with.
#[must_use]
pub fn assistant_transcript() -> Vec<ChatMessage> {
    vec![
        ChatMessage::text(ChatSender::Bot, "Hi, How can I help you?", "10:30 AM"),
        ChatMessage::text(
            ChatSender::User,
            "Can you help in updating bulk payment transaction?\n\nI have the files ready.",
            "10:32 AM",
        ),
        ChatMessage::text(ChatSender::Bot, "Sure, please upload the file.", "10:32 AM"),
        ChatMessage {
            sender: ChatSender::User,
            body: ChatBody::File {
                name: "Sample_Quote.xlsx".to_string(),
                date: "28 Apr 2025".to_string(),
                size_label: "12KB".to_string(),
                kind: "xlsx".to_string(),
            },
            time: "10:33 AM".to_string(),
        },
        ChatMessage::text(
            ChatSender::Bot,
            "Thanks, I see 64 payment instruction files here and updated them in queue.",
            "10:34 AM",
        ),
        ChatMessage {
            sender: ChatSender::Bot,
            body: ChatBody::Link {
                label: "Go to Queue".to_string(),
            },
            time: "10:34 AM".to_string(),
        },
    ]
}
