use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Form fields of the payment-request (invoice) form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    PayeeName,
    RecurringPayment,
    PaymentType,
    DueDate,
    Amount,
    Currency,
    Description,
}

impl FormField {
    /// Wire name, used both as the error-map key and the POST body key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::PayeeName => "payeeName",
            Self::RecurringPayment => "recurringPayment",
            Self::PaymentType => "paymentType",
            Self::DueDate => "dueDate",
            Self::Amount => "amount",
            Self::Currency => "currency",
            Self::Description => "description",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurringChoice {
    Yes,
    #[default]
    No,
}

impl RecurringChoice {
    fn from_form_value(value: &str) -> Option<Self> {
        match value {
            "yes" => Some(Self::Yes),
            "no" => Some(Self::No),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentKind {
    #[default]
    Instant,
    Scheduled,
}

impl PaymentKind {
    fn from_form_value(value: &str) -> Option<Self> {
        match value {
            "instant" => Some(Self::Instant),
            "scheduled" => Some(Self::Scheduled),
            _ => None,
        }
    }
}

/// Raw field values exactly as typed or selected. Radio groups and the
/// currency select are prefilled, text inputs start empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDraft {
    pub payee_name: String,
    pub recurring_payment: String,
    pub payment_type: String,
    pub due_date: String,
    pub amount: String,
    pub currency: String,
    pub description: String,
}

impl Default for PaymentDraft {
    fn default() -> Self {
        Self {
            payee_name: String::new(),
            recurring_payment: "no".to_string(),
            payment_type: "instant".to_string(),
            due_date: String::new(),
            amount: String::new(),
            currency: "INR".to_string(),
            description: String::new(),
        }
    }
}

impl PaymentDraft {
    pub fn set(&mut self, field: FormField, value: String) {
        match field {
            FormField::PayeeName => self.payee_name = value,
            FormField::RecurringPayment => self.recurring_payment = value,
            FormField::PaymentType => self.payment_type = value,
            FormField::DueDate => self.due_date = value,
            FormField::Amount => self.amount = value,
            FormField::Currency => self.currency = value,
            FormField::Description => self.description = value,
        }
    }
}

/// A draft that passed validation, typed and ready to POST.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub payee_name: String,
    pub recurring_payment: RecurringChoice,
    pub payment_type: PaymentKind,
    pub due_date: String,
    pub amount: f64,
    pub currency: String,
    pub description: String,
}

/// Validate a draft against the payment-request schema.
///
/// On failure, at most one message per field, keyed by [`FormField::key`];
/// per field, the first failing rule wins. Values are checked as-is, no
/// trimming, except that the amount is parsed the way `Number()` would.
pub fn validate(draft: &PaymentDraft) -> Result<PaymentRequest, BTreeMap<String, String>> {
    let mut errors = BTreeMap::new();
    let mut fail = |field: FormField, message: &str| {
        errors.insert(field.key().to_string(), message.to_string());
    };

    if draft.payee_name.chars().count() < 2 {
        fail(FormField::PayeeName, "Payee name is required");
    }

    let recurring = RecurringChoice::from_form_value(&draft.recurring_payment);
    if recurring.is_none() {
        fail(FormField::RecurringPayment, "Select an option");
    }

    let payment_type = PaymentKind::from_form_value(&draft.payment_type);
    if payment_type.is_none() {
        fail(FormField::PaymentType, "Select a payment type");
    }

    if draft.due_date.is_empty() {
        fail(FormField::DueDate, "Due date is required");
    }

    let mut amount = None;
    if draft.amount.is_empty() {
        fail(FormField::Amount, "Amount is required");
    } else {
        match draft.amount.trim().parse::<f64>() {
            Ok(value) if value > 0.0 => amount = Some(value),
            _ => fail(FormField::Amount, "Amount must be a positive number"),
        }
    }

    if draft.description.chars().count() < 2 {
        fail(FormField::Description, "Description is required");
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(PaymentRequest {
        payee_name: draft.payee_name.clone(),
        recurring_payment: recurring.unwrap_or_default(),
        payment_type: payment_type.unwrap_or_default(),
        due_date: draft.due_date.clone(),
        amount: amount.unwrap_or_default(),
        currency: draft.currency.clone(),
        description: draft.description.clone(),
    })
}

/// Everything the invoice page needs to render the form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentFormState {
    pub draft: PaymentDraft,
    pub errors: BTreeMap<String, String>,
    pub submitting: bool,
    pub submitted: bool,
}

impl PaymentFormState {
    pub fn field_changed(&mut self, field: FormField, value: String) {
        self.draft.set(field, value);
    }

    /// Called once a validated payload is on its way to the API.
    pub fn begin_submit(&mut self) {
        self.errors.clear();
        self.submitting = true;
        self.submitted = false;
    }

    pub fn submit_failed(&mut self) {
        self.submitting = false;
    }

    /// Successful POST: clear the draft back to its prefilled state.
    pub fn submit_succeeded(&mut self) {
        self.draft = PaymentDraft::default();
        self.errors.clear();
        self.submitting = false;
        self.submitted = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_draft() -> PaymentDraft {
        PaymentDraft {
            payee_name: "Okta Support".to_string(),
            due_date: "2025-11-01".to_string(),
            amount: "1500.50".to_string(),
            description: "Quarterly support invoice".to_string(),
            ..PaymentDraft::default()
        }
    }

    #[test]
    fn default_draft_prefills_selects_and_currency() {
        let draft = PaymentDraft::default();
        assert_eq!(draft.recurring_payment, "no");
        assert_eq!(draft.payment_type, "instant");
        assert_eq!(draft.currency, "INR");
        assert_eq!(draft.payee_name, "");
    }

    #[test]
    fn valid_draft_produces_a_typed_request() {
        let request = validate(&valid_draft()).unwrap();
        assert_eq!(request.payee_name, "Okta Support");
        assert_eq!(request.recurring_payment, RecurringChoice::No);
        assert_eq!(request.payment_type, PaymentKind::Instant);
        assert!((request.amount - 1500.50).abs() < f64::EPSILON);
        assert_eq!(request.currency, "INR");
    }

    #[test]
    fn each_rule_reports_its_exact_message() {
        let cases: [(FormField, &str, &str); 7] = [
            (FormField::PayeeName, "J", "Payee name is required"),
            (FormField::RecurringPayment, "maybe", "Select an option"),
            (FormField::PaymentType, "deferred", "Select a payment type"),
            (FormField::DueDate, "", "Due date is required"),
            (FormField::Amount, "", "Amount is required"),
            (FormField::Amount, "-5", "Amount must be a positive number"),
            (FormField::Description, "x", "Description is required"),
        ];
        for (field, value, expected) in cases {
            let mut draft = valid_draft();
            draft.set(field, value.to_string());
            let errors = validate(&draft).unwrap_err();
            assert_eq!(
                errors.get(field.key()).map(String::as_str),
                Some(expected),
                "field {field:?} with value {value:?}"
            );
            assert_eq!(errors.len(), 1);
        }
    }

    #[test]
    fn empty_amount_reports_the_required_message_only() {
        let mut draft = valid_draft();
        draft.amount = String::new();
        let errors = validate(&draft).unwrap_err();
        assert_eq!(errors.get("amount").map(String::as_str), Some("Amount is required"));
    }

    #[test]
    fn non_numeric_and_zero_amounts_are_rejected() {
        for bad in ["abc", "1,000", "0", "NaN"] {
            let mut draft = valid_draft();
            draft.amount = bad.to_string();
            let errors = validate(&draft).unwrap_err();
            assert_eq!(
                errors.get("amount").map(String::as_str),
                Some("Amount must be a positive number"),
                "amount {bad:?}"
            );
        }
    }

    #[test]
    fn amount_with_surrounding_whitespace_parses() {
        let mut draft = valid_draft();
        draft.amount = " 5 ".to_string();
        let request = validate(&draft).unwrap();
        assert!((request.amount - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn untouched_form_collects_every_text_field_error() {
        let errors = validate(&PaymentDraft::default()).unwrap_err();
        let keys: Vec<&str> = errors.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["amount", "description", "dueDate", "payeeName"]);
    }

    #[test]
    fn payee_name_is_not_trimmed_before_the_length_check() {
        let mut draft = valid_draft();
        draft.payee_name = "  ".to_string();
        // Two characters of whitespace satisfy the length rule, as typed.
        assert!(validate(&draft).is_ok());
    }

    #[test]
    fn request_serializes_with_wire_field_names() {
        let request = validate(&valid_draft()).unwrap();
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["payeeName"], "Okta Support");
        assert_eq!(value["recurringPayment"], "no");
        assert_eq!(value["paymentType"], "instant");
        assert_eq!(value["dueDate"], "2025-11-01");
    }

    #[test]
    fn submit_lifecycle_resets_the_draft_on_success() {
        let mut form = PaymentFormState {
            draft: valid_draft(),
            ..PaymentFormState::default()
        };
        form.begin_submit();
        assert!(form.submitting);
        assert!(!form.submitted);

        form.submit_succeeded();
        assert!(!form.submitting);
        assert!(form.submitted);
        assert_eq!(form.draft, PaymentDraft::default());
    }

    #[test]
    fn failed_submit_keeps_the_draft_for_correction() {
        let mut form = PaymentFormState {
            draft: valid_draft(),
            ..PaymentFormState::default()
        };
        form.begin_submit();
        form.submit_failed();
        assert!(!form.submitting);
        assert!(!form.submitted);
        assert_eq!(form.draft, valid_draft());
    }
}
