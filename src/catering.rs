//! Catering inquiries
//!
//! Validation for the catering booking form, plus the one-outstanding-
//! submission discipline. Delivering the inquiry over HTTP and the follow-up
//! emails are external collaborators; a network failure leaves all core
//! state untouched and the form eligible for retry.

use serde::Serialize;
use thiserror::Error;

/// User-facing validation and submission errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InquiryError {
    /// Name was empty.
    #[error("please enter your name")]
    MissingName,

    /// Email was empty or not shaped like an address.
    #[error("enter a valid email")]
    InvalidEmail,

    /// No event date was selected.
    #[error("select a date")]
    MissingDate,

    /// Guest count below one.
    #[error("at least 1 guest")]
    GuestCount,

    /// A submission for this form is already outstanding.
    #[error("submission already in progress")]
    SubmissionInFlight,
}

/// Raw form input, as typed.
#[derive(Debug, Clone, Default)]
pub struct InquiryForm {
    /// Contact name.
    pub name: String,

    /// Contact email.
    pub email: String,

    /// Event date, as entered by the date control.
    pub event_date: String,

    /// Expected guest count.
    pub guests: u32,

    /// Free-text notes.
    pub notes: String,
}

/// A validated inquiry, ready to submit. Serializes as the original
/// booking-endpoint payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Inquiry {
    /// Contact name, trimmed.
    pub name: String,

    /// Contact email, trimmed.
    pub email: String,

    /// Event date.
    #[serde(rename = "date")]
    pub event_date: String,

    /// Guest count, at least one.
    pub guests: u32,

    /// Notes, trimmed.
    pub notes: String,
}

impl InquiryForm {
    /// Validates the form, producing a submittable [`Inquiry`].
    ///
    /// # Errors
    ///
    /// Returns the first failing [`InquiryError`]: missing name, malformed
    /// email, missing date, or a guest count below one.
    pub fn validate(&self) -> Result<Inquiry, InquiryError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(InquiryError::MissingName);
        }

        let email = self.email.trim();
        if !valid_email(email) {
            return Err(InquiryError::InvalidEmail);
        }

        let event_date = self.event_date.trim();
        if event_date.is_empty() {
            return Err(InquiryError::MissingDate);
        }

        if self.guests < 1 {
            return Err(InquiryError::GuestCount);
        }

        Ok(Inquiry {
            name: name.to_string(),
            email: email.to_string(),
            event_date: event_date.to_string(),
            guests: self.guests,
            notes: self.notes.trim().to_string(),
        })
    }
}

/// Tracks whether a submission is outstanding for one form. The submit
/// control is disabled while a send is in flight; duplicate submissions are
/// prevented here, not by server-side idempotency.
#[derive(Debug, Default)]
pub struct SubmitState {
    in_flight: bool,
}

impl SubmitState {
    /// Marks a submission as started.
    ///
    /// # Errors
    ///
    /// Returns [`InquiryError::SubmissionInFlight`] if one is already
    /// outstanding.
    pub fn begin(&mut self) -> Result<(), InquiryError> {
        if self.in_flight {
            return Err(InquiryError::SubmissionInFlight);
        }

        self.in_flight = true;

        Ok(())
    }

    /// Marks the outstanding submission as finished, success or failure.
    pub fn finish(&mut self) {
        self.in_flight = false;
    }

    /// Whether a submission is currently outstanding.
    #[must_use]
    pub fn in_flight(&self) -> bool {
        self.in_flight
    }
}

/// Mirrors the original form's email shape check: no whitespace, exactly one
/// `@`, non-empty local part, and an interior dot in the domain.
fn valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}
