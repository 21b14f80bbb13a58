//! Link creation and update payloads, and the form they are built from.

use chrono::{DateTime, Local, TimeZone, Utc};
use std::borrow::Cow;

use serde::{Serialize, Serializer};
use validator::{Validate, ValidationError};

use crate::error::{AppError, FormField};
use crate::utils::datetime::{iso_instant, local_input_to_utc};
use crate::utils::url_pattern::{ALIAS_REGEX, is_url_shaped};

pub const URL_REQUIRED_MESSAGE: &str = "A valid URL is required.";
pub const URL_INVALID_MESSAGE: &str = "Please enter a valid URL (e.g., https://example.com).";
pub const ALIAS_INVALID_MESSAGE: &str = "Alias must be alphanumeric (a-z, 0-9) and dash.";
pub const PASSWORD_REQUIRED_MESSAGE: &str = "Password is required for protected links.";

/// Minimum password length for protected links.
pub const MIN_PASSWORD_LENGTH: usize = 6;

fn password_too_short_message() -> String {
    format!("Minimum {MIN_PASSWORD_LENGTH} characters required.")
}

/// Raw values of the "shorten a new URL" form.
///
/// Every text field is a plain string exactly as typed; empty means "not set".
/// The default value is the reset state of the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkForm {
    pub original_url: String,
    pub custom_alias: String,
    /// Wall-clock `YYYY-MM-DDTHH:MM`, or an RFC 3339 instant.
    pub expires_at: String,
    pub is_protected: bool,
    pub password: String,
    pub category: String,
}

impl LinkForm {
    pub fn new(original_url: impl Into<String>) -> Self {
        Self {
            original_url: original_url.into(),
            ..Self::default()
        }
    }

    /// Builds the creation payload, reading `expires_at` in the local time zone.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for the first invalid field, in form order.
    pub fn build(&self) -> Result<CreateLinkRequest, AppError> {
        self.build_in(&Local)
    }

    /// Builds the creation payload, reading `expires_at` in `tz`.
    ///
    /// Optional values are only included when they carry something: an empty
    /// alias, expiry or category is omitted, and the password is only sent
    /// for protected links.
    ///
    /// # Errors
    ///
    /// See [`Self::build`].
    pub fn build_in<Tz: TimeZone>(&self, tz: &Tz) -> Result<CreateLinkRequest, AppError> {
        if self.original_url.is_empty() {
            return Err(AppError::validation(
                FormField::OriginalUrl,
                URL_REQUIRED_MESSAGE,
            ));
        }

        let mut request = CreateLinkRequest {
            original_url: self.original_url.clone(),
            custom_alias: non_empty(&self.custom_alias),
            expires_at: None,
            is_protected: self.is_protected,
            password: None,
            category: non_empty(&self.category),
        };

        request.validate().map_err(|errors| {
            AppError::from_validation(
                &errors,
                &[
                    ("original_url", FormField::OriginalUrl),
                    ("custom_alias", FormField::CustomAlias),
                ],
            )
        })?;

        if !self.expires_at.is_empty() {
            let instant = local_input_to_utc(&self.expires_at, tz)
                .map_err(|e| AppError::validation(FormField::ExpiresAt, e.to_string()))?;
            request.expires_at = Some(instant);
        }

        if self.is_protected {
            validate_password(&self.password)?;
            request.password = Some(self.password.clone());
        }

        Ok(request)
    }

    /// Restores the form to its defaults.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn validate_password(password: &str) -> Result<(), AppError> {
    if password.is_empty() {
        return Err(AppError::validation(
            FormField::Password,
            PASSWORD_REQUIRED_MESSAGE,
        ));
    }

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::validation(
            FormField::Password,
            password_too_short_message(),
        ));
    }

    Ok(())
}

fn validate_url_shape(url: &str) -> Result<(), ValidationError> {
    if is_url_shaped(url) {
        Ok(())
    } else {
        Err(ValidationError::new("url_shape").with_message(Cow::Borrowed(URL_INVALID_MESSAGE)))
    }
}

fn validate_alias(alias: &str) -> Result<(), ValidationError> {
    if ALIAS_REGEX.is_match(alias) {
        Ok(())
    } else {
        Err(ValidationError::new("alias").with_message(Cow::Borrowed(ALIAS_INVALID_MESSAGE)))
    }
}

fn serialize_instant<S: Serializer>(
    value: &Option<DateTime<Utc>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(instant) => serializer.serialize_str(&iso_instant(*instant)),
        None => serializer.serialize_none(),
    }
}

/// Payload of `POST /api/urls/shorten`.
///
/// Built once per submission by [`LinkForm::build`]. Optional fields that are
/// `None` are left out of the JSON entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkRequest {
    #[validate(custom(function = "validate_url_shape"))]
    pub original_url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_alias"))]
    pub custom_alias: Option<String>,

    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_instant"
    )]
    pub expires_at: Option<DateTime<Utc>>,

    pub is_protected: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Partial update for an existing link, payload of `PUT /api/urls/{shortUrl}`.
///
/// `None` fields are left unchanged on the server and omitted from the JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_instant"
    )]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_protected: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remove_password: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl LinkPatch {
    /// Returns true if the patch would not change anything.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Checks alias and password rules shared with link creation.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an invalid alias, a short password,
    /// or a patch that both sets and removes the password.
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(alias) = &self.custom_alias
            && validate_alias(alias).is_err()
        {
            return Err(AppError::validation(
                FormField::CustomAlias,
                ALIAS_INVALID_MESSAGE,
            ));
        }

        if let Some(password) = &self.password {
            if self.remove_password == Some(true) {
                return Err(AppError::validation(
                    FormField::Password,
                    "Cannot set and remove the password in the same update.",
                ));
            }
            validate_password(password)?;
        }

        Ok(())
    }
}
