//! Field rules applied to a draft before it may be sent to the directory.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::{
    domain::{Draft, DraftField},
    error::{FieldError, ValidationErrors},
};

pub const NOMBRE_MIN_CHARS: usize = 2;
pub const ESPECIALIDAD_MIN_CHARS: usize = 2;

pub const NOMBRE_TOO_SHORT: &str = "El nombre debe tener al menos 2 caracteres";
pub const EMAIL_INVALID: &str = "Email inválido";
pub const ESPECIALIDAD_TOO_SHORT: &str = "La especialidad debe tener al menos 2 caracteres";

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@(?:[A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .expect("email pattern compiles")
});

/// A draft that passed [`validate`]. Serializes exactly like the draft it wraps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidDraft(Draft);

impl ValidDraft {
    pub fn as_draft(&self) -> &Draft {
        &self.0
    }

    pub fn into_inner(self) -> Draft {
        self.0
    }
}

pub fn is_valid_email(email: &str) -> bool {
    !email.starts_with('.') && !email.contains("..") && EMAIL_RE.is_match(email)
}

/// Checks every field rule and reports all violations, not only the first.
pub fn validate(draft: &Draft) -> Result<ValidDraft, ValidationErrors> {
    let mut errors = Vec::new();

    if draft.nombre.chars().count() < NOMBRE_MIN_CHARS {
        errors.push(FieldError::new(DraftField::Nombre, NOMBRE_TOO_SHORT));
    }
    if !is_valid_email(&draft.email) {
        errors.push(FieldError::new(DraftField::Email, EMAIL_INVALID));
    }
    if draft.especialidad.chars().count() < ESPECIALIDAD_MIN_CHARS {
        errors.push(FieldError::new(
            DraftField::Especialidad,
            ESPECIALIDAD_TOO_SHORT,
        ));
    }

    match ValidationErrors::from_errors(errors) {
        Some(errors) => Err(errors),
        None => Ok(ValidDraft(draft.clone())),
    }
}
