use crate::errors::{ApiError, FieldError};

pub const DEFAULT_PAGE_SIZE: u32 = 50;
pub const MAX_PAGE_SIZE: u32 = 200;

/// Collects field-level problems across a payload so a single 400 carries
/// every offending field, the way the original request schemas reported.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trims and requires a non-empty value.
    pub fn require(&mut self, field: &str, value: &str) -> String {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.errors.push(FieldError::new(field, "obrigatorio"));
        }
        trimmed.to_string()
    }

    /// Normalizes an optional text field: trims, maps empty to None.
    pub fn optional(&mut self, value: Option<&str>) -> Option<String> {
        match value.map(str::trim) {
            None | Some("") => None,
            Some(v) => Some(v.to_string()),
        }
    }

    pub fn optional_email(&mut self, field: &str, value: Option<&str>) -> Option<String> {
        let value = self.optional(value)?;
        if !looks_like_email(&value) {
            self.errors.push(FieldError::new(field, "email invalido"));
            return None;
        }
        Some(value)
    }

    pub fn email(&mut self, field: &str, value: &str) -> String {
        let trimmed = self.require(field, value);
        if !trimmed.is_empty() && !looks_like_email(&trimmed) {
            self.errors.push(FieldError::new(field, "email invalido"));
        }
        trimmed
    }

    pub fn range_0_100(&mut self, field: &str, value: i32) -> i32 {
        if !(0..=100).contains(&value) {
            self.errors
                .push(FieldError::new(field, "deve estar entre 0 e 100"));
        }
        value
    }

    pub fn one_of(&mut self, field: &str, value: &str, allowed: &[&str]) -> String {
        let trimmed = value.trim().to_string();
        if !allowed.contains(&trimmed.as_str()) {
            self.errors.push(FieldError::new(
                field,
                format!("valor invalido, esperado um de: {}", allowed.join(", ")),
            ));
        }
        trimmed
    }

    pub fn check(&mut self, condition: bool, field: &str, message: &str) {
        if !condition {
            self.errors.push(FieldError::new(field, message));
        }
    }

    pub fn min_len(&mut self, field: &str, value: &str, min: usize) {
        if value.trim().chars().count() < min {
            self.errors
                .push(FieldError::new(field, format!("minimo de {min} caracteres")));
        }
    }

    pub fn finish(self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation(self.errors))
        }
    }
}

fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

/// limit/offset with the list defaults: 50 per page, capped at 200.
pub fn page_params(limit: Option<u32>, offset: Option<u32>) -> (i64, i64) {
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE) as i64;
    let offset = offset.unwrap_or(0) as i64;
    (limit, offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_trims_and_flags_empty() {
        let mut v = Validator::new();
        assert_eq!(v.require("nome", "  Ana  "), "Ana");
        v.require("titulo", "   ");
        let err = v.finish().unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn optional_maps_blank_to_none() {
        let mut v = Validator::new();
        assert_eq!(v.optional(Some("  ")), None);
        assert_eq!(v.optional(None), None);
        assert_eq!(v.optional(Some(" x ")), Some("x".to_string()));
        assert!(v.finish().is_ok());
    }

    #[test]
    fn email_shape_is_checked() {
        let mut v = Validator::new();
        v.email("email", "ana@empresa.com.br");
        assert!(v.finish().is_ok());

        let mut v = Validator::new();
        v.email("email", "sem-arroba");
        assert!(v.finish().is_err());

        let mut v = Validator::new();
        v.optional_email("email", Some("a@b"));
        assert!(v.finish().is_err());
    }

    #[test]
    fn range_and_enum_checks() {
        let mut v = Validator::new();
        v.range_0_100("probabilidade", 101);
        v.one_of("status", "fechado", &["aberto", "ganho", "perdido"]);
        assert!(v.finish().is_err());

        let mut v = Validator::new();
        v.range_0_100("probabilidade", 100);
        v.one_of("status", "aberto", &["aberto", "ganho", "perdido"]);
        assert!(v.finish().is_ok());
    }

    #[test]
    fn multiple_fields_are_collected() {
        let mut v = Validator::new();
        v.require("nome", "");
        v.range_0_100("probabilidade", -1);
        let err = v.finish().unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn paging_defaults_and_cap() {
        assert_eq!(page_params(None, None), (50, 0));
        assert_eq!(page_params(Some(500), Some(10)), (200, 10));
        assert_eq!(page_params(Some(20), None), (20, 0));
    }
}
