// SPDX-FileCopyrightText: 2026 DarkGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Signup form validation.

use std::sync::LazyLock;

use darkgpt_config::model::AuthConfig;
use darkgpt_core::DarkgptError;
use regex::Regex;
use serde::Deserialize;

static EMAIL_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

/// Signup input as submitted by a client.
#[derive(Debug, Clone, Deserialize)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl SignupForm {
    /// Validates every field, reporting all failures in one error, and
    /// returns the form with a trimmed name and a lowercased email.
    pub fn validate(&self, rules: &AuthConfig) -> Result<SignupForm, DarkgptError> {
        let name = self.name.trim();
        let email = normalize_email(&self.email);
        let mut problems = Vec::new();

        if name.chars().count() < rules.min_name_len {
            problems.push(format!(
                "name must be at least {} characters",
                rules.min_name_len
            ));
        }
        if !is_valid_email(&email) {
            problems.push("email address is not valid".to_string());
        }
        if self.password.chars().count() < rules.min_password_len {
            problems.push(format!(
                "password must be at least {} characters",
                rules.min_password_len
            ));
        }

        if !problems.is_empty() {
            return Err(DarkgptError::Validation(problems.join("; ")));
        }

        Ok(SignupForm {
            name: name.to_string(),
            email,
            password: self.password.clone(),
        })
    }
}

/// Trimmed, lowercased email used as the lookup key.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.as_ref().is_some_and(|re| re.is_match(email))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, email: &str, password: &str) -> SignupForm {
        SignupForm {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn accepts_and_normalizes() {
        let ok = form("  Ada ", " Ada@Example.COM ", "secret1")
            .validate(&AuthConfig::default())
            .unwrap();
        assert_eq!(ok.name, "Ada");
        assert_eq!(ok.email, "ada@example.com");
    }

    #[test]
    fn rejects_short_name() {
        let err = form("A", "a@b.co", "secret1")
            .validate(&AuthConfig::default())
            .unwrap_err();
        assert!(err.to_string().contains("name must be at least 2"));
    }

    #[test]
    fn rejects_malformed_email() {
        for email in ["plain", "a@b", "a b@c.de", "@c.de"] {
            let err = form("Ada", email, "secret1")
                .validate(&AuthConfig::default())
                .unwrap_err();
            assert!(
                err.to_string().contains("email address is not valid"),
                "{email} should be rejected"
            );
        }
    }

    #[test]
    fn reports_every_problem() {
        let err = form("", "nope", "123")
            .validate(&AuthConfig::default())
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("name"));
        assert!(message.contains("email"));
        assert!(message.contains("password must be at least 6"));
    }

    #[test]
    fn honours_configured_minimums() {
        let rules = AuthConfig {
            min_name_len: 1,
            min_password_len: 12,
        };
        assert!(form("A", "a@b.co", "short-pass").validate(&rules).is_err());
        assert!(form("A", "a@b.co", "long-enough-pass").validate(&rules).is_ok());
    }
}
