//! Validation of the sign-in, sign-up and password reset forms.
//!
//! Each form checks its fields before anything is sent to the auth service and
//! reports the first problem as `CoinvergeError::InvalidForm` carrying the
//! message shown to the user.
use crate::auth::session::{Credentials, normalize_email};
use crate::error::CoinvergeError;
use crate::result::Result;

/// Shortest accepted password.
pub const MIN_PASSWORD_LEN: usize = 6;

const FILL_ALL_FIELDS: &str = "Please fill in all fields";

fn invalid(message: &str) -> CoinvergeError {
    CoinvergeError::InvalidForm(message.to_string())
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Fields of the sign-in form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignInForm {
    /// Account email.
    pub email: String,
    /// Password as typed.
    pub password: String,
}

impl SignInForm {
    /// Credentials to sign in with, if both fields are filled.
    pub fn validate(&self) -> Result<Credentials> {
        if blank(&self.email) || blank(&self.password) {
            return Err(invalid(FILL_ALL_FIELDS));
        }
        Ok(Credentials::new(&self.email, &self.password))
    }
}

/// Fields of the sign-up form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpForm {
    /// Account email.
    pub email: String,
    /// Password as typed.
    pub password: String,
    /// Password repeated.
    pub confirm_password: String,
}

impl SignUpForm {
    /// Credentials for the new account.
    pub fn validate(&self) -> Result<Credentials> {
        if blank(&self.email) || blank(&self.password) || blank(&self.confirm_password) {
            return Err(invalid(FILL_ALL_FIELDS));
        }
        if self.password != self.confirm_password {
            return Err(invalid("Passwords do not match"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(invalid("Password must be at least 6 characters"));
        }
        Ok(Credentials::new(&self.email, &self.password))
    }
}

/// Field of the forgot-password form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResetPasswordForm {
    /// Address to send the link to.
    pub email: String,
}

impl ResetPasswordForm {
    /// Normalized address to send the reset link to.
    pub fn validate(&self) -> Result<String> {
        if blank(&self.email) {
            return Err(invalid("Please enter your email address"));
        }
        Ok(normalize_email(&self.email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign_up(email: &str, password: &str, confirm: &str) -> SignUpForm {
        SignUpForm {
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[test]
    fn sign_in_requires_both_fields() {
        let form = SignInForm {
            email: String::from("a@example.com"),
            password: String::from("  "),
        };
        assert_eq!(form.validate().unwrap_err().to_string(), "Please fill in all fields");

        let form = SignInForm {
            password: String::from("pw"),
            ..form
        };
        assert_eq!(form.validate().unwrap().email, "a@example.com");
    }

    #[test]
    fn sign_up_rules_in_order() {
        let err = |form: SignUpForm| form.validate().unwrap_err().to_string();
        assert_eq!(err(sign_up("", "secret1", "secret1")), "Please fill in all fields");
        assert_eq!(err(sign_up("a@example.com", "secret1", "secret2")), "Passwords do not match");
        assert_eq!(
            err(sign_up("a@example.com", "abc", "abc")),
            "Password must be at least 6 characters"
        );
        assert!(sign_up("a@example.com", "abcdef", "abcdef").validate().is_ok());
    }

    #[test]
    fn reset_requires_email() {
        let form = ResetPasswordForm::default();
        assert_eq!(form.validate().unwrap_err().to_string(), "Please enter your email address");
        let form = ResetPasswordForm {
            email: String::from(" Me@Example.com"),
        };
        assert_eq!(form.validate().unwrap(), "me@example.com");
    }
}
