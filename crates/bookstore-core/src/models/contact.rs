use serde::Deserialize;

use crate::AppError;

/// Contact form submission. `website` is a honeypot that humans leave empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
    /// Checkbox; present when ticked. The form names it `copy`.
    #[serde(default, alias = "copy")]
    pub want_copy: Option<String>,
    #[serde(default)]
    pub website: String,
}

/// Message ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub want_copy: bool,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

impl ContactForm {
    pub fn is_spam(&self) -> bool {
        !self.website.trim().is_empty()
    }

    pub fn into_message(
        self,
        ip: Option<String>,
        user_agent: Option<String>,
    ) -> Result<NewContactMessage, AppError> {
        let name = self.name.trim();
        let email = self.email.trim();
        let subject = self.subject.trim();
        let message = self.message.trim();

        if name.is_empty() || email.is_empty() || subject.is_empty() || message.is_empty() {
            return Err(AppError::Validation(
                "Please complete all fields.".to_string(),
            ));
        }

        Ok(NewContactMessage {
            name: name.to_string(),
            email: email.to_string(),
            subject: subject.to_string(),
            message: message.to_string(),
            want_copy: self.want_copy.is_some(),
            ip,
            user_agent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_honeypot_marks_spam() {
        let form = ContactForm {
            website: "http://spam.example".to_string(),
            ..Default::default()
        };
        assert!(form.is_spam());
        assert!(!ContactForm::default().is_spam());
    }

    #[test]
    fn test_all_fields_required() {
        let form = ContactForm {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            subject: "  ".to_string(),
            message: "Hello".to_string(),
            ..Default::default()
        };
        let err = form.into_message(None, None).unwrap_err();
        assert!(err.to_string().contains("Please complete all fields."));
    }

    #[test]
    fn test_checkbox_presence_sets_want_copy() {
        let form = ContactForm {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            subject: "Order".to_string(),
            message: "Hello".to_string(),
            want_copy: Some("on".to_string()),
            website: String::new(),
        };
        let message = form
            .into_message(Some("10.0.0.1".to_string()), None)
            .unwrap();
        assert!(message.want_copy);
        assert_eq!(message.ip.as_deref(), Some("10.0.0.1"));
    }
}
