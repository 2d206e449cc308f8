//! Form validators: submitted DTOs to typed domain input.
//!
//! Static rules are declared on the DTOs with `validator`; the limits
//! that come from configuration and the tag payload are checked here.

use inkwell_core::domain::{PostDraft, PostStatus, PostSubmission};
use inkwell_core::ports::{FieldErrors, FormValidator};
use inkwell_core::services::parse_payload;
use inkwell_shared::dto::{LoginForm, PostForm, RegisterForm};
use validator::{Validate, ValidationErrors};

use crate::config::FormLimits;

/// Copy `validator` failures into `errors`.
fn collect(result: Result<(), ValidationErrors>, errors: &mut FieldErrors) {
    let Err(failures) = result else {
        return;
    };

    for (field, list) in failures.field_errors() {
        for failure in list.iter() {
            let message = failure
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("Invalid value ({}).", failure.code));
            errors.add(field.to_string(), message);
        }
    }
}

/// Text fields are compared and stored without surrounding whitespace.
fn strip(value: String) -> String {
    let trimmed = value.trim();
    if trimmed.len() == value.len() {
        value
    } else {
        trimmed.to_string()
    }
}

/// Validates the post creation form, including its tag payload.
pub struct PostFormValidator {
    pub limits: FormLimits,
}

impl FormValidator<PostForm> for PostFormValidator {
    type Output = PostSubmission;

    fn validate(&self, form: PostForm) -> Result<PostSubmission, FieldErrors> {
        let form = PostForm {
            title: strip(form.title),
            description: strip(form.description),
            hashtags: strip(form.hashtags),
            content: strip(form.content),
            preview_img_url: strip(form.preview_img_url),
            post_status: form.post_status,
        };
        let mut errors = FieldErrors::new();
        collect(form.validate(), &mut errors);

        let content_length = form.content.chars().count();
        if content_length > self.limits.max_post_length {
            errors.add(
                "content",
                format!(
                    "Ensure this value has at most {} characters (it has {}).",
                    self.limits.max_post_length, content_length
                ),
            );
        }

        let status = match form.post_status.parse::<PostStatus>() {
            Ok(status) => Some(status),
            Err(_) => {
                errors.add(
                    "post_status",
                    format!(
                        "Select a valid choice. '{}' is not one of the available choices.",
                        form.post_status
                    ),
                );
                None
            }
        };

        let tags = if errors.contains("hashtags") {
            None
        } else {
            match parse_payload(&form.hashtags) {
                Ok(tags) => Some(tags),
                Err(e) => {
                    tracing::debug!("Rejected tag payload: {}", e);
                    errors.add("hashtags", "Enter a valid list of tags.");
                    None
                }
            }
        };

        match (status, tags) {
            (Some(status), Some(tags)) if errors.is_empty() => Ok(PostSubmission {
                draft: PostDraft {
                    title: form.title,
                    description: form.description,
                    content: form.content,
                    preview_img_url: form.preview_img_url,
                    status,
                },
                tags,
            }),
            _ => Err(errors),
        }
    }
}

/// A validated registration.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

pub struct RegisterFormValidator {
    pub limits: FormLimits,
}

impl FormValidator<RegisterForm> for RegisterFormValidator {
    type Output = Registration;

    fn validate(&self, form: RegisterForm) -> Result<Registration, FieldErrors> {
        let form = RegisterForm {
            username: strip(form.username),
            email: strip(form.email),
            ..form
        };
        let mut errors = FieldErrors::new();
        collect(form.validate(), &mut errors);

        if form.password1.chars().count() < self.limits.min_password_length {
            errors.add(
                "password1",
                format!(
                    "This password is too short. It must contain at least {} characters.",
                    self.limits.min_password_length
                ),
            );
        }

        errors.into_result(Registration {
            username: form.username,
            email: form.email,
            password: form.password1,
        })
    }
}

/// Username and password as submitted at login.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

pub struct LoginFormValidator;

impl FormValidator<LoginForm> for LoginFormValidator {
    type Output = Credentials;

    fn validate(&self, form: LoginForm) -> Result<Credentials, FieldErrors> {
        let form = LoginForm {
            username: strip(form.username),
            ..form
        };
        let mut errors = FieldErrors::new();
        collect(form.validate(), &mut errors);

        errors.into_result(Credentials {
            username: form.username,
            password: form.password,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_form() -> PostForm {
        PostForm {
            title: "Title".to_string(),
            description: "Description".to_string(),
            hashtags: r#"[{"value":"Muhammad"},{"value":""},{"value":"Aida"}]"#.to_string(),
            content: "Content".to_string(),
            preview_img_url: "https://example.com/apparatus/image.png".to_string(),
            post_status: "DR".to_string(),
        }
    }

    fn post_validator() -> PostFormValidator {
        PostFormValidator {
            limits: FormLimits::default(),
        }
    }

    #[test]
    fn test_valid_post_form() {
        let submission = post_validator().validate(post_form()).unwrap();

        assert_eq!(submission.tags, vec!["Muhammad".to_string(), "Aida".to_string()]);
        assert_eq!(submission.draft.status, PostStatus::Draft);
        assert_eq!(submission.draft.title, "Title");
    }

    #[test]
    fn test_malformed_hashtags_is_a_field_error() {
        let form = PostForm {
            hashtags: "Muhammad, Aida".to_string(),
            ..post_form()
        };

        let errors = post_validator().validate(form).unwrap_err();

        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["hashtags"]);
    }

    #[test]
    fn test_missing_fields_are_reported_together() {
        let errors = post_validator().validate(PostForm::default()).unwrap_err();

        for field in [
            "title",
            "description",
            "hashtags",
            "content",
            "preview_img_url",
            "post_status",
        ] {
            assert!(errors.contains(field), "missing error for {}", field);
        }
    }

    #[test]
    fn test_content_limit_comes_from_config() {
        let validator = PostFormValidator {
            limits: FormLimits {
                max_post_length: 10,
                ..FormLimits::default()
            },
        };
        let form = PostForm {
            content: "x".repeat(11),
            ..post_form()
        };

        let errors = validator.validate(form).unwrap_err();

        assert!(errors.contains("content"));
    }

    #[test]
    fn test_blank_text_fields_are_missing() {
        let form = PostForm {
            title: "   ".to_string(),
            description: "\n\t".to_string(),
            content: " ".to_string(),
            ..post_form()
        };

        let errors = post_validator().validate(form).unwrap_err();

        assert_eq!(
            errors.fields().collect::<Vec<_>>(),
            vec!["content", "description", "title"]
        );
    }

    #[test]
    fn test_surrounding_whitespace_is_not_stored() {
        let form = PostForm {
            title: "  Title ".to_string(),
            preview_img_url: " https://example.com/apparatus/image.png\n".to_string(),
            ..post_form()
        };

        let submission = post_validator().validate(form).unwrap();

        assert_eq!(submission.draft.title, "Title");
        assert_eq!(
            submission.draft.preview_img_url,
            "https://example.com/apparatus/image.png"
        );
    }

    #[test]
    fn test_passwords_keep_their_whitespace() {
        let validator = RegisterFormValidator {
            limits: FormLimits::default(),
        };
        let form = RegisterForm {
            username: " somename ".to_string(),
            email: "somename@example.com".to_string(),
            password1: " p@ssw0rd ".to_string(),
            password2: " p@ssw0rd ".to_string(),
        };

        let registration = validator.validate(form).unwrap();

        assert_eq!(registration.username, "somename");
        assert_eq!(registration.password, " p@ssw0rd ");
    }

    #[test]
    fn test_unknown_status() {
        let form = PostForm {
            post_status: "ZZ".to_string(),
            ..post_form()
        };

        let errors = post_validator().validate(form).unwrap_err();

        assert!(errors.contains("post_status"));
    }

    #[test]
    fn test_register_password_rules() {
        let validator = RegisterFormValidator {
            limits: FormLimits::default(),
        };
        let form = RegisterForm {
            username: "somename".to_string(),
            email: "somename@example.com".to_string(),
            password1: "short".to_string(),
            password2: "shorter".to_string(),
        };

        let errors = validator.validate(form).unwrap_err();

        assert!(errors.contains("password1"));
        assert!(errors.contains("password2"));
        assert!(!errors.contains("username"));
    }

    #[test]
    fn test_valid_registration() {
        let validator = RegisterFormValidator {
            limits: FormLimits::default(),
        };
        let form = RegisterForm {
            username: "somename".to_string(),
            email: "somename@example.com".to_string(),
            password1: "p@ssw0rd".to_string(),
            password2: "p@ssw0rd".to_string(),
        };

        let registration = validator.validate(form).unwrap();

        assert_eq!(registration.username, "somename");
        assert_eq!(registration.password, "p@ssw0rd");
    }

    #[test]
    fn test_login_requires_both_fields() {
        let errors = LoginFormValidator
            .validate(LoginForm {
                username: "somename".to_string(),
                password: String::new(),
            })
            .unwrap_err();

        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["password"]);
    }
}
