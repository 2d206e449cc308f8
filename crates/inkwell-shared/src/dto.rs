//! Data Transfer Objects - submitted forms and response bodies.
//!
//! Form fields default to empty strings so a missing field is reported as
//! a validation message rather than a decoding failure.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Registration form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RegisterForm {
    #[validate(length(min = 1, max = 45, message = "Username must be 1 to 45 characters."))]
    pub username: String,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    #[validate(length(min = 1, message = "This field is required."))]
    pub password1: String,
    #[validate(must_match(other = "password1", message = "The two password fields didn't match."))]
    pub password2: String,
}

/// Login form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoginForm {
    #[validate(length(min = 1, message = "This field is required."))]
    pub username: String,
    #[validate(length(min = 1, message = "This field is required."))]
    pub password: String,
}

/// Post creation form. `hashtags` is the JSON payload produced by the
/// tag input widget, e.g. `[{"value":"Rust"},{"value":"CI/CD"}]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PostForm {
    #[validate(length(min = 1, max = 80, message = "Title must be 1 to 80 characters."))]
    pub title: String,
    #[validate(length(min = 1, message = "This field is required."))]
    pub description: String,
    #[validate(length(min = 1, max = 300, message = "Tags must be 1 to 300 characters."))]
    pub hashtags: String,
    #[validate(length(min = 1, message = "This field is required."))]
    pub content: String,
    #[validate(
        length(max = 300, message = "Ensure this value has at most 300 characters."),
        url(message = "Enter a valid URL.")
    )]
    pub preview_img_url: String,
    pub post_status: String,
}

/// Public view of a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagResponse {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: String,
    pub author_id: String,
    pub title: String,
    pub description: String,
    pub content: String,
    pub preview_img_url: String,
    pub post_status: String,
    pub post_date: String,
    pub modified_date: String,
    pub hashtags: Vec<TagResponse>,
}
