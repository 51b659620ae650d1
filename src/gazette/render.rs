//! Named page templates rendered from a JSON object of values.
//!
//! Every interpolated value is HTML-escaped; templates never trust their input.

use anyhow::{anyhow, Result};
use html_escape::{encode_double_quoted_attribute, encode_text};
use serde_json::{Map, Value};
use std::fmt::Write as _;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Template {
    Front,
    NewPost,
    Permalink,
    Signup,
    Login,
    Welcome,
    Birthday,
    Thanks,
    NotFound,
    Error,
}

impl Template {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Front => "front.html",
            Self::NewPost => "newpost.html",
            Self::Permalink => "permalink.html",
            Self::Signup => "signup.html",
            Self::Login => "login.html",
            Self::Welcome => "welcome.html",
            Self::Birthday => "birthday.html",
            Self::Thanks => "thanks.html",
            Self::NotFound => "404.html",
            Self::Error => "500.html",
        }
    }
}

pub trait Renderer: Send + Sync {
    /// Render `template` with `values`, which must be a JSON object.
    ///
    /// # Errors
    /// Returns an error if `values` is not an object.
    fn render(&self, template: Template, values: &Value) -> Result<String>;
}

/// Built-in renderer producing minimal HTML pages.
#[derive(Clone, Copy, Debug, Default)]
pub struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    fn render(&self, template: Template, values: &Value) -> Result<String> {
        let values = values
            .as_object()
            .ok_or_else(|| anyhow!("values for {} must be an object", template.name()))?;

        let (title, body) = match template {
            Template::Front => ("Blog", front(values)),
            Template::NewPost => ("New post", new_post(values)),
            Template::Permalink => ("Blog", permalink(values)),
            Template::Signup => ("Signup", signup(values)),
            Template::Login => ("Login", login(values)),
            Template::Welcome => ("Welcome", welcome(values)),
            Template::Birthday => ("Birthday", birthday(values)),
            Template::Thanks => ("Thanks", "<p>Thanks! That is a valid day!</p>".to_string()),
            Template::NotFound => ("Not found", "<h1>404</h1><p>Nothing here.</p>".to_string()),
            Template::Error => (
                "Error",
                "<h1>500</h1><p>Something went wrong, please try again.</p>".to_string(),
            ),
        };

        Ok(layout(title, &body))
    }
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
        encode_text(title)
    )
}

fn text<'a>(values: &'a Map<String, Value>, key: &str) -> &'a str {
    values.get(key).and_then(Value::as_str).unwrap_or_default()
}

fn error_block(values: &Map<String, Value>) -> String {
    format!(
        "<div class=\"error\" style=\"color: red\">{}</div>",
        encode_text(text(values, "error"))
    )
}

fn input(kind: &str, name: &str, value: &str) -> String {
    format!(
        "<input type=\"{kind}\" name=\"{name}\" value=\"{}\">",
        encode_double_quoted_attribute(value)
    )
}

// Content keeps its line breaks.
fn post_html(post: &Value) -> String {
    let subject = post.get("subject").and_then(Value::as_str).unwrap_or_default();
    let content = post.get("content").and_then(Value::as_str).unwrap_or_default();
    let created = post.get("created").and_then(Value::as_str).unwrap_or_default();
    let id = post.get("id").and_then(Value::as_i64).unwrap_or_default();

    format!(
        "<div class=\"post\">\n<a class=\"post-subject\" href=\"/post/{id}\">{}</a>\n<div class=\"post-date\">{}</div>\n<pre class=\"post-content\">{}</pre>\n</div>",
        encode_text(subject),
        encode_text(created),
        encode_text(content).replace('\n', "<br>")
    )
}

fn front(values: &Map<String, Value>) -> String {
    let mut body = String::from("<h1><a href=\"/\">Blog</a></h1>\n<a href=\"/newpost\">New post</a>\n");
    let posts = values.get("posts").and_then(Value::as_array);
    match posts {
        Some(posts) if !posts.is_empty() => {
            for post in posts {
                let _ = writeln!(body, "{}", post_html(post));
            }
        }
        _ => body.push_str("<p>No posts yet.</p>\n"),
    }
    body
}

fn new_post(values: &Map<String, Value>) -> String {
    format!(
        "<h1>New post</h1>\n<form method=\"post\">\n<label>Subject {}</label>\n<label>Content <textarea name=\"content\">{}</textarea></label>\n{}\n<input type=\"submit\">\n</form>",
        input("text", "subject", text(values, "subject")),
        encode_text(text(values, "content")),
        error_block(values)
    )
}

fn permalink(values: &Map<String, Value>) -> String {
    let post = values.get("post").map(post_html).unwrap_or_default();
    format!("<h1><a href=\"/\">Blog</a></h1>\n{post}")
}

fn signup(values: &Map<String, Value>) -> String {
    format!(
        "<h1>Signup</h1>\n<form method=\"post\">\n<label>Username {}</label>\n<label>Password {}</label>\n<label>Verify Password {}</label>\n<label>Email (optional) {}</label>\n{}\n<input type=\"submit\">\n</form>\n<a href=\"/login\">Login</a>",
        input("text", "username", text(values, "username")),
        input("password", "password", ""),
        input("password", "verify", ""),
        input("text", "email", text(values, "email")),
        error_block(values)
    )
}

fn login(values: &Map<String, Value>) -> String {
    format!(
        "<h1>Login</h1>\n<form method=\"post\">\n<label>Username {}</label>\n<label>Password {}</label>\n{}\n<input type=\"submit\">\n</form>\n<a href=\"/signup\">Signup</a>",
        input("text", "username", text(values, "username")),
        input("password", "password", ""),
        error_block(values)
    )
}

fn welcome(values: &Map<String, Value>) -> String {
    format!(
        "<h2>Welcome, {}!</h2>\n<a href=\"/logout\">Logout</a>",
        encode_text(text(values, "username"))
    )
}

fn birthday(values: &Map<String, Value>) -> String {
    format!(
        "<form method=\"post\">\nWhat is your birthday?\n<br>\n<label>Month {}</label>\n<label>Day {}</label>\n<label>Year {}</label>\n{}\n<br>\n<input type=\"submit\">\n</form>",
        input("text", "month", text(values, "month")),
        input("text", "day", text(values, "day")),
        input("text", "year", text(values, "year")),
        error_block(values)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(template: Template, values: &Value) -> String {
        HtmlRenderer.render(template, values).unwrap_or_default()
    }

    #[test]
    fn render_requires_object_values() {
        assert!(HtmlRenderer.render(Template::Thanks, &json!([])).is_err());
        assert!(HtmlRenderer.render(Template::Thanks, &json!({})).is_ok());
    }

    #[test]
    fn every_template_renders_a_document() {
        for template in [
            Template::Front,
            Template::NewPost,
            Template::Permalink,
            Template::Signup,
            Template::Login,
            Template::Welcome,
            Template::Birthday,
            Template::Thanks,
            Template::NotFound,
            Template::Error,
        ] {
            let html = render(template, &json!({}));
            assert!(html.starts_with("<!DOCTYPE html>"), "{}", template.name());
        }
    }

    #[test]
    fn interpolated_values_are_escaped() {
        let html = render(
            Template::Signup,
            &json!({"username": "\"><script>", "error": "<b>bad</b>"}),
        );
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<b>bad</b>"));
        assert!(html.contains("&lt;b&gt;bad&lt;/b&gt;"));
    }

    #[test]
    fn signup_never_echoes_passwords() {
        let html = render(
            Template::Signup,
            &json!({"username": "alice", "password": "hunter2", "verify": "hunter2"}),
        );
        assert!(html.contains("value=\"alice\""));
        assert!(!html.contains("hunter2"));
    }

    #[test]
    fn front_lists_posts_with_links() {
        let html = render(
            Template::Front,
            &json!({"posts": [
                {"id": 7, "subject": "Hello", "content": "line one\nline two", "created": "2024-01-01T00:00:00Z"}
            ]}),
        );
        assert!(html.contains("href=\"/post/7\""));
        assert!(html.contains("Hello"));
        assert!(html.contains("line one<br>line two"));
    }

    #[test]
    fn front_without_posts_says_so() {
        assert!(render(Template::Front, &json!({"posts": []})).contains("No posts yet."));
    }

    #[test]
    fn welcome_greets_user() {
        assert!(render(Template::Welcome, &json!({"username": "alice"})).contains("Welcome, alice!"));
    }
}
