//! Server-rendered views.
//!
//! Plain HTML strings assembled here and returned through `axum`'s
//! `Html` wrapper; every user-supplied value goes through `escape`.

use crate::domain::model::{Owner, PetType};
use crate::domain::validate::FieldErrors;
use crate::web::forms::PetForm;
use std::fmt::Write;

/// Minimal HTML entity escaping for text and attribute positions.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8"/>
  <title>{title} - PetClinic</title>
</head>
<body>
{body}
</body>
</html>"#,
        title = escape(title),
        body = body
    )
}

fn field_error(errors: &FieldErrors, field: &str) -> String {
    match errors.message_for(field) {
        Some(msg) => format!(r#" <span class="error">{}</span>"#, escape(msg)),
        None => String::new(),
    }
}

/// The shared create/edit pet form. The submitted values are always
/// rendered back so a rejected submission keeps the user's input.
pub fn pet_form(
    owner: &Owner,
    form: &PetForm,
    types: &[PetType],
    errors: &FieldErrors,
    action: &str,
) -> String {
    let mut options = String::new();
    for t in types {
        let selected = if form.type_id == Some(t.id) {
            " selected"
        } else {
            ""
        };
        let _ = write!(
            options,
            r#"<option value="{}"{}>{}</option>"#,
            t.id,
            selected,
            escape(&t.name)
        );
    }

    let body = format!(
        r#"<h2>Pet</h2>
<p>Owner: {owner_name}</p>
<form method="post" action="{action}">
  <label for="name">Name</label>
  <input type="text" id="name" name="name" value="{name}"/>{name_error}
  <br/>
  <label for="birth_date">Birth date</label>
  <input type="date" id="birth_date" name="birth_date" value="{birth_date}"/>{birth_date_error}
  <br/>
  <label for="type_id">Type</label>
  <select id="type_id" name="type_id">
    <option value=""></option>
    {options}
  </select>{type_error}
  <br/>
  <button type="submit">Save Pet</button>
</form>"#,
        owner_name = escape(&format!("{} {}", owner.first_name, owner.last_name)),
        action = escape(action),
        name = escape(&form.name),
        name_error = field_error(errors, "name"),
        birth_date = form
            .birth_date
            .map(|d| d.to_string())
            .unwrap_or_default(),
        birth_date_error = field_error(errors, "birth_date"),
        options = options,
        type_error = field_error(errors, "type"),
    );
    page("Pet form", &body)
}

/// Owner detail page; the redirect target after a successful submission.
/// `message` is the one-shot success note carried over the redirect.
pub fn owner_detail(owner: &Owner, message: Option<&str>) -> String {
    let mut body = String::new();
    if let Some(msg) = message {
        let _ = write!(body, r#"<p class="message">{}</p>"#, escape(msg));
    }
    let _ = write!(
        body,
        "<h2>Owner: {} {}</h2>\n<h3>Pets</h3>\n<ul>",
        escape(&owner.first_name),
        escape(&owner.last_name)
    );
    for pet in &owner.pets {
        let kind = pet
            .pet_type
            .as_ref()
            .map(|t| t.name.as_str())
            .unwrap_or("unknown");
        let born = pet
            .birth_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let edit = pet
            .id
            .map(|id| format!(r#" <a href="/owners/{}/pets/{}/edit">edit</a>"#, owner.id, id))
            .unwrap_or_default();
        let _ = write!(
            body,
            "<li>{} ({}, born {}){}</li>",
            escape(&pet.name),
            escape(kind),
            born,
            edit
        );
    }
    let _ = write!(
        body,
        r#"</ul>
<a href="/owners/{}/pets/new">Add new pet</a>"#,
        owner.id
    );
    page("Owner details", &body)
}

/// Generic error page, rendered by the global error mapping.
pub fn error_page(message: &str) -> String {
    let body = format!(
        "<h2>Something happened...</h2>\n<p>{}</p>",
        escape(message)
    );
    page("Error", &body)
}
