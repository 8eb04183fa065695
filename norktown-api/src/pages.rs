/// Inline HTML rendering
///
/// The site is server-rendered without a template engine: each page is a
/// small HTML string assembled here and wrapped in a common layout. All
/// user-supplied values pass through [`escape`] before they reach markup.

use axum::{http::StatusCode, response::Html};
use norktown_shared::models::person::Person;
use norktown_shared::models::vehicle::{Vehicle, VehicleColor, VehicleName};

/// Escapes a string for safe embedding in HTML text and attribute values
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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

/// Wraps page content in the shared layout: title, nav, optional flash
fn layout(title: &str, flash: Option<&str>, logged_in: bool, body: &str) -> Html<String> {
    let nav = if logged_in {
        r#"<a href="/">Home</a> <a href="/logout">Log Out</a>"#
    } else {
        r#"<a href="/">Home</a> <a href="/login">Login</a> <a href="/register">Register</a>"#
    };

    let flash_html = flash
        .map(|message| format!(r#"<p class="flash">{}</p>"#, escape(message)))
        .unwrap_or_default();

    Html(format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{title} - Norktown Car Sales</title></head>\n<body>\n<nav>{nav}</nav>\n{flash_html}\n<h1>{title}</h1>\n{body}\n</body>\n</html>\n",
        title = escape(title),
        nav = nav,
        flash_html = flash_html,
        body = body,
    ))
}

/// Index page: every registered person, ordered by id
pub fn index_page(people: &[Person], flash: Option<&str>, logged_in: bool) -> Html<String> {
    let mut items = String::new();
    for person in people {
        items.push_str(&format!(
            r#"<li><a href="/person/{id}">{name}</a></li>"#,
            id = person.id,
            name = escape(&person.name),
        ));
    }

    let body = format!("<ul>{}</ul>", items);
    layout("All Persons", flash, logged_in, &body)
}

/// Detail page for one person and their vehicles
pub fn person_page(person: &Person, vehicles: &[Vehicle], logged_in: bool) -> Html<String> {
    let mut rows = String::new();
    for vehicle in vehicles {
        rows.push_str(&format!(
            "<li>{} {}{}</li>",
            vehicle.color,
            vehicle.name,
            if vehicle.sale { " (for sale)" } else { "" },
        ));
    }

    let body = format!(
        r#"<p>{email}</p>
<ul>{rows}</ul>
<p><a href="/edit/{id}">Edit vehicles</a></p>"#,
        email = escape(&person.email),
        rows = rows,
        id = person.id,
    );

    layout(&person.name, None, logged_in, &body)
}

/// Builds the `<option>` list for a select from the wire names
fn options(values: &[&str]) -> String {
    values
        .iter()
        .map(|value| format!(r#"<option value="{0}">{0}</option>"#, value))
        .collect()
}

/// Admin page: vehicle form plus the person's current vehicles
pub fn edit_page(person: &Person, vehicles: &[Vehicle], flash: Option<&str>) -> Html<String> {
    let mut rows = String::new();
    for vehicle in vehicles {
        rows.push_str(&format!(
            r#"<li>{color} {name} <a href="/deletevehicle/{vid}/{pid}">delete</a></li>"#,
            color = vehicle.color,
            name = vehicle.name,
            vid = vehicle.id,
            pid = person.id,
        ));
    }

    let name_options: Vec<&str> = VehicleName::ALL.iter().map(|n| n.as_str()).collect();
    let color_options: Vec<&str> = VehicleColor::ALL.iter().map(|c| c.as_str()).collect();

    let body = format!(
        r#"<ul>{rows}</ul>
<form method="post" action="/edit/{id}">
<label>Vehicle Name <select name="name">{names}</select></label>
<label>Vehicle Color <select name="color">{colors}</select></label>
<label>Sale <select name="sale"><option value="true">Yes</option><option value="false">No</option></select></label>
<button type="submit">Submit</button>
</form>"#,
        rows = rows,
        id = person.id,
        names = options(&name_options),
        colors = options(&color_options),
    );

    let title = format!("Edit {}", person.name);
    layout(&title, flash, true, &body)
}

/// Registration form page
pub fn register_page(flash: Option<&str>, logged_in: bool) -> Html<String> {
    let body = r#"<form method="post" action="/register">
<label>Email <input type="email" name="email" required></label>
<label>Name <input type="text" name="name" required></label>
<label>Password <input type="password" name="password" required></label>
<button type="submit">Sign Up</button>
</form>"#;

    layout("Register", flash, logged_in, body)
}

/// Login form page
pub fn login_page(flash: Option<&str>, logged_in: bool) -> Html<String> {
    let body = r#"<form method="post" action="/login">
<label>Email <input type="email" name="email" required></label>
<label>Password <input type="password" name="password" required></label>
<button type="submit">Log In</button>
</form>"#;

    layout("Login", flash, logged_in, body)
}

/// Error page for non-2xx responses
pub fn error_page(status: StatusCode, message: &str) -> Html<String> {
    let title = format!(
        "{} {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Error"),
    );
    let body = format!("<p>{}</p>", escape(message));
    layout(&title, None, false, &body)
}
