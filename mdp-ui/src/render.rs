//! HTML rendering for the condition pages
//!
//! The page shell lives in `ui/page.html`; this module fills in the
//! navigation, the form built from the feature schema and the outcome box.

use mdp_common::pipeline::{Outcome, Prediction};
use mdp_common::schema::RawValues;
use mdp_common::{Condition, FieldKind, FieldSpec};
use std::fmt::Write;

const PAGE_HTML: &str = include_str!("../ui/page.html");

/// Full page for one condition.
///
/// `values` are echoed back into the controls exactly as submitted.
pub fn condition_page(
    condition: Condition,
    values: &RawValues,
    prediction: Option<&Prediction>,
) -> String {
    let mut content = String::new();
    let _ = writeln!(content, "        <h1>{}</h1>", escape_html(condition.heading()));
    let _ = writeln!(content, "        <hr>");
    let _ = writeln!(
        content,
        "        <details class=\"about\"><summary>About {}</summary><p>{}</p></details>",
        escape_html(condition.title()),
        escape_html(condition.about())
    );
    content.push_str(&form(condition, values));
    if let Some(prediction) = prediction {
        content.push_str(&outcome_box(prediction));
    }

    shell(condition.title(), Some(condition), &content)
}

/// Page for an unknown condition slug
pub fn not_found_page(path: &str) -> String {
    let content = format!(
        "        <h1>Page not found</h1>\n        <p>No prediction page at <code>{}</code>.</p>\n",
        escape_html(path)
    );
    shell("Not found", None, &content)
}

fn shell(title: &str, selected: Option<Condition>, content: &str) -> String {
    PAGE_HTML
        .replace("{{TITLE}}", &escape_html(title))
        .replace("{{NAV}}", &navigation(selected))
        .replace("{{CONTENT}}", content)
}

fn navigation(selected: Option<Condition>) -> String {
    let mut nav = String::new();
    for condition in Condition::ALL {
        let class = if Some(condition) == selected {
            "nav-link selected"
        } else {
            "nav-link"
        };
        let _ = writeln!(
            nav,
            "        <a class=\"{}\" href=\"/{}\">{}</a>",
            class,
            condition.slug(),
            escape_html(condition.title())
        );
    }
    nav
}

fn form(condition: Condition, values: &RawValues) -> String {
    let mut html = String::new();
    let _ = writeln!(html, "        <form method=\"post\" action=\"/{}\">", condition.slug());
    let _ = writeln!(
        html,
        "        <div class=\"fields\" style=\"grid-template-columns: repeat({}, 1fr)\">",
        condition.columns()
    );
    for field in condition.schema().fields {
        let current = values
            .get(field.key)
            .cloned()
            .unwrap_or_else(|| field.format_value(field.default));
        html.push_str(&control(field, &current));
    }
    let _ = writeln!(html, "        </div>");
    let _ = writeln!(
        html,
        "        <button type=\"submit\">{}</button>",
        escape_html(condition.button_label())
    );
    let _ = writeln!(html, "        </form>");
    html
}

fn control(field: &FieldSpec, current: &str) -> String {
    let key = escape_html(field.key);
    let label = escape_html(field.label);
    let value = escape_html(current);

    let input = match field.kind {
        FieldKind::Integer { min, max } => format!(
            "<input type=\"number\" id=\"{key}\" name=\"{key}\" \
             min=\"{min}\" max=\"{max}\" step=\"1\" value=\"{value}\">"
        ),
        FieldKind::Real { min, max, step } => {
            let mut attrs = String::new();
            if let Some(min) = min {
                let _ = write!(attrs, " min=\"{}\"", min);
            }
            if let Some(max) = max {
                let _ = write!(attrs, " max=\"{}\"", max);
            }
            let step = step.map_or_else(|| "any".to_string(), |s| s.to_string());
            format!(
                "<input type=\"number\" id=\"{key}\" name=\"{key}\"{attrs} \
                 step=\"{step}\" value=\"{value}\">"
            )
        }
        FieldKind::Choice { options } => {
            let mut select = format!("<select id=\"{key}\" name=\"{key}\">");
            for (code, text) in options {
                let selected = if code.to_string() == current.trim() { " selected" } else { "" };
                let _ = write!(
                    select,
                    "<option value=\"{}\"{}>{}</option>",
                    code,
                    selected,
                    escape_html(text)
                );
            }
            select.push_str("</select>");
            select
        }
    };

    format!("            <div class=\"field\"><label for=\"{key}\">{label}</label>{input}</div>\n")
}

fn outcome_box(prediction: &Prediction) -> String {
    let class = match prediction.outcome {
        Outcome::Detected => "warning-box",
        Outcome::NotDetected => "success-box",
        Outcome::InvalidInput => "error-box",
    };
    let mut text = escape_html(prediction.message());
    if let Some(advice) = prediction.advice() {
        text.push_str("<br>");
        text.push_str(&escape_html(advice));
    }
    format!("        <div class=\"{}\" role=\"status\">{}</div>\n", class, text)
}

/// Escape text for use in element content and quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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
