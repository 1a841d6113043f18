//! HTML fragment rendering for the IOC detail panel.
//!
//! Everything interpolated into markup goes through [`escape`]; pulse
//! descriptions, tags, and validation messages are attacker-controlled
//! strings from the enrichment feed.

use chrono::NaiveDateTime;

use crate::schemas::{IocDetails, Pulse, ResponseCode, Validation};

/// Fixed title shown when the enrichment lookup fails.
pub const ERROR_TITLE: &str = "HTTP ERROR";

/// Minimal HTML entity escaping for text and attribute positions.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Panel title for a completed lookup: `"{value} - {info}"`.
pub fn panel_title(value: &str, info: &str) -> String {
    format!("{} - {}", value, info)
}

/// DOM id for a pulse's collapsible section. Must be unique per pulse id so
/// collapse state doesn't collide across sections.
pub fn pulse_dom_id(pulse_id: &str) -> String {
    let mut id = String::from("pulse-");
    let mut lossy = false;
    for ch in pulse_id.chars() {
        if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
            id.push(ch);
        } else {
            id.push('_');
            lossy = true;
        }
    }
    // Replacement can fold distinct raw ids onto the same text ("a b" and
    // "a/b" both become "a_b"), so a lossy sanitization gets a fingerprint
    // of the raw id appended.
    if lossy {
        id.push_str(&format!("-{:08x}", fnv1a(pulse_id.as_bytes())));
    }
    id
}

fn fnv1a(bytes: &[u8]) -> u32 {
    let mut hash: u32 = 0x811c_9dc5;
    for &b in bytes {
        hash ^= u32::from(b);
        hash = hash.wrapping_mul(0x0100_0193);
    }
    hash
}

/// Normalize a feed timestamp for display; unparseable values pass through
/// verbatim.
fn format_timestamp(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('Z');
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return dt.format("%Y-%m-%d %H:%M").to_string();
        }
    }
    raw.to_string()
}

/// Render the accordion body for one lookup result. Codes -1, 0 and 2 carry
/// no body; the title color is the only signal.
pub fn render_ioc_body(details: &IocDetails) -> String {
    match details.response_code {
        ResponseCode::Malicious => render_pulses(details.pulses()),
        ResponseCode::Validated => render_validations(&details.validations),
        ResponseCode::LookupError | ResponseCode::Clean | ResponseCode::Inconclusive => {
            String::new()
        }
    }
}

fn render_pulses(pulses: &[Pulse]) -> String {
    let mut html = String::new();
    for pulse in pulses {
        render_pulse_section(&mut html, pulse);
    }
    html
}

fn render_pulse_section(html: &mut String, pulse: &Pulse) {
    let dom_id = pulse_dom_id(&pulse.id);
    let heading = match (&pulse.name, &pulse.author_name) {
        (Some(name), Some(author)) => format!("{} ({})", name, author),
        (Some(name), None) => name.clone(),
        (None, _) => pulse.id.clone(),
    };

    html.push_str("<div class=\"accordion-item\">\n");
    html.push_str(&format!(
        "<h2 class=\"accordion-header\" id=\"{}-heading\">\n",
        dom_id
    ));
    html.push_str(&format!(
        "<button class=\"accordion-button collapsed\" type=\"button\" data-bs-toggle=\"collapse\" data-bs-target=\"#{}\">{}</button>\n",
        dom_id,
        escape(&heading)
    ));
    html.push_str("</h2>\n");
    html.push_str(&format!(
        "<div id=\"{}\" class=\"accordion-collapse collapse\" aria-labelledby=\"{}-heading\">\n",
        dom_id, dom_id
    ));
    html.push_str("<div class=\"accordion-body\">\n");

    push_field(html, "Pulse", &pulse.id);
    if !pulse.tags.is_empty() {
        let tags = pulse.tags.join(", ");
        let line = match &pulse.author_name {
            Some(author) => format!("{} ({})", tags, author),
            None => tags,
        };
        push_field(html, "Tags", &line);
    }
    if let Some(desc) = &pulse.description {
        push_field(html, "Description", desc);
    }
    if let Some(created) = &pulse.created {
        push_field(html, "Created", &format_timestamp(created));
    }
    if let Some(modified) = &pulse.modified {
        push_field(html, "Modified", &format_timestamp(modified));
    }
    push_list(html, "References", &pulse.references);
    if !pulse.indicator_type_counts.is_empty() {
        html.push_str("<p><b>Indicators:</b></p>\n<ul>\n");
        for (kind, count) in &pulse.indicator_type_counts {
            html.push_str(&format!("<li>{}: {}</li>\n", escape(kind), count));
        }
        html.push_str("</ul>\n");
    }
    push_inline_list(html, "Malware families", &pulse.malware_families);
    push_inline_list(html, "ATT&amp;CK ids", &pulse.attack_ids);
    push_inline_list(html, "Targeted countries", &pulse.targeted_countries);

    html.push_str("</div>\n</div>\n</div>\n");
}

fn render_validations(validations: &[Validation]) -> String {
    let mut html = String::new();
    for validation in validations {
        html.push_str("<div class=\"validation-block\">\n<ul>\n");
        html.push_str(&format!("<li><b>Name:</b> {}</li>\n", escape(&validation.name)));
        html.push_str(&format!(
            "<li><b>Message:</b> {}</li>\n",
            escape(&validation.message)
        ));
        html.push_str(&format!(
            "<li><b>Source:</b> {}</li>\n",
            escape(&validation.source)
        ));
        html.push_str("</ul>\n</div>\n");
    }
    html
}

fn push_field(html: &mut String, label: &str, value: &str) {
    html.push_str(&format!("<p><b>{}:</b> {}</p>\n", label, escape(value)));
}

fn push_list(html: &mut String, label: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    html.push_str(&format!("<p><b>{}:</b></p>\n<ul>\n", label));
    for item in items {
        html.push_str(&format!("<li>{}</li>\n", escape(item)));
    }
    html.push_str("</ul>\n");
}

fn push_inline_list(html: &mut String, label: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let joined = items
        .iter()
        .map(|i| escape(i))
        .collect::<Vec<_>>()
        .join(", ");
    html.push_str(&format!("<p><b>{}:</b> {}</p>\n", label, joined));
}
