const INDEX_TEMPLATE: &str = include_str!("../../static/index.html");
const MODEL_OPTIONS_MARKER: &str = "{{MODEL_OPTIONS}}";

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
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

/// "model_a" -> "Model A"
fn display_name(model: &str) -> String {
    model
        .split(|c: char| c == '_' || c == '-')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Renders the chat page with one `<option>` per allowed model, the default preselected.
pub fn render_index(models: &[String], default_model: &str) -> String {
    let options = models
        .iter()
        .map(|model| {
            let selected = if model == default_model { " selected" } else { "" };
            format!(
                "            <option value=\"{}\"{}>{}</option>",
                escape_html(model),
                selected,
                escape_html(&display_name(model))
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    INDEX_TEMPLATE.replace(MODEL_OPTIONS_MARKER, &options)
}
