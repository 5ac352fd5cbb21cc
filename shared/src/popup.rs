use crate::feature::Feature;

/// Fill `{FIELD}` placeholders in a popup template from feature attributes.
///
/// Values are HTML-escaped; the template itself is trusted markup. Missing
/// or null attributes render as empty text. An unclosed `{` is kept verbatim.
pub fn render_popup(template: &str, feature: &Feature) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };
        let field = after[..close].trim();
        if let Some(value) = feature.display_attr(field) {
            escape_html_into(&value, &mut out);
        }
        rest = &after[close + 1..];
    }

    out.push_str(rest);
    out
}

fn escape_html_into(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::render_popup;
    use crate::feature::Feature;

    fn feature() -> Feature {
        serde_json::from_value(json!({
            "properties": {
                "ADM0_VIZ_NAME": "Côte d'Ivoire",
                "region": "AFRO",
                "score": 2,
                "html": "<script>x</script>"
            }
        }))
        .unwrap()
    }

    #[test]
    fn substitutes_known_fields() {
        assert_eq!(
            render_popup("<b>{region}</b> score {score}", &feature()),
            "<b>AFRO</b> score 2"
        );
    }

    #[test]
    fn escapes_values_but_not_template() {
        assert_eq!(
            render_popup("<p>{ADM0_VIZ_NAME}</p>", &feature()),
            "<p>Côte d&#39;Ivoire</p>"
        );
        assert_eq!(
            render_popup("{html}", &feature()),
            "&lt;script&gt;x&lt;/script&gt;"
        );
    }

    #[test]
    fn unknown_fields_render_empty() {
        assert_eq!(render_popup("[{nope}]", &feature()), "[]");
    }

    #[test]
    fn unclosed_placeholder_is_literal() {
        assert_eq!(render_popup("a {region", &feature()), "a {region");
        assert_eq!(render_popup("plain text", &feature()), "plain text");
    }
}
