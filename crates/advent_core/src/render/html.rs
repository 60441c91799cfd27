use super::{ResolvedStyle, VisualNode};

pub(super) fn node_to_html(node: &VisualNode) -> String {
    match node {
        VisualNode::Heading { text, style } => element("h1", "memory-title", style, text),
        VisualNode::Text { text, style } => element("p", "memory-paragraph", style, text),
        VisualNode::Quote { text, style } => element("blockquote", "memory-quote", style, text),
        VisualNode::Panel { text, style } => element("div", "memory-highlight", style, text),
        VisualNode::Image { src, style } => format!(
            r#"<img class="memory-media" src="{}" alt="Memory"{}>"#,
            escape(src),
            style_attr(style)
        ),
        VisualNode::Video { src, style } => format!(
            r#"<video class="memory-media" src="{}" controls{}>Your browser does not support the video tag.</video>"#,
            escape(src),
            style_attr(style)
        ),
        VisualNode::Audio { src } => format!(
            r#"<div class="memory-audio"><audio src="{}" controls style="width: 100%;">Your browser does not support the audio tag.</audio></div>"#,
            escape(src)
        ),
        VisualNode::Unsupported { src } => format!(
            r#"<div class="memory-unsupported"><p>Unsupported media type</p><p>{}</p></div>"#,
            escape(src)
        ),
    }
}

fn element(tag: &str, class: &str, style: &ResolvedStyle, text: &str) -> String {
    format!(
        r#"<{tag} class="{class}"{}>{}</{tag}>"#,
        style_attr(style),
        escape(text)
    )
}

fn style_attr(style: &ResolvedStyle) -> String {
    if style.is_empty() {
        return String::new();
    }
    format!(r#" style="{}""#, escape(&style.to_css()))
}

pub(super) fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
