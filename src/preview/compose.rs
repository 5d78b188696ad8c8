//! Assembly of the preview document.

use super::settings::EditorSettings;

/// Builds the document rendered in the sandboxed preview.
///
/// The layout is fixed: head markup, then one `<link>` per non-blank stylesheet
/// URL, then the inline `<style>`; in the body, the markup, then one `<script>`
/// per non-blank script URL, then the inline `<script>`. External resources
/// always come before their inline counterpart. Nothing is escaped or validated.
pub fn compose(markup: &str, styles: &str, script: &str, settings: &EditorSettings) -> String {
    let links: String = settings
        .css
        .active_links()
        .map(|link| format!("<link rel=\"stylesheet\" href=\"{}\" />", link))
        .collect();
    let scripts: String = settings
        .js
        .active_links()
        .map(|link| format!("<script crossorigin src=\"{}\"></script>", link))
        .collect();

    format!(
        "<html class=\"{root_class}\">\n\
         <head>\n\
         {head}\n\
         {links}<style>{styles}</style>\n\
         </head>\n\
         <body class=\"{body_class}\">\n\
         {markup}\n\
         {scripts}<script>{script}</script>\n\
         </body>\n\
         </html>\n",
        root_class = settings.html.class_name,
        head = settings.html.head_tags,
        links = links,
        styles = styles,
        body_class = settings.html.body_class_name,
        markup = markup,
        scripts = scripts,
        script = script,
    )
}
