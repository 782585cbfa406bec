//! Standalone HTML export.

use scribe_editor_core::toc::process_toc_in_html;

pub const DOCUMENT_TITLE: &str = "Exported Document";

pub const EXPORT_STYLESHEET: &str = r#"    body {
      font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, Cantarell, sans-serif;
      line-height: 1.8;
      max-width: 800px;
      margin: 0 auto;
      padding: 2rem;
      color: #333;
    }
    h1, h2, h3, h4, h5, h6 {
      margin-top: 1.5em;
      margin-bottom: 0.5em;
      font-weight: 600;
    }
    h1 { font-size: 2em; border-bottom: 2px solid #eee; padding-bottom: 0.3em; }
    h2 { font-size: 1.5em; border-bottom: 1px solid #eee; padding-bottom: 0.3em; }
    h3 { font-size: 1.25em; }
    a { color: #0366d6; text-decoration: none; }
    a:hover { text-decoration: underline; }
    code {
      background: #f6f8fa;
      padding: 0.2em 0.4em;
      border-radius: 3px;
      font-family: 'Courier New', monospace;
      font-size: 0.9em;
    }
    pre {
      background: #f6f8fa;
      padding: 1em;
      border-radius: 6px;
      overflow-x: auto;
    }
    pre code {
      background: none;
      padding: 0;
    }
    blockquote {
      border-left: 4px solid #dfe2e5;
      padding-left: 1em;
      color: #6a737d;
      margin: 1em 0;
    }
    img { max-width: 100%; height: auto; }
    table {
      border-collapse: collapse;
      width: 100%;
      margin: 1em 0;
    }
    th, td {
      border: 1px solid #dfe2e5;
      padding: 0.6em 1em;
      text-align: left;
    }
    th {
      background: #f6f8fa;
      font-weight: 600;
    }
    .table-of-contents {
      background: #f6f8fa;
      padding: 1.5em;
      border-radius: 6px;
      margin: 2em 0;
    }
    .toc-title {
      font-size: 1.2em;
      font-weight: 600;
      margin-bottom: 0.5em;
    }
    .toc-list {
      list-style: none;
      padding-left: 0;
    }
    .toc-list .toc-list {
      padding-left: 1.5em;
      margin-top: 0.3em;
    }
    .toc-link {
      color: #0366d6;
      text-decoration: none;
      display: block;
      padding: 0.2em 0;
    }
    .toc-link:hover {
      text-decoration: underline;
    }
"#;

/// Wrap a rendered body fragment in a complete page with the export styles.
pub fn standalone_document(body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n  \
         <meta charset=\"UTF-8\">\n  \
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n  \
         <title>{DOCUMENT_TITLE}</title>\n  \
         <style>\n\
         {EXPORT_STYLESHEET}  </style>\n\
         </head>\n\
         <body>\n\
         {body}\n\
         </body>\n\
         </html>"
    )
}

/// Fill `{{TOC}}` placeholders in a rendered fragment and wrap it as a page.
pub fn export_html(fragment: &str) -> String {
    standalone_document(&process_toc_in_html(fragment))
}
