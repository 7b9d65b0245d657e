//! Directory listing page

use super::path::{encode_component, html_escape};

/// One row of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    pub is_dir: bool,
    pub is_symlink: bool,
}

/// Render the HTML index for `display_path` (the decoded request path)
///
/// Entries are sorted case-insensitively. Directories get a trailing `/` in both
/// link and label; symlinks are labelled with a trailing `@`.
pub fn render_listing(display_path: &str, mut entries: Vec<ListingEntry>) -> String {
    entries.sort_by_cached_key(|e| e.name.to_lowercase());

    let title = html_escape(&format!("Directory listing for {display_path}"));
    let mut html = String::with_capacity(256 + entries.len() * 64);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{title}</title>\n"));
    html.push_str("</head>\n<body>\n");
    html.push_str(&format!("<h1>{title}</h1>\n<hr>\n<ul>\n"));

    for entry in &entries {
        let mut href = encode_component(&entry.name);
        let mut label = entry.name.clone();
        if entry.is_dir {
            href.push('/');
            label.push('/');
        }
        if entry.is_symlink {
            label.push('@');
        }
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            html_escape(&href),
            html_escape(&label)
        ));
    }

    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    html
}
