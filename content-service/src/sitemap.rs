use time::OffsetDateTime;
use time::macros::format_description;

use crate::posts::PostSummary;

struct Entry {
    loc: String,
    last_modified: OffsetDateTime,
    change_frequency: &'static str,
    priority: &'static str,
}

/// `sitemap.xml` for the home page, the blog index and every post.
pub fn build_sitemap(site_url: &str, posts: &[PostSummary], now: OffsetDateTime) -> String {
    let base = site_url.trim_end_matches('/');
    let mut entries = vec![
        Entry {
            loc: base.to_string(),
            last_modified: now,
            change_frequency: "monthly",
            priority: "1.0",
        },
        Entry {
            loc: format!("{base}/blog"),
            last_modified: now,
            change_frequency: "weekly",
            priority: "0.8",
        },
    ];
    entries.extend(posts.iter().map(|post| Entry {
        loc: format!("{base}/blog/{}", post.slug),
        last_modified: post.published.unwrap_or(now),
        change_frequency: "monthly",
        priority: "0.7",
    }));

    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for entry in entries {
        xml.push_str(&format!(
            "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n    <changefreq>{}</changefreq>\n    <priority>{}</priority>\n  </url>\n",
            escape_xml(&entry.loc),
            format_day(entry.last_modified),
            entry.change_frequency,
            entry.priority,
        ));
    }
    xml.push_str("</urlset>\n");
    xml
}

fn format_day(value: OffsetDateTime) -> String {
    value
        .format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_default()
}

fn escape_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}
