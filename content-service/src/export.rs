use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use time::OffsetDateTime;

use crate::posts::ContentStore;
use crate::sitemap::build_sitemap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExportSummary {
    pub posts: usize,
    pub files: usize,
}

/// Writes the same documents the HTTP API serves as static files:
/// `posts.json`, `slugs.json`, `posts/<slug>.json` and `sitemap.xml`.
pub async fn export_site(store: &ContentStore, site_url: &str, out_dir: &Path) -> Result<ExportSummary> {
    let posts_dir = out_dir.join("posts");
    tokio::fs::create_dir_all(&posts_dir)
        .await
        .with_context(|| format!("failed to create {}", posts_dir.display()))?;

    // Slugs come from the listing so a file skipped there is skipped here.
    let posts = store.list_all().await?;
    let mut slugs: Vec<String> = posts.iter().map(|post| post.slug.clone()).collect();
    slugs.sort();

    write_json(&out_dir.join("posts.json"), &posts).await?;
    write_json(&out_dir.join("slugs.json"), &slugs).await?;
    let mut files = 2;

    for slug in &slugs {
        let post = store.get_by_slug(slug).await?;
        write_json(&posts_dir.join(format!("{slug}.json")), &post).await?;
        files += 1;
    }

    let sitemap = build_sitemap(site_url, &posts, OffsetDateTime::now_utc());
    let sitemap_path = out_dir.join("sitemap.xml");
    tokio::fs::write(&sitemap_path, sitemap)
        .await
        .with_context(|| format!("failed to write {}", sitemap_path.display()))?;
    files += 1;

    Ok(ExportSummary {
        posts: posts.len(),
        files,
    })
}

async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value)?;
    tokio::fs::write(path, bytes)
        .await
        .with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    #[tokio::test]
    async fn writes_every_route_document() {
        let content = tempfile::tempdir().unwrap();
        std::fs::write(
            content.path().join("hello.mdx"),
            "---\ntitle: Hello\ndate: 2024-02-02\n---\n# Hi",
        )
        .unwrap();
        let out = tempfile::tempdir().unwrap();

        let summary = export_site(&ContentStore::new(content.path()), "https://example.com", out.path())
            .await
            .unwrap();
        assert_eq!(summary, ExportSummary { posts: 1, files: 4 });

        let slugs: Value =
            serde_json::from_slice(&std::fs::read(out.path().join("slugs.json")).unwrap()).unwrap();
        assert_eq!(slugs, serde_json::json!(["hello"]));

        let post: Value = serde_json::from_slice(
            &std::fs::read(out.path().join("posts").join("hello.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(post["title"], "Hello");
        assert_eq!(post["readTime"], "1 min");
        assert!(post["html"].as_str().unwrap().contains("<h1>Hi</h1>"));

        let sitemap = std::fs::read_to_string(out.path().join("sitemap.xml")).unwrap();
        assert!(sitemap.contains("https://example.com/blog/hello"));
    }

    #[tokio::test]
    async fn unreadable_entry_does_not_abort_export() {
        let content = tempfile::tempdir().unwrap();
        std::fs::write(content.path().join("good.md"), "---\ntitle: Good\n---\nbody").unwrap();
        std::fs::create_dir(content.path().join("broken.md")).unwrap();
        let out = tempfile::tempdir().unwrap();

        let summary = export_site(&ContentStore::new(content.path()), "https://example.com", out.path())
            .await
            .unwrap();
        assert_eq!(summary, ExportSummary { posts: 1, files: 4 });
        assert!(!out.path().join("posts").join("broken.json").exists());
    }

    #[tokio::test]
    async fn empty_content_still_exports_index_files() {
        let out = tempfile::tempdir().unwrap();
        let store = ContentStore::new(out.path().join("missing"));
        let summary = export_site(&store, "https://example.com", out.path()).await.unwrap();
        assert_eq!(summary, ExportSummary { posts: 0, files: 3 });
        assert_eq!(std::fs::read_to_string(out.path().join("posts.json")).unwrap(), "[]");
    }
}
