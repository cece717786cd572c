use serde::Serialize;
use serde_yaml::Value as Yaml;
use std::cmp::Ordering;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::logger::Logger;
use crate::render::markdown_to_html;

const WORDS_PER_MINUTE: usize = 200;
const EXTENSIONS: [&str; 2] = ["mdx", "md"];

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("post not found: {0}")]
    NotFound(String),
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ContentError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        ContentError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub date: String,
    pub tags: Vec<String>,
    pub read_time: String,
    pub read_minutes: u32,
    #[serde(skip)]
    pub published: Option<OffsetDateTime>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(flatten)]
    pub summary: PostSummary,
    pub content: String,
    pub html: String,
}

/// Posts stored as `<slug>.mdx` / `<slug>.md` files in one directory.
#[derive(Clone, Debug)]
pub struct ContentStore {
    dir: PathBuf,
    logger: Option<Logger>,
}

impl ContentStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            logger: None,
        }
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Every post, newest first. A missing directory yields no posts and a
    /// file that cannot be read is skipped.
    pub async fn list_all(&self) -> Result<Vec<PostSummary>, ContentError> {
        let now = OffsetDateTime::now_utc();
        let mut posts = Vec::new();
        for (slug, path) in self.source_files().await? {
            match read_source(&path).await {
                Ok(source) => posts.push(parse_document(&slug, &source, now).summary),
                Err(error) => {
                    if let Some(logger) = self.logger.as_ref() {
                        logger.warn(
                            "posts.read_failed",
                            serde_json::json!({ "slug": slug, "error": error.to_string() }),
                        );
                    }
                }
            }
        }
        sort_newest_first(&mut posts);
        Ok(posts)
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Post, ContentError> {
        if !is_valid_slug(slug) {
            return Err(ContentError::NotFound(slug.to_string()));
        }
        for extension in EXTENSIONS {
            let path = self.dir.join(format!("{slug}.{extension}"));
            match tokio::fs::read(&path).await {
                Ok(bytes) => {
                    let source = String::from_utf8_lossy(&bytes);
                    return Ok(parse_document(slug, &source, OffsetDateTime::now_utc()));
                }
                Err(error) if error.kind() == ErrorKind::NotFound => continue,
                Err(error) => return Err(ContentError::io(&path, error)),
            }
        }
        Err(ContentError::NotFound(slug.to_string()))
    }

    /// Slugs of every post, sorted, for pre-rendering routes.
    pub async fn list_slugs(&self) -> Result<Vec<String>, ContentError> {
        Ok(self
            .source_files()
            .await?
            .into_iter()
            .map(|(slug, _)| slug)
            .collect())
    }

    /// `(slug, path)` pairs sorted by slug. When both `x.mdx` and `x.md`
    /// exist the `.mdx` file wins, matching [`ContentStore::get_by_slug`].
    async fn source_files(&self) -> Result<Vec<(String, PathBuf)>, ContentError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => return Err(ContentError::io(&self.dir, error)),
        };

        let mut files: Vec<(String, PathBuf, usize)> = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|error| ContentError::io(&self.dir, error))?
        {
            let path = entry.path();
            let Some(rank) = path
                .extension()
                .and_then(|ext| ext.to_str())
                .and_then(|ext| EXTENSIONS.iter().position(|known| *known == ext))
            else {
                continue;
            };
            let Some(slug) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            if !is_valid_slug(slug) {
                continue;
            }
            files.push((slug.to_string(), path, rank));
        }

        files.sort_by(|a, b| a.0.cmp(&b.0).then(a.2.cmp(&b.2)));
        files.dedup_by(|later, earlier| later.0 == earlier.0);
        Ok(files
            .into_iter()
            .map(|(slug, path, _)| (slug, path))
            .collect())
    }
}

/// Invalid UTF-8 is replaced rather than rejected.
async fn read_source(path: &Path) -> Result<String, ContentError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|error| ContentError::io(path, error))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Slugs name a file directly inside the content directory, so anything that
/// could walk out of it is rejected.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug
            .chars()
            .any(|ch| matches!(ch, '/' | '\\' | '.' | '\0'))
}

pub fn reading_minutes(body: &str) -> u32 {
    let words = body.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1) as u32
}

/// Accepts RFC 3339 timestamps and plain `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_date(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if let Ok(value) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(value);
    }
    let day = raw.get(..10)?;
    Date::parse(day, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|date| date.midnight().assume_utc())
}

/// Parsed dates newest first, then the unparseable ones in their current
/// order.
pub fn sort_newest_first(posts: &mut [PostSummary]) {
    posts.sort_by(|a, b| match (a.published, b.published) {
        (Some(left), Some(right)) => right.cmp(&left),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

pub fn parse_document(slug: &str, source: &str, now: OffsetDateTime) -> Post {
    let (fields, body) = match split_front_matter(source) {
        Some((header, body)) => match serde_yaml::from_str::<Yaml>(header) {
            Ok(Yaml::Mapping(map)) => (Some(map), body),
            Ok(Yaml::Null) => (None, body),
            _ => (None, source),
        },
        None => (None, source),
    };
    let field = |name: &str| fields.as_ref().and_then(|map| map.get(name));

    let date = field("date")
        .and_then(scalar_string)
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| now.format(&Rfc3339).unwrap_or_default());
    let minutes = reading_minutes(body);

    let summary = PostSummary {
        slug: slug.to_string(),
        title: field("title")
            .and_then(scalar_string)
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| "Untitled".to_string()),
        description: field("description")
            .and_then(scalar_string)
            .unwrap_or_default(),
        published: parse_date(&date),
        date,
        tags: field("tags").map(tag_list).unwrap_or_default(),
        read_time: format!("{minutes} min"),
        read_minutes: minutes,
    };

    Post {
        summary,
        html: markdown_to_html(body),
        content: body.to_string(),
    }
}

/// Splits `---` delimited front matter from the body. `None` when the file
/// does not open with a delimiter or never closes it.
fn split_front_matter(source: &str) -> Option<(&str, &str)> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let rest = source.strip_prefix("---")?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

fn scalar_string(value: &Yaml) -> Option<String> {
    match value {
        Yaml::String(text) => Some(text.clone()),
        Yaml::Number(number) => Some(number.to_string()),
        Yaml::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn tag_list(value: &Yaml) -> Vec<String> {
    match value {
        Yaml::Sequence(items) => items
            .iter()
            .filter_map(scalar_string)
            .map(|tag| tag.trim().to_string())
            .filter(|tag| !tag.is_empty())
            .collect(),
        Yaml::String(text) => text
            .split(',')
            .map(|tag| tag.trim())
            .filter(|tag| !tag.is_empty())
            .map(|tag| tag.to_string())
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use time::macros::datetime;

    const NOW: OffsetDateTime = datetime!(2025-02-03 04:05:06 UTC);

    fn words(count: usize) -> String {
        vec!["word"; count].join(" ")
    }

    #[test]
    fn front_matter_fields_are_read() {
        let source = format!(
            "---\ntitle: \"X\"\ndescription: Short\ndate: \"2024-01-01\"\ntags:\n  - rust\n  - web\n---\n{}",
            words(400)
        );
        let post = parse_document("x", &source, NOW);
        assert_eq!(post.summary.title, "X");
        assert_eq!(post.summary.description, "Short");
        assert_eq!(post.summary.date, "2024-01-01");
        assert_eq!(post.summary.tags, vec!["rust", "web"]);
        assert_eq!(post.summary.read_minutes, 2);
        assert_eq!(post.summary.read_time, "2 min");
        assert_eq!(post.summary.published, Some(datetime!(2024-01-01 00:00 UTC)));
        assert!(!post.content.contains("title:"));
    }

    #[test]
    fn missing_front_matter_uses_defaults() {
        let post = parse_document("plain", "just a body", NOW);
        assert_eq!(post.summary.title, "Untitled");
        assert_eq!(post.summary.description, "");
        assert_eq!(post.summary.date, "2025-02-03T04:05:06Z");
        assert!(post.summary.tags.is_empty());
        assert_eq!(post.summary.read_minutes, 1);
        assert_eq!(post.content, "just a body");
    }

    #[test]
    fn malformed_front_matter_keeps_whole_file_as_body() {
        let source = "---\ntitle: [unclosed\n---\nbody";
        let post = parse_document("bad", source, NOW);
        assert_eq!(post.summary.title, "Untitled");
        assert_eq!(post.content, source);
    }

    #[test]
    fn comma_separated_tags_are_split() {
        let source = "---\ntags: rust, axum , ,dioxus\n---\n";
        let post = parse_document("t", source, NOW);
        assert_eq!(post.summary.tags, vec!["rust", "axum", "dioxus"]);
    }

    #[test]
    fn unquoted_dates_and_numbers_are_accepted() {
        let source = "---\ntitle: 2024\ndate: 2023-05-06T07:08:09Z\n---\nbody";
        let post = parse_document("n", source, NOW);
        assert_eq!(post.summary.title, "2024");
        assert_eq!(post.summary.published, Some(datetime!(2023-05-06 07:08:09 UTC)));
    }

    #[test]
    fn reading_time_rounds_up_with_a_floor_of_one() {
        assert_eq!(reading_minutes(""), 1);
        assert_eq!(reading_minutes(&words(200)), 1);
        assert_eq!(reading_minutes(&words(201)), 2);
    }

    #[test]
    fn unparseable_dates_sort_last_and_keep_their_order() {
        let mut posts: Vec<PostSummary> = [("a", "soon"), ("b", "2023-01-01"), ("c", "later"), ("d", "2024-01-01")]
            .into_iter()
            .map(|(slug, date)| parse_document(slug, &format!("---\ndate: {date}\n---\n"), NOW).summary)
            .collect();
        sort_newest_first(&mut posts);
        let order: Vec<&str> = posts.iter().map(|post| post.slug.as_str()).collect();
        assert_eq!(order, vec!["d", "b", "a", "c"]);
    }

    #[test]
    fn slugs_that_leave_the_directory_are_invalid() {
        assert!(is_valid_slug("hello-world"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("../secret"));
        assert!(!is_valid_slug("a/b"));
        assert!(!is_valid_slug("a\\b"));
        assert!(!is_valid_slug("post.mdx"));
    }

    #[tokio::test]
    async fn missing_directory_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = ContentStore::new(dir.path().join("absent"));
        assert!(store.list_all().await.unwrap().is_empty());
        assert!(store.list_slugs().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn store_reads_md_and_mdx_files_only() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("old.md"), "---\ndate: 2022-01-01\n---\nold").unwrap();
        std::fs::write(dir.path().join("new.mdx"), "---\ndate: 2024-01-01\n---\nnew").unwrap();
        std::fs::write(dir.path().join("new.md"), "---\ndate: 2020-01-01\n---\nshadowed").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let store = ContentStore::new(dir.path());
        let slugs: Vec<String> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|post| post.slug)
            .collect();
        assert_eq!(slugs, vec!["new", "old"]);
        assert_eq!(store.list_slugs().await.unwrap(), vec!["new", "old"]);
        assert_eq!(store.get_by_slug("new").await.unwrap().content, "new");
    }

    #[tokio::test]
    async fn invalid_utf8_does_not_hide_other_posts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("good.md"), "---\ntitle: Good\n---\nfine").unwrap();
        std::fs::write(dir.path().join("bad.md"), b"---\ntitle: Bad\n---\n\xff\xfe body").unwrap();

        let store = ContentStore::new(dir.path());
        let mut titles: Vec<String> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|post| post.title)
            .collect();
        titles.sort();
        assert_eq!(titles, vec!["Bad", "Good"]);
        assert!(store.get_by_slug("bad").await.unwrap().content.contains('\u{fffd}'));
    }

    #[tokio::test]
    async fn unreadable_entry_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("good.md"), "fine").unwrap();
        std::fs::create_dir(dir.path().join("folder.md")).unwrap();

        let store = ContentStore::new(dir.path());
        let slugs: Vec<String> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|post| post.slug)
            .collect();
        assert_eq!(slugs, vec!["good"]);
    }

    #[tokio::test]
    async fn unknown_or_escaping_slug_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("real.md"), "body").unwrap();
        let store = ContentStore::new(dir.path());
        assert!(matches!(
            store.get_by_slug("missing-slug").await,
            Err(ContentError::NotFound(_))
        ));
        assert!(matches!(
            store.get_by_slug("../real").await,
            Err(ContentError::NotFound(_))
        ));
    }
}
