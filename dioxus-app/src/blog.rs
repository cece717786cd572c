use dioxus::prelude::*;
use dioxus_router::Link;

use crate::config::RuntimeConfig;
use crate::hooks::use_content_get;
use crate::posts::{format_date, format_ls_date, Post, PostSummary};
use crate::routes::Route;
use crate::terminal::{TerminalCursor, TerminalHeader, TerminalPrompt, TerminalWindow};

#[component]
pub fn BlogPage() -> Element {
    let config = use_context::<RuntimeConfig>();
    let posts = use_content_get::<Vec<PostSummary>, _>(move || config.content_url("posts"));

    let listing = match posts() {
        None => rsx! { p { class: "terminal-muted", "Loading posts..." } },
        Some(Err(message)) => rsx! { p { class: "text-terminal-red", "ls: cannot read blog index: {message}" } },
        Some(Ok(None)) => rsx! { p { class: "terminal-muted", "total 0" } },
        Some(Ok(Some(posts))) if posts.is_empty() => rsx! { p { class: "terminal-muted", "total 0" } },
        Some(Ok(Some(posts))) => rsx! {
            for post in posts.iter() {
                p { key: "{post.slug}", class: "terminal-listing",
                    span { class: "terminal-muted terminal-inline", "-rw-r--r-- 1 guest guest {post.read_time} {format_ls_date(&post.date)} " }
                    Link {
                        to: Route::BlogPost { slug: post.slug.clone() },
                        class: "terminal-link text-terminal-cyan",
                        "{post.slug}"
                    }
                    if !post.description.is_empty() {
                        span { class: "text-terminal-green terminal-inline terminal-indent", "# {post.description}" }
                    }
                }
            }
        },
    };

    rsx! {
        document::Title { "Blog | Artem Shkonda" }
        document::Meta { name: "description", content: "Notes on backend engineering, infrastructure and tooling." }
        div { class: "terminal-screen",
            TerminalWindow { aria_label: Some("Blog index".to_string()),
                TerminalHeader { display_cwd: "~/blog".to_string(), label: None }
                div { class: "terminal-body terminal-stack",
                    TerminalPrompt {
                        path: Some("~".to_string()),
                        children: rsx! {
                            Link { to: Route::Home {}, class: "terminal-link text-terminal-yellow", "cd .." }
                        }
                    }
                    TerminalPrompt { path: Some("~/blog".to_string()), command: Some("ls -la".to_string()), children: rsx! {} }
                    div { class: "terminal-indent terminal-stack", {listing} }
                    TerminalPrompt { path: Some("~/blog".to_string()), children: rsx! { TerminalCursor {} } }
                }
            }
        }
    }
}

#[component]
pub fn BlogPostPage(slug: String) -> Element {
    let config = use_context::<RuntimeConfig>();
    let slug_for_fetch = slug.clone();
    let post = use_content_get::<Post, _>(move || {
        config.content_url(&format!("posts/{}", urlencoding::encode(&slug_for_fetch)))
    });

    match post() {
        None => rsx! {
            div { class: "terminal-screen",
                TerminalWindow { aria_label: Some("Loading blog post".to_string()),
                    TerminalHeader { display_cwd: format!("~/blog/{slug}"), label: None }
                    div { class: "terminal-body terminal-stack",
                        TerminalPrompt { path: Some("~/blog".to_string()), command: Some(format!("cat {slug}.md")), children: rsx! {} }
                        p { class: "terminal-muted", "Reading..." }
                    }
                }
            }
        },
        Some(Ok(Some(post))) => {
            let summary = post.summary;
            rsx! {
                document::Title { "{summary.title} | Blog" }
                document::Meta { name: "description", content: "{summary.description}" }
                document::Meta { property: "og:title", content: "{summary.title}" }
                document::Meta { property: "og:description", content: "{summary.description}" }
                document::Meta { property: "og:type", content: "article" }
                div { class: "terminal-screen",
                    TerminalWindow { aria_label: Some(format!("Blog post {}", summary.title)),
                        TerminalHeader { display_cwd: format!("~/blog/{}", summary.slug), label: None }
                        div { class: "terminal-body terminal-stack",
                            TerminalPrompt {
                                path: Some("~/blog".to_string()),
                                children: rsx! {
                                    Link { to: Route::Blog {}, class: "terminal-link text-terminal-yellow", "cd .." }
                                }
                            }
                            TerminalPrompt {
                                command: Some(format!("cat {}.md", summary.slug)),
                                path: Some("~/blog".to_string()),
                                children: rsx! {}
                            }
                            article { class: "blog-article",
                                header { class: "blog-header",
                                    p { class: "blog-date text-terminal-yellow", "{format_date(&summary.date)}" }
                                    h1 { class: "blog-title", "{summary.title}" }
                                    if !summary.description.is_empty() {
                                        p { class: "blog-excerpt", "{summary.description}" }
                                    }
                                    p { class: "blog-meta",
                                        "{summary.read_time} read · tags: {summary.tags.join(\" | \")}"
                                    }
                                }
                                div { class: "blog-body", dangerous_inner_html: "{post.html}" }
                            }
                            TerminalPrompt {
                                path: Some(format!("~/blog/{}", summary.slug)),
                                children: rsx! {
                                    Link { to: Route::Blog {}, class: "terminal-link text-terminal-yellow", "cd .." }
                                }
                            }
                            TerminalPrompt { path: Some(format!("~/blog/{}", summary.slug)), children: rsx! { TerminalCursor {} } }
                        }
                    }
                }
            }
        }
        Some(Ok(None)) => rsx! { MissingPost {} },
        Some(Err(message)) => rsx! {
            div { class: "terminal-screen",
                TerminalWindow { aria_label: Some("Blog post unavailable".to_string()),
                    TerminalHeader { display_cwd: format!("~/blog/{slug}"), label: None }
                    div { class: "terminal-body terminal-stack",
                        TerminalPrompt { path: Some("~/blog".to_string()), command: Some(format!("cat {slug}.md")), children: rsx! {} }
                        p { class: "text-terminal-red", "cat: {message}" }
                        TerminalPrompt {
                            path: Some("~/blog".to_string()),
                            children: rsx! {
                                Link { to: Route::Blog {}, class: "terminal-link text-terminal-yellow", "cd .." }
                            }
                        }
                    }
                }
            }
        },
    }
}

#[component]
fn MissingPost() -> Element {
    rsx! {
        document::Title { "Entry not found | Blog" }
        document::Meta { name: "description", content: "Requested blog entry was not found." }
        div { class: "terminal-screen",
            TerminalWindow { aria_label: Some("Missing blog post".to_string()),
                TerminalHeader { display_cwd: "~/blog/404".to_string(), label: None }
                div { class: "terminal-body terminal-stack",
                    TerminalPrompt { path: Some("~/blog".to_string()), command: Some("cat missing.md".to_string()), children: rsx! {} }
                    p { class: "terminal-muted", "No such file or directory. Check the index again." }
                    TerminalPrompt {
                        path: Some("~/blog".to_string()),
                        children: rsx! {
                            Link { to: Route::Blog {}, class: "terminal-link text-terminal-yellow", "cd .." }
                        }
                    }
                    TerminalPrompt { path: Some("~/blog/404".to_string()), children: rsx! { TerminalCursor {} } }
                }
            }
        }
    }
}
