use dioxus::prelude::*;
use dioxus_router::{Link, Routable, Router};
use portfolio_core::PROFILE;

use crate::blog::{BlogPage, BlogPostPage};
use crate::canvas::{MatrixRain, MouseTrail};
use crate::config::use_runtime_config;
use crate::console::ConsoleOverlay;
use crate::sections::{AboutSection, BootScreen, ContactSection, ExperienceSection, ProjectsSection, SkillsSection};
use crate::terminal::{TerminalCursor, TerminalHeader, TerminalPrompt, TerminalWindow};

const MAIN_CSS: Asset = asset!("/assets/main.css");

/// Set once the boot screen has played, so returning home skips it.
#[derive(Clone, Copy)]
struct BootState(Signal<bool>);

#[component]
pub fn App() -> Element {
    let booted = use_signal(|| false);
    let config_resource = use_runtime_config();
    let config = match config_resource() {
        None => {
            return rsx! {
                document::Title { "{PROFILE.name}" }
                div { class: "page loading",
                    h1 { "Loading config..." }
                }
            }
        }
        Some(Ok(config)) => config,
        Some(Err(message)) => {
            tracing::debug!(%message, "config: falling back to defaults");
            Default::default()
        }
    };

    use_context_provider(|| config);
    use_context_provider(|| BootState(booted));

    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        document::Meta { name: "theme-color", content: "#0a0a0a" }
        Router::<Route> {}
        ConsoleOverlay {}
    }
}

#[derive(Clone, PartialEq, Routable)]
pub enum Route {
    #[route("/")]
    Home {},
    #[route("/blog")]
    Blog {},
    #[route("/blog/:slug")]
    BlogPost { slug: String },
    #[route("/:..route")]
    NotFound { route: Vec<String> },
}

const NAV: &[(&str, &str)] = &[
    ("about", "#about"),
    ("skills", "#skills"),
    ("experience", "#experience"),
    ("projects", "#projects"),
    ("contact", "#contact"),
];

#[component]
fn Home() -> Element {
    let BootState(mut booted) = use_context::<BootState>();

    if !booted() {
        return rsx! {
            BootScreen { on_complete: move |_| booted.set(true) }
        };
    }

    rsx! {
        document::Title { "{PROFILE.name} | {PROFILE.title}" }
        document::Meta { name: "description", content: "{PROFILE.summary.join(\" \")}" }
        MatrixRain {}
        MouseTrail {}
        div { class: "home",
            nav { class: "home-nav",
                for (label, href) in NAV.iter() {
                    a { key: "{label}", class: "terminal-link text-terminal-cyan", href: "{href}", "./{label}" }
                }
                Link { to: Route::Blog {}, class: "terminal-link text-terminal-yellow", "./blog" }
            }
            TerminalWindow { aria_label: Some("Portfolio home".to_string()),
                TerminalHeader { display_cwd: "~".to_string(), label: None }
                div { class: "terminal-body terminal-stack hero",
                    TerminalPrompt { command: Some("whoami".to_string()), children: rsx! {} }
                    h1 { class: "hero-name text-terminal-green", "{PROFILE.name}" }
                    p { class: "hero-title text-terminal-cyan", "{PROFILE.title} · {PROFILE.location}" }
                    p { class: "hero-hint terminal-muted",
                        "Press ` or Ctrl+K to open the terminal. Try \"help\"."
                    }
                    TerminalPrompt { children: rsx! { TerminalCursor {} } }
                }
            }
            AboutSection {}
            SkillsSection {}
            ExperienceSection {}
            ProjectsSection {}
            ContactSection {}
            footer { class: "home-footer terminal-muted",
                "© {PROFILE.name} · built with Rust and Dioxus"
            }
        }
    }
}

#[component]
fn Blog() -> Element {
    rsx! { BlogPage {} }
}

#[component]
fn BlogPost(slug: String) -> Element {
    rsx! { BlogPostPage { slug } }
}

#[component]
fn NotFound(route: Vec<String>) -> Element {
    let path = route.join("/");
    rsx! {
        document::Title { "Not Found | {PROFILE.name}" }
        div { class: "terminal-screen",
            TerminalWindow { aria_label: Some("Not found".to_string()),
                TerminalHeader { display_cwd: "~/404".to_string(), label: None }
                div { class: "terminal-body terminal-stack",
                    TerminalPrompt { command: Some(format!("cd /{path}")), children: rsx! {} }
                    p { class: "text-terminal-red", "cd: /{path}: No such file or directory" }
                    TerminalPrompt {
                        children: rsx! { Link { to: Route::Home {}, class: "terminal-link text-terminal-yellow", "cd ~" } }
                    }
                    TerminalPrompt { children: rsx! { TerminalCursor {} } }
                }
            }
        }
    }
}
