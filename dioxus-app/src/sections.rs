use dioxus::prelude::*;
#[cfg(target_arch = "wasm32")]
use dioxus::web::WebEventExt;
#[cfg(target_arch = "wasm32")]
use gloo_timers::future::TimeoutFuture;
use portfolio_core::profile::{skill_bar, SkillCategory};
use portfolio_core::reveal::{boot_preset, RevealConfig, BOOT_LINES};
use portfolio_core::{RevealEvent, RevealPhase, RevealSequencer, SectionKind, PROFILE};
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;
use std::time::Duration;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;

use crate::clock;

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
const TICK_MS: u32 = 40;

#[cfg(target_arch = "wasm32")]
struct ObserverHandle {
    observer: web_sys::IntersectionObserver,
    target: web_sys::Element,
    _closure: Rc<wasm_bindgen::closure::Closure<dyn FnMut(js_sys::Array, web_sys::IntersectionObserver)>>,
}

/// Owns a sequencer for the lifetime of the calling component and feeds it
/// wall time until it completes. `on_complete` fires once.
pub fn use_reveal(
    config: impl FnOnce() -> RevealConfig,
    on_complete: Option<EventHandler<()>>,
) -> Signal<RevealSequencer> {
    let mut sequencer = use_signal(|| RevealSequencer::new(config(), clock::seed()));

    #[cfg(target_arch = "wasm32")]
    use_future(move || async move {
        let mut last = clock::now_ms();
        loop {
            TimeoutFuture::new(TICK_MS).await;
            let now = clock::now_ms();
            let elapsed = Duration::from_secs_f64((now - last).max(0.0) / 1000.0);
            last = now;
            if sequencer.peek().is_complete() {
                break;
            }
            if sequencer.peek().pending_timers() == 0 {
                continue;
            }
            let events = match sequencer.try_write() {
                Ok(mut sequencer) => sequencer.advance(elapsed),
                Err(_) => continue,
            };
            if events.contains(&RevealEvent::Completed) {
                if let Some(handler) = on_complete.as_ref() {
                    handler.call(());
                }
            }
        }
    });

    // Without a browser there is nothing to scroll into view; play the whole
    // sequence at once.
    #[cfg(not(target_arch = "wasm32"))]
    use_effect(move || {
        let events = {
            let mut sequencer = sequencer.write();
            if !sequencer.mark_visible() {
                return;
            }
            sequencer.advance(Duration::from_secs(3600))
        };
        if events.contains(&RevealEvent::Completed) {
            if let Some(handler) = on_complete.as_ref() {
                handler.call(());
            }
        }
    });

    use_drop(move || {
        if let Ok(mut sequencer) = sequencer.try_write() {
            sequencer.teardown();
        }
    });

    sequencer
}

fn loading_bar(progress: u32) -> String {
    let progress = progress.min(100);
    let filled = (progress / 10) as usize;
    format!("[{}{}] {progress:>3}%", "█".repeat(filled), "░".repeat(10 - filled))
}

#[component]
fn RevealFrame(
    id: String,
    title: String,
    command: String,
    sequencer: Signal<RevealSequencer>,
    children: Element,
) -> Element {
    #[cfg(target_arch = "wasm32")]
    let mut target_handle = use_signal(|| None::<web_sys::Element>);
    #[cfg(target_arch = "wasm32")]
    let mut observer_handle = use_signal(|| None::<ObserverHandle>);

    #[cfg(target_arch = "wasm32")]
    use_effect(move || {
        use wasm_bindgen::closure::Closure;

        let Some(target) = target_handle.read().as_ref().cloned() else {
            return;
        };
        if observer_handle.peek().is_some() {
            return;
        }
        let mut visible_sequencer = sequencer;
        let closure = Rc::new(Closure::wrap(Box::new(
            move |entries: js_sys::Array, observer: web_sys::IntersectionObserver| {
                let entry = entries.get(0);
                if entry.is_null() || entry.is_undefined() {
                    return;
                }
                let entry: web_sys::IntersectionObserverEntry = entry.unchecked_into();
                if !entry.is_intersecting() {
                    return;
                }
                observer.unobserve(&entry.target());
                if let Ok(mut sequencer) = visible_sequencer.try_write() {
                    if sequencer.mark_visible() {
                        tracing::debug!("reveal: section visible");
                    }
                }
            },
        )
            as Box<dyn FnMut(js_sys::Array, web_sys::IntersectionObserver)>));
        let Ok(observer) = web_sys::IntersectionObserver::new(closure.as_ref().as_ref().unchecked_ref())
        else {
            return;
        };
        observer.observe(&target);
        observer_handle.set(Some(ObserverHandle {
            observer,
            target,
            _closure: closure,
        }));
    });

    #[cfg(target_arch = "wasm32")]
    use_drop(move || {
        if let Some(handle) = observer_handle.peek().as_ref() {
            handle.observer.unobserve(&handle.target);
        }
    });

    let phase = sequencer.read().phase();
    let status_class = match phase {
        RevealPhase::Complete => "reveal-status text-terminal-green",
        RevealPhase::Idle => "reveal-status terminal-muted",
        _ => "reveal-status text-terminal-yellow",
    };

    rsx! {
        section {
            id: "{id}",
            class: "reveal-section terminal-window",
            onmounted: move |_event| {
                #[cfg(target_arch = "wasm32")]
                {
                    let element = _event.data.as_ref().as_web_event();
                    target_handle.set(Some(element));
                }
            },
            div { class: "terminal-header",
                span { class: "text-terminal-red", "●" }
                span { class: "text-terminal-yellow", "●" }
                span { class: "text-terminal-green", "●" }
                span { class: "terminal-header-label text-terminal-cyan", "{title}" }
                span { class: "{status_class}", "[{phase.status()}]" }
            }
            div { class: "terminal-body terminal-stack",
                div { class: "terminal-prompt",
                    span { class: "text-terminal-green", "guest@portfolio" }
                    span { class: "text-terminal-white", ":~$ " }
                    span { class: "text-terminal-yellow", "{command}" }
                }
                if let RevealPhase::Initializing { progress } = phase {
                    p { class: "reveal-progress text-terminal-cyan", "{loading_bar(progress)}" }
                }
                {children}
            }
        }
    }
}

#[component]
pub fn AboutSection() -> Element {
    let sequencer = use_reveal(|| SectionKind::About.preset(&PROFILE), None);
    let shown = sequencer.read().shown();
    let capability_count = PROFILE.capabilities.len();

    rsx! {
        RevealFrame {
            id: "about".to_string(),
            title: "about.txt".to_string(),
            command: "cat about.txt".to_string(),
            sequencer,
            div { class: "about-summary",
                for line in PROFILE.summary.iter() {
                    p { class: "text-terminal-white", "{line}" }
                }
            }
            ul { class: "about-capabilities",
                for (index, capability) in PROFILE.capabilities.iter().enumerate() {
                    if index < shown {
                        li { key: "cap-{index}", class: "reveal-item text-terminal-green",
                            "{capability.icon} {capability.text}"
                        }
                    }
                }
            }
            div { class: "about-stats",
                for (index, stat) in PROFILE.stats.iter().enumerate() {
                    if capability_count + index < shown {
                        div { key: "stat-{index}", class: "reveal-item about-stat",
                            span { class: "about-stat-value text-terminal-cyan", "{stat.value}{stat.suffix}" }
                            span { class: "about-stat-label terminal-muted", "{stat.label}" }
                        }
                    }
                }
            }
        }
    }
}

#[component]
pub fn SkillsSection() -> Element {
    let sequencer = use_reveal(|| SectionKind::Skills.preset(&PROFILE), None);
    let shown = sequencer.read().shown();
    let categories = [SkillCategory::Backend, SkillCategory::Database, SkillCategory::DevOps];

    rsx! {
        RevealFrame {
            id: "skills".to_string(),
            title: "skills.sh".to_string(),
            command: "./skills.sh --verbose".to_string(),
            sequencer,
            for category in categories {
                div { key: "{category.label()}", class: "skills-group",
                    p { class: "skills-group-label text-terminal-yellow", "## {category.label()}" }
                    for (index, skill) in PROFILE.skills.iter().enumerate() {
                        if skill.category == category && index < shown {
                            p { key: "skill-{index}", class: "reveal-item skills-row",
                                span { class: "skills-name text-terminal-white", "{skill.name}" }
                                span { class: "skills-bar text-terminal-green", "{skill_bar(skill.level)}" }
                                span { class: "skills-level terminal-muted", " {skill.level}%" }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
pub fn ExperienceSection() -> Element {
    let sequencer = use_reveal(|| SectionKind::Experience.preset(&PROFILE), None);
    let shown = sequencer.read().shown();

    rsx! {
        RevealFrame {
            id: "experience".to_string(),
            title: "experience.log".to_string(),
            command: "tail -n 20 experience.log".to_string(),
            sequencer,
            for (index, role) in PROFILE.roles.iter().enumerate() {
                if index < shown {
                    article { key: "role-{index}", class: "reveal-item experience-role",
                        p { class: "experience-period text-terminal-yellow", "[{role.period}]" }
                        h3 { class: "experience-position text-terminal-cyan",
                            "{role.position} @ {role.company}"
                        }
                        ul {
                            for highlight in role.highlights.iter() {
                                li { class: "text-terminal-white", "> {highlight}" }
                            }
                        }
                        p { class: "experience-stack terminal-muted", "{role.technologies.join(\" · \")}" }
                    }
                }
            }
        }
    }
}

#[component]
pub fn ProjectsSection() -> Element {
    let sequencer = use_reveal(|| SectionKind::Projects.preset(&PROFILE), None);
    let shown = sequencer.read().shown();

    rsx! {
        RevealFrame {
            id: "projects".to_string(),
            title: "projects/".to_string(),
            command: "ls -la projects/".to_string(),
            sequencer,
            div { class: "projects-grid",
                for (index, project) in PROFILE.projects.iter().enumerate() {
                    if index < shown {
                        article { key: "{project.code}", class: "reveal-item project-card",
                            p { class: "project-code text-terminal-yellow", "[{project.code}]" }
                            h3 { class: "project-title text-terminal-cyan", "{project.title}" }
                            p { class: "project-summary text-terminal-white", "{project.summary}" }
                            p { class: "project-stack terminal-muted", "{project.stack.join(\" · \")}" }
                            div { class: "project-links",
                                if let Some(github) = project.github {
                                    a { class: "terminal-link text-terminal-green", href: "{github}", target: "_blank", rel: "noopener noreferrer", "[source]" }
                                }
                                if let Some(demo) = project.demo {
                                    a { class: "terminal-link text-terminal-green", href: "{demo}", target: "_blank", rel: "noopener noreferrer", "[demo]" }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
pub fn ContactSection() -> Element {
    let sequencer = use_reveal(|| SectionKind::Contact.preset(&PROFILE), None);
    let shown = sequencer.read().shown();

    rsx! {
        RevealFrame {
            id: "contact".to_string(),
            title: "contact.cfg".to_string(),
            command: "cat contact.cfg".to_string(),
            sequencer,
            for (index, channel) in PROFILE.channels.iter().enumerate() {
                if index < shown {
                    p { key: "{channel.label}", class: "reveal-item contact-row",
                        span { class: "contact-label text-terminal-yellow", "{channel.label}: " }
                        a { class: "terminal-link text-terminal-cyan", href: "{channel.href}", target: "_blank", rel: "noopener noreferrer", "{channel.value}" }
                    }
                }
            }
        }
    }
}

/// Power-on lines shown before the page. Calls `on_complete` once the last
/// line has settled.
#[component]
pub fn BootScreen(on_complete: EventHandler<()>) -> Element {
    let sequencer = use_reveal(boot_preset, Some(on_complete));

    #[cfg(target_arch = "wasm32")]
    use_effect(move || {
        let mut sequencer = sequencer;
        sequencer.write().mark_visible();
    });

    let snapshot = sequencer.read();
    let shown = snapshot.shown();
    let warming_up = matches!(snapshot.phase(), RevealPhase::Idle | RevealPhase::Initializing { .. });
    drop(snapshot);

    rsx! {
        div { class: "boot-screen", role: "status", aria_live: "polite",
            for (index, line) in BOOT_LINES.iter().take(shown).enumerate() {
                p { key: "boot-{index}", class: "boot-line text-terminal-green", "{line}" }
            }
            if warming_up {
                p { class: "boot-line terminal-muted", "Booting..." }
            }
            span { class: "terminal-cursor text-terminal-white", "█" }
            button {
                class: "boot-skip terminal-link text-terminal-yellow",
                onclick: move |_| on_complete.call(()),
                "[skip]"
            }
        }
    }
}
