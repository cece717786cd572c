use dioxus::prelude::*;
#[cfg(target_arch = "wasm32")]
use dioxus::web::WebEventExt;
#[cfg(target_arch = "wasm32")]
use gloo_timers::future::TimeoutFuture;
use portfolio_core::console::Key as ConsoleKey;
use portfolio_core::{CommandTable, Console, ConsoleState, PROFILE};
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;
#[cfg(target_arch = "wasm32")]
use std::time::Duration;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;

use crate::clock;

const TICK_MS: u32 = 50;

#[cfg(target_arch = "wasm32")]
struct ShortcutListener {
    closure: Rc<wasm_bindgen::closure::Closure<dyn FnMut(web_sys::KeyboardEvent)>>,
}

fn console_key(key: &Key) -> Option<ConsoleKey> {
    match key {
        Key::Enter => Some(ConsoleKey::Enter),
        Key::ArrowUp => Some(ConsoleKey::ArrowUp),
        Key::ArrowDown => Some(ConsoleKey::ArrowDown),
        Key::Tab => Some(ConsoleKey::Tab),
        Key::Escape => Some(ConsoleKey::Escape),
        _ => None,
    }
}

/// Backtick or Ctrl+K (Cmd+K on macOS). A backtick typed into a text field
/// stays text.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
fn is_toggle_shortcut(key: &str, ctrl: bool, meta: bool, in_text_field: bool) -> bool {
    if (ctrl || meta) && key.eq_ignore_ascii_case("k") {
        return true;
    }
    key == "`" && !in_text_field
}

#[cfg(target_arch = "wasm32")]
fn targets_text_field(event: &web_sys::KeyboardEvent) -> bool {
    event.target().is_some_and(|target| {
        target.is_instance_of::<web_sys::HtmlInputElement>()
            || target.is_instance_of::<web_sys::HtmlTextAreaElement>()
    })
}

#[component]
pub fn ConsoleOverlay() -> Element {
    let mut console = use_signal(|| Console::new(CommandTable::portfolio(&PROFILE), clock::seed()));
    #[cfg(target_arch = "wasm32")]
    let mut output_handle = use_signal(|| None::<web_sys::HtmlElement>);
    #[cfg(target_arch = "wasm32")]
    let mut input_handle = use_signal(|| None::<web_sys::HtmlInputElement>);
    #[cfg(target_arch = "wasm32")]
    let mut shortcut_listener = use_signal(|| None::<ShortcutListener>);

    #[cfg(target_arch = "wasm32")]
    use_effect(move || {
        use wasm_bindgen::closure::Closure;

        if shortcut_listener.peek().is_some() {
            return;
        }
        let Some(window) = web_sys::window() else {
            return;
        };
        tracing::debug!("console: attach shortcut listener");
        let mut on_key_console = console;
        let closure = Rc::new(Closure::wrap(Box::new(move |event: web_sys::KeyboardEvent| {
            if event.key() == "Escape" {
                if let Ok(mut console) = on_key_console.try_write() {
                    console.close();
                }
                return;
            }
            if !is_toggle_shortcut(
                &event.key(),
                event.ctrl_key(),
                event.meta_key(),
                targets_text_field(&event),
            ) {
                return;
            }
            event.prevent_default();
            if let Ok(mut console) = on_key_console.try_write() {
                console.toggle();
            }
        }) as Box<dyn FnMut(web_sys::KeyboardEvent)>));
        let _ = window.add_event_listener_with_callback(
            "keydown",
            closure.as_ref().as_ref().unchecked_ref(),
        );
        shortcut_listener.set(Some(ShortcutListener { closure }));
    });

    #[cfg(target_arch = "wasm32")]
    use_drop(move || {
        if let Some(listener) = shortcut_listener.peek().as_ref() {
            if let Some(window) = web_sys::window() {
                let _ = window.remove_event_listener_with_callback(
                    "keydown",
                    listener.closure.as_ref().as_ref().unchecked_ref(),
                );
            }
        }
    });

    // Drives the console's effect timers with measured wall time. The task
    // belongs to this component and stops with it.
    #[cfg(target_arch = "wasm32")]
    use_future(move || async move {
        let mut last = clock::now_ms();
        loop {
            TimeoutFuture::new(TICK_MS).await;
            let now = clock::now_ms();
            let elapsed = Duration::from_secs_f64((now - last).max(0.0) / 1000.0);
            last = now;
            if console.peek().pending_timers() == 0 {
                continue;
            }
            if let Ok(mut console) = console.try_write() {
                console.advance(elapsed);
            }
        }
    });

    use_effect(move || {
        let console = console.read();
        let _generation = console.scroll_generation();
        let _transcript = console.active_effect().map(|effect| effect.transcript().len());
        #[cfg(target_arch = "wasm32")]
        if let Some(element) = output_handle.peek().as_ref() {
            element.set_scroll_top(element.scroll_height());
        }
    });

    #[cfg(target_arch = "wasm32")]
    use_effect(move || {
        if !console.read().is_open() {
            return;
        }
        if let Some(element) = input_handle.peek().as_ref() {
            let _ = element.focus();
        }
    });

    use_drop(move || {
        if let Ok(mut console) = console.try_write() {
            console.teardown();
        }
    });

    let snapshot = console.read();
    let state = snapshot.state();
    let input_value = snapshot.input().to_string();
    let lines = snapshot.scrollback().to_vec();
    let effect_view = snapshot
        .active_effect()
        .map(|effect| (effect.transcript().to_vec(), effect.progress_bar()));
    drop(snapshot);

    if state == ConsoleState::Closed {
        return rsx! {
            button {
                class: "console-toggle",
                aria_label: "Open terminal",
                title: "Open terminal (` or Ctrl+K)",
                onclick: move |_| console.write().open(),
                ">_"
            }
        };
    }

    rsx! {
        div {
            class: "console-backdrop",
            onclick: move |_| console.write().close(),
            div {
                class: "console-panel terminal-window",
                role: "dialog",
                aria_label: "Interactive terminal",
                onclick: move |event| event.stop_propagation(),
                div { class: "terminal-header",
                    button {
                        class: "console-close text-terminal-red",
                        aria_label: "Close terminal",
                        onclick: move |_| console.write().close(),
                        "●"
                    }
                    span { class: "text-terminal-yellow", "●" }
                    span { class: "text-terminal-green", "●" }
                    span { class: "terminal-header-label text-terminal-cyan", "guest@portfolio:~" }
                }
                div {
                    class: "terminal-output terminal-stack console-output",
                    onmounted: move |_event| {
                        #[cfg(target_arch = "wasm32")]
                        {
                            let element = _event.data.as_ref().as_web_event();
                            if let Ok(node) = element.dyn_into::<web_sys::HtmlElement>() {
                                output_handle.set(Some(node));
                            }
                        }
                    },
                    for line in lines.iter() {
                        div { key: "{line.id}", class: "terminal-entry",
                            if !line.command.is_empty() {
                                div { class: "terminal-prompt",
                                    span { class: "text-terminal-green", "guest@portfolio" }
                                    span { class: "text-terminal-white", ":~$ " }
                                    span { class: "text-terminal-yellow", "{line.command}" }
                                }
                            }
                            for (index, text) in line.output.lines().enumerate() {
                                p {
                                    key: "{line.id}-{index}",
                                    class: if line.is_error { "console-line text-terminal-red" } else { "console-line text-terminal-white" },
                                    "{text}"
                                }
                            }
                        }
                    }
                    if let Some((transcript, bar)) = effect_view {
                        div { class: "terminal-entry console-effect",
                            for (index, text) in transcript.iter().enumerate() {
                                p { key: "effect-{index}", class: "console-line text-terminal-green", "{text}" }
                            }
                            p { class: "console-line text-terminal-cyan", "{bar}" }
                        }
                    }
                }
                div { class: "terminal-input-bar",
                    div { class: "terminal-prompt-inline",
                        span { class: "text-terminal-green", "guest@portfolio" }
                        span { class: "text-terminal-white", ":~$" }
                    }
                    input {
                        r#type: "text",
                        class: "terminal-input",
                        value: "{input_value}",
                        placeholder: if state == ConsoleState::Effect { "running..." } else { "type a command" },
                        autocomplete: "off",
                        spellcheck: "false",
                        disabled: state == ConsoleState::Effect,
                        onmounted: move |_event| {
                            #[cfg(target_arch = "wasm32")]
                            {
                                let element = _event.data.as_ref().as_web_event();
                                if let Ok(node) = element.dyn_into::<web_sys::HtmlInputElement>() {
                                    let _ = node.focus();
                                    input_handle.set(Some(node));
                                }
                            }
                        },
                        oninput: move |event| console.write().set_input(event.value()),
                        onkeydown: move |event| {
                            let Some(key) = console_key(&event.key()) else {
                                return;
                            };
                            if console.write().key(key, clock::now()) {
                                event.prevent_default();
                            }
                        },
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_only_console_keys() {
        assert_eq!(console_key(&Key::Enter), Some(ConsoleKey::Enter));
        assert_eq!(console_key(&Key::Tab), Some(ConsoleKey::Tab));
        assert_eq!(console_key(&Key::Character("a".to_string())), None);
    }

    #[test]
    fn toggle_shortcuts() {
        assert!(is_toggle_shortcut("`", false, false, false));
        assert!(is_toggle_shortcut("k", true, false, false));
        assert!(is_toggle_shortcut("K", false, true, false));
        assert!(!is_toggle_shortcut("k", false, false, false));
    }

    #[test]
    fn backtick_in_a_text_field_is_typed_not_toggled() {
        assert!(!is_toggle_shortcut("`", false, false, true));
        assert!(is_toggle_shortcut("k", true, false, true));
    }
}
