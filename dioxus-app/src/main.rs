mod blog;
mod canvas;
mod clock;
mod config;
mod console;
mod hooks;
mod posts;
mod routes;
mod sections;
mod terminal;

fn main() {
    dioxus::launch(routes::App);
}
