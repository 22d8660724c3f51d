use dioxus::prelude::*;

use store::StickyNotesConfig;

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    let config: StickyNotesConfig = use_hook(ui::load_config);

    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        document::Title { "Sticky Notes" }

        ui::StickyNotes { config }
    }
}
