use dioxus::prelude::*;
use dioxus_gallery::{GalleryConfig, JustifiedGallery, ProgressBar, ProgressBarView};

mod config;
mod error;

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match config::load_config().and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    dioxus::LaunchBuilder::new().with_context(config).launch(App);
}

#[component]
fn App() -> Element {
    let config = use_context::<GalleryConfig>();
    let progress = use_hook(|| ProgressBar::new(&config.progress_mount).map(Signal::new));

    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        match progress {
            Ok(progress) => rsx! {
                ProgressBarView { state: progress }
                JustifiedGallery { config, progress }
            },
            Err(e) => rsx! {
                div { style: "padding: 24px; text-align: center; background: #f8d7da; border-radius: 8px; color: #721c24;",
                    "{e}"
                }
            },
        }
    }
}
