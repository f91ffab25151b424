//! Carries out navigation requested by the nav labels.

use std::process::Command;

use vitrine_engine::core::WindowCtx;
use vitrine_scene::nav::{NavTarget, Navigator};

/// Fragments retitle the window (the scene has already scrolled); external
/// links go to the system URL handler.
pub struct WindowNavigator<'a, 'w> {
    pub window: &'a WindowCtx<'w>,
    pub base_title: &'a str,
}

impl Navigator for WindowNavigator<'_, '_> {
    fn navigate(&mut self, target: &NavTarget) {
        match target {
            NavTarget::Fragment(fragment) if fragment.is_empty() => {
                self.window.set_title(self.base_title);
            }
            NavTarget::Fragment(fragment) => {
                log::debug!("navigate to #{fragment}");
                self.window.set_title(&format!("{} | {fragment}", self.base_title));
            }
            NavTarget::External(url) => {
                log::info!("opening {url}");
                if let Err(err) = open_external(url) {
                    log::warn!("could not open {url}: {err}");
                }
            }
        }
    }
}

fn open_external(url: &str) -> std::io::Result<()> {
    let mut cmd = if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", "", url]);
        c
    } else if cfg!(target_os = "macos") {
        let mut c = Command::new("open");
        c.arg(url);
        c
    } else {
        let mut c = Command::new("xdg-open");
        c.arg(url);
        c
    };
    cmd.spawn().map(|_| ())
}
