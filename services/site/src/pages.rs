use chrono::{Datelike, Local};
use gt_portal::config::SiteConfig;
use gt_portal::error::AppError;
use gt_portal::images::ImagePicker;
use minijinja::{context, Environment, Value};
use std::path::{Path, PathBuf};

/// The four pages of the portal, each bound to one template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Page {
    Home,
    About,
    Members,
    Contact,
}

impl Page {
    #[cfg(test)]
    pub(crate) const ALL: [Page; 4] = [Page::Home, Page::About, Page::Members, Page::Contact];

    pub(crate) fn path(self) -> &'static str {
        match self {
            Page::Home => "/",
            Page::About => "/sobre",
            Page::Members => "/membros",
            Page::Contact => "/contato",
        }
    }

    pub(crate) fn template(self) -> &'static str {
        match self {
            Page::Home => "index.html",
            Page::About => "sobre.html",
            Page::Members => "membros.html",
            Page::Contact => "contato.html",
        }
    }

    /// Key the navigation uses to highlight the current page.
    pub(crate) fn active_key(self) -> &'static str {
        match self {
            Page::Home => "index_route",
            Page::About => "sobre_route",
            Page::Members => "membros_route",
            Page::Contact => "contato_route",
        }
    }
}

fn template_environment() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template("base.html", include_str!("../templates/base.html"))?;
    env.add_template("index.html", include_str!("../templates/index.html"))?;
    env.add_template("sobre.html", include_str!("../templates/sobre.html"))?;
    env.add_template("membros.html", include_str!("../templates/membros.html"))?;
    env.add_template("contato.html", include_str!("../templates/contato.html"))?;
    Ok(env)
}

/// Renders pages with a freshly picked gallery image on every request.
pub(crate) struct Site {
    templates: Environment<'static>,
    picker: ImagePicker,
    static_root: PathBuf,
}

impl Site {
    pub(crate) fn new(config: &SiteConfig) -> Result<Self, AppError> {
        Ok(Self {
            templates: template_environment()?,
            picker: ImagePicker::new(config.static_root(), &config.gallery_dir),
            static_root: config.static_root().to_path_buf(),
        })
    }

    pub(crate) fn static_root(&self) -> &Path {
        &self.static_root
    }

    pub(crate) fn render(&self, page: Page) -> Result<String, AppError> {
        let mut rng = rand::thread_rng();
        let hero_image = self.picker.pick_web_path(&mut rng).map(asset_url);
        let sobre_image = match page {
            Page::About => self.picker.pick_web_path(&mut rng).map(asset_url),
            _ => None,
        };

        let template = self.templates.get_template(page.template())?;
        let html = template.render(context! {
            active_page => page.active_key(),
            hero_image => hero_image,
            sobre_image => sobre_image,
            year => Local::now().year(),
        })?;
        Ok(html)
    }
}

/// `/static/` URL for a static-root relative path. Every byte outside the
/// unreserved set (and `/`) is percent-encoded, so the result needs no
/// further HTML escaping.
fn asset_url(relative: String) -> Value {
    let mut url = String::from("/static/");
    for byte in relative.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'/' => {
                url.push(byte as char)
            }
            other => url.push_str(&format!("%{other:02X}")),
        }
    }
    Value::from_safe_string(url)
}
