use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use minijinja::Environment;
use serde::Serialize;
use tracing::debug;

use crate::AppError;

/// HTML page templates, read from `*.html` files in one directory.
#[derive(Clone)]
pub struct Templates {
    dir: PathBuf,
    reload: bool,
    env: Arc<Environment<'static>>,
}

impl Templates {
    /// Load every template in `dir`.
    ///
    /// With `reload` set, templates are read from disk again on each render.
    pub fn load(dir: impl Into<PathBuf>, reload: bool) -> crate::AppResult<Self> {
        let dir = dir.into();
        let env = Arc::new(build_environment(&dir)?);
        Ok(Templates { dir, reload, env })
    }

    /// Render the template called `name` with `context`.
    pub fn render<S: Serialize>(&self, name: &str, context: S) -> crate::AppResult<String> {
        if self.reload {
            let env = build_environment(&self.dir)?;
            return Ok(env.get_template(name)?.render(context)?);
        }

        Ok(self.env.get_template(name)?.render(context)?)
    }
}

fn build_environment(dir: &Path) -> crate::AppResult<Environment<'static>> {
    let mut env = Environment::new();
    let mut count = 0;

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().map_or(true, |ext| ext != "html") {
            continue;
        }
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };

        let source = fs::read_to_string(&path)?;
        env.add_template_owned(name.to_owned(), source)?;
        count += 1;
    }

    if count == 0 {
        return Err(AppError::NoTemplates(dir.to_owned()));
    }

    debug!("loaded {count} templates from {}", dir.display());

    Ok(env)
}
