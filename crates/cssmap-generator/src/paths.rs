//! Source paths relative to the output location

use std::collections::HashMap;

use cssmap_codec::{dirname, join, normalize};

use crate::context::{Annotation, GenerationContext};

/// Computes paths relative to the directory the map will be read from
///
/// That directory is the directory of `to` (or the working directory),
/// unless `map.annotation` names a custom map location, in which case it is
/// the directory of that location. Results always use `/` separators and
/// are cached for the lifetime of the resolver, which is one run.
#[derive(Debug)]
pub struct PathResolver {
    cwd: String,
    base: String,
    cache: HashMap<String, String>,
}

impl PathResolver {
    pub fn new(ctx: &GenerationContext) -> Self {
        let cwd = normalize(&ctx.working_dir());
        let relative_from = ctx.to.as_deref().map_or_else(|| ".".to_string(), dirname);
        let mut base = join(&cwd, &relative_from);

        if let Some(Annotation::Path(annotation)) = &ctx.map_options().annotation {
            base = dirname(&join(&base, annotation));
        }

        PathResolver {
            cwd,
            base,
            cache: HashMap::new(),
        }
    }

    /// Absolute directory results are relative to
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Express `file` relative to the map location
    pub fn relative(&mut self, file: &str) -> String {
        if let Some(cached) = self.cache.get(file) {
            return cached.clone();
        }
        let resolved = relative_path(&self.base, &join(&self.cwd, file));
        self.cache.insert(file.to_string(), resolved.clone());
        resolved
    }

    /// Number of distinct paths resolved so far
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

/// Split a normalized absolute path into its root and segments
fn segments(path: &str) -> (&str, Vec<&str>) {
    let root_len = path.find('/').map_or(0, |idx| idx + 1);
    let (root, rest) = path.split_at(root_len);
    (root, rest.split('/').filter(|s| !s.is_empty()).collect())
}

/// Relative path from directory `from` to `to`, both normalized and absolute
///
/// Paths on different roots (Windows drives) cannot be related; `to` is
/// returned as is.
fn relative_path(from: &str, to: &str) -> String {
    let (from_root, from_parts) = segments(from);
    let (to_root, to_parts) = segments(to);
    if from_root != to_root {
        return to.to_string();
    }

    let common = from_parts
        .iter()
        .zip(&to_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = vec![".."; from_parts.len() - common];
    parts.extend(&to_parts[common..]);
    parts.join("/")
}
