//! Load `.walkfetch.toml` (CLI only). Library callers build [`Opts`] themselves.

use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::Opts;
use crate::utils::config::PackagePaths;

#[derive(Debug, Default, Deserialize)]
pub struct WalkfetchToml {
    #[serde(default)]
    settings: Settings,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct Settings {
    roots: Option<Vec<PathBuf>>,
    dest: Option<PathBuf>,
    download_only: Option<bool>,
    urls: Option<Vec<String>>,
    seed: Option<usize>,
    threads: Option<usize>,
    exclude: Option<Vec<String>>,
    verbose: Option<bool>,
    poll_interval_ms: Option<u64>,
}

/// Path of the config file in `dir`.
pub fn config_path_in(dir: &Path) -> PathBuf {
    dir.join(PackagePaths::get().config_filename())
}

/// Read a config file. `Ok(None)` if it does not exist; `Err` if it is unreadable or invalid.
/// Callers usually log the error and carry on with defaults.
pub fn load_walkfetch_toml(path: &Path) -> anyhow::Result<Option<WalkfetchToml>> {
    let s = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("read {}", path.display())),
    };
    let parsed = parse_walkfetch_toml(&s).with_context(|| format!("parse {}", path.display()))?;
    Ok(Some(parsed))
}

pub fn parse_walkfetch_toml(s: &str) -> Result<WalkfetchToml, toml::de::Error> {
    toml::from_str(s)
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($set:expr, $opts:expr, $set_field:ident => $opts_field:ident) => {
        if let Some(v) = $set.$set_field.clone() {
            $opts.$opts_field = v;
        }
    };
}

/// Apply file config to opts (only fields present in the file). Call before applying CLI.
pub fn apply_file_to_opts(file: &WalkfetchToml, opts: &mut Opts) {
    let set = &file.settings;
    apply_file_opt!(set, opts, roots => roots);
    apply_file_opt!(set, opts, dest => dest);
    apply_file_opt!(set, opts, download_only => download_only);
    apply_file_opt!(set, opts, urls => urls);
    apply_file_opt!(set, opts, seed => seed);
    apply_file_opt!(set, opts, exclude => exclude);
    apply_file_opt!(set, opts, verbose => verbose);
    if let Some(n) = set.threads {
        opts.num_threads = Some(n);
    }
    if let Some(ms) = set.poll_interval_ms {
        opts.poll_interval = Duration::from_millis(ms);
    }
}
