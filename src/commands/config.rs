//! Config command handlers: show effective configuration.

use std::fmt::Display;

use anyhow::Result;

use crate::app_config::{LoadedConfig, Setting, Settings};

pub fn run_config_show_command(loaded: &LoadedConfig, settings: &Settings) -> Result<()> {
    let resolved_path = loaded.path.as_ref().map_or_else(
        || "<unresolved>".to_string(),
        |path| path.display().to_string(),
    );
    println!("config_path = {resolved_path}");
    println!(
        "config_file = {}",
        if loaded.loaded_from_file() {
            "loaded"
        } else {
            "not found (using defaults)"
        }
    );
    print_setting("server", &settings.server);
    print_setting("output_dir", &Setting {
        value: settings.output_dir.value.display(),
        source: settings.output_dir.source,
    });
    print_setting("overwrite", &settings.overwrite);
    print_setting("connect_timeout_secs", &settings.connect_timeout_secs);
    print_setting("read_timeout_secs", &settings.read_timeout_secs);

    Ok(())
}

fn print_setting<T: Display>(key: &str, setting: &Setting<T>) {
    println!("{key} = {} ({})", setting.value, setting.source.as_str());
}
