use anyhow::{Context, Result};
use highlight_ranges_config::Config;
use highlight_ranges_engine::invariants;
use std::{
    env, fs,
    path::{Path, PathBuf},
    process,
};

mod input;
mod render;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    List,
    Tree,
    Html,
}

impl Format {
    fn parse(arg: &str) -> Option<Self> {
        match arg {
            "list" => Some(Self::List),
            "tree" => Some(Self::Tree),
            "html" => Some(Self::Html),
            _ => None,
        }
    }
}

fn usage(program: &str) -> ! {
    eprintln!("Usage: {program} <text-file> <ranges-file> [list|tree|html]");
    eprintln!("       {program} init-config");
    process::exit(1);
}

/// Writes a default config to `config_path` unless one is already there.
/// Returns whether a file was written.
fn init_config(config_path: &Path) -> Result<bool> {
    if Config::load_from_path(config_path)?.is_some() {
        return Ok(false);
    }
    Config::default()
        .save_to_path(config_path)
        .with_context(|| format!("Failed to write config file {}", config_path.display()))?;
    Ok(true)
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("highlight-ranges");

    if let [_, command] = args.as_slice()
        && command == "init-config"
    {
        let config_path = Config::config_path();
        if init_config(&config_path)? {
            println!("Wrote default config to {}", config_path.display());
        } else {
            println!("Config already exists at {}", config_path.display());
        }
        return Ok(());
    }

    let (text_path, ranges_path, format) = match args.as_slice() {
        [_, text, ranges] => (PathBuf::from(text), PathBuf::from(ranges), Format::List),
        [_, text, ranges, format] => match Format::parse(format) {
            Some(format) => (PathBuf::from(text), PathBuf::from(ranges), format),
            None => {
                eprintln!("Error: Unknown output format '{format}'");
                usage(program);
            }
        },
        _ => usage(program),
    };

    let config = match Config::load() {
        Ok(Some(config)) => {
            log::info!("Loaded config from {}", Config::config_path().display());
            config
        }
        Ok(None) => Config::default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    let text = fs::read_to_string(&text_path)
        .with_context(|| format!("Failed to read text file {}", text_path.display()))?;
    let ranges = input::read_ranges(&ranges_path)?;
    input::check_bounds(&ranges, text.chars().count())?;

    let mut tree = config.new_tree();
    tree.insert_all(ranges, config.assume_sorted)?;
    log::info!("Built range tree with {} nodes", tree.len());
    for violation in invariants::violations(&tree) {
        log::error!("{violation}");
    }

    match format {
        Format::List => print!("{}", render::render_list(&tree.flatten(), &text)),
        Format::Tree => print!("{}", tree.outline()),
        Format::Html => println!(
            "{}",
            render::render_html(&tree.flatten(), &text, &config.class_key)
        ),
    }

    Ok(())
}
