//! `dlgdoc` - CLI for deluge-docs
//!
//! This binary renders `:key` and `:screen` directives in markdown files and
//! exposes the shortcut and screen renderers for one-off use.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::{debug, info};

use deluge_docs::cli::{
    CheckCommand, Cli, Command, ConfigCommand, ControlsCommand, KeyCommand, KeyFormat,
    RenderCommand, ScreenCommand,
};
use deluge_docs::controls::ControlKind;
use deluge_docs::directive::DEFAULT_SCREEN_ALT;
use deluge_docs::screen::rasterize;
use deluge_docs::{
    init_logging, Config, ControlTable, DirectiveProcessor, IconRegistry, OledFrame,
    ProcessStats, Renderer, ScreenStyle, Sequence,
};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Configuration is loaded only by the commands that use it
    let config_path = cli.config_path();
    let load_config = || Config::load_from(Some(config_path.clone()));
    let controls = ControlTable::deluge();

    // Execute the command
    match cli.command {
        Command::Render(cmd) => handle_render(&load_config()?, &controls, &cmd),
        Command::Check(cmd) => handle_check(&load_config()?, &controls, &cmd),
        Command::Key(cmd) => handle_key(&load_config()?, &controls, &cmd),
        Command::Screen(cmd) => handle_screen(&load_config()?, &cmd),
        Command::Controls(cmd) => handle_controls(&controls, &cmd),
        Command::Config(cmd) => handle_config(&config_path, &cmd),
    }
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("reading stdin")?;
        Ok(text)
    } else {
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
    }
}

fn handle_render(
    config: &Config,
    controls: &ControlTable,
    cmd: &RenderCommand,
) -> anyhow::Result<()> {
    let icons = IconRegistry::load(&config.icons)?;
    let processor = DirectiveProcessor::new(controls, &icons, &config.screen)?;

    let markdown = read_input(&cmd.input)?;
    let processed = processor
        .process(&markdown)
        .with_context(|| format!("rendering {}", cmd.input.display()))?;

    match &cmd.output {
        Some(path) => {
            fs::write(path, &processed.output)
                .with_context(|| format!("writing {}", path.display()))?;
            info!(
                output = %path.display(),
                keys = processed.stats.keys,
                screens = processed.stats.screens,
                "rendered document"
            );
        }
        None => io::stdout().write_all(processed.output.as_bytes())?,
    }
    Ok(())
}

fn handle_check(
    config: &Config,
    controls: &ControlTable,
    cmd: &CheckCommand,
) -> anyhow::Result<()> {
    let icons = IconRegistry::load(&config.icons)?;
    let processor = DirectiveProcessor::new(controls, &icons, &config.screen)?;

    let mut total = ProcessStats::default();
    for path in &cmd.inputs {
        let markdown = read_input(path)?;
        let processed = processor
            .process(&markdown)
            .with_context(|| format!("checking {}", path.display()))?;
        println!(
            "{}: {} key, {} screen",
            path.display(),
            processed.stats.keys,
            processed.stats.screens
        );
        total += processed.stats;
    }

    println!(
        "OK: {} directives in {} files",
        total.total(),
        cmd.inputs.len()
    );
    Ok(())
}

fn handle_key(config: &Config, controls: &ControlTable, cmd: &KeyCommand) -> anyhow::Result<()> {
    let sequence = Sequence::parse(&cmd.sequence, controls)?;
    debug!(canonical = %sequence, "parsed shortcut");

    match cmd.format {
        KeyFormat::Json => println!("{}", serde_json::to_string_pretty(&sequence)?),
        KeyFormat::Html | KeyFormat::Search => {
            let icons = IconRegistry::load(&config.icons)?;
            let rendered = Renderer::new(&icons).render(&sequence)?;
            if cmd.format == KeyFormat::Html {
                println!("{}", rendered.to_html());
            } else {
                println!("{}", rendered.search_text());
            }
        }
    }
    Ok(())
}

fn handle_screen(config: &Config, cmd: &ScreenCommand) -> anyhow::Result<()> {
    let payload = match cmd.payload.strip_prefix('@') {
        Some(path) => read_input(Path::new(path))?,
        None => cmd.payload.clone(),
    };

    let style = ScreenStyle::from_config(&config.screen)?;
    let scale = cmd.scale.unwrap_or(config.screen.default_scale);
    let frame = OledFrame::decode(payload.trim())?;
    let image = rasterize(&frame, scale, &style)?;

    match &cmd.output {
        Some(path) => {
            fs::write(path, image.png_bytes()?)
                .with_context(|| format!("writing {}", path.display()))?;
            info!(output = %path.display(), width = image.width, height = image.height, "wrote screen");
        }
        None => println!(
            "{}",
            image.to_html(cmd.alt.as_deref().unwrap_or(DEFAULT_SCREEN_ALT))
        ),
    }
    Ok(())
}

fn handle_controls(controls: &ControlTable, cmd: &ControlsCommand) -> anyhow::Result<()> {
    if cmd.json {
        let list: Vec<_> = controls.iter().collect();
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    println!("Controls");
    println!("========");
    for control in controls.iter() {
        let kind = match control.kind() {
            ControlKind::LabelledButton { icon: Some(icon) } => format!("button (icon {icon})"),
            ControlKind::LabelledButton { icon: None } => "button".to_string(),
            ControlKind::Knob { .. } => "knob".to_string(),
            ControlKind::Pad => "pad".to_string(),
        };
        let modifiers = control.kind().modifier_keywords();
        print!("  {:<20} {kind}", control.name());
        if !modifiers.is_empty() {
            print!("  [{}]", modifiers.join(", "));
        }
        if !control.alias_names().is_empty() {
            print!("  aka {}", control.alias_names().join(", "));
        }
        println!();
    }
    Ok(())
}

fn handle_config(config_path: &Path, cmd: &ConfigCommand) -> anyhow::Result<()> {
    let path = cmd.config_file(config_path);
    match cmd {
        ConfigCommand::Show { json } => {
            let config = Config::load_from(Some(path))?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Icons]");
                println!("  Directory:          {}", config.icons.dir.display());
                println!("  URL prefix:         {}", config.icons.url_prefix);
                println!("  Extensions:         {}", config.icons.extensions.join(", "));
                println!();
                println!("[Screen]");
                println!("  Default scale:      {}", config.screen.default_scale);
                println!("  Density:            {}", config.screen.density);
                println!("  Padding:            {}", config.screen.padding);
                println!("  Gap:                {}", config.screen.gap);
                println!("  Background:         {}", config.screen.background);
                println!("  Foreground:         {}", config.screen.foreground);
            }
        }
        ConfigCommand::Path => {
            println!("{}", path.display());
        }
        ConfigCommand::Validate { .. } => {
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => bail!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
