//! Subcommand implementations

use crate::cli::{GenerateArgs, InspectArgs, ViewArgs};
use crate::config::SsmConfig;
use anyhow::{Context, Result};
use log::{info, warn};
use ssm_generator::{GenerationReport, Generator};
use ssm_io::ArchiveUnpacker;
use ssm_viewer::{parse_script, CanvasDisplay, InputEvent, Response, ViewerApp, CONTROLS_HELP};
use std::io::{self, BufRead};

pub fn generate(args: GenerateArgs, config: SsmConfig) -> Result<()> {
    let mut generator_config = config.generator;
    if let Some(dir) = args.output_dir {
        generator_config.output_dir = Some(dir);
    }
    if let Some(variant) = args.variant {
        generator_config.variant = variant.into();
    }
    if args.keep_working_dir_beside_output {
        generator_config.working_dir_beside_output = true;
    }

    info!("Generating snapshots for {}", args.model.display());
    let mut generator = Generator::software(generator_config);
    let report = generator
        .generate(&args.model)
        .with_context(|| format!("failed to generate an archive from {}", args.model.display()))?;

    print_report(&report);
    Ok(())
}

fn print_report(report: &GenerationReport) {
    println!(
        "Wrote {} ({} snapshots, {} bytes, {})",
        report.archive_path.display(),
        report.captured,
        report.bytes_written,
        report.variant
    );
    if !report.is_complete() {
        warn!("Archive is missing {} snapshots", report.failures.len());
        for failure in &report.failures {
            println!("  missing {}: {}", failure.key, failure.message);
        }
    }
}

pub fn view(args: ViewArgs, config: SsmConfig) -> Result<()> {
    let mut viewer_config = config.viewer;
    if let Some(variant) = args.variant {
        viewer_config.variant = Some(variant.into());
    }
    if let Some(store) = args.store {
        viewer_config.store = store.into();
    }

    let display = CanvasDisplay::from_config(&viewer_config).with_output(&args.frame_out);
    let mut app = ViewerApp::new(viewer_config, display);
    app.open(&args.archive)
        .with_context(|| format!("cannot load {}", args.archive.display()))?;
    print_title(&app);

    match args.script {
        Some(script) => {
            for event in parse_script(&script)? {
                play(&mut app, event);
                if !app.is_running() {
                    break;
                }
            }
        }
        None => {
            eprintln!("{}", CONTROLS_HELP);
            eprintln!("Enter left, right, up, down, w, s, + or -, one or more per line; q quits.");
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let line = line.context("failed to read input")?;
                match parse_script(&line) {
                    Ok(events) => {
                        for event in events {
                            play(&mut app, event);
                            if !app.is_running() {
                                break;
                            }
                        }
                    }
                    Err(err) => eprintln!("{}", err),
                }
                if !app.is_running() {
                    break;
                }
            }
        }
    }

    if app.is_running() {
        play(&mut app, InputEvent::CloseRequested);
    }
    Ok(())
}

fn play(app: &mut ViewerApp<CanvasDisplay>, event: InputEvent) {
    match app.dispatch(event) {
        Response::Frame(_) => print_title(app),
        Response::LookupFailed { key, .. } => println!("(no snapshot for {})", key),
        Response::Closed => info!("Viewer closed"),
        Response::Ignored => {}
    }
}

fn print_title(app: &ViewerApp<CanvasDisplay>) {
    let display = app.display();
    match display.output() {
        Some(path) => println!("{} -> {}", display.title(), path.display()),
        None => println!("{}", display.title()),
    }
}

pub fn inspect(args: InspectArgs) -> Result<()> {
    let (archive, variant) = ArchiveUnpacker::new()
        .read(&args.archive)
        .with_context(|| format!("cannot read {}", args.archive.display()))?;

    println!("Archive:  {}", args.archive.display());
    println!("Variant:  {}", variant);
    println!("Entries:  {}", archive.len());
    println!("Bytes:    {}", archive.total_bytes());

    let missing = archive.missing_keys();
    if missing.is_empty() {
        println!("Grid:     complete");
    } else {
        println!("Grid:     {} snapshots missing", missing.len());
        for key in missing {
            println!("  {}", key);
        }
    }
    Ok(())
}
