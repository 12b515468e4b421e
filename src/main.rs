//! Field Notes CLI - collect location/sample photos and export them with
//! CSV/JSON metadata.
#![forbid(unsafe_code)]

use std::cell::RefCell;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use clap::{CommandFactory, Parser};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use fnotes::capture::FileCapture;
use fnotes::cli::{Cli, CollectArgs, Commands, CompletionsArgs, ConfigArgs, InitArgs, ShellArgs};
use fnotes::config::{self, FieldConfig};
use fnotes::controller::SessionController;
use fnotes::error::{FieldError, Result};
use fnotes::geo::{GpsFix, LocationService, NullLocator, StaticLocator};
use fnotes::output::{self, Mode};
use fnotes::storage::{FsDir, SaveSummary};
use fnotes::{identity, logging};

fn main() {
    let cli = Cli::parse();

    if cli.no_color || !io::stdout().is_terminal() {
        console::set_colors_enabled(false);
    }

    logging::init(cli.mode().is_json(), cli.verbose, cli.quiet);

    if let Err(e) = run(&cli) {
        output::emit_error(cli.mode(), &e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        None => {
            Cli::command().print_help().map_err(FieldError::Io)?;
            Ok(())
        }
        Some(Commands::Collect(args)) => cmd_collect(cli, args),
        Some(Commands::Shell(args)) => cmd_shell(cli, args),
        Some(Commands::Init(args)) => cmd_init(cli, args),
        Some(Commands::Config(args)) => cmd_config(cli, args),
        Some(Commands::Version) => cmd_version(cli),
        Some(Commands::Completions(args)) => cmd_completions(args),
    }
}

// === Shared helpers ===

fn effective_quality(flag: Option<u8>, config: &FieldConfig) -> Result<u8> {
    match flag {
        Some(q) if (1..=100).contains(&q) => Ok(q),
        Some(q) => Err(FieldError::ConfigInvalid(format!(
            "--quality must be 1-100, got {q}"
        ))),
        None => Ok(config.jpeg_quality),
    }
}

fn locator_from(
    no_gps: bool,
    lat: Option<f64>,
    lon: Option<f64>,
    acc: Option<f64>,
    config: &FieldConfig,
) -> Box<dyn LocationService> {
    if no_gps {
        return Box::new(NullLocator);
    }
    let mut fix = config.gps.fix();
    if lat.is_some() {
        fix.lat = lat;
    }
    if lon.is_some() {
        fix.lon = lon;
    }
    if acc.is_some() {
        fix.acc = acc;
    }
    if fix.is_empty() {
        Box::new(NullLocator)
    } else {
        Box::new(StaticLocator::new(fix))
    }
}

fn open_target(out: &Path) -> Result<FsDir> {
    FsDir::new(config::expand(out)?)
}

fn print_save_summary(summary: &SaveSummary) {
    println!(
        "{} {} ({} photos)",
        style("Saved").green().bold(),
        summary.folder,
        summary.photos_written
    );
    for file in &summary.files {
        println!("  {file}");
    }
}

// === collect ===

fn cmd_collect(cli: &Cli, args: &CollectArgs) -> Result<()> {
    let config = config::load_or_default(cli.config.as_deref())?;
    let mode = cli.mode();
    let quality = effective_quality(args.quality, &config)?;

    let project = args
        .project
        .clone()
        .or_else(|| config.project.clone())
        .unwrap_or_default();
    let out = args
        .out
        .clone()
        .or_else(|| config.output_dir.clone())
        .ok_or(FieldError::NoTarget)?;

    let capture = FileCapture::new(args.frames.clone(), quality);
    let locator = locator_from(args.no_gps, args.lat, args.lon, args.acc, &config);
    let mut ctl = SessionController::new(Box::new(capture), locator);
    ctl.set_target(Box::new(open_target(&out)?));

    ctl.new_location(&project, &args.note)?;
    ctl.refresh_gps();

    let progress = (mode == Mode::Text && args.frames.len() > 1).then(|| {
        let pb = ProgressBar::new(args.frames.len() as u64);
        pb.set_style(
            ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        pb
    });

    for i in 0..args.frames.len() {
        if args.split && i > 0 {
            ctl.advance_sample();
        }
        let report = ctl.snap()?;
        if let Some(pb) = &progress {
            pb.set_message(report.filename.clone());
            pb.inc(1);
        }
    }
    if let Some(pb) = &progress {
        pb.finish_and_clear();
    }

    let summary = ctl.save()?;
    output::emit(mode, &summary, || print_save_summary(&summary));
    Ok(())
}

// === shell ===

const SHELL_HELP: &str = "\
  new <note>          declare a new location
  project <name>      set the project name
  out <dir>           pick the save folder
  snap <image>        capture a frame into the current sample
  next                advance to the next sample
  clear               drop all captured photos
  gps [lat lon [acc]] refresh or set the GPS fix
  status              show the session state
  log                 show recent writes
  save                export photos + CSV/JSON
  quit                leave the shell";

fn cmd_shell(cli: &Cli, args: &ShellArgs) -> Result<()> {
    let config = config::load_or_default(cli.config.as_deref())?;
    let mode = cli.mode();
    let quality = effective_quality(args.quality, &config)?;

    let capture = Rc::new(RefCell::new(FileCapture::new(
        Vec::<PathBuf>::new(),
        quality,
    )));
    let locator = locator_from(false, None, None, None, &config);
    let mut ctl = SessionController::new(Box::new(Rc::clone(&capture)), locator);

    let mut project = args
        .project
        .clone()
        .or_else(|| config.project.clone())
        .unwrap_or_default();
    if let Some(out) = args.out.clone().or_else(|| config.output_dir.clone()) {
        ctl.set_target(Box::new(open_target(&out)?));
    }

    println!(
        "{} interactive session, 'help' for commands",
        style("fnotes").cyan().bold()
    );

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("fnotes> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(w, r)| (w, r.trim()));

        let outcome = match word {
            "" => Ok(()),
            "help" => {
                println!("{SHELL_HELP}");
                Ok(())
            }
            "quit" | "exit" => break,
            "project" => {
                project = rest.to_string();
                Ok(())
            }
            "out" => shell_out(&mut ctl, rest),
            "new" => shell_new(&mut ctl, &project, rest),
            "snap" => shell_snap(&mut ctl, &capture, rest),
            "next" => {
                let counter = ctl.advance_sample();
                println!("next sample: {}", identity::sample_id(counter));
                Ok(())
            }
            "clear" => {
                ctl.clear_photos();
                Ok(())
            }
            "gps" => shell_gps(&mut ctl, rest),
            "status" => {
                shell_status(&ctl);
                Ok(())
            }
            "log" => {
                shell_log(&ctl);
                Ok(())
            }
            "save" => ctl.save().map(|summary| print_save_summary(&summary)),
            other => Err(FieldError::Other(format!(
                "unknown command '{other}' (try 'help')"
            ))),
        };

        if let Err(e) = outcome {
            output::emit_error(mode, &e);
        }
    }
    Ok(())
}

fn shell_out(ctl: &mut SessionController, rest: &str) -> Result<()> {
    if rest.is_empty() {
        return Err(FieldError::Other("usage: out <dir>".to_string()));
    }
    ctl.set_target(Box::new(open_target(Path::new(rest))?));
    println!("save folder set");
    Ok(())
}

fn shell_new(ctl: &mut SessionController, project: &str, note: &str) -> Result<()> {
    let location = ctl.new_location(project, note)?;
    println!(
        "Location: {} ({})",
        location.location_id, location.note
    );
    Ok(())
}

fn shell_snap(
    ctl: &mut SessionController,
    capture: &Rc<RefCell<FileCapture>>,
    rest: &str,
) -> Result<()> {
    if rest.is_empty() {
        return Err(FieldError::Other("usage: snap <image>".to_string()));
    }
    capture.borrow_mut().push(rest);
    let report = ctl.snap()?;
    println!("{} -> {}", report.sample_id, report.filename);
    Ok(())
}

fn shell_gps(ctl: &mut SessionController, rest: &str) -> Result<()> {
    if !rest.is_empty() {
        let parts: Vec<&str> = rest.split_whitespace().collect();
        if parts.len() < 2 {
            return Err(FieldError::Other("usage: gps [lat lon [acc]]".to_string()));
        }
        let lat: f64 = parts[0]
            .parse()
            .map_err(|_| FieldError::Other(format!("bad latitude '{}'", parts[0])))?;
        let lon: f64 = parts[1]
            .parse()
            .map_err(|_| FieldError::Other(format!("bad longitude '{}'", parts[1])))?;
        let acc = match parts.get(2) {
            Some(text) => Some(
                text.parse()
                    .map_err(|_| FieldError::Other(format!("bad accuracy '{text}'")))?,
            ),
            None => None,
        };
        ctl.set_locator(Box::new(StaticLocator::new(GpsFix::new(lat, lon, acc))));
    }
    let fix = ctl.refresh_gps();
    if fix.is_empty() {
        println!("GPS: no fix");
    } else {
        println!(
            "GPS: {} {} (acc {})",
            fix.lat.unwrap_or_default(),
            fix.lon.unwrap_or_default(),
            fix.acc.map_or_else(|| "?".to_string(), |a| a.to_string())
        );
    }
    Ok(())
}

fn shell_status(ctl: &SessionController) {
    let session = ctl.session();
    match session.location() {
        Some(location) => {
            println!("Location: {} ({})", location.location_id, location.note);
        }
        None => println!("Location: none"),
    }
    let summary = session.summary();
    println!("Samples: {} | Photos: {}", summary.samples, summary.photos);
    println!(
        "{}",
        if session.is_dirty() {
            style("unsaved changes").yellow()
        } else {
            style("saved").green()
        }
    );
}

fn shell_log(ctl: &SessionController) {
    let entries = ctl.recent_log();
    if entries.is_empty() {
        println!("log is empty");
        return;
    }
    for entry in entries {
        println!(
            "{:<12} {:<6} {}",
            entry.project, entry.sample_id, entry.filename
        );
    }
}

// === init / config ===

#[derive(Debug, Serialize)]
struct InitReport {
    path: String,
}

fn cmd_init(cli: &Cli, args: &InitArgs) -> Result<()> {
    let path = config::write_starter(args.force)?;
    let report = InitReport {
        path: path.display().to_string(),
    };
    output::emit(cli.mode(), &report, || {
        println!("wrote {}", report.path);
    });
    Ok(())
}

fn cmd_config(cli: &Cli, args: &ConfigArgs) -> Result<()> {
    if args.path {
        let path = config::default_config_path()?;
        println!("{}", path.display());
        return Ok(());
    }

    let config = config::load_or_default(cli.config.as_deref())?;
    output::emit(cli.mode(), &config, || {
        match toml::to_string_pretty(&config) {
            Ok(text) => print!("{text}"),
            Err(e) => eprintln!("config render failed: {e}"),
        }
    });
    Ok(())
}

// === version / completions ===

#[derive(Debug, Serialize)]
struct VersionInfo {
    name: &'static str,
    version: &'static str,
}

fn cmd_version(cli: &Cli) -> Result<()> {
    let info = VersionInfo {
        name: "fnotes",
        version: env!("CARGO_PKG_VERSION"),
    };
    output::emit(cli.mode(), &info, || {
        println!("{} {}", info.name, info.version);
    });
    Ok(())
}

fn cmd_completions(args: &CompletionsArgs) -> Result<()> {
    clap_complete::generate(
        args.shell,
        &mut Cli::command(),
        "fnotes",
        &mut io::stdout(),
    );
    Ok(())
}
