use std::fs::{File, OpenOptions};
use std::io::{Read, Write, stdin};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use comfy_table::{Cell, ContentArrangement, Table, presets::NOTHING};
use dmgplay::meta::Gd3;
use dmgplay::player;
use dmgplay::{Capture, Error, Interrupt, LoopConfig, Outcome, Session};

/// dmgplay: play Game Boy DMG captures on real hardware
#[derive(Parser, Debug)]
#[command(
    name = "dmgplay",
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
    long_about = None
)]
struct Cli {
    /// Times to repeat the loop segment; 0 repeats until Ctrl-C
    #[arg(short = 'l', long = "loop", value_name = "COUNT", default_value_t = 1)]
    loop_count: u32,

    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,

    /// Serial port of the Game Boy link (e.g. COM3 or /dev/ttyACM0)
    #[arg(value_name = "DEVICE")]
    device: String,

    /// VGM or VGZ file to play (use '-' for stdin)
    #[arg(value_name = "FILE")]
    file: PathBuf,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_logger(&cli.verbose);

    match play(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logger(verbose: &Verbosity<WarnLevel>) {
    env_logger::Builder::new()
        .filter_level(verbose.log_level_filter())
        .parse_default_env()
        .format(|buf, record| writeln!(buf, "{}: {}", record.level(), record.args()))
        .init();
}

fn play(cli: &Cli) -> Result<()> {
    let raw = read_capture(&cli.file)?;
    let capture = Capture::load(raw)
        .with_context(|| format!("failed to load capture: {}", cli.file.display()))?;

    if let Some(tags) = capture.gd3() {
        print_tags(&tags);
    }
    if capture.offsets().loop_start.is_none() && cli.loop_count != 1 {
        log::info!("capture has no loop segment; --loop ignored");
    }

    let port = open_device(&cli.device)?;

    let interrupt = Interrupt::new();
    let handler = interrupt.clone();
    ctrlc::set_handler(move || handler.request()).context("failed to install Ctrl-C handler")?;

    let mut session = Session::new(port, interrupt);
    log::info!(
        "playing {} on {} (loop {})",
        cli.file.display(),
        cli.device,
        if cli.loop_count == 0 {
            "forever".to_string()
        } else {
            cli.loop_count.to_string()
        }
    );

    let outcome = player::run(&mut session, &capture, LoopConfig::new(cli.loop_count))?;
    if outcome == Outcome::Interrupted {
        log::info!("interrupted after {} samples", session.clock().samples());
    }
    session.shutdown()?;
    Ok(())
}

/// Read capture bytes from a path, or from stdin when the path is `-`.
fn read_capture(path: &Path) -> Result<Vec<u8>, Error> {
    let mut out = Vec::new();
    let read = if path == Path::new("-") {
        stdin().read_to_end(&mut out)
    } else {
        File::open(path).and_then(|mut f| f.read_to_end(&mut out))
    };
    read.map_err(|source| Error::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(out)
}

/// Open the serial device for writing.
///
/// The link is USB CDC, so line settings are irrelevant and the port is
/// opened as a plain file. Bare Windows port names get the `\\.\` device
/// namespace prefix required for COM10 and above.
fn open_device(name: &str) -> Result<File, Error> {
    let path = if cfg!(windows) && !name.starts_with(r"\\.\") {
        format!(r"\\.\{}", name)
    } else {
        name.to_string()
    };
    OpenOptions::new()
        .write(true)
        .open(&path)
        .map_err(|source| Error::DeviceOpen { path, source })
}

/// Print the tag fields the player shows before starting.
fn print_tags(tags: &Gd3<'_>) {
    let game = tags.game_name().map(|g| match tags.release_date() {
        Some(date) => format!("{} [{}]", g, date),
        None => g,
    });
    let rows = [
        ("Game", game),
        ("Track", tags.track_name()),
        ("System", tags.system_name()),
        ("Artist", tags.artist_name()),
        ("Dumper", tags.dumper()),
    ];

    let mut table = Table::new();
    table
        .load_preset(NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic);
    let mut shown = 0;
    for (label, value) in rows {
        if let Some(v) = value {
            table.add_row(vec![Cell::new(format!("{}:", label)), Cell::new(v)]);
            shown += 1;
        }
    }
    if shown > 0 {
        println!("{}", table);
    }
}
