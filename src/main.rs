mod cli;

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};

use braille_render::config::Config;
use braille_render::pipeline::Renderer;
use clap::Parser;
use cli::{Args, Command};

/// Initialize logging to stderr; `RUST_LOG` overrides the default `warn` level.
fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();
}

/// Open the bitmap stream named on the command line, or stdin.
fn open_input(args: &Args) -> Result<Box<dyn Read>, String> {
    match &args.input {
        Some(path) if !args.reads_stdin() => {
            let file = File::open(path)
                .map_err(|e| format!("Failed to open '{}': {}", path.display(), e))?;
            Ok(Box::new(BufReader::new(file)))
        }
        _ => Ok(Box::new(io::stdin().lock())),
    }
}

/// Render every frame of the input to stdout, separated by blank lines.
fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load(args.config.as_deref())?;
    let options = args.render_options(&config);
    let policy = args.frame_policy(&config);

    // Bad options are rejected here, before any input is read
    let mut renderer = Renderer::new(options)?;
    let input = open_input(args)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut first = true;

    let stats = renderer.render_stream_with(input, policy, |frame| {
        if !first {
            writeln!(out)?;
        }
        first = false;
        writeln!(out, "{}", frame)?;
        out.flush()?;
        Ok(())
    })?;

    if stats.rendered == 0 && stats.skipped == 0 {
        log::warn!("Input contained no bitmap frames");
    } else if stats.skipped > 0 {
        eprintln!(
            "Rendered {} frame(s), skipped {} corrupt frame(s)",
            stats.rendered, stats.skipped
        );
    }
    Ok(())
}

fn main() {
    init_logging();

    let args = Args::parse();

    match &args.command {
        Some(Command::Config { action }) => {
            cli::handle_config_action(action.clone(), args.config.as_deref());
        }
        None => {
            if let Err(e) = run(&args) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
