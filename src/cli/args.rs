//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use braille_render::config::Config;
use braille_render::pipeline::{FramePolicy, RenderOptions, Threshold};

/// Parse and validate the downsample factor (1-64)
fn parse_factor(s: &str) -> Result<usize, String> {
    let factor: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid factor", s))?;
    if !(1..=64).contains(&factor) {
        return Err(format!("Factor must be between 1 and 64, got {}", factor));
    }
    Ok(factor)
}

/// Parse and validate a brightness threshold (0-255)
fn parse_threshold(s: &str) -> Result<f32, String> {
    let threshold: f32 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if !(0.0..=255.0).contains(&threshold) {
        return Err(format!(
            "Threshold must be between 0 and 255, got {}",
            threshold
        ));
    }
    Ok(threshold)
}

/// Render uncompressed bitmaps as Unicode braille art
#[derive(Parser, Debug)]
#[command(name = "braille-render")]
#[command(version, about = "Render uncompressed bitmaps as Unicode braille art", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
#[command(after_help = "EXAMPLES:
    # Render a single bitmap at full resolution
    braille-render photo.bmp -f 1

    # Render a stream of bitmap frames piped from another program
    ffmpeg -i clip.mp4 -f image2pipe -vcodec bmp - | braille-render --skip-corrupt")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Bitmap stream to read ("-" or omitted: stdin)
    pub input: Option<PathBuf>,

    /// Average N x N pixel blocks before tiling [default: 2]
    #[arg(short, long, value_parser = parse_factor)]
    pub factor: Option<usize>,

    /// Fixed brightness threshold (default: mean luminance of each frame)
    #[arg(short, long, value_parser = parse_threshold)]
    pub threshold: Option<f32>,

    /// Light dots for dark pixels (for light terminals)
    #[arg(long)]
    pub invert: bool,

    /// Skip frames that fail to decode instead of stopping
    #[arg(long)]
    pub skip_corrupt: bool,

    /// Print bottom-up bitmaps in stored row order
    #[arg(long)]
    pub keep_orientation: bool,

    /// Config file path
    #[arg(long, short)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
    /// Print the config file path
    Path,
}

impl Args {
    /// Whether the input should be read from stdin.
    pub fn reads_stdin(&self) -> bool {
        match &self.input {
            None => true,
            Some(path) => path.as_os_str() == "-",
        }
    }

    /// Merge command-line flags over the config file settings.
    pub fn render_options(&self, config: &Config) -> RenderOptions {
        let mut options = config.render_options();
        if let Some(factor) = self.factor {
            options.factor = factor;
        }
        if let Some(threshold) = self.threshold {
            options.threshold = Threshold::Fixed(threshold);
        }
        if self.invert {
            options.invert = true;
        }
        if self.keep_orientation {
            options.top_down = false;
        }
        options
    }

    pub fn frame_policy(&self, config: &Config) -> FramePolicy {
        if self.skip_corrupt {
            FramePolicy::Skip
        } else {
            config.frame_policy()
        }
    }
}
