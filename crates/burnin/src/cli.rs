use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "burnin", about = "Frame metadata burn-in tool")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the dimensions of an image (DPX header or regular image file).
    Probe {
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Print a zero-padded frame number.
    Frame {
        /// Frame number.
        #[arg(short, long, required_unless_present = "json", conflicts_with = "json")]
        number: Option<i64>,

        /// Display offset added to the frame number.
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        offset: i64,

        /// Minimum number of digits.
        #[arg(long, default_value_t = 4)]
        padding: usize,

        /// Frame as a JSON object: {"number": N, "offset": O, "padding": P}.
        #[arg(long)]
        json: Option<String>,
    },

    /// Print a validated HH:MM:SS:FF timecode.
    Timecode {
        #[arg(long, default_value_t = 0)]
        hour: i64,
        #[arg(long, default_value_t = 0)]
        minute: i64,
        #[arg(long, default_value_t = 0)]
        second: i64,
        #[arg(long, default_value_t = 0)]
        frame: i64,
        /// One of 24, 25, 30, 48, 60.
        #[arg(long, default_value_t = 24)]
        fps: i64,
    },

    /// Render a transparent overlay the size of the input image.
    Burn {
        /// Source image; only its dimensions are used.
        #[arg(short, long)]
        input: PathBuf,

        /// Path to write the overlay PNG.
        #[arg(short, long)]
        output: PathBuf,

        /// Free text line.
        #[arg(short, long)]
        text: Option<String>,

        /// Frame number line.
        #[arg(long)]
        frame: Option<i64>,

        /// Offset for the frame number line.
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        frame_offset: i64,

        /// Timecode line as HH:MM:SS:FF.
        #[arg(long)]
        timecode: Option<String>,

        /// Frame rate for --timecode.
        #[arg(long, default_value_t = 24)]
        fps: i64,

        /// Add the current date, formatted with this strftime pattern.
        #[arg(long, num_args = 0..=1, default_missing_value = "%Y-%m-%d")]
        date: Option<String>,

        /// Logo image pasted in the top-right corner.
        #[arg(long)]
        logo: Option<PathBuf>,

        /// TrueType font for text.
        #[arg(long)]
        font: Option<PathBuf>,

        /// Left edge of the text block (default: padding margin).
        #[arg(short)]
        x: Option<u32>,

        /// Top edge of the text block (default: padding margin).
        #[arg(short)]
        y: Option<u32>,
    },
}
