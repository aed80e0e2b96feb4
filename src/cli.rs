use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "polarscope")]
#[command(author, version, about = "Polar blip display with range rings and a pointer crosshair")]
pub struct Args {
    /// Config file path (defaults to ~/.config/polarscope/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write a commented default config to the XDG path and exit
    #[arg(long)]
    pub init_config: bool,

    /// Color scheme: phosphor, amber, spectrum, ocean, monochrome
    #[arg(long)]
    pub colors: Option<String>,

    /// Range shown at the plot edge
    #[arg(long)]
    pub max_range: Option<f64>,

    /// Domain units per full rotation (360 = degrees)
    #[arg(long)]
    pub turn: Option<f64>,

    /// Rotation offset in radians
    #[arg(long, allow_hyphen_values = true)]
    pub rotation: Option<f64>,

    /// Number of range rings
    #[arg(long)]
    pub range_ticks: Option<usize>,

    /// Number of angle spokes
    #[arg(long)]
    pub angle_ticks: Option<usize>,

    /// Hide range rings and angle spokes
    #[arg(long)]
    pub no_grid: bool,

    /// Frames per second
    #[arg(long)]
    pub fps: Option<u32>,

    /// Opacity (0.0-1.0)
    #[arg(long)]
    pub opacity: Option<f32>,

    /// Print shell completions and exit
    #[arg(long, value_name = "SHELL")]
    pub completions: Option<clap_complete::Shell>,
}
