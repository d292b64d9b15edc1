use clap::{Parser, Subcommand, ValueEnum};
use flyover::Pattern;
use std::path::PathBuf;

/// Plan cinematic camera flyovers over a DEM raster.
#[derive(Parser, Debug, Clone)]
pub struct Cli {
    /// ESRI ASCII grid (.asc) holding the elevation raster.
    #[arg(short, long)]
    pub dem: PathBuf,

    /// Flyover pattern.
    #[arg(short, long, value_enum, default_value = "none")]
    pub pattern: PatternArg,

    /// Vertical exaggeration applied to elevations.
    #[arg(short, long, default_value_t = 1.0)]
    pub z_scale: f64,

    /// Fraction the raster was resampled by before import.
    #[arg(short, long, default_value_t = 1.0)]
    pub image_sample: f64,

    /// Output resolution tag, forwarded to the render host.
    #[arg(short, long, value_enum, default_value = "1080p")]
    pub resolution: Resolution,

    #[command(subcommand)]
    pub cmd: Command,
}

/// Command-line spelling of the flight patterns.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternArg {
    /// Static overview, no flight.
    None,
    Linear,
    Circle,
    Diamond,
}

impl From<PatternArg> for Pattern {
    fn from(arg: PatternArg) -> Self {
        match arg {
            PatternArg::None => Pattern::Static,
            PatternArg::Linear => Pattern::Linear,
            PatternArg::Circle => Pattern::Circle,
            PatternArg::Diamond => Pattern::Diamond,
        }
    }
}

/// 16:9 output resolutions understood by the render host.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    #[value(name = "180p")]
    R180,
    #[value(name = "360p")]
    R360,
    #[value(name = "480p")]
    R480,
    #[value(name = "720p")]
    R720,
    #[value(name = "1080p")]
    R1080,
}

impl Resolution {
    /// Frame size in pixels.
    pub fn frame_size(self) -> (u32, u32) {
        match self {
            Self::R180 => (320, 180),
            Self::R360 => (640, 360),
            Self::R480 => (854, 480),
            Self::R720 => (1280, 720),
            Self::R1080 => (1920, 1080),
        }
    }
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Print waypoints to stdout.
    Csv,

    /// Print the full planned path as JSON.
    Json,

    /// Plan against a recording scene host and print what would be
    /// created.
    Summary,
}

#[cfg(test)]
mod tests {
    use super::{PatternArg, Resolution};
    use flyover::Pattern;

    #[test]
    fn test_pattern_mapping() {
        assert_eq!(Pattern::from(PatternArg::None), Pattern::Static);
        assert_eq!(Pattern::from(PatternArg::Diamond), Pattern::Diamond);
    }

    #[test]
    fn test_frame_sizes_are_16_9() {
        for resolution in [
            Resolution::R180,
            Resolution::R360,
            Resolution::R720,
            Resolution::R1080,
        ] {
            let (w, h) = resolution.frame_size();
            assert_eq!(w * 9, h * 16);
        }
        // 480p rounds 853.33 up to an even width.
        assert_eq!(Resolution::R480.frame_size(), (854, 480));
    }
}
