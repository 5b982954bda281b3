//! CLI enum types for the process command.

use clap::ValueEnum;

/// Processing functions selectable with `--function`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Function {
    /// Convert luminance to transparency (alpha)
    #[value(name = "luma2alpha")]
    Luma2Alpha,
    /// Luminance to transparency with configurable weights and threshold
    #[value(name = "luma2alpha-custom")]
    Luma2AlphaCustom,
    /// Convert to PNG format
    #[value(name = "png")]
    Png,
}

impl std::fmt::Display for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Function::Luma2Alpha => write!(f, "luma2alpha"),
            Function::Luma2AlphaCustom => write!(f, "luma2alpha-custom"),
            Function::Png => write!(f, "png"),
        }
    }
}

/// Parse a channel weight, accepting only values in `[0.0, 1.0]`.
pub fn parse_coefficient(s: &str) -> Result<f32, String> {
    let value: f32 = s
        .parse()
        .map_err(|_| format!("`{s}` is not a number"))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("`{s}` must be between 0.0 and 1.0"))
    }
}
