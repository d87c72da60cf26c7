use serde::{Deserialize, Serialize};

pub const DEFAULT_RADIUS: u32 = 3;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InpaintMode {
    /// Telea's fast marching method.
    #[default]
    FastMarching,
}

impl std::fmt::Display for InpaintMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InpaintMode::FastMarching => write!(f, "fast-marching"),
        }
    }
}

impl std::str::FromStr for InpaintMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fast-marching" | "fast_marching" | "telea" => Ok(InpaintMode::FastMarching),
            other => Err(format!("Unsupported inpaint mode: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::InpaintMode;

    #[test]
    fn parses_aliases() {
        assert_eq!("telea".parse::<InpaintMode>(), Ok(InpaintMode::FastMarching));
        assert_eq!("Fast-Marching".parse::<InpaintMode>(), Ok(InpaintMode::FastMarching));
        assert!("navier-stokes".parse::<InpaintMode>().is_err());
        assert_eq!(InpaintMode::default().to_string(), "fast-marching");
    }
}
