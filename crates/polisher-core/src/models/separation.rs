use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// How the upload pipeline treats stem separation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeparationMode {
    /// Run the separator inside the request and fail the request if it fails.
    Sync,
    /// Hand the job to the background separation queue and return immediately.
    Async,
    /// Store the upload only.
    #[default]
    Disabled,
}

impl FromStr for SeparationMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sync" => Ok(SeparationMode::Sync),
            "async" => Ok(SeparationMode::Async),
            "disabled" | "off" | "none" => Ok(SeparationMode::Disabled),
            _ => Err(anyhow::anyhow!(
                "Invalid separation mode: {} (expected sync, async or disabled)",
                s
            )),
        }
    }
}

impl Display for SeparationMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            SeparationMode::Sync => write!(f, "sync"),
            SeparationMode::Async => write!(f, "async"),
            SeparationMode::Disabled => write!(f, "disabled"),
        }
    }
}

/// One isolated component of a mixed track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stem {
    Vocals,
    Drums,
    Bass,
    Piano,
    Other,
    Accompaniment,
}

impl Stem {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stem::Vocals => "vocals",
            Stem::Drums => "drums",
            Stem::Bass => "bass",
            Stem::Piano => "piano",
            Stem::Other => "other",
            Stem::Accompaniment => "accompaniment",
        }
    }
}

impl FromStr for Stem {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "vocals" => Ok(Stem::Vocals),
            "drums" => Ok(Stem::Drums),
            "bass" => Ok(Stem::Bass),
            "piano" => Ok(Stem::Piano),
            "other" => Ok(Stem::Other),
            "accompaniment" => Ok(Stem::Accompaniment),
            _ => Err(anyhow::anyhow!("Unknown stem: {}", s)),
        }
    }
}

impl Display for Stem {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separation_mode_parse() {
        assert_eq!("SYNC".parse::<SeparationMode>().unwrap(), SeparationMode::Sync);
        assert_eq!(" async ".parse::<SeparationMode>().unwrap(), SeparationMode::Async);
        assert_eq!("off".parse::<SeparationMode>().unwrap(), SeparationMode::Disabled);
        assert!("later".parse::<SeparationMode>().is_err());
        assert_eq!(SeparationMode::default(), SeparationMode::Disabled);
    }

    #[test]
    fn test_stem_parse_and_display() {
        for stem in [Stem::Vocals, Stem::Drums, Stem::Bass, Stem::Piano, Stem::Other] {
            assert_eq!(stem.to_string().parse::<Stem>().unwrap(), stem);
        }
        assert!("kazoo".parse::<Stem>().is_err());
    }
}
