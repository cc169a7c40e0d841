use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::LazyLock;

static REGION_NAME: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^[a-z]{2,}(-[a-z0-9]+)*$"));

// Region used in the credential scope.
// R2 signs everything with "auto", other S3 compatible stores expect a real
// region name such as "us-east-1".
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Region {
    // Cloudflare R2
    #[default]
    Auto,

    // US East (N. Virginia), the default for most S3 compatible servers
    UsEast1,

    // any other well formed region name
    Named(String),
}

impl Region {
    #[must_use]
    pub fn name(&self) -> &str {
        match *self {
            Self::Auto => "auto",
            Self::UsEast1 => "us-east-1",
            Self::Named(ref name) => name,
        }
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut Formatter) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Region {
    type Err = ParseRegionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let v: &str = &s.trim().to_lowercase();
        match v {
            "auto" => Ok(Self::Auto),
            "us-east-1" => Ok(Self::UsEast1),
            _ => match REGION_NAME.as_ref() {
                Ok(re) if re.is_match(v) => Ok(Self::Named(v.to_string())),
                _ => Err(ParseRegionError::new(s)),
            },
        }
    }
}

/// An error produced when attempting to convert a `str` into a `Region` fails.
#[derive(Debug, PartialEq, Eq)]
pub struct ParseRegionError {
    message: String,
}

impl ParseRegionError {
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self {
            message: format!("Not a valid region: {input}"),
        }
    }
}

impl Error for ParseRegionError {}

impl Display for ParseRegionError {
    fn fmt(&self, f: &mut Formatter) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.message)
    }
}
