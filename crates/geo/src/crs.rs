//! Coordinate reference system identification and comparison.

use crate::{Error, Result};

/// An EPSG code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Epsg(u16);

impl Epsg {
    pub const fn new(code: u16) -> Self {
        Epsg(code)
    }

    pub const fn code(&self) -> u16 {
        self.0
    }
}

impl From<u16> for Epsg {
    fn from(code: u16) -> Self {
        Epsg(code)
    }
}

impl From<Epsg> for u16 {
    fn from(epsg: Epsg) -> Self {
        epsg.0
    }
}

impl std::fmt::Display for Epsg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EPSG:{}", self.0)
    }
}

pub mod epsg {
    use super::Epsg;

    pub const WGS84_WEB_MERCATOR: Epsg = Epsg::new(3857);
    pub const WGS84: Epsg = Epsg::new(4326);
    pub const BELGIAN_LAMBERT72: Epsg = Epsg::new(31370);
    pub const BELGE72_GEO: Epsg = Epsg::new(4313);
    pub const ETRS89: Epsg = Epsg::new(4258);
    pub const ETRS89_LAEA: Epsg = Epsg::new(3035);
    pub const WGS84_UTM31N: Epsg = Epsg::new(32631);
}

/// The definition part of a coordinate reference system, this is what determines its identity.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CrsDefinition {
    Epsg(Epsg),
    Proj(String),
}

/// A coordinate reference system with optional descriptive metadata.
///
/// `PartialEq` compares everything, including the metadata.
/// Use [`Crs::equals_ignore_metadata`] to check if two instances denote the same coordinate system.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Crs {
    name: Option<String>,
    definition: CrsDefinition,
}

/// Proj parameters that carry no information about the coordinate system itself.
const PROJ_NOISE_PARAMS: [&str; 3] = ["+no_defs", "+type=crs", "+wktext"];

impl Crs {
    pub fn from_epsg(epsg: Epsg) -> Self {
        Crs {
            name: None,
            definition: CrsDefinition::Epsg(epsg),
        }
    }

    pub fn from_proj(projection: &str) -> Result<Self> {
        let projection = projection.trim();
        if projection.is_empty() {
            return Err(Error::InvalidArgument("Empty projection string".into()));
        }

        Ok(Crs {
            name: None,
            definition: CrsDefinition::Proj(projection.to_string()),
        })
    }

    /// Accepts `EPSG:<code>` or a proj string
    pub fn from_definition(def: &str) -> Result<Self> {
        match def.trim().strip_prefix("EPSG:") {
            Some(code) => code
                .parse::<u16>()
                .map(|code| Crs::from_epsg(code.into()))
                .map_err(|e| Error::InvalidArgument(format!("Invalid EPSG code '{def}' ({e})"))),
            None => Crs::from_proj(def),
        }
    }

    /// Attach a descriptive name, this is metadata and does not influence [`Crs::equals_ignore_metadata`]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn definition(&self) -> &CrsDefinition {
        &self.definition
    }

    pub fn epsg(&self) -> Option<Epsg> {
        match &self.definition {
            CrsDefinition::Epsg(epsg) => Some(*epsg),
            CrsDefinition::Proj(_) => None,
        }
    }

    /// The proj string describing this coordinate system.
    /// Only available for EPSG based definitions when the built-in EPSG database is enabled.
    pub fn proj_definition(&self) -> Option<String> {
        match &self.definition {
            CrsDefinition::Proj(proj) => Some(proj.clone()),
            CrsDefinition::Epsg(epsg) => epsg_proj_definition(*epsg),
        }
    }

    /// True when both definitions denote the same coordinate system, descriptive metadata is ignored.
    pub fn equals_ignore_metadata(&self, other: &Crs) -> bool {
        match (&self.definition, &other.definition) {
            (CrsDefinition::Epsg(lhs), CrsDefinition::Epsg(rhs)) => lhs == rhs,
            (CrsDefinition::Proj(lhs), CrsDefinition::Proj(rhs)) => normalized_proj_params(lhs) == normalized_proj_params(rhs),
            _ => match (self.proj_definition(), other.proj_definition()) {
                (Some(lhs), Some(rhs)) => normalized_proj_params(&lhs) == normalized_proj_params(&rhs),
                _ => false,
            },
        }
    }
}

impl From<Epsg> for Crs {
    fn from(epsg: Epsg) -> Self {
        Crs::from_epsg(epsg)
    }
}

impl std::fmt::Display for Crs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.name, &self.definition) {
            (Some(name), _) => write!(f, "{name}"),
            (None, CrsDefinition::Epsg(epsg)) => write!(f, "{epsg}"),
            (None, CrsDefinition::Proj(proj)) => write!(f, "{proj}"),
        }
    }
}

fn normalized_proj_params(proj: &str) -> Vec<&str> {
    let mut params: Vec<&str> = proj
        .split_whitespace()
        .filter(|param| !PROJ_NOISE_PARAMS.contains(param))
        .collect();
    params.sort_unstable();
    params
}

#[cfg(feature = "proj4rs")]
fn epsg_proj_definition(epsg: Epsg) -> Option<String> {
    crs_definitions::from_code(epsg.code()).map(|def| def.proj4.to_string())
}

#[cfg(not(feature = "proj4rs"))]
fn epsg_proj_definition(_epsg: Epsg) -> Option<String> {
    None
}
