use indexmap::IndexMap;
use chrono::{DateTime, NaiveDateTime, TimeDelta};
use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Root of the profiling artifact produced by the EDA pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfilingReport {
    #[serde(default)]
    pub analysis: Analysis,
    pub table: Table,
    /// Variables in column order.
    #[serde(default)]
    pub variables: IndexMap<String, Variable>,
    /// Source variable -> target variable -> pre-rendered SVG.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scatter: Option<IndexMap<String, IndexMap<String, String>>>,
    /// Method name ("auto", "pearson", ...) -> matrix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlations: Option<IndexMap<String, CorrelationMatrix>>,
    /// Named missing-data visuals ("bar", "matrix", "heatmap").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing: Option<IndexMap<String, MissingDataArtifact>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alerts: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicates: Option<Vec<Value>>,
}

impl ProfilingReport {
    /// Parse a report from its JSON text.
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_end: Option<String>,
}

impl Analysis {
    pub fn started_at(&self) -> Option<NaiveDateTime> {
        self.date_start.as_deref().and_then(parse_timestamp)
    }

    pub fn finished_at(&self) -> Option<NaiveDateTime> {
        self.date_end.as_deref().and_then(parse_timestamp)
    }

    /// Time the profiling run took, when both timestamps parse and are ordered.
    pub fn duration(&self) -> Option<TimeDelta> {
        let elapsed = self.finished_at()? - self.started_at()?;
        (elapsed >= TimeDelta::zero()).then_some(elapsed)
    }
}

/// The pipeline writes either RFC 3339 or Python's `str(datetime)` form.
fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Dataset-level summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    #[serde(default)]
    pub n: u64,
    #[serde(default)]
    pub n_var: u64,
    /// Memory size in bytes.
    #[serde(default)]
    pub memory_size: f64,
    /// Bytes per row. Derived from `memory_size / n` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_size: Option<f64>,
    #[serde(default)]
    pub n_cells_missing: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p_cells_missing: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_vars_with_missing: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_vars_all_missing: Option<u64>,
    /// Type name -> number of variables of that type.
    #[serde(default)]
    pub types: IndexMap<String, u64>,
    #[serde(default)]
    pub n_duplicates: u64,
    #[serde(default)]
    pub p_duplicates: f64,
}

impl Table {
    /// Total number of cells, `n * n_var`.
    pub fn n_cells(&self) -> u64 {
        self.n.saturating_mul(self.n_var)
    }
}

/// Fields shared by every variable type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommonStats {
    #[serde(default)]
    pub n_distinct: u64,
    #[serde(default)]
    pub p_distinct: f64,
    #[serde(default)]
    pub n_missing: u64,
    #[serde(default)]
    pub p_missing: f64,
    #[serde(default)]
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NumericStats {
    #[serde(default)]
    pub mean: Option<f64>,
    #[serde(default)]
    pub std: Option<f64>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(rename = "5%", default)]
    pub p5: Option<f64>,
    #[serde(rename = "25%", default)]
    pub p25: Option<f64>,
    #[serde(rename = "50%", default)]
    pub p50: Option<f64>,
    #[serde(rename = "75%", default)]
    pub p75: Option<f64>,
    #[serde(rename = "95%", default)]
    pub p95: Option<f64>,
    #[serde(default)]
    pub iqr: Option<f64>,
    /// Coefficient of variation.
    #[serde(default)]
    pub cv: Option<f64>,
    #[serde(default)]
    pub skewness: Option<f64>,
    #[serde(default)]
    pub kurtosis: Option<f64>,
    #[serde(default)]
    pub n_zeros: Option<u64>,
    #[serde(default)]
    pub p_zeros: Option<f64>,
}

impl NumericStats {
    /// Interquartile range, reported or derived from the quartiles.
    pub fn iqr_or_derived(&self) -> Option<f64> {
        self.iqr.or_else(|| Some(self.p75? - self.p25?))
    }

    /// Whether the present values of `min <= p25 <= p50 <= p75 <= max` hold.
    ///
    /// Missing entries are skipped; an artifact with no quantiles is ordered.
    pub fn quantiles_ordered(&self) -> bool {
        let present: Vec<f64> = [self.min, self.p25, self.p50, self.p75, self.max]
            .into_iter()
            .flatten()
            .collect();
        present.windows(2).all(|pair| pair[0] <= pair[1])
    }
}

/// Histogram as emitted by the profiler: `bin_edges.len() == counts.len() + 1`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    #[serde(default)]
    pub counts: Vec<u64>,
    #[serde(default)]
    pub bin_edges: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NumericVariable {
    #[serde(flatten)]
    pub common: CommonStats,
    #[serde(flatten)]
    pub stats: NumericStats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub histogram: Option<Histogram>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoricalVariable {
    #[serde(flatten)]
    pub common: CommonStats,
    /// Category label -> count. Order carries no meaning.
    #[serde(default)]
    pub value_counts_without_nan: IndexMap<String, u64>,
}

/// Any variable type this crate does not render specially (Boolean, DateTime, Text...).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnknownVariable {
    pub type_name: String,
    pub common: CommonStats,
}

/// A profiled column, discriminated by its `type` field.
#[derive(Debug, Clone, PartialEq)]
pub enum Variable {
    Numeric(NumericVariable),
    Categorical(CategoricalVariable),
    Unknown(UnknownVariable),
}

impl Variable {
    pub const NUMERIC: &'static str = "Numeric";
    pub const CATEGORICAL: &'static str = "Categorical";

    pub fn type_name(&self) -> &str {
        match self {
            Self::Numeric(_) => Self::NUMERIC,
            Self::Categorical(_) => Self::CATEGORICAL,
            Self::Unknown(v) => &v.type_name,
        }
    }

    pub fn common(&self) -> &CommonStats {
        match self {
            Self::Numeric(v) => &v.common,
            Self::Categorical(v) => &v.common,
            Self::Unknown(v) => &v.common,
        }
    }

    pub fn as_numeric(&self) -> Option<&NumericVariable> {
        match self {
            Self::Numeric(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_categorical(&self) -> Option<&CategoricalVariable> {
        match self {
            Self::Categorical(v) => Some(v),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct RawVariable {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(flatten)]
    rest: serde_json::Map<String, Value>,
}

impl<'de> Deserialize<'de> for Variable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawVariable::deserialize(deserializer)?;
        let body = Value::Object(raw.rest);
        let variable = match raw.kind.as_deref() {
            Some(Self::NUMERIC) => {
                Self::Numeric(serde_json::from_value(body).map_err(D::Error::custom)?)
            }
            Some(Self::CATEGORICAL) => {
                Self::Categorical(serde_json::from_value(body).map_err(D::Error::custom)?)
            }
            other => Self::Unknown(UnknownVariable {
                type_name: other.unwrap_or("Unsupported").to_string(),
                common: serde_json::from_value(body).map_err(D::Error::custom)?,
            }),
        };
        Ok(variable)
    }
}

impl Serialize for Variable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let body = match self {
            Self::Numeric(v) => serde_json::to_value(v),
            Self::Categorical(v) => serde_json::to_value(v),
            Self::Unknown(v) => serde_json::to_value(&v.common),
        };
        let mut body = body.map_err(S::Error::custom)?;
        if let Value::Object(map) = &mut body {
            map.insert("type".to_string(), Value::from(self.type_name()));
        }
        body.serialize(serializer)
    }
}

/// Raw correlation encoding: one object per row, row identity is its position.
///
/// `null` cells (pandas NaN) deserialize as `None`. Use
/// [`crate::derive::normalize_correlation_matrix`] before reading it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationMatrix(pub Vec<IndexMap<String, Option<f64>>>);

/// A pre-rendered missing-data visual. The SVG payload is opaque.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MissingDataArtifact {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub matrix: String,
}
