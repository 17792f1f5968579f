//! YAML job files describing one merge join.
//!
//! Example:
//! ```yaml
//! mode: sparse
//! left:
//!   source: "data/orders.csv"
//!   schema:
//!     - {name: "customer", type: "Int64", nullable: false}
//!     - {name: "amount",   type: "Float64", nullable: true}
//!   key: ["customer"]
//! right:
//!   source: "data/customers.csv"
//!   index: "data/customers.idx.json"
//!   schema:
//!     - {name: "id",   type: "Int64", nullable: false}
//!     - {name: "name", type: "Utf8",  nullable: true}
//!     - {name: "tier", type: "Int32", nullable: true}
//!   filter: "tier >= 2"
//!   project: ["id", "name"]
//!   key: ["id"]
//! output: { destination: "out/joined.csv", format: "csv" }
//! ```
//!
//! Right key names resolve against the right schema after `project`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use sortmerge_core::config::{JoinConfig, JoinMode, SourceLocator};
use sortmerge_core::key::KeySpec;
use sortmerge_core::manifest::JoinManifest;
use sortmerge_core::schema::{DataType, Field, Schema};
use sortmerge_io::sorted::DEFAULT_INDEX_INTERVAL;
use sortmerge_io::writers::csv::CsvRowWriter;
use sortmerge_io::writers::jsonl::JsonlWriter;
use sortmerge_io::CsvSortedSource;
use sortmerge_operators::{Filter, MergeJoin, Operator, Project, RowTransform, TransformPipeline};

use crate::input::CsvLeftInput;
use crate::runtime::{run_join, ExecError};
use crate::sink::RowSink;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSpec {
    #[serde(default)]
    pub mode: JoinMode,
    #[serde(default)]
    pub buffer_capacity: Option<usize>,
    #[serde(default)]
    pub signature: Option<String>,
    pub left: LeftDef,
    pub right: RightDef,
    pub output: OutputDef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeftDef {
    pub source: String,
    pub schema: Vec<FieldDef>,
    pub key: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RightDef {
    pub source: String,
    pub schema: Vec<FieldDef>,
    pub key: Vec<String>,
    #[serde(default)]
    pub index: Option<String>,
    #[serde(default)]
    pub index_interval: Option<usize>,
    #[serde(default)]
    pub filter: Option<String>,
    #[serde(default)]
    pub project: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputDef {
    pub destination: String,
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "csv".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
    #[serde(default)]
    pub nullable: bool,
}

fn to_schema(fields: &[FieldDef]) -> Schema {
    Schema::new(
        fields
            .iter()
            .map(|f| Field::new(f.name.clone(), DataType::parse(&f.data_type), f.nullable))
            .collect(),
    )
}

impl JobSpec {
    pub fn from_yaml(src: &str) -> Result<Self, ExecError> {
        Ok(serde_yaml::from_str(src)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ExecError> {
        let src = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ExecError::Io(sortmerge_io::Error::Io(e)))?;
        Self::from_yaml(&src)
    }

    pub fn left_schema(&self) -> Schema {
        to_schema(&self.left.schema)
    }

    /// Right schema as stored, before any filter/project.
    pub fn right_source_schema(&self) -> Schema {
        to_schema(&self.right.schema)
    }

    /// Filter then project, as configured. `None` when neither is set.
    pub fn right_pipeline(&self) -> Result<Option<TransformPipeline>, ExecError> {
        let schema = self.right_source_schema();
        let mut stages: Vec<Box<dyn RowTransform>> = Vec::new();
        if let Some(expr) = &self.right.filter {
            stages.push(Box::new(Filter::parse(expr, &schema)?));
        }
        if let Some(cols) = &self.right.project {
            stages.push(Box::new(Project::new(cols, &schema)?));
        }
        if stages.is_empty() {
            return Ok(None);
        }
        Ok(Some(TransformPipeline::new(stages)?))
    }

    /// Right schema as the join sees it.
    pub fn right_schema(&self) -> Result<Schema, ExecError> {
        let raw = self.right_source_schema();
        match self.right_pipeline()? {
            Some(p) => Ok(p.output_schema(&raw)?),
            None => Ok(raw),
        }
    }

    pub fn output_schema(&self) -> Result<Schema, ExecError> {
        Ok(Schema::join(&self.left_schema(), &self.right_schema()?))
    }

    /// Right key resolved against the stored schema, for building indexes.
    pub fn right_source_key(&self) -> Result<KeySpec, ExecError> {
        KeySpec::from_names(&self.right_source_schema(), &self.right.key)
            .map_err(|e| ExecError::Invalid(format!("right key: {e}")))
    }

    pub fn index_interval(&self) -> usize {
        self.right.index_interval.unwrap_or(DEFAULT_INDEX_INTERVAL)
    }

    pub fn join_config(&self) -> Result<JoinConfig, ExecError> {
        let left_key = KeySpec::from_names(&self.left_schema(), &self.left.key)
            .map_err(|e| ExecError::Invalid(format!("left key: {e}")))?;
        let right_key = KeySpec::from_names(&self.right_schema()?, &self.right.key)
            .map_err(|e| ExecError::Invalid(format!("right key: {e}")))?;
        let mut locator = SourceLocator::new(self.right.source.clone());
        locator.index_file = self.right.index.clone();

        let mut config = JoinConfig::new(left_key, right_key, locator).with_mode(self.mode);
        if let Some(cap) = self.buffer_capacity {
            config.buffer_capacity = cap;
        }
        config.signature = self.signature.clone();
        config
            .validate()
            .map_err(|e| ExecError::Invalid(e.to_string()))?;
        Ok(config)
    }

    /// Build the engine for `config`, which normally comes from
    /// [`JobSpec::join_config`] plus environment overrides.
    pub fn build_engine(&self, config: &JoinConfig) -> Result<MergeJoin<CsvSortedSource>, ExecError> {
        let source = CsvSortedSource::new(self.right_source_schema(), self.right_source_key()?)
            .with_index_interval(self.index_interval());
        let mut engine =
            MergeJoin::new(config, source)?.with_output_schema(&self.output_schema()?);
        if let Some(pipeline) = self.right_pipeline()? {
            engine = engine.with_transform(pipeline);
        }
        engine.plan(&[self.left_schema(), self.right_schema()?])?;
        Ok(engine)
    }

    fn open_sink(&self) -> Result<Box<dyn RowSink>, ExecError> {
        let out = self.output_schema()?;
        let dest = &self.output.destination;
        if let Some(parent) = Path::new(dest).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| ExecError::Io(sortmerge_io::Error::Io(e)))?;
            }
        }
        match self.output.format.as_str() {
            "csv" => Ok(Box::new(CsvRowWriter::to_path(dest, Some(&out))?)),
            "jsonl" | "ndjson" => {
                let names = out.fields.iter().map(|f| f.name.clone()).collect();
                Ok(Box::new(JsonlWriter::to_path(dest, names)?))
            }
            other => Err(ExecError::Invalid(format!("unknown output format '{other}'"))),
        }
    }

    /// Run the whole job: read the left CSV, join, write the output.
    pub fn run(&self, config: &JoinConfig) -> Result<JoinManifest, ExecError> {
        let mut engine = self.build_engine(config)?;
        let mut left = CsvLeftInput::from_path(&self.left.source, self.left_schema())?;
        let mut sink = self.open_sink()?;
        info!(
            left = %self.left.source,
            right = %self.right.source,
            output = %self.output.destination,
            mode = ?config.mode,
            "running merge join job"
        );
        run_join(config, &mut engine, &mut left, &mut sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JOB: &str = r#"
mode: sparse
left:
  source: "left.csv"
  schema:
    - {name: "k", type: "i64"}
    - {name: "v", type: "Utf8", nullable: true}
  key: ["k"]
right:
  source: "right.csv"
  schema:
    - {name: "tag", type: "Utf8", nullable: true}
    - {name: "id", type: "Int64"}
    - {name: "w", type: "i32", nullable: true}
  filter: "w > 0"
  project: ["id", "tag"]
  key: ["id"]
output: { destination: "out.jsonl", format: "jsonl" }
"#;

    #[test]
    fn right_key_resolves_after_projection() {
        let job = JobSpec::from_yaml(JOB).unwrap();
        let cfg = job.join_config().unwrap();
        assert_eq!(cfg.mode, JoinMode::Sparse);
        assert_eq!(cfg.right_key, KeySpec::column(0, DataType::Int64));
        assert_eq!(job.right_source_key().unwrap(), KeySpec::column(1, DataType::Int64));
        let out = job.output_schema().unwrap();
        let names: Vec<_> = out.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["k", "v", "id", "tag"]);
    }

    #[test]
    fn unknown_key_column_is_invalid() {
        let job = JobSpec::from_yaml(&JOB.replace(r#"key: ["id"]"#, r#"key: ["w"]"#)).unwrap();
        assert!(matches!(job.join_config(), Err(ExecError::Invalid(_))));
    }

    #[test]
    fn missing_sections_fail_to_parse() {
        assert!(matches!(JobSpec::from_yaml("mode: dense\n"), Err(ExecError::Yaml(_))));
    }
}
