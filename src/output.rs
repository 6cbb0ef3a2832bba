//! Rendering of pattern reports as text, JSON or CSV

use crate::analysis::PatternReport;
use crate::cli::OutputFormat;
use crate::dataset::DatasetShape;
use crate::significance::neg_log;
use crate::westfall_young::WestfallYoungResult;
use serde::Serialize;

/// One value printed per pattern in text mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Support,
    ExpectedValue,
    StandardDeviation,
    NonZeroSequences,
    PNormal,
    NegLogPNormal,
    PExact,
    NegLogPExact,
    PPoisson,
    NegLogPPoisson,
    PSpan,
    NegLogPSpan,
}

impl Column {
    fn render(&self, report: &PatternReport) -> String {
        match self {
            Column::Support => report.support.to_string(),
            Column::ExpectedValue => report.expected_value.to_string(),
            Column::StandardDeviation => report.standard_deviation.to_string(),
            Column::NonZeroSequences => report.non_zero_sequences.to_string(),
            Column::PNormal => report.p_normal.to_string(),
            Column::NegLogPNormal => neg_log(report.p_normal).to_string(),
            Column::PExact => optional(report.p_exact),
            Column::NegLogPExact => optional(report.p_exact.map(neg_log)),
            Column::PPoisson => optional(report.p_poisson),
            Column::NegLogPPoisson => optional(report.p_poisson.map(neg_log)),
            Column::PSpan => optional(report.p_span),
            Column::NegLogPSpan => optional(report.p_span.map(neg_log)),
        }
    }

    fn header(&self) -> &'static str {
        match self {
            Column::Support => "support",
            Column::ExpectedValue => "expected_value",
            Column::StandardDeviation => "standard_deviation",
            Column::NonZeroSequences => "non_zero_sequences",
            Column::PNormal => "p_normal",
            Column::NegLogPNormal => "neg_log_p_normal",
            Column::PExact => "p_exact",
            Column::NegLogPExact => "neg_log_p_exact",
            Column::PPoisson => "p_poisson",
            Column::NegLogPPoisson => "neg_log_p_poisson",
            Column::PSpan => "p_span",
            Column::NegLogPSpan => "neg_log_p_span",
        }
    }
}

fn optional(value: Option<f64>) -> String {
    value.map_or_else(|| "nan".to_string(), |v| v.to_string())
}

/// Everything a run produces
#[derive(Debug, Clone, Serialize)]
pub struct RunOutput {
    pub version: String,
    pub format: String,
    pub sequences: u64,
    pub shape: DatasetShape,
    pub patterns: Vec<PatternReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub westfall_young: Option<WestfallYoungResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bonferroni: Option<f64>,
}

impl RunOutput {
    pub fn new(shape: DatasetShape, patterns: Vec<PatternReport>) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: "seqsig-json-v1".to_string(),
            sequences: shape.sequences(),
            shape,
            patterns,
            westfall_young: None,
            bonferroni: None,
        }
    }

    pub fn render(&self, format: OutputFormat, columns: &[Column]) -> anyhow::Result<String> {
        match format {
            OutputFormat::Text => Ok(self.to_text(columns)),
            OutputFormat::Json => self.to_json(),
            OutputFormat::Csv => Ok(self.to_csv(columns)),
        }
    }

    /// Selected columns followed by the pattern, one line per pattern
    pub fn to_text(&self, columns: &[Column]) -> String {
        let mut out = String::new();
        for report in &self.patterns {
            for column in columns {
                out.push_str(&column.render(report));
                out.push(' ');
            }
            out.push_str(&report.pattern);
            out.push('\n');
        }

        if let Some(wy) = &self.westfall_young {
            out.push_str(&format!(
                "# westfall-young alpha={} trials={} rank={} threshold={} neg_log={}\n",
                wy.alpha, wy.trials, wy.rank, wy.threshold, wy.neg_log_threshold
            ));
        }
        if let Some(threshold) = self.bonferroni {
            out.push_str(&format!(
                "# bonferroni threshold={} neg_log={}\n",
                threshold,
                neg_log(threshold)
            ));
        }
        out
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Pattern column first; every selected column, or all when none selected
    pub fn to_csv(&self, columns: &[Column]) -> String {
        let columns = if columns.is_empty() {
            ALL_COLUMNS
        } else {
            columns
        };

        let mut out = String::from("pattern");
        for column in columns {
            out.push(',');
            out.push_str(column.header());
        }
        out.push('\n');

        for report in &self.patterns {
            out.push_str(&escape_field(&report.pattern));
            for column in columns {
                out.push(',');
                out.push_str(&column.render(report));
            }
            out.push('\n');
        }
        out
    }
}

const ALL_COLUMNS: &[Column] = &[
    Column::Support,
    Column::ExpectedValue,
    Column::StandardDeviation,
    Column::NonZeroSequences,
    Column::PNormal,
    Column::PExact,
    Column::PPoisson,
    Column::PSpan,
];

/// Quote fields containing commas, quotes or newlines
fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
