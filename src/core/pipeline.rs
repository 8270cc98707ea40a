//! The fitted preprocessing + regression pipeline stored in the artifact bundle.
//!
//! Layout mirrors the training pipeline: a `prep` column transformer with a
//! numeric branch (`num`, optional standard scaler) and a categorical branch
//! (`cat`, one-hot encoder), followed by the regression `model`. The
//! transformed row is the numeric columns followed by one one-hot block per
//! categorical column.

use crate::domain::model::{FeatureValue, FeatureVector};
use crate::domain::ports::Predictor;
use crate::utils::error::{HydrationError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FittedPipeline {
    pub prep: ColumnPrep,
    pub model: Regressor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnPrep {
    pub num: NumericStep,
    pub cat: CategoricalStep,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericStep {
    pub columns: Vec<String>,
    #[serde(default)]
    pub scaler: Option<StandardScaler>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoricalStep {
    pub columns: Vec<String>,
    pub ohe: OneHotEncoder,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleUnknown {
    #[default]
    Ignore,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneHotEncoder {
    /// Fitted categories per categorical column, in encoder order. Entries
    /// may be any JSON scalar.
    pub categories: Vec<Vec<serde_json::Value>>,
    #[serde(default)]
    pub handle_unknown: HandleUnknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Regressor {
    Linear { intercept: f64, coef: Vec<f64> },
}

/// String form of a fitted category, uppercased the way session values are.
pub fn category_label(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.to_uppercase(),
        other => other.to_string().to_uppercase(),
    }
}

impl OneHotEncoder {
    /// Fitted categories as uppercased labels, one list per categorical column.
    pub fn category_labels(&self) -> Vec<Vec<String>> {
        self.categories
            .iter()
            .map(|cats| cats.iter().map(category_label).collect())
            .collect()
    }

    pub fn output_width(&self) -> usize {
        self.categories.iter().map(Vec::len).sum()
    }
}

impl StandardScaler {
    fn transform(&self, index: usize, value: f64) -> f64 {
        let scale = match self.scale[index] {
            s if s == 0.0 => 1.0,
            s => s,
        };
        (value - self.mean[index]) / scale
    }
}

impl FittedPipeline {
    /// Checks the pieces fit together before the pipeline is used.
    pub fn validate_structure(&self) -> Result<()> {
        let num = &self.prep.num;
        let cat = &self.prep.cat;

        for column in num.columns.iter().chain(cat.columns.iter()) {
            if !FeatureVector::is_known_column(column) {
                return Err(HydrationError::artifact(format!(
                    "pipeline references unknown column '{}'",
                    column
                )));
            }
        }

        for column in &num.columns {
            if !FeatureVector::NUMERIC_COLUMNS.contains(&column.as_str()) {
                return Err(HydrationError::artifact(format!(
                    "numeric step expects '{}' which is categorical",
                    column
                )));
            }
        }

        for column in &cat.columns {
            if !FeatureVector::CATEGORICAL_COLUMNS.contains(&column.as_str()) {
                return Err(HydrationError::artifact(format!(
                    "categorical step expects '{}' which is numeric",
                    column
                )));
            }
        }

        if let Some(scaler) = &num.scaler {
            if scaler.mean.len() != num.columns.len() || scaler.scale.len() != num.columns.len() {
                return Err(HydrationError::artifact(format!(
                    "scaler has {} means and {} scales for {} numeric columns",
                    scaler.mean.len(),
                    scaler.scale.len(),
                    num.columns.len()
                )));
            }
        }

        if cat.ohe.categories.len() != cat.columns.len() {
            return Err(HydrationError::artifact(format!(
                "one-hot encoder has {} category lists for {} categorical columns",
                cat.ohe.categories.len(),
                cat.columns.len()
            )));
        }

        let width = self.transformed_width();
        match &self.model {
            Regressor::Linear { coef, .. } if coef.len() != width => {
                Err(HydrationError::artifact(format!(
                    "linear model has {} coefficients but the transformed row has {} columns",
                    coef.len(),
                    width
                )))
            }
            Regressor::Linear { .. } => Ok(()),
        }
    }

    pub fn transformed_width(&self) -> usize {
        self.prep.num.columns.len() + self.prep.cat.ohe.output_width()
    }

    /// Applies the column transformer to one row.
    pub fn transform(&self, row: &FeatureVector) -> Result<Vec<f64>> {
        let mut out = Vec::with_capacity(self.transformed_width());

        for (index, column) in self.prep.num.columns.iter().enumerate() {
            let value = match row.value(column) {
                Some(FeatureValue::Number(n)) => n,
                _ => {
                    return Err(HydrationError::prediction(format!(
                        "row has no numeric value for '{}'",
                        column
                    )))
                }
            };
            out.push(match &self.prep.num.scaler {
                Some(scaler) => scaler.transform(index, value),
                None => value,
            });
        }

        let labels = self.prep.cat.ohe.category_labels();
        for (column, categories) in self.prep.cat.columns.iter().zip(labels.iter()) {
            let value = match row.value(column) {
                Some(FeatureValue::Category(c)) => c,
                _ => {
                    return Err(HydrationError::prediction(format!(
                        "row has no categorical value for '{}'",
                        column
                    )))
                }
            };
            let hit = categories.iter().position(|c| c == value);
            if hit.is_none() && self.prep.cat.ohe.handle_unknown == HandleUnknown::Error {
                return Err(HydrationError::UnknownCategoryError {
                    field: column.clone(),
                    value: value.to_string(),
                });
            }
            out.extend((0..categories.len()).map(|i| if Some(i) == hit { 1.0 } else { 0.0 }));
        }

        Ok(out)
    }
}

impl Predictor for FittedPipeline {
    fn predict(&self, row: &FeatureVector) -> Result<f64> {
        let x = self.transform(row)?;
        match &self.model {
            Regressor::Linear { intercept, coef } => {
                if coef.len() != x.len() {
                    return Err(HydrationError::prediction(format!(
                        "expected {} inputs, got {}",
                        coef.len(),
                        x.len()
                    )));
                }
                Ok(intercept + coef.iter().zip(x.iter()).map(|(w, v)| w * v).sum::<f64>())
            }
        }
    }
}
