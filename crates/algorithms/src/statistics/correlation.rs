//! Pearson correlation between numeric fields

use geoprocs_core::vector::FeatureCollection;
use geoprocs_core::{Error, Result};
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, Serialize)]
pub struct CorrelationReport {
    pub fields: Vec<String>,
    /// Features used in the computation
    pub observations: usize,
    /// Features dropped because a field was missing or not numeric
    pub excluded: usize,
    /// Symmetric matrix in `fields` order; `None` where a field has zero
    /// variance
    pub matrix: Vec<Vec<Option<f64>>>,
}

impl CorrelationReport {
    /// Coefficient for a pair of fields
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.fields.iter().position(|f| f == a)?;
        let j = self.fields.iter().position(|f| f == b)?;
        self.matrix[i][j]
    }
}

fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (&a, &b) in x.iter().zip(y) {
        let (dx, dy) = (a - mean_x, b - mean_y);
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx <= 0.0 || syy <= 0.0 {
        return None;
    }
    Some((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

/// Correlation matrix of the given fields.
///
/// Features with a null or non-numeric value in any of the fields are
/// dropped (listwise deletion). Needs at least two fields and two remaining
/// observations.
pub fn pearson_correlation<S: AsRef<str>>(features: &FeatureCollection, fields: &[S]) -> Result<CorrelationReport> {
    let fields: Vec<String> = fields.iter().map(|f| f.as_ref().to_string()).collect();
    if fields.len() < 2 {
        return Err(Error::InvalidParameter {
            name: "fields",
            value: fields.join(","),
            reason: "at least two fields are required".into(),
        });
    }

    let known = features.field_names();
    if let Some(missing) = fields.iter().find(|f| !known.contains(f)) {
        return Err(Error::InvalidParameter {
            name: "fields",
            value: missing.clone(),
            reason: "no feature has this field".into(),
        });
    }

    // Column-major observations
    let mut columns: Vec<Vec<f64>> = vec![Vec::with_capacity(features.len()); fields.len()];
    let mut excluded = 0usize;
    for feature in features.iter() {
        let row: Option<Vec<f64>> = fields
            .iter()
            .map(|f| feature.get_property(f).and_then(|v| v.as_f64()))
            .collect();
        match row {
            Some(values) => {
                for (column, v) in columns.iter_mut().zip(values) {
                    column.push(v);
                }
            }
            None => excluded += 1,
        }
    }

    let observations = columns[0].len();
    if observations < 2 {
        return Err(Error::InsufficientData(format!(
            "Pearson correlation needs at least 2 complete observations, got {}",
            observations
        )));
    }
    if excluded > 0 {
        warn!(excluded, "Features with missing or non-numeric values were excluded");
    }

    let k = fields.len();
    let mut matrix = vec![vec![None; k]; k];
    for i in 0..k {
        matrix[i][i] = Some(1.0);
        for j in (i + 1)..k {
            let r = pearson(&columns[i], &columns[j]);
            matrix[i][j] = r;
            matrix[j][i] = r;
        }
    }

    Ok(CorrelationReport {
        fields,
        observations,
        excluded,
        matrix,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geoprocs_core::vector::{AttributeValue, Feature};

    fn table(rows: &[(AttributeValue, AttributeValue, AttributeValue)]) -> FeatureCollection {
        rows.iter()
            .map(|(a, b, c)| {
                Feature::default()
                    .with_property("a", a.clone())
                    .with_property("b", b.clone())
                    .with_property("c", c.clone())
            })
            .collect()
    }

    fn f(v: f64) -> AttributeValue {
        AttributeValue::Float(v)
    }

    #[test]
    fn test_perfect_correlations() {
        let fc = table(&[
            (f(1.0), f(2.0), f(5.0)),
            (f(2.0), f(4.0), f(3.0)),
            (f(3.0), f(6.0), f(1.0)),
        ]);
        let report = pearson_correlation(&fc, &["a", "b", "c"]).unwrap();

        assert_eq!(report.observations, 3);
        assert_relative_eq!(report.get("a", "b").unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(report.get("a", "c").unwrap(), -1.0, epsilon = 1e-12);
        assert_eq!(report.get("c", "c"), Some(1.0));
        assert_eq!(report.get("b", "a"), report.get("a", "b"));
    }

    #[test]
    fn test_listwise_deletion_and_numeric_strings() {
        let fc = table(&[
            (f(1.0), AttributeValue::String("2".into()), f(0.0)),
            (f(2.0), AttributeValue::Null, f(1.0)),
            (AttributeValue::Int(3), f(6.0), AttributeValue::String("n/a".into())),
            (f(4.0), f(8.0), f(3.0)),
            (f(5.0), f(10.0), f(4.0)),
        ]);
        let report = pearson_correlation(&fc, &["a", "b", "c"]).unwrap();
        assert_eq!(report.observations, 3);
        assert_eq!(report.excluded, 2);
        assert_relative_eq!(report.get("a", "b").unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_variance_is_none() {
        let fc = table(&[(f(1.0), f(7.0), f(1.0)), (f(2.0), f(7.0), f(2.0))]);
        let report = pearson_correlation(&fc, &["a", "b"]).unwrap();
        assert_eq!(report.get("a", "b"), None);
        assert_eq!(report.get("b", "b"), Some(1.0));
    }

    #[test]
    fn test_errors() {
        let fc = table(&[(f(1.0), f(2.0), f(3.0)), (f(2.0), f(3.0), f(1.0))]);
        assert!(pearson_correlation(&fc, &["a"]).is_err());
        assert!(matches!(
            pearson_correlation(&fc, &["a", "zzz"]),
            Err(Error::InvalidParameter { name: "fields", .. })
        ));

        let short = table(&[(f(1.0), f(2.0), f(3.0))]);
        assert!(matches!(
            pearson_correlation(&short, &["a", "b"]),
            Err(Error::InsufficientData(_))
        ));
    }
}
