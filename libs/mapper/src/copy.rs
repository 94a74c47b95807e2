//! Field-by-field copy between unrelated types
//!
//! Both values are viewed through serde as JSON objects. Every source field
//! whose name also exists on the target is offered to the target; the value is
//! kept only if the target type still deserializes with it. Fields that do not
//! fit are skipped silently, so the copy never fails because of a shape
//! mismatch between the two types.
//!
//! Target fields that are absent from the target's serialized form (for
//! example `skip_serializing_if` on a `None`) are still offered the source
//! value. Such a value counts as copied only when the rebuilt target
//! serializes it back under the same key, which keeps source-only fields from
//! being reported as copied.
//!
//! The target is rebuilt from its serialized form, so fields the target marks
//! `#[serde(skip)]` come back as their defaults once any field is copied.

use crate::MapperError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Number, Value};

/// Outcome of a single copy
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyReport {
    /// Target fields that received a source value
    pub copied: Vec<String>,
    /// Fields present on both sides whose value could not be placed
    pub skipped: Vec<String>,
}

impl CopyReport {
    pub fn is_empty(&self) -> bool {
        self.copied.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldCopier {
    lenient_conversion: bool,
}

impl FieldCopier {
    pub fn new(lenient_conversion: bool) -> Self {
        Self { lenient_conversion }
    }

    /// Exact values only
    pub fn strict() -> Self {
        Self::new(false)
    }

    /// Exact values, then simple scalar coercions
    pub fn lenient() -> Self {
        Self::new(true)
    }

    pub fn lenient_conversion(&self) -> bool {
        self.lenient_conversion
    }

    /// Copy every same-named, compatible field of `from` into `to`
    ///
    /// Returns an error only when one of the types cannot be serialized, or
    /// when the target cannot be rebuilt from its own serialized form.
    pub fn copy<F, T>(&self, from: &F, to: &mut T) -> Result<CopyReport, MapperError>
    where
        F: Serialize + ?Sized,
        T: Serialize + DeserializeOwned,
    {
        let source = serde_json::to_value(from)?;
        let target = serde_json::to_value(&*to)?;

        let (Value::Object(source), Value::Object(mut fields)) = (source, target) else {
            return Ok(CopyReport::default());
        };

        if serde_json::from_value::<T>(Value::Object(fields.clone())).is_err() {
            return Err(MapperError::Serialization(format!(
                "{} cannot be rebuilt from its serialized form",
                std::any::type_name::<T>()
            )));
        }

        let mut report = CopyReport::default();
        for (field, value) in source {
            match fields.get(&field).cloned() {
                Some(previous) => {
                    if self.place::<T>(&mut fields, &field, value, false) {
                        report.copied.push(field);
                    } else {
                        fields.insert(field.clone(), previous);
                        report.skipped.push(field);
                    }
                }
                None => {
                    if self.place::<T>(&mut fields, &field, value, true) {
                        report.copied.push(field);
                    } else {
                        fields.remove(&field);
                    }
                }
            }
        }

        if !report.copied.is_empty() {
            *to = serde_json::from_value(Value::Object(fields))?;
        }

        tracing::trace!(
            target_type = std::any::type_name::<T>(),
            copied = report.copied.len(),
            skipped = report.skipped.len(),
            "Field copy complete"
        );

        Ok(report)
    }

    /// Try the value and its coercions; leaves the first accepted one in place
    ///
    /// With `hidden` set the field was not in the serialized target, so the
    /// rebuilt target must also serialize the field back to accept it.
    fn place<T: Serialize + DeserializeOwned>(
        &self,
        fields: &mut Map<String, Value>,
        field: &str,
        value: Value,
        hidden: bool,
    ) -> bool {
        let mut candidates = Vec::with_capacity(3);
        if self.lenient_conversion {
            candidates.extend(coercions(&value));
        }
        candidates.insert(0, value);

        for candidate in candidates {
            fields.insert(field.to_string(), candidate);
            let Ok(rebuilt) = serde_json::from_value::<T>(Value::Object(fields.clone())) else {
                continue;
            };
            if !hidden || surfaces(&rebuilt, field) {
                return true;
            }
        }
        false
    }
}

impl Default for FieldCopier {
    fn default() -> Self {
        Self::lenient()
    }
}

fn surfaces<T: Serialize>(value: &T, field: &str) -> bool {
    matches!(serde_json::to_value(value), Ok(Value::Object(fields)) if fields.contains_key(field))
}

fn coercions(value: &Value) -> Vec<Value> {
    match value {
        Value::Number(n) => {
            let mut out = vec![Value::String(n.to_string())];
            if let Some(f) = n.as_f64() {
                if n.is_f64() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                    out.push(Value::Number(Number::from(f as i64)));
                }
            }
            out
        }
        Value::Bool(b) => vec![Value::String(b.to_string())],
        Value::String(s) => {
            let trimmed = s.trim();
            let mut out = Vec::new();
            if let Ok(i) = trimmed.parse::<i64>() {
                out.push(Value::Number(Number::from(i)));
            } else if let Ok(u) = trimmed.parse::<u64>() {
                out.push(Value::Number(Number::from(u)));
            } else if let Some(n) = trimmed.parse::<f64>().ok().and_then(Number::from_f64) {
                out.push(Value::Number(n));
            }
            match trimmed.to_ascii_lowercase().as_str() {
                "true" => out.push(Value::Bool(true)),
                "false" => out.push(Value::Bool(false)),
                _ => {}
            }
            out
        }
        _ => Vec::new(),
    }
}
