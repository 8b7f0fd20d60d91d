use super::description::{DatasetDescription, MetaDefinition, MetaType};
use super::diagnostics::{Diagnostic, Diagnostics};
use super::mask::SetMask;
use super::model::{Attribute, AttributeType, AttributeValue};

pub const SET_COUNT_ATTRIBUTE: &str = "Set Count";
pub const SETS_ATTRIBUTE: &str = "Sets";

// ---------------------------------------------------------------------------
// Attribute model builder
// ---------------------------------------------------------------------------

/// Build the declared attributes followed by the implicit `Set Count` and
/// `Sets` attributes derived from `row_masks`.
pub fn build_attributes(
    header: &[String],
    rows: &[Vec<String>],
    description: &DatasetDescription,
    row_masks: &[SetMask],
    diagnostics: &mut Diagnostics,
) -> Vec<Attribute> {
    let mut attributes: Vec<Attribute> = description
        .meta
        .iter()
        .map(|meta| build_declared(header, rows, meta, diagnostics))
        .collect();

    let mut set_count = Attribute::new(
        SET_COUNT_ATTRIBUTE,
        AttributeType::Integer,
        row_masks
            .iter()
            .map(|mask| AttributeValue::Integer(i64::from(mask.degree())))
            .collect(),
    );
    set_count.min = Some(0.0);
    set_count.max = numeric_range(&set_count.values).map(|(_, max)| max);
    attributes.push(set_count);

    attributes.push(Attribute::new(
        SETS_ATTRIBUTE,
        AttributeType::Sets,
        row_masks
            .iter()
            .map(|mask| AttributeValue::Sets(mask.singles().collect()))
            .collect(),
    ));

    attributes
}

fn build_declared(
    header: &[String],
    rows: &[Vec<String>],
    meta: &MetaDefinition,
    diagnostics: &mut Diagnostics,
) -> Attribute {
    let name = meta
        .name
        .clone()
        .or_else(|| header.get(meta.index).cloned())
        .unwrap_or_else(|| format!("Column {}", meta.index));

    let kind = match meta.kind {
        MetaType::Integer => AttributeType::Integer,
        MetaType::Float => AttributeType::Float,
        MetaType::Id => AttributeType::Id,
        MetaType::String | MetaType::Other => AttributeType::String,
    };

    let values = rows
        .iter()
        .enumerate()
        .map(|(row, cells)| {
            let raw = cells.get(meta.index).map(String::as_str).unwrap_or("");
            convert_cell(kind, raw).unwrap_or_else(|| {
                diagnostics.push(Diagnostic::malformed(row, meta.index, raw));
                AttributeValue::NotANumber
            })
        })
        .collect();

    let mut attribute = Attribute::new(name, kind, values);
    if kind.is_numeric() {
        // Explicit overrides win, including an explicit 0.
        let computed = numeric_range(&attribute.values);
        attribute.min = meta.min.or(computed.map(|(min, _)| min));
        attribute.max = meta.max.or(computed.map(|(_, max)| max));
    }
    attribute
}

/// `None` when a numeric cell does not parse to a finite number.
fn convert_cell(kind: AttributeType, raw: &str) -> Option<AttributeValue> {
    match kind {
        AttributeType::Integer => raw.trim().parse::<i64>().ok().map(AttributeValue::Integer),
        AttributeType::Float => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(AttributeValue::Float),
        _ => Some(AttributeValue::Text(raw.to_string())),
    }
}

/// Min and max over the numeric values, skipping NaN sentinels.
fn numeric_range(values: &[AttributeValue]) -> Option<(f64, f64)> {
    values
        .iter()
        .filter_map(AttributeValue::as_f64)
        .fold(None, |range, v| match range {
            None => Some((v, v)),
            Some((min, max)) => Some((min.min(v), max.max(v))),
        })
}
