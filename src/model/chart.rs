use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::{Bar, BarId, RowId, TimeFormat};
use crate::config::BarFields;
use crate::error::{GanttError, GanttResult};

const BAR_CONFIG_KEY: &str = "ganttBarConfig";

/// A horizontal track of mutually overlap-checked bars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub id: RowId,
    pub label: String,
}

impl Row {
    pub fn new(id: impl Into<RowId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// A row as supplied by the host: bars are loosely shaped records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowRecord {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub bars: Vec<Value>,
}

/// Per-bar options nested under `ganttBarConfig` in a record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct BarRecordConfig {
    id: Option<String>,
    label: Option<String>,
    bundle: Option<String>,
    has_handles: bool,
    immobile: bool,
    enable_overlap: bool,
    push_on_overlap: Option<bool>,
}

/// The bars and rows of one chart. Row order is display order.
#[derive(Debug, Clone, Default)]
pub struct Chart {
    rows: Vec<Row>,
    bars: Vec<Bar>,
}

impl Chart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn has_row(&self, id: &RowId) -> bool {
        self.rows.iter().any(|r| &r.id == id)
    }

    pub fn add_row(&mut self, row: Row) {
        if !self.has_row(&row.id) {
            self.rows.push(row);
        }
    }

    pub fn add_bar(&mut self, bar: Bar) -> GanttResult<()> {
        if !self.has_row(&bar.row) {
            return Err(GanttError::InvalidBar {
                id: bar.id.clone(),
                reason: format!("row {} does not exist", bar.row),
            });
        }
        if self.bar(&bar.id).is_some() {
            return Err(GanttError::InvalidBar {
                id: bar.id.clone(),
                reason: "duplicate id".into(),
            });
        }
        self.bars.push(bar);
        Ok(())
    }

    pub fn bar(&self, id: &BarId) -> Option<&Bar> {
        self.bars.iter().find(|b| &b.id == id)
    }

    pub fn bar_mut(&mut self, id: &BarId) -> Option<&mut Bar> {
        self.bars.iter_mut().find(|b| &b.id == id)
    }

    pub fn try_bar(&self, id: &BarId) -> GanttResult<&Bar> {
        self.bar(id).ok_or_else(|| GanttError::UnknownBar(id.clone()))
    }

    pub fn try_bar_mut(&mut self, id: &BarId) -> GanttResult<&mut Bar> {
        self.bar_mut(id).ok_or_else(|| GanttError::UnknownBar(id.clone()))
    }

    pub fn bars_in_row<'a>(&'a self, row: &'a RowId) -> impl Iterator<Item = &'a Bar> + 'a {
        self.bars.iter().filter(move |b| &b.row == row)
    }

    pub fn bars_in_row_mut<'a>(&'a mut self, row: &'a RowId) -> impl Iterator<Item = &'a mut Bar> + 'a {
        self.bars.iter_mut().filter(move |b| &b.row == row)
    }

    /// Ids of every bar in `bundle`, across all rows.
    pub fn bundle_members(&self, bundle: &str) -> Vec<BarId> {
        self.bars
            .iter()
            .filter(|b| b.bundle.as_deref() == Some(bundle))
            .map(|b| b.id.clone())
            .collect()
    }

    /// Clears every bar's drag limits.
    pub fn reset_drag_limits(&mut self) {
        for bar in &mut self.bars {
            bar.drag_limits = Default::default();
        }
    }

    /// Builds a chart from host records, reading times under `fields`.
    pub fn from_records(
        records: Vec<RowRecord>,
        fields: &BarFields,
        format: &TimeFormat,
    ) -> GanttResult<Self> {
        let mut chart = Chart::new();
        for record in records {
            let row_id = RowId::new(record.id);
            chart.add_row(Row::new(row_id.clone(), record.label));
            for value in record.bars {
                let bar = bar_from_record(value, &row_id, fields, format)?;
                chart.add_bar(bar)?;
            }
        }
        Ok(chart)
    }

    /// Writes the current state back out in record shape.
    pub fn to_records(&self, fields: &BarFields, format: &TimeFormat) -> Vec<RowRecord> {
        self.rows
            .iter()
            .map(|row| RowRecord {
                id: row.id.as_str().to_owned(),
                label: row.label.clone(),
                bars: self
                    .bars_in_row(&row.id)
                    .map(|bar| bar_to_record(bar, fields, format))
                    .collect(),
            })
            .collect()
    }
}

fn bar_from_record(
    value: Value,
    row: &RowId,
    fields: &BarFields,
    format: &TimeFormat,
) -> GanttResult<Bar> {
    let Value::Object(mut fields_map) = value else {
        return Err(GanttError::InvalidBar {
            id: BarId::new("?"),
            reason: "bar record is not an object".into(),
        });
    };

    let config: BarRecordConfig = match fields_map.remove(BAR_CONFIG_KEY) {
        Some(raw) => serde_json::from_value(raw).map_err(|e| GanttError::InvalidBar {
            id: BarId::new("?"),
            reason: format!("malformed {BAR_CONFIG_KEY}: {e}"),
        })?,
        None => BarRecordConfig::default(),
    };
    let id = config.id.clone().map(BarId::new).unwrap_or_else(BarId::generate);

    let mut take_time = |key: &str| -> GanttResult<chrono::NaiveDateTime> {
        match fields_map.remove(key) {
            Some(Value::String(raw)) => format.parse(&raw),
            _ => Err(GanttError::InvalidBar {
                id: id.clone(),
                reason: format!("missing string field {key:?}"),
            }),
        }
    };
    let start = take_time(&fields.start)?;
    let end = take_time(&fields.end)?;

    let mut bar = Bar::new(id, row.clone(), start, end)?;
    bar.label = config.label;
    bar.bundle = config.bundle;
    bar.has_handles = config.has_handles;
    bar.immobile = config.immobile;
    bar.enable_overlap = config.enable_overlap;
    bar.push_on_overlap = config.push_on_overlap;
    bar.extra = fields_map;
    Ok(bar)
}

fn bar_to_record(bar: &Bar, fields: &BarFields, format: &TimeFormat) -> Value {
    let mut record: Map<String, Value> = bar.extra.clone();
    record.insert(fields.start.clone(), Value::String(format.format(bar.start)));
    record.insert(fields.end.clone(), Value::String(format.format(bar.end)));
    let mut config = json!({
        "id": bar.id.as_str(),
        "label": bar.label,
        "bundle": bar.bundle,
        "hasHandles": bar.has_handles,
        "immobile": bar.immobile,
        "enableOverlap": bar.enable_overlap,
    });
    if let (Some(push), Value::Object(map)) = (bar.push_on_overlap, &mut config) {
        map.insert("pushOnOverlap".into(), Value::Bool(push));
    }
    record.insert(BAR_CONFIG_KEY.into(), config);
    Value::Object(record)
}
