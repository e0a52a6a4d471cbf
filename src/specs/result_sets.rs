// src/specs/result_sets.rs
use serde::Deserialize;
use serde_json::Value;

use crate::error::SourceError;
use crate::store::DataSet;

/// The one table shape every `stats/*` endpoint answers with:
/// `{"resultSets": [{"name": .., "headers": [..], "rowSet": [[..], ..]}, ..]}`.
/// A few endpoints say `resultSet` (singular) and return one object.
#[derive(Debug, Deserialize)]
struct Response {
    #[serde(rename = "resultSets", alias = "resultSet")]
    result_sets: ResultSets,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ResultSets {
    Many(Vec<ResultSet>),
    One(ResultSet),
}

#[derive(Debug, Deserialize)]
struct ResultSet {
    name: String,
    headers: Vec<String>,
    #[serde(rename = "rowSet")]
    row_set: Vec<Vec<Value>>,
}

/// Scalars to strings: strings verbatim, numbers as JSON prints them,
/// null → empty.
fn cell(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

fn to_dataset(rs: ResultSet) -> DataSet {
    let rows = rs.row_set.iter().map(|r| r.iter().map(cell).collect()).collect();
    DataSet::new(rs.headers, rows)
}

/// Decode a response body and pull out the named tables, in the order asked.
pub fn decode(body: &str, names: &[&str]) -> Result<Vec<DataSet>, SourceError> {
    let resp: Response = serde_json::from_str(body)?;
    let mut sets = match resp.result_sets {
        ResultSets::Many(v) => v,
        ResultSets::One(rs) => vec![rs],
    };

    let mut out = Vec::with_capacity(names.len());
    for name in names {
        let ix = sets
            .iter()
            .position(|rs| rs.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| SourceError::Decode(format!("result set `{name}` not in response")))?;
        out.push(to_dataset(sets.swap_remove(ix)));
    }
    Ok(out)
}
