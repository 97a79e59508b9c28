//! WebAssembly bindings for `eta-measure`.
//!
//! This crate exists to keep `eta-measure` itself free of JS dependencies.
//!
//! Shapes on the JS side:
//! - dense ranking: array of integer matrix indices
//! - dense matrix: array of rows, each an array of numbers
//! - sparse ranking: array of string ids
//! - sparse map: array of `[a, b, value]` triples

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use eta_measure::{EtaConfig, EtaError, PairMap};

fn error_to_js(err: EtaError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn config(strict: Option<bool>) -> EtaConfig {
    EtaConfig::default().with_strict(strict.unwrap_or(false))
}

fn js_array<'a>(js: &'a JsValue, what: &str) -> Result<&'a js_sys::Array, JsValue> {
    js.dyn_ref::<js_sys::Array>()
        .ok_or_else(|| JsValue::from_str(&format!("Expected {} (array)", what)))
}

/// Helper to convert a JS array of indices to Vec<usize>.
fn js_to_indices(js: &JsValue) -> Result<Vec<usize>, JsValue> {
    let array = js_array(js, "ranking")?;
    let mut ranking = Vec::with_capacity(array.length() as usize);

    for (idx, item) in array.iter().enumerate() {
        let value = item.as_f64().ok_or_else(|| {
            JsValue::from_str(&format!("ranking entry must be a number at index {}", idx))
        })?;
        if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
            return Err(JsValue::from_str(&format!(
                "ranking entry must be a non-negative integer at index {}, got {}",
                idx, value
            )));
        }
        ranking.push(value as usize);
    }
    Ok(ranking)
}

/// Helper to convert a JS array of ids to Vec<String>.
fn js_to_ids(js: &JsValue) -> Result<Vec<String>, JsValue> {
    let array = js_array(js, "ranking")?;
    let mut ranking = Vec::with_capacity(array.length() as usize);

    for (idx, item) in array.iter().enumerate() {
        let id = item.as_string().ok_or_else(|| {
            JsValue::from_str(&format!("id must be a string at index {}", idx))
        })?;
        ranking.push(id);
    }
    Ok(ranking)
}

/// Helper to convert a JS array of number arrays to Vec<Vec<f64>>.
///
/// Shape is left to `eta-measure`, which reports it as a `ShapeMismatch`.
fn js_to_matrix(js: &JsValue, what: &str) -> Result<Vec<Vec<f64>>, JsValue> {
    let array = js_array(js, what)?;
    let mut matrix = Vec::with_capacity(array.length() as usize);

    for (row_idx, row) in array.iter().enumerate() {
        let row = row.dyn_ref::<js_sys::Array>().ok_or_else(|| {
            JsValue::from_str(&format!("Expected {} row (array) at index {}", what, row_idx))
        })?;
        let mut values = Vec::with_capacity(row.length() as usize);
        for (col_idx, cell) in row.iter().enumerate() {
            let value = cell.as_f64().ok_or_else(|| {
                JsValue::from_str(&format!(
                    "{} entry must be a number at [{}][{}]",
                    what, row_idx, col_idx
                ))
            })?;
            values.push(value);
        }
        matrix.push(values);
    }
    Ok(matrix)
}

/// Helper to convert a JS array of `[a, b, value]` triples to a pair map.
fn js_to_pair_map(js: &JsValue, what: &str) -> Result<PairMap<String>, JsValue> {
    let array = js_array(js, what)?;
    let mut map = PairMap::with_capacity(array.length() as usize);

    for (idx, item) in array.iter().enumerate() {
        let triple = item.dyn_ref::<js_sys::Array>().ok_or_else(|| {
            JsValue::from_str(&format!("Expected [a, b, value] triple at index {}", idx))
        })?;
        if triple.length() != 3 {
            return Err(JsValue::from_str(&format!(
                "Expected [a, b, value] triple at index {}, got array of length {}",
                idx,
                triple.length()
            )));
        }
        let a = triple.get(0).as_string().ok_or_else(|| {
            JsValue::from_str(&format!("first id must be a string at index {}", idx))
        })?;
        let b = triple.get(1).as_string().ok_or_else(|| {
            JsValue::from_str(&format!("second id must be a string at index {}", idx))
        })?;
        let value = triple.get(2).as_f64().ok_or_else(|| {
            JsValue::from_str(&format!("{} value must be a number at index {}", what, idx))
        })?;
        map.insert((a, b), value);
    }
    Ok(map)
}

#[wasm_bindgen]
pub fn eta(ranking: &JsValue, prefs: &JsValue) -> Result<f64, JsValue> {
    let ranking = js_to_indices(ranking)?;
    let prefs = js_to_matrix(prefs, "preference")?;
    eta_measure::eta(&ranking, &prefs).map_err(error_to_js)
}

#[wasm_bindgen]
pub fn eta_p(ranking: &JsValue, prefs: &JsValue, variances: &JsValue) -> Result<f64, JsValue> {
    let ranking = js_to_indices(ranking)?;
    let prefs = js_to_matrix(prefs, "preference")?;
    let variances = js_to_matrix(variances, "variance")?;
    eta_measure::eta_p(&ranking, &prefs, &variances).map_err(error_to_js)
}

#[wasm_bindgen]
pub fn eta_dict(
    ranking: &JsValue,
    prefs: &JsValue,
    strict: Option<bool>,
) -> Result<f64, JsValue> {
    let ranking = js_to_ids(ranking)?;
    let prefs = js_to_pair_map(prefs, "preference")?;
    eta_measure::eta_dict_with_config(&ranking, &prefs, config(strict)).map_err(error_to_js)
}

#[wasm_bindgen]
pub fn eta_p_dict(
    ranking: &JsValue,
    prefs: &JsValue,
    variances: &JsValue,
    strict: Option<bool>,
) -> Result<f64, JsValue> {
    let ranking = js_to_ids(ranking)?;
    let prefs = js_to_pair_map(prefs, "preference")?;
    let variances = js_to_pair_map(variances, "variance")?;
    eta_measure::eta_p_dict_with_config(&ranking, &prefs, &variances, config(strict))
        .map_err(error_to_js)
}
