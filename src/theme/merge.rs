use serde_json::Value;

/// Recursively merge `overlay` into `base`.
///
/// Objects merge key by key and arrays index by index; `null` in the overlay
/// leaves the base untouched; any other overlay value replaces the base value.
pub fn deep_merge(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (_, Value::Null) => {}
        (Value::Object(b), Value::Object(o)) => {
            for (k, v) in o {
                match b.get_mut(k) {
                    Some(existing) => deep_merge(existing, v),
                    None if !v.is_null() => { b.insert(k.clone(), v.clone()); }
                    None => {}
                }
            }
        }
        (Value::Array(b), Value::Array(o)) => {
            for (i, v) in o.iter().enumerate() {
                match b.get_mut(i) {
                    Some(existing) => deep_merge(existing, v),
                    None => b.push(v.clone()),
                }
            }
        }
        (b, o) => *b = o.clone(),
    }
}

/// Merged copy of `base` and `overlay`.
pub fn merged(base: &Value, overlay: &Value) -> Value {
    let mut out = base.clone();
    deep_merge(&mut out, overlay);
    out
}
