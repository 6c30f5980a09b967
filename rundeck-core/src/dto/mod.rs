//! Request option types
//!
//! Options accepted by the client's endpoint methods, each knowing how to
//! encode itself as the query or form parameters the server expects.
//! Unset options are simply left out of the request.

pub mod adhoc;
pub mod execution;
pub mod filter;
pub mod history;
pub mod job;

/// Ordered name/value request parameters
pub type Params = Vec<(String, String)>;

/// Appends `key=value` when the option is set
pub(crate) fn push_opt<T: ToString>(params: &mut Params, key: &str, value: Option<&T>) {
    if let Some(value) = value {
        params.push((key.to_string(), value.to_string()));
    }
}

/// Appends one `key=value` pair per entry
pub(crate) fn push_each(params: &mut Params, key: &str, values: &[String]) {
    params.extend(values.iter().map(|v| (key.to_string(), v.clone())));
}

/// Appends the entries joined with commas, or nothing when empty
pub(crate) fn push_joined(params: &mut Params, key: &str, values: &[String]) {
    if !values.is_empty() {
        params.push((key.to_string(), values.join(",")));
    }
}

#[cfg(test)]
pub(crate) fn lookup<'a>(params: &'a Params, key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}
