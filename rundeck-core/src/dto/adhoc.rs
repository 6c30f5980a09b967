//! Adhoc command, script and URL options

use serde::{Deserialize, Serialize};

use super::filter::NodeFilter;
use super::job::ArgString;
use super::{Params, push_opt};

/// Options shared by adhoc commands, scripts and script URLs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdhocOptions {
    /// Script arguments; ignored for plain commands
    pub arg_string: Option<ArgString>,
    pub node_threadcount: Option<u32>,
    /// Keep going on other nodes when one fails
    pub node_keepgoing: Option<bool>,
    pub as_user: Option<String>,
    /// Command used to run the script
    pub script_interpreter: Option<String>,
    /// Quote the script and its arguments as the interpreter's last argument
    pub interpreter_args_quoted: Option<bool>,
    pub node_filter: NodeFilter,
}

impl AdhocOptions {
    /// Lowest API version able to honour these options
    pub fn required_version(&self) -> u32 {
        if self.script_interpreter.is_some() || self.interpreter_args_quoted.is_some() {
            8
        } else {
            1
        }
    }

    pub fn to_params(&self) -> Params {
        let mut params = Params::new();
        if let Some(arg_string) = &self.arg_string {
            params.push(("argString".to_string(), arg_string.render()));
        }
        push_opt(&mut params, "nodeThreadcount", self.node_threadcount.as_ref());
        push_opt(&mut params, "nodeKeepgoing", self.node_keepgoing.as_ref());
        push_opt(&mut params, "asUser", self.as_user.as_ref());
        push_opt(&mut params, "scriptInterpreter", self.script_interpreter.as_ref());
        push_opt(
            &mut params,
            "interpreterArgsQuoted",
            self.interpreter_args_quoted.as_ref(),
        );
        self.node_filter.append_params(&mut params);
        params
    }

    /// Same as [`AdhocOptions::to_params`] without the script-only fields
    pub fn to_command_params(&self) -> Params {
        let script_only = ["argString", "scriptInterpreter", "interpreterArgsQuoted"];
        self.to_params()
            .into_iter()
            .filter(|(k, _)| !script_only.contains(&k.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::lookup;

    #[test]
    fn test_interpreter_requires_v8() {
        assert_eq!(AdhocOptions::default().required_version(), 1);
        let options = AdhocOptions {
            script_interpreter: Some("bash -c".to_string()),
            ..Default::default()
        };
        assert_eq!(options.required_version(), 8);
    }

    #[test]
    fn test_command_params_drop_script_fields() {
        let options = AdhocOptions {
            arg_string: Some("-v".into()),
            node_keepgoing: Some(true),
            script_interpreter: Some("python3".to_string()),
            ..Default::default()
        };

        let script = options.to_params();
        assert_eq!(lookup(&script, "argString"), Some("-v"));
        assert_eq!(lookup(&script, "scriptInterpreter"), Some("python3"));

        let command = options.to_command_params();
        assert_eq!(lookup(&command, "nodeKeepgoing"), Some("true"));
        assert_eq!(lookup(&command, "argString"), None);
        assert_eq!(lookup(&command, "scriptInterpreter"), None);
    }
}
