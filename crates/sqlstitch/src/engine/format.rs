//! Value formatting: raw substitution, parameter naming and reuse.

use super::Engine;
use crate::log::stitch_trace;
use crate::param::{ParamDescriptor, ParamOptions};
use crate::template::Arg;
use crate::value::Value;
use std::collections::HashMap;
use std::fmt::Write as _;

/// Directive that splices a value's text instead of binding it.
const RAW: &str = "raw";

/// Identity of a reusable parameter: the value plus its resolved metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ReuseKey {
    value: Value,
    options: ParamOptions,
}

/// Maps already-bound descriptors to their placeholder token.
#[derive(Debug, Clone, Default)]
pub(super) struct ReuseIndex {
    tokens: HashMap<ReuseKey, String>,
}

impl ReuseIndex {
    pub(super) fn clear(&mut self) {
        self.tokens.clear();
    }
}

impl Engine {
    pub(super) fn format_value(&mut self, arg: Arg, format: Option<&str>) {
        let raw = format.is_some_and(|f| f.eq_ignore_ascii_case(RAW));

        match arg {
            Arg::Template(template) => template.write_to(self),
            Arg::Value(value) if raw => self.write_raw(&value),
            Arg::Param(param) if raw => self.write_raw(param.value()),
            Arg::Value(value) if !self.settings.reuse_parameters => {
                let name = self.next_name(&value);
                stitch_trace!(%name, kind = %value.kind(), "parameter bound");
                self.params.add(name.as_str(), value);
                self.push_token(&name);
            }
            Arg::Value(value) => self.bind_descriptor(ParamDescriptor::new(value)),
            Arg::Param(param) => self.bind_descriptor(param),
        }
    }

    fn write_raw(&mut self, value: &Value) {
        // Writing into a String cannot fail.
        let _ = write!(self.text, "{value}");
    }

    fn bind_descriptor(&mut self, param: ParamDescriptor) {
        let key = (!param.value().is_null()).then(|| ReuseKey {
            value: param.value().clone(),
            options: param.resolved_options(),
        });

        if let Some(token) = key.as_ref().and_then(|k| self.reuse.tokens.get(k)) {
            stitch_trace!(%token, "parameter reused");
            self.text.push_str(token);
            return;
        }

        let (value, options, name) = param.into_parts();
        let name = match name {
            Some(name) => name,
            None => self.next_name(&value),
        };
        stitch_trace!(%name, kind = %value.kind(), "parameter bound");
        self.params.add_with(name.as_str(), value, options);
        self.push_token(&name);

        if let Some(key) = key {
            let token = format!("{}{name}", self.settings.prefix);
            self.reuse.tokens.insert(key, token);
        }
    }

    fn push_token(&mut self, name: &str) {
        self.text.push_str(&self.settings.prefix);
        self.text.push_str(name);
    }

    /// Mint the next generated name for `value`.
    fn next_name(&mut self, value: &Value) -> String {
        if value.is_collection() {
            let n = self.collection_counter;
            self.collection_counter += 1;
            self.settings.collection_name(n)
        } else {
            let n = self.counter;
            self.counter += 1;
            format!("{}{n}", self.settings.name_template)
        }
    }
}
