//! Command-line flags derived from config leaves.
//!
//! Every flat path of a [`Config`](super::Config) becomes one long flag whose
//! name is the path with the delimiter replaced by `__`, so `train;lr` is set
//! with `--train__lr 0.1`. The flag's type and arity follow the current value:
//!
//! | value          | flag                                   |
//! |----------------|----------------------------------------|
//! | int            | one `i64`                              |
//! | float          | one `f64`                              |
//! | text, null     | one string                             |
//! | bool           | one `0` or `1`, stored back as a bool  |
//! | list           | one or more values of the element type |
//!
//! Flags have no defaults: a flag that is not given leaves its path alone.

use clap::builder::PossibleValuesParser;
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use serde::{Deserialize, Serialize};

use crate::constants::FLAG_SEPARATOR;
use crate::path::Delimiter;
use crate::value::Value;

use super::ConfigError;

/// Value type accepted by a flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgKind {
    /// 64-bit signed integer
    Int,
    /// 64-bit float
    Float,
    /// Any string
    #[serde(alias = "str", alias = "string")]
    Text,
}

impl ArgKind {
    fn value_name(self) -> &'static str {
        match self {
            ArgKind::Int => "INT",
            ArgKind::Float => "FLOAT",
            ArgKind::Text => "TEXT",
        }
    }

    /// Parses a raw string as this kind.
    fn parse(self, path: &str, raw: &str) -> Result<Value, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidArgument {
            path: path.to_string(),
            reason,
        };
        match self {
            ArgKind::Int => raw
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|e| invalid(format!("{raw:?} is not an int: {e}"))),
            ArgKind::Float => raw
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|e| invalid(format!("{raw:?} is not a float: {e}"))),
            ArgKind::Text => Ok(Value::Text(raw.to_string())),
        }
    }
}

/// Per-path customization read from the `_ARGUMENT_SPECIFICATION` table.
///
/// ```yaml
/// _ARGUMENT_SPECIFICATION:
///   train;lr:
///     flag: --lr
///   train;optimizer:
///     choices: [sgd, adam]
///   secret:
///     exclude: true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArgOverride {
    /// Replacement flag, with or without leading dashes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flag: Option<String>,
    /// Replacement value type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ArgKind>,
    /// Restricts the flag to these values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<Value>>,
    /// Keeps the path off the command line entirely
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub exclude: bool,
}

/// Field names that mark a map in the override table as an override entry.
pub(crate) const OVERRIDE_FIELDS: [&str; 4] = ["flag", "kind", "choices", "exclude"];

/// A command-line flag bound to one config path.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgSpec {
    /// Config path written by this flag
    pub path: String,
    /// Flag as typed on the command line, e.g. `--train__lr`
    pub flag: String,
    /// Value type
    pub kind: ArgKind,
    /// Accepts one or more values and stores a list
    pub multiple: bool,
    /// Allowed values, if restricted
    pub choices: Option<Vec<Value>>,
    /// Stored back as a bool (`0` is false, anything else true)
    pub boolean: bool,
}

impl ArgSpec {
    /// Derives the flag for `path` from its current value.
    ///
    /// Returns `None` for empty-map placeholders, which have no flag.
    pub fn infer(path: &str, value: &Value, delimiter: &Delimiter) -> Option<Self> {
        let (element, multiple) = match value {
            Value::Map(_) => return None,
            Value::List(items) => (items.iter().find(|item| !item.is_null()), true),
            scalar => (Some(scalar), false),
        };
        let (kind, boolean) = match element {
            Some(Value::Bool(_)) => (ArgKind::Int, true),
            Some(Value::Int(_)) => (ArgKind::Int, false),
            Some(Value::Float(_)) => (ArgKind::Float, false),
            _ => (ArgKind::Text, false),
        };
        Some(Self {
            path: path.to_string(),
            flag: format!("--{}", path.replace(delimiter.as_str(), FLAG_SEPARATOR)),
            kind,
            multiple,
            choices: boolean.then(|| vec![Value::Int(0), Value::Int(1)]),
            boolean,
        })
    }

    /// Applies an override on top of the inferred spec.
    pub fn with_override(mut self, custom: &ArgOverride) -> Self {
        if let Some(flag) = &custom.flag {
            self.flag = if flag.starts_with('-') {
                flag.clone()
            } else {
                format!("--{flag}")
            };
        }
        if let Some(kind) = custom.kind {
            self.kind = kind;
        }
        if let Some(choices) = &custom.choices {
            self.choices = Some(choices.clone());
        }
        self
    }

    /// Long flag name without the leading dashes
    pub fn long(&self) -> &str {
        self.flag.trim_start_matches('-')
    }

    /// Builds the clap argument. Its id is the config path.
    pub fn to_arg(&self) -> Arg {
        let arg = Arg::new(self.path.clone())
            .long(self.long().to_string())
            .value_name(self.kind.value_name())
            .action(ArgAction::Set)
            .help(format!("Set config path `{}`", self.path));
        let arg = if self.multiple {
            arg.num_args(1..)
        } else {
            arg.num_args(1)
        };

        match (&self.choices, self.kind) {
            (Some(_), ArgKind::Int) if self.boolean && self.is_bool_choices() => {
                arg.value_parser(value_parser!(i64).range(0..=1))
            }
            (Some(choices), _) => arg.value_parser(PossibleValuesParser::new(
                choices.iter().map(|choice| choice.to_string()),
            )),
            (None, ArgKind::Int) => arg.value_parser(value_parser!(i64)),
            (None, ArgKind::Float) => arg.value_parser(value_parser!(f64)),
            (None, ArgKind::Text) => arg.value_parser(value_parser!(String)),
        }
    }

    fn is_bool_choices(&self) -> bool {
        self.choices.as_deref() == Some(&[Value::Int(0), Value::Int(1)][..])
    }

    /// Reads this flag back from parsed matches.
    ///
    /// Returns `Ok(None)` when the flag was not given.
    pub fn read(&self, matches: &ArgMatches) -> Result<Option<Value>, ConfigError> {
        let values: Vec<Value> = match (&self.choices, self.kind) {
            (Some(_), ArgKind::Int) if self.boolean && self.is_bool_choices() => {
                typed::<i64>(matches, &self.path)?.map(|v| v.into_iter().map(Value::Int).collect())
            }
            (Some(_), kind) => match typed::<String>(matches, &self.path)? {
                Some(raw) => Some(
                    raw.iter()
                        .map(|r| kind.parse(&self.path, r))
                        .collect::<Result<_, _>>()?,
                ),
                None => None,
            },
            (None, ArgKind::Int) => {
                typed::<i64>(matches, &self.path)?.map(|v| v.into_iter().map(Value::Int).collect())
            }
            (None, ArgKind::Float) => {
                typed::<f64>(matches, &self.path)?.map(|v| v.into_iter().map(Value::Float).collect())
            }
            (None, ArgKind::Text) => {
                typed::<String>(matches, &self.path)?.map(|v| v.into_iter().map(Value::Text).collect())
            }
        }
        .unwrap_or_default();

        if values.is_empty() {
            return Ok(None);
        }
        let values: Vec<Value> = if self.boolean {
            values
                .into_iter()
                .map(|v| Value::Bool(v.as_int().is_some_and(|n| n != 0)))
                .collect()
        } else {
            values
        };
        Ok(Some(if self.multiple {
            Value::List(values)
        } else {
            values.into_iter().next().unwrap_or(Value::Null)
        }))
    }
}

fn typed<T>(matches: &ArgMatches, id: &str) -> Result<Option<Vec<T>>, ConfigError>
where
    T: Clone + Send + Sync + 'static,
{
    Ok(matches
        .try_get_many::<T>(id)?
        .map(|values| values.cloned().collect()))
}

/// Registers every spec on `command`.
pub(crate) fn register(command: Command, specs: &[ArgSpec]) -> Command {
    command.args(specs.iter().map(ArgSpec::to_arg))
}
