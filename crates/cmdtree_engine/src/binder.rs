//! Argument binding.
//!
//! Matches the tokens left after tree resolution against an executor's
//! parameter list, converting each through the transform registry and
//! filling omitted optionals from their defaults.

use cmdtree_foundation::Value;
use thiserror::Error;
use tracing::error;

use crate::definition::Parameter;
use crate::transform::{ConversionError, Transform, TransformRegistry, VarargPolicy};
use crate::tree::Executor;

/// Why binding failed.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BindError {
    /// Fewer tokens than required parameters.
    #[error("expected at least {min} arguments, got {given}")]
    TooFewArguments {
        /// Required parameter count.
        min: usize,
        /// Tokens supplied.
        given: usize,
    },

    /// More tokens than parameters, with no vararg to absorb them.
    #[error("expected at most {max} arguments, got {given}")]
    TooManyArguments {
        /// Parameter count.
        max: usize,
        /// Tokens supplied.
        given: usize,
    },

    /// A supplied token failed its transform.
    #[error("invalid value '{raw}' for <{parameter}>: {cause}")]
    ArgumentConversion {
        /// Parameter name.
        parameter: String,
        /// The offending token (joined text for joined varargs).
        raw: String,
        /// Transform failure.
        cause: ConversionError,
    },

    /// A declared default failed its transform.
    #[error("default '{raw}' for <{parameter}> is malformed: {cause}")]
    MalformedDefault {
        /// Parameter name.
        parameter: String,
        /// The raw default text.
        raw: String,
        /// Transform failure.
        cause: ConversionError,
    },

    /// An invariant established at registration did not hold.
    #[error("internal binding error: {0}")]
    Internal(String),
}

/// Binds tokens to an executor's parameters.
pub struct ArgumentBinder<'r> {
    transforms: &'r TransformRegistry,
    separator: &'r str,
}

impl<'r> ArgumentBinder<'r> {
    /// Creates a binder using `separator` to join tokens for joined varargs.
    #[must_use]
    pub fn new(transforms: &'r TransformRegistry, separator: &'r str) -> Self {
        Self {
            transforms,
            separator,
        }
    }

    /// Binds tokens, returning one value per parameter in declaration order.
    ///
    /// # Errors
    ///
    /// Returns a [`BindError`] describing the first failure; no handler
    /// should run in that case.
    pub fn bind<S: AsRef<str>>(
        &self,
        executor: &Executor,
        tokens: &[S],
    ) -> Result<Vec<Value>, BindError> {
        let given = tokens.len();
        let min = executor.min_required();
        if given < min {
            return Err(BindError::TooFewArguments { min, given });
        }
        if let Some(max) = executor.max() {
            if given > max {
                return Err(BindError::TooManyArguments { max, given });
            }
        }

        let parameters = executor.parameters();
        let mut values = Vec::with_capacity(parameters.len());
        let mut rest = tokens;

        for parameter in parameters {
            if parameter.vararg {
                values.push(self.bind_vararg(parameter, rest)?);
                rest = &[];
                break;
            }

            match rest.split_first() {
                Some((raw, tail)) => {
                    values.push(self.convert(parameter, raw.as_ref())?);
                    rest = tail;
                }
                None if parameter.optional => values.push(self.default_value(parameter)?),
                None => {
                    error!(parameter = %parameter.name, given, min, "required parameter without a token");
                    return Err(BindError::Internal(format!(
                        "required parameter '{}' has no token",
                        parameter.name
                    )));
                }
            }
        }

        if !rest.is_empty() {
            error!(leftover = rest.len(), "tokens left after binding");
            return Err(BindError::Internal(format!(
                "{} tokens left after binding",
                rest.len()
            )));
        }

        Ok(values)
    }

    fn transform(&self, parameter: &Parameter) -> Result<&'r Transform, BindError> {
        self.transforms.get(&parameter.value_type).ok_or_else(|| {
            error!(parameter = %parameter.name, value_type = %parameter.value_type, "no transform at bind time");
            BindError::Internal(format!(
                "no transform registered for type {}",
                parameter.value_type
            ))
        })
    }

    fn convert(&self, parameter: &Parameter, raw: &str) -> Result<Value, BindError> {
        self.transform(parameter)?
            .convert(raw)
            .map_err(|cause| BindError::ArgumentConversion {
                parameter: parameter.name.clone(),
                raw: raw.to_string(),
                cause,
            })
    }

    fn convert_default(
        transform: &Transform,
        parameter: &Parameter,
        raw: &str,
    ) -> Result<Value, BindError> {
        transform
            .convert(raw)
            .map_err(|cause| BindError::MalformedDefault {
                parameter: parameter.name.clone(),
                raw: raw.to_string(),
                cause,
            })
    }

    fn default_value(&self, parameter: &Parameter) -> Result<Value, BindError> {
        match &parameter.default_raw {
            Some(raw) => Self::convert_default(self.transform(parameter)?, parameter, raw),
            None => Ok(Value::Nil),
        }
    }

    fn bind_vararg<S: AsRef<str>>(
        &self,
        parameter: &Parameter,
        tokens: &[S],
    ) -> Result<Value, BindError> {
        let transform = self.transform(parameter)?;

        match (transform.policy(), tokens.is_empty()) {
            (VarargPolicy::Sequence, false) => tokens
                .iter()
                .map(|raw| self.convert(parameter, raw.as_ref()))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::list),
            (VarargPolicy::Sequence, true) => match &parameter.default_raw {
                Some(raw) => raw
                    .split_whitespace()
                    .map(|word| Self::convert_default(transform, parameter, word))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::list),
                None => Ok(Value::list([])),
            },
            (VarargPolicy::Joined, false) => {
                let joined = tokens
                    .iter()
                    .map(|token| token.as_ref())
                    .collect::<Vec<&str>>()
                    .join(self.separator);
                self.convert(parameter, &joined)
            }
            (VarargPolicy::Joined, true) => self.default_value(parameter),
        }
    }
}
