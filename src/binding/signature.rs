use std::fmt;
use std::str::FromStr;

use crate::errors::BindingError;

/// Persisted method signature, `"<DeclaringType>/<Method>(<ParamType>)"`.
///
/// Nullary methods are written with empty parentheses. The textual format is
/// part of the asset format and must not change.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodSignature {
    pub declaring_type: String,
    pub method: String,
    pub param: Option<String>,
}

impl MethodSignature {
    pub fn new(declaring_type: &str, method: &str, param: Option<&str>) -> Self {
        Self {
            declaring_type: declaring_type.to_string(),
            method: method.to_string(),
            param: param.map(str::to_string),
        }
    }

    /// Declaring type without any namespace prefix.
    pub fn short_type_name(&self) -> &str {
        self.declaring_type
            .rsplit('.')
            .next()
            .unwrap_or(&self.declaring_type)
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}({})",
            self.declaring_type,
            self.method,
            self.param.as_deref().unwrap_or("")
        )
    }
}

impl FromStr for MethodSignature {
    type Err = BindingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || BindingError::MalformedSignature(s.to_string());

        let (declaring_type, rest) = s.trim().split_once('/').ok_or_else(malformed)?;
        let (method, params) = rest.split_once('(').ok_or_else(malformed)?;
        let params = params.strip_suffix(')').ok_or_else(malformed)?.trim();

        if declaring_type.is_empty() || method.is_empty() || params.contains([',', '(', ')']) {
            return Err(malformed());
        }

        Ok(Self {
            declaring_type: declaring_type.to_string(),
            method: method.trim().to_string(),
            param: (!params.is_empty()).then(|| params.to_string()),
        })
    }
}
