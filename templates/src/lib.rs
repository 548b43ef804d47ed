//! Biometric templates, the deployment parameters they are checked
//! against, and the encoding that turns a squared Euclidean distance into an
//! inner product.
//!
//! With `A` the reference template and `B` the probe, both shifted by one:
//!
//! ```text
//! reference  ( A_0,    ..., A_k-1,    1,    |A|² )
//! probe      ( -2·B_0, ..., -2·B_k-1, |B|², 1    )
//! ```
//!
//! and the inner product of the two is `|A|² - 2·A·B + |B|² = |A - B|²`.
//!
//! ```rust
//! use templates::{Encoding, Parameters, encode, squared_distance};
//!
//! let parameters = Parameters::new(3, 10, 16).unwrap();
//! let a = parameters.template(vec![0, 0, 0]).unwrap();
//! let b = parameters.template(vec![3, 4, 0]).unwrap();
//!
//! let reference = encode(&a, Encoding::Reference);
//! let probe = encode(&b, Encoding::Probe);
//!
//! assert_eq!(reference.inner_product(&probe), Some(25));
//! assert_eq!(squared_distance(&a, &b), 25);
//! ```
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod timing;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParameterError {
    #[error("template length must be at least 1")]
    EmptyTemplate,
    #[error("maximum template value must be non-negative, got {0}")]
    NegativeMaximum(i64),
    #[error("security parameter must be at least 1 byte")]
    EmptyIdentifier,
    #[error("maximum inner product overflows for length {length} and maximum value {max}")]
    Overflow { length: usize, max: i64 },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("template has {found} components, expected {expected}")]
    LengthMismatch { expected: usize, found: usize },
    #[error("component {index} is {value}, outside of [0, {max}]")]
    OutOfRange { index: usize, value: i64, max: i64 },
}

/// Deployment parameters; server and every client must agree on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawParameters", into = "RawParameters")]
pub struct Parameters {
    max_value_template: i64,
    max_value_ipfe: i64,
    security_parameter: usize,
    template_length: usize,
    ipfe_vector_length: usize,
}

/// Wire form of [`Parameters`]; derived values are recomputed on decode
#[derive(Serialize, Deserialize)]
struct RawParameters {
    template_length: usize,
    max_value_template: i64,
    security_parameter: usize,
}

impl Parameters {
    /// * `template_length` : number of components of a template
    /// * `max_value_template` : largest value a component may take
    /// * `security_parameter` : byte length of client identifiers
    pub fn new(
        template_length: usize,
        max_value_template: i64,
        security_parameter: usize,
    ) -> Result<Self, ParameterError> {
        if template_length == 0 {
            return Err(ParameterError::EmptyTemplate);
        }
        if max_value_template < 0 {
            return Err(ParameterError::NegativeMaximum(max_value_template));
        }
        if security_parameter == 0 {
            return Err(ParameterError::EmptyIdentifier);
        }

        let overflow = ParameterError::Overflow {
            length: template_length,
            max: max_value_template,
        };
        // Largest squared norm of a shifted template, also the largest
        // squared distance between two of them
        let max_value_ipfe = max_value_template
            .checked_add(1)
            .and_then(|m| m.checked_mul(m))
            .zip(i64::try_from(template_length).ok())
            .and_then(|(square, length)| square.checked_mul(length))
            // A single zero-valued component still encodes to -2 in a probe
            .map(|max_ip| max_ip.max(2))
            .ok_or(overflow.clone())?;
        let ipfe_vector_length = template_length.checked_add(2).ok_or(overflow)?;

        Ok(Parameters {
            max_value_template,
            max_value_ipfe,
            security_parameter,
            template_length,
            ipfe_vector_length,
        })
    }

    pub fn max_value_template(&self) -> i64 {
        self.max_value_template
    }

    pub fn max_value_ipfe(&self) -> i64 {
        self.max_value_ipfe
    }

    pub fn security_parameter(&self) -> usize {
        self.security_parameter
    }

    pub fn template_length(&self) -> usize {
        self.template_length
    }

    pub fn ipfe_vector_length(&self) -> usize {
        self.ipfe_vector_length
    }

    /// Check raw values against the parameters
    pub fn template(&self, values: Vec<i64>) -> Result<Template, TemplateError> {
        if values.len() != self.template_length {
            return Err(TemplateError::LengthMismatch {
                expected: self.template_length,
                found: values.len(),
            });
        }
        if let Some((index, &value)) = values
            .iter()
            .enumerate()
            .find(|(_, v)| !(0..=self.max_value_template).contains(*v))
        {
            return Err(TemplateError::OutOfRange {
                index,
                value,
                max: self.max_value_template,
            });
        }
        Ok(Template(values))
    }
}

impl TryFrom<RawParameters> for Parameters {
    type Error = ParameterError;

    fn try_from(raw: RawParameters) -> Result<Self, Self::Error> {
        Parameters::new(
            raw.template_length,
            raw.max_value_template,
            raw.security_parameter,
        )
    }
}

impl From<Parameters> for RawParameters {
    fn from(parameters: Parameters) -> Self {
        RawParameters {
            template_length: parameters.template_length,
            max_value_template: parameters.max_value_template,
            security_parameter: parameters.security_parameter,
        }
    }
}

/// A template that passed [`Parameters::template`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template(Vec<i64>);

impl Template {
    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Which side of the comparison a template is encoded for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Enrolment side, bound into the functional key
    Reference,
    /// Authentication side, encrypted
    Probe,
}

impl Encoding {
    pub fn from_reference_flag(is_reference: bool) -> Self {
        if is_reference {
            Encoding::Reference
        } else {
            Encoding::Probe
        }
    }
}

/// Template encoded for inner product evaluation, `template.len() + 2`
/// components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedVector(Vec<i64>);

impl EncodedVector {
    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `None` on length mismatch or overflow
    pub fn inner_product(&self, other: &EncodedVector) -> Option<i64> {
        if self.len() != other.len() {
            return None;
        }
        self.0
            .iter()
            .zip(&other.0)
            .try_fold(0i64, |acc, (a, b)| acc.checked_add(a.checked_mul(*b)?))
    }
}

/// Encode a template. Components are shifted by one so that none is zero.
pub fn encode(template: &Template, encoding: Encoding) -> EncodedVector {
    let shifted = template.0.iter().map(|v| v + 1);
    let squared_norm: i64 = shifted.clone().map(|v| v * v).sum();

    let mut encoded: Vec<i64> = match encoding {
        Encoding::Reference => shifted.collect(),
        Encoding::Probe => shifted.map(|v| -2 * v).collect(),
    };
    match encoding {
        Encoding::Reference => encoded.extend([1, squared_norm]),
        Encoding::Probe => encoded.extend([squared_norm, 1]),
    }

    EncodedVector(encoded)
}

/// Plain squared Euclidean distance between two templates
pub fn squared_distance(a: &Template, b: &Template) -> i64 {
    a.0.iter().zip(&b.0).map(|(x, y)| (x - y) * (x - y)).sum()
}
