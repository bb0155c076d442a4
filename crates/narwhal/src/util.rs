//! Small shared helpers.

use crate::error::{LayoutError, Result};
use std::str::FromStr;

/// An operator selected by name, e.g. `simplex`, `simplex()` or `coffman-graham(3)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Call<'a> {
    pub name: &'a str,
    pub args: Vec<&'a str>,
}

impl<'a> Call<'a> {
    pub fn parse(input: &'a str) -> Result<Self> {
        let input = input.trim();
        let Some(open) = input.find('(') else {
            return Ok(Self {
                name: input,
                args: Vec::new(),
            });
        };
        let name = input[..open].trim();
        let Some(inner) = input[open + 1..].strip_suffix(')') else {
            return Err(LayoutError::InvalidArgument {
                factory: name.to_string(),
                argument: input[open..].to_string(),
            });
        };
        let args = if inner.trim().is_empty() {
            Vec::new()
        } else {
            inner.split(',').map(str::trim).collect()
        };
        Ok(Self { name, args })
    }

    pub fn no_args(&self, factory: &str) -> Result<()> {
        if self.args.is_empty() {
            Ok(())
        } else {
            Err(LayoutError::UnexpectedArguments {
                factory: factory.to_string(),
            })
        }
    }

    pub fn at_most(&self, factory: &str, count: usize) -> Result<()> {
        match self.args.get(count) {
            None => Ok(()),
            Some(extra) => Err(invalid(factory, extra)),
        }
    }

    pub fn arg<T: FromStr>(&self, factory: &str, ix: usize) -> Result<Option<T>> {
        self.args
            .get(ix)
            .map(|raw| raw.parse::<T>().map_err(|_| invalid(factory, raw)))
            .transpose()
    }
}

pub(crate) fn invalid(factory: &str, argument: &str) -> LayoutError {
    LayoutError::InvalidArgument {
        factory: factory.to_string(),
        argument: argument.to_string(),
    }
}

/// Median of `values`; the mean of the two middle values for even lengths.
pub(crate) fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid])
    } else {
        Some((values[mid - 1] + values[mid]) / 2.0)
    }
}

pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_parses_bare_and_empty_parens() {
        assert_eq!(Call::parse("simplex").unwrap().args.len(), 0);
        assert_eq!(Call::parse(" simplex() ").unwrap().name, "simplex");
        assert_eq!(Call::parse("simplex()").unwrap().args.len(), 0);
    }

    #[test]
    fn call_splits_arguments() {
        let call = Call::parse("two-layer(mean, 8)").unwrap();
        assert_eq!(call.name, "two-layer");
        assert_eq!(call.args, vec!["mean", "8"]);
        assert_eq!(call.arg::<usize>("two-layer", 1).unwrap(), Some(8));
        assert!(call.arg::<usize>("two-layer", 0).is_err());
    }

    #[test]
    fn call_rejects_unbalanced_parens() {
        assert!(Call::parse("vert(3").is_err());
    }

    #[test]
    fn median_handles_even_and_odd() {
        assert_eq!(median(&mut [3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&mut [4.0, 1.0]), Some(2.5));
        assert_eq!(median(&mut []), None);
    }
}
