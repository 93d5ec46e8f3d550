//! Polynomial feature expansion of the three pressure coefficients.
//!
//! The stored calibration coefficients are indexed by term position in
//! the basis the rig fit expanded over, so prediction must enumerate
//! monomials in exactly the same order. The rule is pinned here rather
//! than delegated to any library default: for each total degree from 0
//! upwards, size-`k` multisets of the variable indices `{0, 1, 2}` are
//! enumerated in lexicographic order, and each multiset is one monomial.
//! A consequence worth relying on is that the degree-`d` basis is a
//! prefix of the degree-`d + 1` basis.

use itertools::Itertools;
use ndarray::Array1;
use num_traits::Float;

/// Number of coefficient inputs the expansion is built over:
/// `[cp_mach, cp_alpha, cp_beta]`, in that order.
pub const VARIABLES: usize = 3;

/// Number of monomials of total degree at most `degree` in the three
/// inputs.
///
/// Closed form of the binomial count $\binom{d + 3}{3}$.
#[must_use]
pub const fn feature_count(degree: usize) -> usize {
    (degree + 1) * (degree + 2) * (degree + 3) / 6
}

/// Variable-index multisets of the basis, one per monomial, in
/// enumeration order.
fn terms(degree: usize) -> impl Iterator<Item = Vec<usize>> {
    (0..=degree).flat_map(|total| (0..VARIABLES).combinations_with_replacement(total))
}

/// Exponent triples of the expansion basis, in enumeration order.
///
/// Term `k` of an expansion is the monomial
/// `x[0]^e[k][0] * x[1]^e[k][1] * x[2]^e[k][2]`. The list opens with the
/// constant term `[0, 0, 0]`.
///
/// # Examples
///
/// ```
/// use multihole::features::term_exponents;
///
/// let exponents = term_exponents(1);
/// assert_eq!(exponents, vec![[0, 0, 0], [1, 0, 0], [0, 1, 0], [0, 0, 1]]);
/// ```
#[must_use]
pub fn term_exponents(degree: usize) -> Vec<[usize; VARIABLES]> {
    terms(degree)
        .map(|term| {
            let mut exponents = [0; VARIABLES];
            for variable in term {
                exponents[variable] += 1;
            }
            exponents
        })
        .collect()
}

/// Expand the three coefficient inputs into the monomial basis of total
/// degree at most `degree`.
///
/// The output length is [`feature_count(degree)`](feature_count) and the
/// term order is the contract documented on [`term_exponents`].
///
/// # Examples
///
/// ```
/// use multihole::features::{expand, feature_count};
///
/// let features = expand(&[2.0, 3.0, 5.0], 2);
/// assert_eq!(features.len(), feature_count(2));
/// assert_eq!(features[0], 1.0); // constant term
/// assert_eq!(features[1], 2.0); // x0
/// assert_eq!(features[5], 6.0); // x0 * x1
/// ```
pub fn expand<E: Float>(inputs: &[E; VARIABLES], degree: usize) -> Array1<E> {
    Array1::from_iter(terms(degree).map(|term| {
        term.into_iter()
            .fold(E::one(), |monomial, variable| monomial * inputs[variable])
    }))
}
