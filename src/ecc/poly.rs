use super::gf256::Gf256;

/// Polynomial over GF(2^8), coefficients stored highest degree first.
/// The zero polynomial is the single-element sequence [0].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poly {
    coefficients: Vec<u8>,
}

impl Poly {
    /// Build from coefficients (highest degree first); leading zeros are stripped
    pub fn new(coefficients: &[u8]) -> Self {
        assert!(!coefficients.is_empty(), "empty coefficient array");
        let first_nonzero = coefficients.iter().position(|&c| c != 0);
        match first_nonzero {
            Some(i) => Self {
                coefficients: coefficients[i..].to_vec(),
            },
            None => Self::zero(),
        }
    }

    /// The zero polynomial
    pub fn zero() -> Self {
        Self {
            coefficients: vec![0],
        }
    }

    /// coefficient * x^degree
    pub fn monomial(degree: usize, coefficient: u8) -> Self {
        if coefficient == 0 {
            return Self::zero();
        }
        let mut coefficients = vec![0; degree + 1];
        coefficients[0] = coefficient;
        Self { coefficients }
    }

    /// Degree of the polynomial; 0 for the zero polynomial
    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    /// True for the zero polynomial
    pub fn is_zero(&self) -> bool {
        self.coefficients[0] == 0
    }

    /// Coefficient of x^degree; 0 beyond the stored degree
    pub fn coef_at(&self, degree: usize) -> u8 {
        if degree > self.degree() {
            return 0;
        }
        self.coefficients[self.coefficients.len() - 1 - degree]
    }

    /// Leading (highest-degree) coefficient
    pub fn leading(&self) -> u8 {
        self.coefficients[0]
    }

    /// Evaluate at `x` by Horner's scheme
    pub fn eval(&self, x: u8) -> u8 {
        let mut acc = 0u8;
        for &c in &self.coefficients {
            acc = Gf256::add(Gf256::mul(acc, x), c);
        }
        acc
    }

    /// Pointwise XOR after aligning lengths
    pub fn add(&self, other: &Poly) -> Poly {
        if self.is_zero() {
            return other.clone();
        }
        if other.is_zero() {
            return self.clone();
        }
        let (longer, shorter) = if self.coefficients.len() >= other.coefficients.len() {
            (&self.coefficients, &other.coefficients)
        } else {
            (&other.coefficients, &self.coefficients)
        };
        let offset = longer.len() - shorter.len();
        let mut out = longer.clone();
        for (i, &c) in shorter.iter().enumerate() {
            out[offset + i] ^= c;
        }
        Poly::new(&out)
    }

    /// Product of two polynomials, O(n*m)
    pub fn mul(&self, other: &Poly) -> Poly {
        if self.is_zero() || other.is_zero() {
            return Poly::zero();
        }
        let a = &self.coefficients;
        let b = &other.coefficients;
        let mut out = vec![0u8; a.len() + b.len() - 1];
        for (i, &ai) in a.iter().enumerate() {
            if ai == 0 {
                continue;
            }
            for (j, &bj) in b.iter().enumerate() {
                out[i + j] ^= Gf256::mul(ai, bj);
            }
        }
        Poly::new(&out)
    }

    /// Multiply by coefficient * x^degree
    pub fn mul_monomial(&self, degree: usize, coefficient: u8) -> Poly {
        if self.is_zero() || coefficient == 0 {
            return Poly::zero();
        }
        let mut out = vec![0u8; self.coefficients.len() + degree];
        for (i, &c) in self.coefficients.iter().enumerate() {
            out[i] = Gf256::mul(c, coefficient);
        }
        Poly::new(&out)
    }

    /// Multiply every coefficient by a scalar
    pub fn mul_scalar(&self, scalar: u8) -> Poly {
        self.mul_monomial(0, scalar)
    }

    /// Quotient and remainder of self / divisor, by repeated subtraction of
    /// the divisor scaled to cancel the leading term
    pub fn div_rem(&self, divisor: &Poly) -> (Poly, Poly) {
        assert!(!divisor.is_zero(), "polynomial division by zero");
        let mut quotient = Poly::zero();
        let mut remainder = self.clone();
        let leading_inv = Gf256::inv(divisor.leading());

        while !remainder.is_zero() && remainder.degree() >= divisor.degree() {
            let degree_diff = remainder.degree() - divisor.degree();
            let scale = Gf256::mul(remainder.leading(), leading_inv);
            quotient = quotient.add(&Poly::monomial(degree_diff, scale));
            remainder = remainder.add(&divisor.mul_monomial(degree_diff, scale));
        }

        (quotient, remainder)
    }

    /// Remainder of self / divisor
    pub fn rem(&self, divisor: &Poly) -> Poly {
        self.div_rem(divisor).1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_strips_leading_zeros() {
        let p = Poly::new(&[0, 0, 5, 1]);
        assert_eq!(p.degree(), 1);
        assert_eq!(p.leading(), 5);
        assert_eq!(p.coef_at(0), 1);
        assert_eq!(p.coef_at(1), 5);
        assert_eq!(p.coef_at(7), 0);
    }

    #[test]
    fn zero_polynomial() {
        let z = Poly::new(&[0, 0, 0]);
        assert!(z.is_zero());
        assert_eq!(z.degree(), 0);
        assert_eq!(z, Poly::zero());
    }

    #[test]
    fn horner_evaluation() {
        // x^2 + 3x + 2 at x = 1 is 1 ^ 3 ^ 2 = 0
        let p = Poly::new(&[1, 3, 2]);
        assert_eq!(p.eval(1), 0);
        assert_eq!(p.eval(0), 2);
    }

    #[test]
    fn product_of_linear_factors() {
        // (x + 1)(x + 2) = x^2 + (1^2)x + 2 over GF(2^8)
        let a = Poly::new(&[1, 1]);
        let b = Poly::new(&[1, 2]);
        let prod = a.mul(&b);
        assert_eq!(prod, Poly::new(&[1, 3, 2]));
        // Both roots survive
        assert_eq!(prod.eval(1), 0);
        assert_eq!(prod.eval(2), 0);
    }

    #[test]
    fn addition_is_xor() {
        let a = Poly::new(&[1, 0, 7]);
        let b = Poly::new(&[1, 0, 3]);
        assert_eq!(a.add(&b), Poly::new(&[4]));
        assert_eq!(a.add(&Poly::zero()), a);
    }

    #[test]
    fn division_reconstructs_dividend() {
        // x^2 / (x + 1): q = x + 1, r = 1
        let dividend = Poly::monomial(2, 1);
        let divisor = Poly::new(&[1, 1]);
        let (q, r) = dividend.div_rem(&divisor);
        assert_eq!(q, Poly::new(&[1, 1]));
        assert_eq!(r, Poly::new(&[1]));
        assert_eq!(q.mul(&divisor).add(&r), dividend);
    }

    #[test]
    fn rem_by_larger_divisor_is_identity() {
        let p = Poly::new(&[5, 6]);
        let d = Poly::new(&[1, 0, 0, 0]);
        assert_eq!(p.rem(&d), p);
    }
}
