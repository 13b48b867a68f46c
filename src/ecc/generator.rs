use super::gf256::Gf256;
use super::poly::Poly;

/// Reed-Solomon generator polynomial of the given degree:
/// g(x) = (x - a^0)(x - a^1)...(x - a^(degree-1)), generator base 0 per QR
pub fn generator_poly(degree: usize) -> Poly {
    debug_assert!((1..=255).contains(&degree));
    let mut g = Poly::new(&[1]);
    for i in 0..degree {
        g = g.mul(&Poly::new(&[1, Gf256::exp(i)]));
    }
    g
}

/// ECC codewords for one data block: the remainder of data(x) * x^degree
/// divided by the generator polynomial, emitted highest degree first
pub fn compute_ecc(data: &[u8], degree: usize) -> Vec<u8> {
    let generator = generator_poly(degree);
    let remainder = Poly::new(data).mul_monomial(degree, 1).rem(&generator);
    (0..degree)
        .rev()
        .map(|d| remainder.coef_at(d))
        .collect()
}
