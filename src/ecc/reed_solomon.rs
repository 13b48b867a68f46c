use super::gf256::Gf256;
use super::poly::Poly;

/// Reed-Solomon decoder for one block of codewords.
///
/// Syndromes, then the extended Euclidean key equation, then a Chien search
/// for error locations and Forney's formula for the magnitudes. Any
/// inconsistency along the way reports the block as uncorrectable; the
/// caller abandons the symbol (or retries a mirrored read).
pub struct ReedSolomonDecoder {
    ecc_len: usize,
}

impl ReedSolomonDecoder {
    /// Decoder for blocks carrying `ecc_len` ECC codewords
    pub fn new(ecc_len: usize) -> Self {
        Self { ecc_len }
    }

    /// Correct `codeword` in place; Err means the block is beyond repair
    pub fn decode(&self, codeword: &mut [u8]) -> Result<(), &'static str> {
        let t = self.ecc_len;
        let n = codeword.len();
        if n <= t || t == 0 {
            return Err("block shorter than its ECC");
        }

        let received = Poly::new(codeword);
        let mut syndromes = vec![0u8; t];
        let mut clean = true;
        for (i, s) in syndromes.iter_mut().enumerate() {
            *s = received.eval(Gf256::exp(i));
            clean &= *s == 0;
        }
        if clean {
            return Ok(());
        }

        // S(x) with the syndrome for a^i as the coefficient of x^i
        let mut syndrome_coeffs = syndromes.clone();
        syndrome_coeffs.reverse();
        let syndrome_poly = Poly::new(&syndrome_coeffs);

        let (sigma, omega) = key_equation(&Poly::monomial(t, 1), &syndrome_poly, t)?;
        let locations = chien_search(&sigma)?;

        let magnitudes = error_magnitudes(&omega, &locations)?;
        for (k, &x) in locations.iter().enumerate() {
            let power = Gf256::log(x) as usize;
            if power >= n {
                return Err("error position outside codeword");
            }
            codeword[n - 1 - power] ^= magnitudes[k];
        }

        // Corrected word must be a proper codeword again
        let corrected = Poly::new(codeword);
        for i in 0..t {
            if corrected.eval(Gf256::exp(i)) != 0 {
                return Err("syndromes remain after correction");
            }
        }
        Ok(())
    }
}

/// Extended Euclidean on (x^t, S(x)) down to remainder degree < t/2.
/// Returns (sigma, omega) normalised so sigma(0) = 1.
fn key_equation(a: &Poly, b: &Poly, t: usize) -> Result<(Poly, Poly), &'static str> {
    let (mut r_last, mut r) = if a.degree() >= b.degree() {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    };
    let mut t_last = Poly::zero();
    let mut t_cur = Poly::new(&[1]);

    while 2 * r.degree() >= t {
        let r_prev = std::mem::replace(&mut r_last, r.clone());
        let t_prev = std::mem::replace(&mut t_last, t_cur.clone());
        let (q, rem) = r_prev.div_rem(&r_last);
        r = rem;
        t_cur = q.mul(&t_last).add(&t_prev);
    }

    let sigma_at_zero = t_cur.coef_at(0);
    if sigma_at_zero == 0 {
        return Err("sigma(0) = 0");
    }
    let scale = Gf256::inv(sigma_at_zero);
    Ok((t_cur.mul_scalar(scale), r.mul_scalar(scale)))
}

/// Error location values X_k: field elements whose inverses are roots of sigma
fn chien_search(sigma: &Poly) -> Result<Vec<u8>, &'static str> {
    let expected = sigma.degree();
    let mut locations = Vec::with_capacity(expected);
    for value in 1..=255u8 {
        if sigma.eval(value) == 0 {
            locations.push(Gf256::inv(value));
            if locations.len() == expected {
                break;
            }
        }
    }
    if locations.len() != expected {
        return Err("error locator degree does not match its roots");
    }
    Ok(locations)
}

/// Forney magnitudes in the product form for generator base 0:
/// e_k = omega(X_k^-1) / prod_{j != k} (1 - X_j * X_k^-1)
fn error_magnitudes(omega: &Poly, locations: &[u8]) -> Result<Vec<u8>, &'static str> {
    let mut magnitudes = Vec::with_capacity(locations.len());
    for (k, &x_k) in locations.iter().enumerate() {
        let x_k_inv = Gf256::inv(x_k);
        let mut denominator = 1u8;
        for (j, &x_j) in locations.iter().enumerate() {
            if j != k {
                let term = Gf256::add(1, Gf256::mul(x_j, x_k_inv));
                denominator = Gf256::mul(denominator, term);
            }
        }
        if denominator == 0 {
            return Err("Forney denominator vanished");
        }
        magnitudes.push(Gf256::mul(omega.eval(x_k_inv), Gf256::inv(denominator)));
    }
    Ok(magnitudes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecc::generator::compute_ecc;

    fn encode(data: &[u8], ecc_len: usize) -> Vec<u8> {
        let mut codeword = data.to_vec();
        codeword.extend_from_slice(&compute_ecc(data, ecc_len));
        codeword
    }

    #[test]
    fn clean_codeword_passes_untouched() {
        let codeword = encode(&[0x12, 0x34, 0x56, 0x78, 0x9A], 8);
        let mut work = codeword.clone();
        assert!(ReedSolomonDecoder::new(8).decode(&mut work).is_ok());
        assert_eq!(work, codeword);
    }

    #[test]
    fn corrects_single_error() {
        let codeword = encode(&[0u8; 12], 10);
        let mut work = codeword.clone();
        work[4] ^= 0xA7;
        assert!(ReedSolomonDecoder::new(10).decode(&mut work).is_ok());
        assert_eq!(work, codeword);
    }

    #[test]
    fn corrects_up_to_half_ecc_errors() {
        let data: Vec<u8> = (0..20).map(|i| (i * 37 + 11) as u8).collect();
        let ecc_len = 10;
        let codeword = encode(&data, ecc_len);

        // t/2 = 5 errors spread across data and ECC
        let mut work = codeword.clone();
        for &(pos, flip) in &[(0usize, 0xFFu8), (7, 0x42), (13, 0x13), (21, 0x55), (29, 0xAA)] {
            work[pos] ^= flip;
        }
        assert!(ReedSolomonDecoder::new(ecc_len).decode(&mut work).is_ok());
        assert_eq!(work, codeword);
    }

    #[test]
    fn errors_in_ecc_tail_are_corrected() {
        let codeword = encode(&[1, 2, 3, 4, 5], 8);
        let n = codeword.len();
        let mut work = codeword.clone();
        work[n - 1] ^= 0xFF;
        work[n - 2] ^= 0x33;
        assert!(ReedSolomonDecoder::new(8).decode(&mut work).is_ok());
        assert_eq!(work, codeword);
    }

    #[test]
    fn too_many_errors_never_passes_silently_as_original() {
        let data: Vec<u8> = (0..16).map(|i| (i * 3) as u8).collect();
        let ecc_len = 8;
        let codeword = encode(&data, ecc_len);

        // t/2 + 1 = 5 errors: decoding may fail or miscorrect, but a
        // reported success must yield a consistent codeword
        let mut work = codeword.clone();
        for pos in [0usize, 3, 6, 9, 12] {
            work[pos] ^= 0x81;
        }
        let result = ReedSolomonDecoder::new(ecc_len).decode(&mut work);
        if result.is_ok() {
            let poly = Poly::new(&work);
            for i in 0..ecc_len {
                assert_eq!(poly.eval(Gf256::exp(i)), 0);
            }
        }
    }

    #[test]
    fn zero_length_ecc_is_rejected() {
        let mut work = vec![1, 2, 3];
        assert!(ReedSolomonDecoder::new(0).decode(&mut work).is_err());
    }
}
