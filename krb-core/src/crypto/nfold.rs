//! [n-fold](https://www.rfc-editor.org/rfc/rfc3961.html#section-5.1)
//!
//! Stretches or compresses an input to `n` bits by concatenating copies of it, each rotated
//! 13 bits further to the right, and adding `n`-bit chunks with ones'-complement arithmetic.

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

fn rotate_right(data: &[u8], nbits: usize) -> Vec<u8> {
    let len = data.len();
    let nbytes = (nbits / 8) % len;
    let rbits = nbits % 8;

    (0..len)
        .map(|i| {
            let hi = data[(i + len - nbytes) % len] >> rbits;
            let lo = (u16::from(data[(i + 2 * len - nbytes - 1) % len]) << (8 - rbits)) as u8;
            hi | lo
        })
        .collect()
}

fn ones_complement_add(a: &[u8], b: &[u8]) -> Vec<u8> {
    let n = a.len();
    let mut v: Vec<u16> = a.iter().zip(b).map(|(a, b)| u16::from(*a) + u16::from(*b)).collect();

    while v.iter().any(|x| *x > 0xff) {
        v = (0..n).map(|i| (v[(i + 1) % n] >> 8) + (v[i] & 0xff)).collect();
    }

    v.into_iter().map(|x| x as u8).collect()
}

/// Folds `data` into `nbits` bits. `nbits` must be a multiple of 8 and `data` non-empty.
pub fn n_fold(data: &[u8], nbits: usize) -> Vec<u8> {
    let nbytes = nbits / 8;
    let len = data.len();
    let lcm = nbytes * len / gcd(nbytes, len);

    let big: Vec<u8> = (0..lcm / len).flat_map(|i| rotate_right(data, 13 * i)).collect();

    big.chunks(nbytes)
        .skip(1)
        .fold(big[..nbytes].to_vec(), |acc, chunk| ones_complement_add(&acc, chunk))
}

#[cfg(test)]
mod tests {
    use super::n_fold;
    use rstest::rstest;

    // RFC 3961 appendix A.1
    #[rstest]
    #[case(b"012345", 64, "be072631276b1955")]
    #[case(b"password", 56, "78a07b6caf85fa")]
    #[case(b"kerberos", 128, "6b65726265726f737b9b5b2b93132b93")]
    #[case(b"Rough Consensus, and Running Code", 64, "bb6ed30870b7f0e0")]
    #[case(b"kerberos", 64, "6b65726265726f73")]
    fn rfc3961_vectors(#[case] input: &[u8], #[case] nbits: usize, #[case] expected: &str) {
        assert_eq!(hex::encode(n_fold(input, nbits)), expected);
    }
}
