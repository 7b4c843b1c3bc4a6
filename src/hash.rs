use crate::error::{BloomError, Result};
use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha384, Sha512};
use std::fmt;
use std::str::FromStr;

/// Cryptographic digest used to derive slice indices.
///
/// The algorithm is picked from the number of hash bits a filter needs per
/// key, smallest first. The selection table (and the names) follow the
/// pybloom family of libraries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigestAlgorithm {
    Md5,
    Sha1,
    Sha256,
    Sha384,
    Sha512,
}

impl DigestAlgorithm {
    pub const ALL: [DigestAlgorithm; 5] = [
        DigestAlgorithm::Md5,
        DigestAlgorithm::Sha1,
        DigestAlgorithm::Sha256,
        DigestAlgorithm::Sha384,
        DigestAlgorithm::Sha512,
    ];

    /// Smallest digest whose output covers `total_hash_bits`. Anything above
    /// 384 bits falls back to SHA-512 and is spread over several salts.
    pub fn for_hash_bits(total_hash_bits: usize) -> Self {
        if total_hash_bits > 384 {
            DigestAlgorithm::Sha512
        } else if total_hash_bits > 256 {
            DigestAlgorithm::Sha384
        } else if total_hash_bits > 160 {
            DigestAlgorithm::Sha256
        } else if total_hash_bits > 128 {
            DigestAlgorithm::Sha1
        } else {
            DigestAlgorithm::Md5
        }
    }

    /// Digest output length in bytes.
    pub fn output_len(self) -> usize {
        match self {
            DigestAlgorithm::Md5 => 16,
            DigestAlgorithm::Sha1 => 20,
            DigestAlgorithm::Sha256 => 32,
            DigestAlgorithm::Sha384 => 48,
            DigestAlgorithm::Sha512 => 64,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DigestAlgorithm::Md5 => "MD5",
            DigestAlgorithm::Sha1 => "SHA-1",
            DigestAlgorithm::Sha256 => "SHA-256",
            DigestAlgorithm::Sha384 => "SHA-384",
            DigestAlgorithm::Sha512 => "SHA-512",
        }
    }

    /// Digest of the concatenation of `parts`.
    pub fn digest(self, parts: &[&[u8]]) -> Vec<u8> {
        match self {
            DigestAlgorithm::Md5 => digest_parts::<Md5>(parts),
            DigestAlgorithm::Sha1 => digest_parts::<Sha1>(parts),
            DigestAlgorithm::Sha256 => digest_parts::<Sha256>(parts),
            DigestAlgorithm::Sha384 => digest_parts::<Sha384>(parts),
            DigestAlgorithm::Sha512 => digest_parts::<Sha512>(parts),
        }
    }
}

fn digest_parts<D: Digest>(parts: &[&[u8]]) -> Vec<u8> {
    let mut hasher = D::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().to_vec()
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = BloomError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_uppercase();
        match normalized.as_str() {
            "MD5" => Ok(DigestAlgorithm::Md5),
            "SHA1" => Ok(DigestAlgorithm::Sha1),
            "SHA256" => Ok(DigestAlgorithm::Sha256),
            "SHA384" => Ok(DigestAlgorithm::Sha384),
            "SHA512" => Ok(DigestAlgorithm::Sha512),
            _ => Err(BloomError::DigestUnavailable(s.to_string())),
        }
    }
}

/// Width of the little-endian words a digest is cut into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordWidth {
    U16,
    U32,
}

impl WordWidth {
    pub fn for_bits_per_slice(bits_per_slice: usize) -> Self {
        if bits_per_slice < (1 << 15) {
            WordWidth::U16
        } else {
            WordWidth::U32
        }
    }

    pub fn bytes(self) -> usize {
        match self {
            WordWidth::U16 => 2,
            WordWidth::U32 => 4,
        }
    }

    fn read(self, word: &[u8]) -> u64 {
        match self {
            WordWidth::U16 => u64::from(u16::from_le_bytes([word[0], word[1]])),
            WordWidth::U32 => u64::from(u32::from_le_bytes([
                word[0], word[1], word[2], word[3],
            ])),
        }
    }
}

/// Derives one index per slice for a key.
///
/// Each salt is the digest of its 4-byte big-endian index. Hashing a key
/// feeds `salt ++ key` through the same digest, which is byte-for-byte what
/// a digest context pre-seeded with the salt and then updated with the key
/// would produce.
#[derive(Debug, Clone, PartialEq)]
pub struct HashGenerator {
    num_slices: usize,
    bits_per_slice: usize,
    word_width: WordWidth,
    algorithm: DigestAlgorithm,
    salts: Vec<Vec<u8>>,
}

impl HashGenerator {
    pub fn new(num_slices: usize, bits_per_slice: usize) -> Result<Self> {
        if num_slices == 0 {
            return Err(BloomError::InvalidConfig(
                "Number of slices must be > 0".into(),
            ));
        }
        if bits_per_slice == 0 {
            return Err(BloomError::InvalidConfig(
                "Bits per slice must be > 0".into(),
            ));
        }

        let word_width = WordWidth::for_bits_per_slice(bits_per_slice);
        let total_hash_bits =
            num_slices.saturating_mul(word_width.bytes() * 8);
        let algorithm = DigestAlgorithm::for_hash_bits(total_hash_bits);
        let values_per_digest = algorithm.output_len() / word_width.bytes();
        let num_salts = num_slices.div_ceil(values_per_digest);

        let salts = (0..num_salts)
            .map(|i| {
                let index = u32::try_from(i).map_err(|_| {
                    BloomError::InvalidConfig(format!(
                        "Too many salts required: {num_salts}"
                    ))
                })?;
                Ok(algorithm.digest(&[index.to_be_bytes().as_slice()]))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            num_slices,
            bits_per_slice,
            word_width,
            algorithm,
            salts,
        })
    }

    /// Returns `num_slices` values, each in `[0, bits_per_slice)`.
    pub fn hash(&self, key: &str) -> Vec<usize> {
        let width = self.word_width.bytes();
        let modulus = self.bits_per_slice as u64;
        let mut hashes = Vec::with_capacity(self.num_slices);

        for salt in &self.salts {
            let digest =
                self.algorithm.digest(&[salt.as_slice(), key.as_bytes()]);
            for word in digest.chunks_exact(width) {
                hashes.push((self.word_width.read(word) % modulus) as usize);
                if hashes.len() == self.num_slices {
                    return hashes;
                }
            }
        }
        hashes
    }

    pub fn num_slices(&self) -> usize {
        self.num_slices
    }

    pub fn bits_per_slice(&self) -> usize {
        self.bits_per_slice
    }

    pub fn word_width(&self) -> WordWidth {
        self.word_width
    }

    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    pub fn num_salts(&self) -> usize {
        self.salts.len()
    }
}

/// Number of slices (one hash per slice) for a target error rate.
pub fn optimal_num_slices(error_rate: f64) -> usize {
    (1.0 / error_rate).log2().ceil() as usize
}

/// Bits in each slice so that `capacity` keys stay under `error_rate`.
pub fn optimal_bits_per_slice(
    capacity: usize,
    error_rate: f64,
    num_slices: usize,
) -> usize {
    let ln2 = std::f64::consts::LN_2;
    ((capacity as f64 * error_rate.ln().abs()) / (num_slices as f64 * ln2 * ln2))
        .ceil() as usize
}
